use crate::{
    asset::ether,
    ethereum::{
        geth::{Client, TransactionRequest},
        Address, Bytes, ChainId, Hash,
    },
    poll, Unsupported,
};
use anyhow::Context;
use std::time::Duration;
use url::Url;

/// Passphrase for the node-managed account backing this wallet. Keys never
/// leave the node; signing internals are out of scope for the harness.
const PASSPHRASE: &str = "";

/// An actor's Ethereum wallet, backed by a node-managed account on geth.
#[derive(Debug, Clone)]
pub struct Wallet {
    geth_client: Client,
    account: Address,
    chain_id: ChainId,
}

impl Wallet {
    pub async fn new(url: Url, chain_id: ChainId) -> anyhow::Result<Self> {
        let geth_client = Client::new(url);

        let node_chain_id = geth_client.chain_id().await?;
        if node_chain_id != chain_id {
            return Err(Unsupported::chain(node_chain_id.to_string()).into());
        }

        let account = geth_client
            .new_account(PASSPHRASE)
            .await
            .context("failed to create a node-managed account")?;

        Ok(Self {
            geth_client,
            account,
            chain_id,
        })
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub async fn balance(&self) -> anyhow::Result<ether::Amount> {
        self.geth_client.get_balance(self.account).await
    }

    /// Fund this wallet with at least `amount` from the node's pre-seeded
    /// dev account; over-funds by a factor of two to absorb fee uncertainty.
    pub async fn mint(&self, amount: ether::Amount) -> anyhow::Result<()> {
        let dev_account = self
            .geth_client
            .accounts()
            .await?
            .into_iter()
            .next()
            .context("node has no pre-seeded account to mint from")?;

        let funding = amount.double();
        let hash = self
            .geth_client
            .send_transaction(TransactionRequest {
                from: dev_account,
                to: Some(self.account),
                value: Some(funding.to_wei_hex()),
                gas: None,
                data: None,
            })
            .await
            .with_context(|| format!("failed to mint {} to {}", funding, self.account))?;
        self.wait_until_transaction_receipt(hash).await?;

        tracing::debug!("minted {} to {}", funding, self.account);

        Ok(())
    }

    pub async fn deploy_contract(
        &self,
        data: Bytes,
        amount: ether::Amount,
        gas_limit: String,
    ) -> anyhow::Result<()> {
        let hash = self
            .geth_client
            .personal_send_transaction(
                TransactionRequest {
                    from: self.account,
                    to: None,
                    value: Some(amount.to_wei_hex()),
                    gas: Some(gas_limit),
                    data: Some(data),
                },
                PASSPHRASE,
            )
            .await
            .context("failed to deploy contract")?;
        self.wait_until_transaction_receipt(hash).await?;

        Ok(())
    }

    pub async fn call_contract(
        &self,
        contract_address: Address,
        data: Option<Bytes>,
        gas_limit: String,
        amount: Option<ether::Amount>,
    ) -> anyhow::Result<()> {
        let hash = self
            .geth_client
            .personal_send_transaction(
                TransactionRequest {
                    from: self.account,
                    to: Some(contract_address),
                    value: amount.map(|a| a.to_wei_hex()),
                    gas: Some(gas_limit),
                    data,
                },
                PASSPHRASE,
            )
            .await
            .context("failed to call contract")?;
        self.wait_until_transaction_receipt(hash).await?;

        Ok(())
    }

    async fn wait_until_transaction_receipt(&self, transaction_hash: Hash) -> anyhow::Result<()> {
        let budget = poll::Budget::new(Duration::from_secs(1), Duration::from_secs(60));

        poll::until(budget, &format!("receipt for {}", transaction_hash), || {
            let client = self.geth_client.clone();
            async move { client.get_transaction_receipt(transaction_hash).await }
        })
        .await?;

        Ok(())
    }
}
