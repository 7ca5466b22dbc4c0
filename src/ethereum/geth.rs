use crate::{
    asset::ether,
    ethereum::{Address, Bytes, ChainId, Hash},
    jsonrpc,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Clone)]
pub struct Client {
    rpc_client: jsonrpc::Client,
}

impl Client {
    pub fn new(url: url::Url) -> Self {
        Client {
            rpc_client: jsonrpc::Client::new(url),
        }
    }

    pub async fn chain_id(&self) -> anyhow::Result<ChainId> {
        let chain_id = self
            .rpc_client
            .send::<Vec<()>, String>(jsonrpc::Request::new(
                "net_version",
                vec![],
                JSONRPC_VERSION.into(),
            ))
            .await
            .context("failed to fetch net version")?;
        let chain_id: u32 = chain_id.parse()?;

        Ok(ChainId::from(chain_id))
    }

    /// The node-managed accounts; the first one is the pre-seeded dev
    /// account in a `geth --dev` setup.
    pub async fn accounts(&self) -> anyhow::Result<Vec<Address>> {
        let accounts = self
            .rpc_client
            .send::<Vec<()>, Vec<Address>>(jsonrpc::Request::new(
                "eth_accounts",
                vec![],
                JSONRPC_VERSION.into(),
            ))
            .await
            .context("failed to list accounts")?;

        Ok(accounts)
    }

    pub async fn new_account(&self, passphrase: &str) -> anyhow::Result<Address> {
        let account = self
            .rpc_client
            .send(jsonrpc::Request::new(
                "personal_newAccount",
                vec![jsonrpc::serialize(passphrase)?],
                JSONRPC_VERSION.into(),
            ))
            .await
            .context("failed to create account")?;

        Ok(account)
    }

    pub async fn get_balance(&self, address: Address) -> anyhow::Result<ether::Amount> {
        let amount: String = self
            .rpc_client
            .send(jsonrpc::Request::new(
                "eth_getBalance",
                vec![jsonrpc::serialize(address)?, jsonrpc::serialize("latest")?],
                JSONRPC_VERSION.into(),
            ))
            .await
            .context("failed to get balance")?;
        let amount = ether::Amount::try_from_hex(amount)?;

        Ok(amount)
    }

    pub async fn send_transaction(&self, request: TransactionRequest) -> anyhow::Result<Hash> {
        let hash = self
            .rpc_client
            .send(jsonrpc::Request::new(
                "eth_sendTransaction",
                vec![jsonrpc::serialize(request)?],
                JSONRPC_VERSION.into(),
            ))
            .await
            .context("failed to send transaction")?;

        Ok(hash)
    }

    pub async fn personal_send_transaction(
        &self,
        request: TransactionRequest,
        passphrase: &str,
    ) -> anyhow::Result<Hash> {
        let hash = self
            .rpc_client
            .send(jsonrpc::Request::new(
                "personal_sendTransaction",
                vec![
                    jsonrpc::serialize(request)?,
                    jsonrpc::serialize(passphrase)?,
                ],
                JSONRPC_VERSION.into(),
            ))
            .await
            .context("failed to send personal transaction")?;

        Ok(hash)
    }

    pub async fn get_transaction_receipt(
        &self,
        transaction_hash: Hash,
    ) -> anyhow::Result<Option<TransactionReceipt>> {
        let receipt = self
            .rpc_client
            .send(jsonrpc::Request::new(
                "eth_getTransactionReceipt",
                vec![jsonrpc::serialize(transaction_hash)?],
                JSONRPC_VERSION.into(),
            ))
            .await
            .context("failed to get transaction receipt")?;

        Ok(receipt)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionRequest {
    pub from: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Wei, hex-encoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Gas limit, hex-encoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionReceipt {
    #[serde(default, rename = "contractAddress")]
    pub contract_address: Option<Address>,
    #[serde(default)]
    pub status: Option<String>,
}
