use crate::{bitcoin::bitcoind, jsonrpc, ledger, Unsupported};
use anyhow::Context;
use bitcoin::{Address, Amount};
use rand::{distributions::Alphanumeric, Rng};
use url::Url;

/// bitcoind error code for "wallet already exists".
const RPC_WALLET_ERROR: i64 = -4;

/// The node's default wallet, pre-funded by fixture-side block production.
const MINER_WALLET: &str = "";

/// An actor's Bitcoin wallet, backed by a node wallet on bitcoind.
#[derive(Debug, Clone)]
pub struct Wallet {
    client: bitcoind::Client,
    name: String,
    network: ledger::Bitcoin,
}

impl Wallet {
    pub async fn new(url: Url, network: ledger::Bitcoin) -> anyhow::Result<Self> {
        let client = bitcoind::Client::new(url);

        let chain = client.network().await?;
        if chain != network.to_string() {
            return Err(Unsupported::network(chain).into());
        }

        let name = random_wallet_name();
        let wallet = Self {
            client,
            name,
            network,
        };
        wallet.create().await?;

        Ok(wallet)
    }

    async fn create(&self) -> anyhow::Result<()> {
        match self.client.create_wallet(&self.name).await {
            Ok(_) => Ok(()),
            // a warm node may already know this wallet from an earlier run
            Err(e)
                if e.downcast_ref::<jsonrpc::JsonRpcError>()
                    .map_or(false, |rpc| rpc.code() == RPC_WALLET_ERROR) =>
            {
                Ok(())
            }
            Err(e) => Err(e.context(format!("failed to create wallet {}", self.name))),
        }
    }

    pub fn network(&self) -> ledger::Bitcoin {
        self.network
    }

    /// A fresh receive address from this wallet.
    pub async fn new_address(&self) -> anyhow::Result<Address> {
        self.client
            .get_new_address(&self.name, None, Some("bech32".into()))
            .await
            .context("failed to derive a new address")
    }

    pub async fn balance(&self) -> anyhow::Result<Amount> {
        self.client.get_balance(&self.name).await
    }

    /// Fund this wallet with at least `amount` from the node's miner wallet.
    ///
    /// Over-funds by a factor of two to absorb fee uncertainty; confirmation
    /// relies on fixture-side block production.
    pub async fn mint(&self, amount: Amount) -> anyhow::Result<()> {
        let address = self.new_address().await?;
        let funding = amount
            .checked_mul(2)
            .context("mint amount overflows when doubled")?;

        self.client
            .send_to_address(MINER_WALLET, address.clone(), funding)
            .await
            .with_context(|| format!("failed to mint {} to {}", funding, address))?;

        tracing::debug!("minted {} to {}", funding, address);

        Ok(())
    }

    pub async fn send_to_address(&self, address: Address, amount: Amount) -> anyhow::Result<()> {
        self.client
            .send_to_address(&self.name, address, amount)
            .await?;
        Ok(())
    }

    pub async fn broadcast_signed_transaction(&self, hex: String) -> anyhow::Result<()> {
        self.client.send_raw_transaction(hex).await?;
        Ok(())
    }
}

fn random_wallet_name() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();

    format!("harness-{}", suffix)
}
