use crate::jsonrpc;
use anyhow::Context;
use bitcoin::{Address, Amount};
use serde::Deserialize;

pub const JSONRPC_VERSION: &str = "1.0";

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

    pub async fn network(&self) -> anyhow::Result<String> {
        let blockchain_info = self
            .rpc_client
            .send::<Vec<()>, BlockchainInfo>(jsonrpc::Request::new(
                "getblockchaininfo",
                vec![],
                JSONRPC_VERSION.into(),
            ))
            .await
            .context("failed to fetch blockchain info")?;

        Ok(blockchain_info.chain)
    }

    pub async fn create_wallet(&self, wallet_name: &str) -> anyhow::Result<CreateWalletResponse> {
        let response = self
            .rpc_client
            .send(jsonrpc::Request::new(
                "createwallet",
                vec![jsonrpc::serialize(wallet_name)?],
                JSONRPC_VERSION.into(),
            ))
            .await?;
        Ok(response)
    }

    pub async fn get_new_address(
        &self,
        wallet_name: &str,
        label: Option<String>,
        address_type: Option<String>,
    ) -> anyhow::Result<Address> {
        let address = self
            .rpc_client
            .send_with_path(
                format!("wallet/{}", wallet_name),
                jsonrpc::Request::new(
                    "getnewaddress",
                    vec![
                        jsonrpc::serialize(label)?,
                        jsonrpc::serialize(address_type)?,
                    ],
                    JSONRPC_VERSION.into(),
                ),
            )
            .await?;
        Ok(address)
    }

    pub async fn get_balance(&self, wallet_name: &str) -> anyhow::Result<Amount> {
        let balance: f64 = self
            .rpc_client
            .send_with_path(
                format!("wallet/{}", wallet_name),
                jsonrpc::Request::new("getbalance", Vec::<()>::new(), JSONRPC_VERSION.into()),
            )
            .await?;
        let balance = Amount::from_btc(balance).context("balance is not a valid amount")?;
        Ok(balance)
    }

    pub async fn send_to_address(
        &self,
        wallet_name: &str,
        address: Address,
        amount: Amount,
    ) -> anyhow::Result<Txid> {
        let txid = self
            .rpc_client
            .send_with_path(
                format!("wallet/{}", wallet_name),
                jsonrpc::Request::new(
                    "sendtoaddress",
                    vec![
                        jsonrpc::serialize(address)?,
                        jsonrpc::serialize(amount.as_btc())?,
                    ],
                    JSONRPC_VERSION.into(),
                ),
            )
            .await?;
        Ok(txid)
    }

    pub async fn send_raw_transaction(&self, transaction_hex: String) -> anyhow::Result<Txid> {
        let txid = self
            .rpc_client
            .send(jsonrpc::Request::new(
                "sendrawtransaction",
                vec![jsonrpc::serialize(transaction_hex)?],
                JSONRPC_VERSION.into(),
            ))
            .await
            .context("failed to broadcast raw transaction")?;
        Ok(txid)
    }
}

#[derive(Debug, Deserialize)]
struct BlockchainInfo {
    chain: String,
}

#[derive(Debug, Deserialize)]
pub struct Txid(pub String);

#[derive(Debug, Deserialize)]
pub struct CreateWalletResponse {
    pub name: String,
    #[serde(default)]
    pub warning: Option<String>,
}
