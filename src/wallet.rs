//! The pair of ledger wallets an actor may hold, and the dispatch of
//! ledger-specific instructions onto them.

use crate::{
    action::{FieldKind, BITCOIN_FEE_PER_WU},
    bitcoin, ethereum, ledger,
    swap::ActionResponseBody,
};
use ::bitcoin::{Amount, Denomination};
use anyhow::Context;

/// Both wallets start out absent; a swap leg only forces the wallet for its
/// own ledger into existence.
#[derive(Debug, Clone, Default)]
pub struct WalletSet {
    pub bitcoin: Option<bitcoin::Wallet>,
    pub ethereum: Option<ethereum::Wallet>,
}

#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
#[error("no {ledger} wallet has been initialized for this actor")]
pub struct NotInitialized {
    pub ledger: ledger::Kind,
}

impl WalletSet {
    pub fn bitcoin(&self) -> Result<&bitcoin::Wallet, NotInitialized> {
        self.bitcoin.as_ref().ok_or(NotInitialized {
            ledger: ledger::Kind::Bitcoin,
        })
    }

    pub fn ethereum(&self) -> Result<&ethereum::Wallet, NotInitialized> {
        self.ethereum.as_ref().ok_or(NotInitialized {
            ledger: ledger::Kind::Ethereum,
        })
    }

    /// Produce the value to supply for a recognized action field.
    pub async fn resolve(&self, kind: FieldKind) -> anyhow::Result<serde_json::Value> {
        let value = match kind {
            FieldKind::EthereumAddress => {
                let account = self.ethereum()?.account();
                serde_json::Value::String(account.to_string())
            }
            FieldKind::BitcoinFeePerWu => serde_json::json!(BITCOIN_FEE_PER_WU),
            FieldKind::BitcoinAddress => {
                let address = self.bitcoin()?.new_address().await?;
                serde_json::Value::String(address.to_string())
            }
        };

        Ok(value)
    }

    /// Carry out the ledger instruction the daemon returned for an action.
    pub async fn execute(&self, instruction: ActionResponseBody) -> anyhow::Result<()> {
        match instruction {
            ActionResponseBody::BitcoinSendAmountToAddress { to, amount, .. } => {
                let amount = Amount::from_str_in(&amount, Denomination::Satoshi)
                    .context("amount is not a valid number of satoshis")?;
                self.bitcoin()?.send_to_address(to, amount).await?;
            }
            ActionResponseBody::BitcoinBroadcastSignedTransaction { hex, .. } => {
                self.bitcoin()?.broadcast_signed_transaction(hex).await?;
            }
            ActionResponseBody::EthereumDeployContract {
                data,
                amount,
                gas_limit,
                ..
            } => {
                self.ethereum()?
                    .deploy_contract(data, amount, gas_limit)
                    .await?;
            }
            ActionResponseBody::EthereumCallContract {
                contract_address,
                data,
                gas_limit,
                ..
            } => {
                self.ethereum()?
                    .call_contract(contract_address, data, gas_limit, None)
                    .await?;
            }
            ActionResponseBody::None => {}
        }

        Ok(())
    }
}
