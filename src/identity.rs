//! Ledger data providers: the capability to produce a fresh identity
//! (address or account) on a ledger.

use crate::{
    bitcoin, config::Settings, ethereum, ledger, swap::Ledger, Unsupported,
};
use std::fmt;

/// An on-ledger identity.
#[derive(Clone, Debug, PartialEq)]
pub enum Identity {
    Bitcoin(::bitcoin::Address),
    Ethereum(ethereum::Address),
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Bitcoin(address) => write!(f, "{}", address),
            Identity::Ethereum(address) => write!(f, "{}", address),
        }
    }
}

/// The provider starts out `Uninitialized`; using it in that state is a
/// typed precondition violation, not a silent stub.
#[derive(Debug, Clone)]
pub enum LedgerDataProvider {
    Bitcoin(bitcoin::Wallet),
    Ethereum(ethereum::Wallet),
    Uninitialized,
}

#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
#[error("ledger data provider has not been initialized")]
pub struct NotInitialized;

impl Default for LedgerDataProvider {
    fn default() -> Self {
        LedgerDataProvider::Uninitialized
    }
}

impl LedgerDataProvider {
    /// Build a provider for the given ledger from explicit settings.
    ///
    /// Fails with [`Unsupported`] when the requested network is not the test
    /// network, or when the settings carry no section for the ledger (it was
    /// not bootstrapped for this test run).
    pub async fn create(ledger: &Ledger, settings: &Settings) -> anyhow::Result<Self> {
        match ledger {
            Ledger::Bitcoin { network } => {
                if *network != ledger::Bitcoin::Regtest {
                    return Err(Unsupported::network(network.to_string()).into());
                }
                let config = settings
                    .bitcoin
                    .as_ref()
                    .ok_or_else(|| Unsupported::ledger("bitcoin"))?;

                let wallet = bitcoin::Wallet::new(config.node_url.clone(), *network).await?;
                Ok(LedgerDataProvider::Bitcoin(wallet))
            }
            Ledger::Ethereum { chain_id } => {
                if *chain_id != ethereum::ChainId::REGTEST {
                    return Err(Unsupported::chain(chain_id.to_string()).into());
                }
                let config = settings
                    .ethereum
                    .as_ref()
                    .ok_or_else(|| Unsupported::ledger("ethereum"))?;

                let wallet = ethereum::Wallet::new(config.node_url.clone(), *chain_id).await?;
                Ok(LedgerDataProvider::Ethereum(wallet))
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        !matches!(self, LedgerDataProvider::Uninitialized)
    }

    pub async fn new_identity(&self) -> anyhow::Result<Identity> {
        match self {
            LedgerDataProvider::Bitcoin(wallet) => {
                let address = wallet.new_address().await?;
                Ok(Identity::Bitcoin(address))
            }
            LedgerDataProvider::Ethereum(wallet) => {
                Ok(Identity::Ethereum(wallet.account()))
            }
            LedgerDataProvider::Uninitialized => Err(NotInitialized.into()),
        }
    }
}
