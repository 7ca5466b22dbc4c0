pub mod ether;

use crate::{
    ledger,
    swap::{Asset, Ledger},
    Unsupported,
};
use std::str::FromStr;

/// The kinds of asset a default swap can be requested for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum AssetKind {
    Bitcoin,
    Ether,
}

impl FromStr for AssetKind {
    type Err = Unsupported;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bitcoin" => Ok(AssetKind::Bitcoin),
            "ether" => Ok(AssetKind::Ether),
            other => Err(Unsupported::asset(other)),
        }
    }
}

/// The single source of truth for what a default swap of a given asset kind
/// looks like. Deterministic so that tests can assert exact payload shapes.
pub fn describe(kind: AssetKind) -> (Ledger, Asset) {
    match kind {
        AssetKind::Bitcoin => (
            Ledger::Bitcoin {
                network: ledger::Bitcoin::Regtest,
            },
            Asset::Bitcoin {
                quantity: ::bitcoin::Amount::from_sat(100_000_000),
            },
        ),
        AssetKind::Ether => (
            Ledger::Ethereum {
                chain_id: crate::ethereum::ChainId::REGTEST,
            },
            Asset::Ether {
                quantity: ether::Amount::from_wei(10_000_000_000_000_000_000u128),
            },
        ),
    }
}
