#![warn(
    unused_extern_crates,
    missing_debug_implementations,
    rust_2018_idioms,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::fallible_impl_from,
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap,
    clippy::dbg_macro
)]
#![forbid(unsafe_code)]

pub mod action;
pub mod actor;
pub mod asset;
pub mod bitcoin;
pub mod cnd;
pub mod config;
pub mod ethereum;
pub mod expiries;
pub mod identity;
pub mod jsonrpc;
pub mod ledger;
pub mod poll;
pub mod registry;
pub mod siren;
pub mod swap;
pub mod timestamp;
pub mod trace;
pub mod wallet;

pub use actor::Actor;
pub use registry::{Registry, Role};

/// A requested ledger, asset or network value that this harness has no
/// implementation for. Always names the exact offending input.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{subject} {value} is not supported")]
pub struct Unsupported {
    subject: &'static str,
    value: String,
}

impl Unsupported {
    pub fn asset(value: impl Into<String>) -> Self {
        Self {
            subject: "asset",
            value: value.into(),
        }
    }

    pub fn ledger(value: impl Into<String>) -> Self {
        Self {
            subject: "ledger",
            value: value.into(),
        }
    }

    pub fn network(value: impl Into<String>) -> Self {
        Self {
            subject: "network",
            value: value.into(),
        }
    }

    pub fn chain(value: impl Into<String>) -> Self {
        Self {
            subject: "chain",
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}
