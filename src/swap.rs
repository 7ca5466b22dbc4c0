//! The request and response bodies cnd's rfc003 HTTP API speaks.

use crate::{
    asset::ether,
    ethereum::{Bytes, ChainId},
    ledger,
    timestamp::Timestamp,
};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fmt::{self, Debug},
    str::FromStr,
};

/// A ledger as it appears in swap payloads, tagged by `name`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum Ledger {
    Bitcoin { network: ledger::Bitcoin },
    Ethereum { chain_id: ChainId },
}

impl Ledger {
    /// The ledger this leg settles on, independent of network parameters.
    pub fn kind(&self) -> ledger::Kind {
        match self {
            Ledger::Bitcoin { .. } => ledger::Kind::Bitcoin,
            Ledger::Ethereum { .. } => ledger::Kind::Ethereum,
        }
    }
}

/// An asset as it appears in swap payloads, tagged by `name`, quantity in the
/// native smallest unit as a decimal string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum Asset {
    Bitcoin {
        #[serde(with = "sats_as_string")]
        quantity: bitcoin::Amount,
    },
    Ether {
        quantity: ether::Amount,
    },
}

pub mod sats_as_string {
    use bitcoin::{util::amount::Denomination, Amount};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&amount.as_sat().to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Amount, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        Amount::from_str_in(&string, Denomination::Satoshi).map_err(de::Error::custom)
    }
}

/// How the initiator names the responder's daemon in the creation payload.
///
/// The peer id and address hint are opaque to this client; it only relays
/// them back to the daemon.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialInformation {
    pub peer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_hint: Option<String>,
}

/// The body of `POST /swaps/rfc003`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SwapRequestBody {
    pub alpha_ledger: Ledger,
    pub beta_ledger: Ledger,
    pub alpha_asset: Asset,
    pub beta_asset: Asset,
    pub alpha_expiry: Timestamp,
    pub beta_expiry: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha_ledger_refund_identity: Option<crate::ethereum::Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta_ledger_redeem_identity: Option<crate::ethereum::Address>,
    pub peer: DialInformation,
}

/// The swap properties this client consumes; unknown fields are ignored.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SwapProperties {
    pub role: String,
    pub counterparty: String,
    pub protocol: String,
    pub status: SwapStatus,
    #[serde(default)]
    pub state: Option<SwapState>,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapStatus {
    InProgress,
    Swapped,
    NotSwapped,
    InternalFailure,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SwapState {
    pub communication: CommunicationState,
    pub alpha_ledger: LedgerState,
    pub beta_ledger: LedgerState,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CommunicationState {
    pub status: CommunicationStatus,
    pub secret_hash: SecretHash,
    pub alpha_expiry: Timestamp,
    pub beta_expiry: Timestamp,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommunicationStatus {
    Sent,
    Accepted,
    Declined,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LedgerState {
    pub status: String,
}

/// The ledger action the daemon answers an executed fund/redeem/refund with.
/// The owning wallet performs the described transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "type", content = "payload")]
pub enum ActionResponseBody {
    BitcoinSendAmountToAddress {
        to: bitcoin::Address,
        amount: String,
        network: ledger::Bitcoin,
    },
    BitcoinBroadcastSignedTransaction {
        hex: String,
        network: ledger::Bitcoin,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_median_block_time: Option<Timestamp>,
    },
    EthereumDeployContract {
        data: Bytes,
        amount: ether::Amount,
        gas_limit: String,
        chain_id: ChainId,
    },
    EthereumCallContract {
        contract_address: crate::ethereum::Address,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Bytes>,
        gas_limit: String,
        chain_id: ChainId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_block_timestamp: Option<Timestamp>,
    },
    None,
}

/// The correlation key between the two parties' views of one swap: the only
/// channel by which the non-initiating actor discovers which swap is "theirs".
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct SecretHash([u8; Self::LENGTH]);

impl SecretHash {
    pub const LENGTH: usize = 32;

    pub fn raw(&self) -> &[u8; Self::LENGTH] {
        &self.0
    }
}

impl From<[u8; SecretHash::LENGTH]> for SecretHash {
    fn from(bytes: [u8; SecretHash::LENGTH]) -> Self {
        SecretHash(bytes)
    }
}

impl Debug for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretHash({:x})", self)
    }
}

impl fmt::Display for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self)
    }
}

impl fmt::LowerHex for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(hex::encode(&self.0).as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ParseSecretHashError {
    #[error("expected {expected} hex-encoded bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },
    #[error("invalid hex encoding")]
    FromHex(#[from] hex::FromHexError),
}

impl FromStr for SecretHash {
    type Err = ParseSecretHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim_start_matches("0x");
        let bytes = hex::decode(hex)?;
        if bytes.len() != Self::LENGTH {
            return Err(ParseSecretHashError::InvalidLength {
                expected: Self::LENGTH,
                got: bytes.len(),
            });
        }

        let mut raw = [0u8; Self::LENGTH];
        raw.copy_from_slice(&bytes);
        Ok(SecretHash(raw))
    }
}

impl Serialize for SecretHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:x}", self))
    }
}

impl<'de> Deserialize<'de> for SecretHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor;

        impl<'vde> de::Visitor<'vde> for Visitor {
            type Value = SecretHash;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a hex encoded 32 byte value")
            }

            fn visit_str<E>(self, v: &str) -> Result<SecretHash, E>
            where
                E: de::Error,
            {
                SecretHash::from_str(v).map_err(|_| {
                    de::Error::invalid_value(de::Unexpected::Str(v), &"hex encoded bytes")
                })
            }
        }

        deserializer.deserialize_str(Visitor)
    }
}
