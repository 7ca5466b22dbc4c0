use num::{BigUint, Num, Zero};
use serde::{
    de::{self, Deserialize, Deserializer},
    ser::{Serialize, Serializer},
};
use std::{fmt, ops::Add, str::FromStr};

/// An amount of Ether, counted in wei.
///
/// Serialized as a decimal string so no precision is lost on the wire.
#[derive(Debug, Clone, Default, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct Amount(BigUint);

impl Amount {
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    pub fn from_wei(wei: u128) -> Self {
        Self(BigUint::from(wei))
    }

    pub fn from_wei_dec_str(str: &str) -> anyhow::Result<Self> {
        let int = BigUint::from_str_radix(str, 10)
            .map_err(|_| anyhow::anyhow!("{} is not a decimal wei quantity", str))?;
        Ok(Self(int))
    }

    pub fn try_from_hex(hex: impl AsRef<str>) -> anyhow::Result<Self> {
        let hex = hex.as_ref().trim_start_matches("0x");
        let int = BigUint::from_str_radix(hex, 16)
            .map_err(|_| anyhow::anyhow!("{} is not a hex wei quantity", hex))?;
        Ok(Self(int))
    }

    pub fn to_wei_dec(&self) -> String {
        self.0.to_str_radix(10)
    }

    pub fn to_wei_hex(&self) -> String {
        format!("0x{}", self.0.to_str_radix(16))
    }

    pub fn double(&self) -> Self {
        Self(&self.0 * 2u8)
    }

    pub fn checked_sub(&self, rhs: &Self) -> Option<Self> {
        if self.0 >= rhs.0 {
            Some(Self(&self.0 - &rhs.0))
        } else {
            None
        }
    }

    /// The wei amount minus `rhs`, floored at zero.
    pub fn saturating_sub(&self, rhs: &Self) -> Self {
        self.checked_sub(rhs).unwrap_or_else(Amount::zero)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wei", self.to_wei_dec())
    }
}

impl FromStr for Amount {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::from_wei_dec_str(s)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_wei_dec())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor;

        impl<'vde> de::Visitor<'vde> for Visitor {
            type Value = Amount;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a string representing a wei quantity")
            }

            fn visit_str<E>(self, v: &str) -> Result<Amount, E>
            where
                E: de::Error,
            {
                Amount::from_wei_dec_str(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(Visitor)
    }
}
