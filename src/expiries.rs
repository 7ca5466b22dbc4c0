use crate::timestamp::Timestamp;

/// An alpha/beta expiry pair.
///
/// Alpha always expires strictly after beta so the party who funds first has
/// the longer window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Expiries {
    pub alpha: Timestamp,
    pub beta: Timestamp,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Profile {
    /// Deterministic short expiries so refund paths are reachable in a test
    /// run: alpha five seconds out, beta immediately.
    Test,
    /// A fixed far-future pair for runs that must never hit an expiry.
    Production,
}

const PRODUCTION_ALPHA_EXPIRY: u32 = 2_000_000_000;
const PRODUCTION_BETA_EXPIRY: u32 = 1_999_996_400;

impl Profile {
    pub fn expiries(self) -> Expiries {
        match self {
            Profile::Test => {
                let now = Timestamp::now();
                Expiries {
                    alpha: now.plus(5),
                    beta: now,
                }
            }
            Profile::Production => Expiries {
                alpha: Timestamp::from(PRODUCTION_ALPHA_EXPIRY),
                beta: Timestamp::from(PRODUCTION_BETA_EXPIRY),
            },
        }
    }
}
