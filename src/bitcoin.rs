pub mod bitcoind;
pub mod wallet;

pub use self::{bitcoind::Client, wallet::Wallet};
pub use ::bitcoin::{Address, Amount, Network};
