use crate::{config::file, ethereum::ChainId, ledger};
use url::Url;

/// Fully resolved configuration, with defaults filled in.
///
/// A `None` section means the corresponding ledger was deliberately left out
/// of this test run; wallets for it cannot be created.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub bitcoin: Option<Bitcoin>,
    pub ethereum: Option<Ethereum>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bitcoin {
    pub network: ledger::Bitcoin,
    pub node_url: Url,
}

impl Bitcoin {
    fn default_from_network(network: ledger::Bitcoin) -> Self {
        let node_url = match network {
            ledger::Bitcoin::Mainnet => "http://localhost:8332",
            ledger::Bitcoin::Testnet => "http://localhost:18332",
            ledger::Bitcoin::Regtest => "http://localhost:18443",
        }
        .parse()
        .expect("static string to be a valid url");

        Self { network, node_url }
    }

    fn from_file(bitcoin: file::Bitcoin) -> Self {
        let network = bitcoin.network;
        let node_url = bitcoin
            .node_url
            .unwrap_or_else(|| Self::default_from_network(network).node_url);

        Self { network, node_url }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ethereum {
    pub chain_id: ChainId,
    pub node_url: Url,
}

impl Ethereum {
    fn default_from_chain_id(chain_id: ChainId) -> Self {
        let node_url = "http://localhost:8545"
            .parse()
            .expect("static string to be a valid url");

        Self { chain_id, node_url }
    }

    fn from_file(ethereum: file::Ethereum) -> Self {
        let chain_id = ethereum.chain_id;
        let node_url = ethereum
            .node_url
            .unwrap_or_else(|| Self::default_from_chain_id(chain_id).node_url);

        Self { chain_id, node_url }
    }
}

impl Settings {
    pub fn from_config_file_and_defaults(file: file::File) -> Self {
        let bitcoin = file
            .bitcoin
            .map(Bitcoin::from_file)
            .or_else(|| Some(Bitcoin::default_from_network(ledger::Bitcoin::Regtest)));
        let ethereum = file
            .ethereum
            .map(Ethereum::from_file)
            .or_else(|| Some(Ethereum::default_from_chain_id(ChainId::REGTEST)));

        Self { bitcoin, ethereum }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config_file_and_defaults(file::File::default())
    }
}
