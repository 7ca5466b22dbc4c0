use crate::{ethereum::ChainId, ledger};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// This struct aims to represent the configuration file as it appears on disk.
///
/// Optional elements are represented as `Option`s here; filling in defaults
/// for absent options is a dedicated step in [`crate::config::Settings`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct File {
    pub bitcoin: Option<Bitcoin>,
    pub ethereum: Option<Ethereum>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Bitcoin {
    pub network: ledger::Bitcoin,
    pub node_url: Option<Url>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Ethereum {
    pub chain_id: ChainId,
    pub node_url: Option<Url>,
}

impl File {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let file = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        Ok(file)
    }
}
