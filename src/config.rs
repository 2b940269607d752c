use serde::Deserialize;

use crate::error::Result;

/// Chaincode process configuration, read from `CORE_` prefixed
/// environment variables (and an optional `.env` file).
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Name the chaincode registers under (`CORE_CHAINCODE_ID_NAME`).
    pub chaincode_id_name: String,

    /// Peer chaincode endpoint (`CORE_PEER_ADDRESS`).
    #[serde(default = "default_peer_address")]
    pub peer_address: String,

    /// Log filter used when `RUST_LOG` is unset (`CORE_CHAINCODE_LOGGING_LEVEL`).
    #[serde(default = "default_logging_level")]
    pub chaincode_logging_level: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed("CORE_").from_iter::<_, Config>(vars)?)
    }
}

fn default_peer_address() -> String {
    "127.0.0.1:7052".to_string()
}

fn default_logging_level() -> String {
    "info".to_string()
}
