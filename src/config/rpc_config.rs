use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

/// Raw custom-network descriptor as it appears in the config file. Fields
/// stay optional here; the registry validates and reports what is missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomNetworkEntry {
    pub key: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "chainId")]
    pub chain_id: Option<u64>,
    pub rpc: Option<String>,
    pub symbol: Option<String>,
}

/// Network source for a run: key→RPC-URL entries plus fully custom
/// descriptors. Loaded once, then handed to the registry builder.
#[derive(Debug, Default)]
pub struct RpcConfig {
    pub endpoints: HashMap<String, String>,
    pub custom_networks: Vec<CustomNetworkEntry>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawRpcConfig {
    custom_networks: Vec<CustomNetworkEntry>,
    #[serde(flatten)]
    entries: HashMap<String, Value>,
}

impl RpcConfig {
    /// Reads the rpc-config JSON file. A missing or unparseable file is not
    /// fatal: the run proceeds with an empty network source.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => {
                log::warn!(
                    "RPC config file {} not found, using defaults",
                    path.display()
                );
                return Self::default();
            }
        };

        match serde_json::from_str::<RawRpcConfig>(&content) {
            Ok(raw) => Self::from_raw(raw),
            Err(error) => {
                log::warn!("Error loading RPC config: {}, using defaults", error);
                Self::default()
            }
        }
    }

    fn from_raw(raw: RawRpcConfig) -> Self {
        // Only plain string values are endpoint URLs; anything else at the
        // top level is ignored.
        let endpoints = raw
            .entries
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(url) => Some((key, url)),
                _ => None,
            })
            .collect();

        Self {
            endpoints,
            custom_networks: raw.custom_networks,
        }
    }
}
