use crate::config::rpc_config::{CustomNetworkEntry, RpcConfig};

/// One chain to query: endpoint plus the identity pinned for every call.
/// Immutable once the registry is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkTarget {
    pub key: String,
    pub display_name: String,
    pub chain_id: u64,
    pub rpc_endpoint: String,
    pub native_symbol: String,
}

struct NetworkDefaults {
    key: &'static str,
    name: &'static str,
    chain_id: u64,
    symbol: &'static str,
}

/// Built-in (displayName, chainId, nativeSymbol) defaults. Only keys that
/// also appear in the RPC endpoint mapping are checked.
const EVM_NETWORK_DEFAULTS: &[NetworkDefaults] = &[
    NetworkDefaults { key: "ethereum", name: "Ethereum", chain_id: 1, symbol: "ETH" },
    NetworkDefaults { key: "bsc", name: "BSC", chain_id: 56, symbol: "BNB" },
    NetworkDefaults { key: "polygon", name: "Polygon", chain_id: 137, symbol: "MATIC" },
    NetworkDefaults { key: "arbitrum", name: "Arbitrum", chain_id: 42161, symbol: "ETH" },
    NetworkDefaults { key: "optimism", name: "Optimism", chain_id: 10, symbol: "ETH" },
    NetworkDefaults { key: "avalanche", name: "Avalanche", chain_id: 43114, symbol: "AVAX" },
    NetworkDefaults { key: "base", name: "Base", chain_id: 8453, symbol: "ETH" },
    NetworkDefaults { key: "linea", name: "Linea", chain_id: 59144, symbol: "ETH" },
    NetworkDefaults { key: "zksync", name: "zkSync Era", chain_id: 324, symbol: "ETH" },
    NetworkDefaults { key: "scroll", name: "Scroll", chain_id: 534352, symbol: "ETH" },
    NetworkDefaults { key: "fantom", name: "Fantom", chain_id: 250, symbol: "FTM" },
    NetworkDefaults { key: "celo", name: "Celo", chain_id: 42220, symbol: "CELO" },
    NetworkDefaults { key: "gnosis", name: "Gnosis", chain_id: 100, symbol: "xDAI" },
    NetworkDefaults { key: "mantle", name: "Mantle", chain_id: 5000, symbol: "MNT" },
    NetworkDefaults { key: "blast", name: "Blast", chain_id: 81457, symbol: "ETH" },
    NetworkDefaults { key: "zora", name: "Zora", chain_id: 7777777, symbol: "ETH" },
    NetworkDefaults { key: "mode", name: "Mode", chain_id: 34443, symbol: "ETH" },
    NetworkDefaults { key: "opbnb", name: "opBNB", chain_id: 204, symbol: "BNB" },
    NetworkDefaults { key: "manta", name: "Manta", chain_id: 169, symbol: "ETH" },
    NetworkDefaults { key: "metis", name: "Metis", chain_id: 1088, symbol: "METIS" },
    NetworkDefaults { key: "moonbeam", name: "Moonbeam", chain_id: 1284, symbol: "GLMR" },
    NetworkDefaults { key: "moonriver", name: "Moonriver", chain_id: 1285, symbol: "MOVR" },
    NetworkDefaults { key: "cronos", name: "Cronos", chain_id: 25, symbol: "CRO" },
    NetworkDefaults { key: "boba", name: "Boba", chain_id: 288, symbol: "ETH" },
    NetworkDefaults { key: "aurora", name: "Aurora", chain_id: 1313161554, symbol: "ETH" },
    NetworkDefaults { key: "fuse", name: "Fuse", chain_id: 122, symbol: "FUSE" },
    NetworkDefaults { key: "evmos", name: "Evmos", chain_id: 9001, symbol: "EVMOS" },
    NetworkDefaults { key: "kava", name: "Kava", chain_id: 2222, symbol: "KAVA" },
    NetworkDefaults { key: "canto", name: "Canto", chain_id: 7700, symbol: "CANTO" },
    NetworkDefaults { key: "zkfair", name: "zkFair", chain_id: 42766, symbol: "USDC" },
    NetworkDefaults { key: "merlin", name: "Merlin", chain_id: 4200, symbol: "BTC" },
    NetworkDefaults { key: "btr", name: "BTR", chain_id: 200901, symbol: "BTR" },
];

/// Ordered, read-only set of networks for a run. An empty registry is a
/// valid state meaning "nothing to check".
#[derive(Debug, Default)]
pub struct NetworkRegistry {
    targets: Vec<NetworkTarget>,
}

impl NetworkRegistry {
    /// Builds the registry from the RPC endpoint mapping (matched against the
    /// defaults table; keys without a default are dropped) followed by custom
    /// entries (validated; invalid ones skipped with a diagnostic). A custom
    /// entry sharing a key with an earlier target overrides it in place.
    pub fn build(config: &RpcConfig) -> Self {
        let mut targets = Vec::new();

        for defaults in EVM_NETWORK_DEFAULTS {
            if let Some(rpc_url) = config.endpoints.get(defaults.key) {
                targets.push(NetworkTarget {
                    key: defaults.key.to_owned(),
                    display_name: defaults.name.to_owned(),
                    chain_id: defaults.chain_id,
                    rpc_endpoint: rpc_url.clone(),
                    native_symbol: defaults.symbol.to_owned(),
                });
            }
        }

        let mut custom_count = 0usize;
        for entry in &config.custom_networks {
            match validate_custom_entry(entry) {
                Ok(target) => {
                    custom_count += 1;
                    match targets.iter_mut().find(|existing| existing.key == target.key) {
                        Some(existing) => *existing = target,
                        None => targets.push(target),
                    }
                }
                Err(reason) => {
                    log::warn!("Skipping custom network entry: {}", reason);
                }
            }
        }
        if custom_count > 0 {
            log::info!("Loaded {} custom network(s)", custom_count);
        }

        Self { targets }
    }

    pub fn targets(&self) -> &[NetworkTarget] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&NetworkTarget> {
        self.targets.iter().find(|target| target.key == key)
    }
}

fn validate_custom_entry(entry: &CustomNetworkEntry) -> Result<NetworkTarget, String> {
    let key = non_empty(&entry.key, "key")?;
    let name = non_empty(&entry.name, "name")?;
    let rpc = non_empty(&entry.rpc, "rpc")?;
    let symbol = non_empty(&entry.symbol, "symbol")?;
    let chain_id = entry
        .chain_id
        .ok_or_else(|| "missing required field chainId".to_owned())?;

    if !rpc.starts_with("https://") {
        return Err(format!("\"{}\": RPC must use https:// (got: {})", name, rpc));
    }

    Ok(NetworkTarget {
        key: key.to_owned(),
        display_name: name.to_owned(),
        chain_id,
        rpc_endpoint: rpc.to_owned(),
        native_symbol: symbol.to_owned(),
    })
}

fn non_empty<'e>(field: &'e Option<String>, field_name: &str) -> Result<&'e str, String> {
    match field.as_deref() {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(format!("missing required field {}", field_name)),
    }
}
