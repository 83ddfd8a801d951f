use std::time::Duration;

use crate::blockchain::network::NetworkRegistry;
use crate::blockchain::wallet::{ProxyCredential, WalletIdentity};
use crate::scan::probe::{BalanceProbe, BalanceResult};

/// Pause between networks so a wallet's proxy never sees a request burst.
const INTER_NETWORK_PAUSE: Duration = Duration::from_millis(200);

/// Drives the probe across every registered network for one wallet,
/// sequentially and in registry order; results keep that order.
pub struct WalletScanner<'r> {
    registry: &'r NetworkRegistry,
    probe: BalanceProbe,
}

impl<'r> WalletScanner<'r> {
    pub fn new(registry: &'r NetworkRegistry) -> Self {
        Self {
            registry,
            probe: BalanceProbe,
        }
    }

    pub async fn scan_all(
        &self,
        wallet: &WalletIdentity,
        proxy: &ProxyCredential,
    ) -> Vec<BalanceResult> {
        let targets = self.registry.targets();
        if targets.is_empty() {
            log::warn!("No networks configured; add RPC endpoints to check balances");
            return Vec::new();
        }

        log::info!("Checking balances in {} network(s)", targets.len());

        let mut results = Vec::with_capacity(targets.len());
        for (index, target) in targets.iter().enumerate() {
            log::info!(
                "[{}/{}] {}...",
                index + 1,
                targets.len(),
                target.display_name
            );

            results.push(self.probe.probe(wallet, target, proxy).await);

            if index + 1 < targets.len() {
                tokio::time::sleep(INTER_NETWORK_PAUSE).await;
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::rpc_config::RpcConfig;

    #[tokio::test]
    async fn empty_registry_returns_empty_without_raising() {
        let registry = NetworkRegistry::build(&RpcConfig::default());
        let scanner = WalletScanner::new(&registry);

        let wallet = WalletIdentity::from_secret_hex(
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        )
        .unwrap();
        let proxy = ProxyCredential {
            host: "10.0.0.1".to_owned(),
            port: 8080,
            username: "alice".to_owned(),
            password: "pw".to_owned(),
        };

        let results = scanner.scan_all(&wallet, &proxy).await;
        assert!(results.is_empty());
    }
}
