use std::path::Path;
use std::time::Duration;

use error_stack::ResultExt;

use super::routine::{Routine, RoutineError};
use crate::blockchain::network::NetworkRegistry;
use crate::blockchain::wallet::WalletProxyRecord;
use crate::config::app_config::AppConfig;
use crate::config::credentials::load_wallet_proxy_records;
use crate::config::rpc_config::RpcConfig;
use crate::price::PriceOracle;
use crate::report::{observed_symbols, print_final_summary, print_wallet_report, AggregateTotals, WalletReport};
use crate::retry::DelayRange;
use crate::scan::scanner::WalletScanner;

/// Pacing between wallets, sampled per gap so wallet scans don't start on a
/// fixed cadence.
const INTER_WALLET_DELAY: DelayRange = DelayRange::Uniform(5, 10);

/// Scans every wallet across every configured network through its own proxy,
/// then prices and aggregates the results.
pub struct BalanceCheckRoutine<'a> {
    config: &'a AppConfig,
    oracle: &'a dyn PriceOracle,
}

impl<'a> BalanceCheckRoutine<'a> {
    pub fn new(config: &'a AppConfig, oracle: &'a dyn PriceOracle) -> Self {
        Self { config, oracle }
    }

    fn load_wallets(&self) -> error_stack::Result<Vec<WalletProxyRecord>, RoutineError> {
        let records = load_wallet_proxy_records(Path::new(&self.config.wallet_proxy_file))
            .change_context(RoutineError::NoWallets)?;
        log::info!("Loaded {} wallet(s)", records.len());
        Ok(records)
    }

    fn build_registry(&self) -> NetworkRegistry {
        let rpc_config = RpcConfig::load(Path::new(&self.config.rpc_config_file));
        let registry = NetworkRegistry::build(&rpc_config);
        log::info!("{} network(s) configured for checking", registry.len());
        registry
    }

    async fn scan_wallets(
        &self,
        records: &[WalletProxyRecord],
        registry: &NetworkRegistry,
    ) -> Vec<WalletReport> {
        let scanner = WalletScanner::new(registry);
        let mut reports = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            log::info!(
                "Checking wallet {}/{}: {}",
                index + 1,
                records.len(),
                record.wallet.address()
            );

            let results = scanner.scan_all(&record.wallet, &record.proxy).await;
            reports.push(WalletReport::from_results(
                record.wallet.address().to_owned(),
                record.proxy.descriptor(),
                results,
            ));

            if index + 1 < records.len() {
                let delay = INTER_WALLET_DELAY.sample();
                log::info!("Waiting {}s before next wallet...", delay);
                tokio::time::sleep(Duration::from_secs(delay)).await;
            }
        }

        reports
    }
}

#[async_trait::async_trait]
impl Routine for BalanceCheckRoutine<'_> {
    fn name(&self) -> &str {
        "BalanceCheckRoutine"
    }

    async fn run(&self) -> error_stack::Result<(), RoutineError> {
        log::info!("Starting balance check for all wallets");

        let records = self.load_wallets()?;
        let registry = self.build_registry();

        let reports = self.scan_wallets(&records, &registry).await;

        log::info!("Fetching token prices...");
        let symbols = observed_symbols(&reports);
        let prices = self.oracle.resolve_prices(&symbols).await;

        let mut totals = AggregateTotals::default();
        for report in &reports {
            totals.add_wallet(report);
        }

        for (index, report) in reports.iter().enumerate() {
            print_wallet_report(index, reports.len(), report, &prices);
        }
        print_final_summary(&reports, &totals, &prices);

        log::info!("Balance check completed");
        Ok(())
    }
}
