pub use crate::blockchain::network::{NetworkRegistry, NetworkTarget};
pub use crate::blockchain::wallet::{ProxyCredential, WalletIdentity, WalletProxyRecord};
pub use crate::config::app_config::AppConfig;
pub use crate::price::{CoinGeckoApi, PriceOracle};
pub use crate::report::{AggregateTotals, WalletReport};
pub use crate::routines::balance_check::BalanceCheckRoutine;
pub use crate::routines::routine::{Routine, RoutineError};
pub use crate::scan::probe::{BalanceProbe, BalanceResult};
pub use crate::scan::scanner::WalletScanner;
