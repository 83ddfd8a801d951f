use crate::blockchain::format::format_native_balance;
use crate::blockchain::network::NetworkTarget;
use crate::blockchain::wallet::{ProxyCredential, WalletIdentity};
use crate::retry::{run_with_retry, DelayRange, RetryPolicy};
use crate::rpc::{NativeBalanceClient, ProxiedRpcClient, RpcError};

const CLASSIFIED_MESSAGE_LIMIT: usize = 80;
const RESULT_MESSAGE_LIMIT: usize = 150;

/// Outcome of one (wallet, network) query. Produced once, never mutated; a
/// failed query carries a zero balance and the classified error text.
#[derive(Debug, Clone)]
pub struct BalanceResult {
    pub network: String,
    pub symbol: String,
    pub raw_balance: u128,
    pub formatted: String,
    pub address: String,
    pub error: Option<String>,
}

impl BalanceResult {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Display-unit amount, parsed back from the formatted string so report
    /// sums see exactly what the user sees.
    pub fn amount(&self) -> f64 {
        self.formatted.parse().unwrap_or(0.0)
    }
}

/// Queries one network's native balance for one wallet. Never fails out:
/// every failure mode lands in the result's `error`.
pub struct BalanceProbe;

impl BalanceProbe {
    /// Fewer attempts and a shorter delay than the generic retry default;
    /// with many networks per wallet, each one has to fail fast.
    fn retry_policy() -> RetryPolicy {
        RetryPolicy::new(2, DelayRange::Uniform(1, 2))
    }

    pub async fn probe(
        &self,
        wallet: &WalletIdentity,
        target: &NetworkTarget,
        proxy: &ProxyCredential,
    ) -> BalanceResult {
        let client = match ProxiedRpcClient::new(&target.rpc_endpoint, target.chain_id, proxy) {
            Ok(client) => client,
            Err(error) => {
                return failure_result(target, wallet.address(), &classify_error(&error));
            }
        };
        log::debug!(
            "{}: chain id {} pinned, querying via proxy",
            target.display_name,
            client.chain_id()
        );

        self.probe_with_client(&client, wallet, target).await
    }

    /// Core query against any balance client; the seam the tests use.
    pub async fn probe_with_client(
        &self,
        client: &dyn NativeBalanceClient,
        wallet: &WalletIdentity,
        target: &NetworkTarget,
    ) -> BalanceResult {
        let label = format!("Balance check on {}", target.display_name);
        let address = wallet.address();

        let outcome = run_with_retry(
            || async move {
                client
                    .fetch_native_balance(address)
                    .await
                    .map_err(|error| classify_error(&error))
            },
            &label,
            Self::retry_policy(),
        )
        .await;

        match outcome {
            Ok(raw_balance) => BalanceResult {
                network: target.display_name.clone(),
                symbol: target.native_symbol.clone(),
                raw_balance,
                formatted: format_native_balance(raw_balance),
                address: wallet.address().to_owned(),
                error: None,
            },
            Err(message) => failure_result(target, wallet.address(), &message),
        }
    }
}

/// User-facing text per error kind. Tagged kinds make this a direct mapping;
/// nothing here inspects message substrings.
fn classify_error(error: &RpcError) -> String {
    match error {
        RpcError::Timeout => "Request timeout (30s)".to_owned(),
        RpcError::ConnectionFailed(_) => "Connection failed - check proxy/RPC".to_owned(),
        RpcError::Protocol(_) => error.to_string(),
        RpcError::Http { .. } | RpcError::MalformedResponse(_) => {
            truncate(&error.to_string(), CLASSIFIED_MESSAGE_LIMIT)
        }
    }
}

fn failure_result(target: &NetworkTarget, address: &str, message: &str) -> BalanceResult {
    BalanceResult {
        network: target.display_name.clone(),
        symbol: target.native_symbol.clone(),
        raw_balance: 0,
        formatted: "0".to_owned(),
        address: address.to_owned(),
        error: Some(truncate(message, RESULT_MESSAGE_LIMIT)),
    }
}

fn truncate(message: &str, limit: usize) -> String {
    if message.chars().count() > limit {
        let cut: String = message.chars().take(limit.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        message.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    const SECRET: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn target() -> NetworkTarget {
        NetworkTarget {
            key: "ethereum".to_owned(),
            display_name: "Ethereum".to_owned(),
            chain_id: 1,
            rpc_endpoint: "https://eth.example".to_owned(),
            native_symbol: "ETH".to_owned(),
        }
    }

    fn wallet() -> WalletIdentity {
        WalletIdentity::from_secret_hex(SECRET).unwrap()
    }

    struct FixedBalance(u128);

    #[async_trait]
    impl NativeBalanceClient for FixedBalance {
        async fn fetch_native_balance(&self, _address: &str) -> Result<u128, RpcError> {
            Ok(self.0)
        }
    }

    struct AlwaysFails(fn() -> RpcError);

    #[async_trait]
    impl NativeBalanceClient for AlwaysFails {
        async fn fetch_native_balance(&self, _address: &str) -> Result<u128, RpcError> {
            Err((self.0)())
        }
    }

    #[tokio::test]
    async fn successful_probe_formats_the_balance() {
        let result = BalanceProbe
            .probe_with_client(&FixedBalance(1_500_000_000_000_000_000), &wallet(), &target())
            .await;

        assert!(!result.is_error());
        assert_eq!(result.raw_balance, 1_500_000_000_000_000_000);
        assert_eq!(result.formatted, "1.5");
        assert_eq!(result.amount(), 1.5);
        assert_eq!(result.network, "Ethereum");
        assert_eq!(result.symbol, "ETH");
        assert_eq!(result.address, "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_is_captured_never_raised() {
        let result = BalanceProbe
            .probe_with_client(&AlwaysFails(|| RpcError::Timeout), &wallet(), &target())
            .await;

        assert_eq!(result.raw_balance, 0);
        assert_eq!(result.formatted, "0");
        assert_eq!(result.amount(), 0.0);
        let error = result.error.expect("timeout should be recorded");
        assert!(error.contains("Request timeout (30s)"));
        // Address is populated even though no call succeeded.
        assert_eq!(result.address, "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    }

    #[tokio::test(start_paused = true)]
    async fn connection_failure_gets_the_proxy_hint() {
        let result = BalanceProbe
            .probe_with_client(
                &AlwaysFails(|| RpcError::ConnectionFailed("ECONNREFUSED".to_owned())),
                &wallet(),
                &target(),
            )
            .await;

        assert_eq!(
            result.error.as_deref(),
            Some("Connection failed - check proxy/RPC")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn protocol_errors_pass_through_then_cap_at_150() {
        let result = BalanceProbe
            .probe_with_client(
                &AlwaysFails(|| RpcError::Protocol("x".repeat(400))),
                &wallet(),
                &target(),
            )
            .await;

        let error = result.error.unwrap();
        assert!(error.starts_with("RPC Error: xxx"));
        assert_eq!(error.chars().count(), 150);
        assert!(error.ends_with("..."));
    }

    #[tokio::test(start_paused = true)]
    async fn http_errors_are_truncated_to_80() {
        let result = BalanceProbe
            .probe_with_client(
                &AlwaysFails(|| RpcError::Http {
                    status: 502,
                    body: "y".repeat(400),
                }),
                &wallet(),
                &target(),
            )
            .await;

        let error = result.error.unwrap();
        assert_eq!(error.chars().count(), 80);
        assert!(error.starts_with("HTTP 502:"));
        assert!(error.ends_with("..."));
    }
}
