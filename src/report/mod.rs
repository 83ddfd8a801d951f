use std::collections::HashMap;

use crate::scan::probe::BalanceResult;

const REPORT_ERROR_LIMIT: usize = 50;

/// Everything known about one wallet after its scan: the raw per-network
/// results plus the per-symbol sums of successful nonzero balances.
#[derive(Debug)]
pub struct WalletReport {
    pub address: String,
    pub proxy_descriptor: String,
    pub results: Vec<BalanceResult>,
    pub balances_by_symbol: HashMap<String, f64>,
}

impl WalletReport {
    pub fn from_results(
        address: String,
        proxy_descriptor: String,
        results: Vec<BalanceResult>,
    ) -> Self {
        let mut balances_by_symbol: HashMap<String, f64> = HashMap::new();
        for result in &results {
            if result.is_error() {
                continue;
            }
            let amount = result.amount();
            if amount > 0.0 {
                *balances_by_symbol.entry(result.symbol.clone()).or_default() += amount;
            }
        }

        Self {
            address,
            proxy_descriptor,
            results,
            balances_by_symbol,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &BalanceResult> {
        self.results.iter().filter(|result| result.is_error())
    }

    pub fn nonzero_balances(&self) -> impl Iterator<Item = &BalanceResult> {
        self.results
            .iter()
            .filter(|result| !result.is_error() && result.amount() > 0.0)
    }

    /// Σ balance × price over the wallet's symbols; a missing price
    /// contributes zero.
    pub fn usd_total(&self, prices: &HashMap<String, f64>) -> f64 {
        self.balances_by_symbol
            .iter()
            .map(|(symbol, amount)| amount * prices.get(symbol).copied().unwrap_or(0.0))
            .sum()
    }

    /// A wallet counts as "with balance" iff its USD total is positive.
    pub fn has_balance(&self, prices: &HashMap<String, f64>) -> bool {
        self.usd_total(prices) > 0.0
    }
}

/// Per-symbol sums across all wallets. Derived per run, appended to only
/// after each wallet's scan fully completes.
#[derive(Debug, Default)]
pub struct AggregateTotals {
    totals: HashMap<String, f64>,
}

impl AggregateTotals {
    pub fn add_wallet(&mut self, report: &WalletReport) {
        for (symbol, amount) in &report.balances_by_symbol {
            *self.totals.entry(symbol.clone()).or_default() += amount;
        }
    }

    pub fn totals(&self) -> &HashMap<String, f64> {
        &self.totals
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Symbols in sorted order for deterministic rendering.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.totals.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }

    pub fn grand_total_usd(&self, prices: &HashMap<String, f64>) -> f64 {
        self.totals
            .iter()
            .map(|(symbol, amount)| amount * prices.get(symbol).copied().unwrap_or(0.0))
            .sum()
    }
}

/// Union of symbols seen across wallets, deduplicated and sorted; the one
/// price-oracle query per run uses exactly this set.
pub fn observed_symbols(reports: &[WalletReport]) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for report in reports {
        for symbol in report.balances_by_symbol.keys() {
            if !symbols.contains(symbol) {
                symbols.push(symbol.clone());
            }
        }
    }
    symbols.sort_unstable();
    symbols
}

/// Report rendering below is presentation over the structured entities; the
/// entities themselves are the contract.
pub fn print_wallet_report(
    index: usize,
    wallet_count: usize,
    report: &WalletReport,
    prices: &HashMap<String, f64>,
) {
    println!("{}", "═".repeat(80));
    println!("Wallet {}/{}", index + 1, wallet_count);
    println!("{}", "═".repeat(80));
    println!("Address: {}", report.address);
    println!("Proxy: {}", report.proxy_descriptor);
    println!("{}", "─".repeat(80));

    let nonzero: Vec<&BalanceResult> = report.nonzero_balances().collect();
    if nonzero.is_empty() {
        println!("\n   No balances found in any network");
    } else {
        println!("\nBalances by Network:");
        for result in nonzero {
            let usd_value = prices
                .get(&result.symbol)
                .map(|price| result.amount() * price)
                .unwrap_or(0.0);
            let usd_str = if usd_value > 0.0 {
                format!(" (${:.2})", usd_value)
            } else {
                String::new()
            };
            println!(
                "   {:<20} | {:>15} {:<8}{}",
                result.network, result.formatted, result.symbol, usd_str
            );
        }
    }

    let errors: Vec<&BalanceResult> = report.errors().collect();
    if !errors.is_empty() {
        println!("\nNetworks with errors ({}):", errors.len());
        for result in &errors {
            let message = result.error.as_deref().unwrap_or("unknown error");
            println!(
                "   {:<20} | {}",
                result.network,
                truncate(message, REPORT_ERROR_LIMIT)
            );
        }
    }

    let wallet_total = report.usd_total(prices);
    if wallet_total > 0.0 {
        println!("\n   Total Wallet Balance: ${:.2}", wallet_total);
    }
    println!();
}

pub fn print_final_summary(
    reports: &[WalletReport],
    totals: &AggregateTotals,
    prices: &HashMap<String, f64>,
) {
    let wallets_with_balance = reports
        .iter()
        .filter(|report| report.has_balance(prices))
        .count();

    println!("{}", "=".repeat(80));
    println!("FINAL SUMMARY");
    println!("{}", "=".repeat(80));
    println!("Total wallets checked: {}", reports.len());
    println!("Wallets with balance: {}", wallets_with_balance);

    if !totals.is_empty() {
        println!("\nTotal Balances Across All Wallets:");
        for symbol in totals.symbols() {
            let amount = totals.totals()[symbol];
            let usd_value = amount * prices.get(symbol).copied().unwrap_or(0.0);
            let usd_str = if usd_value > 0.0 {
                format!(" (${:.2})", usd_value)
            } else {
                String::new()
            };
            println!("   {:<10} | {:>15.8}{}", symbol, amount, usd_str);
        }

        println!(
            "\nGrand Total (All Wallets): ${:.2}",
            totals.grand_total_usd(prices)
        );
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
