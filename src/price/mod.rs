use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

/// Symbol → CoinGecko id for every native asset in the defaults table.
/// Symbols without an entry are omitted from lookups and priced at zero.
const COINGECKO_IDS: &[(&str, &str)] = &[
    ("ETH", "ethereum"),
    ("BNB", "binancecoin"),
    ("MATIC", "matic-network"),
    ("AVAX", "avalanche-2"),
    ("FTM", "fantom"),
    ("CELO", "celo"),
    ("xDAI", "dai"),
    ("MNT", "mantle"),
    ("GLMR", "moonbeam"),
    ("MOVR", "moonriver"),
    ("CRO", "crypto-com-chain"),
    ("FUSE", "fuse-network-token"),
    ("EVMOS", "evmos"),
    ("KAVA", "kava"),
    ("CANTO", "canto"),
    ("USDC", "usd-coin"),
    ("BTC", "bitcoin"),
    ("BTR", "bitlayer"),
    ("METIS", "metis-token"),
];

/// Batch USD price resolution. Never fails: a broken or partial lookup
/// degrades to missing entries, and balance reporting proceeds without them.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    async fn resolve_prices(&self, symbols: &[String]) -> HashMap<String, f64>;
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    usd: Option<f64>,
}

pub struct CoinGeckoApi;

impl CoinGeckoApi {
    fn id_for_symbol(symbol: &str) -> Option<&'static str> {
        COINGECKO_IDS
            .iter()
            .find(|(known, _)| *known == symbol)
            .map(|(_, id)| *id)
    }

    async fn fetch_prices_by_id(&self, ids: &[&str]) -> Option<HashMap<String, PriceResponse>> {
        let url = format!(
            "https://api.coingecko.com/api/v3/simple/price?ids={}&vs_currencies=usd",
            ids.join(",")
        );

        let response = match reqwest::get(&url).await {
            Ok(response) => response,
            Err(error) => {
                log::warn!("Error fetching prices: {}", error);
                return None;
            }
        };

        if !response.status().is_success() {
            log::warn!(
                "Failed to fetch prices from CoinGecko (HTTP {})",
                response.status().as_u16()
            );
            return None;
        }

        match response.json().await {
            Ok(prices) => Some(prices),
            Err(error) => {
                log::warn!("Error decoding price response: {}", error);
                None
            }
        }
    }
}

#[async_trait]
impl PriceOracle for CoinGeckoApi {
    async fn resolve_prices(&self, symbols: &[String]) -> HashMap<String, f64> {
        let mut ids: Vec<&str> = Vec::new();
        for symbol in symbols {
            if let Some(id) = Self::id_for_symbol(symbol) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }

        if ids.is_empty() {
            return HashMap::new();
        }

        let by_id = match self.fetch_prices_by_id(&ids).await {
            Some(by_id) => by_id,
            None => return HashMap::new(),
        };

        let mut prices = HashMap::new();
        for (symbol, id) in COINGECKO_IDS {
            if let Some(usd) = by_id.get(*id).and_then(|entry| entry.usd) {
                prices.insert((*symbol).to_owned(), usd);
            }
        }
        prices
    }
}
