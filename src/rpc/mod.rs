use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::blockchain::wallet::ProxyCredential;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const BODY_EXCERPT_LIMIT: usize = 200;

/// Classified JSON-RPC transport failure. Kinds are produced directly at the
/// point of failure; nothing downstream inspects message text.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Request timeout (30s)")]
    Timeout,
    #[error("Connection failed - check proxy/RPC: {0}")]
    ConnectionFailed(String),
    #[error("RPC Error: {0}")]
    Protocol(String),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Failed to parse response: {0}")]
    MalformedResponse(String),
}

fn body_excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_LIMIT).collect()
}

/// Seam for the balance probe: anything that can answer a native-balance
/// query for an address, in smallest units.
#[async_trait]
pub trait NativeBalanceClient: Send + Sync {
    async fn fetch_native_balance(&self, address: &str) -> Result<u128, RpcError>;
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// JSON-RPC 2.0 client bound to one endpoint, one expected chain id, and one
/// wallet's forward proxy. Every request traverses the proxy tunnel; there is
/// no fallback to a direct connection.
pub struct ProxiedRpcClient {
    http: reqwest::Client,
    endpoint: String,
    chain_id: u64,
}

impl ProxiedRpcClient {
    pub fn new(endpoint: &str, chain_id: u64, proxy: &ProxyCredential) -> Result<Self, RpcError> {
        let tunnel = reqwest::Proxy::all(format!("http://{}:{}", proxy.host, proxy.port))
            .map_err(transport_error)?
            .basic_auth(&proxy.username, &proxy.password);

        let http = reqwest::Client::builder()
            .proxy(tunnel)
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            http,
            endpoint: endpoint.to_owned(),
            chain_id,
        })
    }

    /// Chain id declared at construction; no auto-detection round-trip is
    /// ever issued against the endpoint.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Issues one JSON-RPC call and returns its `result` member. The 30s
    /// deadline races the in-flight request; whichever side resolves first
    /// wins and the loser is dropped with it.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let in_flight = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&request)
            .send();

        let response = tokio::time::timeout(REQUEST_TIMEOUT, in_flight)
            .await
            .map_err(|_| RpcError::Timeout)?
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = tokio::time::timeout(REQUEST_TIMEOUT, response.text())
            .await
            .map_err(|_| RpcError::Timeout)?
            .map_err(transport_error)?;

        interpret_response(status, &body)
    }
}

/// Classifies a received status/body pair into the JSON-RPC `result` member
/// or a tagged failure.
fn interpret_response(status: u16, body: &str) -> Result<Value, RpcError> {
    let success = (200..300).contains(&status);

    let parsed: JsonRpcResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(parse_error) => {
            // A broken body on a failed status is reported as the HTTP
            // failure; the excerpt is more useful than the parse error.
            if !success {
                return Err(RpcError::Http {
                    status,
                    body: body_excerpt(body),
                });
            }
            return Err(RpcError::MalformedResponse(format!(
                "{} (body: {})",
                parse_error,
                body_excerpt(body)
            )));
        }
    };

    if !success {
        return Err(RpcError::Http {
            status,
            body: body_excerpt(body),
        });
    }

    if let Some(error) = parsed.error {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| error.to_string());
        return Err(RpcError::Protocol(message));
    }

    parsed
        .result
        .ok_or_else(|| RpcError::MalformedResponse("missing result member".to_owned()))
}

/// Maps reqwest transport failures onto the tagged kinds. reqwest reports its
/// own timeouts too (e.g. proxy CONNECT stalls under our outer deadline), so
/// those keep the Timeout kind instead of the generic connection hint.
fn transport_error(error: reqwest::Error) -> RpcError {
    if error.is_timeout() {
        RpcError::Timeout
    } else {
        RpcError::ConnectionFailed(error.to_string())
    }
}

fn parse_hex_quantity(value: &Value) -> Result<u128, RpcError> {
    let text = value
        .as_str()
        .ok_or_else(|| RpcError::MalformedResponse(format!("non-string quantity: {}", value)))?;
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u128::from_str_radix(digits, 16)
        .map_err(|_| RpcError::MalformedResponse(format!("invalid hex quantity: {}", text)))
}

#[async_trait]
impl NativeBalanceClient for ProxiedRpcClient {
    async fn fetch_native_balance(&self, address: &str) -> Result<u128, RpcError> {
        let result = self.call("eth_getBalance", json!([address, "latest"])).await?;
        parse_hex_quantity(&result)
    }
}
