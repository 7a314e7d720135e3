use super::FaucetTarget;
use anyhow::{Context, Result};
use async_trait::async_trait;
use core_logic::NetworkError;
use ethers::types::Address;
use ethers::utils::to_checksum;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, ORIGIN, REFERER, USER_AGENT};
use reqwest::Client;
use serde_json::{json, Value};
use std::fmt;
use tracing::warn;

const FAUCET_ORIGIN: &str = "https://app.testnet.themaitrix.ai";
const FAUCET_REFERER: &str = "https://app.testnet.themaitrix.ai/";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Raw answer of a faucet that replied with a 2xx status.
#[derive(Debug, Clone, PartialEq)]
pub struct FaucetResponse {
    pub status: u16,
    pub body: Option<Value>,
}

#[async_trait]
pub trait FaucetClient: Send + Sync {
    /// Requests a drip for `address`. Transport failures and non-2xx
    /// statuses are errors.
    async fn post_claim(&self, target: &FaucetTarget, address: Address) -> Result<FaucetResponse>;
}

#[derive(Debug, Clone)]
pub struct HttpFaucetClient {
    client: Client,
}

impl HttpFaucetClient {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ORIGIN, HeaderValue::from_static(FAUCET_ORIGIN));
        headers.insert(REFERER, HeaderValue::from_static(FAUCET_REFERER));
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build faucet HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FaucetClient for HttpFaucetClient {
    async fn post_claim(&self, target: &FaucetTarget, address: Address) -> Result<FaucetResponse> {
        let response = self
            .client
            .post(target.url)
            .timeout(target.timeout)
            .json(&json!({ "address": to_checksum(&address, None) }))
            .send()
            .await
            .map_err(|e| transport_error(target, &e))?;

        let status = response.status().as_u16();
        let body = parse_body(target, response.text().await);

        if !(200..300).contains(&status) {
            return Err(NetworkError::HttpError {
                status_code: status,
                endpoint: target.url.to_string(),
                message: error_message(status, body.as_ref()),
            }
            .into());
        }

        Ok(FaucetResponse { status, body })
    }
}

fn transport_error(target: &FaucetTarget, e: &reqwest::Error) -> NetworkError {
    if e.is_timeout() {
        NetworkError::Timeout {
            timeout_ms: target.timeout.as_millis() as u64,
            endpoint: target.url.to_string(),
        }
    } else if e.is_connect() || e.is_request() {
        NetworkError::ConnectionRefused {
            endpoint: target.url.to_string(),
            reason: "No response from server.".to_string(),
        }
    } else {
        NetworkError::InvalidResponse {
            endpoint: target.url.to_string(),
            reason: e.to_string(),
        }
    }
}

/// JSON body of a response, `None` when it is unreadable or not JSON. A failed
/// read is logged since a coded faucet then falls back to `Unclassified`.
pub(crate) fn parse_body<E: fmt::Display>(
    target: &FaucetTarget,
    text: Result<String, E>,
) -> Option<Value> {
    match text {
        Ok(text) => serde_json::from_str::<Value>(&text).ok(),
        Err(e) => {
            warn!(
                target: "workflow",
                "  [{}] Failed to read response body: {}",
                target.name,
                e
            );
            None
        }
    }
}

/// The body's `message` when present, else `Error <status>`.
pub(crate) fn error_message(status: u16, body: Option<&Value>) -> String {
    body.and_then(|b| b.get("message"))
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Error {}", status))
}
