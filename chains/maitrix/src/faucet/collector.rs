use super::client::{FaucetClient, FaucetResponse};
use super::{FaucetTarget, ResponseKind, FAUCET_TARGETS};
use core_logic::summarize_error;
use ethers::types::Address;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// What a faucet said about one claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimResult {
    Claimed { tx_hash: Option<String> },
    AlreadyClaimed { remaining_secs: u64 },
    Rejected { message: String },
    /// Successful HTTP response without a claim code.
    Unclassified { status: u16 },
}

impl ClaimResult {
    pub fn is_processed(&self) -> bool {
        !matches!(self, ClaimResult::Rejected { .. })
    }
}

impl fmt::Display for ClaimResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimResult::Claimed { tx_hash: Some(hash) } => {
                write!(f, "Claimed! (Tx: ...{})", hash_tail(hash, 6))
            }
            ClaimResult::Claimed { tx_hash: None } => f.write_str("Claimed!"),
            ClaimResult::AlreadyClaimed { remaining_secs } => write!(
                f,
                "Already claimed. Retry in {}.",
                format_remaining(*remaining_secs)
            ),
            ClaimResult::Rejected { message } => write!(f, "Failed: {}.", message),
            ClaimResult::Unclassified { status } => {
                write!(f, "Claim request sent (Status: {}).", status)
            }
        }
    }
}

/// Reads a faucet response according to the target's kind.
pub fn classify(kind: ResponseKind, response: &FaucetResponse) -> ClaimResult {
    let unclassified = ClaimResult::Unclassified {
        status: response.status,
    };
    if kind == ResponseKind::Plain {
        return unclassified;
    }

    let Some(body) = response.body.as_ref() else {
        return unclassified;
    };
    let Some(code) = body.get("code").and_then(as_integer) else {
        return unclassified;
    };
    let data = body.get("data");

    match code {
        200 => ClaimResult::Claimed {
            tx_hash: data
                .and_then(|d| d.get("txHash"))
                .and_then(Value::as_str)
                .map(str::to_string),
        },
        202 => ClaimResult::AlreadyClaimed {
            remaining_secs: data
                .and_then(|d| d.get("remainTime"))
                .and_then(as_integer)
                .map(|secs| secs.max(0) as u64)
                .unwrap_or(0),
        },
        _ => ClaimResult::Rejected {
            message: body
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or("Unknown status")
                .to_string(),
        },
    }
}

// Faucets send numbers either as JSON numbers or as numeric strings
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

/// `3661` -> `1h 1m`.
pub fn format_remaining(secs: u64) -> String {
    format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
}

fn hash_tail(hash: &str, n: usize) -> &str {
    hash.char_indices()
        .rev()
        .nth(n.saturating_sub(1))
        .map(|(i, _)| &hash[i..])
        .unwrap_or(hash)
}

/// One target's result; `Err` carries the summarised transport or HTTP error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaucetClaim {
    pub target: FaucetTarget,
    pub result: Result<ClaimResult, String>,
}

impl FaucetClaim {
    pub fn is_processed(&self) -> bool {
        matches!(&self.result, Ok(result) if result.is_processed())
    }

    pub fn is_significant(&self) -> bool {
        self.target.tag.is_significant()
            && matches!(self.result, Ok(ClaimResult::Claimed { .. }))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaucetSummary {
    pub processed: usize,
    pub total: usize,
    /// A usd1 or ai16z faucet paid out this round.
    pub significant: bool,
    pub claims: Vec<FaucetClaim>,
}

/// Visits every faucet once, in order, never stopping on a failure.
pub struct FaucetCollector {
    client: Arc<dyn FaucetClient>,
    targets: Vec<FaucetTarget>,
    spacing: Duration,
}

impl FaucetCollector {
    pub fn new(client: Arc<dyn FaucetClient>) -> Self {
        Self {
            client,
            targets: FAUCET_TARGETS.clone(),
            spacing: Duration::from_secs(2),
        }
    }

    pub fn with_targets(mut self, targets: Vec<FaucetTarget>) -> Self {
        self.targets = targets;
        self
    }

    /// Pause after every target, whatever its outcome.
    pub fn with_spacing(mut self, spacing: Duration) -> Self {
        self.spacing = spacing;
        self
    }

    pub async fn claim_all(&self, address: Address) -> FaucetSummary {
        info!(target: "workflow", "--- Claiming Faucets ---");
        let mut summary = FaucetSummary {
            total: self.targets.len(),
            ..Default::default()
        };

        for target in &self.targets {
            let result = match self.client.post_claim(target, address).await {
                Ok(response) => Ok(classify(target.kind, &response)),
                Err(e) => Err(summarize_error(&e, 60)),
            };

            match &result {
                Ok(claim @ ClaimResult::Rejected { .. }) => {
                    warn!(target: "workflow", "  [{}] {}", target.name, claim)
                }
                Ok(claim) => info!(target: "workflow", "  [{}] {}", target.name, claim),
                Err(reason) => error!(target: "workflow", "  [{}] Error: {}", target.name, reason),
            }

            let claim = FaucetClaim {
                target: target.clone(),
                result,
            };
            if claim.is_processed() {
                summary.processed += 1;
            }
            summary.significant |= claim.is_significant();
            summary.claims.push(claim);

            if !self.spacing.is_zero() {
                tokio::time::sleep(self.spacing).await;
            }
        }

        info!(
            target: "workflow",
            "--- Finished Faucet Claims ({}/{} processed) ---",
            summary.processed,
            summary.total
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coded(body: Value) -> ClaimResult {
        classify(
            ResponseKind::Coded,
            &FaucetResponse {
                status: 200,
                body: Some(body),
            },
        )
    }

    #[test]
    fn test_plain_ignores_body() {
        let response = FaucetResponse {
            status: 201,
            body: Some(json!({ "code": 500 })),
        };
        assert_eq!(
            classify(ResponseKind::Plain, &response),
            ClaimResult::Unclassified { status: 201 }
        );
    }

    #[test]
    fn test_coded_responses() {
        assert_eq!(
            coded(json!({ "code": 200, "data": { "txHash": "0xabc123def456" } })),
            ClaimResult::Claimed {
                tx_hash: Some("0xabc123def456".into())
            }
        );
        assert_eq!(
            coded(json!({ "code": 202, "data": { "remainTime": "3661" } })),
            ClaimResult::AlreadyClaimed {
                remaining_secs: 3661
            }
        );
        assert_eq!(
            coded(json!({ "code": 400, "message": "bad address" })),
            ClaimResult::Rejected {
                message: "bad address".into()
            }
        );
        assert_eq!(
            coded(json!({ "code": 500 })),
            ClaimResult::Rejected {
                message: "Unknown status".into()
            }
        );
        assert_eq!(
            coded(json!({ "ok": true })),
            ClaimResult::Unclassified { status: 200 }
        );
    }

    #[test]
    fn test_rendering() {
        assert_eq!(format_remaining(3661), "1h 1m");
        assert_eq!(format_remaining(59), "0h 0m");
        assert_eq!(
            ClaimResult::AlreadyClaimed {
                remaining_secs: 3661
            }
            .to_string(),
            "Already claimed. Retry in 1h 1m."
        );
        assert_eq!(
            ClaimResult::Claimed {
                tx_hash: Some("0xabc123def456".into())
            }
            .to_string(),
            "Claimed! (Tx: ...def456)"
        );
        assert_eq!(hash_tail("0x1", 6), "0x1");
    }
}
