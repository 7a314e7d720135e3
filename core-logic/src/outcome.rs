//! Terminal result of one workflow step.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Confirmed on chain with a success status.
    Success { tx_hash: String },
    /// Not attempted because a precondition (balance, earlier step) failed.
    Skipped { reason: String },
    /// Attempted and failed: approval, estimation-independent submit, revert.
    Failed { reason: String },
}

impl StepOutcome {
    pub fn success(tx_hash: impl Into<String>) -> Self {
        StepOutcome::Success {
            tx_hash: tx_hash.into(),
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        StepOutcome::Skipped {
            reason: reason.into(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        StepOutcome::Failed {
            reason: reason.into(),
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, StepOutcome::Success { .. })
    }

    pub fn tx_hash(&self) -> Option<&str> {
        match self {
            StepOutcome::Success { tx_hash } => Some(tx_hash),
            _ => None,
        }
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Success { tx_hash } => write!(f, "SUCCESS (Tx: {})", tx_hash),
            StepOutcome::Skipped { reason } => write!(f, "SKIPPED: {}", reason),
            StepOutcome::Failed { reason } => write!(f, "FAILED: {}", reason),
        }
    }
}
