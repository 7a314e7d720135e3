//! HTTP faucets that drip test tokens to the account once per day.

pub mod client;
pub mod collector;

pub use client::{FaucetClient, FaucetResponse, HttpFaucetClient};
pub use collector::{
    classify, format_remaining, ClaimResult, FaucetClaim, FaucetCollector, FaucetSummary,
};

use crate::tokens::Token;
use once_cell::sync::Lazy;
use std::time::Duration;

/// How a faucet's response body is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Any successful HTTP response counts as processed.
    Plain,
    /// JSON body carries a `code` field (200 claimed, 202 already claimed).
    Coded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimTag {
    General,
    Usd1,
    Ai16z,
}

impl ClaimTag {
    /// A fresh claim from these faucets needs time to settle before spending.
    pub fn is_significant(self) -> bool {
        matches!(self, ClaimTag::Usd1 | ClaimTag::Ai16z)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaucetTarget {
    pub url: &'static str,
    pub name: &'static str,
    pub token: Token,
    pub kind: ResponseKind,
    pub timeout: Duration,
    pub tag: ClaimTag,
}

impl FaucetTarget {
    fn plain(url: &'static str, name: &'static str, token: Token) -> Self {
        Self {
            url,
            name,
            token,
            kind: ResponseKind::Plain,
            timeout: Duration::from_secs(15),
            tag: ClaimTag::General,
        }
    }

    fn coded(url: &'static str, name: &'static str, token: Token, tag: ClaimTag) -> Self {
        Self {
            url,
            name,
            token,
            kind: ResponseKind::Coded,
            timeout: Duration::from_secs(20),
            tag,
        }
    }
}

/// Faucets in claim order.
pub static FAUCET_TARGETS: Lazy<Vec<FaucetTarget>> = Lazy::new(|| {
    vec![
        FaucetTarget::plain(
            "https://app.x-network.io/maitrix-faucet/faucet",
            "ATH Faucet",
            Token::Ath,
        ),
        FaucetTarget::plain(
            "https://app.x-network.io/maitrix-usde/faucet",
            "USDe Faucet",
            Token::Usde,
        ),
        FaucetTarget::plain(
            "https://app.x-network.io/maitrix-lvl/faucet",
            "LVL Faucet",
            Token::Lvlusd,
        ),
        FaucetTarget::plain(
            "https://app.x-network.io/maitrix-virtual/faucet",
            "Virtual Faucet",
            Token::Virtual,
        ),
        FaucetTarget::coded(
            "https://app.x-network.io/maitrix-usd1/faucet",
            "USD1 Faucet",
            Token::Usd1,
            ClaimTag::Usd1,
        ),
        FaucetTarget::coded(
            "https://app.x-network.io/maitrix-ai16z/faucet",
            "ai16z Faucet",
            Token::Ai16z,
            ClaimTag::Ai16z,
        ),
    ]
});
