//! Static token and contract tables for the Maitrix testnet deployment on
//! Arbitrum Sepolia.

use anyhow::{anyhow, Result};
use ethers::types::{Address, Bytes, U256};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::fmt;

pub const CHAIN_ID: u64 = 421614;
pub const EXPLORER_TX_URL: &str = "https://sepolia.arbiscan.io/tx/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Token {
    Ath,
    Ausd,
    Usde,
    Lvlusd,
    Virtual,
    Vusd,
    Usd1,
    Ai16z,
    Azusd,
}

/// Symbol, address and configured decimals of one ERC-20.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDescriptor {
    pub token: Token,
    pub symbol: &'static str,
    pub address: Address,
    pub decimals: u8,
}

impl Token {
    pub const ALL: [Token; 9] = [
        Token::Ath,
        Token::Ausd,
        Token::Usde,
        Token::Lvlusd,
        Token::Virtual,
        Token::Vusd,
        Token::Usd1,
        Token::Ai16z,
        Token::Azusd,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Token::Ath => "ATH",
            Token::Ausd => "AUSD",
            Token::Usde => "USDe",
            Token::Lvlusd => "LVLUSD",
            Token::Virtual => "VIRTUAL",
            Token::Vusd => "VUSD",
            Token::Usd1 => "USD1",
            Token::Ai16z => "AI16Z",
            Token::Azusd => "AZUSD",
        }
    }

    fn raw(self) -> (&'static str, u8) {
        match self {
            Token::Ath => ("0x1428444Eacdc0Fd115dd4318FcE65B61Cd1ef399", 18),
            Token::Ausd => ("0x78De28aABBD5198657B26A8dc9777f441551B477", 18),
            Token::Usde => ("0xf4BE938070f59764C85fAcE374F92A4670ff3877", 18),
            Token::Lvlusd => ("0x8802b7bcF8EedCc9E1bA6C20E139bEe89dd98E83", 18),
            Token::Virtual => ("0xFF27D611ab162d7827bbbA59F140C1E7aE56e95C", 9),
            Token::Vusd => ("0xc14A8E2Fc341A97a57524000bF0F7F1bA4de4802", 9),
            Token::Usd1 => ("0x16a8A3624465224198d216b33E825BcC3B80abf7", 18),
            Token::Ai16z => ("0x2d5a4f5634041f50180A25F26b2A8364452E3152", 9),
            Token::Azusd => ("0x5966cd11aED7D68705C9692e74e5688C892cb162", 9),
        }
    }

    pub fn descriptor(self) -> &'static TokenDescriptor {
        &TOKEN_TABLE[self as usize]
    }

    pub fn address(self) -> Address {
        self.descriptor().address
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

fn static_address(raw: &str) -> Address {
    raw.parse()
        .unwrap_or_else(|_| panic!("invalid address in static table: {}", raw))
}

static TOKEN_TABLE: Lazy<Vec<TokenDescriptor>> = Lazy::new(|| {
    Token::ALL
        .iter()
        .map(|&token| {
            let (address, decimals) = token.raw();
            TokenDescriptor {
                token,
                symbol: token.symbol(),
                address: static_address(address),
                decimals,
            }
        })
        .collect()
});

pub const MINT_AUSD: &str = "mintAUSD";
pub const MINT_VUSD: &str = "mintVUSD";
pub const MINT_AZUSD: &str = "mintAZUSD";
pub const STAKE_AUSD: &str = "stakeAUSD";
pub const STAKE_USDE: &str = "stakeUSDe";
pub const STAKE_LVLUSD: &str = "stakeLVLUSD";
pub const STAKE_VUSD: &str = "stakeVUSD";
pub const STAKE_USD1: &str = "stakeUSD1";
pub const STAKE_AZUSD: &str = "stakeAZUSD";

/// Operation name to contract address.
#[derive(Debug, Clone, Default)]
pub struct ContractRegistry {
    entries: BTreeMap<&'static str, Address>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, address: Address) -> Self {
        self.entries.insert(name, address);
        self
    }

    pub fn address(&self, name: &str) -> Result<Address> {
        self.entries
            .get(name)
            .copied()
            .ok_or_else(|| anyhow!("No contract registered for '{}'", name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub static CONTRACTS: Lazy<ContractRegistry> = Lazy::new(|| {
    [
        (MINT_AUSD, "0x2cFDeE1d5f04dD235AEA47E1aD2fB66e3A61C13e"),
        (MINT_VUSD, "0x3dCACa90A714498624067948C092Dd0373f08265"),
        (MINT_AZUSD, "0xB0b53d8B4ef06F9Bbe5db624113C6A5D35bB7522"),
        (STAKE_AUSD, "0x054de909723ECda2d119E31583D40a52a332f85c"),
        (STAKE_USDE, "0x3988053b7c748023a1aE19a8ED4c1Bf217932bDB"),
        (STAKE_LVLUSD, "0x5De3fBd40D4c3892914c3b67b5B529D776A1483A"),
        (STAKE_VUSD, "0x5bb9Fa02a3DCCDB4E9099b48e8Ba5841D2e59d51"),
        (STAKE_USD1, "0x7799841734Ac448b8634F1c1d7522Bc8887A7bB9"),
        (STAKE_AZUSD, "0xf45Fde3F484C44CC35Bdc2A7fCA3DDDe0C8f252E"),
    ]
    .into_iter()
    .fold(ContractRegistry::new(), |registry, (name, raw)| {
        registry.with(name, static_address(raw))
    })
});

// Pre-encoded mint calls, passed through untouched
const MINT_AUSD_PAYLOAD: &str =
    "0x1bf6318b000000000000000000000000000000000000000000000002b5e3af16b1880000";
const MINT_VUSD_PAYLOAD: &str =
    "0xa6d675100000000000000000000000000000000000000000000000000000000077359400";
const MINT_AZUSD_PAYLOAD: &str =
    "0xa6d6751000000000000000000000000000000000000000000000000000000001a13b8600";

/// Opaque calldata for the mint contract that converts `input` into `output`.
pub fn mint_payload(output: Token) -> Option<Bytes> {
    let raw = match output {
        Token::Ausd => MINT_AUSD_PAYLOAD,
        Token::Vusd => MINT_VUSD_PAYLOAD,
        Token::Azusd => MINT_AZUSD_PAYLOAD,
        _ => return None,
    };
    raw.parse().ok()
}

/// `n` whole tokens expressed in base units. `None` when the result does not
/// fit in 256 bits, which only a bogus `decimals()` answer can cause.
pub fn whole_units(n: u64, decimals: u32) -> Option<U256> {
    U256::from(10u64)
        .checked_pow(U256::from(decimals))
        .and_then(|scale| scale.checked_mul(U256::from(n)))
}

/// Human-readable amount, e.g. `50.0` for 50e18 at 18 decimals.
pub fn format_amount(amount: U256, decimals: u32) -> String {
    ethers::utils::format_units(amount, decimals).unwrap_or_else(|_| amount.to_string())
}

/// `0x1234...abcd`
pub fn short_address(address: Address) -> String {
    let full = format!("{:?}", address);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}
