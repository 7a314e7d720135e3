//! Call encoding for the ERC-20 and staking contracts.

use anyhow::{anyhow, Context, Result};
use ethers::abi::parse_abi;
use ethers::contract::BaseContract;
use ethers::types::{Address, Bytes, U256};
use once_cell::sync::Lazy;

static ERC20: Lazy<BaseContract> = Lazy::new(|| {
    let abi = parse_abi(&[
        "function approve(address spender, uint256 amount) external returns (bool)",
        "function balanceOf(address account) external view returns (uint256)",
        "function decimals() external view returns (uint8)",
    ])
    .unwrap_or_else(|e| panic!("invalid ERC20 ABI: {}", e));
    BaseContract::from(abi)
});

static STAKING: Lazy<BaseContract> = Lazy::new(|| {
    let abi = parse_abi(&["function stake(uint256 _tokens) external"])
        .unwrap_or_else(|e| panic!("invalid staking ABI: {}", e));
    BaseContract::from(abi)
});

pub fn encode_approve(spender: Address, amount: U256) -> Result<Bytes> {
    ERC20
        .encode("approve", (spender, amount))
        .context("Failed to encode approve")
}

pub fn encode_balance_of(account: Address) -> Result<Bytes> {
    ERC20
        .encode("balanceOf", account)
        .context("Failed to encode balanceOf")
}

pub fn encode_decimals() -> Result<Bytes> {
    ERC20
        .encode("decimals", ())
        .context("Failed to encode decimals")
}

pub fn encode_stake(amount: U256) -> Result<Bytes> {
    STAKING
        .encode("stake", amount)
        .context("Failed to encode stake")
}

pub fn decode_balance(output: &[u8]) -> Result<U256> {
    ERC20
        .decode_output("balanceOf", output)
        .context("Failed to decode balanceOf output")
}

pub fn decode_decimals(output: &[u8]) -> Result<u8> {
    let raw: U256 = ERC20
        .decode_output("decimals", output)
        .context("Failed to decode decimals output")?;
    if raw > U256::from(u8::MAX) {
        return Err(anyhow!("decimals out of range: {}", raw));
    }
    Ok(raw.low_u32() as u8)
}

/// Arguments of an encoded `approve(spender, amount)` call.
pub fn decode_approve(call: &[u8]) -> Result<(Address, U256)> {
    ERC20
        .decode("approve", call)
        .context("Not an approve call")
}

/// Amount of an encoded `stake(amount)` call.
pub fn decode_stake(call: &[u8]) -> Result<U256> {
    STAKING.decode("stake", call).context("Not a stake call")
}

pub fn is_approve(call: &[u8]) -> bool {
    call.len() >= 4 && call[..4] == [0x09, 0x5e, 0xa7, 0xb3]
}

pub fn is_stake(call: &[u8]) -> bool {
    call.len() >= 4 && call[..4] == [0xa6, 0x94, 0xfc, 0x3a]
}
