//! Daily faucet, mint and stake automation for the Maitrix testnet on
//! Arbitrum Sepolia.

pub mod abi;
pub mod config;
pub mod faucet;
pub mod rpc;
pub mod tokens;
pub mod workflow;
