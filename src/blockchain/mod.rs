// src/blockchain/mod.rs

pub mod chains;
pub mod client;
pub mod models;
pub mod services;

pub use chains::{Chain, ChainRegistry};
pub use client::ChainQueryClient;

// Re-export commonly used types
pub use ethers::types::{Address, U256};
