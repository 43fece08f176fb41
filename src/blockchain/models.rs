// src/blockchain/models.rs
use ethers::types::U256;
use serde::Serialize;
use thiserror::Error;

use crate::context::Interrupted;
use crate::utils::format_wei;

// --- Error types for chain queries ---

#[derive(Error, Debug)]
pub enum ChainQueryError {
    #[error("RPC URL is empty")]
    EmptyEndpoint,
    #[error("invalid address '{0}'")]
    InvalidAddress(String),
    #[error("failed to connect to RPC endpoint: {0}")]
    Connection(String),
    #[error("{method} failed: {reason}")]
    Query { method: &'static str, reason: String },
    #[error("{method} timed out")]
    Timeout { method: &'static str },
    #[error("{method} cancelled")]
    Cancelled { method: &'static str },
}

impl ChainQueryError {
    pub(crate) fn interrupted(method: &'static str, cause: Interrupted) -> Self {
        match cause {
            Interrupted::DeadlineExceeded => ChainQueryError::Timeout { method },
            Interrupted::Cancelled => ChainQueryError::Cancelled { method },
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ChainQueryError::Timeout { .. })
    }
}

// --- Balance Models ---

/// Native balance of an account at the latest block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceResult {
    /// Smallest-unit amount
    pub wei: U256,
    /// `wei / 10^18` with 18 fractional digits and the `ETH` unit
    pub display: String,
}

impl BalanceResult {
    pub fn from_wei(wei: U256) -> Self {
        Self {
            wei,
            display: format!("{} ETH", format_wei(wei)),
        }
    }
}

// --- Contract Models ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContractScanResult {
    pub is_contract: bool,
    pub code_size: usize,
}

impl ContractScanResult {
    pub fn from_code(code: &[u8]) -> Self {
        Self {
            is_contract: !code.is_empty(),
            code_size: code.len(),
        }
    }

    pub fn status(&self) -> &'static str {
        if self.is_contract {
            "is a contract"
        } else {
            "is NOT a contract"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_display() {
        let one_eth = BalanceResult::from_wei(U256::from(1_000_000_000_000_000_000u64));
        assert_eq!(one_eth.display, "1.000000000000000000 ETH");
    }

    #[test]
    fn test_scan_from_code() {
        let empty = ContractScanResult::from_code(&[]);
        assert!(!empty.is_contract);
        assert_eq!(empty.code_size, 0);
        assert_eq!(empty.status(), "is NOT a contract");

        let deployed = ContractScanResult::from_code(&[0x60, 0x80, 0x60, 0x40]);
        assert!(deployed.is_contract);
        assert_eq!(deployed.code_size, 4);
        assert_eq!(deployed.status(), "is a contract");
    }
}
