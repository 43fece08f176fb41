// src/blockchain/services/contract.rs

use ethers::{
    providers::{Http, Middleware, Provider, ProviderError},
    types::{Address, BlockId, BlockNumber},
};
use tracing::debug;

use crate::blockchain::models::ContractScanResult;

/// Fetch the runtime bytecode stored at `address` at the latest block.
/// An address is a contract when that code is non-empty.
pub async fn scan_code(
    provider: &Provider<Http>,
    address: Address,
) -> Result<ContractScanResult, ProviderError> {
    let code = provider
        .get_code(address, Some(BlockId::Number(BlockNumber::Latest)))
        .await?;
    debug!(address = ?address, code_size = code.len(), "eth_getCode returned");
    Ok(ContractScanResult::from_code(&code))
}
