//! Blockchain client module for EVM-compatible networks.
//!
//! Read-only queries against a configured JSON-RPC endpoint. Every call
//! opens its own provider and drops it before returning, whether the query
//! succeeded, failed, or was interrupted by the task deadline.

use std::str::FromStr;

use ethers::{
    providers::{Http, Provider, ProviderError, RpcError},
    types::Address,
};
use tracing::debug;

use crate::blockchain::{
    models::{BalanceResult, ChainQueryError, ContractScanResult},
    services::{balance, contract},
};
use crate::context::TaskContext;
use crate::utils::is_hex_address;

const GET_BALANCE: &str = "eth_getBalance";
const GET_CODE: &str = "eth_getCode";

/// Thin wrapper over the two queries the agent needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainQueryClient;

impl ChainQueryClient {
    pub fn new() -> Self {
        Self
    }

    /// Native balance of `address`, converted to the display unit.
    pub async fn balance(
        &self,
        endpoint: &str,
        address: &str,
        ctx: &TaskContext,
    ) -> Result<BalanceResult, ChainQueryError> {
        let provider = create_provider(endpoint)?;
        let address = parse_address(address)?;

        debug!(endpoint = %endpoint, address = ?address, "Querying native balance");
        let wei = ctx
            .run(balance::get_native_balance(&provider, address))
            .await
            .map_err(|cause| ChainQueryError::interrupted(GET_BALANCE, cause))?
            .map_err(|e| classify(GET_BALANCE, e))?;

        Ok(BalanceResult::from_wei(wei))
    }

    /// Whether `address` holds contract code, and how many bytes of it.
    pub async fn scan_code(
        &self,
        endpoint: &str,
        address: &str,
        ctx: &TaskContext,
    ) -> Result<ContractScanResult, ChainQueryError> {
        let provider = create_provider(endpoint)?;
        let address = parse_address(address)?;

        debug!(endpoint = %endpoint, address = ?address, "Querying contract code");
        ctx.run(contract::scan_code(&provider, address))
            .await
            .map_err(|cause| ChainQueryError::interrupted(GET_CODE, cause))?
            .map_err(|e| classify(GET_CODE, e))
    }
}

/// Create a provider for the given RPC URL
pub fn create_provider(rpc_url: &str) -> Result<Provider<Http>, ChainQueryError> {
    let rpc_url = rpc_url.trim();
    if rpc_url.is_empty() {
        return Err(ChainQueryError::EmptyEndpoint);
    }
    Provider::<Http>::try_from(rpc_url)
        .map_err(|e| ChainQueryError::Connection(format!("{}: {}", rpc_url, e)))
}

fn parse_address(input: &str) -> Result<Address, ChainQueryError> {
    if !is_hex_address(input) {
        return Err(ChainQueryError::InvalidAddress(input.to_string()));
    }
    Address::from_str(input).map_err(|_| ChainQueryError::InvalidAddress(input.to_string()))
}

// JSON-RPC error objects and malformed payloads mean the node answered;
// anything else never got a usable answer back.
fn classify(method: &'static str, err: ProviderError) -> ChainQueryError {
    if err.as_error_response().is_some() || err.as_serde_error().is_some() {
        ChainQueryError::Query {
            method,
            reason: err.to_string(),
        }
    } else {
        ChainQueryError::Connection(err.to_string())
    }
}
