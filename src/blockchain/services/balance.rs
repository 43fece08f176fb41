use ethers::{
    providers::{Http, Middleware, Provider, ProviderError},
    types::{Address, BlockId, BlockNumber, U256},
};
use tracing::debug;

/// `eth_getBalance` at the latest block, in wei.
pub async fn get_native_balance(
    provider: &Provider<Http>,
    address: Address,
) -> Result<U256, ProviderError> {
    let balance = provider
        .get_balance(address, Some(BlockId::Number(BlockNumber::Latest)))
        .await?;
    debug!(address = ?address, wei = %balance, "eth_getBalance returned");
    Ok(balance)
}
