//! USD price lookups against the CoinGecko `simple/price` API.

pub mod coingecko;
pub mod symbols;

pub use coingecko::{PriceClient, PriceError, PriceQuote};
pub use symbols::resolve_symbol;
