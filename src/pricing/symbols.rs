//! Ticker symbol -> CoinGecko id resolution.

use std::collections::HashMap;

use lazy_static::lazy_static;

lazy_static! {
    static ref SYMBOL_TO_ID: HashMap<&'static str, &'static str> = HashMap::from([
        ("eth", "ethereum"),
        ("btc", "bitcoin"),
        ("bnb", "binancecoin"),
        ("matic", "matic-network"),
        ("arb", "arbitrum"),
        ("base", "base"),
    ]);
}

/// Map a ticker to its canonical price id. Unknown input is assumed to be an
/// id already and comes back trimmed and lower-cased.
pub fn resolve_symbol(input: &str) -> String {
    let normalized = input.trim().to_lowercase();
    match SYMBOL_TO_ID.get(normalized.as_str()) {
        Some(id) => (*id).to_string(),
        None => normalized,
    }
}
