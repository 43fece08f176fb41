// src/blockchain/chains.rs

use std::collections::HashMap;

/// EVM networks the agent knows how to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chain {
    Ethereum,
    Bsc,
    Polygon,
    Arbitrum,
    Base,
}

impl Chain {
    pub const ALL: [Chain; 5] = [
        Chain::Ethereum,
        Chain::Bsc,
        Chain::Polygon,
        Chain::Arbitrum,
        Chain::Base,
    ];

    /// Normalize a user-facing chain name (case and surrounding whitespace
    /// are ignored).
    pub fn from_alias(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "eth" | "ethereum" => Some(Chain::Ethereum),
            "bsc" | "binance" => Some(Chain::Bsc),
            "polygon" | "matic" => Some(Chain::Polygon),
            "arbitrum" => Some(Chain::Arbitrum),
            "base" => Some(Chain::Base),
            _ => None,
        }
    }

    /// Environment variable holding this chain's RPC URL
    pub fn env_key(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ETH_RPC_URL",
            Chain::Bsc => "BSC_RPC_URL",
            Chain::Polygon => "POLYGON_RPC_URL",
            Chain::Arbitrum => "ARBITRUM_RPC_URL",
            Chain::Base => "BASE_RPC_URL",
        }
    }

    /// Canonical short alias
    pub fn alias(&self) -> &'static str {
        match self {
            Chain::Ethereum => "eth",
            Chain::Bsc => "bsc",
            Chain::Polygon => "polygon",
            Chain::Arbitrum => "arbitrum",
            Chain::Base => "base",
        }
    }
}

/// Read-only chain -> endpoint table, built once from configuration.
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    endpoints: HashMap<Chain, String>,
}

impl ChainRegistry {
    pub fn new(endpoints: HashMap<Chain, String>) -> Self {
        let endpoints = endpoints
            .into_iter()
            .map(|(chain, url)| (chain, url.trim().to_string()))
            .filter(|(_, url)| !url.is_empty())
            .collect();
        Self { endpoints }
    }

    /// Resolve a chain name or alias to its configured endpoint.
    /// Unknown and unconfigured chains both resolve to `None`.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        let chain = Chain::from_alias(name)?;
        self.endpoint(chain)
    }

    pub fn endpoint(&self, chain: Chain) -> Option<&str> {
        self.endpoints.get(&chain).map(String::as_str)
    }

    /// Configured chains, in declaration order
    pub fn configured(&self) -> impl Iterator<Item = Chain> + '_ {
        Chain::ALL
            .into_iter()
            .filter(move |chain| self.endpoints.contains_key(chain))
    }
}

impl FromIterator<(Chain, String)> for ChainRegistry {
    fn from_iter<I: IntoIterator<Item = (Chain, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ChainRegistry {
        [
            (Chain::Ethereum, "https://eth.example.com".to_string()),
            (Chain::Polygon, "https://polygon.example.com".to_string()),
            (Chain::Base, "   ".to_string()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_alias_normalization() {
        assert_eq!(Chain::from_alias("ETH"), Some(Chain::Ethereum));
        assert_eq!(Chain::from_alias(" ethereum "), Some(Chain::Ethereum));
        assert_eq!(Chain::from_alias("Matic"), Some(Chain::Polygon));
        assert_eq!(Chain::from_alias("binance"), Some(Chain::Bsc));
        assert_eq!(Chain::from_alias("solana"), None);
        assert_eq!(Chain::from_alias(""), None);
    }

    #[test]
    fn test_resolve_configured_chains() {
        let registry = registry();
        assert_eq!(registry.resolve("eth"), Some("https://eth.example.com"));
        assert_eq!(registry.resolve("MATIC"), Some("https://polygon.example.com"));
        assert_eq!(registry.resolve("polygon"), Some("https://polygon.example.com"));
    }

    #[test]
    fn test_resolve_missing_chains() {
        let registry = registry();
        // known but unconfigured
        assert_eq!(registry.resolve("bsc"), None);
        // blank endpoints count as unconfigured
        assert_eq!(registry.resolve("base"), None);
        // unknown
        assert_eq!(registry.resolve("avalanche"), None);
    }

    #[test]
    fn test_configured_order() {
        let chains: Vec<Chain> = registry().configured().collect();
        assert_eq!(chains, vec![Chain::Ethereum, Chain::Polygon]);
    }
}
