// src/config.rs

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use secrecy::SecretString;

use crate::blockchain::chains::{Chain, ChainRegistry};

pub const DEFAULT_PRICE_API_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_AGENT_NAME: &str = "Crypto Onchain Intelligence V2";
pub const DEFAULT_AGENT_DESCRIPTION: &str = "Providing fast on-chain intelligence with price checks, multi-chain wallet balance, pump/dump alerts, and smart contract risk scans.";

/// Capabilities advertised to the hosting runtime.
pub const AGENT_CAPABILITIES: [&str; 3] = ["price_check", "wallet_analysis", "contract_risk_scan"];

// A struct to hold all configuration, loaded once at startup from the .env file.
#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub port: u16,

    /// RPC endpoints for the supported EVM chains:
    /// - Ethereum Mainnet (`eth`, `ethereum`)
    /// - BNB Smart Chain (`bsc`, `binance`)
    /// - Polygon PoS (`polygon`, `matic`)
    /// - Arbitrum One (`arbitrum`)
    /// - Base (`base`)
    pub chains: ChainRegistry,

    // Price API settings
    pub price_api_url: String,
    pub price_http_timeout: Duration,
    pub user_agent: String,

    /// Upper bound for a single task, outbound calls included.
    pub task_timeout: Duration,

    // Identity, consumed by the hosting runtime only
    pub agent_name: String,
    pub agent_description: String,
    pub private_key: Option<SecretString>,
    pub nft_token_id: Option<String>,
    pub owner_address: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            chains: ChainRegistry::default(),
            price_api_url: DEFAULT_PRICE_API_URL.to_string(),
            price_http_timeout: Duration::from_secs(10),
            user_agent: default_user_agent(),
            task_timeout: Duration::from_secs(15),
            agent_name: DEFAULT_AGENT_NAME.to_string(),
            agent_description: DEFAULT_AGENT_DESCRIPTION.to_string(),
            private_key: None,
            nft_token_id: None,
            owner_address: None,
        }
    }
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

impl Config {
    /// Returns the aliases of chains that have an endpoint configured
    pub fn supported_chains(&self) -> Vec<&'static str> {
        self.chains.configured().map(|chain| chain.alias()).collect()
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();

        let endpoints = load_endpoints(|key| env::var(key).ok())?;

        let price_api_url = env::var("PRICE_API_URL")
            .unwrap_or_else(|_| DEFAULT_PRICE_API_URL.to_string());
        url::Url::parse(&price_api_url).context("PRICE_API_URL must be a valid URL")?;

        Ok(Config {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,

            chains: ChainRegistry::new(endpoints),

            price_api_url,
            price_http_timeout: Duration::from_secs(
                env::var("PRICE_HTTP_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .context("PRICE_HTTP_TIMEOUT_SECS must be a valid number")?,
            ),
            user_agent: default_user_agent(),
            task_timeout: Duration::from_secs(
                env::var("TASK_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "15".to_string())
                    .parse()
                    .context("TASK_TIMEOUT_SECS must be a valid number")?,
            ),

            agent_name: env::var("AGENT_NAME").unwrap_or_else(|_| DEFAULT_AGENT_NAME.to_string()),
            agent_description: env::var("AGENT_DESCRIPTION")
                .unwrap_or_else(|_| DEFAULT_AGENT_DESCRIPTION.to_string()),
            private_key: env::var("PRIVATE_KEY").ok().map(SecretString::new),
            nft_token_id: env::var("NFT_TOKEN_ID").ok(),
            owner_address: env::var("OWNER_ADDRESS").ok(),
        })
    }
}

/// Collect chain endpoints from `CHAIN_RPC_URLS` and the per-chain
/// variables. A non-blank per-chain value overrides the JSON map entry;
/// a blank one leaves it in place.
fn load_endpoints<F>(lookup: F) -> Result<HashMap<Chain, String>>
where
    F: Fn(&str) -> Option<String>,
{
    let mut endpoints = HashMap::new();

    // CHAIN_RPC_URLS is an optional JSON map of alias -> RPC URL
    if let Some(raw) = lookup("CHAIN_RPC_URLS") {
        let map: HashMap<String, String> =
            serde_json::from_str(&raw).context("Invalid CHAIN_RPC_URLS JSON format")?;
        for (alias, url) in map {
            match Chain::from_alias(&alias) {
                Some(chain) => {
                    endpoints.insert(chain, url.trim().to_string());
                }
                None => tracing::warn!("Ignoring unknown chain '{}' in CHAIN_RPC_URLS", alias),
            }
        }
    }

    for chain in Chain::ALL {
        let url = lookup(chain.env_key()).map(|u| u.trim().to_string());
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            endpoints.insert(chain, url);
        }
    }

    for (chain, url) in &endpoints {
        validate_endpoint(url)
            .with_context(|| format!("{} is not a valid RPC URL", chain.env_key()))?;
    }

    Ok(endpoints)
}

// Empty values mean "not configured" and are accepted as-is.
fn validate_endpoint(raw: &str) -> Result<()> {
    if raw.trim().is_empty() {
        return Ok(());
    }
    let parsed = url::Url::parse(raw.trim())?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => bail!("unsupported scheme '{}', expected http or https", other),
    }
}
