//! # Agent Module
//!
//! Task handling for the on-chain intelligence agent.
//!
//! ## Commands
//! - `price <coin_id_or_symbol>` - USD price via CoinGecko
//! - `wallet [chain] <0xaddress>` - native balance on an EVM chain
//! - `scan_contract [chain] <0xaddress>` - whether an address holds contract code
//!
//! Tasks arrive either through the HTTP API or as line-delimited JSON-RPC on
//! stdin; both end up in [`dispatcher::Dispatcher`].

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{Config, AGENT_CAPABILITIES};

pub mod dispatcher;
pub mod handler;
pub mod protocol;

pub use dispatcher::{parse_task, Command, Dispatcher, ParsedTask, AVAILABLE_COMMANDS};

/// Public description of the agent handed to the hosting runtime.
/// Secrets such as the private key are never part of it.
#[derive(Debug, Clone, Serialize)]
pub struct AgentCard {
    pub name: String,
    pub description: String,
    pub version: &'static str,
    pub capabilities: Vec<&'static str>,
    pub commands: Vec<&'static str>,
    pub chains: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nft_token_id: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl AgentCard {
    pub fn from_config(config: &Config, started_at: DateTime<Utc>) -> Self {
        Self {
            name: config.agent_name.clone(),
            description: config.agent_description.clone(),
            version: env!("CARGO_PKG_VERSION"),
            capabilities: AGENT_CAPABILITIES.to_vec(),
            commands: AVAILABLE_COMMANDS.to_vec(),
            chains: config.supported_chains(),
            owner_address: config.owner_address.clone(),
            nft_token_id: config.nft_token_id.clone(),
            started_at,
        }
    }
}
