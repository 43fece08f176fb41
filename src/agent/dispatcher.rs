// src/agent/dispatcher.rs

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::blockchain::ChainQueryClient;
use crate::config::Config;
use crate::context::TaskContext;
use crate::pricing::PriceClient;
use crate::utils::is_hex_address;

pub const AVAILABLE_COMMANDS: [&str; 3] = ["price", "wallet", "scan_contract"];

const DEFAULT_CHAIN: &str = "eth";
const PRICE_USAGE: &str = "Usage: price <coin_id_or_symbol>. Example: price ethereum";
const WALLET_USAGE: &str = "Usage: wallet <chain> <0xaddress>. Example: wallet eth 0x123...";
const SCAN_USAGE: &str = "Usage: scan_contract <chain> <0xaddress>";
const INVALID_ADDRESS: &str = "Invalid address format. Expected 0x...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Price,
    Wallet,
    ScanContract,
    Unknown(String),
}

impl Command {
    fn from_name(name: &str) -> Self {
        match name {
            "price" => Command::Price,
            "wallet" => Command::Wallet,
            "scan_contract" => Command::ScanContract,
            other => Command::Unknown(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedTask {
    Empty,
    Command { command: Command, args: Vec<String> },
}

/// Split a raw task line into a command and its arguments.
pub fn parse_task(task: &str) -> ParsedTask {
    let task = task.trim();
    let task = task.strip_prefix('/').unwrap_or(task);
    let mut parts = task.split_whitespace();

    match parts.next() {
        None => ParsedTask::Empty,
        Some(name) => ParsedTask::Command {
            command: Command::from_name(&name.to_lowercase()),
            args: parts.map(str::to_string).collect(),
        },
    }
}

/// `[address]` defaults to Ethereum; `[chain, address, ..]` ignores the rest.
fn chain_target(args: &[String]) -> Option<(String, &str)> {
    match args {
        [] => None,
        [address] => Some((DEFAULT_CHAIN.to_string(), address.as_str())),
        [chain, address, ..] => Some((chain.to_lowercase(), address.as_str())),
    }
}

fn available_commands() -> String {
    AVAILABLE_COMMANDS.join(", ")
}

/// Routes task lines to the price and chain clients.
///
/// Bad input (missing arguments, unknown chain, malformed address, unknown
/// command) is answered with a usage message. Only failures of the outbound
/// calls come back as `Err`.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    config: Arc<Config>,
    prices: PriceClient,
    chain: ChainQueryClient,
}

impl Dispatcher {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let prices = PriceClient::from_config(&config).context("Failed to build price client")?;
        Ok(Self {
            config,
            prices,
            chain: ChainQueryClient::new(),
        })
    }

    /// Process a task under the configured task timeout.
    pub async fn process_task(&self, task: &str) -> Result<String> {
        let ctx = TaskContext::with_timeout(self.config.task_timeout);
        self.process_task_with(task, &ctx).await
    }

    /// Process a task under the caller's deadline and cancellation, further
    /// bounded by the configured task timeout.
    pub async fn process_task_with(&self, task: &str, parent: &TaskContext) -> Result<String> {
        info!("Processing task: {}", task);
        let ctx = parent.child_with_timeout(self.config.task_timeout);

        let (command, args) = match parse_task(task) {
            ParsedTask::Empty => {
                return Ok(format!(
                    "No command provided. Available commands: {}",
                    available_commands()
                ))
            }
            ParsedTask::Command { command, args } => (command, args),
        };
        debug!(command = ?command, args = ?args, "Parsed task");

        match command {
            Command::Price => self.price(&args, &ctx).await,
            Command::Wallet => self.wallet(&args, &ctx).await,
            Command::ScanContract => self.scan_contract(&args, &ctx).await,
            Command::Unknown(name) => Ok(format!(
                "Unknown command '{}'. Available commands: {}",
                name,
                available_commands()
            )),
        }
    }

    async fn price(&self, args: &[String], ctx: &TaskContext) -> Result<String> {
        if args.is_empty() {
            return Ok(PRICE_USAGE.to_string());
        }
        // Multi-word coin names, e.g. "shiba inu" -> "shiba-inu"
        let id = args.join("-");

        let quote = self
            .prices
            .fetch_usd(&id, ctx)
            .await
            .with_context(|| format!("price lookup for '{}' failed", id))?;

        Ok(format!(
            "Price for {}: {:.6} USD ({})",
            id, quote.usd, quote.display
        ))
    }

    async fn wallet(&self, args: &[String], ctx: &TaskContext) -> Result<String> {
        let Some((chain, address)) = chain_target(args) else {
            return Ok(WALLET_USAGE.to_string());
        };
        let endpoint = match self.resolve_target(&chain, address) {
            Ok(endpoint) => endpoint,
            Err(reply) => return Ok(reply),
        };

        let balance = self
            .chain
            .balance(endpoint, address, ctx)
            .await
            .with_context(|| format!("balance query on {} for {} failed", chain, address))?;

        Ok(format!(
            "[{}] Balance {}: {}",
            chain.to_uppercase(),
            address,
            balance.display
        ))
    }

    async fn scan_contract(&self, args: &[String], ctx: &TaskContext) -> Result<String> {
        let Some((chain, address)) = chain_target(args) else {
            return Ok(SCAN_USAGE.to_string());
        };
        let endpoint = match self.resolve_target(&chain, address) {
            Ok(endpoint) => endpoint,
            Err(reply) => return Ok(reply),
        };

        let scan = self
            .chain
            .scan_code(endpoint, address, ctx)
            .await
            .with_context(|| format!("contract scan on {} for {} failed", chain, address))?;

        Ok(format!(
            "[{}] {} {} (code size = {} bytes)",
            chain.to_uppercase(),
            address,
            scan.status(),
            scan.code_size
        ))
    }

    /// Endpoint for a chain/address pair, or the reply explaining why the
    /// query cannot be made. The chain is checked before the address.
    fn resolve_target(&self, chain: &str, address: &str) -> Result<&str, String> {
        let endpoint = self.config.chains.resolve(chain).ok_or_else(|| {
            format!("RPC URL for chain '{}' not configured in .env", chain)
        })?;
        if !is_hex_address(address) {
            return Err(INVALID_ADDRESS.to_string());
        }
        Ok(endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_empty_task() {
        assert_eq!(parse_task(""), ParsedTask::Empty);
        assert_eq!(parse_task("   "), ParsedTask::Empty);
        assert_eq!(parse_task(" / "), ParsedTask::Empty);
    }

    #[test]
    fn test_parse_strips_single_slash_and_lowercases() {
        assert_eq!(
            parse_task("  /PRICE btc "),
            ParsedTask::Command {
                command: Command::Price,
                args: args(&["btc"]),
            }
        );
        assert_eq!(
            parse_task("//price"),
            ParsedTask::Command {
                command: Command::Unknown("/price".to_string()),
                args: vec![],
            }
        );
    }

    #[test]
    fn test_parse_keeps_argument_case() {
        assert_eq!(
            parse_task("Scan_Contract Base 0xABCDEF0000000000000000000000000000000001"),
            ParsedTask::Command {
                command: Command::ScanContract,
                args: args(&["Base", "0xABCDEF0000000000000000000000000000000001"]),
            }
        );
    }

    #[test]
    fn test_chain_target() {
        assert_eq!(chain_target(&[]), None);
        assert_eq!(
            chain_target(&args(&["0xabc"])),
            Some(("eth".to_string(), "0xabc"))
        );
        assert_eq!(
            chain_target(&args(&["POLYGON", "0xabc", "extra"])),
            Some(("polygon".to_string(), "0xabc"))
        );
    }
}
