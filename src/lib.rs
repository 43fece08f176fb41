// src/lib.rs

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

pub mod agent;
pub mod api;
pub mod blockchain;
pub mod config;
pub mod context;
pub mod pricing;
pub mod utils;

use agent::{AgentCard, Dispatcher};
use context::TaskContext;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration, read-only after startup
    pub config: Arc<config::Config>,
    /// Routes task lines to the price and chain clients
    pub dispatcher: Dispatcher,
    /// Cancelled on shutdown; every task runs under a child of it
    pub shutdown: CancellationToken,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: config::Config) -> Result<Self> {
        let config = Arc::new(config);
        let dispatcher = Dispatcher::new(config.clone())?;
        Ok(Self {
            config,
            dispatcher,
            shutdown: CancellationToken::new(),
            started_at: Utc::now(),
        })
    }

    pub fn agent_card(&self) -> AgentCard {
        AgentCard::from_config(&self.config, self.started_at)
    }

    /// Run one task under the configured deadline, tagged with a fresh id.
    /// Failures are logged here so every host surface reports them the same way.
    pub async fn run_task(&self, task: &str) -> (Uuid, Result<String>) {
        let task_id = Uuid::new_v4();
        let ctx = TaskContext::new(
            Instant::now() + self.config.task_timeout,
            self.shutdown.child_token(),
        );

        let result = self
            .dispatcher
            .process_task_with(task, &ctx)
            .instrument(info_span!("task", id = %task_id))
            .await;

        match &result {
            Ok(_) => info!(task_id = %task_id, "Task completed"),
            Err(e) => error!(task_id = %task_id, "Task failed: {:#}", e),
        }
        (task_id, result)
    }
}
