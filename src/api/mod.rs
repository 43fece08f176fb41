//! # API Module
//!
//! HTTP surface of the agent, mounted under `/api`.
//!
//! ## Available Endpoints
//! - `GET /health` - liveness probe
//! - `GET /agent` - agent card (name, capabilities, configured chains)
//! - `POST /task` - run one task line, e.g. `{"task": "wallet eth 0x..."}`
//! - `POST /rpc` - JSON-RPC envelope, same methods as the stdio mode

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub mod health;
pub mod task;

/// Routes relative to `/api`.
pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/agent", get(task::agent_card_handler))
        .route("/task", post(task::process_task_handler))
        .route("/rpc", post(task::rpc_handler))
        .with_state(state)
}

/// Full application with tracing and CORS layers.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .nest("/api", create_api_router(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
