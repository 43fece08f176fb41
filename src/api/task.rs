// src/api/task.rs

use crate::{
    agent::{
        handler::handle_agent_request,
        protocol::{error_codes, Request, Response},
    },
    AppState,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct TaskRequest {
    pub task: String,
}

// Either `response` or `error` is set.
#[derive(Debug, Serialize)]
pub struct TaskOutput {
    pub task_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn agent_card_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.agent_card())
}

/// The handler function for the POST /task endpoint.
/// Usage mistakes come back as 200 with a usage message; failed upstream
/// calls as 502.
pub async fn process_task_handler(
    State(state): State<AppState>,
    Json(req): Json<TaskRequest>,
) -> impl IntoResponse {
    let (task_id, result) = state.run_task(&req.task).await;
    match result {
        Ok(response) => (
            StatusCode::OK,
            Json(TaskOutput {
                task_id,
                response: Some(response),
                error: None,
            }),
        ),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(TaskOutput {
                task_id,
                response: None,
                error: Some(format!("{:#}", e)),
            }),
        ),
    }
}

// Forward JSON-RPC requests over HTTP to the agent handler
pub async fn rpc_handler(State(state): State<AppState>, Json(req): Json<Request>) -> Json<Response> {
    match handle_agent_request(req, state).await {
        Some(resp) => Json(resp),
        None => Json(Response::error(
            serde_json::Value::Null,
            error_codes::INVALID_REQUEST,
            "Notifications are not supported over HTTP".into(),
        )),
    }
}
