//! # Agent Request Handler
//!
//! JSON-RPC 2.0 front end used by the hosting runtime, over stdio or
//! `POST /api/rpc`.
//!
//! ## Methods
//! - `initialize` - returns the agent card
//! - `process_task` - `{"task": "price btc"}` -> `{"task_id", "response"}`
//! - `price` / `wallet` / `scan_contract` - shorthand taking `{"args": [..]}`

use serde_json::{json, Value};
use tracing::info;

use crate::{
    agent::protocol::{error_codes, Request, Response},
    utils, AppState,
};

// Helper: produce a result Value that always contains a text content array
// and preserves structured data for JSON-friendly clients.
fn make_texty_result(text: String, payload: Value) -> Value {
    let content = json!([{ "type": "text", "text": text }]);
    match payload {
        Value::Object(mut map) => {
            if !map.contains_key("content") {
                map.insert("content".into(), content);
            }
            Value::Object(map)
        }
        other => json!({
            "data": other,
            "content": content
        }),
    }
}

/// This is the main dispatcher for all incoming agent requests.
pub async fn handle_agent_request(req: Request, state: AppState) -> Option<Response> {
    info!("Handling agent request for method: {}", req.method);

    if req.is_notification() {
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(&req, &state),
        "process_task" => handle_process_task(&req, &state).await,
        // Shorthand: the command name as method, its arguments in params.args
        "price" | "wallet" | "scan_contract" => handle_command_alias(&req, &state).await,
        _ => Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };

    Some(response)
}

fn handle_initialize(req: &Request, state: &AppState) -> Response {
    match serde_json::to_value(state.agent_card()) {
        Ok(card) => Response::success(req.id.clone(), card),
        Err(e) => Response::error(
            req.id.clone(),
            error_codes::INVALID_REQUEST,
            format!("Failed to serialize agent card: {}", e),
        ),
    }
}

async fn handle_process_task(req: &Request, state: &AppState) -> Response {
    let params = match req.params.as_ref() {
        Some(p) => p,
        None => {
            return Response::error(
                req.id.clone(),
                error_codes::INVALID_PARAMS,
                "Missing 'params' object".into(),
            )
        }
    };
    let task: String = match utils::get_required_arg(params, "task", &req.id) {
        Ok(task) => task,
        Err(resp) => return resp,
    };

    run_task(req, state, &task).await
}

async fn handle_command_alias(req: &Request, state: &AppState) -> Response {
    let args: Vec<String> = match req.params.as_ref().filter(|p| p.get("args").is_some()) {
        Some(params) => match utils::get_required_arg(params, "args", &req.id) {
            Ok(args) => args,
            Err(resp) => return resp,
        },
        None => Vec::new(),
    };

    let mut task = req.method.clone();
    for arg in &args {
        task.push(' ');
        task.push_str(arg);
    }

    run_task(req, state, &task).await
}

async fn run_task(req: &Request, state: &AppState, task: &str) -> Response {
    let (task_id, result) = state.run_task(task).await;
    match result {
        Ok(text) => Response::success(
            req.id.clone(),
            make_texty_result(
                text.clone(),
                json!({ "task_id": task_id, "response": text }),
            ),
        ),
        Err(e) => Response::error_with_data(
            req.id.clone(),
            error_codes::TASK_FAILED,
            format!("{:#}", e),
            json!({ "task_id": task_id }),
        ),
    }
}
