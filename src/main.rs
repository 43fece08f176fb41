// src/main.rs

use onchain_intel_agent::{
    agent::{
        handler::handle_agent_request,
        protocol::{error_codes, Request, Response},
    },
    api,
    config::Config,
    AppState,
};
use std::env;
use std::net::SocketAddr;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// --- HTTP Server Logic ---
async fn run_http_server(state: AppState) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], state.config.port));
    let shutdown = state.shutdown.clone();
    let app = api::create_app(state);

    info!("🚀 HTTP Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    Ok(())
}

// --- Stdio Logic ---
async fn run_stdio_agent(state: AppState) {
    info!("🚀 Starting agent on stdin/stdout...");

    let mut stdin = io::BufReader::new(io::stdin());
    let mut stdout = io::stdout();

    loop {
        let mut line = String::new();

        let read = tokio::select! {
            _ = state.shutdown.cancelled() => break,
            read = stdin.read_line(&mut line) => read,
        };

        match read {
            Ok(0) => {
                info!("EOF received, shutting down agent");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                debug!("Received: {}", line);

                let response = match serde_json::from_str::<Request>(line) {
                    Ok(request) => handle_agent_request(request, state.clone()).await,
                    Err(parse_error) => {
                        error!("JSON parse error: {}", parse_error);
                        Some(Response::error(
                            serde_json::Value::Null,
                            error_codes::PARSE_ERROR,
                            format!("Parse error: {}", parse_error),
                        ))
                    }
                };

                if let Some(response) = response {
                    if let Ok(response_json) = serde_json::to_string(&response) {
                        debug!("Sending: {}", response_json);
                        if let Err(e) = stdout
                            .write_all(format!("{}\n", response_json).as_bytes())
                            .await
                        {
                            error!("Failed to write response: {}", e);
                            break;
                        }
                        if let Err(e) = stdout.flush().await {
                            error!("Failed to flush response: {}", e);
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                error!("Failed to read from stdin: {}", e);
                break;
            }
        }
    }

    info!("Agent shutting down");
}

#[tokio::main]
async fn main() {
    // Initialize tracing; stdout is reserved for the stdio protocol
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "onchain_intel_agent=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("❌ Failed to load configuration: {:#}", e);
            return;
        }
    };

    if config.supported_chains().is_empty() {
        warn!("No chain RPC URLs configured; wallet and scan_contract will report missing configuration");
    }
    if config.private_key.is_none() {
        debug!("PRIVATE_KEY not set; the hosting runtime will run without an agent identity");
    }

    let app_state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            error!("❌ Failed to initialize agent: {:#}", e);
            return;
        }
    };

    info!(
        name = %app_state.config.agent_name,
        chains = ?app_state.config.supported_chains(),
        "Starting agent"
    );

    // Ctrl-C cancels in-flight tasks and stops the active front end
    let shutdown = app_state.shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            shutdown.cancel();
        }
    });

    // Stdio mode for hosting runtimes that pipe tasks in, HTTP otherwise
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--stdio") || env::var("AGENT_STDIO").is_ok() {
        run_stdio_agent(app_state).await;
    } else if let Err(e) = run_http_server(app_state).await {
        error!("❌ HTTP server error: {:#}", e);
    }
}
