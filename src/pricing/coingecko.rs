// src/pricing/coingecko.rs

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::context::{Interrupted, TaskContext};
use crate::pricing::symbols::resolve_symbol;
use crate::utils::format_significant;

#[derive(Error, Debug)]
pub enum PriceError {
    #[error("failed to fetch price: {0}")]
    Request(#[source] reqwest::Error),
    #[error("price API status {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("failed to decode price response: {0}")]
    Decode(String),
    #[error("USD price not found for '{id}' ({detail})")]
    NotFound { id: String, detail: String },
    #[error("price lookup timed out")]
    Timeout,
    #[error("price lookup cancelled")]
    Cancelled,
}

impl From<Interrupted> for PriceError {
    fn from(cause: Interrupted) -> Self {
        match cause {
            Interrupted::DeadlineExceeded => PriceError::Timeout,
            Interrupted::Cancelled => PriceError::Cancelled,
        }
    }
}

impl From<reqwest::Error> for PriceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            PriceError::Timeout
        } else {
            PriceError::Request(e)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    pub usd: f64,
    /// Compact form, e.g. `$65000.1`
    pub display: String,
}

// `{"<id>": {"usd": 1.0}}`. Entries may be null, and so may the whole payload.
type SimplePriceResponse = Option<HashMap<String, Option<HashMap<String, f64>>>>;

#[derive(Debug, Clone)]
pub struct PriceClient {
    client: Client,
    base_url: String,
}

impl PriceClient {
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self, PriceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(PriceError::Request)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, PriceError> {
        Self::new(
            &config.price_api_url,
            config.price_http_timeout,
            &config.user_agent,
        )
    }

    /// Fetch the USD quote for a coin id or known ticker symbol.
    pub async fn fetch_usd(&self, id: &str, ctx: &TaskContext) -> Result<PriceQuote, PriceError> {
        let id = resolve_symbol(id);
        ctx.run(self.request_quote(&id)).await?
    }

    async fn request_quote(&self, id: &str) -> Result<PriceQuote, PriceError> {
        let url = format!("{}/simple/price", self.base_url);
        debug!(url = %url, id = %id, "Requesting USD price");

        let res = self
            .client
            .get(&url)
            .query(&[("ids", id), ("vs_currencies", "usd")])
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(PriceError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = res.text().await?;
        let data: SimplePriceResponse =
            serde_json::from_str(&body).map_err(|e| PriceError::Decode(e.to_string()))?;
        let data = match data {
            Some(map) if !map.is_empty() => map,
            _ => {
                return Err(PriceError::NotFound {
                    id: id.to_string(),
                    detail: "empty response".to_string(),
                })
            }
        };

        // The API does not always key the result by the id we sent, so take
        // the first entry carrying a USD field.
        let usd = data
            .values()
            .flatten()
            .find_map(|quote| quote.get("usd").copied())
            .ok_or_else(|| PriceError::NotFound {
                id: id.to_string(),
                detail: format!("raw: {}", body.trim()),
            })?;

        Ok(PriceQuote {
            usd,
            display: format!("${}", format_significant(usd, 6)),
        })
    }
}
