// X API v2 client — bearer-authenticated requests to the recent search and
// recent counts endpoints, with upstream failures mapped onto a typed error.
//
// Only the proxy talks to this client; the browser-facing format lives in
// the web handlers.

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Default X API host; override with X_API_BASE_URL (tests point this at a
/// stub server).
pub const DEFAULT_API_URL: &str = "https://api.twitter.com";

const SEARCH_PATH: &str = "/2/tweets/search/recent";
const COUNTS_PATH: &str = "/2/tweets/counts/recent";

/// Result bounds enforced by the recent search endpoint.
pub const MAX_RESULTS_CAP: u32 = 100;
pub const MIN_RESULTS: u32 = 10;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("X API rate limit exceeded")]
    RateLimited { reset: Option<String> },
    #[error("X API authentication failed ({status})")]
    Auth { status: StatusCode },
    #[error("X API returned {status}: {detail}")]
    Api { status: StatusCode, detail: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Thin reqwest wrapper around the two endpoints the proxy forwards to.
#[derive(Clone)]
pub struct XApiClient {
    http: reqwest::Client,
    base_url: String,
    bearer_token: String,
}

impl XApiClient {
    pub fn new(base_url: &str, bearer_token: &str) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("trendwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token: bearer_token.to_string(),
        })
    }

    /// `GET /2/tweets/search/recent`.
    pub async fn search_recent(
        &self,
        params: &[(&str, String)],
    ) -> Result<RecentSearchResponse, UpstreamError> {
        self.get_json(SEARCH_PATH, params).await
    }

    /// `GET /2/tweets/counts/recent`. Returned as raw JSON; the proxy
    /// passes the payload through unchanged.
    pub async fn recent_counts(&self, params: &[(&str, String)]) -> Result<Value, UpstreamError> {
        self.get_json(COUNTS_PATH, params).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(path, "forwarding request to X API");

        let response = self
            .http
            .get(&url)
            .query(params)
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let reset = response
                .headers()
                .get("x-rate-limit-reset")
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            return Err(UpstreamError::RateLimited { reset });
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(UpstreamError::Auth { status });
        }

        // Best-effort detail extraction; the v2 error payload carries a
        // human-readable `detail` field.
        let detail = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_owned))
            .unwrap_or_else(|| format!("upstream returned {status}"));
        Err(UpstreamError::Api { status, detail })
    }
}

// -- Serde types for the recent search response --

#[derive(Debug, Deserialize)]
pub struct RecentSearchResponse {
    #[serde(default)]
    pub data: Vec<ApiTweet>,
    pub includes: Option<ApiIncludes>,
    pub meta: Option<ApiSearchMeta>,
}

#[derive(Debug, Deserialize)]
pub struct ApiTweet {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_id: String,
    #[serde(default)]
    pub public_metrics: ApiTweetMetrics,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiTweetMetrics {
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub quote_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct ApiIncludes {
    #[serde(default)]
    pub users: Vec<ApiUser>,
}

#[derive(Debug, Deserialize)]
pub struct ApiUser {
    pub id: String,
    pub name: String,
    pub username: String,
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiSearchMeta {
    pub next_token: Option<String>,
}
