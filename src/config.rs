use std::env;

use anyhow::{Context, Result};

/// Default proxy listen port.
pub const DEFAULT_PORT: u16 = 3001;

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file is loaded
/// automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer credential for the X API. The proxy rejects API requests with
    /// 401 until this is set; the token never reaches the browser.
    pub bearer_token: String,
    /// Port the proxy listens on (PORT, default 3001).
    pub port: u16,
    /// X API host the proxy forwards to (X_API_BASE_URL). Tests point this
    /// at a mock server.
    pub upstream_api_url: String,
    /// Base URL the search client uses to reach the proxy
    /// (TRENDWATCH_API_BASE_URL).
    pub api_base_url: String,
    /// Substitute synthetic trend data when a counts fetch fails
    /// (TRENDWATCH_DEV_FALLBACK). Development only, off by default.
    pub dev_fallback: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("invalid PORT value: {raw}"))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            bearer_token: env::var("TWITTER_BEARER_TOKEN").unwrap_or_default(),
            port,
            upstream_api_url: env::var("X_API_BASE_URL")
                .unwrap_or_else(|_| crate::xapi::DEFAULT_API_URL.to_string()),
            api_base_url: env::var("TRENDWATCH_API_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{DEFAULT_PORT}/api")),
            dev_fallback: env_flag("TRENDWATCH_DEV_FALLBACK"),
        })
    }
}

fn env_flag(name: &str) -> bool {
    matches!(env::var(name).as_deref(), Ok("1") | Ok("true") | Ok("yes"))
}
