// Proxy-facing HTTP API: the trait seam the search client talks through,
// the reqwest implementation, and the typed errors both share.

use async_trait::async_trait;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::CountsQuery;
use crate::model::{SearchOptions, SearchResponse, TrendPoint};

/// Errors surfaced by the search flow. Rate limiting and authentication
/// failures are distinct so the presentation layer can phrase them
/// differently; everything else is terminal and generic. Nothing is retried.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("X API rate limit exceeded; try again later")]
    RateLimited { reset: Option<String> },
    #[error("authentication with the X API failed: {message}")]
    Auth { message: String },
    #[error("search request failed ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("counts pagination did not terminate within {pages} pages")]
    PaginationExhausted { pages: usize },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// One page of trend counts.
#[derive(Debug, Clone)]
pub struct CountsPage {
    pub points: Vec<TrendPoint>,
    pub next_token: Option<String>,
    pub total_count: Option<u64>,
}

/// Source of trend counts. The production implementation calls the proxy
/// over HTTP; tests script their own.
#[async_trait]
pub trait TrendsApi: Send + Sync {
    async fn search_counts(
        &self,
        keywords: &[String],
        query: &CountsQuery,
    ) -> Result<CountsPage, SearchError>;
}

/// HTTP client for the proxy service.
#[derive(Clone)]
pub struct ProxyClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("trendwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `POST /api/search` — recent posts matching the keywords, reshaped by
    /// the proxy, for engagement ranking.
    pub async fn search_posts(
        &self,
        keywords: &[String],
        options: &SearchOptions,
    ) -> Result<SearchResponse, SearchError> {
        let body = SearchBody {
            keywords,
            max_results: options.max_results,
            start_time: options.start_time.map(iso_millis),
            end_time: options.end_time.map(iso_millis),
            next_token: options.next_token.as_deref(),
        };

        debug!(keywords = keywords.len(), "searching posts via proxy");
        let response = self
            .http
            .post(format!("{}/search", self.base_url))
            .json(&body)
            .send()
            .await?;
        read_json(response).await
    }
}

#[async_trait]
impl TrendsApi for ProxyClient {
    async fn search_counts(
        &self,
        keywords: &[String],
        query: &CountsQuery,
    ) -> Result<CountsPage, SearchError> {
        let body = CountsBody {
            keywords,
            start_time: iso_millis(query.start_time),
            end_time: query.end_time.map(iso_millis),
            next_token: query.next_token.as_deref(),
            granularity: query.granularity,
        };

        debug!(
            keywords = keywords.len(),
            token = ?query.next_token,
            "fetching counts page via proxy"
        );
        let response = self
            .http
            .post(format!("{}/search/counts", self.base_url))
            .json(&body)
            .send()
            .await?;
        let counts: CountsResponse = read_json(response).await?;

        Ok(CountsPage {
            points: counts
                .data
                .into_iter()
                .map(|bucket| TrendPoint {
                    timestamp: bucket.start,
                    count: bucket.tweet_count,
                })
                .collect(),
            next_token: counts.meta.next_token,
            total_count: counts.meta.total_tweet_count,
        })
    }
}

fn iso_millis(ts: chrono::DateTime<chrono::Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Deserialize a successful response, or map the proxy's error body onto a
/// typed `SearchError`.
async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, SearchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body: ErrorBody = response.json().await.unwrap_or_default();
    match status.as_u16() {
        429 => Err(SearchError::RateLimited {
            reset: body.reset_time,
        }),
        401 | 403 => Err(SearchError::Auth {
            message: body.error,
        }),
        code => Err(SearchError::Api {
            status: code,
            message: body.details.unwrap_or(body.error),
        }),
    }
}

// -- Request/response wire shapes (camelCase, matching the proxy) --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchBody<'a> {
    keywords: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_token: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CountsBody<'a> {
    keywords: &'a [String],
    start_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_token: Option<&'a str>,
    granularity: crate::model::Granularity,
}

#[derive(Deserialize)]
struct CountsResponse {
    #[serde(default)]
    data: Vec<CountBucket>,
    #[serde(default)]
    meta: CountsMeta,
}

#[derive(Deserialize)]
struct CountBucket {
    start: chrono::DateTime<chrono::Utc>,
    tweet_count: u64,
}

#[derive(Default, Deserialize)]
struct CountsMeta {
    total_tweet_count: Option<u64>,
    next_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(rename = "resetTime")]
    reset_time: Option<String>,
    details: Option<String>,
}
