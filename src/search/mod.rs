// Search client — fetches trend counts through the proxy, transparently
// handling pagination and short-lived caching.
//
// The counts endpoint covers at most the last 7 days, so an unspecified
// start time defaults to exactly that window. Pages are fetched
// sequentially; the merged point order follows page receipt order.

pub mod api;
pub mod cache;
pub mod synthetic;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::model::{Granularity, SearchOptions, TrendPoint};
use api::{CountsPage, SearchError, TrendsApi};
use cache::CountsCache;
use synthetic::SyntheticTrends;

/// The counts endpoint's maximum lookback.
pub const MAX_LOOKBACK_DAYS: i64 = 7;

/// Upper bound on pagination. A well-behaved upstream exhausts a 7-day
/// hourly window in far fewer pages; hitting this means the token chain
/// never terminated.
pub const MAX_COUNT_PAGES: usize = 20;

/// Fully-resolved per-page query parameters. Defaults are applied once per
/// aggregation so every page (and its cache key) shares one time window.
#[derive(Debug, Clone, Serialize)]
pub struct CountsQuery {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub next_token: Option<String>,
    pub granularity: Granularity,
}

impl CountsQuery {
    pub fn resolve(options: &SearchOptions, now: DateTime<Utc>) -> Self {
        Self {
            start_time: options
                .start_time
                .unwrap_or(now - Duration::days(MAX_LOOKBACK_DAYS)),
            end_time: options.end_time,
            next_token: options.next_token.clone(),
            granularity: options.granularity.unwrap_or(Granularity::Hour),
        }
    }
}

/// Client for the trend-counts flow: cache lookup, network fetch via the
/// injected API, pagination, and an optional synthetic-data fallback.
pub struct SearchClient {
    api: Arc<dyn TrendsApi>,
    cache: CountsCache,
    fallback: Option<SyntheticTrends>,
}

impl SearchClient {
    pub fn new(api: Arc<dyn TrendsApi>, cache: CountsCache) -> Self {
        Self {
            api,
            cache,
            fallback: None,
        }
    }

    /// Mask fetch failures with synthetic data. Development only; a client
    /// built without this always propagates errors.
    pub fn with_fallback(mut self, fallback: SyntheticTrends) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Fetch a single page of counts, consulting the cache first.
    pub async fn search_counts(
        &self,
        keywords: &[String],
        options: &SearchOptions,
    ) -> Result<CountsPage, SearchError> {
        let query = CountsQuery::resolve(options, Utc::now());
        self.counts_page(keywords, &query).await
    }

    /// Fetch every page of counts for the keyword set, following next
    /// tokens until the upstream stops returning them.
    pub async fn fetch_all_counts(
        &self,
        keywords: &[String],
        options: &SearchOptions,
    ) -> Result<Vec<TrendPoint>, SearchError> {
        let mut query = CountsQuery::resolve(options, Utc::now());
        let mut all_points = Vec::new();

        for page_no in 0..MAX_COUNT_PAGES {
            let page = self.counts_page(keywords, &query).await?;
            debug!(
                page = page_no + 1,
                points = page.points.len(),
                "merged counts page"
            );
            all_points.extend(page.points);

            match page.next_token {
                Some(token) => query.next_token = Some(token),
                None => return Ok(all_points),
            }
        }

        Err(SearchError::PaginationExhausted {
            pages: MAX_COUNT_PAGES,
        })
    }

    async fn counts_page(
        &self,
        keywords: &[String],
        query: &CountsQuery,
    ) -> Result<CountsPage, SearchError> {
        let key = cache::cache_key(keywords, query);
        if let Some(page) = self.cache.lookup(&key) {
            debug!("using cached counts page");
            return Ok(page);
        }

        match self.api.search_counts(keywords, query).await {
            Ok(page) => {
                self.cache.store(key, &page);
                Ok(page)
            }
            Err(err) => {
                if let Some(fallback) = &self.fallback {
                    warn!(error = %err, "counts request failed, substituting synthetic data");
                    return Ok(CountsPage {
                        points: fallback.generate(Utc::now()),
                        next_token: None,
                        total_count: None,
                    });
                }
                Err(err)
            }
        }
    }
}
