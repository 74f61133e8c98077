// Search-client behavior against a scripted counts API: pagination order
// and bounds, cache hits and expiry, and the synthetic fallback rules.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use trendwatch::model::{Granularity, SearchOptions, TrendPoint};
use trendwatch::search::api::{CountsPage, SearchError, TrendsApi};
use trendwatch::search::cache::CountsCache;
use trendwatch::search::synthetic::SyntheticTrends;
use trendwatch::search::{CountsQuery, SearchClient, MAX_COUNT_PAGES};

/// Serves a fixed script of pages (or errors) and records what was asked.
struct ScriptedApi {
    pages: Mutex<Vec<Result<CountsPage, SearchError>>>,
    calls: AtomicUsize,
    tokens_seen: Mutex<Vec<Option<String>>>,
}

impl ScriptedApi {
    fn new(pages: Vec<Result<CountsPage, SearchError>>) -> Arc<Self> {
        Arc::new(Self {
            pages: Mutex::new(pages),
            calls: AtomicUsize::new(0),
            tokens_seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tokens_seen(&self) -> Vec<Option<String>> {
        self.tokens_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl TrendsApi for ScriptedApi {
    async fn search_counts(
        &self,
        _keywords: &[String],
        query: &CountsQuery,
    ) -> Result<CountsPage, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tokens_seen
            .lock()
            .unwrap()
            .push(query.next_token.clone());

        let mut pages = self.pages.lock().unwrap();
        if pages.is_empty() {
            return Ok(CountsPage {
                points: Vec::new(),
                next_token: None,
                total_count: None,
            });
        }
        pages.remove(0)
    }
}

fn hourly_points(start_hour: i64, n: usize) -> Vec<TrendPoint> {
    let base = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| TrendPoint {
            timestamp: base + chrono::Duration::hours(start_hour + i as i64),
            count: (start_hour as u64) + i as u64 + 1,
        })
        .collect()
}

fn page(points: Vec<TrendPoint>, next: Option<&str>) -> Result<CountsPage, SearchError> {
    Ok(CountsPage {
        points,
        next_token: next.map(str::to_string),
        total_count: None,
    })
}

/// Explicit time bounds so cache keys are identical across calls.
fn pinned_options(granularity: Granularity) -> SearchOptions {
    SearchOptions {
        start_time: Some(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()),
        end_time: Some(Utc.with_ymd_and_hms(2026, 3, 8, 0, 0, 0).unwrap()),
        granularity: Some(granularity),
        ..SearchOptions::default()
    }
}

fn keywords() -> Vec<String> {
    vec!["climate crisis".to_string(), "global warming".to_string()]
}

#[tokio::test]
async fn three_pages_merge_in_receipt_order() {
    let api = ScriptedApi::new(vec![
        page(hourly_points(0, 5), Some("A")),
        page(hourly_points(5, 5), Some("B")),
        page(hourly_points(10, 5), None),
    ]);
    let client = SearchClient::new(api.clone(), CountsCache::new());

    let points = client
        .fetch_all_counts(&keywords(), &pinned_options(Granularity::Hour))
        .await
        .unwrap();

    assert_eq!(points.len(), 15);
    assert_eq!(api.calls(), 3, "one request per page, nothing extra");
    assert_eq!(
        api.tokens_seen(),
        vec![None, Some("A".to_string()), Some("B".to_string())],
        "each follow-up must carry the previous page's token"
    );
    assert!(
        points.windows(2).all(|w| w[0].timestamp < w[1].timestamp),
        "merged points must ascend across page boundaries"
    );
}

#[tokio::test]
async fn pagination_stops_at_the_page_cap() {
    // Every page advertises another page; the chain never terminates.
    let pages = (0..MAX_COUNT_PAGES + 5)
        .map(|i| page(hourly_points(i as i64, 1), Some("more")))
        .collect();
    let api = ScriptedApi::new(pages);
    let client = SearchClient::new(api.clone(), CountsCache::new());

    let err = client
        .fetch_all_counts(&keywords(), &pinned_options(Granularity::Hour))
        .await
        .unwrap_err();

    match err {
        SearchError::PaginationExhausted { pages } => assert_eq!(pages, MAX_COUNT_PAGES),
        other => panic!("expected PaginationExhausted, got {other}"),
    }
    assert_eq!(api.calls(), MAX_COUNT_PAGES);
}

#[tokio::test]
async fn identical_queries_within_ttl_skip_the_network() {
    let api = ScriptedApi::new(vec![
        page(hourly_points(0, 3), None),
        page(hourly_points(0, 3), None),
    ]);
    let client = SearchClient::new(api.clone(), CountsCache::new());
    let options = pinned_options(Granularity::Hour);

    let first = client.fetch_all_counts(&keywords(), &options).await.unwrap();
    let second = client.fetch_all_counts(&keywords(), &options).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(api.calls(), 1, "second call must be served from cache");
}

#[tokio::test]
async fn expired_cache_entries_trigger_a_refetch() {
    let api = ScriptedApi::new(vec![
        page(hourly_points(0, 3), None),
        page(hourly_points(0, 3), None),
    ]);
    let client = SearchClient::new(api.clone(), CountsCache::with_ttl(Duration::ZERO));
    let options = pinned_options(Granularity::Hour);

    client.fetch_all_counts(&keywords(), &options).await.unwrap();
    client.fetch_all_counts(&keywords(), &options).await.unwrap();

    assert_eq!(api.calls(), 2, "expired entries count as misses");
}

#[tokio::test]
async fn different_options_do_not_share_cache_entries() {
    let api = ScriptedApi::new(vec![
        page(hourly_points(0, 3), None),
        page(hourly_points(0, 1), None),
    ]);
    let client = SearchClient::new(api.clone(), CountsCache::new());

    client
        .fetch_all_counts(&keywords(), &pinned_options(Granularity::Hour))
        .await
        .unwrap();
    client
        .fetch_all_counts(&keywords(), &pinned_options(Granularity::Day))
        .await
        .unwrap();

    assert_eq!(api.calls(), 2);
}

#[tokio::test]
async fn errors_propagate_when_no_fallback_is_configured() {
    let api = ScriptedApi::new(vec![Err(SearchError::Api {
        status: 500,
        message: "boom".into(),
    })]);
    let client = SearchClient::new(api.clone(), CountsCache::new());

    let err = client
        .fetch_all_counts(&keywords(), &pinned_options(Granularity::Hour))
        .await
        .unwrap_err();

    match err {
        SearchError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Api error, got {other}"),
    }
}

#[tokio::test]
async fn rate_limit_errors_carry_the_reset_hint() {
    let api = ScriptedApi::new(vec![Err(SearchError::RateLimited {
        reset: Some("1767225600".into()),
    })]);
    let client = SearchClient::new(api.clone(), CountsCache::new());

    let err = client
        .search_counts(&keywords(), &pinned_options(Granularity::Hour))
        .await
        .unwrap_err();

    match err {
        SearchError::RateLimited { reset } => {
            assert_eq!(reset.as_deref(), Some("1767225600"));
        }
        other => panic!("expected RateLimited, got {other}"),
    }
}

#[tokio::test]
async fn fallback_masks_failures_with_a_synthetic_week() {
    let api = ScriptedApi::new(vec![Err(SearchError::Api {
        status: 500,
        message: "upstream down".into(),
    })]);
    let client = SearchClient::new(api.clone(), CountsCache::new())
        .with_fallback(SyntheticTrends::new(7));

    let points = client
        .fetch_all_counts(&keywords(), &pinned_options(Granularity::Hour))
        .await
        .unwrap();

    assert_eq!(api.calls(), 1, "the failed request is not retried");
    assert_eq!(points.len(), 168, "7 days of hourly points");
    assert!(points.iter().all(|p| p.count >= 100 && p.count < 1100));
    assert!(points.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}

#[tokio::test]
async fn fallback_is_not_consulted_on_success() {
    let real = hourly_points(0, 4);
    let api = ScriptedApi::new(vec![page(real.clone(), None)]);
    let client = SearchClient::new(api.clone(), CountsCache::new())
        .with_fallback(SyntheticTrends::new(7));

    let points = client
        .fetch_all_counts(&keywords(), &pinned_options(Granularity::Hour))
        .await
        .unwrap();

    assert_eq!(points, real);
}
