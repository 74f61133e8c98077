// POST /api/search — forward a keyword search to the recent-search endpoint
// and reshape the response into the app's Post records.
//
// The upstream response splits posts and authors; we join them here and
// substitute a placeholder author for any post whose author is missing from
// the expansion.

use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use crate::model::{Author, Post, PostMetrics, SearchMeta, SearchResponse, DEFAULT_AVATAR_URL};
use crate::web::{api_error, upstream_error, AppState};
use crate::xapi::{ApiUser, RecentSearchResponse, MAX_RESULTS_CAP, MIN_RESULTS};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub keywords: Vec<String>,
    pub max_results: Option<u32>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub next_token: Option<String>,
}

pub async fn search_posts(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Response {
    if request.keywords.is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "No keywords provided");
    }

    let query = request.keywords.join(" OR ");
    let max_results = request
        .max_results
        .unwrap_or(MAX_RESULTS_CAP)
        .clamp(MIN_RESULTS, MAX_RESULTS_CAP);
    debug!(query = %query, max_results, "searching recent posts");

    let mut params: Vec<(&str, String)> = vec![
        ("query", query),
        ("max_results", max_results.to_string()),
        ("tweet.fields", "created_at,public_metrics,author_id".to_string()),
        ("user.fields", "name,username,profile_image_url".to_string()),
        ("expansions", "author_id".to_string()),
    ];
    if let Some(start) = request.start_time {
        params.push(("start_time", start));
    }
    if let Some(end) = request.end_time {
        params.push(("end_time", end));
    }
    if let Some(token) = request.next_token {
        params.push(("next_token", token));
    }

    let RecentSearchResponse {
        data,
        includes,
        meta,
    } = match state.xapi.search_recent(&params).await {
        Ok(response) => response,
        Err(err) => return upstream_error(err, "tweets"),
    };

    // Author lookup from the expanded users list.
    let users: HashMap<&str, &ApiUser> = includes
        .as_ref()
        .map(|inc| inc.users.iter().map(|u| (u.id.as_str(), u)).collect())
        .unwrap_or_default();

    let tweets: Vec<Post> = data
        .into_iter()
        .map(|tweet| {
            let author = match users.get(tweet.author_id.as_str()) {
                Some(user) => Author {
                    id: user.id.clone(),
                    name: user.name.clone(),
                    username: user.username.clone(),
                    profile_image_url: user
                        .profile_image_url
                        .clone()
                        .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
                },
                None => Author::placeholder(&tweet.author_id),
            };

            Post {
                id: tweet.id,
                text: tweet.text,
                created_at: tweet.created_at,
                public_metrics: PostMetrics {
                    retweet_count: tweet.public_metrics.retweet_count,
                    reply_count: tweet.public_metrics.reply_count,
                    like_count: tweet.public_metrics.like_count,
                    quote_count: tweet.public_metrics.quote_count,
                },
                author,
            }
        })
        .collect();

    debug!(count = tweets.len(), "reshaped search response");

    let meta = SearchMeta {
        result_count: tweets.len() as u64,
        next_token: meta.and_then(|m| m.next_token),
    };
    Json(SearchResponse { tweets, meta }).into_response()
}
