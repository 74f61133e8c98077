// POST /api/search/counts — forward a counts query and return the upstream
// payload unchanged. Time bounds and continuation tokens pass through
// verbatim.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use crate::model::Granularity;
use crate::web::{api_error, upstream_error, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountsRequest {
    #[serde(default)]
    pub keywords: Vec<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub next_token: Option<String>,
    pub granularity: Option<Granularity>,
}

pub async fn search_counts(
    State(state): State<AppState>,
    Json(request): Json<CountsRequest>,
) -> Response {
    if request.keywords.is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "No keywords provided");
    }

    let query = request.keywords.join(" OR ");
    let granularity = request.granularity.unwrap_or(Granularity::Hour);
    debug!(query = %query, granularity = %granularity, "fetching recent counts");

    let mut params: Vec<(&str, String)> = vec![
        ("query", query),
        ("granularity", granularity.to_string()),
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

    match state.xapi.recent_counts(&params).await {
        Ok(payload) => Json(payload).into_response(),
        Err(err) => upstream_error(err, "tweet counts"),
    }
}
