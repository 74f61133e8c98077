// Proxy server — Axum backend that shields the X API credential from the
// browser and normalizes the wire format.
//
// Two JSON routes under /api plus a health check. CORS admits only
// local-development origins; requests without an Origin header (curl and
// friends) are not CORS requests and pass untouched.

use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::xapi::{UpstreamError, XApiClient};

pub mod auth;
pub mod handlers;

/// Shared application state threaded through all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub xapi: XApiClient,
}

/// Start the proxy server and block until it exits.
pub async fn run_server(config: Config, port: u16, bind: &str) -> Result<()> {
    let xapi = XApiClient::new(&config.upstream_api_url, &config.bearer_token)?;
    let state = AppState {
        config: Arc::new(config),
        xapi,
    };

    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("trendwatch proxy listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    // API routes refuse to run without an upstream credential.
    let api = Router::new()
        .route("/api/search", post(handlers::search::search_posts))
        .route("/api/search/counts", post(handlers::counts::search_counts))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    Router::new()
        .merge(api)
        .route("/health", get(health))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            |origin: &HeaderValue, _request: &axum::http::request::Parts| {
                origin.to_str().is_ok_and(is_dev_origin)
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Local-development origins only; everything else gets no CORS approval.
fn is_dev_origin(origin: &str) -> bool {
    origin.starts_with("http://localhost:") || origin.starts_with("http://127.0.0.1:")
}

/// Health check — always 200.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}

/// Map an upstream failure onto the response the browser sees. `what` names
/// the resource for the generic-failure message ("tweets", "tweet counts").
pub fn upstream_error(err: UpstreamError, what: &str) -> Response {
    match err {
        UpstreamError::RateLimited { reset } => {
            let mut body = serde_json::json!({
                "error": "X API rate limit exceeded. Please try again later."
            });
            if let Some(reset) = reset {
                body["resetTime"] = serde_json::Value::String(reset);
            }
            (StatusCode::TOO_MANY_REQUESTS, axum::Json(body)).into_response()
        }
        UpstreamError::Auth { status } => api_error(
            status,
            "Authentication error with X API. Please check your API key.",
        ),
        UpstreamError::Api { detail, .. } => error_with_details(what, &detail),
        UpstreamError::Transport(err) => error_with_details(what, &err.to_string()),
    }
}

fn error_with_details(what: &str, details: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(serde_json::json!({
            "error": format!("Error fetching {what} from X API"),
            "details": details,
        })),
    )
        .into_response()
}
