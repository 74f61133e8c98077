// Credential gate — the proxy refuses to forward anything upstream until a
// bearer token is configured.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use super::{api_error, AppState};

/// Axum middleware: reject API requests with 401 when no upstream
/// credential is configured. Runs before any upstream contact.
pub async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if state.config.bearer_token.is_empty() {
        warn!("rejecting request: no bearer token configured");
        return api_error(
            StatusCode::UNAUTHORIZED,
            "Twitter API token not configured. Please set TWITTER_BEARER_TOKEN environment variable.",
        );
    }
    next.run(request).await
}
