// Pure transforms over fetched posts and counts. No I/O here: everything
// takes records in and hands records back, so the presentation layer and the
// tests can drive these directly.

pub mod aggregate;
pub mod engagement;

pub use aggregate::daily_trend;
pub use engagement::{engagement_score, notable_posts, DEFAULT_NOTABLE_COUNT};

use chrono::{DateTime, Utc};

/// Format a timestamp as a short human-readable date ("Mar 5, 2026") for
/// chart labels and post bylines.
pub fn format_day(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%b %-d, %Y").to_string()
}
