// Shared data model — the records that flow between the proxy, the search
// client, and the pure aggregation functions.
//
// Field names match the proxy's JSON wire format (which in turn mirrors the
// X API v2 shapes), so these types serialize directly on both halves.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Avatar substituted when a post's author is missing from the response's
/// included-users list.
pub const DEFAULT_AVATAR_URL: &str =
    "https://abs.twimg.com/sticky/default_profile_images/default_profile_normal.png";

/// A single post with embedded author and engagement metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub public_metrics: PostMetrics,
    pub author: Author,
}

/// Engagement counters attached to a post. Absent counters read as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostMetrics {
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub quote_count: u64,
}

/// Post author, denormalized into every post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub username: String,
    pub profile_image_url: String,
}

impl Author {
    /// Sentinel author used when the author expansion has no entry for a
    /// post's author id.
    pub fn placeholder(author_id: &str) -> Self {
        Self {
            id: author_id.to_string(),
            name: "Unknown User".to_string(),
            username: "unknown".to_string(),
            profile_image_url: DEFAULT_AVATAR_URL.to_string(),
        }
    }
}

/// One observed bucket of matching-post counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub count: u64,
}

/// Bucket width for the counts endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Minute,
    Hour,
    Day,
}

impl Granularity {
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Minute => "minute",
            Granularity::Hour => "hour",
            Granularity::Day => "day",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minute" => Ok(Granularity::Minute),
            "hour" => Ok(Granularity::Hour),
            "day" => Ok(Granularity::Day),
            other => Err(format!(
                "unknown granularity '{other}' (expected minute, hour, or day)"
            )),
        }
    }
}

/// Per-request search parameters. Everything is optional; the search client
/// fills in defaults before building a request.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Result cap for post searches, clamped to 10-100 by the proxy.
    pub max_results: Option<u32>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub next_token: Option<String>,
    pub granularity: Option<Granularity>,
}

/// Snapshot of upstream API health attached to a topic after a fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiStatus {
    pub remaining_requests: Option<u32>,
    pub reset_time: Option<String>,
    pub error: Option<String>,
}

/// A user-defined named search and its fetched results. Topics live in an
/// in-memory session list and are never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    pub keywords: Vec<String>,
    pub trend: Vec<TrendPoint>,
    pub notable_posts: Vec<Post>,
    pub last_updated: DateTime<Utc>,
    pub api_status: Option<ApiStatus>,
}

/// Response shape of `POST /api/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tweets: Vec<Post>,
    pub meta: SearchMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMeta {
    pub result_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_author_keeps_the_post_author_id() {
        let author = Author::placeholder("12345");
        assert_eq!(author.id, "12345");
        assert_eq!(author.name, "Unknown User");
        assert_eq!(author.username, "unknown");
        assert_eq!(author.profile_image_url, DEFAULT_AVATAR_URL);
    }

    #[test]
    fn granularity_round_trips_through_str() {
        for g in [Granularity::Minute, Granularity::Hour, Granularity::Day] {
            assert_eq!(g.as_str().parse::<Granularity>(), Ok(g));
        }
        assert!("weekly".parse::<Granularity>().is_err());
    }

    #[test]
    fn granularity_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Granularity::Hour).unwrap(),
            "\"hour\""
        );
    }

    #[test]
    fn post_metrics_default_to_zero_when_absent() {
        let metrics: PostMetrics = serde_json::from_str("{\"like_count\": 3}").unwrap();
        assert_eq!(metrics.like_count, 3);
        assert_eq!(metrics.retweet_count, 0);
        assert_eq!(metrics.reply_count, 0);
        assert_eq!(metrics.quote_count, 0);
    }
}
