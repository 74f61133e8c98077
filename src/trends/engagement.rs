// Engagement-weighted post ranking.
//
// Reposts weigh heaviest (each one puts the post in front of a new audience),
// quotes a bit more than likes and replies.

use crate::model::{Post, PostMetrics};

/// Default number of notable posts to surface per topic.
pub const DEFAULT_NOTABLE_COUNT: usize = 5;

/// Weighted engagement score: `likes + 2·reposts + 1.5·quotes + replies`.
pub fn engagement_score(metrics: &PostMetrics) -> f64 {
    metrics.like_count as f64
        + metrics.retweet_count as f64 * 2.0
        + metrics.quote_count as f64 * 1.5
        + metrics.reply_count as f64
}

/// Top `k` posts by descending engagement score.
///
/// The sort is stable, so posts with equal scores keep their input order.
/// `k` larger than the input returns everything; `k == 0` returns nothing.
/// The input is left untouched.
pub fn notable_posts(posts: &[Post], k: usize) -> Vec<Post> {
    let mut ranked: Vec<&Post> = posts.iter().collect();
    ranked.sort_by(|a, b| {
        engagement_score(&b.public_metrics).total_cmp(&engagement_score(&a.public_metrics))
    });
    ranked.into_iter().take(k).cloned().collect()
}
