// Day-bucket aggregation of post timestamps.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};

use crate::model::{Post, TrendPoint};

/// Count posts per UTC calendar day.
///
/// Returns one point per distinct day present in the input, ascending by
/// day, with each timestamp pinned to midnight UTC. Input order is
/// irrelevant; empty input yields an empty trend.
pub fn daily_trend(posts: &[Post]) -> Vec<TrendPoint> {
    let mut by_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for post in posts {
        *by_day.entry(post.created_at.date_naive()).or_insert(0) += 1;
    }

    by_day
        .into_iter()
        .map(|(day, count)| TrendPoint {
            timestamp: day.and_time(NaiveTime::MIN).and_utc(),
            count,
        })
        .collect()
}
