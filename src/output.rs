// Terminal rendering for topics — the sparkline chart and notable-post feed
// that stand in for the browser dashboard.

use colored::Colorize;

use crate::model::Topic;
use crate::trends::{engagement_score, format_day};

const SPARK_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Widest the sparkline gets before adjacent buckets are merged.
const MAX_CHART_WIDTH: usize = 60;

/// Render one topic: header, trend sparkline, and its notable posts.
pub fn display_topic(topic: &Topic) {
    println!(
        "\n{}  {}",
        format!("=== {} ===", topic.name).bold(),
        format!("({})", topic.keywords.join(", ")).dimmed()
    );

    if let Some(status) = &topic.api_status {
        if let Some(error) = &status.error {
            println!("  {} {}", "!".red().bold(), error.red());
        }
        if let Some(reset) = &status.reset_time {
            println!("  {}", format!("rate limit resets at {reset}").dimmed());
        }
    }

    if topic.trend.is_empty() {
        println!("  no trend data");
    } else {
        let counts: Vec<u64> = topic.trend.iter().map(|p| p.count).collect();
        let total: u64 = counts.iter().sum();
        let peak = counts.iter().copied().max().unwrap_or(0);

        println!("  {}", sparkline(&counts));
        println!(
            "  {}",
            format!(
                "{} – {}  ·  {total} posts, peak {peak}/bucket",
                format_day(&topic.trend[0].timestamp),
                format_day(&topic.trend[topic.trend.len() - 1].timestamp),
            )
            .dimmed()
        );
    }

    if !topic.notable_posts.is_empty() {
        println!("\n  {}", "Notable posts".bold());
        for (i, post) in topic.notable_posts.iter().enumerate() {
            let score = engagement_score(&post.public_metrics);
            println!(
                "  {:>2}. {} {} — {}",
                i + 1,
                format!("@{}", post.author.username).cyan(),
                format!("[{score:.1}]").yellow(),
                format_day(&post.created_at).dimmed(),
            );
            println!("      {}", truncate_chars(&post.text, 120));
        }
    }

    println!(
        "  {}",
        format!("updated {}", topic.last_updated.format("%H:%M:%S UTC")).dimmed()
    );
}

/// Scale counts onto block glyphs, merging adjacent buckets when the series
/// is wider than the chart.
fn sparkline(counts: &[u64]) -> String {
    let bucketed = rebucket(counts, MAX_CHART_WIDTH);
    let max = bucketed.iter().copied().max().unwrap_or(0).max(1);
    bucketed
        .iter()
        .map(|&count| {
            let idx = (count * (SPARK_GLYPHS.len() as u64 - 1) + max / 2) / max;
            SPARK_GLYPHS[idx as usize]
        })
        .collect()
}

fn rebucket(counts: &[u64], width: usize) -> Vec<u64> {
    if counts.len() <= width {
        return counts.to_vec();
    }
    let chunk = counts.len().div_ceil(width);
    counts.chunks(chunk).map(|c| c.iter().sum()).collect()
}

/// Truncate to at most `max_chars` characters, appending "..." if truncated.
///
/// Counts chars rather than slicing bytes so multi-byte text never panics.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}
