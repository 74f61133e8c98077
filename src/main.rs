use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::ProgressBar;
use tracing::warn;

use trendwatch::config::Config;
use trendwatch::model::{ApiStatus, Granularity, SearchOptions, Topic};
use trendwatch::output;
use trendwatch::search::api::{ProxyClient, SearchError};
use trendwatch::search::cache::CountsCache;
use trendwatch::search::synthetic::SyntheticTrends;
use trendwatch::search::SearchClient;
use trendwatch::topics::TopicStore;
use trendwatch::trends::notable_posts;
use trendwatch::web;

/// Trendwatch: keyword trend monitoring for X.
///
/// Define topics as keyword sets, chart how often they're being posted
/// about, and surface the highest-engagement posts, all from the terminal.
#[derive(Parser)]
#[command(name = "trendwatch", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API proxy server
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Interface to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },

    /// Fetch and render trend data for one or more topics
    Search {
        /// Topic definition "Name=keyword1,keyword2" (repeatable)
        #[arg(long = "topic", required = true)]
        topics: Vec<String>,

        /// Bucket width: minute, hour, or day
        #[arg(long, default_value = "hour")]
        granularity: String,

        /// High-engagement posts to show per topic
        #[arg(long, default_value_t = trendwatch::trends::DEFAULT_NOTABLE_COUNT)]
        posts: usize,

        /// Posts to fetch for engagement ranking (10-100)
        #[arg(long, default_value = "50")]
        max_results: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("trendwatch=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            let port = port.unwrap_or(config.port);
            if config.bearer_token.is_empty() {
                warn!("TWITTER_BEARER_TOKEN is not set; API requests will be rejected with 401");
            }
            web::run_server(config, port, &bind).await?;
        }

        Commands::Search {
            topics,
            granularity,
            posts,
            max_results,
        } => {
            let config = Config::load()?;
            let granularity: Granularity = granularity
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;

            let proxy = ProxyClient::new(&config.api_base_url)?;
            let mut client = SearchClient::new(Arc::new(proxy.clone()), CountsCache::new());
            if config.dev_fallback {
                warn!("dev fallback enabled; failed fetches will show synthetic data");
                client = client.with_fallback(SyntheticTrends::default());
            }

            let mut store = TopicStore::new();

            for spec in &topics {
                let (name, keywords) = parse_topic_arg(spec)?;

                let spinner = ProgressBar::new_spinner();
                spinner.set_message(format!("fetching \"{name}\"..."));
                spinner.enable_steady_tick(Duration::from_millis(100));

                let options = SearchOptions {
                    granularity: Some(granularity),
                    max_results: Some(max_results),
                    ..SearchOptions::default()
                };

                let topic = fetch_topic(&client, &proxy, name, keywords, &options, posts).await;
                spinner.finish_and_clear();
                store.upsert(topic);
            }

            for topic in store.iter() {
                output::display_topic(topic);
            }
        }
    }

    Ok(())
}

/// Fetch counts and notable posts for one topic. Failures are captured in
/// the topic's api_status instead of aborting the whole run, so earlier
/// topics stay on screen.
async fn fetch_topic(
    client: &SearchClient,
    proxy: &ProxyClient,
    name: String,
    keywords: Vec<String>,
    options: &SearchOptions,
    notable_count: usize,
) -> Topic {
    let mut api_status: Option<ApiStatus> = None;

    let trend = match client.fetch_all_counts(&keywords, options).await {
        Ok(points) => points,
        Err(err) => {
            eprintln!("  {} {name}: {err}", "error:".red().bold());
            api_status = Some(status_from_error(&err));
            Vec::new()
        }
    };

    let notable = match proxy.search_posts(&keywords, options).await {
        Ok(response) => notable_posts(&response.tweets, notable_count),
        Err(err) => {
            // Counts may still have succeeded; keep the trend, note the error.
            warn!(error = %err, topic = %name, "post search failed");
            if api_status.is_none() {
                api_status = Some(status_from_error(&err));
            }
            Vec::new()
        }
    };

    Topic {
        name,
        keywords,
        trend,
        notable_posts: notable,
        last_updated: Utc::now(),
        api_status,
    }
}

fn status_from_error(err: &SearchError) -> ApiStatus {
    let reset_time = match err {
        SearchError::RateLimited { reset } => reset.clone(),
        _ => None,
    };
    ApiStatus {
        remaining_requests: None,
        reset_time,
        error: Some(err.to_string()),
    }
}

/// Parse a "Name=keyword1,keyword2" topic definition.
fn parse_topic_arg(spec: &str) -> Result<(String, Vec<String>)> {
    let Some((name, keywords)) = spec.split_once('=') else {
        bail!("invalid --topic '{spec}': expected \"Name=keyword1,keyword2\"");
    };

    let name = name.trim();
    let keywords: Vec<String> = keywords
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();

    if name.is_empty() || keywords.is_empty() {
        bail!("invalid --topic '{spec}': name and at least one keyword required");
    }
    Ok((name.to_string(), keywords))
}
