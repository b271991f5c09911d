//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use clap::Parser;

use grapevine::checkpoint::{self, Checkpoint};
use grapevine::source::DEFAULT_ENDPOINT;
use grapevine::{LoaderState, DEFAULT_PER_PAGE};

#[derive(Debug, Parser)]
#[command(name = "grapevine")]
#[command(about = "Watch Twitter trackbacks for a site, grouped by the page they mention")]
#[command(version)]
pub struct Cli {
    /// Domain to track (e.g. github.com)
    #[arg(long, env = "GRAPEVINE_SITE")]
    pub site: String,

    /// Results requested per search page
    #[arg(
        long,
        env = "GRAPEVINE_PER_PAGE",
        default_value_t = DEFAULT_PER_PAGE,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub per_page: u32,

    /// Ignore trackbacks at or before this time (seconds since the epoch).
    /// Overrides any checkpointed watermark.
    #[arg(long, value_name = "UNIX_SECONDS")]
    pub since: Option<i64>,

    /// Seconds between polls
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// Base URL of the search API
    #[arg(long, env = "GRAPEVINE_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Where to keep the watermark between runs
    #[arg(long, env = "GRAPEVINE_STATE_FILE")]
    pub state_file: Option<PathBuf>,

    /// Log destination while the terminal view is running
    #[arg(long, default_value = "grapevine.log")]
    pub log_file: PathBuf,

    /// Load and aggregate once, print the trackbacks and exit
    #[arg(long)]
    pub once: bool,
}

impl Cli {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Starting loader state: `--since` wins, then a checkpoint for the same
    /// site, then nothing.
    pub fn initial_state(&self, checkpoint: Option<&Checkpoint>) -> Result<LoaderState> {
        let watermark = match self.since {
            Some(secs) => Some(
                DateTime::<Utc>::from_timestamp(secs, 0)
                    .ok_or_else(|| anyhow!("--since {secs} is not a valid timestamp"))?,
            ),
            None => checkpoint::resume_watermark(checkpoint, &self.site),
        };

        Ok(LoaderState::new(self.site.clone())
            .with_per_page(self.per_page)
            .with_watermark(watermark))
    }
}
