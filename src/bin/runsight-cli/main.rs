// ABOUTME: Runsight CLI - authorize against Strava, refresh the activity cache, print report tables
// ABOUTME: Thin clap wrapper over the library; rendering stays plain text or JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight
//!
//! Usage:
//! ```bash
//! # Print the authorization URL, then exchange the code from the redirect
//! runsight-cli auth url
//! runsight-cli auth exchange --code <code>
//!
//! # Mirror new activities and streams into the cache
//! runsight-cli refresh
//!
//! # Aggregate the cached data
//! runsight-cli report volume --granularity week
//! runsight-cli report zones --granularity month
//! runsight-cli report best --min-speed 3.5 --max-speed 4.2 --metric duration
//! runsight-cli report progress --target-km 2200 --start 2025-01-01 --end 2025-12-31
//! ```

mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use runsight::analytics::{EffortMetric, Granularity};
use runsight::config::Config;
use runsight::errors::AppResult;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "runsight-cli",
    about = "Personal running analytics over Strava data",
    long_about = "Mirrors Strava activities and telemetry into a local CSV cache and derives speed-zone training aggregates."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Cache directory override
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Strava OAuth helpers
    Auth {
        #[command(subcommand)]
        action: AuthCommand,
    },

    /// Fetch new activities and telemetry streams into the cache
    Refresh,

    /// Aggregate the cached data into report tables
    Report {
        #[command(subcommand)]
        action: ReportCommand,
    },
}

#[derive(Subcommand)]
enum AuthCommand {
    /// Print the authorization URL to open in a browser
    Url {
        /// Redirect URI registered with the Strava application
        #[arg(long, default_value = "http://127.0.0.1:5000/authorization")]
        redirect_uri: String,
    },

    /// Exchange an authorization code for tokens
    Exchange {
        /// Code from the redirect URL query string
        #[arg(long)]
        code: String,
    },

    /// Refresh an access token
    Refresh {
        /// Refresh token (defaults to STRAVA_REFRESH_TOKEN)
        #[arg(long)]
        refresh_token: Option<String>,
    },
}

#[derive(Subcommand)]
enum ReportCommand {
    /// Training volume per time bucket
    Volume {
        /// Bucket granularity: day|week|month|quarter|year
        #[arg(long, default_value = "week")]
        granularity: Granularity,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Time in each speed zone per time bucket
    Zones {
        /// Bucket granularity: day|week|month|quarter|year
        #[arg(long, default_value = "week")]
        granularity: Granularity,

        /// Materialize zero rows for unobserved (bucket, zone) pairs
        #[arg(long)]
        dense: bool,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Top buckets by effort inside a speed band
    Best {
        /// Bucket granularity: day|week|month|quarter|year
        #[arg(long, default_value = "week")]
        granularity: Granularity,

        /// Lower speed bound in m/s (inclusive)
        #[arg(long)]
        min_speed: f64,

        /// Upper speed bound in m/s (inclusive)
        #[arg(long)]
        max_speed: f64,

        /// Ranking metric: distance|duration
        #[arg(long, default_value = "duration")]
        metric: EffortMetric,

        /// Number of buckets to keep
        #[arg(long, default_value = "25")]
        top: usize,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Smoothed speed/heart-rate profile of one activity
    Activity {
        /// Activity id (defaults to the most recent activity)
        #[arg(long)]
        id: Option<u64>,

        /// Rolling-mean window in samples
        #[arg(long, default_value = "10")]
        smooth: usize,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Cumulative realized-vs-target distance (burn-up)
    Progress {
        /// Total target distance in kilometers
        #[arg(long)]
        target_km: f64,

        /// First day of the plan (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Last day of the plan (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,

        /// Excluded sub-range, `YYYY-MM-DD..YYYY-MM-DD` (repeatable)
        #[arg(long = "exclude")]
        exclusions: Vec<String>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    let mut config = Config::from_env();
    if let Some(cache_dir) = cli.cache_dir {
        config.cache_dir = cache_dir;
    }
    config.validate()?;

    match cli.command {
        Command::Auth { action } => match action {
            AuthCommand::Url { redirect_uri } => commands::auth::url(&config, &redirect_uri)?,
            AuthCommand::Exchange { code } => commands::auth::exchange(&config, &code).await?,
            AuthCommand::Refresh { refresh_token } => {
                commands::auth::refresh(&config, refresh_token).await?;
            }
        },
        Command::Refresh => commands::refresh::run(&config).await?,
        Command::Report { action } => match action {
            ReportCommand::Volume { granularity, json } => {
                commands::report::volume(&config, granularity, json)?;
            }
            ReportCommand::Zones {
                granularity,
                dense,
                json,
            } => commands::report::zones(&config, granularity, dense, json)?,
            ReportCommand::Best {
                granularity,
                min_speed,
                max_speed,
                metric,
                top,
                json,
            } => commands::report::best(&config, granularity, min_speed, max_speed, metric, top, json)?,
            ReportCommand::Activity { id, smooth, json } => {
                commands::report::activity(&config, id, smooth, json)?;
            }
            ReportCommand::Progress {
                target_km,
                start,
                end,
                exclusions,
                json,
            } => commands::report::progress(&config, target_km, start, end, &exclusions, json)?,
        },
    }

    Ok(())
}
