// ABOUTME: Bulk fetch-and-cache refresh flow against a fitness provider
// ABOUTME: Streams are written per activity as fetched; the activities index is written last
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

use chrono::NaiveTime;
use tracing::{info, warn};

use super::csv_store::CsvStore;
use crate::config::Config;
use crate::constants::strava_api;
use crate::errors::AppResult;
use crate::models::Activity;
use crate::providers::FitnessProvider;

/// Outcome of one refresh pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Run activities the provider reported in the configured window
    pub total_activities: usize,
    /// Activities whose streams were already cached
    pub already_cached: usize,
    /// Stream sets downloaded this pass
    pub downloaded: usize,
    /// Activities still missing streams (over the per-pass download limit)
    pub remaining: usize,
}

/// Fetch activities and missing telemetry streams into the flat-file cache.
///
/// The flow is sequential and blocking: list, split into cached vs missing,
/// download at most `config.download_limit` missing stream sets (writing each
/// `<id>.csv` as it arrives), then rewrite `activities.csv` last so the index
/// only ever references stream files that exist. An error mid-loop (rate
/// limit, network) aborts the pass but keeps everything already written;
/// rerunning picks up where it left off.
///
/// # Errors
///
/// Propagates provider errors (`ExternalRateLimited`, `ExternalServiceError`,
/// `ExternalAuthFailed`) and `StorageError` from cache writes
pub async fn update_cache(
    provider: &dyn FitnessProvider,
    store: &CsvStore,
    config: &Config,
) -> AppResult<RefreshReport> {
    store.ensure_dir()?;

    let after = config
        .first_activity_date
        .and_time(NaiveTime::MIN)
        .and_utc();

    info!(
        "Listing {} activities since {} from {}",
        config.run_sport_types.join("/"),
        config.first_activity_date,
        provider.provider_name()
    );
    let activities: Vec<Activity> = provider
        .list_activities(after)
        .await?
        .into_iter()
        .filter(|a| {
            config
                .run_sport_types
                .iter()
                .any(|t| t == a.sport_type.as_str())
        })
        .collect();

    info!("Found {} activities total", activities.len());

    let (cached, mut to_download): (Vec<Activity>, Vec<Activity>) = activities
        .into_iter()
        .partition(|a| store.has_streams(a.id));

    let total_activities = cached.len() + to_download.len();
    let already_cached = cached.len();
    info!("{already_cached} already in cache");

    let mut remaining = 0;
    if to_download.len() > config.download_limit {
        remaining = to_download.len() - config.download_limit;
        warn!(
            "{} stream sets missing, downloading the first {}; rerun refresh for the rest",
            to_download.len(),
            config.download_limit
        );
        to_download.truncate(config.download_limit);
    }

    for activity in &to_download {
        info!(
            "Downloading streams for {} ({} on {})",
            activity.id,
            activity.name,
            activity.start_date.date_naive()
        );
        let streams = provider
            .get_streams(activity.id, strava_api::STREAM_TYPES)
            .await?;
        store.write_streams(activity.id, &streams.to_samples())?;
    }
    let downloaded = to_download.len();

    // Index goes last: every activity it lists has its stream file on disk.
    let mut indexed = cached;
    indexed.extend(to_download);
    store.write_activities(&indexed)?;

    info!("Downloaded {downloaded} stream sets, {remaining} left for later passes");
    Ok(RefreshReport {
        total_activities,
        already_cached,
        downloaded,
        remaining,
    })
}
