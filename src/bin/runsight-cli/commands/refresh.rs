// ABOUTME: Cache refresh subcommand - authenticates the provider and runs the bulk fetch
// ABOUTME: Renews the access token from the refresh token when no access token is configured
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

use runsight::cache::{update_cache, CsvStore};
use runsight::config::Config;
use runsight::errors::{AppError, AppResult};
use runsight::providers::strava::{StravaConfig, StravaProvider};
use runsight::providers::{AuthData, FitnessProvider};

/// Run one refresh pass against Strava
pub async fn run(config: &Config) -> AppResult<()> {
    let mut provider = StravaProvider::new(StravaConfig::new(
        config.strava.client_id.clone(),
        config.strava.client_secret.clone(),
    ));
    provider
        .authenticate(AuthData::OAuth2 {
            access_token: config.strava.access_token.clone(),
            refresh_token: config.strava.refresh_token.clone(),
        })
        .await?;

    if config.strava.access_token.is_none() {
        if config.strava.refresh_token.is_some() {
            provider.refresh_access_token().await?;
        } else {
            return Err(AppError::auth_failed(
                "no access or refresh token configured; run `runsight-cli auth exchange` first",
            ));
        }
    }

    let store = CsvStore::new(&config.cache_dir);
    let report = update_cache(&provider, &store, config).await?;

    println!(
        "Refreshed cache at {}: {} activities total, {} already cached, {} downloaded",
        store.root().display(),
        report.total_activities,
        report.already_cached,
        report.downloaded
    );
    if report.remaining > 0 {
        println!(
            "{} stream sets still missing (per-pass limit) - run refresh again for the rest",
            report.remaining
        );
    }
    Ok(())
}
