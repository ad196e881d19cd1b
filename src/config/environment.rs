// ABOUTME: Environment configuration management for runtime settings
// ABOUTME: Handles environment variable parsing, defaults, and startup validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

//! Environment-based configuration management.
//!
//! Every setting reads from an environment variable with a parse-or-default
//! fallback; [`Config::validate`] is the single startup gate that rejects
//! configurations which would produce degenerate speed zones.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::warn;

use crate::constants::{defaults, units::MS_TO_KMH};
use crate::errors::{AppError, AppResult};
use crate::zones::SpeedZones;

/// Strava API credentials and tokens
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StravaApiConfig {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Current access token, if already authorized
    pub access_token: Option<String>,
    /// Refresh token for renewing expired access tokens
    pub refresh_token: Option<String>,
}

/// Application configuration, sourced from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `activities.csv` and per-activity stream files
    pub cache_dir: PathBuf,
    /// Baseline (maximal aerobic) speed in km/h
    pub baseline_speed_kmh: f64,
    /// Oldest activity start date mirrored from the provider
    pub first_activity_date: NaiveDate,
    /// Maximum stream sets downloaded per refresh pass
    pub download_limit: usize,
    /// Provider sport-type strings mirrored into the cache
    pub run_sport_types: Vec<String>,
    /// Strava API credentials
    pub strava: StravaApiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            baseline_speed_kmh: defaults::BASELINE_SPEED_KMH,
            first_activity_date: default_first_activity_date(),
            download_limit: defaults::DOWNLOAD_LIMIT,
            run_sport_types: defaults::RUN_SPORT_TYPES
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
            strava: StravaApiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to defaults; set-but-unparseable values log
    /// a warning and fall back rather than aborting, so a typo never strands
    /// the cached data. Validation of the resulting values is a separate,
    /// fatal step ([`Self::validate`]).
    pub fn from_env() -> Self {
        let defaults_config = Self::default();

        Self {
            cache_dir: env::var("RUNSIGHT_CACHE_DIR")
                .map_or(defaults_config.cache_dir, PathBuf::from),
            baseline_speed_kmh: parse_env(
                "RUNSIGHT_BASELINE_SPEED_KMH",
                defaults_config.baseline_speed_kmh,
            ),
            first_activity_date: parse_env(
                "RUNSIGHT_FIRST_ACTIVITY_DATE",
                defaults_config.first_activity_date,
            ),
            download_limit: parse_env("RUNSIGHT_DOWNLOAD_LIMIT", defaults_config.download_limit),
            run_sport_types: env::var("RUNSIGHT_SPORT_TYPES").map_or(
                defaults_config.run_sport_types,
                |raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_owned())
                        .filter(|s| !s.is_empty())
                        .collect()
                },
            ),
            strava: StravaApiConfig {
                client_id: env::var("STRAVA_CLIENT_ID").unwrap_or_default(),
                client_secret: env::var("STRAVA_CLIENT_SECRET").unwrap_or_default(),
                access_token: env::var("STRAVA_ACCESS_TOKEN").ok(),
                refresh_token: env::var("STRAVA_REFRESH_TOKEN").ok(),
            },
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` when the baseline speed is not strictly
    /// positive (the speed zones would be degenerate), when the download
    /// limit is zero, or when no sport types are configured.
    pub fn validate(&self) -> AppResult<()> {
        if self.baseline_speed_kmh.is_nan() || self.baseline_speed_kmh <= 0.0 {
            return Err(AppError::config(format!(
                "baseline speed must be positive, got {} km/h",
                self.baseline_speed_kmh
            )));
        }
        if self.download_limit == 0 {
            return Err(AppError::config("download limit must be at least 1"));
        }
        if self.run_sport_types.is_empty() {
            return Err(AppError::config("at least one sport type is required"));
        }
        Ok(())
    }

    /// Baseline speed converted to meters per second
    pub fn baseline_speed_m_s(&self) -> f64 {
        self.baseline_speed_kmh / MS_TO_KMH
    }

    /// Build the speed-zone threshold table for this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` for a non-positive baseline speed.
    pub fn speed_zones(&self) -> AppResult<SpeedZones> {
        SpeedZones::from_baseline(self.baseline_speed_m_s())
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from("./cache"),
        |dir| dir.join(defaults::CACHE_DIR_NAME),
    )
}

fn default_first_activity_date() -> NaiveDate {
    // The constant is a valid ISO date; fall back to epoch if it ever is not.
    NaiveDate::parse_from_str(defaults::FIRST_ACTIVITY_DATE, "%Y-%m-%d")
        .unwrap_or(NaiveDate::MIN)
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("ignoring unparseable {key}={raw}, using default");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!((config.baseline_speed_m_s() - 18.5 / 3.6).abs() < 1e-12);
    }

    #[test]
    fn test_non_positive_baseline_is_fatal() {
        let config = Config {
            baseline_speed_kmh: 0.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            baseline_speed_kmh: -5.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_download_limit_rejected() {
        let config = Config {
            download_limit: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_speed_zones_derive_from_baseline() {
        let config = Config {
            baseline_speed_kmh: 18.0, // 5 m/s
            ..Config::default()
        };
        let zones = config.speed_zones().unwrap();
        assert!((zones.baseline_m_s() - 5.0).abs() < 1e-12);
    }
}
