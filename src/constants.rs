// ABOUTME: Application-wide constants organized by domain (zones, units, Strava API)
// ABOUTME: Provides named constants to eliminate magic numbers in calculations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

/// Speed-zone derivation constants
pub mod zone_factors {
    /// Multiplicative factors applied to the baseline (maximal aerobic) speed
    /// to derive the six zone boundaries, ascending. Z1 lies below the first
    /// boundary, Z7 above the last.
    pub const BOUNDARY_FACTORS: [f64; 6] = [0.61, 0.75, 0.85, 0.92, 0.97, 1.05];

    /// Number of speed zones (Z1..Z7)
    pub const ZONE_COUNT: usize = 7;
}

/// Unit conversion constants
pub mod units {
    /// Meters per kilometer conversion factor
    pub const METERS_PER_KM: f64 = 1000.0;

    /// Seconds per minute
    pub const SECONDS_PER_MINUTE: f64 = 60.0;

    /// Seconds per hour
    pub const SECONDS_PER_HOUR: f64 = 3600.0;

    /// Conversion factor from meters/second to kilometers/hour
    pub const MS_TO_KMH: f64 = 3.6;
}

/// Strava API constants
pub mod strava_api {
    /// REST API base URL
    pub const API_BASE: &str = "https://www.strava.com/api/v3";

    /// OAuth authorization endpoint
    pub const AUTH_URL: &str = "https://www.strava.com/oauth/authorize";

    /// OAuth token endpoint
    pub const TOKEN_URL: &str = "https://www.strava.com/oauth/token";

    /// Scopes needed to read all activities
    pub const DEFAULT_SCOPES: &str = "read,activity:read_all";

    /// Activities returned per page on the list endpoint
    pub const ACTIVITIES_PER_PAGE: usize = 200;

    /// Stream types requested for each activity; `distance` is implied by the
    /// endpoint and always requested alongside these.
    pub const STREAM_TYPES: &[&str] = &["time", "heartrate", "velocity_smooth", "altitude", "latlng"];
}

/// Defaults for environment-driven configuration
pub mod defaults {
    /// Default baseline (maximal aerobic) speed in km/h
    pub const BASELINE_SPEED_KMH: f64 = 18.5;

    /// Default maximum number of stream sets downloaded per refresh pass
    pub const DOWNLOAD_LIMIT: usize = 100;

    /// Sport types mirrored into the cache
    pub const RUN_SPORT_TYPES: &[&str] = &["Run", "TrailRun"];

    /// Default lower bound for activity history (ISO-8601 date)
    pub const FIRST_ACTIVITY_DATE: &str = "2021-01-01";

    /// Cache directory name under the platform data dir
    pub const CACHE_DIR_NAME: &str = "runsight";
}
