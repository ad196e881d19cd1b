// ABOUTME: Fitness data provider integrations for external platforms
// ABOUTME: Defines the FitnessProvider trait consumed by the cache refresh flow
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::AppResult;
use crate::models::{Activity, ActivityStreams, Athlete};

/// Strava API client and data mapping
pub mod strava;

/// Unified interface over fitness data providers.
///
/// The core only consumes providers as pure data sources: list activities
/// after a date, fetch one activity's telemetry streams, and report the
/// athlete identity. Token lifecycle stays on the provider side.
#[async_trait]
pub trait FitnessProvider: Send + Sync {
    /// Install credentials for subsequent calls
    ///
    /// # Errors
    ///
    /// Returns an error if the auth data is not in a form this provider supports
    async fn authenticate(&mut self, auth_data: AuthData) -> AppResult<()>;

    /// Get the authenticated athlete's profile
    ///
    /// # Errors
    ///
    /// Returns an error if not authenticated or the provider call fails
    async fn get_athlete(&self) -> AppResult<Athlete>;

    /// List all activities starting after the given instant, oldest first as
    /// returned by the provider
    ///
    /// # Errors
    ///
    /// Returns an error if not authenticated, the provider call fails, or the
    /// provider rate limit is hit (`ExternalRateLimited`)
    async fn list_activities(&self, after: DateTime<Utc>) -> AppResult<Vec<Activity>>;

    /// Fetch the telemetry streams of one activity, keyed by stream type
    ///
    /// # Errors
    ///
    /// Returns an error if not authenticated, the activity is inaccessible,
    /// or the provider rate limit is hit (`ExternalRateLimited`)
    async fn get_streams(&self, activity_id: u64, types: &[&str]) -> AppResult<ActivityStreams>;

    /// Provider display name
    fn provider_name(&self) -> &'static str;
}

/// Credentials handed to a provider
#[derive(Debug, Clone)]
pub enum AuthData {
    /// OAuth2 bearer tokens (client credentials come from provider config)
    OAuth2 {
        /// Current access token, if already authorized
        access_token: Option<String>,
        /// Refresh token for renewing the access token
        refresh_token: Option<String>,
    },
}
