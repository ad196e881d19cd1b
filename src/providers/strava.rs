// ABOUTME: Strava API integration and data fetching
// ABOUTME: Handles Strava authentication, activity retrieval, and stream transformation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use super::{AuthData, FitnessProvider};
use crate::constants::strava_api;
use crate::errors::{AppError, AppResult};
use crate::models::{Activity, ActivityStreams, Athlete, SportType};
use crate::oauth2_client;
use crate::utils::http_client::api_client;

/// Configuration for Strava API integration
#[derive(Debug, Clone)]
pub struct StravaConfig {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// API base URL (overridable for tests)
    pub base_url: String,
}

impl StravaConfig {
    /// Build a config with the production API base URL
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            base_url: strava_api::API_BASE.to_owned(),
        }
    }
}

/// Strava implementation of [`FitnessProvider`]
pub struct StravaProvider {
    client: Client,
    config: StravaConfig,
    access_token: Option<String>,
    refresh_token: Option<String>,
}

impl StravaProvider {
    /// Create a provider with the shared pooled HTTP client
    pub fn new(config: StravaConfig) -> Self {
        Self {
            client: api_client().clone(),
            config,
            access_token: None,
            refresh_token: None,
        }
    }

    /// Refresh the access token using the stored refresh token, keeping the
    /// rotated refresh token for subsequent renewals.
    ///
    /// # Errors
    ///
    /// Returns an error if no refresh token is stored, client credentials are
    /// missing, or the token endpoint rejects the request
    pub async fn refresh_access_token(&mut self) -> AppResult<()> {
        let refresh_token = self
            .refresh_token
            .clone()
            .ok_or_else(|| AppError::auth_failed("no refresh token available"))?;

        if self.config.client_id.is_empty() || self.config.client_secret.is_empty() {
            return Err(AppError::auth_failed("client credentials not configured"));
        }

        let token = oauth2_client::refresh_strava_token(
            &self.client,
            &self.config.client_id,
            &self.config.client_secret,
            &refresh_token,
        )
        .await
        .map_err(|e| AppError::auth_failed(format!("token refresh failed: {e}")))?;

        info!("Strava access token refreshed");
        self.access_token = Some(token.access_token);
        if token.refresh_token.is_some() {
            self.refresh_token = token.refresh_token;
        }
        Ok(())
    }

    fn token(&self) -> AppResult<&str> {
        self.access_token
            .as_deref()
            .ok_or_else(|| AppError::auth_failed("not authenticated with Strava"))
    }

    /// Map an unsuccessful response to the error taxonomy, reading the body
    /// for diagnostics.
    async fn error_from_response(response: reqwest::Response) -> AppError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read error response".to_owned());

        match status {
            StatusCode::TOO_MANY_REQUESTS => AppError::rate_limited("Strava"),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                AppError::auth_failed(format!("Strava rejected credentials: {status} - {body}"))
            }
            _ => AppError::external_service("Strava", format!("{status} - {body}")),
        }
    }
}

#[async_trait]
impl FitnessProvider for StravaProvider {
    async fn authenticate(&mut self, auth_data: AuthData) -> AppResult<()> {
        let AuthData::OAuth2 {
            access_token,
            refresh_token,
        } = auth_data;
        self.access_token = access_token;
        self.refresh_token = refresh_token;
        Ok(())
    }

    async fn get_athlete(&self) -> AppResult<Athlete> {
        let token = self.token()?;

        let response = self
            .client
            .get(format!("{}/athlete", self.config.base_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::external_service("Strava", e.to_string()).with_source(e))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let athlete: StravaAthlete = response
            .json()
            .await
            .map_err(|e| AppError::external_service("Strava", e.to_string()).with_source(e))?;

        Ok(Athlete {
            id: athlete.id,
            username: athlete.username,
            firstname: athlete.firstname,
            lastname: athlete.lastname,
            provider: "strava".into(),
        })
    }

    async fn list_activities(&self, after: DateTime<Utc>) -> AppResult<Vec<Activity>> {
        let token = self.token()?;
        let url = format!("{}/athlete/activities", self.config.base_url);
        let per_page = strava_api::ACTIVITIES_PER_PAGE;

        let mut activities = Vec::new();
        let mut page = 1usize;
        loop {
            let query = [
                ("after", after.timestamp().to_string()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ];
            debug!("Fetching activities page {page} from {url}");

            let response = self
                .client
                .get(&url)
                .bearer_auth(token)
                .query(&query)
                .send()
                .await
                .map_err(|e| AppError::external_service("Strava", e.to_string()).with_source(e))?;

            if !response.status().is_success() {
                return Err(Self::error_from_response(response).await);
            }

            let batch: Vec<StravaActivity> = response
                .json()
                .await
                .map_err(|e| AppError::external_service("Strava", e.to_string()).with_source(e))?;

            let fetched = batch.len();
            activities.extend(batch.into_iter().map(Activity::from));

            if fetched < per_page {
                break;
            }
            page += 1;
        }

        info!("Fetched {} activities from Strava", activities.len());
        Ok(activities)
    }

    async fn get_streams(&self, activity_id: u64, types: &[&str]) -> AppResult<ActivityStreams> {
        let token = self.token()?;
        let url = format!("{}/activities/{activity_id}/streams", self.config.base_url);
        let keys = types.join(",");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[("keys", keys.as_str()), ("key_by_type", "true")])
            .send()
            .await
            .map_err(|e| AppError::external_service("Strava", e.to_string()).with_source(e))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let streams: StravaStreamSet = response
            .json()
            .await
            .map_err(|e| AppError::external_service("Strava", e.to_string()).with_source(e))?;

        streams.into_activity_streams(activity_id)
    }

    fn provider_name(&self) -> &'static str {
        "Strava"
    }
}

#[derive(Debug, Deserialize)]
struct StravaAthlete {
    id: u64,
    username: Option<String>,
    firstname: Option<String>,
    lastname: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StravaActivity {
    id: u64,
    name: String,
    description: Option<String>,
    sport_type: String,
    start_date: DateTime<Utc>,
    distance: Option<f64>,
    elapsed_time: u64,
    moving_time: u64,
    average_speed: Option<f64>,
    average_heartrate: Option<f64>,
    max_heartrate: Option<f64>,
    average_cadence: Option<f64>,
    kudos_count: Option<u32>,
}

impl From<StravaActivity> for Activity {
    fn from(strava: StravaActivity) -> Self {
        Self {
            id: strava.id,
            name: strava.name,
            description: strava.description,
            sport_type: SportType::from_provider_string(&strava.sport_type),
            start_date: strava.start_date,
            distance_meters: strava.distance.unwrap_or(0.0),
            elapsed_time_seconds: strava.elapsed_time,
            moving_time_seconds: strava.moving_time,
            average_speed: strava.average_speed,
            average_heartrate: strava.average_heartrate,
            max_heartrate: strava.max_heartrate,
            average_cadence: strava.average_cadence,
            kudos_count: strava.kudos_count,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StravaStream<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct StravaStreamSet {
    time: Option<StravaStream<u64>>,
    distance: Option<StravaStream<f64>>,
    heartrate: Option<StravaStream<f64>>,
    velocity_smooth: Option<StravaStream<f64>>,
    altitude: Option<StravaStream<f64>>,
    latlng: Option<StravaStream<(f64, f64)>>,
}

impl StravaStreamSet {
    /// Convert the keyed stream payload into the column-oriented model.
    ///
    /// The time axis is mandatory; a missing velocity stream is filled with
    /// zeros so a track without speed telemetry still loads (stationary
    /// samples classify as Z1 downstream).
    fn into_activity_streams(self, activity_id: u64) -> AppResult<ActivityStreams> {
        let time = self
            .time
            .map(|s| s.data)
            .ok_or_else(|| {
                AppError::external_service(
                    "Strava",
                    format!("activity {activity_id} streams lack a time axis"),
                )
            })?;

        let velocity_smooth = self
            .velocity_smooth
            .map_or_else(|| vec![0.0; time.len()], |s| s.data);

        Ok(ActivityStreams {
            time,
            velocity_smooth,
            distance: self.distance.map(|s| s.data),
            heartrate: self.heartrate.map(|s| s.data),
            altitude: self.altitude.map(|s| s.data),
            latlng: self.latlng.map(|s| s.data),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unauthenticated_calls_fail() {
        let provider = StravaProvider::new(StravaConfig::new("id", "secret"));
        let result = provider.get_athlete().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_authenticate_stores_tokens() {
        let mut provider = StravaProvider::new(StravaConfig::new("id", "secret"));
        provider
            .authenticate(AuthData::OAuth2 {
                access_token: Some("token".to_owned()),
                refresh_token: Some("refresh".to_owned()),
            })
            .await
            .unwrap();
        assert!(provider.token().is_ok());
    }

    #[test]
    fn test_activity_dto_conversion() {
        let json = r#"{
            "id": 987654,
            "name": "Sunday long run",
            "sport_type": "Run",
            "start_date": "2024-03-10T08:30:00Z",
            "distance": 21097.5,
            "elapsed_time": 6100,
            "moving_time": 5980,
            "average_speed": 3.53,
            "average_heartrate": 156.2,
            "max_heartrate": 177.0,
            "average_cadence": 84.5,
            "kudos_count": 12
        }"#;
        let dto: StravaActivity = serde_json::from_str(json).unwrap();
        let activity = Activity::from(dto);

        assert_eq!(activity.id, 987_654);
        assert_eq!(activity.sport_type, SportType::Run);
        assert!((activity.distance_meters - 21_097.5).abs() < f64::EPSILON);
        assert_eq!(activity.moving_time_seconds, 5980);
        assert_eq!(activity.description, None);
    }

    #[test]
    fn test_stream_set_conversion() {
        let json = r#"{
            "time": {"data": [0, 1, 2]},
            "velocity_smooth": {"data": [2.9, 3.0, 3.1]},
            "heartrate": {"data": [141, 142, 144]},
            "distance": {"data": [0.0, 3.0, 6.1]},
            "latlng": {"data": [[45.5, -73.55], [45.5, -73.55], [45.5, -73.55]]}
        }"#;
        let set: StravaStreamSet = serde_json::from_str(json).unwrap();
        let streams = set.into_activity_streams(1).unwrap();

        assert_eq!(streams.len(), 3);
        assert_eq!(streams.heartrate.as_ref().map(Vec::len), Some(3));
        assert_eq!(streams.latlng.as_ref().and_then(|v| v.first()).copied(), Some((45.5, -73.55)));
    }

    #[test]
    fn test_stream_set_without_time_axis_is_rejected() {
        let json = r#"{"velocity_smooth": {"data": [3.0]}}"#;
        let set: StravaStreamSet = serde_json::from_str(json).unwrap();
        assert!(set.into_activity_streams(42).is_err());
    }

    #[test]
    fn test_missing_velocity_filled_with_zeros() {
        let json = r#"{"time": {"data": [0, 1]}}"#;
        let set: StravaStreamSet = serde_json::from_str(json).unwrap();
        let streams = set.into_activity_streams(7).unwrap();
        assert_eq!(streams.velocity_smooth, vec![0.0, 0.0]);
    }
}
