// ABOUTME: OAuth2 client implementation for fitness platform authentication
// ABOUTME: Token model plus the Strava code-exchange and refresh endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::strava_api;

/// An OAuth2 token pair with its absolute expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuth2Token {
    /// Bearer access token
    pub access_token: String,
    /// Token type (`Bearer`)
    pub token_type: String,
    /// Absolute expiry time, if the provider reported one
    pub expires_at: Option<DateTime<Utc>>,
    /// Refresh token for renewing the access token
    pub refresh_token: Option<String>,
}

impl OAuth2Token {
    /// Whether the access token is already expired
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at <= Utc::now())
    }

    /// Whether the access token expires within the next five minutes
    pub fn will_expire_soon(&self) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at <= Utc::now() + Duration::minutes(5))
    }
}

/// Build the Strava authorization URL the user visits to grant access
///
/// # Errors
///
/// Returns an error if the client ID is empty or the auth URL fails to parse
pub fn strava_authorization_url(client_id: &str, redirect_uri: &str, state: &str) -> Result<String> {
    if client_id.is_empty() {
        return Err(anyhow::anyhow!("Client ID not configured"));
    }

    let mut url = Url::parse(strava_api::AUTH_URL).context("Invalid auth URL")?;
    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", strava_api::DEFAULT_SCOPES)
        .append_pair("state", state);

    Ok(url.into())
}

#[derive(Debug, Deserialize)]
struct StravaTokenResponse {
    token_type: String,
    expires_at: i64,
    refresh_token: String,
    access_token: String,
    athlete: Option<StravaAthleteSummary>,
}

/// Athlete identity returned alongside the token exchange
#[derive(Debug, Deserialize)]
pub struct StravaAthleteSummary {
    /// Strava athlete id
    pub id: i64,
    /// Public username, if set
    pub username: Option<String>,
    /// First name
    pub firstname: Option<String>,
    /// Last name
    pub lastname: Option<String>,
}

fn token_from_response(response: StravaTokenResponse) -> OAuth2Token {
    OAuth2Token {
        access_token: response.access_token,
        token_type: response.token_type,
        expires_at: Some(DateTime::from_timestamp(response.expires_at, 0).unwrap_or_else(Utc::now)),
        refresh_token: Some(response.refresh_token),
    }
}

/// Exchange a Strava authorization code for tokens and athlete info
///
/// # Errors
///
/// Returns an error if the token exchange request fails or the response is invalid
pub async fn exchange_strava_code(
    client: &reqwest::Client,
    client_id: &str,
    client_secret: &str,
    code: &str,
) -> Result<(OAuth2Token, Option<StravaAthleteSummary>)> {
    let params = [
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("code", code),
        ("grant_type", "authorization_code"),
    ];

    let mut response: StravaTokenResponse = client
        .post(strava_api::TOKEN_URL)
        .form(&params)
        .send()
        .await?
        .error_for_status()
        .context("Strava token exchange rejected")?
        .json()
        .await?;

    let athlete = response.athlete.take();
    Ok((token_from_response(response), athlete))
}

/// Refresh a Strava access token
///
/// # Errors
///
/// Returns an error if the token refresh request fails or the response is invalid
pub async fn refresh_strava_token(
    client: &reqwest::Client,
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> Result<OAuth2Token> {
    let params = [
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("refresh_token", refresh_token),
        ("grant_type", "refresh_token"),
    ];

    let response: StravaTokenResponse = client
        .post(strava_api::TOKEN_URL)
        .form(&params)
        .send()
        .await?
        .error_for_status()
        .context("Strava token refresh rejected")?
        .json()
        .await?;

    Ok(token_from_response(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_url_carries_scopes_and_state() {
        let url = strava_authorization_url("12345", "http://127.0.0.1:5000/authorization", "xyz")
            .unwrap();
        assert!(url.starts_with("https://www.strava.com/oauth/authorize?"));
        assert!(url.contains("client_id=12345"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("state=xyz"));
    }

    #[test]
    fn test_authorization_url_requires_client_id() {
        assert!(strava_authorization_url("", "http://localhost", "s").is_err());
    }

    #[test]
    fn test_token_expiry_checks() {
        let expired = OAuth2Token {
            access_token: "a".to_owned(),
            token_type: "Bearer".to_owned(),
            expires_at: Some(Utc::now() - Duration::hours(1)),
            refresh_token: None,
        };
        assert!(expired.is_expired());
        assert!(expired.will_expire_soon());

        let fresh = OAuth2Token {
            access_token: "a".to_owned(),
            token_type: "Bearer".to_owned(),
            expires_at: Some(Utc::now() + Duration::hours(6)),
            refresh_token: None,
        };
        assert!(!fresh.is_expired());
        assert!(!fresh.will_expire_soon());
    }

    #[test]
    fn test_token_response_parsing() {
        let json = r#"{
            "token_type": "Bearer",
            "expires_at": 1735689600,
            "expires_in": 21600,
            "refresh_token": "refresh123",
            "access_token": "access456",
            "athlete": {"id": 99, "username": "runner", "firstname": "Ada", "lastname": "L"}
        }"#;
        let parsed: StravaTokenResponse = serde_json::from_str(json).unwrap();
        let athlete_id = parsed.athlete.as_ref().map(|a| a.id);
        let token = token_from_response(parsed);
        assert_eq!(token.access_token, "access456");
        assert_eq!(token.refresh_token.as_deref(), Some("refresh123"));
        assert_eq!(athlete_id, Some(99));
    }
}
