// ABOUTME: Strava OAuth subcommands - authorization URL, code exchange, token refresh
// ABOUTME: Tokens are printed for the user to export; nothing is stored on disk
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

use runsight::config::Config;
use runsight::errors::{AppError, AppResult, ErrorCode};
use runsight::oauth2_client::{
    exchange_strava_code, refresh_strava_token, strava_authorization_url, OAuth2Token,
};
use runsight::utils::http_client::oauth_client;

fn require_credentials(config: &Config) -> AppResult<()> {
    if config.strava.client_id.is_empty() || config.strava.client_secret.is_empty() {
        return Err(AppError::auth_failed(
            "STRAVA_CLIENT_ID / STRAVA_CLIENT_SECRET must be set",
        ));
    }
    Ok(())
}

fn print_token(token: &OAuth2Token) -> AppResult<()> {
    let rendered = serde_json::to_string_pretty(token).map_err(|e| {
        AppError::new(ErrorCode::SerializationError, "failed to render token").with_source(e)
    })?;
    println!("{rendered}");
    println!();
    println!("Export for subsequent commands:");
    println!("  export STRAVA_ACCESS_TOKEN={}", token.access_token);
    if let Some(refresh_token) = &token.refresh_token {
        println!("  export STRAVA_REFRESH_TOKEN={refresh_token}");
    }
    Ok(())
}

/// Print the authorization URL the user opens to grant access
pub fn url(config: &Config, redirect_uri: &str) -> AppResult<()> {
    require_credentials(config)?;
    let url = strava_authorization_url(&config.strava.client_id, redirect_uri, "runsight")?;
    println!("Open the following URL and copy the `code` query parameter from the redirect:");
    println!("{url}");
    Ok(())
}

/// Exchange an authorization code for tokens
pub async fn exchange(config: &Config, code: &str) -> AppResult<()> {
    require_credentials(config)?;
    let (token, athlete) = exchange_strava_code(
        oauth_client(),
        &config.strava.client_id,
        &config.strava.client_secret,
        code,
    )
    .await
    .map_err(|e| AppError::auth_failed(format!("code exchange failed: {e}")))?;

    if let Some(athlete) = athlete {
        println!(
            "Authenticated as athlete {} ({})",
            athlete.id,
            athlete.username.as_deref().unwrap_or("unknown")
        );
    }
    print_token(&token)
}

/// Refresh an access token
pub async fn refresh(config: &Config, refresh_token: Option<String>) -> AppResult<()> {
    require_credentials(config)?;
    let refresh_token = refresh_token
        .or_else(|| config.strava.refresh_token.clone())
        .ok_or_else(|| {
            AppError::auth_failed("no refresh token given and STRAVA_REFRESH_TOKEN is unset")
        })?;

    let token = refresh_strava_token(
        oauth_client(),
        &config.strava.client_id,
        &config.strava.client_secret,
        &refresh_token,
    )
    .await
    .map_err(|e| AppError::auth_failed(format!("token refresh failed: {e}")))?;

    print_token(&token)
}
