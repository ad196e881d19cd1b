// ABOUTME: Shared HTTP client utilities with connection pooling and timeout configuration
// ABOUTME: Provides singleton clients to eliminate redundant client creation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

use reqwest::{Client, ClientBuilder};
use std::sync::OnceLock;
use std::time::Duration;

/// Global shared API client
static API_CLIENT: OnceLock<Client> = OnceLock::new();

/// Global shared OAuth client
static OAUTH_CLIENT: OnceLock<Client> = OnceLock::new();

fn build_client(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Get or create the shared HTTP client for external API calls.
///
/// Uses connection pooling and timeouts sized for list/stream fetches that
/// may take a while on the provider side.
pub fn api_client() -> &'static Client {
    API_CLIENT.get_or_init(|| build_client(60, 10))
}

/// Get or create the shared HTTP client for OAuth token exchanges.
///
/// Token endpoints respond quickly; shorter timeouts fail fast.
pub fn oauth_client() -> &'static Client {
    OAUTH_CLIENT.get_or_init(|| build_client(15, 5))
}
