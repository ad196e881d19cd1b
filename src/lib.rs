// ABOUTME: Runsight library root - personal running analytics over Strava activity data
// ABOUTME: Mirrors activities/telemetry into a CSV cache and derives speed-zone training aggregates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

#![deny(unsafe_code)]

//! # Runsight
//!
//! A single-user running analytics engine. Activities and per-second telemetry
//! streams are fetched from Strava, mirrored into a flat-file CSV cache, and
//! aggregated into the tables a chart layer renders: training volume over
//! time, time-in-zone distributions, best efforts within a pace band, and
//! cumulative distance against a yearly target.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, `AppResult`
//! - **constants**: Zone factors, unit conversions, and Strava API constants
//! - **config**: Environment-driven configuration with startup validation
//! - **models**: Core data models (`Activity`, `StreamSample`, `Athlete`)
//! - **zones**: Speed-zone threshold table, classifier, and pace formatting
//! - **oauth2_client**: OAuth2 token exchange and refresh for Strava
//! - **providers**: `FitnessProvider` trait and the Strava implementation
//! - **cache**: CSV flat-file store, refresh orchestration, and the in-memory repository
//! - **analytics**: Temporal bucketing, zone-time, best-effort, and burn-up aggregations

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Environment-based configuration management
pub mod config;

/// Core data models shared across providers, cache, and analytics
pub mod models;

/// Speed-zone thresholds, classification, and pace formatting
pub mod zones;

/// OAuth2 client for fitness platform authentication
pub mod oauth2_client;

/// Fitness data provider integrations
pub mod providers;

/// Flat-file activity cache and repository
pub mod cache;

/// Aggregation layer feeding chart consumers
pub mod analytics;

/// Shared utilities (HTTP client construction)
pub mod utils;
