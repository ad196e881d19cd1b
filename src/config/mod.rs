// ABOUTME: Configuration module root re-exporting the environment-driven config types
// ABOUTME: All runtime settings come from environment variables with sensible defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

/// Environment-based configuration management
pub mod environment;

pub use environment::{Config, StravaApiConfig};
