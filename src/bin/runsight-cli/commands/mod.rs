// ABOUTME: CLI subcommand implementations
// ABOUTME: auth (OAuth flow), refresh (cache update), report (aggregation tables)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

/// OAuth authorization helpers
pub mod auth;

/// Cache refresh command
pub mod refresh;

/// Report table commands
pub mod report;
