// ABOUTME: Shared utility modules
// ABOUTME: Currently HTTP client construction helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

/// Shared HTTP client utilities
pub mod http_client;
