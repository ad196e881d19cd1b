// ABOUTME: Flat-file activity cache - CSV store, in-memory repository, and refresh orchestration
// ABOUTME: One activities.csv index plus one <activity_id>.csv stream file per activity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

/// CSV serialization of activities and stream samples
pub mod csv_store;

/// Fetch-and-cache refresh flow
pub mod refresh;

/// In-memory repository with explicit invalidation
pub mod repository;

pub use csv_store::CsvStore;
pub use refresh::{update_cache, RefreshReport};
pub use repository::{ActivityRepository, Snapshot};
