// ABOUTME: Aggregation layer combining activities and classified samples into chart tables
// ABOUTME: Temporal bucketing, zone-time distribution, best efforts, burn-up progress, smoothing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

/// Calendar bucketing and per-bucket volume aggregation
pub mod bucketing;

/// Time-in-zone aggregation per (bucket, zone) pair
pub mod zone_time;

/// Best efforts within an inclusive speed band
pub mod best_efforts;

/// Cumulative realized-vs-target distance (burn-up)
pub mod progress;

/// Rolling-mean smoothing for stream profiles
pub mod smoothing;

pub use best_efforts::{best_efforts, EffortBucket, EffortMetric};
pub use bucketing::{volume_by_bucket, Granularity, VolumeBucket};
pub use progress::{cumulative_progress, DateRange, ProgressReport, TargetPlan};
pub use smoothing::rolling_mean_centered;
pub use zone_time::{dense_grid, zone_time_by_bucket, ZoneTimeRow};
