// ABOUTME: Time-in-zone aggregation per (bucket, zone) pair over classified samples
// ABOUTME: Sample counts proxy elapsed seconds at ~1 Hz; distance sums use per-sample velocity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::bucketing::Granularity;
use crate::constants::units::METERS_PER_KM;
use crate::models::{Activity, ClassifiedSample};
use crate::zones::Zone;

/// Aggregated time and distance for one (bucket, zone) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneTimeRow {
    /// Bucket label (period end date)
    pub bucket: NaiveDate,
    /// Speed zone
    pub zone: Zone,
    /// Number of samples, a proxy for seconds spent in the zone
    pub sample_count: u64,
    /// Distance covered in the zone in kilometers
    pub distance_km: f64,
}

/// Aggregate classified samples into one row per observed (bucket, zone).
///
/// Samples are joined to their parent activity's start date to pick the
/// bucket; samples whose parent is absent from `activities` are skipped.
/// Rows come back ordered by bucket, then zone. Missing (bucket, zone)
/// combinations are implicitly zero; use [`dense_grid`] when a consumer
/// needs them materialized.
pub fn zone_time_by_bucket(
    activities: &[Activity],
    samples: &[ClassifiedSample],
    granularity: Granularity,
) -> Vec<ZoneTimeRow> {
    let start_dates: HashMap<u64, NaiveDate> = activities
        .iter()
        .map(|a| (a.id, a.start_date.date_naive()))
        .collect();

    let mut rows: BTreeMap<(NaiveDate, Zone), ZoneTimeRow> = BTreeMap::new();
    for classified in samples {
        let Some(start_date) = start_dates.get(&classified.activity_id) else {
            continue;
        };
        let bucket = granularity.bucket_end(*start_date);
        let entry = rows
            .entry((bucket, classified.zone))
            .or_insert_with(|| ZoneTimeRow {
                bucket,
                zone: classified.zone,
                sample_count: 0,
                distance_km: 0.0,
            });
        entry.sample_count += 1;
        // One sample ~= one second, so instantaneous speed doubles as the
        // per-sample distance contribution in meters.
        entry.distance_km += classified.sample.velocity_smooth.max(0.0) / METERS_PER_KM;
    }

    rows.into_values().collect()
}

/// Materialize the dense (bucket x zone) grid over every bucket observed in
/// `rows`, filling absent combinations with zero rows.
pub fn dense_grid(rows: &[ZoneTimeRow]) -> Vec<ZoneTimeRow> {
    let buckets: BTreeSet<NaiveDate> = rows.iter().map(|r| r.bucket).collect();
    let existing: HashMap<(NaiveDate, Zone), &ZoneTimeRow> =
        rows.iter().map(|r| ((r.bucket, r.zone), r)).collect();

    let mut grid = Vec::with_capacity(buckets.len() * Zone::ALL.len());
    for bucket in buckets {
        for zone in Zone::ALL {
            grid.push(existing.get(&(bucket, zone)).map_or_else(
                || ZoneTimeRow {
                    bucket,
                    zone,
                    sample_count: 0,
                    distance_km: 0.0,
                },
                |row| (*row).clone(),
            ));
        }
    }
    grid
}
