// ABOUTME: Best-effort ranking of time buckets filtered to an inclusive speed band
// ABOUTME: Answers "which weeks carried the most distance/time inside this pace range"
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use super::bucketing::Granularity;
use crate::constants::units::METERS_PER_KM;
use crate::errors::AppError;
use crate::models::{Activity, ClassifiedSample};

/// Metric used to rank effort buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EffortMetric {
    /// Rank by distance covered inside the speed band
    Distance,
    /// Rank by time spent inside the speed band
    Duration,
}

impl fmt::Display for EffortMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Distance => write!(f, "distance"),
            Self::Duration => write!(f, "duration"),
        }
    }
}

impl FromStr for EffortMetric {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "distance" => Ok(Self::Distance),
            "duration" => Ok(Self::Duration),
            other => Err(AppError::invalid_input(format!(
                "unknown metric '{other}', expected distance|duration"
            ))),
        }
    }
}

/// Accumulated in-band effort for one time bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffortBucket {
    /// Bucket label (period end date)
    pub bucket: NaiveDate,
    /// Seconds spent inside the speed band (one sample ~= one second)
    pub duration_seconds: u64,
    /// Distance covered inside the speed band in kilometers
    pub distance_km: f64,
}

/// Select samples inside the inclusive `[min_speed, max_speed]` band, group
/// them into calendar buckets, and return the top `n` buckets ranked by the
/// chosen metric, descending. Ties break toward the earliest bucket.
pub fn best_efforts(
    activities: &[Activity],
    samples: &[ClassifiedSample],
    granularity: Granularity,
    min_speed: f64,
    max_speed: f64,
    metric: EffortMetric,
    n: usize,
) -> Vec<EffortBucket> {
    let start_dates: HashMap<u64, NaiveDate> = activities
        .iter()
        .map(|a| (a.id, a.start_date.date_naive()))
        .collect();

    let mut buckets: BTreeMap<NaiveDate, EffortBucket> = BTreeMap::new();
    for classified in samples {
        let speed = classified.sample.velocity_smooth;
        if speed < min_speed || speed > max_speed {
            continue;
        }
        let Some(start_date) = start_dates.get(&classified.activity_id) else {
            continue;
        };
        let bucket = granularity.bucket_end(*start_date);
        let entry = buckets.entry(bucket).or_insert_with(|| EffortBucket {
            bucket,
            duration_seconds: 0,
            distance_km: 0.0,
        });
        entry.duration_seconds += 1;
        entry.distance_km += speed / METERS_PER_KM;
    }

    let mut ranked: Vec<EffortBucket> = buckets.into_values().collect();
    ranked.sort_by(|a, b| {
        let by_metric = match metric {
            EffortMetric::Duration => b.duration_seconds.cmp(&a.duration_seconds),
            EffortMetric::Distance => b
                .distance_km
                .partial_cmp(&a.distance_km)
                .unwrap_or(Ordering::Equal),
        };
        by_metric.then_with(|| a.bucket.cmp(&b.bucket))
    });
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SportType, StreamSample};
    use crate::zones::Zone;

    fn activity(id: u64, date: (i32, u32, u32)) -> Activity {
        Activity {
            id,
            name: format!("run {id}"),
            description: None,
            sport_type: SportType::Run,
            start_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
                .and_utc(),
            distance_meters: 10_000.0,
            elapsed_time_seconds: 3000,
            moving_time_seconds: 2900,
            average_speed: None,
            average_heartrate: None,
            max_heartrate: None,
            average_cadence: None,
            kudos_count: None,
        }
    }

    fn samples_at(activity_id: u64, speed: f64, count: usize) -> Vec<ClassifiedSample> {
        (0..count)
            .map(|i| ClassifiedSample {
                activity_id,
                zone: Zone::Z3,
                sample: StreamSample {
                    time_seconds: i as u64,
                    velocity_smooth: speed,
                    heartrate: None,
                    distance_meters: None,
                    altitude: None,
                    latitude: None,
                    longitude: None,
                },
            })
            .collect()
    }

    #[test]
    fn test_top_n_by_duration_descending() {
        // Four weeks with in-band durations 50, 30, 80, 10 seconds.
        let activities = vec![
            activity(1, (2024, 1, 2)),
            activity(2, (2024, 1, 9)),
            activity(3, (2024, 1, 16)),
            activity(4, (2024, 1, 23)),
        ];
        let mut samples = samples_at(1, 4.0, 50);
        samples.extend(samples_at(2, 4.0, 30));
        samples.extend(samples_at(3, 4.0, 80));
        samples.extend(samples_at(4, 4.0, 10));

        let top = best_efforts(
            &activities,
            &samples,
            Granularity::Week,
            3.5,
            4.5,
            EffortMetric::Duration,
            2,
        );
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].duration_seconds, 80);
        assert_eq!(top[1].duration_seconds, 50);
    }

    #[test]
    fn test_band_bounds_are_inclusive() {
        let activities = vec![activity(1, (2024, 1, 2))];
        let mut samples = samples_at(1, 3.5, 5); // at min bound
        samples.extend(samples_at(1, 4.5, 5)); // at max bound
        samples.extend(samples_at(1, 4.6, 5)); // above band

        let top = best_efforts(
            &activities,
            &samples,
            Granularity::Week,
            3.5,
            4.5,
            EffortMetric::Duration,
            10,
        );
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].duration_seconds, 10);
    }

    #[test]
    fn test_ties_break_to_earliest_bucket() {
        let activities = vec![activity(1, (2024, 1, 2)), activity(2, (2024, 2, 6))];
        let mut samples = samples_at(1, 4.0, 20);
        samples.extend(samples_at(2, 4.0, 20));

        let top = best_efforts(
            &activities,
            &samples,
            Granularity::Week,
            3.0,
            5.0,
            EffortMetric::Duration,
            2,
        );
        assert_eq!(top[0].bucket, Granularity::Week.bucket_end(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        ));
    }

    #[test]
    fn test_empty_input_short_circuits() {
        let top = best_efforts(
            &[],
            &[],
            Granularity::Week,
            3.0,
            5.0,
            EffortMetric::Distance,
            5,
        );
        assert!(top.is_empty());
    }
}
