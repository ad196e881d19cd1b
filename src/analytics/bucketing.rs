// ABOUTME: Calendar bucketing of activities at day/week/month/quarter/year granularity
// ABOUTME: Buckets are labeled by period end; weeks are Sunday-anchored
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::constants::units::MS_TO_KMH;
use crate::errors::AppError;
use crate::models::Activity;

/// Time-bucket granularity for aggregations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Calendar day
    Day,
    /// Week ending on Sunday
    Week,
    /// Calendar month
    Month,
    /// Calendar quarter
    Quarter,
    /// Calendar year
    Year,
}

impl Granularity {
    /// Label a date with the end of its calendar bucket.
    ///
    /// Days map to themselves; weeks to the next-or-same Sunday; months,
    /// quarters, and years to their last day. All dates inside one bucket
    /// share one label.
    pub fn bucket_end(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => {
                let days_to_sunday = (7 - date.weekday().num_days_from_sunday()) % 7;
                date + Duration::days(i64::from(days_to_sunday))
            }
            Self::Month => last_day_of_month(date.year(), date.month(), date),
            Self::Quarter => {
                let quarter_end_month = ((date.month() - 1) / 3) * 3 + 3;
                last_day_of_month(date.year(), quarter_end_month, date)
            }
            Self::Year => NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        };
        write!(f, "{label}")
    }
}

impl FromStr for Granularity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            other => Err(AppError::invalid_input(format!(
                "unknown granularity '{other}', expected day|week|month|quarter|year"
            ))),
        }
    }
}

fn last_day_of_month(year: i32, month: u32, fallback: NaiveDate) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(fallback)
}

/// Aggregated training volume for one time bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeBucket {
    /// Bucket label (period end date)
    pub bucket: NaiveDate,
    /// Number of activities in the bucket
    pub activity_count: usize,
    /// Total distance in meters
    pub distance_meters: f64,
    /// Total moving time in seconds
    pub moving_time_seconds: u64,
    /// Total elapsed time in seconds
    pub elapsed_time_seconds: u64,
    /// Average speed in km/h, `None` for zero-moving-time buckets (never NaN)
    pub average_speed_kmh: Option<f64>,
}

/// Group activities into calendar buckets, summing distance and durations.
///
/// Returns buckets in chronological order; an empty activity slice yields an
/// empty table.
pub fn volume_by_bucket(activities: &[Activity], granularity: Granularity) -> Vec<VolumeBucket> {
    let mut buckets: BTreeMap<NaiveDate, VolumeBucket> = BTreeMap::new();

    for activity in activities {
        let bucket = granularity.bucket_end(activity.start_date.date_naive());
        let entry = buckets.entry(bucket).or_insert_with(|| VolumeBucket {
            bucket,
            activity_count: 0,
            distance_meters: 0.0,
            moving_time_seconds: 0,
            elapsed_time_seconds: 0,
            average_speed_kmh: None,
        });
        entry.activity_count += 1;
        entry.distance_meters += activity.distance_meters;
        entry.moving_time_seconds += activity.moving_time_seconds;
        entry.elapsed_time_seconds += activity.elapsed_time_seconds;
    }

    buckets
        .into_values()
        .map(|mut bucket| {
            // Guarded here rather than at the call sites: a zero-duration
            // bucket must surface as "undefined", never as inf/NaN.
            bucket.average_speed_kmh = if bucket.moving_time_seconds == 0 {
                None
            } else {
                Some(bucket.distance_meters / bucket.moving_time_seconds as f64 * MS_TO_KMH)
            };
            bucket
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SportType;

    fn run(id: u64, date: (i32, u32, u32), distance_m: f64, moving_s: u64) -> Activity {
        Activity {
            id,
            name: format!("run {id}"),
            description: None,
            sport_type: SportType::Run,
            start_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2)
                .unwrap()
                .and_hms_opt(7, 0, 0)
                .unwrap()
                .and_utc(),
            distance_meters: distance_m,
            elapsed_time_seconds: moving_s + 60,
            moving_time_seconds: moving_s,
            average_speed: None,
            average_heartrate: None,
            max_heartrate: None,
            average_cadence: None,
            kudos_count: None,
        }
    }

    #[test]
    fn test_week_buckets_end_on_sunday() {
        // 2024-03-04 is a Monday; its week ends Sunday 2024-03-10.
        let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(Granularity::Week.bucket_end(monday), sunday);
        // A Sunday maps to itself.
        assert_eq!(Granularity::Week.bucket_end(sunday), sunday);
        // The next Monday starts a new bucket.
        let next_monday = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        assert_eq!(
            Granularity::Week.bucket_end(next_monday),
            NaiveDate::from_ymd_opt(2024, 3, 17).unwrap()
        );
    }

    #[test]
    fn test_month_quarter_year_bucket_ends() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        assert_eq!(
            Granularity::Month.bucket_end(date),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap() // leap year
        );
        assert_eq!(
            Granularity::Quarter.bucket_end(date),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
        );
        assert_eq!(
            Granularity::Year.bucket_end(date),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
        assert_eq!(Granularity::Day.bucket_end(date), date);
    }

    #[test]
    fn test_volume_sums_and_average_speed() {
        // Two runs in the same week: 36 km in exactly one hour of moving time.
        let activities = vec![
            run(1, (2024, 3, 5), 20_000.0, 2000),
            run(2, (2024, 3, 7), 16_000.0, 1600),
        ];
        let buckets = volume_by_bucket(&activities, Granularity::Week);

        assert_eq!(buckets.len(), 1);
        let bucket = &buckets[0];
        assert_eq!(bucket.activity_count, 2);
        assert!((bucket.distance_meters - 36_000.0).abs() < f64::EPSILON);
        assert_eq!(bucket.moving_time_seconds, 3600);
        assert!((bucket.average_speed_kmh.unwrap() - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_moving_time_gives_undefined_speed() {
        let activities = vec![run(1, (2024, 3, 5), 0.0, 0)];
        let buckets = volume_by_bucket(&activities, Granularity::Day);
        assert_eq!(buckets[0].average_speed_kmh, None);
    }

    #[test]
    fn test_empty_input_yields_empty_table() {
        assert!(volume_by_bucket(&[], Granularity::Week).is_empty());
    }

    #[test]
    fn test_granularity_parsing() {
        assert_eq!("Week".parse::<Granularity>().unwrap(), Granularity::Week);
        assert!("fortnight".parse::<Granularity>().is_err());
    }
}
