// ABOUTME: Core data models shared by providers, the cache layer, and analytics
// ABOUTME: Activity summaries, per-second telemetry streams, and athlete profile types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::zones::Zone;

/// The authenticated athlete's profile information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Athlete {
    /// Provider-assigned athlete identifier
    pub id: u64,
    /// Public username, if set
    pub username: Option<String>,
    /// First name
    pub firstname: Option<String>,
    /// Last name
    pub lastname: Option<String>,
    /// Data provider this profile came from
    pub provider: String,
}

/// Type of sport/activity as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SportType {
    /// Outdoor run
    Run,
    /// Trail run
    TrailRun,
    /// Treadmill / virtual run
    VirtualRun,
    /// Anything else (bike rides, swims, ...)
    Other(String),
}

impl SportType {
    /// Map a provider sport-type string onto the typed variants
    pub fn from_provider_string(value: &str) -> Self {
        match value {
            "Run" => Self::Run,
            "TrailRun" => Self::TrailRun,
            "VirtualRun" => Self::VirtualRun,
            other => Self::Other(other.to_owned()),
        }
    }

    /// The provider-side string for this sport type
    pub fn as_str(&self) -> &str {
        match self {
            Self::Run => "Run",
            Self::TrailRun => "TrailRun",
            Self::VirtualRun => "VirtualRun",
            Self::Other(value) => value,
        }
    }
}

/// One recorded exercise session, immutable once fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Provider-assigned activity identifier
    pub id: u64,
    /// Human-readable name/title of the activity
    pub name: String,
    /// Free-text description, if any
    pub description: Option<String>,
    /// Sport type (only run types are mirrored into the cache)
    pub sport_type: SportType,
    /// When the activity started (UTC)
    pub start_date: DateTime<Utc>,
    /// Total distance covered in meters
    pub distance_meters: f64,
    /// Wall-clock duration in seconds
    pub elapsed_time_seconds: u64,
    /// Moving time in seconds (excludes stopped time)
    pub moving_time_seconds: u64,
    /// Average speed in meters per second
    pub average_speed: Option<f64>,
    /// Average heart rate during the activity (BPM)
    pub average_heartrate: Option<f64>,
    /// Maximum heart rate reached during the activity (BPM)
    pub max_heartrate: Option<f64>,
    /// Average cadence (steps per minute, one-sided)
    pub average_cadence: Option<f64>,
    /// Kudos received on the platform
    pub kudos_count: Option<u32>,
}

impl Activity {
    /// Distance in kilometers
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / crate::constants::units::METERS_PER_KM
    }
}

/// One time-indexed telemetry reading belonging to an activity.
///
/// Samples arrive at ~1 Hz; optional fields reflect what the source
/// telemetry included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSample {
    /// Elapsed time from activity start in seconds
    pub time_seconds: u64,
    /// Instantaneous smoothed speed in meters per second
    pub velocity_smooth: f64,
    /// Heart rate (BPM)
    pub heartrate: Option<f64>,
    /// Distance covered so far in meters
    pub distance_meters: Option<f64>,
    /// Altitude in meters
    pub altitude: Option<f64>,
    /// GPS latitude
    pub latitude: Option<f64>,
    /// GPS longitude
    pub longitude: Option<f64>,
}

/// Column-oriented stream set for one activity, as fetched from the provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityStreams {
    /// Elapsed-time axis in seconds
    pub time: Vec<u64>,
    /// Smoothed speed in meters per second
    pub velocity_smooth: Vec<f64>,
    /// Cumulative distance in meters
    pub distance: Option<Vec<f64>>,
    /// Heart rate (BPM)
    pub heartrate: Option<Vec<f64>>,
    /// Altitude in meters
    pub altitude: Option<Vec<f64>>,
    /// GPS (latitude, longitude) pairs
    pub latlng: Option<Vec<(f64, f64)>>,
}

impl ActivityStreams {
    /// Number of samples on the time axis
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the stream set carries no samples
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Convert the column-oriented streams into row-oriented samples.
    ///
    /// Rows are emitted along the time axis; columns shorter than the time
    /// axis yield `None` past their end rather than truncating the track.
    pub fn to_samples(&self) -> Vec<StreamSample> {
        let column = |values: &Option<Vec<f64>>, i: usize| values.as_ref().and_then(|v| v.get(i).copied());

        self.time
            .iter()
            .enumerate()
            .map(|(i, &time_seconds)| {
                let (latitude, longitude) = self
                    .latlng
                    .as_ref()
                    .and_then(|v| v.get(i).copied())
                    .map_or((None, None), |(lat, lng)| (Some(lat), Some(lng)));

                StreamSample {
                    time_seconds,
                    velocity_smooth: self.velocity_smooth.get(i).copied().unwrap_or(0.0),
                    heartrate: column(&self.heartrate, i),
                    distance_meters: column(&self.distance, i),
                    altitude: column(&self.altitude, i),
                    latitude,
                    longitude,
                }
            })
            .collect()
    }
}

/// A stream sample joined to its parent activity and labeled with its speed
/// zone. Zones are derived on load and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedSample {
    /// Identifier of the parent activity
    pub activity_id: u64,
    /// Zone derived from the sample's instantaneous speed
    pub zone: Zone,
    /// The underlying telemetry reading
    pub sample: StreamSample,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sport_type_round_trip() {
        assert_eq!(SportType::from_provider_string("Run"), SportType::Run);
        assert_eq!(
            SportType::from_provider_string("Ride"),
            SportType::Other("Ride".to_owned())
        );
        assert_eq!(SportType::TrailRun.as_str(), "TrailRun");
    }

    #[test]
    fn test_streams_to_samples_aligns_columns() {
        let streams = ActivityStreams {
            time: vec![0, 1, 2],
            velocity_smooth: vec![3.0, 3.1, 3.2],
            distance: Some(vec![0.0, 3.0, 6.1]),
            heartrate: Some(vec![140.0, 141.0]), // shorter column
            altitude: None,
            latlng: Some(vec![(45.5, -73.6), (45.5, -73.6), (45.5, -73.6)]),
        };

        let samples = streams.to_samples();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[1].heartrate, Some(141.0));
        assert_eq!(samples[2].heartrate, None);
        assert_eq!(samples[2].distance_meters, Some(6.1));
        assert_eq!(samples[0].latitude, Some(45.5));
    }

    #[test]
    fn test_distance_km() {
        let activity = Activity {
            id: 1,
            name: "Morning Run".to_owned(),
            description: None,
            sport_type: SportType::Run,
            start_date: Utc::now(),
            distance_meters: 12_500.0,
            elapsed_time_seconds: 4000,
            moving_time_seconds: 3800,
            average_speed: Some(3.29),
            average_heartrate: Some(152.0),
            max_heartrate: Some(171.0),
            average_cadence: Some(86.0),
            kudos_count: Some(4),
        };
        assert!((activity.distance_km() - 12.5).abs() < f64::EPSILON);
    }
}
