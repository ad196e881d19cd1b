// ABOUTME: CSV flat-file persistence for activities and per-activity stream samples
// ABOUTME: activities.csv carries the index; each activity's telemetry lives in <id>.csv
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::errors::{AppError, AppResult};
use crate::models::{Activity, SportType, StreamSample};

/// `activities.csv` row. Column order is part of the cache format.
#[derive(Debug, Serialize, Deserialize)]
struct ActivityRecord {
    id: u64,
    average_cadence: Option<f64>,
    average_heartrate: Option<f64>,
    average_speed: Option<f64>,
    description: Option<String>,
    distance: f64,
    elapsed_time: u64,
    kudos_count: Option<u32>,
    max_heartrate: Option<f64>,
    moving_time: u64,
    name: String,
    start_date: DateTime<Utc>,
}

impl From<&Activity> for ActivityRecord {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.id,
            average_cadence: activity.average_cadence,
            average_heartrate: activity.average_heartrate,
            average_speed: activity.average_speed,
            description: activity.description.clone(),
            distance: activity.distance_meters,
            elapsed_time: activity.elapsed_time_seconds,
            kudos_count: activity.kudos_count,
            max_heartrate: activity.max_heartrate,
            moving_time: activity.moving_time_seconds,
            name: activity.name.clone(),
            start_date: activity.start_date,
        }
    }
}

impl From<ActivityRecord> for Activity {
    fn from(record: ActivityRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            // Only run types are mirrored into the cache; the sport column is
            // not part of the format.
            sport_type: SportType::Run,
            start_date: record.start_date,
            distance_meters: record.distance,
            elapsed_time_seconds: record.elapsed_time,
            moving_time_seconds: record.moving_time,
            average_speed: record.average_speed,
            average_heartrate: record.average_heartrate,
            max_heartrate: record.max_heartrate,
            average_cadence: record.average_cadence,
            kudos_count: record.kudos_count,
        }
    }
}

/// `<activity_id>.csv` row. Optional columns stay empty when the source
/// telemetry lacked them and read back as `None`.
#[derive(Debug, Serialize, Deserialize)]
struct StreamRecord {
    distance: Option<f64>,
    time: u64,
    heartrate: Option<f64>,
    velocity_smooth: f64,
    altitude: Option<f64>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl From<&StreamSample> for StreamRecord {
    fn from(sample: &StreamSample) -> Self {
        Self {
            distance: sample.distance_meters,
            time: sample.time_seconds,
            heartrate: sample.heartrate,
            velocity_smooth: sample.velocity_smooth,
            altitude: sample.altitude,
            latitude: sample.latitude,
            longitude: sample.longitude,
        }
    }
}

impl From<StreamRecord> for StreamSample {
    fn from(record: StreamRecord) -> Self {
        Self {
            time_seconds: record.time,
            velocity_smooth: record.velocity_smooth,
            heartrate: record.heartrate,
            distance_meters: record.distance,
            altitude: record.altitude,
            latitude: record.latitude,
            longitude: record.longitude,
        }
    }
}

/// CSV flat-file store rooted at one cache directory
#[derive(Debug, Clone)]
pub struct CsvStore {
    root: PathBuf,
}

impl CsvStore {
    /// Create a store over the given cache directory (not created until
    /// [`Self::ensure_dir`] or the first write)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The cache directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the cache directory if it does not exist
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if directory creation fails
    pub fn ensure_dir(&self) -> AppResult<()> {
        std::fs::create_dir_all(&self.root).map_err(|e| {
            AppError::storage(format!("failed to create cache dir {}", self.root.display()))
                .with_source(e)
        })
    }

    /// Path of the activities index file
    pub fn activities_path(&self) -> PathBuf {
        self.root.join("activities.csv")
    }

    /// Path of one activity's stream file
    pub fn streams_path(&self, activity_id: u64) -> PathBuf {
        self.root.join(format!("{activity_id}.csv"))
    }

    /// Whether a stream file exists for the activity
    pub fn has_streams(&self, activity_id: u64) -> bool {
        self.streams_path(activity_id).exists()
    }

    /// Read all cached activities. A missing index file is the empty-cache
    /// condition and yields an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on I/O failure or `SerializationError` on
    /// malformed rows
    pub fn read_activities(&self) -> AppResult<Vec<Activity>> {
        let path = self.activities_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&path).map_err(|e| {
            AppError::storage(format!("failed to open {}", path.display())).with_source(e)
        })?;

        let mut activities = Vec::new();
        for row in reader.deserialize::<ActivityRecord>() {
            let record = row.map_err(|e| {
                AppError::new(
                    crate::errors::ErrorCode::SerializationError,
                    format!("malformed row in {}", path.display()),
                )
                .with_source(e)
            })?;
            activities.push(Activity::from(record));
        }
        Ok(activities)
    }

    /// Write the activities index, replacing any previous file
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on I/O failure
    pub fn write_activities(&self, activities: &[Activity]) -> AppResult<()> {
        self.ensure_dir()?;
        let path = self.activities_path();
        let file = File::create(&path).map_err(|e| {
            AppError::storage(format!("failed to create {}", path.display())).with_source(e)
        })?;

        let mut writer = csv::Writer::from_writer(file);
        for activity in activities {
            writer.serialize(ActivityRecord::from(activity)).map_err(|e| {
                AppError::storage(format!("failed to write {}", path.display())).with_source(e)
            })?;
        }
        writer.flush().map_err(|e| {
            AppError::storage(format!("failed to flush {}", path.display())).with_source(e)
        })
    }

    /// Read one activity's stream samples, ordered as stored (by elapsed time)
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the file is missing or unreadable, or
    /// `SerializationError` on malformed rows
    pub fn read_streams(&self, activity_id: u64) -> AppResult<Vec<StreamSample>> {
        let path = self.streams_path(activity_id);
        let mut reader = csv::Reader::from_path(&path).map_err(|e| {
            AppError::storage(format!("failed to open {}", path.display())).with_source(e)
        })?;

        let mut samples = Vec::new();
        for row in reader.deserialize::<StreamRecord>() {
            let record = row.map_err(|e| {
                AppError::new(
                    crate::errors::ErrorCode::SerializationError,
                    format!("malformed row in {}", path.display()),
                )
                .with_source(e)
            })?;
            samples.push(StreamSample::from(record));
        }
        Ok(samples)
    }

    /// Write one activity's stream samples, replacing any previous file
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on I/O failure
    pub fn write_streams(&self, activity_id: u64, samples: &[StreamSample]) -> AppResult<()> {
        self.ensure_dir()?;
        let path = self.streams_path(activity_id);
        let file = File::create(&path).map_err(|e| {
            AppError::storage(format!("failed to create {}", path.display())).with_source(e)
        })?;

        let mut writer = csv::Writer::from_writer(file);
        for sample in samples {
            writer.serialize(StreamRecord::from(sample)).map_err(|e| {
                AppError::storage(format!("failed to write {}", path.display())).with_source(e)
            })?;
        }
        writer.flush().map_err(|e| {
            AppError::storage(format!("failed to flush {}", path.display())).with_source(e)
        })
    }
}
