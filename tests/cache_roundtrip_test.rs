// ABOUTME: Tests for CSV cache round-trips and the repository's memoization/invalidation
// ABOUTME: Activities and streams must read back identical, with the parent-child link intact
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::NaiveDate;
use runsight::cache::{ActivityRepository, CsvStore};
use runsight::models::{Activity, SportType, StreamSample};
use runsight::zones::{SpeedZones, Zone};
use tempfile::TempDir;

fn sample_activity(id: u64) -> Activity {
    Activity {
        id,
        name: "Tempo intervals".to_owned(),
        description: Some("3x10min @ threshold".to_owned()),
        sport_type: SportType::Run,
        start_date: NaiveDate::from_ymd_opt(2024, 4, 2)
            .unwrap()
            .and_hms_opt(6, 45, 12)
            .unwrap()
            .and_utc(),
        distance_meters: 14_230.4,
        elapsed_time_seconds: 4520,
        moving_time_seconds: 4380,
        average_speed: Some(3.249),
        average_heartrate: Some(154.3),
        max_heartrate: Some(178.0),
        average_cadence: Some(85.5),
        kudos_count: Some(7),
    }
}

fn sample_streams() -> Vec<StreamSample> {
    vec![
        StreamSample {
            time_seconds: 0,
            velocity_smooth: 2.8,
            heartrate: Some(121.0),
            distance_meters: Some(0.0),
            altitude: Some(31.2),
            latitude: Some(45.501),
            longitude: Some(-73.567),
        },
        StreamSample {
            time_seconds: 1,
            velocity_smooth: 3.1,
            heartrate: Some(124.0),
            distance_meters: Some(3.1),
            altitude: Some(31.4),
            latitude: Some(45.502),
            longitude: Some(-73.568),
        },
        // Bare-bones sample: optional telemetry absent.
        StreamSample {
            time_seconds: 2,
            velocity_smooth: 3.4,
            heartrate: None,
            distance_meters: Some(6.5),
            altitude: None,
            latitude: None,
            longitude: None,
        },
    ]
}

#[test]
fn test_activity_and_streams_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = CsvStore::new(dir.path());

    let activity = sample_activity(4242);
    let samples = sample_streams();

    store.write_streams(activity.id, &samples).unwrap();
    store.write_activities(std::slice::from_ref(&activity)).unwrap();

    let activities = store.read_activities().unwrap();
    assert_eq!(activities, vec![activity.clone()]);

    let read_back = store.read_streams(activity.id).unwrap();
    assert_eq!(read_back, samples);
}

#[test]
fn test_missing_optional_columns_read_back_as_none() {
    let dir = TempDir::new().unwrap();
    let store = CsvStore::new(dir.path());

    let samples = vec![StreamSample {
        time_seconds: 0,
        velocity_smooth: 3.0,
        heartrate: None,
        distance_meters: None,
        altitude: None,
        latitude: None,
        longitude: None,
    }];
    store.write_streams(1, &samples).unwrap();

    let read_back = store.read_streams(1).unwrap();
    assert_eq!(read_back[0].heartrate, None);
    assert_eq!(read_back[0].altitude, None);
}

#[test]
fn test_empty_cache_reads_as_empty_not_error() {
    let dir = TempDir::new().unwrap();
    let store = CsvStore::new(dir.path().join("never-created"));
    assert!(store.read_activities().unwrap().is_empty());
}

#[test]
fn test_repository_joins_samples_to_parents_and_labels_zones() {
    let dir = TempDir::new().unwrap();
    let store = CsvStore::new(dir.path());

    let activity = sample_activity(7);
    store.write_streams(activity.id, &sample_streams()).unwrap();
    store.write_activities(std::slice::from_ref(&activity)).unwrap();

    let zones = SpeedZones::from_baseline(5.0).unwrap();
    let mut repository = ActivityRepository::new(store, zones);
    let snapshot = repository.load().unwrap();

    assert_eq!(snapshot.activities.len(), 1);
    assert_eq!(snapshot.samples.len(), 3);
    // Foreign-key relation preserved on every sample.
    assert!(snapshot.samples.iter().all(|s| s.activity_id == 7));
    // 2.8 m/s is below 0.61 * 5.0 = 3.05 -> Z1; 3.1 and 3.4 sit in Z2.
    assert_eq!(snapshot.samples[0].zone, Zone::Z1);
    assert_eq!(snapshot.samples[1].zone, Zone::Z2);
    assert_eq!(snapshot.samples[2].zone, Zone::Z2);
}

#[test]
fn test_repository_memoizes_until_cleared() {
    let dir = TempDir::new().unwrap();
    let store = CsvStore::new(dir.path());

    let first = sample_activity(1);
    store.write_streams(first.id, &sample_streams()).unwrap();
    store.write_activities(std::slice::from_ref(&first)).unwrap();

    let zones = SpeedZones::from_baseline(5.0).unwrap();
    let mut repository = ActivityRepository::new(store.clone(), zones);
    assert_eq!(repository.load().unwrap().activities.len(), 1);

    // A second activity lands on disk behind the memoized snapshot.
    let second = sample_activity(2);
    store.write_streams(second.id, &sample_streams()).unwrap();
    store
        .write_activities(&[first.clone(), second.clone()])
        .unwrap();

    assert_eq!(repository.load().unwrap().activities.len(), 1);
    assert_eq!(repository.reload().unwrap().activities.len(), 2);

    repository.clear();
    assert_eq!(repository.load().unwrap().activities.len(), 2);
}

#[test]
fn test_empty_snapshot_short_circuits() {
    let dir = TempDir::new().unwrap();
    let zones = SpeedZones::from_baseline(5.0).unwrap();
    let mut repository = ActivityRepository::new(CsvStore::new(dir.path()), zones);

    let snapshot = repository.load().unwrap();
    assert!(snapshot.is_empty());
    assert!(snapshot.samples.is_empty());
}
