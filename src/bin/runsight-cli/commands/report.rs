// ABOUTME: Report subcommands - volume, zone-time, best-effort, and burn-up tables over the cache
// ABOUTME: Empty cache prints a friendly hint instead of erroring; --json emits rows verbatim
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

use chrono::NaiveDate;
use serde::Serialize;

use runsight::analytics::{
    best_efforts, cumulative_progress, dense_grid, rolling_mean_centered, volume_by_bucket,
    zone_time_by_bucket, DateRange, EffortMetric, Granularity, TargetPlan,
};
use runsight::cache::{ActivityRepository, CsvStore, Snapshot};
use runsight::config::Config;
use runsight::constants::units::MS_TO_KMH;
use runsight::errors::{AppError, AppResult, ErrorCode};
use runsight::zones::SpeedZones;

fn open_repository(config: &Config) -> AppResult<ActivityRepository> {
    let store = CsvStore::new(&config.cache_dir);
    let zones = config.speed_zones()?;
    Ok(ActivityRepository::new(store, zones))
}

fn print_empty_hint() {
    println!("No cached activities yet - run `runsight-cli refresh` first.");
}

fn print_json<T: Serialize>(rows: &T) -> AppResult<()> {
    let rendered = serde_json::to_string_pretty(rows).map_err(|e| {
        AppError::new(ErrorCode::SerializationError, "failed to render report").with_source(e)
    })?;
    println!("{rendered}");
    Ok(())
}

fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}

/// Training volume per time bucket
pub fn volume(config: &Config, granularity: Granularity, json: bool) -> AppResult<()> {
    let mut repository = open_repository(config)?;
    let snapshot = repository.load()?;
    if snapshot.is_empty() {
        print_empty_hint();
        return Ok(());
    }

    let rows = volume_by_bucket(&snapshot.activities, granularity);
    if json {
        return print_json(&rows);
    }

    println!("Volume per {granularity}");
    println!("{:<12} {:>5} {:>12} {:>12} {:>10}", "bucket", "runs", "km", "moving", "km/h");
    for row in &rows {
        let speed = row
            .average_speed_kmh
            .map_or_else(|| "-".to_owned(), |v| format!("{v:.1}"));
        println!(
            "{:<12} {:>5} {:>12.2} {:>12} {:>10}",
            row.bucket,
            row.activity_count,
            row.distance_meters / 1000.0,
            format_duration(row.moving_time_seconds),
            speed
        );
    }
    Ok(())
}

/// Time in each speed zone per time bucket
pub fn zones(config: &Config, granularity: Granularity, dense: bool, json: bool) -> AppResult<()> {
    let speed_zones = config.speed_zones()?;
    let mut repository = open_repository(config)?;
    let snapshot = repository.load()?;
    if snapshot.is_empty() {
        print_empty_hint();
        return Ok(());
    }

    let mut rows = zone_time_by_bucket(&snapshot.activities, &snapshot.samples, granularity);
    if dense {
        rows = dense_grid(&rows);
    }
    if json {
        return print_json(&rows);
    }

    print_zone_legend(&speed_zones);
    println!();
    println!("Time in zone per {granularity}");
    println!("{:<12} {:<5} {:>10} {:>10}", "bucket", "zone", "time", "km");
    for row in &rows {
        println!(
            "{:<12} {:<5} {:>10} {:>10.2}",
            row.bucket,
            row.zone.to_string(),
            format_duration(row.sample_count),
            row.distance_km
        );
    }
    Ok(())
}

fn print_zone_legend(speed_zones: &SpeedZones) {
    println!("Zones (pace per km):");
    for zone in runsight::zones::Zone::ALL {
        println!("  {}", speed_zones.zone_label(zone));
    }
}

/// Top buckets by effort inside a speed band
pub fn best(
    config: &Config,
    granularity: Granularity,
    min_speed: f64,
    max_speed: f64,
    metric: EffortMetric,
    top: usize,
    json: bool,
) -> AppResult<()> {
    if min_speed > max_speed {
        return Err(AppError::invalid_input(format!(
            "min speed {min_speed} m/s is above max speed {max_speed} m/s"
        )));
    }

    let mut repository = open_repository(config)?;
    let snapshot = repository.load()?;
    if snapshot.is_empty() {
        print_empty_hint();
        return Ok(());
    }

    let rows = best_efforts(
        &snapshot.activities,
        &snapshot.samples,
        granularity,
        min_speed,
        max_speed,
        metric,
        top,
    );
    if json {
        return print_json(&rows);
    }

    println!(
        "Top {top} {granularity}s by {metric} at {min_speed:.2}-{max_speed:.2} m/s"
    );
    println!("{:<4} {:<12} {:>10} {:>10}", "#", "bucket", "time", "km");
    for (rank, row) in rows.iter().enumerate() {
        println!(
            "{:<4} {:<12} {:>10} {:>10.2}",
            rank + 1,
            row.bucket,
            format_duration(row.duration_seconds),
            row.distance_km
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct ProfilePoint {
    time_seconds: u64,
    distance_km: Option<f64>,
    speed_kmh: f64,
    heartrate: Option<f64>,
    altitude: Option<f64>,
}

/// Smoothed profile of one activity (most recent when no id is given)
pub fn activity(config: &Config, id: Option<u64>, smooth: usize, json: bool) -> AppResult<()> {
    let mut repository = open_repository(config)?;
    let snapshot = repository.load()?;
    if snapshot.is_empty() {
        print_empty_hint();
        return Ok(());
    }

    let activity = match id {
        Some(id) => snapshot
            .activities
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::not_found(format!("activity {id}")))?,
        None => snapshot
            .activities
            .iter()
            .max_by_key(|a| a.start_date)
            .ok_or_else(|| AppError::not_found("latest activity"))?,
    };

    let mut track: Vec<_> = snapshot
        .samples
        .iter()
        .filter(|s| s.activity_id == activity.id)
        .collect();
    track.sort_by_key(|s| s.sample.time_seconds);

    let speeds_kmh: Vec<f64> = track
        .iter()
        .map(|s| s.sample.velocity_smooth * MS_TO_KMH)
        .collect();
    let smoothed = rolling_mean_centered(&speeds_kmh, smooth);

    let points: Vec<ProfilePoint> = track
        .iter()
        .zip(smoothed.iter())
        .map(|(s, speed_kmh)| ProfilePoint {
            time_seconds: s.sample.time_seconds,
            distance_km: s.sample.distance_meters.map(|d| d / 1000.0),
            speed_kmh: *speed_kmh,
            heartrate: s.sample.heartrate,
            altitude: s.sample.altitude,
        })
        .collect();

    if json {
        return print_json(&points);
    }

    println!(
        "{} / {} ({:.2} km)",
        activity.start_date.date_naive(),
        activity.name,
        activity.distance_km()
    );
    println!(
        "{:<8} {:>8} {:>8} {:>6} {:>8}",
        "time", "km", "km/h", "hr", "alt"
    );
    // One row per minute keeps the table readable at 1 Hz sampling.
    for point in points.iter().step_by(60) {
        let fmt_opt = |v: Option<f64>| v.map_or_else(|| "-".to_owned(), |v| format!("{v:.1}"));
        println!(
            "{:<8} {:>8} {:>8.1} {:>6} {:>8}",
            format_duration(point.time_seconds),
            fmt_opt(point.distance_km),
            point.speed_kmh,
            fmt_opt(point.heartrate),
            fmt_opt(point.altitude)
        );
    }
    Ok(())
}

fn parse_exclusion(raw: &str) -> AppResult<DateRange> {
    let (start, end) = raw.split_once("..").ok_or_else(|| {
        AppError::invalid_input(format!(
            "exclusion '{raw}' must look like YYYY-MM-DD..YYYY-MM-DD"
        ))
    })?;
    let parse = |s: &str| {
        s.parse::<NaiveDate>()
            .map_err(|e| AppError::invalid_input(format!("bad date '{s}' in exclusion")).with_source(e))
    };
    Ok(DateRange {
        start: parse(start)?,
        end: parse(end)?,
    })
}

/// Cumulative realized-vs-target distance (burn-up)
pub fn progress(
    config: &Config,
    target_km: f64,
    start: NaiveDate,
    end: NaiveDate,
    exclusions: &[String],
    json: bool,
) -> AppResult<()> {
    let exclusions = exclusions
        .iter()
        .map(|raw| parse_exclusion(raw))
        .collect::<AppResult<Vec<_>>>()?;
    let plan = TargetPlan {
        target_km,
        range: DateRange { start, end },
        exclusions,
    };

    let mut repository = open_repository(config)?;
    let snapshot: &Snapshot = repository.load()?;
    if snapshot.is_empty() {
        print_empty_hint();
        return Ok(());
    }

    let today = chrono::Utc::now().date_naive();
    let report = cumulative_progress(&snapshot.activities, &plan, today)?;

    if json {
        return print_json(&report);
    }

    let summary = &report.summary;
    println!(
        "Target {:.0} km over {} active days ({:.2} km/day)",
        summary.target_km, summary.active_days, summary.target_km_per_day
    );
    println!(
        "Realized {:.2} km ({:.1}% of target)",
        summary.realized_km,
        summary.completion_ratio * 100.0
    );
    println!();
    println!("{:<12} {:>10} {:>10} {:>10}", "date", "planned", "realized", "delta");
    for day in &report.days {
        // Future days carry no realized value; keep the table to the past.
        let Some(realized) = day.realized_km else {
            break;
        };
        let delta = day.delta_km.unwrap_or(0.0);
        println!(
            "{:<12} {:>10.2} {:>10.2} {:>+10.2}",
            day.date, day.planned_km, realized, delta
        );
    }
    Ok(())
}
