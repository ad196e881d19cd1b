// ABOUTME: Cumulative realized-vs-target distance series over a date range (burn-up)
// ABOUTME: Per-day planned rate spreads the target over active days, skipping exclusion windows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::units::METERS_PER_KM;
use crate::errors::{AppError, AppResult};
use crate::models::Activity;

/// An inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range
    pub start: NaiveDate,
    /// Last day of the range
    pub end: NaiveDate,
}

impl DateRange {
    /// Whether the date falls inside the range (bounds included)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// A distance target over a date range with excluded sub-ranges
/// (vacations, injury breaks) that carry no planned volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetPlan {
    /// Total target distance in kilometers
    pub target_km: f64,
    /// The plan's date range
    pub range: DateRange,
    /// Sub-ranges excluded from the plan
    pub exclusions: Vec<DateRange>,
}

impl TargetPlan {
    /// Whether the day carries planned volume
    fn is_active(&self, date: NaiveDate) -> bool {
        self.range.contains(date) && !self.exclusions.iter().any(|ex| ex.contains(date))
    }
}

/// One day of the burn-up series. `planned_km` and `realized_km` are
/// cumulative; days after "today" have no realized value yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyProgress {
    /// Calendar day
    pub date: NaiveDate,
    /// Whether the day carries planned volume
    pub active: bool,
    /// Cumulative planned distance in kilometers
    pub planned_km: f64,
    /// Cumulative realized distance in kilometers; `None` for future days
    pub realized_km: Option<f64>,
    /// Realized minus planned; `None` for future days
    pub delta_km: Option<f64>,
}

/// Headline numbers for a target plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    /// Total target distance in kilometers
    pub target_km: f64,
    /// Realized distance so far in kilometers
    pub realized_km: f64,
    /// Realized / target (may exceed 1.0)
    pub completion_ratio: f64,
    /// Planned distance per active day in kilometers
    pub target_km_per_day: f64,
    /// Number of active days in the range
    pub active_days: u64,
}

/// Burn-up series plus summary
#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    /// One entry per day of the range, in order
    pub days: Vec<DailyProgress>,
    /// Headline numbers
    pub summary: ProgressSummary,
}

/// Compute the cumulative realized-vs-planned distance series for a plan.
///
/// `today` is injected rather than read from the clock so the operation
/// stays pure; days strictly after it show `None` realized distance.
///
/// # Errors
///
/// Returns `ConfigInvalid` when the range is inverted, the target is not
/// positive, or every day of the range is excluded (the per-day rate would
/// divide by zero)
pub fn cumulative_progress(
    activities: &[Activity],
    plan: &TargetPlan,
    today: NaiveDate,
) -> AppResult<ProgressReport> {
    if plan.range.start > plan.range.end {
        return Err(AppError::config(format!(
            "target range start {} is after end {}",
            plan.range.start, plan.range.end
        )));
    }
    if plan.target_km.is_nan() || plan.target_km <= 0.0 {
        return Err(AppError::config(format!(
            "target distance must be positive, got {} km",
            plan.target_km
        )));
    }

    let active_days = plan
        .range
        .start
        .iter_days()
        .take_while(|d| *d <= plan.range.end)
        .filter(|d| plan.is_active(*d))
        .count() as u64;
    if active_days == 0 {
        return Err(AppError::config(
            "every day of the target range is excluded",
        ));
    }
    let target_km_per_day = plan.target_km / active_days as f64;

    let mut realized_by_day: HashMap<NaiveDate, f64> = HashMap::new();
    for activity in activities {
        let date = activity.start_date.date_naive();
        if plan.range.contains(date) {
            *realized_by_day.entry(date).or_insert(0.0) +=
                activity.distance_meters / METERS_PER_KM;
        }
    }

    let mut days = Vec::new();
    let mut planned_cum = 0.0;
    let mut realized_cum = 0.0;
    for date in plan
        .range
        .start
        .iter_days()
        .take_while(|d| *d <= plan.range.end)
    {
        let active = plan.is_active(date);
        if active {
            planned_cum += target_km_per_day;
        }

        let realized_km = if date > today {
            None
        } else {
            realized_cum += realized_by_day.get(&date).copied().unwrap_or(0.0);
            Some(realized_cum)
        };

        days.push(DailyProgress {
            date,
            active,
            planned_km: planned_cum,
            realized_km,
            delta_km: realized_km.map(|r| r - planned_cum),
        });
    }

    let summary = ProgressSummary {
        target_km: plan.target_km,
        realized_km: realized_cum,
        completion_ratio: realized_cum / plan.target_km,
        target_km_per_day,
        active_days,
    };

    Ok(ProgressReport { days, summary })
}
