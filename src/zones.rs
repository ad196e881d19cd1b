// ABOUTME: Speed-zone threshold table, per-sample zone classification, and pace formatting
// ABOUTME: Derives six ascending boundaries from the baseline speed and buckets speeds into Z1..Z7
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::units::{METERS_PER_KM, SECONDS_PER_MINUTE};
use crate::constants::zone_factors::BOUNDARY_FACTORS;
use crate::errors::{AppError, AppResult};

/// A discrete speed bucket, Z1 slowest through Z7 fastest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Easy / recovery
    Z1,
    /// Steady endurance
    Z2,
    /// Tempo
    Z3,
    /// Threshold
    Z4,
    /// Long maximal-aerobic intervals
    Z5,
    /// Medium maximal-aerobic intervals
    Z6,
    /// Short maximal-aerobic / sprint
    Z7,
}

impl Zone {
    /// All zones in ascending order
    pub const ALL: [Self; 7] = [
        Self::Z1,
        Self::Z2,
        Self::Z3,
        Self::Z4,
        Self::Z5,
        Self::Z6,
        Self::Z7,
    ];

    /// 1-based zone number
    pub fn number(self) -> u8 {
        match self {
            Self::Z1 => 1,
            Self::Z2 => 2,
            Self::Z3 => 3,
            Self::Z4 => 4,
            Self::Z5 => 5,
            Self::Z6 => 6,
            Self::Z7 => 7,
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Z{}", self.number())
    }
}

/// Format a speed as a pace string in minutes:seconds per kilometer.
///
/// Minutes and seconds are floor-divided out of `1000 / speed`, seconds
/// zero-padded (`4:05`).
///
/// # Errors
///
/// Returns `InvalidInput` when `speed_m_s <= 0` (pace undefined).
pub fn format_pace(speed_m_s: f64) -> AppResult<String> {
    if speed_m_s.is_nan() || speed_m_s <= 0.0 {
        return Err(AppError::invalid_input(format!(
            "pace undefined for non-positive speed {speed_m_s} m/s"
        )));
    }

    let seconds_per_km = METERS_PER_KM / speed_m_s;
    let minutes = (seconds_per_km / SECONDS_PER_MINUTE) as u64;
    let seconds = (seconds_per_km % SECONDS_PER_MINUTE) as u64;

    Ok(format!("{minutes}:{seconds:02}"))
}

/// The speed-zone threshold table derived from one baseline speed.
///
/// Six ascending boundaries split the speed axis into seven half-open zones;
/// a boundary value belongs to the zone below it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedZones {
    baseline_m_s: f64,
    thresholds: [f64; 6],
    boundary_paces: [String; 6],
}

impl SpeedZones {
    /// Derive the threshold table from a baseline (maximal aerobic) speed in m/s.
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` when the baseline is not strictly positive:
    /// the zones would be degenerate and every caller must reject this at
    /// startup.
    pub fn from_baseline(baseline_m_s: f64) -> AppResult<Self> {
        if baseline_m_s.is_nan() || baseline_m_s <= 0.0 {
            return Err(AppError::config(format!(
                "baseline speed must be positive, got {baseline_m_s} m/s"
            )));
        }

        let thresholds = BOUNDARY_FACTORS.map(|factor| factor * baseline_m_s);

        // Thresholds are all positive here, so pace formatting cannot fail.
        let boundary_paces = [
            format_pace(thresholds[0])?,
            format_pace(thresholds[1])?,
            format_pace(thresholds[2])?,
            format_pace(thresholds[3])?,
            format_pace(thresholds[4])?,
            format_pace(thresholds[5])?,
        ];

        Ok(Self {
            baseline_m_s,
            thresholds,
            boundary_paces,
        })
    }

    /// The configured baseline speed in m/s
    pub fn baseline_m_s(&self) -> f64 {
        self.baseline_m_s
    }

    /// The six ascending zone boundaries in m/s
    pub fn thresholds(&self) -> &[f64; 6] {
        &self.thresholds
    }

    /// Classify one instantaneous speed into its zone.
    ///
    /// Upper bounds are exclusive of the next zone: a speed equal to a
    /// boundary falls into the zone below. Negative or zero speeds classify
    /// as Z1 (stationary), not as an error.
    pub fn zone_for(&self, speed_m_s: f64) -> Zone {
        let t = &self.thresholds;
        if speed_m_s > t[5] {
            Zone::Z7
        } else if speed_m_s > t[4] {
            Zone::Z6
        } else if speed_m_s > t[3] {
            Zone::Z5
        } else if speed_m_s > t[2] {
            Zone::Z4
        } else if speed_m_s > t[1] {
            Zone::Z3
        } else if speed_m_s > t[0] {
            Zone::Z2
        } else {
            Zone::Z1
        }
    }

    /// Render a zone's label decorated with its bounding pace range,
    /// e.g. `Z3 (4:30-3:58)`. The bottom and top zones render as open-ended
    /// ranges (`Z1 (< 5:19)`, `Z7 (> 3:05)`).
    pub fn zone_label(&self, zone: Zone) -> String {
        let p = &self.boundary_paces;
        match zone {
            Zone::Z1 => format!("Z1 (< {})", p[0]),
            Zone::Z7 => format!("Z7 (> {})", p[5]),
            other => {
                let i = usize::from(other.number()) - 2;
                format!("{} ({}-{})", other, p[i], p[i + 1])
            }
        }
    }

    /// Classify a speed and return its decorated zone label
    pub fn label_for(&self, speed_m_s: f64) -> String {
        self.zone_label(self.zone_for(speed_m_s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_match_factors_and_increase() {
        let baseline = 5.14;
        let zones = SpeedZones::from_baseline(baseline).unwrap();
        let t = zones.thresholds();

        for (i, factor) in BOUNDARY_FACTORS.iter().enumerate() {
            assert!((t[i] - factor * baseline).abs() < f64::EPSILON);
        }
        for pair in t.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_non_positive_baseline_rejected() {
        assert!(SpeedZones::from_baseline(0.0).is_err());
        assert!(SpeedZones::from_baseline(-3.0).is_err());
        assert!(SpeedZones::from_baseline(f64::NAN).is_err());
    }

    #[test]
    fn test_boundary_values_fall_into_lower_zone() {
        let zones = SpeedZones::from_baseline(10.0).unwrap();
        let t = *zones.thresholds();

        for (i, boundary) in t.iter().enumerate() {
            let expected = Zone::ALL[i]; // boundary i separates zone i+1 from i+2
            assert_eq!(zones.zone_for(*boundary), expected);
        }
        assert_eq!(zones.zone_for(t[5] + 0.001), Zone::Z7);
    }

    #[test]
    fn test_classifier_is_monotonic() {
        let zones = SpeedZones::from_baseline(5.0).unwrap();
        let mut previous = Zone::Z1;
        let mut speed = -1.0;
        while speed < 7.0 {
            let zone = zones.zone_for(speed);
            assert!(zone >= previous, "zone order regressed at {speed} m/s");
            previous = zone;
            speed += 0.01;
        }
    }

    #[test]
    fn test_stationary_speeds_are_z1() {
        let zones = SpeedZones::from_baseline(5.0).unwrap();
        assert_eq!(zones.zone_for(0.0), Zone::Z1);
        assert_eq!(zones.zone_for(-2.5), Zone::Z1);
    }

    #[test]
    fn test_format_pace() {
        assert_eq!(format_pace(5.0).unwrap(), "3:20");
        assert_eq!(format_pace(4.0).unwrap(), "4:10");
        assert_eq!(format_pace(2.0).unwrap(), "8:20");
        assert!(format_pace(0.0).is_err());
        assert!(format_pace(-1.0).is_err());
    }

    #[test]
    fn test_labels_render_pace_ranges() {
        // Baseline 5 m/s: boundaries at 3.05, 3.75, 4.25, 4.6, 4.85, 5.25 m/s
        let zones = SpeedZones::from_baseline(5.0).unwrap();

        assert_eq!(zones.label_for(1.0), "Z1 (< 5:27)");
        assert_eq!(zones.label_for(6.0), "Z7 (> 3:10)");
        // 4.0 m/s is above 3.75 and at most 4.25 -> Z3
        assert_eq!(zones.label_for(4.0), "Z3 (4:26-3:55)");
    }

    #[test]
    fn test_exactly_one_label_per_speed() {
        let zones = SpeedZones::from_baseline(4.8).unwrap();
        for speed in [-1.0, 0.0, 1.5, 2.93, 3.6, 4.8, 5.04, 9.9] {
            let zone = zones.zone_for(speed);
            assert!(Zone::ALL.contains(&zone));
        }
    }
}
