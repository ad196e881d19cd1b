// ABOUTME: In-memory repository over the CSV store with explicit invalidation
// ABOUTME: Loads activities plus streams, labeling every sample with its speed zone on load
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Runsight

use tracing::{debug, warn};

use super::csv_store::CsvStore;
use crate::errors::AppResult;
use crate::models::{Activity, ClassifiedSample};
use crate::zones::SpeedZones;

/// One consistent view of the cached data.
///
/// Zone labels are derived attributes: recomputed from the configured
/// thresholds on every load and never persisted.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// All cached activities
    pub activities: Vec<Activity>,
    /// All stream samples joined to their parent activity and zone-labeled
    pub samples: Vec<ClassifiedSample>,
}

impl Snapshot {
    /// Whether the cache held no activities at all
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

/// Repository holding the flat-file store plus a memoized snapshot.
///
/// Replaces process-lifetime memoization with an explicit object: callers
/// decide when to [`clear`](Self::clear) or [`reload`](Self::reload) after a
/// cache refresh.
#[derive(Debug)]
pub struct ActivityRepository {
    store: CsvStore,
    zones: SpeedZones,
    snapshot: Option<Snapshot>,
}

impl ActivityRepository {
    /// Create a repository over a store with the given zone thresholds
    pub fn new(store: CsvStore, zones: SpeedZones) -> Self {
        Self {
            store,
            zones,
            snapshot: None,
        }
    }

    /// The underlying flat-file store
    pub fn store(&self) -> &CsvStore {
        &self.store
    }

    /// Load the cached data, reusing the memoized snapshot when present.
    ///
    /// An absent cache yields an empty snapshot; every aggregation over it
    /// short-circuits to empty results.
    ///
    /// # Errors
    ///
    /// Returns `StorageError`/`SerializationError` when cache files exist but
    /// cannot be read
    pub fn load(&mut self) -> AppResult<&Snapshot> {
        if self.snapshot.is_none() {
            let snapshot = self.load_snapshot()?;
            self.snapshot = Some(snapshot);
        }
        // Just populated above when absent.
        Ok(self.snapshot.get_or_insert_with(Snapshot::default))
    }

    /// Drop the memoized snapshot; the next [`load`](Self::load) re-reads the files
    pub fn clear(&mut self) {
        self.snapshot = None;
    }

    /// Clear and immediately re-read the cache
    ///
    /// # Errors
    ///
    /// Same failure modes as [`load`](Self::load)
    pub fn reload(&mut self) -> AppResult<&Snapshot> {
        self.clear();
        self.load()
    }

    fn load_snapshot(&self) -> AppResult<Snapshot> {
        let activities = self.store.read_activities()?;
        if activities.is_empty() {
            debug!("activity cache is empty");
            return Ok(Snapshot::default());
        }

        let mut samples = Vec::new();
        for activity in &activities {
            if !self.store.has_streams(activity.id) {
                warn!(
                    "no stream file for activity {} ({}), skipping its samples",
                    activity.id, activity.name
                );
                continue;
            }
            for sample in self.store.read_streams(activity.id)? {
                samples.push(ClassifiedSample {
                    activity_id: activity.id,
                    zone: self.zones.zone_for(sample.velocity_smooth),
                    sample,
                });
            }
        }

        debug!(
            "loaded {} activities with {} samples",
            activities.len(),
            samples.len()
        );
        Ok(Snapshot {
            activities,
            samples,
        })
    }
}
