//! Bounded history of simulation snapshots

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::junction::{Junction, JunctionSnapshot};

/// Maximum number of snapshots kept
pub const HISTORY_CAPACITY: usize = 120;

/// Snapshots returned when a caller does not ask for a specific amount
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Point-in-time copy of every junction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub junctions: Vec<JunctionSnapshot>,
}

impl Snapshot {
    pub fn capture(junctions: &[Junction], timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            junctions: junctions.iter().map(Junction::snapshot).collect(),
        }
    }
}

/// Oldest-first log of snapshots that drops from the front when full
#[derive(Debug, Clone)]
pub struct HistoryLedger {
    snapshots: VecDeque<Snapshot>,
    capacity: usize,
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            snapshots: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn record(&mut self, snapshot: Snapshot) {
        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
        }
    }

    /// The most recent `limit` snapshots, oldest first
    pub fn read(&self, limit: usize) -> Vec<Snapshot> {
        let skip = self.snapshots.len().saturating_sub(limit);
        self.snapshots.iter().skip(skip).cloned().collect()
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.back()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Map a caller-supplied limit onto `1..=HISTORY_CAPACITY`
///
/// Missing or zero limits fall back to [`DEFAULT_HISTORY_LIMIT`].
pub fn clamp_history_limit(limit: Option<usize>) -> usize {
    match limit {
        None | Some(0) => DEFAULT_HISTORY_LIMIT,
        Some(limit) => limit.min(HISTORY_CAPACITY),
    }
}
