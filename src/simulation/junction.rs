//! Junction model
//!
//! A junction owns one reading per approach and tracks which approach holds
//! the green light. Approaches are fixed at construction; readings are kept
//! in the same order, so the two can never drift apart.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use super::config::JunctionDefinition;
use super::error::ConfigError;
use super::reading::{ApproachReadings, Reading, MAX_QUEUE, MIN_QUEUE, MIN_WAIT_SECONDS};
use super::types::JunctionId;

/// One signalled intersection
#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    id: JunctionId,
    name: String,
    approaches: Vec<String>,
    baseline_cycle_seconds: u32,
    /// Index into `approaches` of the green approach
    active: usize,
    override_until: Option<DateTime<Utc>>,
    last_updated: DateTime<Utc>,
    /// Parallel to `approaches`
    readings: Vec<Reading>,
}

impl Junction {
    /// Build a junction with explicit readings, one per approach
    ///
    /// Every reading must already be within the range a sensor can report.
    pub fn new(
        definition: &JunctionDefinition,
        readings: Vec<Reading>,
        now: DateTime<Utc>,
    ) -> Result<Self, ConfigError> {
        definition.validate()?;
        if readings.len() != definition.approaches.len() {
            return Err(ConfigError::ReadingMismatch {
                id: definition.id.clone(),
                expected: definition.approaches.len(),
                actual: readings.len(),
            });
        }
        for (approach, reading) in definition.approaches.iter().zip(&readings) {
            let queue_ok = (MIN_QUEUE..=MAX_QUEUE).contains(&reading.queue_length);
            if !queue_ok || reading.avg_wait_seconds < MIN_WAIT_SECONDS {
                return Err(ConfigError::ReadingOutOfRange {
                    id: definition.id.clone(),
                    approach: approach.clone(),
                });
            }
        }
        Ok(Self {
            id: JunctionId::new(definition.id.clone()),
            name: definition.name.clone(),
            approaches: definition.approaches.clone(),
            baseline_cycle_seconds: definition.baseline_cycle_seconds,
            active: 0,
            override_until: None,
            last_updated: now,
            readings,
        })
    }

    /// Build a junction with randomly seeded starting readings
    pub fn seeded<R: Rng + ?Sized>(
        definition: &JunctionDefinition,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let readings = definition
            .approaches
            .iter()
            .map(|_| Reading::initial(rng))
            .collect();
        Self::new(definition, readings, now)
    }

    /// Same junction with a fresh set of readings
    ///
    /// The green approach and override window carry over unchanged.
    pub(crate) fn with_readings(&self, readings: Vec<Reading>, now: DateTime<Utc>) -> Self {
        debug_assert_eq!(readings.len(), self.approaches.len());
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            approaches: self.approaches.clone(),
            baseline_cycle_seconds: self.baseline_cycle_seconds,
            active: self.active,
            override_until: self.override_until,
            last_updated: now,
            readings,
        }
    }

    /// Same junction with a different green approach
    pub(crate) fn with_active(self, active: usize) -> Self {
        debug_assert!(active < self.approaches.len());
        Self {
            id: self.id,
            name: self.name,
            approaches: self.approaches,
            baseline_cycle_seconds: self.baseline_cycle_seconds,
            active,
            override_until: self.override_until,
            last_updated: self.last_updated,
            readings: self.readings,
        }
    }

    /// Pin the green light to an approach until `until`
    pub(crate) fn apply_override(&mut self, active: usize, until: DateTime<Utc>) {
        debug_assert!(active < self.approaches.len());
        self.active = active;
        self.override_until = Some(until);
    }

    pub fn id(&self) -> &JunctionId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn approaches(&self) -> &[String] {
        &self.approaches
    }

    pub fn baseline_cycle_seconds(&self) -> u32 {
        self.baseline_cycle_seconds
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_approach(&self) -> &str {
        &self.approaches[self.active]
    }

    pub fn override_until(&self) -> Option<DateTime<Utc>> {
        self.override_until
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Readings in approach order
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn reading(&self, approach: &str) -> Option<&Reading> {
        self.approach_index(approach).map(|index| &self.readings[index])
    }

    pub fn approach_index(&self, approach: &str) -> Option<usize> {
        self.approaches.iter().position(|a| a == approach)
    }

    /// Whether a manual override is still holding the green light at `now`
    ///
    /// Expired overrides are left in place; they simply stop counting.
    pub fn override_active(&self, now: DateTime<Utc>) -> bool {
        self.override_until.is_some_and(|until| now < until)
    }

    pub fn approach_readings(&self) -> ApproachReadings {
        ApproachReadings::new(
            self.approaches
                .iter()
                .cloned()
                .zip(self.readings.iter().copied())
                .collect(),
        )
    }

    /// Sum of queue lengths across every approach
    pub fn total_queue(&self) -> i32 {
        self.readings.iter().map(|r| r.queue_length).sum()
    }

    pub fn snapshot(&self) -> JunctionSnapshot {
        JunctionSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            active_approach: self.active_approach().to_string(),
            readings: self.approach_readings(),
        }
    }

    pub fn view(&self) -> JunctionView {
        JunctionView {
            id: self.id.clone(),
            name: self.name.clone(),
            approaches: self.approaches.clone(),
            baseline_cycle_seconds: self.baseline_cycle_seconds,
            active_approach: self.active_approach().to_string(),
            override_until: self.override_until,
            last_updated: self.last_updated,
            readings: self.approach_readings(),
        }
    }
}

/// The part of a junction kept in history
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JunctionSnapshot {
    pub id: JunctionId,
    pub name: String,
    pub active_approach: String,
    pub readings: ApproachReadings,
}

/// Owned copy of a junction handed to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JunctionView {
    pub id: JunctionId,
    pub name: String,
    pub approaches: Vec<String>,
    pub baseline_cycle_seconds: u32,
    pub active_approach: String,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub override_until: Option<DateTime<Utc>>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_updated: DateTime<Utc>,
    pub readings: ApproachReadings,
}

impl JunctionView {
    /// One-line description for console output
    pub fn summary(&self) -> String {
        let queues: Vec<String> = self
            .readings
            .iter()
            .map(|(approach, reading)| {
                let flag = if reading.emergency_vehicle { "!" } else { "" };
                format!("{}={}{}", approach, reading.queue_length, flag)
            })
            .collect();
        format!(
            "{} [{}] green={} queues: {}",
            self.name,
            self.id,
            self.active_approach,
            queues.join(" ")
        )
    }
}
