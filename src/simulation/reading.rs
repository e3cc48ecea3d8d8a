//! Per-approach sensor readings and the drift model that advances them
//!
//! A reading is never patched in place. Every step replaces it with a fresh
//! value built by [`Reading::drift`].

use rand::Rng;
use serde::ser::{Serialize, Serializer};

use super::mode::ModeParams;
use super::types::round_half_up;

/// Smallest queue a sensor will report
pub const MIN_QUEUE: i32 = 2;
/// Largest queue a sensor will report
pub const MAX_QUEUE: i32 = 40;
/// Floor for the derived average wait, in seconds
pub const MIN_WAIT_SECONDS: i32 = 5;
/// Seconds of wait contributed by each queued vehicle
pub const WAIT_SECONDS_PER_VEHICLE: f64 = 1.8;
/// Queue damping applied when adaptive optimization is on
pub const SMART_QUEUE_ATTENUATION: f64 = 0.82;
/// Wait damping applied when adaptive optimization is on
pub const SMART_WAIT_ATTENUATION: f64 = 0.78;

/// What the sensors on one approach currently report
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub queue_length: i32,
    pub avg_wait_seconds: i32,
    pub emergency_vehicle: bool,
}

impl Reading {
    pub fn new(queue_length: i32, avg_wait_seconds: i32, emergency_vehicle: bool) -> Self {
        Self {
            queue_length,
            avg_wait_seconds,
            emergency_vehicle,
        }
    }

    /// Reading for a freshly configured approach
    pub fn initial<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.random_range(5..=15), rng.random_range(20..=45), false)
    }

    /// Advance this reading by one step
    ///
    /// The emergency flag is drawn fresh every time and does not depend on
    /// the previous reading.
    pub fn drift<R: Rng + ?Sized>(&self, params: &ModeParams, smart_mode: bool, rng: &mut R) -> Self {
        let drift = params.drift.saturating_abs();
        let delta = rng.random_range(-drift..=drift);

        let mut queue = (f64::from(self.queue_length) + f64::from(delta)) * params.queue_multiplier;
        if smart_mode {
            queue *= SMART_QUEUE_ATTENUATION;
        }
        let queue_length = round_half_up(queue).clamp(MIN_QUEUE, MAX_QUEUE);

        let emergency_vehicle = rng.random_bool(params.emergency_probability.clamp(0.0, 1.0));

        Self::new(
            queue_length,
            wait_for_queue(queue_length, params.wait_factor, smart_mode),
            emergency_vehicle,
        )
    }

    /// Score used to rank approaches for the green light
    ///
    /// An emergency adds [`MAX_QUEUE`], which outranks any queue without one.
    pub fn priority_score(&self) -> i32 {
        let bias = if self.emergency_vehicle { MAX_QUEUE } else { 0 };
        self.queue_length + bias
    }
}

/// Average wait implied by a queue length
pub fn wait_for_queue(queue_length: i32, wait_factor: f64, smart_mode: bool) -> i32 {
    let mut wait = round_half_up(f64::from(queue_length) * WAIT_SECONDS_PER_VEHICLE * wait_factor);
    if smart_mode {
        wait = round_half_up(f64::from(wait) * SMART_WAIT_ATTENUATION);
    }
    wait.max(MIN_WAIT_SECONDS)
}

/// Readings keyed by approach, in the junction's declared approach order
///
/// Serializes as a JSON object so callers can look readings up by approach.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApproachReadings(Vec<(String, Reading)>);

impl ApproachReadings {
    pub fn new(entries: Vec<(String, Reading)>) -> Self {
        Self(entries)
    }

    pub fn get(&self, approach: &str) -> Option<&Reading> {
        self.0
            .iter()
            .find(|(name, _)| name == approach)
            .map(|(_, reading)| reading)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Reading)> {
        self.0.iter().map(|(name, reading)| (name.as_str(), reading))
    }

    pub fn approaches(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ApproachReadings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, reading)| (name, reading)))
    }
}
