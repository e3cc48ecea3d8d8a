//! Priority lane selection
//!
//! Decides which approach of a junction gets the green light for the next
//! period.

use chrono::{DateTime, Utc};

use super::junction::Junction;
use super::reading::Reading;

/// Index of the approach that should be green after this step
///
/// `junction` must already carry the readings for this step. An unexpired
/// override keeps the current approach no matter what the sensors say.
pub fn pick_priority_approach(junction: &Junction, now: DateTime<Utc>) -> usize {
    if junction.override_active(now) {
        return junction.active_index();
    }
    highest_priority(junction.readings())
}

/// Index of the reading with the highest priority score
///
/// Ties go to the earliest reading. Returns 0 for an empty slice.
pub fn highest_priority(readings: &[Reading]) -> usize {
    let mut best = 0;
    let mut best_score = i32::MIN;
    for (index, reading) in readings.iter().enumerate() {
        let score = reading.priority_score();
        if score > best_score {
            best = index;
            best_score = score;
        }
    }
    best
}
