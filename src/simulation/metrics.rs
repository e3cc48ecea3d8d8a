//! City-wide and per-junction summary statistics
//!
//! Metrics are derived on demand from the current junctions and never stored.

use serde::Serialize;

use super::junction::Junction;
use super::reading::MAX_QUEUE;
use super::types::{round_to, JunctionId};

/// Aggregate view over every junction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityMetrics {
    /// Mean queue over every (junction, approach) pair, one decimal
    pub avg_queue: f64,
    /// Mean wait over every (junction, approach) pair, one decimal
    pub avg_wait_seconds: f64,
    pub active_emergencies: usize,
    pub junction_congestion: Vec<JunctionCongestion>,
}

/// Load on one junction as a fraction of full saturation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JunctionCongestion {
    pub id: JunctionId,
    pub name: String,
    pub congestion_index: f64,
}

pub fn compute_city_metrics(junctions: &[Junction]) -> CityMetrics {
    let mut queue_total: i64 = 0;
    let mut wait_total: i64 = 0;
    let mut count: usize = 0;
    let mut active_emergencies = 0;

    for reading in junctions.iter().flat_map(|j| j.readings()) {
        queue_total += i64::from(reading.queue_length);
        wait_total += i64::from(reading.avg_wait_seconds);
        count += 1;
        if reading.emergency_vehicle {
            active_emergencies += 1;
        }
    }

    let mean = |total: i64| {
        if count == 0 {
            0.0
        } else {
            round_to(total as f64 / count as f64, 1)
        }
    };

    CityMetrics {
        avg_queue: mean(queue_total),
        avg_wait_seconds: mean(wait_total),
        active_emergencies,
        junction_congestion: junctions
            .iter()
            .map(|junction| JunctionCongestion {
                id: junction.id().clone(),
                name: junction.name().to_string(),
                congestion_index: congestion_index(
                    junction.total_queue(),
                    junction.approaches().len(),
                ),
            })
            .collect(),
    }
}

/// `queue_total / (approach_count * MAX_QUEUE)`, rounded to two decimals
pub fn congestion_index(queue_total: i32, approach_count: usize) -> f64 {
    if approach_count == 0 {
        return 0.0;
    }
    let capacity = approach_count as f64 * f64::from(MAX_QUEUE);
    round_to(f64::from(queue_total) / capacity, 2)
}
