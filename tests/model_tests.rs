//! Junction, priority selection, history and metrics tests

use chrono::{DateTime, TimeDelta, Utc};
use junction_sim::simulation::{
    clamp_history_limit, compute_city_metrics, congestion_index, highest_priority,
    pick_priority_approach, ConfigError, HistoryLedger, Junction, JunctionDefinition, Reading,
    Snapshot, DEFAULT_HISTORY_LIMIT, HISTORY_CAPACITY, MAX_QUEUE, MIN_QUEUE, MIN_WAIT_SECONDS,
};

fn start_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

fn crossing() -> JunctionDefinition {
    JunctionDefinition::new("j-1", "Test Crossing", ["north", "south"], 90)
}

fn junction_with(queues: &[(i32, bool)]) -> Junction {
    let approaches: Vec<String> = (0..queues.len()).map(|i| format!("a{i}")).collect();
    let definition = JunctionDefinition::new("j-x", "Generated", approaches, 60);
    let readings = queues
        .iter()
        .map(|&(queue, emergency)| Reading::new(queue, 10, emergency))
        .collect();
    Junction::new(&definition, readings, start_time()).unwrap()
}

#[test]
fn test_junction_starts_on_first_approach() {
    let junction = Junction::new(
        &crossing(),
        vec![Reading::new(5, 20, false), Reading::new(30, 50, false)],
        start_time(),
    )
    .unwrap();
    assert_eq!(junction.active_approach(), "north");
    assert_eq!(junction.override_until(), None);
    assert_eq!(junction.reading("south").map(|r| r.queue_length), Some(30));
    assert_eq!(junction.reading("west"), None);

    assert_eq!(junction.baseline_cycle_seconds(), 90);

    let readings = junction.approach_readings();
    let keys: Vec<&str> = readings.approaches().collect();
    assert_eq!(keys, vec!["north", "south"]);
    assert_eq!(readings.get("north"), Some(&Reading::new(5, 20, false)));
    assert_eq!(readings.get("east"), None);
}

#[test]
fn test_junction_rejects_mismatched_readings() {
    let result = Junction::new(&crossing(), vec![Reading::new(5, 20, false)], start_time());
    assert!(matches!(
        result,
        Err(ConfigError::ReadingMismatch {
            expected: 2,
            actual: 1,
            ..
        })
    ));
}

#[test]
fn test_junction_rejects_readings_outside_sensor_range() {
    let out_of_range = [
        Reading::new(MIN_QUEUE - 1, 20, false),
        Reading::new(MAX_QUEUE + 1, 20, false),
        Reading::new(10, MIN_WAIT_SECONDS - 1, false),
        Reading::new(i32::MIN, i32::MIN, false),
    ];
    for bad in out_of_range {
        let result = Junction::new(&crossing(), vec![Reading::new(5, 20, false), bad], start_time());
        match result {
            Err(ConfigError::ReadingOutOfRange { id, approach }) => {
                assert_eq!(id, "j-1");
                assert_eq!(approach, "south");
            }
            other => panic!("expected ReadingOutOfRange for {:?}, got {:?}", bad, other),
        }
    }

    let edges = vec![
        Reading::new(MIN_QUEUE, MIN_WAIT_SECONDS, false),
        Reading::new(MAX_QUEUE, MIN_WAIT_SECONDS, true),
    ];
    assert!(Junction::new(&crossing(), edges, start_time()).is_ok());
}

#[test]
fn test_highest_priority_prefers_longest_queue() {
    let readings = [
        Reading::new(8, 10, false),
        Reading::new(25, 10, false),
        Reading::new(12, 10, false),
    ];
    assert_eq!(highest_priority(&readings), 1);
}

#[test]
fn test_highest_priority_ties_go_to_first_declared() {
    let readings = [
        Reading::new(20, 10, false),
        Reading::new(20, 10, false),
        Reading::new(3, 10, false),
    ];
    assert_eq!(highest_priority(&readings), 0);

    let emergencies = [
        Reading::new(40, 10, false),
        Reading::new(15, 10, true),
        Reading::new(15, 10, true),
    ];
    assert_eq!(highest_priority(&emergencies), 1);
}

#[test]
fn test_emergency_beats_full_queue() {
    let readings = [Reading::new(40, 72, false), Reading::new(2, 5, true)];
    assert_eq!(highest_priority(&readings), 1);
}

#[test]
fn test_highest_priority_of_empty_slice_is_zero() {
    assert_eq!(highest_priority(&[]), 0);
}

#[test]
fn test_pick_priority_without_override_uses_readings() {
    let now = start_time();
    let quiet = junction_with(&[(5, false), (30, false)]);
    assert_eq!(pick_priority_approach(&quiet, now), 1);
    assert!(!quiet.override_active(now));
}

#[test]
fn test_congestion_index_example() {
    let junction = junction_with(&[(10, false), (20, false)]);
    let metrics = compute_city_metrics(std::slice::from_ref(&junction));
    assert_eq!(metrics.junction_congestion.len(), 1);
    assert_eq!(metrics.junction_congestion[0].congestion_index, 0.38);
    assert_eq!(congestion_index(30, 2), 0.38);
    assert_eq!(congestion_index(0, 0), 0.0);
}

#[test]
fn test_city_metrics_averages_every_reading() {
    let a = junction_with(&[(10, false), (20, true)]);
    let b = junction_with(&[(3, true), (4, false), (5, false)]);
    let metrics = compute_city_metrics(&[a, b]);

    // 42 / 5 = 8.4
    assert_eq!(metrics.avg_queue, 8.4);
    assert_eq!(metrics.avg_wait_seconds, 10.0);
    assert_eq!(metrics.active_emergencies, 2);
    assert_eq!(metrics.junction_congestion[1].congestion_index, 0.1);
}

#[test]
fn test_city_metrics_with_no_junctions() {
    let metrics = compute_city_metrics(&[]);
    assert_eq!(metrics.avg_queue, 0.0);
    assert_eq!(metrics.avg_wait_seconds, 0.0);
    assert_eq!(metrics.active_emergencies, 0);
    assert!(metrics.junction_congestion.is_empty());
}

#[test]
fn test_history_ledger_evicts_oldest() {
    let junction = junction_with(&[(10, false), (20, false)]);
    let mut ledger = HistoryLedger::new();
    assert_eq!(ledger.capacity(), HISTORY_CAPACITY);
    for second in 0..130 {
        let at = start_time() + TimeDelta::seconds(second);
        ledger.record(Snapshot::capture(std::slice::from_ref(&junction), at));
        assert!(ledger.len() <= HISTORY_CAPACITY);
    }

    let all = ledger.read(HISTORY_CAPACITY);
    assert_eq!(all.len(), HISTORY_CAPACITY);
    assert_eq!(all[0].timestamp, start_time() + TimeDelta::seconds(10));
    assert_eq!(
        ledger.latest().map(|s| s.timestamp),
        Some(start_time() + TimeDelta::seconds(129))
    );
    assert!(all.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}

#[test]
fn test_history_ledger_read_returns_most_recent() {
    let junction = junction_with(&[(10, false), (20, false)]);
    let mut ledger = HistoryLedger::with_capacity(5);
    for second in 0..3 {
        let at = start_time() + TimeDelta::seconds(second);
        ledger.record(Snapshot::capture(std::slice::from_ref(&junction), at));
    }

    let recent = ledger.read(2);
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].timestamp, start_time() + TimeDelta::seconds(1));
    assert_eq!(recent[1].timestamp, start_time() + TimeDelta::seconds(2));
    assert_eq!(ledger.read(50).len(), 3);
}

#[test]
fn test_clamp_history_limit() {
    assert_eq!(clamp_history_limit(None), DEFAULT_HISTORY_LIMIT);
    assert_eq!(clamp_history_limit(Some(0)), DEFAULT_HISTORY_LIMIT);
    assert_eq!(clamp_history_limit(Some(1)), 1);
    assert_eq!(clamp_history_limit(Some(500)), HISTORY_CAPACITY);
}
