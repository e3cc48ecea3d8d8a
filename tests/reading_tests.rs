//! Sensor drift model tests

use junction_sim::simulation::{
    wait_for_queue, Mode, ModeParams, Reading, MAX_QUEUE, MIN_QUEUE, MIN_WAIT_SECONDS,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn steady(queue_multiplier: f64, emergency_probability: f64, wait_factor: f64) -> ModeParams {
    ModeParams {
        queue_multiplier,
        emergency_probability,
        drift: 0,
        wait_factor,
    }
}

#[test]
fn test_drift_stays_within_bounds_for_every_mode() {
    let mut rng = StdRng::seed_from_u64(7);
    for mode in Mode::ALL {
        for smart_mode in [true, false] {
            let mut reading = Reading::new(MIN_QUEUE, MIN_WAIT_SECONDS, false);
            for _ in 0..500 {
                reading = reading.drift(&mode.params(), smart_mode, &mut rng);
                assert!(
                    (MIN_QUEUE..=MAX_QUEUE).contains(&reading.queue_length),
                    "queue {} out of range in {} mode",
                    reading.queue_length,
                    mode
                );
                assert!(reading.avg_wait_seconds >= MIN_WAIT_SECONDS);
            }
        }
    }
}

#[test]
fn test_extreme_drift_stays_within_bounds() {
    let mut rng = StdRng::seed_from_u64(21);
    for drift in [i32::MIN, i32::MAX] {
        let params = ModeParams {
            drift,
            ..steady(1.0, 0.0, 1.0)
        };
        let mut reading = Reading::new(MAX_QUEUE, MIN_WAIT_SECONDS, false);
        for _ in 0..200 {
            reading = reading.drift(&params, false, &mut rng);
            assert!((MIN_QUEUE..=MAX_QUEUE).contains(&reading.queue_length));
            assert!(reading.avg_wait_seconds >= MIN_WAIT_SECONDS);
        }
    }
}

#[test]
fn test_smart_mode_attenuates_queue_and_wait() {
    let mut rng = StdRng::seed_from_u64(1);
    let start = Reading::new(20, 30, false);
    let params = steady(1.0, 0.0, 1.0);

    let plain = start.drift(&params, false, &mut rng);
    assert_eq!(plain.queue_length, 20);
    assert_eq!(plain.avg_wait_seconds, 36);

    // 20 * 0.82 = 16.4 -> 16; 16 * 1.8 = 28.8 -> 29; 29 * 0.78 = 22.62 -> 23
    let smart = start.drift(&params, true, &mut rng);
    assert_eq!(smart.queue_length, 16);
    assert_eq!(smart.avg_wait_seconds, 23);
}

#[test]
fn test_queue_is_clamped_to_max() {
    let mut rng = StdRng::seed_from_u64(2);
    let reading = Reading::new(MAX_QUEUE, 60, false).drift(&steady(1.6, 0.0, 1.0), false, &mut rng);
    assert_eq!(reading.queue_length, MAX_QUEUE);
}

#[test]
fn test_wait_is_floored() {
    // 2 * 1.8 = 3.6 -> 4; smart: 4 * 0.78 = 3.12 -> 3; floor 5
    assert_eq!(wait_for_queue(2, 1.0, true), MIN_WAIT_SECONDS);
    assert_eq!(wait_for_queue(2, 1.0, false), MIN_WAIT_SECONDS);
    assert_eq!(wait_for_queue(10, 1.0, false), 18);
}

#[test]
fn test_emergency_flag_is_memoryless() {
    let mut rng = StdRng::seed_from_u64(3);
    let flagged = Reading::new(10, 20, true);
    let cleared = flagged.drift(&steady(1.0, 0.0, 1.0), false, &mut rng);
    assert!(!cleared.emergency_vehicle, "emergency must not persist");

    let quiet = Reading::new(10, 20, false);
    let raised = quiet.drift(&steady(1.0, 1.0, 1.0), false, &mut rng);
    assert!(raised.emergency_vehicle);
}

#[test]
fn test_drift_is_deterministic_for_a_seed() {
    let start = Reading::new(12, 25, false);
    let params = Mode::RushHour.params();
    let run = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..20)
            .scan(start, |reading, _| {
                *reading = reading.drift(&params, true, &mut rng);
                Some(*reading)
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(run(99), run(99));
}

#[test]
fn test_priority_score_emergency_outranks_any_queue() {
    let full = Reading::new(MAX_QUEUE, 72, false);
    let emergency = Reading::new(MIN_QUEUE, 5, true);
    assert!(emergency.priority_score() >= full.priority_score());
    assert_eq!(emergency.priority_score(), MIN_QUEUE + MAX_QUEUE);
}
