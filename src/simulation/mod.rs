//! Junction simulation engine
//!
//! This module contains the traffic model (sensor drift, priority lane
//! selection, metrics and history) and the concurrency boundary that lets a
//! periodic driver and request handlers share one engine. It has no
//! transport or presentation concerns; callers receive plain owned views.

mod clock;
mod config;
mod driver;
mod engine;
mod error;
mod history;
mod junction;
mod metrics;
mod mode;
mod priority;
mod reading;
mod shared;
mod types;

// Re-export public types for external use
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    default_junctions, load_junctions, parse_junctions, validate_junctions, JunctionDefinition,
};
pub use driver::{StepDriver, DEFAULT_STEP_INTERVAL};
pub use engine::{
    AppliedOverride, ConfigView, Simulation, SimulationOptions, StateView,
    DEFAULT_OVERRIDE_SECONDS,
};
pub use error::{ConfigError, SimError, SimResult};
pub use history::{
    clamp_history_limit, HistoryLedger, Snapshot, DEFAULT_HISTORY_LIMIT, HISTORY_CAPACITY,
};
pub use junction::{Junction, JunctionSnapshot, JunctionView};
pub use metrics::{compute_city_metrics, congestion_index, CityMetrics, JunctionCongestion};
pub use mode::{Mode, ModeParams, SENSOR_NOISE};
pub use priority::{highest_priority, pick_priority_approach};
pub use reading::{
    wait_for_queue, ApproachReadings, Reading, MAX_QUEUE, MIN_QUEUE, MIN_WAIT_SECONDS,
    SMART_QUEUE_ATTENUATION, SMART_WAIT_ATTENUATION, WAIT_SECONDS_PER_VEHICLE,
};
pub use shared::{Health, SharedSimulation};
pub use types::JunctionId;
