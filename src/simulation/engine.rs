//! Main simulation engine that ties everything together
//!
//! [`Simulation`] owns every junction, the current mode, the adaptive flag
//! and the history ledger. It is single-threaded; wrap it in
//! [`SharedSimulation`](super::shared::SharedSimulation) to share it between
//! a periodic driver and request handlers.

use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use super::clock::{Clock, SystemClock};
use super::config::{validate_junctions, JunctionDefinition};
use super::error::{ConfigError, SimError, SimResult};
use super::history::{HistoryLedger, Snapshot};
use super::junction::{Junction, JunctionView};
use super::metrics::{compute_city_metrics, CityMetrics};
use super::mode::Mode;
use super::priority::pick_priority_approach;
use super::types::JunctionId;

/// How long a manual override holds when no duration is given, in seconds
pub const DEFAULT_OVERRIDE_SECONDS: i64 = 90;

/// Startup knobs for a [`Simulation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationOptions {
    /// Seed for reproducible runs; entropy from the OS when `None`
    pub seed: Option<u64>,
    pub mode: Mode,
    /// Adaptive signal optimization ("smart mode")
    pub smart_mode: bool,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            seed: None,
            mode: Mode::Normal,
            smart_mode: true,
        }
    }
}

impl SimulationOptions {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

/// Everything a caller sees from `state()`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateView {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
    pub junctions: Vec<JunctionView>,
    pub metrics: CityMetrics,
    pub mode: Mode,
    pub smart_mode: bool,
    pub steps_taken: u64,
}

impl StateView {
    pub fn junction(&self, id: &str) -> Option<&JunctionView> {
        self.junctions.iter().find(|j| j.id == id)
    }

    /// Get a summary string for display
    pub fn summary(&self) -> String {
        format!(
            "Step {} | Mode: {} | Smart: {} | Avg queue: {:.1} | Avg wait: {:.1}s | Emergencies: {}",
            self.steps_taken,
            self.mode,
            if self.smart_mode { "on" } else { "off" },
            self.metrics.avg_queue,
            self.metrics.avg_wait_seconds,
            self.metrics.active_emergencies
        )
    }
}

/// Current control settings and the modes a caller may switch to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigView {
    pub mode: Mode,
    pub smart_mode: bool,
    pub available_modes: Vec<Mode>,
}

/// Result of a successful manual override
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedOverride {
    pub id: JunctionId,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub override_until: DateTime<Utc>,
    pub active_approach: String,
}

/// The simulation engine
pub struct Simulation {
    junctions: Vec<Junction>,
    mode: Mode,
    smart_mode: bool,
    history: HistoryLedger,
    rng: StdRng,
    clock: Box<dyn Clock>,
    steps_taken: u64,
}

impl Simulation {
    /// Create an engine on the wall clock
    pub fn new(
        definitions: &[JunctionDefinition],
        options: SimulationOptions,
    ) -> Result<Self, ConfigError> {
        Self::with_clock(definitions, options, SystemClock)
    }

    /// Create an engine that reads time from `clock`
    pub fn with_clock(
        definitions: &[JunctionDefinition],
        options: SimulationOptions,
        clock: impl Clock + 'static,
    ) -> Result<Self, ConfigError> {
        validate_junctions(definitions)?;

        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let now = clock.now();
        let junctions = definitions
            .iter()
            .map(|definition| Junction::seeded(definition, now, &mut rng))
            .collect::<Result<Vec<_>, _>>()?;

        let mut history = HistoryLedger::new();
        history.record(Snapshot::capture(&junctions, now));

        info!(
            "Simulation ready with {} junctions (mode {}, smart mode {})",
            junctions.len(),
            options.mode,
            options.smart_mode
        );

        Ok(Self {
            junctions,
            mode: options.mode,
            smart_mode: options.smart_mode,
            history,
            rng,
            clock: Box::new(clock),
            steps_taken: 0,
        })
    }

    /// Advance every junction by one period and record a snapshot
    ///
    /// The new junction list is built in full before it replaces the old
    /// one, so no caller ever sees a half-updated set.
    pub fn step(&mut self) {
        let now = self.clock.now();
        let params = self.mode.params();
        let smart_mode = self.smart_mode;
        let rng = &mut self.rng;

        let next: Vec<Junction> = self
            .junctions
            .iter()
            .map(|junction| {
                let readings = junction
                    .readings()
                    .iter()
                    .map(|reading| reading.drift(&params, smart_mode, rng))
                    .collect();
                let drifted = junction.with_readings(readings, now);
                let active = pick_priority_approach(&drifted, now);
                drifted.with_active(active)
            })
            .collect();

        let snapshot = Snapshot::capture(&next, now);
        self.junctions = next;
        self.history.record(snapshot);
        self.steps_taken += 1;

        debug!(
            "Step {} complete (mode {}, smart mode {}, {} snapshots)",
            self.steps_taken,
            self.mode,
            self.smart_mode,
            self.history.len()
        );
    }

    pub fn state(&self) -> StateView {
        StateView {
            updated_at: self.clock.now(),
            junctions: self.junctions.iter().map(Junction::view).collect(),
            metrics: self.metrics(),
            mode: self.mode,
            smart_mode: self.smart_mode,
            steps_taken: self.steps_taken,
        }
    }

    pub fn metrics(&self) -> CityMetrics {
        compute_city_metrics(&self.junctions)
    }

    /// The most recent `limit` snapshots, oldest first
    pub fn history(&self, limit: usize) -> Vec<Snapshot> {
        self.history.read(limit)
    }

    /// Pin a junction's green light to `approach`
    ///
    /// `duration_seconds` defaults to [`DEFAULT_OVERRIDE_SECONDS`] and must be
    /// positive.
    pub fn override_signal(
        &mut self,
        id: &str,
        approach: &str,
        duration_seconds: Option<i64>,
    ) -> SimResult<AppliedOverride> {
        let now = self.clock.now();
        let junction = self
            .junctions
            .iter_mut()
            .find(|j| j.id() == id)
            .ok_or_else(|| SimError::NotFound { id: id.to_string() })?;

        let index = junction.approach_index(approach).ok_or_else(|| {
            SimError::invalid(format!(
                "Approach {} not valid for {}",
                approach,
                junction.name()
            ))
        })?;

        let duration_seconds = duration_seconds.unwrap_or(DEFAULT_OVERRIDE_SECONDS);
        if duration_seconds <= 0 {
            return Err(SimError::invalid(format!(
                "Override duration must be positive, got {duration_seconds}"
            )));
        }
        let override_until = TimeDelta::try_seconds(duration_seconds)
            .and_then(|duration| now.checked_add_signed(duration))
            .ok_or_else(|| {
                SimError::invalid(format!("Override duration {duration_seconds}s is too long"))
            })?;

        junction.apply_override(index, override_until);
        info!(
            "Override on {}: {} green until {}",
            junction.id(),
            approach,
            override_until
        );

        Ok(AppliedOverride {
            id: junction.id().clone(),
            override_until,
            active_approach: approach.to_string(),
        })
    }

    /// Switch to the named mode; unknown names leave the mode unchanged
    pub fn set_mode(&mut self, mode: &str) -> SimResult<Mode> {
        let mode: Mode = mode.parse()?;
        if mode != self.mode {
            info!("Mode changed from {} to {}", self.mode, mode);
        }
        self.mode = mode;
        Ok(mode)
    }

    pub fn set_smart_mode(&mut self, enabled: bool) -> bool {
        if enabled != self.smart_mode {
            info!("Smart mode {}", if enabled { "enabled" } else { "disabled" });
        }
        self.smart_mode = enabled;
        enabled
    }

    pub fn config(&self) -> ConfigView {
        ConfigView {
            mode: self.mode,
            smart_mode: self.smart_mode,
            available_modes: Mode::ALL.to_vec(),
        }
    }

    pub fn junctions(&self) -> &[Junction] {
        &self.junctions
    }

    pub fn junction(&self, id: &str) -> Option<&Junction> {
        self.junctions.iter().find(|j| j.id() == id)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn smart_mode(&self) -> bool {
        self.smart_mode
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
