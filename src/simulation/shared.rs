//! Thread-safe handle to a running simulation
//!
//! Every operation takes the same lock, so a step, a query and a mutation
//! never overlap. Queries hand back owned copies.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use log::warn;
use serde::Serialize;

use super::engine::{AppliedOverride, ConfigView, Simulation, StateView};
use super::error::SimResult;
use super::history::Snapshot;
use super::mode::Mode;

/// Liveness check payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub status: &'static str,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

/// Cloneable, lock-guarded handle to a [`Simulation`]
#[derive(Clone)]
pub struct SharedSimulation {
    inner: Arc<Mutex<Simulation>>,
}

impl SharedSimulation {
    pub fn new(simulation: Simulation) -> Self {
        Self {
            inner: Arc::new(Mutex::new(simulation)),
        }
    }

    /// Take the engine lock
    ///
    /// A step swaps in its new junctions only after they are fully built, so
    /// a lock poisoned by a panicking step still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, Simulation> {
        self.inner.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            warn!("Recovering simulation state after a panicked operation");
            self.inner.clear_poison();
            poisoned.into_inner()
        })
    }

    pub fn step(&self) {
        self.lock().step();
    }

    /// Step, then read the fresh state without letting anything in between
    pub fn step_and_state(&self) -> StateView {
        let mut simulation = self.lock();
        simulation.step();
        simulation.state()
    }

    pub fn state(&self) -> StateView {
        self.lock().state()
    }

    pub fn history(&self, limit: usize) -> Vec<Snapshot> {
        self.lock().history(limit)
    }

    pub fn override_signal(
        &self,
        id: &str,
        approach: &str,
        duration_seconds: Option<i64>,
    ) -> SimResult<AppliedOverride> {
        self.lock().override_signal(id, approach, duration_seconds)
    }

    pub fn set_mode(&self, mode: &str) -> SimResult<Mode> {
        self.lock().set_mode(mode)
    }

    pub fn set_smart_mode(&self, enabled: bool) -> bool {
        self.lock().set_smart_mode(enabled)
    }

    pub fn config(&self) -> ConfigView {
        self.lock().config()
    }

    pub fn steps_taken(&self) -> u64 {
        self.lock().steps_taken()
    }

    pub fn health(&self) -> Health {
        Health {
            status: "ok",
            updated_at: self.lock().now(),
        }
    }

    /// Run `f` with exclusive access to the engine
    pub fn with<T>(&self, f: impl FnOnce(&mut Simulation) -> T) -> T {
        f(&mut self.lock())
    }
}
