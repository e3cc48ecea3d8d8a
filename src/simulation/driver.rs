//! Periodic step driver
//!
//! Runs `step()` on a dedicated thread at a fixed interval until stopped.

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, select, tick, Sender};
use log::{debug, error};

use super::shared::SharedSimulation;

/// Default time between steps
pub const DEFAULT_STEP_INTERVAL: Duration = Duration::from_millis(5000);

/// Shortest interval the driver will tick at
const MIN_STEP_INTERVAL: Duration = Duration::from_millis(1);

/// Background thread that steps a shared simulation
///
/// Dropping the driver stops it and waits for the thread to exit.
pub struct StepDriver {
    shutdown: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    interval: Duration,
}

impl StepDriver {
    pub fn spawn(simulation: SharedSimulation, interval: Duration) -> io::Result<Self> {
        let interval = interval.max(MIN_STEP_INTERVAL);
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);
        let ticker = tick(interval);

        let handle = thread::Builder::new()
            .name("junction-sim-driver".to_string())
            .spawn(move || loop {
                select! {
                    recv(ticker) -> _ => run_tick(&simulation),
                    recv(shutdown_rx) -> _ => break,
                }
            })?;

        debug!("Step driver started with interval {:?}", interval);
        Ok(Self {
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
            interval,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Stop ticking and wait for the driver thread to finish
    pub fn stop(mut self) {
        self.shutdown_now();
    }

    fn shutdown_now(&mut self) {
        // Dropping the sender disconnects the channel, which wakes the select.
        drop(self.shutdown.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Step driver thread panicked");
            }
            debug!("Step driver stopped");
        }
    }
}

impl Drop for StepDriver {
    fn drop(&mut self) {
        self.shutdown_now();
    }
}

/// Run one step, logging and skipping it if it panics
fn run_tick(simulation: &SharedSimulation) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| simulation.step())) {
        error!("Simulation step panicked, skipping tick: {}", panic_message(&*payload));
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
