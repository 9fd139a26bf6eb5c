//! Simulation runner: the fixed-cadence tick loop and its lifecycle.
//!
//! # Design
//!
//! The engine lives behind one `parking_lot::Mutex`, shared by the tick
//! thread and every command caller. A tick holds the lock for the step and
//! the snapshot encode together, so a snapshot is always either before or
//! after a resize, never in between.
//!
//! The tick loop runs on its own OS thread. Its only suspension point is a
//! `recv_deadline` on a crossbeam stop channel: a stop signal (or the sender
//! being dropped) wakes it immediately, otherwise the deadline elapses and
//! the next tick runs. The handle of the active loop is kept so a restart or
//! stop signals and joins the old thread before anything else happens, which
//! means at most one loop exists per runner and nothing is delivered after
//! `stop` returns.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{self as cb};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::RunnerError;
use crate::simulation::engine::Engine;
use crate::simulation::params::DEFAULT_DT;
use crate::simulation::sink::{Snapshot, SnapshotSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunnerState {
    Idle,
    Running,
}

/// Point-in-time view of the runner for operators
#[derive(Debug, Clone, Serialize)]
pub struct RunnerStatus {
    pub state: RunnerState,
    pub bodies: usize,
    pub gravity_scale: f64,
    pub steps: u64,
    pub time: f64,
}

/// Handle to a running tick thread
struct TickLoop {
    stop: cb::Sender<()>,
    handle: JoinHandle<()>,
}

impl TickLoop {
    fn spawn(
        engine: Arc<Mutex<Engine>>,
        sink: Arc<dyn SnapshotSink>,
        interval: Duration,
    ) -> Result<Self, RunnerError> {
        let (stop, stop_rx) = cb::bounded(1);
        let handle = thread::Builder::new()
            .name("nbsim-tick".into())
            .spawn(move || run_tick_loop(&engine, &*sink, interval, &stop_rx))?;
        Ok(Self { stop, handle })
    }

    /// Signal the loop and wait for it to exit
    fn shutdown(self) {
        // a full buffer or a gone receiver both mean the loop is already leaving
        let _ = self.stop.try_send(());
        if self.handle.join().is_err() {
            error!("tick loop panicked");
        }
    }
}

fn run_tick_loop(
    engine: &Mutex<Engine>,
    sink: &dyn SnapshotSink,
    interval: Duration,
    stop: &cb::Receiver<()>,
) {
    let dt = interval.as_secs_f64();
    let mut deadline = Instant::now();
    loop {
        let snapshot = {
            let mut engine = engine.lock();
            engine.step(Some(dt));
            engine.snapshot()
        };
        sink.deliver(&snapshot);

        deadline += interval;
        let now = Instant::now();
        if deadline < now {
            // overran the tick; don't try to catch up
            deadline = now;
        }
        match stop.recv_deadline(deadline) {
            Err(cb::RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(cb::RecvTimeoutError::Disconnected) => break,
        }
    }
    debug!("tick loop exited");
}

/// Drives an [`Engine`] on a fixed cadence and hands every snapshot to a sink.
pub struct SimulationRunner {
    engine: Arc<Mutex<Engine>>,
    sink: Arc<dyn SnapshotSink>,
    interval: Duration,
    active: Mutex<Option<TickLoop>>,
}

impl SimulationRunner {
    /// The tick interval is the engine's step size `h0`
    pub fn new(engine: Engine, sink: Arc<dyn SnapshotSink>) -> Self {
        let h0 = engine.params().h0;
        let interval = match Duration::try_from_secs_f64(h0) {
            Ok(interval) if !interval.is_zero() => interval,
            _ => {
                let fallback = Duration::from_secs_f64(DEFAULT_DT);
                warn!(h0, ?fallback, "unusable step size, ticking at the default rate");
                fallback
            }
        };
        Self {
            engine: Arc::new(Mutex::new(engine)),
            sink,
            interval,
            active: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Seed a fresh population and (re)launch the tick loop.
    ///
    /// A start while running stops and joins the previous loop first.
    pub fn start(&self, count: Option<i64>, multiplier: Option<f64>) -> Result<(), RunnerError> {
        self.launch(count, multiplier, TickLoop::spawn)
    }

    fn launch<F>(&self, count: Option<i64>, multiplier: Option<f64>, spawn: F) -> Result<(), RunnerError>
    where
        F: FnOnce(Arc<Mutex<Engine>>, Arc<dyn SnapshotSink>, Duration) -> Result<TickLoop, RunnerError>,
    {
        let mut active = self.active.lock();
        let restarted = match active.take() {
            Some(prev) => {
                prev.shutdown();
                true
            }
            None => false,
        };

        let (bodies, gravity_scale) = {
            let mut engine = self.engine.lock();
            engine.initialize_bodies(count);
            engine.set_gravity(multiplier);
            (engine.len(), engine.gravity_scale())
        };

        let tick_loop = spawn(Arc::clone(&self.engine), Arc::clone(&self.sink), self.interval)
            .inspect_err(|err| {
                error!(%err, "failed to spawn tick loop");
                // bodies only exist while a loop is running
                self.engine.lock().clear();
            })?;
        *active = Some(tick_loop);
        info!(bodies, gravity_scale, restarted, "simulation started");
        Ok(())
    }

    /// Resize the population and rescale gravity in place.
    ///
    /// A running loop picks the change up on its next tick; while idle the
    /// change just sits in the engine.
    pub fn update_settings(&self, count: Option<i64>, multiplier: Option<f64>) {
        let mut engine = self.engine.lock();
        engine.resize_bodies(count);
        engine.set_gravity(multiplier);
        info!(bodies = engine.len(), gravity_scale = engine.gravity_scale(), "simulation updated");
    }

    /// Stop the tick loop and clear the bodies. Idempotent.
    pub fn stop(&self) {
        let mut active = self.active.lock();
        let was_running = match active.take() {
            Some(tick_loop) => {
                tick_loop.shutdown();
                true
            }
            None => false,
        };
        self.engine.lock().clear();
        if was_running {
            info!("simulation stopped");
        }
    }

    pub fn state(&self) -> RunnerState {
        if self.active.lock().is_some() {
            RunnerState::Running
        } else {
            RunnerState::Idle
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.engine.lock().snapshot()
    }

    pub fn status(&self) -> RunnerStatus {
        let state = self.state();
        let engine = self.engine.lock();
        RunnerStatus {
            state,
            bodies: engine.len(),
            gravity_scale: engine.gravity_scale(),
            steps: engine.steps(),
            time: engine.time(),
        }
    }

    /// Read the engine under its lock
    pub fn with_engine<R>(&self, f: impl FnOnce(&Engine) -> R) -> R {
        f(&self.engine.lock())
    }
}

impl Drop for SimulationRunner {
    fn drop(&mut self) {
        if let Some(tick_loop) = self.active.get_mut().take() {
            tick_loop.shutdown();
        }
    }
}
