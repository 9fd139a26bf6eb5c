//! # nbsim — live N-body gravity for many viewers
//!
//! One server-side simulation of softened, exact pairwise gravity, ticked
//! at a fixed rate and pushed as a JSON snapshot to every connected
//! websocket viewer. Viewers start, retune, and stop it at any time.
//!
//! ```text
//! viewer ─ command ─▶ CommandGateway ─▶ SimulationRunner ─▶ Engine (Mutex)
//!                                            │ tick thread
//!                                            ▼
//!                       Broadcaster ◀─ Snapshot ─ step + encode
//!                           │
//!                           ▼
//!                     every viewer session
//! ```

pub mod simulation;
pub mod configuration;
pub mod server;
pub mod benchmark;
pub mod error;

pub use simulation::states::{Body, BodyRecord, System, NVec2};
pub use simulation::params::Parameters;
pub use simulation::forces::{Acceleration, AccelSet, NewtonianGravity};
pub use simulation::integrator::kick_drift;
pub use simulation::engine::Engine;
pub use simulation::sink::{NullSink, Snapshot, SnapshotSink, EMPTY_SNAPSHOT};
pub use simulation::runner::{RunnerState, RunnerStatus, SimulationRunner};

pub use configuration::config::{AppConfig, ParametersConfig, ServerConfig};

pub use server::protocol::Command;
pub use server::gateway::CommandGateway;
pub use server::broadcast::Broadcaster;
pub use server::router::{build_router, AppState};
pub use server::server::serve;

pub use benchmark::benchmark::bench_step;

pub use error::{ConfigError, ProtocolError, RunnerError};
