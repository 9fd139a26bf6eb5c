//! Command gateway: turns viewer messages into runner calls.
//!
//! Calls into the runner can block for up to one tick (a restart or stop
//! joins the old tick thread), so async callers should run
//! [`CommandGateway::handle_message`] on the blocking pool.

use std::sync::Arc;

use tracing::{error, warn};

use crate::error::ProtocolError;
use crate::server::protocol::Command;
use crate::simulation::runner::SimulationRunner;
use crate::simulation::sink::Snapshot;

pub struct CommandGateway {
    runner: Arc<SimulationRunner>,
}

impl CommandGateway {
    pub fn new(runner: Arc<SimulationRunner>) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &Arc<SimulationRunner> {
        &self.runner
    }

    /// The snapshot pushed to a viewer as soon as it connects
    pub fn welcome(&self) -> Snapshot {
        self.runner.snapshot()
    }

    /// Parse and execute one message. On error the simulation is untouched
    /// and the error's text is the notice for the sender.
    pub fn handle_message(&self, text: &str) -> Result<(), ProtocolError> {
        let command = Command::parse(text).inspect_err(|err| {
            warn!(%err, message = text, "rejected viewer message");
        })?;
        self.execute(command);
        Ok(())
    }

    pub fn execute(&self, command: Command) {
        match command {
            Command::Start { num_bodies, gravity } => {
                if let Err(err) = self.runner.start(num_bodies, gravity) {
                    error!(%err, "could not start simulation");
                }
            }
            Command::Update { num_bodies, gravity } => {
                self.runner.update_settings(num_bodies, gravity);
            }
            Command::Stop => self.runner.stop(),
        }
    }
}
