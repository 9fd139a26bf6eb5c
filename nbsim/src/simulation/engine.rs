//! The simulation engine
//!
//! Owns the body collection and the gravity scale, and exposes population
//! resize, parameter update and one-tick integration. No I/O and no locking
//! here: callers that share an `Engine` across threads wrap it in a single
//! mutex (see `runner`), which is what keeps resize, step and snapshot
//! mutually exclusive.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::simulation::forces::{AccelSet, NewtonianGravity};
use crate::simulation::integrator::kick_drift;
use crate::simulation::params::Parameters;
use crate::simulation::scenario::random_bodies;
use crate::simulation::sink::Snapshot;
use crate::simulation::states::{Body, System};

pub struct Engine {
    params: Parameters,
    system: System,
    gravity_scale: f64,
    forces: AccelSet,
    rng: StdRng,
    steps: u64,
}

impl Engine {
    /// An empty engine with zero gravity
    pub fn new(params: Parameters) -> Self {
        Self::with_system(params, System::default())
    }

    /// An engine seeded with an explicit system, gravity still zero
    pub fn with_system(params: Parameters, system: System) -> Self {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let forces = gravity_terms(0.0, params.eps2);
        Self {
            params,
            system,
            gravity_scale: 0.0,
            forces,
            rng,
            steps: 0,
        }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn bodies(&self) -> &[Body] {
        &self.system.bodies
    }

    pub fn len(&self) -> usize {
        self.system.len()
    }

    pub fn is_empty(&self) -> bool {
        self.system.is_empty()
    }

    pub fn gravity_scale(&self) -> f64 {
        self.gravity_scale
    }

    /// Simulated seconds since the population was created
    pub fn time(&self) -> f64 {
        self.system.t
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Replace the population with `count` fresh bodies
    pub fn initialize_bodies(&mut self, count: Option<i64>) {
        let n = self.params.clamp_count(count);
        self.system.clear();
        self.steps = 0;
        self.system.bodies = random_bodies(&mut self.rng, n, &self.params);
        debug!(bodies = n, "initialized population");
    }

    /// Live resize: truncate from the back, or append fresh bodies,
    /// leaving every retained body's motion untouched
    pub fn resize_bodies(&mut self, count: Option<i64>) {
        let n = self.params.clamp_count(count);
        let current = self.system.len();
        if n < current {
            self.system.bodies.truncate(n);
        } else if n > current {
            let fresh = random_bodies(&mut self.rng, n - current, &self.params);
            self.system.bodies.extend(fresh);
        }
        debug!(from = current, to = n, "resized population");
    }

    pub fn set_gravity(&mut self, multiplier: Option<f64>) {
        self.gravity_scale = self.params.gravity_scale(multiplier);
        self.forces = gravity_terms(self.gravity_scale, self.params.eps2);
        debug!(gravity_scale = self.gravity_scale, "gravity updated");
    }

    /// Advance one tick; `dt` that is missing or not positive uses the default step
    pub fn step(&mut self, dt: Option<f64>) {
        if self.system.is_empty() {
            return;
        }
        let dt = self.params.step_size(dt);
        kick_drift(&mut self.system, &self.forces, dt);
        self.steps += 1;
    }

    /// Serialized copy of every body in collection order
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_bodies(&self.system.bodies)
    }

    /// Drop every body; gravity is kept for the next start to overwrite
    pub fn clear(&mut self) {
        self.system.clear();
        self.steps = 0;
    }
}

fn gravity_terms(g: f64, eps2: f64) -> AccelSet {
    AccelSet::new().with(NewtonianGravity { G: g, eps2 })
}
