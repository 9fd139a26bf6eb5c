//! Core state types for the N-body simulation.
//!
//! Defines the 2D body/system structs:
//! - `Body`   point mass using `NVec2` position and velocity
//! - `System` the ordered body collection plus simulated time `t`
//!
//! On the wire a body is flattened to `{x, y, vx, vy, mass}`; `BodyRecord`
//! is that flat shape and `Body` converts through it for serde.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

pub type NVec2 = Vector2<f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "BodyRecord", from = "BodyRecord")]
pub struct Body {
    pub x: NVec2, // position
    pub v: NVec2, // velocity
    pub m: f64, // mass, always > 0
}

impl Body {
    /// A body at rest at `(x, y)`
    pub fn at_rest(x: f64, y: f64, m: f64) -> Self {
        Self {
            x: NVec2::new(x, y),
            v: NVec2::zeros(),
            m,
        }
    }
}

/// Flat wire representation of a [`Body`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyRecord {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub mass: f64,
}

impl From<Body> for BodyRecord {
    fn from(b: Body) -> Self {
        Self {
            x: b.x.x,
            y: b.x.y,
            vx: b.v.x,
            vy: b.v.y,
            mass: b.m,
        }
    }
}

impl From<BodyRecord> for Body {
    fn from(r: BodyRecord) -> Self {
        Self {
            x: NVec2::new(r.x, r.y),
            v: NVec2::new(r.vx, r.vy),
            m: r.mass,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct System {
    pub bodies: Vec<Body>, // insertion order, truncated from the back on shrink
    pub t: f64, // simulated time
}

impl System {
    pub fn new(bodies: Vec<Body>) -> Self {
        Self { bodies, t: 0.0 }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Drop every body and reset the clock
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.t = 0.0;
    }
}
