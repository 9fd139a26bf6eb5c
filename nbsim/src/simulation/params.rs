//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - integration step size (also the wall-clock tick interval),
//! - softening and baseline gravity (`eps2`, `G`),
//! - population limits and the spawn distribution,
//! - an optional random seed
//!
//! It also owns the coercion rules applied to viewer-supplied values, so a
//! bad count or multiplier never reaches the engine as-is.

use crate::configuration::config::ParametersConfig;

/// Baseline gravity: a multiplier of 1.0 maps to this scale
pub const BASELINE_G: f64 = 667.43;
/// Fixed step, 200 Hz
pub const DEFAULT_DT: f64 = 0.005;
/// Softening length epsilon = 1.0, stored squared
pub const DEFAULT_EPS2: f64 = 1.0;
pub const MAX_BODIES: usize = 1000;
pub const SPAWN_EXTENT: f64 = 1000.0;
pub const MAX_MASS: f64 = 10.0;

#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub h0: f64, // step size, seconds
    pub eps2: f64, // softening
    pub G: f64, // baseline gravitational constant
    pub max_bodies: usize, // population clamp
    pub extent: f64, // bodies spawn in [-extent, extent]^2
    pub max_mass: f64, // masses drawn from (0, max_mass)
    pub seed: Option<u64>, // deterministic seed, entropy when absent
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            h0: DEFAULT_DT,
            eps2: DEFAULT_EPS2,
            G: BASELINE_G,
            max_bodies: MAX_BODIES,
            extent: SPAWN_EXTENT,
            max_mass: MAX_MASS,
            seed: None,
        }
    }
}

impl From<ParametersConfig> for Parameters {
    fn from(cfg: ParametersConfig) -> Self {
        let defaults = Parameters::default();
        Self {
            h0: positive_or(cfg.h0, defaults.h0).min(MAX_STEP),
            eps2: if cfg.eps2.is_finite() { cfg.eps2.max(0.0) } else { defaults.eps2 },
            G: if cfg.G.is_finite() { cfg.G.max(0.0) } else { defaults.G },
            // config may lower the clamp, never raise it
            max_bodies: cfg.max_bodies.min(MAX_BODIES),
            extent: if cfg.extent.is_finite() { cfg.extent.abs() } else { defaults.extent },
            max_mass: positive_or(cfg.max_mass, defaults.max_mass),
            seed: cfg.seed,
        }
    }
}

/// Largest step the tick loop accepts, one simulated hour
const MAX_STEP: f64 = 3600.0;

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

impl Parameters {
    /// Clamp a requested body count into `[0, max_bodies]`; missing or negative is 0
    pub fn clamp_count(&self, count: Option<i64>) -> usize {
        match count {
            Some(n) if n > 0 => usize::try_from(n).unwrap_or(usize::MAX).min(self.max_bodies),
            _ => 0,
        }
    }

    /// Effective coupling for a user multiplier; missing, negative or non-finite is 0,
    /// and so is a product that overflows
    pub fn gravity_scale(&self, multiplier: Option<f64>) -> f64 {
        match multiplier {
            Some(m) if m.is_finite() && m > 0.0 => {
                let scale = m * self.G;
                if scale.is_finite() { scale } else { 0.0 }
            }
            _ => 0.0,
        }
    }

    /// Step size to use for a requested `dt`; anything not strictly positive falls back to `h0`
    pub fn step_size(&self, dt: Option<f64>) -> f64 {
        match dt {
            Some(dt) if dt.is_finite() && dt > 0.0 => dt,
            _ => self.h0,
        }
    }
}
