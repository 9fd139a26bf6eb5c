//! Random body populations
//!
//! New bodies are placed uniformly in the square `[-extent, extent]^2`, start
//! at rest, and draw a mass uniformly from `(0, max_mass)`. The same
//! distribution is used for a fresh population and for bodies appended by a
//! live resize.

use rand::Rng;

use crate::simulation::params::Parameters;
use crate::simulation::states::Body;

/// Draw one body from the spawn distribution
pub fn random_body<R: Rng + ?Sized>(rng: &mut R, params: &Parameters) -> Body {
    let e = params.extent;
    let x = rng.gen_range(-e..=e);
    let y = rng.gen_range(-e..=e);
    // lower bound keeps the mass strictly positive
    let m = rng.gen_range(f64::MIN_POSITIVE..params.max_mass);
    Body::at_rest(x, y, m)
}

/// Draw `count` independent bodies
pub fn random_bodies<R: Rng + ?Sized>(rng: &mut R, count: usize, params: &Parameters) -> Vec<Body> {
    (0..count).map(|_| random_body(rng, params)).collect()
}
