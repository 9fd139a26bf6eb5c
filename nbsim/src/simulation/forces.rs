//! Force / acceleration contributors for the n-body engine
//!
//! Defines the acceleration trait and exact pairwise Newtonian gravity with
//! a fixed softening length. Every body feels every other body, O(n^2)

use crate::simulation::states::{System, NVec2};

/// Collection of acceleration terms
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per body
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::new()
    }
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self {
            terms: Vec::new()
        }
    }

    /// Add an acceleration term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Acceleration + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    /// Compute total accelerations for all bodies in `sys`
    /// - `out[i]` will be set to the sum of contributions from all terms
    /// - `sys` is only read, so every pair sees pre-step positions
    pub fn accumulate_accels(&self, sys: &System, out: &mut [NVec2]) {
        // Zero buffer
        for a in out.iter_mut() {
            *a = NVec2::zeros();
        }
        for term in &self.terms {
            term.acceleration(sys, out);
        }
    }
}

/// Acceleration source operating on a [`System`]
/// Implementations add their contribution into `out[i]` for each body
pub trait Acceleration {
    fn acceleration(&self, sys: &System, out: &mut [NVec2]);
}

/// Newtonian gravity with softening
/// `eps2` is added to every squared separation so coincident bodies feel a
/// bounded pull instead of a singular one
#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy)]
pub struct NewtonianGravity {
    pub G: f64, // effective gravity scale (multiplier * baseline)
    pub eps2: f64, // softening
}

impl Acceleration for NewtonianGravity {
    fn acceleration(&self, sys: &System, out: &mut [NVec2]) {
        let n = sys.bodies.len();
        if n < 2 || self.G == 0.0 {
            return;
        }

        // Each unordered pair (i, j), i < j, is visited once and applied to
        // both bodies with opposite sign
        for i in 0..n {
            let bi = &sys.bodies[i];
            let xi = bi.x;
            let mi = bi.m;

            for j in (i + 1)..n {
                let bj = &sys.bodies[j];

                // r points from i to j: i is pulled along +r, j along -r
                let r = bj.x - xi;

                // d2 = |r|^2 + eps^2
                let d2 = r.dot(&r) + self.eps2;
                if d2 <= 0.0 {
                    // only reachable with eps2 == 0 and coincident bodies
                    continue;
                }

                // force = G m_i m_j / d2, along r / |r_soft|
                // a_i = force / m_i = G m_j r / d2^(3/2)
                let inv_r = d2.sqrt().recip();
                let coef = self.G * inv_r * inv_r * inv_r;

                out[i] += coef * bj.m * r;
                out[j] -= coef * mi * r;
            }
        }
    }
}
