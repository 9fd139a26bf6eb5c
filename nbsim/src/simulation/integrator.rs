//! Fixed-step time integrator for the N-body system
//!
//! Two-phase kick/drift driven by an `AccelSet`: every velocity is kicked
//! from pre-step positions, then every position drifts with its new velocity

use super::states::{System, NVec2};
use super::forces::AccelSet;

/// Advance the system by one tick of length `dt`
///
/// The kick adds the accumulated per-tick acceleration to each velocity
/// directly; only the drift is scaled by `dt`. Positions are untouched until
/// every body has been kicked.
pub fn kick_drift(sys: &mut System, forces: &AccelSet, dt: f64) {
    let n = sys.bodies.len();
    if n == 0 { // no bodies, return
        return;
    }

    // acc[i] holds the summed pull on body i at the current positions
    let mut acc = vec![NVec2::zeros(); n];
    forces.accumulate_accels(&*sys, &mut acc);

    // Kick: v += a
    for (b, a) in sys.bodies.iter_mut().zip(acc.iter()) {
        b.v += *a;
    }

    // Drift: x += v dt
    for b in sys.bodies.iter_mut() {
        b.x += dt * b.v;
    }

    sys.t += dt;
}
