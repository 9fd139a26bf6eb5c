use std::time::Instant;

use crate::simulation::engine::Engine;
use crate::simulation::params::Parameters;

/// Time one `Engine::step` across population sizes up to the body clamp.
/// The direct sum is O(n^2), so this shows how much of the tick budget
/// (`h0`) a full population costs.
pub fn bench_step(params: &Parameters) {
    let ns = [50, 100, 200, 400, 800, 1000];
    let steps = 50;
    let budget_ms = params.h0 * 1e3;

    for n in ns {
        let mut params = params.clone();
        params.max_bodies = params.max_bodies.max(n);
        // fixed seed so every run times the same configuration
        params.seed = Some(params.seed.unwrap_or(42));

        let mut engine = Engine::new(params);
        engine.initialize_bodies(Some(n as i64));
        engine.set_gravity(Some(1.0));

        // Warm up
        engine.step(None);

        let t0 = Instant::now();
        for _ in 0..steps {
            engine.step(None);
        }
        let per_step_ms = t0.elapsed().as_secs_f64() * 1e3 / steps as f64;

        // Encode cost is paid once per tick as well
        let t1 = Instant::now();
        let snapshot = engine.snapshot();
        let encode_ms = t1.elapsed().as_secs_f64() * 1e3;

        println!(
            "N = {n:5}, step = {per_step_ms:8.4} ms, encode = {encode_ms:8.4} ms ({} bytes), budget = {budget_ms:.1} ms",
            snapshot.as_str().len()
        );
    }
}
