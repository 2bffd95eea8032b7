/*
 * Terrain Boids
 *
 * A flock of boids steering by separation, alignment and cohesion over
 * rolling terrain. Sliders adjust the rule weights and radii while it runs.
 *
 * Usage: terrain_boids [settings.json]
 * Log level comes from RUST_LOG (e.g. RUST_LOG=terrain_boids=debug).
 */

use terrain_boids::app;

fn main() {
    init_tracing();
    nannou::app(app::model).update(app::update).run();
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
