/*
 * Boid Flocking Viewer
 *
 * Interactive window around the flocking core: draws the flock, its sight
 * cones, neighbor links and the active grid cells, and exposes the flock's
 * weights, perception and population through sliders.
 *
 * Set RUST_LOG (e.g. RUST_LOG=boid_flock=debug) to see simulation logs.
 */

mod app;
mod camera;
mod debug;
mod input;
mod renderer;
mod ui;

use tracing::info;

fn main() {
    init_tracing();
    info!("Starting boid flocking viewer");

    nannou::app(app::model)
        .update(app::update)
        .run();
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
