/*
 * Debug Information Module
 *
 * Frame and flock statistics shown in the control panel.
 */

use std::time::Duration;

use boid_flock::Flock;

#[derive(Default)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub tick_count: u64,
    pub boid_count: usize,
    pub active_cells: usize,
    pub visible_links: usize,
}

impl DebugInfo {
    /// Refresh the flock statistics after a tick.
    pub fn record(&mut self, flock: &Flock) {
        self.tick_count = flock.tick_count();
        self.boid_count = flock.len();
        self.active_cells = flock.active_cells().count();
        self.visible_links = flock.boids().iter().map(|b| b.visible_neighbors().len()).sum();
    }
}
