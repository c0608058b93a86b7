/*
 * Application Module
 *
 * This module defines the viewer's model and per-frame update. The flock is
 * advanced once per frame unless paused; slider edits are pushed into the
 * flock only when change detection reports that a group of parameters moved.
 */

use nannou::prelude::*;
use nannou_egui::Egui;
use tracing::{error, warn};

use boid_flock::{Flock, ParamChanges, SimulationParams};

use crate::camera::Camera;
use crate::debug::DebugInfo;
use crate::input;
use crate::renderer;
use crate::ui;

// Main model for the application
pub struct Model {
    pub flock: Flock,
    pub params: SimulationParams,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    pub camera: Camera,
    pub mouse_position: Vec2,
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let window_id = app
        .new_window()
        .title("Boid Flocking Simulation")
        .size(1280, 720)
        .view(renderer::view)
        .mouse_moved(input::mouse_moved)
        .mouse_pressed(input::mouse_pressed)
        .mouse_released(input::mouse_released)
        .mouse_wheel(input::mouse_wheel)
        .key_pressed(input::key_pressed)
        .raw_event(input::raw_window_event)
        .build()
        .expect("failed to build window");

    let window = app.window(window_id).expect("window was just built");
    let egui = Egui::from_window(&window);
    let window_rect = window.rect();

    // The play area is the initial window; everything else derives from it
    let params = SimulationParams::for_world(window_rect);
    let flock = Flock::new(params.clone()).unwrap_or_else(|err| {
        error!(%err, "invalid default simulation parameters");
        std::process::exit(1);
    });

    let mut camera = Camera::new();
    camera.fit(flock.repulsion_borders(), window_rect);

    Model {
        flock,
        params,
        egui,
        debug_info: DebugInfo::default(),
        camera,
        mouse_position: Vec2::ZERO,
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;

    let (should_reset_boids, changes) = ui::update_ui(&mut model.egui, &mut model.params, &model.debug_info);
    apply_changes(model, changes);

    if should_reset_boids {
        model.flock.set_boid_count(0);
        model.flock.set_boid_count(model.params.num_boids);
    }

    model.flock.set_parallel(model.params.enable_parallel);

    if !model.params.pause_simulation {
        model.flock.tick();
    }

    model.debug_info.record(&model.flock);
}

fn apply_changes(model: &mut Model, changes: ParamChanges) {
    let params = &model.params;
    let flock = &mut model.flock;

    if changes.population {
        flock.set_boid_count(params.num_boids);
    }

    if changes.weights {
        flock.set_separation_multiplier(params.separation_weight);
        flock.set_alignment_multiplier(params.alignment_weight);
        flock.set_cohesion_multiplier(params.cohesion_weight);
    }

    if changes.perception {
        if let Err(err) = flock.set_sight_radius(params.sight_radius) {
            warn!(%err, "ignoring sight radius");
        }
        if let Err(err) = flock.set_sight_angle(params.sight_angle) {
            warn!(%err, "ignoring sight angle");
        }
    }
}
