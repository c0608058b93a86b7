/*
 * UI Module
 *
 * This module builds the control panel with nannou_egui. Sliders edit the
 * viewer's copy of SimulationParams; the app pushes whatever changed into the
 * flock through its setters.
 */

use nannou_egui::{egui, Egui};

use boid_flock::{ParamChanges, SimulationParams};

use crate::debug::DebugInfo;

// Update the UI and return whether boids should be reset and which parameters changed
pub fn update_ui(
    egui: &mut Egui,
    params: &mut SimulationParams,
    debug_info: &DebugInfo,
) -> (bool, ParamChanges) {
    let mut should_reset_boids = false;

    let snapshot = params.take_snapshot();

    let ctx = egui.begin_frame();

    egui::Window::new("Simulation Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Population", |ui| {
                ui.add(egui::Slider::new(&mut params.num_boids, SimulationParams::get_num_boids_range()).text("Number of Boids"));
                if ui.button("Reset Boids").clicked() {
                    should_reset_boids = true;
                }
            });

            ui.collapsing("Flocking Behavior", |ui| {
                ui.add(egui::Slider::new(&mut params.separation_weight, SimulationParams::get_weight_range()).text("Separation"));
                ui.add(egui::Slider::new(&mut params.alignment_weight, SimulationParams::get_weight_range()).text("Alignment"));
                ui.add(egui::Slider::new(&mut params.cohesion_weight, SimulationParams::get_weight_range()).text("Cohesion"));
            });

            ui.collapsing("Perception", |ui| {
                ui.add(egui::Slider::new(&mut params.sight_radius, SimulationParams::get_sight_radius_range()).text("Sight Radius"));
                ui.add(egui::Slider::new(&mut params.sight_angle, SimulationParams::get_sight_angle_range()).text("Sight Angle"));
            });

            ui.collapsing("Debug", |ui| {
                ui.checkbox(&mut params.show_sight, "Show Sight Cones");
                ui.checkbox(&mut params.show_neighbors, "Show Visible Neighbors");
                ui.checkbox(&mut params.show_grid, "Show Active Cells");
                ui.checkbox(&mut params.enable_parallel, "Parallel Neighbor Queries");

                ui.separator();

                ui.label(format!("FPS: {:.1}", debug_info.fps));
                ui.label(format!("Frame time: {:.2} ms", debug_info.frame_time.as_secs_f64() * 1000.0));
                ui.label(format!("Tick: {}", debug_info.tick_count));
                ui.label(format!("Boids: {}", debug_info.boid_count));
                ui.label(format!("Active cells: {}", debug_info.active_cells));
                ui.label(format!("Visible links: {}", debug_info.visible_links));
            });

            ui.checkbox(&mut params.pause_simulation, "Pause Simulation");
        });

    (should_reset_boids, params.detect_changes(&snapshot))
}
