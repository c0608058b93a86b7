/*
 * Renderer Module
 *
 * This module draws the flock: repulsion borders, active grid cells, sight
 * cones, visible-neighbor links, velocity vectors and boid bodies, in that
 * order, then the egui panel on top. It only reads the flock's queries.
 */

use nannou::prelude::*;

use boid_flock::geometry::rotate_degrees;

use crate::app::Model;

const BOID_SIZE: f32 = 6.0;
/// Segments used to approximate a sight cone's arc.
const CONE_SEGMENTS: usize = 24;
/// Seconds of travel shown by a velocity vector.
const VELOCITY_SCALE: f32 = 0.15;

pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(rgb(0.04, 0.04, 0.04));

    let window_rect = app.window_rect();
    let camera = &model.camera;
    let flock = &model.flock;
    let to_screen = |p: Vec2| camera.world_to_screen(p, window_rect);

    let screen_rect = |rect: Rect| Rect::from_corners(
        to_screen(pt2(rect.left(), rect.bottom())),
        to_screen(pt2(rect.right(), rect.top())),
    );

    if model.params.show_grid {
        let grid = screen_rect(flock.grid_bounds());
        draw.rect()
            .xy(grid.xy())
            .wh(grid.wh())
            .no_fill()
            .stroke_weight(1.0)
            .stroke(rgba(1.0, 1.0, 1.0, 0.08));

        for cell in flock.active_cells() {
            let cell_rect = screen_rect(flock.cell_rect(cell));
            draw.rect()
                .xy(cell_rect.xy())
                .wh(cell_rect.wh())
                .no_fill()
                .stroke_weight(1.0)
                .stroke(rgba(1.0, 0.2, 0.2, 0.6));
        }
    }

    let borders = screen_rect(flock.repulsion_borders());
    draw.rect()
        .xy(borders.xy())
        .wh(borders.wh())
        .no_fill()
        .stroke_weight(1.5)
        .stroke(RED);

    if model.params.show_sight {
        for boid in flock.boids() {
            let radius = boid.sight_radius * camera.zoom;
            let center = to_screen(boid.position);
            let angle = boid.field_of_view().visible_span();
            let forward = boid.forward();

            let mut points = Vec::with_capacity(CONE_SEGMENTS + 2);
            if angle < 360.0 {
                points.push(center);
            }
            for step in 0..=CONE_SEGMENTS {
                let t = step as f32 / CONE_SEGMENTS as f32;
                let direction = rotate_degrees(forward, angle / 2.0 - angle * t);
                points.push(center + direction * radius);
            }

            draw.polygon()
                .color(rgba(1.0, 1.0, 1.0, 0.03))
                .points(points);
        }
    }

    if model.params.show_neighbors {
        for (from, to) in flock.visible_neighbor_links() {
            draw.line()
                .start(to_screen(from))
                .end(to_screen(to))
                .weight(1.0)
                .color(rgba(0.3, 0.8, 1.0, 0.35));
        }
    }

    let size = (BOID_SIZE * camera.zoom).max(2.0);
    for state in flock.boid_states() {
        let position = to_screen(state.position);

        draw.line()
            .start(position)
            .end(position + state.velocity * VELOCITY_SCALE * camera.zoom)
            .weight(1.0)
            .color(rgba(1.0, 0.9, 0.2, 0.7));

        let heading = state.forward.y.atan2(state.forward.x);
        draw.polygon()
            .color(rgb(0.86, 0.86, 0.86))
            .points([
                pt2(size, 0.0),
                pt2(-size, size / 2.0),
                pt2(-size, -size / 2.0),
            ])
            .xy(position)
            .rotate(heading);
    }

    draw.to_frame(app, &frame).unwrap();
    model.egui.draw_to_frame(&frame).unwrap();
}
