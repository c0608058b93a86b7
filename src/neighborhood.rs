/*
 * Neighborhood Module
 *
 * Per-boid neighbor discovery over the spatial grid. For one boid this scans a
 * square window of cells around the boid's own cell, sized from the ratio of the
 * boid's sight radius to the cell size, and sorts every other boid found there
 * into "neighbor" (within sight radius) and "visible" (neighbor inside the field
 * of view).
 *
 * Queries only read the grid and the flock, so they can run for every boid in
 * parallel; the results are written back afterwards.
 */

use nannou::prelude::*;

use crate::boid::{Boid, FieldOfView};
use crate::spatial_grid::SpatialGrid;

/// Neighbor lists produced for one boid in one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Neighborhood {
    pub neighbors: Vec<usize>,
    pub visible: Vec<usize>,
}

/// How one boid perceives another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Perception {
    /// Farther away than the sight radius.
    OutOfRange,
    /// Within sight radius but outside the field of view.
    Neighbor,
    /// Within sight radius and inside the field of view.
    Visible,
}

/// Number of cells in each direction that a sight radius can reach from
/// anywhere inside a cell: `floor(sight_radius / min(cell_w, cell_h)) + 1`.
/// Saturates for huge radii.
#[inline]
pub fn ring_radius(cell_size: Vec2, sight_radius: f32) -> usize {
    let smallest_side = cell_size.x.min(cell_size.y);
    let cells = (sight_radius / smallest_side).floor().min(u32::MAX as f32);
    (cells as usize).saturating_add(1)
}

/// Classify `other_position` as seen from a boid at `position` heading along
/// `forward`. The distance test is strict: a boid exactly at the sight radius
/// is out of range.
#[inline]
pub fn perceive(
    position: Point2,
    forward: Vec2,
    sight_radius: f32,
    fov: FieldOfView,
    other_position: Point2,
) -> Perception {
    let offset = other_position - position;
    if offset.length() >= sight_radius {
        return Perception::OutOfRange;
    }
    if fov.contains(forward, offset) {
        Perception::Visible
    } else {
        Perception::Neighbor
    }
}

#[inline]
fn classify_into(neighborhood: &mut Neighborhood, boid: &Boid, fov: FieldOfView, boids: &[Boid], other: usize) {
    match perceive(boid.position, boid.forward(), boid.sight_radius, fov, boids[other].position) {
        Perception::OutOfRange => {}
        Perception::Neighbor => neighborhood.neighbors.push(other),
        Perception::Visible => {
            neighborhood.neighbors.push(other);
            neighborhood.visible.push(other);
        }
    }
}

/// Neighbor lists for `boids[index]`, using a grid already rebuilt from the
/// current positions of `boids`. No ordering guarantee among the results.
pub fn query(grid: &SpatialGrid, boids: &[Boid], index: usize) -> Neighborhood {
    let boid = &boids[index];
    let fov = boid.field_of_view();
    let mut neighborhood = Neighborhood::default();

    // Never scan past the grid itself.
    let (columns, rows) = grid.dimensions();
    let ring = ring_radius(grid.cell_size(), boid.sight_radius).min(columns.max(rows)) as isize;
    let home = grid.cell_index(boid.position);
    let (home_column, home_row) = (home.column as isize, home.row as isize);

    let window_cells = (2 * ring + 1) * (2 * ring + 1);
    if window_cells as usize > grid.active_cell_count() {
        // Fewer occupied cells than window cells: walk the occupied ones instead.
        for cell in grid.active_cells() {
            let (column, row) = (cell.column as isize, cell.row as isize);
            if (column - home_column).abs() > ring || (row - home_row).abs() > ring {
                continue;
            }
            for &other in grid.cell(cell) {
                if other != index {
                    classify_into(&mut neighborhood, boid, fov, boids, other);
                }
            }
        }
        return neighborhood;
    }

    for column in (home_column - ring)..=(home_column + ring) {
        for row in (home_row - ring)..=(home_row + ring) {
            for &other in grid.cell_at(column, row) {
                if other != index {
                    classify_into(&mut neighborhood, boid, fov, boids, other);
                }
            }
        }
    }

    neighborhood
}

/// All-pairs reference scan, O(n) per boid. Same classification as [`query`].
pub fn query_all_pairs(boids: &[Boid], index: usize) -> Neighborhood {
    let boid = &boids[index];
    let fov = boid.field_of_view();
    let mut neighborhood = Neighborhood::default();

    for other in 0..boids.len() {
        if other != index {
            classify_into(&mut neighborhood, boid, fov, boids, other);
        }
    }

    neighborhood
}
