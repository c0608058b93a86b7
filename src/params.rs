/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct that holds the configuration
 * of a flock: world geometry (play area, repulsion borders, grid), perception
 * and steering defaults for new boids, integration settings and the RNG seed.
 * The viewer edits the same struct through its sliders, so it also carries
 * change detection and the slider ranges.
 */

use nannou::prelude::*;

use crate::error::{Result, SimulationError};
use crate::{DEFAULT_MAX_FORCE, DEFAULT_MAX_SPEED, DEFAULT_SIGHT_ANGLE, DEFAULT_SIGHT_RADIUS};

/// Repulsion borders are the play area scaled by this factor about its centre.
pub const REPULSION_SCALE: f32 = 5.0;
/// The grid covers the play area scaled by this factor, so boids pushed past the
/// repulsion borders still land inside it.
pub const GRID_SCALE: f32 = 6.0;
/// Cells across the grid width. Cells are square.
pub const GRID_DIVISIONS: f32 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    /// Play area new boids are spawned in.
    pub world_bounds: Rect,
    pub repulsion_borders: Rect,
    pub grid_bounds: Rect,
    pub cell_size: Vec2,

    pub num_boids: usize,
    pub sight_radius: f32,
    /// Full field-of-view width in degrees. 360 and above sees everything.
    pub sight_angle: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,

    pub max_speed: f32,
    pub max_force: f32,
    pub initial_speed: f32,
    pub border_strength: f32,
    /// Seconds per tick.
    pub time_step: f32,
    pub seed: Option<u64>,
    pub enable_parallel: bool,

    // Viewer toggles
    pub show_sight: bool,
    pub show_neighbors: bool,
    pub show_grid: bool,
    pub pause_simulation: bool,
}

/// The values the flock cares about, captured for change detection.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSnapshot {
    num_boids: usize,
    separation_weight: f32,
    alignment_weight: f32,
    cohesion_weight: f32,
    sight_radius: f32,
    sight_angle: f32,
}

/// Which groups of parameters moved since the last snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParamChanges {
    pub population: bool,
    pub weights: bool,
    pub perception: bool,
}

impl ParamChanges {
    pub fn any(&self) -> bool {
        self.population || self.weights || self.perception
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self::for_world(Rect::from_corners(pt2(-640.0, -360.0), pt2(640.0, 360.0)))
    }
}

/// `rect` scaled by `factor` about its centre.
fn scaled(rect: Rect, factor: f32) -> Rect {
    let half = rect.wh() * factor / 2.0;
    Rect::from_corners(rect.xy() - half, rect.xy() + half)
}

impl SimulationParams {
    /// Defaults for a play area: repulsion borders, grid and cell size are
    /// derived from it.
    pub fn for_world(world_bounds: Rect) -> Self {
        let grid_bounds = scaled(world_bounds, GRID_SCALE);
        let cell_side = grid_bounds.w() / GRID_DIVISIONS;

        Self {
            world_bounds,
            repulsion_borders: scaled(world_bounds, REPULSION_SCALE),
            grid_bounds,
            cell_size: vec2(cell_side, cell_side),
            num_boids: 200,
            sight_radius: DEFAULT_SIGHT_RADIUS,
            sight_angle: DEFAULT_SIGHT_ANGLE,
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            max_speed: DEFAULT_MAX_SPEED,
            max_force: DEFAULT_MAX_FORCE,
            initial_speed: DEFAULT_MAX_SPEED / 2.0,
            border_strength: 25.0,
            time_step: 1.0 / 60.0,
            seed: None,
            enable_parallel: true,
            show_sight: false,
            show_neighbors: false,
            show_grid: false,
            pause_simulation: false,
        }
    }

    /// Reject values that would make the grid or the integration degenerate.
    pub fn validate(&self) -> Result<()> {
        let cell = self.cell_size;
        if !(cell.x > 0.0 && cell.y > 0.0 && cell.x.is_finite() && cell.y.is_finite()) {
            return Err(SimulationError::InvalidCellSize { width: cell.x, height: cell.y });
        }
        let grid = self.grid_bounds;
        if !(grid.w() > 0.0 && grid.h() > 0.0 && grid.w().is_finite() && grid.h().is_finite()) {
            return Err(SimulationError::EmptyGridBounds { width: grid.w(), height: grid.h() });
        }
        validate_sight_radius(self.sight_radius)?;
        validate_sight_angle(self.sight_angle)?;
        if !(self.time_step > 0.0 && self.time_step.is_finite()) {
            return Err(SimulationError::InvalidTimeStep(self.time_step));
        }
        for (name, value) in [("max speed", self.max_speed), ("max force", self.max_force)] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(SimulationError::InvalidLimit { name, value });
            }
        }
        if !(self.initial_speed >= 0.0 && self.initial_speed.is_finite()) {
            return Err(SimulationError::InvalidLimit { name: "initial speed", value: self.initial_speed });
        }
        Ok(())
    }

    // Take a snapshot of current parameter values for change detection
    pub fn take_snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            num_boids: self.num_boids,
            separation_weight: self.separation_weight,
            alignment_weight: self.alignment_weight,
            cohesion_weight: self.cohesion_weight,
            sight_radius: self.sight_radius,
            sight_angle: self.sight_angle,
        }
    }

    pub fn detect_changes(&self, prev: &ParamSnapshot) -> ParamChanges {
        ParamChanges {
            population: self.num_boids != prev.num_boids,
            weights: self.separation_weight != prev.separation_weight
                || self.alignment_weight != prev.alignment_weight
                || self.cohesion_weight != prev.cohesion_weight,
            perception: self.sight_radius != prev.sight_radius || self.sight_angle != prev.sight_angle,
        }
    }

    // Parameter ranges for UI sliders
    pub fn get_num_boids_range() -> std::ops::RangeInclusive<usize> {
        0..=5000
    }

    // Negative weights invert a rule
    pub fn get_weight_range() -> std::ops::RangeInclusive<f32> {
        -3.0..=3.0
    }

    pub fn get_sight_radius_range() -> std::ops::RangeInclusive<f32> {
        5.0..=400.0
    }

    pub fn get_sight_angle_range() -> std::ops::RangeInclusive<f32> {
        0.0..=400.0
    }
}

pub(crate) fn validate_sight_radius(radius: f32) -> Result<()> {
    if radius > 0.0 && radius.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::InvalidSightRadius(radius))
    }
}

pub(crate) fn validate_sight_angle(angle: f32) -> Result<()> {
    if angle >= 0.0 && angle.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::InvalidSightAngle(angle))
    }
}
