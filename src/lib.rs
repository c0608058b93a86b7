/*
 * Boid Flocking Simulation - Module Definitions
 *
 * This file defines the module structure of the simulation core: boids with
 * limited sight radius and field of view, a uniform spatial grid for neighbor
 * discovery, border repulsion, and the Flock that runs them tick by tick.
 * Drawing, camera and UI live in the viewer binary and only talk to the core
 * through Flock's setters and read-only queries.
 */

// Re-export key components for easier access
pub use boid::{Boid, BoidState, FieldOfView};
pub use border::RepulsionBorders;
pub use error::SimulationError;
pub use flock::Flock;
pub use neighborhood::{Neighborhood, Perception};
pub use params::{ParamChanges, ParamSnapshot, SimulationParams};
pub use spatial_grid::{CellIndex, SpatialGrid};

// Define modules
pub mod boid;
pub mod border;
pub mod error;
pub mod flock;
pub mod geometry;
pub mod neighborhood;
pub mod params;
pub mod spatial_grid;

// Constants
pub const DEFAULT_SIGHT_RADIUS: f32 = 80.0;
pub const DEFAULT_SIGHT_ANGLE: f32 = 270.0;
/// World units per second.
pub const DEFAULT_MAX_SPEED: f32 = 300.0;
/// World units per second squared.
pub const DEFAULT_MAX_FORCE: f32 = 600.0;
