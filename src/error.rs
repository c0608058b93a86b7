/*
 * Error Module
 *
 * Configuration errors for the flock. Everything that could otherwise turn into
 * a division by zero or an unbounded grid scan is rejected here, before any
 * simulation state is built. A tick itself never fails.
 */

use thiserror::Error;

/// Errors raised while configuring a flock or one of its parts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    /// Grid cells must have a finite, strictly positive width and height.
    #[error("cell size must be positive and finite, got {width}x{height}")]
    InvalidCellSize { width: f32, height: f32 },

    /// The grid must cover a region with non-zero area.
    #[error("grid bounds must have positive area, got {width}x{height}")]
    EmptyGridBounds { width: f32, height: f32 },

    #[error("sight radius must be positive and finite, got {0}")]
    InvalidSightRadius(f32),

    #[error("sight angle must be a finite, non-negative number of degrees, got {0}")]
    InvalidSightAngle(f32),

    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f32),

    #[error("{name} must be positive and finite, got {value}")]
    InvalidLimit { name: &'static str, value: f32 },
}

pub type Result<T> = std::result::Result<T, SimulationError>;
