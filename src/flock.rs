/*
 * Flock Module
 *
 * This module owns the boid population and the spatial grid, and advances the
 * simulation one tick at a time:
 * 1. Clear the grid
 * 2. Bucket every boid by its current position
 * 3. Run the neighborhood query for every boid in an active cell
 * 4. Compute every boid's net force, then integrate every boid
 *
 * Steps 3 and 4 only read pre-tick state until their results are written back,
 * so they can fan out over rayon. No boid moves before every boid has its
 * neighbors and its force.
 */

use nannou::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info, trace, warn};

use crate::boid::{Boid, BoidState};
use crate::border::RepulsionBorders;
use crate::error::Result;
use crate::neighborhood::{self, Neighborhood};
use crate::params::{validate_sight_angle, validate_sight_radius, SimulationParams};
use crate::spatial_grid::{CellIndex, SpatialGrid};

pub struct Flock {
    boids: Vec<Boid>,
    grid: SpatialGrid,
    borders: RepulsionBorders,
    params: SimulationParams,
    rng: StdRng,
    tick_count: u64,
}

impl Flock {
    /// Build a flock of `params.num_boids` randomly placed boids.
    pub fn new(params: SimulationParams) -> Result<Self> {
        let count = params.num_boids;
        let mut flock = Self::from_boids(params, Vec::new())?;
        flock.set_boid_count(count);
        Ok(flock)
    }

    /// Build a flock around hand-placed boids. Their own perception and weights
    /// are kept; `params.num_boids` is ignored.
    pub fn from_boids(params: SimulationParams, boids: Vec<Boid>) -> Result<Self> {
        params.validate()?;
        for boid in &boids {
            validate_sight_radius(boid.sight_radius)?;
            validate_sight_angle(boid.sight_angle)?;
        }

        let grid = SpatialGrid::new(params.grid_bounds, params.cell_size)?;
        let borders = RepulsionBorders::new(params.repulsion_borders, params.border_strength);
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let (columns, rows) = grid.dimensions();
        info!(
            boids = boids.len(),
            columns,
            rows,
            cell_width = params.cell_size.x,
            cell_height = params.cell_size.y,
            "flock created"
        );

        Ok(Self {
            boids,
            grid,
            borders,
            params,
            rng,
            tick_count: 0,
        })
    }

    /// Replace the play area and population size. Borders, grid and cell size
    /// are re-derived from `world_bounds`; weights and perception carry over.
    pub fn configure(&mut self, world_bounds: Rect, population: usize) -> Result<()> {
        let derived = SimulationParams::for_world(world_bounds);
        let mut params = self.params.clone();
        params.world_bounds = derived.world_bounds;
        params.repulsion_borders = derived.repulsion_borders;
        params.grid_bounds = derived.grid_bounds;
        params.cell_size = derived.cell_size;
        params.validate()?;

        self.grid = SpatialGrid::new(params.grid_bounds, params.cell_size)?;
        self.borders = RepulsionBorders::new(params.repulsion_borders, params.border_strength);
        self.params = params;

        let (columns, rows) = self.grid.dimensions();
        info!(columns, rows, population, "flock reconfigured");
        self.set_boid_count(population);
        Ok(())
    }

    /// Grow with randomly placed boids or shrink from the end. Boids that stay
    /// are untouched. Call between ticks only.
    pub fn set_boid_count(&mut self, count: usize) {
        let previous = self.boids.len();
        if count < previous {
            self.boids.truncate(count);
        } else {
            self.boids.reserve(count - previous);
            while self.boids.len() < count {
                let boid = self.spawn_boid();
                self.boids.push(boid);
            }
        }
        self.params.num_boids = count;

        if count != previous {
            debug!(from = previous, to = count, "resized flock");
        }
    }

    /// Change the population by `delta`, never going below zero.
    pub fn adjust_boid_count(&mut self, delta: isize) {
        let count = self.boids.len().saturating_add_signed(delta);
        self.set_boid_count(count);
    }

    fn spawn_boid(&mut self) -> Boid {
        let world = self.params.world_bounds;
        let position = pt2(
            random_in(&mut self.rng, world.left(), world.right()),
            random_in(&mut self.rng, world.bottom(), world.top()),
        );

        // Random non-zero heading
        let direction = loop {
            let candidate = vec2(self.rng.gen_range(-1.0..=1.0), self.rng.gen_range(-1.0..=1.0));
            if candidate.length_squared() > 1e-6 {
                break candidate.normalize();
            }
        };

        Boid::configured(position, direction * self.params.initial_speed, &self.params)
    }

    pub fn set_separation_multiplier(&mut self, multiplier: f32) {
        self.params.separation_weight = multiplier;
        for boid in &mut self.boids {
            boid.separation_multiplier = multiplier;
        }
        debug!(multiplier, "separation weight broadcast");
    }

    pub fn set_alignment_multiplier(&mut self, multiplier: f32) {
        self.params.alignment_weight = multiplier;
        for boid in &mut self.boids {
            boid.alignment_multiplier = multiplier;
        }
        debug!(multiplier, "alignment weight broadcast");
    }

    pub fn set_cohesion_multiplier(&mut self, multiplier: f32) {
        self.params.cohesion_weight = multiplier;
        for boid in &mut self.boids {
            boid.cohesion_multiplier = multiplier;
        }
        debug!(multiplier, "cohesion weight broadcast");
    }

    pub fn set_sight_radius(&mut self, radius: f32) -> Result<()> {
        validate_sight_radius(radius)?;
        self.params.sight_radius = radius;
        for boid in &mut self.boids {
            boid.sight_radius = radius;
        }
        debug!(radius, "sight radius broadcast");
        Ok(())
    }

    pub fn set_sight_angle(&mut self, angle: f32) -> Result<()> {
        validate_sight_angle(angle)?;
        self.params.sight_angle = angle;
        for boid in &mut self.boids {
            boid.sight_angle = angle;
        }
        debug!(angle, "sight angle broadcast");
        Ok(())
    }

    pub fn set_parallel(&mut self, enabled: bool) {
        self.params.enable_parallel = enabled;
    }

    /// Advance the simulation by one step.
    pub fn tick(&mut self) {
        self.rebuild_grid();
        self.update_neighborhoods();
        self.apply_forces();

        self.tick_count += 1;
        trace!(
            tick = self.tick_count,
            active_cells = self.grid.active_cell_count(),
            "tick complete"
        );
    }

    fn rebuild_grid(&mut self) {
        self.grid.clear();
        for (i, boid) in self.boids.iter().enumerate() {
            self.grid.insert(i, boid.position);
        }

        let clamped = self.grid.clamped_count();
        if clamped > 0 {
            warn!(clamped, tick = self.tick_count, "boids outside grid bounds clamped into edge cells");
        }
    }

    fn update_neighborhoods(&mut self) {
        // Every boid sits in exactly one active cell
        let order: Vec<usize> = self
            .grid
            .active_cells()
            .flat_map(|cell| self.grid.cell(cell).iter().copied())
            .collect();

        let grid = &self.grid;
        let boids = &self.boids;
        let results: Vec<Neighborhood> = if self.params.enable_parallel {
            order.par_iter().map(|&i| neighborhood::query(grid, boids, i)).collect()
        } else {
            order.iter().map(|&i| neighborhood::query(grid, boids, i)).collect()
        };

        for (i, neighborhood) in order.into_iter().zip(results) {
            self.boids[i].replace_neighborhood(neighborhood);
        }
    }

    fn apply_forces(&mut self) {
        let boids = &self.boids;
        let borders = &self.borders;
        let net_force = |boid: &Boid| boid.flocking_force(boids) + borders.force_at(boid.position);

        let forces: Vec<Vec2> = if self.params.enable_parallel {
            boids.par_iter().map(net_force).collect()
        } else {
            boids.iter().map(net_force).collect()
        };

        let dt = self.params.time_step;
        for (boid, force) in self.boids.iter_mut().zip(forces) {
            boid.apply_force(force);
            boid.update(dt);
        }
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Position, velocity and heading of every boid, for drawing bodies and
    /// velocity vectors.
    pub fn boid_states(&self) -> impl Iterator<Item = BoidState> + '_ {
        self.boids.iter().map(Boid::state)
    }

    /// Positions of `boids[index]`'s visible neighbors from the last tick.
    pub fn visible_neighbor_positions(&self, index: usize) -> impl Iterator<Item = Point2> + '_ {
        self.boids
            .get(index)
            .map(Boid::visible_neighbors)
            .unwrap_or(&[])
            .iter()
            .map(move |&j| self.boids[j].position)
    }

    /// (from, to) segments from every boid to each of its visible neighbors.
    pub fn visible_neighbor_links(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        self.boids.iter().flat_map(move |boid| {
            boid.visible_neighbors()
                .iter()
                .map(move |&j| (boid.position, self.boids[j].position))
        })
    }

    pub fn active_cells(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.grid.active_cells()
    }

    pub fn cell_rect(&self, index: CellIndex) -> Rect {
        self.grid.cell_rect(index)
    }

    pub fn cell_size(&self) -> Vec2 {
        self.grid.cell_size()
    }

    pub fn grid_bounds(&self) -> Rect {
        self.grid.bounds()
    }

    pub fn repulsion_borders(&self) -> Rect {
        self.borders.bounds
    }

    /// Border repulsion a boid would feel at `position`.
    pub fn border_force_at(&self, position: Point2) -> Vec2 {
        self.borders.force_at(position)
    }
}

fn random_in(rng: &mut StdRng, low: f32, high: f32) -> f32 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}
