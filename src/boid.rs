/*
 * Boid Module
 *
 * This module defines the Boid struct and its behavior.
 * Each boid perceives the flock through a sight radius and a field of view,
 * then follows three steering rules computed from its visible neighbors:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 *
 * Neighbor lists are indices into the flock's boid storage and are rebuilt
 * every tick; they never contain the boid's own index.
 */

use nannou::prelude::*;

use crate::geometry::{is_left, limit, perpendicular, rotate_degrees};
use crate::neighborhood::Neighborhood;
use crate::params::SimulationParams;
use crate::{DEFAULT_MAX_FORCE, DEFAULT_MAX_SPEED, DEFAULT_SIGHT_ANGLE, DEFAULT_SIGHT_RADIUS};

/// Field-of-view classification derived from a full sight angle in degrees.
///
/// The two boundary rays are `forward` rotated by `+sight_angle / 2` (left) and
/// `-sight_angle / 2` (right). A point is in peripheral view when it is not left
/// of the left ray's line and strictly left of the right ray's line. It is in
/// front when it lies strictly on the forward side of the line through the boid
/// perpendicular to its heading.
///
/// - `sight_angle <= 180`: [`FieldOfView::Wedge`]. Visible means peripheral. At
///   0 nothing is visible; at exactly 180 the open front half-plane is.
/// - `180 < sight_angle < 360`: [`FieldOfView::Reflex`]. Visible means
///   peripheral or in front. The peripheral region shrinks to a narrow cone
///   inside the front half-plane, so this is the open front half-plane.
/// - `sight_angle >= 360`: [`FieldOfView::Omnidirectional`]. Every neighbor is
///   visible, including one straight behind the boid at exactly 360.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldOfView {
    Wedge { half_angle: f32 },
    Reflex { half_angle: f32 },
    Omnidirectional,
}

impl FieldOfView {
    pub fn from_sight_angle(sight_angle: f32) -> Self {
        if sight_angle >= 360.0 {
            FieldOfView::Omnidirectional
        } else if sight_angle > 180.0 {
            FieldOfView::Reflex { half_angle: sight_angle / 2.0 }
        } else {
            FieldOfView::Wedge { half_angle: sight_angle.max(0.0) / 2.0 }
        }
    }

    /// Whether a point at `offset` from the boid is inside the field of view of a
    /// boid heading along the unit vector `forward`.
    pub fn contains(&self, forward: Vec2, offset: Vec2) -> bool {
        match *self {
            FieldOfView::Omnidirectional => true,
            FieldOfView::Wedge { half_angle } => in_peripheral_view(forward, half_angle, offset),
            FieldOfView::Reflex { half_angle } => {
                in_peripheral_view(forward, half_angle, offset) || in_front(forward, offset)
            }
        }
    }

    /// Width in degrees of the region [`FieldOfView::contains`] accepts.
    pub fn visible_span(&self) -> f32 {
        match *self {
            FieldOfView::Wedge { half_angle } => half_angle * 2.0,
            FieldOfView::Reflex { .. } => 180.0,
            FieldOfView::Omnidirectional => 360.0,
        }
    }
}

// Left ray is the counter-clockwise one.
#[inline]
fn boundary_rays(forward: Vec2, half_angle: f32) -> (Vec2, Vec2) {
    (rotate_degrees(forward, half_angle), rotate_degrees(forward, -half_angle))
}

#[inline]
fn in_peripheral_view(forward: Vec2, half_angle: f32, offset: Vec2) -> bool {
    let (left, right) = boundary_rays(forward, half_angle);
    !is_left(Vec2::ZERO, left, offset) && is_left(Vec2::ZERO, right, offset)
}

// The clockwise perpendicular points along the line with `forward` on its left.
#[inline]
fn in_front(forward: Vec2, offset: Vec2) -> bool {
    is_left(Vec2::ZERO, -perpendicular(forward), offset)
}

/// Read-only view of a boid handed to the render layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoidState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub forward: Vec2,
}

#[derive(Debug, Clone)]
pub struct Boid {
    pub position: Point2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    forward: Vec2,
    pub sight_radius: f32,
    pub sight_angle: f32,
    pub separation_multiplier: f32,
    pub alignment_multiplier: f32,
    pub cohesion_multiplier: f32,
    pub max_speed: f32,
    pub max_force: f32,
    neighbors: Vec<usize>,
    visible_neighbors: Vec<usize>,
}

impl Boid {
    pub fn new(position: Point2, velocity: Vec2) -> Self {
        let forward = if velocity.length_squared() > 0.0 {
            velocity.normalize()
        } else {
            Vec2::X
        };

        Self {
            position,
            velocity,
            acceleration: Vec2::ZERO,
            forward,
            sight_radius: DEFAULT_SIGHT_RADIUS,
            sight_angle: DEFAULT_SIGHT_ANGLE,
            separation_multiplier: 1.0,
            alignment_multiplier: 1.0,
            cohesion_multiplier: 1.0,
            max_speed: DEFAULT_MAX_SPEED,
            max_force: DEFAULT_MAX_FORCE,
            neighbors: Vec::new(),
            visible_neighbors: Vec::new(),
        }
    }

    /// A boid whose perception, weights and limits come from `params`.
    pub fn configured(position: Point2, velocity: Vec2, params: &SimulationParams) -> Self {
        let mut boid = Self::new(position, velocity).with_sight(params.sight_radius, params.sight_angle);
        boid.separation_multiplier = params.separation_weight;
        boid.alignment_multiplier = params.alignment_weight;
        boid.cohesion_multiplier = params.cohesion_weight;
        boid.max_speed = params.max_speed;
        boid.max_force = params.max_force;
        boid
    }

    pub fn with_sight(mut self, radius: f32, angle: f32) -> Self {
        self.sight_radius = radius;
        self.sight_angle = angle;
        self
    }

    /// Unit heading. Keeps its last value while the boid is stationary.
    pub fn forward(&self) -> Vec2 {
        self.forward
    }

    pub fn field_of_view(&self) -> FieldOfView {
        FieldOfView::from_sight_angle(self.sight_angle)
    }

    pub fn state(&self) -> BoidState {
        BoidState {
            position: self.position,
            velocity: self.velocity,
            forward: self.forward,
        }
    }

    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    pub fn visible_neighbors(&self) -> &[usize] {
        &self.visible_neighbors
    }

    pub(crate) fn replace_neighborhood(&mut self, neighborhood: Neighborhood) {
        self.neighbors = neighborhood.neighbors;
        self.visible_neighbors = neighborhood.visible;
    }

    // Apply a force to the boid
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    /// Explicit Euler step over `dt` seconds. Clears the accumulated force.
    pub fn update(&mut self, dt: f32) {
        self.velocity += self.acceleration * dt;
        self.velocity = limit(self.velocity, self.max_speed);
        self.position += self.velocity * dt;
        self.acceleration = Vec2::ZERO;

        if self.velocity.length_squared() > 0.0 {
            self.forward = self.velocity.normalize();
        }
    }

    // Reynolds: Steering = Desired - Velocity, capped at max_force
    fn steer_towards(&self, direction: Vec2) -> Vec2 {
        if direction.length_squared() == 0.0 {
            return Vec2::ZERO;
        }
        let desired = direction.normalize() * self.max_speed;
        limit(desired - self.velocity, self.max_force)
    }

    // Calculate separation force (avoid crowding neighbors)
    pub fn separation_force(&self, boids: &[Boid]) -> Vec2 {
        let mut away = Vec2::ZERO;
        let mut count = 0;

        for &i in &self.visible_neighbors {
            let diff = self.position - boids[i].position;
            let d = diff.length();
            // Coincident boids have no direction to flee in
            if d > 0.0 {
                away += diff / (d * d);
                count += 1;
            }
        }

        if count == 0 {
            return Vec2::ZERO;
        }
        self.steer_towards(away / count as f32)
    }

    // Calculate alignment force (steer towards average heading of neighbors)
    pub fn alignment_force(&self, boids: &[Boid]) -> Vec2 {
        if self.visible_neighbors.is_empty() {
            return Vec2::ZERO;
        }

        let heading: Vec2 = self
            .visible_neighbors
            .iter()
            .map(|&i| boids[i].velocity)
            .fold(Vec2::ZERO, |acc, v| acc + v);

        self.steer_towards(heading / self.visible_neighbors.len() as f32)
    }

    // Calculate cohesion force (steer towards average position of neighbors)
    pub fn cohesion_force(&self, boids: &[Boid]) -> Vec2 {
        if self.visible_neighbors.is_empty() {
            return Vec2::ZERO;
        }

        let centroid = self
            .visible_neighbors
            .iter()
            .map(|&i| boids[i].position)
            .fold(Vec2::ZERO, |acc, p| acc + p)
            / self.visible_neighbors.len() as f32;

        self.steer_towards(centroid - self.position)
    }

    /// Weighted sum of the three flocking rules. Not re-normalized.
    pub fn flocking_force(&self, boids: &[Boid]) -> Vec2 {
        self.separation_force(boids) * self.separation_multiplier
            + self.alignment_force(boids) * self.alignment_multiplier
            + self.cohesion_force(boids) * self.cohesion_multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::angle_between;

    fn with_visible(mut boid: Boid, visible: Vec<usize>) -> Boid {
        boid.replace_neighborhood(Neighborhood {
            neighbors: visible.clone(),
            visible,
        });
        boid
    }

    #[test]
    fn wedge_sees_only_in_front_within_half_angle() {
        let fov = FieldOfView::from_sight_angle(90.0);
        let forward = vec2(1.0, 0.0);
        assert!(fov.contains(forward, vec2(1.0, 0.2)));
        assert!(fov.contains(forward, vec2(1.0, -0.9)));
        assert!(!fov.contains(forward, vec2(1.0, 1.5)));
        assert!(!fov.contains(forward, vec2(-1.0, 0.0)));
    }

    #[test]
    fn zero_angle_sees_nothing() {
        let fov = FieldOfView::from_sight_angle(0.0);
        let forward = vec2(0.0, 1.0);
        assert!(!fov.contains(forward, vec2(0.1, 5.0)));
        assert!(!fov.contains(forward, vec2(-0.1, 5.0)));
        assert!(!fov.contains(forward, vec2(0.0, -5.0)));
    }

    #[test]
    fn half_circle_sees_the_front_half_plane() {
        let fov = FieldOfView::from_sight_angle(180.0);
        let forward = vec2(1.0, 0.0);
        assert!(fov.contains(forward, vec2(0.01, 10.0)));
        assert!(fov.contains(forward, vec2(0.01, -10.0)));
        assert!(!fov.contains(forward, vec2(-0.01, 10.0)));
    }

    #[test]
    fn reflex_angle_sees_the_front_half_plane_only() {
        let fov = FieldOfView::from_sight_angle(270.0);
        assert!(matches!(fov, FieldOfView::Reflex { .. }));
        let forward = vec2(1.0, 0.0);
        assert!(fov.contains(forward, vec2(1.0, 0.0)));
        assert!(fov.contains(forward, vec2(0.5, 1.0)));
        assert!(fov.contains(forward, vec2(0.01, -5.0)));
        // Beside or behind the boid is not visible, even inside the boundary rays.
        assert!(!fov.contains(forward, vec2(-0.5, 1.0)));
        assert!(!fov.contains(forward, vec2(-0.5, -1.0)));
        assert!(!fov.contains(forward, vec2(-1.0, 0.0)));
        assert_eq!(fov.visible_span(), 180.0);
    }

    #[test]
    fn visibility_follows_the_angle_from_forward() {
        let forward = rotate_degrees(vec2(1.0, 0.0), 33.0);
        let wedge = FieldOfView::from_sight_angle(100.0);
        let reflex = FieldOfView::from_sight_angle(300.0);

        for step in 0..72 {
            let offset = rotate_degrees(forward, step as f32 * 5.0 + 2.5) * 7.0;
            let angle = angle_between(forward, offset);
            assert_eq!(wedge.contains(forward, offset), angle < 50.0, "{angle} degrees");
            assert_eq!(reflex.contains(forward, offset), angle < 90.0, "{angle} degrees");
        }
    }

    #[test]
    fn full_circle_is_omnidirectional() {
        assert_eq!(FieldOfView::from_sight_angle(360.0), FieldOfView::Omnidirectional);
        assert_eq!(FieldOfView::from_sight_angle(400.0), FieldOfView::Omnidirectional);
        assert!(FieldOfView::Omnidirectional.contains(vec2(1.0, 0.0), vec2(-3.0, 0.0)));
    }

    #[test]
    fn separation_pushes_away_from_close_neighbors() {
        let boids = vec![
            Boid::new(pt2(0.0, 0.0), Vec2::ZERO),
            Boid::new(pt2(1.0, 0.0), Vec2::ZERO),
        ];
        let me = with_visible(boids[0].clone(), vec![1]);
        let force = me.separation_force(&boids);
        assert!(force.x < 0.0);
        assert!(force.y.abs() < 1e-5);
        assert!(force.length() <= me.max_force + 1e-3);
    }

    #[test]
    fn cohesion_pulls_towards_centroid_and_alignment_matches_heading() {
        let boids = vec![
            Boid::new(pt2(0.0, 0.0), Vec2::ZERO),
            Boid::new(pt2(10.0, 10.0), vec2(0.0, 5.0)),
            Boid::new(pt2(10.0, -10.0), vec2(0.0, 5.0)),
        ];
        let me = with_visible(boids[0].clone(), vec![1, 2]);

        let cohesion = me.cohesion_force(&boids);
        assert!(cohesion.x > 0.0);
        assert!(cohesion.y.abs() < 1e-4);

        let alignment = me.alignment_force(&boids);
        assert!(alignment.y > 0.0);
        assert!(alignment.x.abs() < 1e-4);
    }

    #[test]
    fn no_visible_neighbors_means_no_flocking_force() {
        let boids = vec![Boid::new(pt2(0.0, 0.0), vec2(1.0, 0.0))];
        assert_eq!(boids[0].flocking_force(&boids), Vec2::ZERO);
    }

    #[test]
    fn update_integrates_and_limits_speed() {
        let mut boid = Boid::new(pt2(0.0, 0.0), vec2(1.0, 0.0));
        boid.max_speed = 10.0;
        boid.apply_force(vec2(0.0, 1000.0));
        boid.update(0.5);

        assert!((boid.velocity.length() - 10.0).abs() < 1e-3);
        assert!(boid.position.y > 0.0);
        assert_eq!(boid.acceleration, Vec2::ZERO);
        assert!((boid.forward().length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn forward_survives_a_stop() {
        let mut boid = Boid::new(pt2(0.0, 0.0), vec2(0.0, 2.0));
        boid.apply_force(vec2(0.0, -4.0));
        boid.update(0.5);
        assert_eq!(boid.velocity, Vec2::ZERO);
        assert_eq!(boid.forward(), vec2(0.0, 1.0));
    }
}
