/*
 * Border Module
 *
 * Soft world walls. Each axis maps the boid's position across the repulsion
 * rectangle onto [-1, 1], measured from both opposing edges, and feeds each
 * side through an eighth-power curve. The force is negligible in the interior
 * and climbs steeply at and beyond an edge. Opposing edges subtract, so the
 * centre of the rectangle is force-free.
 */

use nannou::prelude::*;

use crate::geometry::{constrain, map_range};

/// Exponent of the falloff curve.
const FALLOFF_POWER: i32 = 8;
/// Normalized distances past an edge are capped here, so the force stays finite.
const OVERSHOOT_LIMIT: f32 = -100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepulsionBorders {
    pub bounds: Rect,
    pub strength: f32,
}

impl RepulsionBorders {
    pub fn new(bounds: Rect, strength: f32) -> Self {
        Self { bounds, strength }
    }

    /// Repulsion acting on a boid at `position`. Depends on position only.
    pub fn force_at(&self, position: Point2) -> Vec2 {
        let x_range = (self.bounds.left(), self.bounds.right());
        let y_range = (self.bounds.bottom(), self.bounds.top());

        // 1 at the far edge, -1 at the near edge, below -1 once past it.
        let from_left = map_range(position.x, x_range, (-1.0, 1.0));
        let from_bottom = map_range(position.y, y_range, (-1.0, 1.0));
        let from_right = -from_left;
        let from_top = -from_bottom;

        let push = |from_edge: f32| (constrain(from_edge, OVERSHOOT_LIMIT, 1.0) - 1.0).powi(FALLOFF_POWER);

        let force = vec2(
            push(from_left) - push(from_right),
            push(from_bottom) - push(from_top),
        );
        force * self.strength
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn borders() -> RepulsionBorders {
        RepulsionBorders::new(Rect::from_corners(pt2(-100.0, -50.0), pt2(100.0, 50.0)), 25.0)
    }

    #[test]
    fn centre_is_force_free() {
        assert_eq!(borders().force_at(pt2(0.0, 0.0)), Vec2::ZERO);
    }

    #[test]
    fn edges_push_inwards() {
        let borders = borders();
        assert!(borders.force_at(pt2(-100.0, 0.0)).x > 0.0);
        assert!(borders.force_at(pt2(100.0, 0.0)).x < 0.0);
        assert!(borders.force_at(pt2(0.0, -50.0)).y > 0.0);
        assert!(borders.force_at(pt2(0.0, 50.0)).y < 0.0);
    }

    #[test]
    fn force_is_symmetric_across_the_centre() {
        let borders = borders();
        let a = borders.force_at(pt2(-70.0, 20.0));
        let b = borders.force_at(pt2(70.0, -20.0));
        assert!((a.x + b.x).abs() < 1e-2);
        assert!((a.y + b.y).abs() < 1e-2);
    }

    #[test]
    fn force_grows_steeply_past_an_edge_but_stays_finite() {
        let borders = borders();
        let at_edge = borders.force_at(pt2(-100.0, 0.0)).x;
        let past_edge = borders.force_at(pt2(-150.0, 0.0)).x;
        let far_past = borders.force_at(pt2(-1.0e9, 0.0)).x;
        assert!(past_edge > at_edge);
        assert!(far_past >= past_edge);
        assert!(far_past.is_finite());
        // At the edge: 25 * 2^8
        assert!((at_edge - 6400.0).abs() < 1e-2);
    }

    #[test]
    fn interior_force_is_small() {
        let borders = borders();
        let near_centre = borders.force_at(pt2(10.0, 0.0)).length();
        let at_edge = borders.force_at(pt2(100.0, 0.0)).length();
        assert!(near_centre < at_edge / 100.0);
    }
}
