/*
 * Geometry Module
 *
 * Small vector helpers shared by the perception and force code. All angles
 * are in degrees and the plane is y-up, so "left" of a direction is the
 * counter-clockwise side.
 */

use nannou::prelude::*;

/// Unsigned angle between two vectors, in degrees (0..=180).
/// Returns 0 when either vector has zero length.
pub fn angle_between(a: Vec2, b: Vec2) -> f32 {
    if a.length_squared() == 0.0 || b.length_squared() == 0.0 {
        return 0.0;
    }
    a.perp_dot(b).atan2(a.dot(b)).abs().to_degrees()
}

/// Signed area of the triangle (start, end, point), doubled.
/// Positive when `point` lies to the left of the directed line start -> end.
#[inline]
pub fn side(start: Vec2, end: Vec2, point: Vec2) -> f32 {
    (end - start).perp_dot(point - start)
}

/// Whether `point` lies strictly to the left of the directed line start -> end.
#[inline]
pub fn is_left(start: Vec2, end: Vec2, point: Vec2) -> bool {
    side(start, end, point) > 0.0
}

/// Counter-clockwise perpendicular.
#[inline]
pub fn perpendicular(v: Vec2) -> Vec2 {
    vec2(-v.y, v.x)
}

/// Rotate `v` counter-clockwise by `degrees`.
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    vec2(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Linearly remap `value` from the `from` range onto the `to` range.
/// Values outside `from` extrapolate; a degenerate `from` range maps to `to.0`.
pub fn map_range(value: f32, from: (f32, f32), to: (f32, f32)) -> f32 {
    let span = from.1 - from.0;
    if span == 0.0 {
        return to.0;
    }
    to.0 + (value - from.0) * (to.1 - to.0) / span
}

/// Clamp without panicking on inverted bounds (`min` wins).
#[inline]
pub fn constrain(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// Scale `v` down to `max` length if it is longer.
pub fn limit(v: Vec2, max: f32) -> Vec2 {
    let length_squared = v.length_squared();
    if length_squared > max * max {
        v * (max / length_squared.sqrt())
    } else {
        v
    }
}
