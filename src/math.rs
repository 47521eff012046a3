//! Mapping ring positions into the plane, for renderers.

use cgmath::Point2;
use std::f64::consts::TAU;

/// A 2D point
pub type Point2d = Point2<f64>;

/// The radius of a circle with the given circumference.
pub fn ring_radius(circumference: f64) -> f64 {
    circumference / TAU
}

/// The world space coordinates of an arc-length position on a ring centred at the origin.
/// Position zero lies on the positive x-axis and positions increase anticlockwise.
///
/// # Parameters
/// * `pos` - The arc-length position in m
/// * `circumference` - The length of the ring in m
pub fn ring_point(pos: f64, circumference: f64) -> Point2d {
    let radius = ring_radius(circumference);
    let angle = pos / radius;
    Point2d::new(radius * angle.cos(), radius * angle.sin())
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use cgmath::MetricSpace;

    #[test]
    fn quarter_turns() {
        let circ = 100.0;
        let r = ring_radius(circ);

        let p = ring_point(0.0, circ);
        assert_approx_eq!(p.x, r);
        assert_approx_eq!(p.y, 0.0);

        let p = ring_point(25.0, circ);
        assert_approx_eq!(p.x, 0.0);
        assert_approx_eq!(p.y, r);

        let p = ring_point(50.0, circ);
        assert_approx_eq!(p.x, -r);
    }

    #[test]
    fn points_lie_on_circle() {
        let origin = Point2d::new(0.0, 0.0);
        for pos in [3.0, 77.7, 123.4, 229.9] {
            assert_approx_eq!(ring_point(pos, 230.0).distance(origin), ring_radius(230.0));
        }
    }
}
