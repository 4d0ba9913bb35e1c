// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the turn-angle measure and the convexity test used
//! to validate collision boundaries.

use crate::models::scene_object::Point;

/// Vertex ordering of a polygon, as classified by the signed edge sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

/// Angle in degrees, in `[0, 360)`, at vertex `b` from the direction of `a` to the direction of `c`.
///
/// This is orientation sensitive: swapping `a` and `c` gives `360 - angle`
/// (or 0 for a degenerate turn).
pub fn angle_between(a: Point, b: Point, c: Point) -> f64 {
    let from_a = ((b.y - a.y) as f64).atan2((b.x - a.x) as f64);
    let from_c = ((b.y - c.y) as f64).atan2((b.x - c.x) as f64);

    let angle = (from_a - from_c).to_degrees();
    if angle < 0.0 {
        angle + 360.0
    } else {
        angle
    }
}

/// Classify winding with `Σ (x[i+1] - x[i]) * (y[i+1] + y[i])` over the closed polygon.
///
/// A negative sum is counter-clockwise; zero counts as clockwise.
pub fn winding(points: &[Point]) -> Winding {
    let sum: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p, q)| (q.x as i64 - p.x as i64) * (q.y as i64 + p.y as i64))
        .sum();

    if sum < 0 {
        Winding::CounterClockwise
    } else {
        Winding::Clockwise
    }
}

/// Check whether a closed polygon is convex.
///
/// Polygons with three or fewer points are always considered convex.
pub fn is_convex(points: &[Point]) -> bool {
    let n = points.len();
    if n <= 3 {
        return true;
    }

    let direction = winding(points);
    (0..n).all(|i| {
        let prev = points[(i + n - 1) % n];
        let curr = points[i];
        let next = points[(i + 1) % n];

        let turn = match direction {
            Winding::CounterClockwise => angle_between(prev, curr, next),
            Winding::Clockwise => angle_between(next, curr, prev),
        };
        turn <= 180.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(i32, i32)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    /// Vertices of a regular polygon, rounded to the pixel grid.
    fn regular_polygon(sides: usize, radius: f64) -> Vec<Point> {
        (0..sides)
            .map(|i| {
                let theta = std::f64::consts::TAU * i as f64 / sides as f64;
                Point::new(
                    (500.0 + radius * theta.cos()).round() as i32,
                    (500.0 + radius * theta.sin()).round() as i32,
                )
            })
            .collect()
    }

    #[test]
    fn test_angle_between_right_angle() {
        let angle = angle_between(Point::new(0, 0), Point::new(4, 0), Point::new(4, 4));
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_between_is_orientation_sensitive() {
        let a = Point::new(0, 0);
        let b = Point::new(4, 0);
        let c = Point::new(4, 4);
        let forward = angle_between(a, b, c);
        let backward = angle_between(c, b, a);
        assert!((forward + backward - 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_between_range() {
        for &(a, c) in &[((0, 0), (8, 8)), ((8, 8), (0, 0)), ((-3, 5), (7, -2)), ((1, 0), (-1, 0))] {
            let angle = angle_between(Point::new(a.0, a.1), Point::new(2, 2), Point::new(c.0, c.1));
            assert!((0.0..360.0).contains(&angle), "angle {} out of range", angle);
        }
    }

    #[test]
    fn test_winding_classification() {
        // Worked example: edge sum is -44
        let pentagon = pts(&[(5, 0), (6, 4), (4, 5), (1, 5), (1, 0)]);
        assert_eq!(winding(&pentagon), Winding::CounterClockwise);

        let reversed: Vec<Point> = pentagon.iter().rev().copied().collect();
        assert_eq!(winding(&reversed), Winding::Clockwise);
    }

    #[test]
    fn test_zero_edge_sum_is_clockwise() {
        let flat = pts(&[(0, 0), (5, 0), (10, 0)]);
        assert_eq!(winding(&flat), Winding::Clockwise);
        assert_eq!(winding(&[]), Winding::Clockwise);
    }

    #[test]
    fn test_small_polygons_are_convex() {
        assert!(is_convex(&[]));
        assert!(is_convex(&pts(&[(3, 3)])));
        assert!(is_convex(&pts(&[(0, 0), (9, 9)])));
        assert!(is_convex(&pts(&[(0, 0), (10, 0), (3, 7)])));
        assert!(is_convex(&pts(&[(0, 0), (3, 7), (10, 0)])));
    }

    #[test]
    fn test_square_both_windings() {
        let square = pts(&[(0, 0), (4, 0), (4, 4), (0, 4)]);
        assert!(is_convex(&square));

        let reversed: Vec<Point> = square.iter().rev().copied().collect();
        assert!(is_convex(&reversed));
    }

    #[test]
    fn test_dart_is_not_convex() {
        let dart = pts(&[(0, 0), (4, 0), (1, 1), (0, 4)]);
        assert!(!is_convex(&dart));

        let reversed: Vec<Point> = dart.iter().rev().copied().collect();
        assert!(!is_convex(&reversed));
    }

    #[test]
    fn test_regular_polygons_are_convex() {
        for sides in 3..=12 {
            let polygon = regular_polygon(sides, 200.0);
            assert!(is_convex(&polygon), "{}-gon should be convex", sides);

            let reversed: Vec<Point> = polygon.iter().rev().copied().collect();
            assert!(is_convex(&reversed), "reversed {}-gon should be convex", sides);
        }
    }

    #[test]
    fn test_convexity_invariant_under_rotation() {
        let shapes = [
            pts(&[(0, 0), (4, 0), (1, 1), (0, 4)]),
            pts(&[(0, 0), (40, 0), (40, 40), (0, 40)]),
            pts(&[(10, 0), (20, 10), (15, 20), (12, 8), (0, 12)]),
            regular_polygon(7, 150.0),
        ];

        for shape in &shapes {
            let expected = is_convex(shape);
            for shift in 1..shape.len() {
                let mut rotated = shape.clone();
                rotated.rotate_left(shift);
                assert_eq!(is_convex(&rotated), expected, "rotation by {} changed result", shift);
            }
        }
    }

    #[test]
    fn test_translation_preserves_convexity() {
        let dart = pts(&[(0, 0), (4, 0), (1, 1), (0, 4)]);
        let shifted: Vec<Point> = dart.iter().map(|p| *p + Point::new(300, 70)).collect();
        assert!(!is_convex(&shifted));
    }
}
