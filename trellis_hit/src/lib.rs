// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Hit: geometry-level containment helpers.
//!
//! This crate provides the small, pure functions the rest of Trellis uses
//! for narrow-phase hit testing in pixel coordinates, built on top of
//! [`kurbo`]. It is intentionally decoupled from any widget tree or event
//! router.
//!
//! # Typical usage
//!
//! - Use a broad-phase structure (e.g. `trellis_rows`) to find a candidate
//!   under the pointer.
//! - Build the candidate's corner array with [`rect_corners`].
//! - Call [`point_in_rect`] to confirm containment, then refine against a
//!   per-widget mask if the widget has one.
//!
//! # Containment strategy
//!
//! [`point_in_rect`] uses triangle-area decomposition: the sum of the areas
//! of the four triangles formed by the query point and each rectangle edge
//! equals the rectangle's own area exactly when the point lies inside or on
//! the boundary. The corners are data, not an assumption — they must be in
//! perimeter order (either winding), but need not be axis-aligned, so the
//! test keeps working if rotated placement is ever introduced.
//!
//! ```rust
//! use kurbo::Point;
//! use trellis_hit::{point_in_rect, rect_corners};
//!
//! // A 10×10 widget placed at (5, 5). Corners span its outermost pixels.
//! let corners = rect_corners(5, 5, 10, 10);
//! assert!(point_in_rect(corners, Point::new(8.0, 8.0)));
//! assert!(!point_in_rect(corners, Point::new(15.0, 8.0)));
//! ```

#![no_std]

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;

/// Tolerance for comparing the triangle-area sum against the rectangle area.
///
/// Pixel coordinates stay well below 2^24, so absolute error in the area
/// sums is far smaller than this.
const AREA_EPSILON: f64 = 1e-6;

/// Twice the signed area of the triangle `(a, b, c)`, absolute value.
#[inline]
fn triangle_area2(a: Point, b: Point, c: Point) -> f64 {
    ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs()
}

/// Whether `pt` lies inside (or on the boundary of) the rectangle given by
/// its four corners in perimeter order.
///
/// The test decomposes the rectangle into the four triangles `(pt, corner,
/// next corner)`; their summed area exceeds the rectangle's area exactly
/// when the point is outside. Corner order may follow either winding.
pub fn point_in_rect(corners: [Point; 4], pt: Point) -> bool {
    let [a, b, c, d] = corners;
    // Area of the quad itself, split along the a→c diagonal.
    let rect2 = triangle_area2(a, b, c) + triangle_area2(a, c, d);
    let sum2 = triangle_area2(pt, a, b)
        + triangle_area2(pt, b, c)
        + triangle_area2(pt, c, d)
        + triangle_area2(pt, d, a);
    sum2 <= rect2 + AREA_EPSILON
}

/// Corner array for a widget occupying the pixel box `[x, x+w) × [y, y+h)`.
///
/// The corners span the outermost pixels (`x + w - 1`, `y + h - 1`), so
/// integer-point containment via [`point_in_rect`] matches the half-open
/// pixel box exactly. Zero or negative extents invert the corner span;
/// callers are expected to reject such widgets before the corner test.
pub fn rect_corners(x: i32, y: i32, w: i32, h: i32) -> [Point; 4] {
    let x0 = f64::from(x);
    let y0 = f64::from(y);
    let x1 = f64::from(x + w - 1);
    let y1 = f64::from(y + h - 1);
    [
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ]
}

/// Clamp `value` to `[min, max]`, applying `min(value, max)` then
/// `max(result, min)` in that exact order.
///
/// The bounds are not validated: with a reversed range (`min > max`) the
/// result is always the `min` argument. Callers passing a reversed range
/// still get a deterministic value; do not reorder the two steps.
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    let upper = if value > max { max } else { value };
    if upper < min { min } else { upper }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_inside_rect() {
        let corners = rect_corners(0, 0, 10, 10);
        assert!(point_in_rect(corners, Point::new(5.0, 5.0)));
        assert!(point_in_rect(corners, Point::new(0.0, 0.0)));
        assert!(point_in_rect(corners, Point::new(9.0, 9.0)));
    }

    #[test]
    fn point_outside_rect() {
        let corners = rect_corners(0, 0, 10, 10);
        assert!(!point_in_rect(corners, Point::new(10.0, 5.0)));
        assert!(!point_in_rect(corners, Point::new(5.0, 10.0)));
        assert!(!point_in_rect(corners, Point::new(-1.0, 5.0)));
        assert!(!point_in_rect(corners, Point::new(5.0, -1.0)));
    }

    #[test]
    fn corner_order_is_data_not_assumption() {
        // Same rectangle, opposite winding.
        let cw = rect_corners(2, 3, 4, 5);
        let ccw = [cw[0], cw[3], cw[2], cw[1]];
        for (x, y) in [(2.0, 3.0), (4.0, 5.0), (5.0, 7.0)] {
            let pt = Point::new(x, y);
            assert_eq!(
                point_in_rect(cw, pt),
                point_in_rect(ccw, pt),
                "winding changed the verdict at ({x}, {y})"
            );
        }
    }

    #[test]
    fn offset_rect_half_open_pixels() {
        // A 3×2 widget at (10, 20) covers pixels x ∈ [10, 13), y ∈ [20, 22).
        let corners = rect_corners(10, 20, 3, 2);
        assert!(point_in_rect(corners, Point::new(10.0, 20.0)));
        assert!(point_in_rect(corners, Point::new(12.0, 21.0)));
        assert!(!point_in_rect(corners, Point::new(13.0, 21.0)));
        assert!(!point_in_rect(corners, Point::new(12.0, 22.0)));
    }

    #[test]
    fn degenerate_rect_contains_nothing_useful() {
        // Zero width inverts the corner span; the only "containable" points
        // would be collinear ones, which real widgets never query because
        // the bounds index holds no rows for them.
        let corners = rect_corners(5, 5, 0, 10);
        assert!(!point_in_rect(corners, Point::new(6.0, 7.0)));
    }

    #[test]
    fn clamp_in_range_and_at_bounds() {
        assert_eq!(clamp(5, 0, 10), 5);
        assert_eq!(clamp(-3, 0, 10), 0);
        assert_eq!(clamp(42, 0, 10), 10);
        assert_eq!(clamp(0, 0, 10), 0);
        assert_eq!(clamp(10, 0, 10), 10);
    }

    #[test]
    fn clamp_reversed_bounds_returns_minimum() {
        // min-then-max with a reversed range collapses to the `min`
        // argument. This pins the documented quirk; it is not symmetric.
        assert_eq!(clamp(5, 10, 0), 10);
        assert_eq!(clamp(-5, 10, 0), 10);
        assert_eq!(clamp(20, 10, 0), 10);
    }

    #[test]
    fn clamp_works_on_floats() {
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
        assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
    }
}
