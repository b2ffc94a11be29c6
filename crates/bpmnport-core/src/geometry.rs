//! Geometric primitives for shape bounds and flow waypoints.
//!
//! This module provides the small set of geometric types the converter works
//! with when folding container offsets into shape bounds and when routing
//! flows between shapes.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate on the diagram canvas
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangle given by its upper-left and lower-right corners
//!
//! # Coordinate System
//!
//! Exported diagrams use a screen coordinate system:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Coordinates are `f64` so that offset accumulation reproduces the exact
//! sums of the JSON numbers it reads.

/// A 2D point on the diagram canvas.
///
/// # Examples
///
/// ```
/// # use bpmnport_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Creates a new point with the specified y-coordinate
    pub fn with_y(mut self, y: f64) -> Self {
        self.y = y;
        self
    }

    /// Adds another point to this point, returning a new point.
    ///
    /// Used to fold a container's upper-left corner into the offset carried
    /// down to its children.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Returns the length of the vector from the origin to this point.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bpmnport_core::geometry::Point;
    /// let direction = Point::new(3.0, 4.0);
    /// assert_eq!(direction.hypot(), 5.0);
    /// ```
    pub fn hypot(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Multiplies both coordinates by a scalar factor
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Linearly interpolates between this point and `other`.
    ///
    /// `t = 0.0` yields `self`, `t = 1.0` yields `other`.
    pub fn lerp(self, other: Point, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// A 2D size with width and height dimensions
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    /// Creates a new size with the specified width and height
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns the width component of the size
    pub fn width(self) -> f64 {
        self.width
    }

    /// Returns the height component of the size
    pub fn height(self) -> f64 {
        self.height
    }
}

/// A rectangle given by its upper-left (`min`) and lower-right (`max`) corners.
///
/// Corners are stored exactly as supplied. A malformed export may describe a
/// rectangle whose lower-right corner lies above or left of its upper-left
/// corner, in which case [`Bounds::width`] or [`Bounds::height`] is negative.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    /// Creates bounds from an upper-left and a lower-right corner.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bpmnport_core::geometry::{Bounds, Point};
    /// let bounds = Bounds::new(Point::new(10.0, 20.0), Point::new(110.0, 100.0));
    /// assert_eq!(bounds.width(), 100.0);
    /// assert_eq!(bounds.height(), 80.0);
    /// ```
    pub fn new(upper_left: Point, lower_right: Point) -> Self {
        Self {
            min_x: upper_left.x,
            min_y: upper_left.y,
            max_x: lower_right.x,
            max_y: lower_right.y,
        }
    }

    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f64 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f64 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f64 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f64 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f64 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    /// Returns the bottom-right corner as a Point
    pub fn max_point(self) -> Point {
        Point {
            x: self.max_x,
            y: self.max_y,
        }
    }

    /// Merges two bounds to create a larger bounds that contains both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bpmnport_core::geometry::{Bounds, Point, Size};
    /// let task = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 80.0));
    /// let event = Bounds::new_from_top_left(Point::new(150.0, 20.0), Size::new(30.0, 30.0));
    ///
    /// let combined = task.merge(&event);
    /// assert_eq!(combined.width(), 180.0);
    /// assert_eq!(combined.height(), 80.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Returns the smallest bounds containing every point, or `None` for an
    /// empty iterator.
    pub fn enclosing(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        points
            .into_iter()
            .map(|p| Bounds::new(p, p))
            .reduce(|acc, b| acc.merge(&b))
    }

    /// Moves the bounds by the specified offset.
    ///
    /// Both corners are shifted, so a local rectangle becomes an absolute one
    /// when translated by the accumulated offset of its containers.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bpmnport_core::geometry::{Bounds, Point};
    /// let local = Bounds::new(Point::new(10.0, 20.0), Point::new(60.0, 50.0));
    /// let absolute = local.translate(Point::new(100.0, 50.0));
    /// assert_eq!(absolute.min_x(), 110.0);
    /// assert_eq!(absolute.min_y(), 70.0);
    /// assert_eq!(absolute.width(), 50.0);
    /// ```
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Checks whether a point lies inside or on the edge of the bounds,
    /// allowing `tolerance` units of slack on every side.
    pub fn contains_with_tolerance(self, point: Point, tolerance: f64) -> bool {
        let (lo_x, hi_x) = (self.min_x.min(self.max_x), self.min_x.max(self.max_x));
        let (lo_y, hi_y) = (self.min_y.min(self.max_y), self.min_y.max(self.max_y));
        point.x >= lo_x - tolerance
            && point.x <= hi_x + tolerance
            && point.y >= lo_y - tolerance
            && point.y <= hi_y + tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_new() {
        let p = Point::new(10.0, 20.0);
        assert_eq!(p.x(), 10.0);
        assert_eq!(p.y(), 20.0);
    }

    #[test]
    fn test_point_with_y() {
        let p = Point::new(1.0, 2.0).with_y(7.0);
        assert_eq!(p, Point::new(1.0, 7.0));
    }

    #[test]
    fn test_point_add_sub() {
        let p1 = Point::new(10.0, 20.0);
        let p2 = Point::new(5.0, 7.0);

        assert_eq!(p1.add_point(p2), Point::new(15.0, 27.0));
        assert_eq!(p1.sub_point(p2), Point::new(5.0, 13.0));
    }

    #[test]
    fn test_point_hypot_and_scale() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(p.hypot(), 5.0);
        assert_eq!(p.scale(2.0), Point::new(6.0, 8.0));
    }

    #[test]
    fn test_point_lerp() {
        let start = Point::new(0.0, 100.0);
        let end = Point::new(200.0, 300.0);

        assert_eq!(start.lerp(end, 0.0), start);
        assert_eq!(start.lerp(end, 1.0), end);
        assert_eq!(start.lerp(end, 0.5), Point::new(100.0, 200.0));
    }

    #[test]
    fn test_bounds_from_corners() {
        let bounds = Bounds::new(Point::new(10.0, 20.0), Point::new(110.0, 100.0));

        assert_eq!(bounds.min_x(), 10.0);
        assert_eq!(bounds.min_y(), 20.0);
        assert_eq!(bounds.max_x(), 110.0);
        assert_eq!(bounds.max_y(), 100.0);
        assert_eq!(bounds.width(), 100.0);
        assert_eq!(bounds.height(), 80.0);
        assert_eq!(bounds.center(), Point::new(60.0, 60.0));
        assert_eq!(bounds.min_point(), Point::new(10.0, 20.0));
        assert_eq!(bounds.max_point(), Point::new(110.0, 100.0));
    }

    #[test]
    fn test_bounds_inverted_corners_keep_sign() {
        let bounds = Bounds::new(Point::new(100.0, 100.0), Point::new(90.0, 80.0));

        assert_eq!(bounds.width(), -10.0);
        assert_eq!(bounds.height(), -20.0);
        assert!(bounds.contains_with_tolerance(Point::new(95.0, 90.0), 0.0));
    }

    #[test]
    fn test_bounds_new_from_top_left() {
        let bounds = Bounds::new_from_top_left(Point::new(5.0, 5.0), Size::new(20.0, 10.0));
        assert_eq!(bounds.max_point(), Point::new(25.0, 15.0));
    }

    #[test]
    fn test_bounds_translate() {
        let bounds = Bounds::new(Point::new(10.0, 20.0), Point::new(60.0, 50.0));
        let moved = bounds.translate(Point::new(100.0, 50.0));

        assert_eq!(moved.min_point(), Point::new(110.0, 70.0));
        assert_eq!(moved.max_point(), Point::new(160.0, 100.0));
    }

    #[test]
    fn test_bounds_enclosing() {
        let points = [
            Point::new(10.0, 50.0),
            Point::new(-5.0, 20.0),
            Point::new(30.0, 0.0),
        ];

        let bounds = Bounds::enclosing(points).unwrap();
        assert_eq!(bounds.min_point(), Point::new(-5.0, 0.0));
        assert_eq!(bounds.max_point(), Point::new(30.0, 50.0));

        assert!(Bounds::enclosing(Vec::new()).is_none());
    }

    #[test]
    fn test_bounds_contains_with_tolerance() {
        let bounds = Bounds::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));

        assert!(bounds.contains_with_tolerance(Point::new(10.0, 10.0), 0.0));
        assert!(!bounds.contains_with_tolerance(Point::new(10.5, 5.0), 0.0));
        assert!(bounds.contains_with_tolerance(Point::new(10.5, 5.0), 1.0));
    }
}
