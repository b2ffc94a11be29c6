//! Boundary silhouettes used to attach flow endpoints to shape outlines.
//!
//! Every shape is drawn inside its bounding box, but only tasks and other
//! rectangular shapes actually touch it. Events are circles and gateways are
//! diamonds inscribed in the box. [`Silhouette::boundary_point`] casts a ray
//! from the center of the box toward a point and returns where it leaves the
//! outline.

use crate::geometry::{Bounds, Point};

/// Direction vectors shorter than this are treated as degenerate.
const MIN_DIRECTION_LENGTH: f64 = 0.001;

/// The outline of a shape inside its bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Silhouette {
    /// A circle centered in the box with a radius of half the smaller side.
    Circle,
    /// The rhombus whose vertices are the midpoints of the box's sides.
    Diamond,
    /// The bounding box itself.
    Rectangle,
}

impl Silhouette {
    /// Finds where the ray from the center of `bounds` toward `toward`
    /// crosses this silhouette.
    ///
    /// Returns `None` when the direction is degenerate (`toward` coincides
    /// with the center) or the outline has no extent along the ray.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bpmnport_core::geometry::{Bounds, Point};
    /// # use bpmnport_core::silhouette::Silhouette;
    /// let event = Bounds::new(Point::new(0.0, 0.0), Point::new(40.0, 40.0));
    /// let hit = Silhouette::Circle
    ///     .boundary_point(event, Point::new(100.0, 20.0))
    ///     .unwrap();
    /// assert_eq!(hit, Point::new(40.0, 20.0));
    /// ```
    pub fn boundary_point(self, bounds: Bounds, toward: Point) -> Option<Point> {
        let center = bounds.center();
        let direction = toward.sub_point(center);
        if direction.x().abs() < MIN_DIRECTION_LENGTH && direction.y().abs() < MIN_DIRECTION_LENGTH
        {
            return None;
        }

        let half_width = bounds.width().abs() / 2.0;
        let half_height = bounds.height().abs() / 2.0;

        match self {
            Self::Circle => find_circle_intersection(center, direction, half_width, half_height),
            Self::Diamond => find_diamond_intersection(center, direction, half_width, half_height),
            Self::Rectangle => {
                find_rectangle_intersection(center, direction, half_width, half_height)
            }
        }
    }
}

fn find_circle_intersection(
    center: Point,
    direction: Point,
    half_width: f64,
    half_height: f64,
) -> Option<Point> {
    let radius = half_width.min(half_height);
    let length = direction.hypot();
    if length <= 0.0 {
        return None;
    }

    Some(center.add_point(direction.scale(radius / length)))
}

fn find_diamond_intersection(
    center: Point,
    direction: Point,
    half_width: f64,
    half_height: f64,
) -> Option<Point> {
    let length = direction.hypot();
    if length <= 0.0 {
        return None;
    }
    let unit = direction.scale(1.0 / length);

    // Edges satisfy |x / hw| + |y / hh| = 1.
    let denominator = unit.x().abs() * half_height + unit.y().abs() * half_width;
    if denominator <= 0.0 {
        return None;
    }
    let t = half_width * half_height / denominator;

    Some(center.add_point(unit.scale(t)))
}

fn find_rectangle_intersection(
    center: Point,
    direction: Point,
    half_width: f64,
    half_height: f64,
) -> Option<Point> {
    let length = direction.hypot();
    if length <= 0.0 {
        return None;
    }

    let dx_norm = direction.x() / length;
    let dy_norm = direction.y() / length;

    // Distance along the ray to each edge line
    let t_top = -half_height / dy_norm;
    let t_bottom = half_height / dy_norm;
    let t_left = -half_width / dx_norm;
    let t_right = half_width / dx_norm;

    // The nearest edge crossed ahead of the center is the exit point
    let t = [t_top, t_bottom, t_left, t_right]
        .into_iter()
        .filter(|t| t.is_finite() && *t > 0.0)
        .fold(f64::MAX, f64::min);

    if t == f64::MAX {
        return None;
    }

    Some(Point::new(
        dx_norm.mul_add(t, center.x()),
        dy_norm.mul_add(t, center.y()),
    ))
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn task_bounds() -> Bounds {
        Bounds::new(Point::new(100.0, 100.0), Point::new(200.0, 180.0))
    }

    #[test]
    fn test_rectangle_right_edge() {
        let hit = Silhouette::Rectangle
            .boundary_point(task_bounds(), Point::new(400.0, 140.0))
            .unwrap();

        assert_approx_eq!(f64, hit.x(), 200.0, epsilon = 1e-9);
        assert_approx_eq!(f64, hit.y(), 140.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rectangle_top_edge() {
        let hit = Silhouette::Rectangle
            .boundary_point(task_bounds(), Point::new(150.0, 0.0))
            .unwrap();

        assert_approx_eq!(f64, hit.x(), 150.0, epsilon = 1e-9);
        assert_approx_eq!(f64, hit.y(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rectangle_diagonal_hits_closest_edge() {
        // Aspect ratio 100x80: a 45 degree ray leaves through the bottom edge.
        let hit = Silhouette::Rectangle
            .boundary_point(task_bounds(), Point::new(250.0, 240.0))
            .unwrap();

        assert_approx_eq!(f64, hit.x(), 190.0, epsilon = 1e-9);
        assert_approx_eq!(f64, hit.y(), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_circle_uses_smaller_dimension() {
        let hit = Silhouette::Circle
            .boundary_point(task_bounds(), Point::new(400.0, 140.0))
            .unwrap();

        // Radius is half of min(100, 80)
        assert_approx_eq!(f64, hit.x(), 190.0, epsilon = 1e-9);
        assert_approx_eq!(f64, hit.y(), 140.0, epsilon = 1e-9);
    }

    #[test]
    fn test_circle_diagonal() {
        let event = Bounds::new(Point::new(0.0, 0.0), Point::new(36.0, 36.0));
        let hit = Silhouette::Circle
            .boundary_point(event, Point::new(118.0, 118.0))
            .unwrap();

        let offset = 18.0 / 2.0_f64.sqrt();
        assert_approx_eq!(f64, hit.x(), 18.0 + offset, epsilon = 1e-9);
        assert_approx_eq!(f64, hit.y(), 18.0 + offset, epsilon = 1e-9);
    }

    #[test]
    fn test_diamond_vertex_and_edge() {
        let gateway = Bounds::new(Point::new(0.0, 0.0), Point::new(40.0, 40.0));

        let vertex = Silhouette::Diamond
            .boundary_point(gateway, Point::new(20.0, 100.0))
            .unwrap();
        assert_approx_eq!(f64, vertex.x(), 20.0, epsilon = 1e-9);
        assert_approx_eq!(f64, vertex.y(), 40.0, epsilon = 1e-9);

        let edge = Silhouette::Diamond
            .boundary_point(gateway, Point::new(120.0, 120.0))
            .unwrap();
        assert_approx_eq!(f64, edge.x(), 30.0, epsilon = 1e-9);
        assert_approx_eq!(f64, edge.y(), 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_direction() {
        let bounds = task_bounds();
        for silhouette in [
            Silhouette::Circle,
            Silhouette::Diamond,
            Silhouette::Rectangle,
        ] {
            assert_eq!(silhouette.boundary_point(bounds, bounds.center()), None);
            assert_eq!(
                silhouette.boundary_point(bounds, bounds.center().add_point(Point::new(0.0005, 0.0))),
                None
            );
        }
    }

    #[test]
    fn test_zero_sized_rectangle() {
        let point = Bounds::new(Point::new(10.0, 10.0), Point::new(10.0, 10.0));
        assert_eq!(
            Silhouette::Rectangle.boundary_point(point, Point::new(50.0, 10.0)),
            None
        );
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f64..1000.0,
            -1000.0f64..1000.0,
            1.0f64..500.0,
            1.0f64..500.0,
        )
            .prop_map(|(x, y, w, h)| {
                Bounds::new(Point::new(x, y), Point::new(x + w, y + h))
            })
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-2000.0f64..2000.0, -2000.0f64..2000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn silhouette_strategy() -> impl Strategy<Value = Silhouette> {
        prop_oneof![
            Just(Silhouette::Circle),
            Just(Silhouette::Diamond),
            Just(Silhouette::Rectangle),
        ]
    }

    /// Boundary points never leave the bounding box.
    fn check_boundary_point_is_inside_bounds(
        silhouette: Silhouette,
        bounds: Bounds,
        toward: Point,
    ) -> Result<(), TestCaseError> {
        if let Some(hit) = silhouette.boundary_point(bounds, toward) {
            prop_assert!(
                bounds.contains_with_tolerance(hit, 1e-6),
                "{silhouette:?} hit {hit:?} outside {bounds:?}"
            );
        }
        Ok(())
    }

    /// The boundary point lies on the ray from the center toward the target.
    fn check_boundary_point_is_on_ray(
        silhouette: Silhouette,
        bounds: Bounds,
        toward: Point,
    ) -> Result<(), TestCaseError> {
        let center = bounds.center();
        if let Some(hit) = silhouette.boundary_point(bounds, toward) {
            let ray = toward.sub_point(center);
            let offset = hit.sub_point(center);
            let cross = ray.x() * offset.y() - ray.y() * offset.x();
            let dot = ray.x() * offset.x() + ray.y() * offset.y();

            prop_assert!(cross.abs() <= 1e-6 * ray.hypot().max(1.0) * offset.hypot().max(1.0));
            prop_assert!(dot >= 0.0);
        }
        Ok(())
    }

    /// Rectangle hits land on an edge of the box.
    fn check_rectangle_hit_on_edge(bounds: Bounds, toward: Point) -> Result<(), TestCaseError> {
        if let Some(hit) = Silhouette::Rectangle.boundary_point(bounds, toward) {
            let on_vertical = (hit.x() - bounds.min_x()).abs() < 1e-6
                || (hit.x() - bounds.max_x()).abs() < 1e-6;
            let on_horizontal = (hit.y() - bounds.min_y()).abs() < 1e-6
                || (hit.y() - bounds.max_y()).abs() < 1e-6;
            prop_assert!(on_vertical || on_horizontal);
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn boundary_point_is_inside_bounds(
            silhouette in silhouette_strategy(),
            bounds in bounds_strategy(),
            toward in point_strategy(),
        ) {
            check_boundary_point_is_inside_bounds(silhouette, bounds, toward)?;
        }

        #[test]
        fn boundary_point_is_on_ray(
            silhouette in silhouette_strategy(),
            bounds in bounds_strategy(),
            toward in point_strategy(),
        ) {
            check_boundary_point_is_on_ray(silhouette, bounds, toward)?;
        }

        #[test]
        fn rectangle_hit_on_edge(bounds in bounds_strategy(), toward in point_strategy()) {
            check_rectangle_hit_on_edge(bounds, toward)?;
        }
    }
}
