//! Waypoint computation for diagram edges.
//!
//! Waypoints are derived in four steps:
//!
//! 1. Seed from the flow's dockers. The first docker is relative to the
//!    source's upper-left corner, the last to the target's, and the ones in
//!    between are canvas coordinates.
//! 2. Fall back to shape centers, then to a fixed pair, when fewer than two
//!    points were found.
//! 3. Route message flows that cross a large vertical distance through two
//!    bends.
//! 4. Snap the first and last point onto the outline of their shape, except
//!    for pools.

use bpmnport_core::{
    geometry::{Bounds, Point},
    graph::{FlowEnds, FlowKind, ShapeGraph, ShapeNode},
    identifier::Id,
    silhouette::Silhouette,
};

use crate::config::{DiagramConfig, RoutingConfig};

/// Used when neither dockers nor shape bounds give two points.
const DEFAULT_WAYPOINTS: [Point; 2] = [Point::new(0.0, 0.0), Point::new(100.0, 100.0)];

/// Computes the waypoints of a valid flow.
pub fn flow_waypoints(
    graph: &ShapeGraph,
    flow: Id,
    ends: FlowEnds,
    config: &DiagramConfig,
) -> Vec<Point> {
    let source = graph.shape(ends.source);
    let target = graph.shape(ends.target);
    let dockers = graph.shape(flow).map(ShapeNode::dockers).unwrap_or_default();

    let source_bounds = source.and_then(ShapeNode::absolute_bounds);
    let target_bounds = target.and_then(ShapeNode::absolute_bounds);

    let mut waypoints = seed_waypoints(dockers, source_bounds, target_bounds);

    if config.route_message_flows() && ends.kind == FlowKind::Message {
        waypoints = route_message_flow(waypoints, config.routing());
    }

    if config.snap_to_boundaries() {
        waypoints = snap_endpoints(
            waypoints,
            source.and_then(snap_outline),
            target.and_then(snap_outline),
        );
    }

    waypoints
}

/// Builds the initial polyline from dockers, falling back to shape centers
/// and then to [`DEFAULT_WAYPOINTS`].
///
/// Always returns at least two points.
pub fn seed_waypoints(
    dockers: &[Point],
    source: Option<Bounds>,
    target: Option<Bounds>,
) -> Vec<Point> {
    let mut waypoints = Vec::with_capacity(dockers.len().max(2));

    if let (Some(first), Some(source)) = (dockers.first(), source) {
        waypoints.push(source.min_point().add_point(*first));
    }

    if dockers.len() > 2 {
        waypoints.extend_from_slice(&dockers[1..dockers.len() - 1]);
    }

    if let (Some(last), Some(target)) = (dockers.last(), target) {
        waypoints.push(target.min_point().add_point(*last));
    }

    if waypoints.len() < 2 {
        if waypoints.is_empty() {
            waypoints.extend(source.map(Bounds::center));
        }
        waypoints.extend(target.map(Bounds::center));
    }

    if waypoints.len() < 2 {
        return DEFAULT_WAYPOINTS.to_vec();
    }

    waypoints
}

/// Replaces a long diagonal message flow with a four-point route.
///
/// The route leaves the start vertically, crosses over at the bends, and
/// reaches the end vertically. Flows spanning less than the configured
/// distances are returned unchanged.
pub fn route_message_flow(waypoints: Vec<Point>, routing: &RoutingConfig) -> Vec<Point> {
    let (Some(&start), Some(&end)) = (waypoints.first(), waypoints.last()) else {
        return waypoints;
    };
    if waypoints.len() < 2 {
        return waypoints;
    }

    let span = end.sub_point(start);
    if span.y().abs() < routing.min_vertical_span()
        || span.x().abs() < routing.min_horizontal_span()
    {
        return waypoints;
    }

    let first_bend_y = start.lerp(end, routing.first_bend()).y();
    let second_bend_y = start.lerp(end, routing.second_bend()).y();

    vec![
        start,
        start.with_y(first_bend_y),
        end.with_y(second_bend_y),
        end,
    ]
}

/// The outline a flow endpoint snaps to, or `None` when the shape keeps its
/// docker position.
fn snap_outline(shape: &ShapeNode) -> Option<(Bounds, Silhouette)> {
    if shape.stencil().is_pool() {
        return None;
    }
    shape
        .absolute_bounds()
        .map(|bounds| (bounds, shape.stencil().silhouette()))
}

/// Moves the first and last waypoint onto the outline of the source and
/// target.
///
/// Each endpoint is aimed at its neighbour in the unsnapped polyline. A
/// degenerate direction leaves the endpoint where it was.
pub fn snap_endpoints(
    waypoints: Vec<Point>,
    source: Option<(Bounds, Silhouette)>,
    target: Option<(Bounds, Silhouette)>,
) -> Vec<Point> {
    let count = waypoints.len();
    if count < 2 {
        return waypoints;
    }

    let mut snapped = waypoints.clone();

    if let Some(point) = source
        .and_then(|(bounds, silhouette)| silhouette.boundary_point(bounds, waypoints[1]))
    {
        snapped[0] = point;
    }

    if let Some(point) = target
        .and_then(|(bounds, silhouette)| silhouette.boundary_point(bounds, waypoints[count - 2]))
    {
        snapped[count - 1] = point;
    }

    snapped
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f64..1000.0,
            -1000.0f64..1000.0,
            1.0f64..400.0,
            1.0f64..400.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new(Point::new(x, y), Point::new(x + w, y + h)))
    }

    fn silhouette_strategy() -> impl Strategy<Value = Silhouette> {
        prop_oneof![
            Just(Silhouette::Circle),
            Just(Silhouette::Diamond),
            Just(Silhouette::Rectangle),
        ]
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-2000.0f64..2000.0, -2000.0f64..2000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    /// Snapped points stay within the union of the endpoint boxes and the
    /// box around the original polyline.
    fn check_snapping_stays_in_envelope(
        source: (Bounds, Silhouette),
        target: (Bounds, Silhouette),
        waypoints: Vec<Point>,
    ) -> Result<(), TestCaseError> {
        let Some(polyline) = Bounds::enclosing(waypoints.iter().copied()) else {
            return Ok(());
        };
        let envelope = polyline.merge(&source.0).merge(&target.0);

        let snapped = snap_endpoints(waypoints, Some(source), Some(target));
        for point in snapped {
            prop_assert!(
                envelope.contains_with_tolerance(point, 1e-6),
                "{point:?} outside {envelope:?}"
            );
        }
        Ok(())
    }

    /// Routing keeps the endpoints and yields either the input or four
    /// points.
    fn check_routing_keeps_endpoints(start: Point, end: Point) -> Result<(), TestCaseError> {
        let routed = route_message_flow(vec![start, end], &RoutingConfig::default());

        prop_assert!(routed.len() == 2 || routed.len() == 4);
        prop_assert_eq!(routed.first().copied(), Some(start));
        prop_assert_eq!(routed.last().copied(), Some(end));
        Ok(())
    }

    proptest! {
        #[test]
        fn snapping_stays_in_envelope(
            source in (bounds_strategy(), silhouette_strategy()),
            target in (bounds_strategy(), silhouette_strategy()),
            waypoints in prop::collection::vec(point_strategy(), 2..6),
        ) {
            check_snapping_stays_in_envelope(source, target, waypoints)?;
        }

        #[test]
        fn routing_keeps_endpoints(start in point_strategy(), end in point_strategy()) {
            check_routing_keeps_endpoints(start, end)?;
        }
    }
}
