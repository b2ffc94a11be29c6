use bpmnport_core::{
    geometry::Point,
    graph::{FlowKind, ShapeNode},
    identifier::Id,
    stencil::{DiagramFamily, Stencil},
};
use bpmnport_parser::{error::ErrorCode, parse};
use proptest::prelude::*;
use serde_json::{Value, json};

#[test]
fn test_pool_with_two_tasks() {
    let source = r#"{
        "resourceId": "canvas",
        "stencilset": {"namespace": "http://b3mn.org/stencilset/bpmn2.0#"},
        "childShapes": [{
            "resourceId": "pool",
            "stencil": {"id": "Pool"},
            "properties": {"name": "Sales"},
            "bounds": {"upperLeft": {"x": 0, "y": 0}, "lowerRight": {"x": 600, "y": 250}},
            "childShapes": [
                {
                    "resourceId": "t1",
                    "stencil": {"id": "Task"},
                    "properties": {"name": "Take   order"},
                    "bounds": {"upperLeft": {"x": 100, "y": 80}, "lowerRight": {"x": 200, "y": 160}},
                    "outgoing": [{"resourceId": "f1"}]
                },
                {
                    "resourceId": "f1",
                    "stencil": {"id": "SequenceFlow"},
                    "outgoing": [{"resourceId": "t2"}],
                    "target": {"resourceId": "t2"},
                    "dockers": [{"x": 50, "y": 40}, {"x": 50, "y": 40}]
                },
                {
                    "resourceId": "t2",
                    "stencil": {"id": "Task"},
                    "bounds": {"upperLeft": {"x": 300, "y": 80}, "lowerRight": {"x": 400, "y": 160}}
                }
            ]
        }]
    }"#;

    let graph = parse(source).expect("Failed to parse");

    assert_eq!(graph.family(), &DiagramFamily::Bpmn);
    assert_eq!(graph.registry().len(), 4);
    assert_eq!(graph.pools(), &[Id::new("pool")]);

    let process = graph.process_of_pool(Id::new("pool")).expect("pool process");
    assert_eq!(process.id(), Id::new("Process_pool"));
    assert_eq!(process.members(), &[Id::new("t1"), Id::new("t2")]);

    let t1 = graph.shape(Id::new("t1")).unwrap();
    assert_eq!(t1.name(), Some("Take order"));
    assert_eq!(t1.outgoing(), &[Id::new("f1")]);

    let t2 = graph.shape(Id::new("t2")).unwrap();
    assert_eq!(t2.incoming(), &[Id::new("f1")]);

    let ends = graph.valid_flows().ends(Id::new("f1")).expect("valid flow");
    assert_eq!(ends.kind, FlowKind::Sequence);
    assert_eq!(ends.source, Id::new("t1"));
    assert_eq!(ends.target, Id::new("t2"));
    assert!(graph.flow_belongs_to(Id::new("f1"), process));
}

#[test]
fn test_dangling_flow_is_not_valid() {
    let source = r#"{"childShapes": [
        {"resourceId": "t1", "stencil": {"id": "Task"}, "outgoing": [{"resourceId": "f1"}]},
        {"resourceId": "f1", "stencil": {"id": "SequenceFlow"}, "target": {"resourceId": "ghost"}},
        {"resourceId": "m1", "stencil": {"id": "MessageFlow"}, "target": {"resourceId": "t1"}}
    ]}"#;

    let graph = parse(source).expect("Failed to parse");

    assert!(graph.valid_flows().is_empty());
    assert_eq!(graph.sequence_flows(), &[Id::new("f1")]);
    assert_eq!(graph.message_flows(), &[Id::new("m1")]);
    assert!(graph.synthetic_process().is_some());
}

#[test]
fn test_numeric_identifiers_are_sanitized() {
    let source = r#"{"childShapes": [
        {"resourceId": "123", "stencil": {"id": "Task"}, "outgoing": [{"resourceId": "456"}]},
        {"resourceId": "456", "stencil": {"id": "SequenceFlow"}, "target": {"resourceId": "789"}},
        {"resourceId": "789", "stencil": {"id": "EndNoneEvent"}}
    ]}"#;

    let graph = parse(source).expect("Failed to parse");

    let ends = graph.valid_flows().ends(Id::new("id_456")).expect("valid flow");
    assert_eq!(ends.source, Id::new("id_123"));
    assert_eq!(ends.target, Id::new("id_789"));
    assert_eq!(
        graph.shape(Id::new("id_789")).map(ShapeNode::incoming),
        Some(&[Id::new("id_456")][..])
    );
}

#[test]
fn test_unmapped_stencil_is_kept() {
    let source = r#"{"childShapes": [
        {"resourceId": "x", "stencil": {"id": "ShinyNewThing"}}
    ]}"#;

    let graph = parse(source).expect("Failed to parse");
    let shape = graph.shape(Id::new("x")).unwrap();

    assert_eq!(shape.stencil(), &Stencil::Unmapped("ShinyNewThing".to_string()));
    assert!(shape.stencil().element_kind().is_none());
}

#[test]
fn test_non_bpmn_family() {
    let source = r#"{"stencilset": {"namespace": "http://b3mn.org/stencilset/epc#"}, "childShapes": []}"#;

    let graph = parse(source).expect("Failed to parse");
    assert_eq!(graph.family(), &DiagramFamily::Epc);
    assert!(!graph.family().is_convertible());
}

#[test]
fn test_parse_error_has_location() {
    let source = "{\"childShapes\": [{\"resourceId\": 7}]}";

    let err = parse(source).expect_err("should fail");
    let diagnostic = err.diagnostic();

    assert_eq!(diagnostic.code(), ErrorCode::E100);
    assert_eq!(diagnostic.line(), 1);
    assert!(diagnostic.span().end() <= source.len());
}

// ============================================================================
// Absolute Bounds
// ============================================================================

/// Builds a chain of nested shapes: a pool, lanes, then a task at the bottom.
fn nested_export(corners: &[(i32, i32)]) -> Value {
    let mut shape = json!({
        "resourceId": format!("shape{}", corners.len() - 1),
        "stencil": {"id": "Task"},
        "bounds": bounds_json(corners[corners.len() - 1]),
    });

    for (depth, corner) in corners.iter().enumerate().rev().skip(1) {
        let stencil = if depth == 0 { "Pool" } else { "Lane" };
        shape = json!({
            "resourceId": format!("shape{depth}"),
            "stencil": {"id": stencil},
            "bounds": bounds_json(*corner),
            "childShapes": [shape],
        });
    }

    json!({ "childShapes": [shape] })
}

fn bounds_json((x, y): (i32, i32)) -> Value {
    json!({
        "upperLeft": {"x": x, "y": y},
        "lowerRight": {"x": x + 100, "y": y + 80},
    })
}

fn check_absolute_bounds_accumulate(corners: Vec<(i32, i32)>) -> Result<(), TestCaseError> {
    let source = nested_export(&corners).to_string();
    let graph = parse(&source).map_err(|e| TestCaseError::fail(e.to_string()))?;

    let mut offset = Point::default();
    for (depth, (x, y)) in corners.iter().enumerate() {
        let shape = graph
            .shape(Id::new(&format!("shape{depth}")))
            .ok_or_else(|| TestCaseError::fail("missing shape"))?;
        let local = Point::new(f64::from(*x), f64::from(*y));
        let absolute = shape
            .absolute_bounds()
            .ok_or_else(|| TestCaseError::fail("missing bounds"))?;

        prop_assert_eq!(absolute.min_point(), local.add_point(offset));
        offset = offset.add_point(local);
    }
    Ok(())
}

proptest! {
    #[test]
    fn absolute_bounds_accumulate(
        corners in prop::collection::vec((-2000i32..2000, -2000i32..2000), 1..6)
    ) {
        check_absolute_bounds_accumulate(corners)?;
    }
}
