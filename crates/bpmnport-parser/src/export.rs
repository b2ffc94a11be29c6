//! Raw export document as it appears on disk.
//!
//! These types mirror the JSON tree closely and tolerate missing fields;
//! interpretation happens in the builder.

use serde::Deserialize;
use serde_json::{Map, Value};

use bpmnport_core::{
    geometry::{Bounds, Point},
    graph::Properties,
    stencil::{DiagramFamily, Stencil},
};

use crate::error::Diagnostic;

/// The root object of an export.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub stencilset: Option<StencilSet>,
    #[serde(default)]
    pub child_shapes: Vec<ExportShape>,
}

impl ExportDocument {
    /// Deserializes an export from JSON text.
    ///
    /// Failures are reported as a single diagnostic pointing at the byte
    /// where the JSON reader stopped.
    pub fn from_json(source: &str) -> Result<Self, Diagnostic> {
        serde_json::from_str(source).map_err(|err| Diagnostic::from_json_error(source, &err))
    }

    /// Classifies the document by its stencil-set namespace.
    pub fn family(&self) -> DiagramFamily {
        self.stencilset
            .as_ref()
            .and_then(|set| set.namespace.as_deref())
            .map_or(DiagramFamily::Unknown, DiagramFamily::from_namespace)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StencilSet {
    #[serde(default)]
    pub namespace: Option<String>,
}

/// One shape of the export tree.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportShape {
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub stencil: Option<StencilRef>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(default)]
    pub bounds: Option<ExportBounds>,
    #[serde(default)]
    pub outgoing: Option<Vec<ResourceRef>>,
    #[serde(default)]
    pub target: Option<ResourceRef>,
    #[serde(default)]
    pub dockers: Option<Vec<ExportPoint>>,
    #[serde(default)]
    pub child_shapes: Vec<ExportShape>,
}

impl ExportShape {
    /// Returns the stencil, or `None` when it is missing or blank.
    pub fn stencil(&self) -> Option<&Stencil> {
        self.stencil
            .as_ref()
            .and_then(|stencil| stencil.id.as_ref())
            .filter(|stencil| !stencil.id().is_empty())
    }

    /// Returns the resource identifier, or `None` when it is missing or blank.
    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Renders every non-null property value as a string.
    ///
    /// Strings are taken as they are; numbers and booleans use their JSON
    /// spelling; arrays and objects are kept as JSON text.
    pub fn properties(&self) -> Properties {
        let Some(map) = &self.properties else {
            return Properties::new();
        };

        map.iter()
            .filter_map(|(key, value)| {
                let rendered = match value {
                    Value::Null => return None,
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                Some((key.as_str(), rendered))
            })
            .collect()
    }

    /// Returns the local bounds.
    ///
    /// A missing corner counts as the origin; bounds with neither corner are
    /// treated as absent.
    pub fn bounds(&self) -> Option<Bounds> {
        let bounds = self.bounds.as_ref()?;
        if bounds.upper_left.is_none() && bounds.lower_right.is_none() {
            return None;
        }

        let corner = |point: Option<ExportPoint>| point.map_or_else(Point::default, Point::from);
        Some(Bounds::new(
            corner(bounds.upper_left),
            corner(bounds.lower_right),
        ))
    }

    /// Returns the outgoing references that carry an identifier.
    pub fn outgoing(&self) -> impl Iterator<Item = &str> {
        self.outgoing
            .iter()
            .flatten()
            .filter_map(ResourceRef::resource_id)
    }

    /// Returns the target reference, if it carries an identifier.
    pub fn target(&self) -> Option<&str> {
        self.target.as_ref().and_then(ResourceRef::resource_id)
    }

    pub fn dockers(&self) -> Vec<Point> {
        self.dockers
            .iter()
            .flatten()
            .copied()
            .map(Point::from)
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StencilRef {
    #[serde(default)]
    pub id: Option<Stencil>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRef {
    #[serde(default)]
    pub resource_id: Option<String>,
}

impl ResourceRef {
    fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBounds {
    #[serde(default)]
    pub upper_left: Option<ExportPoint>,
    #[serde(default)]
    pub lower_right: Option<ExportPoint>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ExportPoint {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl From<ExportPoint> for Point {
    fn from(point: ExportPoint) -> Self {
        Point::new(point.x, point.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_minimal_document() {
        let doc = ExportDocument::from_json(r#"{"childShapes": []}"#).unwrap();

        assert!(doc.child_shapes.is_empty());
        assert_eq!(doc.family(), DiagramFamily::Unknown);
    }

    #[test]
    fn test_family_from_stencilset() {
        let doc = ExportDocument::from_json(
            r#"{"stencilset": {"namespace": "http://b3mn.org/stencilset/bpmn2.0#"}}"#,
        )
        .unwrap();

        assert_eq!(doc.family(), DiagramFamily::Bpmn);
    }

    #[test]
    fn test_shape_fields() {
        let doc = ExportDocument::from_json(
            r#"{
                "childShapes": [{
                    "resourceId": "flow1",
                    "stencil": {"id": "SequenceFlow"},
                    "properties": {"name": "yes", "conditionexpression": "x > 1", "priority": 3, "flag": true, "none": null},
                    "outgoing": [{"resourceId": "t2"}, {}],
                    "target": {"resourceId": "t2"},
                    "dockers": [{"x": 50, "y": 40}, {"x": 15.5}],
                    "childShapes": []
                }]
            }"#,
        )
        .unwrap();

        let shape = &doc.child_shapes[0];
        assert_eq!(shape.resource_id(), Some("flow1"));
        assert_eq!(shape.stencil(), Some(&Stencil::SequenceFlow));
        assert_eq!(shape.outgoing().collect::<Vec<_>>(), vec!["t2"]);
        assert_eq!(shape.target(), Some("t2"));
        assert_eq!(
            shape.dockers(),
            vec![Point::new(50.0, 40.0), Point::new(15.5, 0.0)]
        );

        let properties = shape.properties();
        assert_eq!(properties.get("name"), Some("yes"));
        assert_eq!(properties.get("priority"), Some("3"));
        assert_eq!(properties.get("flag"), Some("true"));
        assert_eq!(properties.get("none"), None);
        assert_eq!(properties.len(), 4);
    }

    #[test]
    fn test_blank_stencil_and_id() {
        let doc = ExportDocument::from_json(
            r#"{"childShapes": [{"resourceId": "", "stencil": {"id": ""}}, {"stencil": {}}]}"#,
        )
        .unwrap();

        assert_eq!(doc.child_shapes[0].stencil(), None);
        assert_eq!(doc.child_shapes[0].resource_id(), None);
        assert_eq!(doc.child_shapes[1].stencil(), None);
    }

    #[test]
    fn test_bounds_with_missing_corner() {
        let doc = ExportDocument::from_json(
            r#"{"childShapes": [
                {"bounds": {"lowerRight": {"x": 100, "y": 80}}},
                {"bounds": {}}
            ]}"#,
        )
        .unwrap();

        let bounds = doc.child_shapes[0].bounds().unwrap();
        assert_eq!(bounds.min_point(), Point::new(0.0, 0.0));
        assert_eq!(bounds.max_point(), Point::new(100.0, 80.0));
        assert!(doc.child_shapes[1].bounds().is_none());
    }

    #[test]
    fn test_syntax_error_diagnostic() {
        let source = "{\n  \"childShapes\": [,]\n}";
        let diag = ExportDocument::from_json(source).unwrap_err();

        assert_eq!(diag.code(), ErrorCode::E001);
        let span = diag.span();
        assert_eq!(&source[span.start()..span.end()], ",");
    }

    #[test]
    fn test_eof_diagnostic() {
        let diag = ExportDocument::from_json("{\"childShapes\": [").unwrap_err();

        assert_eq!(diag.code(), ErrorCode::E002);
        assert_eq!(diag.line(), 1);
    }

    #[test]
    fn test_type_mismatch_diagnostic() {
        let diag = ExportDocument::from_json(r#"{"childShapes": {"a": 1}}"#).unwrap_err();

        assert_eq!(diag.code(), ErrorCode::E100);
    }
}
