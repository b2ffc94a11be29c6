//! Diagram-interchange half of the document.
//!
//! Shapes are drawn in discovery order, followed by the edges of sequence
//! flows, message flows and associations. Only identifiers recorded in
//! [`Written`] are drawn.

use log::debug;
use quick_xml::Writer;

use bpmnport_core::{
    geometry::{Bounds, Point, Size},
    graph::{ShapeGraph, ShapeNode},
    identifier::Id,
    stencil::Stencil,
};

use super::{
    Written,
    xml::{Result, XmlWriter, write_empty_tag, write_tag_end, write_tag_start_with_opt_attrs},
};
use crate::{config::DiagramConfig, waypoints};

const DIAGRAM_ID: &str = "BPMNDiagram_1";
const PLANE_ID: &str = "BPMNPlane_1";
const COLLABORATION_ID: &str = "Collaboration_1";

/// Drawn for shapes that carry no bounds.
const PLACEHOLDER_SIZE: Size = Size::new(100.0, 80.0);

/// Writes `BPMNDiagram` with one plane for the whole document.
pub struct DiagramEmitter<'a> {
    graph: &'a ShapeGraph,
    config: &'a DiagramConfig,
    written: &'a Written,
}

impl<'a> DiagramEmitter<'a> {
    pub fn new(graph: &'a ShapeGraph, config: &'a DiagramConfig, written: &'a Written) -> Self {
        Self {
            graph,
            config,
            written,
        }
    }

    pub fn write(&self, writer: &mut Writer<XmlWriter>) -> Result<()> {
        let plane_element = self.plane_element();

        write_tag_start_with_opt_attrs(writer, "bpmndi:BPMNDiagram", &[("id", Some(DIAGRAM_ID))])?;
        write_tag_start_with_opt_attrs(
            writer,
            "bpmndi:BPMNPlane",
            &[
                ("id", Some(PLANE_ID)),
                ("bpmnElement", plane_element.as_deref()),
            ],
        )?;

        let shapes = self.write_shapes(writer)?;
        let edges = self.write_edges(writer)?;

        write_tag_end(writer, "bpmndi:BPMNPlane")?;
        write_tag_end(writer, "bpmndi:BPMNDiagram")?;

        debug!(shapes, edges; "Diagram written");
        Ok(())
    }

    /// The collaboration when pools exist, otherwise the default process.
    fn plane_element(&self) -> Option<String> {
        if self.graph.has_pools() {
            Some(COLLABORATION_ID.to_string())
        } else {
            self.graph
                .synthetic_process()
                .map(|process| process.id().to_string())
        }
    }

    // ============================================================================
    // Shapes
    // ============================================================================

    fn write_shapes(&self, writer: &mut Writer<XmlWriter>) -> Result<usize> {
        let mut count = 0;
        for shape in self.graph.registry().iter() {
            if !self.is_drawn_shape(shape) {
                continue;
            }
            self.write_shape(writer, shape)?;
            count += 1;
        }
        Ok(count)
    }

    fn is_drawn_shape(&self, shape: &ShapeNode) -> bool {
        !shape.stencil().is_connection()
            && *shape.stencil() != Stencil::BpmnDiagram
            && self.written.contains_shape(shape.id())
    }

    fn write_shape(&self, writer: &mut Writer<XmlWriter>, shape: &ShapeNode) -> Result<()> {
        let element = shape.id().to_string();
        let di_id = di_id(shape.id());
        let horizontal = shape
            .stencil()
            .is_horizontal()
            .map(|horizontal| if horizontal { "true" } else { "false" });

        write_tag_start_with_opt_attrs(
            writer,
            "bpmndi:BPMNShape",
            &[
                ("id", Some(di_id.as_str())),
                ("bpmnElement", Some(element.as_str())),
                ("isHorizontal", horizontal),
            ],
        )?;

        let bounds = visual_bounds(shape.absolute_bounds());
        let x = truncate(bounds.min_x());
        let y = truncate(bounds.min_y());
        let width = truncate(bounds.width()).max(1).to_string();
        let height = truncate(bounds.height()).max(1).to_string();
        let (x, y) = (x.to_string(), y.to_string());
        write_empty_tag(
            writer,
            "dc:Bounds",
            &[
                ("x", Some(x.as_str())),
                ("y", Some(y.as_str())),
                ("width", Some(width.as_str())),
                ("height", Some(height.as_str())),
            ],
        )?;

        write_tag_end(writer, "bpmndi:BPMNShape")
    }

    // ============================================================================
    // Edges
    // ============================================================================

    fn write_edges(&self, writer: &mut Writer<XmlWriter>) -> Result<usize> {
        let flows = self
            .graph
            .sequence_flows()
            .iter()
            .chain(self.graph.message_flows())
            .chain(self.graph.associations());

        let mut count = 0;
        for flow in flows {
            if !self.written.contains_flow(*flow) {
                continue;
            }
            let Some(ends) = self.graph.valid_flows().ends(*flow) else {
                continue;
            };

            let points = waypoints::flow_waypoints(self.graph, *flow, ends, self.config);
            self.write_edge(writer, *flow, &points)?;
            count += 1;
        }
        Ok(count)
    }

    fn write_edge(&self, writer: &mut Writer<XmlWriter>, flow: Id, points: &[Point]) -> Result<()> {
        let element = flow.to_string();
        let di_id = di_id(flow);

        write_tag_start_with_opt_attrs(
            writer,
            "bpmndi:BPMNEdge",
            &[
                ("id", Some(di_id.as_str())),
                ("bpmnElement", Some(element.as_str())),
            ],
        )?;

        for point in points {
            let x = truncate(point.x()).to_string();
            let y = truncate(point.y()).to_string();
            write_empty_tag(
                writer,
                "di:waypoint",
                &[("x", Some(x.as_str())), ("y", Some(y.as_str()))],
            )?;
        }

        write_tag_end(writer, "bpmndi:BPMNEdge")
    }
}

fn di_id(element: Id) -> String {
    format!("{element}_di")
}

/// Absolute bounds, or a placeholder box at the origin.
fn visual_bounds(bounds: Option<Bounds>) -> Bounds {
    bounds.unwrap_or_else(|| Bounds::new_from_top_left(Point::default(), PLACEHOLDER_SIZE))
}

/// Coordinates are written as integers truncated toward zero.
fn truncate(value: f64) -> i64 {
    value as i64
}
