//! Semantic half of the document: messages, collaboration and processes.
//!
//! Elements inside a process follow the order the BPMN schema validates:
//! lane set, flow nodes, sequence flows, artifacts, associations.

use std::collections::HashMap;

use log::{debug, trace};
use quick_xml::Writer;

use bpmnport_core::{
    graph::{FlowKind, LaneContainer, ProcessContainer, ShapeGraph, ShapeNode},
    identifier::Id,
    stencil::{AssociationDirection, ElementKind, EventDefinitionKind},
};

use super::{
    Written,
    xml::{
        Result, XmlWriter, write_empty_tag, write_tag, write_tag_end, write_tag_start_with_opt_attrs,
        write_tag_with_attrs,
    },
};

const COLLABORATION_ID: &str = "Collaboration_1";
const FORMAL_EXPRESSION: &str = "tFormalExpression";
const CONDITION_PROPERTY: &str = "conditionexpression";

/// Writes the semantic elements of a shape graph.
pub struct DocumentEmitter<'a> {
    graph: &'a ShapeGraph,
    /// The process each sequence flow and association is written into.
    owners: HashMap<Id, Id>,
    written: Written,
}

impl<'a> DocumentEmitter<'a> {
    pub fn new(graph: &'a ShapeGraph) -> Self {
        Self {
            graph,
            owners: plan_flow_owners(graph),
            written: Written::default(),
        }
    }

    /// Writes messages, the collaboration and every process, returning the
    /// identifiers that made it into the document.
    pub fn write(mut self, writer: &mut Writer<XmlWriter>) -> Result<Written> {
        self.write_messages(writer)?;

        if self.graph.has_pools() {
            self.write_collaboration(writer)?;
        }

        for process in emitted_processes(self.graph) {
            self.write_process(writer, process)?;
        }

        Ok(self.written)
    }

    fn write_messages(&self, writer: &mut Writer<XmlWriter>) -> Result<()> {
        for message in self.graph.messages() {
            let Some(shape) = self.graph.shape(*message) else {
                continue;
            };
            let id = shape.id().to_string();
            write_empty_tag(
                writer,
                ElementKind::Message.tag(),
                &[("id", Some(id.as_str())), ("name", shape.name())],
            )?;
        }
        Ok(())
    }

    // ============================================================================
    // Collaboration
    // ============================================================================

    fn write_collaboration(&mut self, writer: &mut Writer<XmlWriter>) -> Result<()> {
        write_tag_start_with_opt_attrs(writer, "collaboration", &[("id", Some(COLLABORATION_ID))])?;

        for pool in self.graph.pools() {
            let Some(shape) = self.graph.shape(*pool) else {
                continue;
            };
            let id = shape.id().to_string();
            // Collapsed pools are external participants without a local process.
            let process_ref = shape
                .process()
                .filter(|_| !shape.stencil().is_collapsed_pool())
                .map(|process| process.to_string());

            write_empty_tag(
                writer,
                ElementKind::Participant.tag(),
                &[
                    ("id", Some(id.as_str())),
                    ("name", shape.name()),
                    ("processRef", process_ref.as_deref()),
                ],
            )?;
            self.written.insert_shape(shape.id());
        }

        for flow in self.graph.message_flows() {
            self.write_flow(writer, *flow)?;
        }

        write_tag_end(writer, "collaboration")
    }

    // ============================================================================
    // Processes
    // ============================================================================

    fn write_process(
        &mut self,
        writer: &mut Writer<XmlWriter>,
        process: &ProcessContainer,
    ) -> Result<()> {
        let process_id = process.id().to_string();
        write_tag_start_with_opt_attrs(
            writer,
            "process",
            &[("id", Some(process_id.as_str())), ("isExecutable", Some("false"))],
        )?;

        // 1. Lane set
        let lanes: Vec<&LaneContainer> = self.graph.lanes_in(process.pool()).collect();
        if !lanes.is_empty() {
            let owner = process.pool().unwrap_or(process.id());
            self.write_lane_set(writer, "laneSet", owner, &lanes)?;
        }

        // 2. Flow nodes
        let members: Vec<&ShapeNode> = process
            .members()
            .iter()
            .filter_map(|member| self.graph.shape(*member))
            .collect();

        for shape in &members {
            if shape
                .stencil()
                .element_kind()
                .is_some_and(ElementKind::is_flow_element)
            {
                self.write_flow_node(writer, shape)?;
            }
        }

        // 3. Sequence flows
        let mut flows_written = 0;
        for flow in self.graph.sequence_flows() {
            if self.owners.get(flow) == Some(&process.id()) {
                self.write_flow(writer, *flow)?;
                flows_written += 1;
            }
        }
        debug!(process_id:% = process.id(), flows_written; "Process sequence flows written");

        // 4. Artifacts: text annotations, then groups
        for kind in [ElementKind::TextAnnotation, ElementKind::Group] {
            for shape in &members {
                if shape.stencil().element_kind() == Some(kind) {
                    self.write_artifact(writer, shape, kind)?;
                }
            }
        }

        // 5. Associations
        for flow in self.graph.associations() {
            if self.owners.get(flow) == Some(&process.id()) {
                self.write_flow(writer, *flow)?;
            }
        }

        write_tag_end(writer, "process")
    }

    fn write_lane_set(
        &mut self,
        writer: &mut Writer<XmlWriter>,
        tag: &str,
        owner: Id,
        lanes: &[&LaneContainer],
    ) -> Result<()> {
        let id = format!("LaneSet_{owner}");
        write_tag_start_with_opt_attrs(writer, tag, &[("id", Some(id.as_str()))])?;
        for lane in lanes {
            self.write_lane(writer, lane)?;
        }
        write_tag_end(writer, tag)
    }

    fn write_lane(&mut self, writer: &mut Writer<XmlWriter>, lane: &LaneContainer) -> Result<()> {
        let id = lane.id().to_string();
        let name = self.graph.shape(lane.id()).and_then(ShapeNode::name);
        let attrs = [("id", Some(id.as_str())), ("name", name)];
        let children: Vec<&LaneContainer> = self.graph.lanes_in(Some(lane.id())).collect();

        self.written.insert_shape(lane.id());

        if lane.flow_node_refs().is_empty() && children.is_empty() {
            return write_empty_tag(writer, ElementKind::Lane.tag(), &attrs);
        }

        write_tag_start_with_opt_attrs(writer, ElementKind::Lane.tag(), &attrs)?;
        for node in lane.flow_node_refs() {
            write_tag(writer, "flowNodeRef", &node.to_string())?;
        }
        if !children.is_empty() {
            self.write_lane_set(writer, "childLaneSet", lane.id(), &children)?;
        }
        write_tag_end(writer, ElementKind::Lane.tag())
    }

    // ============================================================================
    // Flow Nodes and Artifacts
    // ============================================================================

    fn write_flow_node(&mut self, writer: &mut Writer<XmlWriter>, shape: &ShapeNode) -> Result<()> {
        let Some(kind) = shape.stencil().element_kind() else {
            return Ok(());
        };
        self.written.insert_shape(shape.id());

        let id = shape.id().to_string();
        let parallel = shape.stencil().is_parallel_multiple().then_some("true");
        let attrs = [
            ("id", Some(id.as_str())),
            ("name", shape.name()),
            ("parallelMultiple", parallel),
        ];

        let incoming: Vec<Id> = shape
            .incoming()
            .iter()
            .copied()
            .filter(|flow| self.is_cited(*flow))
            .collect();
        let outgoing: Vec<Id> = shape
            .outgoing()
            .iter()
            .copied()
            .filter(|flow| self.is_cited(*flow))
            .collect();
        let definition = shape.stencil().event_definition();

        let has_children = !incoming.is_empty() || !outgoing.is_empty() || definition.is_some();
        if !has_children || kind.is_data_reference() {
            return write_empty_tag(writer, kind.tag(), &attrs);
        }

        trace!(shape_id:% = shape.id(), kind:%; "Writing flow node");
        write_tag_start_with_opt_attrs(writer, kind.tag(), &attrs)?;
        for flow in incoming {
            write_tag(writer, "incoming", &flow.to_string())?;
        }
        for flow in outgoing {
            write_tag(writer, "outgoing", &flow.to_string())?;
        }
        if let Some(definition) = definition {
            write_event_definition(writer, shape, definition)?;
        }
        write_tag_end(writer, kind.tag())
    }

    fn write_artifact(
        &mut self,
        writer: &mut Writer<XmlWriter>,
        shape: &ShapeNode,
        kind: ElementKind,
    ) -> Result<()> {
        let id = shape.id().to_string();
        let attrs = [("id", Some(id.as_str()))];

        if kind == ElementKind::TextAnnotation {
            let text = shape
                .name()
                .or_else(|| shape.properties().get("text"))
                .unwrap_or_default();
            write_tag_start_with_opt_attrs(writer, kind.tag(), &attrs)?;
            write_tag(writer, "text", text)?;
            write_tag_end(writer, kind.tag())?;
        } else {
            write_empty_tag(writer, kind.tag(), &attrs)?;
        }

        self.written.insert_shape(shape.id());
        Ok(())
    }

    // ============================================================================
    // Connecting Objects
    // ============================================================================

    /// Writes a valid sequence flow, message flow or association.
    fn write_flow(&mut self, writer: &mut Writer<XmlWriter>, flow: Id) -> Result<()> {
        let (Some(ends), Some(shape)) = (self.graph.valid_flows().ends(flow), self.graph.shape(flow))
        else {
            return Ok(());
        };

        let id = flow.to_string();
        let source = ends.source.to_string();
        let target = ends.target.to_string();
        let mut attrs = vec![
            ("id", Some(id.as_str())),
            ("sourceRef", Some(source.as_str())),
            ("targetRef", Some(target.as_str())),
        ];

        match ends.kind {
            FlowKind::Sequence => {
                attrs.push(("name", shape.name()));
                match shape.properties().get(CONDITION_PROPERTY) {
                    Some(condition) => {
                        write_tag_start_with_opt_attrs(writer, ElementKind::SequenceFlow.tag(), &attrs)?;
                        write_tag_with_attrs(
                            writer,
                            "conditionExpression",
                            condition,
                            &[("xsi:type", FORMAL_EXPRESSION)],
                        )?;
                        write_tag_end(writer, ElementKind::SequenceFlow.tag())?;
                    }
                    None => write_empty_tag(writer, ElementKind::SequenceFlow.tag(), &attrs)?,
                }
            }
            FlowKind::Message => {
                attrs.push(("name", shape.name()));
                write_empty_tag(writer, ElementKind::MessageFlow.tag(), &attrs)?;
            }
            FlowKind::Association => {
                let direction = shape
                    .stencil()
                    .association_direction()
                    .unwrap_or(AssociationDirection::None)
                    .as_str();
                attrs.push(("associationDirection", Some(direction)));
                write_empty_tag(writer, ElementKind::Association.tag(), &attrs)?;
            }
        }

        self.written.insert_flow(flow);
        Ok(())
    }

    /// Flow references inside a flow node may only cite sequence flows that
    /// are written somewhere in the document.
    fn is_cited(&self, flow: Id) -> bool {
        self.graph.valid_flows().is_sequence_flow(flow) && self.owners.contains_key(&flow)
    }
}

fn write_event_definition(
    writer: &mut Writer<XmlWriter>,
    shape: &ShapeNode,
    definition: EventDefinitionKind,
) -> Result<()> {
    let id = shape.id().with_suffix("_def").to_string();

    match definition {
        EventDefinitionKind::Conditional => {
            let condition = shape
                .properties()
                .get(CONDITION_PROPERTY)
                .unwrap_or_default();
            write_tag_start_with_opt_attrs(writer, definition.tag(), &[("id", Some(id.as_str()))])?;
            write_tag_with_attrs(
                writer,
                "condition",
                condition,
                &[("xsi:type", FORMAL_EXPRESSION)],
            )?;
            write_tag_end(writer, definition.tag())
        }
        EventDefinitionKind::Link => {
            let fallback = shape.id().to_string();
            let name = shape
                .name()
                .or_else(|| shape.properties().get("linkname"))
                .unwrap_or(fallback.as_str());
            write_empty_tag(
                writer,
                definition.tag(),
                &[("id", Some(id.as_str())), ("name", Some(name))],
            )
        }
        _ => write_empty_tag(writer, definition.tag(), &[("id", Some(id.as_str()))]),
    }
}

/// Processes written into the document: one per expanded pool, or the
/// default process of a diagram without pools.
pub(super) fn emitted_processes(graph: &ShapeGraph) -> impl Iterator<Item = &ProcessContainer> {
    graph.processes().filter(|process| match process.pool() {
        Some(pool) => graph
            .shape(pool)
            .is_some_and(|shape| !shape.stencil().is_collapsed_pool()),
        None => true,
    })
}

/// Decides, before anything is written, which process each valid sequence
/// flow and association goes into.
///
/// Processes claim flows in document order, so a flow that belongs to more
/// than one process is written only into the first.
fn plan_flow_owners(graph: &ShapeGraph) -> HashMap<Id, Id> {
    let mut owners = HashMap::new();
    let candidates: Vec<Id> = graph
        .sequence_flows()
        .iter()
        .chain(graph.associations())
        .copied()
        .filter(|flow| graph.valid_flows().contains(*flow))
        .collect();

    for process in emitted_processes(graph) {
        for flow in &candidates {
            if !owners.contains_key(flow) && graph.flow_belongs_to(*flow, process) {
                owners.insert(*flow, process.id());
            }
        }
    }

    let unowned = candidates.len() - owners.len();
    if unowned > 0 {
        debug!(unowned; "Valid flows outside every written process");
    }
    owners
}
