//! The shape graph: every shape of one export, flattened and classified.
//!
//! A [`ShapeGraph`] owns its shapes through a [`Registry`]; processes, lanes
//! and flow lists refer to them by [`Id`] only. The graph is built once by the
//! parser and then read by the emitters.

use std::{collections::HashMap, fmt};

use indexmap::IndexMap;

use crate::{
    geometry::{Bounds, Point},
    identifier::Id,
    stencil::{DiagramFamily, Stencil},
};

/// Free-form shape properties, with every value rendered as a string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(IndexMap<String, String>);

impl Properties {
    /// Creates an empty property map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns a property value, treating empty strings as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Returns the number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no properties.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One element of the exported diagram.
///
/// Local and absolute bounds are set together by [`ShapeNode::with_bounds`],
/// so the absolute rectangle is always the local one translated by the
/// accumulated offset of the shape's containers.
#[derive(Debug, Clone)]
pub struct ShapeNode {
    id: Id,
    stencil: Stencil,
    name: Option<String>,
    properties: Properties,
    bounds: Option<Bounds>,
    absolute_bounds: Option<Bounds>,
    outgoing: Vec<Id>,
    incoming: Vec<Id>,
    target: Option<Id>,
    dockers: Vec<Point>,
    parent: Option<Id>,
    process: Option<Id>,
}

impl ShapeNode {
    /// Creates a shape with no geometry, connections or containers.
    pub fn new(id: Id, stencil: Stencil) -> Self {
        Self {
            id,
            stencil,
            name: None,
            properties: Properties::new(),
            bounds: None,
            absolute_bounds: None,
            outgoing: Vec::new(),
            incoming: Vec::new(),
            target: None,
            dockers: Vec::new(),
            parent: None,
            process: None,
        }
    }

    /// Sets the display name, collapsing whitespace runs to single spaces.
    ///
    /// Names that are empty after normalization are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bpmnport_core::{graph::ShapeNode, identifier::Id, stencil::Stencil};
    /// let task = ShapeNode::new(Id::new("t1"), Stencil::Task).with_name("  Check\n order ");
    /// assert_eq!(task.name(), Some("Check order"));
    /// ```
    pub fn with_name(mut self, name: &str) -> Self {
        let normalized = name.split_whitespace().collect::<Vec<_>>().join(" ");
        self.name = (!normalized.is_empty()).then_some(normalized);
        self
    }

    /// Sets the property map.
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Sets the local bounds and derives the absolute bounds from the
    /// accumulated container `offset`.
    pub fn with_bounds(mut self, local: Bounds, offset: Point) -> Self {
        self.bounds = Some(local);
        self.absolute_bounds = Some(local.translate(offset));
        self
    }

    /// Sets the outgoing references.
    pub fn with_outgoing(mut self, outgoing: Vec<Id>) -> Self {
        self.outgoing = outgoing;
        self
    }

    /// Sets the target reference of a flow.
    pub fn with_target(mut self, target: Option<Id>) -> Self {
        self.target = target;
        self
    }

    /// Sets the docker points of a flow.
    pub fn with_dockers(mut self, dockers: Vec<Point>) -> Self {
        self.dockers = dockers;
        self
    }

    /// Sets the containing shape.
    pub fn with_parent(mut self, parent: Option<Id>) -> Self {
        self.parent = parent;
        self
    }

    /// Sets the owning process.
    pub fn with_process(mut self, process: Option<Id>) -> Self {
        self.process = process;
        self
    }

    /// Assigns the owning process.
    pub fn set_process(&mut self, process: Id) {
        self.process = Some(process);
    }

    /// Appends an incoming reference.
    pub fn push_incoming(&mut self, source: Id) {
        self.incoming.push(source);
    }

    /// Returns the source resource identifier.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Returns the stencil kind.
    pub fn stencil(&self) -> &Stencil {
        &self.stencil
    }

    /// Returns the normalized display name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the free-form properties.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Returns the bounds in the coordinate space of the parent shape.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Returns the bounds in canvas coordinates.
    pub fn absolute_bounds(&self) -> Option<Bounds> {
        self.absolute_bounds
    }

    /// Returns the outgoing references in export order.
    pub fn outgoing(&self) -> &[Id] {
        &self.outgoing
    }

    /// Returns the shapes whose outgoing list cites this one.
    pub fn incoming(&self) -> &[Id] {
        &self.incoming
    }

    /// Returns the target reference of a flow.
    pub fn target(&self) -> Option<Id> {
        self.target
    }

    /// Returns the docker points of a flow.
    pub fn dockers(&self) -> &[Point] {
        &self.dockers
    }

    /// Returns the directly containing shape.
    pub fn parent(&self) -> Option<Id> {
        self.parent
    }

    /// Returns the owning process, if assigned.
    pub fn process(&self) -> Option<Id> {
        self.process
    }
}

/// All shapes of a diagram, keyed by identifier, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    shapes: IndexMap<Id, ShapeNode>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a shape.
    ///
    /// Returns `false` and leaves the registry unchanged if a shape with the
    /// same identifier is already present.
    pub fn insert(&mut self, shape: ShapeNode) -> bool {
        if self.shapes.contains_key(&shape.id) {
            return false;
        }
        self.shapes.insert(shape.id, shape);
        true
    }

    /// Returns the shape with identifier `id`.
    pub fn get(&self, id: Id) -> Option<&ShapeNode> {
        self.shapes.get(&id)
    }

    /// Returns the shape with identifier `id` for update.
    pub fn get_mut(&mut self, id: Id) -> Option<&mut ShapeNode> {
        self.shapes.get_mut(&id)
    }

    /// Returns `true` if a shape with identifier `id` exists.
    pub fn contains(&self, id: Id) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Iterates over shapes in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &ShapeNode> {
        self.shapes.values()
    }

    /// Returns the number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if the registry holds no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// A process and the shapes that belong to it.
#[derive(Debug, Clone)]
pub struct ProcessContainer {
    id: Id,
    pool: Option<Id>,
    members: Vec<Id>,
}

impl ProcessContainer {
    /// Creates the process of a pool.
    pub fn for_pool(id: Id, pool: Id) -> Self {
        Self {
            id,
            pool: Some(pool),
            members: Vec::new(),
        }
    }

    /// Creates the process used when a diagram has no pools.
    pub fn synthetic(id: Id, members: Vec<Id>) -> Self {
        Self {
            id,
            pool: None,
            members,
        }
    }

    /// Returns the process identifier.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Returns the pool that declares this process, `None` for the
    /// synthetic process.
    pub fn pool(&self) -> Option<Id> {
        self.pool
    }

    /// Returns `true` for the process used when a diagram has no pools.
    pub fn is_synthetic(&self) -> bool {
        self.pool.is_none()
    }

    /// Returns the member shapes in discovery order.
    pub fn members(&self) -> &[Id] {
        &self.members
    }

    /// Appends a member shape.
    pub fn push_member(&mut self, member: Id) {
        self.members.push(member);
    }
}

/// A lane and the flow nodes placed in it.
#[derive(Debug, Clone)]
pub struct LaneContainer {
    id: Id,
    parent: Option<Id>,
    process: Option<Id>,
    flow_node_refs: Vec<Id>,
}

impl LaneContainer {
    /// Creates a lane with no flow nodes.
    pub fn new(id: Id, parent: Option<Id>, process: Option<Id>) -> Self {
        Self {
            id,
            parent,
            process,
            flow_node_refs: Vec::new(),
        }
    }

    /// Returns the lane identifier.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Returns the pool or lane directly containing this lane.
    pub fn parent(&self) -> Option<Id> {
        self.parent
    }

    /// Returns the process the lane partitions.
    pub fn process(&self) -> Option<Id> {
        self.process
    }

    /// Returns the flow nodes assigned to this lane in discovery order.
    pub fn flow_node_refs(&self) -> &[Id] {
        &self.flow_node_refs
    }

    /// Assigns a flow node to this lane.
    pub fn push_flow_node_ref(&mut self, node: Id) {
        self.flow_node_refs.push(node);
    }
}

/// Containers and classified shape lists produced while building a graph.
#[derive(Debug, Clone, Default)]
pub struct Containers {
    pub processes: IndexMap<Id, ProcessContainer>,
    pub pools: Vec<Id>,
    pub lanes: IndexMap<Id, LaneContainer>,
    pub sequence_flows: Vec<Id>,
    pub message_flows: Vec<Id>,
    pub associations: Vec<Id>,
    pub messages: Vec<Id>,
}

/// The kind of a connecting shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowKind {
    Sequence,
    Message,
    Association,
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequence => write!(f, "sequence flow"),
            Self::Message => write!(f, "message flow"),
            Self::Association => write!(f, "association"),
        }
    }
}

/// The resolved endpoints of a valid flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowEnds {
    pub kind: FlowKind,
    pub source: Id,
    pub target: Id,
}

/// Flows whose source and target both exist in the registry.
///
/// Built once from an iterator and never modified, so the semantic and
/// visual layers agree on which flows exist.
#[derive(Debug, Clone, Default)]
pub struct ValidFlowSet {
    flows: HashMap<Id, FlowEnds>,
}

impl ValidFlowSet {
    /// Returns `true` if `flow` has both ends in the registry.
    pub fn contains(&self, flow: Id) -> bool {
        self.flows.contains_key(&flow)
    }

    /// Returns the endpoints of a valid flow.
    pub fn ends(&self, flow: Id) -> Option<FlowEnds> {
        self.flows.get(&flow).copied()
    }

    /// Returns `true` if `flow` is a valid sequence flow.
    pub fn is_sequence_flow(&self, flow: Id) -> bool {
        self.flows
            .get(&flow)
            .is_some_and(|ends| ends.kind == FlowKind::Sequence)
    }

    /// Returns the number of valid flows.
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    /// Returns `true` if no flow is valid.
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

impl FromIterator<(Id, FlowEnds)> for ValidFlowSet {
    fn from_iter<T: IntoIterator<Item = (Id, FlowEnds)>>(iter: T) -> Self {
        Self {
            flows: iter.into_iter().collect(),
        }
    }
}

/// A fully built and validated diagram.
#[derive(Debug, Clone)]
pub struct ShapeGraph {
    family: DiagramFamily,
    registry: Registry,
    containers: Containers,
    valid_flows: ValidFlowSet,
}

impl ShapeGraph {
    /// Assembles a graph from the parts produced by the builder.
    pub fn new(
        family: DiagramFamily,
        registry: Registry,
        containers: Containers,
        valid_flows: ValidFlowSet,
    ) -> Self {
        Self {
            family,
            registry,
            containers,
            valid_flows,
        }
    }

    /// Returns the diagram family declared by the export.
    pub fn family(&self) -> &DiagramFamily {
        &self.family
    }

    /// Returns every shape in discovery order.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the shape with identifier `id`.
    pub fn shape(&self, id: Id) -> Option<&ShapeNode> {
        self.registry.get(id)
    }

    /// Returns the flows whose both ends exist.
    pub fn valid_flows(&self) -> &ValidFlowSet {
        &self.valid_flows
    }

    /// Returns `true` if the diagram has at least one pool.
    pub fn has_pools(&self) -> bool {
        !self.containers.pools.is_empty()
    }

    /// Returns pool identifiers in discovery order.
    pub fn pools(&self) -> &[Id] {
        &self.containers.pools
    }

    /// Iterates over processes in discovery order.
    pub fn processes(&self) -> impl Iterator<Item = &ProcessContainer> {
        self.containers.processes.values()
    }

    /// Returns the process with identifier `id`.
    pub fn process(&self, id: Id) -> Option<&ProcessContainer> {
        self.containers.processes.get(&id)
    }

    /// Returns the process opened by `pool`.
    pub fn process_of_pool(&self, pool: Id) -> Option<&ProcessContainer> {
        self.processes().find(|process| process.pool() == Some(pool))
    }

    /// Returns the process used when the diagram has no pools.
    pub fn synthetic_process(&self) -> Option<&ProcessContainer> {
        self.processes().find(|process| process.is_synthetic())
    }

    /// Returns the lane with identifier `id`.
    pub fn lane(&self, id: Id) -> Option<&LaneContainer> {
        self.containers.lanes.get(&id)
    }

    /// Iterates over the lanes directly inside `parent`, in discovery order.
    ///
    /// `None` selects lanes placed at the top level of the diagram.
    pub fn lanes_in(&self, parent: Option<Id>) -> impl Iterator<Item = &LaneContainer> {
        self.containers
            .lanes
            .values()
            .filter(move |lane| lane.parent() == parent)
    }

    /// Returns sequence flow identifiers in discovery order.
    pub fn sequence_flows(&self) -> &[Id] {
        &self.containers.sequence_flows
    }

    /// Returns message flow identifiers in discovery order.
    pub fn message_flows(&self) -> &[Id] {
        &self.containers.message_flows
    }

    /// Returns association identifiers in discovery order.
    pub fn associations(&self) -> &[Id] {
        &self.containers.associations
    }

    /// Returns message identifiers in discovery order.
    pub fn messages(&self) -> &[Id] {
        &self.containers.messages
    }

    /// Checks whether a flow is written inside `process`.
    ///
    /// A flow belongs to the process it was assigned to or to the process of
    /// its source shape. Every flow belongs to the synthetic process.
    pub fn flow_belongs_to(&self, flow: Id, process: &ProcessContainer) -> bool {
        if process.is_synthetic() {
            return true;
        }

        let assigned = self.shape(flow).and_then(ShapeNode::process);
        if assigned == Some(process.id()) {
            return true;
        }

        self.valid_flows
            .ends(flow)
            .and_then(|ends| self.shape(ends.source))
            .and_then(ShapeNode::process)
            == Some(process.id())
    }
}
