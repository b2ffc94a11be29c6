//! Shape graph construction.
//!
//! The export tree is walked depth-first with an explicit work stack. Each
//! frame carries the containing shape, the enclosing process and the sum of
//! all ancestor upper-left corners, so absolute bounds are fixed the moment a
//! shape is created.

use log::{debug, trace, warn};

use bpmnport_core::{
    geometry::Point,
    graph::{Containers, LaneContainer, ProcessContainer, Registry, ShapeNode},
    identifier::Id,
    stencil::{DiagramFamily, StencilRole},
};

use crate::export::{ExportDocument, ExportShape};

/// Property naming the process a pool declares.
const PROCESS_ID_PROPERTY: &str = "processid";

/// Result of walking the export tree, before connectivity is resolved.
#[derive(Debug)]
pub struct BuiltGraph {
    pub family: DiagramFamily,
    pub registry: Registry,
    pub containers: Containers,
}

/// A pending visit of one export shape.
struct Frame<'a> {
    shape: &'a ExportShape,
    parent: Option<Id>,
    process: Option<Id>,
    offset: Point,
}

/// A shape outside every pool that names a process through its properties.
struct DeferredAssignment {
    shape: Id,
    process: Id,
    member: bool,
}

/// Builds the shape registry and containers from an export document.
#[derive(Default)]
pub struct GraphBuilder {
    registry: Registry,
    containers: Containers,
    deferred: Vec<DeferredAssignment>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ============================================================================
    // Main Entry Methods
    // ============================================================================

    pub fn build(mut self, document: &ExportDocument) -> BuiltGraph {
        let family = document.family();
        debug!(family:%; "Building shape graph");

        let mut stack: Vec<Frame<'_>> = Vec::new();
        push_children(&mut stack, &document.child_shapes, None, None, Point::default());

        while let Some(frame) = stack.pop() {
            self.visit(frame, &mut stack);
        }

        self.resolve_deferred_assignments();

        if self.containers.pools.is_empty() {
            self.open_synthetic_process();
        }

        debug!(
            shapes = self.registry.len(),
            pools = self.containers.pools.len(),
            processes = self.containers.processes.len(),
            lanes = self.containers.lanes.len(),
            sequence_flows = self.containers.sequence_flows.len(),
            message_flows = self.containers.message_flows.len(),
            associations = self.containers.associations.len();
            "Shape graph built",
        );

        BuiltGraph {
            family,
            registry: self.registry,
            containers: self.containers,
        }
    }

    // ============================================================================
    // Traversal
    // ============================================================================

    fn visit<'a>(&mut self, frame: Frame<'a>, stack: &mut Vec<Frame<'a>>) {
        let Some(node) = create_shape(&frame) else {
            trace!("Dropping shape without stencil or resource id");
            return;
        };

        let id = node.id();
        let role = node.stencil().role();
        let registers_in_lane = node
            .stencil()
            .element_kind()
            .is_some_and(|kind| kind.is_flow_element());
        let child_offset = node
            .bounds()
            .map_or(frame.offset, |bounds| frame.offset.add_point(bounds.min_point()));
        let requested_process = node.properties().get(PROCESS_ID_PROPERTY).map(Id::sanitized);

        if !self.registry.insert(node) {
            warn!(shape_id:% = id; "Duplicate resource id, keeping the first shape");
            return;
        }

        match role {
            StencilRole::Pool { collapsed } => {
                let process = self.open_pool_process(id, requested_process);
                if let Some(shape) = self.registry.get_mut(id) {
                    shape.set_process(process);
                }
                if !collapsed {
                    push_children(
                        stack,
                        &frame.shape.child_shapes,
                        Some(id),
                        Some(process),
                        child_offset,
                    );
                }
            }
            StencilRole::Lane => {
                self.containers
                    .lanes
                    .insert(id, LaneContainer::new(id, frame.parent, frame.process));
                push_children(
                    stack,
                    &frame.shape.child_shapes,
                    Some(id),
                    frame.process,
                    child_offset,
                );
            }
            StencilRole::SequenceFlow => {
                self.containers.sequence_flows.push(id);
                self.assign_to_process(id, frame.process, requested_process, false);
            }
            StencilRole::MessageFlow => {
                self.containers.message_flows.push(id);
            }
            StencilRole::Association => {
                self.containers.associations.push(id);
                self.assign_to_process(id, frame.process, requested_process, false);
            }
            StencilRole::Data => {
                self.assign_to_process(id, frame.process, requested_process, true);
                self.register_in_lane(id, frame.parent);
            }
            StencilRole::Message => {
                self.containers.messages.push(id);
            }
            StencilRole::Diagram => {
                push_children(
                    stack,
                    &frame.shape.child_shapes,
                    Some(id),
                    frame.process,
                    child_offset,
                );
            }
            StencilRole::SubProcess | StencilRole::Node => {
                self.assign_to_process(id, frame.process, requested_process, true);
                if registers_in_lane {
                    self.register_in_lane(id, frame.parent);
                }
                push_children(
                    stack,
                    &frame.shape.child_shapes,
                    Some(id),
                    frame.process,
                    child_offset,
                );
            }
        }
    }

    // ============================================================================
    // Process and Lane Assignment
    // ============================================================================

    /// Opens the process declared by a pool and returns its identifier.
    ///
    /// Pools without a `processid` property, or whose process id is already
    /// taken, get `Process_{poolId}`.
    fn open_pool_process(&mut self, pool: Id, requested: Option<Id>) -> Id {
        let fallback = Id::new(&format!("Process_{pool}"));
        let process = match requested {
            Some(process) if self.containers.processes.contains_key(&process) => {
                warn!(
                    pool_id:% = pool,
                    process_id:% = process;
                    "Process id already declared by another pool, using {fallback}",
                );
                fallback
            }
            Some(process) => process,
            None => fallback,
        };

        self.containers.pools.push(pool);
        self.containers
            .processes
            .entry(process)
            .or_insert_with(|| ProcessContainer::for_pool(process, pool));
        process
    }

    /// Assigns a shape to the enclosing process.
    ///
    /// Shapes outside every pool that name a process are resolved once the
    /// whole tree has been walked, so pools declared later still apply.
    fn assign_to_process(
        &mut self,
        shape: Id,
        enclosing: Option<Id>,
        requested: Option<Id>,
        member: bool,
    ) {
        match (enclosing, requested) {
            (Some(process), _) => {
                self.attach(shape, process, member);
            }
            (None, Some(process)) => self.deferred.push(DeferredAssignment {
                shape,
                process,
                member,
            }),
            (None, None) => {}
        }
    }

    fn attach(&mut self, shape: Id, process: Id, member: bool) -> bool {
        let Some(container) = self.containers.processes.get_mut(&process) else {
            return false;
        };
        if member {
            container.push_member(shape);
        }
        if let Some(node) = self.registry.get_mut(shape) {
            node.set_process(process);
        }
        true
    }

    fn resolve_deferred_assignments(&mut self) {
        for assignment in std::mem::take(&mut self.deferred) {
            if !self.attach(assignment.shape, assignment.process, assignment.member) {
                debug!(
                    shape_id:% = assignment.shape,
                    process_id:% = assignment.process;
                    "Shape names an unknown process, leaving it unassigned",
                );
            }
        }
    }

    fn register_in_lane(&mut self, shape: Id, parent: Option<Id>) {
        if let Some(lane) = parent.and_then(|parent| self.containers.lanes.get_mut(&parent)) {
            lane.push_flow_node_ref(shape);
        }
    }

    /// Collects every semantic shape into `Process_1` for diagrams without
    /// pools.
    fn open_synthetic_process(&mut self) {
        let process = Id::new("Process_1");
        let members = self
            .registry
            .iter()
            .filter(|shape| {
                let stencil = shape.stencil();
                !stencil.is_connection()
                    && !matches!(stencil.role(), StencilRole::Message | StencilRole::Diagram)
            })
            .map(ShapeNode::id)
            .collect();

        debug!(process_id:% = process; "No pools found, using a default process");
        self.containers
            .processes
            .insert(process, ProcessContainer::synthetic(process, members));
    }
}

fn push_children<'a>(
    stack: &mut Vec<Frame<'a>>,
    children: &'a [ExportShape],
    parent: Option<Id>,
    process: Option<Id>,
    offset: Point,
) {
    // Reversed so children are popped in document order.
    stack.extend(children.iter().rev().map(|shape| Frame {
        shape,
        parent,
        process,
        offset,
    }));
}

/// Creates the shape record of one export entry.
///
/// Returns `None` when the entry has no stencil or no resource id.
fn create_shape(frame: &Frame<'_>) -> Option<ShapeNode> {
    let shape = frame.shape;
    let stencil = shape.stencil()?.clone();
    let id = Id::sanitized(shape.resource_id()?);

    let properties = shape.properties();
    let name = properties.get("name").unwrap_or_default().to_string();

    let mut node = ShapeNode::new(id, stencil)
        .with_name(&name)
        .with_properties(properties)
        .with_outgoing(shape.outgoing().map(Id::sanitized).collect())
        .with_target(shape.target().map(Id::sanitized))
        .with_dockers(shape.dockers())
        .with_parent(frame.parent)
        .with_process(frame.process);

    if let Some(bounds) = shape.bounds() {
        node = node.with_bounds(bounds, frame.offset);
    }

    Some(node)
}
