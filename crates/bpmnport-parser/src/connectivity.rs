//! Connectivity resolution and flow validation.
//!
//! Incoming references are derived from outgoing ones, every recorded flow
//! is matched with its source, and the flows whose both ends exist are
//! collected into the [`ValidFlowSet`] shared by both emitters.

use std::{collections::HashMap, fmt};

use log::{debug, warn};

use bpmnport_core::{
    graph::{Containers, FlowEnds, FlowKind, Registry, ValidFlowSet},
    identifier::Id,
};

/// Why a recorded flow cannot be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowDefect {
    /// No shape lists the flow among its outgoing references.
    NoSource,
    /// The flow has no target reference.
    NoTarget,
    /// The target reference names a shape that does not exist.
    UnknownTarget(Id),
}

impl fmt::Display for FlowDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSource => write!(f, "no source reference"),
            Self::NoTarget => write!(f, "no target reference"),
            Self::UnknownTarget(target) => write!(f, "target {target} not found"),
        }
    }
}

/// Appends every shape to the incoming list of the shapes it points at.
///
/// References to identifiers missing from the registry are ignored.
pub fn resolve_incoming(registry: &mut Registry) {
    let edges: Vec<(Id, Id)> = registry
        .iter()
        .flat_map(|shape| {
            shape
                .outgoing()
                .iter()
                .map(move |target| (shape.id(), *target))
        })
        .collect();

    for (source, target) in edges {
        if let Some(shape) = registry.get_mut(target) {
            shape.push_incoming(source);
        }
    }
}

/// Maps every referenced identifier to the first shape, in discovery order,
/// listing it as outgoing.
pub fn source_index(registry: &Registry) -> HashMap<Id, Id> {
    let mut index = HashMap::new();
    for shape in registry.iter() {
        for outgoing in shape.outgoing() {
            index.entry(*outgoing).or_insert(shape.id());
        }
    }
    index
}

/// Resolves the endpoints of one flow.
pub fn flow_ends(
    registry: &Registry,
    sources: &HashMap<Id, Id>,
    kind: FlowKind,
    flow: Id,
) -> Result<FlowEnds, FlowDefect> {
    let source = *sources.get(&flow).ok_or(FlowDefect::NoSource)?;
    let target = registry
        .get(flow)
        .and_then(|shape| shape.target())
        .ok_or(FlowDefect::NoTarget)?;
    if !registry.contains(target) {
        return Err(FlowDefect::UnknownTarget(target));
    }

    Ok(FlowEnds {
        kind,
        source,
        target,
    })
}

/// Computes the set of flows whose source and target both exist.
///
/// Each rejected flow is reported once with a warning.
pub fn validate_flows(registry: &Registry, containers: &Containers) -> ValidFlowSet {
    let sources = source_index(registry);

    let recorded = containers
        .sequence_flows
        .iter()
        .map(|flow| (FlowKind::Sequence, *flow))
        .chain(
            containers
                .message_flows
                .iter()
                .map(|flow| (FlowKind::Message, *flow)),
        )
        .chain(
            containers
                .associations
                .iter()
                .map(|flow| (FlowKind::Association, *flow)),
        );

    let valid: ValidFlowSet = recorded
        .filter_map(
            |(kind, flow)| match flow_ends(registry, &sources, kind, flow) {
                Ok(ends) => Some((flow, ends)),
                Err(defect) => {
                    warn!(flow_kind:% = kind, flow_id:% = flow; "Skipping flow: {defect}");
                    None
                }
            },
        )
        .collect();

    debug!(valid_flows = valid.len(); "Flow validation finished");
    valid
}

#[cfg(test)]
mod tests {
    use bpmnport_core::{graph::ShapeNode, stencil::Stencil};

    use super::*;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.insert(
            ShapeNode::new(Id::new("a"), Stencil::Task)
                .with_outgoing(vec![Id::new("ab"), Id::new("dangling")]),
        );
        registry.insert(
            ShapeNode::new(Id::new("ab"), Stencil::SequenceFlow)
                .with_outgoing(vec![Id::new("b")])
                .with_target(Some(Id::new("b"))),
        );
        registry.insert(ShapeNode::new(Id::new("b"), Stencil::Task));
        registry.insert(
            ShapeNode::new(Id::new("dangling"), Stencil::SequenceFlow)
                .with_target(Some(Id::new("nowhere"))),
        );
        registry.insert(
            ShapeNode::new(Id::new("orphan"), Stencil::SequenceFlow)
                .with_target(Some(Id::new("b"))),
        );
        registry
    }

    #[test]
    fn test_resolve_incoming() {
        let mut registry = registry();
        resolve_incoming(&mut registry);

        assert_eq!(registry.get(Id::new("ab")).unwrap().incoming(), &[Id::new("a")]);
        assert_eq!(registry.get(Id::new("b")).unwrap().incoming(), &[Id::new("ab")]);
        assert!(registry.get(Id::new("a")).unwrap().incoming().is_empty());
    }

    #[test]
    fn test_source_index_first_match() {
        let mut registry = registry();
        registry.insert(
            ShapeNode::new(Id::new("late"), Stencil::Task).with_outgoing(vec![Id::new("ab")]),
        );

        let index = source_index(&registry);
        assert_eq!(index.get(&Id::new("ab")), Some(&Id::new("a")));
    }

    #[test]
    fn test_flow_defects() {
        let registry = registry();
        let sources = source_index(&registry);

        assert_eq!(
            flow_ends(&registry, &sources, FlowKind::Sequence, Id::new("orphan")),
            Err(FlowDefect::NoSource)
        );
        assert_eq!(
            flow_ends(&registry, &sources, FlowKind::Sequence, Id::new("dangling")),
            Err(FlowDefect::UnknownTarget(Id::new("nowhere")))
        );
        assert_eq!(
            flow_ends(&registry, &sources, FlowKind::Sequence, Id::new("ab")),
            Ok(FlowEnds {
                kind: FlowKind::Sequence,
                source: Id::new("a"),
                target: Id::new("b"),
            })
        );
    }

    #[test]
    fn test_validate_flows() {
        let registry = registry();
        let containers = Containers {
            sequence_flows: vec![Id::new("ab"), Id::new("dangling"), Id::new("orphan")],
            ..Containers::default()
        };

        let valid = validate_flows(&registry, &containers);
        assert_eq!(valid.len(), 1);
        assert!(valid.is_sequence_flow(Id::new("ab")));
        assert!(!valid.contains(Id::new("dangling")));
    }

    #[test]
    fn test_defect_display() {
        assert_eq!(FlowDefect::NoSource.to_string(), "no source reference");
        assert_eq!(
            FlowDefect::UnknownTarget(Id::new("T9")).to_string(),
            "target T9 not found"
        );
    }
}
