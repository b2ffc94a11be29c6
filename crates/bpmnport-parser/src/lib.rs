//! # bpmnport Parser
//!
//! Reads a diagram export (a JSON tree of nested shapes) into a validated
//! [`ShapeGraph`]. This crate provides the pipeline from source text to the
//! model consumed by the emitters.
//!
//! ## Usage
//!
//! ```
//! # use bpmnport_parser::{parse, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"{
//!         "childShapes": [
//!             {"resourceId": "start", "stencil": {"id": "StartNoneEvent"}}
//!         ]
//!     }"#;
//!
//!     let graph = parse(source)?;
//!     assert_eq!(graph.registry().len(), 1);
//!     Ok(())
//! }
//! ```

mod builder;
mod connectivity;
pub mod error;
mod export;
mod span;

pub use connectivity::FlowDefect;
pub use export::ExportDocument;
pub use span::Span;

use log::debug;

use bpmnport_core::graph::ShapeGraph;

use builder::GraphBuilder;
use error::ParseError;

/// Parse export text into a validated shape graph.
///
/// This is the main entry point of the crate. It runs the complete pipeline:
///
/// 1. **Deserialize** - Read the JSON export tree
/// 2. **Build** - Flatten the tree into a registry with absolute bounds,
///    processes and lanes
/// 3. **Resolve** - Derive incoming references from outgoing ones
/// 4. **Validate** - Compute the set of flows whose both ends exist
///
/// Only unreadable input fails; malformed shapes and dangling flows are
/// skipped.
///
/// # Errors
///
/// Returns a [`ParseError`] whose diagnostic points at the offending byte
/// when the text is not valid JSON or does not have the export structure.
pub fn parse(source: &str) -> Result<ShapeGraph, ParseError> {
    let document = ExportDocument::from_json(source)?;
    Ok(build(&document))
}

/// Build a validated shape graph from an already deserialized export.
pub fn build(document: &ExportDocument) -> ShapeGraph {
    let mut built = GraphBuilder::new().build(document);

    connectivity::resolve_incoming(&mut built.registry);
    let valid_flows = connectivity::validate_flows(&built.registry, &built.containers);

    debug!(
        shapes = built.registry.len(),
        valid_flows = valid_flows.len();
        "Export parsed",
    );
    ShapeGraph::new(
        built.family,
        built.registry,
        built.containers,
        valid_flows,
    )
}
