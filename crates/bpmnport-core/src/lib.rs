//! bpmnport Core Types and Definitions
//!
//! This crate provides the foundational types shared by the bpmnport
//! parser and emitters. It includes:
//!
//! - **Identifiers**: String-interned, XML-safe identifiers ([`identifier::Id`])
//! - **Geometry**: Points and bounds on the diagram canvas ([`geometry`] module)
//! - **Silhouettes**: Ray intersection against shape outlines ([`silhouette`] module)
//! - **Stencils**: The stencil taxonomy and diagram families ([`stencil`] module)
//! - **Graph**: The flattened shape graph of one diagram ([`graph`] module)

pub mod geometry;
pub mod graph;
pub mod identifier;
pub mod silhouette;
pub mod stencil;
