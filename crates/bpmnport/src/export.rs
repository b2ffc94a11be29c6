//! BPMN 2.0 XML export.
//!
//! This module turns a validated [`ShapeGraph`] into one XML document. It is
//! the final stage of the conversion pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Export JSON
//!     ↓ parse
//! Shape Graph (registry, containers, valid flows)
//!     ↓ model (this module)
//! Semantic elements + Written sets
//!     ↓ diagram (this module)
//! BPMN XML
//! ```
//!
//! The [`model`] emitter returns the [`Written`] sets it filled; the
//! [`diagram`] emitter draws exactly those shapes and flows, so the two
//! halves of the document never disagree.
//!
//! # Error Handling
//!
//! Export operations return [`Error`]. [`Error`] converts into
//! [`BpmnPortError::Export`] at the crate boundary.
//!
//! [`BpmnPortError::Export`]: crate::BpmnPortError::Export

mod diagram;
mod model;
mod xml;

use std::{collections::HashSet, io::Cursor};

use log::debug;
use quick_xml::{
    Writer,
    events::{BytesDecl, Event},
};

use bpmnport_core::{graph::ShapeGraph, identifier::Id};

use crate::config::AppConfig;

const NS_BPMN: &str = "http://www.omg.org/spec/BPMN/20100524/MODEL";
const NS_BPMNDI: &str = "http://www.omg.org/spec/BPMN/20100524/DI";
const NS_DC: &str = "http://www.omg.org/spec/DD/20100524/DC";
const NS_DI: &str = "http://www.omg.org/spec/DD/20100524/DI";
const NS_XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Identifiers written into the semantic half of a document.
#[derive(Debug, Clone, Default)]
pub struct Written {
    shapes: HashSet<Id>,
    flows: HashSet<Id>,
}

impl Written {
    pub fn insert_shape(&mut self, shape: Id) {
        self.shapes.insert(shape);
    }

    pub fn insert_flow(&mut self, flow: Id) {
        self.flows.insert(flow);
    }

    pub fn contains_shape(&self, shape: Id) -> bool {
        self.shapes.contains(&shape)
    }

    pub fn contains_flow(&self, flow: Id) -> bool {
        self.flows.contains(&flow)
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn flow_count(&self) -> usize {
        self.flows.len()
    }
}

/// Writes the complete BPMN document for `graph`.
///
/// Nothing is returned unless the whole document was produced.
pub fn write_document(graph: &ShapeGraph, config: &AppConfig) -> Result<String, Error> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(Error::Xml)?;

    let document = config.document();
    xml::write_tag_start_with_attrs(
        &mut writer,
        "definitions",
        &[
            ("xmlns", NS_BPMN),
            ("xmlns:bpmndi", NS_BPMNDI),
            ("xmlns:dc", NS_DC),
            ("xmlns:di", NS_DI),
            ("xmlns:xsi", NS_XSI),
            ("id", "Definitions_1"),
            ("targetNamespace", document.target_namespace()),
            ("exporter", document.exporter()),
            ("exporterVersion", document.exporter_version()),
        ],
    )?;

    let written = model::DocumentEmitter::new(graph).write(&mut writer)?;
    debug!(
        shapes = written.shape_count(),
        flows = written.flow_count();
        "Semantic model written",
    );

    diagram::DiagramEmitter::new(graph, config.diagram(), &written).write(&mut writer)?;

    xml::write_tag_end(&mut writer, "definitions")?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(Error::Utf8)
}

/// Errors that can occur while writing a document.
///
/// This type is converted into [`BpmnPortError::Export`] at the crate
/// boundary via the [`From`] implementation in [`crate::error`].
///
/// [`BpmnPortError::Export`]: crate::BpmnPortError::Export
#[derive(Debug)]
pub enum Error {
    /// The XML writer failed.
    Xml(std::io::Error),
    /// The produced bytes were not UTF-8.
    Utf8(std::string::FromUtf8Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xml(err) => write!(f, "XML write error: {err}"),
            Self::Utf8(err) => write!(f, "Invalid UTF-8 in output: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Xml(err) => Some(err),
            Self::Utf8(err) => Some(err),
        }
    }
}
