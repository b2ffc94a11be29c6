//! bpmnport - Converts Signavio diagram exports into BPMN 2.0 XML.
//!
//! A JSON export is parsed into a shape graph, its flows are validated, and
//! the graph is written as one BPMN document carrying both the semantic model
//! and its diagram-interchange layer.

pub mod config;

mod error;
mod export;
mod waypoints;

pub use bpmnport_core::{geometry, graph, identifier, stencil};

pub use error::BpmnPortError;

use log::{debug, info, trace};

use config::AppConfig;
use graph::ShapeGraph;

/// Converts diagram exports into BPMN documents.
///
/// Parsing and rendering are separate steps so callers can inspect the
/// diagram family before writing anything.
///
/// # Examples
///
/// ```rust,no_run
/// use bpmnport::{Converter, config::AppConfig};
///
/// let source = r#"{"childShapes": [{"resourceId": "t1", "stencil": {"id": "Task"}}]}"#;
///
/// let converter = Converter::new(AppConfig::default());
///
/// // Parse the export into a shape graph
/// let graph = converter.parse(source)
///     .expect("Failed to parse");
///
/// // Write the graph as BPMN XML
/// let xml = converter.render_xml(&graph)
///     .expect("Failed to render");
///
/// // Or use default config
/// let converter = Converter::default();
/// ```
#[derive(Debug, Default)]
pub struct Converter {
    config: AppConfig,
}

impl Converter {
    /// Create a new converter with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration with document and diagram settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Parse an export into a validated shape graph.
    ///
    /// Malformed shapes and dangling flows do not fail the parse; they are
    /// dropped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `BpmnPortError::Parse` when the text is not a readable export.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use bpmnport::Converter;
    ///
    /// let graph = Converter::default()
    ///     .parse(r#"{"childShapes": []}"#)
    ///     .expect("Failed to parse export");
    /// assert!(graph.registry().is_empty());
    /// ```
    pub fn parse(&self, source: &str) -> Result<ShapeGraph, BpmnPortError> {
        info!("Parsing export");

        let graph = bpmnport_parser::parse(source)
            .map_err(|err| BpmnPortError::new_parse_error(err, source))?;

        debug!(
            family:% = graph.family(),
            shapes = graph.registry().len(),
            valid_flows = graph.valid_flows().len();
            "Export parsed successfully",
        );
        trace!(graph:?; "Parsed shape graph");

        Ok(graph)
    }

    /// Render a shape graph as a BPMN XML document.
    ///
    /// The document is built in memory and returned only when complete.
    ///
    /// # Errors
    ///
    /// Returns `BpmnPortError::Export` if the XML writer fails.
    pub fn render_xml(&self, graph: &ShapeGraph) -> Result<String, BpmnPortError> {
        info!(processes = graph.processes().count(); "Writing BPMN document");

        let xml = export::write_document(graph, &self.config)?;

        info!(bytes = xml.len(); "BPMN document written");
        Ok(xml)
    }

    /// Parse and render in one step.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Converter::parse`] and
    /// [`Converter::render_xml`].
    pub fn convert(&self, source: &str) -> Result<String, BpmnPortError> {
        let graph = self.parse(source)?;
        self.render_xml(&graph)
    }
}
