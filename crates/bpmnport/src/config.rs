//! Configuration types for BPMN conversion.
//!
//! This module provides configuration structures that control the document
//! header and the diagram-interchange geometry. All types implement
//! [`serde::Deserialize`] with every field defaulted, so a partial TOML file
//! only overrides what it names.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining document and diagram settings.
//! - [`DocumentConfig`] - Attributes written on the root `definitions` element.
//! - [`DiagramConfig`] - Waypoint snapping and message-flow routing switches.
//! - [`RoutingConfig`] - Thresholds and bend positions for routed message flows.
//!
//! # Example
//!
//! ```
//! # use bpmnport::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.diagram().snap_to_boundaries());
//! assert_eq!(config.diagram().routing().min_vertical_span(), 50.0);
//! ```

use serde::Deserialize;

const DEFAULT_TARGET_NAMESPACE: &str = "http://bpmn.io/schema/bpmn";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Document header section.
    #[serde(default)]
    document: DocumentConfig,

    /// Diagram geometry section.
    #[serde(default)]
    diagram: DiagramConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified sections.
    pub fn new(document: DocumentConfig, diagram: DiagramConfig) -> Self {
        Self { document, diagram }
    }

    /// Returns the document configuration.
    pub fn document(&self) -> &DocumentConfig {
        &self.document
    }

    /// Returns the diagram configuration.
    pub fn diagram(&self) -> &DiagramConfig {
        &self.diagram
    }
}

/// Attributes of the root `definitions` element.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    exporter: Option<String>,
    exporter_version: Option<String>,
    target_namespace: Option<String>,
}

impl DocumentConfig {
    /// Returns the `exporter` attribute, the package name unless configured.
    pub fn exporter(&self) -> &str {
        self.exporter
            .as_deref()
            .unwrap_or(env!("CARGO_PKG_NAME"))
    }

    /// Returns the `exporterVersion` attribute, the package version unless
    /// configured.
    pub fn exporter_version(&self) -> &str {
        self.exporter_version
            .as_deref()
            .unwrap_or(env!("CARGO_PKG_VERSION"))
    }

    pub fn target_namespace(&self) -> &str {
        self.target_namespace
            .as_deref()
            .unwrap_or(DEFAULT_TARGET_NAMESPACE)
    }
}

/// Diagram-interchange geometry settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Move flow endpoints from docker positions onto shape outlines.
    snap_to_boundaries: bool,

    /// Replace long diagonal message flows with an orthogonal route.
    route_message_flows: bool,

    routing: RoutingConfig,
}

impl DiagramConfig {
    pub fn new(snap_to_boundaries: bool, route_message_flows: bool, routing: RoutingConfig) -> Self {
        Self {
            snap_to_boundaries,
            route_message_flows,
            routing,
        }
    }

    pub fn snap_to_boundaries(&self) -> bool {
        self.snap_to_boundaries
    }

    pub fn route_message_flows(&self) -> bool {
        self.route_message_flows
    }

    pub fn routing(&self) -> &RoutingConfig {
        &self.routing
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            snap_to_boundaries: true,
            route_message_flows: true,
            routing: RoutingConfig::default(),
        }
    }
}

/// Message-flow routing heuristics.
///
/// A message flow is routed only when its endpoints are at least
/// `min_vertical_span` apart vertically and `min_horizontal_span` apart
/// horizontally. The two bends sit at the `first_bend` and `second_bend`
/// fractions of the vertical distance.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    min_vertical_span: f64,
    min_horizontal_span: f64,
    first_bend: f64,
    second_bend: f64,
}

impl RoutingConfig {
    pub fn new(
        min_vertical_span: f64,
        min_horizontal_span: f64,
        first_bend: f64,
        second_bend: f64,
    ) -> Self {
        Self {
            min_vertical_span,
            min_horizontal_span,
            first_bend,
            second_bend,
        }
    }

    pub fn min_vertical_span(&self) -> f64 {
        self.min_vertical_span
    }

    pub fn min_horizontal_span(&self) -> f64 {
        self.min_horizontal_span
    }

    pub fn first_bend(&self) -> f64 {
        self.first_bend
    }

    pub fn second_bend(&self) -> f64 {
        self.second_bend
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            min_vertical_span: 50.0,
            min_horizontal_span: 20.0,
            first_bend: 0.3,
            second_bend: 0.7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_defaults() {
        let document = DocumentConfig::default();

        assert_eq!(document.exporter(), "bpmnport");
        assert_eq!(document.exporter_version(), env!("CARGO_PKG_VERSION"));
        assert_eq!(document.target_namespace(), "http://bpmn.io/schema/bpmn");
    }

    #[test]
    fn test_diagram_defaults() {
        let diagram = DiagramConfig::default();

        assert!(diagram.snap_to_boundaries());
        assert!(diagram.route_message_flows());
        assert_eq!(diagram.routing().min_horizontal_span(), 20.0);
        assert_eq!(diagram.routing().first_bend(), 0.3);
        assert_eq!(diagram.routing().second_bend(), 0.7);
    }
}
