//! Renders conversion failures with miette.
//!
//! An unreadable export is shown as a snippet of its JSON text around the
//! position where reading stopped, labelled with the line and column. The
//! report title names the phase that failed (syntax or structure). I/O and
//! export failures have no source text and render as a coded message.

use std::fmt;

use miette::{
    Diagnostic as MietteDiagnostic, GraphicalReportHandler, GraphicalTheme, LabeledSpan,
    SourceSpan,
};

use bpmnport::BpmnPortError;
use bpmnport_parser::error::Diagnostic;

/// An unreadable export together with its text.
#[derive(Debug)]
pub struct ExportReport<'a> {
    diag: &'a Diagnostic,
    src: &'a str,
}

impl<'a> ExportReport<'a> {
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Display for ExportReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.diag.code().phase(), self.diag.message())
    }
}

impl std::error::Error for ExportReport<'_> {}

impl MietteDiagnostic for ExportReport<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.diag.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.diag.code().help()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.diag.span();
        let label = format!(
            "{} (line {}, column {})",
            self.diag.code().label(),
            self.diag.line(),
            self.diag.column()
        );

        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            Some(label),
            SourceSpan::new(span.start().into(), span.len()),
        ))))
    }
}

/// A failure outside the export text.
#[derive(Debug)]
pub struct FailureReport<'a>(pub &'a BpmnPortError);

impl fmt::Display for FailureReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for FailureReport<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for FailureReport<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            BpmnPortError::Io(_) => "bpmnport::io",
            BpmnPortError::Parse { .. } => return None,
            BpmnPortError::Export(_) => "bpmnport::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            BpmnPortError::Io(_) => Some(Box::new(
                "check that the input is readable and the output location is writable",
            )),
            _ => None,
        }
    }
}

/// Wraps `err` in the report matching its variant.
pub fn report(err: &BpmnPortError) -> Box<dyn MietteDiagnostic + '_> {
    match err {
        BpmnPortError::Parse { err: parse_err, src } => {
            Box::new(ExportReport::new(parse_err.diagnostic(), src))
        }
        _ => Box::new(FailureReport(err)),
    }
}

/// Renders `err` as text for the log.
///
/// A report the handler cannot render falls back to its plain message.
pub fn render_report(err: &BpmnPortError) -> String {
    let reporter = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    let report = report(err);

    let mut writer = String::new();
    match reporter.render_report(&mut writer, report.as_ref()) {
        Ok(()) => writer,
        Err(_) => report.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use bpmnport::Converter;

    use super::*;

    fn convert_err(source: &str) -> BpmnPortError {
        Converter::default()
            .convert(source)
            .expect_err("export should be unreadable")
    }

    #[test]
    fn test_truncated_export_report() {
        let err = convert_err("{\"childShapes\": [");

        let report = report(&err);

        assert_eq!(report.code().map(|c| c.to_string()), Some("E002".to_string()));
        assert!(report.to_string().starts_with("syntax error: "));
        assert!(report.source_code().is_some());
    }

    #[test]
    fn test_label_carries_line_and_column() {
        let err = convert_err("{\n  \"childShapes\": [,]\n}");

        let report = report(&err);
        let labels: Vec<_> = report.labels().expect("labels").collect();

        assert_eq!(labels.len(), 1);
        assert!(labels[0].primary());
        assert_eq!(labels[0].label(), Some("invalid JSON (line 2, column 19)"));
        assert_eq!(labels[0].len(), 1);
    }

    #[test]
    fn test_wrong_type_is_structure_phase() {
        let err = convert_err("{\"childShapes\": {\"a\": 1}}");

        let report = report(&err);

        assert_eq!(report.code().map(|c| c.to_string()), Some("E100".to_string()));
        assert!(report.to_string().starts_with("structure error: "));
    }

    #[test]
    fn test_io_error_report() {
        let err = BpmnPortError::Io(std::io::Error::other("disk full"));

        let report = report(&err);

        assert_eq!(report.to_string(), "I/O error: disk full");
        assert_eq!(
            report.code().map(|c| c.to_string()),
            Some("bpmnport::io".to_string())
        );
        assert!(report.help().is_some());
        assert!(report.labels().is_none());
    }

    #[test]
    fn test_render_report_shows_snippet() {
        let err = convert_err("{\"childShapes\": [");

        let rendered = render_report(&err);

        assert!(rendered.contains("E002"));
        assert!(rendered.contains("syntax error"));
        assert!(rendered.contains("{\"childShapes\": ["));
    }
}
