//! CLI logic for the bpmnport converter.
//!
//! A single export converts to one `.bpmn` file. A directory converts every
//! `.json` export it contains; a failing file is reported and counted
//! without stopping the batch.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use log::{debug, error, info, warn};

use bpmnport::{BpmnPortError, Converter, stencil::DiagramFamily};

use error_adapter::render_report;

/// Extension of written documents.
const OUTPUT_EXTENSION: &str = "bpmn";

/// Directory created next to a batch input when no output is given.
const BATCH_OUTPUT_DIR: &str = "bpmn_xml";

/// What happened to one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The document was written to this path.
    Converted(PathBuf),
    /// The export is not a diagram family this tool converts.
    Skipped(DiagramFamily),
}

/// Counts of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Summary {
    fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Converted(_) => self.converted += 1,
            FileOutcome::Skipped(_) => self.skipped += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.converted + self.skipped + self.failed
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} converted, {} skipped, {} failed",
            self.converted, self.skipped, self.failed
        )
    }
}

/// Run the bpmnport CLI application
///
/// A file input is converted on its own; a directory input is converted as a
/// batch.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `BpmnPortError` for:
/// - Configuration loading errors
/// - Any failure while converting a single file
/// - I/O errors while listing or creating batch directories
pub fn run(args: &Args) -> Result<Summary, BpmnPortError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Processing exports"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let converter = Converter::new(app_config);

    let input = Path::new(&args.input);
    let summary = if input.is_dir() {
        let output_dir = args
            .output
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| default_batch_output(input));
        run_batch(&converter, input, &output_dir)?
    } else {
        let output = args
            .output
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| input.with_extension(OUTPUT_EXTENSION));
        let mut summary = Summary::default();
        summary.record(&convert_file(&converter, input, &output)?);
        summary
    };

    info!(
        converted = summary.converted,
        skipped = summary.skipped,
        failed = summary.failed;
        "Run finished: {summary}"
    );

    Ok(summary)
}

/// Convert every `.json` export in `input_dir` into `output_dir`.
///
/// Exports are processed in file-name order. A failing export is rendered
/// to the log and counted.
fn run_batch(
    converter: &Converter,
    input_dir: &Path,
    output_dir: &Path,
) -> Result<Summary, BpmnPortError> {
    let exports = collect_exports(input_dir)?;
    info!(
        count = exports.len(),
        output_dir = output_dir.display().to_string();
        "Converting directory"
    );

    fs::create_dir_all(output_dir)?;

    let mut summary = Summary::default();
    for export in &exports {
        let Some(stem) = export.file_stem() else {
            continue;
        };
        let output = output_dir
            .join(stem)
            .with_extension(OUTPUT_EXTENSION);

        match convert_file(converter, export, &output) {
            Ok(outcome) => summary.record(&outcome),
            Err(err) => {
                summary.failed += 1;
                error!(path = export.display().to_string(); "{}", render_report(&err));
            }
        }
    }

    Ok(summary)
}

/// Convert one export file.
///
/// Exports of an unsupported diagram family are skipped without writing
/// anything.
pub fn convert_file(
    converter: &Converter,
    input: &Path,
    output: &Path,
) -> Result<FileOutcome, BpmnPortError> {
    debug!(path = input.display().to_string(); "Reading export");
    let source = fs::read_to_string(input)?;

    let graph = converter.parse(&source)?;
    if !graph.family().is_convertible() {
        warn!(
            path = input.display().to_string(),
            family:% = graph.family();
            "Skipping unsupported diagram family"
        );
        return Ok(FileOutcome::Skipped(graph.family().clone()));
    }

    let xml = converter.render_xml(&graph)?;
    fs::write(output, xml)?;

    info!(output_file = output.display().to_string(); "BPMN exported successfully");
    Ok(FileOutcome::Converted(output.to_path_buf()))
}

/// Lists the `.json` files directly inside `dir`, sorted by path.
fn collect_exports(dir: &Path) -> Result<Vec<PathBuf>, BpmnPortError> {
    let mut exports: Vec<PathBuf> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();

    exports.sort();
    Ok(exports)
}

/// `<parent>/bpmn_xml` for a batch input directory.
fn default_batch_output(input_dir: &Path) -> PathBuf {
    input_dir
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(BATCH_OUTPUT_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_batch_output() {
        assert_eq!(
            default_batch_output(Path::new("exports/2024")),
            PathBuf::from("exports/bpmn_xml")
        );
        assert_eq!(
            default_batch_output(Path::new("exports")),
            PathBuf::from("bpmn_xml")
        );
    }

    #[test]
    fn test_summary_display() {
        let summary = Summary {
            converted: 3,
            skipped: 1,
            failed: 2,
        };

        assert_eq!(summary.to_string(), "3 converted, 1 skipped, 2 failed");
        assert_eq!(summary.total(), 6);
    }
}
