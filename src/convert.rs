//! Conversion driver.
//!
//! Discovers input files, opens the shared destination once, and runs the
//! block parser over every input in sorted order so that all rows land in
//! one append-only CSV.

use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::ConvertError;
use crate::output::OutputFile;
use crate::parsers::{GsdParser, ParseStats};
use crate::record::{RecordTransformer, RowStats};
use crate::settings::ConvertSettings;

/// Counters for one converted input
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub path: PathBuf,
    pub parse: ParseStats,
    pub rows: RowStats,
}

/// Counters for a whole run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub output: Option<PathBuf>,
    pub wrote_header: bool,
    pub files: Vec<FileSummary>,
    pub skipped: Vec<PathBuf>,
}

impl RunSummary {
    /// Total rows written across all files
    pub fn total_rows(&self) -> usize {
        self.files.iter().map(|f| f.rows.total()).sum()
    }

    /// Parse counters summed across all files
    pub fn total_parse(&self) -> ParseStats {
        let mut total = ParseStats::default();
        for file in &self.files {
            total.merge(&file.parse);
        }
        total
    }
}

/// List files under `input_dir` matching `pattern`, sorted by path.
///
/// A missing directory is not an error: it simply holds no inputs.
pub fn discover_inputs(input_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, ConvertError> {
    if !input_dir.is_dir() {
        tracing::warn!("Input directory {} not found", input_dir.display());
        return Ok(Vec::new());
    }

    let escaped_dir = glob::Pattern::escape(&input_dir.to_string_lossy());
    let full_pattern = Path::new(&escaped_dir).join(pattern);
    let paths =
        glob::glob(&full_pattern.to_string_lossy()).map_err(|source| ConvertError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

    let mut inputs: Vec<PathBuf> = paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    inputs.sort();

    Ok(inputs)
}

/// Convert one line source into `sink`. `label` names the source in errors.
pub fn convert_reader<R: BufRead, W: Write>(
    reader: R,
    label: &Path,
    sink: &mut W,
) -> Result<FileSummary, ConvertError> {
    let mut transformer = RecordTransformer::new(&mut *sink);
    let parse = GsdParser::parse_reader(reader, label, &mut transformer)?;

    Ok(FileSummary {
        path: label.to_path_buf(),
        parse,
        rows: transformer.stats(),
    })
}

/// Convert a single GSD file into `sink`
pub fn convert_file<W: Write>(path: &Path, sink: &mut W) -> Result<FileSummary, ConvertError> {
    let file = File::open(path).map_err(|source| ConvertError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    convert_reader(BufReader::new(file), path, sink)
}

/// Convert every input, in the given order, into one shared sink
pub fn convert_files<W: Write>(
    inputs: &[PathBuf],
    sink: &mut W,
    skip_unreadable: bool,
) -> Result<RunSummary, ConvertError> {
    let mut summary = RunSummary::default();

    for path in inputs {
        tracing::info!("Processing {}", path.display());
        match convert_file(path, sink) {
            Ok(file_summary) => {
                tracing::info!(
                    "Completed processing {} ({} blocks, {} rows)",
                    path.display(),
                    file_summary.parse.blocks,
                    file_summary.rows.total()
                );
                summary.files.push(file_summary);
            }
            Err(e) if skip_unreadable && e.is_input_error() => {
                tracing::warn!("Skipping {}: {}", path.display(), e);
                summary.skipped.push(path.clone());
            }
            Err(e) => return Err(e),
        }
        sink.flush().map_err(ConvertError::WriteOutput)?;
    }

    Ok(summary)
}

/// Run a full conversion as described by `settings`
pub fn run(settings: &ConvertSettings) -> Result<RunSummary, ConvertError> {
    let start = Instant::now();

    let inputs = discover_inputs(&settings.input_dir, &settings.pattern)?;
    tracing::info!(
        "Found {} input files in {}",
        inputs.len(),
        settings.input_dir.display()
    );

    let output_path = settings.output_path();
    let mut output = OutputFile::open(&output_path, settings.write_mode())?;

    let mut summary = convert_files(&inputs, &mut output, settings.skip_unreadable)?;
    output.flush_rows()?;

    summary.output = Some(output.path().to_path_buf());
    summary.wrote_header = output.wrote_header();

    tracing::info!(
        "All data has been combined into {} ({} rows in {:?})",
        output_path.display(),
        summary.total_rows(),
        start.elapsed()
    );

    Ok(summary)
}
