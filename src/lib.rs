//! gsdconv - GSD trajectory log converter
//!
//! This library parses proprietary GSD telemetry logs (bracketed block
//! headers followed by `=`-separated positional records) and writes them
//! out as one normalized CSV with derived WGS84 coordinates, formatted
//! times and rescaled speeds.
//!
//! ## Module Structure
//!
//! - [`parsers`] - Block parser for the GSD line format
//! - [`record`] - Record transformer (named columns, enrichment, row output)
//! - [`units`] - Raw code conversions (DDM coordinates, time codes, speed)
//! - [`output`] - Combined CSV destination and header handling
//! - [`convert`] - Driver: input discovery and per-file conversion
//! - [`settings`] - Converter settings persistence
//! - [`error`] - Error types

pub mod convert;
pub mod error;
pub mod output;
pub mod parsers;
pub mod record;
pub mod settings;
pub mod units;

pub use convert::{convert_file, convert_files, convert_reader, discover_inputs, run};
pub use error::ConvertError;
pub use settings::ConvertSettings;
