//! Record transformer: turns raw GSD data lines into enriched CSV rows.
//!
//! A raw line is a comma-joined positional value list. Values are named
//! by position, derived columns are inserted after their named source
//! column, and the result is serialized behind the block's header token.

use std::io::Write;
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

use crate::error::ConvertError;
use crate::parsers::types::{Block, BlockHandler, HeaderToken};
use crate::units;

/// Minimum number of raw values for a line to be enriched
pub const MIN_ENRICHED_FIELDS: usize = 5;

/// Output columns, in header order
#[derive(AsRefStr, Clone, Copy, Debug, EnumIter, PartialEq, Eq)]
pub enum Column {
    #[strum(serialize = "TP_ID")]
    TpId,
    #[strum(serialize = "DATA_TRANSFER_DATE")]
    DataTransferDate,
    #[strum(serialize = "TRAIL_ID")]
    TrailId,
    #[strum(serialize = "Y_COORDINA")]
    YCoordina,
    #[strum(serialize = "Y_WGS84")]
    YWgs84,
    #[strum(serialize = "X_COORDINA")]
    XCoordina,
    #[strum(serialize = "X_WGS84")]
    XWgs84,
    #[strum(serialize = "TIME_ORIGINAL")]
    TimeOriginal,
    #[strum(serialize = "DATE_ORIGINAL")]
    DateOriginal,
    #[strum(serialize = "TIME")]
    Time,
    #[strum(serialize = "SPEED")]
    Speed,
    #[strum(serialize = "HEIGHT")]
    Height,
}

/// Raw value names in source order. Values past the last name are kept
/// unnamed at the end of the record.
pub const SOURCE_COLUMNS: [Column; 7] = [
    Column::TrailId,
    Column::YCoordina,
    Column::XCoordina,
    Column::TimeOriginal,
    Column::DateOriginal,
    Column::Speed,
    Column::Height,
];

/// The fixed CSV header line, without the trailing newline
pub fn header_line() -> String {
    Column::iter()
        .map(|c| c.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Named-field view of one raw data line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionalRecord {
    /// Ordered `(name, value)` pairs; `None` marks trailing unnamed values
    fields: Vec<(Option<Column>, String)>,
}

impl PositionalRecord {
    /// Split a raw line; `None` when it has too few values to enrich
    pub fn from_raw(line: &str) -> Option<Self> {
        let values: Vec<&str> = line.split(',').collect();
        if values.len() < MIN_ENRICHED_FIELDS {
            return None;
        }

        let fields = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (SOURCE_COLUMNS.get(i).copied(), v.to_string()))
            .collect();

        Some(Self { fields })
    }

    fn position(&self, column: Column) -> Option<usize> {
        self.fields.iter().position(|(c, _)| *c == Some(column))
    }

    pub fn get(&self, column: Column) -> Option<&str> {
        self.position(column).map(|i| self.fields[i].1.as_str())
    }

    /// Insert a derived value right after `anchor`; no-op if `anchor` is absent
    pub fn insert_after(&mut self, anchor: Column, column: Column, value: String) {
        if let Some(i) = self.position(anchor) {
            self.fields.insert(i + 1, (Some(column), value));
        }
    }

    /// Overwrite a value in place; no-op if `column` is absent
    pub fn set(&mut self, column: Column, value: String) {
        if let Some(i) = self.position(column) {
            self.fields[i].1 = value;
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Derive the WGS84, TIME and rescaled SPEED columns
    pub fn enrich(&mut self) {
        let y_wgs84 = self
            .get(Column::YCoordina)
            .map(units::format_wgs84)
            .unwrap_or_default();
        self.insert_after(Column::YCoordina, Column::YWgs84, y_wgs84);

        let x_wgs84 = self
            .get(Column::XCoordina)
            .map(units::format_wgs84)
            .unwrap_or_default();
        self.insert_after(Column::XCoordina, Column::XWgs84, x_wgs84);

        let time = self
            .get(Column::TimeOriginal)
            .and_then(units::format_time_code)
            .unwrap_or_default();
        self.insert_after(Column::DateOriginal, Column::Time, time);

        if let Some(speed) = self.get(Column::Speed).and_then(units::rescale_speed) {
            self.set(Column::Speed, speed);
        }
    }

    pub fn to_csv(&self) -> String {
        self.fields
            .iter()
            .map(|(_, v)| v.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Outcome of transforming one raw line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Row {
    Enriched(String),
    Passthrough(String),
}

impl Row {
    pub fn as_str(&self) -> &str {
        match self {
            Row::Enriched(s) | Row::Passthrough(s) => s,
        }
    }
}

/// Build the output row (without newline) for one raw data line
pub fn transform_line(token: &HeaderToken, line: &str) -> Row {
    match PositionalRecord::from_raw(line) {
        Some(mut record) => {
            record.enrich();
            Row::Enriched(format!("{},{}", token, record.to_csv()))
        }
        None => Row::Passthrough(format!("{},{}", token, line)),
    }
}

/// Transform every line of a block, preserving order
pub fn transform_block(block: &Block) -> Vec<Row> {
    block
        .lines
        .iter()
        .map(|line| transform_line(&block.token, line))
        .collect()
}

/// Row counters for one transformer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RowStats {
    pub enriched: usize,
    pub passthrough: usize,
}

impl RowStats {
    pub fn total(&self) -> usize {
        self.enriched + self.passthrough
    }
}

/// Block handler writing enriched rows to a sink as each block completes
pub struct RecordTransformer<W: Write> {
    sink: W,
    stats: RowStats,
}

impl<W: Write> RecordTransformer<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            stats: RowStats::default(),
        }
    }

    pub fn stats(&self) -> RowStats {
        self.stats
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> BlockHandler for RecordTransformer<W> {
    fn handle_block(&mut self, block: Block) -> Result<(), ConvertError> {
        for line in &block.lines {
            let row = transform_line(&block.token, line);
            match row {
                Row::Enriched(_) => self.stats.enriched += 1,
                Row::Passthrough(_) => self.stats.passthrough += 1,
            }
            writeln!(self.sink, "{}", row.as_str()).map_err(ConvertError::WriteOutput)?;
        }
        Ok(())
    }
}
