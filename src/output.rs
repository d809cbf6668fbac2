//! Combined CSV destination.
//!
//! One destination is opened per run and shared by every input. The
//! header is written only when the destination is empty, so appending to
//! an existing file never repeats it.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::ConvertError;
use crate::record::header_line;

/// How an existing destination file is treated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Start from an empty file
    #[default]
    Truncate,
    /// Keep existing rows and add new ones at the end
    Append,
}

/// Write the header line if nothing has been written to `sink` yet.
///
/// `existing_len` is the number of bytes already in the destination.
/// Returns whether the header was written.
pub fn write_header_if_empty<W: Write>(
    sink: &mut W,
    existing_len: u64,
) -> Result<bool, ConvertError> {
    if existing_len > 0 {
        return Ok(false);
    }
    writeln!(sink, "{}", header_line()).map_err(ConvertError::WriteOutput)?;
    Ok(true)
}

/// Buffered handle on the combined CSV file
pub struct OutputFile {
    path: PathBuf,
    writer: BufWriter<File>,
    wrote_header: bool,
}

impl OutputFile {
    /// Open (creating the parent directory if needed) and write the header
    /// when the file is empty
    pub fn open(path: &Path, mode: WriteMode) -> Result<Self, ConvertError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ConvertError::CreateOutputDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let open_err = |source| ConvertError::OpenOutput {
            path: path.to_path_buf(),
            source,
        };

        let mut options = OpenOptions::new();
        match mode {
            WriteMode::Truncate => options.write(true).create(true).truncate(true),
            WriteMode::Append => options.append(true).create(true),
        };
        let mut file = options.open(path).map_err(open_err)?;
        let existing_len = file.seek(SeekFrom::End(0)).map_err(open_err)?;

        let mut writer = BufWriter::new(file);
        let wrote_header = write_header_if_empty(&mut writer, existing_len)?;

        tracing::debug!(
            "Opened {} ({:?}, {} existing bytes)",
            path.display(),
            mode,
            existing_len
        );

        Ok(Self {
            path: path.to_path_buf(),
            writer,
            wrote_header,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this open wrote the header line
    pub fn wrote_header(&self) -> bool {
        self.wrote_header
    }

    /// Flush buffered rows to disk
    pub fn flush_rows(&mut self) -> Result<(), ConvertError> {
        self.writer.flush().map_err(ConvertError::WriteOutput)
    }
}

impl Write for OutputFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}
