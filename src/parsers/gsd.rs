//! GSD block parser
//!
//! GSD telemetry logs are plain text. A bracketed header line such as
//! `[42,2024-03-11:08:15:00]` opens a block; every following line holding
//! at least one `=` is a data line of that block, until the next header or
//! the end of the stream. Anything else is noise and is dropped.

use regex::Regex;
use std::io::{self, BufRead};
use std::path::Path;
use std::sync::LazyLock;

use super::types::{Block, BlockHandler, HeaderToken, ParseStats};
use crate::error::ConvertError;

/// Header line pattern, anchored at the start of the line
static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(?<token>\d+,\d{4}-\d{2}-\d{2}:\d{2}:\d{2}:\d{2})\]")
        .expect("Failed to compile header regex")
});

/// Match a header line, returning its token
pub fn match_header(line: &str) -> Option<HeaderToken> {
    HEADER_REGEX
        .captures(line)
        .map(|captures| HeaderToken::new(&captures["token"]))
}

/// Parser state: either waiting for the first header, or collecting a block
#[derive(Debug, Default)]
enum ParserState {
    #[default]
    Outside,
    Inside(Block),
}

/// Line-driven block parser for a single input source
#[derive(Debug, Default)]
pub struct GsdParser {
    state: ParserState,
    stats: ParseStats,
}

impl GsdParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw line. Completed blocks are handed to `handler`.
    pub fn feed_line<H: BlockHandler>(
        &mut self,
        line: &str,
        handler: &mut H,
    ) -> Result<(), ConvertError> {
        match self.advance(line) {
            Some(block) => handler.handle_block(block),
            None => Ok(()),
        }
    }

    /// End of stream: flush the open block, if any, and return the counters
    pub fn finish<H: BlockHandler>(
        mut self,
        handler: &mut H,
    ) -> Result<ParseStats, ConvertError> {
        if let Some(block) = self.close() {
            handler.handle_block(block)?;
        }
        Ok(self.stats)
    }

    /// Step the state machine; returns the block completed by a header line
    fn advance(&mut self, line: &str) -> Option<Block> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if let Some(token) = match_header(line) {
            self.stats.blocks += 1;
            let previous =
                std::mem::replace(&mut self.state, ParserState::Inside(Block::new(token)));
            return self.completed(previous);
        }

        match &mut self.state {
            ParserState::Inside(block) if line.contains('=') => {
                block.lines.push(line.replace('=', ","));
                self.stats.data_lines += 1;
            }
            _ => {
                tracing::trace!("Dropping non-data line: {}", line);
                self.stats.dropped_lines += 1;
            }
        }

        None
    }

    /// Take the open block at end of stream
    fn close(&mut self) -> Option<Block> {
        let last = std::mem::take(&mut self.state);
        self.completed(last)
    }

    fn completed(&mut self, state: ParserState) -> Option<Block> {
        match state {
            ParserState::Outside => None,
            ParserState::Inside(block) => {
                if block.is_empty() {
                    self.stats.empty_blocks += 1;
                    tracing::debug!("Block {} has no data lines", block.token);
                } else {
                    tracing::debug!("Block {} with {} lines", block.token, block.lines.len());
                }
                Some(block)
            }
        }
    }

    /// Scan a whole reader. `path` only labels read errors.
    ///
    /// Lines end at `\n`, `\r\n` or a lone `\r`.
    pub fn parse_reader<R: BufRead, H: BlockHandler>(
        mut reader: R,
        path: &Path,
        handler: &mut H,
    ) -> Result<ParseStats, ConvertError> {
        let read_err = |source: io::Error| ConvertError::ReadInput {
            path: path.to_path_buf(),
            source,
        };

        let mut parser = Self::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).map_err(read_err)? == 0 {
                break;
            }
            let chunk = std::str::from_utf8(&buf)
                .map_err(|e| read_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;
            for line in split_lines(chunk) {
                parser.feed_line(line, handler)?;
            }
        }
        parser.finish(handler)
    }

    /// Parse in-memory contents into a list of blocks
    pub fn parse_str(contents: &str) -> Vec<Block> {
        let mut parser = Self::new();
        let mut blocks: Vec<Block> = split_lines(contents)
            .filter_map(|line| parser.advance(line))
            .collect();
        blocks.extend(parser.close());
        blocks
    }
}

/// Split text on `\n`, `\r\n` and lone `\r`. A `\r\n` pair yields one
/// extra empty piece, which the parser skips like any blank line.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\r', '\n'])
}
