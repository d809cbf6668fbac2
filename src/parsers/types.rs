use serde::Serialize;
use std::fmt;

use crate::error::ConvertError;

/// Block header token, captured from `[<id>,<YYYY-MM-DD>:<hh>:<mm>:<ss>]`
/// without the brackets. Kept verbatim and never split into subfields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HeaderToken(String);

impl HeaderToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HeaderToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One header token plus the raw data lines collected under it.
///
/// Data lines are stored after the `=` to `,` rewrite.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Block {
    pub token: HeaderToken,
    pub lines: Vec<String>,
}

impl Block {
    pub fn new(token: HeaderToken) -> Self {
        Self {
            token,
            lines: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Counters gathered while scanning one input source
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Header lines seen (including blocks with no data)
    pub blocks: usize,
    /// Blocks flushed without a single data line
    pub empty_blocks: usize,
    /// Data lines accepted into a block
    pub data_lines: usize,
    /// Non-empty lines that were neither headers nor accepted data
    pub dropped_lines: usize,
}

impl ParseStats {
    pub fn merge(&mut self, other: &ParseStats) {
        self.blocks += other.blocks;
        self.empty_blocks += other.empty_blocks;
        self.data_lines += other.data_lines;
        self.dropped_lines += other.dropped_lines;
    }
}

/// Receiver for completed blocks
pub trait BlockHandler {
    fn handle_block(&mut self, block: Block) -> Result<(), ConvertError>;
}

/// Collecting handler, used by the inspect tool and tests
impl BlockHandler for Vec<Block> {
    fn handle_block(&mut self, block: Block) -> Result<(), ConvertError> {
        self.push(block);
        Ok(())
    }
}
