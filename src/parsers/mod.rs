pub mod gsd;
pub mod types;

pub use gsd::GsdParser;
pub use types::{Block, BlockHandler, HeaderToken, ParseStats};
