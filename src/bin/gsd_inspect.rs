//! Dump the blocks of a single GSD file as JSON, for checking the parser
//! against real device logs.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

use gsdconv::parsers::{Block, GsdParser};
use gsdconv::record::transform_block;

#[derive(Parser, Debug)]
#[command(name = "gsd_inspect", about = "Print the blocks of a GSD file as JSON")]
struct Args {
    /// GSD file to inspect
    file: PathBuf,

    /// Include the enriched CSV rows for every block
    #[arg(long)]
    rows: bool,
}

#[derive(Serialize)]
struct InspectedBlock<'a> {
    #[serde(flatten)]
    block: &'a Block,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows: Option<Vec<String>>,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let contents = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let blocks = GsdParser::parse_str(&contents);
    tracing::info!("{} blocks in {}", blocks.len(), args.file.display());

    let inspected: Vec<InspectedBlock> = blocks
        .iter()
        .map(|block| InspectedBlock {
            block,
            rows: args.rows.then(|| {
                transform_block(block)
                    .into_iter()
                    .map(|row| row.as_str().to_string())
                    .collect()
            }),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&inspected)?);
    Ok(())
}
