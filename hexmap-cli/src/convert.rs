//! Convert command - transcode a map between JSON and text
//!
//! Text maps carry no move budget, so text -> JSON writes the default budget
//! unless --max-moves is given.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hexmap_core::codec;
use hexmap_core::Format;

#[derive(Args)]
pub struct ConvertArgs {
    /// Map to read (format from extension unless --input-format)
    #[arg(long, short, value_name = "FILE")]
    pub input: PathBuf,

    /// Map to write (format from extension unless --format)
    #[arg(long, short, value_name = "FILE")]
    pub output: PathBuf,

    /// Input format override
    #[arg(long)]
    pub input_format: Option<Format>,

    /// Output format override
    #[arg(long)]
    pub format: Option<Format>,

    /// Override the move budget
    #[arg(long)]
    pub max_moves: Option<u32>,
}

/// Run convert command
pub fn run(args: ConvertArgs) -> Result<()> {
    let input_format = args
        .input_format
        .unwrap_or_else(|| Format::from_path(&args.input));
    let output_format = args.format.unwrap_or_else(|| Format::from_path(&args.output));

    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read map: {}", args.input.display()))?;
    let decoded = codec::decode(&content, input_format)
        .with_context(|| format!("Failed to parse map: {}", args.input.display()))?;

    if !decoded.warnings.is_empty() {
        tracing::warn!("{}: skipped {} entries", args.input.display(), decoded.warnings.len());
    }

    let mut doc = decoded.document;
    if let Some(max_moves) = args.max_moves {
        doc.max_moves = max_moves;
    }

    codec::save(&doc, &args.output, output_format)
        .with_context(|| format!("Failed to write map: {}", args.output.display()))?;

    tracing::info!(
        "Converted {} ({:?}) -> {} ({:?}), {} cells",
        args.input.display(),
        input_format,
        args.output.display(),
        output_format,
        doc.board.occupied()
    );

    Ok(())
}
