//! Inspect command - summarise a map file
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: summarize()
//! - Level 3: print_text_summary(), print_json_summary()

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use hexmap_core::codec;
use hexmap_core::symmetry::orbit_count;
use hexmap_core::{cell_count, Decoded};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct InspectArgs {
    /// Map file to inspect
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Output summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Map summary
#[derive(Clone, Debug, Serialize)]
struct MapSummary {
    radius: u32,
    cells: usize,
    orbits: usize,
    occupied: usize,
    max_moves: u32,
    danger: u32,
    shield: u32,
    gold: u32,
    connected: bool,
    warnings: Vec<String>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run inspect command
pub fn run(args: InspectArgs) -> Result<()> {
    let decoded = codec::load(&args.input)
        .with_context(|| format!("Failed to load map: {}", args.input.display()))?;

    let summary = summarize(&decoded);

    if args.json {
        print_json_summary(&summary)
    } else {
        print_text_summary(&summary);
        Ok(())
    }
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn summarize(decoded: &Decoded) -> MapSummary {
    let board = &decoded.document.board;
    let counts = board.counts();

    MapSummary {
        radius: board.radius(),
        cells: cell_count(board.radius()),
        orbits: orbit_count(board.radius()),
        occupied: board.occupied(),
        max_moves: decoded.document.max_moves,
        danger: counts.danger,
        shield: counts.shield,
        gold: counts.gold,
        connected: board.is_connected(),
        warnings: decoded.warnings.iter().map(|w| w.to_string()).collect(),
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn print_json_summary(summary: &MapSummary) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

fn print_text_summary(summary: &MapSummary) {
    println!("\n=== Map Summary ===");
    println!("Radius:      {} ({} cells, {} orbits)", summary.radius, summary.cells, summary.orbits);
    println!("Max moves:   {}", summary.max_moves);
    println!("Occupied:    {}", summary.occupied);
    println!("Danger:      {}", summary.danger);
    println!("Shield:      {}", summary.shield);
    println!("Gold units:  {}", summary.gold);
    println!("Connected:   {}", if summary.connected { "yes" } else { "no" });

    if !summary.warnings.is_empty() {
        println!("\nSkipped entries:");
        for warning in &summary.warnings {
            println!("  {}", warning);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
