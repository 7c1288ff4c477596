//! Survey command - measure generator behaviour over many seeds
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_generations(), summarize()
//! - Level 3: run_single(), print_summary()
//! - Level 4: configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use hexmap_core::{cell_count, BoardState, GeneratorConfig, MapGenerator, Preserve};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SurveyArgs {
    /// Board radius
    #[arg(long, default_value = "4")]
    pub radius: u32,

    /// Number of generations
    #[arg(long, default_value = "200")]
    pub runs: u64,

    /// Generator configuration JSON
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Outcome of one generation
#[derive(Clone, Copy, Debug)]
struct RunResult {
    connected: bool,
    quota_met: bool,
    danger_attempts: u32,
    danger_share: f64,
    gold: u32,
}

/// Aggregate over all runs
#[derive(Clone, Debug, Serialize)]
struct SurveySummary {
    radius: u32,
    runs: u64,
    base_seed: u64,
    connected_rate: f64,
    quota_rate: f64,
    avg_danger_share: f64,
    avg_danger_attempts: f64,
    avg_gold: f64,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run survey command
///
/// 1. Load generator configuration
/// 2. Generate in parallel, one derived seed per run
/// 3. Aggregate and print
pub fn run(args: SurveyArgs, seed: Option<u64>) -> Result<()> {
    if args.runs == 0 {
        anyhow::bail!("--runs must be at least 1");
    }

    let config = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load generator config: {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    let base_seed = seed.or(config.seed).unwrap_or_else(rand::random);

    tracing::info!(
        "Surveying {} generations at radius {} (base seed {})",
        args.runs,
        args.radius,
        base_seed
    );

    let results = run_generations(&config, args.radius, args.runs, base_seed);
    let summary = summarize(args.radius, base_seed, &results);

    print_summary(&summary, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn run_generations(
    config: &GeneratorConfig,
    radius: u32,
    runs: u64,
    base_seed: u64,
) -> Vec<RunResult> {
    let generator = MapGenerator::new(config.clone());
    let empty = BoardState::new(radius);

    (0..runs)
        .into_par_iter()
        .map(|i| run_single(&generator, &empty, base_seed.wrapping_add(i)))
        .collect()
}

fn summarize(radius: u32, base_seed: u64, results: &[RunResult]) -> SurveySummary {
    let n = results.len().max(1) as f64;
    let rate = |pred: fn(&RunResult) -> bool| results.iter().filter(|r| pred(r)).count() as f64 / n;

    SurveySummary {
        radius,
        runs: results.len() as u64,
        base_seed,
        connected_rate: rate(|r| r.connected),
        quota_rate: rate(|r| r.quota_met),
        avg_danger_share: results.iter().map(|r| r.danger_share).sum::<f64>() / n,
        avg_danger_attempts: results.iter().map(|r| r.danger_attempts as f64).sum::<f64>() / n,
        avg_gold: results.iter().map(|r| r.gold as f64).sum::<f64>() / n,
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn run_single(generator: &MapGenerator, empty: &BoardState, seed: u64) -> RunResult {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let (board, report) = generator.generate(empty, Preserve::None, &mut rng);
    let counts = board.counts();

    RunResult {
        connected: report.connected,
        quota_met: report.quota_met,
        danger_attempts: report.danger_attempts,
        danger_share: counts.danger as f64 / cell_count(board.radius()) as f64,
        gold: counts.gold,
    }
}

fn print_summary(summary: &SurveySummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!("\n=== Survey Results ===");
    println!("Radius:            {}", summary.radius);
    println!("Runs:              {} (base seed {})", summary.runs, summary.base_seed);
    println!("Connected:         {:.1}%", summary.connected_rate * 100.0);
    println!("Quota met:         {:.1}%", summary.quota_rate * 100.0);
    println!("Danger share:      {:.1}%", summary.avg_danger_share * 100.0);
    println!("Danger attempts:   {:.2}", summary.avg_danger_attempts);
    println!("Gold units:        {:.1}", summary.avg_gold);

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survey_is_reproducible() {
        let config = GeneratorConfig::default();
        let a = summarize(4, 3, &run_generations(&config, 4, 16, 3));
        let b = summarize(4, 3, &run_generations(&config, 4, 16, 3));
        assert_eq!(a.connected_rate, b.connected_rate);
        assert_eq!(a.avg_gold, b.avg_gold);
        assert_eq!(a.runs, 16);
    }

    #[test]
    fn test_survey_rates_in_range() {
        let results = run_generations(&GeneratorConfig::default(), 7, 20, 42);
        let summary = summarize(7, 42, &results);
        assert!((0.0..=1.0).contains(&summary.connected_rate));
        assert_eq!(summary.quota_rate, 1.0);
        assert!(summary.avg_danger_share > 0.0 && summary.avg_danger_share < 1.0);
    }

    #[test]
    fn test_summarize_counts() {
        let results = [
            RunResult { connected: true, quota_met: true, danger_attempts: 1, danger_share: 0.2, gold: 300 },
            RunResult { connected: false, quota_met: true, danger_attempts: 10, danger_share: 0.4, gold: 302 },
        ];
        let summary = summarize(5, 0, &results);
        assert_eq!(summary.connected_rate, 0.5);
        assert_eq!(summary.quota_rate, 1.0);
        assert!((summary.avg_danger_share - 0.3).abs() < 1e-9);
        assert_eq!(summary.avg_danger_attempts, 5.5);
    }
}
