//! Generate command - build a random symmetric map
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), write_config(), load_prior(), write_output()
//! - Level 3: resolve_format(), report_generation()
//! - Level 4: configuration

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use hexmap_core::codec;
use hexmap_core::{
    BoardState, Format, GenerationReport, GeneratorConfig, MapDocument, MapGenerator, Preserve,
    DEFAULT_MAX_MOVES,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct GenerateArgs {
    /// Board radius (ignored when regenerating with --from)
    #[arg(long, default_value = "4")]
    pub radius: u32,

    /// Move budget stored in the map (defaults to the --from map's, else 100)
    #[arg(long)]
    pub max_moves: Option<u32>,

    /// Existing map to regenerate
    #[arg(long, value_name = "FILE")]
    pub from: Option<PathBuf>,

    /// Tiles kept from --from: none, danger, danger-shield
    #[arg(long, default_value = "none")]
    pub preserve: Preserve,

    /// Generator configuration JSON
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the gold quota
    #[arg(long)]
    pub gold_quota: Option<u32>,

    /// Also save the effective generator configuration as JSON
    #[arg(long, value_name = "FILE")]
    pub write_config: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format: json or text (defaults to the output extension)
    #[arg(long)]
    pub format: Option<Format>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run generate command
///
/// 1. Build generator configuration (and save it if asked)
/// 2. Load the map to regenerate, or start empty
/// 3. Generate
/// 4. Write the result
pub fn run(args: GenerateArgs, seed: Option<u64>) -> Result<()> {
    let config = build_config(&args, seed)?;
    if let Some(path) = &args.write_config {
        write_config(&config, path)?;
    }
    let prior = load_prior(&args)?;

    tracing::info!(
        "Generating radius {} map (preserve={:?}, quota={})",
        prior.board.radius(),
        args.preserve,
        config.gold_quota
    );

    let mut rng = config.rng();
    let generator = MapGenerator::new(config);
    let (board, report) = generator.generate(&prior.board, args.preserve, &mut rng);

    let doc = MapDocument::new(board, args.max_moves.unwrap_or(prior.max_moves));
    write_output(&doc, &args)?;

    report_generation(&report, &doc);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Merge config file, flags and the global seed
fn build_config(args: &GenerateArgs, seed: Option<u64>) -> Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load generator config: {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    if let Some(quota) = args.gold_quota {
        config.gold_quota = quota;
    }
    if let Some(seed) = seed {
        config.seed = Some(seed);
    }

    config.validate()?;
    Ok(config)
}

/// Save the merged configuration so the run can be repeated with --config
fn write_config(config: &GeneratorConfig, path: &Path) -> Result<()> {
    config
        .save(path)
        .with_context(|| format!("Failed to write generator config: {}", path.display()))?;
    tracing::info!("Wrote generator config {}", path.display());
    Ok(())
}

/// Map to regenerate from, or an empty board of the requested radius
fn load_prior(args: &GenerateArgs) -> Result<MapDocument> {
    match &args.from {
        Some(path) => {
            let decoded = codec::load(path)
                .with_context(|| format!("Failed to load map: {}", path.display()))?;
            Ok(decoded.document)
        }
        None => {
            if args.preserve != Preserve::None {
                tracing::warn!("--preserve has no effect without --from");
            }
            Ok(MapDocument::new(BoardState::new(args.radius), DEFAULT_MAX_MOVES))
        }
    }
}

/// Write to the output file, or stdout
fn write_output(doc: &MapDocument, args: &GenerateArgs) -> Result<()> {
    let format = resolve_format(args.format, args.output.as_ref());

    match &args.output {
        Some(path) => {
            codec::save(doc, path, format)
                .with_context(|| format!("Failed to write map: {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{}", codec::encode(doc, format)?),
    }

    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Explicit format wins, then the output extension, then text
fn resolve_format(explicit: Option<Format>, output: Option<&PathBuf>) -> Format {
    explicit
        .or_else(|| output.map(|p| Format::from_path(p)))
        .unwrap_or(Format::Text)
}

fn report_generation(report: &GenerationReport, doc: &MapDocument) {
    let counts = doc.board.counts();

    if !report.connected {
        tracing::warn!(
            "Free cells are not connected after {} danger attempts",
            report.danger_attempts
        );
    }

    tracing::info!(
        "danger={} shield={} gold={} (attempts={}, quota met: {})",
        counts.danger,
        counts.shield,
        counts.gold,
        report.danger_attempts,
        report.quota_met
    );
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> GenerateArgs {
        GenerateArgs {
            radius: 5,
            max_moves: None,
            from: None,
            preserve: Preserve::None,
            config: None,
            gold_quota: None,
            write_config: None,
            output: None,
            format: None,
        }
    }

    #[test]
    fn test_build_config_applies_overrides() {
        let mut a = args();
        a.gold_quota = Some(120);
        let config = build_config(&a, Some(9)).unwrap();
        assert_eq!(config.gold_quota, 120);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_written_config_reloads() {
        let mut a = args();
        a.gold_quota = Some(75);
        let config = build_config(&a, Some(4)).unwrap();

        let path = std::env::temp_dir().join(format!("hexmap-{}-gen.json", std::process::id()));
        write_config(&config, &path).unwrap();
        let reloaded = GeneratorConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(reloaded, config);
        assert_eq!(reloaded.gold_quota, 75);
        assert_eq!(reloaded.seed, Some(4));
    }

    #[test]
    fn test_load_prior_defaults() {
        let prior = load_prior(&args()).unwrap();
        assert_eq!(prior.board.radius(), 5);
        assert!(prior.board.is_empty());
        assert_eq!(prior.max_moves, DEFAULT_MAX_MOVES);
    }

    #[test]
    fn test_resolve_format() {
        let json = PathBuf::from("out.json");
        assert_eq!(resolve_format(None, Some(&json)), Format::Json);
        assert_eq!(resolve_format(Some(Format::Text), Some(&json)), Format::Text);
        assert_eq!(resolve_format(None, None), Format::Text);
    }

    #[test]
    fn test_missing_config_file_errors() {
        let mut a = args();
        a.config = Some(PathBuf::from("/nonexistent/generator.json"));
        assert!(build_config(&a, None).is_err());
    }
}
