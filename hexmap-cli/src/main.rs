//! HEXMAP CLI - Command-line interface
//!
//! Commands:
//! - generate: Build a random symmetric map
//! - convert: Transcode between JSON and text maps
//! - inspect: Summarise a map file
//! - survey: Measure generator behaviour over many seeds
//! - serve: Start the editor backend

mod convert;
mod generate;
mod inspect;
mod server;
mod survey;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexmap")]
#[command(about = "HEXMAP symmetric hex map editor and generator")]
struct Cli {
    /// Random seed for reproducible output
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random map
    Generate(generate::GenerateArgs),
    /// Convert a map between formats
    Convert(convert::ConvertArgs),
    /// Print a summary of a map file
    Inspect(inspect::InspectArgs),
    /// Run many generations and report statistics
    Survey(survey::SurveyArgs),
    /// Start the editor backend server
    Serve(server::ServerArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so maps can be piped from stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => generate::run(args, cli.seed),
        Commands::Convert(args) => convert::run(args),
        Commands::Inspect(args) => inspect::run(args),
        Commands::Survey(args) => survey::run(args, cli.seed),
        Commands::Serve(args) => server::run(args, cli.seed),
    }
}
