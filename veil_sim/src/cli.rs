//! Command-line interface for the battle simulator

use clap::Parser;
use std::path::PathBuf;

/// Run a VeilBreakers battle headless from a scenario file
#[derive(Parser, Debug)]
#[command(name = "veil_sim")]
#[command(about = "Headless VeilBreakers battle simulator")]
#[command(version)]
pub struct Args {
    /// Scenario TOML describing the parties and scripted commands
    #[arg(long, value_name = "SCENARIO_FILE")]
    pub scenario: PathBuf,

    /// RNG seed; overrides the scenario's seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Give up after this many ticks
    #[arg(long, default_value = "10000")]
    pub ticks: u64,

    /// Seconds per tick
    #[arg(long, default_value = "0.1")]
    pub delta: f64,

    /// Print events and the summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Only print the summary
    #[arg(long)]
    pub quiet: bool,
}

pub fn parse_args() -> Args {
    Args::parse()
}
