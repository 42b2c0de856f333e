//! veil_sim - headless battle runner for veil_core
//!
//! Loads a scenario, ticks the battle to completion, feeds scripted
//! commands in on schedule, attempts any post-battle captures and prints
//! the event stream and a summary.
//!
//! Logging goes to stderr and honors `RUST_LOG` (default `info`).

mod cli;
mod report;
mod scenario;

use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use veil_core::{BattleEvent, BattleOrchestrator, BattleState, CaptureAttempt};

use cli::Args;
use scenario::{Scenario, ScenarioError};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let args = cli::parse_args();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "simulation failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), ScenarioError> {
    if args.delta.is_nan() || args.delta <= 0.0 {
        return Err(ScenarioError::Invalid(format!("--delta must be positive, got {}", args.delta)));
    }

    let scenario = Scenario::load(&args.scenario)?;
    let seed = args.seed.unwrap_or(scenario.seed);
    info!(scenario = %args.scenario.display(), seed, "loading battle");

    let mut battle = scenario.build(seed)?;
    if !args.quiet {
        let json = args.json;
        battle.add_observer(move |event: &BattleEvent| print_event(event, json));
    }
    battle.start();

    let mut captures_attempted = false;
    while battle.tick_count() < args.ticks {
        for command in scenario.commands_at(battle.tick_count() + 1) {
            if let Err(err) = battle.submit_command(command) {
                warn!(issuer = %command.issuer, %err, "scripted command rejected");
            }
        }
        battle.tick(args.delta);

        if battle.state() == BattleState::Victory && !captures_attempted {
            captures_attempted = true;
            attempt_captures(&mut battle, &scenario.captures)?;
        }
        if battle.is_over() {
            break;
        }
    }

    if !battle.is_over() {
        warn!(ticks = battle.tick_count(), "battle did not finish within the tick limit");
    }

    let summary = battle.summary();
    if args.json {
        println!("{}", summary.to_json()?);
    } else {
        print!("{}", report::render_summary(&summary));
    }
    Ok(())
}

/// Attempt the scripted captures that target bound monsters
fn attempt_captures(battle: &mut BattleOrchestrator, captures: &[CaptureAttempt]) -> Result<(), ScenarioError> {
    let (ready, missing): (Vec<CaptureAttempt>, Vec<CaptureAttempt>) = captures
        .iter()
        .copied()
        .partition(|attempt| battle.bound().iter().any(|b| b.id == attempt.target));
    for attempt in &missing {
        warn!(target_id = %attempt.target, "capture skipped: monster was never bound");
    }
    if ready.is_empty() {
        return Ok(());
    }

    let reports = battle.attempt_captures(&ready)?;
    for report in &reports {
        info!(
            target_id = %report.target,
            chance = report.calculation.final_chance,
            outcome = ?report.outcome,
            "capture attempted"
        );
    }
    Ok(())
}

fn print_event(event: &BattleEvent, json: bool) {
    if json {
        match serde_json::to_string(event) {
            Ok(line) => println!("{}", line),
            Err(err) => warn!(%err, "failed to encode event"),
        }
    } else {
        println!("{}", report::describe(event));
    }
}
