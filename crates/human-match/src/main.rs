//! Play one Iterated Prisoner's Dilemma match against a random strategy.
//!
//! Usage:
//!     human-match [-h] [-n NAME] [-t TURNS] [-s SEED]

mod cli;
mod report;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use match_logic::{catalog, run_match, select_opponent, HumanParticipant, MatchResult, SeededRng, StrategyBase};

use crate::cli::{Invocation, MatchConfig, ResolveError};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let invocation = match cli::resolve(std::env::args_os()) {
        Ok(invocation) => invocation,
        // Prints help (exit 0) or usage (exit 2)
        Err(ResolveError::Usage(err)) => err.exit(),
        Err(ResolveError::Config(err)) => {
            eprintln!("Error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let outcome = match invocation {
        Invocation::ListStrategies => write_stdout(&report::catalog_listing(catalog())),
        Invocation::Play(config) => {
            let stdin = io::stdin();
            play(&config, catalog(), stdin.lock(), io::stderr())
                .and_then(|result| write_stdout(&format!("{}\n", report::summary(&result))))
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// Select an opponent from `catalog` and play it against the human
///
/// Moves are read from `input`; prompts go to `prompts`.
fn play<R: BufRead, W: Write>(
    config: &MatchConfig,
    catalog: &[StrategyBase],
    input: R,
    prompts: W,
) -> Result<MatchResult> {
    let mut rng = match config.seed {
        Some(seed) => SeededRng::new(seed),
        None => SeededRng::from_entropy(),
    };

    let mut opponent = select_opponent(catalog, &mut rng).context("could not select an opponent")?;
    let mut me = HumanParticipant::new(config.name.clone(), input, prompts);

    log::info!("playing {} turns as {}", config.turns, config.name);
    let result = run_match(&mut opponent, &mut me, config.turns, &mut rng)
        .context("match abandoned")?;

    log::debug!("match record: {}", serde_json::to_string(&result)?);
    Ok(result)
}

fn write_stdout(text: &str) -> Result<()> {
    let mut out = io::stdout().lock();
    out.write_all(text.as_bytes()).context("could not write to stdout")?;
    out.flush().context("could not write to stdout")
}
