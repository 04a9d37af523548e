//! Command-line arguments and their resolution into a match configuration

use std::ffi::OsString;
use std::num::ParseIntError;

use clap::Parser;
use thiserror::Error;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "human-match", version)]
#[command(about = "Play an Iterated Prisoner's Dilemma match against a randomly chosen strategy")]
pub struct Args {
    /// The name of the human strategy
    #[arg(short = 'n', value_name = "NAME", default_value = "me")]
    pub name: String,

    /// The number of turns
    #[arg(short = 't', value_name = "TURNS", default_value = "5", allow_hyphen_values = true)]
    pub turns: String,

    /// Seed for opponent selection and random strategies
    #[arg(short = 's', long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// List the available strategies and exit
    #[arg(short = 'l', long)]
    pub list: bool,
}

/// Everything needed to run one match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig {
    pub name: String,
    pub turns: u32,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Play(MatchConfig),
    ListStrategies,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("turn count {value:?} is not an integer: {source}")]
    TurnsNotInteger { value: String, source: ParseIntError },

    #[error("turn count must be at least 1, got {0}")]
    TurnsNotPositive(i64),

    #[error("turn count {0} is too large")]
    TurnsTooLarge(i64),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    /// Help, version, or a malformed command line; clap renders these
    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Args {
    pub fn resolve(&self) -> Result<Invocation, ConfigError> {
        if self.list {
            return Ok(Invocation::ListStrategies);
        }

        Ok(Invocation::Play(MatchConfig {
            name: self.name.clone(),
            turns: parse_turns(&self.turns)?,
            seed: self.seed,
        }))
    }
}

/// Parse a full argument vector (program name first)
pub fn resolve<I, T>(argv: I) -> Result<Invocation, ResolveError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = Args::try_parse_from(argv)?;
    Ok(args.resolve()?)
}

fn parse_turns(raw: &str) -> Result<u32, ConfigError> {
    let turns: i64 = raw.trim().parse().map_err(|source| ConfigError::TurnsNotInteger {
        value: raw.to_string(),
        source,
    })?;
    if turns < 1 {
        return Err(ConfigError::TurnsNotPositive(turns));
    }
    u32::try_from(turns).map_err(|_| ConfigError::TurnsTooLarge(turns))
}
