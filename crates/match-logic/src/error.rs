//! Errors raised while selecting opponents and playing matches

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("strategy catalog is empty")]
    EmptyCatalog,

    #[error("input closed before {participant} chose a move for turn {turn}")]
    InputClosed { participant: String, turn: u32 },

    #[error("i/o error during match: {0}")]
    Io(#[from] std::io::Error),
}

/// Text that is not a Prisoner's Dilemma move
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("expected C or D, got {0:?}")]
pub struct ParseMoveError(pub String);
