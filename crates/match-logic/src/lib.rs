//! Match Logic for Human vs. Strategy Arena
//!
//! Core game logic for the Iterated Prisoner's Dilemma: the strategy
//! catalog, participants, opponent selection and match execution.
//! All randomness flows through an explicit [`SeededRng`].

mod random;
mod error;
mod strategy;
mod participant;
mod catalog;
mod game;

pub use random::SeededRng;
pub use error::{MatchError, ParseMoveError};
pub use strategy::{execute_strategy, Move, StrategyBase};
pub use participant::{AutomatedParticipant, HistoryView, HumanParticipant, Participant};
pub use catalog::{catalog, select_opponent};
pub use game::{run_match, FinalScore, MatchResult, RoundResult, Winner};

/// Payoff matrix for the Prisoner's Dilemma
/// Returns (score_a, score_b)
pub fn payoff(a: Move, b: Move) -> (u8, u8) {
    match (a, b) {
        (Move::Cooperate, Move::Cooperate) => (3, 3),
        (Move::Cooperate, Move::Defect) => (0, 5),
        (Move::Defect, Move::Cooperate) => (5, 0),
        (Move::Defect, Move::Defect) => (1, 1),
    }
}
