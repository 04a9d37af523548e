//! Strategy definitions and execution

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use crate::error::ParseMoveError;
use crate::random::SeededRng;

/// A move in the Prisoner's Dilemma
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Cooperate,
    Defect,
}

impl Move {
    pub fn flip(self) -> Self {
        match self {
            Move::Cooperate => Move::Defect,
            Move::Defect => Move::Cooperate,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Cooperate => f.write_str("C"),
            Move::Defect => f.write_str("D"),
        }
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "cooperate" => Ok(Move::Cooperate),
            "d" | "defect" => Ok(Move::Defect),
            other => Err(ParseMoveError(other.to_string())),
        }
    }
}

/// Automated strategies available for opponent selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyBase {
    /// Always cooperate, never defect.
    Cooperator,
    /// Always defect, never cooperate.
    Defector,
    /// Copy opponent's last move. Start with cooperate.
    TitForTat,
    /// Tit-for-Tat but start with defect.
    SuspiciousTitForTat,
    /// Defect only if opponent defected twice in a row.
    TitForTwoTats,
    /// Defect if opponent defected in either of the last two turns.
    TwoTitsForTat,
    /// Cooperate until opponent defects once, then always defect.
    Grudger,
    /// Win-stay, lose-switch. Repeat move if good outcome.
    WinStayLoseShift,
    /// Random choice each round, even odds.
    Random,
    /// Retaliate with increasing defection streaks, then forgive.
    Gradual,
    /// Alternate between cooperate and defect.
    Alternator,
    /// Repeat the cycle C, C, D.
    CyclerCCD,
    /// Play the opposite of the opponent's last move. Start with defect.
    Bully,
    /// Open with D, C, C and exploit opponents that never retaliate.
    Prober,
    /// Cooperate while the opponent defects at most 10% of the time.
    Forgiver,
    /// Defect if the opponent defected in any of the last three turns.
    HardTitForTat,
}

impl StrategyBase {
    /// Catalog of every automated strategy, in a stable order.
    pub const ALL: [StrategyBase; 16] = [
        StrategyBase::Cooperator,
        StrategyBase::Defector,
        StrategyBase::TitForTat,
        StrategyBase::SuspiciousTitForTat,
        StrategyBase::TitForTwoTats,
        StrategyBase::TwoTitsForTat,
        StrategyBase::Grudger,
        StrategyBase::WinStayLoseShift,
        StrategyBase::Random,
        StrategyBase::Gradual,
        StrategyBase::Alternator,
        StrategyBase::CyclerCCD,
        StrategyBase::Bully,
        StrategyBase::Prober,
        StrategyBase::Forgiver,
        StrategyBase::HardTitForTat,
    ];

    /// Display name shown to the player
    pub fn name(self) -> &'static str {
        match self {
            StrategyBase::Cooperator => "Cooperator",
            StrategyBase::Defector => "Defector",
            StrategyBase::TitForTat => "Tit For Tat",
            StrategyBase::SuspiciousTitForTat => "Suspicious Tit For Tat",
            StrategyBase::TitForTwoTats => "Tit For 2 Tats",
            StrategyBase::TwoTitsForTat => "Two Tits For Tat",
            StrategyBase::Grudger => "Grudger",
            StrategyBase::WinStayLoseShift => "Win-Stay Lose-Shift",
            StrategyBase::Random => "Random: 0.5",
            StrategyBase::Gradual => "Gradual",
            StrategyBase::Alternator => "Alternator",
            StrategyBase::CyclerCCD => "Cycler CCD",
            StrategyBase::Bully => "Bully",
            StrategyBase::Prober => "Prober",
            StrategyBase::Forgiver => "Forgiver",
            StrategyBase::HardTitForTat => "Hard Tit For Tat",
        }
    }

    /// Get a human-readable description of a strategy
    pub fn description(self) -> &'static str {
        match self {
            StrategyBase::Cooperator => "Never defects. Always cooperates.",
            StrategyBase::Defector => "Never cooperates. Always defects.",
            StrategyBase::TitForTat => "Copies opponent's last move. Starts by cooperating.",
            StrategyBase::SuspiciousTitForTat => "Like Tit-for-Tat, but starts with defect.",
            StrategyBase::TitForTwoTats => "Only retaliates after two consecutive defections.",
            StrategyBase::TwoTitsForTat => "Answers one defection with two.",
            StrategyBase::Grudger => "Cooperates until betrayed, then always defects.",
            StrategyBase::WinStayLoseShift => "Repeats move if outcome was good, switches if bad.",
            StrategyBase::Random => "Randomly cooperates or defects each round.",
            StrategyBase::Gradual => "Retaliates with increasing severity, then forgives.",
            StrategyBase::Alternator => "Alternates cooperate and defect. Starts by cooperating.",
            StrategyBase::CyclerCCD => "Cooperates twice, defects once, and repeats.",
            StrategyBase::Bully => "Plays the opposite of the opponent's last move.",
            StrategyBase::Prober => "Probes with D, C, C and exploits pushovers.",
            StrategyBase::Forgiver => "Tolerates up to 10% defections before defecting.",
            StrategyBase::HardTitForTat => "Defects if betrayed in any of the last three turns.",
        }
    }

}

impl fmt::Display for StrategyBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Execute a strategy for one round
///
/// # Arguments
/// * `strategy` - The strategy to execute
/// * `opponent_history` - Opponent's past moves
/// * `my_history` - Our past moves
/// * `round` - Current round number (0-indexed)
/// * `rng` - Random number generator shared for the match
pub fn execute_strategy(
    strategy: StrategyBase,
    opponent_history: &[Move],
    my_history: &[Move],
    round: u32,
    rng: &mut SeededRng,
) -> Move {
    match strategy {
        StrategyBase::Cooperator => Move::Cooperate,
        StrategyBase::Defector => Move::Defect,
        StrategyBase::TitForTat => {
            opponent_history.last().copied().unwrap_or(Move::Cooperate)
        }
        StrategyBase::SuspiciousTitForTat => {
            opponent_history.last().copied().unwrap_or(Move::Defect)
        }
        StrategyBase::TitForTwoTats => execute_tit_for_two_tats(opponent_history),
        StrategyBase::TwoTitsForTat => defected_within(opponent_history, 2),
        StrategyBase::Grudger => defected_within(opponent_history, opponent_history.len()),
        StrategyBase::WinStayLoseShift => execute_pavlov(opponent_history, my_history),
        StrategyBase::Random => execute_random(rng),
        StrategyBase::Gradual => execute_gradual(opponent_history, my_history),
        StrategyBase::Alternator => {
            my_history.last().map(|m| m.flip()).unwrap_or(Move::Cooperate)
        }
        StrategyBase::CyclerCCD => {
            if round % 3 == 2 {
                Move::Defect
            } else {
                Move::Cooperate
            }
        }
        StrategyBase::Bully => {
            opponent_history.last().map(|m| m.flip()).unwrap_or(Move::Defect)
        }
        StrategyBase::Prober => execute_prober(opponent_history),
        StrategyBase::Forgiver => execute_forgiver(opponent_history),
        StrategyBase::HardTitForTat => defected_within(opponent_history, 3),
    }
}

/// Defect if the opponent defected in any of its last `window` moves
fn defected_within(opponent_history: &[Move], window: usize) -> Move {
    let start = opponent_history.len().saturating_sub(window);
    if opponent_history[start..].contains(&Move::Defect) {
        Move::Defect
    } else {
        Move::Cooperate
    }
}

/// Pavlov: Win-stay, lose-switch
/// - If last round was good (3+ points), repeat move
/// - If last round was bad (<3 points), switch move
fn execute_pavlov(opponent_history: &[Move], my_history: &[Move]) -> Move {
    let (Some(my_last), Some(opp_last)) = (my_history.last(), opponent_history.last()) else {
        return Move::Cooperate; // Start with cooperate
    };

    // Calculate what we scored last round
    let (my_score, _) = crate::payoff(*my_last, *opp_last);

    if my_score >= 3 {
        *my_last
    } else {
        my_last.flip()
    }
}

/// Random: even odds each round
fn execute_random(rng: &mut SeededRng) -> Move {
    if rng.next_percent() < 50 {
        Move::Cooperate
    } else {
        Move::Defect
    }
}

/// Tit-for-Two-Tats: Only defect if opponent defected twice in a row
fn execute_tit_for_two_tats(opponent_history: &[Move]) -> Move {
    if opponent_history.len() < 2 {
        return Move::Cooperate;
    }

    let last_two = &opponent_history[opponent_history.len() - 2..];
    if last_two[0] == Move::Defect && last_two[1] == Move::Defect {
        Move::Defect
    } else {
        Move::Cooperate
    }
}

/// Gradual: Escalating retaliation
/// After N opponent defections, player should have made N(N+1)/2 total defections
fn execute_gradual(opponent_history: &[Move], my_history: &[Move]) -> Move {
    let their_defections = count_defections(opponent_history);
    let my_defections = count_defections(my_history);

    // Expected total defections: 1 + 2 + ... + N = N(N+1)/2
    let expected = their_defections * (their_defections + 1) / 2;

    if my_defections < expected {
        Move::Defect
    } else {
        Move::Cooperate
    }
}

/// Prober: open D, C, C; if the opponent cooperated on turns 2 and 3
/// it never retaliates, so defect forever. Otherwise play Tit-for-Tat.
fn execute_prober(opponent_history: &[Move]) -> Move {
    match opponent_history.len() {
        0 => Move::Defect,
        1 | 2 => Move::Cooperate,
        _ => {
            if opponent_history[1] == Move::Cooperate && opponent_history[2] == Move::Cooperate {
                Move::Defect
            } else {
                opponent_history[opponent_history.len() - 1]
            }
        }
    }
}

/// Forgiver: defect once opponent defections exceed a tenth of its moves
fn execute_forgiver(opponent_history: &[Move]) -> Move {
    if count_defections(opponent_history) * 10 > opponent_history.len() {
        Move::Defect
    } else {
        Move::Cooperate
    }
}

fn count_defections(history: &[Move]) -> usize {
    history.iter().filter(|m| **m == Move::Defect).count()
}
