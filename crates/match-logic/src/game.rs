//! Match execution engine

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use crate::error::MatchError;
use crate::participant::{HistoryView, Participant};
use crate::random::SeededRng;
use crate::strategy::Move;
use crate::payoff;

/// Upper bound on history preallocated before the first turn is played
const MAX_PREALLOCATED_TURNS: usize = 1024;

/// Result of a single round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round: u32,
    pub move_a: Move,
    pub move_b: Move,
    pub score_a: u8,
    pub score_b: u8,
    pub cumulative_a: u64,
    pub cumulative_b: u64,
}

/// Which side came out ahead
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    First,
    Second,
    Tie,
}

impl Winner {
    fn from_scores(a: u64, b: u64) -> Self {
        match a.cmp(&b) {
            Ordering::Greater => Winner::First,
            Ordering::Less => Winner::Second,
            Ordering::Equal => Winner::Tie,
        }
    }
}

/// Score pair, displayed as `(a, b)`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScore(pub u64, pub u64);

impl fmt::Display for FinalScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// Result of a complete match
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchResult {
    /// Participant names, in play order
    pub players: [String; 2],
    pub rounds: Vec<RoundResult>,
    pub final_score: FinalScore,
    pub winner: Winner,
}

impl MatchResult {
    /// Name of the winning participant, `None` on a tie
    pub fn winner_name(&self) -> Option<&str> {
        match self.winner {
            Winner::First => Some(&self.players[0]),
            Winner::Second => Some(&self.players[1]),
            Winner::Tie => None,
        }
    }

    pub fn history_a(&self) -> Vec<Move> {
        self.rounds.iter().map(|r| r.move_a).collect()
    }

    pub fn history_b(&self) -> Vec<Move> {
        self.rounds.iter().map(|r| r.move_b).collect()
    }
}

/// Run a complete match between two participants
///
/// Turns are played in sequence. Within a turn both sides see only the
/// earlier turns; `first` is asked before `second`. Any participant error
/// abandons the match.
///
/// # Arguments
/// * `first` - First player, reported first in the score pair
/// * `second` - Second player
/// * `turns` - Number of turns to play
/// * `rng` - Random source for stochastic strategies
pub fn run_match(
    first: &mut dyn Participant,
    second: &mut dyn Participant,
    turns: u32,
    rng: &mut SeededRng,
) -> Result<MatchResult, MatchError> {
    let capacity = (turns as usize).min(MAX_PREALLOCATED_TURNS);
    let mut history_a: Vec<Move> = Vec::with_capacity(capacity);
    let mut history_b: Vec<Move> = Vec::with_capacity(capacity);
    let mut rounds: Vec<RoundResult> = Vec::with_capacity(capacity);
    let mut total_a = 0u64;
    let mut total_b = 0u64;

    log::debug!("{} vs {} over {} turns", first.name(), second.name(), turns);

    for round in 0..turns {
        let move_a = first.next_move(
            HistoryView { turn: round, own: &history_a, opponent: &history_b },
            rng,
        )?;
        let move_b = second.next_move(
            HistoryView { turn: round, own: &history_b, opponent: &history_a },
            rng,
        )?;

        // Calculate payoffs
        let (score_a, score_b) = payoff(move_a, move_b);
        total_a += u64::from(score_a);
        total_b += u64::from(score_b);

        log::debug!("turn {}: {} {} -> {} {}", round + 1, move_a, move_b, total_a, total_b);

        rounds.push(RoundResult {
            round,
            move_a,
            move_b,
            score_a,
            score_b,
            cumulative_a: total_a,
            cumulative_b: total_b,
        });

        history_a.push(move_a);
        history_b.push(move_b);
    }

    Ok(MatchResult {
        players: [first.name().to_string(), second.name().to_string()],
        rounds,
        final_score: FinalScore(total_a, total_b),
        winner: Winner::from_scores(total_a, total_b),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::{AutomatedParticipant, HumanParticipant};
    use crate::strategy::StrategyBase;
    use proptest::prelude::*;
    use std::io::Cursor;

    fn auto(base: StrategyBase) -> AutomatedParticipant {
        AutomatedParticipant::new(base)
    }

    fn human(moves: &str) -> HumanParticipant<Cursor<Vec<u8>>, Vec<u8>> {
        HumanParticipant::new("me", Cursor::new(moves.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_match_determinism() {
        let mut rng1 = SeededRng::new(42);
        let mut rng2 = SeededRng::new(42);

        let result1 = run_match(
            &mut auto(StrategyBase::TitForTat),
            &mut auto(StrategyBase::Random),
            30,
            &mut rng1,
        )
        .unwrap();
        let result2 = run_match(
            &mut auto(StrategyBase::TitForTat),
            &mut auto(StrategyBase::Random),
            30,
            &mut rng2,
        )
        .unwrap();

        assert_eq!(result1.rounds, result2.rounds);
        assert_eq!(result1.final_score, result2.final_score);
    }

    #[test]
    fn test_cooperate_vs_cooperate() {
        let mut rng = SeededRng::new(42);
        let result = run_match(
            &mut auto(StrategyBase::Cooperator),
            &mut auto(StrategyBase::Cooperator),
            10,
            &mut rng,
        )
        .unwrap();

        // Both always cooperate, should get 3 points each per round
        for round in &result.rounds {
            assert_eq!(round.move_a, Move::Cooperate);
            assert_eq!(round.move_b, Move::Cooperate);
            assert_eq!(round.score_a, 3);
            assert_eq!(round.score_b, 3);
        }

        assert_eq!(result.final_score, FinalScore(30, 30));
        assert_eq!(result.winner, Winner::Tie);
        assert_eq!(result.winner_name(), None);
    }

    #[test]
    fn test_defect_vs_cooperate() {
        let mut rng = SeededRng::new(42);
        let result = run_match(
            &mut auto(StrategyBase::Defector),
            &mut auto(StrategyBase::Cooperator),
            8,
            &mut rng,
        )
        .unwrap();

        for round in &result.rounds {
            assert_eq!(round.score_a, 5);
            assert_eq!(round.score_b, 0);
        }

        assert_eq!(result.final_score, FinalScore(40, 0));
        assert_eq!(result.winner_name(), Some("Defector"));
    }

    #[test]
    fn test_tft_vs_always_defect() {
        let mut rng = SeededRng::new(42);
        let result = run_match(
            &mut auto(StrategyBase::TitForTat),
            &mut auto(StrategyBase::Defector),
            6,
            &mut rng,
        )
        .unwrap();

        // Round 0: TFT cooperates, AD defects
        assert_eq!(result.rounds[0].move_a, Move::Cooperate);
        assert_eq!(result.rounds[0].move_b, Move::Defect);

        // Round 1+: TFT retaliates, both defect
        for round in result.rounds.iter().skip(1) {
            assert_eq!(round.move_a, Move::Defect);
            assert_eq!(round.move_b, Move::Defect);
        }
        assert_eq!(result.final_score, FinalScore(5, 10));
        assert_eq!(result.winner, Winner::Second);
    }

    #[test]
    fn test_cumulative_scores() {
        let mut rng = SeededRng::new(42);
        let result = run_match(
            &mut auto(StrategyBase::Random),
            &mut auto(StrategyBase::Alternator),
            25,
            &mut rng,
        )
        .unwrap();

        let mut expected_a = 0u64;
        let mut expected_b = 0u64;

        for round in &result.rounds {
            expected_a += round.score_a as u64;
            expected_b += round.score_b as u64;
            assert_eq!(round.cumulative_a, expected_a);
            assert_eq!(round.cumulative_b, expected_b);
        }
        assert_eq!(result.final_score, FinalScore(expected_a, expected_b));
    }

    #[test]
    fn test_strategy_against_scripted_human() {
        let mut rng = SeededRng::new(0);
        let mut me = human("D\nC\nC\n");
        let result = run_match(&mut auto(StrategyBase::TitForTat), &mut me, 3, &mut rng).unwrap();

        assert_eq!(result.history_a(), vec![Move::Cooperate, Move::Defect, Move::Cooperate]);
        assert_eq!(result.history_b(), vec![Move::Defect, Move::Cooperate, Move::Cooperate]);
        // (C,D)=0/5, (D,C)=5/0, (C,C)=3/3
        assert_eq!(result.final_score, FinalScore(8, 8));
        assert_eq!(result.winner, Winner::Tie);
        assert_eq!(result.players[1], "Human: me");
    }

    #[test]
    fn test_zero_turns_is_empty_match() {
        let mut rng = SeededRng::new(0);
        let mut me = human("");
        let result = run_match(&mut auto(StrategyBase::Defector), &mut me, 0, &mut rng).unwrap();
        assert!(result.rounds.is_empty());
        assert_eq!(result.final_score, FinalScore(0, 0));
        assert_eq!(result.winner, Winner::Tie);
    }

    #[test]
    fn test_aborted_input_abandons_match() {
        let mut rng = SeededRng::new(0);
        let mut me = human("C\n");
        let err = run_match(&mut auto(StrategyBase::Cooperator), &mut me, 3, &mut rng).unwrap_err();
        assert!(matches!(err, MatchError::InputClosed { turn: 2, .. }));
    }

    #[test]
    fn test_huge_turn_count_waits_for_input() {
        let mut rng = SeededRng::new(0);
        let mut me = human("");
        let err = run_match(&mut auto(StrategyBase::Cooperator), &mut me, 4_000_000_000, &mut rng)
            .unwrap_err();
        assert!(matches!(err, MatchError::InputClosed { turn: 1, .. }));
    }

    #[test]
    fn test_scores_wider_than_u32() {
        let high = u64::from(u32::MAX) + 5;
        assert_eq!(Winner::from_scores(high, u64::from(u32::MAX)), Winner::First);
        assert_eq!(FinalScore(high, 0).to_string(), "(4294967300, 0)");
    }

    #[test]
    fn test_result_serializes() {
        let mut rng = SeededRng::new(0);
        let result = run_match(
            &mut auto(StrategyBase::Cooperator),
            &mut auto(StrategyBase::Defector),
            2,
            &mut rng,
        )
        .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["players"][0], "Cooperator");
        assert_eq!(json["final_score"], serde_json::json!([0, 10]));
        assert_eq!(json["winner"], "Second");
    }

    proptest! {
        #[test]
        fn prop_turns_and_scores_consistent(
            turns in 1u32..120,
            seed in any::<u64>(),
            a in 0usize..StrategyBase::ALL.len(),
            b in 0usize..StrategyBase::ALL.len(),
        ) {
            let mut rng = SeededRng::new(seed);
            let result = run_match(
                &mut auto(StrategyBase::ALL[a]),
                &mut auto(StrategyBase::ALL[b]),
                turns,
                &mut rng,
            ).unwrap();

            prop_assert_eq!(result.rounds.len(), turns as usize);
            let sum_a: u64 = result.rounds.iter().map(|r| r.score_a as u64).sum();
            let sum_b: u64 = result.rounds.iter().map(|r| r.score_b as u64).sum();
            prop_assert_eq!(result.final_score, FinalScore(sum_a, sum_b));
            prop_assert_eq!(result.winner, Winner::from_scores(sum_a, sum_b));
        }

        #[test]
        fn prop_scripted_human_plays_every_turn(moves in proptest::collection::vec(any::<bool>(), 1..40)) {
            let script: String = moves.iter().map(|d| if *d { "D\n" } else { "C\n" }).collect();
            let mut me = human(&script);
            let mut rng = SeededRng::new(1);
            let result = run_match(
                &mut auto(StrategyBase::Grudger),
                &mut me,
                moves.len() as u32,
                &mut rng,
            ).unwrap();

            let expected: Vec<Move> = moves
                .iter()
                .map(|d| if *d { Move::Defect } else { Move::Cooperate })
                .collect();
            prop_assert_eq!(result.history_b(), expected);
        }
    }
}
