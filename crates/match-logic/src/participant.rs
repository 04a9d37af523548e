//! Match participants: automated strategies and the interactive human

use std::io::{BufRead, Write};

use crate::error::MatchError;
use crate::random::SeededRng;
use crate::strategy::{execute_strategy, Move, StrategyBase};

/// What a participant may look at before choosing a move
#[derive(Clone, Copy, Debug)]
pub struct HistoryView<'a> {
    /// Turn being played (0-indexed)
    pub turn: u32,
    /// Our past moves
    pub own: &'a [Move],
    /// Opponent's past moves
    pub opponent: &'a [Move],
}

/// Anything that can produce the next move given the match history
pub trait Participant {
    /// Identifier used when reporting the match
    fn name(&self) -> &str;

    /// Choose this turn's move from earlier turns only; the opposing move
    /// for the same turn is never visible.
    fn next_move(&mut self, view: HistoryView<'_>, rng: &mut SeededRng) -> Result<Move, MatchError>;
}

/// A catalog strategy playing by its own fixed rule
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AutomatedParticipant {
    strategy: StrategyBase,
}

impl AutomatedParticipant {
    pub fn new(strategy: StrategyBase) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> StrategyBase {
        self.strategy
    }
}

impl Participant for AutomatedParticipant {
    fn name(&self) -> &str {
        self.strategy.name()
    }

    fn next_move(&mut self, view: HistoryView<'_>, rng: &mut SeededRng) -> Result<Move, MatchError> {
        Ok(execute_strategy(self.strategy, view.opponent, view.own, view.turn, rng))
    }
}

/// A person typing moves at a prompt
///
/// Each turn the previous outcome is echoed, then one line is read.
/// Lines that are not a move are rejected and the prompt repeats.
pub struct HumanParticipant<R, W> {
    name: String,
    label: String,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> HumanParticipant<R, W> {
    pub fn new(name: impl Into<String>, input: R, output: W) -> Self {
        let name = name.into();
        let label = format!("Human: {}", name);
        Self { name, label, input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Participant for HumanParticipant<R, W> {
    fn name(&self) -> &str {
        &self.label
    }

    fn next_move(&mut self, view: HistoryView<'_>, _rng: &mut SeededRng) -> Result<Move, MatchError> {
        if let (Some(mine), Some(theirs)) = (view.own.last(), view.opponent.last()) {
            writeln!(
                self.output,
                "Turn {}: {} played {}, opponent played {}",
                view.turn, self.name, mine, theirs
            )?;
        }

        let mut line = String::new();
        loop {
            write!(self.output, "Turn {} action [C or D] for {}: ", view.turn + 1, self.name)?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Err(MatchError::InputClosed {
                    participant: self.label.clone(),
                    turn: view.turn + 1,
                });
            }

            match line.parse::<Move>() {
                Ok(m) => return Ok(m),
                Err(err) => writeln!(self.output, "{}", err)?,
            }
        }
    }
}
