//! Human-readable match summary

use match_logic::{MatchResult, StrategyBase};

/// The one-line summary printed after a match
pub fn summary(result: &MatchResult) -> String {
    format!(
        "You have competed against {}, the final score of the match is: {} and the winner was {}",
        result.players[0],
        result.final_score,
        result.winner_name().unwrap_or("a tie"),
    )
}

/// One line per strategy: name, then what it does
pub fn catalog_listing(catalog: &[StrategyBase]) -> String {
    let width = catalog.iter().map(|s| s.name().len()).max().unwrap_or(0);
    catalog
        .iter()
        .map(|s| format!("{:<width$}  {}\n", s.name(), s.description(), width = width))
        .collect()
}
