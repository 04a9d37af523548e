//! Random opponent selection from the strategy catalog

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::MatchError;
use crate::participant::AutomatedParticipant;
use crate::strategy::StrategyBase;

/// The full catalog of automated strategies
pub fn catalog() -> &'static [StrategyBase] {
    &StrategyBase::ALL
}

/// Draw one strategy uniformly from `catalog` and instantiate it
///
/// Single draw from the caller's random source, no retry.
pub fn select_opponent<R: Rng + ?Sized>(
    catalog: &[StrategyBase],
    rng: &mut R,
) -> Result<AutomatedParticipant, MatchError> {
    let strategy = catalog.choose(rng).copied().ok_or(MatchError::EmptyCatalog)?;
    log::info!("selected opponent {} from {} strategies", strategy, catalog.len());
    Ok(AutomatedParticipant::new(strategy))
}
