use crate::{match_runs, match_sets, Card, CardId, Group, Rejection};
use std::collections::HashSet;

/// Sets first, then runs over whatever the sets left behind. A card both
/// shapes want always goes to the set.
pub fn match_mixed(
    cards: &[Card],
    sets: &[usize],
    runs: &[usize],
) -> Result<Vec<Group>, Rejection> {
    let pool: Vec<Card> = cards
        .iter()
        .filter(|card| !card.is_skip())
        .copied()
        .collect();
    let mut groups = match_sets(&pool, sets)?;

    let used: HashSet<CardId> = groups
        .iter()
        .flat_map(|group| group.cards.iter().map(|card| card.id))
        .collect();
    let remaining: Vec<Card> = pool
        .into_iter()
        .filter(|card| !used.contains(&card.id))
        .collect();

    groups.extend(match_runs(&remaining, runs)?);
    Ok(groups)
}
