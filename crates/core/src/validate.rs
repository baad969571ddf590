use crate::{phase, Card, CardId, Group, GroupSpec, Meld, PhasePlan, PhaseRequirement};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

mod color;
mod hit;
mod mixed;
mod runs;
mod sets;

pub use color::match_color;
pub use hit::{admissible_wild_values, finalize_hit, validate_hit, HitOutcome};
pub use mixed::match_mixed;
pub use runs::match_runs;
pub use sets::match_sets;

/// Why the engine refused a lay or a hit. Always returned as data.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum Rejection {
    #[error("phase index {0} is outside the catalog")]
    InvalidIndex(usize),
    #[error("cards cannot form a {0}")]
    StructuralMismatch(GroupSpec),
    #[error("wild needs an explicit value, one of {0:?}")]
    AmbiguousWildcard(Vec<u8>),
    #[error("group contents contradict its {0} shape")]
    MalformedGroup(GroupSpec),
    #[error("skip card {0} cannot be laid")]
    SkipCard(CardId),
    #[error("card {0} appears more than once")]
    DuplicateCard(CardId),
    #[error("card {0} carries a value outside 1..=12")]
    InvalidCard(CardId),
    #[error("value {value} is not admissible here, expected one of {allowed:?}")]
    InadmissibleValue { value: u8, allowed: Vec<u8> },
    #[error("set has no established value")]
    UndeterminedValue,
    #[error("group has no established color")]
    UndeterminedColor,
    #[error("meld has no group {0}")]
    GroupIndex(usize),
}

/// Wire form of a lay verdict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhaseVerdict {
    pub ok: bool,
    pub groups: Vec<Group>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection: Option<Rejection>,
}

impl From<Result<Meld, Rejection>> for PhaseVerdict {
    fn from(value: Result<Meld, Rejection>) -> Self {
        match value {
            Ok(meld) => Self {
                ok: true,
                groups: meld.groups,
                rejection: None,
            },
            Err(reason) => Self {
                ok: false,
                groups: Vec::new(),
                rejection: Some(reason),
            },
        }
    }
}

/// Wire form of a hit verdict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HitVerdict {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possible_values: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_value: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection: Option<Rejection>,
}

impl From<Result<HitOutcome, Rejection>> for HitVerdict {
    fn from(value: Result<HitOutcome, Rejection>) -> Self {
        let mut verdict = Self {
            ok: value.is_ok(),
            possible_values: None,
            assigned_value: None,
            rejection: None,
        };
        match value {
            Ok(HitOutcome::Accept) => {}
            Ok(HitOutcome::Bind(assigned)) => verdict.assigned_value = Some(assigned),
            Ok(HitOutcome::Choose(values)) => verdict.possible_values = Some(values),
            Err(reason) => verdict.rejection = Some(reason),
        }
        verdict
    }
}

/// Checks `cards` against the fixed requirement of `phase_index`.
///
/// Cards the requirement does not need are left out of the returned meld;
/// [`Meld::leftover`] recovers them.
pub fn validate_phase(phase_index: usize, cards: &[Card]) -> Result<Meld, Rejection> {
    let requirement = phase(phase_index).ok_or(Rejection::InvalidIndex(phase_index))?;
    check_cards(cards)?;
    let groups = match_requirement(requirement, cards)?;
    Ok(Meld::new(phase_index, groups))
}

/// Like [`validate_phase`], for callers that already split their cards into
/// groups and bound some wilds themselves.
///
/// When the number of groups matches the requirement, group `i` must form
/// requirement `i` on its own using every card in it; groups are paired by
/// position, so they must come in the order the phase lists them. Any other
/// grouping is pooled and searched like a flat hand.
pub fn validate_phase_with_assigned_wilds(
    phase_index: usize,
    card_groups: &[Vec<Card>],
) -> Result<Meld, Rejection> {
    let requirement = phase(phase_index).ok_or(Rejection::InvalidIndex(phase_index))?;
    let pooled: Vec<Card> = card_groups.iter().flatten().copied().collect();
    check_cards(&pooled)?;
    if card_groups.len() != requirement.groups.len() {
        let groups = match_requirement(requirement, &pooled)?;
        return Ok(Meld::new(phase_index, groups));
    }
    let groups = requirement
        .groups
        .iter()
        .zip(card_groups)
        .map(|(spec, cards)| match_exact(*spec, cards))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Meld::new(phase_index, groups))
}

fn match_requirement(
    requirement: &PhaseRequirement,
    cards: &[Card],
) -> Result<Vec<Group>, Rejection> {
    match requirement.plan() {
        PhasePlan::Sets(sizes) => match_sets(cards, &sizes),
        PhasePlan::Runs(lengths) => match_runs(cards, &lengths),
        PhasePlan::Color(count) => match_color(cards, count).map(|group| vec![group]),
        PhasePlan::Mixed { sets, runs } => match_mixed(cards, &sets, &runs),
    }
}

fn match_exact(spec: GroupSpec, cards: &[Card]) -> Result<Group, Rejection> {
    if let Some(skip) = cards.iter().find(|card| card.is_skip()) {
        return Err(Rejection::SkipCard(skip.id));
    }
    let mismatch = Rejection::StructuralMismatch(spec);
    match spec {
        GroupSpec::Set(size) | GroupSpec::Run(size) if cards.len() != size => Err(mismatch),
        GroupSpec::Color(size) if cards.len() < size => Err(mismatch),
        GroupSpec::Set(size) => match_sets(cards, &[size])?
            .into_iter()
            .next()
            .ok_or(mismatch),
        GroupSpec::Run(size) => match_runs(cards, &[size])?
            .into_iter()
            .next()
            .ok_or(mismatch),
        GroupSpec::Color(_) => {
            let group = match_color(cards, cards.len()).map_err(|_| mismatch)?;
            Ok(Group::new(spec, group.cards))
        }
    }
}

/// Input sanity shared by every entry point: one physical card may appear
/// only once, and every value must sit in 1..=12.
pub fn check_cards(cards: &[Card]) -> Result<(), Rejection> {
    let mut seen = HashSet::with_capacity(cards.len());
    for card in cards {
        if !card.has_valid_value() {
            return Err(Rejection::InvalidCard(card.id));
        }
        if !seen.insert(card.id) {
            return Err(Rejection::DuplicateCard(card.id));
        }
    }
    Ok(())
}
