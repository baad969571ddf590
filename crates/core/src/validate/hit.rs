use crate::{
    is_valid_value, match_runs, phase, Card, CardKind, Group, GroupSpec, Rejection, MAX_VALUE,
    MIN_VALUE,
};
use serde::{Deserialize, Serialize};

/// Verdict for a card that may join an existing group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "values", rename_all = "snake_case")]
pub enum HitOutcome {
    /// The card joins as it is.
    Accept,
    /// A wild that must take this value.
    Bind(u8),
    /// A wild with several legal values; the caller picks one and finalizes.
    Choose(Vec<u8>),
}

/// Values a wild could take if it joined `group`.
///
/// Runs open at both ends and inside any gap, clamped to 1..=12. Sets only
/// admit their established value. Color groups need no value, so the list is
/// empty.
pub fn admissible_wild_values(group: &Group) -> Result<Vec<u8>, Rejection> {
    match group.spec {
        GroupSpec::Set(_) => group
            .established_value()
            .map(|value| vec![value])
            .ok_or(Rejection::UndeterminedValue),
        GroupSpec::Run(_) => Ok(run_openings(group)),
        GroupSpec::Color(_) => Ok(Vec::new()),
    }
}

fn run_openings(group: &Group) -> Vec<u8> {
    let mut values: Vec<u8> = group
        .cards
        .iter()
        .filter_map(|card| card.effective_value())
        .collect();
    values.sort_unstable();
    values.dedup();
    let (Some(&lowest), Some(&highest)) = (values.first(), values.last()) else {
        return Vec::new();
    };

    let mut open: Vec<u8> = values
        .windows(2)
        .flat_map(|pair| pair[0] + 1..pair[1])
        .collect();
    if lowest > MIN_VALUE {
        open.push(lowest - 1);
    }
    if highest < MAX_VALUE {
        open.push(highest + 1);
    }
    open.retain(|&value| is_valid_value(value));
    open.sort_unstable();
    open.dedup();
    open
}

/// Decides whether `card` may extend `group`, which belongs to a meld laid
/// for `phase_index`. Never mutates anything.
pub fn validate_hit(
    phase_index: usize,
    group: &Group,
    card: &Card,
) -> Result<HitOutcome, Rejection> {
    let requirement = phase(phase_index).ok_or(Rejection::InvalidIndex(phase_index))?;
    if !requirement.allows_shape(group.spec) {
        return Err(Rejection::MalformedGroup(group.spec));
    }
    group.check_shape()?;
    if !card.has_valid_value() {
        return Err(Rejection::InvalidCard(card.id));
    }
    if group.contains(card.id) {
        return Err(Rejection::DuplicateCard(card.id));
    }

    let mismatch = Rejection::StructuralMismatch(group.spec);
    match (group.spec, card.kind) {
        (_, CardKind::Skip) => Err(Rejection::SkipCard(card.id)),
        (GroupSpec::Set(_), CardKind::Number { value, .. }) => {
            let established = group.established_value().ok_or(Rejection::UndeterminedValue)?;
            if value == established {
                Ok(HitOutcome::Accept)
            } else {
                Err(mismatch)
            }
        }
        (GroupSpec::Set(_), CardKind::Wild { assigned_value }) => {
            let established = group.established_value().ok_or(Rejection::UndeterminedValue)?;
            match assigned_value {
                None => Ok(HitOutcome::Bind(established)),
                Some(value) if value == established => Ok(HitOutcome::Accept),
                Some(value) => Err(Rejection::InadmissibleValue {
                    value,
                    allowed: vec![established],
                }),
            }
        }
        (GroupSpec::Run(_), CardKind::Wild { assigned_value }) => {
            let open = run_openings(group);
            match assigned_value {
                Some(value) if open.contains(&value) => Ok(HitOutcome::Accept),
                Some(value) => Err(Rejection::InadmissibleValue {
                    value,
                    allowed: open,
                }),
                None => match open.len() {
                    0 => Err(mismatch),
                    1 => Ok(HitOutcome::Bind(open[0])),
                    _ => Ok(HitOutcome::Choose(open)),
                },
            }
        }
        (GroupSpec::Run(_), CardKind::Number { .. }) => {
            let mut extended = group.cards.clone();
            extended.push(*card);
            match_runs(&extended, &[extended.len()])
                .map(|_| HitOutcome::Accept)
                .map_err(|_| mismatch)
        }
        (GroupSpec::Color(_), CardKind::Wild { .. }) => Ok(HitOutcome::Accept),
        (GroupSpec::Color(_), CardKind::Number { color, .. }) => {
            let established = group.established_color().ok_or(Rejection::UndeterminedColor)?;
            if color == established {
                Ok(HitOutcome::Accept)
            } else {
                Err(mismatch)
            }
        }
    }
}

/// Second half of a hit: re-checks the card, applies the binding and appends
/// it to `group`. `chosen` is required when the check offers several values
/// and must agree with the forced value otherwise. On error `group` is left
/// unchanged.
pub fn finalize_hit(
    phase_index: usize,
    group: &mut Group,
    card: Card,
    chosen: Option<u8>,
) -> Result<Card, Rejection> {
    let placed = match validate_hit(phase_index, group, &card)? {
        HitOutcome::Accept => card,
        HitOutcome::Bind(value) => match chosen {
            Some(picked) if picked != value => {
                return Err(Rejection::InadmissibleValue {
                    value: picked,
                    allowed: vec![value],
                })
            }
            _ => card.bound_to(value),
        },
        HitOutcome::Choose(values) => {
            let picked = chosen.ok_or_else(|| Rejection::AmbiguousWildcard(values.clone()))?;
            if !values.contains(&picked) {
                return Err(Rejection::InadmissibleValue {
                    value: picked,
                    allowed: values,
                });
            }
            card.bound_to(picked)
        }
    };
    group.insert(placed);
    Ok(placed)
}
