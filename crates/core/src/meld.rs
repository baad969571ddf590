use crate::{
    finalize_hit, validate_hit, validate_phase, Card, CardId, CardKind, Color, Event, EventBus,
    GroupSpec, HitOutcome, Rejection,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Cards laid together under one shape. The tag is fixed when the group is
/// created and is never re-derived from the contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub spec: GroupSpec,
    pub cards: Vec<Card>,
}

impl Group {
    pub fn new(spec: GroupSpec, cards: Vec<Card>) -> Self {
        Self { spec, cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.cards.iter().any(|card| card.id == id)
    }

    pub fn wild_count(&self) -> usize {
        self.cards.iter().filter(|card| card.is_wild()).count()
    }

    /// Value shared by a set: taken from numbered members first, then from
    /// wilds already bound into the group.
    pub fn established_value(&self) -> Option<u8> {
        self.cards
            .iter()
            .find_map(|card| card.number_value())
            .or_else(|| self.cards.iter().find_map(|card| card.effective_value()))
    }

    pub fn established_color(&self) -> Option<Color> {
        self.cards.iter().find_map(|card| card.color())
    }

    /// Rejects contents that contradict the group's tag.
    pub fn check_shape(&self) -> Result<(), Rejection> {
        let malformed = Rejection::MalformedGroup(self.spec);
        if self.cards.is_empty() {
            return Err(malformed);
        }
        let mut seen = HashSet::new();
        for card in &self.cards {
            if card.is_skip() || !card.has_valid_value() || !seen.insert(card.id) {
                return Err(malformed);
            }
        }
        match self.spec {
            GroupSpec::Set(_) => {
                let mut values = self.cards.iter().filter_map(|card| card.effective_value());
                if let Some(first) = values.next() {
                    if values.any(|value| value != first) {
                        return Err(malformed);
                    }
                }
            }
            GroupSpec::Run(_) => {
                if self.cards.iter().any(|card| card.is_free_wild()) {
                    return Err(malformed);
                }
                let mut values: Vec<u8> = self
                    .cards
                    .iter()
                    .filter_map(|card| card.effective_value())
                    .collect();
                values.sort_unstable();
                if values.windows(2).any(|pair| pair[0] == pair[1]) {
                    return Err(malformed);
                }
            }
            GroupSpec::Color(_) => {
                if let Some(color) = self.established_color() {
                    if self
                        .cards
                        .iter()
                        .filter_map(|card| card.color())
                        .any(|other| other != color)
                    {
                        return Err(malformed);
                    }
                }
            }
        }
        Ok(())
    }

    /// Appends a card, keeping runs ordered by value.
    pub(crate) fn insert(&mut self, card: Card) {
        match (self.spec, card.effective_value()) {
            (GroupSpec::Run(_), Some(value)) => {
                let at = self
                    .cards
                    .partition_point(|member| member.effective_value().is_some_and(|v| v < value));
                self.cards.insert(at, card);
            }
            _ => self.cards.push(card),
        }
    }
}

/// The groups a player has laid for one phase in the current round.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Meld {
    pub phase: usize,
    pub groups: Vec<Group>,
}

impl Meld {
    pub fn new(phase: usize, groups: Vec<Group>) -> Self {
        Self { phase, groups }
    }

    /// Validates `cards` against the phase and reports the outcome on `events`.
    pub fn lay(phase: usize, cards: &[Card], events: &mut EventBus) -> Result<Self, Rejection> {
        match validate_phase(phase, cards) {
            Ok(meld) => {
                events.push(Event::PhaseLaid {
                    phase,
                    groups: meld.groups.iter().map(|group| group.spec).collect(),
                    cards: meld.card_count(),
                });
                Ok(meld)
            }
            Err(reason) => {
                events.push(Event::PhaseRejected {
                    phase,
                    reason: reason.clone(),
                });
                Err(reason)
            }
        }
    }

    /// Dry run of a hit; never touches the meld.
    pub fn probe_hit(&self, group_index: usize, card: &Card) -> Result<HitOutcome, Rejection> {
        let group = self
            .groups
            .get(group_index)
            .ok_or(Rejection::GroupIndex(group_index))?;
        validate_hit(self.phase, group, card)
    }

    /// Adds `card` to one of the meld's groups. Wilds entering a run with
    /// several open values need `chosen`; without it the meld is left as it was.
    pub fn hit(
        &mut self,
        group_index: usize,
        card: Card,
        chosen: Option<u8>,
        events: &mut EventBus,
    ) -> Result<Card, Rejection> {
        let phase = self.phase;
        let Some(group) = self.groups.get_mut(group_index) else {
            let reason = Rejection::GroupIndex(group_index);
            events.push(Event::HitRejected {
                group: group_index,
                card: card.id,
                reason: reason.clone(),
            });
            return Err(reason);
        };
        match finalize_hit(phase, group, card, chosen) {
            Ok(placed) => {
                let assigned_value = match placed.kind {
                    CardKind::Wild { assigned_value } => assigned_value,
                    _ => None,
                };
                events.push(Event::HitApplied {
                    group: group_index,
                    card: placed.id,
                    assigned_value,
                });
                Ok(placed)
            }
            Err(Rejection::AmbiguousWildcard(possible_values)) => {
                events.push(Event::WildValueRequired {
                    group: group_index,
                    card: card.id,
                    possible_values: possible_values.clone(),
                });
                Err(Rejection::AmbiguousWildcard(possible_values))
            }
            Err(reason) => {
                events.push(Event::HitRejected {
                    group: group_index,
                    card: card.id,
                    reason: reason.clone(),
                });
                Err(reason)
            }
        }
    }

    pub fn card_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    pub fn card_ids(&self) -> Vec<CardId> {
        self.groups
            .iter()
            .flat_map(|group| group.cards.iter().map(|card| card.id))
            .collect()
    }

    /// Cards of `hand` that the meld did not use.
    pub fn leftover(&self, hand: &[Card]) -> Vec<Card> {
        let used: HashSet<CardId> = self.card_ids().into_iter().collect();
        hand.iter()
            .filter(|card| !used.contains(&card.id))
            .copied()
            .collect()
    }
}
