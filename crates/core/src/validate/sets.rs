use crate::{Card, CardKind, Group, GroupSpec, Rejection};
use std::collections::{HashMap, VecDeque};

/// Shared pool for one set search. Numbered cards and pre-bound wilds are
/// bucketed by value; values are tried in the order they were first seen.
#[derive(Debug, Default)]
struct ValueTally {
    order: Vec<u8>,
    numbered: HashMap<u8, VecDeque<Card>>,
    assigned: HashMap<u8, VecDeque<Card>>,
    free: VecDeque<Card>,
}

impl ValueTally {
    fn from_cards(cards: &[Card]) -> Self {
        let mut tally = Self::default();
        for card in cards {
            match card.kind {
                CardKind::Number { value, .. } => {
                    tally.discover(value);
                    tally.numbered.entry(value).or_default().push_back(*card);
                }
                CardKind::Wild {
                    assigned_value: Some(value),
                } => {
                    tally.discover(value);
                    tally.assigned.entry(value).or_default().push_back(*card);
                }
                CardKind::Wild {
                    assigned_value: None,
                } => tally.free.push_back(*card),
                CardKind::Skip => {}
            }
        }
        tally
    }

    fn discover(&mut self, value: u8) {
        if !self.order.contains(&value) {
            self.order.push(value);
        }
    }

    fn available(map: &HashMap<u8, VecDeque<Card>>, value: u8) -> usize {
        map.get(&value).map_or(0, VecDeque::len)
    }

    fn take_set(&mut self, size: usize) -> Option<Group> {
        if size == 0 {
            return None;
        }
        let value = self.order.iter().copied().find(|&value| {
            let anchored =
                Self::available(&self.numbered, value) + Self::available(&self.assigned, value);
            anchored > 0 && anchored + self.free.len() >= size
        })?;

        let mut cards = Vec::with_capacity(size);
        for bucket in [&mut self.numbered, &mut self.assigned] {
            if let Some(queue) = bucket.get_mut(&value) {
                while cards.len() < size {
                    match queue.pop_front() {
                        Some(card) => cards.push(card),
                        None => break,
                    }
                }
            }
        }
        while cards.len() < size {
            cards.push(self.free.pop_front()?.bound_to(value));
        }
        Some(Group::new(GroupSpec::Set(size), cards))
    }
}

/// Forms one set per entry of `sizes`, in order. Either every set is found or
/// nothing is returned.
pub fn match_sets(cards: &[Card], sizes: &[usize]) -> Result<Vec<Group>, Rejection> {
    let mut tally = ValueTally::from_cards(cards);
    sizes
        .iter()
        .map(|&size| {
            tally
                .take_set(size)
                .ok_or(Rejection::StructuralMismatch(GroupSpec::Set(size)))
        })
        .collect()
}
