use crate::{Card, CardKind, Group, GroupSpec, Rejection, MAX_VALUE, MIN_VALUE};
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Default)]
struct RunSlots {
    queues: HashMap<u8, VecDeque<Card>>,
    free: VecDeque<Card>,
}

impl RunSlots {
    fn from_cards(cards: &[Card]) -> Self {
        let mut slots = Self::default();
        for card in cards {
            match card.kind {
                CardKind::Number { value, .. }
                | CardKind::Wild {
                    assigned_value: Some(value),
                } => slots.queues.entry(value).or_default().push_back(*card),
                CardKind::Wild {
                    assigned_value: None,
                } => slots.free.push_back(*card),
                CardKind::Skip => {}
            }
        }
        slots
    }

    fn is_open(&self, value: u8) -> bool {
        self.queues.get(&value).map_or(true, VecDeque::is_empty)
    }

    /// Scans windows from the lowest start upward and takes the first one the
    /// pool can fill. Windows that fall short leave the pool untouched.
    fn take_run(&mut self, length: usize) -> Option<Group> {
        let span = usize::from(MAX_VALUE - MIN_VALUE) + 1;
        if length == 0 || length > span {
            return None;
        }
        let length_u8 = u8::try_from(length).ok()?;
        let last_start = MAX_VALUE - length_u8 + 1;
        for start in MIN_VALUE..=last_start {
            let window = start..start + length_u8;
            let gaps = window.clone().filter(|&value| self.is_open(value)).count();
            if gaps > self.free.len() {
                continue;
            }
            let mut cards = Vec::with_capacity(length);
            for value in window {
                let queued = self.queues.get_mut(&value).and_then(VecDeque::pop_front);
                match queued {
                    Some(card) => cards.push(card),
                    None => cards.push(self.free.pop_front()?.bound_to(value)),
                }
            }
            return Some(Group::new(GroupSpec::Run(length), cards));
        }
        None
    }
}

/// Forms one run per entry of `lengths`, in order, each at the lowest start
/// the remaining pool allows.
pub fn match_runs(cards: &[Card], lengths: &[usize]) -> Result<Vec<Group>, Rejection> {
    let mut slots = RunSlots::from_cards(cards);
    lengths
        .iter()
        .map(|&length| {
            slots
                .take_run(length)
                .ok_or(Rejection::StructuralMismatch(GroupSpec::Run(length)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    fn values(group: &Group) -> Vec<u8> {
        group
            .cards
            .iter()
            .filter_map(|card| card.effective_value())
            .collect()
    }

    #[test]
    fn wild_fills_the_gap() {
        let cards = vec![
            Card::number(1, Color::Red, 5),
            Card::number(2, Color::Blue, 7),
            Card::number(3, Color::Green, 8),
            Card::wild(4),
        ];
        let groups = match_runs(&cards, &[4]).expect("run of four");
        assert_eq!(values(&groups[0]), vec![5, 6, 7, 8]);
        let wild = groups[0].cards.iter().find(|card| card.is_wild()).expect("wild");
        assert_eq!(wild.effective_value(), Some(6));
    }

    #[test]
    fn lowest_window_is_chosen() {
        let cards: Vec<Card> = [9u8, 10, 11, 12, 2, 3, 4, 5]
            .iter()
            .enumerate()
            .map(|(idx, &value)| Card::number(idx as u32, Color::Yellow, value))
            .collect();
        let groups = match_runs(&cards, &[4]).expect("run");
        assert_eq!(values(&groups[0]), vec![2, 3, 4, 5]);
    }

    #[test]
    fn spare_wilds_extend_downward_from_one() {
        let cards = vec![
            Card::number(1, Color::Red, 3),
            Card::number(2, Color::Red, 4),
            Card::wild(3),
            Card::wild(4),
        ];
        let groups = match_runs(&cards, &[4]).expect("run");
        assert_eq!(values(&groups[0]), vec![1, 2, 3, 4]);
    }

    #[test]
    fn failed_windows_do_not_consume_cards() {
        // The window at 1 cannot fill its first slot; the 2 must still be
        // available to the window at 2.
        let cards = vec![
            Card::number(1, Color::Red, 2),
            Card::number(2, Color::Red, 3),
            Card::number(3, Color::Red, 4),
        ];
        let groups = match_runs(&cards, &[3]).expect("run");
        assert_eq!(values(&groups[0]), vec![2, 3, 4]);
    }

    #[test]
    fn prebound_wild_holds_its_slot() {
        let cards = vec![
            Card::number(1, Color::Red, 6),
            Card::wild(2).bound_to(7),
            Card::number(3, Color::Red, 8),
        ];
        let groups = match_runs(&cards, &[3]).expect("run");
        assert_eq!(groups[0].cards[1].id.0, 2);

        let misbound = vec![
            Card::number(1, Color::Red, 6),
            Card::wild(2).bound_to(11),
            Card::number(3, Color::Red, 8),
        ];
        assert!(match_runs(&misbound, &[3]).is_err());
    }

    #[test]
    fn overlong_run_is_impossible() {
        let cards: Vec<Card> = (0..13).map(Card::wild).collect();
        assert_eq!(
            match_runs(&cards, &[13]),
            Err(Rejection::StructuralMismatch(GroupSpec::Run(13)))
        );
    }
}
