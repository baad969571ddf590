use crate::{CardId, GroupSpec, Rejection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    PhaseLaid {
        phase: usize,
        groups: Vec<GroupSpec>,
        cards: usize,
    },
    PhaseRejected {
        phase: usize,
        reason: Rejection,
    },
    HitApplied {
        group: usize,
        card: CardId,
        assigned_value: Option<u8>,
    },
    WildValueRequired {
        group: usize,
        card: CardId,
        possible_values: Vec<u8>,
    },
    HitRejected {
        group: usize,
        card: CardId,
        reason: Rejection,
    },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
