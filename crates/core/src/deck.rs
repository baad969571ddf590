use crate::{Card, CardId, CardKind, Color, DealRng, DeckConfig, MAX_VALUE, MIN_VALUE};
use std::iter;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("deal needs {needed} cards but the deck holds {available}")]
    NotEnoughCards { needed: usize, available: usize },
    #[error("cannot seat {seats} players at a deck of {available} cards")]
    TooManySeats { seats: usize, available: usize },
}

#[derive(Debug, Default, Clone)]
pub struct Deck {
    pub draw: Vec<Card>,
}

impl Deck {
    /// Builds an unshuffled deck. Card ids run from 0 in construction order.
    pub fn standard(config: &DeckConfig) -> Self {
        let mut kinds = Vec::with_capacity(config.deck_size());
        for color in Color::ALL {
            for value in MIN_VALUE..=MAX_VALUE {
                for _ in 0..config.copies_per_color {
                    kinds.push(CardKind::Number { color, value });
                }
            }
        }
        kinds.extend(
            iter::repeat(CardKind::Wild {
                assigned_value: None,
            })
            .take(config.wild_count),
        );
        kinds.extend(iter::repeat(CardKind::Skip).take(config.skip_count));
        let draw = kinds
            .into_iter()
            .zip(0u32..)
            .map(|(kind, id)| Card {
                id: CardId(id),
                kind,
            })
            .collect();
        Self { draw }
    }

    pub fn len(&self) -> usize {
        self.draw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draw.is_empty()
    }

    pub fn shuffle(&mut self, rng: &mut DealRng) {
        rng.shuffle_cards(&mut self.draw);
    }

    /// Deals `count` cards to each of `seats` hands, one hand at a time from
    /// the top of the deck.
    pub fn deal(&mut self, seats: usize, count: usize) -> Result<Vec<Vec<Card>>, DeckError> {
        let available = self.draw.len();
        if seats > available {
            return Err(DeckError::TooManySeats { seats, available });
        }
        if seats
            .checked_mul(count)
            .filter(|&needed| needed <= available)
            .is_none()
        {
            return Err(DeckError::NotEnoughCards {
                needed: seats.saturating_mul(count),
                available,
            });
        }
        Ok((0..seats)
            .map(|_| self.draw.drain(..count).collect())
            .collect())
    }
}
