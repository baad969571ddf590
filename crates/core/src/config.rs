use serde::{Deserialize, Serialize};

/// Deck composition and deal size. Missing fields fall back to the standard
/// 108-card game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DeckConfig {
    pub copies_per_color: usize,
    pub wild_count: usize,
    pub skip_count: usize,
    pub hand_size: usize,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            copies_per_color: 2,
            wild_count: 8,
            skip_count: 4,
            hand_size: 10,
        }
    }
}

impl DeckConfig {
    pub fn deck_size(&self) -> usize {
        let values = usize::from(crate::MAX_VALUE - crate::MIN_VALUE) + 1;
        crate::Color::ALL.len() * values * self.copies_per_color + self.wild_count + self.skip_count
    }
}
