use crate::Card;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle source for a deal. The seed is kept so the same deal can be
/// reproduced from the CLI with `--seed`.
#[derive(Debug, Clone)]
pub struct DealRng {
    seed: u64,
    rng: StdRng,
}

impl DealRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws a fresh seed from the thread generator.
    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn shuffle_cards(&mut self, cards: &mut [Card]) {
        cards.shuffle(&mut self.rng);
    }
}
