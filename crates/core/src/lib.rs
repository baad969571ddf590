//! Meld validation for the ten-phase card game. Pure functions over explicit
//! inputs; keep this crate free of IO and session state.

pub mod cards;
pub mod config;
pub mod deck;
pub mod events;
pub mod meld;
pub mod phases;
pub mod rng;
pub mod validate;

pub use cards::*;
pub use config::*;
pub use deck::*;
pub use events::*;
pub use meld::*;
pub use phases::*;
pub use rng::*;
pub use validate::*;
