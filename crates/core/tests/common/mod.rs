#![allow(dead_code)]

use phaseten_core::{Card, Color};

/// Builds cards from short tokens: `r7` is a red 7 (r, y, g, b), `w` a free
/// wild, `w6` a wild bound to 6, `s` a skip. Ids follow token order from `first_id`.
pub fn hand_from(first_id: u32, tokens: &str) -> Vec<Card> {
    tokens
        .split_whitespace()
        .zip(first_id..)
        .map(|(token, id)| card(id, token))
        .collect()
}

pub fn hand(tokens: &str) -> Vec<Card> {
    hand_from(0, tokens)
}

pub fn card(id: u32, token: &str) -> Card {
    let (head, tail) = token.split_at(1);
    let value = || tail.parse::<u8>().expect("card value");
    match head {
        "w" if tail.is_empty() => Card::wild(id),
        "w" => Card::wild(id).bound_to(value()),
        "s" => Card::skip(id),
        "r" => Card::number(id, Color::Red, value()),
        "y" => Card::number(id, Color::Yellow, value()),
        "g" => Card::number(id, Color::Green, value()),
        "b" => Card::number(id, Color::Blue, value()),
        other => panic!("unknown card token {other}"),
    }
}

pub fn values(cards: &[Card]) -> Vec<u8> {
    cards
        .iter()
        .filter_map(|card| card.effective_value())
        .collect()
}
