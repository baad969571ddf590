use crate::{Card, Color, Group, GroupSpec, Rejection};

/// Ties between equally large colors go to the earlier entry.
const COLOR_PRIORITY: [Color; 4] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];

/// Builds a group of `required` cards from the most common color, topped up
/// with wilds. A color group ignores values, so wilds a caller already bound
/// count the same as free ones and keep their binding.
pub fn match_color(cards: &[Card], required: usize) -> Result<Group, Rejection> {
    let mismatch = Rejection::StructuralMismatch(GroupSpec::Color(required));
    if required == 0 {
        return Err(mismatch);
    }
    let wilds: Vec<Card> = cards.iter().filter(|card| card.is_wild()).copied().collect();

    let mut best: Option<(Color, Vec<Card>)> = None;
    for color in COLOR_PRIORITY {
        let members: Vec<Card> = cards
            .iter()
            .filter(|card| card.color() == Some(color))
            .copied()
            .collect();
        if best
            .as_ref()
            .map_or(true, |(_, leader)| members.len() > leader.len())
        {
            best = Some((color, members));
        }
    }
    let (_, members) = best.ok_or_else(|| mismatch.clone())?;

    if members.len() + wilds.len() < required {
        return Err(mismatch);
    }
    let taken = members.len().min(required);
    let mut group: Vec<Card> = members.into_iter().take(taken).collect();
    group.extend(wilds.into_iter().take(required - taken));
    Ok(Group::new(GroupSpec::Color(required), group))
}
