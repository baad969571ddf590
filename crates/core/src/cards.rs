use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_VALUE: u8 = 1;
pub const MAX_VALUE: u8 = 12;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Yellow,
    Green,
    Blue,
}

impl Color {
    /// Deck construction order.
    pub const ALL: [Color; 4] = [Color::Red, Color::Yellow, Color::Green, Color::Blue];

    pub fn id(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CardKind {
    Number {
        color: Color,
        value: u8,
    },
    Wild {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        assigned_value: Option<u8>,
    },
    Skip,
}

/// One physical card. Two cards with equal kinds are still distinct when their
/// ids differ.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    pub id: CardId,
    #[serde(flatten)]
    pub kind: CardKind,
}

impl Card {
    pub fn number(id: u32, color: Color, value: u8) -> Self {
        Self {
            id: CardId(id),
            kind: CardKind::Number { color, value },
        }
    }

    pub fn wild(id: u32) -> Self {
        Self {
            id: CardId(id),
            kind: CardKind::Wild {
                assigned_value: None,
            },
        }
    }

    pub fn skip(id: u32) -> Self {
        Self {
            id: CardId(id),
            kind: CardKind::Skip,
        }
    }

    pub fn is_wild(&self) -> bool {
        matches!(self.kind, CardKind::Wild { .. })
    }

    pub fn is_skip(&self) -> bool {
        matches!(self.kind, CardKind::Skip)
    }

    pub fn is_free_wild(&self) -> bool {
        matches!(
            self.kind,
            CardKind::Wild {
                assigned_value: None
            }
        )
    }

    /// Face value of a numbered card.
    pub fn number_value(&self) -> Option<u8> {
        match self.kind {
            CardKind::Number { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn color(&self) -> Option<Color> {
        match self.kind {
            CardKind::Number { color, .. } => Some(color),
            _ => None,
        }
    }

    /// Value the card stands for inside a group: the face value of a numbered
    /// card or the binding of a wild.
    pub fn effective_value(&self) -> Option<u8> {
        match self.kind {
            CardKind::Number { value, .. } => Some(value),
            CardKind::Wild { assigned_value } => assigned_value,
            CardKind::Skip => None,
        }
    }

    /// Returns a copy of a wild bound to `value`. Other kinds are returned unchanged.
    pub fn bound_to(self, value: u8) -> Self {
        match self.kind {
            CardKind::Wild { .. } => Self {
                id: self.id,
                kind: CardKind::Wild {
                    assigned_value: Some(value),
                },
            },
            _ => self,
        }
    }

    pub fn has_valid_value(&self) -> bool {
        match self.effective_value() {
            Some(value) => is_valid_value(value),
            None => true,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CardKind::Number { color, value } => write!(f, "{} {}", color.id(), value),
            CardKind::Wild {
                assigned_value: Some(value),
            } => write!(f, "wild({value})"),
            CardKind::Wild {
                assigned_value: None,
            } => write!(f, "wild"),
            CardKind::Skip => write!(f, "skip"),
        }
    }
}

pub fn is_valid_value(value: u8) -> bool {
    (MIN_VALUE..=MAX_VALUE).contains(&value)
}
