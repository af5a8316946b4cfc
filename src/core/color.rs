//! Agent colors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity token of an agent within a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// First seat.
    White,
    /// Second seat.
    Black,
    /// Third seat.
    Red,
    /// Fourth seat.
    Green,
    /// Fifth seat.
    Blue,
}

impl Color {
    /// The palette, in the order colors are handed out.
    pub const ALL: [Color; 5] = [Color::White, Color::Black, Color::Red, Color::Green, Color::Blue];

    /// Lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
