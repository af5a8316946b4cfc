//! Tile Ports
//!
//! Every tile edge carries two ports, eight in total, numbered clockwise
//! from the top-left corner:
//!
//! ```text
//!        0   1
//!      ┌───────┐
//!    7 │       │ 2
//!    6 │       │ 3
//!      └───────┘
//!        5   4
//! ```
//!
//! Rotating a tile 90° clockwise moves every port two steps along this ring.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of ports on a tile.
pub const PORT_COUNT: usize = 8;

/// One of the four directions a port can face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Toward row 0.
    Up,
    /// Toward the last column.
    Right,
    /// Toward the last row.
    Down,
    /// Toward column 0.
    Left,
}

impl Direction {
    /// Column/row delta of one step in this direction.
    #[inline]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }
}

/// A port on a tile edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Port {
    /// Top edge, left port.
    #[serde(rename = "A")]
    TopLeft = 0,
    /// Top edge, right port.
    #[serde(rename = "B")]
    TopRight = 1,
    /// Right edge, upper port.
    #[serde(rename = "C")]
    RightTop = 2,
    /// Right edge, lower port.
    #[serde(rename = "D")]
    RightBottom = 3,
    /// Bottom edge, right port.
    #[serde(rename = "E")]
    BottomRight = 4,
    /// Bottom edge, left port.
    #[serde(rename = "F")]
    BottomLeft = 5,
    /// Left edge, lower port.
    #[serde(rename = "G")]
    LeftBottom = 6,
    /// Left edge, upper port.
    #[serde(rename = "H")]
    LeftTop = 7,
}

impl Port {
    /// All ports in clockwise order starting at the top-left.
    pub const ALL: [Port; PORT_COUNT] = [
        Port::TopLeft,
        Port::TopRight,
        Port::RightTop,
        Port::RightBottom,
        Port::BottomRight,
        Port::BottomLeft,
        Port::LeftBottom,
        Port::LeftTop,
    ];

    /// Port with the given clockwise index (wraps modulo 8).
    #[inline]
    pub const fn from_index(index: usize) -> Port {
        Port::ALL[index % PORT_COUNT]
    }

    /// Clockwise index of this port.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Where this port ends up after a 90° clockwise rotation of its tile.
    #[inline]
    pub const fn rotated_clockwise(self) -> Port {
        Port::from_index(self.index() + 2)
    }

    /// The port of the neighbouring tile that touches this one.
    ///
    /// Top ports meet bottom ports and left ports meet right ports.
    #[inline]
    pub const fn adjoining(self) -> Port {
        match self {
            Port::TopLeft => Port::BottomLeft,
            Port::TopRight => Port::BottomRight,
            Port::RightTop => Port::LeftTop,
            Port::RightBottom => Port::LeftBottom,
            Port::BottomRight => Port::TopRight,
            Port::BottomLeft => Port::TopLeft,
            Port::LeftBottom => Port::RightBottom,
            Port::LeftTop => Port::RightTop,
        }
    }

    /// Direction this port faces.
    #[inline]
    pub const fn direction(self) -> Direction {
        match self {
            Port::TopLeft | Port::TopRight => Direction::Up,
            Port::RightTop | Port::RightBottom => Direction::Right,
            Port::BottomRight | Port::BottomLeft => Direction::Down,
            Port::LeftBottom | Port::LeftTop => Direction::Left,
        }
    }

    /// Network letter for this port (`A` through `H`).
    pub const fn letter(self) -> char {
        (b'A' + self as u8) as char
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Error parsing a port letter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid port {0:?}, expected a letter A-H")]
pub struct ParsePortError(pub String);

impl FromStr for Port {
    type Err = ParsePortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c @ 'A'..='H'), None) => Ok(Port::from_index((c as u8 - b'A') as usize)),
            _ => Err(ParsePortError(s.to_string())),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
