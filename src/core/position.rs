//! Board Positions
//!
//! Cells on the 10x10 grid. `x` is the column and `y` the row, with the
//! origin in the top-left corner and rows growing downward.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::port::Direction;

/// Smallest coordinate on either axis.
pub const MIN_COORD: u8 = 0;

/// Largest coordinate on either axis.
pub const MAX_COORD: u8 = 9;

/// Cells per side.
pub const BOARD_SIZE: u8 = MAX_COORD - MIN_COORD + 1;

/// Coordinate outside the board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("position ({x}, {y}) is off the board")]
pub struct PositionError {
    /// Requested column.
    pub x: i32,
    /// Requested row.
    pub y: i32,
}

/// A cell on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct BoardPosition {
    x: u8,
    y: u8,
}

impl BoardPosition {
    /// Position at column `x`, row `y`.
    pub fn new(x: u8, y: u8) -> Result<Self, PositionError> {
        Self::checked(i32::from(x), i32::from(y))
    }

    fn checked(x: i32, y: i32) -> Result<Self, PositionError> {
        let range = i32::from(MIN_COORD)..=i32::from(MAX_COORD);
        if range.contains(&x) && range.contains(&y) {
            Ok(Self { x: x as u8, y: y as u8 })
        } else {
            Err(PositionError { x, y })
        }
    }

    /// Column.
    #[inline]
    pub fn x(&self) -> u8 {
        self.x
    }

    /// Row.
    #[inline]
    pub fn y(&self) -> u8 {
        self.y
    }

    /// True for the four corner cells.
    pub fn is_corner(&self) -> bool {
        (self.x == MIN_COORD || self.x == MAX_COORD) && (self.y == MIN_COORD || self.y == MAX_COORD)
    }

    /// True for any cell on the outer ring, corners included.
    pub fn is_edge(&self) -> bool {
        self.x == MIN_COORD || self.x == MAX_COORD || self.y == MIN_COORD || self.y == MAX_COORD
    }

    /// The neighbouring cell one step in `direction`, if it is on the board.
    pub fn step(&self, direction: Direction) -> Option<BoardPosition> {
        let (dx, dy) = direction.delta();
        Self::checked(i32::from(self.x) + i32::from(dx), i32::from(self.y) + i32::from(dy)).ok()
    }

    /// On-board neighbours above, right, below and left of this cell.
    pub fn cardinal_neighbors(&self) -> impl Iterator<Item = BoardPosition> + '_ {
        [Direction::Up, Direction::Right, Direction::Down, Direction::Left]
            .into_iter()
            .filter_map(move |direction| self.step(direction))
    }

    /// Every cell, row by row.
    pub fn all() -> impl Iterator<Item = BoardPosition> {
        (MIN_COORD..=MAX_COORD).flat_map(|y| (MIN_COORD..=MAX_COORD).map(move |x| BoardPosition { x, y }))
    }
}

impl fmt::Display for BoardPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl TryFrom<(u8, u8)> for BoardPosition {
    type Error = PositionError;

    fn try_from((x, y): (u8, u8)) -> Result<Self, Self::Error> {
        BoardPosition::new(x, y)
    }
}

impl From<BoardPosition> for (u8, u8) {
    fn from(position: BoardPosition) -> Self {
        (position.x, position.y)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: u8, y: u8) -> BoardPosition {
        BoardPosition::new(x, y).unwrap()
    }

    #[test]
    fn test_bounds() {
        assert!(BoardPosition::new(9, 9).is_ok());
        assert_eq!(BoardPosition::new(10, 0), Err(PositionError { x: 10, y: 0 }));
        assert!(BoardPosition::new(0, 10).is_err());
        assert_eq!(BoardPosition::all().count(), 100);
    }

    #[test]
    fn test_corner_and_edge() {
        assert!(pos(0, 0).is_corner());
        assert!(pos(9, 0).is_corner());
        assert!(pos(0, 9).is_corner());
        assert!(pos(9, 9).is_corner());
        assert!(!pos(5, 0).is_corner());

        assert!(pos(5, 0).is_edge());
        assert!(pos(0, 5).is_edge());
        assert!(pos(9, 3).is_edge());
        assert!(pos(3, 9).is_edge());
        assert!(!pos(4, 4).is_edge());
    }

    #[test]
    fn test_step_off_board() {
        assert_eq!(pos(0, 0).step(Direction::Up), None);
        assert_eq!(pos(0, 0).step(Direction::Left), None);
        assert_eq!(pos(0, 0).step(Direction::Right), Some(pos(1, 0)));
        assert_eq!(pos(0, 0).step(Direction::Down), Some(pos(0, 1)));
        assert_eq!(pos(9, 9).step(Direction::Right), None);
        assert_eq!(pos(9, 9).step(Direction::Down), None);
    }

    #[test]
    fn test_cardinal_neighbors() {
        assert_eq!(pos(0, 0).cardinal_neighbors().count(), 2);
        assert_eq!(pos(5, 0).cardinal_neighbors().count(), 3);
        let inner: Vec<_> = pos(4, 4).cardinal_neighbors().collect();
        assert_eq!(inner, vec![pos(4, 3), pos(5, 4), pos(4, 5), pos(3, 4)]);
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        assert_eq!(serde_json::to_string(&pos(3, 7)).unwrap(), "[3,7]");
        assert!(serde_json::from_str::<BoardPosition>("[3,12]").is_err());
    }
}
