//! Moves
//!
//! Plain records of what an agent asked for. They are always well-formed;
//! whether they are legal is decided by the board and the rule checker.

use serde::{Deserialize, Serialize};

use crate::core::{BoardPosition, Color, Port, Tile};

/// First move of an agent: a tile on an edge cell and a starting port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialMove {
    /// Edge cell for the tile.
    pub position: BoardPosition,
    /// Tile, in the orientation it is laid.
    pub tile: Tile,
    /// Port the agent starts on.
    pub port: Port,
    /// Agent making the move.
    pub color: Color,
}

impl InitialMove {
    /// Initial move for `color`.
    pub fn new(position: BoardPosition, tile: Tile, port: Port, color: Color) -> Self {
        Self { position, tile, port, color }
    }
}

/// Any later move: a tile laid in front of the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntermediateMove {
    /// Tile, in the orientation it is laid.
    pub tile: Tile,
    /// Agent making the move.
    pub color: Color,
}

impl IntermediateMove {
    /// Intermediate move for `color`.
    pub fn new(tile: Tile, color: Color) -> Self {
        Self { tile, color }
    }
}
