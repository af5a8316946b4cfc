//! Physical Placement Constraints
//!
//! Where a first tile may go and which ports an agent may start on. These
//! checks only look at the board, never at what else an agent was offered.

use crate::core::{BoardPosition, Port};
use crate::game::state::BoardState;

/// A placement the board geometry does not allow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    /// The cell already holds a tile.
    #[error("cannot place a tile at {0}: there is already a tile there")]
    Occupied(BoardPosition),

    /// The cell is not on the outer ring.
    #[error("cannot place a tile at {0}: it is not on the edge of the board")]
    NotOnEdge(BoardPosition),

    /// A neighbouring cell holds a tile.
    #[error("cannot place a tile at {0}: a neighbouring cell holds a tile")]
    NeighborOccupied(BoardPosition),

    /// The starting port opens onto the outer wall.
    #[error("cannot start on port {port} at {position}: it faces the edge of the board")]
    PortFacesWall {
        /// Cell of the tile.
        position: BoardPosition,
        /// Rejected port.
        port: Port,
    },
}

/// Stateless placement predicates.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhysicalConstraintChecker;

impl PhysicalConstraintChecker {
    /// The cell is empty, on the edge, and has no tiled neighbours.
    pub fn is_valid_initial_position(
        state: &BoardState,
        position: BoardPosition,
    ) -> Result<(), PlacementError> {
        if state.tile_at(position).is_some() {
            return Err(PlacementError::Occupied(position));
        }
        if !position.is_edge() {
            return Err(PlacementError::NotOnEdge(position));
        }
        if !state.surrounding_positions_are_empty(position) {
            return Err(PlacementError::NeighborOccupied(position));
        }
        Ok(())
    }

    /// The position is valid and `port` opens onto the board interior.
    pub fn is_valid_initial_port(
        state: &BoardState,
        position: BoardPosition,
        port: Port,
    ) -> Result<(), PlacementError> {
        Self::is_valid_initial_position(state, position)?;
        if !state.port_faces_interior(position, port) {
            return Err(PlacementError::PortFacesWall { position, port });
        }
        Ok(())
    }
}
