//! Agents
//!
//! The capability the referee consumes. Agents are untrusted: every call
//! goes through [`crate::referee::isolation`], and anything other than a
//! timely, well-formed answer costs the agent its place in the match.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::core::{BoardPosition, Color, Port, Tile};
use crate::game::moves::InitialMove;
use crate::game::state::BoardState;
use crate::referee::result::MatchResult;

/// Failures an agent reports about its own move generation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    /// The agent was offered a hand it cannot play from.
    #[error("expected {expected} tiles, was offered {actual}")]
    WrongTileCount {
        /// Tiles the agent needs.
        expected: usize,
        /// Tiles offered.
        actual: usize,
    },

    /// No edge cell is left for a first tile.
    #[error("no valid initial placement remains")]
    NoLegalPlacement,

    /// A move was requested before the agent learned its color.
    #[error("agent has not been told its color")]
    NotIntroduced,

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// An agent's answer to an initial-move request. The referee adds the
/// agent's color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialPlacement {
    /// Tile to lay, in its chosen orientation.
    pub tile: Tile,
    /// Edge cell for the tile.
    pub position: BoardPosition,
    /// Starting port.
    pub port: Port,
}

impl InitialPlacement {
    /// Placement of `tile` at `position`, starting on `port`.
    pub fn new(tile: Tile, position: BoardPosition, port: Port) -> Self {
        Self { tile, position, port }
    }

    /// The move this placement makes for `color`.
    pub fn into_move(self, color: Color) -> InitialMove {
        InitialMove::new(self.position, self.tile, self.port, color)
    }
}

/// A match participant.
///
/// Every method runs on a worker thread with its own copy of the inputs and
/// under a time limit. Panicking or returning `Err` marks the agent as a
/// cheater.
pub trait Agent: Send {
    /// The color this agent plays as.
    fn set_identity(&mut self, color: Color);

    /// Every color in the match, in seat order.
    fn set_roster(&mut self, roster: &[Color]);

    /// Choose one of `tiles` and where to lay it.
    fn generate_initial_move(
        &mut self,
        tiles: &[Tile],
        state: &BoardState,
    ) -> Result<InitialPlacement, AgentError>;

    /// Choose one of `tiles`, rotated as it should be laid.
    fn generate_move(&mut self, tiles: &[Tile], state: &BoardState) -> Result<Tile, AgentError>;

    /// Final result of a match the agent finished without cheating.
    fn notify_match_result(&mut self, _result: &MatchResult) {}
}

/// Agent handle shared between the referee and its worker threads.
pub type SharedAgent = Arc<Mutex<dyn Agent>>;

/// Wrap an agent for the referee.
pub fn shared<A: Agent + 'static>(agent: A) -> SharedAgent {
    Arc::new(Mutex::new(agent))
}
