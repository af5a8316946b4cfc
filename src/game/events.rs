//! Board Events
//!
//! What path resolution reports after a tile goes down.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::Color;

/// Something that happened to an agent while paths were followed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoardEvent {
    /// The agent's path ran off the edge of the board.
    AgentExited {
        /// Agent that left.
        color: Color,
    },

    /// The agent's path came back to a port it had already passed.
    AgentEnteredLoop {
        /// Agent caught in the loop.
        color: Color,
    },
}

impl BoardEvent {
    /// Agent the event concerns.
    pub fn color(&self) -> Color {
        match *self {
            BoardEvent::AgentExited { color } | BoardEvent::AgentEnteredLoop { color } => color,
        }
    }
}

/// Result of applying a move to a board.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// Events in agent order.
    pub events: Vec<BoardEvent>,
}

impl MoveOutcome {
    /// Agents caught in a loop.
    pub fn looped(&self) -> BTreeSet<Color> {
        self.events
            .iter()
            .filter(|event| matches!(event, BoardEvent::AgentEnteredLoop { .. }))
            .map(BoardEvent::color)
            .collect()
    }

    /// Whether any agent entered a loop.
    pub fn entered_loop(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, BoardEvent::AgentEnteredLoop { .. }))
    }
}
