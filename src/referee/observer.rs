//! Referee Observers
//!
//! Passive subscribers to match progress. Observers are trusted not to
//! block, but not trusted not to panic: a panicking observer is logged and
//! the match carries on.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, info, warn};

use crate::core::{Color, Tile};
use crate::game::moves::{InitialMove, IntermediateMove};
use crate::game::state::BoardState;
use crate::referee::result::MatchResult;

/// Receives match progress. Every method defaults to doing nothing.
///
/// Board states passed in are the state before the move in question.
pub trait RefereeObserver: Send {
    /// Seats assigned.
    fn roster_assembled(&mut self, _roster: &[Color]) {}

    /// Tiles offered for an initial move.
    fn initial_move_offered(&mut self, _color: Color, _tiles: &[Tile], _state: &BoardState) {}

    /// An agent answered with an initial move (not yet validated).
    fn initial_move_played(&mut self, _mv: &InitialMove, _tiles: &[Tile], _state: &BoardState) {}

    /// Tiles offered for an intermediate move.
    fn intermediate_move_offered(&mut self, _color: Color, _tiles: &[Tile], _state: &BoardState) {}

    /// An agent answered with an intermediate move, and whether it was legal.
    fn intermediate_move_played(
        &mut self,
        _mv: &IntermediateMove,
        _tiles: &[Tile],
        _state: &BoardState,
        _legal: bool,
    ) {
    }

    /// An agent left the board this round.
    fn agent_eliminated(&mut self, _color: Color, _state: &BoardState) {}

    /// A cheater was taken out of the match.
    fn cheater_removed(&mut self, _color: Color, _state: &BoardState) {}

    /// The match is over.
    fn match_completed(&mut self, _result: &MatchResult) {}
}

/// Observers attached to one referee.
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Box<dyn RefereeObserver>>,
}

impl ObserverSet {
    /// Attach an observer.
    pub fn add(&mut self, observer: Box<dyn RefereeObserver>) {
        self.observers.push(observer);
    }

    /// Number of attached observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no observers are attached.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Deliver one event to every observer, absorbing panics.
    pub fn notify(&mut self, event: &'static str, deliver: impl Fn(&mut dyn RefereeObserver)) {
        for (index, observer) in self.observers.iter_mut().enumerate() {
            let delivered = catch_unwind(AssertUnwindSafe(|| deliver(observer.as_mut())));
            if delivered.is_err() {
                warn!(event, observer = index, "observer panicked, ignoring");
            }
        }
    }
}

/// Logs every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RefereeObserver for TracingObserver {
    fn roster_assembled(&mut self, roster: &[Color]) {
        info!(?roster, "roster assembled");
    }

    fn initial_move_offered(&mut self, color: Color, tiles: &[Tile], _state: &BoardState) {
        debug!(%color, tiles = tiles.len(), "initial move offered");
    }

    fn initial_move_played(&mut self, mv: &InitialMove, _tiles: &[Tile], _state: &BoardState) {
        info!(color = %mv.color, position = %mv.position, port = %mv.port, tile = %mv.tile, "initial move");
    }

    fn intermediate_move_offered(&mut self, color: Color, tiles: &[Tile], _state: &BoardState) {
        debug!(%color, tiles = tiles.len(), "move offered");
    }

    fn intermediate_move_played(
        &mut self,
        mv: &IntermediateMove,
        _tiles: &[Tile],
        state: &BoardState,
        legal: bool,
    ) {
        info!(
            color = %mv.color,
            tile = %mv.tile,
            laid = state.tile_count(),
            legal,
            "move"
        );
    }

    fn agent_eliminated(&mut self, color: Color, state: &BoardState) {
        info!(%color, remaining = state.live_agents().len(), "agent eliminated");
    }

    fn cheater_removed(&mut self, color: Color, _state: &BoardState) {
        warn!(%color, "cheater removed");
    }

    fn match_completed(&mut self, result: &MatchResult) {
        info!(ranking = ?result.ranking, cheaters = ?result.cheaters, "match completed");
    }
}
