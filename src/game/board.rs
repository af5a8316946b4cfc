//! Board
//!
//! Mutable handle around a [`BoardState`]. Every public operation is
//! transactional: the state is snapshotted first and put back if the
//! operation fails, so a rejected move never leaves a half-applied board.
//!
//! After each tile goes down every live agent follows its path:
//!
//! ```text
//!   (position, port) ──seen before?──► loop
//!          │
//!     cell ahead ──off the board──► exited
//!          │
//!       empty? ──yes──► rest here
//!          │
//!   enter via adjoining port, follow the tile, repeat
//! ```
//!
//! Removals are applied once the whole pass is done.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::{BoardPosition, Color, Tile};
use crate::game::constraint::{PhysicalConstraintChecker, PlacementError};
use crate::game::events::{BoardEvent, MoveOutcome};
use crate::game::moves::{InitialMove, IntermediateMove};
use crate::game::state::{Avatar, BoardState};

/// Errors from board operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// The agent already has an avatar on the board.
    #[error("{0} has already placed an initial tile")]
    AlreadyPlaced(Color),

    /// The placement breaks a physical constraint.
    #[error(transparent)]
    Placement(#[from] PlacementError),

    /// A tile was laid on a cell that already holds one.
    #[error("the cell {0} already holds a tile")]
    CellOccupied(BoardPosition),

    /// The agent has no avatar on the board.
    #[error("{0} is not on the board")]
    AgentNotLive(Color),

    /// A live agent faces the outer wall. Path resolution removes such agents.
    #[error("invariant violated: {color} at {position} faces off the board")]
    FacingOffBoard {
        /// Agent.
        color: Color,
        /// Where it stands.
        position: BoardPosition,
    },

    /// The cell in front of a live agent already holds a tile. Path
    /// resolution always moves agents past laid tiles.
    #[error("invariant violated: the cell {position} in front of {color} already holds a tile")]
    TargetOccupied {
        /// Agent.
        color: Color,
        /// Occupied cell.
        position: BoardPosition,
    },
}

impl BoardError {
    /// True for errors no agent input can cause.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, BoardError::FacingOffBoard { .. } | BoardError::TargetOccupied { .. })
    }
}

/// How one agent's path ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathEnd {
    Resting(Avatar),
    Exited,
    Looped,
}

/// A board that evolves move by move.
#[derive(Clone, Debug, Default)]
pub struct Board {
    state: BoardState,
}

impl Board {
    /// An empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Board starting from an existing state. The state is trusted as is.
    pub fn from_state(state: BoardState) -> Self {
        Self { state }
    }

    /// Rebuild a board from a sequence of initial moves.
    pub fn from_initial_placements(placements: &[InitialMove]) -> Result<Self, BoardError> {
        Self::from_moves(placements, &[])
    }

    /// Rebuild a board from initial moves followed by intermediate moves.
    /// Stops at the first move the board rejects.
    pub fn from_moves(
        placements: &[InitialMove],
        moves: &[IntermediateMove],
    ) -> Result<Self, BoardError> {
        let mut board = Self::new();
        for placement in placements {
            board.initial_move(placement)?;
        }
        for mv in moves {
            board.intermediate_move(mv)?;
        }
        Ok(board)
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Colors still on the board.
    pub fn live_agents(&self) -> BTreeSet<Color> {
        self.state.live_colors()
    }

    /// Whether `color` is still on the board.
    pub fn is_live(&self, color: Color) -> bool {
        self.state.is_live(color)
    }

    // ===== INITIAL MOVES =====

    /// Check an initial move without applying it.
    pub fn validate_initial_move(&self, mv: &InitialMove) -> Result<(), BoardError> {
        if self.state.is_live(mv.color) {
            return Err(BoardError::AlreadyPlaced(mv.color));
        }
        PhysicalConstraintChecker::is_valid_initial_port(&self.state, mv.position, mv.port)?;
        Ok(())
    }

    /// Validate and apply an initial move.
    pub fn initial_move(&mut self, mv: &InitialMove) -> Result<MoveOutcome, BoardError> {
        self.transaction(|board| {
            board.validate_initial_move(mv)?;
            board.initial_move_with_scissors(mv)
        })
    }

    /// Apply an initial move with no rule validation. Laid tiles are never
    /// replaced, so an occupied cell is still refused.
    pub fn initial_move_with_scissors(&mut self, mv: &InitialMove) -> Result<MoveOutcome, BoardError> {
        self.ensure_empty(mv.position)?;
        self.state = self
            .state
            .with_tile(mv.tile, mv.position)
            .with_avatar(mv.color, Avatar::new(mv.position, mv.port));
        Ok(self.resolve_paths())
    }

    // ===== INTERMEDIATE MOVES =====

    /// Check an intermediate move without applying it.
    pub fn validate_intermediate_move(&self, mv: &IntermediateMove) -> Result<(), BoardError> {
        if !self.state.is_live(mv.color) {
            return Err(BoardError::AgentNotLive(mv.color));
        }
        Ok(())
    }

    /// Validate and apply an intermediate move.
    ///
    /// If the tile sends any agent into a loop, the tile is taken back, the
    /// looping agents are removed and nobody else moves.
    pub fn intermediate_move(&mut self, mv: &IntermediateMove) -> Result<MoveOutcome, BoardError> {
        self.transaction(|board| {
            board.validate_intermediate_move(mv)?;
            let target = board.target_of(mv.color)?;

            let before = board.state.clone();
            board.state = board.state.with_tile(mv.tile, target);
            let outcome = board.resolve_paths();
            if !outcome.entered_loop() {
                return Ok(outcome);
            }

            board.state = outcome
                .looped()
                .into_iter()
                .fold(before, |state, color| state.without_agent(color));
            let events = outcome
                .events
                .into_iter()
                .filter(|event| matches!(event, BoardEvent::AgentEnteredLoop { .. }))
                .collect();
            Ok(MoveOutcome { events })
        })
    }

    /// Lay a tile with no rule validation and move everyone along their
    /// paths. The cell must be empty.
    pub fn place_tile_at_index_with_scissors(
        &mut self,
        tile: Tile,
        position: BoardPosition,
    ) -> Result<MoveOutcome, BoardError> {
        self.ensure_empty(position)?;
        self.state = self.state.with_tile(tile, position);
        Ok(self.resolve_paths())
    }

    /// Take an agent off the board. Returns whether it was live.
    pub fn remove_agent(&mut self, color: Color) -> bool {
        let was_live = self.state.is_live(color);
        if was_live {
            self.state = self.state.without_agent(color);
        }
        was_live
    }

    // ===== INTERNALS =====

    fn transaction<T>(
        &mut self,
        apply: impl FnOnce(&mut Self) -> Result<T, BoardError>,
    ) -> Result<T, BoardError> {
        let snapshot = self.state.clone();
        let result = apply(self);
        if result.is_err() {
            self.state = snapshot;
        }
        result
    }

    fn ensure_empty(&self, position: BoardPosition) -> Result<(), BoardError> {
        match self.state.tile_at(position) {
            Some(_) => Err(BoardError::CellOccupied(position)),
            None => Ok(()),
        }
    }

    /// Empty cell an agent would lay its next tile on.
    fn target_of(&self, color: Color) -> Result<BoardPosition, BoardError> {
        let avatar = self.state.avatar_of(color).ok_or(BoardError::AgentNotLive(color))?;
        let target = self.state.position_ahead_of(color).ok_or(BoardError::FacingOffBoard {
            color,
            position: avatar.position,
        })?;
        if self.state.tile_at(target).is_some() {
            return Err(BoardError::TargetOccupied { color, position: target });
        }
        Ok(target)
    }

    fn resolve_paths(&mut self) -> MoveOutcome {
        let mut outcome = MoveOutcome::default();
        let mut resting = BTreeMap::new();

        for (&color, &avatar) in self.state.live_agents() {
            match follow_path(&self.state, avatar) {
                PathEnd::Resting(end) => {
                    resting.insert(color, end);
                }
                PathEnd::Exited => outcome.events.push(BoardEvent::AgentExited { color }),
                PathEnd::Looped => outcome.events.push(BoardEvent::AgentEnteredLoop { color }),
            }
        }

        self.state = self.state.with_live_agents(resting);
        outcome
    }
}

fn follow_path(state: &BoardState, start: Avatar) -> PathEnd {
    let mut seen = BTreeSet::new();
    let mut current = start;

    loop {
        if !seen.insert(current) {
            return PathEnd::Looped;
        }
        let Some(next) = current.facing() else {
            return PathEnd::Exited;
        };
        let Some(tile) = state.tile_at(next) else {
            return PathEnd::Resting(current);
        };

        #[cfg(feature = "debug-tracing")]
        tracing::trace!(from = %current.position, port = %current.port, to = %next, "following path");

        current = Avatar::new(next, tile.connected_port(current.port.adjoining()));
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Port;
    use proptest::prelude::*;

    fn pos(x: u8, y: u8) -> BoardPosition {
        BoardPosition::new(x, y).unwrap()
    }

    fn straight() -> Tile {
        Tile::from_indices(&[(0, 5), (1, 4), (2, 7), (3, 6)]).unwrap()
    }

    /// Every path turns around a tile corner.
    fn corners() -> Tile {
        Tile::from_indices(&[(0, 7), (1, 2), (3, 4), (5, 6)]).unwrap()
    }

    fn placement(x: u8, y: u8, port: Port, color: Color) -> InitialMove {
        InitialMove::new(pos(x, y), straight(), port, color)
    }

    #[test]
    fn test_initial_move_places_avatar() {
        let mut board = Board::new();
        let outcome = board.initial_move(&placement(3, 0, Port::RightTop, Color::White)).unwrap();

        assert!(outcome.events.is_empty());
        assert_eq!(
            board.state().avatar_of(Color::White),
            Some(Avatar::new(pos(3, 0), Port::RightTop))
        );
        assert!(board.state().tile_at(pos(3, 0)).is_some());
    }

    #[test]
    fn test_initial_move_rejections_are_atomic() {
        let mut board = Board::from_initial_placements(&[placement(3, 0, Port::RightTop, Color::White)]).unwrap();
        let before = board.state().clone();

        let cases = [
            (placement(5, 0, Port::RightTop, Color::White), BoardError::AlreadyPlaced(Color::White)),
            (
                placement(3, 0, Port::RightTop, Color::Black),
                BoardError::Placement(PlacementError::Occupied(pos(3, 0))),
            ),
            (
                placement(4, 4, Port::RightTop, Color::Black),
                BoardError::Placement(PlacementError::NotOnEdge(pos(4, 4))),
            ),
            (
                placement(4, 0, Port::RightTop, Color::Black),
                BoardError::Placement(PlacementError::NeighborOccupied(pos(4, 0))),
            ),
            (
                placement(6, 0, Port::TopLeft, Color::Black),
                BoardError::Placement(PlacementError::PortFacesWall {
                    position: pos(6, 0),
                    port: Port::TopLeft,
                }),
            ),
        ];

        for (mv, expected) in cases {
            assert_eq!(board.initial_move(&mv), Err(expected));
            assert_eq!(board.state(), &before);
        }
    }

    #[test]
    fn test_intermediate_move_follows_path() {
        let mut board = Board::from_initial_placements(&[placement(0, 0, Port::RightTop, Color::White)]).unwrap();
        let outcome = board
            .intermediate_move(&IntermediateMove::new(straight(), Color::White))
            .unwrap();

        assert!(outcome.events.is_empty());
        assert_eq!(
            board.state().avatar_of(Color::White),
            Some(Avatar::new(pos(1, 0), Port::RightTop))
        );
    }

    #[test]
    fn test_agents_pass_each_other() {
        let mut board = Board::from_initial_placements(&[
            placement(1, 0, Port::RightTop, Color::White),
            placement(3, 0, Port::LeftBottom, Color::Black),
        ])
        .unwrap();

        let outcome = board
            .intermediate_move(&IntermediateMove::new(straight(), Color::White))
            .unwrap();

        assert!(outcome.events.is_empty());
        assert_eq!(
            board.state().avatar_of(Color::White),
            Some(Avatar::new(pos(3, 0), Port::RightTop))
        );
        assert_eq!(
            board.state().avatar_of(Color::Black),
            Some(Avatar::new(pos(1, 0), Port::LeftBottom))
        );
    }

    #[test]
    fn test_agent_exits_board() {
        let mut board = Board::from_initial_placements(&[placement(8, 0, Port::RightTop, Color::White)]).unwrap();
        let outcome = board
            .intermediate_move(&IntermediateMove::new(straight(), Color::White))
            .unwrap();

        assert_eq!(outcome.events, vec![BoardEvent::AgentExited { color: Color::White }]);
        assert!(!board.is_live(Color::White));
        assert!(board.state().tile_at(pos(9, 0)).is_some());
    }

    #[test]
    fn test_loop_removes_only_looping_agent_and_takes_tile_back() {
        let state = BoardState::new()
            .with_tile(corners(), pos(1, 1))
            .with_tile(corners(), pos(2, 1))
            .with_tile(corners(), pos(1, 2))
            .with_tile(straight(), pos(5, 0))
            .with_avatar(Color::White, Avatar::new(pos(2, 1), Port::BottomLeft))
            .with_avatar(Color::Black, Avatar::new(pos(5, 0), Port::RightTop));
        let mut board = Board::from_state(state);

        let outcome = board
            .intermediate_move(&IntermediateMove::new(corners(), Color::White))
            .unwrap();

        assert_eq!(outcome.events, vec![BoardEvent::AgentEnteredLoop { color: Color::White }]);
        assert!(!board.is_live(Color::White));
        assert_eq!(
            board.state().avatar_of(Color::Black),
            Some(Avatar::new(pos(5, 0), Port::RightTop))
        );
        assert!(board.state().tile_at(pos(2, 2)).is_none());
        assert_eq!(board.state().tile_count(), 4);
    }

    #[test]
    fn test_intermediate_move_requires_live_agent() {
        let mut board = Board::from_initial_placements(&[placement(0, 0, Port::RightTop, Color::White)]).unwrap();
        let before = board.state().clone();

        let result = board.intermediate_move(&IntermediateMove::new(straight(), Color::Red));
        assert_eq!(result, Err(BoardError::AgentNotLive(Color::Red)));
        assert_eq!(board.state(), &before);
    }

    #[test]
    fn test_occupied_target_is_invariant_violation() {
        let state = BoardState::new()
            .with_tile(straight(), pos(0, 0))
            .with_tile(straight(), pos(1, 0))
            .with_avatar(Color::White, Avatar::new(pos(0, 0), Port::RightTop));
        let mut board = Board::from_state(state.clone());

        let err = board
            .intermediate_move(&IntermediateMove::new(straight(), Color::White))
            .unwrap_err();
        assert_eq!(err, BoardError::TargetOccupied { color: Color::White, position: pos(1, 0) });
        assert!(err.is_invariant_violation());
        assert_eq!(board.state(), &state);
    }

    #[test]
    fn test_scissors_placement_moves_agents() {
        let mut board = Board::from_initial_placements(&[placement(0, 0, Port::RightTop, Color::White)]).unwrap();
        let outcome = board.place_tile_at_index_with_scissors(straight(), pos(1, 0)).unwrap();

        assert!(outcome.events.is_empty());
        assert_eq!(
            board.state().avatar_of(Color::White),
            Some(Avatar::new(pos(1, 0), Port::RightTop))
        );
    }

    #[test]
    fn test_scissors_never_overwrite_a_tile() {
        let mut board = Board::from_initial_placements(&[placement(0, 0, Port::RightTop, Color::White)]).unwrap();
        let before = board.state().clone();

        assert_eq!(
            board.place_tile_at_index_with_scissors(Tile::catalogue()[7], pos(0, 0)),
            Err(BoardError::CellOccupied(pos(0, 0)))
        );
        assert_eq!(board.state(), &before);

        let err = board
            .initial_move_with_scissors(&placement(0, 0, Port::TopRight, Color::Black))
            .unwrap_err();
        assert_eq!(err, BoardError::CellOccupied(pos(0, 0)));
        assert!(!err.is_invariant_violation());
        assert_eq!(board.state(), &before);
        assert!(!board.is_live(Color::Black));
    }

    #[test]
    fn test_from_moves_reports_first_failure() {
        let placements = [placement(0, 0, Port::RightTop, Color::White)];
        let moves = [
            IntermediateMove::new(straight(), Color::White),
            IntermediateMove::new(straight(), Color::Black),
        ];
        assert_eq!(
            Board::from_moves(&placements, &moves).unwrap_err(),
            BoardError::AgentNotLive(Color::Black)
        );

        let board = Board::from_moves(&placements, &moves[..1]).unwrap();
        assert_eq!(board.state().tile_count(), 2);
    }

    #[test]
    fn test_remove_agent() {
        let mut board = Board::from_initial_placements(&[placement(0, 0, Port::RightTop, Color::White)]).unwrap();
        assert!(board.remove_agent(Color::White));
        assert!(!board.remove_agent(Color::White));
        assert!(board.live_agents().is_empty());
        assert_eq!(board.state().tile_count(), 1);
    }

    proptest! {
        #[test]
        fn prop_rejected_initial_move_leaves_board_unchanged(
            x in 0u8..10,
            y in 0u8..10,
            index in 0usize..35,
            port in 0usize..8,
        ) {
            let mut board = Board::from_initial_placements(&[placement(2, 0, Port::BottomRight, Color::White)]).unwrap();
            let before = board.state().clone();
            let mv = InitialMove::new(pos(x, y), Tile::catalogue()[index], Port::from_index(port), Color::Black);

            match board.initial_move(&mv) {
                Ok(_) => prop_assert!(board.is_live(Color::Black)),
                Err(_) => prop_assert_eq!(board.state(), &before),
            }
        }
    }
}
