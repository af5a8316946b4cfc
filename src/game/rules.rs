//! Rule Checker
//!
//! Strategic legality on top of the board's physical checks. A move may not
//! send an agent into a loop or lead the mover off the board, unless every
//! offered tile in every rotation would do the same: a forced move is
//! always legal.
//!
//! All checks simulate on a scratch [`Board`] built from the given state;
//! the caller's state is never touched.

use crate::core::{Color, Tile};
use crate::game::board::{Board, BoardError};
use crate::game::moves::{InitialMove, IntermediateMove};
use crate::game::state::BoardState;

/// Tiles offered for an initial move.
pub const INITIAL_TILE_CHOICES: usize = 3;

/// Tiles offered for an intermediate move.
pub const TURN_TILE_CHOICES: usize = 2;

/// Why a move was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleViolation {
    /// The agent was offered the wrong number of tiles.
    #[error("cannot validate move with {actual} tile choices (expected {expected})")]
    WrongChoiceCount {
        /// Required count.
        expected: usize,
        /// Count supplied.
        actual: usize,
    },

    /// The chosen tile is not one of the offered tiles in any rotation.
    #[error("tile {0} was not one of the tiles offered")]
    TileNotOffered(Tile),

    /// The board rejected the move.
    #[error(transparent)]
    Board(#[from] BoardError),

    /// The tile causes a loop that another choice avoids.
    #[error("{color} chose {chosen}, which causes a loop, but {alternative} does not")]
    UnforcedLoop {
        /// Mover.
        color: Color,
        /// Rejected tile.
        chosen: Tile,
        /// Offered tile and rotation avoiding the loop.
        alternative: Tile,
    },

    /// The tile leads the mover off the board while another choice does not.
    #[error("{color} chose {chosen}, which is suicidal, but {alternative} is not")]
    UnforcedSuicide {
        /// Mover.
        color: Color,
        /// Rejected tile.
        chosen: Tile,
        /// Offered tile and rotation avoiding the exit.
        alternative: Tile,
    },
}

impl RuleViolation {
    /// True when the rejection comes from broken board bookkeeping rather
    /// than from the move itself.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, RuleViolation::Board(err) if err.is_invariant_violation())
    }
}

/// Forbidden outcomes, checked in this order.
#[derive(Debug, Clone, Copy)]
enum Hazard {
    Loop,
    Suicide,
}

impl Hazard {
    fn occurs(
        self,
        rules: &RuleChecker,
        state: &BoardState,
        mv: &IntermediateMove,
    ) -> Result<bool, BoardError> {
        match self {
            Hazard::Loop => rules.move_creates_loop(state, mv),
            Hazard::Suicide => rules.is_move_suicidal(state, mv),
        }
    }

    fn violation(self, mv: &IntermediateMove, alternative: Tile) -> RuleViolation {
        let (color, chosen) = (mv.color, mv.tile);
        match self {
            Hazard::Loop => RuleViolation::UnforcedLoop { color, chosen, alternative },
            Hazard::Suicide => RuleViolation::UnforcedSuicide { color, chosen, alternative },
        }
    }
}

/// Judges moves against a board state.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleChecker;

impl RuleChecker {
    /// New rule checker.
    pub fn new() -> Self {
        Self
    }

    /// Check an initial move against the tiles offered.
    pub fn validate_initial_move(
        &self,
        state: &BoardState,
        choices: &[Tile],
        mv: &InitialMove,
    ) -> Result<(), RuleViolation> {
        check_choices(choices, INITIAL_TILE_CHOICES, &mv.tile)?;
        Board::from_state(state.clone()).validate_initial_move(mv)?;
        Ok(())
    }

    /// Check an intermediate move against the tiles offered.
    pub fn validate_move(
        &self,
        state: &BoardState,
        choices: &[Tile],
        mv: &IntermediateMove,
    ) -> Result<(), RuleViolation> {
        check_choices(choices, TURN_TILE_CHOICES, &mv.tile)?;
        Board::from_state(state.clone()).validate_intermediate_move(mv)?;
        self.check_forced(state, choices, mv, Hazard::Loop)?;
        self.check_forced(state, choices, mv, Hazard::Suicide)?;
        Ok(())
    }

    /// True when the mover leaves the board and nobody loops. A move that
    /// loops is never suicidal.
    pub fn is_move_suicidal(&self, state: &BoardState, mv: &IntermediateMove) -> Result<bool, BoardError> {
        let mut board = Board::from_state(state.clone());
        let outcome = board.intermediate_move(mv)?;
        Ok(!board.is_live(mv.color) && !outcome.entered_loop())
    }

    /// True when the move sends any agent into a loop.
    pub fn move_creates_loop(&self, state: &BoardState, mv: &IntermediateMove) -> Result<bool, BoardError> {
        let mut board = Board::from_state(state.clone());
        Ok(board.intermediate_move(mv)?.entered_loop())
    }

    /// Suicidal or looping, regardless of what else was offered.
    pub fn is_move_illegal(&self, state: &BoardState, mv: &IntermediateMove) -> Result<bool, BoardError> {
        Ok(self.is_move_suicidal(state, mv)? || self.move_creates_loop(state, mv)?)
    }

    fn check_forced(
        &self,
        state: &BoardState,
        choices: &[Tile],
        mv: &IntermediateMove,
        hazard: Hazard,
    ) -> Result<(), RuleViolation> {
        if !hazard.occurs(self, state, mv)? {
            return Ok(());
        }
        for offered in choices {
            for rotation in offered.all_rotations() {
                let alternative = IntermediateMove::new(rotation, mv.color);
                if !hazard.occurs(self, state, &alternative)? {
                    return Err(hazard.violation(mv, rotation));
                }
            }
        }
        Ok(())
    }
}

fn check_choices(choices: &[Tile], expected: usize, chosen: &Tile) -> Result<(), RuleViolation> {
    if choices.len() != expected {
        return Err(RuleViolation::WrongChoiceCount { expected, actual: choices.len() });
    }
    if !choices.contains(chosen) {
        return Err(RuleViolation::TileNotOffered(*chosen));
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
