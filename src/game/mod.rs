//! Game logic
//!
//! Board model and legality. Everything here is synchronous and
//! deterministic; the referee layer drives it.

pub mod board;
pub mod constraint;
pub mod events;
pub mod moves;
pub mod rules;
pub mod state;

pub use board::{Board, BoardError};
pub use constraint::{PhysicalConstraintChecker, PlacementError};
pub use events::{BoardEvent, MoveOutcome};
pub use moves::{InitialMove, IntermediateMove};
pub use rules::{RuleChecker, RuleViolation, INITIAL_TILE_CHOICES, TURN_TILE_CHOICES};
pub use state::{Avatar, BoardState};
