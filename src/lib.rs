//! # Tsuro Referee
//!
//! Board model, rule checking and match refereeing for Tsuro, the
//! tile-laying path game, played by 3 to 5 untrusted agents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TSURO REFEREE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Geometry and identity values            │
//! │  ├── port.rs      - Tile ports, directions, adjoining ports │
//! │  ├── tile.rs      - Rotatable tiles and the 35-tile set     │
//! │  ├── position.rs  - 10x10 board coordinates                 │
//! │  ├── color.rs     - Agent colors                            │
//! │  └── rng.rs       - Seeded PRNG for tile shuffling          │
//! │                                                              │
//! │  game/            - Board and legality (deterministic)      │
//! │  ├── state.rs     - Immutable board snapshots               │
//! │  ├── board.rs     - Transactional board, path following     │
//! │  ├── constraint.rs- Physical placement constraints          │
//! │  ├── rules.rs     - Forced loop / suicide rules             │
//! │  ├── moves.rs     - Initial and intermediate moves          │
//! │  └── events.rs    - Exits and loops caused by a move        │
//! │                                                              │
//! │  referee/         - Match driver (async, untrusted agents)  │
//! │  ├── session.rs   - Referee state machine and ranking       │
//! │  ├── isolation.rs - Timed, panic-safe agent calls           │
//! │  ├── agent.rs     - Agent interface                         │
//! │  ├── observer.rs  - Match observers                         │
//! │  ├── tiles.rs     - Tile sources                            │
//! │  └── result.rs    - Match result                            │
//! │                                                              │
//! │  player/          - Reference agents                        │
//! │  └── strategy.rs  - Clockwise, safe, counter-clockwise      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! `core/` and `game/` never read the clock and iterate `BTreeMap`s only,
//! so a tile sequence and a roster of deterministic agents always produce
//! the same match. Only `referee/` deals with time, through per-call
//! timeouts.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod player;
pub mod referee;

// Re-export commonly used types
pub use core::position::BOARD_SIZE;
pub use core::{BoardPosition, Color, DeterministicRng, Port, Tile};
pub use game::{Board, BoardState, InitialMove, IntermediateMove, RuleChecker};
pub use player::{ClockwiseStrategy, CounterClockwiseStrategy, Player, SafeStrategy};
pub use referee::{
    shared, Agent, MatchResult, Referee, RefereeConfig, RefereeError, SharedAgent, MAX_AGENTS,
    MIN_AGENTS,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
