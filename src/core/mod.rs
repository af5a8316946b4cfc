//! Core primitives
//!
//! Geometry and identity values shared by every other layer. All of them
//! are small `Copy` types with no interior mutability.

pub mod color;
pub mod port;
pub mod position;
pub mod rng;
pub mod tile;

pub use color::Color;
pub use port::{Direction, Port};
pub use position::BoardPosition;
pub use rng::DeterministicRng;
pub use tile::{Tile, TilePattern};
