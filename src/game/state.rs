//! Board State
//!
//! Immutable snapshot of a board: the tiles laid so far and where every live
//! agent is standing. Each transition returns a new snapshot and leaves the
//! old one untouched, so a state handed to an agent or an observer can never
//! change underneath it.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{BoardPosition, Color, Port, Tile};

/// Where a live agent rests: a tile position and the port it sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Avatar {
    /// Cell holding the agent's current tile.
    pub position: BoardPosition,
    /// Port of that tile the agent sits on.
    pub port: Port,
}

impl Avatar {
    /// Avatar at `position` on `port`.
    pub fn new(position: BoardPosition, port: Port) -> Self {
        Self { position, port }
    }

    /// The cell the agent is facing, `None` when that is off the board.
    #[inline]
    pub fn facing(&self) -> Option<BoardPosition> {
        self.position.step(self.port.direction())
    }
}

/// Snapshot of tiles and live agents.
///
/// Both maps are shared behind `Arc`; cloning a state is cheap and every
/// `with_*` call copies only the map it changes.
#[derive(Clone, Debug, Default)]
pub struct BoardState {
    tiles: Arc<BTreeMap<BoardPosition, Tile>>,
    live_agents: Arc<BTreeMap<Color, Avatar>>,
}

impl BoardState {
    /// An empty board.
    pub fn new() -> Self {
        Self::default()
    }

    // ===== QUERIES =====

    /// Tile at `position`, if one has been laid.
    #[inline]
    pub fn tile_at(&self, position: BoardPosition) -> Option<&Tile> {
        self.tiles.get(&position)
    }

    /// All laid tiles.
    pub fn tiles(&self) -> &BTreeMap<BoardPosition, Tile> {
        &self.tiles
    }

    /// Number of laid tiles.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// All live agents and where they stand.
    pub fn live_agents(&self) -> &BTreeMap<Color, Avatar> {
        &self.live_agents
    }

    /// Colors of the live agents.
    pub fn live_colors(&self) -> BTreeSet<Color> {
        self.live_agents.keys().copied().collect()
    }

    /// Where `color` stands, if it is live.
    pub fn avatar_of(&self, color: Color) -> Option<Avatar> {
        self.live_agents.get(&color).copied()
    }

    /// Whether `color` still has an avatar on the board.
    pub fn is_live(&self, color: Color) -> bool {
        self.live_agents.contains_key(&color)
    }

    /// The cell a live agent is facing. `None` if the agent is not live or
    /// faces off the board.
    pub fn position_ahead_of(&self, color: Color) -> Option<BoardPosition> {
        self.avatar_of(color).and_then(|avatar| avatar.facing())
    }

    /// True when none of the on-board cardinal neighbours of `position`
    /// holds a tile.
    pub fn surrounding_positions_are_empty(&self, position: BoardPosition) -> bool {
        position
            .cardinal_neighbors()
            .all(|neighbor| !self.tiles.contains_key(&neighbor))
    }

    /// True when `port` at `position` opens onto another board cell rather
    /// than the outer wall.
    pub fn port_faces_interior(&self, position: BoardPosition, port: Port) -> bool {
        position.step(port.direction()).is_some()
    }

    // ===== TRANSITIONS =====

    /// New state with `tile` laid at `position`, replacing whatever was
    /// there. [`Board`](crate::game::board::Board) only lays on empty cells.
    pub fn with_tile(&self, tile: Tile, position: BoardPosition) -> Self {
        let mut tiles = (*self.tiles).clone();
        tiles.insert(position, tile);
        Self {
            tiles: Arc::new(tiles),
            live_agents: Arc::clone(&self.live_agents),
        }
    }

    /// New state with the live-agent map replaced.
    pub fn with_live_agents(&self, live_agents: BTreeMap<Color, Avatar>) -> Self {
        Self {
            tiles: Arc::clone(&self.tiles),
            live_agents: Arc::new(live_agents),
        }
    }

    /// New state with `color` standing at `avatar`.
    pub fn with_avatar(&self, color: Color, avatar: Avatar) -> Self {
        let mut live_agents = (*self.live_agents).clone();
        live_agents.insert(color, avatar);
        self.with_live_agents(live_agents)
    }

    /// New state without `color`'s avatar.
    pub fn without_agent(&self, color: Color) -> Self {
        let mut live_agents = (*self.live_agents).clone();
        live_agents.remove(&color);
        self.with_live_agents(live_agents)
    }
}

impl PartialEq for BoardState {
    /// Tiles are compared including orientation.
    fn eq(&self, other: &Self) -> bool {
        self.live_agents == other.live_agents
            && self.tiles.len() == other.tiles.len()
            && self
                .tiles
                .iter()
                .zip(other.tiles.iter())
                .all(|((p1, t1), (p2, t2))| p1 == p2 && t1.same_orientation(t2))
    }
}

impl Eq for BoardState {}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pos(x: u8, y: u8) -> BoardPosition {
        BoardPosition::new(x, y).unwrap()
    }

    fn tile(index: usize) -> Tile {
        Tile::catalogue()[index]
    }

    #[test]
    fn test_empty_state() {
        let state = BoardState::new();
        assert_eq!(state.tile_count(), 0);
        assert!(state.live_agents().is_empty());
        assert!(state.surrounding_positions_are_empty(pos(4, 4)));
    }

    #[test]
    fn test_port_faces_interior() {
        let state = BoardState::new();
        assert!(!state.port_faces_interior(pos(0, 5), Port::LeftTop));
        assert!(!state.port_faces_interior(pos(0, 5), Port::LeftBottom));
        assert!(state.port_faces_interior(pos(0, 5), Port::RightTop));
        assert!(!state.port_faces_interior(pos(5, 0), Port::TopLeft));
        assert!(!state.port_faces_interior(pos(9, 5), Port::RightBottom));
        assert!(!state.port_faces_interior(pos(5, 9), Port::BottomRight));
        assert!(state.port_faces_interior(pos(5, 9), Port::TopRight));
    }

    #[test]
    fn test_surrounding_positions() {
        let state = BoardState::new().with_tile(tile(0), pos(3, 0));
        assert!(!state.surrounding_positions_are_empty(pos(2, 0)));
        assert!(!state.surrounding_positions_are_empty(pos(3, 1)));
        assert!(state.surrounding_positions_are_empty(pos(4, 1)));
    }

    #[test]
    fn test_avatar_queries() {
        let state = BoardState::new()
            .with_tile(tile(0), pos(0, 3))
            .with_avatar(Color::Red, Avatar::new(pos(0, 3), Port::RightTop));

        assert!(state.is_live(Color::Red));
        assert!(!state.is_live(Color::Blue));
        assert_eq!(state.position_ahead_of(Color::Red), Some(pos(1, 3)));
        assert_eq!(state.position_ahead_of(Color::Blue), None);

        let gone = state.without_agent(Color::Red);
        assert!(!gone.is_live(Color::Red));
        assert!(state.is_live(Color::Red));
    }

    #[test]
    fn test_equality_respects_orientation() {
        let base = tile(5);
        let a = BoardState::new().with_tile(base, pos(0, 1));
        let b = BoardState::new().with_tile(base, pos(0, 1));
        assert_eq!(a, b);

        let turned = base.rotate();
        if !turned.same_orientation(&base) {
            let c = BoardState::new().with_tile(turned, pos(0, 1));
            assert_ne!(a, c);
        }
    }

    proptest! {
        #[test]
        fn prop_transitions_leave_snapshot_unchanged(
            cells in proptest::collection::btree_set((0u8..10, 0u8..10), 1..20),
            index in 0usize..35,
        ) {
            let mut cells: Vec<_> = cells.into_iter().collect();
            let (nx, ny) = cells.pop().unwrap();

            let mut state = BoardState::new();
            for (x, y) in cells {
                state = state.with_tile(tile(index), pos(x, y));
            }
            let before = state.clone();
            let tiles_before = state.tile_count();

            let next = state
                .with_tile(tile(index), pos(nx, ny))
                .with_avatar(Color::White, Avatar::new(pos(nx, ny), Port::TopLeft));

            prop_assert_eq!(&state, &before);
            prop_assert_eq!(state.tile_count(), tiles_before);
            prop_assert!(!state.is_live(Color::White));
            prop_assert_eq!(next.tile_count(), tiles_before + 1);
            prop_assert!(next.is_live(Color::White));
        }
    }
}
