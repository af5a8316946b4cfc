//! Tiles
//!
//! A tile joins its eight ports into four paths. Two tiles are equal when
//! one is a rotation of the other, so a hand of tiles can be compared
//! without caring how each one happens to be turned. Code that cares about
//! orientation (a tile already on the board, for instance) compares with
//! [`Tile::same_orientation`].

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::port::{Port, PORT_COUNT};

/// Number of distinct tiles up to rotation.
pub const TILE_KINDS: usize = 35;

/// Number of paths on a tile.
pub const EDGES_PER_TILE: usize = 4;

/// Errors constructing a tile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TileError {
    /// Wrong number of edges.
    #[error("a tile needs exactly {EDGES_PER_TILE} edges, got {0}")]
    EdgeCount(usize),

    /// A port number outside 0..8.
    #[error("port index {0} is out of range")]
    PortOutOfRange(usize),

    /// An edge from a port to itself.
    #[error("port {0} cannot connect to itself")]
    SelfLoop(Port),

    /// A port used by more than one edge.
    #[error("port {0} appears in more than one edge")]
    DuplicatePort(Port),

    /// Catalogue index outside the known tiles.
    #[error("tile index {0} is out of range (0..{TILE_KINDS})")]
    IndexOutOfRange(usize),

    /// Rotation that is not a multiple of 90°.
    #[error("rotation of {0}° is not one of 0, 90, 180, 270")]
    InvalidRotation(u16),
}

/// A tile: four paths pairing up all eight ports.
///
/// Stored as a port-to-port link table, so every port always has exactly
/// one partner.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<(Port, Port)>", into = "Vec<(Port, Port)>")]
pub struct Tile {
    links: [Port; PORT_COUNT],
}

impl Tile {
    /// Build a tile from its edges.
    pub fn new(edges: &[(Port, Port)]) -> Result<Self, TileError> {
        if edges.len() != EDGES_PER_TILE {
            return Err(TileError::EdgeCount(edges.len()));
        }

        let mut links: [Option<Port>; PORT_COUNT] = [None; PORT_COUNT];
        for &(a, b) in edges {
            if a == b {
                return Err(TileError::SelfLoop(a));
            }
            for port in [a, b] {
                if links[port.index()].is_some() {
                    return Err(TileError::DuplicatePort(port));
                }
            }
            links[a.index()] = Some(b);
            links[b.index()] = Some(a);
        }

        // Four disjoint pairs of distinct ports cover all eight.
        let mut resolved = Port::ALL;
        for (slot, (port, link)) in resolved.iter_mut().zip(Port::ALL.into_iter().zip(links)) {
            *slot = link.ok_or(TileError::DuplicatePort(port))?;
        }
        Ok(Self { links: resolved })
    }

    /// Build a tile from numeric port pairs.
    pub fn from_indices(edges: &[(usize, usize)]) -> Result<Self, TileError> {
        let ports = edges
            .iter()
            .map(|&(a, b)| Ok((port_at(a)?, port_at(b)?)))
            .collect::<Result<Vec<_>, TileError>>()?;
        Self::new(&ports)
    }

    /// The 35 distinct tiles in catalogue order.
    pub fn catalogue() -> &'static [Tile] {
        static CATALOGUE: OnceLock<Vec<Tile>> = OnceLock::new();
        CATALOGUE.get_or_init(build_catalogue)
    }

    /// Tile from a catalogue index and a clockwise rotation in degrees.
    pub fn from_pattern(index: usize, degrees: u16) -> Result<Self, TileError> {
        let base = Self::catalogue()
            .get(index)
            .copied()
            .ok_or(TileError::IndexOutOfRange(index))?;
        if degrees % 90 != 0 || degrees >= 360 {
            return Err(TileError::InvalidRotation(degrees));
        }
        Ok(base.rotated((degrees / 90) as u8))
    }

    /// The port on the other end of the path entering at `port`.
    #[inline]
    pub fn connected_port(&self, port: Port) -> Port {
        self.links[port.index()]
    }

    /// This tile turned 90° clockwise.
    pub fn rotate(&self) -> Tile {
        let mut links = self.links;
        for port in Port::ALL {
            links[port.rotated_clockwise().index()] = self.links[port.index()].rotated_clockwise();
        }
        Tile { links }
    }

    /// This tile turned clockwise `quarter_turns` times.
    pub fn rotated(&self, quarter_turns: u8) -> Tile {
        (0..quarter_turns % 4).fold(*self, |tile, _| tile.rotate())
    }

    /// The tile at 0°, 90°, 180° and 270°, in that order.
    pub fn all_rotations(&self) -> [Tile; 4] {
        let quarter = self.rotate();
        let half = quarter.rotate();
        [*self, quarter, half, half.rotate()]
    }

    /// Edges as `(low, high)` port pairs, sorted.
    pub fn edges(&self) -> [(Port, Port); EDGES_PER_TILE] {
        let mut edges = [(Port::TopLeft, Port::TopLeft); EDGES_PER_TILE];
        let pairs = Port::ALL
            .into_iter()
            .filter(|port| *port < self.connected_port(*port))
            .map(|port| (port, self.connected_port(port)));
        for (slot, pair) in edges.iter_mut().zip(pairs) {
            *slot = pair;
        }
        edges
    }

    /// True when both tiles are identical including orientation.
    #[inline]
    pub fn same_orientation(&self, other: &Tile) -> bool {
        self.links == other.links
    }

    /// Clockwise quarter turns taking this tile to `other`'s orientation,
    /// or `None` when they are different tiles.
    pub fn quarter_turns_to(&self, other: &Tile) -> Option<u8> {
        self.all_rotations()
            .iter()
            .position(|rotation| rotation.same_orientation(other))
            .map(|turns| turns as u8)
    }

    /// Catalogue index and rotation of this tile. Every valid tile has one.
    pub fn pattern(&self) -> Option<TilePattern> {
        Self::catalogue()
            .iter()
            .enumerate()
            .find_map(|(index, base)| {
                base.quarter_turns_to(self).map(|turns| TilePattern {
                    index,
                    degrees: u16::from(turns) * 90,
                })
            })
    }

    /// Rotation-independent key; the smallest link table over all rotations.
    fn canonical_key(&self) -> [u8; PORT_COUNT] {
        self.all_rotations()
            .iter()
            .map(|tile| tile.links.map(|port| port as u8))
            .min()
            .unwrap_or_default()
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_key() == other.canonical_key()
    }
}

impl Eq for Tile {}

impl Hash for Tile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_key().hash(state);
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, (a, b)) in self.edges().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{a}-{b}")?;
        }
        write!(f, "]")
    }
}

impl TryFrom<Vec<(Port, Port)>> for Tile {
    type Error = TileError;

    fn try_from(edges: Vec<(Port, Port)>) -> Result<Self, Self::Error> {
        Tile::new(&edges)
    }
}

impl From<Tile> for Vec<(Port, Port)> {
    fn from(tile: Tile) -> Self {
        tile.edges().to_vec()
    }
}

/// A tile named by catalogue index and clockwise rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePattern {
    /// Index into [`Tile::catalogue`].
    pub index: usize,
    /// Clockwise rotation: 0, 90, 180 or 270.
    pub degrees: u16,
}

impl fmt::Display for TilePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}", self.index, self.degrees)
    }
}

fn port_at(index: usize) -> Result<Port, TileError> {
    if index < PORT_COUNT {
        Ok(Port::from_index(index))
    } else {
        Err(TileError::PortOutOfRange(index))
    }
}

/// Every way to split `ports` into pairs. The first port is paired with each
/// later port in turn, recursing on what is left.
fn pairings(ports: &[Port]) -> Vec<Vec<(Port, Port)>> {
    let Some((&first, rest)) = ports.split_first() else {
        return vec![Vec::new()];
    };

    let mut result = Vec::new();
    for (i, &partner) in rest.iter().enumerate() {
        let remaining: Vec<Port> = rest
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, &port)| port)
            .collect();
        for tail in pairings(&remaining) {
            let mut edges = Vec::with_capacity(tail.len() + 1);
            edges.push((first, partner));
            edges.extend(tail);
            result.push(edges);
        }
    }
    result
}

/// All 105 pairings, deduplicated by rotation, keeping first occurrences.
fn build_catalogue() -> Vec<Tile> {
    let mut tiles: Vec<Tile> = Vec::with_capacity(TILE_KINDS);
    for edges in pairings(&Port::ALL) {
        if let Ok(tile) = Tile::new(&edges) {
            if !tiles.contains(&tile) {
                tiles.push(tile);
            }
        }
    }
    tiles
}

// =============================================================================
// TESTS
// =============================================================================
