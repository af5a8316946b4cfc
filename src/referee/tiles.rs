//! Tile Sources
//!
//! The referee draws from an endless supply of tiles. Any `Send` iterator
//! of tiles is a source; a source that runs dry aborts the match.

use crate::core::{DeterministicRng, Tile};

/// Supply of tiles for a match.
pub trait TileSource: Send {
    /// Next tile, `None` once the source is exhausted.
    fn next_tile(&mut self) -> Option<Tile>;

    /// The next `count` tiles, or `None` if the source runs out first.
    fn draw(&mut self, count: usize) -> Option<Vec<Tile>> {
        (0..count).map(|_| self.next_tile()).collect()
    }
}

impl<I> TileSource for I
where
    I: Iterator<Item = Tile> + Send,
{
    fn next_tile(&mut self) -> Option<Tile> {
        self.next()
    }
}

/// The catalogue in index order, repeated forever.
pub fn deterministic_tiles() -> impl Iterator<Item = Tile> + Send + Clone {
    Tile::catalogue().iter().copied().cycle()
}

/// Seeded bag of tiles: every 35 draws contain each catalogue tile once,
/// in an order fixed by the seed.
#[derive(Clone, Debug)]
pub struct ShuffledTiles {
    rng: DeterministicRng,
    bag: Vec<Tile>,
}

impl ShuffledTiles {
    /// Bag shuffled from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: DeterministicRng::new(seed),
            bag: Vec::new(),
        }
    }
}

impl Iterator for ShuffledTiles {
    type Item = Tile;

    fn next(&mut self) -> Option<Tile> {
        if self.bag.is_empty() {
            self.bag.extend_from_slice(Tile::catalogue());
            self.rng.shuffle(&mut self.bag);
        }
        self.bag.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tile::TILE_KINDS;
    use std::collections::HashSet;

    #[test]
    fn test_deterministic_tiles_cycle() {
        let mut source = deterministic_tiles();
        let first = source.draw(TILE_KINDS).unwrap();
        for (drawn, expected) in first.iter().zip(Tile::catalogue()) {
            assert!(drawn.same_orientation(expected));
        }
        let again = source.draw(3).unwrap();
        assert!(again[0].same_orientation(&Tile::catalogue()[0]));
    }

    #[test]
    fn test_shuffled_bag_holds_every_tile() {
        let mut source = ShuffledTiles::new(99);
        let pass: HashSet<Tile> = source.draw(TILE_KINDS).unwrap().into_iter().collect();
        assert_eq!(pass.len(), TILE_KINDS);
        assert!(source.next_tile().is_some());
    }

    #[test]
    fn test_shuffled_bag_is_seeded() {
        let a = ShuffledTiles::new(7).draw(20).unwrap();
        let b = ShuffledTiles::new(7).draw(20).unwrap();
        assert!(a.iter().zip(&b).all(|(x, y)| x.same_orientation(y)));
    }

    #[test]
    fn test_finite_source_runs_dry() {
        let mut source = vec![Tile::catalogue()[0]; 2].into_iter();
        assert!(source.draw(3).is_none());
    }
}
