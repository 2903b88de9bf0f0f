//! Tile map consumed as an opaque coordinate service
//!
//! The simulation only needs existence, passability and adjacency; the
//! real game map sits behind the [`TileMap`] trait. [`GridMap`] is the
//! concrete implementation used by the demo driver and tests.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::types::TileCoord;

/// Map surface the simulation reads
pub trait TileMap {
    /// Whether the tile exists on the map at all
    fn contains(&self, tile: TileCoord) -> bool;

    /// Whether an animal can occupy the tile
    fn is_passable(&self, tile: TileCoord) -> bool;

    /// Passable, on-map orthogonal neighbors of a tile
    fn passable_neighbors(&self, tile: TileCoord) -> Vec<TileCoord> {
        tile.neighbors()
            .into_iter()
            .filter(|t| self.is_passable(*t))
            .collect()
    }
}

/// Rectangular tile map with an explicit set of blocked tiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridMap {
    pub width: i32,
    pub height: i32,
    blocked: AHashSet<TileCoord>,
}

impl GridMap {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            blocked: AHashSet::new(),
        }
    }

    /// Mark a tile as impassable (water, cliff, dense deadfall)
    pub fn block(&mut self, tile: TileCoord) {
        self.blocked.insert(tile);
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked.len()
    }
}

impl TileMap for GridMap {
    fn contains(&self, tile: TileCoord) -> bool {
        tile.x >= 0 && tile.y >= 0 && tile.x < self.width && tile.y < self.height
    }

    fn is_passable(&self, tile: TileCoord) -> bool {
        self.contains(tile) && !self.blocked.contains(&tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let map = GridMap::new(10, 8);
        assert!(map.contains(TileCoord::new(0, 0)));
        assert!(map.contains(TileCoord::new(9, 7)));
        assert!(!map.contains(TileCoord::new(10, 0)));
        assert!(!map.contains(TileCoord::new(-1, 3)));
    }

    #[test]
    fn test_blocked_tiles_impassable() {
        let mut map = GridMap::new(5, 5);
        let rock = TileCoord::new(2, 2);
        assert!(map.is_passable(rock));
        assert_eq!(map.blocked_count(), 0);
        map.block(rock);
        assert!(!map.is_passable(rock));
        assert!(map.contains(rock));
        assert_eq!(map.blocked_count(), 1);
    }

    #[test]
    fn test_passable_neighbors_respects_edges() {
        let map = GridMap::new(3, 3);
        let corner = TileCoord::new(0, 0);
        let mut n = map.passable_neighbors(corner);
        n.sort_by_key(|t| (t.x, t.y));
        assert_eq!(n, vec![TileCoord::new(0, 1), TileCoord::new(1, 0)]);
    }
}
