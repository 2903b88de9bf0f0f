//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for herds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HerdId(pub Uuid);

impl HerdId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for HerdId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for individual animals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimalId(pub Uuid);

impl AnimalId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AnimalId {
    fn default() -> Self {
        Self::new()
    }
}

/// Simulation time, in whole minutes since world creation
pub type Minutes = u64;

/// A square-grid tile coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance in tile steps
    pub fn manhattan_distance(&self, other: &TileCoord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// The 4 orthogonally adjacent tiles
    pub fn neighbors(&self) -> [TileCoord; 4] {
        [
            TileCoord::new(self.x + 1, self.y),
            TileCoord::new(self.x - 1, self.y),
            TileCoord::new(self.x, self.y + 1),
            TileCoord::new(self.x, self.y - 1),
        ]
    }

    /// One greedy axis-dominant step toward `target`, ties broken by X first.
    ///
    /// Returns `self` unchanged when already at the target.
    pub fn step_toward(&self, target: &TileCoord) -> TileCoord {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        if dx == 0 && dy == 0 {
            return *self;
        }
        if dx.abs() >= dy.abs() {
            TileCoord::new(self.x + dx.signum(), self.y)
        } else {
            TileCoord::new(self.x, self.y + dy.signum())
        }
    }

    /// One greedy axis-dominant step away from `threat`, ties broken by X first.
    ///
    /// When standing on the threat tile there is no dominant axis; the step
    /// defaults to +X so a fleeing herd always moves.
    pub fn step_away(&self, threat: &TileCoord) -> TileCoord {
        let dx = self.x - threat.x;
        let dy = self.y - threat.y;
        if dx == 0 && dy == 0 {
            return TileCoord::new(self.x + 1, self.y);
        }
        if dx.abs() >= dy.abs() {
            TileCoord::new(self.x + dx.signum(), self.y)
        } else {
            TileCoord::new(self.x, self.y + dy.signum())
        }
    }
}
