//! Boundary types for the surrounding game state
//!
//! The simulation never reaches into player or world internals; it reads
//! an [`ObserverContext`] snapshot each tick and pushes side effects out
//! through the [`Environment`] trait.

use crate::animal::Animal;
use crate::core::types::TileCoord;

/// Everything the wildlife can perceive about the observer this tick
///
/// Every field here is information the player can reason about: position,
/// what they carry, whether they are bleeding, how formidable they look.
/// Boldness and threat-assessment math read only these values.
#[derive(Debug, Clone, Copy)]
pub struct ObserverContext {
    pub position: TileCoord,
    pub carrying_meat: bool,
    /// Bleeding severity, 0.0 = none, 1.0 = gushing
    pub bleeding: f32,
    /// Fraction of full health, 0.0..=1.0
    pub vitality: f32,
    /// Body plus pack weight in kg
    pub mass: f32,
    /// Effective attack rating of the readied weapon
    pub attack: f32,
}

impl ObserverContext {
    pub fn at(position: TileCoord) -> Self {
        Self {
            position,
            carrying_meat: false,
            bleeding: 0.0,
            vitality: 1.0,
            mass: 80.0,
            attack: 10.0,
        }
    }

    /// Threat product used by scavenger flee assessment
    pub fn threat_rating(&self) -> f32 {
        self.vitality * self.attack * self.mass
    }
}

/// Side effects the simulation pushes into the wider game world
pub trait Environment {
    /// Leave a carcass on the ground where a prey animal was killed
    fn create_carcass_at(&mut self, tile: TileCoord, victim: &Animal);
}

/// Record of a carcass left in the world
#[derive(Debug, Clone)]
pub struct Carcass {
    pub tile: TileCoord,
    pub kind: crate::animal::AnimalKind,
    pub weight_kg: f32,
}

/// Environment that just accumulates carcasses; used by the demo driver
/// and by tests that need to observe kill side effects.
#[derive(Debug, Default)]
pub struct CarcassLog {
    pub carcasses: Vec<Carcass>,
}

impl Environment for CarcassLog {
    fn create_carcass_at(&mut self, tile: TileCoord, victim: &Animal) {
        tracing::info!(?tile, kind = ?victim.kind, "carcass created");
        self.carcasses.push(Carcass {
            tile,
            kind: victim.kind,
            weight_kg: victim.kind.weight_kg() * victim.traits.size_modifier,
        });
    }
}
