//! World-generation seeding of herds onto a map

use ahash::AHashSet;
use rand::Rng;

use crate::animal::{Animal, AnimalKind};
use crate::core::error::{Result, WildError};
use crate::core::types::TileCoord;
use crate::grid::{GridMap, TileMap};
use crate::herd::Herd;
use crate::registry::HerdRegistry;

/// Knobs for initial population
#[derive(Debug, Clone)]
pub struct PopulatorConfig {
    /// How many herds to place
    pub herd_count: usize,
    /// Target tiles per territory; growth stops early if the map runs out
    pub territory_size: usize,
    /// Attempts to find a passable start tile before giving up
    pub placement_attempts: usize,
}

impl Default for PopulatorConfig {
    fn default() -> Self {
        Self {
            herd_count: 8,
            territory_size: 12,
            placement_attempts: 64,
        }
    }
}

/// Grow a contiguous territory from a seed tile.
///
/// Frontier growth: each step claims a uniformly random unclaimed
/// passable neighbor of the territory so far. An exhausted frontier
/// ends growth early with a smaller (still connected) territory.
pub fn grow_territory(
    map: &dyn TileMap,
    seed: TileCoord,
    target_size: usize,
    rng: &mut impl Rng,
) -> Vec<TileCoord> {
    let mut claimed: AHashSet<TileCoord> = AHashSet::new();
    let mut territory = vec![seed];
    claimed.insert(seed);

    let mut frontier: Vec<TileCoord> = map
        .passable_neighbors(seed)
        .into_iter()
        .filter(|t| !claimed.contains(t))
        .collect();

    while territory.len() < target_size && !frontier.is_empty() {
        let pick = frontier.swap_remove(rng.gen_range(0..frontier.len()));
        if claimed.contains(&pick) {
            continue;
        }
        claimed.insert(pick);
        territory.push(pick);
        for neighbor in map.passable_neighbors(pick) {
            if !claimed.contains(&neighbor) {
                frontier.push(neighbor);
            }
        }
    }
    territory
}

/// Pick an animal kind by spawn weight
fn roll_kind(rng: &mut impl Rng) -> AnimalKind {
    let total: f32 = AnimalKind::ALL.iter().map(|k| k.spawn_weight()).sum();
    let mut roll = rng.gen::<f32>() * total;
    for kind in AnimalKind::ALL {
        roll -= kind.spawn_weight();
        if roll <= 0.0 {
            return kind;
        }
    }
    AnimalKind::ALL[AnimalKind::ALL.len() - 1]
}

fn find_start_tile(
    map: &GridMap,
    attempts: usize,
    rng: &mut impl Rng,
) -> Result<TileCoord> {
    let mut last = TileCoord::new(0, 0);
    for _ in 0..attempts {
        let tile = TileCoord::new(rng.gen_range(0..map.width), rng.gen_range(0..map.height));
        if map.is_passable(tile) {
            return Ok(tile);
        }
        last = tile;
    }
    Err(WildError::NoPassableTile(last))
}

/// Seed a registry with herds placed across the map.
///
/// Each herd gets a contiguous territory grown from a random passable
/// tile, a population drawn from the catalog's size range, and starts
/// resting at its seed tile.
pub fn populate(
    map: &GridMap,
    cfg: &PopulatorConfig,
    rng: &mut impl Rng,
) -> Result<HerdRegistry> {
    let mut registry = HerdRegistry::new();
    for _ in 0..cfg.herd_count {
        let seed = find_start_tile(map, cfg.placement_attempts, rng)?;
        let kind = roll_kind(rng);
        let territory = grow_territory(map, seed, cfg.territory_size, rng);

        let mut herd = Herd::new(kind, seed, territory);
        let (lo, hi) = kind.herd_size_range();
        let size = rng.gen_range(lo..=hi);
        for _ in 0..size {
            herd.add_member(Animal::new(kind, rng));
        }
        tracing::info!(
            herd = ?herd.id,
            kind = %kind.display_name(),
            size,
            tiles = herd.territory.len(),
            at = ?seed,
            "herd placed"
        );
        registry.add_herd(herd);
    }
    Ok(registry)
}
