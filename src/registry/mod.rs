//! Registry owning every live herd
//!
//! The registry is the only entry point the game loop talks to: it
//! advances all herds, runs the predator/prey pass, prunes emptied
//! herds, and answers location queries.

use ahash::AHashMap;
use rand::Rng;

use crate::animal::{Animal, AnimalKind, BehaviorClass, SizeClass};
use crate::context::{Environment, ObserverContext};
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, WildError};
use crate::core::types::{AnimalId, HerdId, TileCoord};
use crate::grid::TileMap;
use crate::herd::{Herd, HerdEvent, HerdState, Liveness};

/// What happened across the registry during one update
#[derive(Debug, Clone)]
pub enum RegistryEvent {
    /// A hunting herd reached the observer; combat hand-off
    EncounterRequested { herd: HerdId, animal: AnimalId },
    /// Narrative color for the event log
    Note(String),
    /// A predator herd took an animal from a prey herd
    PreyKilled {
        predator: HerdId,
        prey: HerdId,
        tile: TileCoord,
    },
    /// A herd ran out of members and was removed
    HerdDisbanded(HerdId),
}

#[derive(Debug, Default)]
pub struct HerdRegistry {
    herds: Vec<Herd>,
    /// Animal id -> owning herd, rebuilt whenever membership changes
    animal_index: AHashMap<AnimalId, HerdId>,
}

impl HerdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_herd(&mut self, herd: Herd) -> HerdId {
        let id = herd.id;
        for animal in herd.members() {
            self.animal_index.insert(animal.id, id);
        }
        self.herds.push(herd);
        id
    }

    pub fn herds(&self) -> &[Herd] {
        &self.herds
    }

    /// Lookup by id; an unknown id is absence, not an error
    pub fn herd(&self, id: HerdId) -> Option<&Herd> {
        self.herds.iter().find(|h| h.id == id)
    }

    pub fn herd_mut(&mut self, id: HerdId) -> Option<&mut Herd> {
        self.herds.iter_mut().find(|h| h.id == id)
    }

    pub fn herds_at(&self, tile: TileCoord) -> Vec<&Herd> {
        self.herds.iter().filter(|h| h.position == tile).collect()
    }

    pub fn herds_within(&self, center: TileCoord, radius: i32) -> Vec<&Herd> {
        self.herds
            .iter()
            .filter(|h| h.position.manhattan_distance(&center) <= radius)
            .collect()
    }

    pub fn herds_of_kind(&self, kind: AnimalKind) -> Vec<&Herd> {
        self.herds.iter().filter(|h| h.kind == kind).collect()
    }

    pub fn predator_herds(&self) -> Vec<&Herd> {
        self.herds.iter().filter(|h| h.is_predator()).collect()
    }

    pub fn prey_herds(&self) -> Vec<&Herd> {
        self.herds.iter().filter(|h| !h.is_predator()).collect()
    }

    pub fn herds_of_behavior(&self, class: BehaviorClass) -> Vec<&Herd> {
        self.herds
            .iter()
            .filter(|h| h.kind.behavior() == class)
            .collect()
    }

    /// Every animal across every herd
    pub fn all_animals(&self) -> impl Iterator<Item = &Animal> {
        self.herds.iter().flat_map(|h| h.members().iter())
    }

    pub fn herd_of_animal(&self, animal_id: AnimalId) -> Option<&Herd> {
        let herd_id = *self.animal_index.get(&animal_id)?;
        self.herds.iter().find(|h| h.id == herd_id)
    }

    fn rebuild_index(&mut self) {
        self.animal_index.clear();
        for herd in &self.herds {
            for animal in herd.members() {
                self.animal_index.insert(animal.id, herd.id);
            }
        }
    }

    /// Advance every herd by `elapsed_min` simulated minutes.
    ///
    /// Runs the per-herd state machines, then the predation pass, then
    /// prunes herds that ended up empty.
    pub fn update(
        &mut self,
        elapsed_min: f32,
        observer: &ObserverContext,
        map: &dyn TileMap,
        cfg: &SimulationConfig,
        env: &mut dyn Environment,
        rng: &mut impl Rng,
    ) -> Vec<RegistryEvent> {
        let mut events = Vec::new();

        for herd in &mut self.herds {
            let herd_id = herd.id;
            match herd.update(elapsed_min, observer, map, cfg, rng) {
                Some(HerdEvent::EncounterRequested { animal }) => {
                    events.push(RegistryEvent::EncounterRequested {
                        herd: herd_id,
                        animal,
                    });
                }
                Some(HerdEvent::Note(text)) => events.push(RegistryEvent::Note(text)),
                None => {}
            }
        }

        events.extend(self.predation_pass(cfg, env, rng));

        let mut membership_changed = !events.is_empty();
        let mut disbanded = Vec::new();
        self.herds.retain(|herd| {
            if herd.liveness() == Liveness::Empty {
                tracing::info!(herd = ?herd.id, kind = ?herd.kind, "herd disbanded");
                disbanded.push(RegistryEvent::HerdDisbanded(herd.id));
                membership_changed = true;
                false
            } else {
                true
            }
        });
        events.extend(disbanded);

        if membership_changed {
            self.rebuild_index();
        }
        events
    }

    /// Predators sharing a tile with prey may take an animal.
    ///
    /// Herds never track each other between updates; co-location at
    /// update time is the whole interaction model.
    fn predation_pass(
        &mut self,
        cfg: &SimulationConfig,
        env: &mut dyn Environment,
        rng: &mut impl Rng,
    ) -> Vec<RegistryEvent> {
        let mut kills: Vec<(usize, usize)> = Vec::new();
        for (p_idx, predator) in self.herds.iter().enumerate() {
            if !predator.is_predator() || predator.hunger <= cfg.predation_hunger_threshold {
                continue;
            }
            let prey_idx = self.herds.iter().enumerate().find(|(q_idx, candidate)| {
                *q_idx != p_idx
                    && !candidate.is_predator()
                    && candidate.position == predator.position
                    && candidate.count() > 0
            });
            if let Some((q_idx, _)) = prey_idx {
                if rng.gen_bool(cfg.predation_kill_chance) {
                    kills.push((p_idx, q_idx));
                }
            }
        }

        let mut events = Vec::new();
        for (p_idx, q_idx) in kills {
            let tile = self.herds[q_idx].position;
            let victim = {
                let prey = &mut self.herds[q_idx];
                let n = prey.members().len();
                if n == 0 {
                    continue;
                }
                let victim_id = prey.members()[rng.gen_range(0..n)].id;
                prey.remove_member(victim_id)
            };
            let Some(victim) = victim else { continue };

            env.create_carcass_at(tile, &victim);
            let prey_id = self.herds[q_idx].id;
            let predator = &mut self.herds[p_idx];
            predator.hunger = 0.0;
            tracing::info!(
                predator = ?predator.id,
                prey = ?prey_id,
                victim = %victim.name,
                "predation kill"
            );
            events.push(RegistryEvent::PreyKilled {
                predator: predator.id,
                prey: prey_id,
                tile,
            });
        }
        events
    }

    /// Probabilistic search for large game at a tile.
    ///
    /// Candidates are the herds present at the tile. Success chance
    /// scales with minutes spent (capped) and with how many herds
    /// range there; on success a weighted roulette picks the herd and
    /// a uniform roll picks the animal within it.
    pub fn search_for_large_game(
        &self,
        position: TileCoord,
        minutes: f32,
        cfg: &SimulationConfig,
        rng: &mut impl Rng,
    ) -> Option<(&Herd, &Animal)> {
        let candidates: Vec<&Herd> = self
            .herds_at(position)
            .into_iter()
            .filter(|h| h.kind.size_class() == SizeClass::Large && !h.members().is_empty())
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let chance = ((minutes / cfg.search_full_minutes)
            * (1.0 + cfg.search_herd_bonus * candidates.len() as f32))
            .min(cfg.search_success_cap as f32);
        if !rng.gen_bool(chance.clamp(0.0, 1.0) as f64) {
            return None;
        }

        let herd = pick_weighted(&candidates, cfg, rng)?;
        let animal = &herd.members()[rng.gen_range(0..herd.members().len())];
        tracing::debug!(herd = ?herd.id, kind = ?herd.kind, "large game found");
        Some((herd, animal))
    }

    /// Move the wounded animal out into its own fleeing splinter herd.
    pub fn split_off_wounded(
        &mut self,
        animal_id: AnimalId,
        flee_tile: TileCoord,
    ) -> Result<HerdId> {
        let herd_id = *self
            .animal_index
            .get(&animal_id)
            .ok_or(WildError::AnimalNotFound(animal_id))?;
        let herd = self
            .herd_mut(herd_id)
            .ok_or(WildError::HerdNotFound(herd_id))?;
        let splinter = herd
            .split_off_wounded(animal_id, flee_tile)
            .ok_or(WildError::AnimalNotFound(animal_id))?;
        let splinter_id = splinter.id;
        self.herds.push(splinter);
        self.rebuild_index();
        Ok(splinter_id)
    }

    /// One line describing the animal activity visible at a tile, if any
    pub fn activity_description(&self, tile: TileCoord) -> Option<String> {
        let here = self.herds_at(tile);
        if here.is_empty() {
            return None;
        }
        let lines: Vec<String> = here.iter().map(|h| h.description()).collect();
        Some(format!("You see {}.", lines.join("; ")))
    }

    /// Sign left on the ground at a tile by herds ranging over it
    pub fn track_description(&self, tile: TileCoord) -> Option<String> {
        self.herds
            .iter()
            .find(|h| h.territory.contains(&tile))
            .map(|h| h.track_description())
    }

    /// Census by kind, with total animal count
    pub fn population_report(&self) -> PopulationReport {
        let mut by_kind: AHashMap<&'static str, usize> = AHashMap::new();
        let mut total = 0;
        for herd in &self.herds {
            *by_kind.entry(herd.kind.display_name()).or_default() += herd.count();
            total += herd.count();
        }
        PopulationReport {
            herd_count: self.herds.len(),
            animal_count: total,
            by_kind,
        }
    }

    /// Restore animal objects for herds loaded from snapshots
    pub fn recreate_all_members(&mut self, rng: &mut impl Rng) {
        for herd in &mut self.herds {
            herd.recreate_members(rng);
        }
        self.rebuild_index();
    }
}

/// Cumulative-weight roulette over candidate herds.
///
/// Weight is herd size scaled by a representative member's condition,
/// cut sharply when the herd is already evasive. Falls back to the
/// first candidate if rounding leaves nothing selected.
fn pick_weighted<'a>(
    candidates: &[&'a Herd],
    cfg: &SimulationConfig,
    rng: &mut impl Rng,
) -> Option<&'a Herd> {
    if candidates.is_empty() {
        return None;
    }
    let weights: Vec<f32> = candidates
        .iter()
        .map(|herd| {
            let condition = herd
                .members()
                .first()
                .map(|a| a.traits.condition)
                .unwrap_or(1.0);
            let mut w = herd.count() as f32 * condition;
            if matches!(herd.state, HerdState::Alert | HerdState::Fleeing) {
                w *= cfg.evasive_weight_penalty;
            }
            w
        })
        .collect();

    let total: f32 = weights.iter().sum();
    if total <= 0.0 {
        return candidates.first().copied();
    }
    let mut roll = rng.gen::<f32>() * total;
    for (herd, weight) in candidates.iter().zip(&weights) {
        roll -= weight;
        if roll <= 0.0 {
            return Some(herd);
        }
    }
    candidates.first().copied()
}

#[derive(Debug, Clone)]
pub struct PopulationReport {
    pub herd_count: usize,
    pub animal_count: usize,
    pub by_kind: AHashMap<&'static str, usize>,
}

impl std::fmt::Display for PopulationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} animals in {} herds",
            self.animal_count, self.herd_count
        )?;
        let mut kinds: Vec<_> = self.by_kind.iter().collect();
        kinds.sort();
        for (name, count) in kinds {
            writeln!(f, "  {name}: {count}")?;
        }
        Ok(())
    }
}
