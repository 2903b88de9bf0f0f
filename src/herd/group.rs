//! Herd: the unit of simulation
//!
//! One or more animals sharing a position, a behavior state, hunger and
//! wound status. A herd of one is valid and is how solitary predators
//! are modeled.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::animal::{Animal, AnimalKind, Diet};
use crate::core::types::{AnimalId, HerdId, TileCoord};

/// Group-level behavior state shared by every member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HerdState {
    Resting,
    Grazing,
    Patrolling,
    Alert,
    Fleeing,
    Hunting,
}

impl HerdState {
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Resting => "resting",
            Self::Grazing => "grazing",
            Self::Patrolling => "on the move",
            Self::Alert => "alert, heads raised",
            Self::Fleeing => "fleeing",
            Self::Hunting => "stalking",
        }
    }
}

/// Explicit liveness so the registry never infers "dead" from a length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Active,
    Empty,
}

/// A group of animals simulated as one unit
#[derive(Debug, Clone)]
pub struct Herd {
    pub id: HerdId,
    pub kind: AnimalKind,
    members: Vec<Animal>,
    /// Redundant count kept so the herd can be reconstituted after a
    /// reload without serializing full Animal objects
    member_count: usize,

    pub position: TileCoord,
    /// Contiguous home territory; patrol and graze movement stay inside it
    pub territory: Vec<TileCoord>,
    pub patrol_index: usize,

    pub state: HerdState,
    pub state_time_minutes: f32,
    /// State the herd was in immediately before Alert, for resuming
    pub previous_state: HerdState,

    /// 0.0 = full, 1.0 = starving; shared by the group
    pub hunger: f32,
    pub wounded: bool,
    pub wound_severity: f32,
}

impl Herd {
    pub fn new(kind: AnimalKind, position: TileCoord, territory: Vec<TileCoord>) -> Self {
        Self {
            id: HerdId::new(),
            kind,
            members: Vec::new(),
            member_count: 0,
            position,
            territory,
            patrol_index: 0,
            state: HerdState::Resting,
            state_time_minutes: 0.0,
            previous_state: HerdState::Resting,
            hunger: 0.0,
            wounded: false,
            wound_severity: 0.0,
        }
    }

    // --- membership -------------------------------------------------------

    pub fn add_member(&mut self, mut animal: Animal) -> AnimalId {
        animal.herd_id = Some(self.id);
        let id = animal.id;
        self.members.push(animal);
        self.member_count = self.members.len();
        id
    }

    pub fn remove_member(&mut self, animal_id: AnimalId) -> Option<Animal> {
        let idx = self.members.iter().position(|a| a.id == animal_id)?;
        let mut animal = self.members.remove(idx);
        animal.herd_id = None;
        self.member_count = self.members.len();
        Some(animal)
    }

    pub fn members(&self) -> &[Animal] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [Animal] {
        &mut self.members
    }

    /// Member-list length when members are materialized, otherwise the
    /// persisted count (post-load, before `recreate_members`).
    pub fn count(&self) -> usize {
        if self.members.is_empty() {
            self.member_count
        } else {
            self.members.len()
        }
    }

    pub fn liveness(&self) -> Liveness {
        if self.count() == 0 {
            Liveness::Empty
        } else {
            Liveness::Active
        }
    }

    pub fn is_predator(&self) -> bool {
        self.kind.behavior().is_predator()
    }

    // --- runtime fission --------------------------------------------------

    /// Split a wounded member off into its own fleeing herd-of-one.
    ///
    /// The new herd starts at this herd's position with a territory of
    /// just {current tile, flee tile} and the wound copied over. The
    /// caller removes this herd from the registry if it winds up empty.
    pub fn split_off_wounded(&mut self, animal_id: AnimalId, flee_tile: TileCoord) -> Option<Herd> {
        let animal = self.remove_member(animal_id)?;
        let severity = animal
            .wound
            .map(|w| w.severity)
            .unwrap_or(self.wound_severity);

        let mut splinter = Herd::new(self.kind, self.position, vec![self.position, flee_tile]);
        splinter.state = HerdState::Fleeing;
        splinter.previous_state = HerdState::Fleeing;
        splinter.hunger = self.hunger;
        splinter.wounded = true;
        splinter.wound_severity = severity;
        splinter.add_member(animal);

        tracing::info!(
            source = ?self.id,
            splinter = ?splinter.id,
            kind = ?self.kind,
            "wounded animal split off"
        );
        Some(splinter)
    }

    // --- persistence ------------------------------------------------------

    pub fn snapshot(&self) -> HerdSnapshot {
        HerdSnapshot {
            id: self.id,
            kind: self.kind,
            member_count: self.count(),
            position: self.position,
            territory: self.territory.clone(),
            patrol_index: self.patrol_index,
            state: self.state,
            state_time_minutes: self.state_time_minutes,
            previous_state: self.previous_state,
            hunger: self.hunger,
            wounded: self.wounded,
            wound_severity: self.wound_severity,
        }
    }

    pub fn from_snapshot(snap: HerdSnapshot) -> Self {
        Self {
            id: snap.id,
            kind: snap.kind,
            members: Vec::new(),
            member_count: snap.member_count,
            position: snap.position,
            territory: snap.territory,
            patrol_index: snap.patrol_index,
            state: snap.state,
            state_time_minutes: snap.state_time_minutes,
            previous_state: snap.previous_state,
            hunger: snap.hunger,
            wounded: snap.wounded,
            wound_severity: snap.wound_severity,
        }
    }

    /// Regenerate members after a load. Idempotent: a no-op when members
    /// are already materialized or the persisted count is zero.
    pub fn recreate_members(&mut self, rng: &mut impl Rng) {
        if !self.members.is_empty() || self.member_count == 0 {
            return;
        }
        for _ in 0..self.member_count {
            let mut animal = Animal::new(self.kind, rng);
            animal.herd_id = Some(self.id);
            self.members.push(animal);
        }
    }

    // --- display ----------------------------------------------------------

    /// e.g. "a small group of caribou, grazing"
    pub fn description(&self) -> String {
        let name = self.kind.display_name();
        let group = match self.count() {
            0 | 1 => format!("a lone {}", name),
            2..=3 => format!("a few {}", name),
            4..=6 => format!("a small group of {}", name),
            _ => format!("a large herd of {}", name),
        };
        format!("{}, {}", group, self.state.verb())
    }

    /// Ambient sign left around the herd's territory
    pub fn track_description(&self) -> String {
        let name = self.kind.display_name();
        match self.kind.diet() {
            Diet::Graze | Diet::Browse => format!("{} tracks and cropped vegetation", name),
            Diet::Carnivore => format!("{} tracks and old scat", name),
            Diet::Carrion => format!("{} sign around picked-over bones", name),
            Diet::Omnivore => format!("{} tracks and torn-up ground", name),
        }
    }
}

/// Minimal persisted form of a herd
///
/// Individual animals are not serialized; `recreate_members` rolls
/// `member_count` fresh ones post-load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HerdSnapshot {
    pub id: HerdId,
    pub kind: AnimalKind,
    pub member_count: usize,
    pub position: TileCoord,
    pub territory: Vec<TileCoord>,
    pub patrol_index: usize,
    pub state: HerdState,
    pub state_time_minutes: f32,
    pub previous_state: HerdState,
    pub hunger: f32,
    pub wounded: bool,
    pub wound_severity: f32,
}

impl HerdSnapshot {
    pub fn to_json(&self) -> crate::core::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> crate::core::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn herd_with_members(kind: AnimalKind, n: usize, seed: u64) -> Herd {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let pos = TileCoord::new(5, 5);
        let mut herd = Herd::new(kind, pos, vec![pos, TileCoord::new(5, 6)]);
        for _ in 0..n {
            herd.add_member(Animal::new(kind, &mut rng));
        }
        herd
    }

    #[test]
    fn test_add_member_sets_herd_id() {
        let herd = herd_with_members(AnimalKind::Deer, 3, 1);
        for member in herd.members() {
            assert_eq!(member.herd_id, Some(herd.id));
        }
        assert_eq!(herd.count(), 3);
    }

    #[test]
    fn test_liveness() {
        let mut herd = herd_with_members(AnimalKind::Deer, 1, 1);
        assert_eq!(herd.liveness(), Liveness::Active);
        let id = herd.members()[0].id;
        herd.remove_member(id);
        assert_eq!(herd.liveness(), Liveness::Empty);
    }

    #[test]
    fn test_split_off_wounded_counts() {
        let mut herd = herd_with_members(AnimalKind::Caribou, 5, 2);
        let before = herd.count();
        let victim = herd.members()[2].id;
        herd.members_mut()[2].apply_wound(0.6, 100);

        let splinter = herd
            .split_off_wounded(victim, TileCoord::new(6, 5))
            .expect("member exists");

        assert_eq!(herd.count(), before - 1);
        assert_eq!(splinter.count(), 1);
        assert!(herd.members().iter().all(|a| a.id != victim));
        assert_eq!(splinter.state, HerdState::Fleeing);
        assert!(splinter.wounded);
        assert!((splinter.wound_severity - 0.6).abs() < 1e-6);
        assert_eq!(splinter.territory.len(), 2);
        assert_eq!(splinter.members()[0].herd_id, Some(splinter.id));
    }

    #[test]
    fn test_split_off_unknown_member_is_none() {
        let mut herd = herd_with_members(AnimalKind::Caribou, 2, 3);
        assert!(herd
            .split_off_wounded(AnimalId::new(), TileCoord::new(0, 0))
            .is_none());
        assert_eq!(herd.count(), 2);
    }

    #[test]
    fn test_snapshot_roundtrip_and_recreate() {
        let mut herd = herd_with_members(AnimalKind::Caribou, 4, 4);
        herd.hunger = 0.35;
        herd.state = HerdState::Grazing;

        let json = herd.snapshot().to_json().expect("serialize");
        let snap = HerdSnapshot::from_json(&json).expect("deserialize");
        let mut restored = Herd::from_snapshot(snap);

        // Persisted count carries the herd size before members exist
        assert_eq!(restored.count(), 4);
        assert_eq!(restored.members().len(), 0);

        let mut rng = ChaCha8Rng::seed_from_u64(9);
        restored.recreate_members(&mut rng);
        assert_eq!(restored.count(), 4);
        assert_eq!(restored.members().len(), 4);
        assert_eq!(restored.kind.behavior(), herd.kind.behavior());
        assert_eq!(restored.state, HerdState::Grazing);
        assert!((restored.hunger - 0.35).abs() < 1e-6);

        // Idempotent: calling again changes nothing
        restored.recreate_members(&mut rng);
        assert_eq!(restored.members().len(), 4);
    }

    #[test]
    fn test_recreate_members_noop_for_zero_count() {
        let mut herd = Herd::new(AnimalKind::Deer, TileCoord::new(0, 0), vec![TileCoord::new(0, 0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        herd.recreate_members(&mut rng);
        assert_eq!(herd.members().len(), 0);
    }

    #[test]
    fn test_descriptions() {
        let mut herd = herd_with_members(AnimalKind::Caribou, 5, 5);
        herd.state = HerdState::Grazing;
        assert_eq!(herd.description(), "a small group of caribou, grazing");

        let bear = herd_with_members(AnimalKind::Bear, 1, 6);
        assert_eq!(bear.description(), "a lone bear, resting");
        assert_eq!(bear.track_description(), "bear tracks and torn-up ground");
    }
}
