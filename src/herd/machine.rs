//! Per-tick herd state machine
//!
//! Evaluated once per elapsed-time advance. All mutation for a herd
//! completes inside one `update` call; nothing is left half-applied
//! across ticks.

use rand::Rng;

use crate::context::ObserverContext;
use crate::core::config::SimulationConfig;
use crate::core::types::{AnimalId, TileCoord};
use crate::grid::TileMap;
use crate::herd::group::{Herd, HerdState};

/// Result a herd may emit from one update
#[derive(Debug, Clone)]
pub enum HerdEvent {
    /// A hunting herd reached the observer's tile; the external combat
    /// layer takes over with this animal leading
    EncounterRequested { animal: AnimalId },
    /// Narrative color for the event log
    Note(String),
}

impl Herd {
    /// Effective detection range in tiles against this observer
    ///
    /// Catalog base, +1 if the observer carries meat, +2 if they are
    /// bleeding, +1 if the herd itself is wounded and wary.
    pub fn detection_range(&self, observer: &ObserverContext) -> i32 {
        let mut range = self.kind.detection_range();
        if observer.carrying_meat {
            range += 1;
        }
        if observer.bleeding > 0.0 {
            range += 2;
        }
        if self.wounded {
            range += 1;
        }
        range
    }

    fn transition_to(&mut self, next: HerdState) {
        tracing::debug!(herd = ?self.id, from = ?self.state, to = ?next, "herd transition");
        self.state = next;
        self.state_time_minutes = 0.0;
    }

    /// Run one tick of the herd state machine.
    ///
    /// `elapsed_min` is simulated minutes since the previous update; the
    /// caller is the registry's update loop.
    pub fn update(
        &mut self,
        elapsed_min: f32,
        observer: &ObserverContext,
        map: &dyn TileMap,
        cfg: &SimulationConfig,
        rng: &mut impl Rng,
    ) -> Option<HerdEvent> {
        let profile = self.kind.behavior().profile();

        // 1. Shared condition drift
        self.hunger = (self.hunger + profile.hunger_rate_per_min * elapsed_min).clamp(0.0, 1.0);
        if self.wounded {
            self.wound_severity = (self.wound_severity - cfg.wound_heal_rate * elapsed_min).max(0.0);
            if self.wound_severity <= 0.0 {
                self.wounded = false;
            }
        }

        // Members keep their own flavor cycle running
        for member in self.members_mut() {
            member.activity.advance(elapsed_min, rng);
        }

        // 2. Detection check. Only calm states can be startled into
        // Alert; a herd already reacting (Alert/Fleeing/Hunting) keeps
        // processing its current state.
        let distance = self.position.manhattan_distance(&observer.position);
        if matches!(
            self.state,
            HerdState::Resting | HerdState::Grazing | HerdState::Patrolling
        ) && distance <= self.detection_range(observer)
        {
            self.previous_state = self.state;
            self.transition_to(HerdState::Alert);
            for member in self.members_mut() {
                member.become_alert();
            }
            return None;
        }

        // 3. Process the current state
        self.state_time_minutes += elapsed_min;
        match self.state {
            HerdState::Resting => self.tick_resting(cfg),
            HerdState::Grazing => self.tick_grazing(elapsed_min, cfg, rng),
            HerdState::Patrolling => self.tick_patrolling(elapsed_min, cfg),
            HerdState::Alert => return self.tick_alert(observer, cfg),
            HerdState::Fleeing => self.tick_fleeing(observer, map, cfg),
            HerdState::Hunting => return self.tick_hunting(observer, map, cfg, rng),
        }
        None
    }

    fn tick_resting(&mut self, cfg: &SimulationConfig) {
        if self.is_predator() {
            if self.state_time_minutes >= cfg.predator_rest_minutes {
                self.transition_to(HerdState::Patrolling);
            }
        } else if self.hunger > cfg.rest_to_graze_hunger {
            self.transition_to(HerdState::Grazing);
        }
    }

    fn tick_grazing(&mut self, elapsed_min: f32, cfg: &SimulationConfig, rng: &mut impl Rng) {
        // Movement abstraction: drift to a random territory tile
        if !self.territory.is_empty() && rng.gen_bool(cfg.graze_move_chance) {
            self.position = self.territory[rng.gen_range(0..self.territory.len())];
        }
        self.hunger = (self.hunger - cfg.graze_recovery_rate * elapsed_min).max(0.0);
        if self.hunger < cfg.graze_to_rest_hunger {
            self.transition_to(HerdState::Resting);
        }
    }

    fn tick_patrolling(&mut self, elapsed_min: f32, cfg: &SimulationConfig) {
        if !self.territory.is_empty() {
            // One route step per full patrol_step_minutes of patrol time
            let before = ((self.state_time_minutes - elapsed_min) / cfg.patrol_step_minutes) as i64;
            let after = (self.state_time_minutes / cfg.patrol_step_minutes) as i64;
            for _ in before..after {
                self.patrol_index = (self.patrol_index + 1) % self.territory.len();
                self.position = self.territory[self.patrol_index];
            }
        }
        if self.state_time_minutes >= cfg.patrol_total_minutes {
            self.transition_to(HerdState::Resting);
        }
    }

    fn tick_alert(
        &mut self,
        observer: &ObserverContext,
        cfg: &SimulationConfig,
    ) -> Option<HerdEvent> {
        if self.state_time_minutes < cfg.alert_hold_minutes {
            return None;
        }
        let distance = self.position.manhattan_distance(&observer.position);
        if distance > self.detection_range(observer) + 1 {
            // Whatever it was has moved off; go back to what we were doing
            let resume = self.previous_state;
            self.transition_to(resume);
            for member in self.members_mut() {
                member.reset_state();
            }
            return None;
        }
        if self.is_predator() {
            self.transition_to(HerdState::Hunting);
            for member in self.members_mut() {
                // Members may still be Idle if the herd entered Alert
                // outside the detection path (e.g. after a reload)
                member.become_alert();
                member.become_detected();
            }
            None
        } else {
            self.transition_to(HerdState::Fleeing);
            for member in self.members_mut() {
                member.become_alert();
                member.become_detected();
            }
            Some(HerdEvent::Note(format!(
                "Brush crashes in the distance as {} takes flight.",
                self.description()
            )))
        }
    }

    fn tick_fleeing(
        &mut self,
        observer: &ObserverContext,
        map: &dyn TileMap,
        cfg: &SimulationConfig,
    ) {
        self.position = flee_step(self.position, observer.position, map);
        if self.position.manhattan_distance(&observer.position) > cfg.flee_safe_distance {
            self.transition_to(HerdState::Resting);
            for member in self.members_mut() {
                member.reset_state();
            }
        }
    }

    fn tick_hunting(
        &mut self,
        observer: &ObserverContext,
        map: &dyn TileMap,
        cfg: &SimulationConfig,
        rng: &mut impl Rng,
    ) -> Option<HerdEvent> {
        if self.state_time_minutes >= cfg.hunt_give_up_minutes {
            // Lost the trail
            self.transition_to(HerdState::Resting);
            for member in self.members_mut() {
                member.reset_state();
            }
            return None;
        }

        self.position = chase_step(self.position, observer.position, map);
        if self.position != observer.position {
            return None;
        }

        // Contact: choose the animal that presses the encounter
        let count = self.members().len();
        if count == 0 {
            return None;
        }
        let lead_idx = rng.gen_range(0..count);
        let lead = &mut self.members_mut()[lead_idx];
        lead.calculate_boldness(observer);
        let animal = lead.id;

        tracing::info!(herd = ?self.id, ?animal, "predator encounter triggered");
        self.transition_to(HerdState::Resting);
        Some(HerdEvent::EncounterRequested { animal })
    }
}

/// One tile away from the threat, greedy axis-dominant, constrained to
/// passable tiles. Falls back to the other axis, then stays put.
fn flee_step(from: TileCoord, threat: TileCoord, map: &dyn TileMap) -> TileCoord {
    let primary = from.step_away(&threat);
    if map.is_passable(primary) {
        return primary;
    }
    let alternate = if primary.x != from.x {
        // Primary was an X step; try Y
        let dy = (from.y - threat.y).signum();
        TileCoord::new(from.x, from.y + if dy == 0 { 1 } else { dy })
    } else {
        let dx = (from.x - threat.x).signum();
        TileCoord::new(from.x + if dx == 0 { 1 } else { dx }, from.y)
    };
    if map.is_passable(alternate) {
        alternate
    } else {
        from
    }
}

/// One tile toward the target, constrained to passable tiles
fn chase_step(from: TileCoord, target: TileCoord, map: &dyn TileMap) -> TileCoord {
    let primary = from.step_toward(&target);
    if primary == from || map.is_passable(primary) {
        return primary;
    }
    let alternate = if primary.x != from.x {
        TileCoord::new(from.x, from.y + (target.y - from.y).signum())
    } else {
        TileCoord::new(from.x + (target.x - from.x).signum(), from.y)
    };
    if alternate != from && map.is_passable(alternate) {
        alternate
    } else {
        from
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animal::{Animal, AnimalKind, Awareness};
    use crate::grid::GridMap;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup(kind: AnimalKind, n: usize, pos: TileCoord) -> (Herd, GridMap, SimulationConfig) {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let territory: Vec<TileCoord> = (0..4).map(|i| TileCoord::new(pos.x, pos.y + i)).collect();
        let mut herd = Herd::new(kind, pos, territory);
        for _ in 0..n {
            herd.add_member(Animal::new(kind, &mut rng));
        }
        (herd, GridMap::new(40, 40), SimulationConfig::default())
    }

    fn far_observer() -> ObserverContext {
        ObserverContext::at(TileCoord::new(30, 30))
    }

    #[test]
    fn test_bear_detects_meat_carrying_bleeding_observer() {
        // base(2) + meat(1) + bleeding(2) = 5 >= distance 0
        let (mut herd, map, cfg) = setup(AnimalKind::Bear, 1, TileCoord::new(5, 5));
        let mut obs = ObserverContext::at(TileCoord::new(5, 5));
        obs.carrying_meat = true;
        obs.bleeding = 0.5;
        assert_eq!(herd.detection_range(&obs), 5);

        let mut rng = ChaCha8Rng::seed_from_u64(2);
        herd.update(10.0, &obs, &map, &cfg, &mut rng);
        assert_eq!(herd.state, HerdState::Alert);
        assert_eq!(herd.previous_state, HerdState::Resting);
        assert_eq!(herd.state_time_minutes, 0.0);
        assert_eq!(herd.members()[0].awareness, Awareness::Alert);
    }

    #[test]
    fn test_wounded_herd_detects_further() {
        let (mut herd, _, _) = setup(AnimalKind::Deer, 2, TileCoord::new(5, 5));
        let obs = far_observer();
        let base = herd.detection_range(&obs);
        herd.wounded = true;
        herd.wound_severity = 0.5;
        assert_eq!(herd.detection_range(&obs), base + 1);
    }

    #[test]
    fn test_resting_to_grazing_on_hunger() {
        let (mut herd, map, cfg) = setup(AnimalKind::Deer, 2, TileCoord::new(5, 5));
        herd.hunger = 0.55;
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        herd.update(1.0, &far_observer(), &map, &cfg, &mut rng);
        assert_eq!(herd.state, HerdState::Grazing);
        assert_eq!(herd.state_time_minutes, 0.0);
    }

    #[test]
    fn test_predator_rests_then_patrols() {
        let (mut herd, map, cfg) = setup(AnimalKind::Wolf, 3, TileCoord::new(5, 5));
        let obs = far_observer();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        herd.update(30.0, &obs, &map, &cfg, &mut rng);
        assert_eq!(herd.state, HerdState::Resting);
        assert!(herd.state_time_minutes > 0.0);

        herd.update(30.0, &obs, &map, &cfg, &mut rng);
        assert_eq!(herd.state, HerdState::Patrolling);
    }

    #[test]
    fn test_patrol_advances_route_and_returns_to_rest() {
        let (mut herd, map, cfg) = setup(AnimalKind::Wolf, 2, TileCoord::new(5, 5));
        herd.state = HerdState::Patrolling;
        let obs = far_observer();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        herd.update(60.0, &obs, &map, &cfg, &mut rng);
        // Two 30-minute steps along a 4-tile route
        assert_eq!(herd.patrol_index, 2);
        assert_eq!(herd.position, herd.territory[2]);
        assert_eq!(herd.state, HerdState::Patrolling);

        herd.update(60.0, &obs, &map, &cfg, &mut rng);
        assert_eq!(herd.state, HerdState::Resting);
        assert_eq!(herd.state_time_minutes, 0.0);
    }

    #[test]
    fn test_grazing_feeds_down_to_rest() {
        let (mut herd, map, cfg) = setup(AnimalKind::Caribou, 4, TileCoord::new(5, 5));
        herd.state = HerdState::Grazing;
        herd.hunger = 0.4;
        let obs = far_observer();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        // Net recovery is graze (0.01) minus forager hunger (0.003)
        herd.update(40.0, &obs, &map, &cfg, &mut rng);
        assert!(herd.hunger < 0.2);
        assert_eq!(herd.state, HerdState::Resting);
        // Position stayed within territory
        assert!(herd.territory.contains(&herd.position));
    }

    #[test]
    fn test_alert_resumes_previous_state_when_observer_gone() {
        let (mut herd, map, cfg) = setup(AnimalKind::Deer, 2, TileCoord::new(5, 5));
        herd.state = HerdState::Alert;
        herd.previous_state = HerdState::Grazing;
        herd.state_time_minutes = 2.0;
        let obs = far_observer();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        // Minimum hold not yet met after 0.5 more minutes
        herd.update(0.5, &obs, &map, &cfg, &mut rng);
        assert_eq!(herd.state, HerdState::Alert);

        herd.update(1.0, &obs, &map, &cfg, &mut rng);
        assert_eq!(herd.state, HerdState::Grazing);
        assert_eq!(herd.members()[0].awareness, Awareness::Idle);
    }

    #[test]
    fn test_alert_escalates_prey_to_fleeing() {
        let (mut herd, map, cfg) = setup(AnimalKind::Deer, 2, TileCoord::new(5, 5));
        herd.state = HerdState::Alert;
        herd.previous_state = HerdState::Grazing;
        let obs = ObserverContext::at(TileCoord::new(5, 6));
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let event = herd.update(5.0, &obs, &map, &cfg, &mut rng);
        assert_eq!(herd.state, HerdState::Fleeing);
        assert!(matches!(event, Some(HerdEvent::Note(_))));
        assert_eq!(herd.members()[0].awareness, Awareness::Detected);
    }

    #[test]
    fn test_alert_escalates_predator_to_hunting() {
        let (mut herd, map, cfg) = setup(AnimalKind::Bear, 1, TileCoord::new(5, 5));
        herd.state = HerdState::Alert;
        let obs = ObserverContext::at(TileCoord::new(6, 5));
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        herd.update(5.0, &obs, &map, &cfg, &mut rng);
        assert_eq!(herd.state, HerdState::Hunting);
    }

    #[test]
    fn test_restored_alert_herd_escalates_with_full_awareness() {
        // Members recreated from a snapshot start Idle even when the
        // herd was saved mid-Alert; escalation must still reach Detected.
        let (mut herd, map, cfg) = setup(AnimalKind::Deer, 3, TileCoord::new(5, 5));
        herd.state = HerdState::Alert;
        herd.previous_state = HerdState::Grazing;
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let mut restored = Herd::from_snapshot(herd.snapshot());
        restored.recreate_members(&mut rng);
        assert!(restored
            .members()
            .iter()
            .all(|m| m.awareness == Awareness::Idle));

        let obs = ObserverContext::at(TileCoord::new(5, 6));
        restored.update(cfg.alert_hold_minutes + 1.0, &obs, &map, &cfg, &mut rng);
        assert_eq!(restored.state, HerdState::Fleeing);
        assert!(restored
            .members()
            .iter()
            .all(|m| m.awareness == Awareness::Detected));
    }

    #[test]
    fn test_fleeing_moves_away_then_rests() {
        let (mut herd, map, cfg) = setup(AnimalKind::Deer, 2, TileCoord::new(5, 5));
        herd.state = HerdState::Fleeing;
        let obs = ObserverContext::at(TileCoord::new(5, 4));
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let mut last_distance = herd.position.manhattan_distance(&obs.position);
        for _ in 0..4 {
            if herd.state != HerdState::Fleeing {
                break;
            }
            herd.update(1.0, &obs, &map, &cfg, &mut rng);
            let d = herd.position.manhattan_distance(&obs.position);
            assert!(d >= last_distance);
            last_distance = d;
        }
        assert_eq!(herd.state, HerdState::Resting);
        assert!(last_distance > cfg.flee_safe_distance);
    }

    #[test]
    fn test_hunting_closes_and_triggers_encounter() {
        let (mut herd, map, cfg) = setup(AnimalKind::Wolf, 3, TileCoord::new(5, 5));
        herd.state = HerdState::Hunting;
        let obs = ObserverContext::at(TileCoord::new(8, 5));
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let mut encounter = None;
        for _ in 0..5 {
            if let Some(HerdEvent::EncounterRequested { animal }) =
                herd.update(1.0, &obs, &map, &cfg, &mut rng)
            {
                encounter = Some(animal);
                break;
            }
        }
        let lead = encounter.expect("hunt should reach observer within 3 steps");
        assert_eq!(herd.state, HerdState::Resting);
        assert_eq!(herd.position, obs.position);
        // The lead animal had boldness computed for the encounter
        let lead_animal = herd.members().iter().find(|a| a.id == lead).unwrap();
        assert!(lead_animal.boldness > 0.0);
    }

    #[test]
    fn test_hunting_gives_up_after_timeout() {
        let (mut herd, map, cfg) = setup(AnimalKind::Bear, 1, TileCoord::new(5, 5));
        herd.state = HerdState::Hunting;
        herd.state_time_minutes = 29.5;
        // Observer keeps far enough ahead that contact never happens
        let obs = ObserverContext::at(TileCoord::new(35, 35));
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        herd.update(1.0, &obs, &map, &cfg, &mut rng);
        assert_eq!(herd.state, HerdState::Resting);
    }

    #[test]
    fn test_hunger_clamped_on_huge_tick() {
        let (mut herd, map, cfg) = setup(AnimalKind::Deer, 2, TileCoord::new(5, 5));
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        herd.update(10_000.0, &far_observer(), &map, &cfg, &mut rng);
        assert!(herd.hunger <= 1.0);
    }

    #[test]
    fn test_wound_heals_and_clears() {
        let (mut herd, map, cfg) = setup(AnimalKind::Deer, 2, TileCoord::new(5, 5));
        herd.wounded = true;
        herd.wound_severity = 0.001;
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        herd.update(10.0, &far_observer(), &map, &cfg, &mut rng);
        assert!(!herd.wounded);
        assert_eq!(herd.wound_severity, 0.0);
    }

    #[test]
    fn test_state_time_zero_iff_transitioned() {
        let (mut herd, map, cfg) = setup(AnimalKind::Deer, 2, TileCoord::new(5, 5));
        let obs = far_observer();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        // No transition: resting, not hungry
        let state_before = herd.state;
        herd.update(5.0, &obs, &map, &cfg, &mut rng);
        assert_eq!(herd.state, state_before);
        assert!(herd.state_time_minutes > 0.0);

        // Transition: hunger pushes it to graze
        herd.hunger = 0.9;
        herd.update(5.0, &obs, &map, &cfg, &mut rng);
        assert_eq!(herd.state, HerdState::Grazing);
        assert_eq!(herd.state_time_minutes, 0.0);
    }
}
