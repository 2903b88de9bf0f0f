//! Simulation configuration with documented constants
//!
//! All tuning values for the herd state machine and the hunt-search
//! algorithm are collected here with notes on how they interact.

/// Configuration for the wildlife simulation
///
/// These values have been tuned to produce plausible pacing at the
/// minute-based tick this simulation runs on. Changing them shifts how
/// quickly herds cycle between feeding, resting and patrol.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    // === CONDITION RATES (per minute) ===
    // Hunger accumulation rates live on BehaviorProfile; predators and
    // foragers starve at different speeds and the profile owns that split.
    /// Hunger recovered per minute while actively grazing
    pub graze_recovery_rate: f32,

    /// Wound severity healed per minute
    ///
    /// At 0.0002/min a full-severity wound clears in roughly 3.5 days.
    pub wound_heal_rate: f32,

    // === STATE MACHINE THRESHOLDS ===
    /// Hunger above which a resting herd gets up to graze
    pub rest_to_graze_hunger: f32,

    /// Hunger below which a grazing herd lies back down
    pub graze_to_rest_hunger: f32,

    /// Chance per update that a grazing herd shifts to a random territory tile
    pub graze_move_chance: f64,

    /// Minutes a predator rests before heading out on patrol
    pub predator_rest_minutes: f32,

    /// Minutes of patrol time per step along the territory route
    pub patrol_step_minutes: f32,

    /// Total patrol minutes before a herd returns to rest
    pub patrol_total_minutes: f32,

    /// Minimum minutes a herd stays alert before deciding what to do
    pub alert_hold_minutes: f32,

    /// Manhattan distance at which a fleeing herd considers itself safe
    pub flee_safe_distance: i32,

    /// Minutes a hunting herd pursues before giving up
    pub hunt_give_up_minutes: f32,

    // === HUNT SEARCH ===
    /// Minutes of searching that yield a 100% base success chance
    ///
    /// Base probability is search_minutes / this, so 15 minutes of
    /// searching gives 50% before herd-count boosts.
    pub search_full_minutes: f32,

    /// Multiplicative success boost per herd present at the searched tile
    pub search_herd_bonus: f32,

    /// Hard cap on search success probability
    pub search_success_cap: f64,

    /// Weight multiplier for herds that are Alert or Fleeing
    ///
    /// Spooked game is harder to close with, so it is picked less often.
    pub evasive_weight_penalty: f32,

    // === PREDATION ===
    /// Hunger above which a predator herd will take prey sharing its tile
    pub predation_hunger_threshold: f32,

    /// Chance per update that a hungry predator makes a kill on a shared tile
    pub predation_kill_chance: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            graze_recovery_rate: 0.01,
            wound_heal_rate: 0.0002,

            rest_to_graze_hunger: 0.5,
            graze_to_rest_hunger: 0.2,
            graze_move_chance: 0.3,
            predator_rest_minutes: 60.0,
            patrol_step_minutes: 30.0,
            patrol_total_minutes: 120.0,
            alert_hold_minutes: 3.0,
            flee_safe_distance: 3,
            hunt_give_up_minutes: 30.0,

            search_full_minutes: 30.0,
            search_herd_bonus: 0.2,
            search_success_cap: 0.9,
            evasive_weight_penalty: 0.3,

            predation_hunger_threshold: 0.7,
            predation_kill_chance: 0.25,
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.graze_to_rest_hunger >= self.rest_to_graze_hunger {
            return Err(format!(
                "graze_to_rest_hunger ({}) should be < rest_to_graze_hunger ({})",
                self.graze_to_rest_hunger, self.rest_to_graze_hunger
            ));
        }

        if self.graze_recovery_rate <= 0.0 || self.wound_heal_rate <= 0.0 {
            return Err("Recovery rates must be positive".into());
        }

        if self.patrol_step_minutes > self.patrol_total_minutes {
            return Err(format!(
                "patrol_step_minutes ({}) should be <= patrol_total_minutes ({})",
                self.patrol_step_minutes, self.patrol_total_minutes
            ));
        }

        if !(0.0..=1.0).contains(&self.search_success_cap) {
            return Err("search_success_cap must be in [0, 1]".into());
        }

        Ok(())
    }
}
