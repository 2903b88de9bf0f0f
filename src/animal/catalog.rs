//! Static species catalog: display data, weight, diet, behavior tables
//!
//! Everything fixed about a species lives here as match tables on
//! [`AnimalKind`]. Per-individual variation is rolled separately when an
//! animal is created.

use serde::{Deserialize, Serialize};

/// Species of wildlife present in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimalKind {
    Caribou,
    Deer,
    Moose,
    Bear,
    Wolf,
    Fox,
    Hare,
    Wolverine,
    Raven,
}

impl AnimalKind {
    /// Every catalogued species, in display order
    pub const ALL: [AnimalKind; 9] = [
        AnimalKind::Caribou,
        AnimalKind::Deer,
        AnimalKind::Moose,
        AnimalKind::Bear,
        AnimalKind::Wolf,
        AnimalKind::Fox,
        AnimalKind::Hare,
        AnimalKind::Wolverine,
        AnimalKind::Raven,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Caribou => "caribou",
            Self::Deer => "deer",
            Self::Moose => "moose",
            Self::Bear => "bear",
            Self::Wolf => "wolf",
            Self::Fox => "fox",
            Self::Hare => "hare",
            Self::Wolverine => "wolverine",
            Self::Raven => "raven",
        }
    }

    /// Typical adult weight in kg
    pub fn weight_kg(&self) -> f32 {
        match self {
            Self::Caribou => 110.0,
            Self::Deer => 70.0,
            Self::Moose => 380.0,
            Self::Bear => 260.0,
            Self::Wolf => 40.0,
            Self::Fox => 6.0,
            Self::Hare => 3.5,
            Self::Wolverine => 14.0,
            Self::Raven => 1.2,
        }
    }

    pub fn diet(&self) -> Diet {
        match self {
            Self::Caribou | Self::Deer => Diet::Graze,
            Self::Moose => Diet::Browse,
            Self::Bear => Diet::Omnivore,
            Self::Wolf => Diet::Carnivore,
            Self::Fox => Diet::Omnivore,
            Self::Hare => Diet::Graze,
            Self::Wolverine | Self::Raven => Diet::Carrion,
        }
    }

    pub fn behavior(&self) -> BehaviorClass {
        match self {
            Self::Caribou | Self::Deer | Self::Fox | Self::Hare => BehaviorClass::Prey,
            Self::Moose => BehaviorClass::DangerousPrey,
            Self::Bear | Self::Wolf => BehaviorClass::Predator,
            Self::Wolverine | Self::Raven => BehaviorClass::Scavenger,
        }
    }

    pub fn size_class(&self) -> SizeClass {
        match self {
            Self::Caribou | Self::Deer | Self::Moose | Self::Bear | Self::Wolf => SizeClass::Large,
            Self::Fox | Self::Hare | Self::Wolverine | Self::Raven => SizeClass::Small,
        }
    }

    /// Base detection range in tiles, before observer/wound modifiers
    pub fn detection_range(&self) -> i32 {
        match self {
            Self::Caribou | Self::Deer | Self::Hare => 3,
            Self::Moose | Self::Bear | Self::Wolverine => 2,
            Self::Wolf | Self::Fox | Self::Raven => 3,
        }
    }

    /// Combat-relevant stats, fixed at creation
    pub fn combat_stats(&self) -> CombatStats {
        match self {
            Self::Caribou => CombatStats {
                attack_damage: 8.0,
                attack_descriptor: "antler thrash",
                damage_type: DamageType::Blunt,
                block_chance: 0.05,
                speed_mps: 12.0,
                pursuit_commitment_min: 2.0,
                disengage_chance: 0.9,
            },
            Self::Deer => CombatStats {
                attack_damage: 5.0,
                attack_descriptor: "hoof kick",
                damage_type: DamageType::Blunt,
                block_chance: 0.05,
                speed_mps: 13.0,
                pursuit_commitment_min: 1.0,
                disengage_chance: 0.95,
            },
            Self::Moose => CombatStats {
                attack_damage: 22.0,
                attack_descriptor: "trampling charge",
                damage_type: DamageType::Blunt,
                block_chance: 0.1,
                speed_mps: 10.0,
                pursuit_commitment_min: 5.0,
                disengage_chance: 0.6,
            },
            Self::Bear => CombatStats {
                attack_damage: 18.0,
                attack_descriptor: "claw swipe",
                damage_type: DamageType::Cut,
                block_chance: 0.15,
                speed_mps: 9.0,
                pursuit_commitment_min: 10.0,
                disengage_chance: 0.3,
            },
            Self::Wolf => CombatStats {
                attack_damage: 12.0,
                attack_descriptor: "lunging bite",
                damage_type: DamageType::Pierce,
                block_chance: 0.1,
                speed_mps: 14.0,
                pursuit_commitment_min: 15.0,
                disengage_chance: 0.4,
            },
            Self::Fox => CombatStats {
                attack_damage: 3.0,
                attack_descriptor: "nipping bite",
                damage_type: DamageType::Pierce,
                block_chance: 0.05,
                speed_mps: 11.0,
                pursuit_commitment_min: 1.0,
                disengage_chance: 0.95,
            },
            Self::Hare => CombatStats {
                attack_damage: 1.0,
                attack_descriptor: "scratch",
                damage_type: DamageType::Cut,
                block_chance: 0.0,
                speed_mps: 15.0,
                pursuit_commitment_min: 0.5,
                disengage_chance: 1.0,
            },
            Self::Wolverine => CombatStats {
                attack_damage: 10.0,
                attack_descriptor: "savage bite",
                damage_type: DamageType::Pierce,
                block_chance: 0.1,
                speed_mps: 8.0,
                pursuit_commitment_min: 8.0,
                disengage_chance: 0.5,
            },
            Self::Raven => CombatStats {
                attack_damage: 1.0,
                attack_descriptor: "pecking dive",
                damage_type: DamageType::Pierce,
                block_chance: 0.0,
                speed_mps: 16.0,
                pursuit_commitment_min: 0.5,
                disengage_chance: 1.0,
            },
        }
    }

    /// Typical herd size range, inclusive. Solitary species get (1, 1).
    pub fn herd_size_range(&self) -> (usize, usize) {
        match self {
            Self::Caribou => (4, 9),
            Self::Deer => (2, 5),
            Self::Moose => (1, 2),
            Self::Bear => (1, 1),
            Self::Wolf => (3, 6),
            Self::Fox => (1, 2),
            Self::Hare => (2, 4),
            Self::Wolverine => (1, 1),
            Self::Raven => (2, 6),
        }
    }

    /// Relative spawn weight used by the populator
    pub fn spawn_weight(&self) -> f32 {
        match self {
            Self::Caribou => 3.0,
            Self::Deer => 4.0,
            Self::Moose => 1.5,
            Self::Bear => 1.0,
            Self::Wolf => 1.5,
            Self::Fox => 2.0,
            Self::Hare => 3.0,
            Self::Wolverine => 0.5,
            Self::Raven => 2.0,
        }
    }
}

/// What a species eats; drives graze/patrol flavor text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diet {
    Graze,
    Browse,
    Carnivore,
    Carrion,
    Omnivore,
}

/// Coarse size split used by the hunt-search surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeClass {
    Small,
    Large,
}

/// Behavior classification driving flee/hunt decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorClass {
    Prey,
    Predator,
    Scavenger,
    DangerousPrey,
}

impl BehaviorClass {
    pub fn is_predator(&self) -> bool {
        matches!(self, Self::Predator)
    }

    /// The capability set for this class, looked up once instead of
    /// re-branching on the class at every call site.
    pub fn profile(&self) -> BehaviorProfile {
        match self {
            Self::Prey => BehaviorProfile {
                flee_policy: FleePolicy::AlwaysWhenDetected,
                hunger_rate_per_min: 0.003,
                nervousness_baseline: 0.7,
            },
            Self::Predator => BehaviorProfile {
                flee_policy: FleePolicy::Never,
                hunger_rate_per_min: 0.002,
                nervousness_baseline: 0.2,
            },
            Self::Scavenger => BehaviorProfile {
                flee_policy: FleePolicy::ThreatAssessed,
                hunger_rate_per_min: 0.003,
                nervousness_baseline: 0.5,
            },
            Self::DangerousPrey => BehaviorProfile {
                flee_policy: FleePolicy::Never,
                hunger_rate_per_min: 0.003,
                nervousness_baseline: 0.4,
            },
        }
    }
}

/// How an animal decides to break off once the observer is detected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FleePolicy {
    /// Bolts as soon as awareness reaches Detected
    AlwaysWhenDetected,
    /// Flees only if the observer clearly outmatches it
    ThreatAssessed,
    /// Stands its ground regardless
    Never,
}

/// Per-class capability set attached to the catalog entry
#[derive(Debug, Clone, Copy)]
pub struct BehaviorProfile {
    pub flee_policy: FleePolicy,
    pub hunger_rate_per_min: f32,
    pub nervousness_baseline: f32,
}

/// Type of damage an attack inflicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageType {
    Cut,
    Blunt,
    Pierce,
}

/// Combat stats fixed at creation from the catalog
#[derive(Debug, Clone, Copy)]
pub struct CombatStats {
    pub attack_damage: f32,
    pub attack_descriptor: &'static str,
    pub damage_type: DamageType,
    /// Chance the animal deflects an incoming strike
    pub block_chance: f32,
    pub speed_mps: f32,
    /// Minutes the animal will commit to a pursuit
    pub pursuit_commitment_min: f32,
    /// Chance it breaks off after incapacitating its target
    pub disengage_chance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_behavior_classes() {
        assert_eq!(AnimalKind::Caribou.behavior(), BehaviorClass::Prey);
        assert_eq!(AnimalKind::Moose.behavior(), BehaviorClass::DangerousPrey);
        assert_eq!(AnimalKind::Bear.behavior(), BehaviorClass::Predator);
        assert_eq!(AnimalKind::Raven.behavior(), BehaviorClass::Scavenger);
    }

    #[test]
    fn test_detection_range_within_base_band() {
        for kind in AnimalKind::ALL {
            let r = kind.detection_range();
            assert!((2..=3).contains(&r), "{:?} detection range {}", kind, r);
        }
    }

    #[test]
    fn test_profiles_order_nervousness() {
        // Prey are the twitchiest, predators the calmest
        let prey = BehaviorClass::Prey.profile();
        let pred = BehaviorClass::Predator.profile();
        let scav = BehaviorClass::Scavenger.profile();
        assert!(prey.nervousness_baseline > scav.nervousness_baseline);
        assert!(scav.nervousness_baseline > pred.nervousness_baseline);
    }

    #[test]
    fn test_predators_starve_slower() {
        assert!(
            BehaviorClass::Predator.profile().hunger_rate_per_min
                < BehaviorClass::Prey.profile().hunger_rate_per_min
        );
    }

    #[test]
    fn test_solitary_predators_herd_of_one() {
        assert_eq!(AnimalKind::Bear.herd_size_range(), (1, 1));
        assert_eq!(AnimalKind::Wolverine.herd_size_range(), (1, 1));
    }
}
