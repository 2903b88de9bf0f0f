//! Individual animal entity: awareness, wounds, generated traits
//!
//! An Animal is always owned by exactly one Herd. The awareness state
//! here is the fine-grained, per-encounter concept; group behavior is
//! the Herd's state machine.

use rand::Rng;

use crate::animal::activity::ActivityCycle;
use crate::animal::catalog::{AnimalKind, CombatStats, FleePolicy};
use crate::context::ObserverContext;
use crate::core::types::{AnimalId, HerdId, Minutes};

/// Observer distance an animal assumes before anything has been seen
pub const DEFAULT_OBSERVER_DISTANCE_M: f32 = 100.0;

/// Awareness of the observer during an active approach
///
/// Advances strictly Idle -> Alert -> Detected; only `reset_state`
/// moves it backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Awareness {
    Idle,
    Alert,
    Detected,
}

/// A wound carried by an individual animal
#[derive(Debug, Clone, Copy)]
pub struct Wound {
    /// Severity in [0, 1]; heals toward zero over days
    pub severity: f32,
    /// When the wound was taken, minutes since world creation
    pub at_minutes: Minutes,
}

/// Traits rolled once per individual after construction
#[derive(Debug, Clone)]
pub struct IndividualTraits {
    /// Multiplier on catalog weight, clamped to [0.7, 1.3]
    pub size_modifier: f32,
    /// Physical condition in [0.3, 1.0]; feeds hunt-search weighting
    pub condition: f32,
    /// Jumpiness in [0.0, 1.0], baseline set by behavior class
    pub nervousness: f32,
    /// Distinguishing mark, if the animal has one
    pub marks: Option<&'static str>,
}

impl Default for IndividualTraits {
    fn default() -> Self {
        Self {
            size_modifier: 1.0,
            condition: 0.75,
            nervousness: 0.5,
            marks: None,
        }
    }
}

const MARKS: [&str; 6] = [
    "a torn ear",
    "a pale muzzle",
    "a scarred flank",
    "a limping gait",
    "an unusually dark coat",
    "a missing patch of fur",
];

/// Two-uniform-sum pseudo-normal sample, clamped to a hard range
///
/// `mean + ((u1+u2)/2 - 0.5) * 2 * spread`; cheap bell-ish curve, good
/// enough for trait variation and reproducible from a seeded RNG.
fn pseudo_normal(rng: &mut impl Rng, mean: f32, spread: f32, min: f32, max: f32) -> f32 {
    let u1: f32 = rng.gen();
    let u2: f32 = rng.gen();
    (mean + ((u1 + u2) / 2.0 - 0.5) * 2.0 * spread).clamp(min, max)
}

/// An individual creature
#[derive(Debug, Clone)]
pub struct Animal {
    pub id: AnimalId,
    /// Set when the animal is added to a herd
    pub herd_id: Option<HerdId>,
    pub name: String,
    pub kind: AnimalKind,
    pub stats: CombatStats,

    pub awareness: Awareness,
    /// Distance from the observer in meters during an encounter
    pub distance_m: f32,
    pub failed_stealth_checks: u32,
    pub wound: Option<Wound>,
    /// Willingness to press an encounter, recomputed per approach
    pub boldness: f32,

    pub traits: IndividualTraits,
    pub activity: ActivityCycle,
}

impl Animal {
    /// Create an animal of the given kind with freshly rolled traits
    pub fn new(kind: AnimalKind, rng: &mut impl Rng) -> Self {
        let mut animal = Self {
            id: AnimalId::new(),
            herd_id: None,
            name: kind.display_name().to_string(),
            kind,
            stats: kind.combat_stats(),
            awareness: Awareness::Idle,
            distance_m: DEFAULT_OBSERVER_DISTANCE_M,
            failed_stealth_checks: 0,
            wound: None,
            boldness: 0.0,
            traits: IndividualTraits::default(),
            activity: ActivityCycle::new(rng),
        };
        animal.generate_traits(rng);
        animal
    }

    /// Roll size, condition and nervousness; deterministic per seed
    pub fn generate_traits(&mut self, rng: &mut impl Rng) {
        let baseline = self.kind.behavior().profile().nervousness_baseline;
        self.traits = IndividualTraits {
            size_modifier: pseudo_normal(rng, 1.0, 0.15, 0.7, 1.3),
            condition: pseudo_normal(rng, 0.75, 0.2, 0.3, 1.0),
            nervousness: pseudo_normal(rng, baseline, 0.2, 0.0, 1.0),
            // About one animal in four is recognizable
            marks: if rng.gen_bool(0.25) {
                Some(MARKS[rng.gen_range(0..MARKS.len())])
            } else {
                None
            },
        };
    }

    /// Body weight after individual size variation, kg
    pub fn weight_kg(&self) -> f32 {
        self.kind.weight_kg() * self.traits.size_modifier
    }

    // --- awareness state machine -----------------------------------------

    pub fn become_alert(&mut self) {
        if self.awareness == Awareness::Idle {
            self.awareness = Awareness::Alert;
        }
    }

    pub fn become_detected(&mut self) {
        if self.awareness == Awareness::Alert {
            self.awareness = Awareness::Detected;
        }
    }

    /// Full reset at the end of an approach
    pub fn reset_state(&mut self) {
        self.awareness = Awareness::Idle;
        self.distance_m = DEFAULT_OBSERVER_DISTANCE_M;
        self.failed_stealth_checks = 0;
    }

    /// The observer botched a stealth check against this animal
    pub fn note_failed_stealth_check(&mut self) {
        self.failed_stealth_checks += 1;
    }

    pub fn apply_wound(&mut self, severity: f32, now: Minutes) {
        self.wound = Some(Wound {
            severity: severity.clamp(0.0, 1.0),
            at_minutes: now,
        });
    }

    // --- encounter decisions ---------------------------------------------

    /// Threat product for flee assessment; mirrors the observer formula
    fn own_threat_rating(&self) -> f32 {
        self.traits.condition * self.stats.attack_damage * self.weight_kg()
    }

    /// Whether this animal breaks and runs from the observer
    pub fn should_flee(&self, observer: &ObserverContext) -> bool {
        match self.kind.behavior().profile().flee_policy {
            FleePolicy::AlwaysWhenDetected => self.awareness == Awareness::Detected,
            // Scavengers weigh the odds: run only when outmatched by
            // more than a 20% margin.
            FleePolicy::ThreatAssessed => {
                observer.threat_rating() > self.own_threat_rating() * 1.2
            }
            FleePolicy::Never => false,
        }
    }

    /// Willingness to approach or attack during an active encounter
    ///
    /// Built only from things the player can reason about: what they
    /// carry, how hurt they look, how big they are, whether they bleed.
    pub fn calculate_boldness(&mut self, observer: &ObserverContext) -> f32 {
        let mut boldness = 0.4;
        if observer.carrying_meat {
            boldness += 0.20;
        }
        if observer.vitality < 0.7 {
            boldness += 0.15;
        }
        if observer.mass > self.weight_kg() {
            boldness -= 0.10;
        }
        // Blood scent, scaled by how badly the observer bleeds
        boldness += 0.15 * observer.bleeding.clamp(0.0, 1.0);
        self.boldness = boldness.clamp(0.0, 1.0);
        self.boldness
    }

    /// One line of flavor for nearby-activity summaries
    pub fn activity_line(&self) -> String {
        match self.traits.marks {
            Some(marks) => format!(
                "a {} with {}, {}",
                self.name,
                marks,
                self.activity.activity.description()
            ),
            None => format!("a {}, {}", self.name, self.activity.activity.description()),
        }
    }
}
