pub mod activity;
pub mod catalog;
pub mod individual;

pub use activity::{Activity, ActivityCycle};
pub use catalog::{
    AnimalKind, BehaviorClass, BehaviorProfile, CombatStats, DamageType, Diet, FleePolicy,
    SizeClass,
};
pub use individual::{Animal, Awareness, IndividualTraits, Wound, DEFAULT_OBSERVER_DISTANCE_M};
