//! Wildtrack - Wildlife Herd Simulation

pub mod animal;
pub mod context;
pub mod core;
pub mod grid;
pub mod herd;
pub mod populate;
pub mod registry;
