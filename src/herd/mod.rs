pub mod group;
pub mod machine;

pub use group::{Herd, HerdSnapshot, HerdState, Liveness};
pub use machine::HerdEvent;
