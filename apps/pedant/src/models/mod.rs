//! Data models: artifact coordinates and the project snapshots that carry
//! them into the checker.

pub mod artifact;
pub mod snapshot;

pub use artifact::{Dependency, Plugin};
pub use snapshot::{load_snapshot, ProjectSnapshot, Section};
