//! Kinematic state tracking for the starwatch client.
//!
//! Holds the latest server-authoritative state of every observed object
//! and extrapolates positions between sparse snapshots (dead reckoning).
//! Nothing here performs I/O or drawing.

pub mod clock;
pub mod entity;
pub mod store;

pub use clock::TimestampEstimator;
pub use entity::{Entity, UpdateOutcome};
pub use store::{EntityStore, IngestOutcome};
