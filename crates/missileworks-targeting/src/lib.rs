//! Target classification for MissileWorks.
//!
//! Pure functions over World Services reads: classify actors relative to an
//! observer, scan a vantage for markers and hostiles, and map categories to
//! display tints. Nothing here is cached between calls.

pub mod classifier;
pub mod palette;
pub mod relationship;
pub mod scan;

pub use classifier::TargetClassifier;
pub use missileworks_core as core;
pub use scan::{scan, TargetRecord, TargetScan};
