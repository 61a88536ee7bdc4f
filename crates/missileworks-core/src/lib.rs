//! Core types and definitions for MissileWorks.
//!
//! This crate defines the vocabulary shared across all other crates:
//! vector math, handles, enums, tuning constants, config profiles, errors,
//! flight events, snapshots, and the World Services traits the flight
//! logic talks to. It owns no world state.

pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod math;
pub mod state;
pub mod types;
pub mod world;

pub use error::{FlightError, WorldError};
pub use world::WorldServices;
