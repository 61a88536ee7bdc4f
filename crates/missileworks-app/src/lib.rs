//! MissileWorks headless runner.
//!
//! Wires the flight engine to the sandbox world and drives a scripted
//! engagement at the fixed tick rate, logging every flight event.

pub mod config;
pub mod game_loop;
pub mod scenario;
pub mod state;

pub use missileworks_core as core;
