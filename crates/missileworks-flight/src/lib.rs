//! Flight engine for MissileWorks.
//!
//! Owns the projectile lifecycle skeleton, the guided and staged flight
//! controllers, the camera slot and the tick driver. `SandboxWorld` is a
//! headless hecs-backed host used by the binary and the tests.

pub mod aerodynamics;
pub mod camera;
pub mod driver;
pub mod guided;
pub mod lifecycle;
pub mod sandbox;
pub mod staged;

pub use camera::CameraManager;
pub use driver::FlightDriver;
pub use lifecycle::{CollisionPolicy, FlightController, FlightEnv, Projectile};
pub use missileworks_core as core;
pub use sandbox::SandboxWorld;

#[cfg(test)]
mod tests;
