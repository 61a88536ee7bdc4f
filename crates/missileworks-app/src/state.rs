//! Commands fed to the game loop and the totals it reports.

use serde::{Deserialize, Serialize};

use missileworks_core::enums::{Button, InputAxis, ProjectileKind};
use missileworks_core::events::FlightEvent;

/// Operator action applied at a tick boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Key-bound launch of one projectile kind.
    Launch(ProjectileKind),
    SetAxis(InputAxis, f32),
    Press(Button),
    Release(Button),
}

/// Messages sent to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    Command(Command),
    /// Clean up every projectile and stop.
    Shutdown,
}

/// Command fired when the loop reaches `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedCommand {
    pub tick: u64,
    pub command: Command,
}

/// Totals for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub launched: usize,
    pub spawn_failures: usize,
    pub detonations: usize,
    pub duds: usize,
    pub payloads: usize,
    pub expired: usize,
    pub lost: usize,
}

impl RunSummary {
    pub fn record(&mut self, event: &FlightEvent) {
        match event {
            FlightEvent::Launched { .. } => self.launched += 1,
            FlightEvent::SpawnFailed { .. } => self.spawn_failures += 1,
            FlightEvent::Detonated { .. } => self.detonations += 1,
            FlightEvent::Dud { .. } => self.duds += 1,
            FlightEvent::PayloadReleased { count, .. } => self.payloads += count,
            FlightEvent::Expired { .. } => self.expired += 1,
            FlightEvent::BodyLost { .. } => self.lost += 1,
            FlightEvent::StageChanged { .. } | FlightEvent::CleanedUp { .. } => {}
        }
    }
}
