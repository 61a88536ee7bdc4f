//! Game loop thread: drives the flight engine against the sandbox at 30Hz.
//!
//! The driver and world are moved into the thread. Commands arrive via an
//! `mpsc` channel or from the scenario script; the thread hands back a
//! [`RunSummary`] when it stops.

use std::io;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use missileworks_core::config::FlightConfig;
use missileworks_core::constants::TICK_RATE;
use missileworks_core::enums::ProjectileKind;
use missileworks_core::events::FlightEvent;
use missileworks_core::world::Clock;
use missileworks_flight::driver::LaunchOrder;
use missileworks_flight::FlightDriver;

use crate::scenario::Scenario;
use crate::state::{Command, GameLoopCommand, RunSummary, ScriptedCommand};

/// Nominal duration of one tick.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Snapshot log cadence, in ticks.
const SNAPSHOT_EVERY: u64 = TICK_RATE as u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopOptions {
    /// Stop after this many ticks.
    pub ticks: u64,
    /// Sleep to hold the nominal tick rate.
    pub realtime: bool,
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and a handle yielding the run summary.
pub fn spawn_game_loop(
    config: FlightConfig,
    scenario: Scenario,
    script: Vec<ScriptedCommand>,
    options: LoopOptions,
) -> io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<RunSummary>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("missileworks-game-loop".into())
        .spawn(move || run_game_loop(config, scenario, script, &cmd_rx, options))?;

    Ok((cmd_tx, handle))
}

/// Runs until the tick budget is spent, a Shutdown command arrives or the
/// channel disconnects. Everything still flying is cleaned up on the way out.
pub fn run_game_loop(
    config: FlightConfig,
    mut scenario: Scenario,
    script: Vec<ScriptedCommand>,
    cmd_rx: &mpsc::Receiver<GameLoopCommand>,
    options: LoopOptions,
) -> RunSummary {
    let mut driver = FlightDriver::new(config);
    let mut summary = RunSummary::default();
    let mut script = script.into_iter().peekable();
    let mut next_tick_time = Instant::now();

    info!(ticks = options.ticks, realtime = options.realtime, "game loop started");

    'ticks: for tick in 0..options.ticks {
        // 1. Drain external commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Command(cmd)) => apply(cmd, &mut driver, &mut scenario),
                Ok(GameLoopCommand::Shutdown) => break 'ticks,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => break 'ticks,
            }
        }

        // 2. Scripted commands due this tick
        while let Some(scripted) = script.next_if(|s| s.tick <= tick) {
            apply(scripted.command, &mut driver, &mut scenario);
        }

        // 3. Control every projectile, then advance physics
        for event in driver.tick(&mut scenario.world) {
            record(&mut summary, &event);
        }
        if tick % SNAPSHOT_EVERY == 0 {
            log_snapshots(&driver, &scenario);
        }
        scenario.world.step();
        summary.ticks = tick + 1;

        // 4. Sleep until next tick
        if options.realtime {
            next_tick_time += TICK_DURATION;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > TICK_DURATION * 2 {
                // Too far behind; reset to avoid catch-up spiral
                next_tick_time = now;
            }
        }
    }

    for event in driver.shutdown(&mut scenario.world) {
        record(&mut summary, &event);
    }
    info!(ticks = summary.ticks, "game loop stopped");
    summary
}

fn apply(command: Command, driver: &mut FlightDriver, scenario: &mut Scenario) {
    debug!(?command, "command");
    match command {
        Command::Launch(ProjectileKind::Guided) => {
            let Some(target) = scenario.guided_target() else {
                warn!("guided launch ignored: no target standing");
                return;
            };
            driver.launch(LaunchOrder::Guided { target, spawn: None }, &mut scenario.world);
        }
        Command::Launch(ProjectileKind::Staged) => {
            driver.launch(LaunchOrder::Staged, &mut scenario.world);
        }
        Command::SetAxis(axis, value) => scenario.world.set_axis(axis, value),
        Command::Press(button) => scenario.world.press(button),
        Command::Release(button) => scenario.world.release(button),
    }
}

fn record(summary: &mut RunSummary, event: &FlightEvent) {
    match serde_json::to_string(event) {
        Ok(json) => info!(projectile = %event.projectile(), event = %json, "flight event"),
        Err(err) => warn!(%err, "unserializable flight event"),
    }
    summary.record(event);
}

fn log_snapshots(driver: &FlightDriver, scenario: &Scenario) {
    let now = scenario.world.game_time_ms();
    for snapshot in driver.snapshots(now) {
        if let Ok(json) = serde_json::to_string(&snapshot) {
            debug!(snapshot = %json, "projectile");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario;
    use missileworks_core::constants::TICK_MS;

    fn options(ticks: u64) -> LoopOptions {
        LoopOptions {
            ticks,
            realtime: false,
        }
    }

    #[test]
    fn test_scripted_run_launches_both_kinds() {
        let (_tx, rx) = mpsc::channel::<GameLoopCommand>();
        let summary = run_game_loop(
            FlightConfig::default(),
            scenario::build(TICK_MS),
            scenario::default_script(),
            &rx,
            options(500),
        );

        assert_eq!(summary.ticks, 500);
        assert_eq!(summary.launched, 2);
        assert_eq!(summary.spawn_failures, 0);
        assert!(summary.detonations >= 1, "{summary:?}");
    }

    #[test]
    fn test_scripted_run_is_deterministic() {
        let run = || {
            let (_tx, rx) = mpsc::channel::<GameLoopCommand>();
            run_game_loop(
                FlightConfig::default(),
                scenario::build(TICK_MS),
                scenario::default_script(),
                &rx,
                options(200),
            )
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_shutdown_command_stops_loop() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let summary = run_game_loop(
            FlightConfig::default(),
            scenario::build(TICK_MS),
            scenario::default_script(),
            &rx,
            options(100),
        );
        assert_eq!(summary.ticks, 0);
        assert_eq!(summary.launched, 0);
    }

    #[test]
    fn test_disconnected_channel_stops_loop() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();
        drop(tx);

        let summary = run_game_loop(
            FlightConfig::default(),
            scenario::build(TICK_MS),
            Vec::new(),
            &rx,
            options(100),
        );
        assert_eq!(summary.ticks, 0);
    }

    #[test]
    fn test_external_launch_command() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();
        tx.send(GameLoopCommand::Command(Command::Launch(ProjectileKind::Staged)))
            .unwrap();

        let summary = run_game_loop(
            FlightConfig::default(),
            scenario::build(TICK_MS),
            Vec::new(),
            &rx,
            options(5),
        );
        assert_eq!(summary.ticks, 5);
        assert_eq!(summary.launched, 1);
        // Still flying at the end; shutdown cleans it up without a blast.
        assert_eq!(summary.detonations, 0);
    }

    #[test]
    fn test_spawned_thread_returns_summary() {
        let (tx, handle) = spawn_game_loop(
            FlightConfig::default(),
            scenario::build(TICK_MS),
            Vec::new(),
            options(1_000_000),
        )
        .unwrap();
        tx.send(GameLoopCommand::Command(Command::Launch(ProjectileKind::Staged)))
            .unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let summary = handle.join().unwrap();
        assert!(summary.ticks < 1_000_000);
    }

    #[test]
    fn test_tick_duration_constant() {
        let expected_nanos = 1_000_000_000u64 / 30;
        assert_eq!(TICK_DURATION.as_nanos(), expected_nanos as u128);
    }
}
