use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use missileworks_app::config;
use missileworks_app::game_loop::{spawn_game_loop, LoopOptions};
use missileworks_app::scenario;
use missileworks_core::constants::TICK_MS;

fn main() -> ExitCode {
    init_tracing();

    let flight = match config::load_flight_config() {
        Ok(flight) => flight,
        Err(err) => {
            error!(%err, "invalid flight config");
            return ExitCode::FAILURE;
        }
    };
    info!(seed = flight.seed, "flight config loaded");

    let options = LoopOptions {
        ticks: config::tick_budget(),
        realtime: config::realtime(),
    };
    let spawned = spawn_game_loop(
        flight,
        scenario::build(TICK_MS),
        scenario::default_script(),
        options,
    );
    let (_cmd_tx, handle) = match spawned {
        Ok(spawned) => spawned,
        Err(err) => {
            error!(%err, "failed to spawn game loop");
            return ExitCode::FAILURE;
        }
    };

    let Ok(summary) = handle.join() else {
        error!("game loop panicked");
        return ExitCode::FAILURE;
    };
    match serde_json::to_string(&summary) {
        Ok(json) => info!(summary = %json, "run finished"),
        Err(err) => error!(%err, "summary serialization failed"),
    }
    ExitCode::SUCCESS
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
