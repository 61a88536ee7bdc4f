use std::{env, path::PathBuf, str::FromStr};

use tracing::warn;

use missileworks_core::config::FlightConfig;
use missileworks_core::error::FlightResult;

// Runtime knobs read from the environment (not flight tuning).

/// JSON flight config; defaults apply when unset.
pub fn config_path() -> Option<PathBuf> {
    env::var_os("MISSILEWORKS_CONFIG").map(PathBuf::from)
}

/// Ticks to run before shutting down.
pub fn tick_budget() -> u64 {
    parse_var("MISSILEWORKS_TICKS", env::var("MISSILEWORKS_TICKS").ok()).unwrap_or(900)
}

/// Overrides the config's RNG seed.
pub fn seed_override() -> Option<u64> {
    parse_var("MISSILEWORKS_SEED", env::var("MISSILEWORKS_SEED").ok())
}

/// Pace ticks against the wall clock instead of running flat out.
pub fn realtime() -> bool {
    matches!(
        env::var("MISSILEWORKS_REALTIME").as_deref(),
        Ok("1") | Ok("true")
    )
}

/// Load, override and validate the flight config.
pub fn load_flight_config() -> FlightResult<FlightConfig> {
    let mut config = match config_path() {
        Some(path) => FlightConfig::from_json_file(path)?,
        None => FlightConfig::default(),
    };
    if let Some(seed) = seed_override() {
        config.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

/// Parse a raw env value; an unparseable one is reported and ignored.
fn parse_var<T: FromStr>(name: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = name, value = %raw, "ignoring unparseable value, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_parse_var_accepts_numbers() {
        assert_eq!(parse_var::<u64>("MISSILEWORKS_TICKS", Some("120".into())), Some(120));
        assert_eq!(parse_var::<u64>("MISSILEWORKS_TICKS", None), None);
    }

    #[test]
    fn test_unparseable_value_warns_and_falls_back() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let parsed = tracing::subscriber::with_default(subscriber, || {
            parse_var::<u64>("MISSILEWORKS_SEED", Some("forty-two".into()))
        });

        assert_eq!(parsed, None);
        let log = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(log.contains("WARN"), "{log}");
        assert!(log.contains("MISSILEWORKS_SEED"), "{log}");
        assert!(log.contains("forty-two"), "{log}");
    }
}
