use std::io;
use std::str::FromStr;

use aloha_error::LoggingError;
use aloha_settings::LogSettings;
use tracing::Level;
use tracing_subscriber::fmt::time::UtcTime;

const DEFAULT_TIME_PATTERN: &str =
    "[year]-[month]-[day]T[hour repr:24]:[minute]:[second]::[subsecond digits:4]";

/// Unknown level names fall back to info
pub fn parse_level(level: &str) -> Level {
    Level::from_str(level.trim()).unwrap_or(Level::INFO)
}

/// Json logs go to stderr so table output on stdout stays clean
pub fn setup_logging(settings: &LogSettings) -> Result<(), LoggingError> {
    let time_format = time::format_description::parse(DEFAULT_TIME_PATTERN).map_err(|e| {
        LoggingError::Error(format!(
            "Failed to parse time format: {} with error: {}",
            DEFAULT_TIME_PATTERN, e
        ))
    })?;

    tracing_subscriber::fmt()
        .json()
        .with_target(false)
        .flatten_event(true)
        .with_thread_ids(true)
        .with_max_level(parse_level(&settings.log_level))
        .with_timer(UtcTime::new(time_format))
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| LoggingError::Error(format!("Failed to setup logging with error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level(" WARN "), Level::WARN);
        assert_eq!(parse_level("chatty"), Level::INFO);
    }

    #[test]
    fn test_setup_logging_twice() {
        let settings = LogSettings {
            log_level: "info".to_string(),
        };

        // the global subscriber can only be installed once per process
        let first = setup_logging(&settings);
        let second = setup_logging(&settings);
        assert!(first.is_ok());
        assert!(second.is_err());
    }
}
