//! Logging setup for wicket.
//!
//! Emits to the console and, when init succeeds, to an append-mode log
//! file. `RUST_LOG` takes precedence over the configured level so a
//! deployment can be re-filtered without touching config.toml.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

/// Normalize a configured level string into a filter directive.
/// Unrecognized values fall back to `info`.
fn level_directive(level: &str) -> String {
    match level.parse::<Level>() {
        Ok(level) => level.to_string().to_lowercase(),
        Err(_) => "info".to_string(),
    }
}

/// `RUST_LOG` wholesale if set, otherwise the configured level.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_directive(level)))
}

/// Initialize logging to the console and the configured log file.
///
/// The file is opened in append mode and its parent directory is
/// created if missing, so the default `logs/wicket.log` works on a
/// fresh checkout.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let path = Path::new(&config.file);
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let file = Arc::new(OpenOptions::new().create(true).append(true).open(path)?);

    tracing_subscriber::registry()
        .with(build_filter(&config.level))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    Ok(())
}

/// Console-only fallback, used when the log file cannot be opened and
/// in development runs.
pub fn init_console_only(level: &str) {
    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_directive_known_names() {
        assert_eq!(level_directive("trace"), "trace");
        assert_eq!(level_directive("debug"), "debug");
        assert_eq!(level_directive("info"), "info");
        assert_eq!(level_directive("warn"), "warn");
        assert_eq!(level_directive("error"), "error");
    }

    #[test]
    fn test_level_directive_normalizes_case() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("Warn"), "warn");
    }

    #[test]
    fn test_level_directive_unknown_falls_back_to_info() {
        assert_eq!(level_directive("verbose"), "info");
        assert_eq!(level_directive(""), "info");
    }
}
