//! Logger setup.
//!
//! Records go to stdout and, when configured, to a log file. `RUST_LOG` overrides the
//! configured level.

use std::path::Path;

use log::LevelFilter;

/// Picks the level filter: `RUST_LOG` if it parses, otherwise the configured name,
/// otherwise `Info`.
pub fn level_filter(configured: &str, env: Option<&str>) -> LevelFilter {
    env.and_then(|v| v.trim().parse().ok())
        .or_else(|| configured.parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Installs the global logger. Fails if a logger is already set or the log file cannot be
/// opened.
pub fn init_logging(level: &str, log_file: Option<&Path>) -> Result<(), String> {
    let env = std::env::var("RUST_LOG").ok();
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {:<5} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level_filter(level, env.as_deref()))
        .chain(std::io::stdout());

    if let Some(path) = log_file {
        let file = fern::log_file(path).map_err(|e| format!("{}: {e}", path.display()))?;
        dispatch = dispatch.chain(file);
    }

    dispatch.apply().map_err(|e| e.to_string())?;
    log::debug!("logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter_precedence() {
        assert_eq!(level_filter("warn", None), LevelFilter::Warn);
        assert_eq!(level_filter("warn", Some("trace")), LevelFilter::Trace);
        assert_eq!(level_filter("warn", Some("not-a-level")), LevelFilter::Warn);
        assert_eq!(level_filter("bogus", None), LevelFilter::Info);
    }
}
