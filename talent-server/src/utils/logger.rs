//! Logging Infrastructure
//!
//! Structured `tracing` output to stdout, or to a daily-rotated file when a
//! log directory is given.

use std::path::Path;

/// Initialize the logger at `info`
pub fn init_logger() {
    init_logger_with_file(None, None, None);
}

/// Initialize the logger with optional level, JSON formatting and file output
///
/// Returns quietly if a global subscriber is already installed (tests call
/// this more than once per process).
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level
        .and_then(|l| l.parse().ok())
        .unwrap_or(tracing::Level::INFO);

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let file_dir = log_dir
        .map(Path::new)
        .filter(|path| path.exists())
        .and_then(Path::to_str);

    let result = match (file_dir, json.unwrap_or(false)) {
        (Some(dir), true) => {
            let appender = tracing_appender::rolling::daily(dir, "talent-server");
            subscriber.json().with_writer(appender).try_init()
        }
        (Some(dir), false) => {
            let appender = tracing_appender::rolling::daily(dir, "talent-server");
            subscriber.with_ansi(false).with_writer(appender).try_init()
        }
        (None, true) => subscriber.json().try_init(),
        (None, false) => subscriber.try_init(),
    };

    if result.is_err() {
        tracing::debug!("Global subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init_logger_with_file(Some("debug"), None, None);
        init_logger();
        tracing::info!("still logging");
    }

    #[test]
    fn test_missing_log_dir_falls_back_to_stdout() {
        init_logger_with_file(Some("not-a-level"), Some(true), Some("/definitely/not/here"));
    }
}
