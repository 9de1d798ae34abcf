//! Logging Infrastructure
//!
//! `RUST_LOG` wins when set; otherwise `level` applies to this crate and
//! tower_http. Output goes to stdout, or to a daily rolling file when
//! `log_dir` exists.

use std::path::Path;

use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber. A second call is a no-op.
pub fn init_logger(level: &str, json: bool, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("depot_server={level},tower_http={level}")));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let result = match (json, log_dir.and_then(log_file_writer)) {
        (true, Some(writer)) => builder.json().with_writer(writer).try_init(),
        (true, None) => builder.json().try_init(),
        (false, Some(writer)) => builder.with_ansi(false).with_writer(writer).try_init(),
        (false, None) => builder.try_init(),
    };

    if let Err(e) = result {
        tracing::debug!("Logger already initialized: {e}");
    }
}

/// Daily rolling appender in `dir`, if the directory exists
pub fn log_file_writer(dir: &str) -> Option<RollingFileAppender> {
    let path = Path::new(dir);
    if !path.is_dir() {
        return None;
    }
    Some(tracing_appender::rolling::daily(path, "depot-server"))
}
