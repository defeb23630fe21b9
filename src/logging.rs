use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "jokenpo.log";

/// Keeps the background file writer alive; drop it only at exit.
pub struct FileLogGuard {
    _guard: WorkerGuard,
    pub dir: PathBuf,
}

/// Directory for rolling log files, when `ENABLE_FILE_LOGS` is set.
pub fn file_log_dir() -> Option<PathBuf> {
    file_log_dir_from(|key| std::env::var(key).ok())
}

fn file_log_dir_from(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    let enabled = lookup("ENABLE_FILE_LOGS")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    if !enabled {
        return None;
    }
    let dir = lookup("LOG_DIR")
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "./logs".to_string());
    Some(PathBuf::from(dir))
}

/// Installs the global subscriber. Console output goes to stderr so it never
/// interleaves with the game prompt on stdout.
pub fn init_tracing(log_level: &str) -> Option<FileLogGuard> {
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let mut setup_error = None;
    let (file_layer, guard) = match file_log_dir() {
        Some(dir) => match std::fs::create_dir_all(&dir) {
            Ok(()) => {
                let appender = RollingFileAppender::new(Rotation::DAILY, &dir, LOG_FILE_PREFIX);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer().with_writer(writer).with_ansi(false);
                (Some(layer), Some(FileLogGuard { _guard: guard, dir }))
            }
            Err(err) => {
                setup_error = Some((dir, err));
                (None, None)
            }
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    if let Some((dir, err)) = setup_error {
        tracing::warn!(dir = %dir.display(), error = %err, "file logging disabled");
    }
    if let Some(guard) = &guard {
        tracing::debug!(dir = %guard.dir.display(), "writing daily log files");
    }
    guard
}
