//! Tracing subscriber setup used by the server.

use std::{env, sync::OnceLock};

use tracing_appender::{
    non_blocking,
    non_blocking::NonBlocking,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter,
    fmt::{fmt, time::ChronoLocal, writer::MakeWriterExt},
};

use crate::error::AppError;

/// Guard to ensure buffered logs are flushed on shutdown.
static LOG_GUARD: OnceLock<non_blocking::WorkerGuard> = OnceLock::new();

/// Where logs go besides stdout, read from `LOG_DIR` and `LOG_MAX_FILES`.
#[derive(Debug, Default)]
pub struct LogSettings {
    pub dir: Option<String>,
    pub max_files: Option<usize>,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self {
            dir: env::var("LOG_DIR").ok(),
            max_files: env::var("LOG_MAX_FILES")
                .ok()
                .and_then(|v| v.parse::<usize>().ok()),
        }
    }
}

pub fn init(settings: &LogSettings) -> Result<(), AppError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt()
        .with_env_filter(env_filter)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(false)
        .with_ansi(true)
        .with_level(true);

    if let Some(dir) = &settings.dir {
        let stdout = std::io::stdout.with_max_level(tracing::Level::INFO);
        let writer = stdout.and(file_writer(dir, settings.max_files)?);

        builder.with_writer(writer).init();
    } else {
        builder.init();
    }

    tracing::info!("logger initialized");
    Ok(())
}

fn file_writer(dir: &str, max_files: Option<usize>) -> Result<NonBlocking, AppError> {
    let mut file_builder = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("riftboard.log");

    if let Some(n) = max_files {
        file_builder = file_builder.max_log_files(n);
    }

    let file_appender = file_builder
        .build(dir)
        .map_err(|e| AppError::Config(format!("failed to create log file in {dir}: {e}")))?;

    let (file_writer, guard) = non_blocking(file_appender);

    // Only the first subscriber can be installed, so a second guard is never needed.
    let _ = LOG_GUARD.set(guard);

    Ok(file_writer)
}
