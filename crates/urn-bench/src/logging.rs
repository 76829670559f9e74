use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::Level;
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::EnvFilter;

use crate::config::{ExperimentConfig, LoggingConfig};

/// Keeps the background telemetry writer alive; dropping it flushes pending events.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub telemetry_path: PathBuf,
}

/// Installs the global JSON subscriber when structured logging is enabled.
///
/// Fails when another global subscriber is already installed, since events
/// would never reach the telemetry file.
pub fn init_logging(config: &ExperimentConfig) -> Result<Option<LoggingGuard>> {
    if !config.logging.enable_structured {
        return Ok(None);
    }

    let telemetry_path = config.resolved_log_path();
    let file = create_telemetry_file(&telemetry_path)?;
    let (writer, guard) = NonBlockingBuilder::default().lossy(false).finish(file);

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(event_filter(&config.logging))
        .with_current_span(false)
        .with_span_list(false)
        .with_writer(writer)
        .try_init()
        .map_err(|err| {
            anyhow!(
                "installing telemetry subscriber for {}: {err}",
                telemetry_path.display()
            )
        })?;

    Ok(Some(LoggingGuard {
        _guard: guard,
        telemetry_path,
    }))
}

fn create_telemetry_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating telemetry directory {}", dir.display()))?;
    }
    File::create(path).with_context(|| format!("creating telemetry file {}", path.display()))
}

/// `RUST_LOG` overrides the configured level.
fn event_filter(logging: &LoggingConfig) -> EnvFilter {
    let level = logging.level().unwrap_or(Level::INFO);
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}
