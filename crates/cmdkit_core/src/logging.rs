//! Process-wide diagnostic log sink.
//!
//! # Responsibility
//! - Route `log` facade records to a rolling file once per process.
//! - Record panics as sanitized, length-capped events.
//!
//! # Invariants
//! - Initializing twice with identical settings is a no-op.
//! - A different directory or level after the first init is rejected.
//! - Initialization never panics.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "cmdkit";
const ROTATE_AT_BYTES: u64 = 5 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 3;
const PANIC_SUMMARY_CHARS: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    settings: LogSettings,
    _handle: LoggerHandle,
}

/// Normalized logger settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: &'static str,
    pub log_dir: PathBuf,
}

impl LogSettings {
    pub fn parse(level: &str, log_dir: &Path) -> Result<Self, LoggingInitError> {
        let level = match level.trim().to_ascii_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" | "warning" => "warn",
            "error" => "error",
            other => return Err(LoggingInitError::UnsupportedLevel(other.to_string())),
        };
        if log_dir.as_os_str().is_empty() {
            return Err(LoggingInitError::InvalidDirectory(log_dir.to_path_buf()));
        }
        let log_dir = if log_dir.is_absolute() {
            log_dir.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(LoggingInitError::Io)?
                .join(log_dir)
        };
        Ok(Self { level, log_dir })
    }
}

/// Logger bootstrap failures.
#[derive(Debug)]
pub enum LoggingInitError {
    UnsupportedLevel(String),
    InvalidDirectory(PathBuf),
    AlreadyInitialized { active: LogSettings },
    Io(std::io::Error),
    Backend(flexi_logger::FlexiLoggerError),
}

impl Display for LoggingInitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidDirectory(dir) => write!(f, "invalid log directory `{}`", dir.display()),
            Self::AlreadyInitialized { active } => write!(
                f,
                "logging already initialized at `{}` with level `{}`",
                active.log_dir.display(),
                active.level
            ),
            Self::Io(err) => write!(f, "{err}"),
            Self::Backend(err) => write!(f, "failed to start logger: {err}"),
        }
    }
}

impl Error for LoggingInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

/// Starts the rolling file log under `log_dir`.
///
/// # Errors
/// - `UnsupportedLevel` for an unknown level name.
/// - `AlreadyInitialized` when a logger with other settings is active.
/// - `Io` / `Backend` when the directory or the file sink cannot be set up.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), LoggingInitError> {
    let requested = LogSettings::parse(level, log_dir)?;

    let active = ACTIVE.get_or_try_init(|| start(requested.clone()))?;
    if active.settings != requested {
        return Err(LoggingInitError::AlreadyInitialized {
            active: active.settings.clone(),
        });
    }
    Ok(())
}

/// Settings of the active logger, if any.
pub fn logging_status() -> Option<LogSettings> {
    ACTIVE.get().map(|active| active.settings.clone())
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start(settings: LogSettings) -> Result<ActiveLogger, LoggingInitError> {
    std::fs::create_dir_all(&settings.log_dir).map_err(LoggingInitError::Io)?;

    let handle = Logger::try_with_str(settings.level)
        .map_err(LoggingInitError::Backend)?
        .log_to_file(
            FileSpec::default()
                .directory(settings.log_dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(LoggingInitError::Backend)?;

    install_panic_hook();
    info!(
        "event=logging_init module=logging status=ok level={} log_dir={} version={}",
        settings.level,
        settings.log_dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        settings,
        _handle: handle,
    })
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = if let Some(message) = panic_info.payload().downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = panic_info.payload().downcast_ref::<String>() {
            message.clone()
        } else {
            "non-string panic payload".to_string()
        };
        error!(
            "event=panic module=logging status=error location={location} payload={}",
            one_line(&payload, PANIC_SUMMARY_CHARS)
        );
        previous(panic_info);
    }));
}

/// Collapses line breaks and caps the length at `max_chars`.
fn one_line(value: &str, max_chars: usize) -> String {
    let flat = value.replace(['\n', '\r'], " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut capped: String = flat.chars().take(max_chars).collect();
    capped.push_str("...");
    capped
}
