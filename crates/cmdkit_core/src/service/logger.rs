//! Leveled logging to a host output channel.
//!
//! # Responsibility
//! - Append `[timestamp] LEVEL: message` lines to one output channel.
//! - Mirror accepted lines to the `log` facade for the process log.
//!
//! # Invariants
//! - Lines below the current minimum level are dropped, never buffered.
//! - Changing the level affects later calls only.
//! - After teardown no further lines reach the channel.

use crate::extension::lifecycle::Disposable;
use crate::extension::registry::Service;
use crate::host::{OutputChannel, OutputHost};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use std::str::FromStr;

const OUTPUT_LOG_TARGET: &str = "cmdkit::output";

/// Output severity, ordered `Debug < Info < Warn < Error`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    #[serde(alias = "warning")]
    Warn,
    Error,
}

impl LogLevel {
    pub const ALL: [LogLevel; 4] = [Self::Debug, Self::Info, Self::Warn, Self::Error];

    /// Lowercase id used in settings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Uppercase label used in output lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(ParseLogLevelError(other.to_string())),
        }
    }
}

impl From<LogLevel> for log::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

/// Unknown log level name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLogLevelError(String);

impl Display for ParseLogLevelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported log level `{}`; expected debug|info|warn|error",
            self.0
        )
    }
}

impl Error for ParseLogLevelError {}

/// Formats one output line.
pub fn format_line(at: DateTime<Utc>, level: LogLevel, message: &str) -> String {
    format!(
        "[{}] {}: {}",
        at.to_rfc3339_opts(SecondsFormat::Millis, true),
        level.label(),
        message
    )
}

/// User-facing extension log.
pub struct LoggingService {
    channel_name: String,
    channel: RefCell<Option<Rc<dyn OutputChannel>>>,
    min_level: Cell<LogLevel>,
}

impl LoggingService {
    /// Creates the service with a fresh channel named `channel_name`.
    pub fn new(channel_name: &str, output: &dyn OutputHost) -> Self {
        Self::with_channel(channel_name, output.create_output_channel(channel_name))
    }

    pub fn with_channel(channel_name: &str, channel: Rc<dyn OutputChannel>) -> Self {
        Self {
            channel_name: channel_name.to_string(),
            channel: RefCell::new(Some(channel)),
            min_level: Cell::new(LogLevel::default()),
        }
    }

    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    pub fn log_level(&self) -> LogLevel {
        self.min_level.get()
    }

    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level.get()
    }

    pub fn log(&self, message: &str, level: LogLevel) {
        if !self.is_enabled(level) {
            return;
        }

        let line = format_line(Utc::now(), level, message);
        let channel = self.channel.borrow().clone();
        if let Some(channel) = channel {
            channel.append_line(&line);
        }
        log::log!(target: OUTPUT_LOG_TARGET, log::Level::from(level), "{message}");
    }

    pub fn debug(&self, message: &str) {
        self.log(message, LogLevel::Debug);
    }

    pub fn info(&self, message: &str) {
        self.log(message, LogLevel::Info);
    }

    pub fn warn(&self, message: &str) {
        self.log(message, LogLevel::Warn);
    }

    pub fn error(&self, message: &str) {
        self.log(message, LogLevel::Error);
    }

    /// Sets the threshold, then records the change at info level.
    pub fn set_log_level(&self, level: LogLevel) {
        self.min_level.set(level);
        self.info(&format!("Log level changed to: {level}"));
    }

    /// Brings the output channel to the user's attention.
    pub fn show_output(&self) {
        let channel = self.channel.borrow().clone();
        if let Some(channel) = channel {
            channel.show();
        }
    }
}

impl Service for LoggingService {
    fn as_disposable(self: Rc<Self>) -> Option<Rc<dyn Disposable>> {
        Some(self)
    }
}

impl Disposable for LoggingService {
    fn dispose(&self) {
        self.info("LoggingService shutting down");
        let channel = self.channel.borrow_mut().take();
        if let Some(channel) = channel {
            channel.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{format_line, LogLevel};
    use chrono::{TimeZone, Utc};

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn parses_case_insensitively_with_warning_alias() {
        assert_eq!(" WARNING ".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("Error".parse::<LogLevel>(), Ok(LogLevel::Error));
        assert!("trace".parse::<LogLevel>().is_err());
    }

    #[test]
    fn serializes_as_lowercase_id() {
        assert_eq!(
            serde_json::to_value(LogLevel::Warn).expect("serialize"),
            serde_json::json!("warn")
        );
        let parsed: LogLevel = serde_json::from_value(serde_json::json!("warning"))
            .expect("alias should deserialize");
        assert_eq!(parsed, LogLevel::Warn);
    }

    #[test]
    fn formats_iso_timestamp_and_uppercase_label() {
        let at = Utc
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .single()
            .expect("valid timestamp");
        assert_eq!(
            format_line(at, LogLevel::Error, "boom"),
            "[2024-03-09T14:05:07.000Z] ERROR: boom"
        );
    }
}
