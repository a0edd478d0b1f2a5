//! Default services shared by every command.
//!
//! # Responsibility
//! - Provide logging, settings, notifications, and workspace access.
//! - Name each service with a typed registry key.

pub mod configuration;
pub mod logger;
pub mod message;
pub mod workspace;

use crate::extension::registry::ServiceKey;

pub use configuration::{ConfigurationChanged, ConfigurationService};
pub use logger::{LogLevel, LoggingService, ParseLogLevelError};
pub use message::MessageService;
pub use workspace::WorkspaceService;

pub const LOGGING: ServiceKey<LoggingService> = ServiceKey::new("logging");
pub const CONFIG: ServiceKey<ConfigurationService> = ServiceKey::new("config");
pub const MESSAGE: ServiceKey<MessageService> = ServiceKey::new("message");
pub const WORKSPACE: ServiceKey<WorkspaceService> = ServiceKey::new("workspace");

/// Settings section owned by this extension.
pub const CONFIG_SECTION: &str = "demo";
/// Minimum level for the extension output channel.
pub const LOG_LEVEL_KEY: &str = "logLevel";
/// Whether edits are saved automatically.
pub const AUTO_SAVE_KEY: &str = "autoSave";
/// Name of the extension output channel.
pub const OUTPUT_CHANNEL_NAME: &str = "Demo Extension";
