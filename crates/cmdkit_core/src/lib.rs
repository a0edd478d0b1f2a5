//! Core of the cmdkit extension convention: a typed service registry, command
//! dispatch, and exactly-once teardown on top of narrow host surfaces.
//! This crate is the single source of truth for those invariants.

pub mod activation;
pub mod command;
pub mod db;
pub mod event;
pub mod extension;
pub mod host;
pub mod logging;
pub mod repo;
pub mod service;
pub mod text;

pub use activation::{activate, deactivate};
pub use command::{ActionResult, Command, CommandContext, CommandError};
pub use event::{Emitter, Subscription};
pub use extension::lifecycle::{Disposable, DisposableList, DisposeFn};
pub use extension::manager::{ExtensionManager, ManagerError};
pub use extension::registry::{
    LocalServiceProvider, Service, ServiceKey, ServiceProvider, ServiceProviderExt,
};
pub use host::{Host, HostError, MemoryHost};
pub use logging::{default_log_level, init_logging, logging_status, LoggingInitError};
pub use repo::settings_repo::SqliteSettingsStore;
pub use service::{
    ConfigurationService, LogLevel, LoggingService, MessageService, WorkspaceService,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
