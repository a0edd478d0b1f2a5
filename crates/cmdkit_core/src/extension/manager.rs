//! Extension composition root.
//!
//! # Responsibility
//! - Own the service registry and the registered commands.
//! - Bind each command into the host dispatch table.
//! - Release everything it created, exactly once.
//!
//! # Invariants
//! - Command ids are unique per manager; duplicates are rejected before any
//!   host binding is made.
//! - Teardown order: commands, then tracked disposables in insertion order
//!   (services and host bindings), then both maps are cleared.
//! - After `dispose` the manager refuses new registrations.

use crate::command::task::Command;
use crate::extension::lifecycle::{Disposable, DisposableList};
use crate::extension::registry::{ServiceProvider, ServiceProviderExt, ServiceRegistry};
use crate::host::{CommandHandler, Host, HostError};
use crate::service::{
    ConfigurationService, LogLevel, LoggingService, MessageService, WorkspaceService, CONFIG,
    CONFIG_SECTION, LOGGING, LOG_LEVEL_KEY, MESSAGE, OUTPUT_CHANNEL_NAME, WORKSPACE,
};
use log::{debug, info};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::{Rc, Weak};
use uuid::Uuid;

/// Command registration failures.
#[derive(Debug)]
pub enum ManagerError {
    InvalidCommandId(String),
    DuplicateCommandId(String),
    Disposed,
    Host(HostError),
}

impl Display for ManagerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCommandId(id) => write!(f, "command id is invalid: `{id}`"),
            Self::DuplicateCommandId(id) => write!(f, "command id already registered: {id}"),
            Self::Disposed => write!(f, "extension manager is already disposed"),
            Self::Host(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ManagerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Host(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HostError> for ManagerError {
    fn from(value: HostError) -> Self {
        Self::Host(value)
    }
}

/// Service registry plus command set for one extension activation.
pub struct ExtensionManager {
    session_id: Uuid,
    host: Host,
    this: Weak<ExtensionManager>,
    services: ServiceRegistry,
    commands: RefCell<Vec<Rc<Command>>>,
    disposables: DisposableList,
    disposed: Cell<bool>,
}

impl ExtensionManager {
    /// Creates the manager and registers the default services.
    pub fn new(host: Host) -> Rc<Self> {
        let manager = Rc::new_cyclic(|this| Self {
            session_id: Uuid::new_v4(),
            host,
            this: this.clone(),
            services: ServiceRegistry::new(),
            commands: RefCell::new(Vec::new()),
            disposables: DisposableList::new(),
            disposed: Cell::new(false),
        });
        info!(
            "event=manager_create module=extension status=ok session={}",
            manager.session_id
        );
        manager.initialize_default_services();
        manager
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Stores `command` and binds its id in the host dispatch table.
    pub fn register_command(&self, command: Command) -> Result<(), ManagerError> {
        if self.disposed.get() {
            return Err(ManagerError::Disposed);
        }
        let id = command.id().to_string();
        if !is_valid_command_id(&id) {
            return Err(ManagerError::InvalidCommandId(id));
        }
        if self.command(&id).is_some() {
            return Err(ManagerError::DuplicateCommandId(id));
        }

        let command = Rc::new(command);
        let target = Rc::clone(&command);
        let manager = self.this.clone();
        let handler: CommandHandler = Rc::new(move || {
            if let Some(manager) = manager.upgrade() {
                target.execute(manager.as_ref());
            }
        });
        let binding = self.host.commands.bind_command(&id, handler)?;

        self.commands.borrow_mut().push(command);
        self.disposables.push(binding);
        debug!(
            "event=command_register module=extension status=ok session={} command_id={id}",
            self.session_id
        );
        if let Some(logger) = self.get_service(LOGGING) {
            logger.log(&format!("Command registered: {id}"), LogLevel::Debug);
        }
        Ok(())
    }

    pub fn command(&self, id: &str) -> Option<Rc<Command>> {
        self.commands
            .borrow()
            .iter()
            .find(|command| command.id() == id)
            .cloned()
    }

    /// Registered command ids in registration order.
    pub fn registered_commands(&self) -> Vec<String> {
        self.commands
            .borrow()
            .iter()
            .map(|command| command.id().to_string())
            .collect()
    }

    /// Snapshot of `id -> execution count` at call time.
    pub fn command_statistics(&self) -> BTreeMap<String, u64> {
        self.commands
            .borrow()
            .iter()
            .map(|command| (command.id().to_string(), command.execution_count()))
            .collect()
    }

    /// Registered service key names, sorted.
    pub fn service_keys(&self) -> Vec<&'static str> {
        self.services.keys()
    }

    pub fn pending_disposables(&self) -> usize {
        self.disposables.len()
    }

    /// Releases commands, services, and host bindings. Later calls are no-ops.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        info!(
            "event=manager_dispose module=extension status=start session={}",
            self.session_id
        );

        let commands = self.commands.take();
        for command in &commands {
            command.dispose();
        }
        let released = self.disposables.dispose_all();
        self.services.clear();

        info!(
            "event=manager_dispose module=extension status=ok session={} commands={} disposables={released}",
            self.session_id,
            commands.len()
        );
    }

    fn initialize_default_services(&self) {
        let logger = Rc::new(LoggingService::new(
            OUTPUT_CHANNEL_NAME,
            self.host.output.as_ref(),
        ));
        self.register_service(LOGGING, Rc::clone(&logger));

        let config = ConfigurationService::new(CONFIG_SECTION, Rc::clone(&self.host.config));
        self.register_service(CONFIG, Rc::clone(&config));

        self.register_service(
            MESSAGE,
            Rc::new(MessageService::new(Rc::clone(&self.host.messages))),
        );
        self.register_service(
            WORKSPACE,
            Rc::new(WorkspaceService::new(
                Rc::clone(&self.host.editor),
                Rc::clone(&self.host.files),
            )),
        );

        let stored_level: LogLevel = config.get(LOG_LEVEL_KEY, LogLevel::Info);
        if stored_level != logger.log_level() {
            logger.set_log_level(stored_level);
        }

        let weak_config = Rc::downgrade(&config);
        let weak_logger = Rc::downgrade(&logger);
        let follow_level = config.on_configuration_change(move |_| {
            if let (Some(config), Some(logger)) = (weak_config.upgrade(), weak_logger.upgrade()) {
                logger.set_log_level(config.get(LOG_LEVEL_KEY, LogLevel::Info));
            }
        });
        self.disposables.push(Rc::new(follow_level));

        logger.log("Default services initialized", LogLevel::Info);
    }
}

impl ServiceProvider for ExtensionManager {
    fn resolve(&self, name: &str) -> Option<Rc<dyn Any>> {
        self.services.get(name)
    }

    fn store(&self, name: &'static str, service: Rc<dyn Any>, teardown: Option<Rc<dyn Disposable>>) {
        let replaced = self.services.insert(name, service).is_some();
        if let Some(teardown) = teardown {
            self.disposables.push(teardown);
        }
        debug!(
            "event=service_register module=extension status=ok session={} key={name} replaced={replaced}",
            self.session_id
        );
        if let Some(logger) = self.get_service(LOGGING) {
            logger.log(&format!("Service registered: {name}"), LogLevel::Debug);
        }
    }
}

impl Disposable for ExtensionManager {
    fn dispose(&self) {
        ExtensionManager::dispose(self);
    }
}

fn is_valid_command_id(id: &str) -> bool {
    !id.is_empty() && !id.chars().any(char::is_whitespace)
}
