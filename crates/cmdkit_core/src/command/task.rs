//! Named, independently invocable units of work.
//!
//! # Responsibility
//! - Pair a stable id and title with an action function.
//! - Count invocations, log entry, and absorb action failures.
//!
//! # Invariants
//! - The id never changes after construction.
//! - Every `execute` call increments the counter exactly once, before the
//!   action runs, whether the action succeeds or fails.
//! - `execute` never returns an action error to its caller.

use crate::extension::lifecycle::Disposable;
use crate::extension::registry::{ServiceKey, ServiceProvider, ServiceProviderExt};
use crate::host::config::ConfigError;
use crate::host::HostError;
use crate::service::{LogLevel, LOGGING, MESSAGE};
use log::debug;
use std::any::Any;
use std::cell::Cell;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

pub type ActionResult = Result<(), CommandError>;

type Action = Box<dyn Fn(&CommandContext<'_>) -> ActionResult>;

/// Failure raised by a command action.
#[derive(Debug)]
pub enum CommandError {
    Failed(String),
    Config(ConfigError),
    Host(HostError),
}

impl CommandError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Failed(message) => f.write_str(message),
            Self::Config(err) => write!(f, "{err}"),
            Self::Host(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Failed(_) => None,
            Self::Config(err) => Some(err),
            Self::Host(err) => Some(err),
        }
    }
}

impl From<ConfigError> for CommandError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<HostError> for CommandError {
    fn from(value: HostError) -> Self {
        Self::Host(value)
    }
}

/// What an action sees while it runs.
pub struct CommandContext<'a> {
    command_id: &'a str,
    execution: u64,
    services: &'a dyn ServiceProvider,
}

impl<'a> CommandContext<'a> {
    pub fn command_id(&self) -> &'a str {
        self.command_id
    }

    /// One-based number of this invocation.
    pub fn execution(&self) -> u64 {
        self.execution
    }

    pub fn services(&self) -> &'a dyn ServiceProvider {
        self.services
    }

    pub fn service<T: Any>(&self, key: ServiceKey<T>) -> Option<Rc<T>> {
        self.services.get_service(key)
    }
}

/// A command: id, title, and the action it runs.
pub struct Command {
    id: String,
    title: String,
    action: Action,
    executions: Cell<u64>,
}

impl Command {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        action: impl Fn(&CommandContext<'_>) -> ActionResult + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            action: Box::new(action),
            executions: Cell::new(0),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn execution_count(&self) -> u64 {
        self.executions.get()
    }

    /// Runs the action with services from `provider`.
    ///
    /// Failures are logged at error level and shown to the user, then
    /// dropped. Panics inside the action are not caught.
    pub fn execute(&self, provider: &dyn ServiceProvider) {
        let execution = self.executions.get() + 1;
        self.executions.set(execution);

        if let Some(logger) = provider.get_service(LOGGING) {
            logger.log(
                &format!("Command {} executed ({} times)", self.id, execution),
                LogLevel::Debug,
            );
        }

        let context = CommandContext {
            command_id: &self.id,
            execution,
            services: provider,
        };
        if let Err(err) = (self.action)(&context) {
            self.report_failure(&err, provider);
        }
    }

    fn report_failure(&self, err: &CommandError, provider: &dyn ServiceProvider) {
        debug!(
            "event=command_execute module=command status=error command_id={}",
            self.id
        );
        if let Some(logger) = provider.get_service(LOGGING) {
            logger.log(
                &format!("Error in command {}: {err}", self.id),
                LogLevel::Error,
            );
        }
        if let Some(messages) = provider.get_service(MESSAGE) {
            messages.show_error(&format!("Command failed: {err}"));
        }
    }
}

impl Debug for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("executions", &self.executions.get())
            .finish_non_exhaustive()
    }
}

impl Disposable for Command {
    fn dispose(&self) {
        debug!(
            "event=command_dispose module=command status=ok command_id={} executions={}",
            self.id,
            self.executions.get()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{Command, CommandError};
    use crate::extension::registry::LocalServiceProvider;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn counts_every_call_without_services() {
        let provider = LocalServiceProvider::new();
        let flip = Rc::new(Cell::new(false));
        let toggle = Rc::clone(&flip);
        let command = Command::new("demo.flaky", "Flaky", move |_| {
            toggle.set(!toggle.get());
            if toggle.get() {
                Err(CommandError::failed("odd call"))
            } else {
                Ok(())
            }
        });

        for _ in 0..5 {
            command.execute(&provider);
        }

        assert_eq!(command.execution_count(), 5);
    }

    #[test]
    fn context_reports_one_based_execution_number() {
        let provider = LocalServiceProvider::new();
        let seen = Rc::new(Cell::new(0));
        let sink = Rc::clone(&seen);
        let command = Command::new("demo.count", "Count", move |ctx| {
            assert_eq!(ctx.command_id(), "demo.count");
            sink.set(ctx.execution());
            Ok(())
        });

        command.execute(&provider);
        command.execute(&provider);

        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn error_display_is_the_bare_message() {
        assert_eq!(CommandError::failed("boom").to_string(), "boom");
    }
}
