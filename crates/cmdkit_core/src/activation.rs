//! Extension entry points.
//!
//! # Responsibility
//! - Build the manager, register the built-in commands, greet the user.
//! - Report command statistics and release everything on deactivation.

use crate::command::builtin_commands;
use crate::extension::manager::{ExtensionManager, ManagerError};
use crate::extension::registry::ServiceProviderExt;
use crate::host::Host;
use crate::service::{LogLevel, LOGGING, MESSAGE};
use log::{info, warn};
use std::rc::Rc;

/// Creates the extension for `host` with every built-in command bound.
///
/// # Errors
/// Fails when a built-in id is already bound in the host dispatch table.
pub fn activate(host: Host) -> Result<Rc<ExtensionManager>, ManagerError> {
    let manager = ExtensionManager::new(host);
    for command in builtin_commands() {
        if let Err(err) = manager.register_command(command) {
            manager.dispose();
            return Err(err);
        }
    }

    if let Some(logger) = manager.get_service(LOGGING) {
        logger.log("Extension activated with OOP architecture", LogLevel::Info);
        logger.log(
            &format!(
                "Registered commands: {}",
                manager.registered_commands().join(", ")
            ),
            LogLevel::Debug,
        );
    }
    if let Some(messages) = manager.get_service(MESSAGE) {
        messages.show_info("Demo Extension (OOP) activated!");
    }
    info!(
        "event=activate module=activation status=ok session={} commands={}",
        manager.session_id(),
        manager.registered_commands().len()
    );
    Ok(manager)
}

/// Logs the statistics snapshot, then disposes `manager`.
pub fn deactivate(manager: &ExtensionManager) {
    let statistics = manager.command_statistics();
    let payload = match serde_json::to_string(&statistics) {
        Ok(payload) => payload,
        Err(err) => {
            warn!("event=deactivate module=activation status=error error={err}");
            "{}".to_string()
        }
    };
    if let Some(logger) = manager.get_service(LOGGING) {
        logger.log(
            &format!("Extension deactivating. Command statistics: {payload}"),
            LogLevel::Info,
        );
    }
    manager.dispose();
    info!(
        "event=deactivate module=activation status=ok session={}",
        manager.session_id()
    );
}
