//! Typed settings access scoped to one configuration section.
//!
//! # Responsibility
//! - Convert between stored JSON values and caller types via serde.
//! - Re-broadcast store changes that affect the section to local listeners.
//!
//! # Invariants
//! - `get` returns the caller default when the key has no stored value.
//! - Listeners run in registration order, once per affecting change.
//! - After teardown the store is no longer watched and no listener runs.

use crate::event::{Emitter, Subscription};
use crate::extension::lifecycle::Disposable;
use crate::extension::registry::Service;
use crate::host::config::{ConfigChange, ConfigError, ConfigStore};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Marker delivered to configuration listeners.
///
/// Carries no values; listeners re-read the keys they care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationChanged {
    pub section: String,
}

/// Settings for one section of the host store.
pub struct ConfigurationService {
    section: String,
    store: Rc<dyn ConfigStore>,
    listeners: Emitter<ConfigurationChanged>,
    store_watch: RefCell<Option<Subscription>>,
}

impl ConfigurationService {
    /// Creates the service and starts watching the store.
    pub fn new(section: &str, store: Rc<dyn ConfigStore>) -> Rc<Self> {
        let service = Rc::new(Self {
            section: section.to_string(),
            store,
            listeners: Emitter::new(),
            store_watch: RefCell::new(None),
        });

        let weak = Rc::downgrade(&service);
        let watch = service.store.watch(Box::new(move |change: &ConfigChange| {
            if let Some(service) = weak.upgrade() {
                service.on_store_change(change);
            }
        }));
        *service.store_watch.borrow_mut() = Some(watch);
        debug!("event=config_watch module=service status=ok section={section}");

        service
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    /// Reads `key`, falling back to `default` when absent or unreadable.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.try_get(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(err) => {
                warn!(
                    "event=config_get module=service status=fallback section={} key={key} error={err}",
                    self.section
                );
                default
            }
        }
    }

    /// Reads `key` without substituting a default.
    pub fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        match self.store.read(&self.section, key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Writes `key`; returns once the store committed the value.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        let value = serde_json::to_value(value)?;
        self.store.write(&self.section, key, value)
    }

    /// Removes `key` so later reads see the default again.
    pub fn reset(&self, key: &str) -> Result<bool, ConfigError> {
        self.store.remove(&self.section, key)
    }

    /// Registers `listener`; keep the returned handle to remove it later.
    pub fn on_configuration_change(
        &self,
        listener: impl Fn(&ConfigurationChanged) + 'static,
    ) -> Subscription {
        self.listeners.subscribe(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.listener_count()
    }

    fn on_store_change(&self, change: &ConfigChange) {
        if !change.affects(&self.section) {
            return;
        }
        let delivered = self.listeners.emit(&ConfigurationChanged {
            section: self.section.clone(),
        });
        debug!(
            "event=config_change module=service status=ok section={} listeners={delivered}",
            self.section
        );
    }
}

impl Service for ConfigurationService {
    fn as_disposable(self: Rc<Self>) -> Option<Rc<dyn Disposable>> {
        Some(self)
    }
}

impl Disposable for ConfigurationService {
    fn dispose(&self) {
        let watch = self.store_watch.borrow_mut().take();
        if let Some(watch) = watch {
            watch.unsubscribe();
        }
        self.listeners.clear();
        debug!(
            "event=config_dispose module=service status=ok section={}",
            self.section
        );
    }
}
