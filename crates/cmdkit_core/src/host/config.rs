//! Persisted settings store contract.
//!
//! # Responsibility
//! - Read and write JSON setting values scoped by `(section, key)`.
//! - Broadcast a `ConfigChange` to watchers after every successful write.
//!
//! # Invariants
//! - A write is durable for the store's medium once `write` returns `Ok`.
//! - Watchers observe the change only after the new value is readable.

use crate::db::DbError;
use crate::event::{Emitter, Subscription};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Change notification naming every affected `section.key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigChange {
    changed: Vec<String>,
}

impl ConfigChange {
    pub fn new(changed: Vec<String>) -> Self {
        Self { changed }
    }

    pub fn single(section: &str, key: &str) -> Self {
        Self::new(vec![qualified_key(section, key)])
    }

    pub fn changed_keys(&self) -> &[String] {
        &self.changed
    }

    /// Returns whether the change touches `section` or anything below it.
    pub fn affects(&self, section: &str) -> bool {
        self.changed.iter().any(|changed| {
            changed == section
                || (changed.starts_with(section)
                    && changed.as_bytes().get(section.len()) == Some(&b'.'))
        })
    }
}

/// Returns the dotted `section.key` form.
pub fn qualified_key(section: &str, key: &str) -> String {
    if section.is_empty() {
        key.to_string()
    } else {
        format!("{section}.{key}")
    }
}

/// Settings storage errors.
#[derive(Debug)]
pub enum ConfigError {
    InvalidKey(String),
    Db(DbError),
    Serde(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey(key) => write!(f, "setting key is invalid: `{key}`"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Serde(err) => write!(f, "setting value could not be converted: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidKey(_) => None,
            Self::Db(err) => Some(err),
            Self::Serde(err) => Some(err),
        }
    }
}

impl From<DbError> for ConfigError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for ConfigError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

/// Rejects empty keys and keys with surrounding whitespace.
pub fn validate_key(key: &str) -> Result<(), ConfigError> {
    if key.is_empty() || key.trim() != key {
        return Err(ConfigError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Host persisted settings store.
pub trait ConfigStore {
    fn read(&self, section: &str, key: &str) -> Result<Option<Value>, ConfigError>;
    fn write(&self, section: &str, key: &str, value: Value) -> Result<(), ConfigError>;
    /// Removes the value; returns whether one existed.
    fn remove(&self, section: &str, key: &str) -> Result<bool, ConfigError>;
    fn watch(&self, watcher: Box<dyn Fn(&ConfigChange)>) -> Subscription;
}

/// Process-local store for tests and ephemeral hosts.
#[derive(Default)]
pub struct MemoryConfigStore {
    values: RefCell<BTreeMap<(String, String), Value>>,
    changes: Emitter<ConfigChange>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    pub fn watcher_count(&self) -> usize {
        self.changes.listener_count()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn read(&self, section: &str, key: &str) -> Result<Option<Value>, ConfigError> {
        validate_key(key)?;
        Ok(self
            .values
            .borrow()
            .get(&(section.to_string(), key.to_string()))
            .cloned())
    }

    fn write(&self, section: &str, key: &str, value: Value) -> Result<(), ConfigError> {
        validate_key(key)?;
        self.values
            .borrow_mut()
            .insert((section.to_string(), key.to_string()), value);
        self.changes.emit(&ConfigChange::single(section, key));
        Ok(())
    }

    fn remove(&self, section: &str, key: &str) -> Result<bool, ConfigError> {
        validate_key(key)?;
        let removed = self
            .values
            .borrow_mut()
            .remove(&(section.to_string(), key.to_string()))
            .is_some();
        if removed {
            self.changes.emit(&ConfigChange::single(section, key));
        }
        Ok(removed)
    }

    fn watch(&self, watcher: Box<dyn Fn(&ConfigChange)>) -> Subscription {
        self.changes.subscribe(watcher)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigChange, ConfigError, ConfigStore, MemoryConfigStore};
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn affects_matches_section_prefix_on_dot_boundary() {
        let change = ConfigChange::single("demo", "logLevel");
        assert!(change.affects("demo"));
        assert!(change.affects("demo.logLevel"));
        assert!(!change.affects("dem"));
        assert!(!change.affects("demo.log"));
        assert!(!change.affects("other"));
    }

    #[test]
    fn memory_store_round_trips_and_notifies_after_write() {
        let store = Rc::new(MemoryConfigStore::new());
        let observed = Rc::new(RefCell::new(Vec::new()));
        {
            let observed = Rc::clone(&observed);
            let reader = Rc::clone(&store);
            store.watch(Box::new(move |change| {
                let value = reader.read("demo", "autoSave").expect("read inside watcher");
                observed
                    .borrow_mut()
                    .push((change.changed_keys().to_vec(), value));
            }));
        }

        store
            .write("demo", "autoSave", json!(false))
            .expect("write setting");

        assert_eq!(
            *observed.borrow(),
            vec![(vec!["demo.autoSave".to_string()], Some(json!(false)))]
        );
    }

    #[test]
    fn remove_reports_presence() {
        let store = MemoryConfigStore::new();
        store.write("demo", "autoSave", json!(true)).expect("write");

        assert!(store.remove("demo", "autoSave").expect("remove"));
        assert!(!store.remove("demo", "autoSave").expect("remove again"));
        assert!(store.is_empty());
    }

    #[test]
    fn rejects_blank_keys() {
        let store = MemoryConfigStore::new();
        let err = store.read("demo", " ").expect_err("blank key");
        assert!(matches!(err, ConfigError::InvalidKey(_)));
    }
}
