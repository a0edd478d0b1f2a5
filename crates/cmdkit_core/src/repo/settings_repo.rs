//! SQLite-backed settings store.
//!
//! # Responsibility
//! - Persist JSON setting values keyed by `(section, key)`.
//! - Notify watchers after each committed write or removal.
//!
//! # Invariants
//! - Stored text is always valid JSON; invalid rows surface as errors, never
//!   as silently dropped values.
//! - Notifications fire only after the statement succeeded.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::event::{Emitter, Subscription};
use crate::host::config::{validate_key, ConfigChange, ConfigError, ConfigStore};
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Settings store persisted in one SQLite database.
pub struct SqliteSettingsStore {
    conn: Connection,
    changes: Emitter<ConfigChange>,
}

impl SqliteSettingsStore {
    /// Opens (creating when missing) the settings file at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            changes: Emitter::new(),
        }
    }

    /// Returns every stored key/value in `section`, sorted by key.
    pub fn section_entries(&self, section: &str) -> Result<BTreeMap<String, Value>, ConfigError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value_json FROM settings WHERE section = ?1 ORDER BY key ASC;")?;
        let mut rows = stmt.query([section])?;
        let mut entries = BTreeMap::new();
        while let Some(row) = rows.next()? {
            let key: String = row.get(0)?;
            let raw: String = row.get(1)?;
            entries.insert(key, serde_json::from_str(&raw)?);
        }
        Ok(entries)
    }
}

impl ConfigStore for SqliteSettingsStore {
    fn read(&self, section: &str, key: &str) -> Result<Option<Value>, ConfigError> {
        validate_key(key)?;
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value_json FROM settings WHERE section = ?1 AND key = ?2;",
                params![section, key],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => Ok(Some(value)),
                Err(err) => {
                    warn!(
                        "event=settings_read module=repo status=error section={section} key={key} error_code=invalid_json"
                    );
                    Err(err.into())
                }
            },
            None => Ok(None),
        }
    }

    fn write(&self, section: &str, key: &str, value: Value) -> Result<(), ConfigError> {
        validate_key(key)?;
        let raw = serde_json::to_string(&value)?;
        self.conn.execute(
            "INSERT INTO settings (section, key, value_json)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(section, key) DO UPDATE SET
                value_json = excluded.value_json,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![section, key, raw],
        )?;
        debug!("event=settings_write module=repo status=ok section={section} key={key}");

        self.changes.emit(&ConfigChange::single(section, key));
        Ok(())
    }

    fn remove(&self, section: &str, key: &str) -> Result<bool, ConfigError> {
        validate_key(key)?;
        let changed = self.conn.execute(
            "DELETE FROM settings WHERE section = ?1 AND key = ?2;",
            params![section, key],
        )?;
        if changed == 0 {
            return Ok(false);
        }
        debug!("event=settings_remove module=repo status=ok section={section} key={key}");

        self.changes.emit(&ConfigChange::single(section, key));
        Ok(true)
    }

    fn watch(&self, watcher: Box<dyn Fn(&ConfigChange)>) -> Subscription {
        self.changes.subscribe(watcher)
    }
}
