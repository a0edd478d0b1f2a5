use cmdkit_core::host::{ConfigStore, MemoryConfigStore};
use cmdkit_core::{ConfigurationService, Disposable, LogLevel, SqliteSettingsStore};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Window {
    width: u32,
    height: u32,
}

#[test]
fn get_returns_default_only_when_absent() {
    let store = Rc::new(MemoryConfigStore::new());
    let config = ConfigurationService::new("demo", store);

    assert_eq!(config.get("logLevel", LogLevel::Info), LogLevel::Info);
    config.set("logLevel", &LogLevel::Error).unwrap();
    assert_eq!(config.get("logLevel", LogLevel::Info), LogLevel::Error);

    config.set("autoSave", &false).unwrap();
    assert!(!config.get("autoSave", true));
}

#[test]
fn structured_values_round_trip() {
    let store = Rc::new(MemoryConfigStore::new());
    let config = ConfigurationService::new("demo", store);
    let window = Window {
        width: 800,
        height: 600,
    };

    config.set("window", &window).unwrap();

    assert_eq!(
        config.try_get::<Window>("window").unwrap(),
        Some(window.clone())
    );
}

#[test]
fn listeners_run_in_registration_order_and_can_be_removed() {
    let store = Rc::new(MemoryConfigStore::new());
    let config = ConfigurationService::new("demo", store.clone());
    let calls = Rc::new(RefCell::new(Vec::new()));

    let first_calls = Rc::clone(&calls);
    let first = config.on_configuration_change(move |_| first_calls.borrow_mut().push("first"));
    let second_calls = Rc::clone(&calls);
    let _second =
        config.on_configuration_change(move |_| second_calls.borrow_mut().push("second"));

    config.set("autoSave", &true).unwrap();
    assert_eq!(*calls.borrow(), vec!["first", "second"]);

    assert!(first.unsubscribe());
    assert!(!first.unsubscribe());
    config.set("autoSave", &false).unwrap();
    assert_eq!(*calls.borrow(), vec!["first", "second", "second"]);
}

#[test]
fn changes_to_other_sections_are_ignored() {
    let store = Rc::new(MemoryConfigStore::new());
    let config = ConfigurationService::new("demo", store.clone());
    let hits = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&hits);
    let _subscription = config.on_configuration_change(move |change| {
        assert_eq!(change.section, "demo");
        *counter.borrow_mut() += 1;
    });

    store
        .write("editor", "fontSize", serde_json::json!(14))
        .unwrap();
    store
        .write("demonstration", "flag", serde_json::json!(true))
        .unwrap();
    assert_eq!(*hits.borrow(), 0);

    store.write("demo", "autoSave", serde_json::json!(true)).unwrap();
    assert_eq!(*hits.borrow(), 1);
}

#[test]
fn teardown_stops_watching_the_store() {
    let store = Rc::new(MemoryConfigStore::new());
    let config = ConfigurationService::new("demo", store.clone());
    let hits = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&hits);
    let _subscription = config.on_configuration_change(move |_| *counter.borrow_mut() += 1);
    assert_eq!(store.watcher_count(), 1);

    config.dispose();
    store.write("demo", "autoSave", serde_json::json!(true)).unwrap();

    assert_eq!(*hits.borrow(), 0);
    assert_eq!(store.watcher_count(), 0);
    assert_eq!(config.listener_count(), 0);
}

#[test]
fn sqlite_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.db");

    {
        let store = Rc::new(SqliteSettingsStore::open(&path).unwrap());
        let config = ConfigurationService::new("demo", store);
        config.set("logLevel", &LogLevel::Debug).unwrap();
        config.set("autoSave", &false).unwrap();
    }

    let store = Rc::new(SqliteSettingsStore::open(&path).unwrap());
    let entries = store.section_entries("demo").unwrap();
    assert_eq!(entries.len(), 2);

    let config = ConfigurationService::new("demo", store);
    assert_eq!(config.get("logLevel", LogLevel::Info), LogLevel::Debug);
    assert!(!config.get("autoSave", true));
}

#[test]
fn sqlite_store_notifies_listeners_after_commit() {
    let store = Rc::new(SqliteSettingsStore::open_in_memory().unwrap());
    let config = ConfigurationService::new("demo", store);
    let seen = Rc::new(RefCell::new(Vec::new()));

    let reader = Rc::clone(&config);
    let sink = Rc::clone(&seen);
    let _subscription = config.on_configuration_change(move |_| {
        sink.borrow_mut()
            .push(reader.get("logLevel", LogLevel::Info));
    });

    config.set("logLevel", &LogLevel::Warn).unwrap();
    assert!(config.reset("logLevel").unwrap());
    assert!(!config.reset("logLevel").unwrap());

    assert_eq!(*seen.borrow(), vec![LogLevel::Warn, LogLevel::Info]);
}
