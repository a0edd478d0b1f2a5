use cmdkit_core::host::{CommandHost, ConfigStore, DocumentSnapshot, Severity};
use cmdkit_core::service::{LOGGING, OUTPUT_CHANNEL_NAME};
use cmdkit_core::{activate, deactivate, LogLevel, MemoryHost, ServiceProviderExt};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::PathBuf;

const BUILTIN_IDS: [&str; 5] = [
    "demo.helloWorld",
    "demo.fileInfo",
    "demo.showLog",
    "demo.configTest",
    "demo.openFile",
];

#[test]
fn activation_binds_builtins_and_greets() {
    let host = MemoryHost::new();
    let manager = activate(host.host()).unwrap();

    assert_eq!(manager.registered_commands(), BUILTIN_IDS);
    assert_eq!(host.dispatch().bound_commands(), BUILTIN_IDS);
    assert_eq!(
        host.notifications_of(Severity::Info),
        vec!["Demo Extension (OOP) activated!"]
    );
    assert!(host
        .output_lines(OUTPUT_CHANNEL_NAME)
        .iter()
        .any(|line| line.ends_with("INFO: Extension activated with OOP architecture")));
}

#[test]
fn activation_fails_when_a_builtin_id_is_taken() {
    let host = MemoryHost::new();
    let first = activate(host.host()).unwrap();

    assert!(activate(host.host()).is_err());
    assert_eq!(host.dispatch().bound_commands(), BUILTIN_IDS);
    drop(first);
}

#[test]
fn hello_world_reports_execution_number() {
    let host = MemoryHost::new();
    let _manager = activate(host.host()).unwrap();

    host.trigger("demo.helloWorld").unwrap();
    host.trigger("demo.helloWorld").unwrap();

    let infos = host.notifications_of(Severity::Info);
    assert_eq!(
        infos[1..].to_vec(),
        vec![
            "Hello World from OOP Extension! (Execution #1)",
            "Hello World from OOP Extension! (Execution #2)",
        ]
    );
}

#[test]
fn file_info_warns_without_editor_and_summarizes_document() {
    let host = MemoryHost::new();
    let _manager = activate(host.host()).unwrap();

    host.trigger("demo.fileInfo").unwrap();
    assert_eq!(
        host.notifications_of(Severity::Warning),
        vec!["No active editor found"]
    );

    host.set_active_document(Some(
        DocumentSnapshot::new("/work/notes.md", "markdown", "one two\nthree").dirty(true),
    ));
    host.trigger("demo.fileInfo").unwrap();

    let infos = host.notifications_of(Severity::Info);
    assert_eq!(
        infos.last().map(String::as_str),
        Some("notes.md (markdown): 2 lines, 3 words, 13 chars, 0 KB (UNSAVED)")
    );
    assert!(host
        .output_lines(OUTPUT_CHANNEL_NAME)
        .iter()
        .any(|line| line.ends_with("INFO: File analysis completed for notes.md")));
}

#[test]
fn show_log_reveals_output_channel() {
    let host = MemoryHost::new();
    let _manager = activate(host.host()).unwrap();

    host.trigger("demo.showLog").unwrap();

    assert_eq!(host.channel(OUTPUT_CHANNEL_NAME).unwrap().times_shown(), 1);
}

#[test]
fn config_test_applies_picked_level() {
    let host = MemoryHost::new();
    let manager = activate(host.host()).unwrap();
    host.answer_next_prompt(Some("error"));

    host.trigger("demo.configTest").unwrap();

    let infos = host.notifications_of(Severity::Info);
    assert!(infos.contains(&"Current Config: LogLevel=info, AutoSave=true".to_string()));
    assert_eq!(
        infos.last().map(String::as_str),
        Some("Log level changed to: error")
    );
    assert_eq!(host.prompts()[0].items, vec!["debug", "info", "warn", "error"]);
    assert_eq!(
        manager.get_service(LOGGING).unwrap().log_level(),
        LogLevel::Error
    );
    let stored = host.config_store().read("demo", "logLevel").unwrap();
    assert_eq!(stored, Some(serde_json::json!("error")));
}

#[test]
fn config_test_dismissal_changes_nothing() {
    let host = MemoryHost::new();
    let manager = activate(host.host()).unwrap();

    host.trigger("demo.configTest").unwrap();

    assert_eq!(
        manager.get_service(LOGGING).unwrap().log_level(),
        LogLevel::Info
    );
    assert!(host.config_store().is_empty());
    assert!(host.notifications_of(Severity::Error).is_empty());
}

#[test]
fn open_file_sorts_choices_and_opens_pick() {
    let host = MemoryHost::new();
    let _manager = activate(host.host()).unwrap();
    host.set_workspace_files(&["src/main.rs", "Cargo.toml", "README.md"]);
    host.answer_next_prompt(Some("src/main.rs"));

    host.trigger("demo.openFile").unwrap();

    assert_eq!(
        host.prompts()[0].items,
        vec!["Cargo.toml", "README.md", "src/main.rs"]
    );
    assert_eq!(
        host.opened_documents(),
        vec![PathBuf::from("/workspace/src/main.rs")]
    );
}

#[test]
fn open_file_warns_on_empty_workspace_and_fails_without_one() {
    let host = MemoryHost::new();
    let _manager = activate(host.host()).unwrap();

    host.trigger("demo.openFile").unwrap();
    assert_eq!(
        host.notifications_of(Severity::Error),
        vec!["Command failed: no workspace folder is open"]
    );

    host.set_workspace_files(&[]);
    host.trigger("demo.openFile").unwrap();
    assert_eq!(
        host.notifications_of(Severity::Warning),
        vec!["No files found in workspace"]
    );
    assert!(host.prompts().is_empty());
}

#[test]
fn deactivation_logs_statistics_and_disposes() {
    let host = MemoryHost::new();
    let manager = activate(host.host()).unwrap();
    host.trigger("demo.helloWorld").unwrap();
    host.trigger("demo.helloWorld").unwrap();
    host.trigger("demo.showLog").unwrap();

    deactivate(&manager);

    assert!(manager.is_disposed());
    assert!(host.dispatch().bound_commands().is_empty());

    let pattern = Regex::new(r"INFO: Extension deactivating\. Command statistics: (\{.*\})$").unwrap();
    let lines = host.output_lines(OUTPUT_CHANNEL_NAME);
    let payload = lines
        .iter()
        .find_map(|line| pattern.captures(line))
        .map(|captures| captures[1].to_string())
        .unwrap();
    let statistics: BTreeMap<String, u64> = serde_json::from_str(&payload).unwrap();
    assert_eq!(statistics["demo.helloWorld"], 2);
    assert_eq!(statistics["demo.showLog"], 1);
    assert_eq!(statistics["demo.openFile"], 0);
    assert_eq!(statistics.len(), BUILTIN_IDS.len());
}
