//! Host-provided surfaces consumed by the extension.
//!
//! # Responsibility
//! - Describe the narrow editor capabilities the extension depends on:
//!   command dispatch, output channels, notifications and prompts, the active
//!   document, workspace file search, and persisted settings.
//! - Bundle one implementation of each into a cloneable `Host`.
//!
//! # Invariants
//! - All surfaces are single-threaded; callbacks run on the caller's thread.
//! - Nothing in this module owns editor state; it only forwards to the host.

pub mod config;
pub mod dispatch;
pub mod memory;

use crate::extension::lifecycle::Disposable;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub use config::{ConfigChange, ConfigError, ConfigStore, MemoryConfigStore};
pub use dispatch::DispatchTable;
pub use memory::MemoryHost;

/// Callback the host invokes when a bound command id is triggered.
pub type CommandHandler = Rc<dyn Fn()>;

/// Host command dispatch table.
pub trait CommandHost {
    /// Binds `id` to `handler`; the returned handle unbinds it.
    fn bind_command(&self, id: &str, handler: CommandHandler)
        -> Result<Rc<dyn Disposable>, HostError>;
    /// Invokes the handler bound to `id`.
    fn execute_command(&self, id: &str) -> Result<(), HostError>;
    /// Currently bound ids in binding order.
    fn bound_commands(&self) -> Vec<String>;
}

/// Append-only text surface shown to the user on demand.
pub trait OutputChannel {
    fn append_line(&self, line: &str);
    fn show(&self);
    fn release(&self);
}

/// Factory for named output channels.
pub trait OutputHost {
    fn create_output_channel(&self, name: &str) -> Rc<dyn OutputChannel>;
}

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Transient notifications and single-choice prompts.
pub trait MessageSurface {
    fn notify(&self, severity: Severity, message: &str);
    /// Resolves to the chosen item, or `None` when the user dismisses.
    fn pick_one(&self, placeholder: &str, items: &[String]) -> Option<String>;
}

/// Cursor position, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

/// Selected range in the active document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: Position,
    pub active: Position,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }
}

/// Read-only view of the focused text buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    pub file_name: String,
    pub language_id: String,
    pub text: String,
    pub line_count: usize,
    pub is_dirty: bool,
    pub selection: Selection,
}

impl DocumentSnapshot {
    pub fn new(
        file_name: impl Into<String>,
        language_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let text = text.into();
        // Editor line model: a trailing newline opens one more (empty) line.
        let line_count = text.matches('\n').count() + 1;
        Self {
            file_name: file_name.into(),
            language_id: language_id.into(),
            text,
            line_count,
            is_dirty: false,
            selection: Selection::default(),
        }
    }

    pub fn dirty(mut self, is_dirty: bool) -> Self {
        self.is_dirty = is_dirty;
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }
}

/// Active editor accessor.
pub trait EditorSurface {
    fn active_document(&self) -> Option<DocumentSnapshot>;
    fn open_document(&self, path: &Path) -> Result<(), HostError>;
}

/// One file found by workspace search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceFile {
    /// Path relative to the workspace root, `/`-separated.
    pub relative_path: String,
    pub path: PathBuf,
}

/// Workspace file search primitive.
pub trait FileSearch {
    fn find_files(&self, max_results: usize) -> Result<Vec<WorkspaceFile>, HostError>;
}

/// Host-side failures surfaced through the narrow interfaces.
#[derive(Debug)]
pub enum HostError {
    CommandAlreadyBound(String),
    CommandNotFound(String),
    NoWorkspace,
    Io(std::io::Error),
}

impl Display for HostError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CommandAlreadyBound(id) => write!(f, "command already bound: {id}"),
            Self::CommandNotFound(id) => write!(f, "command not found: {id}"),
            Self::NoWorkspace => write!(f, "no workspace folder is open"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for HostError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for HostError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// One implementation of every host surface.
#[derive(Clone)]
pub struct Host {
    pub commands: Rc<dyn CommandHost>,
    pub output: Rc<dyn OutputHost>,
    pub messages: Rc<dyn MessageSurface>,
    pub editor: Rc<dyn EditorSurface>,
    pub files: Rc<dyn FileSearch>,
    pub config: Rc<dyn ConfigStore>,
}
