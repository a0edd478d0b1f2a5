//! Terminal implementation of the host surfaces.
//!
//! # Responsibility
//! - Print notifications and output channels to the terminal.
//! - Answer prompts from stdin by number; an empty line dismisses.
//! - Serve the active document and workspace search from the file system.

use cmdkit_core::host::{
    ConfigStore, DispatchTable, DocumentSnapshot, EditorSurface, FileSearch, Host, HostError,
    MessageSurface, OutputChannel, OutputHost, Severity, WorkspaceFile,
};
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use walkdir::{DirEntry, WalkDir};

const SKIPPED_DIRS: [&str; 3] = [".git", "target", "node_modules"];

/// Output channel buffered until the user asks to see it.
struct TerminalChannel {
    name: String,
    pending: RefCell<Vec<String>>,
    visible: Cell<bool>,
    released: Cell<bool>,
}

impl TerminalChannel {
    fn print(&self, line: &str) {
        println!("[{}] {line}", self.name);
    }
}

impl OutputChannel for TerminalChannel {
    fn append_line(&self, line: &str) {
        if self.released.get() {
            return;
        }
        if self.visible.get() {
            self.print(line);
        } else {
            self.pending.borrow_mut().push(line.to_string());
        }
    }

    fn show(&self) {
        self.visible.set(true);
        let pending = self.pending.take();
        for line in &pending {
            self.print(line);
        }
    }

    fn release(&self) {
        self.released.set(true);
        self.pending.borrow_mut().clear();
    }
}

/// Host backed by stdin/stdout and the local file system.
pub struct TerminalHost {
    dispatch: DispatchTable,
    document: RefCell<Option<DocumentSnapshot>>,
    workspace: Option<PathBuf>,
}

impl TerminalHost {
    pub fn new(workspace: Option<PathBuf>) -> Rc<Self> {
        Rc::new(Self {
            dispatch: DispatchTable::new(),
            document: RefCell::new(None),
            workspace,
        })
    }

    pub fn host(self: &Rc<Self>, config: Rc<dyn ConfigStore>) -> Host {
        Host {
            commands: Rc::new(self.dispatch.clone()),
            output: Rc::clone(self) as Rc<dyn OutputHost>,
            messages: Rc::clone(self) as Rc<dyn MessageSurface>,
            editor: Rc::clone(self) as Rc<dyn EditorSurface>,
            files: Rc::clone(self) as Rc<dyn FileSearch>,
            config,
        }
    }

    pub fn dispatch(&self) -> &DispatchTable {
        &self.dispatch
    }

    /// Loads `path` as the focused document.
    pub fn load_document(&self, path: &Path) -> Result<(), HostError> {
        let text = std::fs::read_to_string(path)?;
        let snapshot = DocumentSnapshot::new(
            path.to_string_lossy().into_owned(),
            language_for(path),
            text,
        );
        *self.document.borrow_mut() = Some(snapshot);
        Ok(())
    }
}

impl OutputHost for TerminalHost {
    fn create_output_channel(&self, name: &str) -> Rc<dyn OutputChannel> {
        Rc::new(TerminalChannel {
            name: name.to_string(),
            pending: RefCell::new(Vec::new()),
            visible: Cell::new(false),
            released: Cell::new(false),
        })
    }
}

impl MessageSurface for TerminalHost {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => println!("{}: {message}", severity.as_str()),
            Severity::Warning | Severity::Error => eprintln!("{}: {message}", severity.as_str()),
        }
    }

    fn pick_one(&self, placeholder: &str, items: &[String]) -> Option<String> {
        println!("{placeholder}");
        for (index, item) in items.iter().enumerate() {
            println!("  {}) {item}", index + 1);
        }
        print!("> ");
        if let Err(err) = std::io::stdout().flush() {
            warn!("event=prompt module=cli status=error error={err}");
        }

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(0) => return None,
            Ok(_) => {}
            Err(err) => {
                warn!("event=prompt module=cli status=error error={err}");
                return None;
            }
        }
        let answer = answer.trim();
        if answer.is_empty() {
            return None;
        }
        let picked = answer
            .parse::<usize>()
            .ok()
            .and_then(|number| number.checked_sub(1))
            .and_then(|index| items.get(index))
            .cloned();
        if picked.is_none() {
            eprintln!("no option numbered `{answer}`");
        }
        picked
    }
}

impl EditorSurface for TerminalHost {
    fn active_document(&self) -> Option<DocumentSnapshot> {
        self.document.borrow().clone()
    }

    fn open_document(&self, path: &Path) -> Result<(), HostError> {
        self.load_document(path)?;
        println!("opened {}", path.display());
        Ok(())
    }
}

impl FileSearch for TerminalHost {
    fn find_files(&self, max_results: usize) -> Result<Vec<WorkspaceFile>, HostError> {
        let Some(root) = self.workspace.as_deref() else {
            return Err(HostError::NoWorkspace);
        };

        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| !is_skipped_dir(entry));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("event=find_files module=cli status=skip error={err}");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            files.push(WorkspaceFile {
                relative_path: relative
                    .components()
                    .map(|part| part.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/"),
                path: entry.path().to_path_buf(),
            });
            if files.len() >= max_results {
                break;
            }
        }
        debug!(
            "event=find_files module=cli status=ok root={} found={}",
            root.display(),
            files.len()
        );
        Ok(files)
    }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

/// Editor language id guessed from the file extension.
fn language_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("rs") => "rust",
        Some("md") => "markdown",
        Some("toml") => "toml",
        Some("json") => "json",
        Some("js") => "javascript",
        Some("ts") => "typescript",
        Some("py") => "python",
        _ => "plaintext",
    }
}
