//! Recording in-memory host.
//!
//! Implements every host surface against plain in-process state so the
//! extension can be driven without an editor: output lines, notifications,
//! and prompts are recorded; prompt answers are scripted up front.

use super::{
    CommandHost, DispatchTable, DocumentSnapshot, EditorSurface, FileSearch, Host, HostError,
    MemoryConfigStore, MessageSurface, OutputChannel, OutputHost, Severity, WorkspaceFile,
};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Output channel that keeps every appended line.
pub struct MemoryOutputChannel {
    name: String,
    lines: RefCell<Vec<String>>,
    shown: Cell<u32>,
    released: Cell<bool>,
}

impl MemoryOutputChannel {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn times_shown(&self) -> u32 {
        self.shown.get()
    }

    pub fn is_released(&self) -> bool {
        self.released.get()
    }
}

impl OutputChannel for MemoryOutputChannel {
    fn append_line(&self, line: &str) {
        if !self.released.get() {
            self.lines.borrow_mut().push(line.to_string());
        }
    }

    fn show(&self) {
        self.shown.set(self.shown.get() + 1);
    }

    fn release(&self) {
        self.released.set(true);
    }
}

/// A prompt as the user saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPrompt {
    pub placeholder: String,
    pub items: Vec<String>,
}

/// Host double recording all user-visible effects.
#[derive(Default)]
pub struct MemoryHost {
    dispatch: DispatchTable,
    config: Rc<MemoryConfigStore>,
    channels: RefCell<Vec<Rc<MemoryOutputChannel>>>,
    notifications: RefCell<Vec<(Severity, String)>>,
    answers: RefCell<VecDeque<Option<String>>>,
    prompts: RefCell<Vec<RecordedPrompt>>,
    document: RefCell<Option<DocumentSnapshot>>,
    files: RefCell<Option<Vec<WorkspaceFile>>>,
    opened: RefCell<Vec<PathBuf>>,
}

impl MemoryHost {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Bundles this double as every host surface.
    pub fn host(self: &Rc<Self>) -> Host {
        Host {
            commands: Rc::new(self.dispatch.clone()),
            output: Rc::clone(self) as Rc<dyn OutputHost>,
            messages: Rc::clone(self) as Rc<dyn MessageSurface>,
            editor: Rc::clone(self) as Rc<dyn EditorSurface>,
            files: Rc::clone(self) as Rc<dyn FileSearch>,
            config: Rc::clone(&self.config) as Rc<dyn super::ConfigStore>,
        }
    }

    pub fn dispatch(&self) -> &DispatchTable {
        &self.dispatch
    }

    pub fn config_store(&self) -> &Rc<MemoryConfigStore> {
        &self.config
    }

    /// Triggers a bound command the way a user would.
    pub fn trigger(&self, id: &str) -> Result<(), HostError> {
        self.dispatch.execute_command(id)
    }

    pub fn channel(&self, name: &str) -> Option<Rc<MemoryOutputChannel>> {
        self.channels
            .borrow()
            .iter()
            .find(|channel| channel.name == name)
            .cloned()
    }

    /// Lines appended to the named channel, empty when it does not exist.
    pub fn output_lines(&self, name: &str) -> Vec<String> {
        self.channel(name)
            .map(|channel| channel.lines())
            .unwrap_or_default()
    }

    pub fn notifications(&self) -> Vec<(Severity, String)> {
        self.notifications.borrow().clone()
    }

    pub fn notifications_of(&self, severity: Severity) -> Vec<String> {
        self.notifications
            .borrow()
            .iter()
            .filter(|(kind, _)| *kind == severity)
            .map(|(_, message)| message.clone())
            .collect()
    }

    /// Queues the answer for the next prompt; `None` dismisses it.
    pub fn answer_next_prompt(&self, answer: Option<&str>) {
        self.answers
            .borrow_mut()
            .push_back(answer.map(str::to_string));
    }

    pub fn prompts(&self) -> Vec<RecordedPrompt> {
        self.prompts.borrow().clone()
    }

    pub fn set_active_document(&self, document: Option<DocumentSnapshot>) {
        *self.document.borrow_mut() = document;
    }

    /// Opens a workspace with the given relative file paths.
    pub fn set_workspace_files(&self, relative_paths: &[&str]) {
        let files = relative_paths
            .iter()
            .map(|relative| WorkspaceFile {
                relative_path: (*relative).to_string(),
                path: Path::new("/workspace").join(relative),
            })
            .collect();
        *self.files.borrow_mut() = Some(files);
    }

    pub fn opened_documents(&self) -> Vec<PathBuf> {
        self.opened.borrow().clone()
    }
}

impl OutputHost for MemoryHost {
    fn create_output_channel(&self, name: &str) -> Rc<dyn OutputChannel> {
        let channel = Rc::new(MemoryOutputChannel {
            name: name.to_string(),
            lines: RefCell::new(Vec::new()),
            shown: Cell::new(0),
            released: Cell::new(false),
        });
        self.channels.borrow_mut().push(Rc::clone(&channel));
        channel
    }
}

impl MessageSurface for MemoryHost {
    fn notify(&self, severity: Severity, message: &str) {
        self.notifications
            .borrow_mut()
            .push((severity, message.to_string()));
    }

    fn pick_one(&self, placeholder: &str, items: &[String]) -> Option<String> {
        self.prompts.borrow_mut().push(RecordedPrompt {
            placeholder: placeholder.to_string(),
            items: items.to_vec(),
        });
        // An unscripted prompt behaves like the user pressing Escape.
        self.answers.borrow_mut().pop_front().flatten()
    }
}

impl EditorSurface for MemoryHost {
    fn active_document(&self) -> Option<DocumentSnapshot> {
        self.document.borrow().clone()
    }

    fn open_document(&self, path: &Path) -> Result<(), HostError> {
        self.opened.borrow_mut().push(path.to_path_buf());
        let name = path.to_string_lossy().into_owned();
        *self.document.borrow_mut() = Some(DocumentSnapshot::new(name, "plaintext", ""));
        Ok(())
    }
}

impl FileSearch for MemoryHost {
    fn find_files(&self, max_results: usize) -> Result<Vec<WorkspaceFile>, HostError> {
        let files = self.files.borrow();
        let Some(files) = files.as_ref() else {
            return Err(HostError::NoWorkspace);
        };
        Ok(files.iter().take(max_results).cloned().collect())
    }
}
