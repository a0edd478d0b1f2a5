//! Access to the active document and workspace files.

use crate::extension::registry::Service;
use crate::host::{DocumentSnapshot, EditorSurface, FileSearch, HostError, WorkspaceFile};
use std::path::Path;
use std::rc::Rc;

/// Upper bound on files returned by one workspace search.
pub const MAX_WORKSPACE_FILES: usize = 1000;

/// Read-mostly view of the editor the extension runs in.
pub struct WorkspaceService {
    editor: Rc<dyn EditorSurface>,
    files: Rc<dyn FileSearch>,
}

impl WorkspaceService {
    pub fn new(editor: Rc<dyn EditorSurface>, files: Rc<dyn FileSearch>) -> Self {
        Self { editor, files }
    }

    pub fn active_document(&self) -> Option<DocumentSnapshot> {
        self.editor.active_document()
    }

    pub fn open_document(&self, path: &Path) -> Result<(), HostError> {
        self.editor.open_document(path)
    }

    /// Workspace files sorted by relative path, case-insensitively first.
    pub fn find_files_sorted(&self) -> Result<Vec<WorkspaceFile>, HostError> {
        let mut files = self.files.find_files(MAX_WORKSPACE_FILES)?;
        files.sort_by(|left, right| {
            left.relative_path
                .to_lowercase()
                .cmp(&right.relative_path.to_lowercase())
                .then_with(|| left.relative_path.cmp(&right.relative_path))
        });
        Ok(files)
    }
}

impl Service for WorkspaceService {}
