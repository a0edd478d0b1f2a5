//! `demo.fileInfo`: summarizes the active document.

use crate::command::task::{ActionResult, Command, CommandContext};
use crate::host::DocumentSnapshot;
use crate::service::{LogLevel, LOGGING, MESSAGE, WORKSPACE};
use crate::text::{count_words, display_file_name};

pub const ID: &str = "demo.fileInfo";
pub const TITLE: &str = "Show File Information";

/// Summary statistics for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub file_name: String,
    pub language: String,
    pub line_count: usize,
    pub word_count: usize,
    pub character_count: usize,
    pub size_kb: u64,
    pub is_dirty: bool,
}

impl FileInfo {
    pub fn analyze(document: &DocumentSnapshot) -> Self {
        let text = document.text.as_str();
        Self {
            file_name: display_file_name(&document.file_name).to_string(),
            language: document.language_id.clone(),
            line_count: document.line_count,
            word_count: count_words(text),
            character_count: text.chars().count(),
            size_kb: (text.len() as f64 / 1024.0).round() as u64,
            is_dirty: document.is_dirty,
        }
    }

    pub fn summary(&self) -> String {
        let status = if self.is_dirty { " (UNSAVED)" } else { "" };
        format!(
            "{} ({}): {} lines, {} words, {} chars, {} KB{}",
            self.file_name,
            self.language,
            self.line_count,
            self.word_count,
            self.character_count,
            self.size_kb,
            status
        )
    }
}

pub fn command() -> Command {
    Command::new(ID, TITLE, run)
}

fn run(ctx: &CommandContext<'_>) -> ActionResult {
    let messages = ctx.service(MESSAGE);
    let document = ctx
        .service(WORKSPACE)
        .and_then(|workspace| workspace.active_document());
    let Some(document) = document else {
        if let Some(messages) = messages {
            messages.show_warning("No active editor found");
        }
        return Ok(());
    };

    let info = FileInfo::analyze(&document);
    if let Some(logger) = ctx.service(LOGGING) {
        logger.log(
            &format!("File analysis completed for {}", info.file_name),
            LogLevel::Info,
        );
    }
    if let Some(messages) = messages {
        messages.show_info(&info.summary());
    }
    Ok(())
}
