//! `demo.openFile`: picks a workspace file and opens it.

use crate::command::task::{ActionResult, Command, CommandContext};
use crate::service::{LogLevel, LOGGING, MESSAGE, WORKSPACE};

pub const ID: &str = "demo.openFile";
pub const TITLE: &str = "Open Workspace File";

pub fn command() -> Command {
    Command::new(ID, TITLE, run)
}

fn run(ctx: &CommandContext<'_>) -> ActionResult {
    let (Some(workspace), Some(messages)) = (ctx.service(WORKSPACE), ctx.service(MESSAGE)) else {
        return Ok(());
    };

    let files = workspace.find_files_sorted()?;
    if files.is_empty() {
        messages.show_warning("No files found in workspace");
        return Ok(());
    }

    let labels: Vec<&str> = files.iter().map(|file| file.relative_path.as_str()).collect();
    let Some(picked) = messages.ask_user("Select a file to open", &labels) else {
        return Ok(());
    };
    let Some(file) = files.iter().find(|file| file.relative_path == picked) else {
        return Ok(());
    };

    workspace.open_document(&file.path)?;
    if let Some(logger) = ctx.service(LOGGING) {
        logger.log(&format!("Opened {}", file.relative_path), LogLevel::Info);
    }
    Ok(())
}
