//! `demo.helloWorld`: greets the user with the invocation number.

use crate::command::task::{ActionResult, Command, CommandContext};
use crate::service::MESSAGE;

pub const ID: &str = "demo.helloWorld";
pub const TITLE: &str = "Hello World";

pub fn command() -> Command {
    Command::new(ID, TITLE, run)
}

fn run(ctx: &CommandContext<'_>) -> ActionResult {
    if let Some(messages) = ctx.service(MESSAGE) {
        messages.show_info(&format!(
            "Hello World from OOP Extension! (Execution #{})",
            ctx.execution()
        ));
    }
    Ok(())
}
