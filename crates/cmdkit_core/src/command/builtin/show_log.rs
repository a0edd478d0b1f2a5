//! `demo.showLog`: reveals the extension output channel.

use crate::command::task::{ActionResult, Command, CommandContext};
use crate::service::{LogLevel, LOGGING};

pub const ID: &str = "demo.showLog";
pub const TITLE: &str = "Show Extension Log";

pub fn command() -> Command {
    Command::new(ID, TITLE, run)
}

fn run(ctx: &CommandContext<'_>) -> ActionResult {
    if let Some(logger) = ctx.service(LOGGING) {
        logger.show_output();
        logger.log("Log output opened by user", LogLevel::Debug);
    }
    Ok(())
}
