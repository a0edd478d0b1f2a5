//! Command model and the built-in command set.

pub mod builtin;
pub mod task;

pub use builtin::builtin_commands;
pub use task::{ActionResult, Command, CommandContext, CommandError};
