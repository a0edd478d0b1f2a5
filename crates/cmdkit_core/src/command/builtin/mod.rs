//! Commands contributed by the demo extension.

pub mod file_info;
pub mod hello_world;
pub mod open_file;
pub mod show_log;

use crate::command::task::Command;

/// Built-in commands in registration order.
pub fn builtin_commands() -> Vec<Command> {
    vec![
        hello_world::command(),
        file_info::command(),
        show_log::command(),
        config_test::command(),
        open_file::command(),
    ]
}
