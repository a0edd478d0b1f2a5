//! Terminal host for the demo extension.
//!
//! # Responsibility
//! - Activate the extension against stdin/stdout and the local file system.
//! - Trigger the requested command ids in order, then deactivate.

mod terminal;

use clap::Parser;
use cmdkit_core::host::{CommandHost, ConfigStore};
use cmdkit_core::{activate, deactivate, init_logging, SqliteSettingsStore};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use terminal::TerminalHost;

#[derive(Debug, Parser)]
#[command(name = "cmdkit", version, about = "Run demo extension commands from a terminal")]
struct Args {
    /// SQLite settings file; settings live in memory when omitted.
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Directory for the rolling process log.
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Process log level: trace|debug|info|warn|error.
    #[arg(long, default_value_t = cmdkit_core::default_log_level().to_string())]
    log_level: String,

    /// Print the bound command ids and exit.
    #[arg(long)]
    list: bool,

    /// File loaded as the active document.
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Root folder for workspace file search.
    #[arg(long, value_name = "DIR")]
    workspace: Option<PathBuf>,

    /// Command ids to run, in order.
    #[arg(value_name = "COMMAND")]
    commands: Vec<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("cmdkit: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    if let Some(log_dir) = &args.log_dir {
        init_logging(&args.log_level, log_dir).map_err(|err| err.to_string())?;
    }

    let config: Rc<dyn ConfigStore> = match &args.settings {
        Some(path) => Rc::new(SqliteSettingsStore::open(path).map_err(|err| err.to_string())?),
        None => Rc::new(SqliteSettingsStore::open_in_memory().map_err(|err| err.to_string())?),
    };

    let terminal = TerminalHost::new(args.workspace.clone());
    if let Some(file) = &args.file {
        terminal
            .load_document(file)
            .map_err(|err| format!("cannot open `{}`: {err}", file.display()))?;
    }

    let manager = activate(terminal.host(config)).map_err(|err| err.to_string())?;
    info!(
        "event=cli_start module=cli status=ok session={} commands={}",
        manager.session_id(),
        args.commands.len()
    );

    if args.list {
        for id in manager.registered_commands() {
            let title = manager
                .command(&id)
                .map(|command| command.title().to_string())
                .unwrap_or_default();
            println!("{id}\t{title}");
        }
    }

    let mut failure = None;
    for id in &args.commands {
        if let Err(err) = terminal.dispatch().execute_command(id) {
            error!("event=cli_execute module=cli status=error command_id={id} error={err}");
            failure = Some(err.to_string());
            break;
        }
    }

    deactivate(&manager);
    match failure {
        Some(message) => Err(message),
        None => Ok(()),
    }
}
