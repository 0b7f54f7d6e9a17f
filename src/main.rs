//! # tasklist - a single-user terminal task list
//!
//! Create, complete, delete and filter short text tasks from an interactive
//! TUI or from one-shot CLI commands. Tasks and the dark mode preference are
//! kept in memory and written through to a local key-value store after every
//! change.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the interactive UI
//! tasklist
//!
//! # Add and list tasks from the shell
//! tasklist add "Buy milk"
//! tasklist list --filter pending
//! ```
//!
//! Data is stored in `~/.tasklist/` as `tasks.json` and `darkMode.json`, with
//! log files under `~/.tasklist/logs/`.

use std::sync::Arc;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod filter;
pub mod logging;
pub mod preferences;
pub mod session;
pub mod storage;
pub mod task;
pub mod task_store;
pub mod writer;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use session::Session;
use storage::FileStore;

fn main() {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        cmd_completions(*shell);
        return;
    }

    let data_dir = cli.resolve_data_dir();
    let store = match FileStore::open(&data_dir) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to create data directory {}: {}", data_dir.display(), e);
            std::process::exit(1);
        }
    };

    // Logging problems are reported but never stop the app.
    if let Err(e) = logging::init_logging(&cli.log_level, &data_dir.join("logs")) {
        eprintln!("Logging disabled: {e}");
    }

    let mut session = Session::open(Arc::new(store));

    match cli.command.unwrap_or(Commands::Ui) {
        Commands::Ui => cmd_ui(&mut session),
        Commands::Add { title } => cmd_add(&mut session, title),
        Commands::List { filter } => cmd_list(&mut session, filter),
        Commands::Toggle { id } => cmd_toggle(&mut session, id),
        Commands::Delete { id } => cmd_delete(&mut session, id),
        Commands::DarkMode => cmd_dark_mode(&mut session),
        Commands::Completions { .. } => unreachable!("completions handled above"),
    }
}
