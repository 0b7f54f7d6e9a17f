//! Command implementations for the CLI interface.
//!
//! Each handler drives the same `Session` contract the TUI uses and flushes
//! pending writes before returning, since the process exits right after.

use std::io;

use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::filter::FilterMode;
use crate::session::Session;
use crate::task::Task;
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI (default).
    Ui,

    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
    },

    /// List tasks.
    List {
        /// Which tasks to show.
        #[arg(long, value_enum, default_value_t = FilterMode::All)]
        filter: FilterMode,
    },

    /// Toggle a task between pending and completed.
    Toggle {
        /// Task ID.
        id: String,
    },

    /// Delete a task.
    Delete {
        /// Task ID.
        id: String,
    },

    /// Toggle dark mode and print the new setting.
    DarkMode,

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Run the interactive UI.
pub fn cmd_ui(session: &mut Session) {
    let result = run_tui(session);
    if let Err(e) = finish_ui(session, result) {
        eprintln!("Error running TUI: {}", e);
        std::process::exit(1);
    }
}

/// Drain queued writes whether or not the UI exited cleanly.
fn finish_ui(session: &Session, result: io::Result<()>) -> io::Result<()> {
    session.flush();
    result
}

/// Add a task from the command line.
pub fn cmd_add(session: &mut Session, title: String) {
    match session.add_task(&title) {
        Some(id) => {
            session.flush();
            println!("Added task {}", id);
        }
        None => {
            eprintln!("Title is required.");
            std::process::exit(1);
        }
    }
}

/// Print the tasks matching `filter`.
pub fn cmd_list(session: &mut Session, filter: FilterMode) {
    session.set_filter(filter);
    let visible = session.visible_tasks();
    if visible.is_empty() {
        println!("No {} tasks.", filter.label().to_lowercase());
        return;
    }
    print_table(&visible);
    let c = session.counts();
    println!();
    println!("{} total, {} pending, {} completed", c.total, c.pending, c.completed);
}

/// Toggle the completion flag of a task.
pub fn cmd_toggle(session: &mut Session, id: String) {
    let Some(completed) = session.toggle_task(&id) else {
        eprintln!("Task {} not found.", id);
        std::process::exit(1);
    };
    session.flush();
    if completed {
        println!("Completed {}", id);
    } else {
        println!("Reopened {}", id);
    }
}

/// Delete a task.
pub fn cmd_delete(session: &mut Session, id: String) {
    let Some(task) = session.delete_task(&id) else {
        eprintln!("Task {} not found.", id);
        std::process::exit(1);
    };
    session.flush();
    println!("Deleted {} - {}", task.id, task.title);
}

/// Flip dark mode.
pub fn cmd_dark_mode(session: &mut Session) {
    let dark = session.toggle_dark_mode();
    session.flush();
    println!("Dark mode {}", if dark { "on" } else { "off" });
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task]) {
    println!("{}", format_header());
    for t in tasks {
        println!("{}", format_row(t));
    }
}

fn format_header() -> String {
    format!("{:<15} {:<4} {}", "ID", "Done", "Title")
}

fn format_row(task: &Task) -> String {
    let done = if task.completed { "[x]" } else { "[ ]" };
    format!("{:<15} {:<4} {}", task.id, done, truncate(&task.title, 60))
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::storage::{KeyValueStore, MemoryStore, TASKS_KEY};

    #[test]
    fn test_failed_ui_still_flushes_writes() {
        let backend = Arc::new(MemoryStore::new());
        let mut session = Session::open(backend.clone());
        session.add_task("Buy milk");

        let result = finish_ui(&session, Err(io::Error::new(io::ErrorKind::Other, "tty lost")));
        assert!(result.is_err());

        let stored = backend.get(TASKS_KEY).unwrap().expect("tasks written");
        assert!(stored.contains("Buy milk"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("this is too long", 8), "this is…");
        assert_eq!(truncate("ééééé", 3), "éé…");
    }

    #[test]
    fn test_format_row_marks_completion() {
        let mut task = Task::new("1700000000000".into(), "Buy milk");
        assert_eq!(format_row(&task), "1700000000000   [ ]  Buy milk");
        task.completed = true;
        assert!(format_row(&task).contains("[x]"));
    }
}
