use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Simple, file-backed task list.
/// Data lives in ~/.tasklist or the directory passed via --data-dir.
#[derive(Parser)]
#[command(name = "tasklist", version, about = "Single-user task list")]
pub struct Cli {
    /// Directory holding tasks.json, darkMode.json and logs/.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level: error | warn | info | debug | trace.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Resolve the data directory, defaulting to `$HOME/.tasklist`.
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".tasklist")
        })
    }
}
