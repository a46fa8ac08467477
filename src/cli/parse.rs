//! CLI parse: clap types for nestcli. No behavior; definitions only.

use clap::Parser;
use std::path::PathBuf;

/// Nestcli - interactive shell for nested commands
#[derive(Parser, Debug)]
#[command(name = "nestcli")]
#[command(about = "Interactive shell for nested, typed commands")]
pub struct Cli {
    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Prompt shown before each line
    #[arg(long)]
    pub prompt: Option<String>,

    /// History file path
    #[arg(long)]
    pub history_file: Option<PathBuf>,

    /// Do not load or save history
    #[arg(long)]
    pub no_history: bool,

    /// End the session when Ctrl-C is pressed at the prompt
    #[arg(long)]
    pub ctrl_c_aborts: bool,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stderr, stdout, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Line to dispatch before the prompt appears
    #[arg(short = 'c', long = "command")]
    pub command: Option<String>,

    /// Dispatch --command and exit without prompting
    #[arg(long, requires = "command")]
    pub batch: bool,
}
