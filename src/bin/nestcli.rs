//! Nestcli Binary
//!
//! Interactive shell over the demo command set.

use anyhow::Context;
use clap::Parser;
use nestcli::cli::{self as demo, Cli};
use nestcli::config::{ConfigLoader, ShellConfig};
use nestcli::logging::{init_logging, LoggingConfig};
use nestcli::terminal::Terminal;
use nestcli::{DispatchError, Printer, Shell};
use owo_colors::OwoColorize;
use std::process;
use tracing::{error, info, warn};

fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load(cli.config.as_deref()) {
        Ok(config) => build_shell_config(&cli, config),
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Initialize logging early
    let logging_config = build_logging_config(&cli, &config);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("nestcli starting");

    if let Err(e) = config.validate() {
        eprintln!("{}", e);
        process::exit(1);
    }

    if let Err(e) = run(&cli, &config) {
        if matches!(
            e.downcast_ref::<DispatchError>(),
            Some(DispatchError::PromptAborted)
        ) {
            info!("session aborted at prompt");
            process::exit(130);
        }
        error!("nestcli failed: {:#}", e);
        eprintln!("{:#}", e);
        process::exit(1);
    }

    info!("nestcli finished");
}

fn run(cli: &Cli, config: &ShellConfig) -> anyhow::Result<()> {
    let mut shell = Shell::from_config(config, Printer::stdout());
    demo::install(&mut shell);

    if cli.batch {
        let line = cli.command.as_deref().unwrap_or_default();
        return shell.dispatch(line).context("command failed");
    }

    let mut terminal = Terminal::new(config).context("failed to start terminal")?;
    let result = interact(&mut shell, &mut terminal, cli.command.as_deref());
    if let Err(e) = terminal.close() {
        warn!(error = %e, "failed to save history");
    }
    result.map_err(anyhow::Error::from)
}

/// Run the prompt loop, reporting command failures and resuming after them.
fn interact(
    shell: &mut Shell,
    terminal: &mut Terminal,
    initial: Option<&str>,
) -> Result<(), DispatchError> {
    let mut result = match initial {
        Some(line) => shell.run_with_input(line, terminal),
        None => shell.run(terminal),
    };
    loop {
        match result {
            Ok(()) => return Ok(()),
            Err(e) => {
                recover(&shell.printer(), e)?;
                // Banner belongs to the first pass only.
                shell.set_banner("");
                result = shell.run(terminal);
            }
        }
    }
}

fn recover(printer: &Printer, err: DispatchError) -> Result<(), DispatchError> {
    match err {
        DispatchError::PromptAborted
        | DispatchError::Misconfigured(_)
        | DispatchError::Readline(_)
        | DispatchError::Io(_)
        | DispatchError::Config(_) => Err(err),
        other => {
            warn!(error = %other, "command failed");
            printer.println(format!("{} {:#}", "error:".red().bold(), other))?;
            Ok(())
        }
    }
}

/// Apply CLI overrides to the loaded shell configuration.
fn build_shell_config(cli: &Cli, mut config: ShellConfig) -> ShellConfig {
    if let Some(ref prompt) = cli.prompt {
        config.prompt = prompt.clone();
    }
    if let Some(ref file) = cli.history_file {
        config.history.file = Some(file.clone());
    }
    if cli.no_history {
        config.history.enabled = false;
    }
    if cli.ctrl_c_aborts {
        config.ctrl_c_aborts = true;
    }
    config
}

/// Build logging configuration from CLI args and the loaded config.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli, shell_config: &ShellConfig) -> LoggingConfig {
    let mut config = shell_config.logging.clone();

    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }

    config
}
