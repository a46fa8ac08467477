//! Demo command set registered by the `nestcli` binary.

use crate::command::Command;
use crate::error::{BindError, DispatchError};
use crate::output::Printer;
use crate::registry::Registry;
use crate::shell::Shell;
use owo_colors::OwoColorize;
use std::thread;
use std::time::Duration;
use tracing::warn;

const MODES: [&str; 1] = ["advanced"];

/// Register the demo commands and handlers on `shell`.
pub fn install(shell: &mut Shell) {
    let printer = shell.printer();
    let quit = shell.quit_handle();

    let out = printer.clone();
    shell.register(
        Command::new("echo", move |text: String| out.println(text)).about("print a word"),
    );

    let out = printer.clone();
    shell.register(
        Command::new("add", move |a: i64, b: i64| -> anyhow::Result<()> {
            let sum = a
                .checked_add(b)
                .ok_or_else(|| anyhow::anyhow!("{} + {} overflows", a, b))?;
            out.println(sum)?;
            Ok(())
        })
        .about("add two integers"),
    );

    let out = printer.clone();
    shell.register(
        Command::new("mode", move || out.println("mode: basic"))
            .completer(|search| {
                MODES
                    .iter()
                    .filter(|m| m.starts_with(search))
                    .map(|m| m.to_string())
                    .collect()
            })
            .about("show the current mode"),
    );

    let out = printer.clone();
    let usage = printer.clone();
    shell.register(
        Command::new("mode advanced", move |level: u8| {
            out.println(format!("mode: advanced (level {})", level))
        })
        .error_handler(move |_, _, err| {
            usage.println(format!("usage: mode advanced <level 0-255> ({})", err))?;
            Ok(())
        })
        .about("switch to advanced mode"),
    );

    let out = printer.clone();
    shell.register(
        Command::new("sleep", move |millis: u64| {
            let out = out.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(millis));
                if let Err(e) = out.println(format!("slept {} ms", millis)) {
                    warn!(error = %e, "background print failed");
                }
            });
        })
        .about("print a line from a background thread after a delay"),
    );

    shell.register(Command::new("quit", move || quit.quit()).about("leave the shell"));

    register_help(shell);

    let out = printer.clone();
    shell.set_not_found_handler(move |name| {
        out.println(format!("unknown command: {}", name))?;
        Ok(())
    });

    let out = printer;
    shell.set_error_handler(move |command, _, err| report(&out, command, err));
}

/// (Re)register `help` with a listing of the commands registered right now.
///
/// The listing is a snapshot: call this again after registering more commands.
pub fn register_help(shell: &mut Shell) {
    let listing = help_listing(shell.commands());
    let out = shell.printer();
    shell.register(Command::new("help", move || out.print(&listing)).about("list commands"));
}

/// One line per command, `help` included, sorted by name.
pub fn help_listing(registry: &Registry) -> String {
    let mut entries: Vec<(&str, &str)> = registry
        .iter()
        .filter(|c| c.name() != "help")
        .map(|c| (c.name(), c.description().unwrap_or("")))
        .collect();
    entries.push(("help", "list commands"));
    entries.sort();

    let width = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    entries
        .iter()
        .map(|(name, about)| format!("  {:<width$}  {}\n", name, about, width = width))
        .collect()
}

fn report(printer: &Printer, command: &Command, err: &BindError) -> Result<(), DispatchError> {
    printer.println(format!("{} {}: {}", "error:".red().bold(), command.name(), err))?;
    Ok(())
}
