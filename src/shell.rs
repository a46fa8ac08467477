//! Shell session: registry, handlers, output, and the prompt loop.

use crate::command::{Command, ErrorHandler};
use crate::completion::{self, Completion};
use crate::config::ShellConfig;
use crate::error::{BindError, DispatchError};
use crate::lexer;
use crate::output::Printer;
use crate::registry::Registry;
use crate::resolve;
use crate::source::{Input, LineSource};
use crate::split;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_PROMPT: &str = "nestcli > ";

/// Handles input whose first word names no command.
pub type NotFoundHandler = Arc<dyn Fn(&str) -> Result<(), DispatchError> + Send + Sync>;

/// Ends the prompt loop after the current statement.
#[derive(Debug, Clone, Default)]
pub struct QuitHandle {
    requested: Arc<AtomicBool>,
}

impl QuitHandle {
    pub fn quit(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.requested.store(false, Ordering::SeqCst);
    }
}

pub struct Shell {
    registry: Registry,
    not_found: Option<NotFoundHandler>,
    error_handler: Option<ErrorHandler>,
    printer: Printer,
    prompt: String,
    banner: String,
    ctrl_c_aborts: bool,
    quit: QuitHandle,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    pub fn new() -> Self {
        Self::with_printer(Printer::stdout())
    }

    pub fn with_printer(printer: Printer) -> Self {
        Self {
            registry: Registry::new(),
            not_found: None,
            error_handler: None,
            printer,
            prompt: DEFAULT_PROMPT.to_string(),
            banner: String::new(),
            ctrl_c_aborts: false,
            quit: QuitHandle::default(),
        }
    }

    pub fn from_config(config: &ShellConfig, printer: Printer) -> Self {
        let mut shell = Self::with_printer(printer);
        shell.prompt = config.prompt.clone();
        shell.banner = config.banner.clone();
        shell.ctrl_c_aborts = config.ctrl_c_aborts;
        shell
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_banner(&mut self, banner: impl Into<String>) {
        self.banner = banner.into();
    }

    pub fn set_ctrl_c_aborts(&mut self, aborts: bool) {
        self.ctrl_c_aborts = aborts;
    }

    /// Without a handler, unknown commands are ignored.
    pub fn set_not_found_handler<F>(&mut self, handler: F)
    where
        F: Fn(&str) -> Result<(), DispatchError> + Send + Sync + 'static,
    {
        self.not_found = Some(Arc::new(handler));
    }

    /// Binding-failure handler for commands that have none of their own.
    pub fn set_error_handler<F>(&mut self, handler: F)
    where
        F: Fn(&Command, &[String], &BindError) -> Result<(), DispatchError> + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
    }

    /// Handle to the shared output; clone it into operations that print.
    pub fn printer(&self) -> Printer {
        self.printer.clone()
    }

    pub fn quit_handle(&self) -> QuitHandle {
        self.quit.clone()
    }

    pub fn register(&mut self, command: Command) -> Option<Command> {
        self.registry.register(command)
    }

    pub fn register_all<I: IntoIterator<Item = Command>>(&mut self, commands: I) {
        self.registry.extend(commands);
    }

    pub fn remove(&mut self, name: &str) -> Option<Command> {
        self.registry.remove(name)
    }

    pub fn commands(&self) -> &Registry {
        &self.registry
    }

    /// Split, resolve, bind, and run every statement of `line`, left to right.
    ///
    /// The first error stops the remaining statements and is returned.
    pub fn dispatch(&self, line: &str) -> Result<(), DispatchError> {
        let statements = split::split(line)?;
        for statement in &statements {
            if self.quit.is_requested() {
                debug!("quit requested, skipping remaining statements");
                break;
            }
            self.dispatch_statement(statement)?;
        }
        Ok(())
    }

    fn dispatch_statement(&self, statement: &str) -> Result<(), DispatchError> {
        let tokens =
            lexer::words(statement).map_err(|e| DispatchError::Syntax(e.to_string()))?;
        if tokens.is_empty() {
            return Ok(());
        }

        match resolve::resolve(&self.registry, &tokens) {
            Some(found) => {
                debug!(
                    command = %found.command.name(),
                    args = found.args.len(),
                    "dispatching"
                );
                found
                    .command
                    .execute(found.args, self.error_handler.as_ref())
            }
            None => {
                debug!(name = %tokens[0], "command not found");
                match &self.not_found {
                    Some(handler) => handler(&tokens[0]),
                    None => Ok(()),
                }
            }
        }
    }

    pub fn completions_for(&self, line: &str, cursor: usize) -> Completion {
        completion::complete(&self.registry, line, cursor)
    }

    /// Read and dispatch lines until end of input, a quit request, or an error.
    pub fn run<S: LineSource>(&self, source: &mut S) -> Result<(), DispatchError> {
        if !self.banner.is_empty() {
            self.printer.print(&self.banner)?;
        }
        info!("prompt loop starting");

        while !self.quit.is_requested() {
            match source.read_line(&self.prompt, &self.registry)? {
                Input::Line(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    source.add_history(&line);
                    self.dispatch(&line)?;
                }
                Input::Interrupted if self.ctrl_c_aborts => {
                    info!("prompt aborted");
                    return Err(DispatchError::PromptAborted);
                }
                Input::Interrupted => continue,
                Input::Eof => break,
            }
        }

        info!("prompt loop finished");
        Ok(())
    }

    /// Dispatch `input` first, then enter the prompt loop.
    pub fn run_with_input<S: LineSource>(
        &self,
        input: &str,
        source: &mut S,
    ) -> Result<(), DispatchError> {
        self.dispatch(input)?;
        self.run(source)
    }
}
