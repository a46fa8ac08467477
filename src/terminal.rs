//! Terminal front end backed by `rustyline`.
//!
//! The editor's helper holds a snapshot of the registry, refreshed before every
//! prompt, and answers tab completion through the completion engine.

use crate::completion;
use crate::config::ShellConfig;
use crate::error::DispatchError;
use crate::registry::Registry;
use crate::source::{Input, LineSource};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Context, Editor, Helper};
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Default)]
pub struct ShellHelper {
    registry: Registry,
}

impl ShellHelper {
    pub fn refresh(&mut self, registry: &Registry) {
        self.registry = registry.clone();
    }
}

impl Helper for ShellHelper {}

impl Highlighter for ShellHelper {}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Validator for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    /// Every candidate replaces the line up to the cursor; the editor keeps the tail.
    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let completion = completion::complete(&self.registry, line, pos);
        let pairs = completion
            .candidates
            .iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: format!("{}{}", completion.head, candidate),
            })
            .collect();
        Ok((0, pairs))
    }
}

/// Interactive line source with persistent history.
pub struct Terminal {
    editor: Editor<ShellHelper, DefaultHistory>,
    history_path: Option<PathBuf>,
}

impl Terminal {
    pub fn new(config: &ShellConfig) -> Result<Self, DispatchError> {
        let editor_config = rustyline::Config::builder()
            .max_history_size(config.history.size)?
            .auto_add_history(false)
            .completion_type(CompletionType::List)
            .build();
        let mut editor: Editor<ShellHelper, DefaultHistory> = Editor::with_config(editor_config)?;
        editor.set_helper(Some(ShellHelper::default()));

        let history_path = config.history.resolve_path();
        if let Some(path) = &history_path {
            // A missing file just means no history yet.
            if let Err(e) = editor.load_history(path) {
                debug!(path = %path.display(), error = %e, "history not loaded");
            }
        }

        Ok(Self {
            editor,
            history_path,
        })
    }

    /// Write history back to disk, creating its directory if needed.
    pub fn save_history(&mut self) -> Result<(), DispatchError> {
        let Some(path) = &self.history_path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.editor.save_history(path)?;
        debug!(path = %path.display(), "history saved");
        Ok(())
    }

    pub fn close(mut self) -> Result<(), DispatchError> {
        self.save_history()
    }
}

impl LineSource for Terminal {
    fn read_line(&mut self, prompt: &str, registry: &Registry) -> Result<Input, DispatchError> {
        if let Some(helper) = self.editor.helper_mut() {
            helper.refresh(registry);
        }
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Input::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Eof),
            Err(e) => Err(e.into()),
        }
    }

    fn add_history(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            warn!(error = %e, "failed to record history");
        }
    }
}
