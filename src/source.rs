//! Input sources for the prompt loop.

use crate::error::DispatchError;
use crate::registry::Registry;
use std::collections::VecDeque;

/// One read from a line source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// The user pressed Ctrl-C at the prompt.
    Interrupted,
    /// End of input.
    Eof,
}

/// Supplies raw lines to the prompt loop and records accepted ones.
pub trait LineSource {
    /// Read one line. `registry` is the current command set, for sources that
    /// offer tab completion.
    fn read_line(&mut self, prompt: &str, registry: &Registry) -> Result<Input, DispatchError>;

    /// Append an accepted line to history.
    fn add_history(&mut self, line: &str);
}

/// A fixed sequence of inputs; yields `Eof` once exhausted.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    inputs: VecDeque<Input>,
    history: Vec<String>,
    prompts: usize,
}

impl ScriptedSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_inputs(lines.into_iter().map(|l| Input::Line(l.into())))
    }

    pub fn from_inputs<I: IntoIterator<Item = Input>>(inputs: I) -> Self {
        Self {
            inputs: inputs.into_iter().collect(),
            history: Vec::new(),
            prompts: 0,
        }
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Number of times a line was requested.
    pub fn prompts(&self) -> usize {
        self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }
}

impl LineSource for ScriptedSource {
    fn read_line(&mut self, _prompt: &str, _registry: &Registry) -> Result<Input, DispatchError> {
        self.prompts += 1;
        Ok(self.inputs.pop_front().unwrap_or(Input::Eof))
    }

    fn add_history(&mut self, line: &str) {
        self.history.push(line.to_string());
    }
}
