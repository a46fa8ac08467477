//! Error types for the nestcli dispatch core.

use crate::value::ParamKind;
use thiserror::Error;

/// Argument binding failures, offered to a command's error handler before
/// they abort an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("Missing arguments: expected {expected}, got {got}")]
    MissingArguments { expected: usize, got: usize },

    #[error("Invalid argument {index}: {token:?} is not a valid {kind}")]
    InvalidArgument {
        index: usize,
        kind: ParamKind,
        token: String,
    },

    #[error("Value too big for argument {index}: {token:?} overflows {kind}")]
    IntegerOverflow {
        index: usize,
        kind: ParamKind,
        token: String,
    },

    #[error("Value too big for argument {index}: {token:?} overflows {kind}")]
    UnsignedOverflow {
        index: usize,
        kind: ParamKind,
        token: String,
    },

    #[error("Unsupported kind for argument {index}: {kind}")]
    UnsupportedKind { index: usize, kind: ParamKind },
}

impl BindError {
    /// Index of the offending argument, if the failure is tied to one.
    pub fn index(&self) -> Option<usize> {
        match self {
            BindError::MissingArguments { .. } => None,
            BindError::InvalidArgument { index, .. }
            | BindError::IntegerOverflow { index, .. }
            | BindError::UnsignedOverflow { index, .. }
            | BindError::UnsupportedKind { index, .. } => Some(*index),
        }
    }

    /// Unsupported kinds are registration mistakes rather than bad input.
    pub fn is_programmer_error(&self) -> bool {
        matches!(self, BindError::UnsupportedKind { .. })
    }
}

/// Errors surfaced by the shell session.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Cannot parse line: {0}")]
    Syntax(String),

    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("{command}: {source}")]
    Bind {
        command: String,
        #[source]
        source: BindError,
    },

    #[error("{command}: {source}")]
    Command {
        command: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Misconfigured command: {0}")]
    Misconfigured(String),

    #[error("Prompt aborted")]
    PromptAborted,

    #[error("Line editor error: {0}")]
    Readline(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for DispatchError {
    fn from(err: config::ConfigError) -> Self {
        DispatchError::Config(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for DispatchError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        match err {
            rustyline::error::ReadlineError::Io(e) => DispatchError::Io(e),
            other => DispatchError::Readline(other.to_string()),
        }
    }
}
