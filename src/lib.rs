//! Nestcli: Nested Command Shells
//!
//! Builds interactive command shells out of plain Rust functions. Command names
//! may span several words (`mode`, `mode advanced`), arguments are converted to
//! the operation's parameter types, and one line may hold several statements
//! separated by `;`.

pub mod bind;
pub mod cli;
pub mod command;
pub mod completion;
pub mod config;
pub mod error;
pub mod lexer;
pub mod logging;
pub mod output;
pub mod registry;
pub mod resolve;
pub mod shell;
pub mod source;
pub mod split;
pub mod terminal;
pub mod value;

pub use command::Command;
pub use completion::Completion;
pub use error::{BindError, DispatchError};
pub use output::Printer;
pub use registry::Registry;
pub use shell::{QuitHandle, Shell};
pub use value::{ParamKind, Value};
