//! CLI domain: argument parsing for the `nestcli` binary and its demo command set.

mod demo;
mod parse;

pub use demo::{help_listing, install, register_help};
pub use parse::Cli;
