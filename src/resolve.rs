//! Longest-prefix command resolution.
//!
//! `mode` and `mode advanced` can both be registered: `mode advanced 3` resolves
//! to the longer name with `["3"]` left over, `mode 3` to the shorter one.

use crate::command::Command;
use crate::registry::Registry;

/// A matched command and the tokens left for its arguments.
#[derive(Debug)]
pub struct Resolution<'r, 't, S> {
    pub command: &'r Command,
    /// Number of leading tokens that form the command name.
    pub consumed: usize,
    pub args: &'t [S],
}

/// Find the longest registered name that prefixes `tokens`.
pub fn resolve<'r, 't, S: AsRef<str>>(
    registry: &'r Registry,
    tokens: &'t [S],
) -> Option<Resolution<'r, 't, S>> {
    (1..=tokens.len()).rev().find_map(|len| {
        let name = join(&tokens[..len]);
        tracing::trace!(candidate = %name, "resolving command");
        registry.get(&name).map(|command| Resolution {
            command,
            consumed: len,
            args: &tokens[len..],
        })
    })
}

fn join<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}
