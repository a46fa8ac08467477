//! Inline command splitting: one raw line into `;`-separated statements.
//!
//! Statements are the raw token texts rejoined with single spaces, so quoting
//! survives until each statement is tokenized for dispatch. A token that ends in
//! an escaped separator keeps the backslash in the statement text.

use crate::error::DispatchError;
use crate::lexer;

pub fn split(line: &str) -> Result<Vec<String>, DispatchError> {
    let tokens = lexer::lex(line).map_err(|e| DispatchError::Syntax(e.to_string()))?;

    let mut statements = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for token in tokens {
        match token.separators {
            0 => current.push(token.text),
            1 => {
                if !token.text.is_empty() {
                    current.push(token.text);
                }
                if !current.is_empty() {
                    statements.push(current.join(" "));
                }
                current.clear();
            }
            _ => {
                return Err(DispatchError::Syntax(format!(
                    "empty statement between separators at byte {}",
                    token.end - token.separators + 1
                )))
            }
        }
    }

    if !current.is_empty() {
        statements.push(current.join(" "));
    }

    Ok(statements)
}
