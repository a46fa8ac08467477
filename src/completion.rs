//! Completion engine: candidates for the word under the cursor.
//!
//! Only the statement being typed (text after the last `;`) is considered. If its
//! words name a command, that command's completer is asked for sub-words;
//! otherwise the first word is matched against every registered name.

use crate::lexer;
use crate::registry::Registry;
use crate::resolve;

/// Result of a completion request.
///
/// The completed line is `head + candidate + tail`. `head` is the retained text
/// before the replacement point; `tail` is everything after the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Completion {
    pub head: String,
    pub candidates: Vec<String>,
    pub tail: String,
}

impl Completion {
    /// Completed lines, one per candidate.
    pub fn lines(&self) -> Vec<String> {
        self.candidates
            .iter()
            .map(|c| format!("{}{}{}", self.head, c, self.tail))
            .collect()
    }
}

pub fn complete(registry: &Registry, line: &str, cursor: usize) -> Completion {
    let cursor = floor_char_boundary(line, cursor);
    let (prefix, tail) = line.split_at(cursor);

    let tokens = match lexer::lex(prefix) {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::trace!(error = %e, "no completions for malformed input");
            return Completion {
                head: prefix.to_string(),
                candidates: Vec::new(),
                tail: tail.to_string(),
            };
        }
    };

    let statement_start = tokens
        .iter()
        .rposition(|t| t.separators > 0)
        .map(|i| i + 1)
        .unwrap_or(0);
    let statement = &tokens[statement_start..];
    let lead = match statement.first() {
        Some(token) => &prefix[..token.start],
        None => prefix,
    };
    let words: Vec<String> = statement.iter().map(|t| lexer::unquote(&t.text)).collect();

    if let Some(found) = resolve::resolve(registry, &words) {
        let search = match words.len() - found.consumed {
            0 => "",
            1 => words[words.len() - 1].as_str(),
            // Completers only see the first word after the name.
            _ => {
                return Completion {
                    head: prefix.to_string(),
                    candidates: Vec::new(),
                    tail: tail.to_string(),
                }
            }
        };
        return Completion {
            head: format!("{}{} ", lead, found.command.name()),
            candidates: found.command.complete(search),
            tail: tail.to_string(),
        };
    }

    let first = words.first().map(String::as_str).unwrap_or("");
    Completion {
        head: lead.to_string(),
        candidates: registry
            .names_with_prefix(first)
            .into_iter()
            .map(str::to_string)
            .collect(),
        tail: tail.to_string(),
    }
}

fn floor_char_boundary(line: &str, index: usize) -> usize {
    let mut index = index.min(line.len());
    while !line.is_char_boundary(index) {
        index -= 1;
    }
    index
}
