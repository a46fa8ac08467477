//! Quote-preserving lexer for raw input lines.
//!
//! Tokens keep their quote characters and backslashes so a statement can be
//! re-tokenized later with POSIX rules. An unquoted, unescaped `;` ends the token
//! it trails; a run of them is counted rather than stored in the text.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated {0} quote starting at byte {1}")]
    UnterminatedQuote(char, usize),

    #[error("dangling escape at end of input")]
    DanglingEscape,
}

/// One whitespace-delimited token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token text with quotes and escapes intact, trailing separators removed.
    pub text: String,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset just past the last character, separators included.
    pub end: usize,
    /// Number of unescaped `;` characters that closed the token.
    pub separators: usize,
}

pub const SEPARATOR: char = ';';

pub fn lex(line: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut text = String::new();
        let mut end = start;
        let mut separators = 0;

        while let Some(&(idx, c)) = chars.peek() {
            if c.is_whitespace() {
                break;
            }
            chars.next();
            end = idx + c.len_utf8();

            match c {
                SEPARATOR => {
                    separators = 1;
                    while let Some(&(idx, SEPARATOR)) = chars.peek() {
                        chars.next();
                        end = idx + 1;
                        separators += 1;
                    }
                    break;
                }
                '\\' => {
                    let (idx, escaped) = chars.next().ok_or(LexError::DanglingEscape)?;
                    text.push('\\');
                    text.push(escaped);
                    end = idx + escaped.len_utf8();
                }
                '\'' | '"' => {
                    text.push(c);
                    end = quoted(&mut chars, &mut text, c, idx)?;
                }
                _ => text.push(c),
            }
        }

        tokens.push(Token {
            text,
            start,
            end,
            separators,
        });
    }

    Ok(tokens)
}

/// Split a statement into the words a command receives.
///
/// Same token boundaries as [`lex`], with quotes and escapes resolved. `#` has
/// no special meaning.
pub fn words(statement: &str) -> Result<Vec<String>, LexError> {
    Ok(lex(statement)?
        .iter()
        .map(|token| unquote(&token.text))
        .collect())
}

/// Resolve the quoting of one token with POSIX rules.
///
/// Outside quotes a backslash takes the next character literally. Single quotes
/// are fully literal. Inside double quotes a backslash only escapes `"`, `\`,
/// `$`, `` ` `` and newline.
pub fn unquote(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        match (quote, c) {
            (None, '\'' | '"') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, '\\') => match chars.next() {
                Some('\n') | None => {}
                Some(next) => out.push(next),
            },
            (Some('"'), '\\') => match chars.next() {
                Some(next @ ('"' | '\\' | '$' | '`')) => out.push(next),
                Some('\n') => {}
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            (_, c) => out.push(c),
        }
    }

    out
}

/// Consume through the closing `quote`, returning the byte offset past it.
fn quoted(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    text: &mut String,
    quote: char,
    opened_at: usize,
) -> Result<usize, LexError> {
    while let Some((idx, c)) = chars.next() {
        text.push(c);
        if c == quote {
            return Ok(idx + 1);
        }
        if c == '\\' && quote == '"' {
            let (_, escaped) = chars
                .next()
                .ok_or(LexError::UnterminatedQuote(quote, opened_at))?;
            text.push(escaped);
        }
    }
    Err(LexError::UnterminatedQuote(quote, opened_at))
}
