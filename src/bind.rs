//! Argument binding: residual tokens into typed values for one command.

use crate::error::BindError;
use crate::value::{self, ParamKind, Rejection, Value};

/// Bind `tokens` to `kinds` in declared order.
///
/// Surplus tokens are ignored. On failure no values are returned.
pub fn bind<S: AsRef<str>>(kinds: &[ParamKind], tokens: &[S]) -> Result<Vec<Value>, BindError> {
    if tokens.len() < kinds.len() {
        return Err(BindError::MissingArguments {
            expected: kinds.len(),
            got: tokens.len(),
        });
    }

    kinds
        .iter()
        .zip(tokens)
        .enumerate()
        .map(|(index, (kind, token))| convert_at(index, *kind, token.as_ref()))
        .collect()
}

fn convert_at(index: usize, kind: ParamKind, token: &str) -> Result<Value, BindError> {
    value::convert(kind, token).map_err(|rejection| match rejection {
        Rejection::Invalid => BindError::InvalidArgument {
            index,
            kind,
            token: token.to_string(),
        },
        Rejection::Overflow => BindError::IntegerOverflow {
            index,
            kind,
            token: token.to_string(),
        },
        Rejection::UnsignedOverflow => BindError::UnsignedOverflow {
            index,
            kind,
            token: token.to_string(),
        },
        Rejection::Unsupported => BindError::UnsupportedKind { index, kind },
    })
}
