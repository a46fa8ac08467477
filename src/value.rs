//! Value conversion: one text token into one typed value.
//!
//! Integers are base-detected the way shell users expect: `0x` for hex, `0o` or a
//! leading `0` for octal, `0b` for binary, decimal otherwise. Parsed magnitudes are
//! range-checked against the declared width, so `"300"` for a `u8` parameter is an
//! overflow rather than a malformed token.

use std::fmt;

/// Static type tag of a declared command parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Bool,
    Str,
    /// A parameter type the binder has no conversion for, named for diagnostics.
    Other(&'static str),
}

impl ParamKind {
    pub fn name(&self) -> &'static str {
        match self {
            ParamKind::I8 => "i8",
            ParamKind::I16 => "i16",
            ParamKind::I32 => "i32",
            ParamKind::I64 => "i64",
            ParamKind::Isize => "isize",
            ParamKind::U8 => "u8",
            ParamKind::U16 => "u16",
            ParamKind::U32 => "u32",
            ParamKind::U64 => "u64",
            ParamKind::Usize => "usize",
            ParamKind::F32 => "f32",
            ParamKind::F64 => "f64",
            ParamKind::Bool => "bool",
            ParamKind::Str => "string",
            ParamKind::Other(name) => name,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, ParamKind::Other(_))
    }

    pub fn is_signed_integer(&self) -> bool {
        matches!(
            self,
            ParamKind::I8 | ParamKind::I16 | ParamKind::I32 | ParamKind::I64 | ParamKind::Isize
        )
    }

    pub fn is_unsigned_integer(&self) -> bool {
        matches!(
            self,
            ParamKind::U8 | ParamKind::U16 | ParamKind::U32 | ParamKind::U64 | ParamKind::Usize
        )
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A bound argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
    Bool(bool),
    Str(String),
}

impl Value {
    pub fn kind(&self) -> ParamKind {
        match self {
            Value::I8(_) => ParamKind::I8,
            Value::I16(_) => ParamKind::I16,
            Value::I32(_) => ParamKind::I32,
            Value::I64(_) => ParamKind::I64,
            Value::Isize(_) => ParamKind::Isize,
            Value::U8(_) => ParamKind::U8,
            Value::U16(_) => ParamKind::U16,
            Value::U32(_) => ParamKind::U32,
            Value::U64(_) => ParamKind::U64,
            Value::Usize(_) => ParamKind::Usize,
            Value::F32(_) => ParamKind::F32,
            Value::F64(_) => ParamKind::F64,
            Value::Bool(_) => ParamKind::Bool,
            Value::Str(_) => ParamKind::Str,
        }
    }
}

/// Canonical text form; binds back to the same value.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::I8(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::Isize(v) => write!(f, "{}", v),
            Value::U8(v) => write!(f, "{}", v),
            Value::U16(v) => write!(f, "{}", v),
            Value::U32(v) => write!(f, "{}", v),
            Value::U64(v) => write!(f, "{}", v),
            Value::Usize(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Str(v) => f.write_str(v),
        }
    }
}

/// Why a token could not become a value of the requested kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Invalid,
    Overflow,
    UnsignedOverflow,
    Unsupported,
}

/// Convert `token` into a value of `kind`.
pub fn convert(kind: ParamKind, token: &str) -> Result<Value, Rejection> {
    match kind {
        ParamKind::I8 => signed(token).and_then(|v| narrow(v, Value::I8, Rejection::Overflow)),
        ParamKind::I16 => signed(token).and_then(|v| narrow(v, Value::I16, Rejection::Overflow)),
        ParamKind::I32 => signed(token).and_then(|v| narrow(v, Value::I32, Rejection::Overflow)),
        ParamKind::I64 => signed(token).and_then(|v| narrow(v, Value::I64, Rejection::Overflow)),
        ParamKind::Isize => {
            signed(token).and_then(|v| narrow(v, Value::Isize, Rejection::Overflow))
        }
        ParamKind::U8 => {
            unsigned(token).and_then(|v| narrow(v, Value::U8, Rejection::UnsignedOverflow))
        }
        ParamKind::U16 => {
            unsigned(token).and_then(|v| narrow(v, Value::U16, Rejection::UnsignedOverflow))
        }
        ParamKind::U32 => {
            unsigned(token).and_then(|v| narrow(v, Value::U32, Rejection::UnsignedOverflow))
        }
        ParamKind::U64 => {
            unsigned(token).and_then(|v| narrow(v, Value::U64, Rejection::UnsignedOverflow))
        }
        ParamKind::Usize => {
            unsigned(token).and_then(|v| narrow(v, Value::Usize, Rejection::UnsignedOverflow))
        }
        ParamKind::F32 => float::<f32>(token).map(Value::F32),
        ParamKind::F64 => float::<f64>(token).map(Value::F64),
        ParamKind::Bool => boolean(token).map(Value::Bool),
        ParamKind::Str => Ok(Value::Str(token.to_string())),
        ParamKind::Other(_) => Err(Rejection::Unsupported),
    }
}

fn narrow<W, T, F>(wide: W, wrap: F, overflow: Rejection) -> Result<Value, Rejection>
where
    T: TryFrom<W>,
    F: FnOnce(T) -> Value,
{
    T::try_from(wide).map(wrap).map_err(|_| overflow)
}

fn signed(token: &str) -> Result<i128, Rejection> {
    let (negative, body) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let magnitude = magnitude(body, Rejection::Overflow)?;
    if negative {
        if magnitude > i128::MAX as u128 + 1 {
            return Err(Rejection::Overflow);
        }
        // 2^127 wraps to i128::MIN, which is exactly its negation.
        Ok((magnitude as i128).wrapping_neg())
    } else {
        i128::try_from(magnitude).map_err(|_| Rejection::Overflow)
    }
}

fn unsigned(token: &str) -> Result<u128, Rejection> {
    magnitude(token, Rejection::UnsignedOverflow)
}

fn magnitude(body: &str, overflow: Rejection) -> Result<u128, Rejection> {
    let (radix, digits) = split_radix(body);
    if digits.is_empty() {
        return Err(Rejection::Invalid);
    }

    let mut acc: u128 = 0;
    for c in digits.chars() {
        let digit = c.to_digit(radix).ok_or(Rejection::Invalid)?;
        acc = acc
            .checked_mul(radix as u128)
            .and_then(|v| v.checked_add(digit as u128))
            .ok_or(overflow)?;
    }
    Ok(acc)
}

fn split_radix(body: &str) -> (u32, &str) {
    let bytes = body.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'0' {
        match bytes[1] {
            b'x' | b'X' => return (16, &body[2..]),
            b'o' | b'O' => return (8, &body[2..]),
            b'b' | b'B' => return (2, &body[2..]),
            _ => return (8, &body[1..]),
        }
    }
    (10, body)
}

trait Float: std::str::FromStr + Copy {
    fn is_infinite(self) -> bool;
}

impl Float for f32 {
    fn is_infinite(self) -> bool {
        f32::is_infinite(self)
    }
}

impl Float for f64 {
    fn is_infinite(self) -> bool {
        f64::is_infinite(self)
    }
}

fn float<T: Float>(token: &str) -> Result<T, Rejection> {
    let value: T = token.parse().map_err(|_| Rejection::Invalid)?;
    // Finite text that rounds to infinity is out of range for the width.
    if value.is_infinite() && !names_infinity(token) {
        return Err(Rejection::Invalid);
    }
    Ok(value)
}

fn names_infinity(token: &str) -> bool {
    let unsigned = token.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

fn boolean(token: &str) -> Result<bool, Rejection> {
    match token {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(Rejection::Invalid),
    }
}

/// A Rust type usable as a command parameter.
///
/// The kind is read once when a command is built; `from_value` only ever sees
/// values the binder produced for that same kind.
pub trait Param: Sized {
    const KIND: ParamKind;

    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_param {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Param for $ty {
                const KIND: ParamKind = ParamKind::$variant;

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_param! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    bool => Bool,
    String => Str,
}
