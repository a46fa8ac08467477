//! Commands: a name, a typed operation, and optional completion and error handling.
//!
//! Operations are plain Rust functions or closures. Their parameter kinds are read
//! from the signature once, when the command is built:
//!
//! ```rust
//! use nestcli::command::Command;
//!
//! let add = Command::new("add", |a: i64, b: i64| println!("{}", a + b));
//! assert_eq!(add.arity(), 2);
//! ```

use crate::bind;
use crate::error::{BindError, DispatchError};
use crate::value::{Param, ParamKind, Value};
use std::fmt;
use std::sync::Arc;

/// Produces completion candidates for the word after a command name.
pub type Completer = Arc<dyn Fn(&str) -> Vec<String> + Send + Sync>;

/// Decides what happens to a binding failure.
///
/// Returning `Ok(())` marks the failure handled: the operation is skipped and
/// dispatch carries on. Returning an error aborts the invocation with it.
pub type ErrorHandler =
    Arc<dyn Fn(&Command, &[String], &BindError) -> Result<(), DispatchError> + Send + Sync>;

type Invoker = Arc<dyn Fn(Vec<Value>) -> Result<(), InvokeError> + Send + Sync>;

/// Failure raised while calling an operation with bound values.
#[derive(Debug)]
pub enum InvokeError {
    /// The bound values did not match what the operation declared.
    Misconfigured(String),
    /// The operation itself reported an error.
    Failed(anyhow::Error),
}

/// What an operation may return: nothing, or a `Result`.
pub trait Outcome {
    fn into_result(self) -> anyhow::Result<()>;
}

impl Outcome for () {
    fn into_result(self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl<E> Outcome for Result<(), E>
where
    E: Into<anyhow::Error>,
{
    fn into_result(self) -> anyhow::Result<()> {
        self.map_err(Into::into)
    }
}

/// A callable whose parameters are all [`Param`] types.
///
/// Implemented for `Fn` closures and functions of up to eight parameters; `Args`
/// is the parameter tuple and only serves to keep the impls apart.
pub trait Operation<Args>: Send + Sync + 'static {
    fn kinds() -> Vec<ParamKind>;

    fn invoke(&self, values: Vec<Value>) -> Result<(), InvokeError>;
}

macro_rules! impl_operation {
    ($($arg:ident),*) => {
        impl<F, R, $($arg,)*> Operation<($($arg,)*)> for F
        where
            F: Fn($($arg),*) -> R + Send + Sync + 'static,
            R: Outcome,
            $($arg: Param,)*
        {
            fn kinds() -> Vec<ParamKind> {
                vec![$($arg::KIND),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn invoke(&self, values: Vec<Value>) -> Result<(), InvokeError> {
                let mut values = values.into_iter();
                $(
                    let $arg = values
                        .next()
                        .and_then($arg::from_value)
                        .ok_or_else(|| {
                            InvokeError::Misconfigured(format!(
                                "no bound {} value for parameter",
                                $arg::KIND
                            ))
                        })?;
                )*
                (self)($($arg),*).into_result().map_err(InvokeError::Failed)
            }
        }
    };
}

impl_operation!();
impl_operation!(A);
impl_operation!(A, B);
impl_operation!(A, B, C);
impl_operation!(A, B, C, D);
impl_operation!(A, B, C, D, E);
impl_operation!(A, B, C, D, E, G);
impl_operation!(A, B, C, D, E, G, H);
impl_operation!(A, B, C, D, E, G, H, I);

/// A registered command.
#[derive(Clone)]
pub struct Command {
    name: String,
    kinds: Vec<ParamKind>,
    invoker: Invoker,
    completer: Option<Completer>,
    error_handler: Option<ErrorHandler>,
    about: Option<String>,
}

impl Command {
    /// Build a command from a typed operation.
    pub fn new<Args, F>(name: impl Into<String>, operation: F) -> Self
    where
        Args: 'static,
        F: Operation<Args>,
    {
        let operation = Arc::new(operation);
        Self::from_parts(
            name.into(),
            F::kinds(),
            Arc::new(move |values: Vec<Value>| operation.invoke(values)),
        )
    }

    /// Build a command from an explicit kind list and an untyped operation.
    ///
    /// The operation receives exactly one value per kind, in order.
    pub fn with_kinds<F>(name: impl Into<String>, kinds: Vec<ParamKind>, operation: F) -> Self
    where
        F: Fn(Vec<Value>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::from_parts(
            name.into(),
            kinds,
            Arc::new(move |values: Vec<Value>| operation(values).map_err(InvokeError::Failed)),
        )
    }

    fn from_parts(name: String, kinds: Vec<ParamKind>, invoker: Invoker) -> Self {
        // Names are looked up as single-space-joined words.
        let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
        Self {
            name,
            kinds,
            invoker,
            completer: None,
            error_handler: None,
            about: None,
        }
    }

    pub fn completer<F>(mut self, completer: F) -> Self
    where
        F: Fn(&str) -> Vec<String> + Send + Sync + 'static,
    {
        self.completer = Some(Arc::new(completer));
        self
    }

    pub fn error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Command, &[String], &BindError) -> Result<(), DispatchError> + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    pub fn about(mut self, text: impl Into<String>) -> Self {
        self.about = Some(text.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kinds(&self) -> &[ParamKind] {
        &self.kinds
    }

    pub fn arity(&self) -> usize {
        self.kinds.len()
    }

    pub fn description(&self) -> Option<&str> {
        self.about.as_deref()
    }

    /// Kinds the binder cannot convert; non-empty means a misdeclared command.
    pub fn unsupported_kinds(&self) -> Vec<(usize, ParamKind)> {
        self.kinds
            .iter()
            .enumerate()
            .filter(|(_, kind)| !kind.is_supported())
            .map(|(index, kind)| (index, *kind))
            .collect()
    }

    /// Completion candidates for `search`; empty without a completer.
    pub fn complete(&self, search: &str) -> Vec<String> {
        match &self.completer {
            Some(completer) => completer(search),
            None => Vec::new(),
        }
    }

    /// Bind `args` and call the operation.
    ///
    /// `fallback` handles binding failures when the command has no handler of its own.
    pub fn execute(
        &self,
        args: &[String],
        fallback: Option<&ErrorHandler>,
    ) -> Result<(), DispatchError> {
        let values = match bind::bind(&self.kinds, args) {
            Ok(values) => values,
            Err(err) => return self.handle_bind_error(args, err, fallback),
        };

        (self.invoker)(values).map_err(|e| match e {
            InvokeError::Misconfigured(msg) => {
                DispatchError::Misconfigured(format!("{}: {}", self.name, msg))
            }
            InvokeError::Failed(source) => DispatchError::Command {
                command: self.name.clone(),
                source,
            },
        })
    }

    fn handle_bind_error(
        &self,
        args: &[String],
        err: BindError,
        fallback: Option<&ErrorHandler>,
    ) -> Result<(), DispatchError> {
        tracing::debug!(command = %self.name, error = %err, "argument binding failed");
        match self.error_handler.as_ref().or(fallback) {
            Some(handler) => handler(self, args, &err),
            None => Err(DispatchError::Bind {
                command: self.name.clone(),
                source: err,
            }),
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("kinds", &self.kinds)
            .field("completer", &self.completer.is_some())
            .field("error_handler", &self.error_handler.is_some())
            .finish()
    }
}
