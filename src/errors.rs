use std::fmt;
use std::error::Error;
use crate::utils;
use crate::stack::{self, Stack, StackTrace};


pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// An error carrying the call stack of the place it was created.
///
/// `{}` prints the message followed by the message of the wrapped error, if any.
/// `{:+}` and `{:?}` append the stack, one detailed frame per line.
pub struct TracedError {
    message: Option<String>,
    source: Option<BoxError>,
    stack: Stack,
}

impl TracedError {
    #[inline(always)]
    pub fn new(message: impl ToString) -> Self {
        Self::capture(Some(message.to_string()), None)
    }

    /// Annotate `error` with a message.
    #[inline(always)]
    pub fn wrap<E>(error: E, message: impl ToString) -> Self where E: Into<BoxError> {
        Self::capture(Some(message.to_string()), Some(error.into()))
    }

    /// Attach the current stack to `error` without changing its message.
    #[inline(always)]
    pub fn with_stack<E>(error: E) -> Self where E: Into<BoxError> {
        Self::capture(None, Some(error.into()))
    }

    // the generic constructors are inlined into the caller, leaving this as the one
    // frame between the caller and the stack walk
    #[inline(never)]
    fn capture(message: Option<String>, source: Option<BoxError>) -> Self {
        Self {
            message,
            source,
            stack: stack::callers(Self::capture as usize),
        }
    }

    pub fn message(&self) -> Option<&str> { self.message.as_deref() }

    pub fn stack(&self) -> &Stack { &self.stack }

    pub fn stack_trace(&self) -> StackTrace { self.stack.stack_trace() }
}

impl Error for TracedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_ref().map(|error| &**error as &(dyn Error + 'static))
    }
}

impl fmt::Display for TracedError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = self.source.as_ref().map(|error| &**error as &dyn Error);
        utils::format_error(fmt, self.message(), source)?;

        if fmt.sign_plus() {
            write!(fmt, "{:+}", self.stack)?;
        }
        Ok(())
    }
}

impl fmt::Debug for TracedError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{:+}", self)
    }
}
