// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types.
//!
//! [`LoggedError`] is what the error-constructing operations
//! ([`Garden::error`](crate::Garden::error) and friends) build, print and hand back.
//! They never fail on the caller's behalf: whether to propagate the error is the
//! caller's decision. [`GardenError`] is returned by the operations that do fail.

use crate::message::{Value, inspect};
use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt::Display;
use thiserror::Error;

/// The flavor of a [`LoggedError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Error,
    TypeError,
    ReferenceError,
    AssertionError,
}

impl ErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Error => "Error",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::AssertionError => "AssertionError",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An error value built and printed by a [`Garden`](crate::Garden).
///
/// Errors built by a garden always carry a stack where the platform can capture one,
/// and it is rendered into the printed line. [`LoggedError::new`] captures only when
/// backtraces are enabled (`RUST_BACKTRACE` / `RUST_LIB_BACKTRACE`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct LoggedError {
    kind: ErrorKind,
    message: String,
    stack: Option<String>,
}

impl LoggedError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        LoggedError {
            kind,
            message: message.into(),
            stack: captured(Backtrace::capture()),
        }
    }

    /// Like [`LoggedError::new`], but always captures a stack.
    pub(crate) fn with_forced_stack(kind: ErrorKind, message: impl Into<String>) -> Self {
        LoggedError {
            kind,
            message: message.into(),
            stack: captured(Backtrace::force_capture()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    /// `message`, followed by the stack on its own lines when one was captured.
    pub(crate) fn body(&self, message: &str) -> String {
        match &self.stack {
            Some(stack) => format!("{message}\n{stack}\n"),
            None => message.to_string(),
        }
    }
}

fn captured(backtrace: Backtrace) -> Option<String> {
    match backtrace.status() {
        BacktraceStatus::Captured => Some(backtrace.to_string()),
        _ => None,
    }
}

/// Failures surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GardenError {
    /// A bad output mode, sink or option value.
    #[error("invalid argument: {0}")]
    InvalidArgument(LoggedError),
    /// A failed [`Garden::assert`](crate::Garden::assert) and friends.
    #[error("assertion failed: {0}")]
    AssertionFailure(LoggedError),
}

impl GardenError {
    pub fn logged(&self) -> &LoggedError {
        match self {
            GardenError::InvalidArgument(error) | GardenError::AssertionFailure(error) => error,
        }
    }

    pub fn into_logged(self) -> LoggedError {
        match self {
            GardenError::InvalidArgument(error) | GardenError::AssertionFailure(error) => error,
        }
    }
}

/// Anything [`Garden::catch`](crate::Garden::catch) can turn into a [`LoggedError`].
///
/// A [`LoggedError`] passes through untouched. Strings and foreign errors become an
/// `Error` of the same message; panic payloads (as returned by
/// [`std::panic::catch_unwind`]) become an `Error` of the panic message.
pub trait Catchable {
    fn into_logged_error(self) -> LoggedError;
}

impl Catchable for LoggedError {
    fn into_logged_error(self) -> LoggedError {
        self
    }
}

impl Catchable for GardenError {
    fn into_logged_error(self) -> LoggedError {
        self.into_logged()
    }
}

impl Catchable for &str {
    fn into_logged_error(self) -> LoggedError {
        LoggedError::with_forced_stack(ErrorKind::Error, self)
    }
}

impl Catchable for String {
    fn into_logged_error(self) -> LoggedError {
        LoggedError::with_forced_stack(ErrorKind::Error, self)
    }
}

impl Catchable for Value {
    fn into_logged_error(self) -> LoggedError {
        LoggedError::with_forced_stack(ErrorKind::Error, inspect(&self, false))
    }
}

impl Catchable for std::io::Error {
    fn into_logged_error(self) -> LoggedError {
        LoggedError::with_forced_stack(ErrorKind::Error, self.to_string())
    }
}

impl Catchable for serde_json::Error {
    fn into_logged_error(self) -> LoggedError {
        LoggedError::with_forced_stack(ErrorKind::TypeError, self.to_string())
    }
}

impl Catchable for Box<dyn std::error::Error + Send + Sync> {
    fn into_logged_error(self) -> LoggedError {
        LoggedError::with_forced_stack(ErrorKind::Error, self.to_string())
    }
}

impl Catchable for Box<dyn Any + Send> {
    fn into_logged_error(self) -> LoggedError {
        let message = if let Some(message) = self.downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = self.downcast_ref::<String>() {
            message.clone()
        } else {
            "panic".to_string()
        };
        LoggedError::with_forced_stack(ErrorKind::Error, message)
    }
}
