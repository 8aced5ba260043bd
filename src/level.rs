// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::style::Style;

/// The built-in line types a [`Garden`](crate::Garden) prints.
///
/// Each level renders as a bracketed tag (`[warning]`) in its own color. Timers and
/// counters print under their key instead, using the default tag style.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Verbose-only diagnostics with a captured backtrace
    Trace,
    /// Verbose-only diagnostics
    Debug,
    /// Plain output
    Log,
    Info,
    Success,
    /// Suspicious condition, also used for misuse of the timer API
    Warning,
    Failure,
    /// A constructed [`LoggedError`](crate::LoggedError) of kind `Error`
    Error,
    TypeError,
    ReferenceError,
    AssertionError,
    /// An error passed to [`Garden::catch`](crate::Garden::catch)
    CaughtError,
}

/// Gray used for `[log]`, timer and counter tags.
pub(crate) const DEFAULT_TAG_COLOR: &str = "#5b5b5b";
/// Gray used for `[date]` and `[time]` fragments.
pub(crate) const TIMESTAMP_COLOR: &str = "#999999";

impl Level {
    /// The text inside the brackets.
    pub fn tag(self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Log => "log",
            Level::Info => "info",
            Level::Success => "success",
            Level::Warning => "warning",
            Level::Failure => "failure",
            Level::Error => "error",
            Level::TypeError => "type error",
            Level::ReferenceError => "reference error",
            Level::AssertionError => "assertion error",
            Level::CaughtError => "caught error",
        }
    }

    pub fn style(self) -> Style {
        let color = match self {
            Level::Trace | Level::Debug => "#ff8800",
            Level::Log => DEFAULT_TAG_COLOR,
            Level::Info => "#242f91",
            Level::Success => "#40a456",
            Level::Warning => "#ecb448",
            Level::Failure
            | Level::Error
            | Level::TypeError
            | Level::ReferenceError
            | Level::AssertionError
            | Level::CaughtError => "#ff1212",
        };
        Style::color(color)
    }

    /// Whether the level is suppressed unless the scope is verbose.
    pub fn requires_verbose(self) -> bool {
        matches!(self, Level::Trace | Level::Debug | Level::CaughtError)
    }
}
