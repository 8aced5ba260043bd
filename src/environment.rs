// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host capabilities and process-wide defaults.
//!
//! The [`Environment`] answers the questions a garden cannot answer by itself: which
//! output mode and sink a fresh root should use, whether the host renders color,
//! whether a monotonic high-resolution clock exists, and which scopes should start
//! out verbose.
//!
//! # Default Behavior
//!
//! On first use the environment is detected from the host ([`Environment::detect`]):
//!
//! | Host                                   | Output mode | Sink            |
//! |----------------------------------------|-------------|-----------------|
//! | terminal with color                    | `ansi`      | [`StdoutSink`]  |
//! | redirected or colorless terminal       | `text`      | [`StdoutSink`]  |
//! | browser (`wasm32`)                     | `console`   | [`ConsoleSink`] |
//!
//! Environment variables consulted natively: `NO_COLOR` (disables color),
//! `FORCE_COLOR` (forces it, unless set to `0`), `TERM=dumb` (disables color), and
//! `DEBUG`, a comma- or space-separated list of scope names that start verbose (`*`
//! matches every named scope).
//!
//! # Configuration
//!
//! Adapters running at startup replace or patch the environment:
//!
//! ```
//! use gardens::environment::{configure_environment, environment};
//! use gardens::OutputMode;
//!
//! configure_environment(|env| {
//!     env.default_output_mode = OutputMode::Text;
//!     env.supports_color = false;
//! });
//! assert_eq!(environment().default_output_mode, OutputMode::Text);
//! ```
//!
//! Changes apply to gardens created afterwards, except `supports_color` and
//! `high_resolution_clock`, which are read at every call.
//!
//! # Implementation Notes
//!
//! The environment sits behind a spinlock rather than a mutex because the browser
//! main thread may not block. Readers clone what they need and release at once.

use crate::render::OutputMode;
use crate::sink::{ConsoleSink, Sink, StdoutSink};
use crate::spinlock::Spinlock;
use std::sync::{Arc, OnceLock};

/// Default significant digits for elapsed times.
pub const DEFAULT_TIMING_PRECISION: u32 = 6;

#[derive(Debug, Clone)]
pub struct Environment {
    pub default_output_mode: OutputMode,
    pub default_sink: Arc<dyn Sink>,
    /// Whether `ansi` and `console` output may carry styling.
    pub supports_color: bool,
    /// Whether [`Garden::time`](crate::Garden::time) can record timestamps.
    pub high_resolution_clock: bool,
    pub timing_precision: Option<u32>,
    /// Scope names that start verbose.
    pub debug: Vec<String>,
}

impl Environment {
    /// Inspects the host.
    pub fn detect() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let supports_color = detect_color(|name| std::env::var(name).ok());
            Environment {
                default_output_mode: if supports_color {
                    OutputMode::Ansi
                } else {
                    OutputMode::Text
                },
                default_sink: Arc::new(StdoutSink::new()),
                supports_color,
                high_resolution_clock: true,
                timing_precision: Some(DEFAULT_TIMING_PRECISION),
                debug: parse_debug_list(&std::env::var("DEBUG").unwrap_or_default()),
            }
        }
        #[cfg(target_arch = "wasm32")]
        {
            Environment {
                default_output_mode: OutputMode::Console,
                default_sink: Arc::new(ConsoleSink::new()),
                supports_color: true,
                high_resolution_clock: true,
                timing_precision: Some(DEFAULT_TIMING_PRECISION),
                debug: Vec::new(),
            }
        }
    }

    /// A capability-free environment writing plain text to `sink`.
    pub fn plain(sink: Arc<dyn Sink>) -> Self {
        Environment {
            default_output_mode: OutputMode::Text,
            default_sink: sink,
            supports_color: false,
            high_resolution_clock: true,
            timing_precision: Some(DEFAULT_TIMING_PRECISION),
            debug: Vec::new(),
        }
    }

    /// A console-bridging environment, as used by browser-like hosts.
    pub fn console() -> Self {
        Environment {
            default_output_mode: OutputMode::Console,
            default_sink: Arc::new(ConsoleSink::new()),
            supports_color: true,
            high_resolution_clock: true,
            timing_precision: Some(DEFAULT_TIMING_PRECISION),
            debug: Vec::new(),
        }
    }

    /// Whether a scope with this name starts verbose.
    pub fn debug_enabled(&self, scope: &str) -> bool {
        !scope.is_empty() && self.debug.iter().any(|entry| entry == "*" || entry == scope)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn detect_color(var: impl Fn(&str) -> Option<String>) -> bool {
    use std::io::IsTerminal;
    if var("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        return false;
    }
    if let Some(force) = var("FORCE_COLOR") {
        return force != "0" && force != "false";
    }
    if var("TERM").as_deref() == Some("dumb") {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn parse_debug_list(list: &str) -> Vec<String> {
    list.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

static ENVIRONMENT: OnceLock<Spinlock<Environment>> = OnceLock::new();

fn cell() -> &'static Spinlock<Environment> {
    ENVIRONMENT.get_or_init(|| Spinlock::new(Environment::detect()))
}

/// A snapshot of the current environment, detecting it on first use.
pub fn environment() -> Environment {
    cell().read().clone()
}

/// Whether the host currently renders color. Cheaper than [`environment`].
pub(crate) fn supports_color() -> bool {
    cell().read().supports_color
}

pub(crate) fn high_resolution_clock() -> bool {
    cell().read().high_resolution_clock
}

/// Replaces the environment.
pub fn set_environment(new_environment: Environment) {
    *cell().write() = new_environment;
}

/// Patches the environment in place.
pub fn configure_environment(update: impl FnOnce(&mut Environment)) {
    let mut guard = cell().write();
    update(&mut *guard);
}
