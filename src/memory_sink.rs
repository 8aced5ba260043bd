// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Sink
//!
//! A [`Sink`] that records writes instead of emitting them, for tests and for hosts
//! where output has to be collected and shipped elsewhere.
//!
//! Each write is kept as the exact argument list the garden produced, so tests can
//! assert both on the rendered line and on the structure of console-mode writes.

use crate::message::Message;
use crate::sink::{Sink, render_console_args};
use std::sync::{Mutex, PoisonError};

/// Records every write in memory.
///
/// # Example
///
/// ```rust
/// use gardens::{Garden, GardenOptions, MemorySink};
/// use std::sync::Arc;
///
/// let sink = Arc::new(MemorySink::new());
/// let garden = Garden::new(Some("test"), GardenOptions::new().sink(sink.clone()));
///
/// garden.log("Hello!");
/// garden.count(());
///
/// assert_eq!(
///     sink.drain_lines(),
///     vec!["[test][log] Hello!\n", "[test][count] 1 time\n"]
/// );
/// // The buffer is now empty
/// assert!(sink.drain_logs().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemorySink {
    writes: Mutex<Vec<Vec<Message>>>,
}

// Clone is not implemented: two handles to one buffer is what `Arc<MemorySink>` is for.

impl MemorySink {
    pub fn new() -> Self {
        Self {
            writes: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Vec<Message>>> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of writes recorded since the last drain.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Takes the raw argument lists of every recorded write.
    pub fn drain_writes(&self) -> Vec<Vec<Message>> {
        std::mem::take(&mut *self.lock())
    }

    /// Takes every recorded write, each rendered to a string.
    ///
    /// Single-argument writes (every mode except `console`) are returned verbatim,
    /// including their line terminator. Console writes are rendered as a console would
    /// show them.
    pub fn drain_lines(&self) -> Vec<String> {
        self.drain_writes()
            .iter()
            .map(|args| render_console_args(args))
            .collect()
    }

    /// Takes every recorded write, concatenated.
    pub fn drain_logs(&self) -> String {
        self.drain_lines().concat()
    }

    /// Prints every recorded write to standard error (the browser console on wasm) and
    /// clears the buffer.
    pub fn drain_to_console(&self) {
        for line in self.drain_lines() {
            #[cfg(target_arch = "wasm32")]
            web_sys::console::log_1(&line.into());
            #[cfg(not(target_arch = "wasm32"))]
            eprint!("{line}");
        }
    }
}

impl Sink for MemorySink {
    fn write(&self, args: &[Message]) {
        self.lock().push(args.to_vec());
    }
}
