// SPDX-License-Identifier: MIT OR Apache-2.0

//! Monotonic clock types for native and WebAssembly targets.
//!
//! Timers started by [`Garden::time`](crate::Garden::time) record an [`Instant`].
//! On native platforms these come from `std::time`; on WASM, `std::time::Instant`
//! panics, so they come from `web_time`, which is backed by `performance.now()`.

#[cfg(not(target_arch = "wasm32"))]
pub use std::time::{Duration, Instant};
#[cfg(target_arch = "wasm32")]
pub use web_time::{Duration, Instant};

/// Milliseconds elapsed between `start` and now, with sub-millisecond precision.
pub(crate) fn elapsed_ms(start: Instant) -> (Duration, f64) {
    let elapsed = Instant::now().saturating_duration_since(start);
    (elapsed, elapsed.as_secs_f64() * 1000.0)
}
