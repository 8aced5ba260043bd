// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argument-list helpers.

/// Builds a `Vec<Message>` from any number of parts, for calls with more parts than the
/// tuple forms of [`IntoMessages`](crate::IntoMessages) cover.
///
/// ```rust
/// use gardens::{Garden, GardenOptions, MemorySink, messages};
/// use std::sync::Arc;
///
/// let sink = Arc::new(MemorySink::new());
/// let garden = Garden::new(None, GardenOptions::new().sink(sink.clone()));
/// garden.log(messages!["a", 1, "b", 2, "c", 3, true]);
/// assert_eq!(sink.drain_logs(), "[log] a 1 b 2 c 3 true\n");
///
/// let none: Vec<gardens::Message> = messages![];
/// assert!(none.is_empty());
/// ```
#[macro_export]
macro_rules! messages {
    () => {
        ::std::vec::Vec::<$crate::Message>::new()
    };
    ($($part:expr),+ $(,)?) => {
        ::std::vec![$($crate::Message::from($part)),+]
    };
}
