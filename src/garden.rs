// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hierarchical logging scopes.
//!
//! This module provides [`Garden`], the scope every logging call goes through, and
//! [`gardens`], the process-wide root scope.
//!
//! # Overview
//!
//! Gardens form a tree from child to parent. Each line a garden prints starts with the
//! `[name]` of every named garden on the path from the root, each painted in a color
//! derived from its name:
//!
//! ```rust
//! use gardens::{Garden, GardenOptions, MemorySink};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(MemorySink::new());
//! let root = Garden::new(Some("root"), GardenOptions::new().sink(sink.clone()));
//! let unnamed = root.create_scope_with(None, GardenOptions::new());
//! let leaf = unnamed.create_scope("leaf");
//!
//! leaf.info("ready");
//! assert_eq!(sink.drain_logs(), "[root][leaf][info] ready\n");
//! ```
//!
//! # Timers and Counters
//!
//! Each garden keeps its own timers and counters, keyed by [`Key`](crate::Key). They
//! are never shared with parents or children:
//!
//! ```rust
//! use gardens::{Garden, GardenOptions, MemorySink};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(MemorySink::new());
//! let garden = Garden::new(None, GardenOptions::new().sink(sink.clone()));
//! let child = garden.create_scope("child");
//!
//! assert_eq!(garden.count("jobs"), 1);
//! assert_eq!(garden.count("jobs"), 2);
//! assert_eq!(child.count("jobs"), 1);
//! ```
//!
//! # Thread Safety
//!
//! Gardens are `Send + Sync`. Configuration and trackers sit behind per-garden locks
//! that are released before the sink is written to, so a sink may log through a garden
//! without deadlocking.

mod garden_impl;
pub(crate) mod tracker;

#[cfg(test)]
mod tests;

pub use garden_impl::Garden;

use crate::options::GardenOptions;
use std::sync::OnceLock;

static ROOT: OnceLock<Garden> = OnceLock::new();

/// The process-wide unnamed root garden.
///
/// Created from the [`Environment`](crate::Environment) on first use. Every call
/// returns the same scope.
///
/// ```rust
/// assert_eq!(gardens::gardens(), gardens::gardens());
/// assert!(gardens::gardens().name().is_none());
/// ```
pub fn gardens() -> Garden {
    ROOT.get_or_init(|| Garden::new(None, GardenOptions::new()))
        .clone()
}
