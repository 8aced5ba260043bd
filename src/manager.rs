// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memoized lookup of nested scopes by path.
//!
//! Long-lived components often want "the garden for `network/http`" without threading
//! scope handles around. A [`Manager`] creates each scope on first request and hands
//! back the same [`Garden`] afterwards, so counters and timers survive between
//! lookups.

use crate::garden::Garden;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug)]
struct ScopeNode {
    garden: Garden,
    nested: HashMap<String, ScopeNode>,
}

impl ScopeNode {
    fn new(garden: Garden) -> Self {
        ScopeNode {
            garden,
            nested: HashMap::new(),
        }
    }
}

/// A tree of lazily created scopes below one garden.
///
/// Cloning a manager is cheap; clones share the tree.
///
/// ```rust
/// use gardens::{Garden, GardenOptions, MemorySink};
/// use std::sync::Arc;
///
/// let sink = Arc::new(MemorySink::new());
/// let app = Garden::new(Some("app"), GardenOptions::new().sink(sink.clone()));
/// let manager = app.create_manager("services", GardenOptions::new());
///
/// let http = manager.scope(["network", "http"]);
/// assert_eq!(http, manager.scope(["network", "http"]));
///
/// http.log("GET /");
/// assert_eq!(sink.drain_logs(), "[app][services][network][http][log] GET /\n");
/// ```
#[derive(Debug, Clone)]
pub struct Manager {
    tree: Arc<Mutex<ScopeNode>>,
}

impl Manager {
    pub fn new(garden: Garden) -> Self {
        Manager {
            tree: Arc::new(Mutex::new(ScopeNode::new(garden))),
        }
    }

    /// The garden at the root of the tree.
    pub fn garden(&self) -> Garden {
        self.tree
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .garden
            .clone()
    }

    /// The garden at `path`, creating missing scopes along the way. An empty path
    /// returns the root garden.
    pub fn scope<I>(&self, path: I) -> Garden
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut tree = self.tree.lock().unwrap_or_else(PoisonError::into_inner);
        let mut node = &mut *tree;
        for segment in path {
            let name = segment.as_ref();
            let parent = node.garden.clone();
            node = node
                .nested
                .entry(name.to_string())
                .or_insert_with(|| ScopeNode::new(parent.create_scope(name)));
        }
        node.garden.clone()
    }
}
