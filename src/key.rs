// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keys correlating [`Garden::time`](crate::Garden::time) with
//! [`Garden::time_end`](crate::Garden::time_end), and identifying counters.

use std::fmt::Display;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static SYMBOL_ID: AtomicU64 = AtomicU64::new(0);

/// An opaque token usable as a key.
///
/// Symbols compare by identity: two symbols created with the same description are
/// different keys, while clones of one symbol are the same key.
///
/// ```
/// use gardens::Symbol;
///
/// let a = Symbol::new("sailor");
/// assert_eq!(a, a.clone());
/// assert_ne!(a, Symbol::new("sailor"));
/// assert_eq!(a.to_string(), "Symbol(sailor)");
/// ```
#[derive(Debug, Clone)]
pub struct Symbol {
    id: u64,
    description: Option<Arc<str>>,
}

impl Symbol {
    pub fn new(description: &str) -> Self {
        Symbol {
            id: SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: Some(Arc::from(description)),
        }
    }

    pub fn anonymous() -> Self {
        Symbol {
            id: SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.description.as_deref().unwrap_or(""))
    }
}

/// Identifier for a timer stack or counter.
///
/// `None` and `()` both convert to [`Key::Unnamed`], which is its own key and not the
/// string `"null"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Key {
    #[default]
    Unnamed,
    Named(String),
    Token(Symbol),
}

impl Key {
    /// The tag used when printing under this key; `fallback` stands in for
    /// [`Key::Unnamed`].
    pub fn label(&self, fallback: &str) -> String {
        match self {
            Key::Unnamed => fallback.to_string(),
            Key::Named(name) => name.clone(),
            Key::Token(symbol) => symbol.to_string(),
        }
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label("null"))
    }
}

impl From<()> for Key {
    fn from(_: ()) -> Self {
        Key::Unnamed
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Named(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Named(name)
    }
}

impl From<&String> for Key {
    fn from(name: &String) -> Self {
        Key::Named(name.clone())
    }
}

impl From<Symbol> for Key {
    fn from(symbol: Symbol) -> Self {
        Key::Token(symbol)
    }
}

impl From<&Symbol> for Key {
    fn from(symbol: &Symbol) -> Self {
        Key::Token(symbol.clone())
    }
}

impl<T: Into<Key>> From<Option<T>> for Key {
    fn from(key: Option<T>) -> Self {
        key.map_or(Key::Unnamed, Into::into)
    }
}

macro_rules! integer_keys {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Key {
                fn from(n: $ty) -> Self {
                    Key::Named(n.to_string())
                }
            }
        )*
    };
}

integer_keys!(i32, i64, u32, u64, usize);
