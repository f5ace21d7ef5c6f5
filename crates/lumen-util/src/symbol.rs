//! String interning for identifiers, field names, and record names.
//!
//! A [`Symbol`] is a 4-byte handle into a process-global, thread-safe string
//! table. Comparing two symbols is an integer comparison; only printing one
//! touches the table. Lumen itself runs single-threaded (see spec §5), but
//! the table is `dashmap`-backed so interning can happen freely from any
//! helper (tests, the driver, future tooling) without plumbing a table
//! through every call site.

use ahash::AHasher;
use dashmap::DashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::LazyLock;

static TABLE: LazyLock<Interner> = LazyLock::new(Interner::new);

struct Interner {
    by_hash: DashMap<u64, (&'static str, u32)>,
    by_id: DashMap<u32, &'static str>,
    next: AtomicU32,
}

impl Interner {
    fn new() -> Self {
        Self {
            by_hash: DashMap::with_capacity(256),
            by_id: DashMap::with_capacity(256),
            next: AtomicU32::new(0),
        }
    }

    fn intern(&self, s: &str) -> u32 {
        let hash = hash_str(s);
        if let Some(existing) = self.by_hash.get(&hash) {
            let (text, id) = *existing;
            if text == s {
                return id;
            }
        }
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        self.by_hash.insert(hash, (leaked, id));
        self.by_id.insert(id, leaked);
        id
    }

    fn resolve(&self, id: u32) -> &'static str {
        *self
            .by_id
            .get(&id)
            .expect("Symbol constructed from a foreign interner")
    }
}

fn hash_str(s: &str) -> u64 {
    let mut hasher = AHasher::default();
    s.hash(&mut hasher);
    hasher.finish()
}

/// A compact, `Copy` handle to an interned string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    /// Intern `s`, returning a stable handle. Interning the same text twice
    /// returns equal symbols.
    pub fn intern(s: &str) -> Symbol {
        Symbol(TABLE.intern(s))
    }

    /// Look up the original string. O(1): the table never deallocates.
    pub fn as_str(self) -> &'static str {
        TABLE.resolve(self.0)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
