//! String interning for declaration and type names.
//!
//! Names recur constantly across the declaration tree and the type graph;
//! interning collapses them to `u32` handles that are cheap to copy, compare
//! and hash. The registry is append-only and entries live for the process.

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::{Arc, RwLock};

/// Handle to an interned string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Atom(u32);

impl Atom {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Default)]
struct InternerShard {
    strings: Vec<Arc<str>>,
    map: FxHashMap<Arc<str>, Atom>,
}

/// Append-only string registry.
///
/// `intern` takes `&self` so the registry can be shared freely; callers never
/// observe an atom whose text changes.
#[derive(Default)]
pub struct Interner {
    shard: RwLock<InternerShard>,
}

impl Interner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `text`, returning the atom already mapped to it if present.
    pub fn intern(&self, text: &str) -> Atom {
        if let Ok(shard) = self.shard.read()
            && let Some(&atom) = shard.map.get(text)
        {
            return atom;
        }
        let mut shard = self.shard.write().unwrap_or_else(|e| e.into_inner());
        if let Some(&atom) = shard.map.get(text) {
            return atom;
        }
        let atom = Atom(shard.strings.len() as u32);
        let text: Arc<str> = Arc::from(text);
        shard.strings.push(Arc::clone(&text));
        shard.map.insert(text, atom);
        atom
    }

    /// The text behind `atom`.
    #[must_use]
    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        let shard = self.shard.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&shard.strings[atom.index()])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shard.read().unwrap_or_else(|e| e.into_inner()).strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_deduplicates() {
        let interner = Interner::new();
        let a = interner.intern("client");
        let b = interner.intern("client");
        let c = interner.intern("Object");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(&*interner.resolve(a), "client");
        assert_eq!(&*interner.resolve(c), "Object");
    }

    #[test]
    fn test_intern_empty_string() {
        let interner = Interner::new();
        let empty = interner.intern("");
        assert_eq!(&*interner.resolve(empty), "");
        assert_eq!(interner.len(), 1);
    }
}
