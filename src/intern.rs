//! Process-lifetime string interning.
//!
//! An interned string ([`Symbol`]) is a small `Copy` handle; two symbols are
//! equal iff they came from the same `intern` call for equal text. All
//! identifier comparisons in the rest of the crate use `Symbol` equality,
//! never string comparison, so lookups in the symbol tables are a handle
//! compare rather than a string compare.
//!
//! The front end is single-threaded (spec §5), so the interner is an owned
//! struct on [`crate::context::GlobalContext`] rather than a global/`OnceLock`
//! table shared across threads.

use std::collections::HashMap;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(u32);

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

impl Symbol {
    /// Placeholder symbol for arena-allocated records before a real name is
    /// assigned (e.g. `Declaration::default()` ahead of `alloc_zeroed`).
    /// Never produced by `intern`'s own counter racing with this value in a
    /// way that matters: callers always overwrite `name` before the
    /// declaration becomes observable.
    pub const PLACEHOLDER: Symbol = Symbol(u32::MAX);
}

#[derive(Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    lookup: HashMap<Box<str>, Symbol>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, text: &str) -> Symbol {
        if let Some(&sym) = self.lookup.get(text) {
            return sym;
        }
        let sym = Symbol(self.strings.len() as u32);
        let boxed: Box<str> = text.into();
        self.strings.push(boxed.clone());
        self.lookup.insert(boxed, sym);
        sym
    }

    pub fn resolve(&self, symbol: Symbol) -> &str {
        &self.strings[symbol.0 as usize]
    }

    /// Intern a dotted module path (`a.b.c`) as a single symbol, the way
    /// module names are compared as whole paths throughout the driver.
    pub fn intern_path(&mut self, segments: &[&str]) -> Symbol {
        self.intern(&segments.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_interns_to_same_symbol() {
        let mut interner = Interner::new();
        let a = interner.intern("foo");
        let b = interner.intern("foo");
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_text_interns_to_distinct_symbols() {
        let mut interner = Interner::new();
        let a = interner.intern("foo");
        let b = interner.intern("bar");
        assert_ne!(a, b);
    }

    #[test]
    fn resolve_roundtrips() {
        let mut interner = Interner::new();
        let sym = interner.intern("mod.a");
        assert_eq!(interner.resolve(sym), "mod.a");
    }

    #[test]
    fn intern_path_joins_with_dots() {
        let mut interner = Interner::new();
        let sym = interner.intern_path(&["mod", "a"]);
        assert_eq!(interner.resolve(sym), "mod.a");
    }
}
