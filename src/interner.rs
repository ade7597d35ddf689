//! Identifier interning.
//!
//! Every identifier scanned in a session goes through the same [`Interner`], so scope lookups
//! compare names by address instead of by content.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Set of all identifier names seen so far.
#[derive(Debug, Default)]
pub struct Interner(HashSet<Symbol>);

impl Interner {
    pub fn new() -> Interner {
        Interner::default()
    }

    /// Returns the unique symbol for `name`, creating it on first use.
    pub fn symbol(&mut self, name: &str) -> Symbol {
        if let Some(sym) = self.0.get(name) {
            return sym.clone();
        }
        let sym = Symbol(Rc::from(name));
        self.0.insert(sym.clone());
        sym
    }
}

/// An interned identifier.
///
/// Two symbols from the same interner are equal iff they share storage.
#[derive(Debug, Clone)]
pub struct Symbol(Rc<str>);

impl Symbol {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Must agree with `Borrow<str>` so `HashSet::get(&str)` finds interned entries.
impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_keeps_its_name() {
        let mut interner = Interner::new();
        assert_eq!(interner.symbol("counter").name(), "counter");
    }

    #[test]
    fn same_name_yields_same_symbol() {
        let mut interner = Interner::new();
        let a = interner.symbol("x");
        let b = interner.symbol("x");
        assert_eq!(a, b);
        assert_eq!(interner.0.len(), 1);
    }

    #[test]
    fn different_names_yield_different_symbols() {
        let mut interner = Interner::new();
        assert_ne!(interner.symbol("x"), interner.symbol("y"));
    }

    #[test]
    fn symbols_from_different_interners_differ() {
        let mut first = Interner::new();
        let mut second = Interner::new();
        assert_ne!(first.symbol("x"), second.symbol("x"));
    }
}
