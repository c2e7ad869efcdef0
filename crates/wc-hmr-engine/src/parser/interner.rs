//! String interning for identifiers and literal values
//!
//! Every name and string the lexer sees is stored once; tokens and AST nodes
//! carry 4-byte symbols. Comparing two names is a symbol comparison.

use rustc_hash::FxHashMap;
use std::num::NonZeroU32;

/// An interned string symbol (32-bit index).
///
/// Symbols are small (4 bytes) and can be copied cheaply.
/// Use `Interner::resolve()` to get the actual string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(NonZeroU32);

impl Symbol {
    #[inline]
    fn from_raw(raw: u32) -> Self {
        Symbol(NonZeroU32::MIN.saturating_add(raw))
    }

    #[inline]
    fn to_raw(self) -> usize {
        (self.0.get() - 1) as usize
    }

    /// Create a dummy symbol (for expected-token lists and tests)
    #[inline]
    pub const fn dummy() -> Self {
        Symbol(NonZeroU32::MIN)
    }
}

/// String interner that deduplicates strings.
#[derive(Clone)]
pub struct Interner {
    /// Map from string to symbol index
    map: FxHashMap<String, Symbol>,

    /// Vec of interned strings (indexed by symbol)
    strings: Vec<String>,
}

impl Interner {
    pub fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            strings: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            strings: Vec::with_capacity(capacity),
        }
    }

    /// Intern a string, returning its symbol.
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&sym) = self.map.get(s) {
            return sym;
        }

        let sym = Symbol::from_raw(self.strings.len() as u32);
        self.strings.push(s.to_string());
        self.map.insert(s.to_string(), sym);
        sym
    }

    /// Look up a string without interning it.
    ///
    /// `None` means no token or node in the module spells this name.
    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.map.get(s).copied()
    }

    /// Resolve a symbol back to its string.
    ///
    /// # Panics
    ///
    /// Panics if the symbol is invalid (not from this interner).
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.strings[sym.to_raw()]
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Interner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interner").field("len", &self.strings.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_deduplicates() {
        let mut interner = Interner::new();

        let sym1 = interner.intern("LitElement");
        let sym2 = interner.intern("HTMLElement");
        let sym3 = interner.intern("LitElement");

        assert_eq!(sym1, sym3);
        assert_ne!(sym1, sym2);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_resolve() {
        let mut interner = Interner::new();

        let sym = interner.intern("__$wc_hmr$__");
        assert_eq!(interner.resolve(sym), "__$wc_hmr$__");
    }

    #[test]
    fn test_get_does_not_intern() {
        let mut interner = Interner::new();
        let sym = interner.intern("Foo");

        assert_eq!(interner.get("Foo"), Some(sym));
        assert_eq!(interner.get("Bar"), None);
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn test_symbols_resolve_in_order() {
        let mut interner = Interner::new();
        let first = interner.intern("a");
        let second = interner.intern("b");

        assert_eq!(interner.resolve(first), "a");
        assert_eq!(interner.resolve(second), "b");
    }
}
