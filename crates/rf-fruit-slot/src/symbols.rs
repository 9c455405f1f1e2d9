//! Symbol definitions and reels

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};

/// A reel symbol
///
/// Symbols are opaque: only identity matters, never ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a symbol from its display text
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Display text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Classic fruit alphabet
pub const CHERRY: &str = "🍒";
pub const LEMON: &str = "🍋";
pub const WATERMELON: &str = "🍉";
pub const STRAWBERRY: &str = "🍓";
pub const PEAR: &str = "🍐";

/// Shared, non-empty symbol alphabet
///
/// Cloning is cheap; every reel of a machine points at the same storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSet {
    symbols: Arc<[Symbol]>,
}

impl SymbolSet {
    /// Create an alphabet, rejecting empty or duplicated symbol lists
    pub fn new(symbols: Vec<Symbol>) -> SlotResult<Self> {
        if symbols.is_empty() {
            return Err(SlotError::config("symbol alphabet is empty"));
        }
        for (i, symbol) in symbols.iter().enumerate() {
            if symbols[..i].contains(symbol) {
                return Err(SlotError::config(format!("duplicate symbol {symbol}")));
            }
        }
        Ok(Self {
            symbols: symbols.into(),
        })
    }

    /// The five-fruit alphabet of the classic machine
    pub fn fruits() -> Self {
        let symbols: Vec<Symbol> = [CHERRY, LEMON, WATERMELON, STRAWBERRY, PEAR]
            .into_iter()
            .map(Symbol::new)
            .collect();
        Self {
            symbols: symbols.into(),
        }
    }

    /// Number of symbols
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Is the symbol part of this alphabet?
    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.symbols.contains(symbol)
    }

    /// Symbols in configuration order
    pub fn as_slice(&self) -> &[Symbol] {
        &self.symbols
    }

}

impl Default for SymbolSet {
    fn default() -> Self {
        Self::fruits()
    }
}

/// A single reel
///
/// Stateless: a reel is a uniform draw over the shared alphabet.
#[derive(Debug, Clone)]
pub struct Reel {
    alphabet: SymbolSet,
}

impl Reel {
    /// Create a reel over an alphabet
    pub fn new(alphabet: SymbolSet) -> Self {
        Self { alphabet }
    }

    /// Draw one symbol uniformly at random
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Symbol {
        let idx = rng.random_range(0..self.alphabet.len());
        self.alphabet.as_slice()[idx].clone()
    }

    /// Alphabet this reel draws from
    pub fn alphabet(&self) -> &SymbolSet {
        &self.alphabet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_empty_alphabet_rejected() {
        let err = SymbolSet::new(Vec::new()).unwrap_err();
        assert!(matches!(err, SlotError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let result = SymbolSet::new(vec![Symbol::new("A"), Symbol::new("B"), Symbol::new("A")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_fruit_alphabet() {
        let set = SymbolSet::fruits();
        assert_eq!(set.len(), 5);
        assert!(set.contains(&Symbol::new(PEAR)));
        assert!(!set.contains(&Symbol::new("7")));
    }

    #[test]
    fn test_reel_draws_from_alphabet() {
        let reel = Reel::new(SymbolSet::fruits());
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let symbol = reel.draw(&mut rng);
            assert!(reel.alphabet().contains(&symbol));
        }
    }

    #[test]
    fn test_reel_covers_alphabet() {
        let reel = Reel::new(SymbolSet::fruits());
        let mut rng = StdRng::seed_from_u64(99);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..1000 {
            seen.insert(reel.draw(&mut rng));
        }
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn test_single_symbol_reel() {
        let set = SymbolSet::new(vec![Symbol::new("X")]).unwrap();
        let reel = Reel::new(set);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(reel.draw(&mut rng), Symbol::new("X"));
    }
}
