//! Paytable and win calculation

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::spin::{Combination, Evaluation};
use crate::symbols::{CHERRY, LEMON, PEAR, STRAWBERRY, Symbol, SymbolSet, WATERMELON};

/// Three-of-kind multiplier for symbols missing from the table
pub const DEFAULT_FALLBACK_MULTIPLIER: u32 = 2;

/// Default two-of-kind multiplier
pub const DEFAULT_TWO_OF_KIND_MULTIPLIER: f64 = 1.5;

/// One three-of-kind row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolPay {
    pub symbol: Symbol,
    pub multiplier: u32,
}

impl SymbolPay {
    pub fn new(symbol: impl Into<Symbol>, multiplier: u32) -> Self {
        Self {
            symbol: symbol.into(),
            multiplier,
        }
    }
}

/// Display row for the paytable screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayEntry {
    pub description: String,
    pub multiplier: f64,
}

/// Complete paytable
///
/// Immutable after construction; evaluation is a pure function of the
/// symbols and the bet.
#[derive(Debug, Clone)]
pub struct PayTable {
    /// Three-of-kind rows in configuration order
    three_of_kind: Vec<SymbolPay>,
    /// Lookup index into `three_of_kind`
    index: HashMap<Symbol, u32>,
    /// Multiplier for any repeated symbol that does not fill the line
    two_of_kind: f64,
    /// Three-of-kind multiplier for symbols absent from the table
    fallback: u32,
}

impl PayTable {
    /// Create a paytable, validating the multipliers
    pub fn new(three_of_kind: Vec<SymbolPay>, two_of_kind: f64, fallback: u32) -> SlotResult<Self> {
        if !two_of_kind.is_finite() || two_of_kind < 0.0 {
            return Err(SlotError::config(format!(
                "two-of-kind multiplier must be a non-negative number, got {two_of_kind}"
            )));
        }

        let mut index = HashMap::with_capacity(three_of_kind.len());
        for row in &three_of_kind {
            if index.insert(row.symbol.clone(), row.multiplier).is_some() {
                return Err(SlotError::config(format!(
                    "paytable lists {} more than once",
                    row.symbol
                )));
            }
        }

        Ok(Self {
            three_of_kind,
            index,
            two_of_kind,
            fallback,
        })
    }

    /// The classic fruit paytable
    pub fn standard() -> Self {
        let rows = vec![
            SymbolPay::new(PEAR, 20),
            SymbolPay::new(STRAWBERRY, 10),
            SymbolPay::new(WATERMELON, 5),
            SymbolPay::new(CHERRY, 3),
            SymbolPay::new(LEMON, 3),
        ];
        let index = rows.iter().map(|r| (r.symbol.clone(), r.multiplier)).collect();
        Self {
            three_of_kind: rows,
            index,
            two_of_kind: DEFAULT_TWO_OF_KIND_MULTIPLIER,
            fallback: DEFAULT_FALLBACK_MULTIPLIER,
        }
    }

    /// Check every row refers to a symbol the reels can actually show
    pub fn check_alphabet(&self, alphabet: &SymbolSet) -> SlotResult<()> {
        match self.three_of_kind.iter().find(|r| !alphabet.contains(&r.symbol)) {
            Some(row) => Err(SlotError::config(format!(
                "paytable symbol {} is not on the reels",
                row.symbol
            ))),
            None => Ok(()),
        }
    }

    /// Three-of-kind multiplier for a symbol, falling back when absent
    pub fn three_of_kind_multiplier(&self, symbol: &Symbol) -> u32 {
        self.index.get(symbol).copied().unwrap_or(self.fallback)
    }

    /// Two-of-kind multiplier
    pub fn two_of_kind_multiplier(&self) -> f64 {
        self.two_of_kind
    }

    /// Fallback three-of-kind multiplier
    pub fn fallback_multiplier(&self) -> u32 {
        self.fallback
    }

    /// Largest multiplier any combination can pay
    pub fn max_multiplier(&self) -> f64 {
        let top = self
            .three_of_kind
            .iter()
            .map(|r| r.multiplier)
            .max()
            .unwrap_or(0)
            .max(self.fallback);
        (top as f64).max(self.two_of_kind)
    }

    /// Evaluate a line of symbols
    ///
    /// Rules are checked in order: all equal, then any repeat, then nothing.
    pub fn evaluate(&self, symbols: &[Symbol], bet: u64) -> Evaluation {
        let Some(first) = symbols.first() else {
            return Evaluation::no_win();
        };

        // Three of a kind: every reel shows the same symbol
        if symbols.iter().all(|s| s == first) {
            let multiplier = self.three_of_kind_multiplier(first) as f64;
            return Evaluation {
                combination: Combination::ThreeOfKind,
                winning_symbol: Some(first.clone()),
                multiplier,
                payout: floor_payout(multiplier, bet),
            };
        }

        // Two of a kind: the most repeated symbol, earliest on ties
        if let Some(pair) = most_repeated(symbols) {
            let multiplier = self.two_of_kind;
            return Evaluation {
                combination: Combination::TwoOfKind,
                winning_symbol: Some(pair.clone()),
                multiplier,
                payout: floor_payout(multiplier, bet),
            };
        }

        Evaluation::no_win()
    }

    /// Rows for the paytable screen
    ///
    /// Three-of-kind rows by descending multiplier (ties keep configuration
    /// order), then the two-of-kind row.
    pub fn entries(&self) -> Vec<PayEntry> {
        let mut rows: Vec<&SymbolPay> = self.three_of_kind.iter().collect();
        rows.sort_by(|a, b| b.multiplier.cmp(&a.multiplier));

        rows.into_iter()
            .map(|r| PayEntry {
                description: format!("{} {}", Combination::ThreeOfKind.label(), r.symbol),
                multiplier: r.multiplier as f64,
            })
            .chain(std::iter::once(PayEntry {
                description: Combination::TwoOfKind.label().to_string(),
                multiplier: self.two_of_kind,
            }))
            .collect()
    }

    /// Three-of-kind rows in configuration order
    pub fn rows(&self) -> &[SymbolPay] {
        &self.three_of_kind
    }
}

impl Default for PayTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// `floor(multiplier * bet)`, never negative
fn floor_payout(multiplier: f64, bet: u64) -> u64 {
    let raw = (multiplier * bet as f64).floor();
    if raw <= 0.0 { 0 } else { raw as u64 }
}

/// Symbol with the highest count (at least 2), earliest first occurrence on ties
fn most_repeated(symbols: &[Symbol]) -> Option<&Symbol> {
    let mut best: Option<(&Symbol, usize)> = None;
    for (i, symbol) in symbols.iter().enumerate() {
        // Only count from a symbol's first occurrence
        if symbols[..i].contains(symbol) {
            continue;
        }
        let count = symbols[i..].iter().filter(|s| *s == symbol).count();
        if count >= 2 && best.is_none_or(|(_, c)| count > c) {
            best = Some((symbol, count));
        }
    }
    best.map(|(s, _)| s)
}
