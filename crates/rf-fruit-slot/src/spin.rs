//! Spin results, evaluations and animation frames

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::symbols::Symbol;

/// Raw spin result: one symbol per reel, no payout information yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinResult {
    /// Symbols in reel order
    pub symbols: Vec<Symbol>,
}

impl SpinResult {
    /// Create a raw result
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self { symbols }
    }

    /// Number of reels
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True when no reel was drawn
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Attach a paytable evaluation
    pub fn with_evaluation(self, evaluation: Evaluation) -> EvaluatedSpin {
        EvaluatedSpin {
            symbols: self.symbols,
            evaluation,
        }
    }
}

/// Combination category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combination {
    /// Every reel shows the same symbol
    ThreeOfKind,
    /// A symbol repeats without filling every reel
    TwoOfKind,
    /// Nothing matched
    NoWin,
}

impl Combination {
    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Combination::ThreeOfKind => "Three of a kind",
            Combination::TwoOfKind => "Two of a kind",
            Combination::NoWin => "No win",
        }
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Paytable verdict for a set of symbols
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub combination: Combination,
    pub winning_symbol: Option<Symbol>,
    /// Bet multiplier (0 when nothing matched)
    pub multiplier: f64,
    /// Credits paid, `floor(multiplier * bet)`
    pub payout: u64,
}

impl Evaluation {
    /// The zero-payout verdict
    pub fn no_win() -> Self {
        Self {
            combination: Combination::NoWin,
            winning_symbol: None,
            multiplier: 0.0,
            payout: 0,
        }
    }

    /// Did this pay anything?
    pub fn is_win(&self) -> bool {
        self.payout > 0
    }
}

/// Spin result after evaluation, handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedSpin {
    pub symbols: Vec<Symbol>,
    pub evaluation: Evaluation,
}

impl EvaluatedSpin {
    /// Did this spin pay anything?
    pub fn is_win(&self) -> bool {
        self.evaluation.is_win()
    }

    pub fn combination(&self) -> Combination {
        self.evaluation.combination
    }

    pub fn winning_symbol(&self) -> Option<&Symbol> {
        self.evaluation.winning_symbol.as_ref()
    }

    pub fn multiplier(&self) -> f64 {
        self.evaluation.multiplier
    }

    pub fn payout(&self) -> u64 {
        self.evaluation.payout
    }
}

/// One cosmetic animation frame
///
/// Frames are display-only. They are never used to decide the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinFrame {
    /// Frame index within the animation
    pub index: u64,
    /// Logical time since the spin started (ms)
    pub elapsed_ms: u64,
    /// Symbols on display
    pub symbols: Vec<Symbol>,
    /// Which reels have stopped refreshing
    pub locked: Vec<bool>,
}

impl SpinFrame {
    /// Have all reels locked?
    pub fn all_locked(&self) -> bool {
        self.locked.iter().all(|&l| l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_to_evaluated() {
        let raw = SpinResult::new(vec![Symbol::new("A"), Symbol::new("A"), Symbol::new("B")]);
        assert_eq!(raw.len(), 3);

        let evaluated = raw.with_evaluation(Evaluation {
            combination: Combination::TwoOfKind,
            winning_symbol: Some(Symbol::new("A")),
            multiplier: 1.5,
            payout: 15,
        });
        assert!(evaluated.is_win());
        assert_eq!(evaluated.combination(), Combination::TwoOfKind);
        assert_eq!(evaluated.winning_symbol(), Some(&Symbol::new("A")));
        assert_eq!(evaluated.symbols.len(), 3);
    }

    #[test]
    fn test_no_win() {
        let eval = Evaluation::no_win();
        assert!(!eval.is_win());
        assert_eq!(eval.combination.to_string(), "No win");
    }

    #[test]
    fn test_frame_all_locked() {
        let frame = SpinFrame {
            index: 3,
            elapsed_ms: 195,
            symbols: vec![Symbol::new("A"); 3],
            locked: vec![true, true, false],
        };
        assert!(!frame.all_locked());
    }
}
