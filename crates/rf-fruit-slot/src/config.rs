//! Slot configuration
//!
//! Everything the machine needs at startup: alphabet, reel count, paytable,
//! bet limits, starting credits and animation timing. Loaded from JSON or
//! YAML, validated once, never mutated afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::DEFAULT_REEL_COUNT;
use crate::error::{SlotError, SlotResult};
use crate::paytable::{
    DEFAULT_FALLBACK_MULTIPLIER, DEFAULT_TWO_OF_KIND_MULTIPLIER, PayTable, SymbolPay,
};
use crate::symbols::{CHERRY, LEMON, PEAR, STRAWBERRY, Symbol, SymbolSet, WATERMELON};
use crate::timing::SpinAnimation;

/// Inclusive bet range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetLimits {
    pub min_bet: u64,
    pub max_bet: u64,
}

impl BetLimits {
    pub fn new(min_bet: u64, max_bet: u64) -> Self {
        Self { min_bet, max_bet }
    }

    /// Reject inverted ranges
    pub fn validate(&self) -> SlotResult<()> {
        if self.min_bet > self.max_bet {
            return Err(SlotError::config(format!(
                "min bet {} exceeds max bet {}",
                self.min_bet, self.max_bet
            )));
        }
        Ok(())
    }

    /// Is `bet` within range?
    pub fn contains(&self, bet: u64) -> bool {
        (self.min_bet..=self.max_bet).contains(&bet)
    }

    /// Check a bet, producing `BetOutOfRange`
    pub fn check(&self, bet: u64) -> SlotResult<()> {
        if self.contains(bet) {
            Ok(())
        } else {
            Err(SlotError::BetOutOfRange {
                bet,
                min: self.min_bet,
                max: self.max_bet,
            })
        }
    }
}

impl Default for BetLimits {
    fn default() -> Self {
        Self::new(1, 20)
    }
}

/// Betting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BettingConfig {
    pub min_bet: u64,
    pub max_bet: u64,
    /// Bet in effect when the game starts
    pub initial_bet: u64,
    /// Credits when the game starts
    pub starting_balance: u64,
}

impl BettingConfig {
    pub fn limits(&self) -> BetLimits {
        BetLimits::new(self.min_bet, self.max_bet)
    }
}

impl Default for BettingConfig {
    fn default() -> Self {
        Self {
            min_bet: 1,
            max_bet: 20,
            initial_bet: 5,
            starting_balance: 100,
        }
    }
}

/// Paytable configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaytableConfig {
    /// Three-of-kind rows
    pub three_of_kind: Vec<SymbolPay>,
    /// Multiplier for any repeated symbol
    #[serde(default = "default_two_of_kind")]
    pub two_of_kind: f64,
    /// Three-of-kind multiplier for symbols without a row
    #[serde(default = "default_fallback")]
    pub fallback: u32,
}

fn default_two_of_kind() -> f64 {
    DEFAULT_TWO_OF_KIND_MULTIPLIER
}

fn default_fallback() -> u32 {
    DEFAULT_FALLBACK_MULTIPLIER
}

impl PaytableConfig {
    /// Build the runtime paytable
    pub fn build(&self) -> SlotResult<PayTable> {
        PayTable::new(self.three_of_kind.clone(), self.two_of_kind, self.fallback)
    }
}

impl Default for PaytableConfig {
    fn default() -> Self {
        Self {
            three_of_kind: PayTable::standard().rows().to_vec(),
            two_of_kind: DEFAULT_TWO_OF_KIND_MULTIPLIER,
            fallback: DEFAULT_FALLBACK_MULTIPLIER,
        }
    }
}

/// Complete slot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotConfig {
    /// Symbol alphabet shared by every reel
    pub symbols: Vec<Symbol>,
    /// Number of reels
    #[serde(default = "default_reels")]
    pub reels: u8,
    pub paytable: PaytableConfig,
    #[serde(default)]
    pub betting: BettingConfig,
    #[serde(default)]
    pub animation: SpinAnimation,
}

fn default_reels() -> u8 {
    DEFAULT_REEL_COUNT
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            symbols: [CHERRY, LEMON, WATERMELON, STRAWBERRY, PEAR]
                .into_iter()
                .map(Symbol::new)
                .collect(),
            reels: DEFAULT_REEL_COUNT,
            paytable: PaytableConfig::default(),
            betting: BettingConfig::default(),
            animation: SpinAnimation::default(),
        }
    }
}

impl SlotConfig {
    /// Validate the whole configuration
    pub fn validate(&self) -> SlotResult<()> {
        let alphabet = self.symbol_set()?;
        if self.reels == 0 {
            return Err(SlotError::config("reel count must be at least 1"));
        }

        let limits = self.betting.limits();
        limits.validate()?;
        if !limits.contains(self.betting.initial_bet) {
            return Err(SlotError::config(format!(
                "initial bet {} outside {}..={}",
                self.betting.initial_bet, limits.min_bet, limits.max_bet
            )));
        }

        self.paytable.build()?.check_alphabet(&alphabet)?;

        if self.animation.frame_interval_ms == 0 && self.animation.total_duration_ms > 0 {
            return Err(SlotError::config("animation frame interval must be positive"));
        }
        Ok(())
    }

    /// Shared alphabet
    pub fn symbol_set(&self) -> SlotResult<SymbolSet> {
        SymbolSet::new(self.symbols.clone())
    }

    /// Parse JSON config
    pub fn from_json(json: &str) -> SlotResult<Self> {
        serde_json::from_str(json).map_err(|e| SlotError::ConfigParse(e.to_string()))
    }

    /// Parse YAML config
    pub fn from_yaml(yaml: &str) -> SlotResult<Self> {
        serde_yml::from_str(yaml).map_err(|e| SlotError::ConfigParse(e.to_string()))
    }

    /// Export config as pretty JSON
    pub fn to_json(&self) -> SlotResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SlotError::ConfigParse(e.to_string()))
    }

    /// Load and validate a config file (`.yaml`/`.yml` as YAML, otherwise JSON)
    pub fn load(path: impl AsRef<Path>) -> SlotResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;

        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

        let config = if is_yaml {
            Self::from_yaml(&text)?
        } else {
            Self::from_json(&text)?
        };
        config.validate()?;

        log::info!(
            "Loaded config from {}: {} symbols, {} reels",
            path.display(),
            config.symbols.len(),
            config.reels
        );
        Ok(config)
    }
}
