//! Session statistics and batch simulation

use serde::{Deserialize, Serialize};

use crate::config::SlotConfig;
use crate::engine::SpinEngine;
use crate::error::SlotResult;
use crate::spin::{Combination, EvaluatedSpin};

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub total_wagered: u64,
    pub total_won: u64,
    pub wins: u64,
    pub losses: u64,
    pub three_of_kind: u64,
    pub two_of_kind: u64,
    pub biggest_payout: u64,
}

impl SessionStats {
    /// Record one settled round
    pub fn record(&mut self, bet: u64, result: &EvaluatedSpin) {
        self.total_spins += 1;
        self.total_wagered += bet;
        self.total_won += result.payout();

        if result.is_win() {
            self.wins += 1;
        } else {
            self.losses += 1;
        }

        match result.combination() {
            Combination::ThreeOfKind => self.three_of_kind += 1,
            Combination::TwoOfKind => self.two_of_kind += 1,
            Combination::NoWin => {}
        }

        self.biggest_payout = self.biggest_payout.max(result.payout());
    }

    /// Calculate RTP
    pub fn rtp(&self) -> f64 {
        if self.total_wagered > 0 {
            (self.total_won as f64 / self.total_wagered as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Net credits for the player (negative = house won)
    pub fn net(&self) -> i64 {
        self.total_won as i64 - self.total_wagered as i64
    }
}

/// Run `spins` instant rounds at a fixed bet, ignoring the balance
///
/// Used to check the house edge of a configuration.
pub fn simulate(config: &SlotConfig, spins: u64, bet: u64, seed: Option<u64>) -> SlotResult<SessionStats> {
    config.validate()?;
    config.betting.limits().check(bet)?;

    let mut engine = SpinEngine::new(config.symbol_set()?, config.reels)?;
    if let Some(seed) = seed {
        engine.seed(seed);
    }
    let paytable = config.paytable.build()?;
    let mut stats = SessionStats::default();

    for _ in 0..spins {
        let raw = engine.spin();
        let evaluation = paytable.evaluate(&raw.symbols, bet);
        stats.record(bet, &raw.with_evaluation(evaluation));
    }

    log::info!(
        "Simulated {} spins at bet {}: RTP {:.2}%, hit rate {:.2}%",
        spins,
        bet,
        stats.rtp(),
        stats.hit_rate()
    );
    Ok(stats)
}
