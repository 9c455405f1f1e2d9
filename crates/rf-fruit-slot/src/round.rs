//! Round controller — bet, balance and the round state machine
//!
//! ```text
//! Idle ──place_bet──▶ BetPlaced ──debit──▶ Spinning ──settle──▶ Settled
//!   ▲                                                             │
//!   └─────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{BetLimits, SlotConfig};
use crate::effects::CancelToken;
use crate::engine::SpinEngine;
use crate::error::{SlotError, SlotResult};
use crate::paytable::PayTable;
use crate::spin::{EvaluatedSpin, SpinFrame, SpinResult};
use crate::stats::SessionStats;
use crate::timing::{FramePacer, SpinAnimation};

/// Round state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundState {
    /// Waiting for a spin request
    Idle,
    /// Bet accepted, not yet debited
    BetPlaced,
    /// Bet debited, reels turning
    Spinning,
    /// Payout credited, result available
    Settled,
}

/// Parse a bet typed by the player
pub fn parse_bet(input: &str) -> SlotResult<u64> {
    let trimmed = input.trim();
    trimmed
        .parse::<u64>()
        .map_err(|_| SlotError::InvalidBetFormat(trimmed.to_string()))
}

/// Round controller
///
/// Owns the credit balance and the current bet, and drives one round at a
/// time through the engine and the paytable.
pub struct RoundController {
    engine: SpinEngine,
    paytable: PayTable,
    limits: BetLimits,
    balance: u64,
    bet: u64,
    state: RoundState,
    last_result: Option<EvaluatedSpin>,
    stats: SessionStats,
}

impl RoundController {
    /// Create a controller; fails if the initial bet is out of range
    pub fn new(
        engine: SpinEngine,
        paytable: PayTable,
        limits: BetLimits,
        starting_balance: u64,
        initial_bet: u64,
    ) -> SlotResult<Self> {
        limits.validate()?;
        limits.check(initial_bet).map_err(|_| {
            SlotError::config(format!(
                "initial bet {} outside {}..={}",
                initial_bet, limits.min_bet, limits.max_bet
            ))
        })?;

        Ok(Self {
            engine,
            paytable,
            limits,
            balance: starting_balance,
            bet: initial_bet,
            state: RoundState::Idle,
            last_result: None,
            stats: SessionStats::default(),
        })
    }

    /// Build a controller from a validated config
    pub fn from_config(config: &SlotConfig) -> SlotResult<Self> {
        config.validate()?;
        let engine = SpinEngine::new(config.symbol_set()?, config.reels)?;
        let paytable = config.paytable.build()?;
        Self::new(
            engine,
            paytable,
            config.betting.limits(),
            config.betting.starting_balance,
            config.betting.initial_bet,
        )
    }

    /// Current balance
    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Current bet
    pub fn bet(&self) -> u64 {
        self.bet
    }

    /// Bet limits
    pub fn limits(&self) -> BetLimits {
        self.limits
    }

    /// Current state
    pub fn state(&self) -> RoundState {
        self.state
    }

    /// Last settled round
    pub fn last_result(&self) -> Option<&EvaluatedSpin> {
        self.last_result.as_ref()
    }

    /// Paytable in use
    pub fn paytable(&self) -> &PayTable {
        &self.paytable
    }

    /// Session statistics
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Can the current bet be covered?
    pub fn can_afford(&self) -> bool {
        self.balance >= self.bet
    }

    /// Mutable engine access (seeding in tests)
    pub fn engine_mut(&mut self) -> &mut SpinEngine {
        &mut self.engine
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BETTING
    // ═══════════════════════════════════════════════════════════════════════════

    /// Change the bet without starting a round
    ///
    /// A placed but unplayed bet is withdrawn: `BetPlaced -> Idle`.
    pub fn change_bet(&mut self, amount: u64) -> SlotResult<()> {
        self.finish_round();
        if let Err(e) = self.limits.check(amount) {
            log::warn!("Bet change rejected: {}", e);
            return Err(e);
        }
        self.bet = amount;
        if self.state == RoundState::BetPlaced {
            self.state = RoundState::Idle;
        }
        log::info!("Bet changed to {}", amount);
        Ok(())
    }

    /// Change the bet from raw player input
    pub fn change_bet_from_input(&mut self, input: &str) -> SlotResult<()> {
        let amount = parse_bet(input).inspect_err(|e| log::warn!("{}", e))?;
        self.change_bet(amount)
    }

    /// Accept a bet for the next round: `Idle -> BetPlaced`
    ///
    /// Checks the range, then the balance. Nothing changes on failure.
    pub fn place_bet(&mut self, amount: u64) -> SlotResult<()> {
        self.finish_round();
        self.limits.check(amount).inspect_err(|e| log::warn!("{}", e))?;
        if self.balance < amount {
            let err = SlotError::InsufficientFunds {
                bet: amount,
                balance: self.balance,
            };
            log::warn!("{}", err);
            return Err(err);
        }
        self.bet = amount;
        self.state = RoundState::BetPlaced;
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ROUNDS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Play one instant round at the current bet
    pub fn play_round(&mut self) -> SlotResult<EvaluatedSpin> {
        let bet = self.begin_round()?;
        let raw = self.engine.spin();
        Ok(self.settle(raw, bet))
    }

    /// Play one animated round at the current bet
    ///
    /// The bet is debited before the animation starts. Frames are cosmetic;
    /// settlement uses the engine's committed draw.
    pub fn play_round_animated<P, F>(
        &mut self,
        animation: &SpinAnimation,
        cancel: &CancelToken,
        pacer: &mut P,
        on_frame: F,
    ) -> SlotResult<EvaluatedSpin>
    where
        P: FramePacer + ?Sized,
        F: FnMut(&SpinFrame),
    {
        let bet = self.begin_round()?;
        let raw = self.engine.spin_animated(animation, cancel, pacer, on_frame);
        Ok(self.settle(raw, bet))
    }

    /// `Settled -> Idle`; a no-op in any other state
    pub fn finish_round(&mut self) {
        if self.state == RoundState::Settled {
            self.state = RoundState::Idle;
        }
    }

    /// (Re)place the current bet, then debit: `BetPlaced -> Spinning`
    ///
    /// On failure the controller is left `Idle` with the balance untouched.
    fn begin_round(&mut self) -> SlotResult<u64> {
        if let Err(e) = self.place_bet(self.bet) {
            self.state = RoundState::Idle;
            return Err(e);
        }
        let bet = self.bet;
        let Some(balance) = self.balance.checked_sub(bet) else {
            self.state = RoundState::Idle;
            return Err(SlotError::InsufficientFunds {
                bet,
                balance: self.balance,
            });
        };
        self.balance = balance;
        self.state = RoundState::Spinning;
        Ok(bet)
    }

    /// Evaluate and credit: `Spinning -> Settled`
    fn settle(&mut self, raw: SpinResult, bet: u64) -> EvaluatedSpin {
        let evaluation = self.paytable.evaluate(&raw.symbols, bet);
        let result = raw.with_evaluation(evaluation);

        self.balance += result.payout();
        self.stats.record(bet, &result);
        self.state = RoundState::Settled;

        log::info!(
            "Round settled: {:?} bet={} payout={} balance={}",
            result.combination(),
            bet,
            result.payout(),
            self.balance
        );

        self.last_result = Some(result.clone());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spin::Combination;

    fn controller(balance: u64, bet: u64) -> RoundController {
        RoundController::new(
            SpinEngine::classic(),
            PayTable::standard(),
            BetLimits::new(1, 20),
            balance,
            bet,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_bet() {
        assert_eq!(parse_bet(" 12 ").unwrap(), 12);
        assert!(matches!(parse_bet("ten"), Err(SlotError::InvalidBetFormat(_))));
        assert!(matches!(parse_bet("-3"), Err(SlotError::InvalidBetFormat(_))));
        assert!(matches!(parse_bet(""), Err(SlotError::InvalidBetFormat(_))));
    }

    #[test]
    fn test_bet_out_of_range() {
        let mut round = controller(100, 5);
        let err = round.change_bet(25).unwrap_err();

        assert!(matches!(err, SlotError::BetOutOfRange { bet: 25, min: 1, max: 20 }));
        assert_eq!(round.bet(), 5);
        assert!(round.change_bet(0).is_err());
        assert_eq!(round.bet(), 5);
    }

    #[test]
    fn test_change_bet_from_input() {
        let mut round = controller(100, 5);
        assert!(matches!(
            round.change_bet_from_input("abc"),
            Err(SlotError::InvalidBetFormat(_))
        ));
        assert_eq!(round.bet(), 5);

        round.change_bet_from_input("12").unwrap();
        assert_eq!(round.bet(), 12);
    }

    #[test]
    fn test_insufficient_funds() {
        let mut round = controller(5, 5);
        let err = round.place_bet(10).unwrap_err();

        assert!(matches!(err, SlotError::InsufficientFunds { bet: 10, balance: 5 }));
        assert_eq!(round.balance(), 5);
        assert_eq!(round.bet(), 5);
        assert_eq!(round.state(), RoundState::Idle);
    }

    #[test]
    fn test_place_bet_transitions() {
        let mut round = controller(100, 5);
        round.place_bet(10).unwrap();
        assert_eq!(round.state(), RoundState::BetPlaced);
        assert_eq!(round.bet(), 10);
        // Not debited until the round starts
        assert_eq!(round.balance(), 100);
    }

    #[test]
    fn test_change_bet_withdraws_placed_bet() {
        let mut round = controller(15, 5);
        round.place_bet(10).unwrap();
        round.change_bet(20).unwrap();
        assert_eq!(round.state(), RoundState::Idle);

        let err = round.play_round().unwrap_err();

        assert!(matches!(err, SlotError::InsufficientFunds { bet: 20, balance: 15 }));
        assert_eq!(round.state(), RoundState::Idle);
        assert_eq!(round.balance(), 15);
        assert!(round.last_result().is_none());

        // Lowering the bet recovers without any extra step
        round.change_bet(10).unwrap();
        let result = round.play_round().unwrap();
        assert_eq!(round.balance(), 5 + result.payout());
    }

    #[test]
    fn test_play_round_after_place_bet() {
        let mut round = controller(100, 5);
        round.place_bet(10).unwrap();

        let result = round.play_round().unwrap();

        assert_eq!(round.state(), RoundState::Settled);
        assert_eq!(round.balance(), 90 + result.payout());
        assert_eq!(round.stats().total_wagered, 10);
    }

    #[test]
    fn test_play_round_settles() {
        let mut round = controller(100, 10);
        round.engine_mut().seed(42);

        let result = round.play_round().unwrap();

        assert_eq!(round.state(), RoundState::Settled);
        assert_eq!(round.balance(), 100 - 10 + result.payout());
        assert_eq!(round.last_result(), Some(&result));
        assert_eq!(round.stats().total_spins, 1);

        round.finish_round();
        assert_eq!(round.state(), RoundState::Idle);
    }

    #[test]
    fn test_play_round_without_funds() {
        let mut round = controller(3, 5);
        let err = round.play_round().unwrap_err();

        assert!(matches!(err, SlotError::InsufficientFunds { .. }));
        assert_eq!(round.balance(), 3);
        assert_eq!(round.state(), RoundState::Idle);
        assert!(round.last_result().is_none());
    }

    #[test]
    fn test_balance_never_negative() {
        let mut round = controller(20, 7);
        round.engine_mut().seed(2024);

        for i in 0..500u64 {
            if i % 17 == 0 {
                let _ = round.change_bet(1 + i % 20);
            }
            match round.play_round() {
                Ok(result) => {
                    let bound = round.paytable().max_multiplier() * round.bet() as f64;
                    assert!(result.payout() as f64 <= bound);
                }
                Err(e) => {
                    assert!(e.is_recoverable());
                    assert!(round.balance() < round.bet());
                }
            }
        }
        // u64 cannot go negative; the debit path must never have underflowed
        assert!(round.stats().total_wagered <= 20 + round.stats().total_won);
    }

    #[test]
    fn test_no_win_round_keeps_debit() {
        let mut round = controller(100, 10);
        round.engine_mut().seed(9);

        loop {
            let before = round.balance();
            let result = round.play_round().unwrap();
            if result.combination() == Combination::NoWin {
                assert_eq!(round.balance(), before - 10);
                break;
            }
            if round.balance() < 10 {
                break;
            }
        }
    }

    #[test]
    fn test_animated_round() {
        use crate::timing::NoopPacer;

        let mut round = controller(50, 10);
        let mut frames = 0;
        let result = round
            .play_round_animated(
                &SpinAnimation::normal(),
                &CancelToken::new(),
                &mut NoopPacer::default(),
                |_| frames += 1,
            )
            .unwrap();

        assert_eq!(frames, 14);
        assert_eq!(result.symbols.len(), 3);
        assert_eq!(round.balance(), 40 + result.payout());
    }

    #[test]
    fn test_invalid_initial_bet() {
        let result = RoundController::new(
            SpinEngine::classic(),
            PayTable::standard(),
            BetLimits::new(1, 20),
            100,
            50,
        );
        assert!(matches!(result, Err(SlotError::InvalidConfiguration(_))));
    }
}
