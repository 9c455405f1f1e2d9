//! End-to-End Round Tests
//!
//! Drives full rounds through the public API:
//! - Config → controller construction
//! - Spin → evaluate → settle
//! - Paytable scenarios on the classic machine

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use rf_fruit_slot::{
    BetLimits, CancelToken, Combination, NoopPacer, PayTable, RoundController, RoundState,
    SlotConfig, SlotError, SpinAnimation, SpinEngine, Symbol, SymbolPay, SymbolSet,
};

const BET: u64 = 10;

fn fruits(symbols: &[&str]) -> Vec<Symbol> {
    symbols.iter().map(|s| Symbol::new(*s)).collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// PAYTABLE SCENARIOS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_classic_scenarios() {
    let table = PayTable::standard();

    let eval = table.evaluate(&fruits(&["🍐", "🍐", "🍐"]), BET);
    assert_eq!(eval.combination, Combination::ThreeOfKind);
    assert_eq!(eval.winning_symbol, Some(Symbol::new("🍐")));
    assert_eq!(eval.payout, 200);

    let eval = table.evaluate(&fruits(&["🍒", "🍒", "🍋"]), BET);
    assert_eq!(eval.combination, Combination::TwoOfKind);
    assert_eq!(eval.winning_symbol, Some(Symbol::new("🍒")));
    assert_eq!(eval.multiplier, 1.5);
    assert_eq!(eval.payout, 15);

    let eval = table.evaluate(&fruits(&["🍒", "🍋", "🍉"]), BET);
    assert_eq!(eval.combination, Combination::NoWin);
    assert_eq!(eval.winning_symbol, None);
    assert_eq!(eval.payout, 0);
}

#[test]
fn test_random_lines_follow_rules() {
    let table = PayTable::standard();
    let alphabet = SymbolSet::fruits();
    let mut rng = StdRng::seed_from_u64(31337);

    for i in 0..2000u64 {
        let line: Vec<Symbol> = (0..3)
            .filter_map(|_| alphabet.as_slice().choose(&mut rng).cloned())
            .collect();
        let bet = 1 + i % 20;
        let eval = table.evaluate(&line, bet);

        let distinct = {
            let mut seen: Vec<&Symbol> = Vec::new();
            for s in &line {
                if !seen.contains(&s) {
                    seen.push(s);
                }
            }
            seen.len()
        };

        match distinct {
            1 => {
                assert_eq!(eval.combination, Combination::ThreeOfKind);
                let m = table.three_of_kind_multiplier(&line[0]) as u64;
                assert_eq!(eval.payout, m * bet);
            }
            2 => {
                assert_eq!(eval.combination, Combination::TwoOfKind);
                assert_eq!(eval.payout, (1.5 * bet as f64).floor() as u64);
            }
            _ => {
                assert_eq!(eval.combination, Combination::NoWin);
                assert_eq!(eval.payout, 0);
            }
        }
        assert_eq!(eval, table.evaluate(&line, bet));
    }
}

#[test]
fn test_fallback_on_small_alphabet() {
    // Cherry has no row: three cherries pay the fallback
    let table = PayTable::new(vec![SymbolPay::new("🍐", 20)], 1.5, 2).unwrap();
    let eval = table.evaluate(&fruits(&["🍒", "🍒", "🍒"]), BET);
    assert_eq!(eval.payout, 20);
}

// ═══════════════════════════════════════════════════════════════════════════════
// ROUND CONTROLLER
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_controller_from_default_config() {
    let round = RoundController::from_config(&SlotConfig::default()).unwrap();
    assert_eq!(round.balance(), 100);
    assert_eq!(round.bet(), 5);
    assert_eq!(round.limits(), BetLimits::new(1, 20));
    assert_eq!(round.state(), RoundState::Idle);
}

#[test]
fn test_invalid_config_is_fatal() {
    let mut config = SlotConfig::default();
    config.betting.min_bet = 30;
    let err = RoundController::from_config(&config).err().unwrap();
    assert!(!err.is_recoverable());
}

#[test]
fn test_session_until_broke() {
    let mut config = SlotConfig::default();
    config.betting.starting_balance = 40;
    let mut round = RoundController::from_config(&config).unwrap();
    round.engine_mut().seed(8080);
    round.change_bet(20).unwrap();

    let mut rounds = 0;
    loop {
        match round.play_round() {
            Ok(result) => {
                assert_eq!(result.symbols.len(), 3);
                assert_eq!(round.state(), RoundState::Settled);
                rounds += 1;
            }
            Err(SlotError::InsufficientFunds { bet, balance }) => {
                assert_eq!(bet, 20);
                assert!(balance < 20);
                assert_eq!(round.balance(), balance);
                break;
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
        if rounds > 10_000 {
            break;
        }
    }

    let stats = round.stats();
    assert_eq!(stats.total_spins, rounds);
    assert_eq!(
        round.balance() as i64,
        40 + stats.total_won as i64 - stats.total_wagered as i64
    );
}

#[test]
fn test_animated_round_with_ceiling() {
    let mut round = RoundController::from_config(&SlotConfig::default()).unwrap();
    let animation = SpinAnimation::normal().with_ceiling(300);
    let mut pacer = NoopPacer::default();
    let mut frames = Vec::new();

    let result = round
        .play_round_animated(&animation, &CancelToken::new(), &mut pacer, |f| {
            frames.push(f.clone())
        })
        .unwrap();

    assert_eq!(frames.len(), 5);
    assert!(frames.iter().all(|f| f.symbols.len() == 3));
    assert_eq!(round.balance(), 95 + result.payout());
}

#[test]
fn test_five_reel_machine() {
    let engine = SpinEngine::new(SymbolSet::fruits(), 5).unwrap();
    let mut round =
        RoundController::new(engine, PayTable::standard(), BetLimits::new(1, 10), 50, 1).unwrap();

    let result = round.play_round().unwrap();
    assert_eq!(result.symbols.len(), 5);
}
