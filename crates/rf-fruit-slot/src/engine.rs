//! Spin engine — reels, RNG and the animated spin procedure

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::effects::CancelToken;
use crate::error::{SlotError, SlotResult};
use crate::spin::{SpinFrame, SpinResult};
use crate::symbols::{Reel, Symbol, SymbolSet};
use crate::timing::{FramePacer, SpinAnimation};

/// Default number of reels
pub const DEFAULT_REEL_COUNT: u8 = 3;

/// Spin engine
///
/// Owns the reels and the random source. Every committed result comes from
/// a fresh draw; animation frames are drawn separately and thrown away.
pub struct SpinEngine {
    /// Reels, left to right
    reels: Vec<Reel>,
    /// Random number generator
    rng: StdRng,
    /// Spins performed
    spin_count: u64,
}

impl SpinEngine {
    /// Create an engine with `reel_count` reels over the alphabet
    pub fn new(alphabet: SymbolSet, reel_count: u8) -> SlotResult<Self> {
        if reel_count == 0 {
            return Err(SlotError::config("reel count must be at least 1"));
        }
        Ok(Self::with_reels(alphabet, reel_count))
    }

    /// Three reels of fruit
    pub fn classic() -> Self {
        Self::with_reels(SymbolSet::fruits(), DEFAULT_REEL_COUNT)
    }

    fn with_reels(alphabet: SymbolSet, reel_count: u8) -> Self {
        Self {
            reels: (0..reel_count).map(|_| Reel::new(alphabet.clone())).collect(),
            rng: StdRng::from_os_rng(),
            spin_count: 0,
        }
    }

    /// Seed RNG for reproducible results in tests
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Number of reels
    pub fn reel_count(&self) -> usize {
        self.reels.len()
    }

    /// Shared alphabet
    pub fn alphabet(&self) -> &SymbolSet {
        self.reels[0].alphabet()
    }

    /// Spins performed so far
    pub fn spin_count(&self) -> u64 {
        self.spin_count
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN EXECUTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Draw once per reel and return the raw result
    pub fn spin(&mut self) -> SpinResult {
        self.spin_count += 1;
        let result = SpinResult::new(self.draw_all());
        log::debug!("Spin {}: {:?}", self.spin_count, result.symbols);
        result
    }

    /// Animated spin
    ///
    /// Emits a cosmetic frame every `frame_interval_ms` while reels lock one
    /// after another, then draws the committed result from scratch. The
    /// cosmetic phase ends early when `cancel` is raised or the animation
    /// ceiling is hit; the committed draw always happens.
    pub fn spin_animated<P, F>(
        &mut self,
        animation: &SpinAnimation,
        cancel: &CancelToken,
        pacer: &mut P,
        mut on_frame: F,
    ) -> SpinResult
    where
        P: FramePacer + ?Sized,
        F: FnMut(&SpinFrame),
    {
        let frame_count = animation.frame_count();
        let reel_count = self.reels.len();
        let mut display = self.draw_all();
        let mut locked = vec![false; reel_count];
        let mut shown = 0u64;

        for index in 0..frame_count {
            if cancel.is_cancelled() {
                log::debug!("Spin animation cancelled at frame {}", index);
                break;
            }

            let elapsed_ms = index * animation.frame_interval_ms;
            for (reel_idx, reel) in self.reels.iter().enumerate() {
                if animation.is_locked(reel_idx, elapsed_ms) {
                    locked[reel_idx] = true;
                } else {
                    display[reel_idx] = reel.draw(&mut self.rng);
                }
            }

            on_frame(&SpinFrame {
                index,
                elapsed_ms,
                symbols: display.clone(),
                locked: locked.clone(),
            });
            shown += 1;
            pacer.wait(animation.frame_interval());
        }

        log::debug!("Spin animation showed {} of {} frames", shown, frame_count);
        self.spin()
    }

    fn draw_all(&mut self) -> Vec<Symbol> {
        let rng = &mut self.rng;
        self.reels.iter().map(|reel| reel.draw(rng)).collect()
    }
}

impl Default for SpinEngine {
    fn default() -> Self {
        Self::classic()
    }
}
