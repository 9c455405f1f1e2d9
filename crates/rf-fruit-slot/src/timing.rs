//! Spin animation timing profiles and frame pacing

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Animation profile for the reel flicker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationProfile {
    /// Normal gameplay timing
    #[default]
    Normal,
    /// Fast mode
    Turbo,
    /// No cosmetic frames at all
    Instant,
    /// Hand-tuned values
    Custom,
}

/// Detailed animation timing
///
/// Reel `i` locks (stops refreshing) at
/// `reel_spin_ms + i * reel_stop_interval_ms`, clamped to the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinAnimation {
    /// Profile type
    pub profile: AnimationProfile,

    /// Length of the cosmetic window (ms)
    pub total_duration_ms: u64,

    /// Delay between frames (ms)
    pub frame_interval_ms: u64,

    /// Time before the first reel locks (ms)
    pub reel_spin_ms: u64,

    /// Delay between consecutive reel locks (ms)
    pub reel_stop_interval_ms: u64,

    /// Hard ceiling on the window, whatever the profile says (ms)
    #[serde(default)]
    pub max_duration_ms: Option<u64>,
}

impl SpinAnimation {
    /// Normal gameplay timing
    pub fn normal() -> Self {
        Self {
            profile: AnimationProfile::Normal,
            total_duration_ms: 850,
            frame_interval_ms: 65,
            reel_spin_ms: 0,
            reel_stop_interval_ms: 120,
            max_duration_ms: None,
        }
    }

    /// Turbo mode
    pub fn turbo() -> Self {
        Self {
            profile: AnimationProfile::Turbo,
            total_duration_ms: 400,
            frame_interval_ms: 40,
            reel_spin_ms: 0,
            reel_stop_interval_ms: 60,
            max_duration_ms: None,
        }
    }

    /// No animation: the spin resolves immediately
    pub fn instant() -> Self {
        Self {
            profile: AnimationProfile::Instant,
            total_duration_ms: 0,
            frame_interval_ms: 0,
            reel_spin_ms: 0,
            reel_stop_interval_ms: 0,
            max_duration_ms: None,
        }
    }

    /// Get timing for profile
    pub fn from_profile(profile: AnimationProfile) -> Self {
        match profile {
            AnimationProfile::Normal => Self::normal(),
            AnimationProfile::Turbo => Self::turbo(),
            AnimationProfile::Instant => Self::instant(),
            AnimationProfile::Custom => Self::normal(),
        }
    }

    /// Builder: impose a hard ceiling on the window
    pub fn with_ceiling(mut self, max_duration_ms: u64) -> Self {
        self.max_duration_ms = Some(max_duration_ms);
        self
    }

    /// Scale timing by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |ms: u64| (ms as f64 * factor.max(0.0)).round() as u64;
        Self {
            profile: AnimationProfile::Custom,
            total_duration_ms: scale(self.total_duration_ms),
            frame_interval_ms: scale(self.frame_interval_ms),
            reel_spin_ms: scale(self.reel_spin_ms),
            reel_stop_interval_ms: scale(self.reel_stop_interval_ms),
            max_duration_ms: self.max_duration_ms,
        }
    }

    /// Window length after applying the ceiling
    pub fn effective_duration_ms(&self) -> u64 {
        match self.max_duration_ms {
            Some(ceiling) => self.total_duration_ms.min(ceiling),
            None => self.total_duration_ms,
        }
    }

    /// Time at which a reel stops refreshing
    pub fn lock_time_ms(&self, reel_index: usize) -> u64 {
        let lock = self
            .reel_spin_ms
            .saturating_add(self.reel_stop_interval_ms.saturating_mul(reel_index as u64));
        lock.min(self.effective_duration_ms())
    }

    /// Has the reel locked at `elapsed_ms`?
    ///
    /// A reel still draws on the frame at which it locks, so reel 0 with a
    /// zero offset shows exactly one symbol and then holds it.
    pub fn is_locked(&self, reel_index: usize, elapsed_ms: u64) -> bool {
        elapsed_ms > self.lock_time_ms(reel_index)
    }

    /// Number of cosmetic frames in the window
    pub fn frame_count(&self) -> u64 {
        let duration = self.effective_duration_ms();
        if duration == 0 || self.frame_interval_ms == 0 {
            return 0;
        }
        duration.div_ceil(self.frame_interval_ms)
    }

    /// Frame interval as a `Duration`
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl Default for SpinAnimation {
    fn default() -> Self {
        Self::normal()
    }
}

/// Paces animation frames
///
/// The engine advances a logical clock by `frame_interval_ms` per frame and
/// asks the pacer to wait in between.
pub trait FramePacer {
    /// Block until the next frame is due
    fn wait(&mut self, interval: Duration);
}

/// Sleeps the calling thread between frames
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl FramePacer for ThreadPacer {
    fn wait(&mut self, interval: Duration) {
        std::thread::sleep(interval);
    }
}

/// Never sleeps; tallies the time it would have waited
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPacer {
    pub waited: Duration,
}

impl FramePacer for NoopPacer {
    fn wait(&mut self, interval: Duration) {
        self.waited += interval;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles() {
        let normal = SpinAnimation::normal();
        let turbo = SpinAnimation::turbo();
        let instant = SpinAnimation::instant();

        assert!(turbo.total_duration_ms < normal.total_duration_ms);
        assert_eq!(instant.frame_count(), 0);
        assert_eq!(SpinAnimation::from_profile(AnimationProfile::Turbo), turbo);
    }

    #[test]
    fn test_staggered_locks() {
        let anim = SpinAnimation::normal();
        assert_eq!(anim.lock_time_ms(0), 0);
        assert_eq!(anim.lock_time_ms(1), 120);
        assert_eq!(anim.lock_time_ms(2), 240);

        assert!(!anim.is_locked(0, 0));
        assert!(anim.is_locked(0, 65));
        assert!(!anim.is_locked(1, 65));
        assert!(anim.is_locked(1, 130));
        assert!(!anim.is_locked(2, 195));
        assert!(anim.is_locked(2, 260));
    }

    #[test]
    fn test_lock_clamped_to_window() {
        let anim = SpinAnimation::normal().with_ceiling(100);
        assert_eq!(anim.effective_duration_ms(), 100);
        assert_eq!(anim.lock_time_ms(2), 100);
    }

    #[test]
    fn test_frame_count() {
        // 0, 65, ..., 845 < 850
        assert_eq!(SpinAnimation::normal().frame_count(), 14);
        assert_eq!(SpinAnimation::normal().with_ceiling(130).frame_count(), 2);
    }

    #[test]
    fn test_scaled() {
        let half = SpinAnimation::normal().scaled(0.5);
        assert_eq!(half.profile, AnimationProfile::Custom);
        assert_eq!(half.total_duration_ms, 425);
        assert_eq!(half.reel_stop_interval_ms, 60);
    }

    #[test]
    fn test_noop_pacer_tallies() {
        let mut pacer = NoopPacer::default();
        pacer.wait(Duration::from_millis(65));
        pacer.wait(Duration::from_millis(65));
        assert_eq!(pacer.waited, Duration::from_millis(130));
    }
}
