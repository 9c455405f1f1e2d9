//! Cancellable cosmetic effects
//!
//! Visual effects (the win/loss flash) run on a background thread while the
//! game loop keeps polling input. The player's next action cancels them.
//!
//! The effect and the game loop share the sink behind a mutex. Cancellation
//! takes that lock before raising the flag, and the effect checks the flag
//! under the same lock right before every draw, so once `cancel()` returns
//! no further frame can reach the sink.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Shared cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check if cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Flash phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashPhase {
    /// Draw the message
    Show,
    /// Blank the message line
    Hide,
}

/// Flash timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashConfig {
    /// Show/hide cycles before the final show
    pub times: u32,
    /// Delay after each phase (ms)
    pub interval_ms: u64,
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            times: 2,
            interval_ms: 200,
        }
    }
}

impl FlashConfig {
    /// Phases drawn by an uncancelled flash
    pub fn total_phases(&self) -> u32 {
        self.times * 2 + 1
    }
}

/// Receives flash phases
pub trait FlashSink: Send + 'static {
    fn draw(&mut self, phase: FlashPhase);
}

impl<F> FlashSink for F
where
    F: FnMut(FlashPhase) + Send + 'static,
{
    fn draw(&mut self, phase: FlashPhase) {
        self(phase)
    }
}

/// Handle to a running flash
pub struct FlashHandle<S: FlashSink> {
    token: CancelToken,
    sink: Arc<Mutex<S>>,
    handle: Option<JoinHandle<u32>>,
}

impl<S: FlashSink> FlashHandle<S> {
    /// Stop the flash; no phase is drawn after this returns
    pub fn cancel(&self) {
        let _guard = self.sink.lock();
        self.token.cancel();
    }

    /// Wait for the flash to end and return how many phases were drawn
    pub fn join(mut self) -> u32 {
        self.handle
            .take()
            .and_then(|h| h.join().ok())
            .unwrap_or(0)
    }
}

impl<S: FlashSink> Drop for FlashHandle<S> {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.cancel();
        }
    }
}

/// Draw one phase unless cancelled; returns false once cancelled
fn draw_phase<S: FlashSink>(sink: &Mutex<S>, token: &CancelToken, phase: FlashPhase) -> bool {
    let mut sink = sink.lock();
    if token.is_cancelled() {
        return false;
    }
    sink.draw(phase);
    true
}

/// Spawn a flash on a background thread
///
/// Alternates `Show`/`Hide` `config.times` times, then leaves the message
/// shown. Stops at the first observed cancellation.
pub fn spawn_flash<S: FlashSink>(
    config: FlashConfig,
    token: CancelToken,
    sink: Arc<Mutex<S>>,
) -> FlashHandle<S> {
    let thread_token = token.clone();
    let thread_sink = Arc::clone(&sink);
    let interval = Duration::from_millis(config.interval_ms);

    let handle = thread::spawn(move || {
        let mut drawn = 0u32;
        for _ in 0..config.times {
            for phase in [FlashPhase::Show, FlashPhase::Hide] {
                if !draw_phase(&thread_sink, &thread_token, phase) {
                    log::debug!("Flash cancelled after {} phases", drawn);
                    return drawn;
                }
                drawn += 1;
                thread::sleep(interval);
            }
        }
        if draw_phase(&thread_sink, &thread_token, FlashPhase::Show) {
            drawn += 1;
        }
        drawn
    });

    FlashHandle {
        token,
        sink,
        handle: Some(handle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<FlashPhase>>>, Arc<Mutex<impl FlashSink>>) {
        let phases = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&phases);
        let sink = Arc::new(Mutex::new(move |phase: FlashPhase| log.lock().push(phase)));
        (phases, sink)
    }

    #[test]
    fn test_token() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_full_flash() {
        let (phases, sink) = recorder();
        let config = FlashConfig { times: 2, interval_ms: 1 };

        let drawn = spawn_flash(config, CancelToken::new(), sink).join();

        assert_eq!(drawn, config.total_phases());
        assert_eq!(
            *phases.lock(),
            vec![
                FlashPhase::Show,
                FlashPhase::Hide,
                FlashPhase::Show,
                FlashPhase::Hide,
                FlashPhase::Show,
            ]
        );
    }

    #[test]
    fn test_cancelled_before_start() {
        let (phases, sink) = recorder();
        let token = CancelToken::new();
        token.cancel();

        let drawn = spawn_flash(FlashConfig::default(), token, sink).join();

        assert_eq!(drawn, 0);
        assert!(phases.lock().is_empty());
    }

    #[test]
    fn test_no_phase_after_cancel() {
        let (phases, sink) = recorder();
        let config = FlashConfig { times: 50, interval_ms: 2 };

        let handle = spawn_flash(config, CancelToken::new(), sink);
        thread::sleep(Duration::from_millis(10));
        handle.cancel();
        let seen_at_cancel = phases.lock().len();

        let drawn = handle.join();

        assert_eq!(phases.lock().len(), seen_at_cancel);
        assert_eq!(drawn as usize, seen_at_cancel);
        assert!(drawn < config.total_phases());
    }
}
