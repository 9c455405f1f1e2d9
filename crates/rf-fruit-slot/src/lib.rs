//! # rf-fruit-slot — Three-reel fruit machine engine
//!
//! Reels, spin engine, paytable and round controller for a terminal slot
//! game. Rendering, input and sound live in the front-end; this crate only
//! produces results and animation frames for it to draw.
//!
//! ## Architecture
//!
//! ```text
//! RoundController (balance, bet, state machine)
//!     │
//!     ├── SpinEngine (reels × SymbolSet, RNG)
//!     │       └── spin() / spin_animated() → SpinResult (+ SpinFrame stream)
//!     │
//!     └── PayTable (three-of-kind rows, two-of-kind scalar, fallback)
//!             └── evaluate() → Evaluation
//!           │
//!           v
//!     EvaluatedSpin → renderer
//! ```

pub mod config;
pub mod effects;
pub mod engine;
pub mod error;
pub mod paytable;
pub mod round;
pub mod spin;
pub mod stats;
pub mod symbols;
pub mod timing;

pub use config::*;
pub use effects::*;
pub use engine::*;
pub use error::*;
pub use paytable::*;
pub use round::*;
pub use spin::*;
pub use stats::*;
pub use symbols::*;
pub use timing::*;
