//! Error types for the fruit slot engine

use thiserror::Error;

/// Engine error type
///
/// Bet and funds errors are recoverable: the caller reports them and keeps
/// playing. Configuration errors are fatal and abort startup.
#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Invalid bet '{0}': use whole numbers")]
    InvalidBetFormat(String),

    #[error("Bet {bet} out of range: must be between {min} and {max}")]
    BetOutOfRange { bet: u64, min: u64, max: u64 },

    #[error("Insufficient credits: bet {bet}, balance {balance}")]
    InsufficientFunds { bet: u64, balance: u64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Config IO error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(String),
}

impl SlotError {
    /// Shorthand for configuration errors
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Can the player retry after this error?
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidBetFormat(_) | Self::BetOutOfRange { .. } | Self::InsufficientFunds { .. }
        )
    }
}

/// Result type alias
pub type SlotResult<T> = Result<T, SlotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classes() {
        assert!(SlotError::InvalidBetFormat("abc".into()).is_recoverable());
        assert!(SlotError::BetOutOfRange { bet: 25, min: 1, max: 20 }.is_recoverable());
        assert!(SlotError::InsufficientFunds { bet: 10, balance: 5 }.is_recoverable());
        assert!(!SlotError::config("no reels").is_recoverable());
        assert!(!SlotError::ConfigParse("bad".into()).is_recoverable());
    }

    #[test]
    fn test_messages() {
        let err = SlotError::BetOutOfRange { bet: 25, min: 1, max: 20 };
        assert_eq!(err.to_string(), "Bet 25 out of range: must be between 1 and 20");
    }
}
