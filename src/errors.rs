//! Error types for the minicasino economy and round engines
//!
//! Every failure a caller can observe is recoverable: a rejected bet or action
//! leaves all state untouched, so callers surface the message and carry on.

use crate::games::types::GameKind;
use thiserror::Error;

/// Root error type for all minicasino operations
#[derive(Debug, Error)]
pub enum CasinoError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Ledger and progression errors
    #[error("Economy error: {0}")]
    Economy(#[from] EconomyError),

    /// Round engine errors, including rejected bets
    #[error("Round error: {0}")]
    Round(#[from] RoundError),

    /// Navigation errors from the session shell
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Preference store errors
    #[error("Preference error: {0}")]
    Preference(#[from] PreferenceError),
}

/// Configuration and validation errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Seed is not valid hex: {0}")]
    SeedNotHex(#[from] hex::FromHexError),

    #[error("Seed must be 32 bytes (got {0})")]
    SeedLength(usize),
}

/// Ledger errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EconomyError {
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: u64, available: u64 },
}

/// Bet validation failures. Raised before any state is mutated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BetError {
    #[error("You must bet at least {minimum} points (got {amount})")]
    BelowMinimum { amount: u64, minimum: u64 },

    #[error("Not enough points: bet {amount}, balance {balance}")]
    ExceedsBalance { amount: u64, balance: u64 },

    #[error("You must select a color to bet on")]
    MissingSelection,

    #[error("Roll over must be between 1 and 99 (got {0})")]
    InvalidRollOver(f64),

    #[error("Bomb count must be between 1 and 24 (got {0})")]
    InvalidBombCount(u8),
}

/// Round engine state machine errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoundError {
    #[error("Invalid bet: {0}")]
    InvalidBet(#[from] BetError),

    #[error("A {0} round is still resolving")]
    RoundInProgress(GameKind),

    #[error("No {0} round is active")]
    NoActiveRound(GameKind),

    #[error("Cell {index} is outside the {size}-cell grid")]
    CellOutOfRange { index: usize, size: usize },

    #[error("Cell {0} is already revealed")]
    CellAlreadyRevealed(usize),

    #[error(transparent)]
    Economy(#[from] EconomyError),
}

/// Session shell routing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("{0} is not the open game")]
    GameNotOpen(GameKind),
}

/// Preference store errors
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Preference file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preference file is corrupted: {0}")]
    Corrupted(#[from] serde_json::Error),
}

// Convenience type alias for Results
pub type CasinoResult<T> = Result<T, CasinoError>;

impl RoundError {
    /// True when the failure is a pre-flight bet rejection.
    pub fn is_invalid_bet(&self) -> bool {
        matches!(self, RoundError::InvalidBet(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let config_error = ConfigurationError::LoadFailed("test".to_string());
        let casino_error = CasinoError::Configuration(config_error);

        assert!(casino_error.to_string().contains("Configuration error"));
        assert!(casino_error.to_string().contains("test"));
    }

    #[test]
    fn test_insufficient_funds_details() {
        let err = EconomyError::InsufficientFunds {
            requested: 500,
            available: 120,
        };

        assert!(err.to_string().contains("requested 500"));
        assert!(err.to_string().contains("available 120"));
    }

    #[test]
    fn test_bet_error_conversion() {
        let round_error: RoundError = BetError::MissingSelection.into();
        assert!(round_error.is_invalid_bet());

        let casino_error: CasinoError = round_error.into();
        match casino_error {
            CasinoError::Round(RoundError::InvalidBet(BetError::MissingSelection)) => {}
            other => panic!("Expected missing selection, got {other:?}"),
        }
    }

    #[test]
    fn test_seed_error_conversion() {
        let err: ConfigurationError = hex::decode("zz").unwrap_err().into();
        assert!(matches!(err, ConfigurationError::SeedNotHex(_)));

        let casino_error: CasinoError = ConfigurationError::SeedLength(2).into();
        assert!(casino_error.to_string().contains("32 bytes (got 2)"));
    }

    #[test]
    fn test_error_source() {
        let casino_error = CasinoError::Session(SessionError::GameNotOpen(GameKind::Dice));
        assert!(casino_error.source().is_some());
    }
}
