//! Round lifecycle shared by every game engine.
//!
//! `Idle -> Configuring -> Resolving -> Settled -> Idle`
//!
//! The stake is debited when a round enters `Resolving` and the outcome is
//! fixed at that moment. `finish` applies the settlement exactly once and
//! leaves the engine `Idle` for the next bet.

use crate::economy::{Economy, HistoryEntry};
use crate::errors::{BetError, RoundError};
use crate::games::types::{GameKind, RoundOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoundPhase {
    #[default]
    Idle,
    Configuring,
    Resolving,
    Settled,
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundPhase::Idle => write!(f, "idle"),
            RoundPhase::Configuring => write!(f, "configuring"),
            RoundPhase::Resolving => write!(f, "resolving"),
            RoundPhase::Settled => write!(f, "settled"),
        }
    }
}

/// Pre-flight bet check. Nothing is mutated whatever the result.
pub fn validate_bet(amount: u64, minimum: u64, balance: u64) -> Result<(), BetError> {
    if amount < minimum {
        return Err(BetError::BelowMinimum { amount, minimum });
    }
    if amount > balance {
        return Err(BetError::ExceedsBalance { amount, balance });
    }
    Ok(())
}

/// What a finished round did to the economy.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    pub game: GameKind,
    pub bet_amount: u64,
    pub outcome: RoundOutcome,
    /// `None` for rounds that end before anything happened (Mines only).
    pub entry: Option<HistoryEntry>,
    pub balance_after: u64,
}

/// Phase bookkeeping and settlement plumbing embedded in each engine.
#[derive(Debug, Clone)]
pub(crate) struct RoundCore {
    game: GameKind,
    phase: RoundPhase,
    bet_amount: u64,
    minimum_bet: u64,
    pending: Option<RoundOutcome>,
}

impl RoundCore {
    pub(crate) fn new(game: GameKind, minimum_bet: u64) -> Self {
        Self {
            game,
            phase: RoundPhase::Idle,
            bet_amount: minimum_bet,
            minimum_bet,
            pending: None,
        }
    }

    pub(crate) fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub(crate) fn bet_amount(&self) -> u64 {
        self.bet_amount
    }

    /// Enter `Configuring`, refusing while a round is resolving.
    pub(crate) fn configure(&mut self) -> Result<(), RoundError> {
        if self.phase == RoundPhase::Resolving {
            return Err(RoundError::RoundInProgress(self.game));
        }
        self.phase = RoundPhase::Configuring;
        Ok(())
    }

    pub(crate) fn set_bet_amount(&mut self, amount: u64) -> Result<(), RoundError> {
        self.configure()?;
        self.bet_amount = amount;
        Ok(())
    }

    /// Validate the bet and take the stake. On success the round is `Resolving`
    /// and the caller must fix its outcome with [`RoundCore::resolve`].
    pub(crate) fn begin(
        &mut self,
        economy: &mut Economy,
        selection_ok: bool,
    ) -> Result<(), RoundError> {
        self.configure()?;

        let checked = validate_bet(self.bet_amount, self.minimum_bet, economy.balance())
            .and_then(|_| {
                if selection_ok {
                    Ok(())
                } else {
                    Err(BetError::MissingSelection)
                }
            });
        if let Err(err) = checked {
            warn!(game = %self.game, error = %err, "bet rejected");
            return Err(err.into());
        }

        economy.stake(self.bet_amount)?;
        self.phase = RoundPhase::Resolving;
        debug!(game = %self.game, bet = self.bet_amount, "round resolving");
        Ok(())
    }

    pub(crate) fn resolve(&mut self, outcome: RoundOutcome) {
        self.pending = Some(outcome);
    }

    pub(crate) fn ensure_resolving(&self) -> Result<(), RoundError> {
        if self.phase == RoundPhase::Resolving {
            Ok(())
        } else {
            Err(RoundError::NoActiveRound(self.game))
        }
    }

    /// Apply the pending outcome and record it in the history.
    pub(crate) fn finish(&mut self, economy: &mut Economy) -> Result<RoundReport, RoundError> {
        self.ensure_resolving()?;
        let outcome = self
            .pending
            .take()
            .ok_or(RoundError::NoActiveRound(self.game))?;

        self.phase = RoundPhase::Settled;
        let entry = economy.settle(self.game, self.bet_amount, &outcome);
        self.close();
        Ok(RoundReport {
            game: self.game,
            bet_amount: self.bet_amount,
            outcome,
            entry: Some(entry),
            balance_after: economy.balance(),
        })
    }

    // Settlement applied; the engine is ready for the next bet.
    fn close(&mut self) {
        debug_assert_eq!(self.phase, RoundPhase::Settled);
        self.phase = RoundPhase::Idle;
    }

    /// Close the round without a history entry, crediting `refund`.
    pub(crate) fn finish_unrecorded(
        &mut self,
        economy: &mut Economy,
        refund: u64,
    ) -> Result<RoundReport, RoundError> {
        self.ensure_resolving()?;
        self.pending = None;
        self.phase = RoundPhase::Settled;
        economy.settle_unrecorded(refund);
        debug!(game = %self.game, refund, "round closed without a history entry");
        self.close();

        let outcome = if refund > 0 {
            RoundOutcome::win(refund, 0)
        } else {
            RoundOutcome::loss()
        };
        Ok(RoundReport {
            game: self.game,
            bet_amount: self.bet_amount,
            outcome,
            entry: None,
            balance_after: economy.balance(),
        })
    }
}
