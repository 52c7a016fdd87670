//! Shared game economy: points, experience and the round history.
//!
//! Round engines receive `&mut Economy` for the duration of an action rather
//! than reaching for shared state, so the ledger keeps a single writer.

pub mod history;
pub mod ledger;
pub mod progression;
pub mod stats;

pub use history::{HistoryEntry, HistoryLog};
pub use ledger::Ledger;
pub use progression::{ExperienceState, Progression, DEFAULT_LEVEL_THRESHOLDS};
pub use stats::{GameTally, SessionStats};

use crate::config::EconomyConfig;
use crate::errors::EconomyError;
use crate::games::types::{GameKind, RoundOutcome};
use tracing::info;

#[derive(Debug, Clone)]
pub struct Economy {
    ledger: Ledger,
    progression: Progression,
    history: HistoryLog,
}

impl Economy {
    pub fn new(starting_balance: u64, level_thresholds: Vec<u64>) -> Self {
        Self {
            ledger: Ledger::new(starting_balance),
            progression: Progression::new(level_thresholds),
            history: HistoryLog::new(),
        }
    }

    pub fn from_config(config: &EconomyConfig) -> Self {
        Self::new(config.starting_balance, config.level_thresholds.clone())
    }

    pub fn balance(&self) -> u64 {
        self.ledger.balance()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn experience(&self) -> ExperienceState {
        self.progression.state()
    }

    pub fn stats(&self) -> SessionStats {
        self.history.stats()
    }

    /// Take the stake for a round that is about to resolve.
    pub(crate) fn stake(&mut self, amount: u64) -> Result<u64, EconomyError> {
        self.ledger.debit(amount)
    }

    /// Apply a round's settlement: credit the payout, award experience and
    /// append the one history entry for the round.
    pub(crate) fn settle(
        &mut self,
        game: GameKind,
        bet_amount: u64,
        outcome: &RoundOutcome,
    ) -> HistoryEntry {
        if outcome.won {
            self.ledger.credit(outcome.payout);
        }
        self.progression
            .add_experience(u64::from(outcome.experience_awarded));

        let entry = HistoryEntry::new(
            game,
            outcome.result(),
            outcome.points_delta(bet_amount),
            outcome.experience_awarded,
        );
        info!(
            game = %game,
            result = %entry.result,
            points = entry.points_delta,
            exp = entry.exp_delta,
            balance = self.ledger.balance(),
            "round settled"
        );
        self.history.append(entry.clone());
        entry
    }

    /// Credit without recording a round. Used for rounds that end before
    /// anything happened, which stay out of the history.
    pub(crate) fn settle_unrecorded(&mut self, refund: u64) {
        if refund > 0 {
            self.ledger.credit(refund);
        }
    }

    /// Manual experience grant, used by the profile view.
    pub fn add_experience(&mut self, amount: u64) -> u32 {
        self.progression.add_experience(amount)
    }
}

impl Default for Economy {
    fn default() -> Self {
        Self::from_config(&EconomyConfig::default())
    }
}
