//! Dice: roll in `[0, 100)` and win when the roll reaches the roll-over target.

use crate::economy::Economy;
use crate::errors::{BetError, RoundError};
use crate::games::draw::DrawSource;
use crate::games::round::{RoundCore, RoundPhase, RoundReport};
use crate::games::types::{round_payout, GameKind, RoundOutcome};
use tracing::debug;

pub const MIN_ROLL_OVER: f64 = 1.0;
pub const MAX_ROLL_OVER: f64 = 99.0;
pub const DEFAULT_ROLL_OVER: f64 = 50.5;

/// Percent chance that a roll reaches `roll_over`.
pub fn win_chance(roll_over: f64) -> f64 {
    100.0 - roll_over
}

/// Payout multiplier shown to the player, rounded to two decimals.
pub fn multiplier(roll_over: f64) -> f64 {
    (100.0 / win_chance(roll_over) * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiceRoll {
    pub roll_over: f64,
    pub multiplier: f64,
    /// Value in `[0, 100)`.
    pub roll: f64,
    pub outcome: RoundOutcome,
}

#[derive(Debug, Clone)]
pub struct DiceEngine {
    core: RoundCore,
    roll_over: f64,
    last_roll: Option<DiceRoll>,
}

impl DiceEngine {
    pub fn new(minimum_bet: u64) -> Self {
        Self {
            core: RoundCore::new(GameKind::Dice, minimum_bet),
            roll_over: DEFAULT_ROLL_OVER,
            last_roll: None,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.core.phase()
    }

    pub fn bet_amount(&self) -> u64 {
        self.core.bet_amount()
    }

    pub fn roll_over(&self) -> f64 {
        self.roll_over
    }

    pub fn multiplier(&self) -> f64 {
        multiplier(self.roll_over)
    }

    pub fn win_chance(&self) -> f64 {
        win_chance(self.roll_over)
    }

    pub fn last_roll(&self) -> Option<&DiceRoll> {
        self.last_roll.as_ref()
    }

    pub fn set_bet_amount(&mut self, amount: u64) -> Result<(), RoundError> {
        self.core.set_bet_amount(amount)
    }

    pub fn set_roll_over(&mut self, roll_over: f64) -> Result<(), RoundError> {
        if !(MIN_ROLL_OVER..=MAX_ROLL_OVER).contains(&roll_over) {
            return Err(BetError::InvalidRollOver(roll_over).into());
        }
        self.core.configure()?;
        self.roll_over = roll_over;
        Ok(())
    }

    pub fn roll(
        &mut self,
        economy: &mut Economy,
        draws: &mut dyn DrawSource,
    ) -> Result<DiceRoll, RoundError> {
        self.core.begin(economy, true)?;

        let roll = draws.next_unit() * 100.0;
        let multiplier = self.multiplier();
        let outcome = if roll >= self.roll_over {
            RoundOutcome::win(
                round_payout(self.core.bet_amount(), multiplier),
                GameKind::BASE_WIN_EXPERIENCE,
            )
        } else {
            RoundOutcome::loss()
        };
        self.core.resolve(outcome);

        let result = DiceRoll {
            roll_over: self.roll_over,
            multiplier,
            roll,
            outcome,
        };
        debug!(roll, roll_over = self.roll_over, won = outcome.won, "dice rolled");
        self.last_roll = Some(result);
        Ok(result)
    }

    pub fn finish(&mut self, economy: &mut Economy) -> Result<RoundReport, RoundError> {
        self.core.finish(economy)
    }

    pub fn play(
        &mut self,
        economy: &mut Economy,
        draws: &mut dyn DrawSource,
    ) -> Result<(DiceRoll, RoundReport), RoundError> {
        let roll = self.roll(economy, draws)?;
        let report = self.finish(economy)?;
        Ok((roll, report))
    }
}

impl Default for DiceEngine {
    fn default() -> Self {
        Self::new(100)
    }
}
