//! Mines: a 25-cell grid with hidden bombs. Each safe reveal grows the
//! multiplier; the player cashes out or loses the stake on a bomb.

use crate::economy::Economy;
use crate::errors::{BetError, RoundError};
use crate::games::draw::DrawSource;
use crate::games::round::{RoundCore, RoundPhase, RoundReport};
use crate::games::types::{round_payout, GameKind, RoundOutcome};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const GRID_SIZE: usize = 25;

/// Bomb counts offered by the game menu.
pub const BOMB_OPTIONS: [u8; 4] = [3, 9, 16, 24];

pub const DEFAULT_BOMB_COUNT: u8 = 3;

/// Multiplier curve for a bomb count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BombTier {
    pub starting_multiplier: f64,
    pub increment: f64,
}

const BOMB_TIERS: [(u8, BombTier); 4] = [
    (
        3,
        BombTier {
            starting_multiplier: 1.0,
            increment: 0.18,
        },
    ),
    (
        9,
        BombTier {
            starting_multiplier: 1.4,
            increment: 0.25,
        },
    ),
    (
        16,
        BombTier {
            starting_multiplier: 3.5,
            increment: 0.38,
        },
    ),
    (
        24,
        BombTier {
            starting_multiplier: 25.0,
            increment: 1.0,
        },
    ),
];

const FALLBACK_TIER: BombTier = BombTier {
    starting_multiplier: 0.5,
    increment: 0.1,
};

impl BombTier {
    pub fn for_bombs(bombs: u8) -> BombTier {
        BOMB_TIERS
            .iter()
            .find(|(count, _)| *count == bombs)
            .map(|(_, tier)| *tier)
            .unwrap_or(FALLBACK_TIER)
    }
}

/// Check a planned reveal order before any stake is taken: every index must
/// be on the grid and appear once.
pub fn validate_reveals(cells: &[usize]) -> Result<(), RoundError> {
    let mut seen = [false; GRID_SIZE];
    for &index in cells {
        let slot = seen.get_mut(index).ok_or(RoundError::CellOutOfRange {
            index,
            size: GRID_SIZE,
        })?;
        if *slot {
            return Err(RoundError::CellAlreadyRevealed(index));
        }
        *slot = true;
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Cell {
    pub has_bomb: bool,
    pub revealed: bool,
    /// Multiplier reached when this cell was revealed safely.
    pub multiplier: Option<f64>,
}

/// Result of revealing one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Reveal {
    Safe {
        index: usize,
        multiplier: f64,
        potential_payout: u64,
    },
    Bomb {
        index: usize,
        report: RoundReport,
    },
}

#[derive(Debug, Clone)]
pub struct MinesEngine {
    core: RoundCore,
    bomb_count: u8,
    grid: Vec<Cell>,
    multiplier: f64,
    potential_payout: u64,
    safe_reveals: usize,
}

impl MinesEngine {
    pub fn new(minimum_bet: u64) -> Self {
        let tier = BombTier::for_bombs(DEFAULT_BOMB_COUNT);
        Self {
            core: RoundCore::new(GameKind::Mines, minimum_bet),
            bomb_count: DEFAULT_BOMB_COUNT,
            grid: vec![Cell::default(); GRID_SIZE],
            multiplier: tier.starting_multiplier,
            potential_payout: 0,
            safe_reveals: 0,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.core.phase()
    }

    pub fn bet_amount(&self) -> u64 {
        self.core.bet_amount()
    }

    pub fn bomb_count(&self) -> u8 {
        self.bomb_count
    }

    pub fn grid(&self) -> &[Cell] {
        &self.grid
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// What a cash-out would credit right now.
    pub fn potential_payout(&self) -> u64 {
        self.potential_payout
    }

    pub fn safe_reveals(&self) -> usize {
        self.safe_reveals
    }

    pub fn set_bet_amount(&mut self, amount: u64) -> Result<(), RoundError> {
        self.core.set_bet_amount(amount)
    }

    /// Any count in `1..=24` is accepted; counts outside [`BOMB_OPTIONS`] use
    /// the fallback multiplier curve.
    pub fn set_bomb_count(&mut self, bombs: u8) -> Result<(), RoundError> {
        if bombs == 0 || usize::from(bombs) >= GRID_SIZE {
            return Err(BetError::InvalidBombCount(bombs).into());
        }
        self.core.configure()?;
        self.bomb_count = bombs;
        self.multiplier = BombTier::for_bombs(bombs).starting_multiplier;
        Ok(())
    }

    /// Take the stake and lay out a fresh grid.
    pub fn start(
        &mut self,
        economy: &mut Economy,
        draws: &mut dyn DrawSource,
    ) -> Result<(), RoundError> {
        self.core.begin(economy, true)?;

        self.grid = Self::generate_grid(self.bomb_count, draws);
        self.multiplier = BombTier::for_bombs(self.bomb_count).starting_multiplier;
        self.potential_payout = self.core.bet_amount();
        self.safe_reveals = 0;
        debug!(bombs = self.bomb_count, bet = self.core.bet_amount(), "mines grid laid out");
        Ok(())
    }

    // Partial Fisher-Yates over the cell indices; terminates for any draw sequence.
    fn generate_grid(bombs: u8, draws: &mut dyn DrawSource) -> Vec<Cell> {
        let mut positions: Vec<usize> = (0..GRID_SIZE).collect();
        let bombs = usize::from(bombs).min(GRID_SIZE);
        for i in 0..bombs {
            let j = i + draws.next_index(GRID_SIZE - i);
            positions.swap(i, j);
        }

        let mut grid = vec![Cell::default(); GRID_SIZE];
        for &position in &positions[..bombs] {
            grid[position].has_bomb = true;
        }
        grid
    }

    pub fn reveal(&mut self, economy: &mut Economy, index: usize) -> Result<Reveal, RoundError> {
        self.core.ensure_resolving()?;
        let cell = self.grid.get(index).copied().ok_or(RoundError::CellOutOfRange {
            index,
            size: GRID_SIZE,
        })?;
        if cell.revealed {
            return Err(RoundError::CellAlreadyRevealed(index));
        }

        if cell.has_bomb {
            for cell in self.grid.iter_mut().filter(|c| c.has_bomb) {
                cell.revealed = true;
            }
            self.potential_payout = 0;

            let report = if self.safe_reveals > 0 {
                self.core.resolve(RoundOutcome::loss());
                self.core.finish(economy)?
            } else {
                // Nothing was opened: the stake is lost but the round is not recorded
                self.core.finish_unrecorded(economy, 0)?
            };
            debug!(index, safe_reveals = self.safe_reveals, "mines bomb hit");
            return Ok(Reveal::Bomb { index, report });
        }

        let increment = BombTier::for_bombs(self.bomb_count).increment;
        self.multiplier *= 1.0 + increment;
        self.potential_payout = round_payout(self.core.bet_amount(), self.multiplier);
        self.safe_reveals += 1;
        self.grid[index].revealed = true;
        self.grid[index].multiplier = Some(self.multiplier);

        debug!(
            index,
            multiplier = self.multiplier,
            potential = self.potential_payout,
            "mines safe reveal"
        );
        Ok(Reveal::Safe {
            index,
            multiplier: self.multiplier,
            potential_payout: self.potential_payout,
        })
    }

    /// Bank the potential payout. Cashing out before any reveal refunds the
    /// stake and leaves no history entry.
    pub fn cash_out(&mut self, economy: &mut Economy) -> Result<RoundReport, RoundError> {
        self.core.ensure_resolving()?;

        let report = if self.safe_reveals == 0 {
            self.core.finish_unrecorded(economy, self.core.bet_amount())?
        } else {
            self.core.resolve(RoundOutcome::win(
                self.potential_payout,
                GameKind::BASE_WIN_EXPERIENCE,
            ));
            self.core.finish(economy)?
        };
        self.potential_payout = 0;
        Ok(report)
    }
}

impl Default for MinesEngine {
    fn default() -> Self {
        Self::new(100)
    }
}
