//! Roulette: 36 alternating red/black slots plus one green slot.

use crate::economy::Economy;
use crate::errors::RoundError;
use crate::games::draw::DrawSource;
use crate::games::round::{RoundCore, RoundPhase, RoundReport};
use crate::games::types::{GameKind, RoundOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub const COLOR_PAIRS: usize = 18;
pub const SLOT_COUNT: usize = COLOR_PAIRS * 2 + 1;

/// The strip stops with the landing slot this many slots past the drawn target.
const POINTER_OFFSET: usize = 4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RouletteColor {
    Red,
    Black,
    Green,
}

impl RouletteColor {
    pub fn multiplier(&self) -> u64 {
        match self {
            RouletteColor::Red | RouletteColor::Black => 2,
            RouletteColor::Green => 36,
        }
    }
}

impl fmt::Display for RouletteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouletteColor::Red => write!(f, "red"),
            RouletteColor::Black => write!(f, "black"),
            RouletteColor::Green => write!(f, "green"),
        }
    }
}

impl FromStr for RouletteColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red" => Ok(RouletteColor::Red),
            "black" => Ok(RouletteColor::Black),
            "green" => Ok(RouletteColor::Green),
            _ => Err(format!("Unknown roulette color: {}", s)),
        }
    }
}

/// Red/black pairs with green inserted at a drawn position.
pub fn generate_layout(draws: &mut dyn DrawSource) -> Vec<RouletteColor> {
    let mut layout = Vec::with_capacity(SLOT_COUNT);
    for _ in 0..COLOR_PAIRS {
        layout.push(RouletteColor::Red);
        layout.push(RouletteColor::Black);
    }
    let green_index = draws.next_index(layout.len());
    layout.insert(green_index, RouletteColor::Green);
    layout
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouletteSpin {
    pub bet_color: RouletteColor,
    /// Slot the strip animation scrolls to.
    pub target_slot: usize,
    pub landing_slot: usize,
    pub landed: RouletteColor,
    pub outcome: RoundOutcome,
}

#[derive(Debug, Clone)]
pub struct RouletteEngine {
    core: RoundCore,
    layout: Vec<RouletteColor>,
    bet_color: Option<RouletteColor>,
    last_spin: Option<RouletteSpin>,
}

impl RouletteEngine {
    /// The layout is fixed for the lifetime of the engine.
    pub fn new(minimum_bet: u64, draws: &mut dyn DrawSource) -> Self {
        let layout = generate_layout(draws);
        debug!(
            green = layout.iter().position(|c| *c == RouletteColor::Green),
            "roulette layout generated"
        );
        Self {
            core: RoundCore::new(GameKind::Roulette, minimum_bet),
            layout,
            bet_color: None,
            last_spin: None,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.core.phase()
    }

    pub fn bet_amount(&self) -> u64 {
        self.core.bet_amount()
    }

    pub fn bet_color(&self) -> Option<RouletteColor> {
        self.bet_color
    }

    pub fn layout(&self) -> &[RouletteColor] {
        &self.layout
    }

    pub fn last_spin(&self) -> Option<&RouletteSpin> {
        self.last_spin.as_ref()
    }

    pub fn set_bet_amount(&mut self, amount: u64) -> Result<(), RoundError> {
        self.core.set_bet_amount(amount)
    }

    pub fn select_color(&mut self, color: RouletteColor) -> Result<(), RoundError> {
        self.core.configure()?;
        self.bet_color = Some(color);
        Ok(())
    }

    pub fn spin(
        &mut self,
        economy: &mut Economy,
        draws: &mut dyn DrawSource,
    ) -> Result<RouletteSpin, RoundError> {
        self.core.begin(economy, self.bet_color.is_some())?;
        let bet_color = self.bet_color.ok_or(RoundError::NoActiveRound(GameKind::Roulette))?;

        let target_slot = draws.next_index(self.layout.len());
        let landing_slot = (target_slot + POINTER_OFFSET) % self.layout.len();
        let landed = self.layout[landing_slot];

        let outcome = if landed == bet_color {
            RoundOutcome::win(
                self.core.bet_amount().saturating_mul(landed.multiplier()),
                GameKind::BASE_WIN_EXPERIENCE,
            )
        } else {
            RoundOutcome::loss()
        };
        self.core.resolve(outcome);

        let spin = RouletteSpin {
            bet_color,
            target_slot,
            landing_slot,
            landed,
            outcome,
        };
        debug!(slot = landing_slot, landed = %landed, "roulette spun");
        self.last_spin = Some(spin);
        Ok(spin)
    }

    pub fn finish(&mut self, economy: &mut Economy) -> Result<RoundReport, RoundError> {
        self.core.finish(economy)
    }

    pub fn play(
        &mut self,
        economy: &mut Economy,
        draws: &mut dyn DrawSource,
    ) -> Result<(RouletteSpin, RoundReport), RoundError> {
        let spin = self.spin(economy, draws)?;
        let report = self.finish(economy)?;
        Ok((spin, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BetError;
    use crate::games::draw::{RngDraws, ScriptedDraws};

    // Green lands in slot 0 of the layout
    fn green_first() -> RouletteEngine {
        RouletteEngine::new(100, &mut ScriptedDraws::new([0.0]))
    }

    #[test]
    fn test_layout() {
        let mut draws = RngDraws::seeded(11);
        for _ in 0..50 {
            let layout = generate_layout(&mut draws);
            assert_eq!(layout.len(), SLOT_COUNT);
            let count = |color| layout.iter().filter(|c| **c == color).count();
            assert_eq!(count(RouletteColor::Green), 1);
            assert_eq!(count(RouletteColor::Red), 18);
            assert_eq!(count(RouletteColor::Black), 18);
        }

        let engine = green_first();
        assert_eq!(engine.layout()[0], RouletteColor::Green);
        assert_eq!(engine.layout()[1], RouletteColor::Red);
    }

    #[test]
    fn test_green_pays_36x() {
        let mut economy = Economy::default();
        let mut engine = green_first();
        engine.select_color(RouletteColor::Green).expect("color");

        // Target 33 plus the pointer offset wraps to slot 0
        let draw = 33.5 / SLOT_COUNT as f64;
        let (spin, report) = engine
            .play(&mut economy, &mut ScriptedDraws::new([draw]))
            .expect("spin");
        assert_eq!(spin.landing_slot, 0);
        assert_eq!(spin.landed, RouletteColor::Green);
        assert_eq!(report.outcome, RoundOutcome::win(3_600, 1));
        assert_eq!(economy.balance(), 13_500);
    }

    #[test]
    fn test_red_pays_2x_and_wrong_color_loses() {
        let mut economy = Economy::default();
        let mut engine = green_first();
        engine.select_color(RouletteColor::Red).expect("color");
        engine.set_bet_amount(250).expect("bet");

        // Target 0 lands on slot 4: green, red, black, red, black
        let (spin, report) = engine
            .play(&mut economy, &mut ScriptedDraws::new([0.0]))
            .expect("spin");
        assert_eq!(spin.landed, RouletteColor::Black);
        assert_eq!(report.entry.map(|e| e.points_delta), Some(-250));

        // Target 1 lands on slot 5, red
        let draw = 1.5 / SLOT_COUNT as f64;
        let (spin, report) = engine
            .play(&mut economy, &mut ScriptedDraws::new([draw]))
            .expect("spin");
        assert_eq!(spin.landed, RouletteColor::Red);
        assert_eq!(report.outcome.payout, 500);
        assert_eq!(economy.balance(), 10_000);
    }

    #[test]
    fn test_spin_requires_color() {
        let mut economy = Economy::default();
        let mut engine = green_first();
        assert_eq!(
            engine.spin(&mut economy, &mut ScriptedDraws::new([0.0])),
            Err(RoundError::InvalidBet(BetError::MissingSelection))
        );
        assert!(engine.last_spin().is_none());
    }

    #[test]
    fn test_green_frequency() {
        let spins: u64 = 20_000;
        let mut economy = Economy::new(100 * spins, vec![2]);
        let mut draws = RngDraws::seeded(2024);
        let mut engine = RouletteEngine::new(100, &mut draws);
        engine.select_color(RouletteColor::Green).expect("color");

        let mut greens = 0u64;
        for _ in 0..spins {
            let (spin, _) = engine.play(&mut economy, &mut draws).expect("spin");
            if spin.landed == RouletteColor::Green {
                greens += 1;
            }
        }
        let frequency = greens as f64 / spins as f64;
        assert!((frequency - 1.0 / 37.0).abs() < 0.006, "green frequency {frequency}");
    }
}
