//! Wheel of Fortune: bet on a color, spin a 54-segment wheel.

use crate::economy::Economy;
use crate::errors::RoundError;
use crate::games::draw::DrawSource;
use crate::games::round::{RoundCore, RoundPhase, RoundReport};
use crate::games::types::{GameKind, RoundOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WheelColor {
    Red,
    Black,
    Blue,
    Gold,
}

impl WheelColor {
    pub const ALL: [WheelColor; 4] = [
        WheelColor::Black,
        WheelColor::Red,
        WheelColor::Blue,
        WheelColor::Gold,
    ];

    pub fn multiplier(&self) -> u64 {
        match self {
            WheelColor::Red => 3,
            WheelColor::Black => 2,
            WheelColor::Blue => 5,
            WheelColor::Gold => 50,
        }
    }

    pub fn win_experience(&self) -> u32 {
        match self {
            WheelColor::Gold => 5,
            _ => GameKind::BASE_WIN_EXPERIENCE,
        }
    }
}

impl fmt::Display for WheelColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WheelColor::Red => write!(f, "red"),
            WheelColor::Black => write!(f, "black"),
            WheelColor::Blue => write!(f, "blue"),
            WheelColor::Gold => write!(f, "gold"),
        }
    }
}

impl FromStr for WheelColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red" => Ok(WheelColor::Red),
            "black" => Ok(WheelColor::Black),
            "blue" => Ok(WheelColor::Blue),
            "gold" => Ok(WheelColor::Gold),
            _ => Err(format!("Unknown wheel color: {}", s)),
        }
    }
}

/// Segment colors, clockwise from the pointer at rotation 0.
pub const SEGMENTS: [WheelColor; 54] = {
    use WheelColor::{Black as K, Blue as B, Gold as G, Red as R};
    [
        G, B, //
        K, R, K, R, K, R, K, //
        B, K, B, //
        K, R, K, R, K, R, K, //
        B, K, B, //
        K, R, K, R, K, R, K, R, K, R, K, //
        B, K, B, //
        K, R, K, R, K, R, K, //
        B, K, B, //
        K, R, K, R, K, R, K, //
        B,
    ]
};

/// Every spin turns the wheel at least three full turns.
pub const MIN_SPIN_DEGREES: u64 = 1_080;

pub fn segment_angle() -> f64 {
    360.0 / SEGMENTS.len() as f64
}

/// Segment under the pointer for a cumulative rotation in degrees.
pub fn segment_index(rotation: u64) -> usize {
    let angle = segment_angle();
    let normalized = (rotation % 360) as f64;
    let index = ((360.0 - normalized + angle / 2.0) % 360.0 / angle).floor() as usize;
    index.min(SEGMENTS.len() - 1)
}

/// A resolved spin, kept until [`WheelEngine::finish`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelSpin {
    pub bet_color: WheelColor,
    pub rotation_added: u64,
    /// Cumulative rotation for the animation to end on.
    pub rotation: u64,
    pub segment_index: usize,
    pub landed: WheelColor,
    pub outcome: RoundOutcome,
}

#[derive(Debug, Clone)]
pub struct WheelEngine {
    core: RoundCore,
    bet_color: Option<WheelColor>,
    rotation: u64,
    last_spin: Option<WheelSpin>,
}

impl WheelEngine {
    pub fn new(minimum_bet: u64) -> Self {
        Self {
            core: RoundCore::new(GameKind::WheelOfFortune, minimum_bet),
            bet_color: None,
            rotation: 0,
            last_spin: None,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.core.phase()
    }

    pub fn bet_amount(&self) -> u64 {
        self.core.bet_amount()
    }

    pub fn bet_color(&self) -> Option<WheelColor> {
        self.bet_color
    }

    pub fn rotation(&self) -> u64 {
        self.rotation
    }

    pub fn last_spin(&self) -> Option<&WheelSpin> {
        self.last_spin.as_ref()
    }

    pub fn set_bet_amount(&mut self, amount: u64) -> Result<(), RoundError> {
        self.core.set_bet_amount(amount)
    }

    pub fn select_color(&mut self, color: WheelColor) -> Result<(), RoundError> {
        self.core.configure()?;
        self.bet_color = Some(color);
        Ok(())
    }

    /// Take the stake and fix where the wheel stops.
    pub fn spin(
        &mut self,
        economy: &mut Economy,
        draws: &mut dyn DrawSource,
    ) -> Result<WheelSpin, RoundError> {
        self.core.begin(economy, self.bet_color.is_some())?;
        let bet_color = self.bet_color.ok_or(RoundError::NoActiveRound(GameKind::WheelOfFortune))?;

        let rotation_added = (draws.next_unit() * 360.0).floor() as u64 + MIN_SPIN_DEGREES;
        self.rotation += rotation_added;
        let segment_index = segment_index(self.rotation);
        let landed = SEGMENTS[segment_index];

        let outcome = if landed == bet_color {
            RoundOutcome::win(
                self.core.bet_amount().saturating_mul(landed.multiplier()),
                landed.win_experience(),
            )
        } else {
            RoundOutcome::loss()
        };
        self.core.resolve(outcome);

        let spin = WheelSpin {
            bet_color,
            rotation_added,
            rotation: self.rotation,
            segment_index,
            landed,
            outcome,
        };
        debug!(rotation = self.rotation, segment = segment_index, landed = %landed, "wheel spun");
        self.last_spin = Some(spin);
        Ok(spin)
    }

    pub fn finish(&mut self, economy: &mut Economy) -> Result<RoundReport, RoundError> {
        self.core.finish(economy)
    }

    /// Spin and settle without a presentation pause.
    pub fn play(
        &mut self,
        economy: &mut Economy,
        draws: &mut dyn DrawSource,
    ) -> Result<(WheelSpin, RoundReport), RoundError> {
        let spin = self.spin(economy, draws)?;
        let report = self.finish(economy)?;
        Ok((spin, report))
    }
}

impl Default for WheelEngine {
    fn default() -> Self {
        Self::new(100)
    }
}
