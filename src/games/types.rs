use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported game types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    Mines,
    WheelOfFortune,
    Dice,
    Roulette,
}

impl GameKind {
    pub const ALL: [GameKind; 4] = [
        GameKind::Mines,
        GameKind::WheelOfFortune,
        GameKind::Dice,
        GameKind::Roulette,
    ];

    /// Identifier used by the menu to route to this game.
    pub fn view_id(&self) -> &'static str {
        match self {
            GameKind::Mines => "MineSweeper",
            GameKind::WheelOfFortune => "WheelOfFortune",
            GameKind::Dice => "Dice",
            GameKind::Roulette => "Roulette",
        }
    }

    /// Win experience for every game except the wheel, which pays more for gold.
    pub(crate) const BASE_WIN_EXPERIENCE: u32 = 1;
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameKind::Mines => write!(f, "Mine Sweeper"),
            GameKind::WheelOfFortune => write!(f, "Wheel Of Fortune"),
            GameKind::Dice => write!(f, "Dice"),
            GameKind::Roulette => write!(f, "Roulette"),
        }
    }
}

impl FromStr for GameKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "mines" | "minesweeper" => Ok(GameKind::Mines),
            "wheel" | "wheeloffortune" => Ok(GameKind::WheelOfFortune),
            "dice" => Ok(GameKind::Dice),
            "roulette" => Ok(GameKind::Roulette),
            _ => Err(format!("Unknown game: {}", s)),
        }
    }
}

/// Round result as recorded in the history log
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoundResult {
    Win,
    Loss,
}

impl fmt::Display for RoundResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundResult::Win => write!(f, "win"),
            RoundResult::Loss => write!(f, "loss"),
        }
    }
}

/// Settlement of a single round, derived from the draw alone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundOutcome {
    pub won: bool,
    /// Points credited back to the ledger. Zero on a loss.
    pub payout: u64,
    pub experience_awarded: u32,
}

impl RoundOutcome {
    pub fn win(payout: u64, experience_awarded: u32) -> Self {
        Self {
            won: true,
            payout,
            experience_awarded,
        }
    }

    pub fn loss() -> Self {
        Self {
            won: false,
            payout: 0,
            experience_awarded: 0,
        }
    }

    pub fn result(&self) -> RoundResult {
        if self.won {
            RoundResult::Win
        } else {
            RoundResult::Loss
        }
    }

    /// Signed history delta: the payout on a win, minus the stake on a loss.
    pub fn points_delta(&self, bet_amount: u64) -> i64 {
        if self.won {
            i64::try_from(self.payout).unwrap_or(i64::MAX)
        } else {
            -i64::try_from(bet_amount).unwrap_or(i64::MAX)
        }
    }
}

/// Round payouts are whole points: `bet × multiplier` rounded half away from zero.
pub fn round_payout(bet_amount: u64, multiplier: f64) -> u64 {
    let raw = (bet_amount as f64 * multiplier).round();
    if raw <= 0.0 {
        0
    } else if raw >= u64::MAX as f64 {
        u64::MAX
    } else {
        raw as u64
    }
}

/// Splits a camel-cased view id into words: `MineSweeper` -> `Mine Sweeper`.
pub fn format_game_name(view_id: &str) -> String {
    let mut name = String::with_capacity(view_id.len() + 4);
    for c in view_id.chars() {
        if c.is_ascii_uppercase() {
            name.push(' ');
        }
        name.push(c);
    }
    name.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_kind_display_matches_history_names() {
        assert_eq!(GameKind::Mines.to_string(), "Mine Sweeper");
        assert_eq!(GameKind::WheelOfFortune.to_string(), "Wheel Of Fortune");
        assert_eq!(GameKind::Dice.to_string(), "Dice");
    }

    #[test]
    fn test_game_kind_parse() {
        assert_eq!("mine-sweeper".parse::<GameKind>(), Ok(GameKind::Mines));
        assert_eq!("Wheel".parse::<GameKind>(), Ok(GameKind::WheelOfFortune));
        assert!("blackjack".parse::<GameKind>().is_err());
    }

    #[test]
    fn test_points_delta() {
        assert_eq!(RoundOutcome::win(202, 1).points_delta(100), 202);
        assert_eq!(RoundOutcome::loss().points_delta(100), -100);
    }

    #[test]
    fn test_round_payout() {
        assert_eq!(round_payout(100, 2.02), 202);
        assert_eq!(round_payout(100, 1.18), 118);
        assert_eq!(round_payout(250, 1.0 * 1.18 * 1.18), 348);
        assert_eq!(round_payout(0, 50.0), 0);
    }

    #[test]
    fn test_format_game_name() {
        assert_eq!(format_game_name("MineSweeper"), "Mine Sweeper");
        assert_eq!(format_game_name("WheelOfFortune"), "Wheel Of Fortune");
        assert_eq!(format_game_name("Dice"), "Dice");
        assert_eq!(format_game_name(""), "");
    }
}
