//! Aggregate statistics over the session history, as shown on the profile page.

use crate::economy::history::HistoryEntry;
use crate::games::types::GameKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct GameTally {
    pub wins: u64,
    pub losses: u64,
    pub points_earned: i64,
}

impl GameTally {
    pub fn games(&self) -> u64 {
        self.wins + self.losses
    }

    /// Percentage of rounds won, 0 when nothing was played.
    pub fn win_rate(&self) -> f64 {
        match self.games() {
            0 => 0.0,
            n => self.wins as f64 / n as f64 * 100.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionStats {
    pub total_games: u64,
    pub total_wins: u64,
    pub total_losses: u64,
    pub win_rate: f64,
    /// Sum of win payouts. Losses do not subtract.
    pub points_earned: i64,
    /// Per-game tallies in the order each game first appears in history.
    pub per_game: Vec<(GameKind, GameTally)>,
    pub best_game: Option<(GameKind, f64)>,
}

impl SessionStats {
    pub fn from_entries(entries: &[HistoryEntry]) -> Self {
        let mut stats = SessionStats::default();

        for entry in entries {
            stats.total_games += 1;

            let position = match stats.per_game.iter().position(|(game, _)| *game == entry.game) {
                Some(position) => position,
                None => {
                    stats.per_game.push((entry.game, GameTally::default()));
                    stats.per_game.len() - 1
                }
            };
            let tally = &mut stats.per_game[position].1;

            if entry.is_win() {
                stats.total_wins += 1;
                stats.points_earned = stats.points_earned.saturating_add(entry.points_delta);
                tally.wins += 1;
                tally.points_earned = tally.points_earned.saturating_add(entry.points_delta);
            } else {
                stats.total_losses += 1;
                tally.losses += 1;
            }
        }

        if stats.total_games > 0 {
            stats.win_rate = stats.total_wins as f64 / stats.total_games as f64 * 100.0;
        }

        // Strictly greater keeps the earliest game on ties
        let mut best_rate = 0.0;
        for (game, tally) in &stats.per_game {
            let rate = tally.win_rate();
            if rate > best_rate {
                best_rate = rate;
                stats.best_game = Some((*game, rate));
            }
        }

        stats
    }

    pub fn tally(&self, game: GameKind) -> Option<&GameTally> {
        self.per_game
            .iter()
            .find(|(kind, _)| *kind == game)
            .map(|(_, tally)| tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::types::RoundResult;

    fn entry(game: GameKind, won: bool, points: i64) -> HistoryEntry {
        let result = if won { RoundResult::Win } else { RoundResult::Loss };
        HistoryEntry::new(game, result, points, u32::from(won))
    }

    #[test]
    fn test_empty_history() {
        let stats = SessionStats::from_entries(&[]);
        assert_eq!(stats.total_games, 0);
        assert_eq!(stats.win_rate, 0.0);
        assert!(stats.best_game.is_none());
    }

    #[test]
    fn test_totals_and_best_game() {
        let entries = vec![
            entry(GameKind::Dice, true, 202),
            entry(GameKind::Dice, false, -100),
            entry(GameKind::Roulette, true, 200),
            entry(GameKind::Mines, false, -100),
        ];
        let stats = SessionStats::from_entries(&entries);

        assert_eq!(stats.total_games, 4);
        assert_eq!(stats.total_wins, 2);
        assert_eq!(stats.total_losses, 2);
        assert_eq!(stats.win_rate, 50.0);
        assert_eq!(stats.points_earned, 402);
        assert_eq!(stats.best_game, Some((GameKind::Roulette, 100.0)));
        assert_eq!(stats.tally(GameKind::Dice).map(|t| t.games()), Some(2));
        assert_eq!(stats.per_game[0].0, GameKind::Dice);
    }

    #[test]
    fn test_best_game_tie_keeps_first_seen() {
        let entries = vec![
            entry(GameKind::Roulette, true, 200),
            entry(GameKind::Dice, true, 202),
        ];
        let stats = SessionStats::from_entries(&entries);
        assert_eq!(stats.best_game, Some((GameKind::Roulette, 100.0)));
    }

    #[test]
    fn test_all_losses_has_no_best_game() {
        let entries = vec![entry(GameKind::Dice, false, -100)];
        assert!(SessionStats::from_entries(&entries).best_game.is_none());
    }
}
