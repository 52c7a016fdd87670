use crate::economy::stats::SessionStats;
use crate::games::types::{GameKind, RoundResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One settled round. Never mutated after it is appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub round_id: Uuid,
    pub game: GameKind,
    pub result: RoundResult,
    /// Payout on a win, minus the stake on a loss.
    pub points_delta: i64,
    pub exp_delta: u32,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(game: GameKind, result: RoundResult, points_delta: i64, exp_delta: u32) -> Self {
        Self {
            round_id: Uuid::new_v4(),
            game,
            result,
            points_delta,
            exp_delta,
            timestamp: Utc::now(),
        }
    }

    pub fn is_win(&self) -> bool {
        self.result == RoundResult::Win
    }
}

/// Append-only, insertion-ordered record of settled rounds.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Every entry, oldest first.
    pub fn list(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats::from_entries(&self.entries)
    }
}
