use serde::{Deserialize, Serialize};
use tracing::info;

/// Default experience needed to leave each level.
pub const DEFAULT_LEVEL_THRESHOLDS: [u64; 5] = [2, 4, 8, 16, 32];

/// Experience and level. Below max level, `experience` is always the
/// remainder inside the current level band.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExperienceState {
    pub experience: u64,
    pub level: u32,
}

/// Converts accumulated experience into levels against a fixed threshold table.
#[derive(Debug, Clone)]
pub struct Progression {
    thresholds: Vec<u64>,
    state: ExperienceState,
}

impl Progression {
    pub fn new(thresholds: Vec<u64>) -> Self {
        Self {
            thresholds,
            state: ExperienceState::default(),
        }
    }

    pub fn state(&self) -> ExperienceState {
        self.state
    }

    pub fn experience(&self) -> u64 {
        self.state.experience
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn thresholds(&self) -> &[u64] {
        &self.thresholds
    }

    pub fn max_level(&self) -> u32 {
        self.thresholds.len() as u32
    }

    pub fn is_max_level(&self) -> bool {
        self.state.level >= self.max_level()
    }

    /// Experience required to leave the current level, `None` at max level.
    pub fn next_level_requirement(&self) -> Option<u64> {
        self.thresholds.get(self.state.level as usize).copied()
    }

    /// Fill of the progress bar, 100 at max level.
    pub fn progress_percent(&self) -> f64 {
        match self.next_level_requirement() {
            Some(requirement) if requirement > 0 => {
                self.state.experience as f64 / requirement as f64 * 100.0
            }
            _ => 100.0,
        }
    }

    /// Add experience and carry into as many level-ups as it covers.
    /// Returns the number of levels gained.
    pub fn add_experience(&mut self, amount: u64) -> u32 {
        let start_level = self.state.level;
        self.state.experience = self.state.experience.saturating_add(amount);

        while let Some(&threshold) = self.thresholds.get(self.state.level as usize) {
            if self.state.experience < threshold {
                break;
            }
            self.state.experience -= threshold;
            self.state.level += 1;
        }

        let gained = self.state.level - start_level;
        if gained > 0 {
            info!(level = self.state.level, experience = self.state.experience, "level up");
        }
        gained
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::new(DEFAULT_LEVEL_THRESHOLDS.to_vec())
    }
}
