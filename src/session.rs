//! Session shell: navigation between views and routing of game actions.
//!
//! The session owns the economy, one engine per game and the draw source.
//! Engines live as long as the session, so leaving a game mid-round and
//! coming back finds the round where it was left.

use crate::config::CasinoConfig;
use crate::economy::{Economy, ExperienceState, HistoryLog, Progression, SessionStats};
use crate::errors::{RoundError, SessionError};
use crate::games::dice::{DiceEngine, DiceRoll};
use crate::games::draw::{DrawSource, HashChainDraws};
use crate::games::mines::{MinesEngine, Reveal};
use crate::games::round::RoundReport;
use crate::games::roulette::{RouletteEngine, RouletteSpin};
use crate::games::types::{format_game_name, GameKind};
use crate::games::wheel::{WheelEngine, WheelSpin};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum View {
    /// Landing page
    #[default]
    Menu,
    Game(GameKind),
    Profile,
    History,
    /// Placeholder behind the "Deposit" menu item
    ComingSoon,
}

impl View {
    /// Menu identifier, `None` for the landing page.
    pub fn id(&self) -> Option<&'static str> {
        match self {
            View::Menu => None,
            View::Game(game) => Some(game.view_id()),
            View::Profile => Some("Profile"),
            View::History => Some("History"),
            View::ComingSoon => Some("ToBeImplemented"),
        }
    }

    /// Heading shown above the view. The landing page and the placeholder have none.
    pub fn title(&self) -> Option<String> {
        match self {
            View::Menu | View::ComingSoon => None,
            other => other.id().map(format_game_name),
        }
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Menu" | "" => Ok(View::Menu),
            "Profile" => Ok(View::Profile),
            "History" => Ok(View::History),
            "ToBeImplemented" | "Deposit" => Ok(View::ComingSoon),
            other => other.parse::<GameKind>().map(View::Game),
        }
    }
}

pub struct Session {
    config: CasinoConfig,
    economy: Economy,
    view: View,
    mines: MinesEngine,
    wheel: WheelEngine,
    dice: DiceEngine,
    roulette: RouletteEngine,
    draws: Box<dyn DrawSource>,
}

impl Session {
    pub fn new(config: CasinoConfig, mut draws: Box<dyn DrawSource>) -> Self {
        let minimum_bet = config.economy.minimum_bet;
        let roulette = RouletteEngine::new(minimum_bet, draws.as_mut());
        Self {
            economy: Economy::from_config(&config.economy),
            view: View::Menu,
            mines: MinesEngine::new(minimum_bet),
            wheel: WheelEngine::new(minimum_bet),
            dice: DiceEngine::new(minimum_bet),
            roulette,
            draws,
            config,
        }
    }

    /// Session drawing from a freshly seeded hash chain.
    pub fn with_random_seed(config: CasinoConfig) -> Self {
        Self::new(config, Box::new(HashChainDraws::random()))
    }

    pub fn config(&self) -> &CasinoConfig {
        &self.config
    }

    pub fn open(&mut self, view: View) {
        if self.view != view {
            debug!(from = ?self.view, to = ?view, "view changed");
        }
        self.view = view;
    }

    pub fn active_view(&self) -> View {
        self.view
    }

    pub fn display_title(&self) -> Option<String> {
        self.view.title()
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn balance(&self) -> u64 {
        self.economy.balance()
    }

    pub fn experience(&self) -> ExperienceState {
        self.economy.experience()
    }

    pub fn progression(&self) -> &Progression {
        self.economy.progression()
    }

    pub fn history(&self) -> &HistoryLog {
        self.economy.history()
    }

    pub fn stats(&self) -> SessionStats {
        self.economy.stats()
    }

    /// Experience granted from the profile page. Returns levels gained.
    pub fn grant_experience(&mut self, amount: u64) -> u32 {
        self.economy.add_experience(amount)
    }

    pub fn mines_engine(&self) -> &MinesEngine {
        &self.mines
    }

    pub fn wheel_engine(&self) -> &WheelEngine {
        &self.wheel
    }

    pub fn dice_engine(&self) -> &DiceEngine {
        &self.dice
    }

    pub fn roulette_engine(&self) -> &RouletteEngine {
        &self.roulette
    }

    fn ensure_open(&self, game: GameKind) -> Result<(), SessionError> {
        if self.view == View::Game(game) {
            Ok(())
        } else {
            Err(SessionError::GameNotOpen(game))
        }
    }

    pub fn mines(&mut self) -> Result<GameTable<'_, MinesEngine>, SessionError> {
        self.ensure_open(GameKind::Mines)?;
        Ok(GameTable::new(&mut self.mines, &mut self.economy, self.draws.as_mut()))
    }

    pub fn wheel(&mut self) -> Result<GameTable<'_, WheelEngine>, SessionError> {
        self.ensure_open(GameKind::WheelOfFortune)?;
        Ok(GameTable::new(&mut self.wheel, &mut self.economy, self.draws.as_mut()))
    }

    pub fn dice(&mut self) -> Result<GameTable<'_, DiceEngine>, SessionError> {
        self.ensure_open(GameKind::Dice)?;
        Ok(GameTable::new(&mut self.dice, &mut self.economy, self.draws.as_mut()))
    }

    pub fn roulette(&mut self) -> Result<GameTable<'_, RouletteEngine>, SessionError> {
        self.ensure_open(GameKind::Roulette)?;
        Ok(GameTable::new(&mut self.roulette, &mut self.economy, self.draws.as_mut()))
    }
}

/// The open game's engine together with the economy and draws it plays against.
///
/// Configuration methods reach the engine through `Deref`; round actions are
/// inherent methods that supply the economy and draw source.
pub struct GameTable<'a, E> {
    engine: &'a mut E,
    economy: &'a mut Economy,
    draws: &'a mut dyn DrawSource,
}

impl<'a, E> GameTable<'a, E> {
    fn new(engine: &'a mut E, economy: &'a mut Economy, draws: &'a mut dyn DrawSource) -> Self {
        Self {
            engine,
            economy,
            draws,
        }
    }

    pub fn balance(&self) -> u64 {
        self.economy.balance()
    }
}

impl<E> Deref for GameTable<'_, E> {
    type Target = E;

    fn deref(&self) -> &E {
        &*self.engine
    }
}

impl<E> DerefMut for GameTable<'_, E> {
    fn deref_mut(&mut self) -> &mut E {
        &mut *self.engine
    }
}

impl GameTable<'_, MinesEngine> {
    pub fn start(&mut self) -> Result<(), RoundError> {
        self.engine.start(self.economy, self.draws)
    }

    pub fn reveal(&mut self, index: usize) -> Result<Reveal, RoundError> {
        self.engine.reveal(self.economy, index)
    }

    pub fn cash_out(&mut self) -> Result<RoundReport, RoundError> {
        self.engine.cash_out(self.economy)
    }
}

impl GameTable<'_, WheelEngine> {
    pub fn spin(&mut self) -> Result<WheelSpin, RoundError> {
        self.engine.spin(self.economy, self.draws)
    }

    pub fn finish(&mut self) -> Result<RoundReport, RoundError> {
        self.engine.finish(self.economy)
    }

    pub fn play(&mut self) -> Result<(WheelSpin, RoundReport), RoundError> {
        self.engine.play(self.economy, self.draws)
    }
}

impl GameTable<'_, DiceEngine> {
    pub fn roll(&mut self) -> Result<DiceRoll, RoundError> {
        self.engine.roll(self.economy, self.draws)
    }

    pub fn finish(&mut self) -> Result<RoundReport, RoundError> {
        self.engine.finish(self.economy)
    }

    pub fn play(&mut self) -> Result<(DiceRoll, RoundReport), RoundError> {
        self.engine.play(self.economy, self.draws)
    }
}

impl GameTable<'_, RouletteEngine> {
    pub fn spin(&mut self) -> Result<RouletteSpin, RoundError> {
        self.engine.spin(self.economy, self.draws)
    }

    pub fn finish(&mut self) -> Result<RoundReport, RoundError> {
        self.engine.finish(self.economy)
    }

    pub fn play(&mut self) -> Result<(RouletteSpin, RoundReport), RoundError> {
        self.engine.play(self.economy, self.draws)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::draw::ScriptedDraws;
    use crate::games::round::RoundPhase;

    fn session(draws: impl IntoIterator<Item = f64>) -> Session {
        Session::new(CasinoConfig::testing(), Box::new(ScriptedDraws::new(draws)))
    }

    #[test]
    fn test_view_titles() {
        assert_eq!(View::Game(GameKind::Mines).title().as_deref(), Some("Mine Sweeper"));
        assert_eq!(
            View::Game(GameKind::WheelOfFortune).title().as_deref(),
            Some("Wheel Of Fortune")
        );
        assert_eq!(View::Profile.title().as_deref(), Some("Profile"));
        assert_eq!(View::Menu.title(), None);
        assert_eq!(View::ComingSoon.title(), None);
    }

    #[test]
    fn test_view_parse() {
        assert_eq!("MineSweeper".parse::<View>(), Ok(View::Game(GameKind::Mines)));
        assert_eq!("Deposit".parse::<View>(), Ok(View::ComingSoon));
        assert_eq!("History".parse::<View>(), Ok(View::History));
        assert!("Poker".parse::<View>().is_err());
    }

    #[test]
    fn test_actions_only_reach_open_game() {
        let mut session = session([0.0]);
        assert_eq!(session.active_view(), View::Menu);
        assert!(matches!(
            session.dice(),
            Err(SessionError::GameNotOpen(GameKind::Dice))
        ));

        session.open(View::Game(GameKind::Roulette));
        assert!(session.dice().is_err());
        assert!(session.roulette().is_ok());
    }

    #[test]
    fn test_mines_round_survives_navigation() {
        // First draw lays out roulette, the next three place the bombs on 0..3
        let mut session = session([0.0, 0.0, 0.0, 0.0]);
        session.open(View::Game(GameKind::Mines));
        {
            let mut table = session.mines().expect("open");
            table.start().expect("start");
            table.reveal(12).expect("safe");
        }

        session.open(View::History);
        assert_eq!(session.display_title().as_deref(), Some("History"));
        assert_eq!(session.mines_engine().phase(), RoundPhase::Resolving);

        session.open(View::Game(GameKind::Mines));
        let report = session.mines().expect("open").cash_out().expect("cash out");
        assert_eq!(report.outcome.payout, 118);
        assert_eq!(session.balance(), 10_018);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_grant_experience() {
        let mut session = session(Vec::new());
        assert_eq!(session.grant_experience(6), 2);
        assert_eq!(session.experience(), ExperienceState { experience: 0, level: 2 });
    }
}
