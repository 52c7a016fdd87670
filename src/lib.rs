//! minicasino - points-based casino mini-games
//!
//! A shared economy (point ledger, experience levels and round history) played
//! against by four round engines: Mines, Wheel of Fortune, Dice and Roulette.
//! A [`session::Session`] ties them together behind view navigation.

pub mod config;
pub mod economy;
pub mod errors;
pub mod games;
pub mod preferences;
pub mod session;

pub use config::{CasinoConfig, ConfigLoader};
pub use economy::{Economy, HistoryEntry, HistoryLog, Ledger, Progression, SessionStats};
pub use errors::{CasinoError, CasinoResult};
pub use games::{DrawSource, GameKind, HashChainDraws, RoundOutcome, RoundResult, ScriptedDraws};
pub use preferences::PreferenceStore;
pub use session::{GameTable, Session, View};
