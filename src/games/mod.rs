pub mod dice;
pub mod draw;
pub mod mines;
pub mod round;
pub mod roulette;
pub mod types;
pub mod wheel;

pub use dice::{DiceEngine, DiceRoll};
pub use draw::{DrawSource, HashChainDraws, RngDraws, ScriptedDraws};
pub use mines::{BombTier, Cell, MinesEngine, Reveal};
pub use round::{RoundPhase, RoundReport};
pub use roulette::{RouletteColor, RouletteEngine, RouletteSpin};
pub use types::*;
pub use wheel::{WheelColor, WheelEngine, WheelSpin};
