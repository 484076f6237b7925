use crate::*;
use serde::{Deserialize, Serialize};
pub use random::*;

mod random;

pub trait MineLayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout>;
}

/// How much of the board around the first click is kept free of mines.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum StartTile {
    #[default]
    Random,
    SimpleSafe,
    AlwaysZero,
}
