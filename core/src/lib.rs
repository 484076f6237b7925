#![no_std]

extern crate alloc;

use core::ops::{BitOr, Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use observer::*;
pub use types::*;

mod board;
mod cell;
pub mod codec;
mod engine;
mod error;
mod generator;
mod observer;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// `(rows, cols)`
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Checks that the board has at least one cell and at least one cell without a mine.
    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(GameError::InvalidDimensions);
        }
        if self.mines >= self.total_cells() {
            return Err(GameError::TooManyMines);
        }
        Ok(())
    }

    pub const fn beginner() -> Self {
        Self::new_unchecked((9, 9), 10)
    }

    pub const fn intermediate() -> Self {
        Self::new_unchecked((16, 16), 40)
    }

    pub const fn expert() -> Self {
        Self::new_unchecked((16, 30), 99)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::beginner()
    }
}

/// Where the mines are, independent of anything the player did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let (rows, cols) = mine_mask.dim();
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidDimensions);
        }
        if rows > Coord::MAX.into() || cols > Coord::MAX.into() {
            return Err(GameError::InvalidBoardShape);
        }

        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        let layout = Self {
            mine_mask,
            mine_count,
        };
        layout.game_config().validate()?;
        Ok(layout)
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.mine_mask.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.mine_mask
            .iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count() as u8
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_neighbors(coords)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.mine_mask[(row as usize, col as usize)]
    }
}

impl IndexMut<Coord2> for MineLayout {
    fn index_mut(&mut self, (row, col): Coord2) -> &mut Self::Output {
        &mut self.mine_mask[(row as usize, col as usize)]
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OpenOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl OpenOutcome {
    pub const fn has_update(self) -> bool {
        use OpenOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// Used to merge outcomes of several moves
impl BitOr for OpenOutcome {
    type Output = OpenOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use OpenOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Won, _) => Won,
            (_, Won) => Won,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}
