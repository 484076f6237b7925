use alloc::string::String;
use thiserror::Error;

use crate::Coord2;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board needs at least one row and one column")]
    InvalidDimensions,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
}

pub type Result<T> = core::result::Result<T, GameError>;

/// Failure to rebuild a cell or board from serialized data.
///
/// Distinct from "no data", which decoders report as `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Cell record must be exactly 4 bytes, got {0}")]
    InvalidLength(usize),
    #[error("Mine flag byte must be 0 or 1, got {0}")]
    InvalidMineFlag(u8),
    #[error("Adjacent mine count must be at most 8, got {0}")]
    InvalidAdjacentCount(u8),
    #[error("Malformed cell record: {0}")]
    MalformedRecord(String),
    #[error("Cell {0:?} appears more than once")]
    DuplicateCell(Coord2),
    #[error("Records do not cover the whole board")]
    MissingCells,
    #[error("Stored adjacent mine count does not match the layout at {0:?}")]
    AdjacentCountMismatch(Coord2),
    #[error("Mine at {0:?} is stored as a revealed number")]
    RevealedMine(Coord2),
    #[error("Decoded board is not a valid game: {0}")]
    InvalidConfig(#[from] GameError),
}
