use multisweeper_core::Coord2;
use serde::{Deserialize, Serialize};

use crate::*;

pub const MESSAGE_LEN: usize = 3;

const OPEN: u8 = b'C';
const ALTERNATE_MARK: u8 = b'L';
const START_GAME: u8 = b'S';

/// A move as sent over the wire: action byte, row, col.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveMessage {
    Open(Coord2),
    /// Advance the mark of a cell, see [`MarkCycle`]
    AlternateMark(Coord2),
    /// Everyone is connected, play can begin
    StartGame,
}

impl MoveMessage {
    pub fn encode(self) -> [u8; MESSAGE_LEN] {
        match self {
            Self::Open((row, col)) => [OPEN, row, col],
            Self::AlternateMark((row, col)) => [ALTERNATE_MARK, row, col],
            Self::StartGame => [START_GAME, 0, 0],
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let &[action, row, col] = bytes else {
            return Err(ProtocolError::InvalidLength(bytes.len()));
        };

        match action {
            OPEN => Ok(Self::Open((row, col))),
            ALTERNATE_MARK => Ok(Self::AlternateMark((row, col))),
            START_GAME => Ok(Self::StartGame),
            other => Err(ProtocolError::UnknownAction(other)),
        }
    }

    pub fn coords(self) -> Option<Coord2> {
        match self {
            Self::Open(coords) | Self::AlternateMark(coords) => Some(coords),
            Self::StartGame => None,
        }
    }
}
