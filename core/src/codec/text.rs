//! Save-state records, one JSON object per cell and one cell per line.
//!
//! ```text
//! {"row":0,"col":1,"isMine":false,"isFlag":true,"isQuestionMark":false,"isCovered":true}
//! ```
//!
//! Adjacent mine counts are not stored, they are recomputed from the mines when a board is
//! restored.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

use super::assemble;
use crate::*;

/// One persisted cell. The shown-state fields are not exclusive in hostile input, see
/// [`CellRecord::visible_state`] for the precedence.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRecord {
    pub row: Coord,
    pub col: Coord,
    pub is_mine: bool,
    pub is_flag: bool,
    pub is_question_mark: bool,
    pub is_covered: bool,
}

impl CellRecord {
    pub fn from_cell(cell: &Cell) -> Self {
        let (row, col) = cell.coords();
        let state = cell.state();
        Self {
            row,
            col,
            is_mine: cell.is_mine(),
            is_flag: state == VisibleState::Flagged,
            is_question_mark: state == VisibleState::Questioned,
            is_covered: state != VisibleState::RevealedNumber,
        }
    }

    /// Flag wins over question mark, which wins over the covered bit.
    pub fn visible_state(&self) -> VisibleState {
        if self.is_flag {
            VisibleState::Flagged
        } else if self.is_question_mark {
            VisibleState::Questioned
        } else if self.is_covered {
            VisibleState::Covered
        } else {
            VisibleState::RevealedNumber
        }
    }

    pub fn to_cell(&self) -> core::result::Result<Cell, DecodeError> {
        let coords = (self.row, self.col);
        let state = self.visible_state();
        let kind = if self.is_mine {
            CellKind::Mine
        } else {
            CellKind::Empty
        };
        if kind.is_mine() && state == VisibleState::RevealedNumber {
            return Err(DecodeError::RevealedMine(coords));
        }
        Ok(Cell::restored(coords, kind, state))
    }
}

impl fmt::Display for CellRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

pub fn encode_cell(cell: &Cell) -> String {
    CellRecord::from_cell(cell).to_string()
}

/// Parses a single record. Blank input is no data.
pub fn decode_cell(text: &str) -> core::result::Result<Option<Cell>, DecodeError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    parse_record(text)?.to_cell().map(Some)
}

fn parse_record(text: &str) -> core::result::Result<CellRecord, DecodeError> {
    serde_json::from_str(text).map_err(|err| {
        log::warn!("Save data has a syntax error: {}", text);
        DecodeError::MalformedRecord(err.to_string())
    })
}

/// Every cell of the board in row-major order, one record per line.
pub fn encode_board(board: &Board) -> String {
    let mut text = String::new();
    for cell in board.cells() {
        text.push_str(&encode_cell(cell));
        text.push('\n');
    }
    text
}

/// Rebuilds a board from its records. Blank input is no data; any malformed record fails the
/// whole board.
pub fn decode_board(text: &str) -> core::result::Result<Option<Board>, DecodeError> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    let cells = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| parse_record(line)?.to_cell())
        .collect::<core::result::Result<Vec<_>, _>>()?;

    assemble(cells).map(Some)
}
