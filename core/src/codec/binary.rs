//! Fixed 4-byte cell records: row, col, adjacent mine count, mine flag.
//!
//! Only the ground truth travels this way, decoded cells are covered.

use alloc::vec::Vec;

use super::assemble;
use crate::*;

pub const CELL_RECORD_LEN: usize = 4;

pub fn encode_cell(cell: &Cell) -> [u8; CELL_RECORD_LEN] {
    let (row, col) = cell.coords();
    [row, col, cell.adjacent_mines(), u8::from(cell.is_mine())]
}

pub fn decode_cell(bytes: &[u8]) -> core::result::Result<Cell, DecodeError> {
    let &[row, col, adjacent_mines, is_mine] = bytes else {
        return Err(DecodeError::InvalidLength(bytes.len()));
    };

    let kind = match is_mine {
        0 => CellKind::Empty,
        1 => CellKind::Mine,
        other => return Err(DecodeError::InvalidMineFlag(other)),
    };
    if adjacent_mines > 8 {
        return Err(DecodeError::InvalidAdjacentCount(adjacent_mines));
    }

    let mut cell = Cell::new((row, col), kind);
    cell.set_adjacent_mines(adjacent_mines);
    Ok(cell)
}

/// Every cell of the board in row-major order.
pub fn encode_board(board: &Board) -> Vec<u8> {
    board.cells().flat_map(encode_cell).collect()
}

/// Rebuilds a covered board. Stored adjacent counts of safe cells must agree with the mines.
pub fn decode_board(bytes: &[u8]) -> core::result::Result<Option<Board>, DecodeError> {
    if bytes.is_empty() {
        return Ok(None);
    }
    if bytes.len() % CELL_RECORD_LEN != 0 {
        return Err(DecodeError::InvalidLength(bytes.len()));
    }

    let cells = bytes
        .chunks_exact(CELL_RECORD_LEN)
        .map(decode_cell)
        .collect::<core::result::Result<Vec<_>, _>>()?;
    let stored: Vec<(Coord2, u8)> = cells
        .iter()
        .filter(|cell| !cell.is_mine())
        .map(|cell| (cell.coords(), cell.adjacent_mines()))
        .collect();

    let board = assemble(cells)?;
    for (coords, adjacent_mines) in stored {
        if board.cell(coords)?.adjacent_mines() != adjacent_mines {
            log::warn!("Rejecting board, adjacent count mismatch at {:?}", coords);
            return Err(DecodeError::AdjacentCountMismatch(coords));
        }
    }
    Ok(Some(board))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_record_layout() {
        let board = Board::from_mine_coords((3, 3), &[(0, 0), (0, 1)]).unwrap();

        assert_eq!(encode_cell(board.cell((1, 1)).unwrap()), [1, 1, 2, 0]);
        assert_eq!(encode_cell(board.cell((0, 1)).unwrap())[3], 1);
    }

    #[test]
    fn decode_single_cell() {
        let cell = decode_cell(&[4, 7, 3, 0]).unwrap();

        assert_eq!(cell.coords(), (4, 7));
        assert_eq!(cell.adjacent_mines(), 3);
        assert!(!cell.is_mine());
        assert_eq!(cell.state(), VisibleState::Covered);
    }

    #[test]
    fn decode_cell_rejects_bad_input() {
        assert_eq!(decode_cell(&[0, 0, 0]), Err(DecodeError::InvalidLength(3)));
        assert_eq!(decode_cell(&[0, 0, 0, 2]), Err(DecodeError::InvalidMineFlag(2)));
        assert_eq!(decode_cell(&[0, 0, 9, 0]), Err(DecodeError::InvalidAdjacentCount(9)));
    }

    #[test]
    fn board_round_trip() {
        let board = Board::generate(
            GameConfig::intermediate(),
            RandomLayoutGenerator::unrestricted(42),
        )
        .unwrap();

        let bytes = encode_board(&board);
        assert_eq!(bytes.len(), 256 * CELL_RECORD_LEN);

        let decoded = decode_board(&bytes).unwrap().unwrap();
        for (original, restored) in board.cells().zip(decoded.cells()) {
            assert_eq!(restored.coords(), original.coords());
            assert_eq!(restored.is_mine(), original.is_mine());
            assert_eq!(restored.adjacent_mines(), original.adjacent_mines());
            assert_eq!(restored.state(), VisibleState::Covered);
        }
        assert_eq!(decoded, board);
    }

    #[test]
    fn empty_input_is_no_data() {
        assert_eq!(decode_board(&[]), Ok(None));
    }

    #[test]
    fn board_rejects_truncated_and_inconsistent_input() {
        let board = Board::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        let mut bytes = encode_board(&board);

        assert_eq!(
            decode_board(&bytes[..7]),
            Err(DecodeError::InvalidLength(7))
        );
        assert_eq!(
            decode_board(&bytes[..12]),
            Err(DecodeError::MissingCells)
        );

        // (1, 1) claims no mines around it
        bytes[14] = 0;
        assert_eq!(
            decode_board(&bytes),
            Err(DecodeError::AdjacentCountMismatch((1, 1)))
        );

        let all_mines = [0u8, 0, 0, 1];
        assert_eq!(
            decode_board(&all_mines),
            Err(DecodeError::InvalidConfig(GameError::TooManyMines))
        );
    }
}
