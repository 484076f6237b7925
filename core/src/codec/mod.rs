//! Board snapshots as bytes or text.
//!
//! Both forms hold one record per cell. Decoders report an absent or blank input as `Ok(None)` and
//! anything they cannot turn into a complete, consistent board as a [`DecodeError`].

use alloc::vec::Vec;
use ndarray::Array2;

use crate::*;

pub mod binary;
pub mod text;

/// Lays decoded cells out as a grid. The grid size is taken from the largest coordinates, and every
/// position in it must appear exactly once.
fn assemble(mut cells: Vec<Cell>) -> core::result::Result<Board, DecodeError> {
    cells.sort_by_key(Cell::coords);

    let rows = cells.iter().map(|cell| usize::from(cell.coords().0)).max();
    let cols = cells.iter().map(|cell| usize::from(cell.coords().1)).max();
    let (Some(rows), Some(cols)) = (rows, cols) else {
        return Err(DecodeError::MissingCells);
    };
    let (rows, cols) = (rows + 1, cols + 1);

    if let Some(pair) = cells.windows(2).find(|pair| pair[0].coords() == pair[1].coords()) {
        return Err(DecodeError::DuplicateCell(pair[1].coords()));
    }
    if cells.len() != rows * cols {
        return Err(DecodeError::MissingCells);
    }

    let grid = Array2::from_shape_vec((rows, cols), cells).map_err(|_| DecodeError::MissingCells)?;
    Ok(Board::from_cells(grid)?)
}
