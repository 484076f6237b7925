use ndarray::Array2;
use smallvec::SmallVec;

/// Single coordinate axis used for board rows, columns, and positions.
///
/// One byte per axis, which is also what the binary cell record and the network move message carry.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// At most eight neighbors, kept inline.
pub type Neighbors = SmallVec<[Coord2; 8]>;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        let (rows, cols) = self.dim();
        // dimensions always come from a `Coord2`, so they fit
        let size = (rows as Coord, cols as Coord);
        NeighborIter::new(index, size)
    }
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let (row, col) = coords;
    let (d_row, d_col) = delta;
    let (rows, cols) = bounds;

    let next_row = row.checked_add_signed(d_row)?;
    if next_row >= rows {
        return None;
    }

    let next_col = col.checked_add_signed(d_col)?;
    if next_col >= cols {
        return None;
    }

    Some((next_row, next_col))
}

/// Iterates the grid-adjacent positions of `center`, diagonals included.
///
/// Yields up to eight positions, fewer at edges and corners.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item =
                apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn corner_has_three_neighbors() {
        let neighbors: Vec<_> = NeighborIter::new((0, 0), (3, 3)).collect();
        assert_eq!(neighbors, [(0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn edge_has_five_neighbors() {
        assert_eq!(NeighborIter::new((0, 1), (3, 3)).count(), 5);
        assert_eq!(NeighborIter::new((2, 1), (3, 3)).count(), 5);
    }

    #[test]
    fn interior_has_eight_neighbors() {
        let neighbors: Vec<_> = NeighborIter::new((1, 1), (3, 3)).collect();
        assert_eq!(neighbors.len(), 8);
        assert!(!neighbors.contains(&(1, 1)));
    }

    #[test]
    fn single_cell_has_no_neighbors() {
        assert_eq!(NeighborIter::new((0, 0), (1, 1)).count(), 0);
    }

    #[test]
    fn largest_board_corner_stays_in_bounds() {
        let neighbors: Vec<_> = NeighborIter::new((254, 254), (Coord::MAX, Coord::MAX)).collect();
        assert_eq!(neighbors, [(253, 253), (253, 254), (254, 253)]);
    }
}
