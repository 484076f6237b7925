use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// The grid of cells for one game, with its mine layout fixed at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    mine_layout: MineLayout,
    cells: Array2<Cell>,
}

impl Board {
    /// Builds a fully covered board over `mine_layout` and computes every adjacent mine count.
    pub fn new(mine_layout: MineLayout) -> Self {
        let cells = Array2::from_shape_fn(mine_layout.size().to_nd_index(), |(row, col)| {
            let coords = (row as Coord, col as Coord);
            let kind = if mine_layout[coords] {
                CellKind::Mine
            } else {
                CellKind::Empty
            };
            Cell::new(coords, kind)
        });
        let mut board = Self { mine_layout, cells };
        board.compute_adjacent_mines();
        board
    }

    /// Places `config.mines` mines with `generator` and builds the board over them.
    pub fn generate(config: GameConfig, generator: impl MineLayoutGenerator) -> Result<Self> {
        let mine_layout = generator.generate(config)?;
        log::debug!(
            "Generated {}x{} board with {} mines",
            config.size.0,
            config.size.1,
            mine_layout.mine_count()
        );
        Ok(Self::new(mine_layout))
    }

    /// Hand-built board, mostly useful for tests and replays.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        Ok(Self::new(MineLayout::from_mine_coords(size, mine_coords)?))
    }

    /// Rebuilds a board from decoded cells. Every position must be present exactly once.
    pub(crate) fn from_cells(cells: Array2<Cell>) -> Result<Self> {
        let mine_layout = MineLayout::from_mine_mask(cells.map(Cell::is_mine))?;
        let mut board = Self { mine_layout, cells };
        board.compute_adjacent_mines();
        board.compute_adjacent_flags();
        Ok(board)
    }

    fn compute_adjacent_mines(&mut self) {
        let Self { mine_layout, cells } = self;
        for cell in cells.iter_mut().filter(|cell| !cell.is_mine()) {
            cell.set_adjacent_mines(mine_layout.adjacent_mine_count(cell.coords()));
        }
    }

    fn compute_adjacent_flags(&mut self) {
        let flagged: alloc::vec::Vec<Coord2> = self
            .cells
            .iter()
            .filter(|cell| cell.state() == VisibleState::Flagged)
            .map(Cell::coords)
            .collect();
        for coords in flagged {
            self.increment_adjacent_flags(coords, 1);
        }
    }

    pub fn size(&self) -> Coord2 {
        self.mine_layout.size()
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_layout.mine_count()
    }

    pub fn game_config(&self) -> GameConfig {
        self.mine_layout.game_config()
    }

    pub fn mine_layout(&self) -> &MineLayout {
        &self.mine_layout
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        self.mine_layout.validate_coords(coords)
    }

    pub fn cell(&self, coords: Coord2) -> Result<&Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(&self.cells[coords.to_nd_index()])
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// The valid grid-adjacent positions of `coords`, up to eight.
    pub fn neighbors_of(&self, coords: Coord2) -> Neighbors {
        self.mine_layout.iter_neighbors(coords).collect()
    }

    /// Applies `delta` to the adjacent flag counter of every neighbor of `coords`.
    pub fn increment_adjacent_flags(&mut self, coords: Coord2, delta: i8) {
        for pos in self.mine_layout.iter_neighbors(coords) {
            self.cells[pos.to_nd_index()].add_adjacent_flags(delta);
        }
    }

    /// Whether every cell without a mine shows its number.
    pub fn all_safe_cells_revealed(&self) -> bool {
        self.cells
            .iter()
            .filter(|cell| !cell.is_mine())
            .all(|cell| cell.state() == VisibleState::RevealedNumber)
    }

    pub fn count_in_state(&self, state: VisibleState) -> CellCount {
        self.cells.iter().filter(|cell| cell.state() == state).count() as CellCount
    }

    /// Opens one cell, notifying `observer` when its shown state changes.
    pub fn open(
        &mut self,
        coords: Coord2,
        observer: &mut impl CellObserver,
    ) -> Result<OpenOutcome> {
        let coords = self.validate_coords(coords)?;
        let cell = &mut self.cells[coords.to_nd_index()];
        if !cell.open() {
            return Ok(OpenOutcome::NoChange);
        }

        observer.on_cell_changed(coords);
        Ok(match cell.state() {
            VisibleState::ExplodedMine => OpenOutcome::HitMine,
            _ => OpenOutcome::Revealed,
        })
    }

    /// Applies a state machine action to one cell, notifying `observer` when its shown state
    /// changes. Returns whether it changed.
    pub fn apply(
        &mut self,
        coords: Coord2,
        action: CellAction,
        observer: &mut impl CellObserver,
    ) -> Result<bool> {
        let coords = self.validate_coords(coords)?;
        let changed = self.cells[coords.to_nd_index()].apply(action);
        if changed {
            observer.on_cell_changed(coords);
        }
        Ok(changed)
    }

    /// End of game sweep: shows the whole board and marks wrong flags.
    pub fn game_over(&mut self, observer: &mut impl CellObserver) {
        for cell in self.cells.iter_mut() {
            if cell.apply(CellAction::GameOver) {
                observer.on_cell_changed(cell.coords());
            }
        }
    }

    /// Debug helper: covers every cell again, the mine layout stays as it is.
    /// Returns whether any cell changed.
    pub fn cover_all(&mut self, observer: &mut impl CellObserver) -> bool {
        let mut changed = false;
        for cell in self.cells.iter_mut() {
            if cell.reset_cover() {
                observer.on_cell_changed(cell.coords());
                changed = true;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn adjacent(board: &Board, coords: Coord2) -> u8 {
        board.cell(coords).unwrap().adjacent_mines()
    }

    #[test]
    fn mine_count_matches_layout() {
        let board = Board::generate(
            GameConfig::intermediate(),
            RandomLayoutGenerator::unrestricted(11),
        )
        .unwrap();

        assert_eq!(board.cells().filter(|cell| cell.is_mine()).count(), 40);
        assert_eq!(board.mine_count(), 40);
        assert_eq!(board.cells().count(), 256);
    }

    #[test]
    fn adjacent_counts_on_hand_built_grid() {
        // * . .
        // . . *
        // . . .
        // * . .
        let board = Board::from_mine_coords((4, 3), &[(0, 0), (1, 2), (3, 0)]).unwrap();

        assert_eq!(adjacent(&board, (0, 1)), 2);
        assert_eq!(adjacent(&board, (0, 2)), 1);
        assert_eq!(adjacent(&board, (1, 0)), 1);
        assert_eq!(adjacent(&board, (1, 1)), 2);
        assert_eq!(adjacent(&board, (2, 0)), 1);
        assert_eq!(adjacent(&board, (2, 1)), 2);
        assert_eq!(adjacent(&board, (2, 2)), 1);
        assert_eq!(adjacent(&board, (3, 1)), 1);
        assert_eq!(adjacent(&board, (3, 2)), 0);
    }

    #[test]
    fn adjacent_counts_match_neighbors_everywhere() {
        let board =
            Board::generate(GameConfig::expert(), RandomLayoutGenerator::unrestricted(5)).unwrap();

        for cell in board.cells().filter(|cell| !cell.is_mine()) {
            let expected = board
                .neighbors_of(cell.coords())
                .iter()
                .filter(|&&pos| board.cell(pos).unwrap().is_mine())
                .count() as u8;
            assert_eq!(cell.adjacent_mines(), expected);
        }
    }

    #[test]
    fn neighbors_of_corner_and_center() {
        let board = Board::from_mine_coords((3, 3), &[]).unwrap();
        assert_eq!(board.neighbors_of((2, 2)).as_slice(), &[(1, 1), (1, 2), (2, 1)]);
        assert_eq!(board.neighbors_of((1, 1)).len(), 8);
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        let mut board = Board::from_mine_coords((2, 2), &[]).unwrap();
        assert_eq!(board.cell((2, 0)).err(), Some(GameError::InvalidCoords));
        assert_eq!(
            board.open((0, 2), &mut NoopObserver),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn adjacent_flags_follow_increments() {
        let mut board = Board::from_mine_coords((3, 3), &[(1, 1)]).unwrap();
        board.increment_adjacent_flags((0, 0), 1);
        board.increment_adjacent_flags((0, 1), 1);

        assert_eq!(board.cell((1, 1)).unwrap().adjacent_flags(), 2);
        assert_eq!(board.cell((0, 2)).unwrap().adjacent_flags(), 1);
        assert_eq!(board.cell((2, 2)).unwrap().adjacent_flags(), 0);

        board.increment_adjacent_flags((0, 0), -1);
        assert_eq!(board.cell((1, 1)).unwrap().adjacent_flags(), 1);
    }

    #[test]
    fn open_notifies_only_on_change() {
        let mut board = Board::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        let mut seen = Vec::new();
        let mut record = |coords: Coord2| seen.push(coords);

        assert_eq!(board.open((1, 1), &mut record), Ok(OpenOutcome::Revealed));
        assert_eq!(board.open((1, 1), &mut record), Ok(OpenOutcome::NoChange));
        assert_eq!(board.open((0, 0), &mut record), Ok(OpenOutcome::HitMine));
        assert_eq!(seen, [(1, 1), (0, 0)]);
    }

    #[test]
    fn cover_all_keeps_layout() {
        let mut board = Board::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        let mut observer = NoopObserver;
        board.open((1, 1), &mut observer).unwrap();
        board.apply((0, 0), CellAction::SetFlag, &mut observer).unwrap();
        board.increment_adjacent_flags((0, 0), 1);

        assert!(board.cover_all(&mut observer));
        assert!(!board.cover_all(&mut observer));

        assert_eq!(board.count_in_state(VisibleState::Covered), 4);
        assert!(board.cell((0, 0)).unwrap().is_mine());
        assert_eq!(board.cell((1, 1)).unwrap().adjacent_mines(), 1);
        assert_eq!(board.cell((1, 1)).unwrap().adjacent_flags(), 0);
    }
}
