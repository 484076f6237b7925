use alloc::collections::{BTreeSet, VecDeque};
use serde::{Deserialize, Serialize};

use crate::*;

/// Session status. Changes at most once; a restored board that is already solved starts out won.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Target state of a player mark.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    Flag,
    Question,
    Covered,
}

impl Mark {
    const fn action(self) -> CellAction {
        match self {
            Self::Flag => CellAction::SetFlag,
            Self::Question => CellAction::SetQuestioned,
            Self::Covered => CellAction::SetCovered,
        }
    }
}

/// One game session over one board.
///
/// Moves against finished games or cells that cannot take them are silently ignored and reported
/// as `NoChange`; only coordinates outside the board are errors.
#[derive(Clone, Debug)]
pub struct GameEngine<O = NoopObserver> {
    board: Board,
    observer: O,
    status: GameStatus,
    flag_count: CellCount,
    triggered_mine: Option<Coord2>,
}

impl GameEngine<NoopObserver> {
    pub fn without_observer(board: Board) -> Self {
        Self::new(board, NoopObserver)
    }
}

impl<O: CellObserver> GameEngine<O> {
    pub fn new(board: Board, observer: O) -> Self {
        let flag_count = board.count_in_state(VisibleState::Flagged);
        let status = if board.all_safe_cells_revealed() {
            log::debug!("Board is already solved, starting as won");
            GameStatus::Won
        } else {
            GameStatus::InProgress
        };
        Self {
            board,
            observer,
            status,
            flag_count,
            triggered_mine: None,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Ends the session, handing the board back.
    pub fn into_board(self) -> Board {
        self.board
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.board.mine_count()
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    /// Mines minus flags, negative when the player placed too many flags.
    pub fn mines_left(&self) -> isize {
        (self.board.mine_count() as isize) - (self.flag_count as isize)
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<&Cell> {
        self.board.cell(coords)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Opens a cell, cascading through zero-count cells.
    pub fn apply_open(&mut self, coords: Coord2) -> Result<OpenOutcome> {
        let coords = self.board.validate_coords(coords)?;

        if self.status.is_finished() {
            log::debug!("Ignoring open at {:?}, game already ended", coords);
            return Ok(OpenOutcome::NoChange);
        }
        if !self.board.cell(coords)?.is_uncoverable() {
            return Ok(OpenOutcome::NoChange);
        }

        let mut outcome = self.board.open(coords, &mut self.observer)?;
        if outcome == OpenOutcome::HitMine {
            log::debug!("Hit mine at {:?}", coords);
            self.triggered_mine = Some(coords);
            self.end_game(GameStatus::Lost);
            return Ok(OpenOutcome::HitMine);
        }

        let cell = self.board.cell(coords)?;
        log::debug!(
            "Open cell at {:?}, mine count: {}",
            coords,
            cell.adjacent_mines()
        );
        // a restored zero cell shows nothing new itself but may still cascade
        if cell.adjacent_mines() == 0 {
            outcome = outcome | self.flood_fill(coords)?;
        }
        if !outcome.has_update() {
            return Ok(OpenOutcome::NoChange);
        }

        if self.board.all_safe_cells_revealed() {
            self.end_game(GameStatus::Won);
            Ok(OpenOutcome::Won)
        } else {
            Ok(OpenOutcome::Revealed)
        }
    }

    /// Sets a cell to the requested mark and keeps the neighbors' flag counters in sync.
    pub fn apply_mark(&mut self, coords: Coord2, mark: Mark) -> Result<MarkOutcome> {
        let coords = self.board.validate_coords(coords)?;

        if self.status.is_finished() {
            log::debug!("Ignoring mark at {:?}, game already ended", coords);
            return Ok(MarkOutcome::NoChange);
        }

        let was_flagged = self.board.cell(coords)?.state() == VisibleState::Flagged;
        if !self.board.apply(coords, mark.action(), &mut self.observer)? {
            return Ok(MarkOutcome::NoChange);
        }

        match (was_flagged, mark) {
            (false, Mark::Flag) => {
                self.flag_count += 1;
                self.board.increment_adjacent_flags(coords, 1);
            }
            (true, Mark::Question | Mark::Covered) => {
                self.flag_count -= 1;
                self.board.increment_adjacent_flags(coords, -1);
            }
            _ => {}
        }
        Ok(MarkOutcome::Changed)
    }

    /// Debug helper: covers the whole board again without touching the mine layout.
    pub fn cover_all(&mut self) -> MarkOutcome {
        if self.status.is_finished() {
            return MarkOutcome::NoChange;
        }
        let changed = self.board.cover_all(&mut self.observer);
        self.flag_count = 0;
        if changed {
            MarkOutcome::Changed
        } else {
            MarkOutcome::NoChange
        }
    }

    /// Breadth-first cascade from a zero-count cell at `origin`, which is already open.
    fn flood_fill(&mut self, origin: Coord2) -> Result<OpenOutcome> {
        let mut outcome = OpenOutcome::NoChange;
        let mut visited = BTreeSet::from([origin]);
        let mut to_visit: VecDeque<_> = self
            .board
            .neighbors_of(origin)
            .into_iter()
            .filter(|&pos| self.is_cascade_target(pos))
            .collect();
        log::trace!(
            "Starting flood-fill from {:?}, initial neighbors: {:?}",
            origin,
            to_visit
        );

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }
            if !self.is_cascade_target(visit_coords) {
                log::trace!("Skipping cell at {:?}", visit_coords);
                continue;
            }

            outcome = outcome | self.board.open(visit_coords, &mut self.observer)?;
            let cell = self.board.cell(visit_coords)?;
            log::trace!(
                "Flood opened cell at {:?}, mine count: {}",
                visit_coords,
                cell.adjacent_mines()
            );

            // zero cells keep the cascade going, numbered cells bound it
            if cell.adjacent_mines() == 0 {
                let next: Neighbors = self
                    .board
                    .neighbors_of(visit_coords)
                    .into_iter()
                    .filter(|pos| !visited.contains(pos))
                    .filter(|&pos| self.is_cascade_target(pos))
                    .collect();
                to_visit.extend(next);
            }
        }

        Ok(outcome)
    }

    /// Cells a cascade may open: safe and still uncoverable. Flags are respected.
    fn is_cascade_target(&self, coords: Coord2) -> bool {
        self.board
            .cell(coords)
            .is_ok_and(|cell| !cell.is_mine() && cell.is_uncoverable())
    }

    fn end_game(&mut self, status: GameStatus) {
        if self.status.is_finished() {
            return;
        }

        log::debug!("Game ended: {:?}", status);
        self.status = status;
        if status == GameStatus::Lost {
            self.board.game_over(&mut self.observer);
        }
        self.observer.on_status_changed(status);
    }
}
