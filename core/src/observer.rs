use crate::{Coord2, GameStatus};

/// Receives one synchronous notification per cell state transition.
///
/// Consumers re-read the cell through the engine or board to learn its new shown state.
pub trait CellObserver {
    fn on_cell_changed(&mut self, coords: Coord2);

    /// Called once when the session leaves [`GameStatus::InProgress`].
    fn on_status_changed(&mut self, _status: GameStatus) {}
}

/// Observer that ignores every notification.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct NoopObserver;

impl CellObserver for NoopObserver {
    fn on_cell_changed(&mut self, _coords: Coord2) {}
}

impl<F: FnMut(Coord2)> CellObserver for F {
    fn on_cell_changed(&mut self, coords: Coord2) {
        self(coords)
    }
}
