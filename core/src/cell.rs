use serde::{Deserialize, Serialize};

use crate::*;

/// Ground truth of a cell, fixed once the mines are placed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Empty,
    Mine,
}

impl CellKind {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }
}

/// What the player sees for a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibleState {
    #[default]
    Covered,
    RevealedNumber,
    Flagged,
    Questioned,
    /// The mine the player opened, only set when the game is lost
    ExplodedMine,
    /// A mine nobody touched, only set when the game is lost
    Mine,
    /// A flag on a safe cell, only set when the game is lost
    MisflaggedMine,
}

/// Input of the cell state machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellAction {
    Open,
    SetCovered,
    SetFlag,
    SetQuestioned,
    GameOver,
}

impl VisibleState {
    /// States a player mark can be applied to.
    pub const fn is_changeable(self) -> bool {
        matches!(self, Self::Covered | Self::Questioned | Self::Flagged)
    }

    /// States that never change again in the current session.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::ExplodedMine | Self::Mine | Self::MisflaggedMine)
    }

    /// Whether the cell still hides its content.
    pub const fn is_covered(self) -> bool {
        matches!(self, Self::Covered | Self::Flagged | Self::Questioned)
    }

    /// The transition table: the state reached by applying `action` to a cell of `kind`, or `None`
    /// when the action leaves the cell as it is.
    pub const fn transition(self, action: CellAction, kind: CellKind) -> Option<Self> {
        use CellAction::*;
        use VisibleState::*;

        match (action, self) {
            (Open, Covered | Questioned) => Some(match kind {
                CellKind::Mine => ExplodedMine,
                CellKind::Empty => RevealedNumber,
            }),
            (Open, _) => None,

            (SetCovered, Questioned | Flagged) => Some(Covered),
            (SetFlag, Covered | Questioned) => Some(Flagged),
            (SetQuestioned, Covered | Flagged) => Some(Questioned),
            (SetCovered | SetFlag | SetQuestioned, _) => None,

            (GameOver, Flagged) => match kind {
                CellKind::Empty => Some(MisflaggedMine),
                CellKind::Mine => None,
            },
            (GameOver, Covered | Questioned) => Some(match kind {
                CellKind::Mine => Mine,
                CellKind::Empty => RevealedNumber,
            }),
            (GameOver, RevealedNumber | ExplodedMine | Mine | MisflaggedMine) => None,
        }
    }
}

/// One grid position: ground truth plus the state shown to the player.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    coords: Coord2,
    kind: CellKind,
    state: VisibleState,
    adjacent_mines: u8,
    adjacent_flags: u8,
    number_uncovered: bool,
}

impl Cell {
    pub const fn new(coords: Coord2, kind: CellKind) -> Self {
        Self {
            coords,
            kind,
            state: VisibleState::Covered,
            adjacent_mines: 0,
            adjacent_flags: 0,
            number_uncovered: false,
        }
    }

    /// Rebuilds a cell with a given shown state, as read back from a snapshot.
    ///
    /// The number is treated as not yet processed, so opening it again may continue a cascade.
    pub(crate) const fn restored(coords: Coord2, kind: CellKind, state: VisibleState) -> Self {
        Self {
            coords,
            kind,
            state,
            adjacent_mines: 0,
            adjacent_flags: 0,
            number_uncovered: false,
        }
    }

    pub const fn coords(&self) -> Coord2 {
        self.coords
    }

    pub const fn kind(&self) -> CellKind {
        self.kind
    }

    pub const fn is_mine(&self) -> bool {
        self.kind.is_mine()
    }

    pub const fn state(&self) -> VisibleState {
        self.state
    }

    /// Only meaningful for empty cells.
    pub const fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    /// Flags currently placed on neighbors, for hinting.
    pub const fn adjacent_flags(&self) -> u8 {
        self.adjacent_flags
    }

    /// A revealed number with no mines around it.
    pub const fn is_empty_number(&self) -> bool {
        matches!(self.state, VisibleState::RevealedNumber) && self.adjacent_mines == 0
    }

    pub const fn is_changeable(&self) -> bool {
        self.state.is_changeable()
    }

    /// Whether opening this cell can still do anything, including continuing a cascade through a
    /// number that was shown without being opened in this session.
    pub const fn is_uncoverable(&self) -> bool {
        match self.state {
            VisibleState::Covered | VisibleState::Questioned => true,
            VisibleState::RevealedNumber => !self.number_uncovered,
            _ => false,
        }
    }

    pub(crate) fn set_adjacent_mines(&mut self, count: u8) {
        self.adjacent_mines = count;
    }

    pub(crate) fn add_adjacent_flags(&mut self, delta: i8) {
        self.adjacent_flags = self.adjacent_flags.saturating_add_signed(delta);
    }

    /// Opens the cell. Returns whether the shown state changed.
    pub(crate) fn open(&mut self) -> bool {
        if !self.is_uncoverable() {
            return false;
        }
        self.number_uncovered = true;
        self.apply(CellAction::Open)
    }

    /// Applies one action from the transition table. Returns whether the shown state changed.
    pub(crate) fn apply(&mut self, action: CellAction) -> bool {
        match self.state.transition(action, self.kind) {
            Some(next) => {
                self.state = next;
                true
            }
            None => false,
        }
    }

    /// Debug reset: hides a mark or an uncovered number again and forgets neighboring flags.
    /// Terminal states are kept.
    pub(crate) fn reset_cover(&mut self) -> bool {
        self.number_uncovered = false;
        self.adjacent_flags = 0;
        if self.state.is_terminal() || self.state == VisibleState::Covered {
            return false;
        }
        self.state = VisibleState::Covered;
        true
    }
}
