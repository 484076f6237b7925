use multisweeper_core::{
    CellObserver, GameEngine, Mark, MarkOutcome, NoopObserver, OpenOutcome, VisibleState,
};
use serde::{Deserialize, Serialize};

use crate::*;

/// Local policy for the "alternate mark" move: covered → flag → question mark → covered.
///
/// Without question marks a flag goes straight back to covered.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkCycle {
    pub use_question: bool,
}

impl MarkCycle {
    pub const fn new(use_question: bool) -> Self {
        Self { use_question }
    }

    /// The mark that follows `state`, `None` when the cell takes no marks.
    pub const fn next(self, state: VisibleState) -> Option<Mark> {
        match state {
            VisibleState::Covered => Some(Mark::Flag),
            VisibleState::Flagged if self.use_question => Some(Mark::Question),
            VisibleState::Flagged => Some(Mark::Covered),
            VisibleState::Questioned => Some(Mark::Covered),
            _ => None,
        }
    }
}

impl Default for MarkCycle {
    fn default() -> Self {
        Self::new(true)
    }
}

/// What applying one message did.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SessionEvent {
    StartRequested,
    Opened(OpenOutcome),
    Marked(MarkOutcome),
}

impl SessionEvent {
    pub const fn has_update(self) -> bool {
        match self {
            Self::StartRequested => false,
            Self::Opened(outcome) => outcome.has_update(),
            Self::Marked(outcome) => outcome.has_update(),
        }
    }
}

/// Applies local and remote moves to one game, one at a time.
#[derive(Debug)]
pub struct Session<O = NoopObserver> {
    engine: GameEngine<O>,
    cycle: MarkCycle,
}

impl<O: CellObserver> Session<O> {
    pub fn new(engine: GameEngine<O>, cycle: MarkCycle) -> Self {
        Self { engine, cycle }
    }

    pub fn engine(&self) -> &GameEngine<O> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut GameEngine<O> {
        &mut self.engine
    }

    pub fn into_engine(self) -> GameEngine<O> {
        self.engine
    }

    pub fn apply(&mut self, message: MoveMessage) -> Result<SessionEvent> {
        let event = match message {
            MoveMessage::StartGame => SessionEvent::StartRequested,
            MoveMessage::Open(coords) => SessionEvent::Opened(self.engine.apply_open(coords)?),
            MoveMessage::AlternateMark(coords) => {
                let state = self.engine.cell_at(coords)?.state();
                match self.cycle.next(state) {
                    Some(mark) => SessionEvent::Marked(self.engine.apply_mark(coords, mark)?),
                    None => SessionEvent::Marked(MarkOutcome::NoChange),
                }
            }
        };

        if !event.has_update() {
            log::debug!("Message {:?} had no effect", message);
        }
        Ok(event)
    }

    /// Decodes a received message and applies it.
    pub fn apply_bytes(&mut self, bytes: &[u8]) -> Result<SessionEvent> {
        let message = MoveMessage::decode(bytes).inspect_err(|err| {
            log::warn!("Dropping undecodable move message {:?}: {}", bytes, err);
        })?;
        self.apply(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multisweeper_core::{Board, Coord2, GameError, GameStatus};

    fn session(size: Coord2, mines: &[Coord2], cycle: MarkCycle) -> Session {
        let board = Board::from_mine_coords(size, mines).unwrap();
        Session::new(GameEngine::without_observer(board), cycle)
    }

    fn state(session: &Session, coords: Coord2) -> VisibleState {
        session.engine().cell_at(coords).unwrap().state()
    }

    #[test]
    fn cycle_order() {
        let cycle = MarkCycle::default();
        assert_eq!(cycle.next(VisibleState::Covered), Some(Mark::Flag));
        assert_eq!(cycle.next(VisibleState::Flagged), Some(Mark::Question));
        assert_eq!(cycle.next(VisibleState::Questioned), Some(Mark::Covered));
        assert_eq!(cycle.next(VisibleState::RevealedNumber), None);

        let no_question = MarkCycle::new(false);
        assert_eq!(no_question.next(VisibleState::Flagged), Some(Mark::Covered));
    }

    #[test]
    fn alternate_mark_walks_the_cycle() {
        let mut session = session((2, 2), &[(0, 0)], MarkCycle::default());
        let mark = MoveMessage::AlternateMark((0, 0));

        session.apply(mark).unwrap();
        assert_eq!(state(&session, (0, 0)), VisibleState::Flagged);
        assert_eq!(session.engine().flag_count(), 1);

        session.apply(mark).unwrap();
        assert_eq!(state(&session, (0, 0)), VisibleState::Questioned);
        assert_eq!(session.engine().flag_count(), 0);

        session.apply(mark).unwrap();
        assert_eq!(state(&session, (0, 0)), VisibleState::Covered);
    }

    #[test]
    fn remote_bytes_drive_the_game() {
        let mut session = session((1, 2), &[(0, 0)], MarkCycle::default());

        assert_eq!(
            session.apply_bytes(b"S\x00\x00"),
            Ok(SessionEvent::StartRequested)
        );
        assert_eq!(
            session.apply_bytes(&MoveMessage::Open((0, 1)).encode()),
            Ok(SessionEvent::Opened(OpenOutcome::Won))
        );
        assert_eq!(session.engine().status(), GameStatus::Won);
    }

    #[test]
    fn stale_moves_are_absorbed() {
        let mut session = session((2, 2), &[(0, 0)], MarkCycle::default());
        session.apply(MoveMessage::Open((1, 1))).unwrap();

        assert_eq!(
            session.apply(MoveMessage::Open((1, 1))),
            Ok(SessionEvent::Opened(OpenOutcome::NoChange))
        );
        assert_eq!(
            session.apply(MoveMessage::AlternateMark((1, 1))),
            Ok(SessionEvent::Marked(MarkOutcome::NoChange))
        );
    }

    #[test]
    fn bad_messages_are_errors() {
        let mut session = session((2, 2), &[(0, 0)], MarkCycle::default());

        assert_eq!(
            session.apply_bytes(b"Q\x00\x00"),
            Err(ProtocolError::UnknownAction(b'Q'))
        );
        assert_eq!(
            session.apply(MoveMessage::Open((5, 5))),
            Err(ProtocolError::Game(GameError::InvalidCoords))
        );
        assert_eq!(
            session.apply(MoveMessage::AlternateMark((0, 5))),
            Err(ProtocolError::Game(GameError::InvalidCoords))
        );
    }
}
