//! Move messages exchanged between peers and the glue that feeds them into a game.

use multisweeper_core::GameError;
use thiserror::Error;

pub use message::*;
pub use session::*;

mod message;
mod session;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Move message must be exactly 3 bytes, got {0}")]
    InvalidLength(usize),
    #[error("Unknown move action byte {0:#04x}")]
    UnknownAction(u8),
    #[error(transparent)]
    Game(#[from] GameError),
}

pub type Result<T> = core::result::Result<T, ProtocolError>;
