// Service-level errors

use thiserror::Error;

use crate::engine::BoardError;
use crate::store::StoreError;

/// Everything that can go wrong outside the engine's own absorption of bad input
#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("storage: {0}")]
    Store(#[from] StoreError),
    #[error("board: {0}")]
    Board(#[from] BoardError),
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
    #[error("bot {0} is already connected, choose a new name")]
    AlreadyConnected(String),
    #[error("bot {0} is not online")]
    NotOnline(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("match task ended before the game was created")]
    MatchNotStarted,
}

impl ArenaError {
    /// HTTP status code the front end should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            ArenaError::Store(StoreError::GameNotFound(_))
            | ArenaError::Store(StoreError::AiNotFound(_))
            | ArenaError::NotOnline(_) => 404,
            ArenaError::AlreadyConnected(_) => 409,
            ArenaError::InvalidCredentials(_) | ArenaError::BadRequest(_) => 400,
            _ => 500,
        }
    }
}
