//! Error types for the session layer.

use resistance_engine::GameError;
use resistance_protocol::{ChatId, PlayerId};

/// Errors that can occur while routing commands to games.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No game is running in this chat.
    #[error("there is no game for chat {0}")]
    NotFound(ChatId),

    /// The chat already hosts a game. One game per chat.
    #[error("there already exists a game for chat {0}")]
    AlreadyExists(ChatId),

    /// Only the player who created the game may start or cancel it.
    #[error("player {0} did not create this game")]
    NotCreator(PlayerId),

    /// The game's actor stopped or its command channel closed.
    #[error("game in chat {0} is unavailable")]
    Unavailable(ChatId),

    /// The engine refused the command.
    #[error(transparent)]
    Game(#[from] GameError),
}
