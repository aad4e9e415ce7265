//! Unified error type for the Resistance crates.

use resistance_engine::GameError;
use resistance_session::SessionError;

/// Top-level error that wraps every crate-specific error.
///
/// Through the `resistance` facade you deal with this one type instead of
/// importing errors from each sub-crate. `?` converts sub-crate errors
/// automatically.
#[derive(Debug, thiserror::Error)]
pub enum ResistanceError {
    /// The engine refused a player action.
    #[error(transparent)]
    Game(#[from] GameError),

    /// The command could not be routed to a game, or was refused.
    #[error(transparent)]
    Session(#[from] SessionError),
}
