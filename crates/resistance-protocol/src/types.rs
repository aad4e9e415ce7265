//! Identity and addressing types shared across the Resistance crates.
//!
//! Nothing in here knows about game rules. These are the nouns the engine,
//! the session registry, and any command or presentation layer agree on.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// Wraps the platform user id. Two players are the same player exactly when
/// their ids match; display names never take part in comparisons, which is
/// why the engine stores `PlayerId`s and nothing else about a user.
///
/// `#[serde(transparent)]` keeps the JSON shape a plain number, so
/// `PlayerId(42)` becomes `42` rather than `{"0":42}`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// The session key of a game: one chat hosts at most one game.
///
/// Signed because chat platforms commonly use negative ids for group chats.
/// Displays as `C` followed by the signed id: `C-1001` for a group chat,
/// `C100` for a private one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Recipient — who should see an event?
// ---------------------------------------------------------------------------

/// Specifies who should receive an event.
///
/// Most of the game is public, but role assignment is not: each spy learns
/// who the other spies are, and nobody else learns anything. The registry
/// pairs every event with a `Recipient` so the presentation layer can route
/// private information to a single player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Everyone in the chat.
    All,

    /// One specific player, privately.
    Player(PlayerId),
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// The secret side a player is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Resistance members may only play red on a mission.
    Resistance,
    /// Spies may play either color.
    Spy,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resistance => write!(f, "Resistance member"),
            Self::Spy => write!(f, "Spy"),
        }
    }
}
