//! Public, serializable views of a game.

use resistance_protocol::{ChatId, PlayerId};
use serde::{Deserialize, Serialize};

use crate::GamePhase;

/// Rounds won by each side so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub resistance: usize,
    pub spies: usize,
}

/// Everything a presentation layer may show the whole chat.
///
/// Secret roles stay out: `spies` is only filled in once the game is over.
/// Individual mission cards are never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub chat_id: ChatId,
    pub creator: PlayerId,
    pub phase: GamePhase,
    /// Seating order, which is also leader order.
    pub players: Vec<PlayerId>,
    pub leader: Option<PlayerId>,
    /// 1-based number of the current round, 0 before the game starts.
    pub round: usize,
    pub party_size: Option<usize>,
    pub required_fails: Option<usize>,
    /// Proposals made in the current round, including the one being voted on.
    pub attempt: usize,
    pub party: Option<Vec<PlayerId>>,
    /// Ballots in for whichever vote is open (party or mission).
    pub ballots_cast: usize,
    pub ballots_expected: usize,
    pub score: Score,
    pub outcome: Option<bool>,
    pub spies: Option<Vec<PlayerId>>,
}
