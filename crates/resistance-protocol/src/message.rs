//! Commands flowing into a game and events flowing out of it.
//!
//! A command layer (chat bot, CLI, test harness) resolves whatever the user
//! typed or tapped into a [`Command`] and hands it to the session registry.
//! The registry answers with a list of `(Recipient, GameEvent)` pairs that a
//! presentation layer turns into text.
//!
//! Both enums are internally tagged so their JSON reads
//! `{ "type": "VoteParty", "approve": true }`.

use serde::{Deserialize, Serialize};

use crate::{PlayerId, Role};

/// A player action addressed to one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Join the game before it starts.
    Register,

    /// Close registration and deal roles. Only the creator may start.
    Start,

    /// The leader nominates a party for the current round.
    ProposeParty { party: Vec<PlayerId> },

    /// Approve or reject the proposed party.
    VoteParty { approve: bool },

    /// A party member plays red (`true`) or black (`false`).
    VoteMission { red: bool },

    /// Ask, privately, for one's own role once the game has started.
    GetRole,
}

/// One player's approve/reject ballot, revealed when a party vote closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyBallot {
    pub player: PlayerId,
    pub approve: bool,
}

/// Something that happened in a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A player joined during registration.
    PlayerRegistered {
        player: PlayerId,
        player_count: usize,
    },

    /// Registration closed and roles were dealt.
    GameStarted {
        players: Vec<PlayerId>,
        spy_count: usize,
    },

    /// Private: the receiving player's role. Spies also learn each other.
    RoleAssigned {
        role: Role,
        fellow_spies: Vec<PlayerId>,
    },

    /// A new round opened. `round` is 1-based.
    RoundStarted {
        round: usize,
        party_size: usize,
        required_fails: usize,
    },

    /// The leader must now pick a party. `attempt` is 1-based and counts
    /// proposals within the current round.
    ProposalRequested {
        leader: PlayerId,
        party_size: usize,
        attempt: usize,
    },

    /// The leader nominated a party; everyone votes on it.
    PartyProposed {
        leader: PlayerId,
        party: Vec<PlayerId>,
    },

    /// Someone voted on the party. The choice stays hidden until the vote closes.
    PartyBallotCast {
        voter: PlayerId,
        cast: usize,
        total: usize,
    },

    /// Every player voted on the party.
    PartyVoteClosed {
        approved: bool,
        ballots: Vec<PartyBallot>,
    },

    /// The party members must now play their mission cards.
    MissionRequested { party: Vec<PlayerId> },

    /// A party member played a card. The color stays hidden.
    MissionBallotCast {
        voter: PlayerId,
        cast: usize,
        total: usize,
    },

    /// Every party member played. `ballots` holds the colors in random
    /// order (`true` = red) so nobody can tell who played what.
    MissionClosed {
        resistance_won: bool,
        ballots: Vec<bool>,
    },

    /// The vote limit was reached; spies take the round without a mission.
    RoundForfeited { round: usize },

    /// One side reached the win threshold.
    GameOver {
        resistance_won: bool,
        spies: Vec<PlayerId>,
    },
}
