//! Error types for the rules engine.

use resistance_protocol::PlayerId;

use crate::GamePhase;

/// Why the engine refused an operation.
///
/// Every variant is an expected, recoverable condition: the game state is
/// exactly what it was before the call. Turning these into user-facing text
/// is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    // -- Phase violations --
    /// `advance` was called in a phase that only a vote can leave.
    #[error("phase {0} is left automatically, not by advance")]
    InvalidTransition(GamePhase),

    /// Registration is only open before the game starts.
    #[error("can't register for an already started game")]
    RegistrationClosed,

    #[error("party proposal not pending")]
    PartyNotPending,

    #[error("party vote not in progress")]
    VoteNotInProgress,

    #[error("mission vote not in progress")]
    MissionNotInProgress,

    /// Roles are only dealt once the game starts.
    #[error("game is not started yet")]
    NotStarted,

    // -- Authorization violations --
    #[error("only the leader can propose a party")]
    NotLeader,

    #[error("only party members can vote on the mission")]
    NotPartyMember,

    #[error("only spies can play black")]
    ResistanceCannotPlayBlack,

    // -- Identity violations --
    /// The acting user is not a player of this game.
    #[error("player {0} is not registered")]
    NotRegistered(PlayerId),

    /// A proposed party member is not a player of this game.
    #[error("can't propose non-registered player {0}")]
    UnknownPlayer(PlayerId),

    #[error("player {0} is already registered")]
    AlreadyRegistered(PlayerId),

    #[error("player {0} already voted")]
    DuplicateVote(PlayerId),

    #[error("player {0} appears twice in the party")]
    DuplicatePartyMember(PlayerId),

    // -- Input-shape violations --
    #[error("party must have {expected} members, got {got}")]
    WrongPartySize { expected: usize, got: usize },

    /// Starting needs 5 to 10 players.
    #[error("the number of players must be between 5 and 10, got {0}")]
    InvalidPlayerCount(usize),

    /// The spy selector did not name `expected` distinct players of this game.
    #[error("spy selection must name {expected} distinct players of this game")]
    InvalidSpySelection { expected: usize },
}
