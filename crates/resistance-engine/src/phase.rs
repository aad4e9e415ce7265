//! The game's phase state machine.

use serde::{Deserialize, Serialize};

/// The phase a game is in.
///
/// Voting phases close themselves once every expected ballot is in; the
/// `*Results` phases then wait for [`GameInstance::advance`] to move on.
///
/// ```text
/// NotStarted → ProposalPending → PartyVoteInProgress → PartyVoteResults
///                    ↑                                   │   │   │
///                    ├───────────── rejected ────────────┘   │   │
///                    │                                       │   └─ forfeit decides ─→ GameOver
///                    │              approved                 ↓
///                    │    MissionVoteInProgress ←────────────┘
///                    │              ↓
///                    └──── MissionVoteResults ──── decided ──→ GameOver
/// ```
///
/// [`GameInstance::advance`]: crate::GameInstance::advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    NotStarted,
    ProposalPending,
    PartyVoteInProgress,
    PartyVoteResults,
    MissionVoteInProgress,
    MissionVoteResults,
    GameOver,
}

impl GamePhase {
    /// Returns `true` if moving from `self` to `target` is a legal step.
    ///
    /// This is the only place the transition table is written down. Every
    /// phase change in [`GameInstance`](crate::GameInstance) is checked
    /// against it.
    pub fn can_transition_to(self, target: Self) -> bool {
        use GamePhase::*;
        matches!(
            (self, target),
            (NotStarted, ProposalPending)
                | (ProposalPending, PartyVoteInProgress)
                | (PartyVoteInProgress, PartyVoteResults)
                | (PartyVoteResults, ProposalPending)
                | (PartyVoteResults, MissionVoteInProgress)
                | (PartyVoteResults, GameOver)
                | (MissionVoteInProgress, MissionVoteResults)
                | (MissionVoteResults, ProposalPending)
                | (MissionVoteResults, GameOver)
        )
    }

    /// Returns `true` for the phases that only [`advance`] may leave.
    ///
    /// [`advance`]: crate::GameInstance::advance
    pub fn awaits_advance(self) -> bool {
        matches!(
            self,
            Self::NotStarted | Self::PartyVoteResults | Self::MissionVoteResults
        )
    }

    /// Returns `true` while a round is open.
    pub fn is_in_round(self) -> bool {
        !matches!(self, Self::NotStarted | Self::GameOver)
    }

    /// Returns `true` once the game has ended.
    pub fn is_over(self) -> bool {
        matches!(self, Self::GameOver)
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NotStarted => "NotStarted",
            Self::ProposalPending => "ProposalPending",
            Self::PartyVoteInProgress => "PartyVoteInProgress",
            Self::PartyVoteResults => "PartyVoteResults",
            Self::MissionVoteInProgress => "MissionVoteInProgress",
            Self::MissionVoteResults => "MissionVoteResults",
            Self::GameOver => "GameOver",
        };
        f.write_str(name)
    }
}
