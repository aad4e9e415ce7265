//! One party proposal and the approve/reject ballot on it.

use resistance_protocol::{PartyBallot, PlayerId};

/// A party proposal and the ballots cast on it.
///
/// Ballots are kept in cast order so they can be revealed the way they came
/// in. Each player votes at most once; [`GameInstance`](crate::GameInstance)
/// checks that before calling [`record`](Self::record).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    party: Vec<PlayerId>,
    ballots: Vec<PartyBallot>,
}

impl Vote {
    pub(crate) fn new(party: Vec<PlayerId>) -> Self {
        Self {
            party,
            ballots: Vec::new(),
        }
    }

    /// The proposed party, in the order the leader named it.
    pub fn party(&self) -> &[PlayerId] {
        &self.party
    }

    /// Returns `true` if `player` is in the proposed party.
    pub fn includes(&self, player: PlayerId) -> bool {
        self.party.contains(&player)
    }

    /// Ballots cast so far, in cast order.
    pub fn ballots(&self) -> &[PartyBallot] {
        &self.ballots
    }

    /// Returns `true` if `player` already voted.
    pub fn has_voted(&self, player: PlayerId) -> bool {
        self.ballots.iter().any(|b| b.player == player)
    }

    pub fn approvals(&self) -> usize {
        self.ballots.iter().filter(|b| b.approve).count()
    }

    pub fn rejections(&self) -> usize {
        self.ballots.len() - self.approvals()
    }

    /// The party is appointed on a strict majority of approvals. A tie rejects.
    pub fn is_approved(&self) -> bool {
        self.approvals() > self.rejections()
    }

    pub(crate) fn record(&mut self, player: PlayerId, approve: bool) {
        debug_assert!(!self.has_voted(player));
        self.ballots.push(PartyBallot { player, approve });
    }
}
