//! One round: up to five party proposals, then the mission ballot.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;
use resistance_protocol::PlayerId;

use crate::Vote;
use crate::rules::VOTE_LIMIT;

/// A round of play.
///
/// The round's numbers (`party_size`, `required_fails`) are fixed when it
/// opens. Its outcome is always derived from the ballots it holds, never
/// stored, so it can't go stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    player_count: usize,
    party_size: usize,
    required_fails: usize,
    proposals: Vec<Vote>,
    mission_ballots: HashMap<PlayerId, bool>,
}

impl Round {
    pub(crate) fn new(player_count: usize, party_size: usize, required_fails: usize) -> Self {
        Self {
            player_count,
            party_size,
            required_fails,
            proposals: Vec::with_capacity(VOTE_LIMIT),
            mission_ballots: HashMap::with_capacity(party_size),
        }
    }

    /// Players the leader must put on the party.
    pub fn party_size(&self) -> usize {
        self.party_size
    }

    /// Black cards the spies need to take this round.
    pub fn required_fails(&self) -> usize {
        self.required_fails
    }

    /// Every proposal made this round, oldest first.
    pub fn proposals(&self) -> &[Vote] {
        &self.proposals
    }

    /// The most recent proposal, if any.
    pub fn last_vote(&self) -> Option<&Vote> {
        self.proposals.last()
    }

    /// Returns `true` while another proposal may still be made.
    pub fn can_propose(&self) -> bool {
        self.proposals.len() < VOTE_LIMIT
    }

    /// Returns `true` once every player has voted on `vote`.
    pub fn is_vote_closed(&self, vote: &Vote) -> bool {
        vote.ballots().len() >= self.player_count
    }

    /// The vote limit was reached and the last proposal was rejected too.
    ///
    /// Approval on the final attempt still sends the party on its mission.
    /// Some tables score the round for the spies as soon as a fifth proposal
    /// exists, whatever its vote; here only a rejected fifth proposal
    /// forfeits.
    pub fn is_forfeited(&self) -> bool {
        match self.last_vote() {
            Some(last) if !self.can_propose() => {
                self.is_vote_closed(last) && !last.is_approved()
            }
            _ => false,
        }
    }

    /// Returns `true` if `player` already played a mission card.
    pub fn has_played(&self, player: PlayerId) -> bool {
        self.mission_ballots.contains_key(&player)
    }

    /// Mission cards played so far.
    pub fn mission_ballot_count(&self) -> usize {
        self.mission_ballots.len()
    }

    pub fn is_mission_complete(&self) -> bool {
        self.mission_ballots.len() >= self.party_size
    }

    /// Black cards played so far.
    pub fn fail_count(&self) -> usize {
        self.mission_ballots.values().filter(|red| !**red).count()
    }

    /// `Some(true)` if the resistance took the round, `Some(false)` if the
    /// spies did, `None` while it is undecided.
    pub fn outcome(&self) -> Option<bool> {
        if self.is_forfeited() {
            return Some(false);
        }
        if !self.is_mission_complete() {
            return None;
        }
        Some(self.fail_count() < self.required_fails)
    }

    /// The mission cards in random order, so they can be shown without
    /// revealing who played which.
    pub fn revealed_ballots<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<bool> {
        let mut cards: Vec<bool> = self.mission_ballots.values().copied().collect();
        cards.shuffle(rng);
        cards
    }

    pub(crate) fn push_proposal(&mut self, vote: Vote) {
        debug_assert!(self.can_propose());
        self.proposals.push(vote);
    }

    pub(crate) fn last_vote_mut(&mut self) -> Option<&mut Vote> {
        self.proposals.last_mut()
    }

    pub(crate) fn record_mission(&mut self, player: PlayerId, red: bool) {
        debug_assert!(!self.has_played(player));
        self.mission_ballots.insert(player, red);
    }
}
