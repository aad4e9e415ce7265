//! `GameInstance`: the rules engine for one game.
//!
//! The owner calls the mutating operations in response to player commands
//! and [`GameInstance::advance`] after a vote closes. Each operation either
//! applies completely or returns a [`GameError`] and leaves the game as it
//! was. All other state is derived on demand.

use std::collections::HashSet;
use std::fmt;

use resistance_protocol::{ChatId, PlayerId, Role};

use crate::rules::{self, PLAYER_COUNT, WIN_THRESHOLD};
use crate::{
    GameError, GamePhase, GameSnapshot, RandomSpies, Round, Score, SpySelector, Vote,
};

/// One game of The Resistance, hosted in one chat.
pub struct GameInstance {
    chat_id: ChatId,
    creator: PlayerId,
    phase: GamePhase,
    /// Seating order. Also the order leadership rotates in.
    players: Vec<PlayerId>,
    spies: Vec<PlayerId>,
    rounds: Vec<Round>,
    leader_index: usize,
    selector: Box<dyn SpySelector>,
}

impl GameInstance {
    /// Creates a game that deals roles with [`RandomSpies`].
    pub fn new(chat_id: ChatId, creator: PlayerId) -> Self {
        Self::with_selector(chat_id, creator, RandomSpies)
    }

    /// Creates a game that deals roles with `selector`.
    pub fn with_selector(
        chat_id: ChatId,
        creator: PlayerId,
        selector: impl SpySelector + 'static,
    ) -> Self {
        Self {
            chat_id,
            creator,
            phase: GamePhase::NotStarted,
            players: Vec::new(),
            spies: Vec::new(),
            rounds: Vec::new(),
            leader_index: 0,
            selector: Box::new(selector),
        }
    }

    // -----------------------------------------------------------------------
    // Mutating operations
    // -----------------------------------------------------------------------

    /// Adds `user` to the roster.
    ///
    /// The 5–10 bound is not checked here; [`advance`](Self::advance)
    /// enforces it when the game starts.
    pub fn register_player(&mut self, user: PlayerId) -> Result<(), GameError> {
        if self.phase != GamePhase::NotStarted {
            return Err(GameError::RegistrationClosed);
        }
        if self.is_player(user) {
            return Err(GameError::AlreadyRegistered(user));
        }

        self.players.push(user);
        tracing::info!(
            chat_id = %self.chat_id,
            player_id = %user,
            players = self.players.len(),
            "player registered"
        );
        Ok(())
    }

    /// Performs the automatic transition out of the current phase.
    ///
    /// - `NotStarted`: deals roles and opens round 1.
    /// - `PartyVoteResults`: starts the mission if the party was approved;
    ///   otherwise passes leadership on and asks for a new proposal, or
    ///   forfeits the round to the spies once the vote limit is used up.
    /// - `MissionVoteResults`: passes leadership on and opens the next round
    ///   or ends the game.
    ///
    /// Every other phase is left only by a vote, so `advance` fails there.
    pub fn advance(&mut self) -> Result<(), GameError> {
        match self.phase {
            GamePhase::NotStarted => {
                let count = self.players.len();
                if !PLAYER_COUNT.contains(&count) {
                    return Err(GameError::InvalidPlayerCount(count));
                }
                self.spies = self.deal_spies()?;
                // The cursor starts one seat before the first player, so
                // the last player to register leads the first round.
                self.leader_index = count - 1;
                self.open_round_or_finish();
            }
            GamePhase::PartyVoteResults => {
                let approved = self.current_vote().is_some_and(Vote::is_approved);
                if approved {
                    self.transition(GamePhase::MissionVoteInProgress);
                } else {
                    self.rotate_leader();
                    let can_propose = self.current_round().is_some_and(Round::can_propose);
                    if can_propose {
                        self.transition(GamePhase::ProposalPending);
                    } else {
                        tracing::info!(
                            chat_id = %self.chat_id,
                            round = self.rounds.len(),
                            "vote limit reached, spies take the round"
                        );
                        self.open_round_or_finish();
                    }
                }
            }
            GamePhase::MissionVoteResults => {
                self.rotate_leader();
                self.open_round_or_finish();
            }
            other => return Err(GameError::InvalidTransition(other)),
        }
        Ok(())
    }

    /// The leader nominates `party` for the current round.
    pub fn propose_party(&mut self, user: PlayerId, party: Vec<PlayerId>) -> Result<(), GameError> {
        self.assert_registered(user)?;
        if self.phase != GamePhase::ProposalPending {
            return Err(GameError::PartyNotPending);
        }
        if self.leader() != Some(user) {
            return Err(GameError::NotLeader);
        }
        let expected = self.current_party_size().unwrap_or_default();
        if party.len() != expected {
            return Err(GameError::WrongPartySize {
                expected,
                got: party.len(),
            });
        }
        for (i, member) in party.iter().enumerate() {
            if !self.is_player(*member) {
                return Err(GameError::UnknownPlayer(*member));
            }
            if party[..i].contains(member) {
                return Err(GameError::DuplicatePartyMember(*member));
            }
        }

        tracing::info!(
            chat_id = %self.chat_id,
            leader = %user,
            party = ?party,
            "party proposed"
        );
        if let Some(round) = self.rounds.last_mut() {
            round.push_proposal(Vote::new(party));
        }
        self.transition(GamePhase::PartyVoteInProgress);
        Ok(())
    }

    /// Records `user`'s approve/reject ballot on the proposed party.
    ///
    /// When the last player votes the game moves to `PartyVoteResults`.
    pub fn vote_party(&mut self, user: PlayerId, approve: bool) -> Result<(), GameError> {
        self.assert_registered(user)?;
        if self.phase != GamePhase::PartyVoteInProgress {
            return Err(GameError::VoteNotInProgress);
        }
        let Some(round) = self.rounds.last_mut() else {
            return Err(GameError::VoteNotInProgress);
        };
        let Some(vote) = round.last_vote_mut() else {
            return Err(GameError::VoteNotInProgress);
        };
        if vote.has_voted(user) {
            return Err(GameError::DuplicateVote(user));
        }

        vote.record(user, approve);
        tracing::debug!(
            chat_id = %self.chat_id,
            player_id = %user,
            approve,
            "party ballot cast"
        );

        let closed = round.last_vote().map(|v| (round.is_vote_closed(v), v.is_approved()));
        if let Some((true, approved)) = closed {
            self.transition(GamePhase::PartyVoteResults);
            tracing::info!(chat_id = %self.chat_id, approved, "party vote closed");
        }
        Ok(())
    }

    /// Records a party member's mission card: red (`true`) or black.
    ///
    /// When the last party member plays the game moves to
    /// `MissionVoteResults`.
    pub fn vote_mission(&mut self, user: PlayerId, red: bool) -> Result<(), GameError> {
        self.assert_registered(user)?;
        if self.phase != GamePhase::MissionVoteInProgress {
            return Err(GameError::MissionNotInProgress);
        }
        let in_party = self
            .current_round()
            .and_then(Round::last_vote)
            .is_some_and(|v| v.includes(user));
        let is_spy = self.is_spy(user);
        let Some(round) = self.rounds.last_mut() else {
            return Err(GameError::MissionNotInProgress);
        };
        if round.has_played(user) {
            return Err(GameError::DuplicateVote(user));
        }
        if !in_party {
            return Err(GameError::NotPartyMember);
        }
        if !red && !is_spy {
            return Err(GameError::ResistanceCannotPlayBlack);
        }

        round.record_mission(user, red);
        // The color is secret; only log that a card was played.
        tracing::debug!(chat_id = %self.chat_id, player_id = %user, "mission card played");

        if round.is_mission_complete() {
            let resistance_won = round.outcome() == Some(true);
            self.transition(GamePhase::MissionVoteResults);
            tracing::info!(chat_id = %self.chat_id, resistance_won, "mission closed");
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    pub fn creator(&self) -> PlayerId {
        self.creator
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Registered players in seating order.
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// The spies. Empty until the game starts.
    pub fn spies(&self) -> &[PlayerId] {
        &self.spies
    }

    pub fn is_player(&self, user: PlayerId) -> bool {
        self.players.contains(&user)
    }

    pub fn is_spy(&self, user: PlayerId) -> bool {
        self.spies.contains(&user)
    }

    /// Every round opened so far, oldest first.
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// 1-based number of the latest round, 0 before the game starts.
    pub fn round_number(&self) -> usize {
        self.rounds.len()
    }

    /// The open round. `None` before the start and after the end.
    pub fn current_round(&self) -> Option<&Round> {
        if self.phase.is_in_round() {
            self.rounds.last()
        } else {
            None
        }
    }

    /// The party vote being cast or just closed.
    pub fn current_vote(&self) -> Option<&Vote> {
        match self.phase {
            GamePhase::PartyVoteInProgress | GamePhase::PartyVoteResults => {
                self.current_round().and_then(Round::last_vote)
            }
            _ => None,
        }
    }

    /// The party under vote or on the mission.
    pub fn current_party(&self) -> Option<&[PlayerId]> {
        match self.phase {
            GamePhase::PartyVoteInProgress
            | GamePhase::PartyVoteResults
            | GamePhase::MissionVoteInProgress
            | GamePhase::MissionVoteResults => {
                self.current_round().and_then(Round::last_vote).map(Vote::party)
            }
            _ => None,
        }
    }

    pub fn current_party_size(&self) -> Option<usize> {
        self.current_round().map(Round::party_size)
    }

    /// Black cards the spies need to take the open round.
    pub fn current_winning_count(&self) -> Option<usize> {
        self.current_round().map(Round::required_fails)
    }

    /// The player who proposes the next party. `None` outside a round.
    pub fn leader(&self) -> Option<PlayerId> {
        if self.phase.is_in_round() {
            self.players.get(self.leader_index).copied()
        } else {
            None
        }
    }

    /// Rounds won by each side. Undecided rounds count for nobody.
    pub fn score(&self) -> Score {
        self.rounds
            .iter()
            .filter_map(Round::outcome)
            .fold(Score::default(), |mut score, resistance_won| {
                if resistance_won {
                    score.resistance += 1;
                } else {
                    score.spies += 1;
                }
                score
            })
    }

    /// `Some(true)` once the resistance has won, `Some(false)` once the spies
    /// have, `None` until then.
    pub fn outcome(&self) -> Option<bool> {
        let score = self.score();
        if score.resistance >= WIN_THRESHOLD {
            Some(true)
        } else if score.spies >= WIN_THRESHOLD {
            Some(false)
        } else {
            None
        }
    }

    /// The role `user` was dealt. `None` before roles are dealt or for
    /// non-players.
    pub fn role_of(&self, user: PlayerId) -> Option<Role> {
        if self.phase == GamePhase::NotStarted || !self.is_player(user) {
            return None;
        }
        Some(if self.is_spy(user) {
            Role::Spy
        } else {
            Role::Resistance
        })
    }

    /// The other spies, as seen by `user`. Empty unless `user` is a spy.
    pub fn fellow_spies(&self, user: PlayerId) -> Vec<PlayerId> {
        if !self.is_spy(user) {
            return Vec::new();
        }
        self.spies.iter().copied().filter(|s| *s != user).collect()
    }

    /// A view of the game safe to show the whole chat.
    pub fn snapshot(&self) -> GameSnapshot {
        let round = self.current_round();
        let (ballots_cast, ballots_expected) = match self.phase {
            GamePhase::PartyVoteInProgress | GamePhase::PartyVoteResults => (
                self.current_vote().map_or(0, |v| v.ballots().len()),
                self.players.len(),
            ),
            GamePhase::MissionVoteInProgress | GamePhase::MissionVoteResults => (
                round.map_or(0, Round::mission_ballot_count),
                self.current_party_size().unwrap_or_default(),
            ),
            _ => (0, 0),
        };

        GameSnapshot {
            chat_id: self.chat_id,
            creator: self.creator,
            phase: self.phase,
            players: self.players.clone(),
            leader: self.leader(),
            round: self.round_number(),
            party_size: self.current_party_size(),
            required_fails: self.current_winning_count(),
            attempt: round.map_or(0, |r| r.proposals().len()),
            party: self.current_party().map(<[PlayerId]>::to_vec),
            ballots_cast,
            ballots_expected,
            score: self.score(),
            outcome: self.outcome(),
            spies: self.phase.is_over().then(|| self.spies.clone()),
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn assert_registered(&self, user: PlayerId) -> Result<(), GameError> {
        if self.is_player(user) {
            Ok(())
        } else {
            Err(GameError::NotRegistered(user))
        }
    }

    /// The single place the phase changes.
    fn transition(&mut self, to: GamePhase) {
        debug_assert!(
            self.phase.can_transition_to(to),
            "illegal transition {} -> {}",
            self.phase,
            to
        );
        tracing::info!(chat_id = %self.chat_id, from = %self.phase, %to, "phase changed");
        self.phase = to;
    }

    /// Asks the selector for spies and checks its answer.
    fn deal_spies(&mut self) -> Result<Vec<PlayerId>, GameError> {
        let count = rules::spy_count(self.players.len());
        let spies = self.selector.select(&self.players, count);

        let distinct: HashSet<_> = spies.iter().copied().collect();
        let valid = spies.len() == count
            && distinct.len() == count
            && spies.iter().all(|s| self.players.contains(s));
        if !valid {
            return Err(GameError::InvalidSpySelection { expected: count });
        }

        tracing::info!(chat_id = %self.chat_id, spies = count, "roles dealt");
        Ok(spies)
    }

    fn rotate_leader(&mut self) {
        self.leader_index = (self.leader_index + 1) % self.players.len();
    }

    fn open_round_or_finish(&mut self) {
        let count = self.players.len();
        let index = self.rounds.len();
        match (self.outcome(), rules::party_size(count, index)) {
            (None, Some(party_size)) => {
                let required_fails = rules::required_fails(count, index);
                self.rounds.push(Round::new(count, party_size, required_fails));
                self.transition(GamePhase::ProposalPending);
                tracing::info!(
                    chat_id = %self.chat_id,
                    round = index + 1,
                    party_size,
                    required_fails,
                    "round started"
                );
            }
            (outcome, _) => {
                self.transition(GamePhase::GameOver);
                tracing::info!(
                    chat_id = %self.chat_id,
                    resistance_won = outcome == Some(true),
                    "game over"
                );
            }
        }
    }
}

impl fmt::Debug for GameInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameInstance")
            .field("chat_id", &self.chat_id)
            .field("creator", &self.creator)
            .field("phase", &self.phase)
            .field("players", &self.players)
            .field("rounds", &self.rounds.len())
            .field("leader_index", &self.leader_index)
            .finish_non_exhaustive()
    }
}
