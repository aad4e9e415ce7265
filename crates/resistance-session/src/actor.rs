//! Game actor: an isolated Tokio task that owns one chat's game.
//!
//! Every command for a chat goes through the actor's channel and is handled
//! to completion before the next one is read. That gives each game mutual
//! exclusion without a lock, while games in different chats run
//! independently.

use resistance_engine::{GameError, GameInstance, GamePhase, GameSnapshot};
use resistance_protocol::{ChatId, Command, GameEvent, PlayerId, Recipient};
use tokio::sync::{mpsc, oneshot};

use crate::SessionError;

/// Events produced by one command, each paired with who may see it.
pub type Events = Vec<(Recipient, GameEvent)>;

/// Commands sent to a game actor through its channel.
///
/// Variants with a `oneshot::Sender` expect an answer: the caller sends
/// the command and waits on the reply channel.
pub(crate) enum ActorCommand {
    /// Apply a player command to the game.
    Execute {
        player: PlayerId,
        command: Command,
        reply: oneshot::Sender<Result<Events, SessionError>>,
    },

    /// Request a public snapshot of the game.
    Snapshot {
        reply: oneshot::Sender<GameSnapshot>,
    },

    /// Stop the actor.
    Shutdown,
}

/// Handle to a running game actor.
///
/// Cheap to clone: it's an `mpsc::Sender` plus the game's immutable keys.
/// Callers can clone a handle out of the registry and release the registry
/// before awaiting the game.
#[derive(Clone, Debug)]
pub struct GameHandle {
    chat_id: ChatId,
    creator: PlayerId,
    sender: mpsc::Sender<ActorCommand>,
}

impl GameHandle {
    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    /// The player who created the game.
    pub fn creator(&self) -> PlayerId {
        self.creator
    }

    /// Applies `command` on behalf of `player` and returns what happened.
    ///
    /// When a vote closes the actor also runs the automatic transitions
    /// that follow it, so the returned events cover everything up to the
    /// next point where a player has to act.
    pub async fn execute(
        &self,
        player: PlayerId,
        command: Command,
    ) -> Result<Events, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(ActorCommand::Execute {
                player,
                command,
                reply: reply_tx,
            })
            .await
            .map_err(|_| SessionError::Unavailable(self.chat_id))?;
        reply_rx
            .await
            .map_err(|_| SessionError::Unavailable(self.chat_id))?
    }

    pub async fn register(&self, player: PlayerId) -> Result<Events, SessionError> {
        self.execute(player, Command::Register).await
    }

    /// Starts the game. Only the creator may do this.
    pub async fn start(&self, player: PlayerId) -> Result<Events, SessionError> {
        self.execute(player, Command::Start).await
    }

    pub async fn propose_party(
        &self,
        player: PlayerId,
        party: Vec<PlayerId>,
    ) -> Result<Events, SessionError> {
        self.execute(player, Command::ProposeParty { party }).await
    }

    pub async fn vote_party(
        &self,
        player: PlayerId,
        approve: bool,
    ) -> Result<Events, SessionError> {
        self.execute(player, Command::VoteParty { approve }).await
    }

    pub async fn vote_mission(
        &self,
        player: PlayerId,
        red: bool,
    ) -> Result<Events, SessionError> {
        self.execute(player, Command::VoteMission { red }).await
    }

    /// Asks privately for `player`'s role. Fails before the game starts.
    pub async fn get_role(&self, player: PlayerId) -> Result<Events, SessionError> {
        self.execute(player, Command::GetRole).await
    }

    /// Requests the current public view of the game.
    pub async fn snapshot(&self) -> Result<GameSnapshot, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(ActorCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| SessionError::Unavailable(self.chat_id))?;
        reply_rx
            .await
            .map_err(|_| SessionError::Unavailable(self.chat_id))
    }

    /// Tells the actor to stop.
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.sender
            .send(ActorCommand::Shutdown)
            .await
            .map_err(|_| SessionError::Unavailable(self.chat_id))
    }
}

/// The actor state. Runs inside a Tokio task.
struct GameActor {
    game: GameInstance,
    receiver: mpsc::Receiver<ActorCommand>,
}

impl GameActor {
    /// Runs the actor loop until shutdown or until every handle is dropped.
    async fn run(mut self) {
        let chat_id = self.game.chat_id();
        tracing::info!(%chat_id, "game actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                ActorCommand::Execute {
                    player,
                    command,
                    reply,
                } => {
                    let result = self.execute(player, command);
                    if let Err(e) = &result {
                        tracing::debug!(%chat_id, player_id = %player, error = %e, "command refused");
                    }
                    let _ = reply.send(result);
                }
                ActorCommand::Snapshot { reply } => {
                    let _ = reply.send(self.game.snapshot());
                }
                ActorCommand::Shutdown => {
                    tracing::info!(%chat_id, "game shutting down");
                    break;
                }
            }
        }

        tracing::info!(%chat_id, "game actor stopped");
    }

    fn execute(&mut self, player: PlayerId, command: Command) -> Result<Events, SessionError> {
        match command {
            Command::Register => self.handle_register(player),
            Command::Start => self.handle_start(player),
            Command::ProposeParty { party } => self.handle_propose(player, party),
            Command::VoteParty { approve } => self.handle_vote_party(player, approve),
            Command::VoteMission { red } => self.handle_vote_mission(player, red),
            Command::GetRole => self.handle_get_role(player),
        }
    }

    fn handle_register(&mut self, player: PlayerId) -> Result<Events, SessionError> {
        self.game.register_player(player)?;
        Ok(vec![(
            Recipient::All,
            GameEvent::PlayerRegistered {
                player,
                player_count: self.game.players().len(),
            },
        )])
    }

    fn handle_start(&mut self, player: PlayerId) -> Result<Events, SessionError> {
        self.ensure_player(player)?;
        if player != self.game.creator() {
            return Err(SessionError::NotCreator(player));
        }
        if self.game.phase() != GamePhase::NotStarted {
            return Err(GameError::InvalidTransition(self.game.phase()).into());
        }
        self.game.advance()?;

        let mut events = vec![(
            Recipient::All,
            GameEvent::GameStarted {
                players: self.game.players().to_vec(),
                spy_count: self.game.spies().len(),
            },
        )];
        for &p in self.game.players() {
            events.push(self.role_card(p)?);
        }
        events.extend(self.round_opened());
        Ok(events)
    }

    fn handle_get_role(&mut self, player: PlayerId) -> Result<Events, SessionError> {
        self.ensure_player(player)?;
        Ok(vec![self.role_card(player)?])
    }

    /// `player`'s role, addressed to them alone.
    fn role_card(&self, player: PlayerId) -> Result<(Recipient, GameEvent), GameError> {
        let role = self.game.role_of(player).ok_or(GameError::NotStarted)?;
        Ok((
            Recipient::Player(player),
            GameEvent::RoleAssigned {
                role,
                fellow_spies: self.game.fellow_spies(player),
            },
        ))
    }

    fn handle_propose(
        &mut self,
        player: PlayerId,
        party: Vec<PlayerId>,
    ) -> Result<Events, SessionError> {
        self.ensure_player(player)?;
        self.game.propose_party(player, party.clone())?;
        Ok(vec![(
            Recipient::All,
            GameEvent::PartyProposed {
                leader: player,
                party,
            },
        )])
    }

    fn handle_vote_party(&mut self, player: PlayerId, approve: bool) -> Result<Events, SessionError> {
        self.ensure_player(player)?;
        self.game.vote_party(player, approve)?;

        let mut events = vec![(
            Recipient::All,
            GameEvent::PartyBallotCast {
                voter: player,
                cast: self.game.current_vote().map_or(0, |v| v.ballots().len()),
                total: self.game.players().len(),
            },
        )];
        if !self.game.phase().awaits_advance() {
            return Ok(events);
        }

        if let Some(vote) = self.game.current_vote() {
            events.push((
                Recipient::All,
                GameEvent::PartyVoteClosed {
                    approved: vote.is_approved(),
                    ballots: vote.ballots().to_vec(),
                },
            ));
        }

        let round_before = self.game.round_number();
        self.game.advance()?;
        let forfeited = self.game.round_number() != round_before || self.game.phase().is_over();

        match self.game.phase() {
            GamePhase::MissionVoteInProgress => {
                let party = self.game.current_party().map(<[PlayerId]>::to_vec).unwrap_or_default();
                events.push((Recipient::All, GameEvent::MissionRequested { party }));
            }
            _ if forfeited => {
                events.push((Recipient::All, GameEvent::RoundForfeited { round: round_before }));
                events.extend(self.round_opened_or_over());
            }
            _ => events.extend(self.proposal_requested()),
        }
        Ok(events)
    }

    fn handle_vote_mission(&mut self, player: PlayerId, red: bool) -> Result<Events, SessionError> {
        self.ensure_player(player)?;
        self.game.vote_mission(player, red)?;

        let mut events = vec![(
            Recipient::All,
            GameEvent::MissionBallotCast {
                voter: player,
                cast: self.game.current_round().map_or(0, |r| r.mission_ballot_count()),
                total: self.game.current_party_size().unwrap_or_default(),
            },
        )];
        if !self.game.phase().awaits_advance() {
            return Ok(events);
        }

        if let Some(round) = self.game.current_round() {
            events.push((
                Recipient::All,
                GameEvent::MissionClosed {
                    resistance_won: round.outcome() == Some(true),
                    ballots: round.revealed_ballots(&mut rand::rng()),
                },
            ));
        }

        self.game.advance()?;
        events.extend(self.round_opened_or_over());
        Ok(events)
    }

    /// Outside registration, only players may act in a game.
    fn ensure_player(&self, player: PlayerId) -> Result<(), SessionError> {
        if self.game.is_player(player) {
            Ok(())
        } else {
            Err(GameError::NotRegistered(player).into())
        }
    }

    fn proposal_requested(&self) -> Events {
        match (self.game.leader(), self.game.current_round()) {
            (Some(leader), Some(round)) => vec![(
                Recipient::All,
                GameEvent::ProposalRequested {
                    leader,
                    party_size: round.party_size(),
                    attempt: round.proposals().len() + 1,
                },
            )],
            _ => Vec::new(),
        }
    }

    fn round_opened(&self) -> Events {
        let Some(round) = self.game.current_round() else {
            return Vec::new();
        };
        let mut events = vec![(
            Recipient::All,
            GameEvent::RoundStarted {
                round: self.game.round_number(),
                party_size: round.party_size(),
                required_fails: round.required_fails(),
            },
        )];
        events.extend(self.proposal_requested());
        events
    }

    fn round_opened_or_over(&self) -> Events {
        if self.game.phase().is_over() {
            vec![(
                Recipient::All,
                GameEvent::GameOver {
                    resistance_won: self.game.outcome() == Some(true),
                    spies: self.game.spies().to_vec(),
                },
            )]
        } else {
            self.round_opened()
        }
    }
}

/// Spawns a game actor and returns a handle to it.
///
/// `channel_size` controls backpressure. If the channel fills up, senders
/// wait.
pub(crate) fn spawn_game(game: GameInstance, channel_size: usize) -> GameHandle {
    let (tx, rx) = mpsc::channel(channel_size);
    let handle = GameHandle {
        chat_id: game.chat_id(),
        creator: game.creator(),
        sender: tx,
    };

    let actor = GameActor { game, receiver: rx };
    tokio::spawn(actor.run());

    handle
}
