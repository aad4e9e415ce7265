//! Session registry: one game per chat, routed by chat ID.

use std::collections::HashMap;

use resistance_engine::{GameInstance, RandomSpies, SpySelector};
use resistance_protocol::{ChatId, Command, GameEvent, PlayerId};

use crate::actor::{Events, GameHandle, spawn_game};
use crate::{SessionConfig, SessionError};

/// Tracks the running game of every chat.
///
/// This is the entry point for the command layer: it resolves a chat to
/// its game actor and forwards player commands there. Each chat holds at
/// most one game at a time.
pub struct SessionRegistry {
    games: HashMap<ChatId, GameHandle>,
    config: SessionConfig,
}

impl SessionRegistry {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            games: HashMap::new(),
            config,
        }
    }

    /// Creates a game in `chat_id` with secret roles dealt at random.
    pub fn create(
        &mut self,
        chat_id: ChatId,
        creator: PlayerId,
    ) -> Result<GameHandle, SessionError> {
        self.create_with_selector(chat_id, creator, RandomSpies)
    }

    /// Creates a game whose spies are chosen by `selector`.
    pub fn create_with_selector(
        &mut self,
        chat_id: ChatId,
        creator: PlayerId,
        selector: impl SpySelector + 'static,
    ) -> Result<GameHandle, SessionError> {
        if self.games.contains_key(&chat_id) {
            return Err(SessionError::AlreadyExists(chat_id));
        }

        let game = GameInstance::with_selector(chat_id, creator, selector);
        let handle = spawn_game(game, self.config.channel_size);
        self.games.insert(chat_id, handle.clone());
        tracing::info!(%chat_id, creator = %creator, "game created");
        Ok(handle)
    }

    /// Returns a handle to the chat's game.
    ///
    /// The handle is a clone, so callers can drop their borrow of the
    /// registry before awaiting it.
    pub fn handle(&self, chat_id: ChatId) -> Result<GameHandle, SessionError> {
        self.games
            .get(&chat_id)
            .cloned()
            .ok_or(SessionError::NotFound(chat_id))
    }

    /// Routes a player command to the chat's game.
    ///
    /// Finished games are dropped from the registry when
    /// [`SessionConfig::remove_finished`] is set.
    pub async fn dispatch(
        &mut self,
        chat_id: ChatId,
        player: PlayerId,
        command: Command,
    ) -> Result<Events, SessionError> {
        let handle = self.handle(chat_id)?;
        let events = match handle.execute(player, command).await {
            Ok(events) => events,
            Err(SessionError::Unavailable(chat_id)) => {
                self.games.remove(&chat_id);
                tracing::warn!(%chat_id, "dropped unavailable game");
                return Err(SessionError::Unavailable(chat_id));
            }
            Err(e) => return Err(e),
        };

        let finished = events
            .iter()
            .any(|(_, event)| matches!(event, GameEvent::GameOver { .. }));
        if finished && self.config.remove_finished {
            self.remove(chat_id).await;
        }
        Ok(events)
    }

    /// Cancels the chat's game. Only its creator may do this.
    pub async fn cancel(
        &mut self,
        chat_id: ChatId,
        requester: PlayerId,
    ) -> Result<(), SessionError> {
        let handle = self.handle(chat_id)?;
        if handle.creator() != requester {
            return Err(SessionError::NotCreator(requester));
        }
        self.remove(chat_id).await;
        Ok(())
    }

    /// Chats that currently have a game.
    pub fn chat_ids(&self) -> Vec<ChatId> {
        self.games.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    async fn remove(&mut self, chat_id: ChatId) {
        if let Some(handle) = self.games.remove(&chat_id) {
            let _ = handle.shutdown().await;
            tracing::info!(%chat_id, "game removed");
        }
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
