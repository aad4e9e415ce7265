//! # Resistance
//!
//! Rules engine and chat session registry for *The Resistance*, the social
//! deduction game.
//!
//! The engine ([`GameInstance`](prelude::GameInstance)) is a synchronous
//! state machine with no I/O. The session layer
//! ([`SessionRegistry`](prelude::SessionRegistry)) runs one game per chat
//! behind an actor task and turns player commands into
//! [`GameEvent`](prelude::GameEvent)s for a presentation layer to render.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use resistance::prelude::*;
//!
//! # async fn run() -> Result<(), ResistanceError> {
//! let mut registry = SessionRegistry::default();
//! let chat = ChatId(-100);
//! registry.create(chat, PlayerId(1))?;
//! for id in 1..=5 {
//!     registry.dispatch(chat, PlayerId(id), Command::Register).await?;
//! }
//! for (to, event) in registry.dispatch(chat, PlayerId(1), Command::Start).await? {
//!     println!("{to:?}: {event:?}");
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod logging;

pub use error::ResistanceError;
pub use logging::init_tracing;

pub use resistance_engine as engine;
pub use resistance_protocol as protocol;
pub use resistance_session as session;

pub mod prelude {
    pub use crate::{ResistanceError, init_tracing};
    pub use resistance_engine::{
        GameError, GameInstance, GamePhase, GameSnapshot, RandomSpies, Round, Score,
        SeededSpies, SpySelector, Vote, rules,
    };
    pub use resistance_protocol::{
        ChatId, Command, GameEvent, PartyBallot, PlayerId, Recipient, Role,
    };
    pub use resistance_session::{
        Events, GameHandle, SessionConfig, SessionError, SessionRegistry,
    };
}
