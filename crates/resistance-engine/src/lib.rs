//! Rules engine for The Resistance.
//!
//! A synchronous state machine with no I/O, timers, or background work.
//! The owner feeds it player actions and reads derived state back.
//!
//! # Key types
//!
//! - [`GameInstance`] — one game: roster, secret roles, rounds, leader
//! - [`Round`] — up to five party proposals and one mission ballot
//! - [`Vote`] — one party proposal and the approve/reject ballots on it
//! - [`GamePhase`] — the phase state machine
//! - [`SpySelector`] — how spies are chosen ([`RandomSpies`], [`SeededSpies`])
//! - [`GameError`] — why an operation was refused
//! - [`rules`] — the fixed rule tables
//!
//! # Example
//!
//! ```rust
//! use resistance_engine::{GameInstance, GamePhase};
//! use resistance_protocol::{ChatId, PlayerId};
//!
//! let mut game = GameInstance::new(ChatId(-100), PlayerId(1));
//! for id in 1..=5 {
//!     game.register_player(PlayerId(id)).unwrap();
//! }
//! game.advance().unwrap();
//!
//! assert_eq!(game.phase(), GamePhase::ProposalPending);
//! assert_eq!(game.spies().len(), 2);
//! assert_eq!(game.current_party_size(), Some(2));
//! ```

mod error;
mod game;
mod phase;
mod round;
pub mod rules;
mod snapshot;
mod spies;
mod vote;

pub use error::GameError;
pub use game::GameInstance;
pub use phase::GamePhase;
pub use round::Round;
pub use snapshot::{GameSnapshot, Score};
pub use spies::{RandomSpies, SeededSpies, SpySelector};
pub use vote::Vote;
