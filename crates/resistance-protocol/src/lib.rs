//! Shared vocabulary for The Resistance.
//!
//! This crate defines the types every other layer agrees on:
//!
//! - **Identities** ([`PlayerId`], [`ChatId`]) — opaque keys for players
//!   and the chats that host games.
//! - **Commands** ([`Command`]) — what a command layer asks a game to do.
//! - **Events** ([`GameEvent`], [`Recipient`]) — what a game reports back,
//!   and who is allowed to see it.
//!
//! # Architecture
//!
//! ```text
//! Command layer → Command → Session registry → Engine
//!                                  ↓
//! Presentation  ← (Recipient, GameEvent)
//! ```
//!
//! It doesn't know about rules, phases, or scheduling. It only names things.

mod message;
mod types;

pub use message::{Command, GameEvent, PartyBallot};
pub use types::{ChatId, PlayerId, Recipient, Role};
