//! Per-chat game sessions for the Resistance engine.
//!
//! Each chat's game runs as an isolated Tokio task (actor model). Commands
//! for one chat are applied one at a time, in arrival order; games in
//! different chats never block each other.
//!
//! # Key types
//!
//! - [`SessionRegistry`] — creates, routes to, and removes games by chat
//! - [`GameHandle`] — send commands to a running game actor
//! - [`SessionConfig`] — channel size and cleanup policy
//! - [`SessionError`] — why a command could not be routed or was refused

mod actor;
mod config;
mod error;
mod registry;

pub use actor::{Events, GameHandle};
pub use config::SessionConfig;
pub use error::SessionError;
pub use registry::SessionRegistry;
