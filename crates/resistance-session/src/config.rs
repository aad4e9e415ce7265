//! Session registry configuration.

/// Settings for the [`SessionRegistry`](crate::SessionRegistry).
///
/// The game rules themselves are fixed; this only tunes the plumbing
/// around them.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Capacity of each game actor's command channel. When it fills up,
    /// callers wait (bounded channel backpressure).
    pub channel_size: usize,

    /// Drop a game from the registry as soon as it reaches game over.
    /// Turn off to keep finished games around for inspection.
    pub remove_finished: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            channel_size: 64,
            remove_finished: true,
        }
    }
}
