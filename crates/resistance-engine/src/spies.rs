//! Secret role assignment.
//!
//! The engine asks a [`SpySelector`] for the spies exactly once, when the
//! game starts. Production games use [`RandomSpies`]; tests and replays can
//! plug in [`SeededSpies`] or their own implementation.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use resistance_protocol::PlayerId;

/// Chooses which players are spies.
///
/// Implementations should return exactly `count` distinct players drawn from
/// `players`. The game checks the result and refuses to start on anything
/// else. `Send` lets a game live inside a session actor task.
pub trait SpySelector: Send {
    fn select(&mut self, players: &[PlayerId], count: usize) -> Vec<PlayerId>;
}

/// Uniform selection from the thread-local, OS-seeded generator.
///
/// Holds no generator itself (`ThreadRng` isn't `Send`); it borrows one for
/// each call.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSpies;

impl SpySelector for RandomSpies {
    fn select(&mut self, players: &[PlayerId], count: usize) -> Vec<PlayerId> {
        shuffle_and_take(&mut rand::rng(), players, count)
    }
}

/// Uniform selection from a seeded generator. Same seed, same spies.
#[derive(Debug, Clone)]
pub struct SeededSpies {
    rng: StdRng,
}

impl SeededSpies {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl SpySelector for SeededSpies {
    fn select(&mut self, players: &[PlayerId], count: usize) -> Vec<PlayerId> {
        shuffle_and_take(&mut self.rng, players, count)
    }
}

/// Shuffles a copy of `players` and keeps the first `count`.
fn shuffle_and_take<R: Rng + ?Sized>(
    rng: &mut R,
    players: &[PlayerId],
    count: usize,
) -> Vec<PlayerId> {
    let mut pool = players.to_vec();
    pool.shuffle(rng);
    pool.truncate(count);
    pool
}
