//! Rule tables for the classic 5–10 player game.
//!
//! Everything here is fixed at compile time. The engine looks values up by
//! player count and 0-based round index; it never stores derived copies.

use std::ops::RangeInclusive;

/// How many players a game may start with.
pub const PLAYER_COUNT: RangeInclusive<usize> = 5..=10;

/// Rounds one side must win to win the game.
pub const WIN_THRESHOLD: usize = 3;

/// Rounds in a full game.
pub const ROUND_COUNT: usize = 5;

/// Party proposals allowed per round. When the last one is rejected too,
/// the spies take the round.
pub const VOTE_LIMIT: usize = 5;

/// From this many players on, the fourth round needs two black cards.
pub const TWO_FAILS_MIN_PLAYERS: usize = 7;

/// Round index (0-based) that the two-fail rule applies to.
pub const TWO_FAILS_ROUND: usize = 3;

/// Party size per round, indexed by `player_count - 5`.
const PARTY_SIZES: [[usize; ROUND_COUNT]; 6] = [
    [2, 3, 2, 3, 3], // 5 players
    [2, 3, 4, 3, 4], // 6
    [2, 3, 3, 4, 4], // 7
    [3, 4, 4, 5, 5], // 8
    [3, 4, 4, 5, 5], // 9
    [3, 4, 4, 5, 5], // 10
];

/// Returns the party size for `round_index` at `player_count`, or `None`
/// if either is outside the table.
pub fn party_size(player_count: usize, round_index: usize) -> Option<usize> {
    if !PLAYER_COUNT.contains(&player_count) {
        return None;
    }
    PARTY_SIZES[player_count - PLAYER_COUNT.start()]
        .get(round_index)
        .copied()
}

/// Black cards the spies need to fail the mission of `round_index`.
pub fn required_fails(player_count: usize, round_index: usize) -> usize {
    if player_count >= TWO_FAILS_MIN_PLAYERS && round_index == TWO_FAILS_ROUND {
        2
    } else {
        1
    }
}

/// One third of the players, rounded up, are spies.
pub fn spy_count(player_count: usize) -> usize {
    player_count.div_ceil(3)
}
