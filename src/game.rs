#![warn(clippy::all, clippy::pedantic)]

use std::time::Duration;

// Game board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

// Automatic drop timing, in milliseconds
pub const NORMAL_DROP_MS: u64 = 500;
pub const FAST_DROP_MS: u64 = 30;
pub const LEVEL_SPEEDUP_MS: u64 = 50;
pub const MIN_DROP_MS: u64 = 100;

// Line clear rewards (multiplied by the level at the time of the clear)
pub const POINTS_SINGLE: u32 = 100;
pub const POINTS_DOUBLE: u32 = 300;
pub const POINTS_TRIPLE: u32 = 500;
pub const POINTS_TETRIS: u32 = 800;

// Level progression
pub const LINES_PER_LEVEL: u32 = 10;
pub const STARTING_LEVEL: u32 = 1;

/// Column where freshly spawned pieces are anchored.
pub const SPAWN_X: i32 = (BOARD_WIDTH / 2) as i32 - 1;
pub const SPAWN_Y: i32 = 0;

/// Base reward for clearing `lines` rows at once. Anything outside 1..=4 earns nothing.
#[must_use]
pub fn line_clear_reward(lines: usize) -> u32 {
    match lines {
        1 => POINTS_SINGLE,
        2 => POINTS_DOUBLE,
        3 => POINTS_TRIPLE,
        4 => POINTS_TETRIS,
        _ => 0,
    }
}

#[must_use]
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + STARTING_LEVEL
}

/// Period of the automatic drop timer.
///
/// Fast drop ignores the level entirely. Otherwise every level shaves
/// `LEVEL_SPEEDUP_MS` off the base period until `MIN_DROP_MS` is reached.
#[must_use]
pub fn drop_period(level: u32, fast_drop: bool) -> Duration {
    if fast_drop {
        return Duration::from_millis(FAST_DROP_MS);
    }

    let speedup = u64::from(level.saturating_sub(1)).saturating_mul(LEVEL_SPEEDUP_MS);
    Duration::from_millis(NORMAL_DROP_MS.saturating_sub(speedup).max(MIN_DROP_MS))
}
