//! Scoring module - line-clear points and drop pacing
//!
//! Multi-line clears pay a triangular bonus: clearing `n` rows in one lock is
//! always worth more than `n` separate single clears.

/// Points for `n` rows cleared in a single lock event:
/// sum of 100 * i for i in 1..=n, so 100 / 300 / 600 / 1000.
pub fn line_clear_points(lines: usize) -> u32 {
    (1..=lines as u32).map(|i| 100 * i).sum()
}

/// Gravity interval for a level: the base interval divided by the level,
/// with level 0 treated as level 1.
pub fn drop_interval_ms(base_ms: u64, level: u32) -> u64 {
    (base_ms / u64::from(level.max(1))).max(1)
}

/// Level progression: one level per ten cleared lines on top of the start level.
pub fn level_for_lines(start_level: u32, lines: u32) -> u32 {
    start_level + lines / 10
}
