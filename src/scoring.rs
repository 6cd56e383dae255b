//! Level progression: gravity speed, line-clear points and level-up thresholds.

/// Frames per one-cell drop, indexed by level. Levels past the end use the last entry.
const FRAMES_PER_CELL: [u8; 30] = [
    48, 43, 38, 33, 28, 23, 18, 13, 8, 6, 5, 5, 5, 4, 4, 4, 3, 3, 3, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1,
];

/// Highest level with its own gravity entry; also the highest selectable start level.
pub const MAX_LEVEL: u32 = FRAMES_PER_CELL.len() as u32 - 1;

const SECONDS_PER_FRAME: f64 = 1.0 / 60.0;

/// Seconds between automatic one-cell drops at `level`.
pub fn fall_interval(level: u32) -> f64 {
    let level = level.min(MAX_LEVEL) as usize;
    f64::from(FRAMES_PER_CELL[level]) * SECONDS_PER_FRAME
}

/// Points for clearing `rows` rows at once at `level`.
///
/// The four-row award is `1200 + (level + 1)`, not `1200 * (level + 1)`.
pub fn score_for(level: u32, rows: usize) -> u32 {
    let multiplier = level + 1;
    match rows {
        1 => 40 * multiplier,
        2 => 100 * multiplier,
        3 => 300 * multiplier,
        4 => 1200 + multiplier,
        _ => 0,
    }
}

/// Cumulative cleared rows needed to leave `level` for a game started at `start_level`.
pub fn rows_to_next_level(start_level: u32, level: u32) -> u32 {
    let start = i64::from(start_level);
    let first = (start * 10 + 10).min((start * 10 - 50).max(100));
    let extra = i64::from(level.saturating_sub(start_level)) * 10;
    (first + extra) as u32
}
