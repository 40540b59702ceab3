//! Scoring and level progression

/// Points for clearing 0, 1, 2, 3 or 4 lines at once
const LINE_POINTS: [u64; 5] = [0, 40, 100, 300, 1200];

/// Lines needed per level
const LINES_PER_LEVEL: u32 = 10;

/// Gravity interval at level 0
pub const BASE_DROP_INTERVAL_MS: u32 = 1000;
/// Gravity never gets faster than this
pub const MIN_DROP_INTERVAL_MS: u32 = 120;
/// Interval shaved off per level
const DROP_STEP_MS: u32 = 100;

/// Points awarded for clearing `lines` rows in one lock
pub fn line_clear_points(lines: usize) -> u64 {
    LINE_POINTS.get(lines).copied().unwrap_or(0)
}

/// Level reached after `lines` total cleared lines
pub fn level_for_lines(lines: u32) -> u32 {
    lines / LINES_PER_LEVEL
}

/// Gravity interval in milliseconds for a level
pub fn drop_interval_ms(level: u32) -> u32 {
    BASE_DROP_INTERVAL_MS
        .saturating_sub(level.saturating_mul(DROP_STEP_MS))
        .max(MIN_DROP_INTERVAL_MS)
}

/// Scoring state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Total lines cleared
    pub lines: u32,
    /// Current level
    pub level: u32,
    /// Current gravity interval
    pub drop_interval_ms: u32,
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    pub fn new() -> Self {
        Self {
            points: 0,
            lines: 0,
            level: 0,
            drop_interval_ms: BASE_DROP_INTERVAL_MS,
        }
    }

    /// Award a line clear and rederive level and speed. Returns the points
    /// awarded.
    pub fn add_clear(&mut self, lines: usize) -> u64 {
        let points = line_clear_points(lines);
        self.points += points;
        self.lines += lines as u32;
        self.level = level_for_lines(self.lines);
        self.drop_interval_ms = drop_interval_ms(self.level);
        points
    }

    /// Gravity speed relative to level 0
    pub fn speed_multiplier(&self) -> f64 {
        f64::from(BASE_DROP_INTERVAL_MS) / f64::from(self.drop_interval_ms)
    }
}
