use std::path::PathBuf;

/// Default game rule (classic Conway, survive on 2 or 3, birth on 3).
pub const DEFAULT_RULE: &str = "23/3";

/// Default board width in cells.
pub const DEFAULT_WIDTH: usize = 100;

/// Default board height in cells.
pub const DEFAULT_HEIGHT: usize = 70;

/// Default fraction of live cells in a random board.
pub const DEFAULT_DENSITY: f64 = 0.1;

/// Default number of age steps a cell can reach.
pub const DEFAULT_STEPS: u32 = 4;

/// Everything needed to build a [`Board`](crate::Board).
///
/// Width and height are the user-facing names: `width` becomes the number
/// of columns and `height` the number of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardConfig {
    /// Rule string, e.g. `23/3` or `B3/S23`.
    pub rule: String,
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Pattern file to stamp; a random board is generated when `None`.
    pub pattern: Option<PathBuf>,
    /// Live-cell probability for a random board. Ignored with a pattern.
    pub density: f64,
    /// Maximum cell age.
    pub steps: u32,
    /// Seed for the random fill and pattern placement.
    pub seed: Option<u64>,
}

impl BoardConfig {
    /// Board dimensions as `(rows, cols)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.height, self.width)
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rule: DEFAULT_RULE.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            pattern: None,
            density: DEFAULT_DENSITY,
            steps: DEFAULT_STEPS,
            seed: None,
        }
    }
}
