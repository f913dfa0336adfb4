use std::path::PathBuf;

/// Everything that can go wrong while building a board or picking a view.
///
/// Construction either succeeds completely or fails with one of these;
/// a half-built board is never handed out.
#[derive(Debug, thiserror::Error)]
pub enum LifeError {
    #[error("invalid rule {rule:?}: {reason}")]
    InvalidRule { rule: String, reason: String },

    #[error("board too small: {board_rows}x{board_cols} cannot hold a {pattern_rows}x{pattern_cols} pattern")]
    PatternTooSmall {
        board_rows: usize,
        board_cols: usize,
        pattern_rows: usize,
        pattern_cols: usize,
    },

    #[error("cannot read pattern file {}: {source}", path.display())]
    PatternFileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed pattern: {0}")]
    MalformedPattern(String),

    #[error("density must be within [0, 1], got {0}")]
    InvalidDensity(f64),

    #[error("steps must be at least 1")]
    InvalidSteps,

    #[error("board dimensions must be non-zero, got {rows}x{cols}")]
    EmptyBoard { rows: usize, cols: usize },

    #[error("board of {rows}x{cols} cells is too large")]
    BoardTooLarge { rows: usize, cols: usize },

    #[error("no usable view: {0}")]
    ViewUnavailable(String),
}
