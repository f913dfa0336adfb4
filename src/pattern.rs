use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LifeError;

/// Extension appended to pattern paths that do not already carry it.
const PATTERN_EXTENSION: &str = ".txt";

/// A rectangular live/dead stamp read from a pattern file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    rows: usize,
    cols: usize,
    /// Row-major live mask, `rows * cols` long.
    cells: Vec<bool>,
}

impl Pattern {
    /// Parse pattern text.
    ///
    /// One line per row. Lines starting with `#` are comments and blank
    /// lines at the end of the text are ignored; any other blank line is an
    /// empty row. `.` is a dead cell, any other character is live.
    pub fn parse(text: &str) -> Result<Self, LifeError> {
        let mut data: Vec<(usize, &str)> = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.starts_with('#'))
            .map(|(lineno, line)| (lineno + 1, line.trim_end()))
            .collect();
        while data.last().is_some_and(|(_, line)| line.is_empty()) {
            data.pop();
        }

        let Some(&(_, first)) = data.first() else {
            return Err(LifeError::MalformedPattern("no pattern rows".into()));
        };
        let cols = first.chars().count();
        let mut cells = Vec::with_capacity(data.len() * cols);

        for &(lineno, line) in &data {
            let width = line.chars().count();
            if width != cols {
                return Err(LifeError::MalformedPattern(format!(
                    "line {lineno} has {width} cells, expected {cols}"
                )));
            }
            cells.extend(line.chars().map(|c| c != '.'));
        }

        Ok(Self {
            rows: data.len(),
            cols,
            cells,
        })
    }

    /// Read and parse a pattern file. `.txt` is appended to `path` unless it
    /// already ends with it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LifeError> {
        let path = with_pattern_extension(path.as_ref());
        let text = fs::read_to_string(&path)
            .map_err(|source| LifeError::PatternFileNotFound { path, source })?;
        Self::parse(&text)
    }

    /// Stamp dimensions as `(rows, cols)`.
    pub fn size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the stamp cell at `(row, col)` is live. Out of range is dead.
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row * self.cols + col]
    }

    /// Count live cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Iterate the stamp one row at a time.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks(self.cols)
    }
}

fn with_pattern_extension(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    if !path.to_string_lossy().ends_with(PATTERN_EXTENSION) {
        name.push(PATTERN_EXTENSION);
    }
    PathBuf::from(name)
}
