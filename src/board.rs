use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::BoardConfig;
use crate::error::LifeError;
use crate::pattern::Pattern;
use crate::rules::Rule;

/// Largest cell count whose storage and signed index math cannot overflow.
const MAX_CELLS: usize = isize::MAX as usize / std::mem::size_of::<u32>();

/// Unit shifts accepted by [`Board::roll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The shift as `(d_row, d_col)`.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Toroidal board of ageing cells.
///
/// Cell value `0` is dead. A live cell holds its age, `1..=steps`: it is
/// `1` on the generation it is born and grows by one per generation it
/// survives, saturating at `steps`. Age is only for display; the rule
/// looks at liveness alone.
///
/// All coordinates are `(row, col)`. Storage is row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<u32>,
    rule: Rule,
    steps: u32,
    generation: u64,
}

impl Board {
    /// Build a board from a configuration, seeding from `config.seed` when
    /// present and from OS entropy otherwise.
    pub fn new(config: &BoardConfig) -> Result<Self, LifeError> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, &mut rng)
    }

    /// Build a board from a configuration using the caller's RNG.
    pub fn with_rng<R: Rng>(config: &BoardConfig, rng: &mut R) -> Result<Self, LifeError> {
        let rule = Rule::parse(&config.rule)?;
        check_density(config.density)?;
        match &config.pattern {
            Some(path) => {
                let pattern = Pattern::load(path)?;
                Self::from_pattern(&pattern, rule, config.steps, config.dims(), rng)
            }
            None => Self::random(rule, config.steps, config.dims(), config.density, rng),
        }
    }

    /// An all-dead board of `(rows, cols)` cells.
    pub fn empty(rule: Rule, steps: u32, (rows, cols): (usize, usize)) -> Result<Self, LifeError> {
        if steps == 0 {
            return Err(LifeError::InvalidSteps);
        }
        if rows == 0 || cols == 0 {
            return Err(LifeError::EmptyBoard { rows, cols });
        }
        let len = rows
            .checked_mul(cols)
            .filter(|&len| len <= MAX_CELLS)
            .ok_or(LifeError::BoardTooLarge { rows, cols })?;
        Ok(Self {
            rows,
            cols,
            cells: vec![0; len],
            rule,
            steps,
            generation: 0,
        })
    }

    /// Fill with random cells at the given density (0.0 = empty, 1.0 = full).
    /// Live cells start at full age.
    pub fn random<R: Rng>(
        rule: Rule,
        steps: u32,
        dims: (usize, usize),
        density: f64,
        rng: &mut R,
    ) -> Result<Self, LifeError> {
        check_density(density)?;
        let mut board = Self::empty(rule, steps, dims)?;
        for cell in &mut board.cells {
            *cell = if rng.gen_range(0.0..1.0) < density { steps } else { 0 };
        }
        Ok(board)
    }

    /// Stamp `pattern` at a uniformly random position where it fits
    /// entirely. Live stamp cells start at full age.
    pub fn from_pattern<R: Rng>(
        pattern: &Pattern,
        rule: Rule,
        steps: u32,
        dims: (usize, usize),
        rng: &mut R,
    ) -> Result<Self, LifeError> {
        let mut board = Self::empty(rule, steps, dims)?;
        let (p_rows, p_cols) = pattern.size();
        if board.rows < p_rows || board.cols < p_cols {
            return Err(LifeError::PatternTooSmall {
                board_rows: board.rows,
                board_cols: board.cols,
                pattern_rows: p_rows,
                pattern_cols: p_cols,
            });
        }

        let d0 = rng.gen_range(0..=board.rows - p_rows);
        let d1 = rng.gen_range(0..=board.cols - p_cols);
        for (r, stamp_row) in pattern.iter_rows().enumerate() {
            let start = (d0 + r) * board.cols + d1;
            let row = &mut board.cells[start..start + p_cols];
            for (cell, &alive) in row.iter_mut().zip(stamp_row) {
                *cell = if alive { steps } else { 0 };
            }
        }
        Ok(board)
    }

    /// Advance one generation.
    ///
    /// Neighbor counts come from the grid as it was before the call, so
    /// every cell sees the same snapshot. Survivors age by one (capped at
    /// `steps`), births start at age 1 and deaths reset to 0.
    pub fn update(&mut self) {
        let counts = self.neighbor_counts();
        let rule = self.rule;
        let steps = self.steps;

        for (cell, count) in self.cells.iter_mut().zip(counts) {
            *cell = match *cell {
                0 if rule.rises(count) => 1,
                0 => 0,
                _ if rule.falls(count) => 0,
                age => (age + 1).min(steps),
            };
        }
        self.generation += 1;
    }

    /// Live Moore-neighbor count of every cell with toroidal wrapping.
    fn neighbor_counts(&self) -> Vec<u32> {
        let h = self.rows as isize;
        let w = self.cols as isize;
        let mut counts = vec![0u32; self.cells.len()];

        for y in 0..h {
            for x in 0..w {
                let mut count = 0u32;
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let ny = (y + dy).rem_euclid(h);
                        let nx = (x + dx).rem_euclid(w);
                        count += u32::from(self.cells[(ny * w + nx) as usize] > 0);
                    }
                }
                counts[(y * w + x) as usize] = count;
            }
        }
        counts
    }

    /// Flip a cell: live becomes dead, dead becomes live at full age.
    /// Coordinates off the board are ignored.
    pub fn toggle(&mut self, row: isize, col: isize) {
        let (Ok(row), Ok(col)) = (usize::try_from(row), usize::try_from(col)) else {
            return;
        };
        if row >= self.rows || col >= self.cols {
            return;
        }
        let cell = &mut self.cells[row * self.cols + col];
        *cell = if *cell > 0 { 0 } else { self.steps };
    }

    /// Shift the whole board one cell in `direction`, wrapping at the edges.
    pub fn roll(&mut self, direction: Direction) {
        let (d_rows, d_cols) = direction.offset();
        self.roll_by(d_rows, d_cols);
    }

    /// Cyclically shift the board by `d_rows` rows and `d_cols` columns.
    /// Positive values move content down and right.
    pub fn roll_by(&mut self, d_rows: isize, d_cols: isize) {
        let dr = d_rows.rem_euclid(self.rows as isize) as usize;
        let dc = d_cols.rem_euclid(self.cols as isize) as usize;

        self.cells.rotate_right(dr * self.cols);
        if dc != 0 {
            for row in self.cells.chunks_mut(self.cols) {
                row.rotate_right(dc);
            }
        }
    }

    /// Board dimensions as `(rows, cols)`.
    pub fn size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Maximum cell age.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Number of `update` calls since construction.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Row-major cell ages.
    pub fn data(&self) -> &[u32] {
        &self.cells
    }

    /// Age of the cell at `(row, col)`, `None` off the board.
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        (row < self.rows && col < self.cols).then(|| self.cells[row * self.cols + col])
    }

    /// One row of cell ages.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()`.
    pub fn row(&self, row: usize) -> &[u32] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Iterate the board one row at a time.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[u32]> {
        self.cells.chunks(self.cols)
    }

    /// Count live cells.
    pub fn population(&self) -> u64 {
        self.cells.iter().filter(|&&c| c > 0).count() as u64
    }
}

fn check_density(density: f64) -> Result<(), LifeError> {
    if (0.0..=1.0).contains(&density) {
        Ok(())
    } else {
        Err(LifeError::InvalidDensity(density))
    }
}
