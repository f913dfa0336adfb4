use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use agelife::config::{DEFAULT_DENSITY, DEFAULT_HEIGHT, DEFAULT_RULE, DEFAULT_STEPS, DEFAULT_WIDTH};
use agelife::{select_view, Board, BoardConfig, ViewKind};

/// Animation frames per second.
const DEFAULT_FPS: f64 = 8.0;

/// Show a generalized Conway's Game of Life. Play with the parameters and have fun!
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Game rule as SSS/BBB (survive/birth neighbor counts) or S23/B3.
    #[arg(short, long, default_value = DEFAULT_RULE)]
    rule: String,
    /// Size of the board.
    #[arg(
        short,
        long,
        num_args = 2,
        value_names = ["WIDTH", "HEIGHT"],
        default_values_t = [DEFAULT_WIDTH, DEFAULT_HEIGHT]
    )]
    board: Vec<usize>,
    /// Pattern file to place on the board (`.txt` may be omitted).
    #[arg(short, long)]
    pattern: Option<PathBuf>,
    /// Density of live cells in a random board.
    #[arg(short, long, default_value_t = DEFAULT_DENSITY, value_parser = parse_density)]
    density: f64,
    /// Number of age steps used to shade cells.
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_STEPS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    steps: u32,
    /// Number of animation frames per second.
    #[arg(short, long, default_value_t = DEFAULT_FPS, value_parser = parse_fps)]
    fps: f64,
    /// Front end to use; falls back to the next available one.
    #[arg(short, long, value_enum, default_value_t = ViewKind::Text)]
    view: ViewKind,
    /// Seed for the random board and pattern placement.
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many generations.
    #[arg(long)]
    generations: Option<u64>,
}

impl Args {
    fn board_config(&self) -> BoardConfig {
        BoardConfig {
            rule: self.rule.clone(),
            width: self.board[0],
            height: self.board[1],
            pattern: self.pattern.clone(),
            density: self.density,
            steps: self.steps,
            seed: self.seed,
        }
    }
}

fn parse_density(value: &str) -> Result<f64, String> {
    let density: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&density) {
        Ok(density)
    } else {
        Err("density must be in range [0, 1]".into())
    }
}

fn parse_fps(value: &str) -> Result<f64, String> {
    let fps: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if fps.is_finite() && fps > 0.0 {
        Ok(fps)
    } else {
        Err("fps must be a positive number".into())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = args.board_config();
    let mut board = Board::new(&config).context("Failed to create board")?;
    log::info!(
        "Board {}x{} with rule {}, {} live cells",
        config.width,
        config.height,
        board.rule(),
        board.population()
    );

    let mut view = select_view(args.view, args.generations)?;
    log::info!("Using {} view", view.name());

    view.animate(&mut board, args.fps)
}
