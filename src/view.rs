use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;

use crate::board::{Board, Direction};
use crate::error::LifeError;

/// Characters used to draw cells, from dead to full age.
const GLYPHS: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Clear the screen and move the cursor home.
const CLEAR: &str = "\x1b[H\x1b[2J";

/// A front end that drives a board and shows it.
///
/// Implementations call [`Board::update`] at most once per frame, and only
/// while running. Input may toggle or roll the board at any time.
pub trait View {
    fn name(&self) -> &'static str;

    /// Run the frame loop until the user quits or the generation limit is hit.
    fn animate(&mut self, board: &mut Board, fps: f64) -> anyhow::Result<()>;
}

/// The available front ends, in fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ViewKind {
    /// Redraw the board in the terminal and read commands from stdin.
    Text,
    /// Step the board without drawing, logging population as it goes.
    Headless,
}

const RANKED_VIEWS: [ViewKind; 2] = [ViewKind::Text, ViewKind::Headless];

impl ViewKind {
    /// Build the view if its requirements are met on this process.
    fn open(self, limit: Option<u64>) -> Result<Box<dyn View>, String> {
        match self {
            ViewKind::Text => {
                if !io::stdout().is_terminal() {
                    return Err("stdout is not a terminal".into());
                }
                Ok(Box::new(TextView::new(limit)))
            }
            ViewKind::Headless => Ok(Box::new(HeadlessView::new(limit))),
        }
    }
}

/// Pick a view, trying `requested` first and then the rest in rank order.
pub fn select_view(requested: ViewKind, limit: Option<u64>) -> Result<Box<dyn View>, LifeError> {
    let order = std::iter::once(requested).chain(RANKED_VIEWS.into_iter().filter(|&k| k != requested));

    let mut failures = Vec::new();
    for kind in order {
        match kind.open(limit) {
            Ok(view) => {
                if !failures.is_empty() {
                    log::warn!("Falling back to {} view", view.name());
                }
                return Ok(view);
            }
            Err(reason) => {
                log::warn!("{kind:?} view unavailable: {reason}");
                failures.push(format!("{kind:?}: {reason}"));
            }
        }
    }
    Err(LifeError::ViewUnavailable(failures.join("; ")))
}

/// User input understood by the interactive view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    Step,
    Roll(Direction),
    Toggle(isize, isize),
    Quit,
}

impl Command {
    /// Parse one input line. An empty line pauses or resumes.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return Some(Command::TogglePause);
        };
        let command = match word.to_ascii_lowercase().as_str() {
            "p" | "pause" => Command::TogglePause,
            "n" | "next" => Command::Step,
            "w" | "up" => Command::Roll(Direction::Up),
            "s" | "down" => Command::Roll(Direction::Down),
            "a" | "left" => Command::Roll(Direction::Left),
            "d" | "right" => Command::Roll(Direction::Right),
            "q" | "quit" => Command::Quit,
            "t" | "toggle" => {
                let row = words.next()?.parse().ok()?;
                let col = words.next()?.parse().ok()?;
                Command::Toggle(row, col)
            }
            _ => return None,
        };
        words.next().is_none().then_some(command)
    }
}

/// Run/pause state shared by the views.
#[derive(Debug)]
struct Session {
    running: bool,
    limit: Option<u64>,
}

impl Session {
    fn new(limit: Option<u64>) -> Self {
        Self { running: true, limit }
    }

    fn finished(&self, board: &Board) -> bool {
        self.limit.is_some_and(|limit| board.generation() >= limit)
    }

    /// Apply one command. Returns `false` when the loop should stop.
    fn apply(&mut self, board: &mut Board, command: Command) -> bool {
        match command {
            Command::TogglePause => {
                self.running = !self.running;
                log::info!("Simulation {}", if self.running { "resumed" } else { "paused" });
            }
            Command::Step if !self.running => board.update(),
            Command::Step => {}
            Command::Roll(direction) => board.roll(direction),
            Command::Toggle(row, col) => board.toggle(row, col),
            Command::Quit => return false,
        }
        true
    }
}

fn frame_interval(fps: f64) -> anyhow::Result<Duration> {
    anyhow::ensure!(fps.is_finite() && fps > 0.0, "fps must be positive, got {fps}");
    Ok(Duration::from_secs_f64(1.0 / fps))
}

/// Pick the glyph for a cell of `age` on a board whose cells reach `steps`.
/// Dead cells are blank and full-age cells use the densest glyph.
pub fn glyph(age: u32, steps: u32) -> char {
    if age == 0 || steps == 0 {
        return GLYPHS[0];
    }
    let top = GLYPHS.len() - 1;
    let age = age.min(steps) as usize;
    let steps = steps as usize;
    GLYPHS[(age * top).div_ceil(steps)]
}

/// Draw the board and a status line as text.
pub fn render(board: &Board, paused: bool, out: &mut impl Write) -> io::Result<()> {
    let steps = board.steps();
    for row in board.iter_rows() {
        let line: String = row.iter().map(|&age| glyph(age, steps)).collect();
        writeln!(out, "{line}")?;
    }
    writeln!(
        out,
        "gen {} | pop {} | {}{}",
        board.generation(),
        board.population(),
        board.rule(),
        if paused { " | paused" } else { "" }
    )
}

/// Input help shown by the text view, as (example input, action).
const COMMAND_HELP: [(&str, &str); 6] = [
    ("<Enter>/p", "Pause / Resume"),
    ("n", "Step (when paused)"),
    ("w/a/s/d", "Shift board up/left/down/right"),
    ("t ROW COL", "Toggle cell"),
    ("q", "Quit"),
    ("up/left/down/right", "Same as w/a/s/d"),
];

/// Terminal front end.
pub struct TextView {
    session: Session,
    commands: Receiver<Command>,
}

impl TextView {
    pub fn new(limit: Option<u64>) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for line in io::stdin().lock().lines().map_while(Result::ok) {
                match Command::parse(&line) {
                    Some(command) => {
                        if tx.send(command).is_err() {
                            break;
                        }
                    }
                    None => log::warn!("Unrecognized command: {line:?}"),
                }
            }
        });
        Self {
            session: Session::new(limit),
            commands: rx,
        }
    }

    /// Apply all pending commands. Returns `false` on quit.
    fn drain_commands(&mut self, board: &mut Board) -> bool {
        loop {
            match self.commands.try_recv() {
                Ok(command) => {
                    if !self.session.apply(board, command) {
                        return false;
                    }
                }
                // Closed stdin only ends input, not the animation.
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return true,
            }
        }
    }
}

impl View for TextView {
    fn name(&self) -> &'static str {
        "text"
    }

    fn animate(&mut self, board: &mut Board, fps: f64) -> anyhow::Result<()> {
        let interval = frame_interval(fps)?;
        let stdout = io::stdout();

        log::info!("Commands (type and press Enter):");
        for (keys, action) in COMMAND_HELP {
            log::info!("  {keys:<18} - {action}");
        }

        loop {
            let frame_start = Instant::now();
            if !self.drain_commands(board) {
                log::info!("Quit at generation {}", board.generation());
                return Ok(());
            }
            if self.session.running {
                board.update();
            }

            let mut out = stdout.lock();
            write!(out, "{CLEAR}").context("failed to write to terminal")?;
            render(board, !self.session.running, &mut out).context("failed to write to terminal")?;
            out.flush().context("failed to flush terminal")?;
            drop(out);

            if self.session.finished(board) {
                return Ok(());
            }
            thread::sleep(interval.saturating_sub(frame_start.elapsed()));
        }
    }
}

/// Front end that only steps the board.
pub struct HeadlessView {
    session: Session,
}

impl HeadlessView {
    pub fn new(limit: Option<u64>) -> Self {
        Self {
            session: Session::new(limit),
        }
    }
}

impl View for HeadlessView {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn animate(&mut self, board: &mut Board, fps: f64) -> anyhow::Result<()> {
        let interval = frame_interval(fps)?;
        while !self.session.finished(board) {
            let frame_start = Instant::now();
            board.update();
            log::info!("Generation {}: population {}", board.generation(), board.population());
            thread::sleep(interval.saturating_sub(frame_start.elapsed()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rule;

    fn pair_board() -> Board {
        let mut board = Board::empty(Rule::conway(), 4, (1, 3)).unwrap();
        board.toggle(0, 1);
        board.toggle(0, 2);
        board
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse(""), Some(Command::TogglePause));
        assert_eq!(Command::parse("  "), Some(Command::TogglePause));
        assert_eq!(Command::parse("p"), Some(Command::TogglePause));
        assert_eq!(Command::parse("n"), Some(Command::Step));
        assert_eq!(Command::parse("W"), Some(Command::Roll(Direction::Up)));
        assert_eq!(Command::parse("down"), Some(Command::Roll(Direction::Down)));
        assert_eq!(Command::parse("a"), Some(Command::Roll(Direction::Left)));
        assert_eq!(Command::parse("right"), Some(Command::Roll(Direction::Right)));
        assert_eq!(Command::parse("t 3 -1"), Some(Command::Toggle(3, -1)));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
    }

    #[test]
    fn help_lists_only_parsable_commands() {
        for (keys, _) in COMMAND_HELP {
            for key in keys.split('/') {
                let input = match key {
                    "<Enter>" => String::new(),
                    other => other.replace("ROW", "1").replace("COL", "2"),
                };
                assert!(Command::parse(&input).is_some(), "help mentions {key:?}");
            }
        }
    }

    #[test]
    fn rejects_bad_commands() {
        assert_eq!(Command::parse("jump"), None);
        assert_eq!(Command::parse("t 3"), None);
        assert_eq!(Command::parse("t x 2"), None);
        assert_eq!(Command::parse("q now"), None);
    }

    #[test]
    fn glyph_ramp() {
        assert_eq!(glyph(0, 4), ' ');
        assert_eq!(glyph(4, 4), '@');
        assert_eq!(glyph(9, 4), '@');
        assert_eq!(glyph(1, 1), '@');
        assert_ne!(glyph(1, 4), ' ');
        assert!(glyph(1, 4) != glyph(3, 4));
    }

    #[test]
    fn session_steps_only_when_paused() {
        let mut board = Board::empty(Rule::conway(), 4, (5, 5)).unwrap();
        let mut session = Session::new(None);

        assert!(session.apply(&mut board, Command::Step));
        assert_eq!(board.generation(), 0);

        assert!(session.apply(&mut board, Command::TogglePause));
        assert!(!session.running);
        assert!(session.apply(&mut board, Command::Step));
        assert_eq!(board.generation(), 1);

        assert!(!session.apply(&mut board, Command::Quit));
    }

    #[test]
    fn session_edits_board() {
        let mut board = Board::empty(Rule::conway(), 4, (5, 5)).unwrap();
        let mut session = Session::new(Some(3));

        session.apply(&mut board, Command::Toggle(0, 0));
        assert_eq!(board.get(0, 0), Some(4));
        session.apply(&mut board, Command::Roll(Direction::Right));
        assert_eq!(board.get(0, 1), Some(4));
        session.apply(&mut board, Command::Toggle(9, 9));
        assert_eq!(board.population(), 1);
        assert!(!session.finished(&board));
    }

    #[test]
    fn render_draws_rows_and_status() {
        let board = pair_board();
        let mut out = Vec::new();
        render(&board, true, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], " @@");
        assert_eq!(lines[1], "gen 0 | pop 2 | B3/S23 | paused");
    }

    #[test]
    fn headless_runs_to_limit() {
        let mut board = Board::empty(Rule::conway(), 4, (4, 4)).unwrap();
        let mut view = HeadlessView::new(Some(5));
        view.animate(&mut board, 1000.0).unwrap();
        assert_eq!(board.generation(), 5);
    }

    #[test]
    fn headless_rejects_bad_fps() {
        let mut board = Board::empty(Rule::conway(), 4, (4, 4)).unwrap();
        let mut view = HeadlessView::new(Some(1));
        assert!(view.animate(&mut board, 0.0).is_err());
        assert!(view.animate(&mut board, f64::NAN).is_err());
    }

    #[test]
    fn headless_is_always_selectable() {
        let view = select_view(ViewKind::Headless, Some(1)).unwrap();
        assert_eq!(view.name(), "headless");
    }
}
