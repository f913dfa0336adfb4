//! Generalized Game of Life on a toroidal board.
//!
//! The [`Board`] owns the grid and the [`Rule`] and exposes the three
//! mutations a front end needs: [`Board::update`], [`Board::toggle`] and
//! [`Board::roll`]. Cells remember how many generations they have been
//! alive, up to a configurable ceiling, so a [`View`] can shade them by age.

pub mod board;
pub mod config;
pub mod error;
pub mod pattern;
pub mod rules;
pub mod view;

pub use board::{Board, Direction};
pub use config::BoardConfig;
pub use error::LifeError;
pub use pattern::Pattern;
pub use rules::Rule;
pub use view::{select_view, View, ViewKind};
