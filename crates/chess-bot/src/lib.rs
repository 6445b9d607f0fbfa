//! Chess bot: negamax with alpha-beta pruning over a small evaluation.
//!
//! - [`Difficulty`] / [`SearchProfile`]: search depth and blunder rate
//! - [`evaluation`]: material, centre control, pawn advancement, mobility
//! - [`ordering`]: captures and promotions first, no back-and-forth shuffling
//! - [`search`]: the negamax recursion
//! - [`Bot`]: ties them together behind [`Bot::select_move`]
//!
//! # Example
//!
//! ```
//! use chess_bot::{Bot, Difficulty};
//! use chess_engine::Position;
//!
//! let mut bot = Bot::seeded(Difficulty::Beginner, 7);
//! let position = Position::startpos();
//! let m = bot.select_move(&position).unwrap();
//! assert!(chess_engine::generate_moves(&position).contains(&m));
//! ```

mod bot;
mod difficulty;
pub mod evaluation;
pub mod ordering;
pub mod search;

pub use bot::Bot;
pub use difficulty::{Difficulty, DifficultyParseError, SearchProfile};
pub use evaluation::evaluate;
pub use search::{Searcher, MATE_SCORE};
