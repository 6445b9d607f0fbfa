//! Terminal chess against the bot.
//!
//! - [`config`] - `chess-play.toml` loading
//! - [`session`] - the read-move/bot-reply loop over any text I/O
//! - [`pgn`] - saving finished games

pub mod config;
pub mod pgn;
pub mod session;
