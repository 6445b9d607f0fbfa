//! Saving finished games as PGN files.

use chess_engine::Game;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Player names for the `White` and `Black` tags.
#[derive(Debug, Clone)]
pub struct Players {
    pub white: String,
    pub black: String,
}

/// Renders `game` as a PGN document played on `date`.
pub fn render(game: &Game, players: &Players, date: DateTime<Local>) -> String {
    let date = date.format("%Y.%m.%d").to_string();
    game.to_pgn(&[
        ("Event", "Casual game"),
        ("Site", "chess-play"),
        ("Date", &date),
        ("Round", "-"),
        ("White", &players.white),
        ("Black", &players.black),
    ])
}

/// Writes `game` into `dir`, creating it if needed, under a name derived
/// from the current time. Returns the file's path.
pub fn save(dir: &Path, game: &Game, players: &Players) -> std::io::Result<PathBuf> {
    let now = Local::now();
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("game-{}.pgn", now.format("%Y%m%d-%H%M%S")));
    std::fs::write(&path, render(game, players, now))?;
    Ok(path)
}
