//! chess-play - play against the bot in a terminal.

use anyhow::Context;
use chess_bot::{Bot, Difficulty};
use chess_core::Color;
use chess_engine::Game;
use chess_play::config::{PlayConfig, Side};
use chess_play::session::{Outcome, Session};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chess-play")]
#[command(about = "Play chess against the bot in a terminal")]
struct Cli {
    /// Configuration file (defaults to chess-play.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bot strength: beginner, intermediate, advanced or master
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// The colour you play
    #[arg(long, value_enum)]
    color: Option<Side>,

    /// Seed for the bot's random blunders
    #[arg(long)]
    seed: Option<u64>,

    /// Start from this FEN instead of the standard position
    #[arg(long)]
    fen: Option<String>,

    /// Save the finished game as PGN into this directory
    #[arg(long)]
    pgn_dir: Option<PathBuf>,

    /// Search depth, overriding the difficulty's
    #[arg(long)]
    depth: Option<u8>,
}

impl Cli {
    /// File settings with every flag given on the command line on top.
    fn merge(self, mut config: PlayConfig) -> PlayConfig {
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(color) = self.color {
            config.human_color = color;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.fen.is_some() {
            config.start_fen = self.fen;
        }
        if self.pgn_dir.is_some() {
            config.pgn_dir = self.pgn_dir;
        }
        if let Some(depth) = self.depth {
            config.depth_override.get_or_insert_with(Default::default).depth = Some(depth);
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let path = cli.config.clone().unwrap_or_else(PlayConfig::config_path);
    let file = PlayConfig::load(&path)
        .with_context(|| format!("loading {}", path.display()))?;
    let config = cli.merge(file);
    tracing::debug!(?config, "configuration");

    let game = match &config.start_fen {
        Some(fen) => Game::from_fen(fen).with_context(|| format!("invalid start position {fen:?}"))?,
        None => Game::new(),
    };

    let bot = match config.seed {
        Some(seed) => Bot::seeded(config.difficulty, seed),
        None => Bot::new(config.difficulty),
    }
    .with_profile(config.search_profile());
    tracing::info!(
        difficulty = %config.difficulty,
        depth = bot.profile().depth,
        blunder_probability = bot.profile().blunder_probability,
        "starting game"
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut session = Session::new(
        game,
        bot,
        Color::from(config.human_color),
        stdin.lock(),
        stdout.lock(),
    )
    .with_pgn_dir(config.pgn_dir.clone());

    match session.run().context("terminal I/O failed")? {
        Outcome::Finished(result) => tracing::info!(%result, "game finished"),
        Outcome::Quit => tracing::info!("left the game"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_the_file() {
        let file: PlayConfig = toml::from_str(
            "difficulty = \"beginner\"\nseed = 1\n[depth_override]\nblunder_probability = 0.5\n",
        )
        .unwrap();
        let cli = Cli::parse_from([
            "chess-play",
            "--difficulty",
            "master",
            "--color",
            "black",
            "--depth",
            "3",
        ]);
        let config = cli.merge(file);
        assert_eq!(config.difficulty, Difficulty::Master);
        assert_eq!(config.human_color, Side::Black);
        assert_eq!(config.seed, Some(1));
        let profile = config.search_profile();
        assert_eq!((profile.depth, profile.blunder_probability), (3, 0.5));
    }

    #[test]
    fn no_flags_keep_the_file() {
        let file = PlayConfig {
            pgn_dir: Some(PathBuf::from("games")),
            ..PlayConfig::default()
        };
        let config = Cli::parse_from(["chess-play"]).merge(file.clone());
        assert_eq!(config, file);
    }
}
