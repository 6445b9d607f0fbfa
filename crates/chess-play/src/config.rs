//! Configuration file loading for chess-play.
//!
//! Settings come from an optional `chess-play.toml`; command-line flags
//! override whatever the file says.

use chess_bot::{Difficulty, SearchProfile};
use chess_core::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// The file is not valid TOML for [`PlayConfig`].
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// The colour the human plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Color {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

/// Replaces parts of the chosen difficulty's search settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct ProfileOverride {
    pub depth: Option<u8>,
    pub blunder_probability: Option<f64>,
}

/// Everything chess-play can be configured with.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayConfig {
    pub difficulty: Difficulty,
    pub human_color: Side,
    /// Seed for the bot's random blunders. Unset means a fresh seed.
    pub seed: Option<u64>,
    /// FEN to start from instead of the standard position.
    pub start_fen: Option<String>,
    /// Where finished games are saved as PGN. Unset means not saved.
    pub pgn_dir: Option<PathBuf>,
    pub depth_override: Option<ProfileOverride>,
}

impl PlayConfig {
    /// Loads the file at `path`, or the defaults if there is none.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// `chess-play.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from("chess-play.toml")
    }

    /// The difficulty's search settings with any override applied.
    pub fn search_profile(&self) -> SearchProfile {
        let mut profile = self.difficulty.profile();
        if let Some(o) = self.depth_override {
            if let Some(depth) = o.depth {
                profile.depth = depth;
            }
            if let Some(p) = o.blunder_probability {
                profile.blunder_probability = p;
            }
        }
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: PlayConfig = toml::from_str("").unwrap();
        assert_eq!(config, PlayConfig::default());
        assert_eq!(config.difficulty, Difficulty::Intermediate);
        assert_eq!(config.human_color, Side::White);
        assert_eq!(config.search_profile(), Difficulty::Intermediate.profile());
    }

    #[test]
    fn full_file() {
        let config: PlayConfig = toml::from_str(
            r#"
difficulty = "master"
human_color = "black"
seed = 42
start_fen = "4k3/8/8/8/8/8/8/4K2R w K - 0 1"
pgn_dir = "games"

[depth_override]
depth = 2
"#,
        )
        .unwrap();
        assert_eq!(config.difficulty, Difficulty::Master);
        assert_eq!(Color::from(config.human_color), Color::Black);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.pgn_dir, Some(PathBuf::from("games")));
        assert_eq!(config.search_profile(), SearchProfile::new(2, 0.0));
    }

    #[test]
    fn unknown_difficulty_is_a_parse_error() {
        let err = toml::from_str::<PlayConfig>("difficulty = \"godlike\"").unwrap_err();
        assert!(err.to_string().contains("godlike"));
    }

    #[test]
    fn load_reads_files_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chess-play.toml");
        assert_eq!(PlayConfig::load(&path).unwrap(), PlayConfig::default());

        std::fs::write(&path, "difficulty = \"beginner\"\n").unwrap();
        assert_eq!(PlayConfig::load(&path).unwrap().difficulty, Difficulty::Beginner);

        std::fs::write(&path, "difficulty = [").unwrap();
        assert!(matches!(PlayConfig::load(&path), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn config_path_is_in_the_working_directory() {
        assert_eq!(PlayConfig::config_path(), PathBuf::from("chess-play.toml"));
    }
}
