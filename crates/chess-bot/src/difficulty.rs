//! Bot strength levels and the search settings they stand for.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How strongly the bot plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Master,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
        Difficulty::Master,
    ];

    /// The search settings this level plays with.
    pub const fn profile(self) -> SearchProfile {
        match self {
            Difficulty::Beginner => SearchProfile::new(2, 0.35),
            Difficulty::Intermediate => SearchProfile::new(3, 0.12),
            Difficulty::Advanced => SearchProfile::new(4, 0.0),
            Difficulty::Master => SearchProfile::new(5, 0.0),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Master => "master",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty {0:?} (expected beginner, intermediate, advanced or master)")]
pub struct DifficultyParseError(pub String);

impl FromStr for Difficulty {
    type Err = DifficultyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DifficultyParseError(s.to_string()))
    }
}

/// Search depth in plies and the chance of playing a random move instead
/// of searching.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchProfile {
    pub depth: u8,
    pub blunder_probability: f64,
}

impl SearchProfile {
    pub const fn new(depth: u8, blunder_probability: f64) -> Self {
        SearchProfile {
            depth,
            blunder_probability,
        }
    }

    /// Probability clamped into `[0, 1]`, with NaN treated as zero.
    pub fn clamped_blunder_probability(&self) -> f64 {
        if self.blunder_probability.is_nan() {
            0.0
        } else {
            self.blunder_probability.clamp(0.0, 1.0)
        }
    }
}

impl From<Difficulty> for SearchProfile {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.profile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles() {
        assert_eq!(Difficulty::Beginner.profile(), SearchProfile::new(2, 0.35));
        assert_eq!(Difficulty::Intermediate.profile(), SearchProfile::new(3, 0.12));
        assert_eq!(Difficulty::Advanced.profile().blunder_probability, 0.0);
        assert_eq!(Difficulty::Master.profile().depth, 5);
    }

    #[test]
    fn parse_and_display() {
        for d in Difficulty::ALL {
            assert_eq!(d.to_string().parse::<Difficulty>(), Ok(d));
        }
        assert_eq!(" Master ".parse::<Difficulty>(), Ok(Difficulty::Master));
        assert!("grandmaster".parse::<Difficulty>().is_err());
    }

    #[test]
    fn serde_is_lowercase() {
        let json = serde_json::to_string(&Difficulty::Advanced).unwrap();
        assert_eq!(json, "\"advanced\"");
        let back: Difficulty = serde_json::from_str("\"beginner\"").unwrap();
        assert_eq!(back, Difficulty::Beginner);
    }

    #[test]
    fn probability_is_clamped() {
        assert_eq!(SearchProfile::new(1, 1.7).clamped_blunder_probability(), 1.0);
        assert_eq!(SearchProfile::new(1, -0.2).clamped_blunder_probability(), 0.0);
        assert_eq!(SearchProfile::new(1, f64::NAN).clamped_blunder_probability(), 0.0);
    }
}
