//! Side representation.

use crate::Rank;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Not;

/// One of the two sides of a game.
///
/// Serialized as `"w"` / `"b"`, the same letters FEN uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Color {
    #[serde(rename = "w")]
    White = 0,
    #[serde(rename = "b")]
    Black = 1,
}

impl Color {
    /// Both sides, white first.
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    /// Returns the other side.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Index into per-color tables (0 for White, 1 for Black).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Rank delta of a single pawn push.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// The rank the king and rooks start on.
    #[inline]
    pub const fn home_rank(self) -> Rank {
        match self {
            Color::White => Rank::R1,
            Color::Black => Rank::R8,
        }
    }

    /// The rank this side's pawns start on (and may double-push from).
    #[inline]
    pub const fn pawn_rank(self) -> Rank {
        match self {
            Color::White => Rank::R2,
            Color::Black => Rank::R7,
        }
    }

    /// The rank this side's pawns promote on.
    #[inline]
    pub const fn promotion_rank(self) -> Rank {
        match self {
            Color::White => Rank::R8,
            Color::Black => Rank::R1,
        }
    }

    /// The FEN side-to-move letter.
    #[inline]
    pub const fn fen_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    /// Parses a FEN side-to-move letter.
    pub const fn from_fen_char(c: char) -> Option<Self> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }
}

impl Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.opposite()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "White",
            Color::Black => "Black",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_and_not_agree() {
        for color in Color::BOTH {
            assert_eq!(!color, color.opposite());
            assert_eq!(!!color, color);
        }
    }

    #[test]
    fn ranks_per_side() {
        assert_eq!(Color::White.pawn_rank(), Rank::R2);
        assert_eq!(Color::Black.pawn_rank(), Rank::R7);
        assert_eq!(Color::White.promotion_rank(), Rank::R8);
        assert_eq!(Color::Black.promotion_rank(), Rank::R1);
        assert_eq!(Color::Black.home_rank(), Rank::R8);
    }

    #[test]
    fn fen_letters() {
        assert_eq!(Color::from_fen_char('w'), Some(Color::White));
        assert_eq!(Color::from_fen_char('b'), Some(Color::Black));
        assert_eq!(Color::from_fen_char('W'), None);
        assert_eq!(Color::Black.fen_char(), 'b');
    }

    #[test]
    fn serializes_as_fen_letter() {
        assert_eq!(serde_json::to_string(&Color::White).unwrap(), "\"w\"");
        let parsed: Color = serde_json::from_str("\"b\"").unwrap();
        assert_eq!(parsed, Color::Black);
    }
}
