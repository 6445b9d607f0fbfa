//! Piece kinds.

use crate::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The six kinds of chess piece. Side is carried separately as a [`Color`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Piece {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl Piece {
    /// All piece kinds in index order.
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    /// Pieces a pawn may promote to, strongest first.
    pub const PROMOTIONS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    const LETTERS: [char; 6] = ['p', 'n', 'b', 'r', 'q', 'k'];
    const NAMES: [&'static str; 6] = ["Pawn", "Knight", "Bishop", "Rook", "Queen", "King"];

    /// Lowercase letter used by FEN (black) and UCI promotion suffixes.
    #[inline]
    pub const fn to_char(self) -> char {
        Self::LETTERS[self.index()]
    }

    /// Parses a piece letter in either case.
    pub const fn from_char(c: char) -> Option<Piece> {
        let lower = c.to_ascii_lowercase();
        let mut i = 0;
        while i < Self::ALL.len() {
            if Self::LETTERS[i] == lower {
                return Some(Self::ALL[i]);
            }
            i += 1;
        }
        None
    }

    /// FEN letter: uppercase for White, lowercase for Black.
    pub const fn to_fen_char(self, color: Color) -> char {
        match color {
            Color::White => self.to_char().to_ascii_uppercase(),
            Color::Black => self.to_char(),
        }
    }

    /// Parses a FEN letter into a piece and its side.
    pub const fn from_fen_char(c: char) -> Option<(Piece, Color)> {
        let Some(piece) = Piece::from_char(c) else {
            return None;
        };
        match c.is_ascii_uppercase() {
            true => Some((piece, Color::White)),
            false => Some((piece, Color::Black)),
        }
    }

    /// Bishops, rooks and queens move along rays.
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, Piece::Bishop | Piece::Rook | Piece::Queen)
    }

    /// Returns true for the kinds a pawn may promote to.
    #[inline]
    pub const fn is_promotion_target(self) -> bool {
        matches!(
            self,
            Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen
        )
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::NAMES[self.index()])
    }
}

/// Serialized as its lowercase letter (`"q"`), matching UCI promotion suffixes.
impl Serialize for Piece {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.to_char())
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let c = char::deserialize(deserializer)?;
        Piece::from_char(c)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid piece letter {c:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fen_letters() {
        assert_eq!(Piece::Pawn.to_fen_char(Color::White), 'P');
        assert_eq!(Piece::Knight.to_fen_char(Color::Black), 'n');
        assert_eq!(Piece::from_fen_char('K'), Some((Piece::King, Color::White)));
        assert_eq!(Piece::from_fen_char('q'), Some((Piece::Queen, Color::Black)));
        assert_eq!(Piece::from_fen_char('x'), None);
        assert_eq!(Piece::from_fen_char('1'), None);
    }

    #[test]
    fn promotion_targets() {
        for piece in Piece::PROMOTIONS {
            assert!(piece.is_promotion_target());
        }
        assert!(!Piece::Pawn.is_promotion_target());
        assert!(!Piece::King.is_promotion_target());
    }

    #[test]
    fn letters_and_names() {
        for piece in Piece::ALL {
            assert_eq!(Piece::from_char(piece.to_char()), Some(piece));
        }
        assert_eq!(Piece::from_char('Q'), Some(Piece::Queen));
        assert_eq!(Piece::Bishop.to_string(), "Bishop");
    }

    #[test]
    fn sliders() {
        let sliders: Vec<Piece> = Piece::ALL.into_iter().filter(|p| p.is_slider()).collect();
        assert_eq!(sliders, vec![Piece::Bishop, Piece::Rook, Piece::Queen]);
    }

    #[test]
    fn serde_uses_letter() {
        assert_eq!(serde_json::to_string(&Piece::Queen).unwrap(), "\"q\"");
        let knight: Piece = serde_json::from_str("\"N\"").unwrap();
        assert_eq!(knight, Piece::Knight);
    }
}
