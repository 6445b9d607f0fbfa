//! Castling rights.

use crate::Color;
use std::fmt;

/// Which rook a king castles with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    /// Short castling, towards the h-file (O-O).
    King,
    /// Long castling, towards the a-file (O-O-O).
    Queen,
}

/// The four independent castling permissions.
///
/// A right only says that neither the king nor that rook has moved (or been
/// captured); whether castling is currently playable is decided by move
/// generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    const fn bit(color: Color, side: CastleSide) -> u8 {
        let shift = match (color, side) {
            (Color::White, CastleSide::King) => 0,
            (Color::White, CastleSide::Queen) => 1,
            (Color::Black, CastleSide::King) => 2,
            (Color::Black, CastleSide::Queen) => 3,
        };
        1 << shift
    }

    /// Returns true if `color` still holds the right to castle on `side`.
    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::bit(color, side) != 0
    }

    /// Grants a right.
    #[inline]
    pub fn grant(&mut self, color: Color, side: CastleSide) {
        self.0 |= Self::bit(color, side);
    }

    /// Revokes one right.
    #[inline]
    pub fn revoke(&mut self, color: Color, side: CastleSide) {
        self.0 &= !Self::bit(color, side);
    }

    /// Revokes both rights of a side (its king moved).
    #[inline]
    pub fn revoke_all(&mut self, color: Color) {
        self.revoke(color, CastleSide::King);
        self.revoke(color, CastleSide::Queen);
    }

    /// Returns true if no right remains.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw bits, white king-side in bit 0 through black queen-side in bit 3.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Parses the FEN castling field (`"KQkq"`, `"Kq"`, `"-"`).
    ///
    /// Letters must appear at most once and in `KQkq` order.
    pub fn from_fen(field: &str) -> Option<Self> {
        if field == "-" {
            return Some(Self::NONE);
        }
        if field.is_empty() {
            return None;
        }
        let mut rights = Self::NONE;
        let mut last = None;
        for c in field.chars() {
            let (order, color, side) = match c {
                'K' => (0, Color::White, CastleSide::King),
                'Q' => (1, Color::White, CastleSide::Queen),
                'k' => (2, Color::Black, CastleSide::King),
                'q' => (3, Color::Black, CastleSide::Queen),
                _ => return None,
            };
            if last.is_some_and(|prev| prev >= order) {
                return None;
            }
            last = Some(order);
            rights.grant(color, side);
        }
        Some(rights)
    }
}

impl fmt::Display for CastlingRights {
    /// Writes the FEN castling field.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        let letters = [
            ('K', Color::White, CastleSide::King),
            ('Q', Color::White, CastleSide::Queen),
            ('k', Color::Black, CastleSide::King),
            ('q', Color::Black, CastleSide::Queen),
        ];
        for (letter, color, side) in letters {
            if self.has(color, side) {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revoke_one_side() {
        let mut rights = CastlingRights::ALL;
        rights.revoke(Color::White, CastleSide::King);
        assert!(!rights.has(Color::White, CastleSide::King));
        assert!(rights.has(Color::White, CastleSide::Queen));
        assert!(rights.has(Color::Black, CastleSide::King));
    }

    #[test]
    fn revoke_all_for_color() {
        let mut rights = CastlingRights::ALL;
        rights.revoke_all(Color::Black);
        assert_eq!(rights.to_string(), "KQ");
        rights.revoke_all(Color::White);
        assert!(rights.is_empty());
        assert_eq!(rights.to_string(), "-");
    }

    #[test]
    fn fen_field() {
        assert_eq!(CastlingRights::from_fen("KQkq"), Some(CastlingRights::ALL));
        assert_eq!(CastlingRights::from_fen("-"), Some(CastlingRights::NONE));
        assert_eq!(CastlingRights::from_fen("Kq").map(|r| r.to_string()), Some("Kq".into()));
        assert_eq!(CastlingRights::from_fen("KK"), None);
        assert_eq!(CastlingRights::from_fen("qK"), None);
        assert_eq!(CastlingRights::from_fen("X"), None);
        assert_eq!(CastlingRights::from_fen(""), None);
    }
}
