//! Move representation.

use crate::{Piece, Square};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// What kind of move a [`Move`] is, beyond moving one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveFlag {
    /// Plain move or capture.
    Normal,
    /// Pawn advancing two squares from its start rank.
    DoublePush,
    /// King-side castling; the rook is relocated too.
    CastleKingside,
    /// Queen-side castling; the rook is relocated too.
    CastleQueenside,
    /// Pawn capture onto the en-passant target square.
    EnPassant,
    /// Pawn reaching the last rank, replaced by the given piece.
    Promotion(Piece),
}

impl MoveFlag {
    /// Returns the promotion piece if this is a promotion.
    #[inline]
    pub const fn promotion_piece(self) -> Option<Piece> {
        match self {
            MoveFlag::Promotion(piece) => Some(piece),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        matches!(self, MoveFlag::Promotion(_))
    }

    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, MoveFlag::CastleKingside | MoveFlag::CastleQueenside)
    }
}

/// A move as produced by the engine's generator.
///
/// Carries the flag needed to play it without re-deriving the special case
/// from the board. Callers outside the engine speak [`PlayerMove`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    flag: MoveFlag,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square, flag: MoveFlag) -> Self {
        Move { from, to, flag }
    }

    /// A move with no special behaviour.
    #[inline]
    pub const fn normal(from: Square, to: Square) -> Self {
        Self::new(from, to, MoveFlag::Normal)
    }

    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    #[inline]
    pub const fn flag(self) -> MoveFlag {
        self.flag
    }

    #[inline]
    pub const fn promotion(self) -> Option<Piece> {
        self.flag.promotion_piece()
    }

    /// Returns true if this move undoes a move from `from` to `to`.
    #[inline]
    pub fn reverses(self, from: Square, to: Square) -> bool {
        self.from == to && self.to == from
    }

    /// Drops the flag, keeping only what a caller would have asked for.
    #[inline]
    pub const fn player_move(self) -> PlayerMove {
        PlayerMove {
            from: self.from,
            to: self.to,
            promotion: self.promotion(),
        }
    }

    /// UCI long-algebraic form, e.g. `"e2e4"` or `"e7e8q"`.
    pub fn to_uci(self) -> String {
        self.player_move().to_string()
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}, {:?})", self.to_uci(), self.flag)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.player_move())
    }
}

/// Error returned when a coordinate move string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid move {0:?}: expected <from><to>[q|r|b|n], e.g. e2e4 or e7e8q")]
pub struct MoveParseError(pub String);

/// The minimal `{from, to, promotion?}` triple a caller submits or receives.
///
/// Whether it is legal, and which special rule it invokes, is decided by the
/// position it is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMove {
    pub from: Square,
    pub to: Square,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<Piece>,
}

impl PlayerMove {
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        PlayerMove {
            from,
            to,
            promotion: None,
        }
    }

    #[inline]
    pub const fn with_promotion(from: Square, to: Square, piece: Piece) -> Self {
        PlayerMove {
            from,
            to,
            promotion: Some(piece),
        }
    }
}

impl From<Move> for PlayerMove {
    fn from(m: Move) -> Self {
        m.player_move()
    }
}

impl FromStr for PlayerMove {
    type Err = MoveParseError;

    /// Parses UCI coordinate notation (`"g1f3"`, `"a7a8n"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MoveParseError(s.to_string());
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(err());
        }
        let from = Square::from_algebraic(&s[0..2]).ok_or_else(err)?;
        let to = Square::from_algebraic(&s[2..4]).ok_or_else(err)?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match Piece::from_char(c) {
                Some(piece) if piece.is_promotion_target() => Some(piece),
                _ => return Err(err()),
            },
        };
        Ok(PlayerMove {
            from,
            to,
            promotion,
        })
    }
}

impl fmt::Display for PlayerMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(piece) = self.promotion {
            write!(f, "{}", piece.to_char())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{File, Rank};

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn move_accessors() {
        let m = Move::new(sq("e2"), sq("e4"), MoveFlag::DoublePush);
        assert_eq!(m.from(), Square::new(File::E, Rank::R2));
        assert_eq!(m.to(), Square::new(File::E, Rank::R4));
        assert_eq!(m.flag(), MoveFlag::DoublePush);
        assert_eq!(m.promotion(), None);
    }

    #[test]
    fn uci_text() {
        assert_eq!(Move::normal(sq("g1"), sq("f3")).to_uci(), "g1f3");
        let promo = Move::new(sq("b2"), sq("a1"), MoveFlag::Promotion(Piece::Knight));
        assert_eq!(promo.to_uci(), "b2a1n");
        assert_eq!(format!("{:?}", Move::normal(sq("a1"), sq("a2"))), "Move(a1a2, Normal)");
    }

    #[test]
    fn player_move_parse() {
        let m: PlayerMove = "e7e8q".parse().unwrap();
        assert_eq!(m, PlayerMove::with_promotion(sq("e7"), sq("e8"), Piece::Queen));
        let m: PlayerMove = "e7e8R".parse().unwrap();
        assert_eq!(m.promotion, Some(Piece::Rook));
        assert_eq!("d2d4".parse::<PlayerMove>().unwrap().promotion, None);
    }

    #[test]
    fn player_move_parse_errors() {
        for bad in ["", "e2", "e2e", "e2e9", "e7e8k", "e7e8p", "e2e4qq", "é2e4"] {
            assert!(bad.parse::<PlayerMove>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn flags_classify() {
        assert!(MoveFlag::CastleKingside.is_castling());
        assert!(MoveFlag::CastleQueenside.is_castling());
        assert!(!MoveFlag::EnPassant.is_castling());
        assert!(MoveFlag::Promotion(Piece::Bishop).is_promotion());
        assert_eq!(
            MoveFlag::Promotion(Piece::Rook).promotion_piece(),
            Some(Piece::Rook)
        );
        assert_eq!(MoveFlag::DoublePush.promotion_piece(), None);
    }

    #[test]
    fn reversal() {
        let m = Move::normal(sq("g1"), sq("f3"));
        assert!(m.reverses(sq("f3"), sq("g1")));
        assert!(!m.reverses(sq("g1"), sq("f3")));
    }

    #[test]
    fn player_move_json_shape() {
        let m = PlayerMove::new(sq("e2"), sq("e4"));
        assert_eq!(serde_json::to_string(&m).unwrap(), r#"{"from":"e2","to":"e4"}"#);
        let promo: PlayerMove =
            serde_json::from_str(r#"{"from":"a7","to":"a8","promotion":"q"}"#).unwrap();
        assert_eq!(promo.promotion, Some(Piece::Queen));
    }
}
