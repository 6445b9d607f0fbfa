//! Square sets packed into a `u64`.

use chess_core::{File, Rank, Square};
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

/// A set of squares, one bit per square.
///
/// Bit 0 = a1, bit 7 = h1, bit 63 = h8, matching [`Square::index`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);

    /// Single-square set.
    #[inline]
    pub const fn from_square(sq: Square) -> Self {
        Bitboard(1u64 << sq.index())
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_not_empty(self) -> bool {
        self.0 != 0
    }

    /// Number of squares in the set.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        self.0 & (1u64 << sq.index()) != 0
    }

    #[inline]
    pub const fn with(self, sq: Square) -> Self {
        Bitboard(self.0 | (1u64 << sq.index()))
    }

    #[inline]
    pub fn set(&mut self, sq: Square) {
        self.0 |= 1u64 << sq.index();
    }

    #[inline]
    pub fn clear(&mut self, sq: Square) {
        self.0 &= !(1u64 << sq.index());
    }

    /// Lowest square in the set.
    #[inline]
    pub const fn first(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(Square::from_index_masked(self.0.trailing_zeros() as u8))
        }
    }

    /// Removes and returns the lowest square in the set.
    #[inline]
    pub fn pop_first(&mut self) -> Option<Square> {
        let sq = self.first()?;
        self.0 &= self.0 - 1;
        Some(sq)
    }

    /// Iterates the squares from a1 towards h8.
    #[inline]
    pub fn squares(self) -> Squares {
        Squares(self)
    }
}

/// Forwards a binary operator and its assigning form to the inner `u64`.
macro_rules! set_operator {
    ($op:ident :: $method:ident, $assign:ident :: $assign_method:ident) => {
        impl $op for Bitboard {
            type Output = Bitboard;

            #[inline]
            fn $method(self, rhs: Bitboard) -> Bitboard {
                Bitboard($op::$method(self.0, rhs.0))
            }
        }

        impl $assign for Bitboard {
            #[inline]
            fn $assign_method(&mut self, rhs: Bitboard) {
                $assign::$assign_method(&mut self.0, rhs.0);
            }
        }
    };
}

set_operator!(BitAnd::bitand, BitAndAssign::bitand_assign);
set_operator!(BitOr::bitor, BitOrAssign::bitor_assign);
set_operator!(BitXor::bitxor, BitXorAssign::bitxor_assign);

/// Complement: every square not in the set.
impl Not for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

/// Draws the set as a board, rank 8 at the top.
impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bitboard({:#018x})", self.0)?;
        for rank in Rank::ALL.into_iter().rev() {
            let row: String = File::ALL
                .into_iter()
                .map(|file| {
                    if self.contains(Square::new(file, rank)) {
                        " X"
                    } else {
                        " ."
                    }
                })
                .collect();
            writeln!(f, "{rank}{row}")?;
        }
        write!(f, "  a b c d e f g h")
    }
}

/// Iterator returned by [`Bitboard::squares`].
pub struct Squares(Bitboard);

impl Iterator for Squares {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        self.0.pop_first()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Squares {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = Squares;

    #[inline]
    fn into_iter(self) -> Squares {
        self.squares()
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        iter.into_iter().fold(Bitboard::EMPTY, Bitboard::with)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_clear() {
        let mut bb = Bitboard::EMPTY;
        bb.set(Square::E1);
        bb.set(Square::H8);
        assert!(bb.contains(Square::E1));
        assert_eq!(bb.count(), 2);
        bb.clear(Square::E1);
        assert!(!bb.contains(Square::E1));
        assert_eq!(bb, Bitboard::from_square(Square::H8));
    }

    #[test]
    fn squares_iterate_low_to_high() {
        let bb: Bitboard = [Square::H8, Square::A1, Square::new(File::C, Rank::R3)]
            .into_iter()
            .collect();
        let squares: Vec<Square> = bb.squares().collect();
        assert_eq!(
            squares,
            vec![Square::A1, Square::new(File::C, Rank::R3), Square::H8]
        );
        assert_eq!(bb.squares().len(), 3);
    }

    #[test]
    fn operators() {
        let a = Bitboard::from_square(Square::A1) | Bitboard::from_square(Square::B1);
        let b = Bitboard::from_square(Square::B1);
        assert_eq!(a & b, b);
        assert_eq!((a ^ b).first(), Some(Square::A1));
        assert_eq!((!a).count(), 62);
        let mut c = a;
        c ^= b;
        c |= Bitboard::from_square(Square::H8);
        c &= !Bitboard::from_square(Square::A1);
        assert_eq!(c.squares().collect::<Vec<_>>(), [Square::H8]);
    }

    #[test]
    fn debug_draws_a_board() {
        let text = format!("{:?}", Bitboard::from_square(Square::H8));
        assert!(text.contains("8 . . . . . . . X"));
        assert!(text.ends_with("  a b c d e f g h"));
    }

    #[test]
    fn pop_first_drains() {
        let mut bb = Bitboard(0b1010);
        assert_eq!(bb.pop_first().map(Square::index), Some(1));
        assert_eq!(bb.pop_first().map(Square::index), Some(3));
        assert_eq!(bb.pop_first(), None);
        assert!(bb.is_empty());
    }
}
