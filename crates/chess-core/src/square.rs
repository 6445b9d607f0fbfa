//! Board coordinates.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Write as _};
use std::str::FromStr;
use thiserror::Error;

/// Files and ranks only differ in their label alphabet.
macro_rules! board_axis {
    ($(#[$meta:meta])* $name:ident, first_label = $base:literal, [$($variant:ident),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: [$name; 8] = [$($name::$variant),+];

            /// `None` unless `index < 8`.
            #[inline]
            pub const fn from_index(index: u8) -> Option<Self> {
                if index < 8 {
                    Some(Self::ALL[index as usize])
                } else {
                    None
                }
            }

            /// Parses the label character used in square names.
            #[inline]
            pub const fn from_char(c: char) -> Option<Self> {
                if c.is_ascii() {
                    Self::from_index((c as u8).wrapping_sub($base))
                } else {
                    None
                }
            }

            #[inline]
            pub const fn index(self) -> u8 {
                self as u8
            }

            #[inline]
            pub const fn to_char(self) -> char {
                ($base + self as u8) as char
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_char(self.to_char())
            }
        }
    };
}

board_axis!(
    /// A column of the board, labelled `a` to `h`.
    File,
    first_label = b'a',
    [A, B, C, D, E, F, G, H]
);

board_axis!(
    /// A row of the board, labelled `1` to `8` from White's side.
    Rank,
    first_label = b'1',
    [R1, R2, R3, R4, R5, R6, R7, R8]
);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid square: {0:?}")]
pub struct SquareParseError(pub String);

/// One of the 64 squares, numbered rank by rank from a1 (0) to h8 (63).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    #[inline]
    pub const fn new(file: File, rank: Rank) -> Self {
        Square(rank.index() << 3 | file.index())
    }

    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Keeps the low six bits, for indices that come from bit scans.
    #[inline]
    pub const fn from_index_masked(index: u8) -> Self {
        Square(index & 63)
    }

    /// Zero-based coordinates that may fall off the board, as produced by
    /// adding a direction to a square.
    #[inline]
    pub const fn from_coords(file: i8, rank: i8) -> Option<Self> {
        match (file, rank) {
            (0..=7, 0..=7) => Some(Square((rank as u8) << 3 | file as u8)),
            _ => None,
        }
    }

    /// Parses a label such as `"e4"`; usable in constants.
    pub const fn from_algebraic(s: &str) -> Option<Self> {
        let [file, rank] = match s.as_bytes() {
            [file, rank] => [*file, *rank],
            _ => return None,
        };
        match (File::from_char(file as char), Rank::from_char(rank as char)) {
            (Some(file), Some(rank)) => Some(Square::new(file, rank)),
            _ => None,
        }
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn file(self) -> File {
        File::ALL[(self.0 & 7) as usize]
    }

    #[inline]
    pub const fn rank(self) -> Rank {
        Rank::ALL[(self.0 >> 3) as usize]
    }

    /// The square reached by stepping `file_delta` files and `rank_delta`
    /// ranks, if it exists.
    #[inline]
    pub const fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        Self::from_coords(
            self.file().index() as i8 + file_delta,
            self.rank().index() as i8 + rank_delta,
        )
    }

    /// a1 is dark, h1 is light.
    #[inline]
    pub const fn is_light(self) -> bool {
        (self.file().index() ^ self.rank().index()) & 1 == 1
    }

    /// The same file seen from the other side: e2 becomes e7.
    #[inline]
    pub const fn flip_rank(self) -> Self {
        Square(self.0 ^ 56)
    }

    pub fn to_algebraic(self) -> String {
        self.to_string()
    }

    /// a1, b1, ..., h8.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square)
    }

    // Castling and promotion code refers to the back ranks by name.
    pub const A1: Square = Square::new(File::A, Rank::R1);
    pub const B1: Square = Square::new(File::B, Rank::R1);
    pub const C1: Square = Square::new(File::C, Rank::R1);
    pub const D1: Square = Square::new(File::D, Rank::R1);
    pub const E1: Square = Square::new(File::E, Rank::R1);
    pub const F1: Square = Square::new(File::F, Rank::R1);
    pub const G1: Square = Square::new(File::G, Rank::R1);
    pub const H1: Square = Square::new(File::H, Rank::R1);
    pub const A8: Square = Square::new(File::A, Rank::R8);
    pub const B8: Square = Square::new(File::B, Rank::R8);
    pub const C8: Square = Square::new(File::C, Rank::R8);
    pub const D8: Square = Square::new(File::D, Rank::R8);
    pub const E8: Square = Square::new(File::E, Rank::R8);
    pub const F8: Square = Square::new(File::F, Rank::R8);
    pub const G8: Square = Square::new(File::G, Rank::R8);
    pub const H8: Square = Square::new(File::H, Rank::R8);
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s).ok_or_else(|| SquareParseError(s.to_string()))
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({self})")
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.file().to_char())?;
        f.write_char(self.rank().to_char())
    }
}

/// Squares travel as their labels, `"e4"`.
impl Serialize for Square {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Square {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}
