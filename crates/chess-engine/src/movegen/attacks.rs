//! Attack sets for every piece kind.
//!
//! Leapers (knight, king, pawn) read from tables built at compile time.
//! Sliders walk their rays square by square and stop at the first blocker,
//! which is included in the set whatever its colour.

use crate::Bitboard;
use chess_core::{Color, Square};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

pub(crate) const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
pub(crate) const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

const KNIGHT_ATTACKS: [Bitboard; 64] = leaper_table(&KNIGHT_OFFSETS);
const KING_ATTACKS: [Bitboard; 64] = leaper_table(&KING_OFFSETS);

/// Indexed `[color][square]`.
const PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    leaper_table(&[(-1, 1), (1, 1)]),
    leaper_table(&[(-1, -1), (1, -1)]),
];

const fn leaper_table<const N: usize>(offsets: &[(i8, i8); N]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut index = 0u8;
    while index < 64 {
        let from = Square::from_index_masked(index);
        let mut bits = 0u64;
        let mut i = 0;
        while i < N {
            if let Some(to) = from.offset(offsets[i].0, offsets[i].1) {
                bits |= 1u64 << to.index();
            }
            i += 1;
        }
        table[index as usize] = Bitboard(bits);
        index += 1;
    }
    table
}

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Squares a pawn of `color` standing on `sq` captures on.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index() as usize]
}

/// Walks each direction from `from` until the edge or the first occupied
/// square.
fn ray_attacks(from: Square, occupied: Bitboard, directions: &[(i8, i8)]) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for &(file_delta, rank_delta) in directions {
        let mut current = from;
        while let Some(next) = current.offset(file_delta, rank_delta) {
            attacks.set(next);
            if occupied.contains(next) {
                break;
            }
            current = next;
        }
    }
    attacks
}

pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ray_attacks(sq, occupied, &BISHOP_DIRECTIONS)
}

pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ray_attacks(sq, occupied, &ROOK_DIRECTIONS)
}

pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}
