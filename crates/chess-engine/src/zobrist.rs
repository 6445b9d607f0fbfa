//! Zobrist keys identifying positions for repetition detection.
//!
//! Two positions share a key when they have the same placement, side to
//! move, castling rights, and en-passant capture actually available. The
//! clocks are not part of the key.

use chess_core::{Color, Piece, Square};

use crate::movegen::pawn_attacks;
use crate::Position;

const PIECE_KEYS: usize = 6 * 2 * 64;

struct Keys {
    /// `[piece][color][square]`, flattened.
    pieces: [u64; PIECE_KEYS],
    black_to_move: u64,
    /// One key per castling-rights bit pattern.
    castling: [u64; 16],
    en_passant_file: [u64; 8],
}

/// SplitMix64 step: returns the next state and its output.
const fn splitmix(state: u64) -> (u64, u64) {
    let state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    (state, z ^ (z >> 31))
}

const fn fill<const N: usize>(mut state: u64) -> ([u64; N], u64) {
    let mut table = [0u64; N];
    let mut i = 0;
    while i < N {
        let (next, value) = splitmix(state);
        state = next;
        table[i] = value;
        i += 1;
    }
    (table, state)
}

const fn build_keys() -> Keys {
    let (pieces, state) = fill::<PIECE_KEYS>(0x00C0_FFEE_D15E_A5E5);
    let (state, black_to_move) = splitmix(state);
    let (mut castling, state) = fill::<16>(state);
    // No rights contributes nothing, so a position without castling hashes
    // the same however it lost its rights.
    castling[0] = 0;
    let (en_passant_file, _) = fill::<8>(state);
    Keys {
        pieces,
        black_to_move,
        castling,
        en_passant_file,
    }
}

static KEYS: Keys = build_keys();

#[inline]
fn piece_key(piece: Piece, color: Color, sq: Square) -> u64 {
    KEYS.pieces[(piece.index() * 2 + color.index()) * 64 + sq.index() as usize]
}

impl Position {
    /// Computes the position's repetition key from scratch.
    pub fn zobrist_hash(&self) -> u64 {
        let mut hash = 0;
        for color in Color::BOTH {
            for piece in Piece::ALL {
                for sq in self.pieces_of(piece, color) {
                    hash ^= piece_key(piece, color, sq);
                }
            }
        }
        if self.side_to_move == Color::Black {
            hash ^= KEYS.black_to_move;
        }
        hash ^= KEYS.castling[self.castling.bits() as usize];
        if let Some(target) = self.en_passant {
            // Only counts when a pawn of the side to move could take.
            let us = self.side_to_move;
            let capturers = pawn_attacks(target, !us) & self.pieces_of(Piece::Pawn, us);
            if capturers.is_not_empty() {
                hash ^= KEYS.en_passant_file[target.file().index() as usize];
            }
        }
        hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Move, MoveFlag};

    fn hash(fen: &str) -> u64 {
        Position::from_fen(fen).unwrap().zobrist_hash()
    }

    #[test]
    fn keys_are_distinct() {
        let a = piece_key(Piece::Pawn, Color::White, Square::A1);
        let b = piece_key(Piece::Pawn, Color::White, Square::B1);
        let c = piece_key(Piece::Pawn, Color::Black, Square::A1);
        let d = piece_key(Piece::King, Color::Black, Square::H8);
        assert!(a != b && a != c && b != c && c != d);
        assert_ne!(KEYS.black_to_move, 0);
    }

    #[test]
    fn clocks_do_not_matter() {
        assert_eq!(
            hash("4k3/8/8/8/8/8/8/4K2R w K - 0 1"),
            hash("4k3/8/8/8/8/8/8/4K2R w K - 37 60")
        );
    }

    #[test]
    fn side_and_castling_matter() {
        let base = hash("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
        assert_ne!(base, hash("4k3/8/8/8/8/8/8/4K2R b K - 0 1"));
        assert_ne!(base, hash("4k3/8/8/8/8/8/8/4K2R w - - 0 1"));
    }

    #[test]
    fn unusable_en_passant_is_ignored() {
        // After 1.e4 no black pawn can take on e3.
        assert_eq!(
            hash("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"),
            hash("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1")
        );
        // A black pawn on d4 could.
        assert_ne!(
            hash("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3"),
            hash("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 3")
        );
    }

    #[test]
    fn make_unmake_restores_hash() {
        let mut pos = Position::startpos();
        let before = pos.zobrist_hash();
        let m = Move::new("g1".parse().unwrap(), "f3".parse().unwrap(), MoveFlag::Normal);
        let undo = pos.make_move(m);
        assert_ne!(pos.zobrist_hash(), before);
        pos.unmake_move(m, undo);
        assert_eq!(pos.zobrist_hash(), before);
    }
}
