//! Move generation.
//!
//! Moves are generated pseudo-legally per piece kind and then filtered by
//! playing each one on a scratch copy of the position and checking whether
//! the mover's king is attacked.

mod attacks;
pub mod perft;

use crate::{Bitboard, Position};
use chess_core::{CastleSide, Color, File, Move, MoveFlag, Piece, Square};

pub use attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks,
};

/// A list of moves with a fixed maximum capacity.
///
/// No position has more than 218 legal moves, so generation never touches
/// the heap.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub const MAX_MOVES: usize = 256;

    const EMPTY_SLOT: Move = Move::normal(Square::A1, Square::A1);

    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Self::EMPTY_SLOT; Self::MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    pub fn contains(&self, m: &Move) -> bool {
        self.as_slice().contains(m)
    }

    /// Keeps only the moves for which `f` returns true, preserving order.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Move {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// All legal moves for the side to move.
pub fn generate_moves(position: &Position) -> MoveList {
    let mut moves = generate_pseudo_moves(position);
    let us = position.side_to_move;
    let mut scratch = position.clone();
    moves.retain(|&m| {
        let undo = scratch.make_move(m);
        let legal = !is_king_attacked(&scratch, us);
        scratch.unmake_move(m, undo);
        legal
    });
    moves
}

/// Moves that obey piece movement but may leave the mover's king in check.
///
/// Castling is the exception: it is only produced when the king is not in
/// check and neither crosses nor lands on an attacked square.
pub fn generate_pseudo_moves(position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    generate_pawn_moves(position, &mut moves);
    for piece in [
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ] {
        generate_piece_moves(position, piece, &mut moves);
    }
    generate_castling_moves(position, &mut moves);
    moves
}

/// Squares a non-pawn `piece` on `sq` attacks given the board occupancy.
fn piece_attacks(piece: Piece, sq: Square, occupied: Bitboard) -> Bitboard {
    match piece {
        Piece::Knight => knight_attacks(sq),
        Piece::Bishop => bishop_attacks(sq, occupied),
        Piece::Rook => rook_attacks(sq, occupied),
        Piece::Queen => queen_attacks(sq, occupied),
        Piece::King => king_attacks(sq),
        Piece::Pawn => Bitboard::EMPTY,
    }
}

fn generate_piece_moves(position: &Position, piece: Piece, moves: &mut MoveList) {
    let us = position.side_to_move;
    let ours = position.pieces_by_color(us);
    let occupied = position.occupied();
    for from in position.pieces_of(piece, us) {
        for to in piece_attacks(piece, from, occupied) & !ours {
            moves.push(Move::normal(from, to));
        }
    }
}

fn generate_pawn_moves(position: &Position, moves: &mut MoveList) {
    let us = position.side_to_move;
    let them = !us;
    let theirs = position.pieces_by_color(them);
    let occupied = position.occupied();
    let forward = us.forward();

    for from in position.pieces_of(Piece::Pawn, us) {
        if let Some(one) = from.offset(0, forward) {
            if !occupied.contains(one) {
                push_pawn_move(moves, from, one, us);
                if from.rank() == us.pawn_rank() {
                    if let Some(two) = one.offset(0, forward) {
                        if !occupied.contains(two) {
                            moves.push(Move::new(from, two, MoveFlag::DoublePush));
                        }
                    }
                }
            }
        }

        let attacks = pawn_attacks(from, us);
        for to in attacks & theirs {
            push_pawn_move(moves, from, to, us);
        }

        if let Some(target) = position.en_passant {
            let victim = Square::new(target.file(), from.rank());
            if attacks.contains(target)
                && !occupied.contains(target)
                && position.pieces_of(Piece::Pawn, them).contains(victim)
            {
                moves.push(Move::new(from, target, MoveFlag::EnPassant));
            }
        }
    }
}

/// Pushes a pawn move, expanded into the four promotions on the last rank.
fn push_pawn_move(moves: &mut MoveList, from: Square, to: Square, us: Color) {
    if to.rank() == us.promotion_rank() {
        for piece in Piece::PROMOTIONS {
            moves.push(Move::new(from, to, MoveFlag::Promotion(piece)));
        }
    } else {
        moves.push(Move::normal(from, to));
    }
}

fn generate_castling_moves(position: &Position, moves: &mut MoveList) {
    let us = position.side_to_move;
    let them = !us;
    let home = us.home_rank();
    let king_from = Square::new(File::E, home);

    if !position.pieces_of(Piece::King, us).contains(king_from) || is_king_attacked(position, us)
    {
        return;
    }

    let occupied = position.occupied();
    let sides: [(CastleSide, MoveFlag, &[File], &[File]); 2] = [
        (
            CastleSide::King,
            MoveFlag::CastleKingside,
            &[File::F, File::G],
            &[File::F, File::G],
        ),
        (
            CastleSide::Queen,
            MoveFlag::CastleQueenside,
            &[File::B, File::C, File::D],
            &[File::D, File::C],
        ),
    ];

    for (side, flag, between, king_path) in sides {
        if !position.castling.has(us, side) {
            continue;
        }
        let blocked = between
            .iter()
            .any(|&file| occupied.contains(Square::new(file, home)));
        if blocked {
            continue;
        }
        let attacked = king_path
            .iter()
            .any(|&file| is_square_attacked(position, Square::new(file, home), them));
        if attacked {
            continue;
        }
        let king_to = Square::new(king_path[king_path.len() - 1], home);
        moves.push(Move::new(king_from, king_to, flag));
    }
}

/// Returns true if any piece of `by` attacks `sq`.
pub fn is_square_attacked(position: &Position, sq: Square, by: Color) -> bool {
    let occupied = position.occupied();
    let queens = position.pieces_of(Piece::Queen, by);

    (pawn_attacks(sq, !by) & position.pieces_of(Piece::Pawn, by)).is_not_empty()
        || (knight_attacks(sq) & position.pieces_of(Piece::Knight, by)).is_not_empty()
        || (king_attacks(sq) & position.pieces_of(Piece::King, by)).is_not_empty()
        || (bishop_attacks(sq, occupied) & (position.pieces_of(Piece::Bishop, by) | queens))
            .is_not_empty()
        || (rook_attacks(sq, occupied) & (position.pieces_of(Piece::Rook, by) | queens))
            .is_not_empty()
}

/// Returns true if `color`'s king is attacked. A board without that king
/// is never in check.
pub fn is_king_attacked(position: &Position, color: Color) -> bool {
    position
        .king_square(color)
        .is_some_and(|king| is_square_attacked(position, king, !color))
}

/// Returns true if the side to move is in check.
#[inline]
pub fn is_in_check(position: &Position) -> bool {
    is_king_attacked(position, position.side_to_move)
}
