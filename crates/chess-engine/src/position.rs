//! Board state and in-place move execution.

use chess_core::{
    CastleSide, CastlingRights, Color, Fen, FenError, File, Move, MoveFlag, Piece, Rank, Square,
};
use std::fmt;

use crate::movegen::is_king_attacked;
use crate::Bitboard;

/// Everything [`Position::make_move`] overwrites that cannot be recomputed
/// from the move itself.
///
/// Hand it back to [`Position::unmake_move`] together with the same move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undo {
    /// The piece kind that stood on the origin square.
    pub moved: Piece,
    pub captured: Option<Piece>,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

/// A chess position: piece placement plus the four pieces of FEN state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Indexed by [`Piece::index`].
    pieces: [Bitboard; 6],
    /// Indexed by [`Color::index`].
    colors: [Bitboard; 2],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Position {
    /// A board with nothing on it, White to move.
    pub fn empty() -> Self {
        Position {
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    pub fn startpos() -> Self {
        Self::from_fen(Fen::STARTPOS).expect("start position FEN is valid")
    }

    /// Parses a FEN string into a playable position.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Self::from_record(&Fen::parse(fen)?)
    }

    /// Builds a position from an already parsed record.
    ///
    /// Rejects positions where the side that just moved is still in check.
    /// Castling rights whose king or rook is not on its home square are
    /// dropped rather than rejected.
    pub fn from_record(record: &Fen) -> Result<Self, FenError> {
        let mut position = Position::empty();
        for sq in Square::all() {
            if let Some((piece, color)) = record.piece_at(sq) {
                position.put_piece(sq, piece, color);
            }
        }
        position.side_to_move = record.side_to_move;
        position.en_passant = record.en_passant;
        position.halfmove_clock = record.halfmove_clock;
        position.fullmove_number = record.fullmove_number;
        position.castling = record.castling;
        position.drop_stale_castling_rights();

        let waiting = !position.side_to_move;
        if is_king_attacked(&position, waiting) {
            return Err(FenError::IllegalPosition(format!(
                "{waiting} is in check but it is not their move"
            )));
        }
        Ok(position)
    }

    fn drop_stale_castling_rights(&mut self) {
        for color in Color::BOTH {
            let home = color.home_rank();
            if self.piece_at(Square::new(File::E, home)) != Some((Piece::King, color)) {
                self.castling.revoke_all(color);
                continue;
            }
            for (side, rook_file) in [(CastleSide::King, File::H), (CastleSide::Queen, File::A)] {
                if self.piece_at(Square::new(rook_file, home)) != Some((Piece::Rook, color)) {
                    self.castling.revoke(color, side);
                }
            }
        }
    }

    /// The position as a FEN record.
    pub fn to_record(&self) -> Fen {
        let mut board = [None; 64];
        for sq in self.occupied() {
            board[sq.index() as usize] = self.piece_at(sq);
        }
        Fen {
            board,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    pub fn to_fen(&self) -> String {
        self.to_record().to_string()
    }

    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        let color = if self.colors[Color::White.index()].contains(sq) {
            Color::White
        } else if self.colors[Color::Black.index()].contains(sq) {
            Color::Black
        } else {
            return None;
        };
        Piece::ALL
            .into_iter()
            .find(|piece| self.pieces[piece.index()].contains(sq))
            .map(|piece| (piece, color))
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    /// Every square holding a piece of `color`.
    #[inline]
    pub fn pieces_by_color(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    #[inline]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[piece.index()] & self.colors[color.index()]
    }

    /// Squares holding `piece` of either colour.
    #[inline]
    pub fn pieces_of_kind(&self, piece: Piece) -> Bitboard {
        self.pieces[piece.index()]
    }

    /// Where `color`'s king stands. `None` only on hand-built boards.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(Piece::King, color).first()
    }

    /// Places a piece on an empty square. Intended for building test boards.
    pub fn put_piece(&mut self, sq: Square, piece: Piece, color: Color) {
        self.pieces[piece.index()].set(sq);
        self.colors[color.index()].set(sq);
    }

    fn remove_piece(&mut self, sq: Square, piece: Piece, color: Color) {
        self.pieces[piece.index()].clear(sq);
        self.colors[color.index()].clear(sq);
    }

    /// Plays `m` for the side to move and returns what is needed to take it
    /// back.
    ///
    /// `m` must be pseudo-legal in this position (as produced by
    /// [`generate_pseudo_moves`](crate::movegen::generate_pseudo_moves)); the
    /// king may be left in check.
    pub fn make_move(&mut self, m: Move) -> Undo {
        let us = self.side_to_move;
        let them = !us;
        let (from, to) = (m.from(), m.to());
        let (moved, _) = self
            .piece_at(from)
            .expect("make_move called with an empty origin square");

        let undo = Undo {
            moved,
            captured: None,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        };

        let captured = if m.flag() == MoveFlag::EnPassant {
            self.remove_piece(en_passant_victim(m), Piece::Pawn, them);
            Some(Piece::Pawn)
        } else if let Some((victim, _)) = self.piece_at(to) {
            self.remove_piece(to, victim, them);
            Some(victim)
        } else {
            None
        };

        self.remove_piece(from, moved, us);
        self.put_piece(to, m.promotion().unwrap_or(moved), us);

        if let Some((rook_from, rook_to)) = castle_rook_squares(m.flag(), us) {
            self.remove_piece(rook_from, Piece::Rook, us);
            self.put_piece(rook_to, Piece::Rook, us);
        }

        if moved == Piece::King {
            self.castling.revoke_all(us);
        }
        // A rook leaving or being captured on its home square.
        for sq in [from, to] {
            match sq {
                Square::H1 => self.castling.revoke(Color::White, CastleSide::King),
                Square::A1 => self.castling.revoke(Color::White, CastleSide::Queen),
                Square::H8 => self.castling.revoke(Color::Black, CastleSide::King),
                Square::A8 => self.castling.revoke(Color::Black, CastleSide::Queen),
                _ => {}
            }
        }

        self.en_passant = if m.flag() == MoveFlag::DoublePush {
            from.offset(0, us.forward())
        } else {
            None
        };

        if moved == Piece::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            // FEN accepts any u32 here, so the counters stop at the top.
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = them;

        Undo { captured, ..undo }
    }

    /// Reverts [`make_move`](Self::make_move). `m` and `undo` must be the
    /// pair from the most recent call.
    pub fn unmake_move(&mut self, m: Move, undo: Undo) {
        let us = !self.side_to_move;
        let them = self.side_to_move;
        let (from, to) = (m.from(), m.to());

        self.remove_piece(to, m.promotion().unwrap_or(undo.moved), us);
        self.put_piece(from, undo.moved, us);

        if let Some((rook_from, rook_to)) = castle_rook_squares(m.flag(), us) {
            self.remove_piece(rook_to, Piece::Rook, us);
            self.put_piece(rook_from, Piece::Rook, us);
        }

        if let Some(captured) = undo.captured {
            let sq = if m.flag() == MoveFlag::EnPassant {
                en_passant_victim(m)
            } else {
                to
            };
            self.put_piece(sq, captured, them);
        }

        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
        self.side_to_move = us;
    }

    /// The same position with colours swapped and the board mirrored
    /// top to bottom.
    pub fn color_flipped(&self) -> Position {
        let mut flipped = Position::empty();
        for sq in self.occupied() {
            if let Some((piece, color)) = self.piece_at(sq) {
                flipped.put_piece(sq.flip_rank(), piece, !color);
            }
        }
        for color in Color::BOTH {
            for side in [CastleSide::King, CastleSide::Queen] {
                if self.castling.has(color, side) {
                    flipped.castling.grant(!color, side);
                }
            }
        }
        flipped.side_to_move = !self.side_to_move;
        flipped.en_passant = self.en_passant.map(Square::flip_rank);
        flipped.halfmove_clock = self.halfmove_clock;
        flipped.fullmove_number = self.fullmove_number;
        flipped
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

/// Draws the board from White's side, rank 8 at the top.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  +-----------------+")?;
        for rank in Rank::ALL.into_iter().rev() {
            write!(f, "{rank} |")?;
            for file in File::ALL {
                let glyph = self
                    .piece_at(Square::new(file, rank))
                    .map_or('.', |(piece, color)| piece.to_fen_char(color));
                write!(f, " {glyph}")?;
            }
            writeln!(f, " |")?;
        }
        writeln!(f, "  +-----------------+")?;
        write!(f, "    a b c d e f g h")
    }
}

/// The pawn taken by an en-passant capture: same file as the target square,
/// same rank as the capturing pawn.
#[inline]
fn en_passant_victim(m: Move) -> Square {
    Square::new(m.to().file(), m.from().rank())
}

/// Rook origin and destination for a castling move.
fn castle_rook_squares(flag: MoveFlag, color: Color) -> Option<(Square, Square)> {
    let home = color.home_rank();
    match flag {
        MoveFlag::CastleKingside => Some((Square::new(File::H, home), Square::new(File::F, home))),
        MoveFlag::CastleQueenside => Some((Square::new(File::A, home), Square::new(File::D, home))),
        _ => None,
    }
}
