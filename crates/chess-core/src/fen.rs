//! FEN (Forsyth-Edwards Notation) parsing and serialization.

use crate::{CastlingRights, Color, Piece, Rank, Square};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 fields, got {0}")]
    InvalidFieldCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),

    /// Well-formed, but not a position that can arise in play.
    #[error("illegal position: {0}")]
    IllegalPosition(String),
}

/// A parsed FEN record.
///
/// Parsing checks syntax plus the board-only sanity rules (one king per
/// side, no pawns on the first or last rank, en-passant square on the
/// right rank for the side to move). Rules that need attack detection are
/// checked by the engine when it builds a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    /// Board contents indexed by [`Square::index`].
    pub board: [Option<(Piece, Color)>; 64],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    /// Plies since the last capture or pawn move.
    pub halfmove_clock: u32,
    /// Starts at 1 and increments after Black moves.
    pub fullmove_number: u32,
}

impl Fen {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses and validates a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::InvalidFieldCount(fields.len()));
        }

        let board = parse_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = CastlingRights::from_fen(fields[2])
            .ok_or_else(|| FenError::InvalidCastlingRights(fields[2].to_string()))?;

        let en_passant = match fields[3] {
            "-" => None,
            label => {
                let sq = Square::from_algebraic(label)
                    .ok_or_else(|| FenError::InvalidEnPassantSquare(label.to_string()))?;
                // The target sits behind a pawn of the side that just moved.
                let expected = match side_to_move {
                    Color::White => Rank::R6,
                    Color::Black => Rank::R3,
                };
                if sq.rank() != expected {
                    return Err(FenError::InvalidEnPassantSquare(label.to_string()));
                }
                Some(sq)
            }
        };

        let halfmove_clock = fields[4]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidHalfmoveClock(fields[4].to_string()))?;

        let fullmove_number = match fields[5].parse::<u32>() {
            Ok(n) if n >= 1 => n,
            _ => return Err(FenError::InvalidFullmoveNumber(fields[5].to_string())),
        };

        let fen = Fen {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        };
        fen.check_board()?;
        Ok(fen)
    }

    fn check_board(&self) -> Result<(), FenError> {
        for color in Color::BOTH {
            let kings = self
                .board
                .iter()
                .filter(|slot| **slot == Some((Piece::King, color)))
                .count();
            if kings != 1 {
                return Err(FenError::IllegalPosition(format!(
                    "{color} has {kings} kings"
                )));
            }
        }

        let pawn_on_edge = Square::all().any(|sq| {
            matches!(self.board[sq.index() as usize], Some((Piece::Pawn, _)))
                && matches!(sq.rank(), Rank::R1 | Rank::R8)
        });
        if pawn_on_edge {
            return Err(FenError::IllegalPosition(
                "pawn on the first or last rank".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns the piece on `sq`, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        self.board[sq.index() as usize]
    }
}

fn parse_placement(placement: &str) -> Result<[Option<(Piece, Color)>; 64], FenError> {
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::InvalidPiecePlacement(format!(
            "expected 8 ranks, got {}",
            rows.len()
        )));
    }

    let mut board = [None; 64];
    for (row, text) in rows.iter().enumerate() {
        let rank = 7 - row as i8;
        let mut file = 0i8;
        let mut last_was_digit = false;
        for c in text.chars() {
            if let Some(run) = c.to_digit(10) {
                if run == 0 || run > 8 || last_was_digit {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "bad empty-square run '{c}' in rank {}",
                        rank + 1
                    )));
                }
                file += run as i8;
                last_was_digit = true;
            } else if let Some(piece) = Piece::from_fen_char(c) {
                let sq = Square::from_coords(file, rank).ok_or_else(|| {
                    FenError::InvalidPiecePlacement(format!("rank {} overflows", rank + 1))
                })?;
                board[sq.index() as usize] = Some(piece);
                file += 1;
                last_was_digit = false;
            } else {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "invalid character '{c}' in rank {}",
                    rank + 1
                )));
            }
        }
        if file != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "rank {} has {file} squares, expected 8",
                rank + 1
            )));
        }
    }
    Ok(board)
}

impl fmt::Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match Square::from_coords(file, rank).and_then(|sq| self.piece_at(sq)) {
                    Some((piece, color)) => {
                        if empty > 0 {
                            write!(f, "{empty}")?;
                            empty = 0;
                        }
                        write!(f, "{}", piece.to_fen_char(color))?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{empty}")?;
            }
            if rank > 0 {
                f.write_str("/")?;
            }
        }
        write!(
            f,
            " {} {} {} {} {}",
            self.side_to_move.fen_char(),
            self.castling,
            self.en_passant
                .map_or_else(|| "-".to_string(), |sq| sq.to_string()),
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

impl Default for Fen {
    fn default() -> Self {
        Self::parse(Self::STARTPOS).expect("STARTPOS is valid")
    }
}
