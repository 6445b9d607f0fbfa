//! Standard Algebraic Notation.
//!
//! Generation always produces the canonical form (`Nbd2`, `exd6`, `e8=Q+`,
//! `O-O#`). Parsing is lenient about check marks, annotation glyphs, zero
//! castling, a missing `x` and a promotion written without `=`.

use crate::movegen::{generate_moves, is_in_check};
use crate::Position;
use chess_core::{File, Move, MoveFlag, Piece, Rank, Square};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanError {
    #[error("empty move text")]
    Empty,

    #[error("cannot read {0:?} as a move")]
    InvalidFormat(String),

    #[error("no legal move matches {0:?}")]
    NoMatchingMove(String),

    #[error("{0:?} matches more than one legal move")]
    AmbiguousMove(String),
}

/// Uppercase SAN letter; pawns have none.
fn piece_letter(piece: Piece) -> Option<char> {
    match piece {
        Piece::Pawn => None,
        other => Some(other.to_char().to_ascii_uppercase()),
    }
}

/// Writes `m` in SAN. `position` is the position before the move and `m`
/// must be legal in it.
pub fn move_to_san(position: &Position, m: Move) -> String {
    let mut san = match m.flag() {
        MoveFlag::CastleKingside => "O-O".to_string(),
        MoveFlag::CastleQueenside => "O-O-O".to_string(),
        _ => describe_move(position, m),
    };

    let mut after = position.clone();
    after.make_move(m);
    if is_in_check(&after) {
        san.push(if generate_moves(&after).is_empty() {
            '#'
        } else {
            '+'
        });
    }
    san
}

fn describe_move(position: &Position, m: Move) -> String {
    let (from, to) = (m.from(), m.to());
    let Some((piece, _)) = position.piece_at(from) else {
        return m.to_uci();
    };
    let is_capture = m.flag() == MoveFlag::EnPassant || position.piece_at(to).is_some();

    let mut san = String::with_capacity(8);
    match piece_letter(piece) {
        Some(letter) => {
            san.push(letter);
            san.push_str(&disambiguation(position, m, piece));
        }
        None if is_capture => san.push(from.file().to_char()),
        None => {}
    }
    if is_capture {
        san.push('x');
    }
    san.push_str(&to.to_algebraic());
    if let Some(promo) = m.promotion().and_then(piece_letter) {
        san.push('=');
        san.push(promo);
    }
    san
}

/// The origin file, rank, or both, needed to tell `m` apart from other
/// legal moves of the same piece kind to the same square.
fn disambiguation(position: &Position, m: Move, piece: Piece) -> String {
    let rivals: Vec<Square> = generate_moves(position)
        .iter()
        .filter(|other| other.to() == m.to() && other.from() != m.from())
        .filter(|other| position.piece_at(other.from()).map(|(p, _)| p) == Some(piece))
        .map(|other| other.from())
        .collect();

    if rivals.is_empty() {
        return String::new();
    }
    let from = m.from();
    if rivals.iter().all(|sq| sq.file() != from.file()) {
        from.file().to_string()
    } else if rivals.iter().all(|sq| sq.rank() != from.rank()) {
        from.rank().to_string()
    } else {
        from.to_algebraic()
    }
}

/// What a SAN string asks for, before matching against legal moves.
#[derive(Debug, PartialEq, Eq)]
struct SanPattern {
    piece: Piece,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    to: Square,
    promotion: Option<Piece>,
}

impl SanPattern {
    fn matches(&self, position: &Position, m: Move) -> bool {
        m.to() == self.to
            && !m.flag().is_castling()
            && m.promotion() == self.promotion
            && self.from_file.map_or(true, |file| m.from().file() == file)
            && self.from_rank.map_or(true, |rank| m.from().rank() == rank)
            && position.piece_at(m.from()).map(|(p, _)| p) == Some(self.piece)
    }
}

fn parse_pattern(text: &str) -> Option<SanPattern> {
    let mut chars: Vec<char> = text.chars().collect();

    let promotion = match chars.last().copied().and_then(Piece::from_char) {
        Some(piece) if chars.last().is_some_and(|c| c.is_ascii_uppercase()) => {
            chars.pop();
            if chars.last() == Some(&'=') {
                chars.pop();
            }
            if !piece.is_promotion_target() {
                return None;
            }
            Some(piece)
        }
        _ => None,
    };

    let piece = match chars.first() {
        Some(&c) if c.is_ascii_uppercase() => {
            chars.remove(0);
            let piece = Piece::from_char(c)?;
            if piece == Piece::Pawn {
                return None;
            }
            piece
        }
        _ => Piece::Pawn,
    };

    if chars.len() < 2 {
        return None;
    }
    let rank = Rank::from_char(chars.pop()?)?;
    let file = File::from_char(chars.pop()?)?;
    let to = Square::new(file, rank);

    if chars.last() == Some(&'x') {
        chars.pop();
    }

    let (from_file, from_rank) = match chars.as_slice() {
        [] => (None, None),
        [c] => match (File::from_char(*c), Rank::from_char(*c)) {
            (Some(file), _) => (Some(file), None),
            (None, Some(rank)) => (None, Some(rank)),
            (None, None) => return None,
        },
        [f, r] => (Some(File::from_char(*f)?), Some(Rank::from_char(*r)?)),
        _ => return None,
    };

    if piece == Piece::Pawn && from_rank.is_some() {
        return None;
    }

    Some(SanPattern {
        piece,
        from_file,
        from_rank,
        to,
        promotion,
    })
}

/// Finds the legal move `san` denotes in `position`.
pub fn san_to_move(position: &Position, san: &str) -> Result<Move, SanError> {
    let text = san
        .trim()
        .trim_end_matches(|c| matches!(c, '+' | '#' | '!' | '?'));
    if text.is_empty() {
        return Err(SanError::Empty);
    }

    let moves = generate_moves(position);

    let castle = match text {
        "O-O" | "0-0" => Some(MoveFlag::CastleKingside),
        "O-O-O" | "0-0-0" => Some(MoveFlag::CastleQueenside),
        _ => None,
    };
    if let Some(flag) = castle {
        return moves
            .iter()
            .copied()
            .find(|m| m.flag() == flag)
            .ok_or_else(|| SanError::NoMatchingMove(san.to_string()));
    }

    let pattern = parse_pattern(text).ok_or_else(|| SanError::InvalidFormat(san.to_string()))?;
    let mut candidates = moves.iter().copied().filter(|&m| pattern.matches(position, m));
    match (candidates.next(), candidates.next()) {
        (Some(m), None) => Ok(m),
        (None, _) => Err(SanError::NoMatchingMove(san.to_string())),
        (Some(_), Some(_)) => Err(SanError::AmbiguousMove(san.to_string())),
    }
}
