//! Move ordering for the search.
//!
//! Good moves first means more cutoffs; the order never changes which move
//! the search settles on beyond tie-breaking.

use chess_core::{Move, MoveFlag, Piece, Square};
use chess_engine::{MoveList, Position};

use crate::evaluation::piece_value;

/// Priority given to a move that walks straight back along the bot's own
/// previous move.
pub const REVERSAL_PENALTY: i32 = -1000;

/// Scores `m` for ordering. `last_move` is the bot's own previous move as
/// a from/to pair, if it has one.
pub fn move_priority(position: &Position, m: Move, last_move: Option<(Square, Square)>) -> i32 {
    let mut score = 0;

    let victim = match m.flag() {
        MoveFlag::EnPassant => Some(Piece::Pawn),
        _ => position.piece_at(m.to()).map(|(piece, _)| piece),
    };
    if let Some(victim) = victim {
        let attacker = position
            .piece_at(m.from())
            .map_or(0, |(piece, _)| piece_value(piece));
        score += 10 * piece_value(victim) - attacker;
    }

    if let Some(promotion) = m.promotion() {
        score += piece_value(promotion);
    }

    if last_move.is_some_and(|(from, to)| m.reverses(from, to)) {
        score += REVERSAL_PENALTY;
    }

    score
}

/// `moves` sorted by descending priority. Equal priorities keep their
/// generation order.
pub fn order_moves(
    position: &Position,
    moves: &MoveList,
    last_move: Option<(Square, Square)>,
) -> Vec<Move> {
    let mut scored: Vec<(i32, Move)> = moves
        .iter()
        .map(|&m| (move_priority(position, m, last_move), m))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, m)| m).collect()
}
