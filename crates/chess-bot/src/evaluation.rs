//! Static evaluation.

use chess_core::{Color, Piece, Square};
use chess_engine::{generate_moves, Bitboard, Position};

/// Piece values in centipawns. The king's only keeps evaluation sane if
/// one ever goes missing.
pub const fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => 100,
        Piece::Knight => 320,
        Piece::Bishop => 330,
        Piece::Rook => 500,
        Piece::Queen => 900,
        Piece::King => 20_000,
    }
}

const CENTER_BONUS: i32 = 20;
const CENTER_RING_BONUS: i32 = 10;

/// Per legal move of the side to move.
const MOBILITY_WEIGHT: i32 = 5;

/// Indexed by rank counted from the pawn's own side.
const PAWN_ADVANCE_BONUS: [i32; 8] = [0, 0, 5, 10, 20, 35, 60, 0];

/// d4, e4, d5, e5.
const CENTER: Bitboard = Bitboard(0x0000_0018_1800_0000);
/// d3, e3, c4, f4, c5, f5, d6, e6.
const CENTER_RING: Bitboard = Bitboard(0x0000_1824_2418_0000);

fn center_bonus(sq: Square) -> i32 {
    if CENTER.contains(sq) {
        CENTER_BONUS
    } else if CENTER_RING.contains(sq) {
        CENTER_RING_BONUS
    } else {
        0
    }
}

fn pawn_advance_bonus(sq: Square, color: Color) -> i32 {
    let rank = sq.rank().index() as usize;
    let relative = match color {
        Color::White => rank,
        Color::Black => 7 - rank,
    };
    PAWN_ADVANCE_BONUS[relative]
}

/// Material and placement for one side.
fn side_score(position: &Position, color: Color) -> i32 {
    let mut score = 0;
    for piece in Piece::ALL {
        for sq in position.pieces_of(piece, color) {
            score += piece_value(piece) + center_bonus(sq);
            if piece == Piece::Pawn {
                score += pawn_advance_bonus(sq, color);
            }
        }
    }
    score
}

/// Evaluates `position` for the side to move: positive means whoever moves
/// next is better off.
pub fn evaluate(position: &Position) -> i32 {
    let us = position.side_to_move;
    let mobility = generate_moves(position).len() as i32 * MOBILITY_WEIGHT;

    let mut white = side_score(position, Color::White) - side_score(position, Color::Black);
    white += match us {
        Color::White => mobility,
        Color::Black => -mobility,
    };

    match us {
        Color::White => white,
        Color::Black => -white,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Fen;

    fn eval(fen: &str) -> i32 {
        evaluate(&Position::from_fen(fen).unwrap())
    }

    #[test]
    fn center_masks() {
        let center: Vec<String> = CENTER.squares().map(|sq| sq.to_algebraic()).collect();
        assert_eq!(center, ["d4", "e4", "d5", "e5"]);
        assert_eq!(CENTER_RING.count(), 8);
        for name in ["c3", "f3", "c6", "f6"] {
            assert!(!CENTER_RING.contains(name.parse().unwrap()), "{name}");
        }
        for name in ["d3", "e3", "c4", "f4", "c5", "f5", "d6", "e6"] {
            assert!(CENTER_RING.contains(name.parse().unwrap()), "{name}");
        }
    }

    #[test]
    fn start_position_only_counts_mobility() {
        // Material and placement cancel; White has 20 moves.
        assert_eq!(evaluate(&Position::startpos()), 20 * MOBILITY_WEIGHT);
    }

    #[test]
    fn extra_material_is_good_for_its_owner() {
        let white_up_queen = "4k3/8/8/8/8/8/8/3QK3 w - - 0 1";
        assert!(eval(white_up_queen) > 800);
        let same_black_to_move = "4k3/8/8/8/8/8/8/3QK3 b - - 0 1";
        assert!(eval(same_black_to_move) < -800);
    }

    #[test]
    fn advanced_pawns_score_higher() {
        let home = eval("4k3/8/8/8/8/8/P7/4K3 w - - 0 1");
        let seventh = eval("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        assert!(seventh > home);
    }

    #[test]
    fn centralised_knight_beats_rim_knight() {
        let rim = eval("4k3/8/8/8/8/8/8/N3K3 w - - 0 1");
        let center = eval("4k3/8/8/8/3N4/8/8/4K3 w - - 0 1");
        assert!(center > rim);
    }

    #[test]
    fn mirrored_position_scores_the_same_for_its_mover() {
        for fen in [
            Fen::STARTPOS,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbqkb1r/ppp1pppp/5n2/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
        ] {
            let position = Position::from_fen(fen).unwrap();
            assert_eq!(evaluate(&position), evaluate(&position.color_flipped()), "{fen}");
        }
    }
}
