//! Standard FIDE rules.

use super::{DrawReason, GameResult, RuleSet};
use crate::movegen::{self, is_in_check};
use crate::{MoveList, Position};
use chess_core::Piece;

/// Plies without a capture or pawn move after which the game is drawn.
pub const FIFTY_MOVE_PLIES: u32 = 100;

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardChess;

impl RuleSet for StandardChess {
    fn initial_position(&self) -> Position {
        Position::startpos()
    }

    fn generate_moves(&self, position: &Position) -> MoveList {
        movegen::generate_moves(position)
    }

    fn is_check(&self, position: &Position) -> bool {
        is_in_check(position)
    }

    /// Bare kings, a single minor piece against a bare king, or any number
    /// of bishops that all stand on squares of one colour.
    fn is_insufficient_material(&self, position: &Position) -> bool {
        let others = position.occupied() & !position.pieces_of_kind(Piece::King);
        if others.is_empty() {
            return true;
        }
        let minors = position.pieces_of_kind(Piece::Knight) | position.pieces_of_kind(Piece::Bishop);
        if others.count() == 1 && (others & minors).is_not_empty() {
            return true;
        }
        if others == position.pieces_of_kind(Piece::Bishop) {
            let light = others.squares().filter(|sq| sq.is_light()).count();
            return light == 0 || light == others.squares().len();
        }
        false
    }

    fn position_result(&self, position: &Position) -> Option<GameResult> {
        if self.generate_moves(position).is_empty() {
            return Some(if self.is_check(position) {
                GameResult::checkmated(position.side_to_move)
            } else {
                GameResult::Draw(DrawReason::Stalemate)
            });
        }
        if self.is_insufficient_material(position) {
            return Some(GameResult::Draw(DrawReason::InsufficientMaterial));
        }
        if position.halfmove_clock >= FIFTY_MOVE_PLIES {
            return Some(GameResult::Draw(DrawReason::FiftyMoveRule));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dead(fen: &str) -> bool {
        StandardChess.is_insufficient_material(&Position::from_fen(fen).unwrap())
    }

    #[test]
    fn insufficient_material_cases() {
        assert!(dead("8/8/8/4k3/8/8/8/4K3 w - - 0 1"));
        assert!(dead("8/8/8/4k3/8/8/8/3BK3 w - - 0 1"));
        assert!(dead("8/8/8/4k3/8/8/8/3NK3 b - - 0 1"));
        // Bishops on c1 and f8: both dark squares.
        assert!(dead("5b2/8/8/4k3/8/8/8/2B1K3 w - - 0 1"));
    }

    #[test]
    fn sufficient_material_cases() {
        assert!(!dead("8/8/8/4k3/8/8/8/2NNK3 w - - 0 1"));
        // Knight against knight can still mate (with help).
        assert!(!dead("6n1/8/8/4k3/8/8/8/3NK3 w - - 0 1"));
        // Opposite-coloured bishops.
        assert!(!dead("4kb2/8/8/8/8/8/8/3BK3 w - - 0 1"));
        assert!(!dead("8/8/8/4k3/8/8/4P3/4K3 w - - 0 1"));
        assert!(!dead(chess_core::Fen::STARTPOS));
    }

    #[test]
    fn checkmate_result() {
        // Fool's mate.
        let pos =
            Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        assert_eq!(StandardChess.position_result(&pos), Some(GameResult::BlackWins));
    }

    #[test]
    fn stalemate_result() {
        let pos = Position::from_fen("k7/8/1Q6/8/8/8/8/7K b - - 0 1").unwrap();
        assert!(!StandardChess.is_check(&pos));
        assert_eq!(
            StandardChess.position_result(&pos),
            Some(GameResult::Draw(DrawReason::Stalemate))
        );
    }

    #[test]
    fn fifty_move_rule() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/4R3/4K3 b - - 100 80").unwrap();
        assert_eq!(
            StandardChess.position_result(&pos),
            Some(GameResult::Draw(DrawReason::FiftyMoveRule))
        );
        let pos = Position::from_fen("4k3/8/8/8/8/8/3R4/4K3 b - - 99 80").unwrap();
        assert_eq!(StandardChess.position_result(&pos), None);
    }

    #[test]
    fn result_tokens() {
        assert_eq!(GameResult::WhiteWins.pgn_token(), "1-0");
        assert_eq!(GameResult::Draw(DrawReason::Stalemate).pgn_token(), "1/2-1/2");
        assert_eq!(GameResult::checkmated(chess_core::Color::White).winner(), Some(chess_core::Color::Black));
    }
}
