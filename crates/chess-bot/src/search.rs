//! Negamax search with alpha-beta pruning.

use chess_core::Move;
use chess_engine::{generate_moves, is_in_check, Position};

use crate::evaluation::evaluate;
use crate::ordering::order_moves;

/// Score for the side to move when it is checkmated at ply 0. Mates found
/// deeper in the tree score closer to zero.
pub const MATE_SCORE: i32 = 100_000;

/// Window bound safely negatable without overflow.
pub const INFINITY: i32 = MATE_SCORE + 1_000;

/// Search state for one decision.
#[derive(Debug, Default)]
pub struct Searcher {
    /// Positions visited, leaves included.
    pub nodes: u64,
}

impl Searcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scores `position` for its side to move, searching `depth` plies.
    ///
    /// Fail-hard: the result is clamped into `[alpha, beta]`. Every move
    /// made on `position` is unmade before returning, so the caller gets it
    /// back unchanged.
    pub fn negamax(
        &mut self,
        position: &mut Position,
        depth: u8,
        mut alpha: i32,
        beta: i32,
        ply: u32,
    ) -> i32 {
        self.nodes += 1;

        if depth == 0 {
            return evaluate(position);
        }

        let moves = generate_moves(position);
        if moves.is_empty() {
            return if is_in_check(position) {
                -(MATE_SCORE - ply as i32)
            } else {
                0
            };
        }

        for m in order_moves(position, &moves, None) {
            let undo = position.make_move(m);
            let score = -self.negamax(position, depth - 1, -beta, -alpha, ply + 1);
            position.unmake_move(m, undo);

            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                return beta;
            }
        }

        alpha
    }

    /// Searches every root move and returns the best with its score.
    ///
    /// `moves` is searched in the order given and the first move to reach
    /// the best score wins ties. Returns `None` only for an empty list.
    pub fn search_root(
        &mut self,
        position: &mut Position,
        moves: &[Move],
        depth: u8,
    ) -> Option<(Move, i32)> {
        let mut best: Option<(Move, i32)> = None;
        let mut alpha = -INFINITY;
        let beta = INFINITY;

        for &m in moves {
            let undo = position.make_move(m);
            let score = -self.negamax(position, depth.saturating_sub(1), -beta, -alpha, 1);
            position.unmake_move(m, undo);

            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((m, score));
                alpha = alpha.max(score);
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn best(fen: &str, depth: u8) -> (String, i32) {
        let mut position = Position::from_fen(fen).unwrap();
        let before = position.clone();
        let moves = order_moves(&position, &generate_moves(&position), None);
        let mut searcher = Searcher::new();
        let (m, score) = searcher.search_root(&mut position, &moves, depth).unwrap();
        assert_eq!(position, before, "search must restore the position");
        assert!(searcher.nodes > 0);
        (m.to_uci(), score)
    }

    #[test]
    fn depth_zero_is_static_evaluation() {
        let mut position = Position::startpos();
        let mut searcher = Searcher::new();
        let score = searcher.negamax(&mut position, 0, -INFINITY, INFINITY, 0);
        assert_eq!(score, evaluate(&Position::startpos()));
        assert_eq!(searcher.nodes, 1);
    }

    #[test]
    fn checkmated_side_scores_mate() {
        // Fool's mate, White to move and mated.
        let mut position =
            Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        let score = Searcher::new().negamax(&mut position, 3, -INFINITY, INFINITY, 2);
        assert_eq!(score, -(MATE_SCORE - 2));
    }

    #[test]
    fn stalemate_scores_zero() {
        let mut position = Position::from_fen("8/8/8/8/8/1q6/2k5/K7 w - - 0 1").unwrap();
        let score = Searcher::new().negamax(&mut position, 2, -INFINITY, INFINITY, 0);
        assert_eq!(score, 0);
    }

    #[test]
    fn finds_mate_in_one() {
        // Back-rank mate with the rook.
        let (m, score) = best("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", 2);
        assert_eq!(m, "a1a8");
        assert_eq!(score, MATE_SCORE - 1);
    }

    #[test]
    fn prefers_the_faster_mate() {
        // Qg7 mates at once; depth 3 also sees slower mates.
        let (m, score) = best("7k/8/5KQ1/8/8/8/8/8 w - - 0 1", 3);
        assert_eq!(score, MATE_SCORE - 1);
        let mut position = Position::from_fen("7k/8/5KQ1/8/8/8/8/8 w - - 0 1").unwrap();
        let mv = generate_moves(&position)
            .iter()
            .copied()
            .find(|mv| mv.to_uci() == m)
            .unwrap();
        position.make_move(mv);
        assert!(generate_moves(&position).is_empty() && is_in_check(&position));
    }

    #[test]
    fn wins_hanging_queen() {
        let (m, _) = best("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1", 2);
        assert_eq!(m, "d2d5");
    }

    #[test]
    fn cutoffs_do_not_change_the_score() {
        // Plain negamax without pruning, for comparison.
        fn minimax(position: &mut Position, depth: u8, ply: u32) -> i32 {
            if depth == 0 {
                return evaluate(position);
            }
            let moves = generate_moves(position);
            if moves.is_empty() {
                return if is_in_check(position) { -(MATE_SCORE - ply as i32) } else { 0 };
            }
            let mut best = -INFINITY;
            for &m in &moves {
                let undo = position.make_move(m);
                best = best.max(-minimax(position, depth - 1, ply + 1));
                position.unmake_move(m, undo);
            }
            best
        }

        for fen in [
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
            "4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1",
        ] {
            let mut position = Position::from_fen(fen).unwrap();
            let expected = minimax(&mut position, 2, 0);
            let got = Searcher::new().negamax(&mut position, 2, -INFINITY, INFINITY, 0);
            assert_eq!(got, expected, "{fen}");
        }
    }
}
