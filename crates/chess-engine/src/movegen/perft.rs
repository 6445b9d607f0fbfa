//! Perft: leaf-node counts used to validate the move generator against
//! published reference numbers.

use super::generate_moves;
use crate::Position;

/// Counts the leaf nodes of the legal move tree `depth` plies deep.
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = generate_moves(position);
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for &m in &moves {
        let undo = position.make_move(m);
        nodes += perft(position, depth - 1);
        position.unmake_move(m, undo);
    }
    nodes
}

/// Per-root-move node counts, sorted by UCI text.
pub fn perft_divide(position: &mut Position, depth: u32) -> Vec<(String, u64)> {
    let moves = generate_moves(position);
    let mut results: Vec<(String, u64)> = moves
        .iter()
        .map(|&m| {
            let undo = position.make_move(m);
            let nodes = perft(position, depth.saturating_sub(1));
            position.unmake_move(m, undo);
            (m.to_uci(), nodes)
        })
        .collect();
    results.sort();
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    /// Promotions, en passant and discovered checks.
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    /// Underpromotions with checks.
    const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";

    fn count(fen: &str, depth: u32) -> u64 {
        let mut position = Position::from_fen(fen).unwrap();
        let before = position.clone();
        let nodes = perft(&mut position, depth);
        assert_eq!(position, before, "perft must leave the position unchanged");
        nodes
    }

    #[test]
    fn startpos() {
        let mut position = Position::startpos();
        assert_eq!(perft(&mut position, 1), 20);
        assert_eq!(perft(&mut position, 2), 400);
        assert_eq!(perft(&mut position, 3), 8_902);
    }

    #[test]
    fn kiwipete() {
        assert_eq!(count(KIWIPETE, 1), 48);
        assert_eq!(count(KIWIPETE, 2), 2_039);
    }

    #[test]
    fn endgame_with_en_passant() {
        assert_eq!(count(POSITION_3, 1), 14);
        assert_eq!(count(POSITION_3, 2), 191);
        assert_eq!(count(POSITION_3, 3), 2_812);
    }

    #[test]
    fn promotions() {
        assert_eq!(count(POSITION_4, 1), 6);
        assert_eq!(count(POSITION_4, 2), 264);
    }

    #[test]
    fn divide_sums_to_total() {
        let mut position = Position::startpos();
        let divide = perft_divide(&mut position, 2);
        assert_eq!(divide.len(), 20);
        assert!(divide.iter().all(|(_, nodes)| *nodes == 20));
        assert_eq!(divide[0].0, "a2a3");
    }
}
