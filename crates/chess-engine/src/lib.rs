//! Chess rules engine with bitboard representation.
//!
//! - [`Position`]: piece placement plus FEN state, with in-place
//!   [`make_move`](Position::make_move) / [`unmake_move`](Position::unmake_move)
//! - [`movegen`]: attack tables, pseudo-legal generation, legality filter, perft
//! - [`RuleSet`] / [`StandardChess`]: checkmate, stalemate and draw rules
//! - [`san`]: Standard Algebraic Notation in and out
//! - [`Game`]: a position with its record, undo and PGN export
//!
//! # Example
//!
//! ```
//! use chess_engine::Game;
//!
//! let mut game = Game::new();
//! game.apply_uci("e2e4").unwrap();
//! game.apply_san("e5").unwrap();
//! assert_eq!(game.movetext(), "1. e4 e5 *");
//! assert_eq!(game.undo_last().map(|m| m.to_string()), Some("e7e5".to_string()));
//! ```

mod bitboard;
mod game;
pub mod movegen;
mod position;
pub mod rules;
pub mod san;
mod zobrist;

pub use bitboard::Bitboard;
pub use game::{CapturedPieces, Game, GameError, GameMove, GameState};
pub use movegen::{generate_moves, is_in_check, is_king_attacked, is_square_attacked, MoveList};
pub use position::{Position, Undo};
pub use rules::{DrawReason, GameResult, RuleSet, StandardChess};
pub use san::{move_to_san, san_to_move, SanError};
