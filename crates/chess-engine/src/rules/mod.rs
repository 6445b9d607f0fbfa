//! Game-ending rules.
//!
//! [`RuleSet`] is the seam between the move generator and everything that
//! decides whether a game is over. Conditions visible from a single
//! position live here; repetition needs history and is tracked by
//! [`Game`](crate::Game).

mod standard;

pub use standard::{StandardChess, FIFTY_MOVE_PLIES};

use crate::{MoveList, Position};
use chess_core::{Color, Move};
use serde::Serialize;
use std::fmt;

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw(DrawReason),
}

impl GameResult {
    /// The side that delivered mate to `loser`.
    pub const fn checkmated(loser: Color) -> Self {
        match loser {
            Color::White => GameResult::BlackWins,
            Color::Black => GameResult::WhiteWins,
        }
    }

    pub const fn winner(self) -> Option<Color> {
        match self {
            GameResult::WhiteWins => Some(Color::White),
            GameResult::BlackWins => Some(Color::Black),
            GameResult::Draw(_) => None,
        }
    }

    /// The PGN result token: `1-0`, `0-1` or `1/2-1/2`.
    pub const fn pgn_token(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw(_) => "1/2-1/2",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::WhiteWins => f.write_str("White wins by checkmate"),
            GameResult::BlackWins => f.write_str("Black wins by checkmate"),
            GameResult::Draw(reason) => write!(f, "Draw by {reason}"),
        }
    }
}

/// Why a game was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    Stalemate,
    InsufficientMaterial,
    /// 100 plies without a capture or pawn move.
    FiftyMoveRule,
    ThreefoldRepetition,
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DrawReason::Stalemate => "stalemate",
            DrawReason::InsufficientMaterial => "insufficient material",
            DrawReason::FiftyMoveRule => "the fifty-move rule",
            DrawReason::ThreefoldRepetition => "threefold repetition",
        })
    }
}

/// Decides legality and single-position game endings.
///
/// ```
/// use chess_engine::rules::RuleSet;
/// use chess_engine::StandardChess;
///
/// let position = StandardChess.initial_position();
/// assert_eq!(StandardChess.generate_moves(&position).len(), 20);
/// assert_eq!(StandardChess.position_result(&position), None);
/// ```
pub trait RuleSet {
    fn initial_position(&self) -> Position;

    /// All legal moves for the side to move.
    fn generate_moves(&self, position: &Position) -> MoveList;

    fn is_legal(&self, position: &Position, m: Move) -> bool {
        self.generate_moves(position).contains(&m)
    }

    /// Returns true if the side to move is in check.
    fn is_check(&self, position: &Position) -> bool;

    /// Returns true if neither side can possibly deliver mate.
    fn is_insufficient_material(&self, position: &Position) -> bool;

    /// Checkmate, stalemate, the fifty-move rule and dead positions.
    ///
    /// Repetition is not visible from one position; see
    /// [`Game::result`](crate::Game::result).
    fn position_result(&self, position: &Position) -> Option<GameResult>;
}
