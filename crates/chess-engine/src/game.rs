//! A game in progress: the live position plus its record.
//!
//! [`Game`] is the single source of truth a caller talks to. It validates
//! caller moves against full legal-move generation, keeps the undo data for
//! every ply, and answers the terminal-state questions that need history
//! (repetition) as well as those that do not.

use crate::movegen::{generate_moves, is_in_check};
use crate::position::Undo;
use crate::rules::{DrawReason, GameResult, RuleSet, StandardChess};
use crate::san::{move_to_san, san_to_move, SanError};
use crate::{MoveList, Position};
use chess_core::{Color, Fen, FenError, Move, MoveParseError, Piece, PlayerMove, Square};
use serde::Serialize;
use std::fmt::Write as _;
use thiserror::Error;
use tracing::{trace, warn};

/// One ply of the game record.
#[derive(Debug, Clone)]
pub struct GameMove {
    pub mov: Move,
    /// SAN as written in the position before the move.
    pub san: String,
    undo: Undo,
}

impl GameMove {
    /// The piece that was taken by this move, if any.
    pub fn captured(&self) -> Option<Piece> {
        self.undo.captured
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("there is no piece on {0}")]
    EmptySquare(Square),

    #[error("the piece on {0} does not belong to the side to move")]
    NotSideToMove(Square),

    #[error("{0} is not a legal move")]
    IllegalMove(PlayerMove),

    #[error("{0} names a promotion that is not allowed here")]
    InvalidPromotion(PlayerMove),

    #[error(transparent)]
    InvalidNotation(#[from] MoveParseError),

    #[error(transparent)]
    InvalidSan(#[from] SanError),
}

/// Pieces removed from the board, grouped by the side that took them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedPieces {
    /// Black pieces White has taken.
    pub by_white: Vec<Piece>,
    /// White pieces Black has taken.
    pub by_black: Vec<Piece>,
}

/// Snapshot handed to a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub fen: String,
    pub legal_moves: Vec<PlayerMove>,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
    pub is_draw: bool,
    pub side_to_move: Color,
    pub history: Vec<PlayerMove>,
}

/// The non-king material each side starts with.
const STARTING_SET: [(Piece, usize); 5] = [
    (Piece::Pawn, 8),
    (Piece::Knight, 2),
    (Piece::Bishop, 2),
    (Piece::Rook, 2),
    (Piece::Queen, 1),
];

#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    start: Position,
    moves: Vec<GameMove>,
    /// Repetition keys of every position so far, the start included.
    hashes: Vec<u64>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A game from the standard starting position.
    pub fn new() -> Self {
        Self::from_position(StandardChess.initial_position())
    }

    pub fn from_position(position: Position) -> Self {
        Game {
            hashes: vec![position.zobrist_hash()],
            start: position.clone(),
            position,
            moves: Vec::new(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The position the record starts from.
    pub fn start_position(&self) -> &Position {
        &self.start
    }

    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    /// The record, oldest ply first.
    pub fn moves(&self) -> &[GameMove] {
        &self.moves
    }

    /// The record as caller-facing triples.
    pub fn history(&self) -> Vec<PlayerMove> {
        self.moves.iter().map(|gm| gm.mov.player_move()).collect()
    }

    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    pub fn legal_moves(&self) -> MoveList {
        generate_moves(&self.position)
    }

    pub fn legal_player_moves(&self) -> Vec<PlayerMove> {
        self.legal_moves().iter().map(|m| m.player_move()).collect()
    }

    /// Destinations of the piece on `sq`. Empty if the square is empty,
    /// holds a piece of the side not to move, or the piece cannot move.
    pub fn legal_moves_from(&self, sq: Square) -> Vec<Square> {
        let mut targets: Vec<Square> = self
            .legal_moves()
            .iter()
            .filter(|m| m.from() == sq)
            .map(|m| m.to())
            .collect();
        // The four promotions of one push share a destination.
        targets.dedup();
        targets
    }

    /// Matches a caller move to the legal move it denotes.
    ///
    /// An omitted promotion on a pawn reaching the last rank means a queen.
    pub fn resolve(&self, pm: PlayerMove) -> Result<Move, GameError> {
        match self.position.piece_at(pm.from) {
            None => return Err(GameError::EmptySquare(pm.from)),
            Some((_, color)) if color != self.position.side_to_move => {
                return Err(GameError::NotSideToMove(pm.from))
            }
            Some(_) => {}
        }

        let candidates: Vec<Move> = self
            .legal_moves()
            .iter()
            .copied()
            .filter(|m| m.from() == pm.from && m.to() == pm.to)
            .collect();
        let Some(&first) = candidates.first() else {
            return Err(GameError::IllegalMove(pm));
        };

        if first.flag().is_promotion() {
            let wanted = pm.promotion.unwrap_or(Piece::Queen);
            candidates
                .into_iter()
                .find(|m| m.promotion() == Some(wanted))
                .ok_or(GameError::InvalidPromotion(pm))
        } else if pm.promotion.is_some() {
            Err(GameError::InvalidPromotion(pm))
        } else {
            Ok(first)
        }
    }

    /// Plays a caller move. On error nothing changes.
    pub fn apply_move(&mut self, pm: PlayerMove) -> Result<Move, GameError> {
        match self.resolve(pm) {
            Ok(m) => {
                self.play(m);
                Ok(m)
            }
            Err(err) => {
                trace!(%pm, %err, "move rejected");
                Err(err)
            }
        }
    }

    /// Plays a move written in coordinate notation (`e2e4`, `e7e8q`).
    pub fn apply_uci(&mut self, text: &str) -> Result<Move, GameError> {
        self.apply_move(text.trim().parse()?)
    }

    /// Plays a move written in SAN (`Nf3`, `exd5`, `O-O`).
    pub fn apply_san(&mut self, text: &str) -> Result<Move, GameError> {
        match san_to_move(&self.position, text) {
            Ok(m) => {
                self.play(m);
                Ok(m)
            }
            Err(err) => {
                trace!(san = text, %err, "move rejected");
                Err(err.into())
            }
        }
    }

    /// Plays a move already known to be legal here.
    fn play(&mut self, m: Move) {
        let san = move_to_san(&self.position, m);
        let undo = self.position.make_move(m);
        self.hashes.push(self.position.zobrist_hash());
        self.moves.push(GameMove { mov: m, san, undo });
    }

    /// Takes back the last ply. `None` when the record is empty.
    pub fn undo_last(&mut self) -> Option<PlayerMove> {
        let last = self.moves.pop()?;
        self.position.unmake_move(last.mov, last.undo);
        self.hashes.pop();
        Some(last.mov.player_move())
    }

    pub fn is_check(&self) -> bool {
        is_in_check(&self.position)
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_check() && self.legal_moves().is_empty()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && self.legal_moves().is_empty()
    }

    /// How many times the current position has occurred, this time included.
    pub fn position_count(&self) -> usize {
        let current = self.hashes.last().copied().unwrap_or_default();
        self.hashes.iter().filter(|&&h| h == current).count()
    }

    pub fn is_threefold_repetition(&self) -> bool {
        self.position_count() >= 3
    }

    pub fn is_insufficient_material(&self) -> bool {
        StandardChess.is_insufficient_material(&self.position)
    }

    /// The draw rule in force, stalemate aside.
    pub fn draw_reason(&self) -> Option<DrawReason> {
        if self.is_insufficient_material() {
            Some(DrawReason::InsufficientMaterial)
        } else if self.position.halfmove_clock >= crate::rules::FIFTY_MOVE_PLIES {
            Some(DrawReason::FiftyMoveRule)
        } else if self.is_threefold_repetition() {
            Some(DrawReason::ThreefoldRepetition)
        } else {
            None
        }
    }

    /// Fifty-move rule, insufficient material or threefold repetition.
    pub fn is_draw(&self) -> bool {
        self.draw_reason().is_some()
    }

    pub fn result(&self) -> Option<GameResult> {
        StandardChess
            .position_result(&self.position)
            .or_else(|| self.draw_reason().map(GameResult::Draw))
    }

    pub fn is_game_over(&self) -> bool {
        self.result().is_some()
    }

    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        self.position.piece_at(sq)
    }

    /// Every piece on the board, a1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece, Color)> + '_ {
        Square::all().filter_map(|sq| {
            self.position
                .piece_at(sq)
                .map(|(piece, color)| (sq, piece, color))
        })
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.position.king_square(color)
    }

    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// Replaces the game with one starting from `fen`, clearing the record.
    /// On error the current game is left as it was.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), FenError> {
        match Position::from_fen(fen) {
            Ok(position) => {
                *self = Self::from_position(position);
                Ok(())
            }
            Err(err) => {
                warn!(fen, %err, "position import rejected");
                Err(err)
            }
        }
    }

    /// Back to the standard starting position with an empty record.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// PGN result token for the record: `*` while the game is running.
    pub fn result_token(&self) -> &'static str {
        self.result().map_or("*", GameResult::pgn_token)
    }

    /// PGN movetext, e.g. `1. e4 e5 2. Nf3 *`. A record starting with
    /// Black to move opens with `1...`.
    pub fn movetext(&self) -> String {
        let mut text = String::new();
        let mut number = self.start.fullmove_number;
        let mut color = self.start.side_to_move;
        for (i, gm) in self.moves.iter().enumerate() {
            if !text.is_empty() {
                text.push(' ');
            }
            match color {
                Color::White => {
                    let _ = write!(text, "{number}. ");
                }
                Color::Black if i == 0 => {
                    let _ = write!(text, "{number}... ");
                }
                Color::Black => {}
            }
            text.push_str(&gm.san);
            if color == Color::Black {
                number += 1;
            }
            color = !color;
        }
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(self.result_token());
        text
    }

    /// A full PGN document: the caller's tags, then `Result` (and `SetUp` /
    /// `FEN` when the game did not start from the standard position), then
    /// the movetext.
    pub fn to_pgn(&self, tags: &[(&str, &str)]) -> String {
        const OWN_TAGS: [&str; 3] = ["Result", "SetUp", "FEN"];
        let mut pgn = String::new();
        for (name, value) in tags.iter().filter(|(name, _)| !OWN_TAGS.contains(name)) {
            let _ = writeln!(pgn, "[{name} \"{}\"]", escape_tag(value));
        }
        let _ = writeln!(pgn, "[Result \"{}\"]", self.result_token());
        let start_fen = self.start.to_fen();
        if start_fen != Fen::STARTPOS {
            let _ = writeln!(pgn, "[SetUp \"1\"]");
            let _ = writeln!(pgn, "[FEN \"{start_fen}\"]");
        }
        pgn.push('\n');
        pgn.push_str(&self.movetext());
        pgn.push('\n');
        pgn
    }

    /// Long algebraic form of a move in the current position: piece
    /// letter, origin, destination, promotion (`Ng1f3`, `e2e4`, `e7e8=Q`).
    pub fn move_notation(&self, pm: PlayerMove) -> String {
        let letter = match self.position.piece_at(pm.from) {
            Some((Piece::Pawn, _)) | None => None,
            Some((piece, _)) => Some(piece.to_char().to_ascii_uppercase()),
        };
        let mut text = String::with_capacity(7);
        text.extend(letter);
        let _ = write!(text, "{}{}", pm.from, pm.to);
        if let Some(promo) = pm.promotion {
            text.push('=');
            text.push(promo.to_char().to_ascii_uppercase());
        }
        text
    }

    /// Material missing from each side compared with the standard set.
    ///
    /// Counts are clamped at zero, so a promoted piece hides a lost pawn
    /// rather than producing a negative entry.
    pub fn captured_pieces(&self) -> CapturedPieces {
        let missing = |color: Color| -> Vec<Piece> {
            STARTING_SET
                .iter()
                .flat_map(|&(piece, full)| {
                    let left = self.position.pieces_of(piece, color).count() as usize;
                    std::iter::repeat(piece).take(full.saturating_sub(left))
                })
                .collect()
        };
        CapturedPieces {
            by_white: missing(Color::Black),
            by_black: missing(Color::White),
        }
    }

    pub fn state(&self) -> GameState {
        let legal = self.legal_moves();
        let is_check = self.is_check();
        GameState {
            fen: self.to_fen(),
            legal_moves: legal.iter().map(|m| m.player_move()).collect(),
            is_check,
            is_checkmate: is_check && legal.is_empty(),
            is_stalemate: !is_check && legal.is_empty(),
            is_draw: self.is_draw(),
            side_to_move: self.side_to_move(),
            history: self.history(),
        }
    }
}

fn escape_tag(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
