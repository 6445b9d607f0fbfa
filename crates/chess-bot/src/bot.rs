//! The bot: picks one move per call at a chosen difficulty.

use chess_core::{FenError, Move, PlayerMove, Square};
use chess_engine::{generate_moves, Position};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::difficulty::{Difficulty, SearchProfile};
use crate::ordering::order_moves;
use crate::search::Searcher;

/// A computer opponent.
///
/// Holds no search state between calls apart from its own previous move,
/// which it uses to avoid shuffling a piece back and forth. Randomness comes
/// only from `rng`; seed it to make blunders reproducible.
#[derive(Debug, Clone)]
pub struct Bot<R: Rng = StdRng> {
    difficulty: Difficulty,
    profile: SearchProfile,
    rng: R,
    last_move: Option<(Square, Square)>,
}

impl Bot<StdRng> {
    /// A bot seeded from the operating system.
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_rng(difficulty, StdRng::from_os_rng())
    }

    /// A bot whose blunders are reproducible from `seed`.
    pub fn seeded(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_rng(difficulty, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Bot<R> {
    pub fn with_rng(difficulty: Difficulty, rng: R) -> Self {
        Bot {
            difficulty,
            profile: difficulty.profile(),
            rng,
            last_move: None,
        }
    }

    /// Replaces the search settings without changing the reported
    /// difficulty.
    pub fn with_profile(mut self, profile: SearchProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn profile(&self) -> SearchProfile {
        self.profile
    }

    /// Switches level, resetting the search settings to that level's.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.profile = difficulty.profile();
    }

    /// The bot's previous move as a from/to pair.
    pub fn last_move(&self) -> Option<(Square, Square)> {
        self.last_move
    }

    /// Forgets the previous move, e.g. when a new game starts.
    pub fn forget_last_move(&mut self) {
        self.last_move = None;
    }

    /// Chooses a move for the side to move in `position`.
    ///
    /// Returns `None` only when there is no legal move.
    pub fn select_move(&mut self, position: &Position) -> Option<Move> {
        let moves = generate_moves(position);
        if moves.is_empty() {
            debug!(fen = %position.to_fen(), "no legal move to choose from");
            return None;
        }

        let blunder_probability = self.profile.clamped_blunder_probability();
        if blunder_probability > 0.0 && self.rng.random_bool(blunder_probability) {
            let chosen = *moves.as_slice().choose(&mut self.rng)?;
            debug!(
                difficulty = %self.difficulty,
                chosen = %chosen,
                "blunder: playing a random move"
            );
            return Some(self.remember(chosen));
        }

        let ordered = order_moves(position, &moves, self.last_move);
        let mut scratch = position.clone();
        let mut searcher = Searcher::new();
        let (chosen, score) =
            searcher.search_root(&mut scratch, &ordered, self.profile.depth.max(1))?;

        debug!(
            difficulty = %self.difficulty,
            depth = self.profile.depth.max(1),
            score,
            nodes = searcher.nodes,
            chosen = %chosen,
            "searched move"
        );
        Some(self.remember(chosen))
    }

    /// Parses `fen` and chooses a move for it.
    pub fn select_move_fen(&mut self, fen: &str) -> Result<Option<PlayerMove>, FenError> {
        let position = Position::from_fen(fen)?;
        Ok(self.select_move(&position).map(PlayerMove::from))
    }

    fn remember(&mut self, m: Move) -> Move {
        self.last_move = Some((m.from(), m.to()));
        m
    }
}
