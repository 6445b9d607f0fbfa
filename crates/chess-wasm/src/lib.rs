//! WebAssembly bindings for the chess engine and bot.
//!
//! A board UI drives a [`PositionEngine`] for rules and history and asks a
//! [`BotEngine`] for the computer's replies. Neither exposes engine
//! internals: squares travel as `"e4"`, moves as `{from, to, promotion?}`
//! objects and positions as FEN.
//!
//! # Usage
//!
//! ```javascript
//! import init, { newGame, newBot } from 'chess-wasm';
//!
//! await init();
//!
//! const game = newGame();
//! game.legalMovesFrom("e2");            // ["e3", "e4"]
//! game.applyMove({ from: "e2", to: "e4" });
//!
//! const bot = newBot("intermediate", Math.random() * 2 ** 32);
//! const reply = bot.selectMove(game.toFen());
//! if (reply) game.applyMove(reply);
//! console.log(game.movetext());         // "1. e4 e5 *"
//! ```

use chess_bot::{Bot, Difficulty};
use chess_core::{Color, PlayerMove, Square};
use chess_engine::Game;
use wasm_bindgen::prelude::*;

/// Our values are plain structs, so conversion only fails without a JS host.
fn to_js<T: serde::Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

fn parse_square(text: &str) -> Option<Square> {
    text.trim().parse().ok()
}

fn parse_side(text: &str) -> Option<Color> {
    match text.trim().to_ascii_lowercase().as_str() {
        "w" | "white" => Some(Color::White),
        "b" | "black" => Some(Color::Black),
        _ => None,
    }
}

/// Rules, legality and the record of one game.
#[wasm_bindgen]
pub struct PositionEngine {
    game: Game,
}

/// Starts a game from the standard setup, or from `fen` when given.
/// `undefined` if `fen` is not a valid position.
#[wasm_bindgen(js_name = newGame)]
pub fn new_game(fen: Option<String>) -> Option<PositionEngine> {
    match fen {
        Some(fen) => PositionEngine::from_fen(&fen),
        None => Some(PositionEngine::new()),
    }
}

#[wasm_bindgen]
impl PositionEngine {
    /// A game from the standard setup.
    #[wasm_bindgen(constructor)]
    pub fn new() -> PositionEngine {
        PositionEngine { game: Game::new() }
    }

    /// Destination squares of the piece on `square`. Empty for an empty
    /// square, an enemy piece, a piece with nowhere to go, or bad input.
    #[wasm_bindgen(js_name = legalMovesFrom)]
    pub fn legal_moves_from(&self, square: &str) -> Vec<String> {
        parse_square(square)
            .map(|sq| {
                self.game
                    .legal_moves_from(sq)
                    .into_iter()
                    .map(|to| to.to_algebraic())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every legal move in UCI form.
    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self) -> Vec<String> {
        self.game.legal_moves().iter().map(|m| m.to_uci()).collect()
    }

    /// Plays a `{from, to, promotion?}` move. Returns `false`, changing
    /// nothing, if the object is malformed or the move is illegal.
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(&mut self, mv: JsValue) -> bool {
        match serde_wasm_bindgen::from_value::<PlayerMove>(mv) {
            Ok(pm) => self.apply(pm),
            Err(_) => false,
        }
    }

    /// Plays a move written as UCI text such as `"e7e8q"`.
    #[wasm_bindgen(js_name = applyUci)]
    pub fn apply_uci(&mut self, text: &str) -> bool {
        self.game.apply_uci(text).is_ok()
    }

    /// Plays a move written in SAN such as `"Nf3"`.
    #[wasm_bindgen(js_name = applySan)]
    pub fn apply_san(&mut self, text: &str) -> bool {
        self.game.apply_san(text).is_ok()
    }

    /// Takes back the last move and returns it, or `null` at the start.
    #[wasm_bindgen(js_name = undoLast)]
    pub fn undo_last(&mut self) -> JsValue {
        self.game.undo_last().map_or(JsValue::NULL, |pm| to_js(&pm))
    }

    /// `{fen, legalMoves, isCheck, isCheckmate, isStalemate, isDraw,
    /// sideToMove, history}`.
    pub fn state(&self) -> JsValue {
        to_js(&self.game.state())
    }

    /// FEN letter of the piece on `square` (`"P"`, `"k"`, ...), or `null`.
    #[wasm_bindgen(js_name = pieceAt)]
    pub fn piece_at(&self, square: &str) -> Option<String> {
        let (piece, color) = self.game.piece_at(parse_square(square)?)?;
        Some(piece.to_fen_char(color).to_string())
    }

    /// Where `side` (`"w"`/`"white"` or `"b"`/`"black"`) has its king.
    #[wasm_bindgen(js_name = kingSquare)]
    pub fn king_square(&self, side: &str) -> Option<String> {
        self.game
            .king_square(parse_side(side)?)
            .map(Square::to_algebraic)
    }

    /// PGN movetext of the game so far.
    pub fn movetext(&self) -> String {
        self.game.movetext()
    }

    /// A full PGN document with the standard tag section.
    #[wasm_bindgen(js_name = toPgn)]
    pub fn to_pgn(&self) -> String {
        self.game.to_pgn(&[])
    }

    #[wasm_bindgen(js_name = toFen)]
    pub fn to_fen(&self) -> String {
        self.game.to_fen()
    }

    /// Replaces the game with `fen`. On `false` nothing has changed.
    #[wasm_bindgen(js_name = loadFen)]
    pub fn load_fen(&mut self, fen: &str) -> bool {
        self.game.load_fen(fen).is_ok()
    }

    pub fn reset(&mut self) {
        self.game.reset();
    }

    #[wasm_bindgen(js_name = isCheck)]
    pub fn is_check(&self) -> bool {
        self.game.is_check()
    }

    #[wasm_bindgen(js_name = isCheckmate)]
    pub fn is_checkmate(&self) -> bool {
        self.game.is_checkmate()
    }

    #[wasm_bindgen(js_name = isStalemate)]
    pub fn is_stalemate(&self) -> bool {
        self.game.is_stalemate()
    }

    #[wasm_bindgen(js_name = isDraw)]
    pub fn is_draw(&self) -> bool {
        self.game.is_draw()
    }

    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.game.is_game_over()
    }

    /// `"1-0"`, `"0-1"`, `"1/2-1/2"` or `"*"`.
    pub fn result(&self) -> String {
        self.game.result_token().to_string()
    }

    /// Long algebraic text for a move about to be played, e.g. `"Ng1f3"`.
    #[wasm_bindgen(js_name = moveNotation)]
    pub fn move_notation(&self, uci: &str) -> Option<String> {
        let pm: PlayerMove = uci.parse().ok()?;
        Some(self.game.move_notation(pm))
    }

    /// `{byWhite, byBlack}` lists of lost pieces.
    #[wasm_bindgen(js_name = capturedPieces)]
    pub fn captured_pieces(&self) -> JsValue {
        to_js(&self.game.captured_pieces())
    }

    /// ASCII diagram of the board.
    pub fn ascii(&self) -> String {
        self.game.position().to_string()
    }
}

impl PositionEngine {
    /// `None` if `fen` is not a valid position.
    pub fn from_fen(fen: &str) -> Option<PositionEngine> {
        Game::from_fen(fen).ok().map(|game| PositionEngine { game })
    }

    fn apply(&mut self, pm: PlayerMove) -> bool {
        self.game.apply_move(pm).is_ok()
    }
}

impl Default for PositionEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// The computer opponent.
#[wasm_bindgen]
pub struct BotEngine {
    bot: Bot,
}

/// Creates a bot at `difficulty`, its blunders drawn from `seed`.
/// `undefined` for an unknown difficulty.
#[wasm_bindgen(js_name = newBot)]
pub fn new_bot(difficulty: &str, seed: u32) -> Option<BotEngine> {
    BotEngine::new(difficulty, seed)
}

impl BotEngine {
    pub fn new(difficulty: &str, seed: u32) -> Option<BotEngine> {
        let difficulty: Difficulty = difficulty.parse().ok()?;
        Some(BotEngine {
            bot: Bot::seeded(difficulty, u64::from(seed)),
        })
    }

    /// `None` both for a malformed `fen` and for a position without moves.
    fn reply(&mut self, fen: &str) -> Option<PlayerMove> {
        self.bot.select_move_fen(fen).ok().flatten()
    }
}

#[wasm_bindgen]
impl BotEngine {
    /// The bot's `{from, to, promotion?}` reply for `fen`, or `null` when
    /// `fen` is malformed or the side to move has no legal move.
    #[wasm_bindgen(js_name = selectMove)]
    pub fn select_move(&mut self, fen: &str) -> JsValue {
        self.reply(fen).map_or(JsValue::NULL, |pm| to_js(&pm))
    }

    /// Same as `selectMove`, as UCI text.
    #[wasm_bindgen(js_name = selectMoveUci)]
    pub fn select_move_uci(&mut self, fen: &str) -> Option<String> {
        self.reply(fen).map(|pm| pm.to_string())
    }

    /// Returns `false`, keeping the current level, for an unknown name.
    #[wasm_bindgen(js_name = setDifficulty)]
    pub fn set_difficulty(&mut self, difficulty: &str) -> bool {
        match difficulty.parse() {
            Ok(difficulty) => {
                self.bot.set_difficulty(difficulty);
                true
            }
            Err(_) => false,
        }
    }

    pub fn difficulty(&self) -> String {
        self.bot.difficulty().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(fen: Option<&str>) -> PositionEngine {
        new_game(fen.map(str::to_string)).unwrap()
    }

    #[test]
    fn start_position() {
        let game = engine(None);
        assert_eq!(game.legal_moves().len(), 20);
        assert_eq!(game.piece_at("e1").as_deref(), Some("K"));
        assert_eq!(game.piece_at("e8").as_deref(), Some("k"));
        assert_eq!(game.piece_at("e4"), None);
        assert_eq!(game.piece_at("z9"), None);
        assert_eq!(game.king_square("black").as_deref(), Some("e8"));
        assert_eq!(game.king_square("w").as_deref(), Some("e1"));
        assert_eq!(game.king_square("green"), None);
    }

    #[test]
    fn legal_moves_from_squares() {
        let game = engine(None);
        assert_eq!(game.legal_moves_from("e2"), ["e3", "e4"]);
        assert!(game.legal_moves_from("e7").is_empty());
        assert!(game.legal_moves_from("e4").is_empty());
        assert!(game.legal_moves_from("nowhere").is_empty());
    }

    #[test]
    fn moves_report_success() {
        let mut game = engine(None);
        assert!(game.apply(PlayerMove::new("e2".parse().unwrap(), "e4".parse().unwrap())));
        assert!(!game.apply_uci("e2e4"));
        assert!(game.apply_san("e5"));
        assert!(!game.apply_san("Ke3"));
        assert_eq!(game.movetext(), "1. e4 e5 *");
        assert!(game.to_pgn().ends_with("1. e4 e5 *\n"));
    }

    #[test]
    fn scholars_mate() {
        let mut game = engine(None);
        for san in ["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6", "Qxf7#"] {
            assert!(game.apply_san(san), "{san}");
        }
        assert!(game.is_checkmate() && game.is_game_over());
        assert!(!game.is_stalemate() && !game.is_draw());
        assert_eq!(game.result(), "1-0");
    }

    #[test]
    fn fen_round_trip_and_rejection() {
        let fen = "8/8/8/8/8/1q6/2k5/K7 w - - 0 1";
        let mut game = engine(Some(fen));
        assert_eq!(game.to_fen(), fen);
        assert!(game.is_stalemate());
        assert!(!game.load_fen("8/8/8/8 w - - 0 1"));
        assert_eq!(game.to_fen(), fen);
        game.reset();
        assert_eq!(game.legal_moves().len(), 20);
    }

    #[test]
    fn notation_and_diagram() {
        let game = engine(None);
        assert_eq!(game.move_notation("g1f3").as_deref(), Some("Ng1f3"));
        assert_eq!(game.move_notation("xx"), None);
        assert!(game.ascii().contains("a b c d e f g h"));
    }

    #[test]
    fn bot_replies_with_a_legal_move() {
        let mut bot = BotEngine::new("advanced", 5).unwrap();
        assert_eq!(bot.difficulty(), "advanced");
        let game = engine(None);
        let reply = bot.select_move_uci(&game.to_fen()).unwrap();
        assert!(game.legal_moves().contains(&reply));

        let mut stalemated = BotEngine::new("master", 0).unwrap();
        assert_eq!(stalemated.select_move_uci("8/8/8/8/8/1q6/2k5/K7 w - - 0 1"), None);
    }

    #[test]
    fn difficulty_can_change() {
        let mut bot = BotEngine::new("beginner", 0).unwrap();
        assert!(bot.set_difficulty("master"));
        assert_eq!(bot.difficulty(), "master");
        assert!(!bot.set_difficulty("nope"));
        assert_eq!(bot.difficulty(), "master");
    }

    #[test]
    fn bad_input_is_a_failure_value() {
        assert!(new_game(Some("not a fen".into())).is_none());
        assert!(PositionEngine::from_fen("4k3/8/8/8/8/8/8/4K2K w - - 0 1").is_none());
        assert!(new_bot("grandmaster", 1).is_none());
        let mut bot = new_bot("beginner", 1).unwrap();
        assert_eq!(bot.select_move_uci("garbage"), None);
    }
}
