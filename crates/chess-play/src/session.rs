//! The interactive loop: a human against the bot over text I/O.

use chess_bot::Bot;
use chess_core::{Color, PlayerMove};
use chess_engine::{Game, GameResult, Position};
use rand::Rng;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::pgn::{self, Players};

const HELP: &str = "\
Enter moves in SAN (Nf3, exd5, O-O, e8=Q) or UCI (g1f3, e7e8q).
Commands:
  moves   list the legal moves
  board   show the board
  undo    take back your last move and the bot's reply
  fen     print the position as FEN
  pgn     print the game so far as PGN
  new     start over
  help    show this text
  quit    leave";

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Finished(GameResult),
    Quit,
}

/// One game against the bot. Reads commands from `input` and writes all
/// output to `output`.
pub struct Session<I, O, R: Rng> {
    game: Game,
    start: Position,
    bot: Bot<R>,
    human: Color,
    pgn_dir: Option<PathBuf>,
    input: I,
    output: O,
}

impl<I: BufRead, O: Write, R: Rng> Session<I, O, R> {
    pub fn new(game: Game, bot: Bot<R>, human: Color, input: I, output: O) -> Self {
        Session {
            start: game.start_position().clone(),
            game,
            bot,
            human,
            pgn_dir: None,
            input,
            output,
        }
    }

    /// Saves the game as PGN into `dir` when it ends.
    pub fn with_pgn_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.pgn_dir = dir;
        self
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Plays until the game ends, the human quits, or input runs out.
    pub fn run(&mut self) -> io::Result<Outcome> {
        writeln!(
            self.output,
            "You play {}. The bot plays at {} level. Type 'help' for commands.",
            self.human,
            self.bot.difficulty()
        )?;
        self.show_board()?;

        let outcome = loop {
            if let Some(result) = self.game.result() {
                writeln!(self.output, "Game over: {result}")?;
                writeln!(self.output, "{}", self.game.movetext())?;
                break Outcome::Finished(result);
            }

            if self.game.side_to_move() != self.human {
                self.bot_turn()?;
                continue;
            }

            write!(self.output, "{}> ", self.game.side_to_move())?;
            self.output.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                break Outcome::Quit;
            }
            if !self.handle(line.trim())? {
                break Outcome::Quit;
            }
        };

        self.save_pgn()?;
        Ok(outcome)
    }

    fn bot_turn(&mut self) -> io::Result<()> {
        // run() checks for the end of the game first, so there is a move.
        let Some(m) = self.bot.select_move(self.game.position()) else {
            return Err(io::Error::other("the bot found no move in a live game"));
        };
        if let Err(err) = self.game.apply_move(m.player_move()) {
            warn!(%err, "bot chose a move the game rejected");
            return Err(io::Error::other(err));
        }
        let san = self
            .game
            .moves()
            .last()
            .map_or_else(|| m.to_uci(), |gm| gm.san.clone());
        info!(%san, "bot moved");
        writeln!(self.output, "Bot plays {san}")?;
        self.show_board()
    }

    /// Handles one line of input. Returns `false` when the human quits.
    fn handle(&mut self, line: &str) -> io::Result<bool> {
        match line {
            "" => {}
            "quit" | "exit" | "resign" => return Ok(false),
            "help" | "?" => writeln!(self.output, "{HELP}")?,
            "board" => self.show_board()?,
            "fen" => writeln!(self.output, "{}", self.game.to_fen())?,
            "pgn" => writeln!(self.output, "{}", self.render_pgn())?,
            "moves" => {
                let position = self.game.position();
                let list: Vec<String> = self
                    .game
                    .legal_moves()
                    .iter()
                    .map(|&m| chess_engine::move_to_san(position, m))
                    .collect();
                writeln!(self.output, "{}", list.join(" "))?;
            }
            "undo" => self.undo()?,
            "new" => {
                self.restart();
                writeln!(self.output, "New game.")?;
                self.show_board()?;
            }
            text => self.play(text)?,
        }
        Ok(true)
    }

    fn play(&mut self, text: &str) -> io::Result<()> {
        let played = if text.parse::<PlayerMove>().is_ok() {
            self.game.apply_uci(text)
        } else {
            self.game.apply_san(text)
        };
        match played {
            Ok(_) => self.show_board(),
            Err(err) => writeln!(self.output, "Cannot play {text:?}: {err}"),
        }
    }

    /// Takes back the human's last move along with the bot's reply.
    fn undo(&mut self) -> io::Result<()> {
        let mut undone = 0;
        while self.game.undo_last().is_some() {
            undone += 1;
            if self.game.side_to_move() == self.human {
                break;
            }
        }
        if undone == 0 {
            writeln!(self.output, "Nothing to undo.")
        } else {
            self.bot.forget_last_move();
            self.show_board()
        }
    }

    fn restart(&mut self) {
        self.game = Game::from_position(self.start.clone());
        self.bot.forget_last_move();
    }

    fn show_board(&mut self) -> io::Result<()> {
        write!(self.output, "{}", self.game.position())?;
        if self.game.is_check() && !self.game.is_game_over() {
            writeln!(self.output, "{} is in check.", self.game.side_to_move())?;
        }
        Ok(())
    }

    fn players(&self) -> Players {
        let you = "You".to_string();
        let bot = format!("Bot ({})", self.bot.difficulty());
        match self.human {
            Color::White => Players { white: you, black: bot },
            Color::Black => Players { white: bot, black: you },
        }
    }

    fn render_pgn(&self) -> String {
        pgn::render(&self.game, &self.players(), chrono::Local::now())
    }

    fn save_pgn(&mut self) -> io::Result<()> {
        let Some(dir) = self.pgn_dir.clone() else {
            return Ok(());
        };
        if self.game.ply_count() == 0 {
            return Ok(());
        }
        match pgn::save(&dir, &self.game, &self.players()) {
            Ok(path) => {
                info!(path = %path.display(), "game saved");
                writeln!(self.output, "Saved {}", path.display())
            }
            Err(err) => {
                warn!(dir = %dir.display(), %err, "could not save game");
                writeln!(self.output, "Could not save the game: {err}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_bot::{Difficulty, SearchProfile};
    use rand::rngs::StdRng;
    use std::io::Cursor;

    fn bot() -> Bot<StdRng> {
        Bot::seeded(Difficulty::Master, 1).with_profile(SearchProfile::new(1, 0.0))
    }

    fn run(game: Game, human: Color, input: &str) -> (Outcome, String, Game) {
        let mut output = Vec::new();
        let mut session = Session::new(game, bot(), human, Cursor::new(input.to_string()), &mut output);
        let outcome = session.run().unwrap();
        let game = session.game().clone();
        drop(session);
        (outcome, String::from_utf8(output).unwrap(), game)
    }

    #[test]
    fn human_and_bot_alternate() {
        let (outcome, out, game) = run(Game::new(), Color::White, "e4\nquit\n");
        assert_eq!(outcome, Outcome::Quit);
        assert_eq!(game.ply_count(), 2);
        assert!(out.contains("Bot plays "));
        assert!(out.contains("a b c d e f g h"));
    }

    #[test]
    fn bot_opens_when_human_is_black() {
        let (_, out, game) = run(Game::new(), Color::Black, "");
        assert_eq!(game.ply_count(), 1);
        assert!(out.starts_with("You play Black."));
    }

    #[test]
    fn uci_input_and_bad_moves() {
        let (_, out, game) = run(Game::new(), Color::White, "e2e5\nKe2\ng1f3\n");
        assert!(out.contains("Cannot play \"e2e5\""));
        assert!(out.contains("Cannot play \"Ke2\""));
        assert_eq!(game.history()[0].to_string(), "g1f3");
    }

    #[test]
    fn undo_takes_back_a_full_move() {
        let (_, out, game) = run(Game::new(), Color::White, "d4\nundo\nundo\n");
        assert_eq!(game.ply_count(), 0);
        assert!(out.contains("Nothing to undo."));
    }

    #[test]
    fn commands() {
        let (_, out, _) = run(Game::new(), Color::White, "help\nfen\nmoves\npgn\n");
        assert!(out.contains("Commands:"));
        assert!(out.contains(chess_core::Fen::STARTPOS));
        assert!(out.contains("Nf3"));
        assert!(out.contains("[Result \"*\"]"));
    }

    #[test]
    fn new_restarts_from_the_configured_position() {
        let fen = "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1";
        let game = Game::from_fen(fen).unwrap();
        let (_, _, game) = run(game, Color::White, "e4\nnew\n");
        assert_eq!(game.to_fen(), fen);
    }

    #[test]
    fn finishes_on_mate() {
        // White mates at once with Ra8.
        let game = Game::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let (outcome, out, _) = run(game, Color::White, "Ra8\n");
        assert_eq!(outcome, Outcome::Finished(GameResult::WhiteWins));
        assert!(out.contains("Game over"));
        assert!(out.contains("1. Ra8# 1-0"));
    }

    #[test]
    fn saves_pgn_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let game = Game::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let mut output = Vec::new();
        let mut session = Session::new(game, bot(), Color::White, Cursor::new("Ra8\n"), &mut output)
            .with_pgn_dir(Some(dir.path().to_path_buf()));
        session.run().unwrap();
        let saved: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(saved.len(), 1);
    }
}
