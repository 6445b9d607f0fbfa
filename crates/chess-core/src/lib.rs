//! Core types for chess.
//!
//! This crate provides the value types shared by the position engine, the
//! bot and the front-ends:
//! - [`Piece`] and [`Color`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] (engine form, with special-move flags) and [`PlayerMove`]
//!   (the `{from, to, promotion}` triple callers exchange)
//! - [`CastlingRights`]
//! - FEN parsing and serialization via [`Fen`]

mod castling;
mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use castling::{CastleSide, CastlingRights};
pub use color::Color;
pub use fen::{Fen, FenError};
pub use mov::{Move, MoveFlag, MoveParseError, PlayerMove};
pub use piece::Piece;
pub use square::{File, Rank, Square, SquareParseError};
