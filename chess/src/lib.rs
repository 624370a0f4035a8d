//! # Chess rules core for opening-line replay
//!
//! This crate keeps a chess game state, generates pseudo-legal moves for a single piece, applies
//! moves (including castling, en passant and promotion), and converts moves to and from
//! Standard Algebraic Notation (SAN).
//!
//! The moves are _pseudo-legal_: they follow the movement rules of the pieces, but the crate never
//! checks whether a king is left under attack. Checkmate, stalemate and draw detection are out of
//! scope, too.
//!
//! # Example
//!
//! ```
//! use openline::GameState;
//!
//! let mut game = GameState::new();
//! assert!(game.apply("e2", "e4"));
//! assert_eq!(game.last_move_notation(), "e4");
//!
//! let mv = game.parse("Nc6").unwrap();
//! assert_eq!(mv.to_string(), "b8c6");
//!
//! game.push_san_line("Nc6 Nf3 Nf6 Bb5 a6 O-O").unwrap();
//! assert_eq!(game.last_move_notation(), "O-O");
//! ```
//!
//! # Logging
//!
//! With the `logging` feature enabled, rejected moves and unresolved notation are reported through
//! the [`log`](https://docs.rs/log) facade.

pub mod ambig;
pub mod board;
pub mod game;
pub mod movegen;
pub mod moves;

pub use openline_base::{geometry, types};

pub use board::Board;
pub use game::GameState;
pub use movegen::MoveList;
pub use moves::{ApplyError, Move, MoveKind, PromotePiece, SanMove, UciMove};
pub use types::{CastlingRights, CastlingSide, Cell, Color, Coord, File, Piece, Rank};
