//! Moves and their textual representations

mod base;

pub mod san;
pub mod uci;

pub use base::*;

pub type SanMove = san::Move;
pub type UciMove = uci::Move;
