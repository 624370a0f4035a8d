//! Ranks that play a special role for each side
//!
//! All the ranks are given from White's point of view and mirrored for Black.

use crate::types::{Color, Rank};

const fn relative(c: Color, white: Rank) -> Rank {
    match c {
        Color::White => white,
        Color::Black => Rank::from_index(7 - white.index()),
    }
}

/// Rank with the king and the rooks before castling
pub const fn castling_rank(c: Color) -> Rank {
    relative(c, Rank::R1)
}

pub const fn double_move_src_rank(c: Color) -> Rank {
    relative(c, Rank::R2)
}

pub const fn double_move_dst_rank(c: Color) -> Rank {
    relative(c, Rank::R4)
}

/// Rank of a pawn that may capture en passant
pub const fn enpassant_src_rank(c: Color) -> Rank {
    relative(c, Rank::R5)
}

/// Rank where a pawn lands after capturing en passant
pub const fn enpassant_dst_rank(c: Color) -> Rank {
    relative(c, Rank::R6)
}

pub const fn promote_dst_rank(c: Color) -> Rank {
    relative(c, Rank::R8)
}

/// Rank index delta of a single pawn step
///
/// Rank indices grow from the 8th rank towards the 1st, so White pawns move towards smaller indices.
pub const fn pawn_forward_delta(c: Color) -> isize {
    match c {
        Color::White => -1,
        Color::Black => 1,
    }
}
