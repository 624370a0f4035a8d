use super::{san, uci};
use crate::board::Board;
use crate::geometry;
use crate::movegen;
use crate::types::{CastlingSide, Cell, Color, Coord, File, Piece};

use std::fmt;

use thiserror::Error;

/// Target piece for promotion
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PromotePiece {
    Knight,
    Bishop,
    Rook,
    Queen,
}

impl From<PromotePiece> for Piece {
    #[inline]
    fn from(p: PromotePiece) -> Self {
        match p {
            PromotePiece::Knight => Piece::Knight,
            PromotePiece::Bishop => Piece::Bishop,
            PromotePiece::Rook => Piece::Rook,
            PromotePiece::Queen => Piece::Queen,
        }
    }
}

impl TryFrom<Piece> for PromotePiece {
    type Error = Piece;

    /// Fails with the piece itself for pawns and kings
    #[inline]
    fn try_from(p: Piece) -> Result<Self, Self::Error> {
        match p {
            Piece::Knight => Ok(PromotePiece::Knight),
            Piece::Bishop => Ok(PromotePiece::Bishop),
            Piece::Rook => Ok(PromotePiece::Rook),
            Piece::Queen => Ok(PromotePiece::Queen),
            Piece::Pawn | Piece::King => Err(p),
        }
    }
}

/// Move kind
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Non-pawn move or capture, except castling
    Simple,
    /// King shift by two files together with the rook jump
    Castling(CastlingSide),
    /// Single pawn step, either non-capture or capture
    PawnSimple,
    PawnDouble,
    Enpassant,
    /// Pawn reaching the last rank, either non-capture or capture
    Promote(PromotePiece),
}

impl MoveKind {
    #[inline]
    pub fn promote(self) -> Option<PromotePiece> {
        match self {
            MoveKind::Promote(p) => Some(p),
            _ => None,
        }
    }

    /// Returns `true` if the move is made by a pawn
    #[inline]
    pub fn is_pawn(self) -> bool {
        matches!(
            self,
            MoveKind::PawnSimple | MoveKind::PawnDouble | MoveKind::Enpassant | MoveKind::Promote(_)
        )
    }
}

/// Error applying a move
///
/// The board is never modified if the error is returned.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ApplyError {
    #[error("no piece on {0}")]
    NoPiece(Coord),
    /// Source square holds a piece of the side which is not to move
    #[error("piece on {0} cannot move now")]
    WrongSide(Coord),
    /// Destination is not among the valid moves of the piece
    #[error("{dst} is not reachable from {src}")]
    Unreachable { src: Coord, dst: Coord },
    /// King moves two files, but the castling is not possible
    #[error("castling is not allowed")]
    CastlingNotAllowed,
    /// Promote piece is given for a move which is not a promote
    #[error("unexpected promote")]
    UnexpectedPromote,
}

/// Applied chess move
///
/// Describes the move after it was made: the squares, the piece moved, the captured piece and
/// the move in SAN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    kind: MoveKind,
    src: Coord,
    dst: Coord,
    cell: Cell,
    captured: Cell,
    san: san::Move,
    san_str: String,
}

impl Move {
    #[inline]
    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    #[inline]
    pub fn src(&self) -> Coord {
        self.src
    }

    #[inline]
    pub fn dst(&self) -> Coord {
        self.dst
    }

    /// Returns the piece that was moved
    ///
    /// For promotes, this is the pawn, not the promoted piece.
    #[inline]
    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// Returns the captured piece, if any
    ///
    /// For enpassant, this is the pawn removed from the board. For castling, this is the piece
    /// overwritten by the king, or by the rook if the king landed on an empty square.
    #[inline]
    pub fn captured(&self) -> Option<Cell> {
        Some(self.captured).filter(Cell::is_occupied)
    }

    /// Returns the side which made this move
    #[inline]
    pub fn side(&self) -> Option<Color> {
        self.cell.color()
    }

    /// Returns the move in SAN
    #[inline]
    pub fn san(&self) -> &str {
        &self.san_str
    }

    #[inline]
    pub fn san_move(&self) -> san::Move {
        self.san
    }

    /// Returns the source and destination squares with the promote piece
    #[inline]
    pub fn uci(&self) -> uci::Move {
        uci::Move {
            src: self.src,
            dst: self.dst,
            promote: self.kind.promote(),
        }
    }

    /// Returns the wrapper which helps to format the move in SAN with the given style `style`
    ///
    /// # Example
    ///
    /// ```
    /// # use openline::{GameState, moves::san::Style};
    /// #
    /// let mut game = GameState::new();
    /// let mv = game.try_apply("g1".parse().unwrap(), "f3".parse().unwrap(), None).unwrap();
    /// assert_eq!(mv.styled(Style::Algebraic).to_string(), "Nf3");
    /// assert_eq!(mv.styled(Style::Utf8).to_string(), "♘f3");
    /// ```
    #[inline]
    pub fn styled(&self, style: san::Style) -> san::StyledMove<'_> {
        self.san.styled(style)
    }
}

impl fmt::Display for Move {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.san_str)
    }
}

/// Returns the castling side if the move is a two-file king shift along the rank
fn castling_side(b: &Board, src: Coord, dst: Coord) -> Option<CastlingSide> {
    if b.get(src).piece() != Some(Piece::King) || src.rank() != dst.rank() {
        return None;
    }
    match dst.file().index() as isize - src.file().index() as isize {
        2 => Some(CastlingSide::King),
        -2 => Some(CastlingSide::Queen),
        _ => None,
    }
}

// Squares between the king and the rook are not inspected
fn can_castle(b: &Board, side: CastlingSide, src: Coord) -> bool {
    let color = b.side();
    let home = geometry::castling_rank(color);
    src == Coord::from_parts(File::E, home)
        && b.castling().has(color, side)
        && b.get2(side.rook_src_file(), home) == Cell::from_parts(color, Piece::Rook)
}

/// Determines the kind of the move from `src` to `dst` in position `b`
///
/// This validates the move: source must hold a piece of the side to move, and the destination
/// must be reachable. Two-file king moves are treated as castling. `promote` is used only for
/// pawns reaching the last rank, queen is assumed when it is not given.
pub fn classify(
    b: &Board,
    src: Coord,
    dst: Coord,
    promote: Option<PromotePiece>,
) -> Result<MoveKind, ApplyError> {
    let (color, piece) = b.get(src).parts().ok_or(ApplyError::NoPiece(src))?;
    if color != b.side() {
        return Err(ApplyError::WrongSide(src));
    }

    let kind = if let Some(side) = castling_side(b, src, dst) {
        if !can_castle(b, side, src) {
            return Err(ApplyError::CastlingNotAllowed);
        }
        MoveKind::Castling(side)
    } else if !movegen::is_valid(b, src, dst) {
        return Err(ApplyError::Unreachable { src, dst });
    } else if piece != Piece::Pawn {
        MoveKind::Simple
    } else if dst.rank() == geometry::promote_dst_rank(color) {
        return Ok(MoveKind::Promote(promote.unwrap_or(PromotePiece::Queen)));
    } else if dst.rank() == geometry::double_move_dst_rank(color)
        && src.rank() == geometry::double_move_src_rank(color)
    {
        MoveKind::PawnDouble
    } else if movegen::enpassant_victim(b, src, dst).is_some() {
        MoveKind::Enpassant
    } else {
        MoveKind::PawnSimple
    };

    match promote {
        Some(_) => Err(ApplyError::UnexpectedPromote),
        None => Ok(kind),
    }
}

/// Drops castling rights once the king moves or a corner square is touched
fn update_castling(b: &mut Board, src: Coord, dst: Coord, cell: Cell) {
    if let Some((color, Piece::King)) = cell.parts() {
        b.castling_mut().unset_color(color);
    }
    for color in [Color::White, Color::Black] {
        let home = geometry::castling_rank(color);
        for side in CastlingSide::BOTH {
            let corner = Coord::from_parts(side.rook_src_file(), home);
            if src == corner || dst == corner {
                b.castling_mut().unset(color, side);
            }
        }
    }
}

/// Applies the move from `src` to `dst` to the board `b`
///
/// A two-file king move from the e-file is castling. It requires the castling right and the rook
/// on its corner, so it may be rejected even if the king simply shifts by two files. The pieces
/// standing on the king and rook destinations are overwritten.
///
/// The SAN of the move is computed before the board is modified. On error, the board remains
/// unchanged.
pub fn make_move(
    b: &mut Board,
    src: Coord,
    dst: Coord,
    promote: Option<PromotePiece>,
) -> Result<Move, ApplyError> {
    let kind = classify(b, src, dst, promote)?;
    let cell = b.get(src);
    let (color, piece) = cell.parts().ok_or(ApplyError::NoPiece(src))?;
    let san = san::Move::from_move(b, kind, src, dst, piece);

    let mut captured = b.get(dst);
    let mut landed = cell;
    match kind {
        MoveKind::Castling(side) => {
            let home = geometry::castling_rank(color);
            let rook_src = Coord::from_parts(side.rook_src_file(), home);
            let rook_dst = Coord::from_parts(side.rook_dst_file(), home);
            if captured.is_empty() {
                captured = b.get(rook_dst);
            }
            b.put(rook_src, Cell::EMPTY);
            b.put(rook_dst, Cell::from_parts(color, Piece::Rook));
        }
        MoveKind::Enpassant => {
            if let Some(victim) = movegen::enpassant_victim(b, src, dst) {
                captured = b.get(victim);
                b.put(victim, Cell::EMPTY);
            }
        }
        MoveKind::Promote(p) => landed = Cell::from_parts(color, p.into()),
        MoveKind::Simple | MoveKind::PawnSimple | MoveKind::PawnDouble => {}
    }
    b.put(src, Cell::EMPTY);
    b.put(dst, landed);

    update_castling(b, src, dst, cell);
    b.set_ep_source(match kind {
        MoveKind::PawnDouble => Some(dst),
        _ => None,
    });
    b.finish_move(kind.is_pawn() || captured.is_occupied());

    let san_str = san.to_string();
    Ok(Move {
        kind,
        src,
        dst,
        cell,
        captured,
        san,
        san_str,
    })
}
