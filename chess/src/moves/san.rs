//! Standard algebraic notation: parsing, resolution against a position and formatting

use super::base::{MoveKind, PromotePiece};
use super::uci;
use crate::ambig::Disambig;
use crate::board::Board;
use crate::types::{CastlingSide, Cell, Color, Coord, CoordParseError, File, Piece, Rank};
use crate::{geometry, movegen};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error parsing SAN text, before looking at any position
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum RawParseError {
    #[error("empty move text")]
    EmptyString,
    #[error("move text is not ASCII")]
    NonAscii,
    #[error("bad destination square: {0}")]
    InvalidDst(#[from] CoordParseError),
    /// Something remains before the origin hints of a piece move
    #[error("extra characters in piece move")]
    NonPawnMoveTooLong,
    #[error("pawn move lacks destination")]
    PawnMoveTooShort,
    #[error("extra characters in pawn move")]
    PawnMoveTooLong,
    /// Pawn promotes to a pawn or a king
    #[error("cannot promote to {0:?}")]
    BadPromote(char),
    #[error("malformed move")]
    Syntax,
}

/// Error resolving parsed SAN in a position
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum IntoMoveError {
    /// No piece matching the move reaches the destination
    #[error("no piece can make this move")]
    NotFound,
    /// Move is marked with `x`, but nothing is captured
    #[error("capture sign on a quiet move")]
    CaptureExpected,
    /// Destination is occupied, but `x` is missing
    #[error("capture sign missing")]
    CaptureSignMissing,
    /// Promote piece on a move that doesn't reach the last rank
    #[error("promote before the last rank")]
    BadPromote,
}

/// Error turning SAN text into a concrete [`uci::Move`]
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ParseError {
    #[error("bad SAN: {0}")]
    Parse(#[from] RawParseError),
    #[error("unresolved SAN: {0}")]
    Convert(#[from] IntoMoveError),
}

/// How pieces are written when formatting SAN
///
/// Parsing always expects the ASCII letters.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Style {
    /// `N`, `B`, `R`, `Q` and `K`
    Algebraic,
    /// Figurines like `♘`, promotes are written without `=`
    Utf8,
}

impl Style {
    fn piece(self, piece: Piece) -> char {
        match self {
            Style::Algebraic => piece.as_char(),
            Style::Utf8 => Cell::from_parts(Color::White, piece).as_utf8_char(),
        }
    }

    fn write_promote(self, f: &mut fmt::Formatter<'_>, p: Option<PromotePiece>) -> fmt::Result {
        match (self, p) {
            (_, None) => Ok(()),
            (Style::Algebraic, Some(p)) => write!(f, "={}", self.piece(p.into())),
            (Style::Utf8, Some(p)) => write!(f, "{}", self.piece(p.into())),
        }
    }
}

/// Move in SAN, not yet bound to a position
///
/// Check and annotation marks (`+`, `#`, `!`, `?`) are skipped by the parser and never stored.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Move {
    Castling(CastlingSide),
    /// Pawn going straight, like `e4` or `e8=Q`
    PawnMove {
        dst: Coord,
        promote: Option<PromotePiece>,
    },
    /// Pawn capture from the file `src`, like `exd5`
    PawnCapture {
        src: File,
        dst: Coord,
        promote: Option<PromotePiece>,
    },
    /// Any non-pawn move except castling, with optional origin hints
    Simple {
        piece: Piece,
        file: Option<File>,
        rank: Option<Rank>,
        is_capture: bool,
        dst: Coord,
    },
}

/// [`Move`] formatted with a [`Style`], see [`Move::styled()`]
pub struct StyledMove<'a>(&'a Move, Style);

/// Picks the piece of the side to move that goes to `dst`
///
/// Only pieces on `file` and `rank` (when given) are considered. Of those which reach `dst` and
/// agree with `is_capture`, the first one in lexical square order wins.
fn find_src(
    b: &Board,
    piece: Piece,
    file: Option<File>,
    rank: Option<Rank>,
    dst: Coord,
    is_capture: bool,
) -> Result<Coord, IntoMoveError> {
    let reach: Vec<Coord> = b
        .squares_of(Cell::from_parts(b.side(), piece))
        .filter(|c| file.map_or(true, |f| c.file() == f) && rank.map_or(true, |r| c.rank() == r))
        .filter(|&c| movegen::valid_moves(b, c).contains(&dst))
        .collect();
    #[cfg(feature = "logging")]
    log::trace!("{:?} to {}: candidates {:?}", piece, dst, reach);
    if reach.is_empty() {
        return Err(IntoMoveError::NotFound);
    }

    let agrees = |&c: &Coord| match is_capture {
        true => movegen::is_capture(b, c, dst),
        false => b.get(dst).is_empty(),
    };
    match reach.into_iter().filter(agrees).min_by_key(Coord::lexical_key) {
        Some(src) => Ok(src),
        None if is_capture => Err(IntoMoveError::CaptureExpected),
        None => Err(IntoMoveError::CaptureSignMissing),
    }
}

impl Move {
    /// Returns a wrapper that implements [`fmt::Display`] using `style`
    #[inline]
    pub fn styled(&self, style: Style) -> StyledMove<'_> {
        StyledMove(self, style)
    }

    /// Builds SAN for the move `src`-`dst` of `piece`, with `b` being the position before it
    ///
    /// `kind` must be the kind of this move in `b`.
    pub fn from_move(b: &Board, kind: MoveKind, src: Coord, dst: Coord, piece: Piece) -> Move {
        if let MoveKind::Castling(side) = kind {
            return Move::Castling(side);
        }
        if !kind.is_pawn() {
            let Disambig { file, rank } = Disambig::new(b, src, dst);
            return Move::Simple {
                piece,
                file,
                rank,
                is_capture: b.get(dst).is_occupied(),
                dst,
            };
        }
        let promote = kind.promote();
        match src.file() == dst.file() {
            true => Move::PawnMove { dst, promote },
            false => Move::PawnCapture {
                src: src.file(),
                dst,
                promote,
            },
        }
    }

    /// Resolves the move in position `b`
    ///
    /// Castling turns into the two-file king shift on the home rank of the side to move, nothing
    /// else is checked for it.
    pub fn into_move(self, b: &Board) -> Result<uci::Move, IntoMoveError> {
        let side = b.side();
        let (file, rank, piece, is_capture, dst, promote) = match self {
            Move::Castling(castling) => {
                let home = geometry::castling_rank(side);
                return Ok(uci::Move::new(
                    Coord::from_parts(File::E, home),
                    Coord::from_parts(castling.king_dst_file(), home),
                ));
            }
            Move::PawnMove { dst, promote } => {
                (Some(dst.file()), None, Piece::Pawn, false, dst, promote)
            }
            Move::PawnCapture { src, dst, promote } => {
                (Some(src), None, Piece::Pawn, true, dst, promote)
            }
            Move::Simple {
                piece,
                file,
                rank,
                is_capture,
                dst,
            } => (file, rank, piece, is_capture, dst, None),
        };
        if promote.is_some() && dst.rank() != geometry::promote_dst_rank(side) {
            return Err(IntoMoveError::BadPromote);
        }
        let src = find_src(b, piece, file, rank, dst, is_capture)?;
        Ok(uci::Move { src, dst, promote })
    }

    /// Parses `s` and resolves it in position `b`
    #[inline]
    pub fn parse(s: &str, b: &Board) -> Result<uci::Move, ParseError> {
        Ok(Move::from_str(s)?.into_move(b)?)
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, style: Style) -> fmt::Result {
        match *self {
            Move::Castling(CastlingSide::King) => f.write_str("O-O"),
            Move::Castling(CastlingSide::Queen) => f.write_str("O-O-O"),
            Move::PawnMove { dst, promote } => {
                write!(f, "{}", dst)?;
                style.write_promote(f, promote)
            }
            Move::PawnCapture { src, dst, promote } => {
                write!(f, "{}x{}", src, dst)?;
                style.write_promote(f, promote)
            }
            Move::Simple {
                piece,
                file,
                rank,
                is_capture,
                dst,
            } => {
                write!(f, "{}", style.piece(piece))?;
                if let Some(file) = file {
                    write!(f, "{}", file)?;
                }
                if let Some(rank) = rank {
                    write!(f, "{}", rank)?;
                }
                if is_capture {
                    f.write_str("x")?;
                }
                write!(f, "{}", dst)
            }
        }
    }
}

impl fmt::Display for Move {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, Style::Algebraic)
    }
}

impl fmt::Display for StyledMove<'_> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.write(f, self.1)
    }
}

/// Consumes ASCII move text from its end
struct Tail<'a>(&'a str);

impl<'a> Tail<'a> {
    fn pop_if(&mut self, pred: impl Fn(char) -> bool) -> Option<char> {
        let last = self.0.chars().next_back().filter(|&c| pred(c))?;
        self.0 = &self.0[..self.0.len() - 1];
        Some(last)
    }

    fn pop_dst(&mut self) -> Option<Result<Coord, CoordParseError>> {
        let at = self.0.len().checked_sub(2)?;
        let (rest, dst) = self.0.split_at(at);
        self.0 = rest;
        Some(Coord::from_str(dst))
    }
}

fn parse_piece_move(piece: Piece, data: &str) -> Result<Move, RawParseError> {
    let mut tail = Tail(data);
    let dst = tail.pop_dst().ok_or(RawParseError::Syntax)??;
    let is_capture = tail.pop_if(|c| c == 'x').is_some();
    let rank = tail.pop_if(|c| matches!(c, '1'..='8')).and_then(Rank::from_char);
    let file = tail.pop_if(|c| matches!(c, 'a'..='h')).and_then(File::from_char);
    if !tail.0.is_empty() {
        return Err(RawParseError::NonPawnMoveTooLong);
    }
    Ok(Move::Simple {
        piece,
        file,
        rank,
        is_capture,
        dst,
    })
}

fn parse_pawn_move(data: &str) -> Result<Move, RawParseError> {
    let mut tail = Tail(data);
    let promote = match tail.pop_if(|c| Piece::from_char(c).is_some()) {
        Some(c) => {
            let piece = Piece::from_char(c).ok_or(RawParseError::Syntax)?;
            let promote = PromotePiece::try_from(piece)
                .map_err(|p| RawParseError::BadPromote(p.as_char()))?;
            tail.pop_if(|c| c == '=');
            Some(promote)
        }
        None => None,
    };
    let dst = tail.pop_dst().ok_or(RawParseError::PawnMoveTooShort)??;
    match tail.0.as_bytes() {
        [] => Ok(Move::PawnMove { dst, promote }),
        &[file, b'x'] => match File::from_char(file as char) {
            Some(src) => Ok(Move::PawnCapture { src, dst, promote }),
            None => Err(RawParseError::Syntax),
        },
        [_] | [_, _] => Err(RawParseError::Syntax),
        _ => Err(RawParseError::PawnMoveTooLong),
    }
}

impl FromStr for Move {
    type Err = RawParseError;

    fn from_str(s: &str) -> Result<Move, Self::Err> {
        if !s.is_ascii() {
            return Err(RawParseError::NonAscii);
        }
        let data = s.trim_end_matches(|c: char| matches!(c, '+' | '#' | '!' | '?'));
        match data {
            "" => Err(RawParseError::EmptyString),
            "O-O" | "0-0" => Ok(Move::Castling(CastlingSide::King)),
            "O-O-O" | "0-0-0" => Ok(Move::Castling(CastlingSide::Queen)),
            _ => match data.chars().next().and_then(Piece::from_char) {
                Some(Piece::Pawn) | None => parse_pawn_move(data),
                Some(piece) => parse_piece_move(piece, &data[1..]),
            },
        }
    }
}
