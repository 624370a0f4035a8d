//! Board and related things

use crate::geometry;
use crate::types::{
    CastlingRights, CastlingRightsParseError, CastlingSide, Cell, Color, Coord, CoordParseError,
    File, Piece, Rank,
};

use std::fmt::{self, Display};
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

/// Error parsing the piece placement, i.e. the first field of FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PlacementError {
    /// Placement must describe exactly eight ranks
    #[error("expected 8 ranks, found {0}")]
    RankCount(usize),
    /// Rank doesn't cover exactly eight squares
    #[error("rank {rank} covers {width} squares instead of 8")]
    RankWidth { rank: Rank, width: usize },
    /// Neither a piece letter nor a digit from 1 to 8
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Error parsing [`Board`] from FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum FenParseError {
    #[error("non-ASCII data in FEN")]
    NonAscii,
    /// One of the four mandatory fields is absent
    #[error("missing {0} field")]
    MissingField(&'static str),
    #[error("bad piece placement: {0}")]
    Placement(#[from] PlacementError),
    #[error("bad side to move {0:?}")]
    BadSide(String),
    #[error("bad castling rights: {0}")]
    Castling(#[from] CastlingRightsParseError),
    #[error("bad enpassant square: {0}")]
    Enpassant(#[from] CoordParseError),
    /// Enpassant square is not on the rank right behind a pawn that made a double move
    #[error("enpassant square on rank {0}")]
    EnpassantRank(Rank),
    /// One of the move counters is not a number
    #[error("bad {0}: {1}")]
    Counter(&'static str, #[source] ParseIntError),
    #[error("extra data after FEN")]
    ExtraData,
}

/// Chess board
///
/// Contains the position (one [`Cell`] per square), the side to move and the auxiliary state
/// needed to apply moves: castling rights, en passant source square and move counters.
///
/// The position is not required to be legal. It can lack kings, for example, as no operation in
/// this crate looks for the king.
///
/// # Example
///
/// ```
/// # use openline::{Board, File, Rank, Color, Piece, Cell};
/// #
/// let mut b = Board::empty();
/// b.put2(File::B, Rank::R1, Cell::from_parts(Color::White, Piece::Knight));
/// b.put2(File::E, Rank::R2, Cell::from_parts(Color::White, Piece::Knight));
/// assert_eq!(b.as_fen(), "8/8/8/8/8/8/4N3/1N6 w - - 0 1");
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Board {
    cells: [Cell; 64],
    side: Color,
    castling: CastlingRights,
    ep_source: Option<Coord>,
    move_counter: u16,
    move_number: u16,
}

const BACK_RANK: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

impl Board {
    /// Returns an empty board with White to move
    #[inline]
    pub const fn empty() -> Board {
        Board {
            cells: [Cell::EMPTY; 64],
            side: Color::White,
            castling: CastlingRights::EMPTY,
            ep_source: None,
            move_counter: 0,
            move_number: 1,
        }
    }

    /// Returns a board with the initial position
    pub fn initial() -> Board {
        let mut res = Board {
            castling: CastlingRights::FULL,
            ..Board::empty()
        };
        for color in [Color::White, Color::Black] {
            let home = geometry::castling_rank(color);
            let pawns = geometry::double_move_src_rank(color);
            for (file, piece) in File::iter().zip(BACK_RANK) {
                res.put2(file, home, Cell::from_parts(color, piece));
                res.put2(file, pawns, Cell::from_parts(color, Piece::Pawn));
            }
        }
        res
    }

    /// Parses a board from FEN
    ///
    /// The last two fields (half-move counter and move number) may be omitted. Castling flags
    /// that don't match the position and a stale enpassant square are silently dropped.
    #[inline]
    pub fn from_fen(fen: &str) -> Result<Board, FenParseError> {
        Board::from_str(fen)
    }

    #[inline]
    pub fn get(&self, c: Coord) -> Cell {
        self.cells[c.index()]
    }

    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Cell {
        self.get(Coord::from_parts(file, rank))
    }

    #[inline]
    pub fn put(&mut self, c: Coord, cell: Cell) {
        self.cells[c.index()] = cell;
    }

    #[inline]
    pub fn put2(&mut self, file: File, rank: Rank, cell: Cell) {
        self.put(Coord::from_parts(file, rank), cell);
    }

    /// Returns side to move
    #[inline]
    pub fn side(&self) -> Color {
        self.side
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// Returns the square with the pawn which can be captured by enpassant, if any
    #[inline]
    pub fn ep_source(&self) -> Option<Coord> {
        self.ep_source
    }

    /// Returns number of half-moves without pawn moves or captures
    #[inline]
    pub fn move_counter(&self) -> u16 {
        self.move_counter
    }

    /// Returns move number
    ///
    /// It starts from 1 and is incremented after each move by Black.
    #[inline]
    pub fn move_number(&self) -> u16 {
        self.move_number
    }

    /// Returns the square where a pawn lands when capturing enpassant, if such capture is
    /// possible now
    #[inline]
    pub fn ep_dest(&self) -> Option<Coord> {
        let p = self.ep_source?;
        Some(Coord::from_parts(
            p.file(),
            geometry::enpassant_dst_rank(self.side),
        ))
    }

    /// Iterates over the squares holding `cell`, from `a8` to `h1`
    pub fn squares_of(&self, cell: Cell) -> impl Iterator<Item = Coord> + '_ {
        Coord::iter().filter(move |&c| self.get(c) == cell)
    }

    /// Wraps the board to allow pretty-printing with the given style `Style`
    ///
    /// # Example
    ///
    /// ```
    /// # use openline::{Board, board::PrettyStyle};
    /// #
    /// let b = Board::initial();
    ///
    /// let res = r#"
    /// 8|rnbqkbnr
    /// 7|pppppppp
    /// 6|........
    /// 5|........
    /// 4|........
    /// 3|........
    /// 2|PPPPPPPP
    /// 1|RNBQKBNR
    /// -+--------
    /// W|abcdefgh
    /// "#;
    /// assert_eq!(b.pretty(PrettyStyle::Ascii).to_string().trim(), res.trim());
    /// ```
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        Pretty { board: self, style }
    }

    /// Converts the board into a FEN string
    #[inline]
    pub fn as_fen(&self) -> String {
        self.to_string()
    }

    pub(crate) fn castling_mut(&mut self) -> &mut CastlingRights {
        &mut self.castling
    }

    pub(crate) fn set_ep_source(&mut self, ep_source: Option<Coord>) {
        self.ep_source = ep_source;
    }

    /// Passes the turn to the other side and updates the counters
    ///
    /// `irreversible` resets the half-move counter, it is set for pawn moves and captures.
    pub(crate) fn finish_move(&mut self, irreversible: bool) {
        self.move_counter = match irreversible {
            true => 0,
            false => self.move_counter.saturating_add(1),
        };
        if self.side == Color::Black {
            self.move_number = self.move_number.saturating_add(1);
        }
        self.side = self.side.inv();
    }

    fn drop_stale_enpassant(&mut self) {
        let p = match self.ep_source {
            Some(p) => p,
            None => return,
        };
        let pawn = Cell::from_parts(self.side.inv(), Piece::Pawn);
        let passed = p.try_shift(0, geometry::pawn_forward_delta(self.side));
        if self.get(p) != pawn || passed.map_or(true, |c| self.get(c).is_occupied()) {
            self.ep_source = None;
        }
    }

    fn drop_stale_castling(&mut self) {
        for color in [Color::White, Color::Black] {
            let home = geometry::castling_rank(color);
            let king_home = self.get2(File::E, home) == Cell::from_parts(color, Piece::King);
            for side in CastlingSide::BOTH {
                let rook = self.get2(side.rook_src_file(), home);
                if !king_home || rook != Cell::from_parts(color, Piece::Rook) {
                    self.castling.unset(color, side);
                }
            }
        }
    }
}

impl Default for Board {
    #[inline]
    fn default() -> Board {
        Board::empty()
    }
}

fn parse_placement(s: &str) -> Result<[Cell; 64], PlacementError> {
    let mut cells = [Cell::EMPTY; 64];
    let mut rows = s.split('/');
    for rank in Rank::iter() {
        let row = rows
            .next()
            .ok_or(PlacementError::RankCount(rank.index()))?;
        let mut width = 0_usize;
        for ch in row.chars() {
            if let Some(gap @ 1..=8) = ch.to_digit(10) {
                width += gap as usize;
                continue;
            }
            let cell = Cell::from_char(ch).ok_or(PlacementError::UnexpectedChar(ch))?;
            if width < 8 {
                cells[Coord::from_parts(File::from_index(width), rank).index()] = cell;
            }
            width += 1;
        }
        if width != 8 {
            return Err(PlacementError::RankWidth { rank, width });
        }
    }
    let extra = rows.count();
    if extra != 0 {
        return Err(PlacementError::RankCount(8 + extra));
    }
    Ok(cells)
}

fn parse_side(s: &str) -> Result<Color, FenParseError> {
    let mut chars = s.chars();
    match (chars.next().and_then(Color::from_char), chars.next()) {
        (Some(color), None) => Ok(color),
        _ => Err(FenParseError::BadSide(s.to_string())),
    }
}

/// Converts the enpassant square from FEN into the square of the pawn that can be captured
fn parse_ep_source(s: &str, side: Color) -> Result<Option<Coord>, FenParseError> {
    if s == "-" {
        return Ok(None);
    }
    let dest = Coord::from_str(s)?;
    if dest.rank() != geometry::enpassant_dst_rank(side) {
        return Err(FenParseError::EnpassantRank(dest.rank()));
    }
    Ok(Some(Coord::from_parts(
        dest.file(),
        geometry::enpassant_src_rank(side),
    )))
}

fn parse_counter(s: Option<&str>, name: &'static str, default: u16) -> Result<u16, FenParseError> {
    match s {
        Some(s) => u16::from_str(s).map_err(|e| FenParseError::Counter(name, e)),
        None => Ok(default),
    }
}

impl FromStr for Board {
    type Err = FenParseError;

    fn from_str(s: &str) -> Result<Board, Self::Err> {
        if !s.is_ascii() {
            return Err(FenParseError::NonAscii);
        }
        let mut fields = s.split_ascii_whitespace();
        let mut field = |name| fields.next().ok_or(FenParseError::MissingField(name));

        let cells = parse_placement(field("placement")?)?;
        let side = parse_side(field("side")?)?;
        let castling = CastlingRights::from_str(field("castling")?)?;
        let ep_source = parse_ep_source(field("enpassant")?, side)?;
        let move_counter = parse_counter(fields.next(), "move counter", 0)?;
        let move_number = parse_counter(fields.next(), "move number", 1)?;
        if fields.next().is_some() {
            return Err(FenParseError::ExtraData);
        }

        let mut res = Board {
            cells,
            side,
            castling,
            ep_source,
            move_counter,
            move_number,
        };
        res.drop_stale_enpassant();
        res.drop_stale_castling();
        Ok(res)
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter() {
            if rank != Rank::R8 {
                f.write_str("/")?;
            }
            let mut gap = 0;
            for file in File::iter() {
                let cell = self.get2(file, rank);
                if cell.is_empty() {
                    gap += 1;
                    continue;
                }
                if gap != 0 {
                    write!(f, "{}", gap)?;
                    gap = 0;
                }
                write!(f, "{}", cell)?;
            }
            if gap != 0 {
                write!(f, "{}", gap)?;
            }
        }
        write!(f, " {} {} ", self.side.as_char(), self.castling)?;
        match self.ep_dest() {
            Some(p) => write!(f, "{}", p)?,
            None => f.write_str("-")?,
        }
        write!(f, " {} {}", self.move_counter, self.move_number)
    }
}

/// Style for [`Board::pretty()`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrettyStyle {
    /// Print pieces and frames as ASCII characters
    Ascii,
    /// Print pieces and frames as Unicode characters
    Utf8,
}

/// Wrapper to pretty-print the board
///
/// See docs for [`Board::pretty()`] for more details.
pub struct Pretty<'a> {
    board: &'a Board,
    style: PrettyStyle,
}

struct Frame {
    horz: char,
    vert: char,
    corner: char,
    white: char,
    black: char,
    cell: fn(&Cell) -> char,
}

const ASCII_FRAME: Frame = Frame {
    horz: '-',
    vert: '|',
    corner: '+',
    white: 'W',
    black: 'B',
    cell: Cell::as_char,
};

const UTF8_FRAME: Frame = Frame {
    horz: '─',
    vert: '│',
    corner: '┼',
    white: '○',
    black: '●',
    cell: Cell::as_utf8_char,
};

impl<'a> Display for Pretty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = match self.style {
            PrettyStyle::Ascii => &ASCII_FRAME,
            PrettyStyle::Utf8 => &UTF8_FRAME,
        };
        for rank in Rank::iter() {
            write!(f, "{}{}", rank, frame.vert)?;
            for file in File::iter() {
                write!(f, "{}", (frame.cell)(&self.board.get2(file, rank)))?;
            }
            writeln!(f)?;
        }
        let rule: String = File::iter().map(|_| frame.horz).collect();
        writeln!(f, "{}{}{}", frame.horz, frame.corner, rule)?;
        let side = match self.board.side {
            Color::White => frame.white,
            Color::Black => frame.black,
        };
        let files: String = File::iter().map(|file| file.as_char()).collect();
        writeln!(f, "{}{}{}", side, frame.vert, files)
    }
}
