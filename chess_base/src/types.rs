use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error parsing a square name like `e4`
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CoordParseError {
    #[error("{0:?} is not a file")]
    UnexpectedFileChar(char),
    #[error("{0:?} is not a rank")]
    UnexpectedRankChar(char),
    #[error("square name must have two chars")]
    BadLength,
}

/// Error parsing castling rights in FEN notation (like `KQkq` or `-`)
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CastlingRightsParseError {
    #[error("{0:?} is not a castling flag")]
    UnexpectedChar(char),
    #[error("castling flag {0:?} repeats")]
    DuplicateChar(char),
    #[error("castling rights are empty")]
    EmptyString,
}

/// Board file, from `a` to `h`
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl File {
    const ALL: [File; 8] = [
        File::A,
        File::B,
        File::C,
        File::D,
        File::E,
        File::F,
        File::G,
        File::H,
    ];

    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Panics if `val` is not below 8
    pub const fn from_index(val: usize) -> File {
        Self::ALL[val]
    }

    pub fn iter() -> impl Iterator<Item = File> {
        Self::ALL.into_iter()
    }

    pub fn from_char(c: char) -> Option<File> {
        Self::iter().find(|f| f.as_char() == c)
    }

    pub const fn as_char(&self) -> char {
        (b'a' + *self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Board rank
///
/// Ranks are indexed from the 8th one, i.e. `Rank::R8` has index 0 and `Rank::R1` has index 7.
/// This is the order in which FEN lists them.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum Rank {
    R8,
    R7,
    R6,
    R5,
    R4,
    R3,
    R2,
    R1,
}

impl Rank {
    const ALL: [Rank; 8] = [
        Rank::R8,
        Rank::R7,
        Rank::R6,
        Rank::R5,
        Rank::R4,
        Rank::R3,
        Rank::R2,
        Rank::R1,
    ];

    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Panics if `val` is not below 8
    pub const fn from_index(val: usize) -> Rank {
        Self::ALL[val]
    }

    /// Iterates from the 8th rank down to the 1st one
    pub fn iter() -> impl Iterator<Item = Rank> {
        Self::ALL.into_iter()
    }

    pub fn from_char(c: char) -> Option<Rank> {
        Self::iter().find(|r| r.as_char() == c)
    }

    pub const fn as_char(&self) -> char {
        (b'8' - *self as u8) as char
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Board square
///
/// Squares are numbered rank by rank starting from `a8`, so `a8` is 0, `h8` is 7 and `h1` is 63.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Coord(u8);

impl Coord {
    /// Panics if `val` is not below 64
    pub const fn from_index(val: usize) -> Coord {
        assert!(val < 64, "square index out of range");
        Coord(val as u8)
    }

    pub const fn from_parts(file: File, rank: Rank) -> Coord {
        Coord((rank.index() * 8 + file.index()) as u8)
    }

    pub const fn file(&self) -> File {
        File::from_index(self.index() % 8)
    }

    pub const fn rank(&self) -> Rank {
        Rank::from_index(self.index() / 8)
    }

    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns the square shifted by `delta_file` files and `delta_rank` rank indices, or `None`
    /// if it falls off the board
    pub fn try_shift(self, delta_file: isize, delta_rank: isize) -> Option<Coord> {
        let file = self.file().index() as isize + delta_file;
        let rank = self.rank().index() as isize + delta_rank;
        if !(0..8).contains(&file) || !(0..8).contains(&rank) {
            return None;
        }
        Some(Coord::from_parts(
            File::from_index(file as usize),
            Rank::from_index(rank as usize),
        ))
    }

    /// Key ordering squares by their names (`a1 < a2 < ... < h8`)
    pub const fn lexical_key(&self) -> (usize, usize) {
        (self.file().index(), 7 - self.rank().index())
    }

    pub fn iter() -> impl Iterator<Item = Coord> {
        (0..64).map(Coord)
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({})", self)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl FromStr for Coord {
    type Err = CoordParseError;

    fn from_str(s: &str) -> Result<Coord, CoordParseError> {
        let mut chars = s.chars();
        let file = chars.next().ok_or(CoordParseError::BadLength)?;
        let rank = chars.next().ok_or(CoordParseError::BadLength)?;
        if chars.next().is_some() {
            return Err(CoordParseError::BadLength);
        }
        let file = File::from_char(file).ok_or(CoordParseError::UnexpectedFileChar(file))?;
        let rank = Rank::from_char(rank).ok_or(CoordParseError::UnexpectedRankChar(rank))?;
        Ok(Coord::from_parts(file, rank))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Returns the opponent's color
    pub const fn inv(&self) -> Color {
        match *self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Returns the side-to-move letter used in FEN
    pub const fn as_char(&self) -> char {
        match *self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    pub fn from_char(c: char) -> Option<Color> {
        [Color::White, Color::Black]
            .into_iter()
            .find(|color| color.as_char() == c)
    }
}

/// Piece type, without color
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Piece {
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    /// Returns the uppercase letter used for this piece in algebraic notation
    pub const fn as_char(&self) -> char {
        match *self {
            Piece::Pawn => 'P',
            Piece::Knight => 'N',
            Piece::Bishop => 'B',
            Piece::Rook => 'R',
            Piece::Queen => 'Q',
            Piece::King => 'K',
        }
    }

    /// Parses the uppercase piece letter
    pub fn from_char(c: char) -> Option<Piece> {
        Self::ALL.into_iter().find(|p| p.as_char() == c)
    }
}

/// Contents of a square: either empty or a piece of some color
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cell(Option<(Color, Piece)>);

impl Cell {
    pub const EMPTY: Cell = Cell(None);

    pub const fn from_parts(c: Color, p: Piece) -> Cell {
        Cell(Some((c, p)))
    }

    pub const fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub const fn is_occupied(&self) -> bool {
        self.0.is_some()
    }

    pub const fn color(&self) -> Option<Color> {
        match self.0 {
            Some((c, _)) => Some(c),
            None => None,
        }
    }

    pub const fn piece(&self) -> Option<Piece> {
        match self.0 {
            Some((_, p)) => Some(p),
            None => None,
        }
    }

    /// Returns the color and the piece, or `None` if the cell is empty
    pub const fn parts(&self) -> Option<(Color, Piece)> {
        self.0
    }

    /// Returns the FEN letter of the piece (uppercase for White), or `.` for an empty square
    pub fn as_char(&self) -> char {
        match self.0 {
            Some((Color::White, p)) => p.as_char(),
            Some((Color::Black, p)) => p.as_char().to_ascii_lowercase(),
            None => '.',
        }
    }

    pub fn as_utf8_char(&self) -> char {
        match self.0 {
            Some((Color::White, p)) => ['♙', '♘', '♗', '♖', '♕', '♔'][p as usize],
            Some((Color::Black, p)) => ['♟', '♞', '♝', '♜', '♛', '♚'][p as usize],
            None => '.',
        }
    }

    /// Parses the FEN letter of a piece
    ///
    /// Returns `None` for anything else, including `.`.
    pub fn from_char(c: char) -> Option<Cell> {
        let color = match c.is_ascii_uppercase() {
            true => Color::White,
            false => Color::Black,
        };
        let piece = Piece::from_char(c.to_ascii_uppercase())?;
        Some(Cell::from_parts(color, piece))
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell({})", self.as_char())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    Queen,
    King,
}

impl CastlingSide {
    pub const BOTH: [CastlingSide; 2] = [CastlingSide::King, CastlingSide::Queen];

    /// File of the corner rook for this side
    pub const fn rook_src_file(&self) -> File {
        match *self {
            CastlingSide::Queen => File::A,
            CastlingSide::King => File::H,
        }
    }

    /// File where the rook lands after castling
    pub const fn rook_dst_file(&self) -> File {
        match *self {
            CastlingSide::Queen => File::D,
            CastlingSide::King => File::F,
        }
    }

    /// File where the king lands after castling
    pub const fn king_dst_file(&self) -> File {
        match *self {
            CastlingSide::Queen => File::C,
            CastlingSide::King => File::G,
        }
    }
}

// FEN flags in the order they are written
const CASTLING_FLAGS: [(char, Color, CastlingSide); 4] = [
    ('K', Color::White, CastlingSide::King),
    ('Q', Color::White, CastlingSide::Queen),
    ('k', Color::Black, CastlingSide::King),
    ('q', Color::Black, CastlingSide::Queen),
];

/// Castling rights of both sides
///
/// A right only says that neither the king nor the corresponding rook has left its home square.
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CastlingRights([[bool; 2]; 2]);

impl CastlingRights {
    pub const EMPTY: CastlingRights = CastlingRights([[false; 2]; 2]);
    pub const FULL: CastlingRights = CastlingRights([[true; 2]; 2]);

    pub const fn has(&self, c: Color, s: CastlingSide) -> bool {
        self.0[c as usize][s as usize]
    }

    pub fn with(mut self, c: Color, s: CastlingSide) -> CastlingRights {
        self.set(c, s);
        self
    }

    pub fn set(&mut self, c: Color, s: CastlingSide) {
        self.0[c as usize][s as usize] = true;
    }

    pub fn unset(&mut self, c: Color, s: CastlingSide) {
        self.0[c as usize][s as usize] = false;
    }

    pub fn unset_color(&mut self, c: Color) {
        self.0[c as usize] = [false; 2];
    }
}

impl fmt::Debug for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastlingRights({})", self)
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::EMPTY {
            return f.write_str("-");
        }
        for (ch, color, side) in CASTLING_FLAGS {
            if self.has(color, side) {
                write!(f, "{}", ch)?;
            }
        }
        Ok(())
    }
}

impl FromStr for CastlingRights {
    type Err = CastlingRightsParseError;

    fn from_str(s: &str) -> Result<CastlingRights, Self::Err> {
        match s {
            "-" => return Ok(CastlingRights::EMPTY),
            "" => return Err(CastlingRightsParseError::EmptyString),
            _ => {}
        }
        let mut res = CastlingRights::EMPTY;
        for ch in s.chars() {
            let (_, color, side) = CASTLING_FLAGS
                .into_iter()
                .find(|&(flag, _, _)| flag == ch)
                .ok_or(CastlingRightsParseError::UnexpectedChar(ch))?;
            if res.has(color, side) {
                return Err(CastlingRightsParseError::DuplicateChar(ch));
            }
            res.set(color, side);
        }
        Ok(res)
    }
}
