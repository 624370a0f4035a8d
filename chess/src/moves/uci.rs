//! Coordinate notation, like `g1f3` or `b7b8q`

use super::base::PromotePiece;
use crate::types::{Coord, CoordParseError, Piece};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ParseError {
    #[error("expected 4 or 5 ASCII characters")]
    BadLength,
    #[error("bad source square: {0}")]
    BadSrc(CoordParseError),
    #[error("bad destination square: {0}")]
    BadDst(CoordParseError),
    /// Suffix is not one of `n`, `b`, `r` and `q`
    #[error("bad promote suffix {0:?}")]
    BadPromote(char),
}

/// Pair of squares with an optional promote piece
///
/// It is independent of the position. Resolving SAN yields this form as well.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Move {
    pub src: Coord,
    pub dst: Coord,
    pub promote: Option<PromotePiece>,
}

impl Move {
    #[inline]
    pub fn new(src: Coord, dst: Coord) -> Move {
        Move {
            src,
            dst,
            promote: None,
        }
    }
}

fn promote_suffix(c: char) -> Option<PromotePiece> {
    if !c.is_ascii_lowercase() {
        return None;
    }
    Piece::from_char(c.to_ascii_uppercase()).and_then(|p| PromotePiece::try_from(p).ok())
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.src, self.dst)?;
        if let Some(p) = self.promote {
            write!(f, "{}", Piece::from(p).as_char().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Move, Self::Err> {
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(ParseError::BadLength);
        }
        let (squares, suffix) = s.split_at(4);
        let src = squares[..2].parse().map_err(ParseError::BadSrc)?;
        let dst = squares[2..].parse().map_err(ParseError::BadDst)?;
        let promote = match suffix.chars().next() {
            Some(c) => Some(promote_suffix(c).ok_or(ParseError::BadPromote(c))?),
            None => None,
        };
        Ok(Move { src, dst, promote })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Rank};

    #[test]
    fn test_squares() {
        let g1 = Coord::from_parts(File::G, Rank::R1);
        let f3 = Coord::from_parts(File::F, Rank::R3);
        let mv = Move::from_str("g1f3").unwrap();
        assert_eq!(mv, Move::new(g1, f3));
        assert_eq!(mv.to_string(), "g1f3");
    }

    #[test]
    fn test_promote_suffix() {
        for (s, p) in [
            ("b7b8q", PromotePiece::Queen),
            ("b7a8r", PromotePiece::Rook),
            ("g2g1b", PromotePiece::Bishop),
            ("g2h1n", PromotePiece::Knight),
        ] {
            let mv = Move::from_str(s).unwrap();
            assert_eq!(mv.promote, Some(p));
            assert_eq!(mv.to_string(), s);
        }
    }

    #[test]
    fn test_bad() {
        assert_eq!(Move::from_str("g1f"), Err(ParseError::BadLength));
        assert_eq!(Move::from_str("b7b8qq"), Err(ParseError::BadLength));
        assert_eq!(Move::from_str("g1f3ü"), Err(ParseError::BadLength));
        assert_eq!(
            Move::from_str("z1f3"),
            Err(ParseError::BadSrc(CoordParseError::UnexpectedFileChar('z')))
        );
        assert_eq!(
            Move::from_str("g1f0"),
            Err(ParseError::BadDst(CoordParseError::UnexpectedRankChar('0')))
        );
        assert_eq!(Move::from_str("b7b8k"), Err(ParseError::BadPromote('k')));
        assert_eq!(Move::from_str("b7b8p"), Err(ParseError::BadPromote('p')));
        assert_eq!(Move::from_str("b7b8Q"), Err(ParseError::BadPromote('Q')));
    }
}
