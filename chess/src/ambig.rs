//! Detection of pieces that make a SAN move ambiguous

use crate::board::Board;
use crate::movegen;
use crate::types::{Cell, Coord, File, Rank};

/// Finds all the pieces equal to `cell` other than the one on `src` that can also go to `dst`
///
/// An empty result means that the piece on `src` is the only one of its kind able to reach `dst`.
pub fn find_ambiguous(
    b: &Board,
    src: Coord,
    dst: Coord,
    cell: Cell,
) -> impl Iterator<Item = Coord> + '_ {
    b.squares_of(cell)
        .filter(move |&other| other != src && movegen::piece_moves(b, other).contains(&dst))
}

/// Origin file and rank required to tell a move apart from the alternatives
///
/// The file is used if no rival stands on the same file. Otherwise the rank is used if no rival
/// stands on the same rank, and the full square is the last resort.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Disambig {
    pub file: Option<File>,
    pub rank: Option<Rank>,
}

impl Disambig {
    /// Computes the disambiguator for the piece on `src` going to `dst`
    pub fn new(b: &Board, src: Coord, dst: Coord) -> Disambig {
        let (mut any, mut same_file, mut same_rank) = (false, false, false);
        for other in find_ambiguous(b, src, dst, b.get(src)) {
            any = true;
            same_file |= other.file() == src.file();
            same_rank |= other.rank() == src.rank();
        }
        match (any, same_file, same_rank) {
            (false, _, _) => Disambig::default(),
            (true, false, _) => Disambig {
                file: Some(src.file()),
                rank: None,
            },
            (true, true, false) => Disambig {
                file: None,
                rank: Some(src.rank()),
            },
            (true, true, true) => Disambig {
                file: Some(src.file()),
                rank: Some(src.rank()),
            },
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.file.is_none() && self.rank.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, Piece};
    use std::str::FromStr;

    fn coord(s: &str) -> Coord {
        Coord::from_str(s).unwrap()
    }

    fn rivals(b: &Board, src: &str, dst: &str) -> Vec<String> {
        let cell = b.get(coord(src));
        find_ambiguous(b, coord(src), coord(dst), cell)
            .map(|c| c.to_string())
            .collect()
    }

    #[test]
    fn test_knights_same_rank() {
        let b = Board::from_fen("8/8/8/8/8/8/8/1N1N4 w - - 0 1").unwrap();
        assert_eq!(rivals(&b, "b1", "c3"), vec!["d1"]);
        assert_eq!(
            Disambig::new(&b, coord("b1"), coord("c3")),
            Disambig {
                file: Some(File::B),
                rank: None
            }
        );
        assert!(rivals(&b, "b1", "a3").is_empty());
        assert!(Disambig::new(&b, coord("b1"), coord("a3")).is_empty());
    }

    #[test]
    fn test_knights_apart() {
        let b = Board::from_fen("8/8/8/8/8/8/4N3/1N6 w - - 0 1").unwrap();
        assert_eq!(rivals(&b, "b1", "c3"), vec!["e2"]);
        assert_eq!(rivals(&b, "e2", "c3"), vec!["b1"]);
        assert_eq!(
            Disambig::new(&b, coord("e2"), coord("c3")),
            Disambig {
                file: Some(File::E),
                rank: None
            }
        );
    }

    #[test]
    fn test_same_file() {
        let b = Board::from_fen("8/8/8/1N6/8/8/8/1N6 w - - 0 1").unwrap();
        assert_eq!(rivals(&b, "b1", "c3"), vec!["b5"]);
        assert_eq!(
            Disambig::new(&b, coord("b1"), coord("c3")),
            Disambig {
                file: None,
                rank: Some(Rank::R1)
            }
        );

        let b = Board::from_fen("8/8/8/R7/8/8/8/R7 w - - 0 1").unwrap();
        assert_eq!(
            Disambig::new(&b, coord("a1"), coord("a3")),
            Disambig {
                file: None,
                rank: Some(Rank::R1)
            }
        );
    }

    #[test]
    fn test_full_square() {
        let b = Board::from_fen("8/8/8/8/8/1N3N2/8/1N6 w - - 0 1").unwrap();
        assert_eq!(
            Disambig::new(&b, coord("b3"), coord("d2")),
            Disambig {
                file: Some(File::B),
                rank: Some(Rank::R3)
            }
        );
        assert_eq!(
            Disambig::new(&b, coord("b1"), coord("d2")),
            Disambig {
                file: None,
                rank: Some(Rank::R1)
            }
        );
        assert_eq!(
            Disambig::new(&b, coord("f3"), coord("d2")),
            Disambig {
                file: Some(File::F),
                rank: None
            }
        );
    }

    #[test]
    fn test_other_color_ignored() {
        let b = Board::from_fen("8/8/8/8/8/8/4n3/1N6 w - - 0 1").unwrap();
        let knight = Cell::from_parts(Color::White, Piece::Knight);
        assert_eq!(find_ambiguous(&b, coord("b1"), coord("c3"), knight).count(), 0);
        assert!(Disambig::new(&b, coord("b1"), coord("c3")).is_empty());
    }
}
