//! Pseudo-legal move generation for a single piece

use crate::board::Board;
use crate::geometry;
use crate::types::{Cell, Color, Coord, Piece};

use std::ops::Deref;
use std::slice;

use arrayvec::ArrayVec;

/// List of destination squares for a single piece
///
/// A queen in the middle of an empty board has 27 destinations, so the capacity is always
/// enough.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Coord, 32>);

impl Deref for MoveList {
    type Target = ArrayVec<Coord, 32>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Coord;
    type IntoIter = slice::Iter<'a, Coord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for MoveList {
    type Item = Coord;
    type IntoIter = arrayvec::IntoIter<Coord, 32>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}

// (file delta, rank index delta)
const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const LINE_DIRS: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
const DIAG_DIRS: [(isize, isize); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

struct MoveGenImpl<'a> {
    board: &'a Board,
    color: Color,
    res: MoveList,
}

impl<'a> MoveGenImpl<'a> {
    fn new(board: &'a Board, color: Color) -> Self {
        MoveGenImpl {
            board,
            color,
            res: MoveList::new(),
        }
    }

    fn add(&mut self, dst: Coord) {
        // Never fails, no piece has more than 27 destinations
        let _ = self.res.0.try_push(dst);
    }

    fn is_own(&self, c: Coord) -> bool {
        self.board.get(c).color() == Some(self.color)
    }

    fn is_enemy(&self, c: Coord) -> bool {
        self.board.get(c).color() == Some(self.color.inv())
    }

    fn gen_pawn(&mut self, src: Coord) {
        let delta = geometry::pawn_forward_delta(self.color);
        if let Some(single) = src.try_shift(0, delta) {
            if self.board.get(single).is_empty() {
                self.add(single);
                if src.rank() == geometry::double_move_src_rank(self.color) {
                    if let Some(double) = single.try_shift(0, delta) {
                        if self.board.get(double).is_empty() {
                            self.add(double);
                        }
                    }
                }
            }
        }

        let ep_dest = match self.board.side() == self.color {
            true => self.board.ep_dest(),
            false => None,
        };
        for side in [-1, 1] {
            if let Some(dst) = src.try_shift(side, delta) {
                if self.is_enemy(dst) || Some(dst) == ep_dest {
                    self.add(dst);
                }
            }
        }
    }

    fn gen_offsets(&mut self, src: Coord, offsets: &[(isize, isize)]) {
        for &(df, dr) in offsets {
            if let Some(dst) = src.try_shift(df, dr) {
                if !self.is_own(dst) {
                    self.add(dst);
                }
            }
        }
    }

    fn gen_rays(&mut self, src: Coord, dirs: &[(isize, isize)]) {
        for &(df, dr) in dirs {
            let mut cur = src;
            while let Some(dst) = cur.try_shift(df, dr) {
                if self.is_own(dst) {
                    break;
                }
                self.add(dst);
                if self.is_enemy(dst) {
                    break;
                }
                cur = dst;
            }
        }
    }

    fn gen(mut self, src: Coord, piece: Piece) -> MoveList {
        match piece {
            Piece::Pawn => self.gen_pawn(src),
            Piece::Knight => self.gen_offsets(src, &KNIGHT_OFFSETS),
            Piece::King => self.gen_offsets(src, &KING_OFFSETS),
            Piece::Bishop => self.gen_rays(src, &DIAG_DIRS),
            Piece::Rook => self.gen_rays(src, &LINE_DIRS),
            Piece::Queen => {
                self.gen_rays(src, &LINE_DIRS);
                self.gen_rays(src, &DIAG_DIRS);
            }
        }
        self.res
    }
}

/// Returns the destinations of the piece on `src`, regardless of the side to move
///
/// Empty squares have no destinations.
pub(crate) fn piece_moves(b: &Board, src: Coord) -> MoveList {
    match b.get(src).parts() {
        Some((color, piece)) => MoveGenImpl::new(b, color).gen(src, piece),
        None => MoveList::new(),
    }
}

/// Generates pseudo-legal destinations for the piece on `src`
///
/// Returns an empty list if `src` is empty or holds a piece of the side which is not to move.
/// The moves are not checked for leaving the king under attack, and castling destinations are
/// never generated.
///
/// The order of destinations is deterministic: pawn single step, double step and captures towards
/// the a-file and the h-file; fixed offset order for knights and kings; for sliding pieces, one ray
/// after another, nearest square first.
///
/// # Example
///
/// ```
/// # use openline::{movegen, Board};
/// #
/// let b = Board::initial();
/// let dsts: Vec<_> = movegen::valid_moves(&b, "g1".parse().unwrap())
///     .iter()
///     .map(ToString::to_string)
///     .collect();
/// assert_eq!(dsts, vec!["f3", "h3"]);
/// ```
pub fn valid_moves(b: &Board, src: Coord) -> MoveList {
    if b.get(src).color() != Some(b.side()) {
        return MoveList::new();
    }
    piece_moves(b, src)
}

/// Returns `true` if `dst` is among [`valid_moves()`] for `src`
pub fn is_valid(b: &Board, src: Coord, dst: Coord) -> bool {
    valid_moves(b, src).contains(&dst)
}

/// Returns `true` if the piece on `src` may capture on `dst`
///
/// This happens when `dst` is occupied by the opponent, or when a pawn goes to the enpassant
/// destination.
pub(crate) fn is_capture(b: &Board, src: Coord, dst: Coord) -> bool {
    let cell = b.get(src);
    match cell.color() {
        Some(c) if b.get(dst).color() == Some(c.inv()) => true,
        Some(_) => {
            cell.piece() == Some(Piece::Pawn)
                && src.file() != dst.file()
                && b.ep_dest() == Some(dst)
        }
        None => false,
    }
}

/// Returns the square of the pawn captured by enpassant when the pawn on `src` goes to `dst`
pub(crate) fn enpassant_victim(b: &Board, src: Coord, dst: Coord) -> Option<Coord> {
    if b.get(src) != Cell::from_parts(b.side(), Piece::Pawn) || b.get(dst).is_occupied() {
        return None;
    }
    if src.file() == dst.file() || b.ep_dest() != Some(dst) {
        return None;
    }
    b.ep_source()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Rank};
    use std::collections::BTreeSet;

    fn dsts(b: &Board, src: &str) -> Vec<String> {
        valid_moves(b, src.parse().unwrap())
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn dst_set(b: &Board, src: &str) -> BTreeSet<String> {
        dsts(b, src).into_iter().collect()
    }

    #[test]
    fn test_initial() {
        let b = Board::initial();
        assert_eq!(dsts(&b, "e2"), vec!["e3", "e4"]);
        assert_eq!(dsts(&b, "b1"), vec!["a3", "c3"]);
        for src in ["a1", "c1", "d1", "e1", "f1", "h1"] {
            assert!(dsts(&b, src).is_empty(), "{} must be blocked", src);
        }
        // Black is not to move
        assert!(dsts(&b, "e7").is_empty());
        assert!(dsts(&b, "g8").is_empty());
        // Empty square
        assert!(dsts(&b, "e4").is_empty());

        let total: usize = Coord::iter()
            .map(|c| valid_moves(&b, c).len())
            .sum();
        assert_eq!(total, 20);
    }

    #[test]
    fn test_initial_destinations_follow_rules() {
        let b = Board::initial();
        for src in Coord::iter() {
            let cell = b.get(src);
            for dst in valid_moves(&b, src) {
                assert!(b.get(dst).color() != cell.color());
                let df = (dst.file().index() as isize - src.file().index() as isize).abs();
                let dr = (dst.rank().index() as isize - src.rank().index() as isize).abs();
                match cell.piece() {
                    Some(Piece::Pawn) => assert!(df == 0 && (dr == 1 || dr == 2)),
                    Some(Piece::Knight) => assert!(df * dr == 2),
                    p => panic!("unexpected mobile piece {:?} on {}", p, src),
                }
            }
        }
    }

    #[test]
    fn test_sliders() {
        let b = Board::from_fen("8/8/8/3p4/8/1n1Q2P1/8/8 w - - 0 1").unwrap();
        assert_eq!(
            dst_set(&b, "d3"),
            [
                "d4", "d5", "d2", "d1", "c3", "b3", "e3", "f3", "c4", "b5", "a6", "e4", "f5",
                "g6", "h7", "c2", "b1", "e2", "f1",
            ]
            .iter()
            .map(ToString::to_string)
            .collect()
        );
        // First ray goes towards the 8th rank, nearest square first
        assert_eq!(&dsts(&b, "d3")[..2], ["d4", "d5"]);

        let b = Board::from_fen("8/8/8/8/8/8/8/R3K2r w - - 0 1").unwrap();
        assert_eq!(
            dst_set(&b, "a1"),
            ["a2", "a3", "a4", "a5", "a6", "a7", "a8", "b1", "c1", "d1"]
                .iter()
                .map(ToString::to_string)
                .collect()
        );
    }

    #[test]
    fn test_knight_king() {
        let b = Board::from_fen("8/8/8/8/8/8/1p6/N6K w - - 0 1").unwrap();
        assert_eq!(dsts(&b, "a1"), vec!["b3", "c2"]);
        assert_eq!(dsts(&b, "h1"), vec!["g2", "g1", "h2"]);
    }

    #[test]
    fn test_pawns() {
        let b = Board::from_fen("8/8/8/8/1p6/P1n5/1PP5/8 w - - 0 1").unwrap();
        assert_eq!(dsts(&b, "b2"), vec!["b3", "c3"]);
        assert!(dsts(&b, "c2").is_empty());
        assert_eq!(dsts(&b, "a3"), vec!["a4", "b4"]);

        let b = Board::from_fen("8/8/8/8/8/2p5/2P5/8 b - - 0 1").unwrap();
        assert!(dsts(&b, "c3").is_empty());
    }

    #[test]
    fn test_enpassant() {
        let b =
            Board::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3")
                .unwrap();
        assert_eq!(dsts(&b, "e5"), vec!["e6", "d6"]);
        let e5 = Coord::from_parts(File::E, Rank::R5);
        let d6 = Coord::from_parts(File::D, Rank::R6);
        assert!(is_capture(&b, e5, d6));
        assert_eq!(
            enpassant_victim(&b, e5, d6),
            Some(Coord::from_parts(File::D, Rank::R5))
        );
        assert_eq!(
            enpassant_victim(&b, e5, Coord::from_parts(File::E, Rank::R6)),
            None
        );

        let b =
            Board::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq - 0 3").unwrap();
        assert_eq!(dsts(&b, "e5"), vec!["e6"]);
    }

    #[test]
    fn test_is_valid() {
        let b = Board::initial();
        let e2 = Coord::from_parts(File::E, Rank::R2);
        assert!(is_valid(&b, e2, Coord::from_parts(File::E, Rank::R4)));
        assert!(!is_valid(&b, e2, Coord::from_parts(File::E, Rank::R5)));
        assert!(!is_valid(
            &b,
            Coord::from_parts(File::E, Rank::R1),
            Coord::from_parts(File::G, Rank::R1)
        ));
    }
}
