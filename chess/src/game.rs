//! Game state and the operations to replay opening lines

use crate::board::{Board, FenParseError};
use crate::movegen::{self, MoveList};
use crate::moves::{self, san, uci, ApplyError, Move, PromotePiece};
use crate::types::{Cell, Color, Coord};

use std::str::FromStr;

use thiserror::Error;

/// Error applying a move given as a string
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PushError {
    /// Cannot parse or resolve SAN
    #[error("bad SAN: {0}")]
    San(#[from] san::ParseError),
    /// Cannot parse UCI
    #[error("bad UCI: {0}")]
    Uci(#[from] uci::ParseError),
    /// The move cannot be applied
    #[error("cannot apply: {0}")]
    Apply(#[from] ApplyError),
}

/// Error replaying a line of SAN moves
#[derive(Debug, Clone, Error, Eq, PartialEq)]
#[error("move #{position} ({token:?}): {error}")]
pub struct SanLineError {
    /// Position of the failed move in the line, starting from 1
    ///
    /// Move numbers are not counted.
    pub position: usize,
    /// The failed move as written in the line
    pub token: String,
    /// The reason of the failure
    #[source]
    pub error: PushError,
}

/// Chess game state
///
/// Holds the board and the list of moves applied to it. All the modifications go through the
/// move executor, so the history always matches the position.
///
/// Cloning the game creates a completely independent copy, which can be used to try moves
/// without affecting the original.
///
/// # Example
///
/// ```
/// # use openline::GameState;
/// #
/// let mut game = GameState::new();
/// assert!(game.apply("e2", "e4"));
/// assert!(!game.apply("e2", "e4"));
///
/// let mut trial = game.clone();
/// assert!(trial.apply("e7", "e5"));
/// assert_eq!(trial.len(), 2);
/// assert_eq!(game.len(), 1);
/// assert!(game.piece_at("e5").is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    history: Vec<Move>,
}

fn is_move_number(token: &str) -> bool {
    let digits = token.trim_end_matches('.');
    digits.len() < token.len() && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn strip_move_number(token: &str) -> &str {
    let rest = token.trim_start_matches(|c: char| c.is_ascii_digit());
    match rest.len() < token.len() && rest.starts_with('.') {
        true => rest.trim_start_matches('.'),
        false => token,
    }
}

impl GameState {
    /// Creates a game from the initial position
    pub fn new() -> GameState {
        GameState::from_board(Board::initial())
    }

    /// Creates a game starting from the board `board`
    pub fn from_board(board: Board) -> GameState {
        GameState {
            board,
            history: Vec::new(),
        }
    }

    /// Creates a game starting from the position given in FEN
    pub fn from_fen(fen: &str) -> Result<GameState, FenParseError> {
        Ok(GameState::from_board(Board::from_fen(fen)?))
    }

    /// Returns the current board
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the side to move
    #[inline]
    pub fn side(&self) -> Color {
        self.board.side()
    }

    /// Returns the moves applied so far, in order
    #[inline]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Returns the number of moves applied so far
    #[inline]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Returns `true` if no moves were applied yet
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Returns the last applied move, if any
    #[inline]
    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    /// Returns the SAN of the last applied move, or an empty string if there are no moves yet
    #[inline]
    pub fn last_move_notation(&self) -> &str {
        self.last_move().map_or("", Move::san)
    }

    /// Returns the contents of the square named `square`
    ///
    /// Invalid square names are treated as empty squares.
    pub fn piece_at(&self, square: &str) -> Cell {
        match Coord::from_str(square) {
            Ok(c) => self.board.get(c),
            Err(_) => Cell::EMPTY,
        }
    }

    /// Returns the valid destinations for the piece on the square named `square`
    ///
    /// The list is empty for invalid square names, empty squares and pieces of the side which
    /// is not to move. See [`movegen::valid_moves()`] for details.
    pub fn valid_moves(&self, square: &str) -> MoveList {
        match Coord::from_str(square) {
            Ok(c) => movegen::valid_moves(&self.board, c),
            Err(_) => MoveList::new(),
        }
    }

    /// Applies the move from `src` to `dst`
    ///
    /// On success, returns the applied move. On failure, the game is not modified. Castling
    /// follows the same rules as in [`GameState::apply()`].
    pub fn try_apply(
        &mut self,
        src: Coord,
        dst: Coord,
        promote: Option<PromotePiece>,
    ) -> Result<&Move, ApplyError> {
        match moves::make_move(&mut self.board, src, dst, promote) {
            Ok(mv) => {
                self.history.push(mv);
                Ok(&self.history[self.history.len() - 1])
            }
            Err(e) => {
                #[cfg(feature = "logging")]
                log::debug!("rejected move {}{}: {}", src, dst, e);
                Err(e)
            }
        }
    }

    /// Applies the move from the square named `from` to the square named `to`
    ///
    /// Returns `false` and leaves the game unchanged if the move cannot be applied. Pawns reaching
    /// the last rank are promoted to queen.
    ///
    /// A king shifting by two files is always treated as castling. It is accepted only from the
    /// e-file home square, with the castling right still held and the own rook on the corner, so
    /// `apply` returns `false` for other two-file king moves. The squares between the king and
    /// the rook are not checked.
    pub fn apply(&mut self, from: &str, to: &str) -> bool {
        match (Coord::from_str(from), Coord::from_str(to)) {
            (Ok(src), Ok(dst)) => self.try_apply(src, dst, None).is_ok(),
            _ => false,
        }
    }

    /// Resolves the SAN move `san` in the current position
    pub fn try_parse(&self, san: &str) -> Result<uci::Move, san::ParseError> {
        let res = san::Move::parse(san, &self.board);
        #[cfg(feature = "logging")]
        if let Err(e) = &res {
            log::debug!("cannot resolve {:?}: {}", san, e);
        }
        res
    }

    /// Resolves the SAN move `san` in the current position
    ///
    /// Returns `None` if the move cannot be parsed or no piece can make it. The returned move is
    /// not applied, and it is not guaranteed that [`GameState::apply()`] accepts it (e.g. castling
    /// is resolved into the king shift even if the castling rights are lost).
    #[inline]
    pub fn parse(&self, san: &str) -> Option<uci::Move> {
        self.try_parse(san).ok()
    }

    /// Parses and applies the SAN move `san`
    pub fn push_san(&mut self, san: &str) -> Result<&Move, PushError> {
        let mv = self.try_parse(san)?;
        Ok(self.try_apply(mv.src, mv.dst, mv.promote)?)
    }

    /// Parses and applies the UCI move `uci`
    pub fn push_uci(&mut self, uci: &str) -> Result<&Move, PushError> {
        let mv = uci::Move::from_str(uci)?;
        Ok(self.try_apply(mv.src, mv.dst, mv.promote)?)
    }

    /// Applies the line of SAN moves separated by whitespace
    ///
    /// Move numbers (like `1.` or `3...`) are skipped. Either all the moves are applied, or the game
    /// remains unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// # use openline::GameState;
    /// #
    /// let mut game = GameState::new();
    /// game.push_san_line("1. e4 e5 2. Nf3 Nc6 3. Bb5").unwrap();
    /// assert_eq!(game.len(), 5);
    ///
    /// let err = game.push_san_line("3... a6 4. Bxc6 Qxd1").unwrap_err();
    /// assert_eq!(err.position, 3);
    /// assert_eq!(game.len(), 5);
    /// ```
    pub fn push_san_line(&mut self, line: &str) -> Result<(), SanLineError> {
        let mut game = self.clone();
        let tokens = line
            .split_whitespace()
            .filter(|t| !is_move_number(t))
            .map(strip_move_number);
        for (idx, token) in tokens.enumerate() {
            if let Err(error) = game.push_san(token) {
                return Err(SanLineError {
                    position: idx + 1,
                    token: token.to_string(),
                    error,
                });
            }
        }
        *self = game;
        Ok(())
    }
}

impl Default for GameState {
    #[inline]
    fn default() -> GameState {
        GameState::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::MoveKind;
    use crate::types::{CastlingSide, File, Piece, Rank};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    fn snapshot(game: &GameState) -> Vec<Cell> {
        Coord::iter().map(|c| game.board().get(c)).collect()
    }

    #[test]
    fn test_construct() {
        let game = GameState::new();
        assert_eq!(game.side(), Color::White);
        assert!(game.is_empty());
        assert_eq!(game.last_move_notation(), "");
        assert_eq!(game.piece_at("e1"), Cell::from_parts(Color::White, Piece::King));
        assert_eq!(game.piece_at("d8"), Cell::from_parts(Color::Black, Piece::Queen));
        assert!(game.piece_at("e4").is_empty());
        for bad in ["", "e", "e9", "i1", "e10", "E1", "♔1"] {
            assert!(game.piece_at(bad).is_empty());
            assert!(game.valid_moves(bad).is_empty());
        }
        assert_eq!(game, GameState::default());
    }

    #[test]
    fn test_opening() {
        let mut game = GameState::new();
        assert!(game.apply("e2", "e4"));
        assert_eq!(game.last_move_notation(), "e4");
        assert_eq!(game.side(), Color::Black);
        assert!(game.apply("e7", "e5"));
        assert_eq!(game.last_move_notation(), "e5");
        assert!(game.apply("g1", "f3"));
        assert_eq!(game.last_move_notation(), "Nf3");
        assert_eq!(game.len(), 3);

        let history: Vec<_> = game.history().iter().map(Move::san).collect();
        assert_eq!(history, vec!["e4", "e5", "Nf3"]);
    }

    #[test]
    fn test_reject() {
        let mut game = GameState::new();
        let before = snapshot(&game);
        assert!(!game.apply("e3", "e4"));
        assert!(!game.apply("e7", "e5"));
        assert!(!game.apply("e2", "e5"));
        assert!(!game.apply("a1", "a3"));
        assert!(!game.apply("e2", "x9"));
        assert_eq!(
            game.try_apply(
                Coord::from_parts(File::B, Rank::R1),
                Coord::from_parts(File::D, Rank::R2),
                None
            ),
            Err(ApplyError::Unreachable {
                src: Coord::from_parts(File::B, Rank::R1),
                dst: Coord::from_parts(File::D, Rank::R2),
            })
        );
        assert_eq!(snapshot(&game), before);
        assert_eq!(game.side(), Color::White);
        assert!(game.is_empty());
    }

    #[test]
    fn test_castling() {
        let mut game = GameState::new();
        assert!(game.apply("e1", "g1"));
        assert_eq!(game.last_move_notation(), "O-O");
        assert_eq!(game.piece_at("g1"), Cell::from_parts(Color::White, Piece::King));
        assert_eq!(game.piece_at("f1"), Cell::from_parts(Color::White, Piece::Rook));
        assert!(game.piece_at("h1").is_empty());
        assert!(game.piece_at("e1").is_empty());
        let mv = game.last_move().unwrap();
        assert_eq!(mv.kind(), MoveKind::Castling(CastlingSide::King));
        assert_eq!(mv.captured(), Some(Cell::from_parts(Color::White, Piece::Knight)));
        assert_eq!(game.board().move_counter(), 0);

        assert!(game.apply("e8", "c8"));
        assert_eq!(game.last_move_notation(), "O-O-O");
        assert_eq!(
            game.last_move().and_then(Move::captured),
            Some(Cell::from_parts(Color::Black, Piece::Bishop))
        );
        assert_eq!(game.piece_at("c8"), Cell::from_parts(Color::Black, Piece::King));
        assert_eq!(game.piece_at("d8"), Cell::from_parts(Color::Black, Piece::Rook));
        assert!(game.piece_at("a8").is_empty());

        // No castling without the right, or away from the home square
        let mut game = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Qk - 0 1").unwrap();
        assert!(!game.apply("e1", "g1"));
        assert!(game.apply("e1", "c1"));
        assert!(!game.apply("e8", "c8"));
        assert!(game.apply("e8", "g8"));
        let mut game = GameState::from_fen("4k3/8/8/8/8/8/8/3K3R w K - 0 1").unwrap();
        assert!(!game.apply("d1", "f1"));

        let mut game = GameState::new();
        assert!(game.apply("e2", "e4"));
        assert!(game.apply("e8", "g8"));
        assert_eq!(game.last_move_notation(), "O-O");
        assert_eq!(game.piece_at("f8"), Cell::from_parts(Color::Black, Piece::Rook));
        assert!(game.apply("e1", "c1"));
        assert_eq!(game.last_move_notation(), "O-O-O");
        assert_eq!(game.piece_at("d1"), Cell::from_parts(Color::White, Piece::Rook));
    }

    #[test]
    fn test_disambig() {
        for (fen, src, dst, san) in [
            ("4k3/8/8/8/8/8/8/1N1NK3 w - - 0 1", "b1", "c3", "Nbc3"),
            ("4k3/8/8/8/8/8/8/1N1NK3 w - - 0 1", "d1", "c3", "Ndc3"),
            ("4k3/8/8/8/8/8/8/1N1NK3 w - - 0 1", "d1", "e3", "Ne3"),
            ("4k3/8/8/8/8/8/4N3/1N2K3 w - - 0 1", "b1", "c3", "Nbc3"),
            ("4k3/8/8/8/8/8/4N3/1N2K3 w - - 0 1", "e2", "c3", "Nec3"),
            ("4k3/8/8/8/8/8/4N3/1N2K3 w - - 0 1", "e2", "d4", "Nd4"),
            ("4k3/8/8/1N6/8/8/8/1N2K3 w - - 0 1", "b1", "c3", "N1c3"),
            ("4k3/8/8/1N6/8/8/8/1N2K3 w - - 0 1", "b5", "c3", "N5c3"),
        ] {
            let mut game = GameState::from_fen(fen).unwrap();
            assert!(game.apply(src, dst), "{} {}{}", fen, src, dst);
            assert_eq!(game.last_move_notation(), san);
        }
    }

    #[test]
    fn test_clone() {
        let mut game = GameState::new();
        assert!(game.apply("d2", "d4"));
        let before = snapshot(&game);

        let mut trial = game.clone();
        assert!(trial.apply("d7", "d5"));
        assert!(trial.apply("c2", "c4"));
        assert!(trial.apply("d5", "c4"));
        assert_eq!(snapshot(&game), before);
        assert_eq!(game.len(), 1);
        assert_eq!(game.side(), Color::Black);
        assert_eq!(trial.len(), 4);
    }

    #[test]
    fn test_parse() {
        let mut game = GameState::new();
        assert_eq!(game.parse("e4").map(|m| m.to_string()), Some("e2e4".to_string()));
        assert_eq!(game.parse("Nf3").map(|m| m.to_string()), Some("g1f3".to_string()));
        assert_eq!(game.parse("O-O").map(|m| m.to_string()), Some("e1g1".to_string()));
        assert_eq!(game.parse("Nf6"), None);
        assert_eq!(game.parse("Bxc4"), None);
        assert_eq!(game.parse("e5"), None);
        assert_eq!(game.parse("hello"), None);
        assert_eq!(game.parse(""), None);
        assert!(matches!(
            game.try_parse("Ke2"),
            Err(san::ParseError::Convert(san::IntoMoveError::NotFound))
        ));
        assert!(game.is_empty());

        assert!(game.apply("e2", "e4"));
        assert_eq!(game.parse("e5").map(|m| m.to_string()), Some("e7e5".to_string()));
        assert_eq!(game.parse("O-O-O").map(|m| m.to_string()), Some("e8c8".to_string()));
    }

    #[test]
    fn test_enpassant() {
        let mut game = GameState::new();
        game.push_san_line("e4 Nf6 e5 d5").unwrap();
        assert_eq!(
            game.valid_moves("e5").iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["e6", "d6", "f6"]
        );
        let mv = game.push_san("exd6").unwrap();
        assert_eq!(mv.kind(), MoveKind::Enpassant);
        assert_eq!(mv.captured(), Some(Cell::from_parts(Color::Black, Piece::Pawn)));
        assert!(game.piece_at("d5").is_empty());
        assert_eq!(game.piece_at("d6"), Cell::from_parts(Color::White, Piece::Pawn));
    }

    #[test]
    fn test_push() {
        let mut game = GameState::new();
        assert_eq!(game.push_uci("e2e4").map(Move::san), Ok("e4"));
        assert_eq!(game.push_san("c5").map(Move::san), Ok("c5"));
        assert!(matches!(game.push_uci("e2e5"), Err(PushError::Apply(_))));
        assert!(matches!(game.push_uci("e2"), Err(PushError::Uci(_))));
        assert!(matches!(game.push_san("Nf9"), Err(PushError::San(_))));
        assert_eq!(game.len(), 2);
    }

    #[test]
    fn test_line() {
        let mut game = GameState::new();
        game.push_san_line("1.e4 c5 2. Nf3 d6 3.d4 cxd4 4. Nxd4 Nf6 5. Nc3 a6")
            .unwrap();
        assert_eq!(game.len(), 10);
        assert_eq!(game.last_move_notation(), "a6");
        assert_eq!(
            game.board().as_fen(),
            "rnbqkb1r/1p2pppp/p2p1n2/8/3NP3/2N5/PPP2PPP/R1BQKB1R w KQkq - 0 6"
        );

        let before = game.clone();
        let err = game.push_san_line("6. Be3 e5 7. Nb3 Be7 8. Qxh8").unwrap_err();
        assert_eq!(err.position, 5);
        assert_eq!(err.token, "Qxh8");
        assert!(matches!(err.error, PushError::San(_)));
        assert_eq!(game, before);

        game.push_san_line("").unwrap();
        assert_eq!(game, before);
    }

    #[test]
    fn test_promote() {
        let mut game = GameState::from_fen("8/4P3/8/8/8/8/8/k6K w - - 0 1").unwrap();
        let mut game2 = game.clone();
        assert!(game.apply("e7", "e8"));
        assert_eq!(game.last_move_notation(), "e8=Q");
        assert_eq!(game.piece_at("e8"), Cell::from_parts(Color::White, Piece::Queen));

        assert_eq!(game2.push_san("e8=N").map(Move::san), Ok("e8=N"));
        assert_eq!(game2.piece_at("e8"), Cell::from_parts(Color::White, Piece::Knight));
    }

    fn candidates(game: &GameState) -> Vec<(Coord, Coord)> {
        let mut res = Vec::new();
        for src in Coord::iter() {
            for dst in movegen::valid_moves(game.board(), src) {
                res.push((src, dst));
            }
            // Castling is never generated
            for delta in [-2, 2] {
                if let Some(dst) = src.try_shift(delta, 0) {
                    if moves::classify(game.board(), src, dst, None).is_ok() {
                        res.push((src, dst));
                    }
                }
            }
        }
        res
    }

    #[test]
    fn test_random_playouts() {
        let mut rng = StdRng::seed_from_u64(0x0de1_1ead);
        for _ in 0..20 {
            let mut game = GameState::new();
            for _ in 0..120 {
                let cands = candidates(&game);
                let (src, dst) = match cands.choose(&mut rng) {
                    Some(&pair) => pair,
                    None => break,
                };

                // Unreachable destinations never change the game
                let bad = Coord::from_index(rng.gen_range(0..64));
                if !cands.contains(&(src, bad)) {
                    let before = game.clone();
                    assert!(game.try_apply(src, bad, None).is_err());
                    assert_eq!(game, before);
                }

                // Generated destinations are never occupied by own pieces
                for d in game.valid_moves(&src.to_string()).iter() {
                    assert_ne!(game.board().get(*d).color(), Some(game.side()));
                }

                let before = game.clone();
                let side = game.side();
                let len = game.len();
                let mv = game.try_apply(src, dst, None).unwrap().clone();
                assert_eq!(game.side(), side.inv());
                assert_eq!(game.len(), len + 1);
                assert_eq!(game.last_move_notation(), mv.san());

                // SAN resolves back into the same move in the position before it
                assert_eq!(before.parse(mv.san()), Some(mv.uci()), "{}", mv.san());
            }
        }
    }
}
