/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use super::{Color, Coordinate, Piece, PieceKind, BOARD_SIZE};

/// Files in the order they are scanned when looking for pieces: center files first.
pub const SCAN_ORDER: [i8; BOARD_SIZE as usize] = [3, 4, 2, 5, 1, 6, 0, 7];

/// Which sides may still castle, and toward which rook.
///
/// "Low" is the rook on the a-file, "high" is the rook on the h-file.
/// Once cleared, a right is never restored except by undoing the move that cleared it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    pub white_low: bool,
    pub white_high: bool,
    pub black_low: bool,
    pub black_high: bool,
}

impl CastlingRights {
    /// Both sides may castle in both directions.
    pub const ALL: Self = Self {
        white_low: true,
        white_high: true,
        black_low: true,
        black_high: true,
    };

    /// Neither side may castle.
    pub const NONE: Self = Self {
        white_low: false,
        white_high: false,
        black_low: false,
        black_high: false,
    };

    /// Returns `true` if `color` may castle toward the a-file.
    #[inline(always)]
    pub const fn low(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_low,
            Color::Black => self.black_low,
        }
    }

    /// Returns `true` if `color` may castle toward the h-file.
    #[inline(always)]
    pub const fn high(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_high,
            Color::Black => self.black_high,
        }
    }

    /// Permanently removes `color`'s right to castle toward the a-file.
    #[inline(always)]
    pub fn remove_low(&mut self, color: Color) {
        match color {
            Color::White => self.white_low = false,
            Color::Black => self.black_low = false,
        }
    }

    /// Permanently removes `color`'s right to castle toward the h-file.
    #[inline(always)]
    pub fn remove_high(&mut self, color: Color) {
        match color {
            Color::White => self.white_high = false,
            Color::Black => self.black_high = false,
        }
    }

    /// Removes both of `color`'s castling rights.
    #[inline(always)]
    pub fn remove(&mut self, color: Color) {
        self.remove_low(color);
        self.remove_high(color);
    }
}

impl Default for CastlingRights {
    /// Defaults to [`CastlingRights::ALL`], as in the starting position.
    fn default() -> Self {
        Self::ALL
    }
}

/// An 8x8 chess board, plus the state that cannot be derived from piece placement.
///
/// Squares are indexed `[x][y]`. See [`Coordinate`] for the orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    /// Piece placement, indexed `[x][y]`.
    squares: [[Piece; BOARD_SIZE as usize]; BOARD_SIZE as usize],

    /// Castling availability for both sides.
    castling: CastlingRights,

    /// Location of a King currently in check, or [`Coordinate::ABSENT`] if no King is.
    warned: Coordinate,
}

impl Board {
    /// A board with no pieces, no castling rights, and no King in check.
    ///
    /// Useful for setting up positions piece-by-piece with [`Board::set`].
    pub const fn empty() -> Self {
        Self {
            squares: [[Piece::Empty; BOARD_SIZE as usize]; BOARD_SIZE as usize],
            castling: CastlingRights::NONE,
            warned: Coordinate::ABSENT,
        }
    }

    /// The standard starting position.
    pub fn standard() -> Self {
        use PieceKind::*;
        const BACK_ROW: [PieceKind; BOARD_SIZE as usize] =
            [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        let mut board = Self::empty();
        for color in Color::all() {
            for (x, kind) in BACK_ROW.into_iter().enumerate() {
                let x = x as i8;
                board.set(Coordinate::new(x, color.back_row()), Piece::new(color, kind));
                board.set(Coordinate::new(x, color.pawn_row()), Piece::new(color, Pawn));
            }
        }

        board.castling = CastlingRights::ALL;
        board
    }

    /// Fetches the piece at `coord`.
    ///
    /// Off-board coordinates, including sentinels, hold no piece.
    #[inline(always)]
    pub const fn get(&self, coord: Coordinate) -> Piece {
        if coord.is_on_board() {
            self.squares[coord.x as usize][coord.y as usize]
        } else {
            Piece::Empty
        }
    }

    /// Fetches the piece at `(x, y)`, which must be on the board.
    #[inline(always)]
    pub(crate) const fn at(&self, x: i8, y: i8) -> Piece {
        self.squares[x as usize][y as usize]
    }

    /// Places `piece` at `coord`, replacing whatever was there.
    ///
    /// # Panics
    /// If `coord` is not on the board.
    #[inline(always)]
    pub fn set(&mut self, coord: Coordinate, piece: Piece) {
        self.squares[coord.x as usize][coord.y as usize] = piece;
    }

    /// Empties the square at `coord`.
    #[inline(always)]
    pub fn clear(&mut self, coord: Coordinate) {
        self.set(coord, Piece::Empty);
    }

    /// Returns `true` if `(x, y)` holds no piece.
    #[inline(always)]
    pub const fn is_empty(&self, x: i8, y: i8) -> bool {
        self.at(x, y).is_empty()
    }

    /// Finds the first square holding `piece`, scanning from the center files outward.
    ///
    /// Within a file, rows are scanned from both edges toward the middle.
    /// Returns [`Coordinate::ABSENT`] if the piece is not on the board.
    pub fn find(&self, piece: Piece) -> Coordinate {
        for x in SCAN_ORDER {
            for y in 0..BOARD_SIZE / 2 {
                if self.at(x, y) == piece {
                    return Coordinate::new(x, y);
                } else if self.at(x, BOARD_SIZE - y - 1) == piece {
                    return Coordinate::new(x, BOARD_SIZE - y - 1);
                }
            }
        }

        Coordinate::ABSENT
    }

    /// Location of `color`'s King, or [`Coordinate::ABSENT`] if it has been captured.
    #[inline(always)]
    pub fn king(&self, color: Color) -> Coordinate {
        self.find(Piece::new(color, PieceKind::King))
    }

    /// Returns `true` if either King is missing from the board.
    ///
    /// This only happens during a search that lets Kings be captured.
    pub fn is_game_over(&self) -> bool {
        Color::all().into_iter().any(|color| !self.king(color).is_valid())
    }

    /// Sum of the signed material values of every piece on the board. Positive favors White.
    pub fn material_score(&self) -> i32 {
        self.squares.iter().flatten().map(Piece::points).sum()
    }

    /// Castling rights of both sides.
    #[inline(always)]
    pub const fn castling(&self) -> &CastlingRights {
        &self.castling
    }

    /// Mutable castling rights of both sides.
    #[inline(always)]
    pub fn castling_mut(&mut self) -> &mut CastlingRights {
        &mut self.castling
    }

    /// Location of the King currently in check, if any.
    #[inline(always)]
    pub const fn warned(&self) -> Coordinate {
        self.warned
    }

    #[inline(always)]
    pub fn set_warned(&mut self, warned: Coordinate) {
        self.warned = warned;
    }

    /// Returns `true` if the warned square holds `color`'s King.
    #[inline(always)]
    pub fn is_warned(&self, color: Color) -> bool {
        self.warned.is_valid() && self.get(self.warned) == Piece::new(color, PieceKind::King)
    }

    /// Iterates over every occupied square, file by file.
    pub fn pieces(&self) -> impl Iterator<Item = (Coordinate, Piece)> + '_ {
        (0..BOARD_SIZE)
            .flat_map(|x| (0..BOARD_SIZE).map(move |y| Coordinate::new(x, y)))
            .map(|coord| (coord, self.get(coord)))
            .filter(|(_, piece)| !piece.is_empty())
    }
}

impl Default for Board {
    /// Standard starting position for Chess.
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..BOARD_SIZE {
            write!(f, "{}|", BOARD_SIZE - y)?;
            for x in 0..BOARD_SIZE {
                let coord = Coordinate::new(x, y);
                let piece = self.get(coord);
                if coord == self.warned {
                    write!(f, "[{piece}")?;
                } else if x > 0 && Coordinate::new(x - 1, y) == self.warned {
                    write!(f, "]{piece}")?;
                } else {
                    write!(f, " {piece}")?;
                }
            }

            if Coordinate::new(BOARD_SIZE - 1, y) == self.warned {
                write!(f, "]")?;
            }

            if y == 0 {
                write!(f, "        Material: {:+}", self.material_score())?;
            } else if y == 1 {
                let rights = Color::all()
                    .into_iter()
                    .flat_map(|color| {
                        let high = self.castling.high(color).then_some((color, "O-O"));
                        let low = self.castling.low(color).then_some((color, "O-O-O"));
                        [high, low]
                    })
                    .flatten()
                    .map(|(color, side)| format!("{} {side}", color.name()))
                    .collect::<Vec<_>>();

                let rights = if rights.is_empty() {
                    String::from("none")
                } else {
                    rights.join(", ")
                };

                write!(f, "        Castling: {rights}")?;
            } else if y == 2 {
                write!(f, "           Check: {}", self.warned)?;
            }

            writeln!(f)?;
        }

        write!(f, " +")?;
        for _ in 0..BOARD_SIZE {
            write!(f, "--")?;
        }
        write!(f, "\n   ")?;
        for x in 0..BOARD_SIZE {
            write!(f, "{} ", (b'a' + x as u8) as char)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_layout() {
        let board = Board::default();

        assert_eq!(board.get("e1".parse().unwrap()), Piece::WhiteKing);
        assert_eq!(board.get("d8".parse().unwrap()), Piece::BlackQueen);
        assert_eq!(board.get("a2".parse().unwrap()), Piece::WhitePawn);
        assert_eq!(board.get("h7".parse().unwrap()), Piece::BlackPawn);
        assert_eq!(board.get("e4".parse().unwrap()), Piece::Empty);
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(*board.castling(), CastlingRights::ALL);
        assert!(!board.warned().is_valid());
    }

    #[test]
    fn test_material_is_balanced_at_start() {
        assert_eq!(Board::default().material_score(), 0);

        let mut board = Board::default();
        board.clear("d8".parse().unwrap());
        assert_eq!(board.material_score(), 9);
    }

    #[test]
    fn test_find_kings() {
        let board = Board::default();
        assert_eq!(board.king(Color::White), Coordinate::new(4, 7));
        assert_eq!(board.king(Color::Black), Coordinate::new(4, 0));
        assert!(!board.is_game_over());

        let mut board = Board::empty();
        board.set(Coordinate::new(0, 0), Piece::WhiteKing);
        assert!(!board.king(Color::Black).is_valid());
        assert!(board.is_game_over());
    }

    #[test]
    fn test_find_scans_center_files_first() {
        let mut board = Board::empty();
        board.set(Coordinate::new(0, 3), Piece::WhiteRook);
        board.set(Coordinate::new(4, 5), Piece::WhiteRook);
        board.set(Coordinate::new(3, 4), Piece::WhiteRook);

        assert_eq!(board.find(Piece::WhiteRook), Coordinate::new(3, 4));
        assert!(!board.find(Piece::BlackRook).is_valid());
    }

    #[test]
    fn test_sentinels_hold_nothing() {
        let board = Board::default();
        assert_eq!(board.get(Coordinate::ABSENT), Piece::Empty);
        assert_eq!(board.get(Coordinate::castle_high(7)), Piece::Empty);
        assert!(!board.is_warned(Color::White));
    }
}
