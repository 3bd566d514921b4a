/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{is_in_check, Board, CastlingRights, Color, Coordinate, Piece, PieceKind};

/// Decides what a pawn becomes when it reaches the far row.
///
/// A human player answers interactively, while the engine answers from a search.
/// Any closure `FnMut(Color) -> PieceKind` is a chooser.
pub trait PromotionChooser {
    /// Picks the new kind for a promoting pawn of `color`.
    ///
    /// Must return a Queen, Rook, Knight, or Bishop.
    fn choose(&mut self, color: Color) -> PieceKind;
}

impl<F: FnMut(Color) -> PieceKind> PromotionChooser for F {
    #[inline(always)]
    fn choose(&mut self, color: Color) -> PieceKind {
        self(color)
    }
}

/// A chooser with its answer decided in advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Promote(pub PieceKind);

impl Default for Promote {
    /// Promotes to a Queen.
    fn default() -> Self {
        Self(PieceKind::Queen)
    }
}

impl PromotionChooser for Promote {
    #[inline(always)]
    fn choose(&mut self, _color: Color) -> PieceKind {
        self.0
    }
}

/// Everything needed to take back a move made with [`Board::make_move`] or [`Board::apply_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveUndo {
    /// Square the piece moved from.
    pub from: Coordinate,

    /// Destination, possibly a castling sentinel.
    pub to: Coordinate,

    /// The piece that moved, as it was before any promotion.
    pub moved: Piece,

    /// What stood on the destination beforehand. Always empty for castling.
    pub captured: Piece,

    /// Castling rights before the move.
    pub castling: CastlingRights,

    /// Warned square before the move.
    pub warned: Coordinate,
}

impl MoveUndo {
    /// Color of the side that made the move.
    ///
    /// # Panics
    /// If the move was made from an empty square, which no generated move ever is.
    #[inline(always)]
    pub fn mover(&self) -> Color {
        self.moved
            .color()
            .expect("a move is always made by a piece")
    }

    /// Returns `true` if this move was a castle.
    #[inline(always)]
    pub const fn is_castle(&self) -> bool {
        self.to.is_castle()
    }
}

impl Board {
    /// Plays the move `from -> to`, asking `chooser` if a pawn promotes,
    /// and returns what is needed to undo it with [`Board::undo_move`].
    ///
    /// `to` must come from [`generate_moves`](super::generate_moves) for `from`.
    ///
    /// In order, this:
    /// 1. Removes castling rights for any King that moves, and for any rook square moved from or onto.
    /// 2. For castling, relocates King and rook together.
    /// 3. Otherwise moves the piece and, if it is a pawn on the far row, replaces it by `chooser`'s pick.
    /// 4. Marks the opponent's King as warned if it is now in check, or clears the mark.
    pub fn apply_move(
        &mut self,
        from: Coordinate,
        to: Coordinate,
        chooser: &mut impl PromotionChooser,
    ) -> MoveUndo {
        let undo = self.make_move(from, to);
        let mover = undo.mover();

        if self.is_promotion(&undo) {
            let kind = chooser.choose(mover);
            self.promote(to, kind);
        }

        self.refresh_warning(mover);
        undo
    }

    /// Steps 1 and 2/3 of [`Board::apply_move`], without resolving a promotion or updating the warned square.
    ///
    /// Use [`Board::is_promotion`], [`Board::promote`], and [`Board::refresh_warning`] to finish the move.
    pub fn make_move(&mut self, from: Coordinate, to: Coordinate) -> MoveUndo {
        let moved = self.get(from);
        let undo = MoveUndo {
            from,
            to,
            moved,
            captured: self.get(to),
            castling: *self.castling(),
            warned: self.warned(),
        };

        self.update_castling_rights(from, to, moved);

        if to.is_castle() {
            let (rook_from, rook_to) = castling_rook(to);
            let rook = self.get(rook_from);

            self.clear(from);
            self.clear(rook_from);
            self.set(to.landing(), moved);
            self.set(rook_to, rook);
        } else {
            self.set(to, moved);
            self.clear(from);
        }

        undo
    }

    /// Returns `true` if the move recorded in `undo` left a pawn on its promotion row.
    #[inline(always)]
    pub fn is_promotion(&self, undo: &MoveUndo) -> bool {
        let piece = self.get(undo.to);
        piece.is_kind(PieceKind::Pawn)
            && piece
                .color()
                .is_some_and(|color| undo.to.y == color.promotion_row())
    }

    /// Replaces the pawn at `at` with a piece of the same color and of the provided kind.
    ///
    /// # Panics
    /// If `kind` is not a Queen, Rook, Knight, or Bishop, or if there is no piece at `at`.
    pub fn promote(&mut self, at: Coordinate, kind: PieceKind) {
        assert!(
            kind.is_promotion(),
            "a pawn cannot promote to a {kind}; promotion choosers must return a queen, rook, knight, or bishop"
        );
        let color = self
            .get(at)
            .color()
            .expect("promotion requires a piece on the promotion square");

        self.set(at, Piece::new(color, kind));
    }

    /// Sets the warned square to the King of `mover`'s opponent if it is in check, and clears it otherwise.
    pub fn refresh_warning(&mut self, mover: Color) {
        let opponent = mover.opponent();
        let warned = if is_in_check(opponent, self) {
            self.king(opponent)
        } else {
            Coordinate::ABSENT
        };

        self.set_warned(warned);
    }

    /// Takes back a move, restoring every square, castling right, and the warned square.
    pub fn undo_move(&mut self, undo: MoveUndo) {
        if undo.is_castle() {
            let (rook_from, rook_to) = castling_rook(undo.to);
            let rook = Piece::new(undo.mover(), PieceKind::Rook);

            self.clear(undo.to.landing());
            self.clear(rook_to);
            self.set(rook_from, rook);
            self.set(undo.from, undo.moved);
        } else {
            self.set(undo.from, undo.moved);
            self.set(undo.to, undo.captured);
        }

        *self.castling_mut() = undo.castling;
        self.set_warned(undo.warned);
    }

    fn update_castling_rights(&mut self, from: Coordinate, to: Coordinate, moved: Piece) {
        let rights = self.castling_mut();

        for color in Color::all() {
            let row = color.back_row();
            let touches = |x| from == Coordinate::new(x, row) || to == Coordinate::new(x, row);

            if touches(0) {
                rights.remove_low(color);
            }
            if touches(7) {
                rights.remove_high(color);
            }
        }

        if moved.is_kind(PieceKind::King) {
            if let Some(color) = moved.color() {
                rights.remove(color);
            }
        }
    }
}

/// The rook's `(from, to)` squares for a castling sentinel.
#[inline(always)]
pub const fn castling_rook(to: Coordinate) -> (Coordinate, Coordinate) {
    if to.is_castle_high() {
        (Coordinate::new(7, to.y), Coordinate::new(5, to.y))
    } else {
        (Coordinate::new(0, to.y), Coordinate::new(3, to.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{generate_moves, MoveFilter};

    fn sq(square: &str) -> Coordinate {
        square.parse().unwrap()
    }

    fn castle_ready() -> Board {
        let mut board = Board::default();
        for square in ["b1", "c1", "d1", "f1", "g1", "b8", "c8", "d8", "f8", "g8"] {
            board.clear(sq(square));
        }
        board
    }

    #[test]
    fn test_quiet_move_and_undo() {
        let mut board = Board::default();
        let before = board;

        let undo = board.apply_move(sq("e2"), sq("e4"), &mut Promote::default());
        assert_eq!(board.get(sq("e4")), Piece::WhitePawn);
        assert_eq!(board.get(sq("e2")), Piece::Empty);

        board.undo_move(undo);
        assert_eq!(board, before);
    }

    #[test]
    fn test_castle_high_relocates_king_and_rook() {
        let mut board = castle_ready();
        let before = board;

        let undo = board.apply_move(sq("e1"), Coordinate::castle_high(7), &mut Promote::default());
        assert_eq!(board.get(sq("g1")), Piece::WhiteKing);
        assert_eq!(board.get(sq("f1")), Piece::WhiteRook);
        assert_eq!(board.get(sq("e1")), Piece::Empty);
        assert_eq!(board.get(sq("h1")), Piece::Empty);
        assert!(!board.castling().white_high && !board.castling().white_low);
        assert!(board.castling().black_high && board.castling().black_low);

        board.undo_move(undo);
        assert_eq!(board, before);
    }

    #[test]
    fn test_castle_low_relocates_king_and_rook() {
        let mut board = castle_ready();
        let before = board;

        let undo = board.apply_move(sq("e8"), Coordinate::castle_low(0), &mut Promote::default());
        assert_eq!(board.get(sq("c8")), Piece::BlackKing);
        assert_eq!(board.get(sq("d8")), Piece::BlackRook);
        assert_eq!(board.get(sq("a8")), Piece::Empty);
        assert_eq!(board.get(sq("e8")), Piece::Empty);
        assert!(!board.castling().black_low && !board.castling().black_high);

        board.undo_move(undo);
        assert_eq!(board, before);
    }

    #[test]
    fn test_rook_moves_and_captures_clear_rights() {
        let mut board = castle_ready();
        board.apply_move(sq("h1"), sq("g1"), &mut Promote::default());
        assert!(!board.castling().white_high);
        assert!(board.castling().white_low);

        // Capturing a rook on its home square removes that right too.
        let mut board = castle_ready();
        board.set(sq("b6"), Piece::WhiteKnight);
        board.apply_move(sq("b6"), sq("a8"), &mut Promote::default());
        assert!(!board.castling().black_low);
        assert!(board.castling().black_high);
    }

    #[test]
    fn test_promotion_asks_chooser_once() {
        let mut board = Board::empty();
        board.set(sq("a1"), Piece::WhiteKing);
        board.set(sq("h3"), Piece::BlackKing);
        board.set(sq("b7"), Piece::WhitePawn);

        let mut calls = 0;
        let mut chooser = |color: Color| {
            calls += 1;
            assert_eq!(color, Color::White);
            PieceKind::Knight
        };

        let undo = board.apply_move(sq("b7"), sq("b8"), &mut chooser);
        assert_eq!(calls, 1);
        assert_eq!(board.get(sq("b8")), Piece::WhiteKnight);

        board.undo_move(undo);
        assert_eq!(board.get(sq("b7")), Piece::WhitePawn);
        assert_eq!(board.get(sq("b8")), Piece::Empty);
    }

    #[test]
    fn test_non_promotion_never_asks() {
        let mut board = Board::default();
        let mut chooser = |_: Color| -> PieceKind { panic!("no promotion on e2e4") };
        board.apply_move(sq("e2"), sq("e4"), &mut chooser);
    }

    #[test]
    #[should_panic]
    fn test_promoting_to_king_panics() {
        let mut board = Board::empty();
        board.set(sq("a1"), Piece::WhiteKing);
        board.set(sq("h3"), Piece::BlackKing);
        board.set(sq("b7"), Piece::WhitePawn);
        board.apply_move(sq("b7"), sq("b8"), &mut Promote(PieceKind::King));
    }

    #[test]
    fn test_warning_follows_checks() {
        let mut board = Board::empty();
        board.set(sq("e1"), Piece::WhiteKing);
        board.set(sq("e8"), Piece::BlackKing);
        board.set(sq("a2"), Piece::WhiteRook);

        let undo = board.apply_move(sq("a2"), sq("a8"), &mut Promote::default());
        assert_eq!(board.warned(), sq("e8"));
        assert!(board.is_warned(Color::Black));

        // Black steps out of check; the mark is cleared.
        let moves = generate_moves(&board, sq("e8"), MoveFilter::Legal);
        assert!(moves.contains(&sq("e7")));
        let second = board.apply_move(sq("e8"), sq("e7"), &mut Promote::default());
        assert!(!board.warned().is_valid());

        board.undo_move(second);
        assert_eq!(board.warned(), sq("e8"));
        board.undo_move(undo);
        assert!(!board.warned().is_valid());
    }

    #[test]
    fn test_castling_can_give_check() {
        let mut board = Board::empty();
        board.set(sq("e1"), Piece::WhiteKing);
        board.set(sq("h1"), Piece::WhiteRook);
        board.set(sq("f8"), Piece::BlackKing);
        board.castling_mut().white_high = true;

        board.apply_move(sq("e1"), Coordinate::castle_high(7), &mut Promote::default());
        assert_eq!(board.get(sq("f1")), Piece::WhiteRook);
        assert_eq!(board.warned(), sq("f8"));
    }
}
