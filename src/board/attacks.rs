/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{in_bounds, Board, Color, Coordinate, Piece, PieceKind};

/// Steps along files and rows, as `(dx, dy)`.
pub const ORTHOGONALS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Steps along diagonals, as `(dx, dy)`.
pub const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Every step a King (or Queen) can take, orthogonals first.
pub const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Knight jumps, as `(dx, dy)`.
pub const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, 1),
    (-2, -1),
    (2, 1),
    (2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// Returns `true` if `color`'s King is attacked by any enemy piece.
///
/// If `color` has no King on the board, it cannot be in check, so this returns `false`.
/// Callers that care about a captured King should ask [`Board::is_game_over`].
pub fn is_in_check(color: Color, board: &Board) -> bool {
    let king = board.king(color);
    if !king.is_valid() {
        return false;
    }

    is_attacked_by(king, color.opponent(), board)
}

/// Returns `true` if any piece of color `attacker` attacks `square`.
pub fn is_attacked_by(square: Coordinate, attacker: Color, board: &Board) -> bool {
    let enemy = |kind| Piece::new(attacker, kind);

    // Pawns attack diagonally toward the side they are advancing on,
    // so look one row "behind" them from the square's point of view.
    let pawn = enemy(PieceKind::Pawn);
    let behind = -attacker.forward();
    if [-1, 1]
        .into_iter()
        .any(|dx| board.get(square.offset(dx, behind)) == pawn)
    {
        return true;
    }

    let rook = enemy(PieceKind::Rook);
    let queen = enemy(PieceKind::Queen);
    if ORTHOGONALS.into_iter().any(|(dx, dy)| {
        let blocker = first_blocker(board, square, dx, dy);
        blocker == rook || blocker == queen
    }) {
        return true;
    }

    let bishop = enemy(PieceKind::Bishop);
    if DIAGONALS.into_iter().any(|(dx, dy)| {
        let blocker = first_blocker(board, square, dx, dy);
        blocker == bishop || blocker == queen
    }) {
        return true;
    }

    let knight = enemy(PieceKind::Knight);
    if KNIGHT_JUMPS
        .into_iter()
        .any(|(dx, dy)| board.get(square.offset(dx, dy)) == knight)
    {
        return true;
    }

    let king = enemy(PieceKind::King);
    ALL_DIRECTIONS
        .into_iter()
        .any(|(dx, dy)| board.get(square.offset(dx, dy)) == king)
}

/// Walks from `from` in steps of `(dx, dy)` and returns the first piece encountered,
/// or [`Piece::Empty`] if the ray reaches the edge of the board.
#[inline(always)]
fn first_blocker(board: &Board, from: Coordinate, dx: i8, dy: i8) -> Piece {
    let (mut x, mut y) = (from.x + dx, from.y + dy);
    while in_bounds(x, y) {
        let piece = board.at(x, y);
        if !piece.is_empty() {
            return piece;
        }
        x += dx;
        y += dy;
    }

    Piece::Empty
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(pieces: &[(&str, Piece)]) -> Board {
        let mut board = Board::empty();
        for (square, piece) in pieces {
            board.set(square.parse().unwrap(), *piece);
        }
        board
    }

    #[test]
    fn test_rook_on_open_file_checks() {
        // King on (4,0), rook on (4,7), nothing between.
        let mut board = Board::empty();
        board.set(Coordinate::new(4, 0), Piece::BlackKing);
        board.set(Coordinate::new(4, 7), Piece::WhiteRook);
        assert!(is_in_check(Color::Black, &board));

        // A blocker of either color breaks the ray.
        board.set(Coordinate::new(4, 3), Piece::BlackPawn);
        assert!(!is_in_check(Color::Black, &board));
        board.set(Coordinate::new(4, 3), Piece::WhiteKnight);
        assert!(!is_in_check(Color::Black, &board));
    }

    #[test]
    fn test_pawn_checks_only_forward() {
        // A Black pawn on d2 attacks e1 (it captures toward row 7).
        let board = board_with(&[("e1", Piece::WhiteKing), ("d2", Piece::BlackPawn)]);
        assert!(is_in_check(Color::White, &board));

        // A Black pawn on d1 does not attack e2 because pawns never capture backwards.
        let board = board_with(&[("e2", Piece::WhiteKing), ("d1", Piece::BlackPawn)]);
        assert!(!is_in_check(Color::White, &board));

        // A White pawn on f7 attacks e8.
        let board = board_with(&[("e8", Piece::BlackKing), ("f7", Piece::WhitePawn)]);
        assert!(is_in_check(Color::Black, &board));

        // Friendly pawns never check.
        let board = board_with(&[("e1", Piece::WhiteKing), ("d2", Piece::WhitePawn)]);
        assert!(!is_in_check(Color::White, &board));
    }

    #[test]
    fn test_diagonal_knight_and_king_checks() {
        let board = board_with(&[("e1", Piece::WhiteKing), ("a5", Piece::BlackBishop)]);
        assert!(is_in_check(Color::White, &board));

        let board = board_with(&[("e1", Piece::WhiteKing), ("a5", Piece::BlackRook)]);
        assert!(!is_in_check(Color::White, &board));

        let board = board_with(&[("e1", Piece::WhiteKing), ("h4", Piece::BlackQueen)]);
        assert!(is_in_check(Color::White, &board));

        let board = board_with(&[("e1", Piece::WhiteKing), ("f3", Piece::BlackKnight)]);
        assert!(is_in_check(Color::White, &board));

        let board = board_with(&[("e1", Piece::WhiteKing), ("f2", Piece::BlackKing)]);
        assert!(is_in_check(Color::White, &board));
        assert!(is_in_check(Color::Black, &board));
    }

    #[test]
    fn test_missing_king_is_not_in_check() {
        let board = board_with(&[("a1", Piece::BlackQueen)]);
        assert!(!is_in_check(Color::White, &board));
    }

    #[test]
    fn test_start_position_has_no_checks() {
        let board = Board::default();
        assert!(!is_in_check(Color::White, &board));
        assert!(!is_in_check(Color::Black, &board));
    }
}
