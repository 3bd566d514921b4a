/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use arrayvec::ArrayVec;

use super::{
    in_bounds, is_in_check, Board, Color, Coordinate, Piece, PieceKind, ALL_DIRECTIONS,
    DIAGONALS, KNIGHT_JUMPS, ORTHOGONALS,
};

/// Maximum number of destinations a single piece can have.
///
/// A Queen in the middle of an empty board reaches 27 squares; a King has 8 steps and 2 castles.
pub const MAX_PIECE_MOVES: usize = 32;

/// Destinations of a single piece.
pub type MoveList = ArrayVec<Coordinate, MAX_PIECE_MOVES>;

/// Whether generated moves must keep the mover's own King out of check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MoveFilter {
    /// Only moves that do not leave the mover's King in check.
    #[default]
    Legal,

    /// Every move the piece could make, ignoring the safety of its own King.
    PseudoLegal,
}

/// Generates all destinations for the piece at `from`.
///
/// Castling moves are reported with a sentinel destination; see [`Coordinate::castle_high`].
/// An empty square has no moves.
///
/// With [`MoveFilter::Legal`], every candidate is tried on a scratch copy of `board`
/// and discarded if it leaves the mover in check.
pub fn generate_moves(board: &Board, from: Coordinate, filter: MoveFilter) -> MoveList {
    let mut moves = MoveList::new();
    let piece = board.get(from);
    let (Some(color), Some(kind)) = (piece.color(), piece.kind()) else {
        return moves;
    };

    match kind {
        PieceKind::Pawn => pawn_moves(board, from, color, &mut moves),
        PieceKind::Rook => slider_moves(board, from, piece, &ORTHOGONALS, &mut moves),
        PieceKind::Bishop => slider_moves(board, from, piece, &DIAGONALS, &mut moves),
        PieceKind::Queen => slider_moves(board, from, piece, &ALL_DIRECTIONS, &mut moves),
        PieceKind::Knight => step_moves(board, from, piece, &KNIGHT_JUMPS, &mut moves),
        PieceKind::King => {
            castling_moves(board, from, color, &mut moves);
            step_moves(board, from, piece, &ALL_DIRECTIONS, &mut moves);
        }
    }

    if filter == MoveFilter::Legal {
        let mut scratch = *board;
        moves.retain(|to| leaves_king_safe(&mut scratch, from, *to, color));
    }

    moves
}

/// Collects every legal `(from, to)` pair available to `color`.
pub fn legal_moves_for(board: &Board, color: Color) -> Vec<(Coordinate, Coordinate)> {
    board
        .pieces()
        .filter(|(_, piece)| piece.is_color(color))
        .flat_map(|(from, _)| {
            generate_moves(board, from, MoveFilter::Legal)
                .into_iter()
                .map(move |to| (from, to))
        })
        .collect()
}

/// Returns `true` if `color` has at least one legal move.
pub fn has_legal_moves(board: &Board, color: Color) -> bool {
    board
        .pieces()
        .filter(|(_, piece)| piece.is_color(color))
        .any(|(from, _)| !generate_moves(board, from, MoveFilter::Legal).is_empty())
}

/// Returns `true` if moving from `from` to `to` captures an enemy piece.
#[inline(always)]
pub fn is_capture(board: &Board, to: Coordinate, mover: Color) -> bool {
    board.get(to).is_color(mover.opponent())
}

/// Provisionally makes the move on `scratch`, checks the mover's King, and restores `scratch`.
///
/// Only the moving piece is relocated. For castling, that is the King onto its landing square.
fn leaves_king_safe(scratch: &mut Board, from: Coordinate, to: Coordinate, color: Color) -> bool {
    let landing = to.landing();
    let moving = scratch.get(from);
    let captured = scratch.get(landing);

    scratch.set(landing, moving);
    scratch.clear(from);
    let safe = !is_in_check(color, scratch);
    scratch.set(from, moving);
    scratch.set(landing, captured);

    safe
}

fn pawn_moves(board: &Board, from: Coordinate, color: Color, moves: &mut MoveList) {
    let dy = color.forward();
    let (x, y) = (from.x, from.y + dy);
    if !in_bounds(x, y) {
        return;
    }

    if board.is_empty(x, y) {
        moves.push(Coordinate::new(x, y));

        let double = y + dy;
        if from.y == color.pawn_row() && in_bounds(x, double) && board.is_empty(x, double) {
            moves.push(Coordinate::new(x, double));
        }
    }

    for dx in [-1, 1] {
        if in_bounds(x + dx, y) && board.at(x + dx, y).is_color(color.opponent()) {
            moves.push(Coordinate::new(x + dx, y));
        }
    }
}

/// Casts rays from `from`, stopping at the edge, before a friendly piece, or on an enemy piece.
fn slider_moves(
    board: &Board,
    from: Coordinate,
    piece: Piece,
    directions: &[(i8, i8)],
    moves: &mut MoveList,
) {
    for &(dx, dy) in directions {
        let (mut x, mut y) = (from.x + dx, from.y + dy);
        while in_bounds(x, y) {
            let target = board.at(x, y);
            if target.is_same_color(piece) {
                break;
            }

            moves.push(Coordinate::new(x, y));
            if !target.is_empty() {
                break;
            }

            x += dx;
            y += dy;
        }
    }
}

/// Single steps to every on-board square not occupied by a friendly piece.
fn step_moves(
    board: &Board,
    from: Coordinate,
    piece: Piece,
    offsets: &[(i8, i8)],
    moves: &mut MoveList,
) {
    for &(dx, dy) in offsets {
        let (x, y) = (from.x + dx, from.y + dy);
        if in_bounds(x, y) && !board.at(x, y).is_same_color(piece) {
            moves.push(Coordinate::new(x, y));
        }
    }
}

/// Castling toward either rook, if the right remains, the path is clear, and the King is not in check.
///
/// Whether the King passes through an attacked square is not examined.
fn castling_moves(board: &Board, from: Coordinate, color: Color, moves: &mut MoveList) {
    let row = color.back_row();
    if from != Coordinate::new(4, row) || board.is_warned(color) {
        return;
    }

    let rights = board.castling();
    if rights.low(color) && (1..4).all(|x| board.is_empty(x, row)) {
        moves.push(Coordinate::castle_low(row));
    }
    if rights.high(color) && (5..7).all(|x| board.is_empty(x, row)) {
        moves.push(Coordinate::castle_high(row));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(square: &str) -> Coordinate {
        square.parse().unwrap()
    }

    fn sorted(moves: MoveList) -> Vec<String> {
        let mut moves = moves.into_iter().map(|c| c.to_string()).collect::<Vec<_>>();
        moves.sort();
        moves
    }

    #[test]
    fn test_startpos_moves() {
        let board = Board::default();
        assert_eq!(legal_moves_for(&board, Color::White).len(), 20);
        assert_eq!(legal_moves_for(&board, Color::Black).len(), 20);

        assert_eq!(
            sorted(generate_moves(&board, sq("g1"), MoveFilter::Legal)),
            ["f3", "h3"]
        );
        assert_eq!(
            sorted(generate_moves(&board, sq("e7"), MoveFilter::Legal)),
            ["e5", "e6"]
        );
        assert!(generate_moves(&board, sq("e1"), MoveFilter::Legal).is_empty());
        assert!(generate_moves(&board, sq("e4"), MoveFilter::Legal).is_empty());
    }

    #[test]
    fn test_pawn_double_push_needs_both_squares() {
        let mut board = Board::default();
        board.set(sq("e3"), Piece::BlackKnight);
        assert_eq!(
            sorted(generate_moves(&board, sq("e2"), MoveFilter::Legal)),
            Vec::<String>::new()
        );
        assert_eq!(
            sorted(generate_moves(&board, sq("d2"), MoveFilter::Legal)),
            ["d3", "d4", "e3"]
        );

        board.clear(sq("e3"));
        board.set(sq("e4"), Piece::BlackKnight);
        assert_eq!(
            sorted(generate_moves(&board, sq("e2"), MoveFilter::Legal)),
            ["e3"]
        );
    }

    #[test]
    fn test_slider_stops_on_pieces() {
        let mut board = Board::empty();
        board.set(sq("a1"), Piece::WhiteKing);
        board.set(sq("h8"), Piece::BlackKing);
        board.set(sq("d4"), Piece::WhiteRook);
        board.set(sq("d6"), Piece::BlackPawn);
        board.set(sq("f4"), Piece::WhitePawn);

        assert_eq!(
            sorted(generate_moves(&board, sq("d4"), MoveFilter::Legal)),
            ["a4", "b4", "c4", "d1", "d2", "d3", "d5", "d6", "e4"]
        );
    }

    #[test]
    fn test_legal_filter_removes_pinned_moves() {
        let mut board = Board::empty();
        board.set(sq("e1"), Piece::WhiteKing);
        board.set(sq("e2"), Piece::WhiteBishop);
        board.set(sq("e8"), Piece::BlackRook);
        board.set(sq("a8"), Piece::BlackKing);

        let pseudo = generate_moves(&board, sq("e2"), MoveFilter::PseudoLegal);
        let legal = generate_moves(&board, sq("e2"), MoveFilter::Legal);
        assert!(!pseudo.is_empty());
        assert!(legal.is_empty());

        // The King may not step onto the open file either.
        let king = sorted(generate_moves(&board, sq("e1"), MoveFilter::Legal));
        assert_eq!(king, ["d1", "d2", "f1", "f2"]);
    }

    #[test]
    fn test_castling_preconditions() {
        let mut board = Board::default();
        for square in ["b1", "c1", "d1", "f1", "g1"] {
            board.clear(sq(square));
        }

        let moves = generate_moves(&board, sq("e1"), MoveFilter::Legal);
        assert!(moves.contains(&Coordinate::castle_low(7)));
        assert!(moves.contains(&Coordinate::castle_high(7)));

        // Any piece between King and rook blocks that side.
        board.set(sq("b1"), Piece::WhiteKnight);
        let moves = generate_moves(&board, sq("e1"), MoveFilter::Legal);
        assert!(!moves.contains(&Coordinate::castle_low(7)));
        assert!(moves.contains(&Coordinate::castle_high(7)));

        // A lost right is honored.
        board.castling_mut().remove_high(Color::White);
        let moves = generate_moves(&board, sq("e1"), MoveFilter::Legal);
        assert!(!moves.contains(&Coordinate::castle_high(7)));
    }

    #[test]
    fn test_no_castling_out_of_check() {
        let mut board = Board::default();
        for square in ["f1", "g1", "e2"] {
            board.clear(sq(square));
        }
        board.set(sq("e5"), Piece::BlackRook);
        board.set_warned(sq("e1"));

        let moves = generate_moves(&board, sq("e1"), MoveFilter::PseudoLegal);
        assert!(!moves.contains(&Coordinate::castle_high(7)));
    }

    #[test]
    fn test_castling_through_attacked_square_is_allowed() {
        let mut board = Board::default();
        for square in ["f1", "g1", "f2"] {
            board.clear(sq(square));
        }
        // Rook eyes f1, the square the King crosses; g1 itself is safe.
        board.set(sq("f5"), Piece::BlackRook);

        let moves = generate_moves(&board, sq("e1"), MoveFilter::Legal);
        assert!(moves.contains(&Coordinate::castle_high(7)));
    }

    #[test]
    fn test_capture_detection() {
        let mut board = Board::default();
        board.set(sq("e3"), Piece::BlackPawn);
        assert!(is_capture(&board, sq("e3"), Color::White));
        assert!(!is_capture(&board, sq("e3"), Color::Black));
        assert!(!is_capture(&board, sq("e4"), Color::White));
    }

    /// Checks every piece of every position up to `depth` plies from `board`.
    fn assert_legal_subset_of_pseudo_legal(board: &mut Board, color: Color, depth: usize) {
        for (from, _) in board.pieces().filter(|(_, p)| p.is_color(color)).collect::<Vec<_>>() {
            let legal = generate_moves(board, from, MoveFilter::Legal);
            let pseudo = generate_moves(board, from, MoveFilter::PseudoLegal);

            for &to in &legal {
                assert!(pseudo.contains(&to), "{from}{to} is legal but not pseudo-legal");

                let mut after = *board;
                after.apply_move(from, to, &mut crate::Promote::default());
                assert!(
                    !is_in_check(color, &after),
                    "{from}{to} leaves {color} in check\n{board}"
                );
            }
        }

        if depth == 0 {
            return;
        }

        for (from, to) in legal_moves_for(board, color) {
            let undo = board.apply_move(from, to, &mut crate::Promote::default());
            assert_legal_subset_of_pseudo_legal(board, color.opponent(), depth - 1);
            board.undo_move(undo);
        }
    }

    #[test]
    fn test_legal_moves_are_safe_pseudo_legal_moves() {
        assert_legal_subset_of_pseudo_legal(&mut Board::default(), Color::White, 2);

        // Open lines, castling on both wings, a pinned knight and a pawn about to promote.
        let mut board = Board::default();
        for square in ["b1", "c1", "d1", "f1", "g1", "d2", "e7", "f8", "g8", "a7"] {
            board.clear(sq(square));
        }
        board.set(sq("b4"), Piece::BlackBishop);
        board.set(sq("d2"), Piece::WhiteKnight);
        board.set(sq("a7"), Piece::WhitePawn);
        board.set(sq("h4"), Piece::WhiteQueen);
        assert!(!is_in_check(Color::White, &board));
        assert!(generate_moves(&board, sq("d2"), MoveFilter::Legal).is_empty());
        assert_legal_subset_of_pseudo_legal(&mut board, Color::White, 2);
        assert_legal_subset_of_pseudo_legal(&mut board, Color::Black, 2);
    }
}
