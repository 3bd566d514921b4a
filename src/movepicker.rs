/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use arrayvec::ArrayVec;

use crate::{is_capture, Board, Color, Coordinate, MoveList, MAX_PIECE_MOVES};

/// Yields a piece's destinations best-first, by lazy selection.
///
/// Moves with equal scores come out in the order they were generated,
/// so ordering captures first never reshuffles the quiet moves behind them.
pub struct MovePicker {
    moves: MoveList,
    scores: ArrayVec<i32, MAX_PIECE_MOVES>,
    current: usize,
}

impl MovePicker {
    pub fn new(moves: MoveList, score_fn: impl Fn(&Coordinate) -> i32) -> Self {
        let scores = moves.iter().map(score_fn).collect();

        Self {
            moves,
            scores,
            current: 0,
        }
    }

    /// Captures before quiet moves; nothing else is distinguished.
    pub fn captures_first(moves: MoveList, board: &Board, mover: Color) -> Self {
        Self::new(moves, |to| is_capture(board, *to, mover) as i32)
    }
}

impl Iterator for MovePicker {
    type Item = (Coordinate, i32);

    fn next(&mut self) -> Option<Self::Item> {
        // No more moves left
        if self.current >= self.moves.len() {
            return None;
        }

        // Find the first index holding the highest remaining score
        let mut best_index = self.current;
        let mut best_score = self.scores[best_index];
        for i in (self.current + 1)..self.moves.len() {
            if self.scores[i] > best_score {
                best_index = i;
                best_score = self.scores[i];
            }
        }

        // Shift rather than swap, so the skipped moves keep their relative order
        if best_index != self.current {
            self.moves[self.current..=best_index].rotate_right(1);
            self.scores[self.current..=best_index].rotate_right(1);
        }

        let mv = self.moves[self.current];
        let score = self.scores[self.current];

        // Increment for next call
        self.current += 1;

        Some((mv, score))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.moves.len() - self.current;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{generate_moves, MoveFilter, Piece};

    fn sq(square: &str) -> Coordinate {
        square.parse().unwrap()
    }

    #[test]
    fn test_picker_is_stable() {
        let moves = ["a1", "b1", "c1", "d1", "e1"]
            .into_iter()
            .map(sq)
            .collect::<MoveList>();
        let scores = [0, 2, 0, 2, 1];

        let picked = MovePicker::new(moves.clone(), |to| {
            scores[moves.iter().position(|c| c == to).unwrap()]
        })
        .map(|(mv, _)| mv.to_string())
        .collect::<Vec<_>>();

        assert_eq!(picked, ["b1", "d1", "e1", "a1", "c1"]);
    }

    #[test]
    fn test_captures_come_first() {
        let mut board = Board::empty();
        board.set(sq("a1"), Piece::WhiteKing);
        board.set(sq("h8"), Piece::BlackKing);
        board.set(sq("d4"), Piece::WhiteRook);
        board.set(sq("d7"), Piece::BlackPawn);
        board.set(sq("b4"), Piece::BlackKnight);

        let moves = generate_moves(&board, sq("d4"), MoveFilter::Legal);
        let generated = moves.clone();
        let picked = MovePicker::captures_first(moves, &board, Color::White)
            .map(|(mv, _)| mv)
            .collect::<Vec<_>>();

        assert_eq!(picked.len(), generated.len());
        let (captures, quiets) = picked.split_at(2);
        assert!(captures.contains(&sq("d7")) && captures.contains(&sq("b4")));

        // Quiet moves are untouched relative to each other.
        let expected_quiets = generated
            .iter()
            .copied()
            .filter(|&to| !is_capture(&board, to, Color::White))
            .collect::<Vec<_>>();
        assert_eq!(quiets, expected_quiets.as_slice());
    }
}
