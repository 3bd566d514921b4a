/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{castling_rook, Board, Color, Coordinate, BOARD_SIZE, SCAN_ORDER};

/// Where each side's pieces stand, so the search need not scan all 64 squares every ply.
///
/// Entries are kept in a fixed order: center files first, and within a file
/// each side's pawns before its back-rank pieces.
///
/// Captured pieces are never removed. Their entries keep pointing at the square they were
/// captured on and are skipped by [`PieceLists::is_live`], which keeps undo to a couple of writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceLists([Vec<Coordinate>; Color::COUNT]);

/// What [`PieceLists::make_move`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListUndo {
    color: Color,
    index: usize,
    from: Coordinate,

    /// Index and home square of the castling rook's entry, if the move was a castle.
    rook: Option<(usize, Coordinate)>,
}

impl PieceLists {
    /// Collects the pieces of both sides from `board`.
    pub fn new(board: &Board) -> Self {
        let mut lists: [Vec<Coordinate>; Color::COUNT] = Default::default();

        for x in SCAN_ORDER {
            for y in 0..BOARD_SIZE {
                // White is scanned top-down and Black bottom-up, so that pawns come first.
                let white = Coordinate::new(x, y);
                if board.get(white).is_white() {
                    lists[Color::White.index()].push(white);
                }

                let black = Coordinate::new(x, BOARD_SIZE - y - 1);
                if board.get(black).is_black() {
                    lists[Color::Black.index()].push(black);
                }
            }
        }

        Self(lists)
    }

    /// All entries for `color`, including stale ones.
    #[inline(always)]
    pub fn of(&self, color: Color) -> &[Coordinate] {
        &self.0[color.index()]
    }

    /// Returns `true` if entry `index` of `color` refers to one of its pieces on `board`.
    ///
    /// An entry is stale if its square no longer holds a piece of `color`,
    /// or if an earlier entry refers to the same square.
    pub fn is_live(&self, board: &Board, color: Color, index: usize) -> bool {
        let list = self.of(color);
        let coord = list[index];

        board.get(coord).is_color(color) && !list[..index].contains(&coord)
    }

    /// Moves entry `index` of `color` to the destination of `to`.
    ///
    /// For castling, the King's entry lands on its real square and the rook's entry follows it.
    pub fn make_move(&mut self, color: Color, index: usize, to: Coordinate) -> ListUndo {
        let list = &mut self.0[color.index()];
        let from = list[index];
        list[index] = to.landing();

        let rook = if to.is_castle() {
            let (rook_from, rook_to) = castling_rook(to);
            list.iter().position(|&c| c == rook_from).map(|i| {
                list[i] = rook_to;
                (i, rook_from)
            })
        } else {
            None
        };

        ListUndo {
            color,
            index,
            from,
            rook,
        }
    }

    /// Restores the entries changed by [`PieceLists::make_move`].
    pub fn undo_move(&mut self, undo: ListUndo) {
        let list = &mut self.0[undo.color.index()];
        list[undo.index] = undo.from;

        if let Some((i, rook_from)) = undo.rook {
            list[i] = rook_from;
        }
    }
}
