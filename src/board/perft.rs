/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{legal_moves_for, Board, Color, Promote};

/// Perform a perft at the specified depth, counting the positions reachable by `color` moving first.
///
/// This performs bulk counting, meaning that, at depth 1, it returns the number of available moves,
/// rather than making them, recursing again, and returning 1 for each terminal case.
/// If you do *not* want to use bulk counting, use [`perft_generic`].
///
/// Pawns always promote to a Queen, so each promotion counts as a single move.
#[inline(always)]
pub fn perft(board: &mut Board, color: Color, depth: usize) -> u64 {
    perft_generic::<true, false>(board, color, depth)
}

/// Perform a splitperft at the specified depth, printing the number of nodes reachable after each root move.
#[inline(always)]
pub fn splitperft(board: &mut Board, color: Color, depth: usize) -> u64 {
    perft_generic::<true, true>(board, color, depth)
}

/// Generic version of `perft` that allows you to specify whether to perform bulk counting and splitperft.
///
/// If `BULK` is set to `true`, this will perform bulk counting.
/// If `SPLIT` is set to `true`, this will perform a splitperft.
///
/// `board` is restored to its original state before this returns.
pub fn perft_generic<const BULK: bool, const SPLIT: bool>(
    board: &mut Board,
    color: Color,
    depth: usize,
) -> u64 {
    // Bulk counting; no need to recurse again just to apply a singular move and return 1.
    if BULK && !SPLIT && depth == 1 {
        return legal_moves_for(board, color).len() as u64;
    }
    // Recursion limit; return 1, since we're fathoming this node.
    else if depth == 0 {
        return 1;
    }

    legal_moves_for(board, color)
        .into_iter()
        .fold(0, |nodes, (from, to)| {
            let undo = board.apply_move(from, to, &mut Promote::default());
            let new_nodes = perft_generic::<BULK, false>(board, color.opponent(), depth - 1);
            board.undo_move(undo);

            if SPLIT {
                println!("{from}{}\t{new_nodes}", to.landing());
            }

            nodes + new_nodes
        })
}
