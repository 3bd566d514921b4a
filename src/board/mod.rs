/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Attack detection; whether a King is in check.
mod attacks;

/// Board coordinates and the sentinels used for castling and absence.
mod coordinate;

/// Move generation for individual pieces.
mod movegen;

/// Making and unmaking moves on a [`Board`].
mod moves;

/// Performance testing of move generation.
mod perft;

/// Colors, piece kinds, and the signed piece encoding.
mod piece;

/// Per-side lists of piece locations, kept in sync with a [`Board`] during search.
mod piece_list;

/// The board itself, plus castling rights and the warned King.
mod state;

pub use attacks::*;
pub use coordinate::*;
pub use movegen::*;
pub use moves::*;
pub use perft::*;
pub use piece::*;
pub use piece_list::*;
pub use state::*;
