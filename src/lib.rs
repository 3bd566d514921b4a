/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Board representation, move generation, and move execution.
mod board;

/// Command-line arguments and the commands accepted at the prompt.
mod cli;

/// Code related to the engine's functionality, such as user input handling.
mod engine;

/// A game in progress: whose turn it is, and how it ended.
mod game;

/// Ordering of moves during search.
mod movepicker;

/// Material scores and the bounds of the search window.
mod score;

/// Main engine logic; all search related code.
mod search;

pub use board::*;
pub use cli::*;
pub use engine::*;
pub use game::*;
pub use movepicker::*;
pub use score::*;
pub use search::*;
