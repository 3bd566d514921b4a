/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Deref};

use anyhow::{bail, Result};
use tracing::info;

use crate::{
    generate_moves, has_legal_moves, is_in_check, legal_moves_for, Board, Color, Coordinate,
    MoveFilter, MoveList, MoveUndo, Promote, PromotionChooser, Search, SearchConfig, SearchResult,
};

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    /// The side to move is in check and has no legal moves.
    Checkmate { winner: Color },

    /// The side to move is not in check but has no legal moves.
    Stalemate,
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkmate { winner } => write!(f, "Checkmate. {} wins", winner.name()),
            Self::Stalemate => write!(f, "Stalemate. The game is drawn"),
        }
    }
}

/// A game of chess: a [`Board`] plus whose turn it is.
///
/// Every move made through a [`Game`] is checked for legality, unlike moves applied to a [`Board`] directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Game {
    board: Board,

    side_to_move: Color,

    /// The squares the most recent move went from and to.
    last_move: Option<(Coordinate, Coordinate)>,
}

impl Game {
    /// Creates a new [`Game`] from `board`, with `side_to_move` to play first.
    #[inline(always)]
    pub const fn new(board: Board, side_to_move: Color) -> Self {
        Self {
            board,
            side_to_move,
            last_move: None,
        }
    }

    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// The most recent move played, with castling shown as the King's landing square.
    #[inline(always)]
    pub const fn last_move(&self) -> Option<(Coordinate, Coordinate)> {
        self.last_move
    }

    /// Returns `true` if the side to move is in check.
    #[inline(always)]
    pub fn is_in_check(&self) -> bool {
        is_in_check(self.side_to_move, &self.board)
    }

    /// All legal moves of the side to move.
    #[inline(always)]
    pub fn legal_moves(&self) -> Vec<(Coordinate, Coordinate)> {
        legal_moves_for(&self.board, self.side_to_move)
    }

    /// Legal destinations of the piece on `square`, which must belong to the side to move.
    pub fn legal_moves_from(&self, square: Coordinate) -> Result<MoveList> {
        let piece = self.board.get(square);
        if piece.is_empty() {
            bail!("There is no piece on {square}");
        }
        if !piece.is_color(self.side_to_move) {
            bail!(
                "The {} on {square} does not belong to {}, who is to move",
                piece.kind().map_or("piece", |kind| kind.name()),
                self.side_to_move
            );
        }

        Ok(generate_moves(&self.board, square, MoveFilter::Legal))
    }

    /// Finds the generated destination that moving from `from` onto the square `to` corresponds to.
    ///
    /// A King moving two files along its back rank is understood as castling.
    pub fn resolve(&self, from: Coordinate, to: Coordinate) -> Result<Coordinate> {
        let moves = self.legal_moves_from(from)?;

        if moves.contains(&to) {
            return Ok(to);
        }

        if let Some(castle) = moves
            .iter()
            .copied()
            .find(|dest| dest.is_castle() && dest.landing() == to)
        {
            return Ok(castle);
        }

        bail!("Illegal move: {from} cannot move to {to}")
    }

    /// Plays `from -> to` for the side to move, asking `chooser` if a pawn promotes.
    ///
    /// `to` may be a square or a castling sentinel.
    pub fn play(
        &mut self,
        from: Coordinate,
        to: Coordinate,
        chooser: &mut impl PromotionChooser,
    ) -> Result<MoveUndo> {
        let to = self.resolve(from, to)?;

        let undo = self.board.apply_move(from, to, chooser);
        info!(color = %self.side_to_move, from = %from, to = %to.landing(), "move played");

        self.last_move = Some((from, to.landing()));
        self.side_to_move = self.side_to_move.opponent();

        if let Some(outcome) = self.outcome() {
            info!(%outcome, "game over");
        }

        Ok(undo)
    }

    /// Searches for the side to move without playing anything.
    pub fn search(&self, config: SearchConfig) -> SearchResult {
        let mut board = self.board;
        Search::new(&mut board, self.side_to_move, config).select_best_move()
    }

    /// Lets the engine choose and play a move for the side to move.
    ///
    /// Returns the search result; its `bestmove` is `None` if there was nothing to play.
    pub fn play_engine_move(&mut self, config: SearchConfig) -> Result<SearchResult> {
        let res = self.search(config);

        if let Some(mv) = res.bestmove {
            let mut chooser = mv.promotion.map_or_else(Promote::default, Promote);
            self.play(mv.from, mv.to, &mut chooser)?;
        }

        Ok(res)
    }

    /// Returns how the game ended, or `None` if the side to move can still play.
    pub fn outcome(&self) -> Option<GameOutcome> {
        if has_legal_moves(&self.board, self.side_to_move) {
            return None;
        }

        Some(if self.is_in_check() {
            GameOutcome::Checkmate {
                winner: self.side_to_move.opponent(),
            }
        } else {
            GameOutcome::Stalemate
        })
    }
}

impl Deref for Game {
    type Target = Board;

    /// A [`Game`] immutably dereferences to its [`Board`], for simplicity.
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.board
    }
}

impl Default for Game {
    /// The standard starting position, White to move.
    #[inline(always)]
    fn default() -> Self {
        Self::new(Board::default(), Color::White)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board)?;
        write!(f, "\n{} to move", self.side_to_move.name())?;
        if let Some((from, to)) = self.last_move {
            write!(f, " (last move {from}{to})")?;
        }

        Ok(())
    }
}
