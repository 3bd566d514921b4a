/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, thread};

use clap::ValueEnum;
use tracing::debug;

use crate::{
    generate_moves, Board, Color, Coordinate, ListUndo, MoveFilter, MovePicker, MoveUndo, Piece,
    PieceKind, PieceLists, Score,
};

/// Default depth of the engine's search, in plies.
pub const DEFAULT_DEPTH: usize = 5;

/// How the search decides what its own promoting pawns become.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum PromotionPolicy {
    /// Always promote to a Queen.
    #[default]
    Dominant,

    /// Search every option and keep the best, preferring the Queen on ties.
    Search,
}

/// A move chosen by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineMove {
    pub from: Coordinate,

    /// Destination, possibly a castling sentinel.
    pub to: Coordinate,

    /// What the pawn became, if this move promoted one.
    pub promotion: Option<PieceKind>,
}

impl fmt::Display for EngineMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.to.is_castle() {
            return write!(f, "{}", self.to);
        }

        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "={}", kind.char().to_ascii_uppercase())?;
        }

        Ok(())
    }
}

/// The result of a search, containing the best move found, score, and total nodes searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchResult {
    /// Number of nodes searched.
    pub nodes: u64,

    /// Best move found during the search.
    pub bestmove: Option<EngineMove>,

    /// Evaluation of the position after `bestmove` is made.
    pub score: Score,
}

impl Default for SearchResult {
    /// A default search result should initialize to a *very bad* value,
    /// since there isn't a move to play.
    #[inline(always)]
    fn default() -> Self {
        Self {
            nodes: 0,
            bestmove: None,
            score: -Score::INF,
        }
    }
}

/// Configuration variables for executing a [`Search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Depth to search, in plies. A depth of `0` searches one ply.
    pub depth: usize,

    /// Which moves are considered below the root. The root always considers only legal moves.
    pub filter: MoveFilter,

    /// How promotions made by the searching side are resolved.
    pub promotion: PromotionPolicy,

    /// Number of threads to split the root moves over.
    pub threads: usize,
}

impl Default for SearchConfig {
    /// A depth-5 search over legal moves, promoting to Queens, on a single thread.
    #[inline(always)]
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            filter: MoveFilter::default(),
            promotion: PromotionPolicy::default(),
            threads: 1,
        }
    }
}

/// Everything needed to take back a move made during search.
#[derive(Debug, Clone, Copy)]
struct Played {
    board: MoveUndo,
    list: ListUndo,
    promotion: Option<PieceKind>,
}

/// A root move: the index of the moving piece's list entry, and where it goes.
type RootMove = (usize, Coordinate, Coordinate);

/// Executes a depth-limited negamax search with alpha-beta pruning for one side.
///
/// The board is mutated in place while searching and is restored exactly before any method returns.
pub struct Search<'a> {
    /// The board to search on.
    board: &'a mut Board,

    /// Locations of both sides' pieces, kept in step with `board`.
    lists: PieceLists,

    /// Side to choose a move for.
    color: Color,

    /// Configuration variables for this instance of the search.
    config: SearchConfig,

    /// Nodes visited so far.
    nodes: u64,
}

impl<'a> Search<'a> {
    /// Construct a new [`Search`] to pick a move for `color` on `board`.
    pub fn new(board: &'a mut Board, color: Color, config: SearchConfig) -> Self {
        let lists = PieceLists::new(board);

        Self {
            board,
            lists,
            color,
            config,
            nodes: 0,
        }
    }

    /// Number of nodes visited so far.
    #[inline(always)]
    pub const fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Picks the best move for the searching side.
    ///
    /// Every legal move is tried in piece-list order. A move replaces the current best only if it
    /// scores strictly higher, so the first of several equally good moves wins.
    ///
    /// If the side has no legal moves, `bestmove` is `None` and `score` is the static evaluation.
    pub fn select_best_move(mut self) -> SearchResult {
        let depth = self.config.depth.max(1);
        debug!(
            color = %self.color,
            depth,
            threads = self.config.threads,
            promotion = ?self.config.promotion,
            "starting search"
        );

        let moves = self.root_moves();
        let mut res = if moves.is_empty() {
            SearchResult {
                score: Score::material(self.board, self.color),
                ..Default::default()
            }
        } else if self.config.threads > 1 {
            self.parallel_root(&moves, depth)
        } else {
            self.sequential_root(&moves, depth)
        };
        res.nodes += self.nodes;

        debug!(
            bestmove = ?res.bestmove.map(|mv| mv.to_string()),
            score = ?res.score,
            nodes = res.nodes,
            "search finished"
        );

        res
    }

    /// Primary location of search logic.
    ///
    /// Uses the [negamax](https://www.chessprogramming.org/Negamax) algorithm with fail-soft alpha-beta pruning.
    /// The returned score is from `color`'s perspective.
    pub fn negamax(&mut self, depth: usize, mut alpha: Score, beta: Score, color: Color) -> Score {
        self.nodes += 1;

        // If we've reached a terminal node, evaluate the position
        if depth == 0 || self.board.is_game_over() {
            return Score::material(self.board, color);
        }

        let mut best = -Score::INF;
        let mut searched = false;

        for index in 0..self.lists.of(color).len() {
            // Captured pieces leave their entries behind
            if !self.lists.is_live(self.board, color, index) {
                continue;
            }

            let from = self.lists.of(color)[index];
            let moves = generate_moves(self.board, from, self.config.filter);

            for (to, _) in MovePicker::captures_first(moves, self.board, color) {
                let played = self.make(color, index, from, to, depth);
                let score = -self.negamax(depth - 1, -beta, -alpha, color.opponent());
                self.unmake(played);

                searched = true;
                best = best.max(score);
                alpha = alpha.max(best);
                if beta <= alpha {
                    return best;
                }
            }
        }

        // Nothing to play: fall back to the material balance, as at a leaf
        if !searched {
            return Score::material(self.board, color);
        }

        best
    }

    /// Every legal move for the searching side, in piece-list order.
    fn root_moves(&self) -> Vec<RootMove> {
        (0..self.lists.of(self.color).len())
            .filter(|&index| self.lists.is_live(self.board, self.color, index))
            .flat_map(|index| {
                let from = self.lists.of(self.color)[index];
                generate_moves(self.board, from, MoveFilter::Legal)
                    .into_iter()
                    .map(move |to| (index, from, to))
            })
            .collect()
    }

    fn sequential_root(&mut self, moves: &[RootMove], depth: usize) -> SearchResult {
        let mut res = SearchResult::default();
        let mut alpha = -Score::INF;

        for &(index, from, to) in moves {
            let played = self.make(self.color, index, from, to, depth);
            let score = -self.negamax(depth - 1, -Score::INF, -alpha, self.color.opponent());
            self.unmake(played);

            if score > res.score {
                res.score = score;
                res.bestmove = Some(EngineMove {
                    from,
                    to,
                    promotion: played.promotion,
                });
            }
            alpha = alpha.max(res.score);
        }

        res
    }

    /// Scores root moves round-robin across scoped threads, each with its own copy of the board.
    ///
    /// Each move is searched with a full window, so the scores do not depend on how the moves were split.
    fn parallel_root(&mut self, moves: &[RootMove], depth: usize) -> SearchResult {
        let threads = self.config.threads.min(moves.len());
        let (board, color, config) = (*self.board, self.color, self.config);

        let (mut scored, nodes) = thread::scope(|s| {
            let handles = (0..threads)
                .map(|t| {
                    s.spawn(move || {
                        let mut board = board;
                        let mut search = Search::new(&mut board, color, config);

                        let scored = moves
                            .iter()
                            .enumerate()
                            .skip(t)
                            .step_by(threads)
                            .map(|(i, &(index, from, to))| {
                                let played = search.make(color, index, from, to, depth);
                                let score = -search.negamax(
                                    depth - 1,
                                    -Score::INF,
                                    Score::INF,
                                    color.opponent(),
                                );
                                search.unmake(played);

                                (i, score, played.promotion)
                            })
                            .collect::<Vec<_>>();

                        (scored, search.nodes())
                    })
                })
                .collect::<Vec<_>>();

            handles.into_iter().fold(
                (Vec::with_capacity(moves.len()), 0),
                |(mut all, nodes), handle| {
                    let (scored, n) = handle
                        .join()
                        .unwrap_or_else(|e| std::panic::resume_unwind(e));
                    all.extend(scored);
                    (all, nodes + n)
                },
            )
        });

        // Restore enumeration order so ties resolve exactly as in a sequential search
        scored.sort_unstable_by_key(|&(i, _, _)| i);

        let mut res = SearchResult {
            nodes,
            ..Default::default()
        };
        for (i, score, promotion) in scored {
            if score > res.score {
                let (_, from, to) = moves[i];
                res.score = score;
                res.bestmove = Some(EngineMove {
                    from,
                    to,
                    promotion,
                });
            }
        }

        res
    }

    /// Plays a move for `color` on the board and in the piece lists.
    ///
    /// `depth` is the remaining depth of the node the move is played from.
    fn make(
        &mut self,
        color: Color,
        index: usize,
        from: Coordinate,
        to: Coordinate,
        depth: usize,
    ) -> Played {
        let board = self.board.make_move(from, to);
        let list = self.lists.make_move(color, index, to);

        let promotion = if self.board.is_promotion(&board) {
            let kind = self.choose_promotion(to, color, depth);
            self.board.promote(to, kind);
            Some(kind)
        } else {
            None
        };

        self.board.refresh_warning(color);

        Played {
            board,
            list,
            promotion,
        }
    }

    #[inline(always)]
    fn unmake(&mut self, played: Played) {
        self.board.undo_move(played.board);
        self.lists.undo_move(played.list);
    }

    /// Decides what the pawn of `color` standing on `at` becomes.
    ///
    /// Under [`PromotionPolicy::Search`], each option is placed on the board and searched to `depth - 1`
    /// with a full window. Ties go to the option listed first in [`PieceKind::PROMOTIONS`].
    fn choose_promotion(&mut self, at: Coordinate, color: Color, depth: usize) -> PieceKind {
        match self.config.promotion {
            PromotionPolicy::Dominant => PieceKind::Queen,

            PromotionPolicy::Search => {
                let mut best = (PieceKind::Queen, -Score::INF);

                for kind in PieceKind::PROMOTIONS {
                    self.board.promote(at, kind);
                    self.board.refresh_warning(color);

                    let score = -self.negamax(
                        depth.saturating_sub(1),
                        -Score::INF,
                        Score::INF,
                        color.opponent(),
                    );
                    if score > best.1 {
                        best = (kind, score);
                    }
                }

                self.board.set(at, Piece::new(color, PieceKind::Pawn));
                best.0
            }
        }
    }
}
