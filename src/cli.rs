/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::str::FromStr;

use clap::Parser;

use crate::{Color, Coordinate, MoveFilter, PieceKind, PromotionPolicy, SearchConfig, DEFAULT_DEPTH};

/// Play chess against a negamax engine in the terminal.
#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Depth of the engine's search, in plies.
    #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
    pub depth: usize,

    /// Number of threads to split the engine's root moves over.
    #[arg(short, long, default_value_t = 1)]
    pub threads: usize,

    /// How the engine picks a piece when one of its pawns promotes.
    #[arg(short, long, value_enum, default_value_t)]
    pub promotion: PromotionPolicy,

    /// Search moves that may leave the King in check, so that mates are seen as losing the King.
    #[arg(long, default_value = "false")]
    pub pseudo_legal: bool,

    /// The side the engine plays.
    #[arg(short, long, default_value = "black")]
    pub engine: Color,

    /// Commands to execute on startup, before reading from `stdin`, such as `"perft 4"`.
    pub commands: Vec<String>,
}

impl Cli {
    /// The search settings requested on the command line.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            depth: self.depth,
            filter: if self.pseudo_legal {
                MoveFilter::PseudoLegal
            } else {
                MoveFilter::Legal
            },
            promotion: self.promotion,
            threads: self.threads.max(1),
        }
    }
}

/// A command to be sent to the engine.
#[derive(Debug, Clone, Parser)]
#[command(
    multicall = true,
    about,
    rename_all = "lower",
    override_usage("<COMMAND>")
)]
pub enum EngineCommand {
    /// Run a benchmark of fixed-depth searches on a series of positions.
    Bench {
        /// If set, the benchmarking results will be printed in a well-formatted table.
        #[arg(short, long, default_value = "false")]
        pretty: bool,

        /// Override the default benchmark depth.
        #[arg(short, long, required = false)]
        depth: Option<usize>,
    },

    /// Display the engine's search depth, or change it.
    Depth { depth: Option<usize> },

    /// Print a visual representation of the current board state.
    #[command(alias = "d")]
    Display,

    /// Print the material balance from the perspective of the side to move.
    Eval,

    /// Quit the engine.
    #[command(alias = "quit")]
    Exit,

    /// Let the engine play a move for the side to move.
    Go {
        /// Override the engine's search depth for this move only.
        #[arg(short, long, required = false)]
        depth: Option<usize>,
    },

    /// Play a move for the side to move. Castle by moving the King two squares.
    #[command(alias = "m")]
    Move {
        from: Coordinate,

        to: Coordinate,

        /// What a promoting pawn becomes. If omitted, you will be asked.
        #[arg(short, long, required = false)]
        promote: Option<PieceKind>,
    },

    /// Shows all legal moves in the current position, or for a specific piece.
    Moves { square: Option<Coordinate> },

    /// Start a new game from the standard position.
    New,

    /// Performs a perft on the current position at the supplied depth, printing total node count.
    Perft { depth: usize },

    /// Answer a pending promotion with the piece the pawn becomes.
    Promote { piece: PieceKind },

    /// Performs a split perft on the current position at the supplied depth.
    #[command(alias = "sperft")]
    Splitperft { depth: usize },
}

impl FromStr for EngineCommand {
    type Err = clap::Error;

    /// Attempt to parse an [`EngineCommand`] from a string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse_from(s.split_ascii_whitespace())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cmd: EngineCommand = "move e2 e4".parse().unwrap();
        assert!(matches!(
            cmd,
            EngineCommand::Move { from, to, promote: None }
                if from == Coordinate::new(4, 6) && to == Coordinate::new(4, 4)
        ));

        let cmd: EngineCommand = "m b7 b8 --promote n".parse().unwrap();
        assert!(matches!(
            cmd,
            EngineCommand::Move {
                promote: Some(PieceKind::Knight),
                ..
            }
        ));

        assert!(matches!("d".parse::<EngineCommand>(), Ok(EngineCommand::Display)));
        assert!(matches!("quit".parse::<EngineCommand>(), Ok(EngineCommand::Exit)));
        assert!(matches!(
            "go --depth 3".parse::<EngineCommand>(),
            Ok(EngineCommand::Go { depth: Some(3) })
        ));
        assert!(matches!(
            "promote queen".parse::<EngineCommand>(),
            Ok(EngineCommand::Promote {
                piece: PieceKind::Queen
            })
        ));
    }

    #[test]
    fn test_bad_commands() {
        assert!("move e2".parse::<EngineCommand>().is_err());
        assert!("move e2 e9".parse::<EngineCommand>().is_err());
        assert!("castle".parse::<EngineCommand>().is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["kingside"]).unwrap();
        assert_eq!(cli.engine, Color::Black);
        assert_eq!(cli.search_config(), SearchConfig::default());

        let cli = Cli::try_parse_from([
            "kingside",
            "--depth",
            "3",
            "--promotion",
            "search",
            "--engine",
            "white",
            "--pseudo-legal",
            "perft 2",
        ])
        .unwrap();
        let config = cli.search_config();
        assert_eq!(config.depth, 3);
        assert_eq!(config.promotion, PromotionPolicy::Search);
        assert_eq!(config.filter, MoveFilter::PseudoLegal);
        assert_eq!(cli.engine, Color::White);
        assert_eq!(cli.commands, ["perft 2"]);
    }
}
