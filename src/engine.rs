/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    io,
    sync::mpsc::{channel, Receiver, Sender},
    thread,
    time::Instant,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info};

use crate::{
    perft_generic, Color, Coordinate, EngineCommand, EngineMove, Game, PieceKind, Promote,
    PromotionChooser, Score, SearchConfig,
};

/// Default depth at which to run the benchmark searches.
const BENCH_DEPTH: usize = 4;

/// Openings played out from the standard position to produce the benchmark positions.
const BENCHMARK_LINES: &[&str] = &[
    "",
    "e2e4 e7e5 g1f3 b8c6 f1b5 a7a6",
    "d2d4 d7d5 c2c4 e7e6 b1c3 g8f6 c1g5 f8e7",
    "e2e4 c7c5 g1f3 d7d6 d2d4 c5d4 f3d4 g8f6 b1c3 a7a6",
    "c2c4 e7e5 b1c3 g8f6 g2g3 d7d5 c4d5 f6d5 f1g2 d5b6",
    "e2e4 e7e5 g1f3 b8c6 f1c4 f8c5 e1g1 g8f6 d2d3 e8g8",
];

/// A terminal chess engine: a human plays one side, and a negamax search plays the other.
#[derive(Debug)]
pub struct Engine {
    /// The current state of the game, as known to the engine.
    ///
    /// This is modified whenever moves are played, and is reset whenever the engine is told to start a new game.
    game: Game,

    /// Settings for the engine's searches.
    config: SearchConfig,

    /// The side played by the engine.
    color: Color,

    /// One half of a channel, responsible for sending commands to the engine to execute.
    sender: Sender<EngineCommand>,

    /// One half of a channel, responsible for receiving commands for the engine to execute.
    receiver: Receiver<EngineCommand>,
}

impl Engine {
    /// Constructs a new [`Engine`] that plays `color` with the provided search settings,
    /// to be executed with [`Engine::run`].
    pub fn new(config: SearchConfig, color: Color) -> Self {
        let (sender, receiver) = channel();

        Self {
            game: Game::default(),
            config,
            color,
            sender,
            receiver,
        }
    }

    /// Returns a string of the engine's name and current version.
    pub fn name(&self) -> String {
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    /// Sends an [`EngineCommand`] to the engine to be executed.
    pub fn send_command(&self, command: EngineCommand) -> Result<()> {
        self.sender
            .send(command)
            .context("Failed to send command to engine")
    }

    /// Execute the main event loop for the engine.
    ///
    /// This function spawns a thread to handle input from `stdin` and waits on received commands.
    /// If the engine plays White, it makes its first move before any command is read.
    pub fn run(&mut self) -> Result<()> {
        // Spawn a separate thread for handling user input
        let sender = self.sender.clone();
        thread::spawn(|| {
            if let Err(err) = input_handler(sender) {
                eprintln!("Input handler thread stopping after fatal error: {err}");
            }
        });

        println!("{} playing {}\n", self.name(), self.color);
        self.new_game()?;

        // Loop on user input
        while let Ok(cmd) = self.receiver.recv() {
            match cmd {
                EngineCommand::Exit => break,

                // Keep running, even on error
                cmd => {
                    if let Err(e) = self.execute(cmd) {
                        debug!("command failed: {e:#}");
                        eprintln!("Error: {e:#}");
                    }
                }
            }
        }

        Ok(())
    }

    /// Handle the execution of a single [`EngineCommand`], other than [`EngineCommand::Exit`].
    fn execute(&mut self, cmd: EngineCommand) -> Result<()> {
        match cmd {
            EngineCommand::Bench { depth, pretty } => self.bench(depth, pretty)?,

            EngineCommand::Depth { depth } => {
                if let Some(depth) = depth {
                    self.config.depth = depth;
                }
                println!("depth := {}", self.config.depth);
            }

            EngineCommand::Display => self.display(),

            EngineCommand::Eval => self.eval(),

            EngineCommand::Go { depth } => {
                let config = SearchConfig {
                    depth: depth.unwrap_or(self.config.depth),
                    ..self.config
                };
                self.engine_move(config)?;
            }

            EngineCommand::Move { from, to, promote } => self.human_move(from, to, promote)?,

            EngineCommand::Moves { square } => self.moves(square)?,

            EngineCommand::New => self.new_game()?,

            EngineCommand::Perft { depth } => self.perft::<false>(depth),

            EngineCommand::Promote { .. } => bail!("No promotion is pending"),

            EngineCommand::Splitperft { depth } => self.perft::<true>(depth),

            EngineCommand::Exit => {}
        }

        Ok(())
    }

    /// Plays a move for the human, then lets the engine reply if it is now the engine's turn.
    ///
    /// If a pawn promotes and `promote` was not given, this blocks until a `promote` command is received.
    fn human_move(
        &mut self,
        from: Coordinate,
        to: Coordinate,
        promote: Option<PieceKind>,
    ) -> Result<()> {
        self.ensure_not_over()?;

        match promote {
            Some(kind) if !kind.is_promotion() => bail!("A pawn cannot promote to a {kind}"),

            Some(kind) => {
                self.game.play(from, to, &mut Promote(kind))?;
            }

            None => {
                let mut chooser = ChannelPromotion {
                    receiver: &self.receiver,
                    exit_requested: false,
                };
                self.game.play(from, to, &mut chooser)?;

                // Quitting mid-promotion still finishes the move, but skips the reply.
                if chooser.exit_requested {
                    self.display();
                    return self.send_command(EngineCommand::Exit);
                }
            }
        }

        self.report();

        if self.game.outcome().is_none() && self.game.side_to_move() == self.color {
            self.engine_move(self.config)?;
        }

        Ok(())
    }

    /// Lets the engine search and play a move for the side to move.
    fn engine_move(&mut self, config: SearchConfig) -> Result<()> {
        self.ensure_not_over()?;

        let color = self.game.side_to_move();
        let start = Instant::now();
        let res = self.game.play_engine_move(config)?;
        let elapsed = start.elapsed();

        if let Some(mv) = res.bestmove {
            info!(%mv, score = ?res.score, nodes = res.nodes, "engine moved");
            println!(
                "{color} plays {mv} (score {}, {} nodes, {}ms)",
                res.score,
                res.nodes,
                elapsed.as_millis()
            );
        }

        self.report();
        Ok(())
    }

    /// Prints the board, followed by check or game-over information.
    fn report(&self) {
        self.display();

        if let Some(outcome) = self.game.outcome() {
            println!("{outcome}");
        } else if self.game.is_in_check() {
            println!("{} is in check", self.game.side_to_move());
        }
    }

    fn ensure_not_over(&self) -> Result<()> {
        if let Some(outcome) = self.game.outcome() {
            bail!("The game is over ({outcome}). Use `new` to start another");
        }

        Ok(())
    }

    /// Executes the `moves` command, listing the legal moves of one piece, or of the side to move.
    fn moves(&self, square: Option<Coordinate>) -> Result<()> {
        let moves = if let Some(from) = square {
            self.game
                .legal_moves_from(from)?
                .into_iter()
                .map(|to| (from, to))
                .collect()
        } else {
            self.game.legal_moves()
        };

        // If there are none, print "(none)"
        let moves_string = if moves.is_empty() {
            String::from("(none)")
        } else {
            // Otherwise, join them by comma-space
            moves
                .into_iter()
                .map(|(from, to)| {
                    EngineMove {
                        from,
                        to,
                        promotion: None,
                    }
                    .to_string()
                })
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!("{moves_string}");

        Ok(())
    }

    /// Execute the `bench` command, running a benchmark of a fixed search on a series of positions and displaying the results.
    fn bench(&mut self, depth: Option<usize>, pretty: bool) -> Result<()> {
        // Set up the benchmarking config
        let config = SearchConfig {
            depth: depth.unwrap_or(BENCH_DEPTH),
            ..self.config
        };

        let num_tests = BENCHMARK_LINES.len();
        let mut nodes = 0;
        let start = Instant::now();

        // Run a fixed search on each position
        for (i, line) in BENCHMARK_LINES.iter().enumerate() {
            println!("Benchmark position {}/{num_tests}: {line:?}", i + 1);

            let game = replay(line)?;
            nodes += game.search(config).nodes;
        }

        // Compute results
        let elapsed = start.elapsed();
        let nps = (nodes as f32 / elapsed.as_secs_f32()) as u64;
        let m_nps = nodes as f32 / elapsed.as_secs_f32() / 1_000_000.0;
        let ms = elapsed.as_millis();

        if pretty {
            // Display the results in a nice table
            println!();
            println!("+--- Benchmark Complete ---+");
            println!("| time (ms)  : {ms:<12}|");
            println!("| nodes      : {nodes:<12}|");
            println!("| nps        : {nps:<12}|");
            println!("| Mnps       : {m_nps:<12.2}|");
            println!("+--------------------------+");
        } else {
            println!("{nodes} nodes {nps} nps");
        }

        Ok(())
    }

    /// Executes the `display` command, printing the current position.
    fn display(&self) {
        println!("{}\n", self.game);
    }

    /// Executes the `eval` command, printing the material balance for the side to move.
    fn eval(&self) {
        let color = self.game.side_to_move();
        println!("{} (for {color})", Score::material(self.game.board(), color));
    }

    /// Performs a perft on the current position, printing node count and speed.
    fn perft<const SPLIT: bool>(&self, depth: usize) {
        let mut board = *self.game.board();
        let start = Instant::now();
        let nodes = perft_generic::<true, SPLIT>(&mut board, self.game.side_to_move(), depth);
        let elapsed = start.elapsed();

        let nps = nodes as f64 / elapsed.as_secs_f64();
        println!("\n{nodes} nodes in {}ms ({nps:.0} nps)", elapsed.as_millis());
    }

    /// Resets the game, letting the engine move first if it plays White.
    fn new_game(&mut self) -> Result<()> {
        self.game = Game::default();
        self.display();

        if self.color == self.game.side_to_move() {
            self.engine_move(self.config)?;
        }

        Ok(())
    }
}

/// Asks for a promotion choice by waiting for a `promote` command on the engine's channel.
struct ChannelPromotion<'a> {
    receiver: &'a Receiver<EngineCommand>,

    /// Set if `exit` was received while waiting.
    exit_requested: bool,
}

impl PromotionChooser for ChannelPromotion<'_> {
    fn choose(&mut self, color: Color) -> PieceKind {
        println!("Promote the {color} pawn to? (promote q|r|n|b)");

        while let Ok(cmd) = self.receiver.recv() {
            match cmd {
                EngineCommand::Promote { piece } if piece.is_promotion() => return piece,

                EngineCommand::Promote { piece } => {
                    eprintln!("A pawn cannot promote to a {piece}")
                }

                EngineCommand::Exit => {
                    self.exit_requested = true;
                    break;
                }

                other => eprintln!("Finish the promotion first; ignoring {other:?}"),
            }
        }

        // Input is gone or the user is quitting; a Queen completes the move.
        PieceKind::Queen
    }
}

/// Plays out a space-separated list of moves like `e2e4 e7e5` from the standard position.
fn replay(line: &str) -> Result<Game> {
    let mut game = Game::default();

    for mv in line.split_ascii_whitespace() {
        let (Some(from), Some(to)) = (mv.get(0..2), mv.get(2..4)) else {
            bail!("Invalid move {mv:?}: Must be of the form <from><to>");
        };

        game.play(from.parse()?, to.parse()?, &mut Promote::default())
            .with_context(|| format!("Failed to replay {mv:?} in {line:?}"))?;
    }

    Ok(game)
}

/// Loops endlessly to await input via `stdin`, sending all successfully-parsed commands through the supplied `sender`.
fn input_handler(sender: Sender<EngineCommand>) -> Result<()> {
    let mut buffer = String::with_capacity(256);

    loop {
        // Clear the buffer, read input, and trim the trailing newline
        buffer.clear();
        let bytes = io::stdin()
            .read_line(&mut buffer)
            .context("Failed to read line when parsing commands")?;

        // For ctrl + d
        if 0 == bytes {
            // Send the Exit command and exit this function
            sender
                .send(EngineCommand::Exit)
                .context("Failed to send 'exit' command after receiving empty input")?;

            return Ok(());
        }

        // Trim any leading/trailing whitespace
        let buf = buffer.trim();

        // Ignore empty lines
        if buf.is_empty() {
            continue;
        }

        match EngineCommand::try_parse_from(buf.split_ascii_whitespace()) {
            Ok(cmd) => sender
                .send(cmd)
                .context("Failed to send command to engine")?,

            // If an invalid command was received, just print the error and continue running
            Err(err) => {
                debug!(input = buf, "unrecognized command");
                eprintln!("{err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benchmark_lines_are_legal() {
        for line in BENCHMARK_LINES {
            let game = replay(line).unwrap();
            assert!(game.outcome().is_none(), "{line:?} ended the game");
        }
    }

    #[test]
    fn test_replay_castles_by_landing_square() {
        let game = replay(BENCHMARK_LINES[5]).unwrap();
        assert_eq!(game.get("g1".parse().unwrap()), crate::Piece::WhiteKing);
        assert_eq!(game.get("f8".parse().unwrap()), crate::Piece::BlackRook);
        assert!(!game.castling().white_high && !game.castling().black_high);
    }

    #[test]
    fn test_exit_during_promotion_skips_engine_reply() {
        let mut board = crate::Board::empty();
        board.set("a1".parse().unwrap(), crate::Piece::WhiteKing);
        board.set("h3".parse().unwrap(), crate::Piece::BlackKing);
        board.set("b7".parse().unwrap(), crate::Piece::WhitePawn);

        let mut engine = Engine::new(SearchConfig::default(), Color::Black);
        engine.game = Game::new(board, Color::White);
        engine.send_command(EngineCommand::Exit).unwrap();

        engine
            .human_move("b7".parse().unwrap(), "b8".parse().unwrap(), None)
            .unwrap();

        // The pawn promoted, and Black was left to move without a search.
        assert_eq!(engine.game.get("b8".parse().unwrap()), crate::Piece::WhiteQueen);
        assert_eq!(engine.game.side_to_move(), Color::Black);
        assert!(matches!(engine.receiver.try_recv(), Ok(EngineCommand::Exit)));
        assert!(engine.receiver.try_recv().is_err());
    }

    #[test]
    fn test_channel_promotion_waits_for_a_valid_piece() {
        let (sender, receiver) = channel();
        sender.send(EngineCommand::Display).unwrap();
        sender
            .send(EngineCommand::Promote {
                piece: PieceKind::King,
            })
            .unwrap();
        sender
            .send(EngineCommand::Promote {
                piece: PieceKind::Knight,
            })
            .unwrap();

        let mut chooser = ChannelPromotion {
            receiver: &receiver,
            exit_requested: false,
        };
        assert_eq!(chooser.choose(Color::White), PieceKind::Knight);
        assert!(!chooser.exit_requested);

        sender.send(EngineCommand::Exit).unwrap();
        assert_eq!(chooser.choose(Color::White), PieceKind::Queen);
        assert!(chooser.exit_requested);
    }
}
