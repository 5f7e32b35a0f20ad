/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    io::{self, BufRead},
    ops::ControlFlow,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, error};

use crate::{print_perft, EngineCommand, Game, Square, FEN_STARTPOS};

/// The text front-end: owns one [`Game`] and executes [`EngineCommand`]s against it.
#[derive(Debug, Default)]
pub struct Engine {
    /// The current state of the chess board, as known to the engine.
    ///
    /// This is modified whenever moves are played or new positions are given,
    /// and is reset whenever the engine is told to start a new game.
    game: Game,
}

impl Engine {
    /// Constructs a new [`Engine`] instance to be executed with [`Engine::run`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a string of the engine's name and current version.
    pub fn name(&self) -> String {
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    /// The game being played.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Execute the main event loop for the engine.
    ///
    /// Reads one command per line from `stdin` until `exit` is received or input ends.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut buffer = String::with_capacity(512);

        loop {
            // Clear the buffer, read input, and trim the trailing newline
            buffer.clear();
            let bytes = stdin
                .lock()
                .read_line(&mut buffer)
                .context("Failed to read line when parsing commands")?;

            // For ctrl + d
            if 0 == bytes {
                debug!("Input closed; {} is quitting", self.name());
                return Ok(());
            }

            let buf = buffer.trim();
            if buf.is_empty() {
                continue;
            }

            let cmd = match EngineCommand::try_parse_from(buf.split_ascii_whitespace()) {
                Ok(cmd) => cmd,
                Err(err) => {
                    // Also covers `help`, which clap reports as an "error"
                    eprintln!("{err}");
                    continue;
                }
            };

            // Keep running, even on error
            match self.execute(cmd) {
                Ok(ControlFlow::Continue(())) => {}
                Ok(ControlFlow::Break(())) => return Ok(()),
                Err(e) => {
                    error!("{buf:?} failed: {e:#}");
                    eprintln!("Error: {e:#}");
                }
            }
        }
    }

    /// Executes a single [`EngineCommand`], returning whether the engine should keep running.
    pub fn execute(&mut self, cmd: EngineCommand) -> Result<ControlFlow<()>> {
        match cmd {
            EngineCommand::Display => println!("{}", self.game),

            EngineCommand::Exit => return Ok(ControlFlow::Break(())),

            EngineCommand::Fen => println!("{}", self.game.to_fen()),

            EngineCommand::Move { mv_string } => {
                self.game.make_move_uci(&mv_string)?;
                self.announce_status();
            }

            EngineCommand::Moves {
                square,
                debug,
                sort,
            } => self.moves(square, debug, sort),

            EngineCommand::Perft { depth } => {
                print_perft::<false>(&mut self.game, depth);
            }

            EngineCommand::Position { args } => self.position(&args)?,

            EngineCommand::Reset => self.game.reset(),

            EngineCommand::Splitperft { depth } => {
                print_perft::<true>(&mut self.game, depth);
            }

            EngineCommand::Status => self.status(),

            EngineCommand::Undo => match self.game.undo_move() {
                Some(mv) => println!("Took back {}", mv.to_uci()),
                None => println!("(no moves to take back)"),
            },
        }

        Ok(ControlFlow::Continue(()))
    }

    /// Executes the `moves` command, printing legal moves for the whole side or a single square.
    fn moves(&self, square: Option<Square>, debug: bool, sort: bool) {
        let mut moves = match square {
            Some(square) => self.game.legal_moves_from(square).collect::<Vec<_>>(),
            None => self.game.legal_moves().to_vec(),
        };

        if sort {
            moves.sort_by_key(|mv| mv.to_string());
        }

        // If there are none, print "(none)"
        let moves_string = if moves.is_empty() {
            String::from("(none)")
        } else {
            // Otherwise, join them by comma-space
            moves
                .into_iter()
                .map(|mv| {
                    if debug {
                        format!("{mv:?}")
                    } else {
                        mv.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!("{moves_string}");
    }

    /// Set the position to the supplied FEN string (or `startpos`), and then apply any moves
    /// following the `moves` keyword one-by-one.
    ///
    /// The current game is only replaced if the FEN and every move are valid.
    fn position(&mut self, args: &[String]) -> Result<()> {
        let mut split = args.split(|arg| arg == "moves");
        let fen = split.next().unwrap_or_default().join(" ");
        let moves = split.next().unwrap_or_default();
        if split.next().is_some() {
            bail!("\"moves\" may only appear once in a position command");
        }

        let fen = if fen == "startpos" {
            FEN_STARTPOS
        } else {
            fen.as_str()
        };

        let mut game = Game::from_fen(fen)?;
        for mv in moves {
            game.make_move_uci(mv)?;
        }

        self.game = game;
        self.announce_status();
        Ok(())
    }

    /// Executes the `status` command.
    fn status(&self) {
        println!(
            "{} to move: {}",
            self.game.side_to_move().name(),
            self.game.status()
        );
    }

    /// Prints a line if the side to move is in check or the game has ended.
    fn announce_status(&self) {
        if self.game.is_checkmate() {
            println!(
                "Checkmate. {} wins.",
                self.game.side_to_move().opponent().name()
            );
        } else if self.game.is_stalemate() {
            println!("Stalemate.");
        } else if self.game.is_in_check() {
            println!("{} is in check.", self.game.side_to_move().name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(engine: &mut Engine, line: &str) -> Result<ControlFlow<()>> {
        engine.execute(line.parse()?)
    }

    #[test]
    fn test_moves_and_undo() {
        let mut engine = Engine::new();
        assert_eq!(run(&mut engine, "move e2e4").unwrap(), ControlFlow::Continue(()));
        assert_eq!(run(&mut engine, "m e7e5").unwrap(), ControlFlow::Continue(()));
        assert_eq!(engine.game().history().len(), 2);

        assert_eq!(run(&mut engine, "undo").unwrap(), ControlFlow::Continue(()));
        assert_eq!(engine.game().history().len(), 1);

        assert!(run(&mut engine, "move e2e4").is_err());
        assert_eq!(engine.game().history().len(), 1);
    }

    #[test]
    fn test_position_is_all_or_nothing() {
        let mut engine = Engine::new();
        assert_eq!(
            run(&mut engine, "position startpos moves f2f3 e7e5 g2g4 d8h4").unwrap(),
            ControlFlow::Continue(())
        );
        assert!(engine.game().is_checkmate());

        assert!(run(&mut engine, "position startpos moves e2e4 e2e4").is_err());
        assert!(engine.game().is_checkmate());

        assert_eq!(
            run(&mut engine, "position 4k3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap(),
            ControlFlow::Continue(())
        );
        assert_eq!(engine.game().to_fen(), "4k3/8/8/8/8/8/8/4K3 b - - 0 1");

        // A position where the waiting King could be captured is refused
        assert!(run(&mut engine, "position 4k3/8/8/8/8/8/8/4R2K w - - 0 1").is_err());
        assert_eq!(engine.game().to_fen(), "4k3/8/8/8/8/8/8/4K3 b - - 0 1");
    }

    #[test]
    fn test_exit_breaks() {
        let mut engine = Engine::new();
        assert_eq!(run(&mut engine, "exit").unwrap(), ControlFlow::Break(()));
        assert_eq!(run(&mut engine, "fen").unwrap(), ControlFlow::Continue(()));
    }
}
