/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::ops::ControlFlow;

use clap::{error::ErrorKind, Parser};
use env_logger::{Env, Target, DEFAULT_FILTER_ENV};
use newt::{Engine, EngineCommand};

/// Log level used when `RUST_LOG` is not set.
const DEFAULT_LOG_LEVEL: &str = "warn";

fn main() {
    // Logs go to stderr so they never interleave with command output
    env_logger::Builder::from_env(Env::default().filter_or(DEFAULT_FILTER_ENV, DEFAULT_LOG_LEVEL))
        .target(Target::Stderr)
        .init();

    let mut engine = Engine::new();

    // Skip the executable name
    let args = std::env::args().skip(1).collect::<Vec<_>>();

    // Commands given as arguments run before the interactive loop, such as `newt fen d`.
    // Each command greedily takes as many of the remaining arguments as it can parse.
    let mut arg_idx = args.len();
    let mut parsed_idx = 0;
    while parsed_idx < arg_idx {
        let slice = &args[parsed_idx..arg_idx];

        match EngineCommand::try_parse_from(slice) {
            Ok(cmd) => {
                match engine.execute(cmd) {
                    Ok(ControlFlow::Continue(())) => {}
                    Ok(ControlFlow::Break(())) => return,
                    Err(e) => eprintln!("Error: {e:#}"),
                }
                parsed_idx = arg_idx;
                arg_idx = args.len();
            }

            // Edge case: `--help` and `--version` are both "error" cases according to Clap
            Err(e)
                if matches!(e.kind(), ErrorKind::DisplayHelp)
                    || matches!(e.kind(), ErrorKind::DisplayVersion) =>
            {
                println!("{e}");
                parsed_idx = arg_idx;
                arg_idx = args.len();
            }

            Err(e) => {
                // Nothing parses from here onward; report it and skip the offending argument
                if arg_idx == parsed_idx + 1 {
                    eprintln!("ERROR on input {slice:?}:\n{e}");
                    parsed_idx = arg_idx;
                    arg_idx = args.len();
                } else {
                    arg_idx -= 1;
                }
            }
        }
    }

    if let Err(e) = engine.run() {
        eprintln!("{} encountered an error: {e}", env!("CARGO_PKG_NAME"));
    }
}
