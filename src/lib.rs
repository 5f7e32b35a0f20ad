/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Board representation, move generation, and game state.
mod board;

/// Commands accepted by the text front-end.
mod cli;

/// The text front-end that drives a single [`Game`].
mod engine;

pub use board::*;
pub use cli::*;
pub use engine::*;
