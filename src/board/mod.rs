/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Ray and knight-offset scans for attacks, pins, and checks.
mod attacks;

/// Per-color, per-side castling rights.
mod castling;

/// The game controller: legal move queries, apply, and undo.
mod game;

/// An `8x8` grid of optional pieces.
mod mailbox;

/// Per-piece pseudo-legal move generators.
mod movegen;

/// The [`Move`] value type.
mod moves;

/// Node counting over the legal move tree.
mod perft;

/// Colors, piece kinds, and pieces.
mod piece;

/// Squares, files, and ranks.
mod square;

/// Misc constants.
mod utils;

pub use attacks::*;
pub use castling::*;
pub use game::*;
pub use mailbox::*;
pub use movegen::*;
pub use moves::*;
pub use perft::*;
pub use piece::*;
pub use square::*;
pub use utils::*;
