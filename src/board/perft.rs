/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Instant;

use super::{Game, Move, MoveList, PieceKind};

/// Expands a move into every move it stands for: one per promotion choice if it is a pending
/// promotion, otherwise just itself.
fn expand(mv: Move) -> impl Iterator<Item = Move> {
    let choices: &'static [PieceKind] = if mv.is_pending_promotion() {
        &PieceKind::PROMOTIONS
    } else {
        &[]
    };

    let promotions = choices
        .iter()
        .filter_map(move |&kind| mv.with_promotion(kind).ok());

    (!mv.is_pending_promotion())
        .then_some(mv)
        .into_iter()
        .chain(promotions)
}

/// Number of distinct moves a legal move stands for.
#[inline(always)]
fn width(mv: &Move) -> u64 {
    if mv.is_pending_promotion() {
        PieceKind::PROMOTIONS.len() as u64
    } else {
        1
    }
}

/// Perform a perft at the specified depth, collecting only data about the number of possible positions (nodes).
///
/// Each pending promotion counts as four moves, one per piece a Pawn may become.
///
/// This performs bulk counting, meaning that, at depth 1, it returns the number of available moves,
/// rather than making them, recursing again, and returning 1 for each terminal case.
/// If you do *not* want to use bulk counting, use [`perft_generic`].
///
/// # Example
/// ```
/// # use newt::{perft, Game};
/// let mut game = Game::new();
/// assert_eq!(perft(&mut game, 3), 8_902);
/// ```
#[inline(always)]
pub fn perft(game: &mut Game, depth: usize) -> u64 {
    perft_generic::<true, false>(game, depth)
}

/// Perform a splitperft at the specified depth, printing the number of nodes reachable after each
/// move available at the root node.
#[inline(always)]
pub fn splitperft(game: &mut Game, depth: usize) -> u64 {
    perft_generic::<true, true>(game, depth)
}

/// Generic version of `perft` that allows you to specify whether to perform bulk counting and splitperft.
///
/// If `BULK` is set to `true`, this will perform bulk counting.
/// If `SPLIT` is set to `true`, this will perform a splitperft.
///
/// The game is returned to its original position before this returns.
pub fn perft_generic<const BULK: bool, const SPLIT: bool>(game: &mut Game, depth: usize) -> u64 {
    // Bulk counting; no need to recurse again just to apply a singular move and return 1.
    if BULK && !SPLIT && depth == 1 {
        return game.legal_moves().iter().map(width).sum();
    }
    // Recursion limit; return 1, since we're fathoming this node.
    else if depth == 0 {
        return 1;
    }

    // The list is copied since making a move replaces it
    let moves = game.legal_moves().iter().copied().collect::<MoveList>();

    moves
        .into_iter()
        .flat_map(expand)
        .fold(0, |nodes, mv| {
            game.make_move(mv);
            let new_nodes = perft_generic::<BULK, false>(game, depth - 1);
            game.undo_move();

            if SPLIT {
                println!("{}\t{new_nodes}", mv.to_uci());
            }

            nodes + new_nodes
        })
}

/// Runs a perft and prints the node count along with how long it took.
pub fn print_perft<const SPLIT: bool>(game: &mut Game, depth: usize) -> u64 {
    let now = Instant::now();
    let nodes = perft_generic::<true, SPLIT>(game, depth);
    let elapsed = now.elapsed();

    let nps = nodes as f64 / elapsed.as_secs_f64();
    let m_nps = nps / 1_000_000.0;

    if SPLIT {
        println!();
    }
    println!("Nodes:\t{nodes}");
    println!("Time:\t{elapsed:.1?}");
    println!("Mnps:\t{m_nps:.1}");

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perft_leaves_game_untouched() {
        let mut game = Game::from_fen(crate::FEN_KIWIPETE).unwrap();
        let fen = game.to_fen();

        assert_eq!(perft(&mut game, 2), 2_039);
        assert_eq!(game.to_fen(), fen);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_bulk_counting_matches_full_counting() {
        let mut game = Game::from_fen("n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1").unwrap();
        assert_eq!(perft_generic::<true, false>(&mut game, 2), 496);
        assert_eq!(perft_generic::<false, false>(&mut game, 2), 496);
    }

    #[test]
    fn test_pending_promotions_expand_to_four() {
        let game = Game::from_fen("8/4P3/8/8/8/8/8/k6K w - - 0 1").unwrap();
        let pending = game.legal_moves().iter().copied().find(|mv| mv.is_promotion()).unwrap();

        let kinds = expand(pending).filter_map(|mv| mv.promotion()).collect::<Vec<_>>();
        assert_eq!(kinds, PieceKind::PROMOTIONS);
        assert_eq!(width(&pending), 4);
    }
}
