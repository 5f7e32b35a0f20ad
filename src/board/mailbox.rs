/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::{bail, Context, Result};

use super::{Color, File, Piece, PieceKind, Rank, Square};

/// An `8x8` grid where every [`Square`] holds exactly one `Option<Piece>`.
///
/// This is a plain value holder. It enforces no rules of chess.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; Square::COUNT],
}

impl Board {
    /// Creates a new, empty [`Board`].
    ///
    /// # Example
    /// ```
    /// # use newt::{Board, Square};
    /// let board = Board::new();
    /// assert!(board.is_empty(Square::E1));
    /// ```
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            squares: [None; Square::COUNT],
        }
    }

    /// Creates a [`Board`] holding the standard starting position.
    pub fn startpos() -> Self {
        let mut board = Self::new();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        for color in Color::all() {
            for (file, kind) in File::iter().zip(back_rank) {
                board.place(Piece::new(color, kind), Square::new(file, Rank::first(color)));
                board.place(
                    Piece::new(color, PieceKind::Pawn),
                    Square::new(file, Rank::second(color)),
                );
            }
        }

        board
    }

    /// Parses the piece placement field of a FEN string.
    ///
    /// # Example
    /// ```
    /// # use newt::{Board, Piece, Square};
    /// let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3").unwrap();
    /// assert_eq!(board.piece_at(Square::E8), Some(Piece::BLACK_KING));
    /// assert!(board.is_empty(Square::A1));
    /// ```
    pub fn from_fen(placements: &str) -> Result<Self> {
        let mut board = Self::new();

        let ranks = placements.split('/').collect::<Vec<_>>();
        if ranks.len() != Rank::COUNT {
            bail!(
                "Invalid FEN placements {placements:?}: expected 8 ranks, found {}",
                ranks.len()
            );
        }

        // FEN lists ranks from the eighth down to the first
        for (rank, row) in Rank::iter().rev().zip(ranks) {
            let mut file = 0;
            for c in row.chars() {
                if let Some(empty) = c.to_digit(10) {
                    file += empty as usize;
                    continue;
                }

                if file >= File::COUNT {
                    bail!("Invalid FEN placements {placements:?}: rank {rank} is too long");
                }

                let piece = Piece::from_uci(c)
                    .with_context(|| format!("Invalid FEN placements {placements:?}"))?;
                board.place(piece, Square::new(File(file as u8), rank));
                file += 1;
            }

            if file != File::COUNT {
                bail!("Invalid FEN placements {placements:?}: rank {rank} does not span 8 files");
            }
        }

        Ok(board)
    }

    /// Formats this [`Board`] as the piece placement field of a FEN string.
    ///
    /// # Example
    /// ```
    /// # use newt::Board;
    /// assert_eq!(Board::startpos().to_fen(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR");
    /// ```
    pub fn to_fen(&self) -> String {
        let mut placements = String::with_capacity(64);

        for rank in Rank::iter().rev() {
            let mut empty = 0;
            for file in File::iter() {
                match self.piece_at(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty > 0 {
                            placements.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placements.push(piece.to_uci());
                    }
                    None => empty += 1,
                }
            }

            if empty > 0 {
                placements.push_str(&empty.to_string());
            }
            if rank != Rank::ONE {
                placements.push('/');
            }
        }

        placements
    }

    /// Fetches the occupant of `square`, if there is one.
    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    /// Returns `true` if nothing occupies `square`.
    #[inline(always)]
    pub const fn is_empty(&self, square: Square) -> bool {
        self.squares[square.index()].is_none()
    }

    /// Returns the [`Color`] of the piece on `square`, if there is one.
    #[inline(always)]
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.piece_at(square).map(|piece| piece.color())
    }

    /// Places `piece` on `square`, replacing any previous occupant.
    #[inline(always)]
    pub fn place(&mut self, piece: Piece, square: Square) {
        self.squares[square] = Some(piece);
    }

    /// Removes and returns the occupant of `square`.
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.squares[square].take()
    }

    /// Empties `square`.
    #[inline(always)]
    pub fn clear(&mut self, square: Square) {
        self.squares[square] = None;
    }

    /// An iterator over every occupied square and its piece, from A1 to H8.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self.piece_at(square).map(|piece| (square, piece)))
    }

    /// Finds every square holding `piece`.
    pub fn find(&self, piece: Piece) -> impl Iterator<Item = Square> + '_ {
        self.iter()
            .filter(move |(_, occupant)| *occupant == piece)
            .map(|(square, _)| square)
    }
}

impl Default for Board {
    /// Defaults to the starting position.
    #[inline(always)]
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board = String::with_capacity(198);

        for rank in Rank::iter().rev() {
            board += &format!("{rank}| ");

            for file in File::iter() {
                match self.piece_at(Square::new(file, rank)) {
                    Some(piece) => board.push(piece.to_uci()),
                    None => board.push('.'),
                }
                board.push(' ');
            }

            board += "\n"
        }
        board += " +";
        for _ in File::iter() {
            board += "--";
        }
        board += "\n   ";
        for file in File::iter() {
            board += &format!("{file} ");
        }

        write!(f, "{board}")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}
