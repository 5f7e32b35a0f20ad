/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use anyhow::{bail, Result};

use super::{Board, CastleSide, Piece, PieceKind, Rank, Square, MAX_NUM_MOVES};

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_NUM_MOVES`] moves.
pub type MoveList = arrayvec::ArrayVec<Move, MAX_NUM_MOVES>;

/// Represents the different kinds of moves that can be made during a chess game.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum MoveKind {
    /// A single piece moves to an empty square.
    Quiet,

    /// A Pawn's first move, advancing two squares forward.
    PawnDoublePush,

    /// A piece moves onto a square occupied by an opponent's piece, removing it from the board.
    Capture,

    /// A Pawn captures an enemy Pawn that just double-pushed past it, landing on the square it skipped.
    EnPassantCapture,

    /// The King and the H-file Rook slide past each other.
    ShortCastle,

    /// The King and the A-file Rook slide past each other.
    LongCastle,
}

impl fmt::Display for MoveKind {
    /// Displays a human-readable description for this [`MoveKind`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Quiet => "Quiet",
            Self::PawnDoublePush => "Pawn Double Push",
            Self::Capture => "Capture",
            Self::EnPassantCapture => "En Passant Capture",
            Self::ShortCastle => "Short Castle",
            Self::LongCastle => "Long Castle",
        };

        write!(f, "{s}")
    }
}

/// The promotion state of a Pawn move onto its last rank.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Promotion {
    /// The Pawn must promote, but the caller has not yet chosen to what.
    Pending,

    /// The Pawn promotes to this kind.
    To(PieceKind),
}

/// A move on the board, described completely enough to be undone.
///
/// The moved and captured pieces are recorded when the [`Move`] is created, not when it is played.
///
/// Two moves are equal if they share their `from` and `to` squares; the kind, captured piece, and
/// promotion choice are not part of a move's identity. No two legal moves in a position share
/// both squares, because a Pawn reaching its last rank yields one move with a
/// [`Promotion::Pending`] slot rather than one move per promotion choice.
#[derive(Clone, Copy)]
pub struct Move {
    from: Square,
    to: Square,
    piece: Piece,
    captured: Option<Piece>,
    kind: MoveKind,
    promotion: Option<Promotion>,
}

impl Move {
    /// Creates a [`Move`] of the piece on `from` to `to`, inferring its kind from `board`.
    ///
    /// Returns `None` if `from` is empty. No legality is checked.
    ///
    /// # Example
    /// ```
    /// # use newt::{Board, Move, MoveKind, Square};
    /// let board = Board::startpos();
    /// let mv = Move::new(Square::E2, Square::E4, &board).unwrap();
    /// assert_eq!(mv.kind(), MoveKind::PawnDoublePush);
    /// assert!(Move::new(Square::E4, Square::E5, &board).is_none());
    /// ```
    pub fn new(from: Square, to: Square, board: &Board) -> Option<Self> {
        board
            .piece_at(from)
            .map(|piece| Self::from_parts(from, to, piece, board))
    }

    /// Creates a [`Move`] of `piece` from `from` to `to`, inferring its kind from `board`.
    pub(crate) fn from_parts(from: Square, to: Square, piece: Piece, board: &Board) -> Self {
        let mut captured = board.piece_at(to);
        let mut kind = if captured.is_some() {
            MoveKind::Capture
        } else {
            MoveKind::Quiet
        };
        let mut promotion = None;

        match piece.kind() {
            PieceKind::Pawn => {
                if to.rank() == Rank::eighth(piece.color()) {
                    promotion = Some(Promotion::Pending);
                }

                if from.file() != to.file() && captured.is_none() {
                    // A diagonal step onto an empty square can only be en passant
                    kind = MoveKind::EnPassantCapture;
                    captured = Some(Piece::new(piece.color().opponent(), PieceKind::Pawn));
                } else if from.rank().index().abs_diff(to.rank().index()) == 2 {
                    kind = MoveKind::PawnDoublePush;
                }
            }

            PieceKind::King if from.file().index().abs_diff(to.file().index()) == 2 => {
                kind = match CastleSide::of(from, to) {
                    CastleSide::Short => MoveKind::ShortCastle,
                    CastleSide::Long => MoveKind::LongCastle,
                };
            }

            _ => {}
        }

        Self {
            from,
            to,
            piece,
            captured,
            kind,
            promotion,
        }
    }

    /// Resolves a pending promotion to `kind`.
    ///
    /// Fails if this move does not promote, or if `kind` is not a Knight, Bishop, Rook, or Queen.
    ///
    /// # Example
    /// ```
    /// # use newt::{Board, Move, PieceKind, Square};
    /// let board = Board::from_fen("8/4P3/8/8/8/8/8/k6K").unwrap();
    /// let mv = Move::new(Square::E7, Square::E8, &board).unwrap();
    /// assert!(mv.is_pending_promotion());
    ///
    /// let mv = mv.with_promotion(PieceKind::Knight).unwrap();
    /// assert_eq!(mv.promotion(), Some(PieceKind::Knight));
    /// assert!(mv.with_promotion(PieceKind::King).is_err());
    /// ```
    pub fn with_promotion(self, kind: PieceKind) -> Result<Self> {
        if !self.is_promotion() {
            bail!("Move {self} does not promote a Pawn");
        }
        if !kind.is_promotion_target() {
            bail!("A Pawn cannot promote to a {}", kind.name());
        }

        Ok(Self {
            promotion: Some(Promotion::To(kind)),
            ..self
        })
    }

    /// The square the piece moves from.
    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.from
    }

    /// The square the piece moves to.
    ///
    /// For castling, this is the King's destination.
    #[inline(always)]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// The piece on `from` when this move was created.
    #[inline(always)]
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    /// The piece this move captures, if any.
    #[inline(always)]
    pub const fn captured(&self) -> Option<Piece> {
        self.captured
    }

    /// The square of the captured piece, which differs from [`Move::to`] for en passant.
    #[inline(always)]
    pub const fn captured_square(&self) -> Square {
        if self.is_en_passant() {
            Square::new(self.to.file(), self.from.rank())
        } else {
            self.to
        }
    }

    /// The [`MoveKind`] of this move.
    #[inline(always)]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    /// Returns `true` if this move captures a piece.
    #[inline(always)]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Returns `true` if this move is an en passant capture.
    #[inline(always)]
    pub const fn is_en_passant(&self) -> bool {
        matches!(self.kind, MoveKind::EnPassantCapture)
    }

    /// Returns `true` if this move is a Pawn advancing two squares.
    #[inline(always)]
    pub const fn is_pawn_double_push(&self) -> bool {
        matches!(self.kind, MoveKind::PawnDoublePush)
    }

    /// Returns `true` if this move castles on either side.
    #[inline(always)]
    pub const fn is_castle(&self) -> bool {
        matches!(self.kind, MoveKind::ShortCastle | MoveKind::LongCastle)
    }

    /// The side this move castles toward, if it is a castle.
    #[inline(always)]
    pub const fn castle_side(&self) -> Option<CastleSide> {
        match self.kind {
            MoveKind::ShortCastle => Some(CastleSide::Short),
            MoveKind::LongCastle => Some(CastleSide::Long),
            _ => None,
        }
    }

    /// Returns `true` if this move takes a Pawn to its last rank, whether or not the promotion is resolved.
    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    /// Returns `true` if this move promotes but no kind has been chosen yet.
    #[inline(always)]
    pub const fn is_pending_promotion(&self) -> bool {
        matches!(self.promotion, Some(Promotion::Pending))
    }

    /// The kind this move promotes to, once resolved.
    #[inline(always)]
    pub const fn promotion(&self) -> Option<PieceKind> {
        match self.promotion {
            Some(Promotion::To(kind)) => Some(kind),
            _ => None,
        }
    }

    /// The piece standing on [`Move::to`] after this move is played.
    ///
    /// An unresolved promotion yields the Pawn itself.
    #[inline(always)]
    pub const fn landing_piece(&self) -> Piece {
        match self.promotion() {
            Some(kind) => self.piece.promoted(kind),
            None => self.piece,
        }
    }

    /// Converts this move to its two-square literal, such as `e2e4`, followed by the promotion
    /// choice if there is one, such as `e7e8q`.
    pub fn to_uci(&self) -> String {
        match self.promotion() {
            Some(kind) => format!("{}{}{}", self.from, self.to, kind),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

impl PartialEq for Move {
    /// Moves are identified by their squares alone.
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
    }
}

impl<T: AsRef<str>> PartialEq<T> for Move {
    /// Compares against a two-square literal, such as `"e2e4"`.
    #[inline(always)]
    fn eq(&self, other: &T) -> bool {
        let other = other.as_ref();
        other.len() == 4
            && other.get(..2) == Some(self.from.to_uci().as_str())
            && other.get(2..) == Some(self.to.to_uci().as_str())
    }
}

impl fmt::Display for Move {
    /// Displays the two-square literal of this move, such as `e2e4`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl fmt::Debug for Move {
    /// Displays the two-square literal along with what kind of move this is.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({}", self.kind)?;
        if let Some(captured) = self.captured {
            write!(f, " of {}", captured.name())?;
        }
        match self.promotion {
            Some(Promotion::Pending) => write!(f, ", promotion pending")?,
            Some(Promotion::To(kind)) => write!(f, ", promotes to {}", kind.name())?,
            None => {}
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_inference() {
        let board = Board::from_fen("r3k3/1P6/8/3pP3/8/8/8/4K2R").unwrap();

        let quiet = Move::new(Square::H1, Square::H5, &board).unwrap();
        assert_eq!(quiet.kind(), MoveKind::Quiet);
        assert!(!quiet.is_capture());

        let ep = Move::new(Square::E5, Square::D6, &board).unwrap();
        assert!(ep.is_en_passant());
        assert_eq!(ep.captured(), Some(Piece::BLACK_PAWN));
        assert_eq!(ep.captured_square(), Square::D5);

        let castle = Move::new(Square::E1, Square::G1, &board).unwrap();
        assert_eq!(castle.castle_side(), Some(CastleSide::Short));

        let promote_capture = Move::new(Square::B7, Square::A8, &board).unwrap();
        assert!(promote_capture.is_pending_promotion());
        assert_eq!(promote_capture.captured(), Some(Piece::BLACK_ROOK));
    }

    #[test]
    fn test_identity_is_by_squares() {
        let board = Board::from_fen("8/4P3/8/8/8/8/8/k6K").unwrap();
        let pending = Move::new(Square::E7, Square::E8, &board).unwrap();
        let queen = pending.with_promotion(PieceKind::Queen).unwrap();

        assert_eq!(pending, queen);
        assert_eq!(queen, "e7e8");
        assert_ne!(queen, "e7e8q");
        assert_eq!(queen.to_uci(), "e7e8q");
        assert_eq!(queen.to_string(), "e7e8");
        assert_eq!(queen.landing_piece(), Piece::WHITE_QUEEN);
        assert_eq!(pending.landing_piece(), Piece::WHITE_PAWN);
    }

    #[test]
    fn test_string_comparison_handles_multibyte_text() {
        let board = Board::startpos();
        let mv = Move::new(Square::A2, Square::A3, &board).unwrap();

        // 4 bytes, but the char boundary falls inside the first square
        assert_ne!(mv, "aé1");
        assert_ne!(mv, "a2é");
        assert_ne!(mv, "a2a");
        assert_eq!(mv, "a2a3");
    }

    #[test]
    fn test_non_promotions_cannot_be_resolved() {
        let board = Board::startpos();
        let mv = Move::new(Square::G1, Square::F3, &board).unwrap();
        assert!(mv.with_promotion(PieceKind::Queen).is_err());
    }
}
