/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use arrayvec::ArrayVec;

use super::{
    is_square_attacked, Board, CastleSide, CastlingRights, CheckInfo, CheckRecord, Color,
    Direction, Move, MoveList, Piece, PieceKind, PinMap, Rank, Square, MAX_RAY_LENGTH,
};

/// Temporarily moves one side's entry in a King-location cache, restoring it when dropped.
///
/// The board itself is never touched; only the cache is. Since [`CheckInfo`] treats the allied
/// King as transparent, scanning from the relocated square answers "would the King be attacked
/// there?" without having to move any pieces.
///
/// # Example
/// ```
/// # use newt::{Color, RelocatedKing, Square};
/// let mut kings = [Square::E1, Square::E8];
/// {
///     let probe = RelocatedKing::new(&mut kings, Color::White, Square::F2);
///     assert_eq!(probe.kings()[Color::White], Square::F2);
/// }
/// assert_eq!(kings, [Square::E1, Square::E8]);
/// ```
pub struct RelocatedKing<'k> {
    kings: &'k mut [Square; Color::COUNT],
    color: Color,
    home: Square,
}

impl<'k> RelocatedKing<'k> {
    /// Moves `color`'s King in `kings` to `to` until the returned guard is dropped.
    #[inline(always)]
    pub fn new(kings: &'k mut [Square; Color::COUNT], color: Color, to: Square) -> Self {
        let home = kings[color];
        kings[color] = to;
        Self { kings, color, home }
    }

    /// The cache, as seen while the King is relocated.
    #[inline(always)]
    pub fn kings(&self) -> &[Square; Color::COUNT] {
        self.kings
    }
}

impl Drop for RelocatedKing<'_> {
    #[inline(always)]
    fn drop(&mut self) {
        self.kings[self.color] = self.home;
    }
}

/// The squares a non-King move must land on to resolve a single check.
#[derive(Clone, Debug)]
pub struct CheckEvasion {
    checker: Square,
    resolving: ArrayVec<Square, { MAX_RAY_LENGTH as usize }>,
}

impl CheckEvasion {
    /// Builds the evasion set for `check` against the King on `king`.
    pub fn new(check: &CheckRecord, king: Square) -> Self {
        Self {
            checker: check.attacker,
            resolving: check.resolving_squares(king),
        }
    }

    /// Returns `true` if `mv` blocks or captures the checker.
    ///
    /// King moves are not judged here; they are validated on their own.
    #[inline(always)]
    pub fn allows(&self, mv: &Move) -> bool {
        mv.piece().is_king()
            || self.resolving.contains(&mv.to())
            || (mv.is_en_passant() && mv.captured_square() == self.checker)
    }
}

/// How a position's check status narrows move generation.
#[derive(Clone, Debug)]
enum CheckStatus {
    Clear,
    Single(CheckEvasion),
    Double,
}

/// Generates every legal move for one side of a position.
///
/// Each per-piece generator emits only moves that respect pins and never leave the King
/// attacked; the check status is applied as moves are collected, so the output list never
/// holds a move that would later be thrown away.
pub struct MoveGen<'a> {
    board: &'a Board,
    kings: &'a mut [Square; Color::COUNT],
    color: Color,
    pins: &'a PinMap,
    castling: CastlingRights,
    ep_square: Option<Square>,
    status: CheckStatus,
    moves: MoveList,
}

impl<'a> MoveGen<'a> {
    /// Prepares a generator for `color`, using the pins and checks already found in `info`.
    pub fn new(
        board: &'a Board,
        kings: &'a mut [Square; Color::COUNT],
        color: Color,
        info: &'a CheckInfo,
        castling: CastlingRights,
        ep_square: Option<Square>,
    ) -> Self {
        let status = match info.checks() {
            [] => CheckStatus::Clear,
            [check] => CheckStatus::Single(CheckEvasion::new(check, kings[color])),
            _ => CheckStatus::Double,
        };

        Self {
            board,
            kings,
            color,
            pins: info.pins(),
            castling,
            ep_square,
            status,
            moves: MoveList::new(),
        }
    }

    /// Runs every generator for every piece of the side to move, in board order.
    pub fn generate(mut self) -> MoveList {
        let board = self.board;

        for (square, piece) in board.iter() {
            if piece.color() != self.color {
                continue;
            }

            // In double check, only the King may move
            if matches!(self.status, CheckStatus::Double) && !piece.is_king() {
                continue;
            }

            match piece.kind() {
                PieceKind::Pawn => self.generate_pawn_moves(square, piece),
                PieceKind::Knight => self.generate_knight_moves(square, piece),
                PieceKind::Bishop => {
                    self.generate_slider_moves(square, piece, &Direction::DIAGONALS)
                }
                PieceKind::Rook => {
                    self.generate_slider_moves(square, piece, &Direction::ORTHOGONALS)
                }
                PieceKind::Queen => self.generate_slider_moves(square, piece, &Direction::ALL),
                PieceKind::King => self.generate_king_moves(square, piece),
            }
        }

        self.moves
    }

    /// Adds `mv` to the output if it survives the check filter.
    #[inline(always)]
    fn push(&mut self, mv: Move) {
        let keep = match &self.status {
            CheckStatus::Clear => true,
            CheckStatus::Single(evasion) => evasion.allows(&mv),
            CheckStatus::Double => mv.piece().is_king(),
        };

        if keep {
            self.moves.push(mv);
        }
    }

    /// Pushes, double pushes, captures, and en passant.
    fn generate_pawn_moves(&mut self, from: Square, piece: Piece) {
        let forward = Direction::forward(self.color);

        if self.pins.allows(from, forward) {
            if let Some(to) = from.step(forward, 1).filter(|&to| self.board.is_empty(to)) {
                self.push(Move::from_parts(from, to, piece, self.board));

                if from.rank() == Rank::second(self.color) {
                    if let Some(to) = from.step(forward, 2).filter(|&to| self.board.is_empty(to)) {
                        self.push(Move::from_parts(from, to, piece, self.board));
                    }
                }
            }
        }

        for file_delta in [-1, 1] {
            let direction = Direction::new(file_delta, forward.rank_delta());
            let Some(to) = from.step(direction, 1) else {
                continue;
            };

            if !self.pins.allows(from, direction) {
                continue;
            }

            match self.board.color_at(to) {
                Some(color) if color != self.color => {
                    self.push(Move::from_parts(from, to, piece, self.board))
                }
                None if self.ep_square == Some(to) => {
                    let mv = Move::from_parts(from, to, piece, self.board);
                    let victim = Piece::new(self.color.opponent(), PieceKind::Pawn);

                    if self.board.piece_at(mv.captured_square()) == Some(victim)
                        && self.en_passant_is_safe(&mv)
                    {
                        self.push(mv);
                    }
                }
                _ => {}
            }
        }
    }

    /// An en passant capture removes two pieces from one rank at once, which can expose the King
    /// along that rank. No single pin covers that case, so the capture is played out on a copy.
    fn en_passant_is_safe(&self, mv: &Move) -> bool {
        let mut scratch = *self.board;
        scratch.clear(mv.from());
        scratch.clear(mv.captured_square());
        scratch.place(mv.piece(), mv.to());

        !is_square_attacked(&scratch, self.kings[self.color], self.color.opponent())
    }

    /// A pinned Knight can never stay on its pin line, so it has no moves at all.
    fn generate_knight_moves(&mut self, from: Square, piece: Piece) {
        if self.pins.is_pinned(from) {
            return;
        }

        for jump in Direction::KNIGHT_JUMPS {
            let Some(to) = from.step(jump, 1) else {
                continue;
            };

            if self.board.color_at(to) != Some(self.color) {
                self.push(Move::from_parts(from, to, piece, self.board));
            }
        }
    }

    /// Walks each ray in `directions` until the edge of the board or the first piece,
    /// including that piece's square if it is an enemy.
    fn generate_slider_moves(&mut self, from: Square, piece: Piece, directions: &[Direction]) {
        for &direction in directions {
            if !self.pins.allows(from, direction) {
                continue;
            }

            for distance in 1..=MAX_RAY_LENGTH {
                let Some(to) = from.step(direction, distance) else {
                    break;
                };

                match self.board.color_at(to) {
                    None => self.push(Move::from_parts(from, to, piece, self.board)),
                    Some(color) => {
                        if color != self.color {
                            self.push(Move::from_parts(from, to, piece, self.board));
                        }
                        break;
                    }
                }
            }
        }
    }

    /// Steps to each neighboring square that would not be attacked, then tries castling.
    fn generate_king_moves(&mut self, from: Square, piece: Piece) {
        for direction in Direction::ALL {
            let Some(to) = from.step(direction, 1) else {
                continue;
            };

            if self.board.color_at(to) == Some(self.color) {
                continue;
            }

            if !self.king_is_attacked_on(to) {
                self.push(Move::from_parts(from, to, piece, self.board));
            }
        }

        if matches!(self.status, CheckStatus::Clear) {
            self.generate_castling_moves(from, piece);
        }
    }

    /// Returns `true` if this side's King would be in check after moving to `square`.
    fn king_is_attacked_on(&mut self, square: Square) -> bool {
        let probe = RelocatedKing::new(&mut *self.kings, self.color, square);
        CheckInfo::for_side(self.board, probe.kings(), self.color).is_in_check()
    }

    /// Offers each castle whose right is held, whose path is clear, whose Rook is home, and whose
    /// King never crosses an attacked square.
    fn generate_castling_moves(&mut self, from: Square, king: Piece) {
        if from != CastleSide::king_from(self.color) {
            return;
        }

        let rank = Rank::first(self.color);
        let opponent = self.color.opponent();
        let rook = Piece::new(self.color, PieceKind::Rook);

        for side in CastleSide::ALL {
            if !self.castling.has(self.color, side) {
                continue;
            }

            if self.board.piece_at(side.rook_from(self.color)) != Some(rook) {
                continue;
            }

            let path_is_clear = side
                .between_files()
                .iter()
                .all(|&file| self.board.is_empty(Square::new(file, rank)));
            if !path_is_clear {
                continue;
            }

            let path_is_safe = !is_square_attacked(self.board, from, opponent)
                && side
                    .transit_files()
                    .iter()
                    .all(|&file| !is_square_attacked(self.board, Square::new(file, rank), opponent));
            if !path_is_safe {
                continue;
            }

            self.push(Move::from_parts(from, side.king_to(self.color), king, self.board));
        }
    }
}
