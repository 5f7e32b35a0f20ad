/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use arrayvec::ArrayVec;

use super::{Board, Color, Piece, PieceKind, Square};

/// Most squares a ray can cover before leaving the board.
pub(crate) const MAX_RAY_LENGTH: i8 = 7;

/// A step on the board, as a `(file, rank)` delta.
///
/// Used both for the eight sliding directions and for the eight Knight jumps.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    file: i8,
    rank: i8,
}

impl Direction {
    pub const NORTH: Self = Self::new(0, 1);
    pub const SOUTH: Self = Self::new(0, -1);
    pub const EAST: Self = Self::new(1, 0);
    pub const WEST: Self = Self::new(-1, 0);
    pub const NORTH_EAST: Self = Self::new(1, 1);
    pub const NORTH_WEST: Self = Self::new(-1, 1);
    pub const SOUTH_EAST: Self = Self::new(1, -1);
    pub const SOUTH_WEST: Self = Self::new(-1, -1);

    /// Directions a Rook slides in.
    pub const ORTHOGONALS: [Self; 4] = [Self::NORTH, Self::WEST, Self::SOUTH, Self::EAST];

    /// Directions a Bishop slides in.
    pub const DIAGONALS: [Self; 4] = [
        Self::NORTH_WEST,
        Self::NORTH_EAST,
        Self::SOUTH_WEST,
        Self::SOUTH_EAST,
    ];

    /// All eight compass and diagonal directions, orthogonals first.
    pub const ALL: [Self; 8] = [
        Self::NORTH,
        Self::WEST,
        Self::SOUTH,
        Self::EAST,
        Self::NORTH_WEST,
        Self::NORTH_EAST,
        Self::SOUTH_WEST,
        Self::SOUTH_EAST,
    ];

    /// The eight jumps a Knight may make.
    #[rustfmt::skip]
    pub const KNIGHT_JUMPS: [Self; 8] = [
        Self::new(-1, 2), Self::new(1, 2),
        Self::new(-2, 1), Self::new(2, 1),
        Self::new(-2, -1), Self::new(2, -1),
        Self::new(-1, -2), Self::new(1, -2),
    ];

    /// Creates a new [`Direction`] from a file and rank delta.
    #[inline(always)]
    pub const fn new(file: i8, rank: i8) -> Self {
        Self { file, rank }
    }

    /// The direction `color`'s Pawns advance in.
    #[inline(always)]
    pub const fn forward(color: Color) -> Self {
        Self::new(0, color.negation_multiplier())
    }

    /// How many files a single step of this [`Direction`] crosses.
    #[inline(always)]
    pub const fn file_delta(&self) -> i8 {
        self.file
    }

    /// How many ranks a single step of this [`Direction`] crosses.
    #[inline(always)]
    pub const fn rank_delta(&self) -> i8 {
        self.rank
    }

    /// The opposite [`Direction`].
    ///
    /// # Example
    /// ```
    /// # use newt::Direction;
    /// assert_eq!(Direction::NORTH_EAST.reversed(), Direction::SOUTH_WEST);
    /// ```
    #[inline(always)]
    pub const fn reversed(&self) -> Self {
        Self::new(-self.file, -self.rank)
    }

    /// Returns `true` if this steps along a rank or file.
    #[inline(always)]
    pub const fn is_orthogonal(&self) -> bool {
        (self.file == 0) != (self.rank == 0)
    }

    /// Returns `true` if this steps along a diagonal.
    #[inline(always)]
    pub const fn is_diagonal(&self) -> bool {
        self.file != 0 && self.file.abs() == self.rank.abs()
    }

    /// Returns `true` if `self` and `other` lie on the same line, in either sense.
    #[inline(always)]
    pub fn is_colinear_with(&self, other: Self) -> bool {
        *self == other || *self == other.reversed()
    }
}

impl fmt::Debug for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:+}, {:+})", self.file, self.rank)
    }
}

/// An enemy piece attacking the King.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CheckRecord {
    /// Where the attacker stands.
    pub attacker: Square,

    /// The step from the King toward the attacker; a Knight jump for Knight checks.
    pub direction: Direction,
}

impl CheckRecord {
    /// Every square a non-King piece may move to in order to resolve this check:
    /// the squares between the King and the attacker, and the attacker's own square.
    ///
    /// For Knights and adjacent attackers, this is only the attacker's square.
    pub fn resolving_squares(&self, king: Square) -> ArrayVec<Square, { MAX_RAY_LENGTH as usize }> {
        let mut squares = ArrayVec::new();
        for n in 1..=MAX_RAY_LENGTH {
            let Some(square) = king.step(self.direction, n) else {
                break;
            };

            squares.push(square);
            if square == self.attacker {
                break;
            }
        }
        squares
    }
}

/// An allied piece that may not leave the line between its King and an enemy slider.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PinRecord {
    /// Where the pinned piece stands.
    pub pinned: Square,

    /// The step from the King through the pinned piece.
    pub direction: Direction,
}

/// Read-only lookup from a square to the direction its piece is pinned along.
///
/// Built once per legal move query and shared by every generator.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PinMap {
    pins: [Option<Direction>; Square::COUNT],
}

impl PinMap {
    /// A map in which nothing is pinned.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            pins: [None; Square::COUNT],
        }
    }

    #[inline(always)]
    fn insert(&mut self, pin: PinRecord) {
        self.pins[pin.pinned] = Some(pin.direction);
    }

    /// Fetches the direction the piece on `square` is pinned along, if any.
    #[inline(always)]
    pub const fn get(&self, square: Square) -> Option<Direction> {
        self.pins[square.index()]
    }

    /// Returns `true` if the piece on `square` is pinned.
    #[inline(always)]
    pub const fn is_pinned(&self, square: Square) -> bool {
        self.get(square).is_some()
    }

    /// Returns `true` if the piece on `square` may move along `direction` without leaving its pin line.
    #[inline(always)]
    pub fn allows(&self, square: Square, direction: Direction) -> bool {
        self.get(square)
            .map_or(true, |pin| pin.is_colinear_with(direction))
    }

    /// An iterator over every pin in this map.
    pub fn iter(&self) -> impl Iterator<Item = PinRecord> + '_ {
        Square::iter().filter_map(|pinned| {
            self.get(pinned)
                .map(|direction| PinRecord { pinned, direction })
        })
    }
}

impl Default for PinMap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PinMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Returns `true` if `piece`, found `distance` steps from a target square along `direction`,
/// attacks that target.
///
/// `direction` points from the target toward the piece.
#[inline(always)]
fn attacks_along(piece: Piece, direction: Direction, distance: i8) -> bool {
    match piece.kind() {
        PieceKind::Rook => direction.is_orthogonal(),
        PieceKind::Bishop => direction.is_diagonal(),
        PieceKind::Queen => true,
        PieceKind::King => distance == 1,
        // A Pawn attacks diagonally forward, so the target lies behind it
        PieceKind::Pawn => {
            distance == 1
                && direction.is_diagonal()
                && direction.rank_delta() == -piece.color().negation_multiplier()
        }
        PieceKind::Knight => false,
    }
}

/// Checks and pins against one side's King.
#[derive(Clone, Debug)]
pub struct CheckInfo {
    /// At most 8 sliding attackers and 8 Knights can reach a square.
    checks: ArrayVec<CheckRecord, 16>,
    pins: PinMap,
}

impl CheckInfo {
    /// Scans outward from the King of `color`, as recorded in `kings`.
    ///
    /// The King's position is read from `kings` rather than from the board so that a
    /// King can be probed on a square it does not (yet) occupy. The allied King is
    /// transparent to the scan for the same reason.
    pub fn for_side(board: &Board, kings: &[Square; Color::COUNT], color: Color) -> Self {
        Self::scan(board, kings[color], color)
    }

    /// Scans outward from `king` for attacks on `color`.
    ///
    /// Along each of the eight directions, the first allied piece becomes a candidate
    /// pin, a second allied piece ends the ray, and the first enemy piece either pins
    /// the candidate or checks the King if it can attack along that line.
    pub fn scan(board: &Board, king: Square, color: Color) -> Self {
        let mut checks = ArrayVec::new();
        let mut pins = PinMap::new();

        for direction in Direction::ALL {
            let mut candidate = None;

            for distance in 1..=MAX_RAY_LENGTH {
                let Some(square) = king.step(direction, distance) else {
                    break;
                };

                let Some(piece) = board.piece_at(square) else {
                    continue;
                };

                if piece.color() == color {
                    if piece.is_king() {
                        continue;
                    }

                    if candidate.is_some() {
                        break;
                    }
                    candidate = Some(square);
                    continue;
                }

                if attacks_along(piece, direction, distance) {
                    match candidate {
                        Some(pinned) => pins.insert(PinRecord { pinned, direction }),
                        None => checks.push(CheckRecord {
                            attacker: square,
                            direction,
                        }),
                    }
                }
                break;
            }
        }

        let knight = Piece::new(color.opponent(), PieceKind::Knight);
        for jump in Direction::KNIGHT_JUMPS {
            if let Some(square) = king.step(jump, 1) {
                if board.piece_at(square) == Some(knight) {
                    checks.push(CheckRecord {
                        attacker: square,
                        direction: jump,
                    });
                }
            }
        }

        Self { checks, pins }
    }

    /// Every enemy piece attacking the King.
    #[inline(always)]
    pub fn checks(&self) -> &[CheckRecord] {
        &self.checks
    }

    /// Every allied piece pinned to the King.
    #[inline(always)]
    pub const fn pins(&self) -> &PinMap {
        &self.pins
    }

    /// Returns `true` if the King is attacked.
    #[inline(always)]
    pub fn is_in_check(&self) -> bool {
        !self.checks.is_empty()
    }

    /// Returns `true` if more than one enemy piece attacks the King.
    #[inline(always)]
    pub fn is_in_double_check(&self) -> bool {
        self.checks.len() > 1
    }
}

/// Returns `true` if any piece of color `by` attacks `square`.
///
/// Works from any square, occupied or not. Every piece on the board blocks rays.
///
/// # Example
/// ```
/// # use newt::{is_square_attacked, Board, Color, Square};
/// let board = Board::startpos();
/// assert!(is_square_attacked(&board, Square::F3, Color::White));
/// assert!(!is_square_attacked(&board, Square::E4, Color::White));
/// assert!(is_square_attacked(&board, Square::F6, Color::Black));
/// ```
pub fn is_square_attacked(board: &Board, square: Square, by: Color) -> bool {
    for direction in Direction::ALL {
        for distance in 1..=MAX_RAY_LENGTH {
            let Some(target) = square.step(direction, distance) else {
                break;
            };

            if let Some(piece) = board.piece_at(target) {
                if piece.color() == by && attacks_along(piece, direction, distance) {
                    return true;
                }
                break;
            }
        }
    }

    let knight = Piece::new(by, PieceKind::Knight);
    Direction::KNIGHT_JUMPS
        .into_iter()
        .filter_map(|jump| square.step(jump, 1))
        .any(|target| board.piece_at(target) == Some(knight))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_fen(placements: &str, king: Square, color: Color) -> CheckInfo {
        CheckInfo::scan(&Board::from_fen(placements).unwrap(), king, color)
    }

    #[test]
    fn test_startpos_has_no_checks_or_pins() {
        let info = scan_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR", Square::E1, Color::White);
        assert!(!info.is_in_check());
        assert_eq!(info.pins().iter().count(), 0);
    }

    #[test]
    fn test_rook_pins_knight_to_king() {
        let info = scan_fen("4r2k/8/8/8/8/8/4N3/4K3", Square::E1, Color::White);
        assert!(!info.is_in_check());
        assert_eq!(info.pins().get(Square::E2), Some(Direction::NORTH));
        assert!(info.pins().allows(Square::E2, Direction::SOUTH));
        assert!(!info.pins().allows(Square::E2, Direction::EAST));
    }

    #[test]
    fn test_two_allies_on_a_ray_means_no_pin() {
        let info = scan_fen("4r2k/8/8/8/4P3/8/4N3/4K3", Square::E1, Color::White);
        assert!(!info.pins().is_pinned(Square::E2));
        assert!(!info.pins().is_pinned(Square::E4));
    }

    #[test]
    fn test_bishop_on_orthogonal_ray_does_not_pin() {
        let info = scan_fen("4b2k/8/8/8/8/8/4N3/4K3", Square::E1, Color::White);
        assert!(!info.pins().is_pinned(Square::E2));
    }

    #[test]
    fn test_pawn_checks_only_from_forward_diagonal() {
        // A black pawn on d2 attacks e1
        let info = scan_fen("7k/8/8/8/8/8/3p4/4K3", Square::E1, Color::White);
        assert_eq!(info.checks().len(), 1);

        // A black pawn on d1 beside the King does not
        let info = scan_fen("7k/8/8/8/8/8/8/3pK3", Square::E1, Color::White);
        assert!(!info.is_in_check());

        // A white pawn on d2 does not attack a black King on e1
        let info = scan_fen("8/8/8/8/8/8/3P4/4k2K", Square::E1, Color::Black);
        assert!(!info.is_in_check());
    }

    #[test]
    fn test_double_check_by_rook_and_knight() {
        let info = scan_fen("4r2k/8/8/8/8/3n4/8/4K3", Square::E1, Color::White);
        assert!(info.is_in_double_check());
        let attackers = info.checks().iter().map(|c| c.attacker).collect::<Vec<_>>();
        assert!(attackers.contains(&Square::E8));
        assert!(attackers.contains(&Square::D3));
    }

    #[test]
    fn test_resolving_squares_for_slider_and_knight() {
        let info = scan_fen("4r2k/8/8/8/8/8/8/4K3", Square::E1, Color::White);
        let squares = info.checks()[0].resolving_squares(Square::E1);
        assert_eq!(squares.first(), Some(&Square::E2));
        assert_eq!(squares.last(), Some(&Square::E8));
        assert_eq!(squares.len(), 7);

        let info = scan_fen("7k/8/8/8/8/3n4/8/4K3", Square::E1, Color::White);
        let squares = info.checks()[0].resolving_squares(Square::E1);
        assert_eq!(squares.as_slice(), &[Square::D3]);
    }

    #[test]
    fn test_allied_king_is_transparent_to_king_scan() {
        // Probing f1 with the King still on e1: the rook on a1 attacks through e1
        let board = Board::from_fen("7k/8/8/8/8/8/8/r3K3").unwrap();
        let info = CheckInfo::scan(&board, Square::F1, Color::White);
        assert!(info.is_in_check());

        // But a plain attack query treats the King as a blocker
        assert!(!is_square_attacked(&board, Square::F1, Color::Black));
    }
}
