/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use anyhow::{bail, Context, Result};

use super::{Color, Direction};

/// Represents a single square on an `8x8` chess board.
///
/// Squares use [Least Significant File Mapping](https://www.chessprogramming.org/Square_Mapping_Considerations#Deduction_on_Files_and_Ranks),
/// so `square = file + rank * 8`. The indices of each square on the board is given as follows:
/// ```text
/// 8| 56 57 58 59 60 61 62 63
/// 7| 48 49 50 51 52 53 54 55
/// 6| 40 41 42 43 44 45 46 47
/// 5| 32 33 34 35 36 37 38 39
/// 4| 24 25 26 27 28 29 30 31
/// 3| 16 17 18 19 20 21 22 23
/// 2|  8  9 10 11 12 13 14 15
/// 1|  0  1  2  3  4  5  6  7
///  +------------------------
///    a  b  c  d  e  f  g  h
/// ```
///
/// A [`Square`] can also be addressed by `(row, column)` as seen from White's side of a
/// screen, where row `0` is the eighth rank. See [`Square::from_coords`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Square(pub(crate) u8);

#[rustfmt::skip]
impl Square {
    pub const A1: Self = Self(0);  pub const B1: Self = Self(1);  pub const C1: Self = Self(2);  pub const D1: Self = Self(3);
    pub const E1: Self = Self(4);  pub const F1: Self = Self(5);  pub const G1: Self = Self(6);  pub const H1: Self = Self(7);
    pub const A2: Self = Self(8);  pub const B2: Self = Self(9);  pub const C2: Self = Self(10); pub const D2: Self = Self(11);
    pub const E2: Self = Self(12); pub const F2: Self = Self(13); pub const G2: Self = Self(14); pub const H2: Self = Self(15);
    pub const A3: Self = Self(16); pub const B3: Self = Self(17); pub const C3: Self = Self(18); pub const D3: Self = Self(19);
    pub const E3: Self = Self(20); pub const F3: Self = Self(21); pub const G3: Self = Self(22); pub const H3: Self = Self(23);
    pub const A4: Self = Self(24); pub const B4: Self = Self(25); pub const C4: Self = Self(26); pub const D4: Self = Self(27);
    pub const E4: Self = Self(28); pub const F4: Self = Self(29); pub const G4: Self = Self(30); pub const H4: Self = Self(31);
    pub const A5: Self = Self(32); pub const B5: Self = Self(33); pub const C5: Self = Self(34); pub const D5: Self = Self(35);
    pub const E5: Self = Self(36); pub const F5: Self = Self(37); pub const G5: Self = Self(38); pub const H5: Self = Self(39);
    pub const A6: Self = Self(40); pub const B6: Self = Self(41); pub const C6: Self = Self(42); pub const D6: Self = Self(43);
    pub const E6: Self = Self(44); pub const F6: Self = Self(45); pub const G6: Self = Self(46); pub const H6: Self = Self(47);
    pub const A7: Self = Self(48); pub const B7: Self = Self(49); pub const C7: Self = Self(50); pub const D7: Self = Self(51);
    pub const E7: Self = Self(52); pub const F7: Self = Self(53); pub const G7: Self = Self(54); pub const H7: Self = Self(55);
    pub const A8: Self = Self(56); pub const B8: Self = Self(57); pub const C8: Self = Self(58); pub const D8: Self = Self(59);
    pub const E8: Self = Self(60); pub const F8: Self = Self(61); pub const G8: Self = Self(62); pub const H8: Self = Self(63);
}

impl Square {
    /// Number of squares on the board.
    pub const COUNT: usize = 64;

    /// Lowest valid inner value.
    pub const MIN: u8 = 0;

    /// Highest valid inner value.
    pub const MAX: u8 = 63;

    /// An iterator over all squares, from A1 to H8.
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// let mut iter = Square::iter();
    /// assert_eq!(iter.next().unwrap(), Square::A1);
    /// assert_eq!(iter.last().unwrap(), Square::H8);
    /// ```
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }

    /// Creates a new [`Square`] from the provided [`File`] and [`Rank`].
    ///
    /// # Example
    /// ```
    /// # use newt::{Square, File, Rank};
    /// let c4 = Square::new(File::C, Rank::FOUR);
    /// assert_eq!(c4, Square::C4);
    /// ```
    #[inline(always)]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self(file.0 | rank.0 << 3)
    }

    /// Creates a new [`Square`] from a `(row, column)` pair, where row `0` is the eighth rank and column `0` is the A file.
    ///
    /// Both values must be in `[0, 8)`, or else an error is returned.
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// assert_eq!(Square::from_coords(7, 4).unwrap(), Square::E1);
    /// assert_eq!(Square::from_coords(0, 0).unwrap(), Square::A8);
    /// assert!(Square::from_coords(8, 0).is_err());
    /// ```
    pub fn from_coords(row: usize, col: usize) -> Result<Self> {
        if row >= Rank::COUNT || col >= File::COUNT {
            bail!("Invalid coordinates for Square: row and column must be in [0, 8). Got ({row}, {col})");
        }

        Ok(Self::new(File(col as u8), Rank(7 - row as u8)))
    }

    /// Returns the [`File`] of this [`Square`].
    #[inline(always)]
    pub const fn file(&self) -> File {
        File(self.0 & 7)
    }

    /// Returns the [`Rank`] of this [`Square`].
    #[inline(always)]
    pub const fn rank(&self) -> Rank {
        Rank(self.0 >> 3)
    }

    /// Returns the screen row of this [`Square`], where row `0` is the eighth rank.
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// assert_eq!(Square::E2.row(), 6);
    /// ```
    #[inline(always)]
    pub const fn row(&self) -> usize {
        7 - self.rank().0 as usize
    }

    /// Returns the screen column of this [`Square`], where column `0` is the A file.
    #[inline(always)]
    pub const fn col(&self) -> usize {
        self.file().0 as usize
    }

    /// Returns this [`Square`] as a `usize`, for indexing into lists.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Attempt to offset this [`Square`] by the file and rank offsets.
    ///
    /// If the result would leave the board, `None` is returned.
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// assert_eq!(Square::C4.offset(1, 1), Some(Square::D5));
    /// assert_eq!(Square::C4.offset(-1, -1), Some(Square::B3));
    /// assert_eq!(Square::A1.offset(-1, -1), None);
    /// ```
    #[inline(always)]
    pub const fn offset(&self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let Some(file) = self.file().offset(file_delta) else {
            return None;
        };

        let Some(rank) = self.rank().offset(rank_delta) else {
            return None;
        };

        Some(Self::new(file, rank))
    }

    /// Steps `n` times in the provided [`Direction`], if that stays on the board.
    ///
    /// # Example
    /// ```
    /// # use newt::{Direction, Square};
    /// assert_eq!(Square::A1.step(Direction::NORTH_EAST, 3), Some(Square::D4));
    /// assert_eq!(Square::A1.step(Direction::SOUTH, 1), None);
    /// ```
    #[inline(always)]
    pub const fn step(&self, direction: Direction, n: i8) -> Option<Self> {
        self.offset(direction.file_delta() * n, direction.rank_delta() * n)
    }

    /// Moves this [`Square`] `n` ranks toward the opponent of `color`, if possible.
    ///
    /// # Example
    /// ```
    /// # use newt::{Square, Color};
    /// assert_eq!(Square::C4.forward_by(Color::White, 1), Some(Square::C5));
    /// assert_eq!(Square::C4.forward_by(Color::Black, 1), Some(Square::C3));
    /// ```
    #[inline(always)]
    pub const fn forward_by(&self, color: Color, n: u8) -> Option<Self> {
        self.offset(0, n as i8 * color.negation_multiplier())
    }

    /// Moves this [`Square`] `n` ranks toward `color`'s own back rank, if possible.
    #[inline(always)]
    pub const fn backward_by(&self, color: Color, n: u8) -> Option<Self> {
        self.offset(0, -(n as i8) * color.negation_multiplier())
    }

    /// Creates a [`Square`] from a string, according to the [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation.
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// let c4 = Square::from_uci("c4");
    /// assert!(c4.is_ok());
    /// assert_eq!(c4.unwrap(), Square::C4);
    ///
    /// let err = Square::from_uci("z0");
    /// assert!(err.is_err());
    /// ```
    pub fn from_uci(square: &str) -> Result<Self> {
        let mut chars = square.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            bail!("Invalid Square string: String must contain exactly 2 characters. Got {square:?}");
        };

        let file = File::from_char(file).with_context(|| format!("Invalid Square {square:?}"))?;
        let rank = Rank::from_char(rank).with_context(|| format!("Invalid Square {square:?}"))?;

        Ok(Self::new(file, rank))
    }

    /// Converts this [`Square`] to a string, according to the [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation.
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// assert_eq!("c4", Square::C4.to_uci());
    /// ```
    #[inline(always)]
    pub fn to_uci(self) -> String {
        format!("{}{}", self.file(), self.rank())
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    /// Wrapper for [`Square::from_uci`].
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl<T> Index<Square> for [T; Square::COUNT] {
    type Output = T;
    /// A [`Square`] can be used to index into a list of 64 elements.
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<Square> for [T; Square::COUNT] {
    /// A [`Square`] can be used to mutably index into a list of 64 elements.
    #[inline(always)]
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

impl fmt::Display for Square {
    /// Calls [`Square::to_uci`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl fmt::Debug for Square {
    /// Calls [`Square::to_uci`] and also displays the internal decimal value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.to_uci(), self.0)
    }
}

/// Represents one of eight ranks on a chess board.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Rank(pub(crate) u8);

impl Rank {
    pub const ONE: Self = Self(0);
    pub const TWO: Self = Self(1);
    pub const THREE: Self = Self(2);
    pub const FOUR: Self = Self(3);
    pub const FIVE: Self = Self(4);
    pub const SIX: Self = Self(5);
    pub const SEVEN: Self = Self(6);
    pub const EIGHT: Self = Self(7);

    /// Number of ranks on the board.
    pub const COUNT: usize = 8;

    /// An iterator over all ranks, from [`Rank::ONE`] to [`Rank::EIGHT`].
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }

    /// The back rank of `color`.
    #[inline(always)]
    pub const fn first(color: Color) -> Self {
        Self::ONE.relative_to(color)
    }

    /// The rank `color`'s Pawns start on.
    #[inline(always)]
    pub const fn second(color: Color) -> Self {
        Self::TWO.relative_to(color)
    }

    /// The rank `color`'s Pawns promote on.
    #[inline(always)]
    pub const fn eighth(color: Color) -> Self {
        Self::EIGHT.relative_to(color)
    }

    /// Creates a [`Rank`] from a `char` in `['1', '8']`.
    pub fn from_char(rank: char) -> Result<Self> {
        match rank {
            '1'..='8' => Ok(Self(rank as u8 - b'1')),
            _ => bail!("Invalid char for Rank: Must be between ['1', '8']. Got {rank:?}"),
        }
    }

    /// Returns this [`Rank`] as a `char`.
    #[inline(always)]
    pub const fn char(&self) -> char {
        (self.0 + b'1') as char
    }

    /// Returns this [`Rank`] as a `usize`.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Offsets this [`Rank`] by `delta`, returning `None` if that leaves the board.
    #[inline(always)]
    pub const fn offset(self, delta: i8) -> Option<Self> {
        let rank = self.0 as i8 + delta;
        if rank < 0 || rank >= Self::COUNT as i8 {
            None
        } else {
            Some(Self(rank as u8))
        }
    }

    /// Flips this [`Rank`] if `color` is Black.
    #[inline(always)]
    pub const fn relative_to(self, color: Color) -> Self {
        match color {
            Color::White => self,
            Color::Black => Self(7 - self.0),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

impl fmt::Debug for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

/// Represents one of eight files on a chess board.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct File(pub(crate) u8);

impl File {
    pub const A: Self = Self(0);
    pub const B: Self = Self(1);
    pub const C: Self = Self(2);
    pub const D: Self = Self(3);
    pub const E: Self = Self(4);
    pub const F: Self = Self(5);
    pub const G: Self = Self(6);
    pub const H: Self = Self(7);

    /// Number of files on the board.
    pub const COUNT: usize = 8;

    /// An iterator over all files, from [`File::A`] to [`File::H`].
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }

    /// Creates a [`File`] from a `char` in `['a', 'h']` (case-insensitive).
    pub fn from_char(file: char) -> Result<Self> {
        match file.to_ascii_lowercase() {
            c @ 'a'..='h' => Ok(Self(c as u8 - b'a')),
            _ => bail!("Invalid char for File: Must be between ['a', 'h']. Got {file:?}"),
        }
    }

    /// Returns this [`File`] as a lowercase `char`.
    #[inline(always)]
    pub const fn char(&self) -> char {
        (self.0 + b'a') as char
    }

    /// Returns this [`File`] as a `usize`.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Offsets this [`File`] by `delta`, returning `None` if that leaves the board.
    #[inline(always)]
    pub const fn offset(self, delta: i8) -> Option<Self> {
        let file = self.0 as i8 + delta;
        if file < 0 || file >= Self::COUNT as i8 {
            None
        } else {
            Some(Self(file as u8))
        }
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coords_round_trip_through_rows_and_columns() {
        for square in Square::iter() {
            let back = Square::from_coords(square.row(), square.col()).unwrap();
            assert_eq!(back, square);
        }
    }

    #[test]
    fn test_coords_reject_off_board() {
        assert!(Square::from_coords(0, 8).is_err());
        assert!(Square::from_coords(8, 8).is_err());
    }

    #[test]
    fn test_from_uci_rejects_garbage() {
        assert!(Square::from_uci("").is_err());
        assert!(Square::from_uci("e").is_err());
        assert!(Square::from_uci("e22").is_err());
        assert!(Square::from_uci("i1").is_err());
        assert!(Square::from_uci("a9").is_err());
        assert_eq!(Square::from_uci("H8").unwrap(), Square::H8);
    }

    #[test]
    fn test_offsets_stay_on_board() {
        assert_eq!(Square::H8.offset(1, 0), None);
        assert_eq!(Square::H8.offset(0, 1), None);
        assert_eq!(Square::B1.offset(-2, 1), None);
        assert_eq!(Square::B1.offset(-1, 2), Some(Square::A3));
        assert_eq!(Square::E2.backward_by(Color::White, 1), Some(Square::E1));
        assert_eq!(Square::E7.backward_by(Color::Black, 1), Some(Square::E8));
    }

    #[test]
    fn test_relative_ranks() {
        assert_eq!(Rank::second(Color::White), Rank::TWO);
        assert_eq!(Rank::second(Color::Black), Rank::SEVEN);
        assert_eq!(Rank::eighth(Color::Black), Rank::ONE);
        assert_eq!(Rank::first(Color::Black), Rank::EIGHT);
    }
}
