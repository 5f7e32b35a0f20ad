/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::{bail, Result};

use super::{Color, File, Rank, Square};

/// One of the two sides of the board a King may castle toward.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum CastleSide {
    /// Toward the H file ("kingside").
    Short,
    /// Toward the A file ("queenside").
    Long,
}

impl CastleSide {
    /// Both sides, kingside first.
    pub const ALL: [Self; 2] = [Self::Short, Self::Long];

    /// Determines which side a King move from `from` to `to` castles toward.
    #[inline(always)]
    pub fn of(from: Square, to: Square) -> Self {
        if to.file() > from.file() {
            Self::Short
        } else {
            Self::Long
        }
    }

    /// The file of the Rook that castles on this side, before castling.
    #[inline(always)]
    pub const fn rook_file(&self) -> File {
        match self {
            Self::Short => File::H,
            Self::Long => File::A,
        }
    }

    /// The square the King starts on.
    #[inline(always)]
    pub const fn king_from(color: Color) -> Square {
        Square::new(File::E, Rank::first(color))
    }

    /// The square the King lands on after castling on this side.
    #[inline(always)]
    pub const fn king_to(&self, color: Color) -> Square {
        let file = match self {
            Self::Short => File::G,
            Self::Long => File::C,
        };
        Square::new(file, Rank::first(color))
    }

    /// The home square of the Rook that castles on this side.
    #[inline(always)]
    pub const fn rook_from(&self, color: Color) -> Square {
        Square::new(self.rook_file(), Rank::first(color))
    }

    /// The square the Rook lands on after castling on this side.
    #[inline(always)]
    pub const fn rook_to(&self, color: Color) -> Square {
        let file = match self {
            Self::Short => File::F,
            Self::Long => File::D,
        };
        Square::new(file, Rank::first(color))
    }

    /// Files strictly between the King and the Rook; all must be empty to castle.
    #[inline(always)]
    pub const fn between_files(&self) -> &'static [File] {
        match self {
            Self::Short => &[File::F, File::G],
            Self::Long => &[File::D, File::C, File::B],
        }
    }

    /// Files the King passes through or lands on, excluding its origin; none may be attacked.
    #[inline(always)]
    pub const fn transit_files(&self) -> &'static [File] {
        match self {
            Self::Short => &[File::F, File::G],
            Self::Long => &[File::D, File::C],
        }
    }
}

/// The four castling rights of a game: kingside and queenside, for each color.
///
/// Rights are only ever revoked during a game, never re-granted.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    /// Indexed by `[color][side]`, with the short side first.
    rights: [[bool; 2]; Color::COUNT],
}

impl CastlingRights {
    /// Every right held, as in the starting position.
    pub const ALL: Self = Self {
        rights: [[true; 2]; Color::COUNT],
    };

    /// No rights held.
    pub const NONE: Self = Self {
        rights: [[false; 2]; Color::COUNT],
    };

    #[inline(always)]
    const fn side_index(side: CastleSide) -> usize {
        match side {
            CastleSide::Short => 0,
            CastleSide::Long => 1,
        }
    }

    /// Returns `true` if `color` may still castle on `side`.
    #[inline(always)]
    pub const fn has(&self, color: Color, side: CastleSide) -> bool {
        self.rights[color.index()][Self::side_index(side)]
    }

    /// Returns `true` if `color` may still castle on either side.
    #[inline(always)]
    pub const fn has_any(&self, color: Color) -> bool {
        self.has(color, CastleSide::Short) || self.has(color, CastleSide::Long)
    }

    /// Revokes `color`'s right to castle on `side`.
    #[inline(always)]
    pub fn revoke(&mut self, color: Color, side: CastleSide) {
        self.rights[color][Self::side_index(side)] = false;
    }

    /// Revokes both of `color`'s rights.
    #[inline(always)]
    pub fn revoke_all(&mut self, color: Color) {
        self.rights[color] = [false; 2];
    }

    /// Revokes the right tied to a Rook home corner, if `square` is one.
    ///
    /// Used both when a Rook leaves its corner and when something is captured there.
    pub fn revoke_corner(&mut self, square: Square) {
        for color in Color::all() {
            for side in CastleSide::ALL {
                if side.rook_from(color) == square {
                    self.revoke(color, side);
                }
            }
        }
    }

    /// Parses the castling field of a FEN string, such as `KQkq` or `-`.
    ///
    /// # Example
    /// ```
    /// # use newt::{CastlingRights, CastleSide, Color};
    /// let rights = CastlingRights::from_uci("Kq").unwrap();
    /// assert!(rights.has(Color::White, CastleSide::Short));
    /// assert!(!rights.has(Color::White, CastleSide::Long));
    /// assert!(rights.has(Color::Black, CastleSide::Long));
    /// ```
    pub fn from_uci(field: &str) -> Result<Self> {
        let mut rights = Self::NONE;
        if field == "-" {
            return Ok(rights);
        }

        for c in field.chars() {
            let (color, side) = match c {
                'K' => (Color::White, CastleSide::Short),
                'Q' => (Color::White, CastleSide::Long),
                'k' => (Color::Black, CastleSide::Short),
                'q' => (Color::Black, CastleSide::Long),
                _ => bail!("Invalid castling rights {field:?}: unexpected char {c:?}"),
            };
            rights.rights[color][Self::side_index(side)] = true;
        }

        Ok(rights)
    }

    /// Formats these rights as the castling field of a FEN string.
    pub fn to_uci(&self) -> String {
        let mut field = String::with_capacity(4);
        for (color, side, c) in [
            (Color::White, CastleSide::Short, 'K'),
            (Color::White, CastleSide::Long, 'Q'),
            (Color::Black, CastleSide::Short, 'k'),
            (Color::Black, CastleSide::Long, 'q'),
        ] {
            if self.has(color, side) {
                field.push(c);
            }
        }

        if field.is_empty() {
            field.push('-');
        }
        field
    }
}

impl Default for CastlingRights {
    #[inline(always)]
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl fmt::Debug for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastlingRights({})", self.to_uci())
    }
}
