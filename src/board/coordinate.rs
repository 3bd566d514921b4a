/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Context, Result};

/// Number of files/rows on the board.
pub const BOARD_SIZE: i8 = 8;

/// A location on the board, or one of the sentinel values used in its place.
///
/// `x` is the file (`0` is the a-file) and `y` is the row, counted from Black's back rank.
/// So White's King starts on `(4, 7)` and Black's on `(4, 0)`.
///
/// Castling moves are not expressed by the King's landing square,
/// but by a destination whose `x` is [`Coordinate::CASTLE_HIGH_X`] or [`Coordinate::CASTLE_LOW_X`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub x: i8,
    pub y: i8,
}

impl Coordinate {
    /// Component value of an absent coordinate.
    pub const ABSENT_VALUE: i8 = -1;

    /// "No coordinate", such as no King found or no square in check.
    pub const ABSENT: Self = Self::new(Self::ABSENT_VALUE, Self::ABSENT_VALUE);

    /// Destination `x` of a castle toward the rook on the h-file.
    pub const CASTLE_HIGH_X: i8 = 100;

    /// Destination `x` of a castle toward the rook on the a-file.
    pub const CASTLE_LOW_X: i8 = -100;

    /// Creates a new [`Coordinate`]. No bounds checks are performed.
    #[inline(always)]
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// The sentinel destination for castling toward the h-file on `row`.
    #[inline(always)]
    pub const fn castle_high(row: i8) -> Self {
        Self::new(Self::CASTLE_HIGH_X, row)
    }

    /// The sentinel destination for castling toward the a-file on `row`.
    #[inline(always)]
    pub const fn castle_low(row: i8) -> Self {
        Self::new(Self::CASTLE_LOW_X, row)
    }

    /// Returns `false` only for [`Coordinate::ABSENT`].
    ///
    /// # Example
    /// ```
    /// # use kingside::Coordinate;
    /// assert!(Coordinate::new(4, 7).is_valid());
    /// assert!(Coordinate::castle_high(7).is_valid());
    /// assert!(!Coordinate::ABSENT.is_valid());
    /// ```
    #[inline(always)]
    pub const fn is_valid(&self) -> bool {
        !(self.x == Self::ABSENT_VALUE && self.y == Self::ABSENT_VALUE)
    }

    /// Returns `true` if both components are within the board.
    #[inline(always)]
    pub const fn is_on_board(&self) -> bool {
        in_bounds(self.x, self.y)
    }

    /// Returns `true` if this is a castling sentinel, in either direction.
    #[inline(always)]
    pub const fn is_castle(&self) -> bool {
        self.is_castle_high() || self.is_castle_low()
    }

    #[inline(always)]
    pub const fn is_castle_high(&self) -> bool {
        self.x == Self::CASTLE_HIGH_X
    }

    #[inline(always)]
    pub const fn is_castle_low(&self) -> bool {
        self.x == Self::CASTLE_LOW_X
    }

    /// The square a King actually lands on for this destination.
    ///
    /// Castling sentinels map to the g- or c-file of their row. Every other coordinate maps to itself.
    #[inline(always)]
    pub const fn landing(&self) -> Self {
        if self.is_castle_high() {
            Self::new(6, self.y)
        } else if self.is_castle_low() {
            Self::new(2, self.y)
        } else {
            *self
        }
    }

    /// Returns the coordinate `(dx, dy)` away from this one, without bounds checks.
    #[inline(always)]
    pub const fn offset(&self, dx: i8, dy: i8) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Parses a square in algebraic notation, like `e2`.
    ///
    /// # Example
    /// ```
    /// # use kingside::Coordinate;
    /// assert_eq!(Coordinate::from_algebraic("a8").unwrap(), Coordinate::new(0, 0));
    /// assert_eq!(Coordinate::from_algebraic("e1").unwrap(), Coordinate::new(4, 7));
    /// assert!(Coordinate::from_algebraic("i9").is_err());
    /// ```
    pub fn from_algebraic(square: &str) -> Result<Self> {
        let mut chars = square.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            bail!("Invalid square {square:?}: String must contain exactly 2 characters")
        };

        let file = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file) {
            bail!("Invalid file {file:?} in square {square:?}: Must be between [a,h]");
        }

        let rank = rank
            .to_digit(10)
            .filter(|r| (1..=8).contains(r))
            .with_context(|| format!("Invalid rank {rank:?} in square {square:?}: Must be between [1,8]"))?;

        Ok(Self::new((file as u8 - b'a') as i8, BOARD_SIZE - rank as i8))
    }
}

impl Default for Coordinate {
    /// Defaults to [`Coordinate::ABSENT`].
    fn default() -> Self {
        Self::ABSENT
    }
}

impl FromStr for Coordinate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_algebraic(s.trim())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_castle_high() {
            write!(f, "O-O")
        } else if self.is_castle_low() {
            write!(f, "O-O-O")
        } else if self.is_on_board() {
            let file = (b'a' + self.x as u8) as char;
            write!(f, "{file}{}", BOARD_SIZE - self.y)
        } else {
            write!(f, "-")
        }
    }
}

/// Returns `true` if `(x, y)` is a square on the board.
#[inline(always)]
pub const fn in_bounds(x: i8, y: i8) -> bool {
    x >= 0 && x < BOARD_SIZE && y >= 0 && y < BOARD_SIZE
}
