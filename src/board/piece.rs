/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Result};

/// Represents the color of a player or piece.
///
/// White moves first and plays "up" the board, toward row `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// Number of color variants.
    pub const COUNT: usize = 2;

    /// An array of both colors, starting with White.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::White, Self::Black]
    }

    /// Returns the sign of this [`Color`] within a [`Piece`] value, and within a negamax score.
    ///
    /// # Example
    /// ```
    /// # use kingside::Color;
    /// assert_eq!(Color::White.sign(), 1);
    /// assert_eq!(Color::Black.sign(), -1);
    /// ```
    #[inline(always)]
    pub const fn sign(&self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    /// Returns this [`Color`]'s opponent.
    ///
    /// # Example
    /// ```
    /// # use kingside::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Returns this [`Color`] as a `usize`, for indexing into lists.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Direction along the `y` axis in which this color's pawns advance.
    #[inline(always)]
    pub const fn forward(&self) -> i8 {
        -self.sign()
    }

    /// The row on which this color's King and Rooks start.
    #[inline(always)]
    pub const fn back_row(&self) -> i8 {
        match self {
            Self::White => 7,
            Self::Black => 0,
        }
    }

    /// The row on which this color's pawns start, and from which they may advance two squares.
    #[inline(always)]
    pub const fn pawn_row(&self) -> i8 {
        match self {
            Self::White => 6,
            Self::Black => 1,
        }
    }

    /// The row on which this color's pawns promote.
    #[inline(always)]
    pub const fn promotion_row(&self) -> i8 {
        self.opponent().back_row()
    }

    /// Fetches a human-readable name for this [`Color`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "w" | "white" => Ok(Self::White),
            "b" | "black" => Ok(Self::Black),
            _ => bail!("Color must be either \"white\" or \"black\". Got {s:?}"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Represents the kind (or "class") of a chess piece, without its color.
///
/// The discriminant is the magnitude of the matching [`Piece`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i8)]
pub enum PieceKind {
    Pawn = 1,
    Rook = 2,
    Knight = 3,
    Bishop = 4,
    Queen = 5,
    King = 6,
}

impl PieceKind {
    /// The kinds a pawn may promote to, in the order the search considers them.
    pub const PROMOTIONS: [Self; 4] = [Self::Queen, Self::Rook, Self::Knight, Self::Bishop];

    /// Returns the material value of this [`PieceKind`], in pawns.
    ///
    /// The King is worth far more than every other piece combined, so losing it dominates any evaluation.
    #[inline(always)]
    pub const fn value(&self) -> i32 {
        match self {
            Self::Pawn => 1,
            Self::Knight | Self::Bishop => 3,
            Self::Rook => 5,
            Self::Queen => 9,
            Self::King => 100,
        }
    }

    /// Returns `true` if a pawn may promote to this kind.
    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        matches!(self, Self::Queen | Self::Rook | Self::Knight | Self::Bishop)
    }

    /// Creates a new [`PieceKind`] from a character, case-insensitive.
    ///
    /// # Example
    /// ```
    /// # use kingside::PieceKind;
    /// assert_eq!(PieceKind::from_char('Q').unwrap(), PieceKind::Queen);
    /// assert!(PieceKind::from_char('x').is_err());
    /// ```
    pub fn from_char(kind: char) -> Result<Self> {
        match kind {
            'P' | 'p' => Ok(Self::Pawn),
            'N' | 'n' => Ok(Self::Knight),
            'B' | 'b' => Ok(Self::Bishop),
            'R' | 'r' => Ok(Self::Rook),
            'Q' | 'q' => Ok(Self::Queen),
            'K' | 'k' => Ok(Self::King),
            _ => bail!("Invalid char for PieceKind: Got {kind:?}."),
        }
    }

    /// Converts this [`PieceKind`] to a lowercase character.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }

    /// Fetches a human-readable name for this [`PieceKind`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }
}

impl FromStr for PieceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => match s.to_ascii_lowercase().as_str() {
                "pawn" => Ok(Self::Pawn),
                "knight" => Ok(Self::Knight),
                "bishop" => Ok(Self::Bishop),
                "rook" => Ok(Self::Rook),
                "queen" => Ok(Self::Queen),
                "king" => Ok(Self::King),
                _ => bail!("Invalid str for PieceKind: Got {s:?}"),
            },
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The content of a single board square.
///
/// The sign of the discriminant is the color (positive for White, negative for Black)
/// and its magnitude is the [`PieceKind`]. Zero is an empty square.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Piece {
    BlackKing = -6,
    BlackQueen = -5,
    BlackBishop = -4,
    BlackKnight = -3,
    BlackRook = -2,
    BlackPawn = -1,
    #[default]
    Empty = 0,
    WhitePawn = 1,
    WhiteRook = 2,
    WhiteKnight = 3,
    WhiteBishop = 4,
    WhiteQueen = 5,
    WhiteKing = 6,
}

impl Piece {
    /// Creates a new [`Piece`] of the provided [`Color`] and [`PieceKind`].
    ///
    /// # Example
    /// ```
    /// # use kingside::{Color, Piece, PieceKind};
    /// assert_eq!(Piece::new(Color::Black, PieceKind::Rook), Piece::BlackRook);
    /// ```
    #[inline(always)]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        // Safety: `kind` is within `[1,6]` and the sign is `1` or `-1`,
        // so the product is always one of the `repr(i8)` discriminants above.
        unsafe { std::mem::transmute(color.sign() * kind as i8) }
    }

    /// Creates a [`Piece`] from its signed value, if it is within `[-6,6]`.
    #[inline(always)]
    pub const fn from_i8(value: i8) -> Option<Self> {
        if value < -6 || value > 6 {
            return None;
        }

        // Safety: every value in `[-6,6]` is a discriminant of this `repr(i8)` enum.
        Some(unsafe { std::mem::transmute::<i8, Self>(value) })
    }

    /// Returns the signed value of this [`Piece`].
    #[inline(always)]
    pub const fn value(&self) -> i8 {
        *self as i8
    }

    /// Returns `true` if this square holds no piece.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.value() == 0
    }

    /// Returns `true` if this is a White piece.
    #[inline(always)]
    pub const fn is_white(&self) -> bool {
        self.value() > 0
    }

    /// Returns `true` if this is a Black piece.
    #[inline(always)]
    pub const fn is_black(&self) -> bool {
        self.value() < 0
    }

    /// Returns `true` if this is a piece belonging to `color`.
    #[inline(always)]
    pub const fn is_color(&self, color: Color) -> bool {
        match color {
            Color::White => self.is_white(),
            Color::Black => self.is_black(),
        }
    }

    /// Returns `true` if both pieces exist and are the same color.
    #[inline(always)]
    pub const fn is_same_color(&self, other: Self) -> bool {
        (self.is_white() && other.is_white()) || (self.is_black() && other.is_black())
    }

    /// Returns the [`Color`] of this piece, or `None` on an empty square.
    #[inline(always)]
    pub const fn color(&self) -> Option<Color> {
        if self.is_white() {
            Some(Color::White)
        } else if self.is_black() {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// Returns the [`PieceKind`] of this piece, or `None` on an empty square.
    #[inline(always)]
    pub const fn kind(&self) -> Option<PieceKind> {
        match self.value().abs() {
            1 => Some(PieceKind::Pawn),
            2 => Some(PieceKind::Rook),
            3 => Some(PieceKind::Knight),
            4 => Some(PieceKind::Bishop),
            5 => Some(PieceKind::Queen),
            6 => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Returns `true` if this piece is of the provided kind, regardless of color.
    #[inline(always)]
    pub const fn is_kind(&self, kind: PieceKind) -> bool {
        self.value().abs() == kind as i8
    }

    /// Signed material value of this piece. Positive for White.
    #[inline(always)]
    pub const fn points(&self) -> i32 {
        match self.kind() {
            Some(kind) => self.value().signum() as i32 * kind.value(),
            None => 0,
        }
    }

    /// Returns the character of this piece: uppercase for White, lowercase for Black, `.` if empty.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self.kind() {
            Some(kind) if self.is_white() => kind.char().to_ascii_uppercase(),
            Some(kind) => kind.char(),
            None => '.',
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}
