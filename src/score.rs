/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{Board, Color};

/// A numerical representation of the evaluation of a position / move, in units of material points.
///
/// A pawn is worth 1 and a King 100, so capturing a King is the largest swing a search will see.
/// Material never reaches [`Self::INF`], which only bounds the search window.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Score(pub i32);

impl Score {
    /// Largest possible score ever achievable.
    ///
    /// Greater than the material of every piece on a full board combined.
    pub const INF: Self = Self(1000);

    /// Static evaluation of `board` from the perspective of `color`.
    ///
    /// # Example
    /// ```
    /// # use kingside::{Board, Color, Score};
    /// let mut board = Board::default();
    /// board.clear("d8".parse().unwrap());
    /// assert_eq!(Score::material(&board, Color::White), Score(9));
    /// assert_eq!(Score::material(&board, Color::Black), Score(-9));
    /// ```
    #[inline(always)]
    pub fn material(board: &Board, color: Color) -> Self {
        Self(color.sign() as i32 * board.material_score())
    }

    /// Returns the absolute value of this [`Score`].
    #[inline(always)]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }
}

impl std::ops::Neg for Score {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl PartialEq<i32> for Score {
    fn eq(&self, other: &i32) -> bool {
        self.0.eq(other)
    }
}

impl fmt::Display for Score {
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

impl fmt::Debug for Score {
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.abs() >= Self::INF {
            write!(f, "{}INF", if self.0 < 0 { "-" } else { "+" })
        } else {
            write!(f, "{}", self.0)
        }
    }
}
