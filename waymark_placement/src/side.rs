// Copyright 2026 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement sides and the fallback order used by the calculator.

/// Side of the target on which a tooltip is anchored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    /// Above the target, horizontally centered on it.
    Top,
    /// Below the target, horizontally centered on it.
    Bottom,
    /// Left of the target, vertically centered on it.
    Left,
    /// Right of the target, vertically centered on it.
    Right,
}

impl Side {
    /// Order in which the remaining sides are tried after the preferred one.
    pub const FALLBACK_ORDER: [Self; 4] = [Self::Bottom, Self::Right, Self::Top, Self::Left];

    /// Candidate order for a tooltip that prefers `self`.
    ///
    /// The preferred side comes first, followed by [`Side::FALLBACK_ORDER`]
    /// with the preferred side removed.
    ///
    /// ```
    /// use waymark_placement::Side;
    ///
    /// assert_eq!(
    ///     Side::Top.candidates(),
    ///     [Side::Top, Side::Bottom, Side::Right, Side::Left],
    /// );
    /// ```
    #[must_use]
    pub fn candidates(self) -> [Self; 4] {
        let mut out = [self; 4];
        let mut next = 1;
        for side in Self::FALLBACK_ORDER {
            if side != self {
                out[next] = side;
                next += 1;
            }
        }
        out
    }

    /// The side across the target from this one.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns `true` for [`Side::Top`] and [`Side::Bottom`].
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}
