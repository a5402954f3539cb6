// Copyright 2026 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer and entrance-animation helpers derived from a [`TooltipPlacement`].
//!
//! Once the calculator has picked a side, the tooltip view needs two more
//! things: an arrow on the tooltip edge that faces the target, and the
//! direction to slide in from. Both depend only on the chosen side and the
//! final geometry, never on the preferred side.

use kurbo::{Point, Rect, Size, Vec2};

use crate::{Side, TooltipPlacement};

/// A pointer drawn on one edge of the tooltip, aimed at the target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Arrow {
    /// Tooltip edge carrying the arrow. Always the edge facing the target.
    pub edge: Side,
    /// Distance of the arrow center from the start of `edge`
    /// (the left end of a horizontal edge, the top end of a vertical one).
    pub offset: f64,
}

impl Arrow {
    /// Minimum distance kept between the arrow and the tooltip corners.
    pub const DEFAULT_INSET: f64 = 24.0;

    /// Aim an arrow from a placed tooltip of `size` at the center of `target`.
    ///
    /// The offset is the target center projected onto the facing edge,
    /// clamped to `[inset, edge_length - inset]`. The lower bound wins on
    /// tooltips too small to honor both.
    #[must_use]
    pub fn aim(placement: &TooltipPlacement, target: Rect, size: Size, inset: f64) -> Self {
        let center = target.center();
        let edge = placement.side.opposite();
        let (along, length) = if edge.is_vertical() {
            (center.x - placement.left(), size.width)
        } else {
            (center.y - placement.top(), size.height)
        };
        Self {
            edge,
            offset: along.min(length - inset).max(inset),
        }
    }

    /// Position of the arrow center in viewport coordinates, given the tooltip rect.
    #[must_use]
    pub fn anchor(&self, tooltip: Rect) -> Point {
        match self.edge {
            Side::Top => Point::new(tooltip.x0 + self.offset, tooltip.y0),
            Side::Bottom => Point::new(tooltip.x0 + self.offset, tooltip.y1),
            Side::Left => Point::new(tooltip.x0, tooltip.y0 + self.offset),
            Side::Right => Point::new(tooltip.x1, tooltip.y0 + self.offset),
        }
    }
}

/// Starting offset of the entrance animation for a tooltip on `side`.
///
/// The tooltip starts `distance` closer to the target and slides outward
/// into its final position.
#[must_use]
pub fn slide_offset(side: Side, distance: f64) -> Vec2 {
    match side {
        Side::Bottom => Vec2::new(0.0, -distance),
        Side::Top => Vec2::new(0.0, distance),
        Side::Right => Vec2::new(-distance, 0.0),
        Side::Left => Vec2::new(distance, 0.0),
    }
}
