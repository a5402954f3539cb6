// Copyright 2026 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waymark Placement: anchor a tooltip next to a target rectangle.
//!
//! Given a target's bounding box, a preferred [`Side`], the tooltip size and
//! the viewport size, [`compute_placement`] returns where the tooltip should
//! be drawn and which side was actually used.
//!
//! The search is greedy and first-fit:
//!
//! 1. Candidates are tried in [`Side::candidates`] order: the preferred side,
//!    then bottom, right, top, left (skipping the preferred one).
//! 2. Each candidate is placed adjacent to the target with a fixed gap,
//!    centered on the target along the other axis.
//! 3. A candidate fits when the tooltip edge facing away from the target stays
//!    inside the viewport inset by the padding.
//! 4. The first candidate that fits wins. If none fits, the last evaluated
//!    candidate is used anyway.
//! 5. The chosen origin is clamped into the padded viewport on both axes.
//!
//! First-fit order matters; there is no scoring of candidates.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use waymark_placement::{PlacementConfig, Side, compute_placement};
//!
//! let viewport = Size::new(1000.0, 800.0);
//! let tooltip = Size::new(360.0, 200.0);
//!
//! // A target near the bottom edge: there is no room below it.
//! let target = Rect::new(400.0, 700.0, 500.0, 740.0);
//! let placement = compute_placement(
//!     target,
//!     Side::Bottom,
//!     tooltip,
//!     viewport,
//!     &PlacementConfig::default(),
//! );
//!
//! // The calculator falls back to the right of the target.
//! assert_eq!(placement.side, Side::Right);
//! assert_eq!(placement.left(), target.x1 + 16.0);
//! ```
//!
//! The [`arrow`] module derives the pointer drawn on the tooltip edge facing
//! the target and the entrance slide direction from a finished placement.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: `no_std` builds that rely on `libm` for floating-point math.
//! - `serde`: derives `Serialize`/`Deserialize` for [`Side`] and [`PlacementConfig`].
//!
//! This crate is `no_std`.

#![no_std]

use kurbo::{Point, Rect, Size};

pub mod arrow;
mod side;

pub use arrow::{Arrow, slide_offset};
pub use side::Side;

/// Spacing parameters for [`compute_placement`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlacementConfig {
    /// Distance between the target and the tooltip.
    pub gap: f64,
    /// Minimum distance between the tooltip and the viewport edges.
    pub padding: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            gap: 16.0,
            padding: 16.0,
        }
    }
}

/// Result of [`compute_placement`]: where to draw the tooltip and on which side.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TooltipPlacement {
    /// Top-left corner of the tooltip in viewport coordinates.
    pub origin: Point,
    /// The side actually used, which differs from the preferred side after a fallback.
    pub side: Side,
}

impl TooltipPlacement {
    /// Distance from the top of the viewport.
    #[must_use]
    pub const fn top(&self) -> f64 {
        self.origin.y
    }

    /// Distance from the left of the viewport.
    #[must_use]
    pub const fn left(&self) -> f64 {
        self.origin.x
    }

    /// The tooltip rectangle for a tooltip of `size`.
    #[must_use]
    pub fn rect(&self, size: Size) -> Rect {
        Rect::from_origin_size(self.origin, size)
    }
}

/// Compute the tooltip placement for `target`, trying `preferred` first.
///
/// See the [crate documentation](crate) for the search order and fit rules.
/// When the tooltip is larger than the padded viewport on an axis, the clamp
/// pins it to the padding on that axis.
#[must_use]
pub fn compute_placement(
    target: Rect,
    preferred: Side,
    tooltip: Size,
    viewport: Size,
    config: &PlacementConfig,
) -> TooltipPlacement {
    let candidates = preferred.candidates();
    let last = candidates[candidates.len() - 1];
    let (side, origin) = candidates
        .iter()
        .map(|&side| (side, candidate_origin(target, side, tooltip, config.gap)))
        .find(|&(side, origin)| fits(origin, side, tooltip, viewport, config.padding))
        .unwrap_or_else(|| (last, candidate_origin(target, last, tooltip, config.gap)));

    TooltipPlacement {
        origin: clamp_origin(origin, tooltip, viewport, config.padding),
        side,
    }
}

/// Unclamped tooltip origin for a tooltip placed on `side` of `target`.
#[must_use]
pub fn candidate_origin(target: Rect, side: Side, tooltip: Size, gap: f64) -> Point {
    let center = target.center();
    match side {
        Side::Bottom => Point::new(center.x - tooltip.width / 2.0, target.y1 + gap),
        Side::Top => Point::new(center.x - tooltip.width / 2.0, target.y0 - gap - tooltip.height),
        Side::Right => Point::new(target.x1 + gap, center.y - tooltip.height / 2.0),
        Side::Left => Point::new(target.x0 - gap - tooltip.width, center.y - tooltip.height / 2.0),
    }
}

/// Whether a tooltip at `origin` placed on `side` fits the padded viewport.
///
/// Only the edge facing away from the target is tested; the other edges
/// are left to the final clamp.
#[must_use]
pub fn fits(origin: Point, side: Side, tooltip: Size, viewport: Size, padding: f64) -> bool {
    match side {
        Side::Bottom => origin.y + tooltip.height <= viewport.height - padding,
        Side::Top => origin.y >= padding,
        Side::Right => origin.x + tooltip.width <= viewport.width - padding,
        Side::Left => origin.x >= padding,
    }
}

/// Clamp `origin` so the tooltip stays inside the viewport inset by `padding`.
///
/// The lower bound wins when the tooltip does not fit on an axis, so the
/// result is never less than `padding`.
#[must_use]
pub fn clamp_origin(origin: Point, tooltip: Size, viewport: Size, padding: f64) -> Point {
    Point::new(
        clamp_axis(origin.x, tooltip.width, viewport.width, padding),
        clamp_axis(origin.y, tooltip.height, viewport.height, padding),
    )
}

fn clamp_axis(value: f64, extent: f64, viewport: f64, padding: f64) -> f64 {
    // Not `f64::clamp`: the range is inverted when the tooltip overflows.
    value.min(viewport - extent - padding).max(padding)
}
