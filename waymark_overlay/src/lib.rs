// Copyright 2026 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waymark Overlay: spotlight geometry for guided tours.
//!
//! A tour overlay is a full-viewport dimmed scrim with a rounded cut-out
//! around the highlighted target, a static highlight border on the cut-out,
//! and a ring around the same rectangle that pulses in scale and opacity.
//!
//! [`Spotlight`] is a pure function of the target rectangle, the viewport
//! size, and a [`SpotlightStyle`]. It holds no state between frames: build a
//! new one whenever the target geometry changes and draw it in the same
//! frame.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect, Size};
//! use waymark_overlay::{Spotlight, SpotlightStyle};
//!
//! let style = SpotlightStyle::default();
//! let target = Rect::new(100.0, 100.0, 200.0, 140.0);
//! let spotlight = Spotlight::new(target, Size::new(800.0, 600.0), &style);
//!
//! // The cut-out is the target padded by 8px on each side.
//! assert_eq!(spotlight.cutout_rect(), Rect::new(92.0, 92.0, 208.0, 148.0));
//!
//! // Pointer input is intercepted by the scrim but not inside the cut-out.
//! assert!(spotlight.blocks_pointer(Point::new(10.0, 10.0)));
//! assert!(!spotlight.blocks_pointer(Point::new(150.0, 120.0)));
//! ```
//!
//! Renderers fill [`Spotlight::scrim_path`] with
//! [`SpotlightStyle::scrim_opacity`] black, stroke [`Spotlight::border`] with
//! [`SpotlightStyle::border_width`], and stroke the ring returned by
//! [`Spotlight::pulse_at`] for the current animation time.
//!
//! This crate is `no_std`.

#![no_std]

use kurbo::{BezPath, Point, Rect, RoundedRect, Shape, Size};

pub mod easing;

use easing::Easing;

/// Tolerance used when flattening the rounded cut-out into a path.
pub const PATH_TOLERANCE: f64 = 0.1;

/// Timing and amplitude of the pulsing ring.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PulseStyle {
    /// Duration of one rest → peak → rest cycle, in milliseconds.
    pub period_ms: u64,
    /// Ring scale at the peak of the cycle (1.0 at rest).
    pub peak_scale: f64,
    /// Ring opacity at rest.
    pub rest_opacity: f64,
    /// Ring opacity at the peak of the cycle.
    pub peak_opacity: f64,
}

impl Default for PulseStyle {
    fn default() -> Self {
        Self {
            period_ms: 2000,
            peak_scale: 1.04,
            rest_opacity: 0.7,
            peak_opacity: 0.3,
        }
    }
}

/// Visual parameters for a [`Spotlight`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpotlightStyle {
    /// Space between the target and the cut-out edge.
    pub padding: f64,
    /// Corner radius of the cut-out.
    pub corner_radius: f64,
    /// Opacity of the dimming scrim.
    pub scrim_opacity: f64,
    /// Stroke width of the highlight border and the pulse ring.
    pub border_width: f64,
    /// Fade-in and fade-out duration of the whole overlay, in milliseconds.
    pub fade_ms: u64,
    /// Pulse ring animation.
    pub pulse: PulseStyle,
}

impl Default for SpotlightStyle {
    fn default() -> Self {
        Self {
            padding: 8.0,
            corner_radius: 12.0,
            scrim_opacity: 0.6,
            border_width: 2.0,
            fade_ms: 300,
            pulse: PulseStyle::default(),
        }
    }
}

/// One frame of the pulse animation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PulseFrame {
    /// Current scale of the ring about the cut-out center.
    pub scale: f64,
    /// Current opacity of the ring.
    pub opacity: f64,
    /// The ring shape at this scale.
    pub ring: RoundedRect,
}

/// Overlay geometry for one target rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Spotlight {
    viewport: Rect,
    cutout: RoundedRect,
}

impl Spotlight {
    /// Build the overlay for `target` inside a viewport of `viewport` size.
    #[must_use]
    pub fn new(target: Rect, viewport: Size, style: &SpotlightStyle) -> Self {
        let padded = target.inflate(style.padding, style.padding);
        Self {
            viewport: viewport.to_rect(),
            cutout: padded.to_rounded_rect(style.corner_radius),
        }
    }

    /// The full-viewport rectangle covered by the scrim.
    #[must_use]
    pub const fn viewport(&self) -> Rect {
        self.viewport
    }

    /// The rounded cut-out that leaves the target visible.
    #[must_use]
    pub const fn cutout(&self) -> RoundedRect {
        self.cutout
    }

    /// Bounding rectangle of the cut-out.
    #[must_use]
    pub fn cutout_rect(&self) -> Rect {
        self.cutout.rect()
    }

    /// The static highlight border, drawn on the cut-out outline.
    #[must_use]
    pub const fn border(&self) -> RoundedRect {
        self.cutout
    }

    /// The scrim as a single path: the viewport with the cut-out removed.
    ///
    /// The cut-out subpath winds opposite to the viewport, so the hole is
    /// preserved under both the nonzero and even-odd fill rules.
    #[must_use]
    pub fn scrim_path(&self) -> BezPath {
        let mut path = self.viewport.to_path(PATH_TOLERANCE);
        let hole = self.cutout.to_path(PATH_TOLERANCE).reverse_subpaths();
        path.extend(hole.elements().iter().copied());
        path
    }

    /// Whether the scrim intercepts pointer input at `point`.
    #[must_use]
    pub fn blocks_pointer(&self, point: Point) -> bool {
        self.viewport.contains(point) && !self.cutout.contains(point)
    }

    /// The pulse ring at `elapsed_ms` since the overlay appeared.
    ///
    /// Each half of the cycle eases in and out between the rest and peak
    /// keyframes, matching a `[rest, peak, rest]` keyframe animation.
    #[must_use]
    pub fn pulse_at(&self, elapsed_ms: u64, style: &PulseStyle) -> PulseFrame {
        let period = style.period_ms.max(1);
        let phase = (elapsed_ms % period) as f64 / period as f64;
        let toward_peak = if phase < 0.5 {
            Easing::EASE_IN_OUT.apply(phase * 2.0)
        } else {
            1.0 - Easing::EASE_IN_OUT.apply((phase - 0.5) * 2.0)
        };
        let scale = 1.0 + (style.peak_scale - 1.0) * toward_peak;
        let opacity = style.rest_opacity + (style.peak_opacity - style.rest_opacity) * toward_peak;

        let rect = self.cutout.rect();
        let radius = self.cutout.radii().as_single_radius().unwrap_or(0.0);
        let ring = Rect::from_center_size(rect.center(), rect.size() * scale)
            .to_rounded_rect(radius * scale);
        PulseFrame {
            scale,
            opacity,
            ring,
        }
    }

    /// Region to repaint when moving from `previous` to `self`.
    ///
    /// Covers both cut-outs at the pulse peak plus the stroke width, so
    /// renderers that only repaint damage never leave a stale ring behind.
    #[must_use]
    pub fn damage(&self, previous: &Self, style: &SpotlightStyle) -> Rect {
        let grow = |rect: Rect| {
            let scaled = Rect::from_center_size(rect.center(), rect.size() * style.pulse.peak_scale);
            scaled.inflate(style.border_width, style.border_width)
        };
        grow(previous.cutout_rect()).union(grow(self.cutout_rect()))
    }
}
