// Copyright 2026 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render model for the active step.

use kurbo::{Rect, Vec2};
use waymark_overlay::{PulseFrame, Spotlight, SpotlightStyle};
use waymark_placement::{Arrow, TooltipPlacement};

use crate::catalog::TourStepDefinition;

/// One progress indicator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Dot {
    /// A step before the current one.
    Visited,
    /// The current step.
    Current,
    /// A step after the current one.
    Upcoming,
}

/// Everything needed to draw the tour for the active, located step.
///
/// Produced by [`TourEngine::view`](crate::TourEngine::view). All geometry
/// is in viewport coordinates and already reflects the latest tracking pass.
#[derive(Clone, Debug)]
pub struct TourView<'a> {
    /// The step being shown.
    pub step: &'a TourStepDefinition,
    /// Position of the step in the tour.
    pub index: usize,
    /// Number of steps in the tour.
    pub total: usize,
    /// Bounds of the highlighted element.
    pub target: Rect,
    /// Tooltip position and the side actually used.
    pub placement: TooltipPlacement,
    /// Tooltip rectangle at its final position.
    pub tooltip: Rect,
    /// Pointer on the tooltip edge facing the target.
    pub arrow: Arrow,
    /// Offset the tooltip slides in from.
    pub slide: Vec2,
    /// Scrim and highlight geometry.
    pub spotlight: Spotlight,
    /// Overlay style the spotlight was built with.
    pub style: &'a SpotlightStyle,
    /// Host time at which the target was located.
    pub shown_at_ms: u64,
}

impl TourView<'_> {
    /// The first step hides the "previous" control.
    #[must_use]
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    /// The last step offers "complete" instead of "next".
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total
    }

    /// Progress indicators, one per step.
    pub fn dots(&self) -> impl Iterator<Item = Dot> + '_ {
        let current = self.index;
        (0..self.total).map(move |i| match i.cmp(&current) {
            core::cmp::Ordering::Less => Dot::Visited,
            core::cmp::Ordering::Equal => Dot::Current,
            core::cmp::Ordering::Greater => Dot::Upcoming,
        })
    }

    /// The pulse ring at host time `now_ms`.
    #[must_use]
    pub fn pulse_at(&self, now_ms: u64) -> PulseFrame {
        self.spotlight
            .pulse_at(now_ms.saturating_sub(self.shown_at_ms), &self.style.pulse)
    }
}
