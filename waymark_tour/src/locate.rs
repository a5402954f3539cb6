// Copyright 2026 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Target lookup and the bounded search that drives it.
//!
//! [`locate`] is the activation-time lookup: it scrolls the target into
//! view before measuring. [`measure`] is the tracking-time lookup and never
//! scrolls. Both resolve the selector afresh on every call, so a target the
//! view layer re-created in the meantime is still found.

use kurbo::Rect;

use crate::config::RetryPolicy;
use crate::host::{Scheduler, ScrollOptions, Surface, TimerId};

/// Resolve `selector`, scroll the element into view, and return its bounds.
pub(crate) fn locate<S: Surface + ?Sized>(surface: &mut S, selector: &str) -> Option<Rect> {
    let element = surface.query(selector)?;
    surface.scroll_into_view(&element, ScrollOptions::NEAREST_SMOOTH);
    Some(surface.bounding_rect(&element))
}

/// Resolve `selector` and return its bounds without scrolling.
pub(crate) fn measure<S: Surface + ?Sized>(surface: &S, selector: &str) -> Option<Rect> {
    let element = surface.query(selector)?;
    Some(surface.bounding_rect(&element))
}

/// What to do after a failed attempt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum SearchStep {
    /// Try again after `delay_ms`.
    Retry { delay_ms: u64 },
    /// The attempt budget is spent.
    Exhausted,
}

/// Progress of the search for one step's target.
#[derive(Debug)]
pub(crate) struct Search {
    attempts: u32,
    timer: Option<TimerId>,
    started_ms: u64,
}

impl Search {
    pub(crate) fn new(started_ms: u64) -> Self {
        Self {
            attempts: 0,
            timer: None,
            started_ms,
        }
    }

    /// Failed attempts so far.
    pub(crate) fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Time the search began.
    pub(crate) fn started_ms(&self) -> u64 {
        self.started_ms
    }

    /// Record a failed attempt.
    pub(crate) fn miss(&mut self, policy: &RetryPolicy) -> SearchStep {
        self.attempts += 1;
        if self.attempts >= policy.attempts() {
            SearchStep::Exhausted
        } else {
            SearchStep::Retry {
                delay_ms: policy.interval_ms,
            }
        }
    }

    /// Remember the timer that will run the next attempt.
    pub(crate) fn arm(&mut self, timer: TimerId) {
        self.timer = Some(timer);
    }

    /// Consume the pending timer if `id` is it.
    pub(crate) fn take_timer(&mut self, id: TimerId) -> bool {
        if self.timer == Some(id) {
            self.timer = None;
            true
        } else {
            false
        }
    }

    /// Cancel the pending attempt, if any.
    pub(crate) fn cancel<H: Scheduler + ?Sized>(&mut self, host: &mut H) {
        if let Some(timer) = self.timer.take() {
            host.clear_timeout(timer);
        }
    }
}
