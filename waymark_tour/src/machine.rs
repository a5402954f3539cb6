// Copyright 2026 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tour progression as a pure state machine.
//!
//! [`TourMachine`] owns the active flag and the current step index and
//! nothing else. Every operation returns a [`Transition`] that tells the
//! caller what happened; side effects (locating targets, persistence) are
//! the caller's job. Auto-advance after a missing target uses the same
//! [`TourMachine::next`] as user navigation.
//!
//! ```
//! use waymark_tour::machine::{TourMachine, TourState, Transition};
//!
//! let mut tour = TourMachine::new(2);
//! assert_eq!(tour.start(), Transition::Started);
//! assert_eq!(tour.next(), Transition::Advanced { to: 1 });
//! // Next on the last step completes instead of running off the end.
//! assert_eq!(tour.next(), Transition::Completed);
//! assert_eq!(tour.state(), TourState::Inactive);
//! // Terminal operations are only meaningful while active.
//! assert_eq!(tour.complete(), Transition::Ignored);
//! ```

/// Observable state of a tour run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TourState {
    /// Nothing is shown.
    Inactive,
    /// The overlay is shown for `step`, with `step < total`.
    Active {
        /// Index into the step catalog.
        step: usize,
    },
}

/// What a [`TourMachine`] operation did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The tour (re)started at step 0.
    Started,
    /// Moved forward to `to`.
    Advanced {
        /// New step index.
        to: usize,
    },
    /// Moved back to `to`.
    Retreated {
        /// New step index.
        to: usize,
    },
    /// The run ended by reaching the end.
    Completed,
    /// The run ended by user dismissal.
    Skipped,
    /// The operation does not apply in the current state.
    Ignored,
}

/// Step index and active flag for a tour of `total` steps.
#[derive(Clone, Debug)]
pub struct TourMachine {
    total: usize,
    cursor: usize,
    active: bool,
}

impl TourMachine {
    /// A machine for `total` steps, inactive at step 0.
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            total,
            cursor: 0,
            active: false,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> TourState {
        if self.active {
            TourState::Active { step: self.cursor }
        } else {
            TourState::Inactive
        }
    }

    /// Whether a run is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The active step, if a run is in progress.
    #[must_use]
    pub fn current_step(&self) -> Option<usize> {
        self.active.then_some(self.cursor)
    }

    /// The last step shown, or the seeded resume step, regardless of state.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of steps.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Seed the resume step from a persisted record while inactive.
    ///
    /// Out-of-range values are clamped to the last step. Ignored while active.
    pub fn seed(&mut self, step: usize) {
        if !self.active {
            self.cursor = step.min(self.total.saturating_sub(1));
        }
    }

    /// Begin a run at step 0. Restarts a run already in progress.
    pub fn start(&mut self) -> Transition {
        if self.total == 0 {
            return Transition::Ignored;
        }
        self.active = true;
        self.cursor = 0;
        Transition::Started
    }

    /// Move forward, or complete when on the last step.
    pub fn next(&mut self) -> Transition {
        if !self.active {
            return Transition::Ignored;
        }
        if self.cursor + 1 >= self.total {
            return self.complete();
        }
        self.cursor += 1;
        Transition::Advanced { to: self.cursor }
    }

    /// Move back one step. Ignored on the first step.
    pub fn prev(&mut self) -> Transition {
        if !self.active || self.cursor == 0 {
            return Transition::Ignored;
        }
        self.cursor -= 1;
        Transition::Retreated { to: self.cursor }
    }

    /// End the run as dismissed.
    pub fn skip(&mut self) -> Transition {
        if !self.active {
            return Transition::Ignored;
        }
        self.active = false;
        Transition::Skipped
    }

    /// End the run as finished.
    pub fn complete(&mut self) -> Transition {
        if !self.active {
            return Transition::Ignored;
        }
        self.active = false;
        Transition::Completed
    }

    /// Stop without a terminal outcome, as when the host goes away.
    pub fn halt(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_walk_ends_in_completion() {
        let mut m = TourMachine::new(3);
        assert_eq!(m.state(), TourState::Inactive);
        assert_eq!(m.start(), Transition::Started);
        assert_eq!(m.state(), TourState::Active { step: 0 });
        assert_eq!(m.next(), Transition::Advanced { to: 1 });
        assert_eq!(m.next(), Transition::Advanced { to: 2 });
        assert_eq!(m.next(), Transition::Completed);
        assert_eq!(m.state(), TourState::Inactive);
        assert_eq!(m.current_step(), None);
        // The cursor never reaches `total`.
        assert_eq!(m.cursor(), 2);
    }

    #[test]
    fn prev_stops_at_first_step() {
        let mut m = TourMachine::new(3);
        m.start();
        assert_eq!(m.prev(), Transition::Ignored);
        m.next();
        assert_eq!(m.prev(), Transition::Retreated { to: 0 });
        assert_eq!(m.current_step(), Some(0));
    }

    #[test]
    fn terminal_operations_require_an_active_run() {
        let mut m = TourMachine::new(2);
        assert_eq!(m.complete(), Transition::Ignored);
        assert_eq!(m.skip(), Transition::Ignored);
        assert_eq!(m.next(), Transition::Ignored);
        assert_eq!(m.prev(), Transition::Ignored);

        m.start();
        assert_eq!(m.complete(), Transition::Completed);
        assert_eq!(m.complete(), Transition::Ignored, "no double completion");

        m.start();
        assert_eq!(m.skip(), Transition::Skipped);
        assert_eq!(m.skip(), Transition::Ignored);
    }

    #[test]
    fn single_step_tour_completes_on_next() {
        let mut m = TourMachine::new(1);
        m.start();
        assert_eq!(m.next(), Transition::Completed);
    }

    #[test]
    fn start_restarts_from_zero() {
        let mut m = TourMachine::new(3);
        m.start();
        m.next();
        m.next();
        assert_eq!(m.start(), Transition::Started);
        assert_eq!(m.current_step(), Some(0));
    }

    #[test]
    fn empty_tour_never_starts() {
        let mut m = TourMachine::new(0);
        assert_eq!(m.start(), Transition::Ignored);
        assert!(!m.is_active());
    }

    #[test]
    fn seed_clamps_and_is_ignored_while_active() {
        let mut m = TourMachine::new(3);
        m.seed(7);
        assert_eq!(m.cursor(), 2);
        assert_eq!(m.state(), TourState::Inactive);

        m.start();
        m.seed(2);
        assert_eq!(m.cursor(), 0);
    }

    #[test]
    fn halt_deactivates_without_an_outcome() {
        let mut m = TourMachine::new(3);
        m.start();
        m.next();
        m.halt();
        assert_eq!(m.state(), TourState::Inactive);
        assert_eq!(m.cursor(), 1);
        assert_eq!(m.complete(), Transition::Ignored);
    }
}
