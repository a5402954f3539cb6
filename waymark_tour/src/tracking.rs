// Copyright 2026 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Subscriptions that keep a located target's geometry fresh.

use smallvec::SmallVec;

use crate::host::{EventKind, EventSource, FrameId, ListenerId, MutationOptions, ObserverId, Scheduler};

/// Listeners, observer, and pending frame for one tracked step.
///
/// Layout signals coalesce into at most one pending frame: scheduling
/// again cancels the previous request. The tracker is consumed by
/// [`Tracker::detach`], so a step's subscriptions cannot outlive it.
#[derive(Debug)]
pub(crate) struct Tracker {
    listeners: SmallVec<[ListenerId; 2]>,
    observer: ObserverId,
    pending_frame: Option<FrameId>,
}

impl Tracker {
    /// Listen for resize and capturing scroll, and observe layout mutations below `root`.
    pub(crate) fn attach<H: EventSource + ?Sized>(host: &mut H, root: Option<String>) -> Self {
        let mut listeners = SmallVec::new();
        listeners.push(host.listen(EventKind::Resize));
        listeners.push(host.listen(EventKind::Scroll { capture: true }));
        let observer = host.observe_mutations(&MutationOptions::layout(root));
        Self {
            listeners,
            observer,
            pending_frame: None,
        }
    }

    /// Request a recomputation on the next frame, replacing any pending request.
    pub(crate) fn schedule<H: Scheduler + ?Sized>(&mut self, host: &mut H) {
        if let Some(frame) = self.pending_frame.take() {
            host.cancel_frame(frame);
        }
        self.pending_frame = Some(host.request_frame());
    }

    /// Consume the pending frame if `id` is it.
    pub(crate) fn take_frame(&mut self, id: FrameId) -> bool {
        if self.pending_frame == Some(id) {
            self.pending_frame = None;
            true
        } else {
            false
        }
    }

    /// Cancel the pending frame and drop every subscription.
    pub(crate) fn detach<H: Scheduler + EventSource + ?Sized>(mut self, host: &mut H) {
        if let Some(frame) = self.pending_frame.take() {
            host.cancel_frame(frame);
        }
        for listener in self.listeners.drain(..) {
            host.unlisten(listener);
        }
        host.disconnect(self.observer);
    }
}
