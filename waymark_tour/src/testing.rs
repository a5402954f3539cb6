// Copyright 2026 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test doubles: a scripted host with a virtual clock, and a recording service.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use chrono::{DateTime, Utc};
use kurbo::{Rect, Size};

use crate::engine::TourEngine;
use crate::error::{InvokeError, ServiceError};
use crate::host::{
    EventKind, EventSource, FrameId, ListenerId, MutationOptions, ObserverId, Scheduler,
    ScrollOptions, Surface, TimerId,
};
use crate::service::{MemoryService, PersistedTourRecord, TourService};

#[derive(Debug, Default)]
pub(crate) struct HostState {
    pub(crate) now: u64,
    pub(crate) viewport: Size,
    pub(crate) elements: BTreeMap<String, Rect>,
    next_id: u64,
    /// Pending timeouts as `(due, id)`.
    pub(crate) timers: BTreeSet<(u64, u64)>,
    pub(crate) frames: BTreeSet<u64>,
    pub(crate) listeners: BTreeMap<u64, EventKind>,
    pub(crate) observers: BTreeMap<u64, MutationOptions>,
    pub(crate) queries: Vec<String>,
    pub(crate) scrolls: Vec<String>,
}

impl HostState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// A host whose document, clock, and queues are driven by the test.
///
/// Clones share state, so a test keeps one handle while the engine owns another.
#[derive(Clone, Debug, Default)]
pub(crate) struct FakeHost(Rc<RefCell<HostState>>);

impl FakeHost {
    pub(crate) fn new(viewport: Size) -> Self {
        let host = Self::default();
        host.state_mut().viewport = viewport;
        host
    }

    pub(crate) fn with_element(self, selector: &str, rect: Rect) -> Self {
        self.set_element(selector, rect);
        self
    }

    pub(crate) fn set_element(&self, selector: &str, rect: Rect) {
        self.state_mut().elements.insert(selector.to_owned(), rect);
    }

    pub(crate) fn remove_element(&self, selector: &str) {
        self.state_mut().elements.remove(selector);
    }

    pub(crate) fn set_viewport(&self, viewport: Size) {
        self.state_mut().viewport = viewport;
    }

    pub(crate) fn state(&self) -> Ref<'_, HostState> {
        self.0.borrow()
    }

    fn state_mut(&self) -> RefMut<'_, HostState> {
        self.0.borrow_mut()
    }

    pub(crate) fn now(&self) -> u64 {
        self.state().now
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.state().listeners.len()
    }

    pub(crate) fn listeners_of(&self, kind: EventKind) -> usize {
        self.state().listeners.values().filter(|&&k| k == kind).count()
    }

    pub(crate) fn observer_count(&self) -> usize {
        self.state().observers.len()
    }

    pub(crate) fn pending_timers(&self) -> usize {
        self.state().timers.len()
    }

    pub(crate) fn pending_frames(&self) -> usize {
        self.state().frames.len()
    }

    pub(crate) fn query_count(&self, selector: &str) -> usize {
        self.state().queries.iter().filter(|q| *q == selector).count()
    }

    pub(crate) fn scroll_count(&self) -> usize {
        self.state().scrolls.len()
    }

    /// Remove the earliest timer due at or before `until` and move the clock to it.
    fn pop_due(&self, until: u64) -> Option<TimerId> {
        let mut state = self.state_mut();
        let &(due, id) = state.timers.first()?;
        if due > until {
            return None;
        }
        state.timers.remove(&(due, id));
        state.now = due;
        Some(TimerId(id))
    }
}

impl Surface for FakeHost {
    type Element = String;

    fn query(&self, selector: &str) -> Option<String> {
        let mut state = self.state_mut();
        state.queries.push(selector.to_owned());
        state
            .elements
            .contains_key(selector)
            .then(|| selector.to_owned())
    }

    fn scroll_into_view(&mut self, element: &String, _options: ScrollOptions) {
        self.state_mut().scrolls.push(element.clone());
    }

    fn bounding_rect(&self, element: &String) -> Rect {
        self.state()
            .elements
            .get(element)
            .copied()
            .unwrap_or(Rect::ZERO)
    }

    fn viewport(&self) -> Size {
        self.state().viewport
    }
}

impl Scheduler for FakeHost {
    fn now_ms(&self) -> u64 {
        self.now()
    }

    fn wall_clock(&self) -> DateTime<Utc> {
        let millis = i64::try_from(self.now()).unwrap();
        DateTime::from_timestamp_millis(1_767_225_600_000 + millis).unwrap()
    }

    fn set_timeout(&mut self, delay_ms: u64) -> TimerId {
        let mut state = self.state_mut();
        let id = state.next_id();
        let due = state.now + delay_ms;
        state.timers.insert((due, id));
        TimerId(id)
    }

    fn clear_timeout(&mut self, id: TimerId) {
        self.state_mut().timers.retain(|&(_, t)| t != id.0);
    }

    fn request_frame(&mut self) -> FrameId {
        let mut state = self.state_mut();
        let id = state.next_id();
        state.frames.insert(id);
        FrameId(id)
    }

    fn cancel_frame(&mut self, id: FrameId) {
        self.state_mut().frames.remove(&id.0);
    }
}

impl EventSource for FakeHost {
    fn listen(&mut self, kind: EventKind) -> ListenerId {
        let mut state = self.state_mut();
        let id = state.next_id();
        state.listeners.insert(id, kind);
        ListenerId(id)
    }

    fn unlisten(&mut self, id: ListenerId) {
        self.state_mut().listeners.remove(&id.0);
    }

    fn observe_mutations(&mut self, options: &MutationOptions) -> ObserverId {
        let mut state = self.state_mut();
        let id = state.next_id();
        state.observers.insert(id, options.clone());
        ObserverId(id)
    }

    fn disconnect(&mut self, id: ObserverId) {
        self.state_mut().observers.remove(&id.0);
    }
}

/// Move the virtual clock forward by `ms`, firing due timers in order.
pub(crate) fn advance<S: TourService>(engine: &mut TourEngine<FakeHost, S>, ms: u64) {
    let host = engine.host().clone();
    let until = host.now() + ms;
    while let Some(timer) = host.pop_due(until) {
        engine.on_timer(timer);
    }
    host.state_mut().now = until;
}

/// Deliver every pending animation frame.
pub(crate) fn run_frames<S: TourService>(engine: &mut TourEngine<FakeHost, S>) {
    let host = engine.host().clone();
    let frames = core::mem::take(&mut host.state_mut().frames);
    for frame in frames {
        engine.on_frame(FrameId(frame));
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    GetTourState,
    UpdateTourStep(u32),
    SkipTour,
    CompleteTour,
    ResetTour,
}

/// A [`MemoryService`] that records every call and can be made to fail.
#[derive(Debug, Default)]
pub(crate) struct RecordingService {
    pub(crate) calls: Vec<Call>,
    pub(crate) inner: MemoryService,
    pub(crate) failing: bool,
}

impl RecordingService {
    pub(crate) fn with_record(record: PersistedTourRecord) -> Self {
        Self {
            inner: MemoryService::with_record(record),
            ..Self::default()
        }
    }

    fn record(&mut self, call: Call, command: &'static str) -> Result<(), ServiceError> {
        self.calls.push(call);
        if self.failing {
            Err(ServiceError::Invoke {
                command,
                source: InvokeError::new("backend unavailable"),
            })
        } else {
            Ok(())
        }
    }
}

impl TourService for RecordingService {
    fn get_tour_state(&mut self) -> Result<PersistedTourRecord, ServiceError> {
        self.record(Call::GetTourState, "get_tour_state")?;
        self.inner.get_tour_state()
    }

    fn update_tour_step(&mut self, step: u32) -> Result<(), ServiceError> {
        self.record(Call::UpdateTourStep(step), "update_tour_step")?;
        self.inner.update_tour_step(step)
    }

    fn skip_tour(&mut self) -> Result<(), ServiceError> {
        self.record(Call::SkipTour, "skip_tour")?;
        self.inner.skip_tour()
    }

    fn complete_tour(&mut self) -> Result<(), ServiceError> {
        self.record(Call::CompleteTour, "complete_tour")?;
        self.inner.complete_tour()
    }

    fn reset_tour(&mut self) -> Result<(), ServiceError> {
        self.record(Call::ResetTour, "reset_tour")?;
        self.inner.reset_tour()
    }
}
