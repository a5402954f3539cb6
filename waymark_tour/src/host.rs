// Copyright 2026 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host boundary: element lookup, scheduling, and event subscription.
//!
//! The engine never talks to a document directly. A host (a webview bridge,
//! a native toolkit, or a test double) implements [`Surface`],
//! [`Scheduler`], and [`EventSource`], and forwards the resulting callbacks
//! to the engine by id. All handles are opaque to the engine; it only hands
//! them back to cancel or detach.

use chrono::{DateTime, Utc};
use kurbo::{Rect, Size};

/// Handle for a pending timeout.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

/// Handle for a pending animation-frame request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameId(pub u64);

/// Handle for an attached event listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

/// Handle for a connected mutation observer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(pub u64);

/// Where a scrolled element should end up relative to its scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAlign {
    /// Align the element's leading edge with the container.
    Start,
    /// Center the element in the container.
    Center,
    /// Align the element's trailing edge with the container.
    End,
    /// Move just enough to make the element fully visible.
    Nearest,
}

/// Options for [`Surface::scroll_into_view`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOptions {
    /// Animate the scroll instead of jumping.
    pub smooth: bool,
    /// Alignment on the block (vertical) axis.
    pub block: ScrollAlign,
    /// Alignment on the inline (horizontal) axis.
    pub inline: ScrollAlign,
}

impl ScrollOptions {
    /// Smooth scrolling to the nearest edge on both axes.
    pub const NEAREST_SMOOTH: Self = Self {
        smooth: true,
        block: ScrollAlign::Nearest,
        inline: ScrollAlign::Nearest,
    };
}

/// Element lookup and measurement.
pub trait Surface {
    /// A live element handle.
    type Element;

    /// Resolve `selector` to a single element, if one is present right now.
    fn query(&self, selector: &str) -> Option<Self::Element>;

    /// Scroll `element` into view.
    fn scroll_into_view(&mut self, element: &Self::Element, options: ScrollOptions);

    /// Current bounding box of `element` in viewport coordinates.
    fn bounding_rect(&self, element: &Self::Element) -> Rect;

    /// Current viewport size.
    fn viewport(&self) -> Size;
}

/// Clocks, timeouts, and animation frames.
///
/// Timeouts and frames fire by the host calling
/// [`TourEngine::on_timer`](crate::TourEngine::on_timer) and
/// [`TourEngine::on_frame`](crate::TourEngine::on_frame) with the returned id.
pub trait Scheduler {
    /// Monotonic time in milliseconds.
    fn now_ms(&self) -> u64;

    /// Wall-clock time, used for the local copy of terminal timestamps.
    fn wall_clock(&self) -> DateTime<Utc>;

    /// Fire once after `delay_ms`.
    fn set_timeout(&mut self, delay_ms: u64) -> TimerId;

    /// Cancel a pending timeout. Unknown or fired ids are ignored.
    fn clear_timeout(&mut self, id: TimerId);

    /// Fire once on the next animation frame.
    fn request_frame(&mut self) -> FrameId;

    /// Cancel a pending frame request. Unknown or fired ids are ignored.
    fn cancel_frame(&mut self, id: FrameId);
}

/// Window-level events the engine subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Viewport resize.
    Resize,
    /// Scroll; with `capture` set, scrolls of any nested container are included.
    Scroll {
        /// Listen in the capture phase.
        capture: bool,
    },
    /// Key presses, delivered through [`TourEngine::on_key`](crate::TourEngine::on_key).
    KeyDown,
}

/// Layout-affecting signals, delivered through
/// [`TourEngine::on_signal`](crate::TourEngine::on_signal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutSignal {
    /// A [`EventKind::Resize`] listener fired.
    Resize,
    /// A [`EventKind::Scroll`] listener fired.
    Scroll,
    /// A mutation observer reported changes.
    Mutation,
}

bitflags::bitflags! {
    /// Which mutations a mutation observer reports.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MutationKinds: u8 {
        /// Children added or removed.
        const CHILD_LIST = 0b0000_0001;
        /// Observe the whole subtree, not only the root.
        const SUBTREE    = 0b0000_0010;
        /// Attribute changes, narrowed by [`MutationOptions::attribute_filter`].
        const ATTRIBUTES = 0b0000_0100;
    }
}

/// Attributes whose changes typically move elements without a resize or scroll.
pub const LAYOUT_ATTRIBUTES: &[&str] = &["class", "style"];

/// Configuration for [`EventSource::observe_mutations`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOptions {
    /// Selector of the observed root; `None` observes the document body.
    pub root: Option<String>,
    /// Kinds of mutation to report.
    pub kinds: MutationKinds,
    /// Attribute names to watch when [`MutationKinds::ATTRIBUTES`] is set.
    pub attribute_filter: &'static [&'static str],
}

impl MutationOptions {
    /// Child-list and `class`/`style` attribute changes anywhere below `root`.
    #[must_use]
    pub fn layout(root: Option<String>) -> Self {
        Self {
            root,
            kinds: MutationKinds::all(),
            attribute_filter: LAYOUT_ATTRIBUTES,
        }
    }
}

/// Event listener and mutation observer registration.
pub trait EventSource {
    /// Attach a listener for `kind`.
    fn listen(&mut self, kind: EventKind) -> ListenerId;

    /// Detach a listener. Unknown ids are ignored.
    fn unlisten(&mut self, id: ListenerId);

    /// Connect a mutation observer.
    fn observe_mutations(&mut self, options: &MutationOptions) -> ObserverId;

    /// Disconnect a mutation observer. Unknown ids are ignored.
    fn disconnect(&mut self, id: ObserverId);
}

/// Everything the engine needs from its environment.
pub trait Host: Surface + Scheduler + EventSource {}

impl<T: Surface + Scheduler + EventSource> Host for T {}
