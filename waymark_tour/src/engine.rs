// Copyright 2026 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tour engine: step activation, target search, live tracking, and persistence.
//!
//! ## Lifecycle of a step
//!
//! Activating a step tears down everything the previous step held, then
//! searches for the new target. Each failed attempt schedules the next one
//! on the host timer; when the attempt budget runs out the engine moves on
//! through [`TourEngine::next`], exactly as a user would. Once found, the
//! target is tracked: resize, capturing scroll, and layout mutations
//! schedule one remeasurement per animation frame.
//!
//! ## Persistence
//!
//! Every durable transition is applied locally first and then reported to
//! the [`TourService`]. A failed report is kept in [`TourEngine::last_error`]
//! and logged; the local state is never rolled back and the call is not
//! retried.

use core::fmt;

use kurbo::{Rect, Size};
use tracing::{debug, info, trace, warn};
use waymark_overlay::Spotlight;
use waymark_placement::{Arrow, TooltipPlacement, compute_placement, slide_offset};

use crate::catalog::Catalog;
use crate::config::TourConfig;
use crate::error::ServiceError;
use crate::host::{FrameId, Host, LayoutSignal, TimerId};
use crate::keyboard::{Key, KeyResponse, KeyboardController, TourCommand, command_for};
use crate::locate::{Search, SearchStep, locate, measure};
use crate::machine::{TourMachine, TourState, Transition};
use crate::service::{PersistedTourRecord, TourService};
use crate::tracking::Tracker;
use crate::view::TourView;

/// Bounds of a located target and the viewport it was measured in.
///
/// Replaced wholesale on every change, never edited in place.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TargetGeometry {
    /// Target bounds in viewport coordinates.
    pub rect: Rect,
    /// Viewport size at measurement time.
    pub viewport: Size,
}

#[derive(Debug)]
enum Phase {
    Searching(Search),
    Tracking(Tracker),
}

/// Resources and geometry belonging to the active step.
#[derive(Debug)]
struct Activation {
    step: usize,
    phase: Phase,
    geometry: Option<TargetGeometry>,
    placement: Option<TooltipPlacement>,
    shown_at_ms: u64,
}

#[derive(Debug, Default)]
struct Autostart {
    bootstrapped: bool,
    timer: Option<TimerId>,
}

/// A guided tour over a host surface.
///
/// The engine is single-threaded and sans-IO: it acts only when the host
/// calls into it, and it waits only on host timers and frames.
///
/// ```
/// use kurbo::{Rect, Size};
/// use waymark_tour::host::{
///     EventKind, EventSource, FrameId, ListenerId, MutationOptions, ObserverId, Scheduler,
///     ScrollOptions, Surface, TimerId,
/// };
/// use waymark_tour::{Catalog, MemoryService, TourConfig, TourEngine};
///
/// // A page with one element and a clock that never moves.
/// struct Page;
///
/// impl Surface for Page {
///     type Element = ();
///     fn query(&self, selector: &str) -> Option<()> {
///         (selector == "#inbox").then_some(())
///     }
///     fn scroll_into_view(&mut self, _: &(), _: ScrollOptions) {}
///     fn bounding_rect(&self, _: &()) -> Rect {
///         Rect::new(40.0, 40.0, 240.0, 80.0)
///     }
///     fn viewport(&self) -> Size {
///         Size::new(1280.0, 800.0)
///     }
/// }
/// impl Scheduler for Page {
///     fn now_ms(&self) -> u64 { 0 }
///     fn wall_clock(&self) -> chrono::DateTime<chrono::Utc> { chrono::Utc::now() }
///     fn set_timeout(&mut self, _: u64) -> TimerId { TimerId(1) }
///     fn clear_timeout(&mut self, _: TimerId) {}
///     fn request_frame(&mut self) -> FrameId { FrameId(1) }
///     fn cancel_frame(&mut self, _: FrameId) {}
/// }
/// impl EventSource for Page {
///     fn listen(&mut self, _: EventKind) -> ListenerId { ListenerId(1) }
///     fn unlisten(&mut self, _: ListenerId) {}
///     fn observe_mutations(&mut self, _: &MutationOptions) -> ObserverId { ObserverId(1) }
///     fn disconnect(&mut self, _: ObserverId) {}
/// }
///
/// let catalog = Catalog::from_json(r##"[
///     { "id": "inbox", "title": "Inbox", "description": "New files land here.",
///       "target": "#inbox", "placement": "bottom", "order": 0 }
/// ]"##).unwrap();
///
/// let mut tour = TourEngine::new(Page, MemoryService::new(), catalog, TourConfig::default());
/// tour.start();
///
/// let view = tour.view().unwrap();
/// assert_eq!(view.step.id, "inbox");
/// assert!(view.is_last());
/// assert_eq!(view.placement.top(), 96.0);
///
/// tour.next();
/// assert!(!tour.is_active());
/// assert_eq!(tour.service().record().times_completed, 1);
/// ```
pub struct TourEngine<H: Host, S: TourService> {
    host: H,
    service: S,
    catalog: Catalog,
    config: TourConfig,
    machine: TourMachine,
    record: PersistedTourRecord,
    last_error: Option<ServiceError>,
    autostart: Autostart,
    keyboard: KeyboardController,
    activation: Option<Activation>,
    tooltip_size: Size,
}

impl<H: Host, S: TourService> TourEngine<H, S> {
    /// Create an inactive engine. Nothing is read or scheduled until
    /// [`bootstrap`](Self::bootstrap) or [`start`](Self::start).
    pub fn new(host: H, service: S, catalog: Catalog, config: TourConfig) -> Self {
        Self {
            machine: TourMachine::new(catalog.len()),
            tooltip_size: config.tooltip_size(),
            host,
            service,
            catalog,
            config,
            record: PersistedTourRecord::default(),
            last_error: None,
            autostart: Autostart::default(),
            keyboard: KeyboardController::default(),
            activation: None,
        }
    }

    /// Read the persisted record and, for a first run, schedule the tour to
    /// start after the settle delay.
    ///
    /// Only the first call does anything.
    pub fn bootstrap(&mut self) {
        if self.autostart.bootstrapped {
            return;
        }
        self.autostart.bootstrapped = true;
        if !self.refresh_record() {
            return;
        }
        if self.record.wants_autostart() && !self.machine.is_active() {
            debug!(delay_ms = self.config.autostart_delay_ms, "scheduling autostart");
            self.autostart.timer = Some(self.host.set_timeout(self.config.autostart_delay_ms));
        }
    }

    /// Start the tour at the first step, restarting a run in progress.
    ///
    /// Prior completion or dismissal does not prevent a manual start.
    pub fn start(&mut self) {
        self.cancel_autostart();
        let transition = self.machine.start();
        self.apply(transition);
    }

    /// Advance one step, or complete the tour on the last one.
    pub fn next(&mut self) {
        let transition = self.machine.next();
        self.apply(transition);
    }

    /// Go back one step. Not persisted.
    pub fn prev(&mut self) {
        let transition = self.machine.prev();
        self.apply(transition);
    }

    /// Dismiss the tour.
    pub fn skip(&mut self) {
        let transition = self.machine.skip();
        self.apply(transition);
    }

    /// Finish the tour.
    pub fn complete(&mut self) {
        let transition = self.machine.complete();
        self.apply(transition);
    }

    /// Stop the tour, clear persisted progress, and re-read the record.
    pub fn reset(&mut self) {
        self.cancel_autostart();
        self.deactivate();
        self.machine.halt();
        self.machine.seed(0);
        self.last_error = None;
        info!("tour reset");
        let result = self.service.reset_tour();
        if self.persisted(result) {
            self.refresh_record();
        }
    }

    /// A host timeout fired.
    pub fn on_timer(&mut self, id: TimerId) {
        if self.autostart.timer == Some(id) {
            self.autostart.timer = None;
            if self.machine.is_active() {
                debug!("tour already active; autostart dropped");
            } else {
                info!("autostarting tour");
                self.start();
            }
            return;
        }
        let retry = match self.activation.as_mut() {
            Some(Activation {
                phase: Phase::Searching(search),
                ..
            }) => search.take_timer(id),
            _ => false,
        };
        if retry {
            self.attempt_locate();
        }
    }

    /// A host animation frame fired.
    pub fn on_frame(&mut self, id: FrameId) {
        let due = match self.activation.as_mut() {
            Some(Activation {
                phase: Phase::Tracking(tracker),
                ..
            }) => tracker.take_frame(id),
            _ => false,
        };
        if due {
            self.remeasure();
        }
    }

    /// A resize, scroll, or mutation listener fired.
    pub fn on_signal(&mut self, signal: LayoutSignal) {
        if let Some(Activation {
            phase: Phase::Tracking(tracker),
            ..
        }) = self.activation.as_mut()
        {
            trace!(?signal, "layout signal");
            tracker.schedule(&mut self.host);
        }
    }

    /// A key was pressed.
    pub fn on_key(&mut self, key: Key) -> KeyResponse {
        if !self.machine.is_active() {
            return KeyResponse::IGNORED;
        }
        match command_for(key) {
            Some(TourCommand::Next) => self.next(),
            Some(TourCommand::Prev) => self.prev(),
            Some(TourCommand::Skip) => self.skip(),
            None => return KeyResponse::IGNORED,
        }
        KeyResponse::HANDLED
    }

    /// Report the rendered tooltip size.
    ///
    /// Placement is recomputed only when either dimension moved by more
    /// than the configured threshold.
    pub fn set_tooltip_size(&mut self, size: Size) {
        let threshold = self.config.remeasure_threshold;
        let changed = (size.width - self.tooltip_size.width).abs() > threshold
            || (size.height - self.tooltip_size.height).abs() > threshold;
        if !changed {
            return;
        }
        self.tooltip_size = size;
        let geometry = self.activation.as_ref().and_then(|a| a.geometry);
        if let Some(geometry) = geometry {
            self.place(geometry);
        }
    }

    /// Release every host resource. Also run on drop.
    pub fn unmount(&mut self) {
        self.cancel_autostart();
        self.deactivate();
        self.machine.halt();
    }

    /// Render model for the active step, once its target has been located.
    #[must_use]
    pub fn view(&self) -> Option<TourView<'_>> {
        let activation = self.activation.as_ref()?;
        let geometry = activation.geometry?;
        let placement = activation.placement?;
        let step = self.catalog.get(activation.step)?;
        let style = &self.config.spotlight;
        Some(TourView {
            step,
            index: activation.step,
            total: self.catalog.len(),
            target: geometry.rect,
            placement,
            tooltip: placement.rect(self.tooltip_size),
            arrow: Arrow::aim(
                &placement,
                geometry.rect,
                self.tooltip_size,
                Arrow::DEFAULT_INSET,
            ),
            slide: slide_offset(placement.side, self.config.slide_distance),
            spotlight: Spotlight::new(geometry.rect, geometry.viewport, style),
            style,
            shown_at_ms: activation.shown_at_ms,
        })
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> TourState {
        self.machine.state()
    }

    /// Whether a run is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.machine.is_active()
    }

    /// The active step index.
    #[must_use]
    pub fn current_step(&self) -> Option<usize> {
        self.machine.current_step()
    }

    /// The last step shown, or the resume step read at bootstrap.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.machine.cursor()
    }

    /// Number of steps.
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.catalog.len()
    }

    /// Local mirror of the persisted record.
    #[must_use]
    pub fn record(&self) -> &PersistedTourRecord {
        &self.record
    }

    /// The most recent persistence failure.
    #[must_use]
    pub fn last_error(&self) -> Option<&ServiceError> {
        self.last_error.as_ref()
    }

    /// Latest geometry of the active step's target.
    #[must_use]
    pub fn geometry(&self) -> Option<TargetGeometry> {
        self.activation.as_ref().and_then(|a| a.geometry)
    }

    /// Latest tooltip placement for the active step.
    #[must_use]
    pub fn placement(&self) -> Option<TooltipPlacement> {
        self.activation.as_ref().and_then(|a| a.placement)
    }

    /// Tooltip size used for placement.
    #[must_use]
    pub fn tooltip_size(&self) -> Size {
        self.tooltip_size
    }

    /// The step catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &TourConfig {
        &self.config
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The persistence service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// The persistence service, mutably.
    pub fn service_mut(&mut self) -> &mut S {
        &mut self.service
    }

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Started => {
                info!(steps = self.machine.total(), "tour started");
                self.last_error = None;
                self.enter_step(0);
            }
            Transition::Advanced { to } => {
                debug!(step = to, "tour advanced");
                self.enter_step(to);
            }
            Transition::Retreated { to } => {
                debug!(step = to, "tour went back");
                self.activate(to);
            }
            Transition::Completed => {
                self.deactivate();
                self.last_error = None;
                info!("tour completed");
                let result = self.service.complete_tour();
                if self.persisted(result) {
                    self.record.completed_at = Some(self.host.wall_clock());
                    self.record.times_completed += 1;
                }
            }
            Transition::Skipped => {
                self.deactivate();
                self.last_error = None;
                info!(step = self.machine.cursor(), "tour skipped");
                let result = self.service.skip_tour();
                if self.persisted(result) {
                    self.record.skipped_at = Some(self.host.wall_clock());
                }
            }
            Transition::Ignored => {}
        }
    }

    /// Record forward progress, then activate.
    fn enter_step(&mut self, step: usize) {
        let wire = u32::try_from(step).unwrap_or(u32::MAX);
        let result = self.service.update_tour_step(wire);
        if self.persisted(result) {
            self.record.current_step = wire;
            self.record.has_seen = true;
        }
        self.activate(step);
    }

    fn activate(&mut self, step: usize) {
        self.end_activation();
        self.keyboard.attach(&mut self.host);

        let now = self.host.now_ms();
        let delay = self.config.retry.initial_delay_ms;
        let mut search = Search::new(now);
        if delay > 0 {
            search.arm(self.host.set_timeout(delay));
        }
        self.activation = Some(Activation {
            step,
            phase: Phase::Searching(search),
            geometry: None,
            placement: None,
            shown_at_ms: now,
        });
        if delay == 0 {
            self.attempt_locate();
        }
    }

    /// Cancel the active step's timer or frame and drop its subscriptions.
    fn end_activation(&mut self) {
        let Some(activation) = self.activation.take() else {
            return;
        };
        match activation.phase {
            Phase::Searching(mut search) => search.cancel(&mut self.host),
            Phase::Tracking(tracker) => tracker.detach(&mut self.host),
        }
    }

    fn deactivate(&mut self) {
        self.end_activation();
        self.keyboard.detach(&mut self.host);
    }

    fn cancel_autostart(&mut self) {
        if let Some(timer) = self.autostart.timer.take() {
            self.host.clear_timeout(timer);
        }
    }

    fn attempt_locate(&mut self) {
        let Some(activation) = self.activation.as_mut() else {
            return;
        };
        let Some(step) = self.catalog.get(activation.step) else {
            return;
        };
        let Phase::Searching(search) = &mut activation.phase else {
            return;
        };

        if let Some(rect) = locate(&mut self.host, &step.target) {
            let now = self.host.now_ms();
            debug!(
                step = %step.id,
                attempts = search.attempts() + 1,
                elapsed_ms = now.saturating_sub(search.started_ms()),
                "target located"
            );
            let tracker = Tracker::attach(&mut self.host, self.config.mutation_root.clone());
            activation.phase = Phase::Tracking(tracker);
            activation.shown_at_ms = now;
            let viewport = self.host.viewport();
            self.place(TargetGeometry { rect, viewport });
            return;
        }

        match search.miss(&self.config.retry) {
            SearchStep::Retry { delay_ms } => {
                search.arm(self.host.set_timeout(delay_ms));
                debug!(step = %step.id, attempts = search.attempts(), "target not found; retrying");
            }
            SearchStep::Exhausted => {
                debug!(
                    step = %step.id,
                    attempts = search.attempts(),
                    elapsed_ms = self.host.now_ms().saturating_sub(search.started_ms()),
                    "target not found; moving on"
                );
                self.next();
            }
        }
    }

    /// Measure the tracked target again and re-place on change.
    ///
    /// A target that has disappeared keeps its last geometry.
    fn remeasure(&mut self) {
        let Some(activation) = self.activation.as_ref() else {
            return;
        };
        let Some(step) = self.catalog.get(activation.step) else {
            return;
        };
        let Some(rect) = measure(&self.host, &step.target) else {
            debug!(step = %step.id, "tracked target missing; keeping last geometry");
            return;
        };
        let geometry = TargetGeometry {
            rect,
            viewport: self.host.viewport(),
        };
        if activation.geometry != Some(geometry) {
            self.place(geometry);
        }
    }

    fn place(&mut self, geometry: TargetGeometry) {
        let Some(activation) = self.activation.as_mut() else {
            return;
        };
        let Some(step) = self.catalog.get(activation.step) else {
            return;
        };
        let placement = compute_placement(
            geometry.rect,
            step.placement,
            self.tooltip_size,
            geometry.viewport,
            &self.config.placement,
        );
        let previous = activation.placement.map(|p| p.side);
        if placement.side != step.placement && previous != Some(placement.side) {
            debug!(
                step = %step.id,
                preferred = ?step.placement,
                actual = ?placement.side,
                "placement fell back"
            );
        }
        activation.geometry = Some(geometry);
        activation.placement = Some(placement);
    }

    /// Re-read the record and seed the resume step. Returns `false` on failure.
    fn refresh_record(&mut self) -> bool {
        self.last_error = None;
        match self.service.get_tour_state() {
            Ok(record) => {
                self.machine
                    .seed(usize::try_from(record.current_step).unwrap_or(usize::MAX));
                self.record = record;
                true
            }
            Err(err) => {
                self.record_failure(err);
                false
            }
        }
    }

    fn persisted(&mut self, result: Result<(), ServiceError>) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                self.record_failure(err);
                false
            }
        }
    }

    fn record_failure(&mut self, err: ServiceError) {
        warn!(command = err.command(), error = %err, "tour persistence failed");
        self.last_error = Some(err);
    }
}

impl<H: Host, S: TourService> fmt::Debug for TourEngine<H, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourEngine")
            .field("state", &self.machine.state())
            .field("total_steps", &self.catalog.len())
            .field("record", &self.record)
            .field("last_error", &self.last_error)
            .field("activation", &self.activation)
            .field("keyboard_attached", &self.keyboard.is_attached())
            .finish_non_exhaustive()
    }
}

impl<H: Host, S: TourService> Drop for TourEngine<H, S> {
    fn drop(&mut self) {
        self.unmount();
    }
}
