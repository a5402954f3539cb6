// Copyright 2026 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A headless guided tour over a scripted page.
//!
//! This example shows how to:
//! - implement the `waymark_tour` host traits for a toolkit (here, a fake page with a virtual clock),
//! - persist progress through `CommandService` and a JSON command backend,
//! - drive the engine from timers, frames, layout signals, and keys.
//!
//! The page has a sidebar that collapses mid-tour, a step whose target never
//! mounts, and a target near the bottom-right corner that forces a fallback side.
//!
//! Run:
//! - `RUST_LOG=waymark_tour=debug cargo run -p waymark_demos --example scripted_tour`

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use kurbo::{Rect, Size};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waymark_tour::host::{
    EventKind, EventSource, FrameId, LayoutSignal, ListenerId, MutationOptions, ObserverId,
    Scheduler, ScrollOptions, Surface, TimerId,
};
use waymark_tour::{
    Catalog, CommandService, InvokeError, Key, MemoryService, TourConfig, TourEngine, TourService,
};

const STEPS: &str = r##"[
    { "id": "rules", "title": "Rules", "description": "Rules decide where files go.",
      "target": "[data-tour=rules]", "placement": "right", "order": 1 },
    { "id": "welcome", "title": "Welcome", "description": "A quick look around.",
      "target": "#dashboard", "placement": "bottom", "order": 0 },
    { "id": "schedule", "title": "Schedules", "description": "Run rules on a timer.",
      "target": "[data-tour=schedule]", "placement": "right", "order": 2 },
    { "id": "history", "title": "History", "description": "Every move can be undone.",
      "target": "[data-tour=history]", "placement": "bottom", "order": 3 }
]"##;

/// A page with fixed elements, a virtual clock, and host-side bookkeeping.
#[derive(Debug, Default)]
struct ScriptedPage {
    now: u64,
    viewport: Size,
    elements: HashMap<&'static str, Rect>,
    next_id: u64,
    timers: BTreeSet<(u64, u64)>,
    frames: BTreeSet<u64>,
    listeners: HashMap<u64, EventKind>,
    observers: BTreeSet<u64>,
}

impl ScriptedPage {
    fn id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn pop_due(&mut self, until: u64) -> Option<TimerId> {
        let &(due, id) = self.timers.first().filter(|(due, _)| *due <= until)?;
        self.timers.remove(&(due, id));
        self.now = due;
        Some(TimerId(id))
    }
}

impl Surface for ScriptedPage {
    type Element = &'static str;

    fn query(&self, selector: &str) -> Option<&'static str> {
        self.elements.keys().copied().find(|key| *key == selector)
    }

    fn scroll_into_view(&mut self, element: &&'static str, _options: ScrollOptions) {
        tracing::trace!(element, "scroll into view");
    }

    fn bounding_rect(&self, element: &&'static str) -> Rect {
        self.elements.get(element).copied().unwrap_or(Rect::ZERO)
    }

    fn viewport(&self) -> Size {
        self.viewport
    }
}

impl Scheduler for ScriptedPage {
    fn now_ms(&self) -> u64 {
        self.now
    }

    fn wall_clock(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn set_timeout(&mut self, delay_ms: u64) -> TimerId {
        let id = self.id();
        self.timers.insert((self.now + delay_ms, id));
        TimerId(id)
    }

    fn clear_timeout(&mut self, id: TimerId) {
        self.timers.retain(|&(_, t)| t != id.0);
    }

    fn request_frame(&mut self) -> FrameId {
        let id = self.id();
        self.frames.insert(id);
        FrameId(id)
    }

    fn cancel_frame(&mut self, id: FrameId) {
        self.frames.remove(&id.0);
    }
}

impl EventSource for ScriptedPage {
    fn listen(&mut self, kind: EventKind) -> ListenerId {
        let id = self.id();
        self.listeners.insert(id, kind);
        ListenerId(id)
    }

    fn unlisten(&mut self, id: ListenerId) {
        self.listeners.remove(&id.0);
    }

    fn observe_mutations(&mut self, options: &MutationOptions) -> ObserverId {
        tracing::trace!(root = ?options.root, kinds = ?options.kinds, "observe mutations");
        let id = self.id();
        self.observers.insert(id);
        ObserverId(id)
    }

    fn disconnect(&mut self, id: ObserverId) {
        self.observers.remove(&id.0);
    }
}

/// The backend side of the command protocol, answering with JSON.
fn backend(store: &mut MemoryService, command: &str, args: &Value) -> Result<Value, InvokeError> {
    let result = match command {
        "get_tour_state" => {
            let record = store.get_tour_state().map_err(|e| InvokeError::new(e.to_string()))?;
            return serde_json::to_value(record).map_err(|e| InvokeError::new(e.to_string()));
        }
        "update_tour_step" => {
            let step = args
                .get("step")
                .and_then(Value::as_u64)
                .and_then(|s| u32::try_from(s).ok())
                .ok_or_else(|| InvokeError::new("missing `step`"))?;
            store.update_tour_step(step)
        }
        "skip_tour" => store.skip_tour(),
        "complete_tour" => store.complete_tour(),
        "reset_tour" => store.reset_tour(),
        other => return Err(InvokeError::new(format!("unknown command `{other}`"))),
    };
    result
        .map(|()| Value::Null)
        .map_err(|e| InvokeError::new(e.to_string()))
}

type Tour<I> = TourEngine<ScriptedPage, CommandService<I>>;

fn advance<I: waymark_tour::Invoke>(tour: &mut Tour<I>, ms: u64) {
    let until = tour.host().now + ms;
    while let Some(timer) = tour.host_mut().pop_due(until) {
        tour.on_timer(timer);
    }
    tour.host_mut().now = until;
}

fn run_frames<I: waymark_tour::Invoke>(tour: &mut Tour<I>) {
    let frames = core::mem::take(&mut tour.host_mut().frames);
    for frame in frames {
        tour.on_frame(FrameId(frame));
    }
}

fn report<I: waymark_tour::Invoke>(tour: &Tour<I>) {
    let Some(view) = tour.view() else {
        println!("t={:>5}ms  (no step shown)", tour.host().now);
        return;
    };
    let dots: String = view
        .dots()
        .map(|dot| match dot {
            waymark_tour::Dot::Visited => 'o',
            waymark_tour::Dot::Current => '*',
            waymark_tour::Dot::Upcoming => '.',
        })
        .collect();
    println!(
        "t={:>5}ms  [{dots}] {:<10} side={:?} tooltip=({:.0}, {:.0}) arrow={:?}@{:.0} cutout={:?}",
        tour.host().now,
        view.step.id,
        view.placement.side,
        view.tooltip.x0,
        view.tooltip.y0,
        view.arrow.edge,
        view.arrow.offset,
        view.spotlight.cutout_rect(),
    );
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "waymark_tour=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let catalog = Catalog::from_json(STEPS).expect("step catalog is valid");

    let mut page = ScriptedPage {
        viewport: Size::new(1280.0, 800.0),
        ..ScriptedPage::default()
    };
    page.elements.insert("#dashboard", Rect::new(280.0, 24.0, 1256.0, 120.0));
    page.elements.insert("[data-tour=rules]", Rect::new(16.0, 180.0, 248.0, 220.0));
    page.elements.insert("[data-tour=history]", Rect::new(1100.0, 720.0, 1260.0, 780.0));

    let mut store = MemoryService::new();
    let service = CommandService::new(move |command: &str, args: Value| {
        tracing::debug!(command, %args, "invoke");
        backend(&mut store, command, &args)
    });

    let mut tour = TourEngine::new(page, service, catalog, TourConfig::default());

    // First launch: the record is fresh, so the tour starts after the settle delay.
    tour.bootstrap();
    advance(&mut tour, 1000);
    report(&tour);

    tour.on_key(Key::from_name("ArrowRight"));
    report(&tour);

    // The sidebar collapses; the rules entry moves without a resize or scroll.
    tour.host_mut()
        .elements
        .insert("[data-tour=rules]", Rect::new(16.0, 180.0, 72.0, 220.0));
    tour.on_signal(LayoutSignal::Mutation);
    tour.on_signal(LayoutSignal::Mutation);
    run_frames(&mut tour);
    report(&tour);

    // The schedule view never mounts; the engine gives up and moves on.
    tour.on_key(Key::Enter);
    report(&tour);
    advance(&mut tour, 1500);
    report(&tour);

    // The tooltip turns out taller than assumed.
    tour.set_tooltip_size(Size::new(360.0, 240.0));
    report(&tour);

    tour.on_key(Key::Enter);
    report(&tour);

    let record = tour.record();
    println!(
        "record: has_seen={} current_step={} times_completed={} completed_at={:?}",
        record.has_seen, record.current_step, record.times_completed, record.completed_at
    );
    println!(
        "host: {} listeners, {} observers, {} timers, {} frames",
        tour.host().listeners.len(),
        tour.host().observers.len(),
        tour.host().timers.len(),
        tour.host().frames.len(),
    );

    // From a help menu: clear progress so the next launch shows the tour again.
    tour.reset();
    println!(
        "after reset: autostart on next launch = {}",
        tour.record().wants_autostart()
    );
}
