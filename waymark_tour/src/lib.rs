// Copyright 2026 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waymark Tour: a step-sequenced guided tour engine.
//!
//! ## Overview
//!
//! A tour is an ordered [`Catalog`] of steps, each naming a target element
//! by selector and a preferred tooltip side. The [`TourEngine`] walks the
//! catalog one step at a time:
//!
//! - **Locate.** On activation the target is resolved, scrolled into view,
//!   and measured. A missing target is retried on a fixed interval for a
//!   bounded number of attempts; after that the step is skipped through
//!   [`TourEngine::next`], which completes the tour on the last step.
//! - **Place.** The measured rectangle feeds
//!   [`waymark_placement::compute_placement`], which tries the preferred side
//!   first, falls back through the others, and clamps into the viewport.
//! - **Track.** While a step is shown, resize, capturing scroll, and layout
//!   mutations schedule a remeasurement on the next animation frame. Bursts
//!   coalesce into one remeasurement per frame.
//! - **Persist.** Forward progress and terminal outcomes are reported to a
//!   [`TourService`]. Failures land in [`TourEngine::last_error`] and never
//!   undo the local transition.
//!
//! ## Host integration
//!
//! The engine is sans-IO. A host implements the traits in [`host`] and
//! forwards callbacks by id: [`TourEngine::on_timer`],
//! [`TourEngine::on_frame`], [`TourEngine::on_signal`], and
//! [`TourEngine::on_key`]. Ids that are stale (cancelled, or owned by a step
//! that has since ended) are ignored, so hosts do not need to filter them.
//!
//! Every subscription the engine makes for a step is released before the
//! next step begins, and everything is released on
//! [`TourEngine::unmount`] or drop.
//!
//! ## Rendering
//!
//! [`TourEngine::view`] returns a [`TourView`] with the target, tooltip
//! rectangle, arrow, entrance offset, and [`Spotlight`](waymark_overlay::Spotlight)
//! for the active step, once its target has been found.
//!
//! ## Persistence boundary
//!
//! [`CommandService`] speaks the named-command, JSON-argument protocol of a
//! desktop backend through any [`Invoke`] implementation. [`MemoryService`]
//! keeps the record in process.

pub mod host;
pub mod machine;

mod catalog;
mod config;
mod engine;
mod error;
mod keyboard;
mod locate;
mod service;
mod tracking;
mod view;

#[cfg(test)]
mod testing;

pub use catalog::{Catalog, TourStepDefinition};
pub use config::{RetryPolicy, TourConfig};
pub use engine::{TargetGeometry, TourEngine};
pub use error::{CatalogError, ConfigError, InvokeError, ServiceError};
pub use keyboard::{Key, KeyResponse};
pub use machine::{TourMachine, TourState, Transition};
pub use service::{CommandService, Invoke, MemoryService, PersistedTourRecord, TourService};
pub use view::{Dot, TourView};
