// Copyright 2026 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard navigation while a tour is active.
//!
//! | Key                       | Action |
//! |---------------------------|--------|
//! | `ArrowRight`, `Enter`     | next   |
//! | `ArrowLeft`               | prev   |
//! | `Escape`                  | skip   |
//!
//! Handled keys ask the host to suppress the default action so the page
//! underneath does not scroll or submit.

use crate::host::{EventKind, EventSource, ListenerId};

/// A key press, as forwarded by the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Right arrow.
    ArrowRight,
    /// Left arrow.
    ArrowLeft,
    /// Enter or Return.
    Enter,
    /// Escape.
    Escape,
    /// Any key the tour does not handle.
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    ///
    /// ```
    /// use waymark_tour::Key;
    ///
    /// assert_eq!(Key::from_name("ArrowRight"), Key::ArrowRight);
    /// assert_eq!(Key::from_name("Esc"), Key::Escape);
    /// assert_eq!(Key::from_name("a"), Key::Other);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowRight" | "Right" => Self::ArrowRight,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }
}

/// The engine's answer to a key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyResponse {
    /// The host should call `preventDefault` (or its equivalent) on the event.
    pub prevent_default: bool,
}

impl KeyResponse {
    /// The key was not for the tour.
    pub const IGNORED: Self = Self {
        prevent_default: false,
    };
    /// The key drove a tour transition.
    pub const HANDLED: Self = Self {
        prevent_default: true,
    };
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum TourCommand {
    Next,
    Prev,
    Skip,
}

pub(crate) fn command_for(key: Key) -> Option<TourCommand> {
    match key {
        Key::ArrowRight | Key::Enter => Some(TourCommand::Next),
        Key::ArrowLeft => Some(TourCommand::Prev),
        Key::Escape => Some(TourCommand::Skip),
        Key::Other => None,
    }
}

/// The single key listener held while a tour is active.
#[derive(Debug, Default)]
pub(crate) struct KeyboardController {
    listener: Option<ListenerId>,
}

impl KeyboardController {
    /// Attach the listener unless it already is.
    pub(crate) fn attach<H: EventSource + ?Sized>(&mut self, host: &mut H) {
        if self.listener.is_none() {
            self.listener = Some(host.listen(EventKind::KeyDown));
        }
    }

    pub(crate) fn detach<H: EventSource + ?Sized>(&mut self, host: &mut H) {
        if let Some(listener) = self.listener.take() {
            host.unlisten(listener);
        }
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.listener.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_keys_map_to_commands() {
        assert_eq!(command_for(Key::ArrowRight), Some(TourCommand::Next));
        assert_eq!(command_for(Key::Enter), Some(TourCommand::Next));
        assert_eq!(command_for(Key::ArrowLeft), Some(TourCommand::Prev));
        assert_eq!(command_for(Key::Escape), Some(TourCommand::Skip));
        assert_eq!(command_for(Key::Other), None);
    }

    #[test]
    fn unknown_names_are_other() {
        for name in ["", "ArrowUp", "Tab", " ", "enter"] {
            assert_eq!(Key::from_name(name), Key::Other, "{name:?}");
        }
    }
}
