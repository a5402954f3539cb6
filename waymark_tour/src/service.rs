// Copyright 2026 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The persistence boundary.
//!
//! Tour progress lives in an external service. The engine reads it once at
//! startup through [`TourService::get_tour_state`] and reports every durable
//! transition through the remaining operations. Failures are returned to the
//! engine, which records them and carries on.
//!
//! [`CommandService`] adapts any named-command, JSON-argument remote call
//! ([`Invoke`]) to [`TourService`]. [`MemoryService`] keeps the record in
//! process with the same lifecycle a backend applies.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{InvokeError, ServiceError};

/// Tour progress as stored by the service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedTourRecord {
    /// Set once the user has been shown any step.
    pub has_seen: bool,
    /// Last step index reported, for resume.
    pub current_step: u32,
    /// When the most recent run reached the end.
    pub completed_at: Option<DateTime<Utc>>,
    /// When the most recent run was dismissed.
    pub skipped_at: Option<DateTime<Utc>>,
    /// Number of runs that reached the end.
    pub times_completed: u32,
    /// Last modification time, if the service tracks one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PersistedTourRecord {
    /// Whether this record calls for starting the tour on launch.
    ///
    /// Only a record that was never shown and carries no terminal marker
    /// qualifies.
    #[must_use]
    pub fn wants_autostart(&self) -> bool {
        !self.has_seen && self.completed_at.is_none() && self.skipped_at.is_none()
    }
}

/// Tour persistence operations.
pub trait TourService {
    /// Read the stored record.
    fn get_tour_state(&mut self) -> Result<PersistedTourRecord, ServiceError>;

    /// Record that `step` is now shown.
    fn update_tour_step(&mut self, step: u32) -> Result<(), ServiceError>;

    /// Record that the current run was dismissed.
    fn skip_tour(&mut self) -> Result<(), ServiceError>;

    /// Record that the current run reached the end.
    fn complete_tour(&mut self) -> Result<(), ServiceError>;

    /// Clear progress and terminal markers so the tour counts as unseen.
    fn reset_tour(&mut self) -> Result<(), ServiceError>;
}

/// A named-command remote call with JSON arguments and result.
pub trait Invoke {
    /// Run `command` with `args` and return its JSON result.
    fn invoke(&mut self, command: &str, args: Value) -> Result<Value, InvokeError>;
}

impl<F> Invoke for F
where
    F: FnMut(&str, Value) -> Result<Value, InvokeError>,
{
    fn invoke(&mut self, command: &str, args: Value) -> Result<Value, InvokeError> {
        self(command, args)
    }
}

/// [`TourService`] over an [`Invoke`] boundary.
///
/// | Operation          | Command            | Arguments       |
/// |--------------------|--------------------|-----------------|
/// | `get_tour_state`   | `get_tour_state`   | `{}`            |
/// | `update_tour_step` | `update_tour_step` | `{"step": n}`   |
/// | `skip_tour`        | `skip_tour`        | `{}`            |
/// | `complete_tour`    | `complete_tour`    | `{}`            |
/// | `reset_tour`       | `reset_tour`       | `{}`            |
///
/// ```
/// use serde_json::{Value, json};
/// use waymark_tour::{CommandService, InvokeError, TourService};
///
/// let mut calls = Vec::new();
/// let mut service = CommandService::new(|command: &str, args: Value| {
///     calls.push((command.to_owned(), args));
///     Ok::<_, InvokeError>(Value::Null)
/// });
/// service.update_tour_step(3).unwrap();
/// drop(service);
/// assert_eq!(calls, [("update_tour_step".to_owned(), json!({ "step": 3 }))]);
/// ```
#[derive(Debug)]
pub struct CommandService<I> {
    invoker: I,
}

impl<I: Invoke> CommandService<I> {
    /// Wrap an invoker.
    pub fn new(invoker: I) -> Self {
        Self { invoker }
    }

    /// The wrapped invoker.
    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    fn call<T: DeserializeOwned>(
        &mut self,
        command: &'static str,
        args: Value,
    ) -> Result<T, ServiceError> {
        let value = self
            .invoker
            .invoke(command, args)
            .map_err(|source| ServiceError::Invoke { command, source })?;
        serde_json::from_value(value).map_err(|source| ServiceError::Decode { command, source })
    }
}

impl<I: Invoke> TourService for CommandService<I> {
    fn get_tour_state(&mut self) -> Result<PersistedTourRecord, ServiceError> {
        self.call("get_tour_state", json!({}))
    }

    fn update_tour_step(&mut self, step: u32) -> Result<(), ServiceError> {
        self.call("update_tour_step", json!({ "step": step }))
    }

    fn skip_tour(&mut self) -> Result<(), ServiceError> {
        self.call("skip_tour", json!({}))
    }

    fn complete_tour(&mut self) -> Result<(), ServiceError> {
        self.call("complete_tour", json!({}))
    }

    fn reset_tour(&mut self) -> Result<(), ServiceError> {
        self.call("reset_tour", json!({}))
    }
}

/// In-process [`TourService`] holding a single record.
#[derive(Clone, Debug, Default)]
pub struct MemoryService {
    record: PersistedTourRecord,
}

impl MemoryService {
    /// A never-seen record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing record.
    #[must_use]
    pub fn with_record(record: PersistedTourRecord) -> Self {
        Self { record }
    }

    /// The stored record.
    #[must_use]
    pub fn record(&self) -> &PersistedTourRecord {
        &self.record
    }

    fn touch(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        self.record.updated_at = Some(now);
        now
    }
}

impl TourService for MemoryService {
    fn get_tour_state(&mut self) -> Result<PersistedTourRecord, ServiceError> {
        Ok(self.record.clone())
    }

    fn update_tour_step(&mut self, step: u32) -> Result<(), ServiceError> {
        self.touch();
        self.record.current_step = step;
        self.record.has_seen = true;
        Ok(())
    }

    fn skip_tour(&mut self) -> Result<(), ServiceError> {
        let now = self.touch();
        self.record.has_seen = true;
        self.record.skipped_at = Some(now);
        Ok(())
    }

    fn complete_tour(&mut self) -> Result<(), ServiceError> {
        let now = self.touch();
        self.record.has_seen = true;
        self.record.completed_at = Some(now);
        self.record.times_completed += 1;
        Ok(())
    }

    fn reset_tour(&mut self) -> Result<(), ServiceError> {
        self.touch();
        self.record.has_seen = false;
        self.record.current_step = 0;
        self.record.completed_at = None;
        self.record.skipped_at = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autostart_requires_unseen_and_no_terminal_marker() {
        let now = Utc::now();
        let fresh = PersistedTourRecord::default();
        assert!(fresh.wants_autostart());

        let cases = [
            PersistedTourRecord {
                has_seen: true,
                ..PersistedTourRecord::default()
            },
            PersistedTourRecord {
                skipped_at: Some(now),
                ..PersistedTourRecord::default()
            },
            PersistedTourRecord {
                completed_at: Some(now),
                ..PersistedTourRecord::default()
            },
            PersistedTourRecord {
                has_seen: true,
                completed_at: Some(now),
                skipped_at: Some(now),
                ..PersistedTourRecord::default()
            },
        ];
        for record in cases {
            assert!(!record.wants_autostart(), "{record:?}");
        }
    }

    #[test]
    fn record_uses_snake_case_wire_names() {
        let record: PersistedTourRecord = serde_json::from_value(json!({
            "id": "main",
            "has_seen": true,
            "current_step": 4,
            "completed_at": null,
            "skipped_at": "2026-01-02T03:04:05Z",
            "times_completed": 2
        }))
        .unwrap();
        assert!(record.has_seen);
        assert_eq!(record.current_step, 4);
        assert_eq!(record.times_completed, 2);
        assert!(record.skipped_at.is_some());
        assert!(record.updated_at.is_none());
    }

    #[test]
    fn command_service_maps_operations_to_commands() {
        let mut seen: Vec<(String, Value)> = Vec::new();
        let mut service = CommandService::new(|command: &str, args: Value| {
            seen.push((command.to_owned(), args));
            if command == "get_tour_state" {
                Ok::<_, InvokeError>(json!({
                    "has_seen": false,
                    "current_step": 0,
                    "completed_at": null,
                    "skipped_at": null,
                    "times_completed": 0
                }))
            } else {
                Ok(Value::Null)
            }
        });

        assert!(service.get_tour_state().unwrap().wants_autostart());
        service.update_tour_step(2).unwrap();
        service.skip_tour().unwrap();
        service.complete_tour().unwrap();
        service.reset_tour().unwrap();
        drop(service);

        let commands: Vec<&str> = seen.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(
            commands,
            [
                "get_tour_state",
                "update_tour_step",
                "skip_tour",
                "complete_tour",
                "reset_tour"
            ]
        );
        assert_eq!(seen[1].1, json!({ "step": 2 }));
        assert_eq!(seen[2].1, json!({}));
    }

    #[test]
    fn command_failures_carry_the_command_name() {
        let mut service =
            CommandService::new(|_: &str, _: Value| {
            Err::<Value, _>(InvokeError::new("database is locked"))
        });
        let err = service.complete_tour().unwrap_err();
        assert_eq!(err.command(), "complete_tour");
        assert!(err.to_string().contains("database is locked"), "{err}");
    }

    #[test]
    fn malformed_payload_is_a_decode_error() {
        let mut service = CommandService::new(|_: &str, _: Value| {
            Ok::<_, InvokeError>(json!({ "has_seen": "yes" }))
        });
        let err = service.get_tour_state().unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Decode {
                command: "get_tour_state",
                ..
            }
        ));
    }

    #[test]
    fn memory_service_follows_the_record_lifecycle() {
        let mut service = MemoryService::new();
        service.update_tour_step(1).unwrap();
        assert!(service.record().has_seen);
        assert_eq!(service.record().current_step, 1);

        service.complete_tour().unwrap();
        service.complete_tour().unwrap();
        assert_eq!(service.record().times_completed, 2);
        assert!(service.record().completed_at.is_some());

        service.skip_tour().unwrap();
        assert!(service.record().skipped_at.is_some());

        service.reset_tour().unwrap();
        let record = service.get_tour_state().unwrap();
        assert!(record.wants_autostart());
        assert_eq!(record.current_step, 0);
        // Reset keeps the completion count.
        assert_eq!(record.times_completed, 2);
        assert!(record.updated_at.is_some());
    }
}
