// Copyright 2026 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for the service boundary, the step catalog, and configuration.

/// A failed remote call, as reported by an [`Invoke`](crate::service::Invoke) implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct InvokeError {
    /// Backend-provided failure message.
    pub message: String,
}

impl InvokeError {
    /// Wrap a backend failure message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A tour persistence call that did not succeed.
///
/// The engine keeps the most recent one in
/// [`TourEngine::last_error`](crate::TourEngine::last_error); it never undoes
/// the local transition that triggered the call.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The backend rejected the command or could not be reached.
    #[error("`{command}` failed: {source}")]
    Invoke {
        /// Command name.
        command: &'static str,
        /// Underlying failure.
        #[source]
        source: InvokeError,
    },
    /// The backend answered with a payload of the wrong shape.
    #[error("`{command}` returned an unexpected payload: {source}")]
    Decode {
        /// Command name.
        command: &'static str,
        /// Decoding failure.
        #[source]
        source: serde_json::Error,
    },
}

impl ServiceError {
    /// Name of the command that failed.
    #[must_use]
    pub fn command(&self) -> &'static str {
        match self {
            Self::Invoke { command, .. } | Self::Decode { command, .. } => command,
        }
    }
}

/// A step catalog that violates its invariants.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog source is not valid JSON for a list of steps.
    #[error("invalid step catalog: {0}")]
    Parse(#[from] serde_json::Error),
    /// The catalog has no steps.
    #[error("step catalog is empty")]
    Empty,
    /// Two steps share an id.
    #[error("duplicate step id `{id}`")]
    DuplicateId {
        /// The repeated id.
        id: String,
    },
    /// Two steps share an order value.
    #[error("duplicate step order {order}")]
    DuplicateOrder {
        /// The repeated order value.
        order: u32,
    },
    /// Sorted order values skip a position.
    #[error("step order is not dense: expected {expected}, found {found}")]
    OrderGap {
        /// The order value expected at this position.
        expected: u32,
        /// The order value present instead.
        found: u32,
    },
}

/// A configuration document that could not be read.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration is not valid JSON for [`TourConfig`](crate::TourConfig).
    #[error("invalid tour configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
