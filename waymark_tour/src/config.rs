// Copyright 2026 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration.

use kurbo::Size;
use serde::{Deserialize, Serialize};
use waymark_overlay::SpotlightStyle;
use waymark_placement::PlacementConfig;

use crate::error::ConfigError;

/// How long the engine keeps looking for a step's target before skipping it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Delay before the first attempt; `0` attempts synchronously on activation.
    pub initial_delay_ms: u64,
    /// Delay between attempts.
    pub interval_ms: u64,
    /// Total attempts, including the first. `0` is treated as `1`.
    pub max_attempts: u32,
}

impl RetryPolicy {
    /// Attempts actually made, never less than one.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Upper bound on the time from activation to giving up.
    #[must_use]
    pub fn budget_ms(&self) -> u64 {
        self.interval_ms
            .saturating_mul(u64::from(self.attempts() - 1))
            .saturating_add(self.initial_delay_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay_ms: 0,
            interval_ms: 100,
            max_attempts: 15,
        }
    }
}

/// Engine configuration.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use waymark_tour::TourConfig;
///
/// let config = TourConfig::from_json(r#"{ "retry": { "max_attempts": 5 } }"#).unwrap();
/// assert_eq!(config.retry.max_attempts, 5);
/// assert_eq!(config.retry.interval_ms, 100);
/// assert_eq!(config.autostart_delay_ms, 1000);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    /// Target search policy.
    pub retry: RetryPolicy,
    /// Settle delay before a first-run tour starts on its own.
    pub autostart_delay_ms: u64,
    /// Tooltip gap and viewport padding.
    pub placement: PlacementConfig,
    /// Tooltip width.
    pub tooltip_width: f64,
    /// Tooltip height assumed until the host reports a measurement.
    pub tooltip_height: f64,
    /// Smallest tooltip size change that triggers a new placement.
    pub remeasure_threshold: f64,
    /// Overlay style.
    pub spotlight: SpotlightStyle,
    /// Distance the tooltip slides in from, toward the target.
    pub slide_distance: f64,
    /// Selector of the container observed for layout mutations; `None` means the document body.
    pub mutation_root: Option<String>,
}

impl TourConfig {
    /// Parse a configuration document, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Initial tooltip size.
    #[must_use]
    pub fn tooltip_size(&self) -> Size {
        Size::new(self.tooltip_width, self.tooltip_height)
    }
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            autostart_delay_ms: 1000,
            placement: PlacementConfig::default(),
            tooltip_width: 360.0,
            tooltip_height: 200.0,
            remeasure_threshold: 2.0,
            spotlight: SpotlightStyle::default(),
            slide_distance: 12.0,
            mutation_root: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_retry_budget_is_bounded() {
        let retry = RetryPolicy::default();
        assert_eq!(retry.attempts(), 15);
        assert_eq!(retry.budget_ms(), 1400);
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let retry = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };
        assert_eq!(retry.attempts(), 1);
        assert_eq!(retry.budget_ms(), 0);
    }

    #[test]
    fn huge_budget_saturates() {
        let retry = RetryPolicy {
            initial_delay_ms: u64::MAX,
            interval_ms: u64::MAX,
            max_attempts: u32::MAX,
        };
        assert_eq!(retry.budget_ms(), u64::MAX);
    }

    #[test]
    fn nested_sections_merge_with_defaults() {
        let config = TourConfig::from_json(
            r#"{
                "placement": { "gap": 24.0 },
                "spotlight": { "padding": 4.0, "pulse": { "period_ms": 1000 } },
                "mutation_root": "main"
            }"#,
        )
        .unwrap();
        assert_eq!(config.placement.gap, 24.0);
        assert_eq!(config.placement.padding, 16.0);
        assert_eq!(config.spotlight.padding, 4.0);
        assert_eq!(config.spotlight.corner_radius, 12.0);
        assert_eq!(config.spotlight.pulse.period_ms, 1000);
        assert_eq!(config.spotlight.pulse.peak_scale, 1.04);
        assert_eq!(config.mutation_root.as_deref(), Some("main"));
        assert_eq!(config.tooltip_size(), Size::new(360.0, 200.0));
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(TourConfig::from_json("{ not json").is_err());
        assert!(TourConfig::from_json(r#"{ "retry": { "max_attempts": -1 } }"#).is_err());
    }
}
