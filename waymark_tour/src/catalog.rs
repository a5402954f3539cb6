// Copyright 2026 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The ordered list of tour steps.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use waymark_placement::Side;

use crate::error::CatalogError;

/// One step of the tour, as authored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourStepDefinition {
    /// Unique identifier.
    pub id: String,
    /// Tooltip heading.
    pub title: String,
    /// Tooltip body.
    pub description: String,
    /// Selector of the highlighted element.
    pub target: String,
    /// Preferred tooltip side.
    pub placement: Side,
    /// Position in the sequence.
    pub order: u32,
}

/// Validated tour steps, sorted by [`TourStepDefinition::order`].
///
/// Authoring order does not matter; the catalog sorts on load. Order values
/// must be unique and dense from zero, and ids must be unique.
///
/// ```
/// use waymark_tour::Catalog;
///
/// let catalog = Catalog::from_json(r##"[
///     { "id": "rules", "title": "Rules", "description": "", "target": "[data-tour=rules]", "placement": "right", "order": 1 },
///     { "id": "welcome", "title": "Welcome", "description": "", "target": "#app", "placement": "bottom", "order": 0 }
/// ]"##).unwrap();
///
/// assert_eq!(catalog.steps()[0].id, "welcome");
/// assert_eq!(catalog.index_of("rules"), Some(1));
/// ```
#[derive(Clone, Debug)]
pub struct Catalog {
    steps: Vec<TourStepDefinition>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Sort and validate `steps`.
    pub fn new(mut steps: Vec<TourStepDefinition>) -> Result<Self, CatalogError> {
        if steps.is_empty() {
            return Err(CatalogError::Empty);
        }
        steps.sort_by_key(|step| step.order);

        let mut by_id = HashMap::with_capacity(steps.len());
        let mut expected = 0_u32;
        for (index, step) in steps.iter().enumerate() {
            if step.order != expected {
                return Err(if step.order < expected {
                    CatalogError::DuplicateOrder { order: step.order }
                } else {
                    CatalogError::OrderGap {
                        expected,
                        found: step.order,
                    }
                });
            }
            if by_id.insert(step.id.clone(), index).is_some() {
                return Err(CatalogError::DuplicateId {
                    id: step.id.clone(),
                });
            }
            expected += 1;
        }

        Ok(Self { steps, by_id })
    }

    /// Parse a JSON array of steps, then sort and validate it.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Steps in tour order.
    #[must_use]
    pub fn steps(&self) -> &[TourStepDefinition] {
        &self.steps
    }

    /// The step at `index`, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TourStepDefinition> {
        self.steps.get(index)
    }

    /// Position of the step with `id`.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Number of steps. Never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false`; an empty catalog fails validation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn step(id: &str, order: u32, placement: Side) -> TourStepDefinition {
    TourStepDefinition {
        id: id.into(),
        title: format!("{id} title"),
        description: format!("{id} description"),
        target: format!("#{id}"),
        placement,
        order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_sorted_by_order_on_load() {
        let catalog = Catalog::new(vec![
            step("c", 2, Side::Top),
            step("a", 0, Side::Bottom),
            step("b", 1, Side::Left),
        ])
        .unwrap();
        let ids: Vec<&str> = catalog.steps().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(catalog.index_of("c"), Some(2));
        assert_eq!(catalog.index_of("missing"), None);
        assert_eq!(catalog.len(), 3);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(matches!(Catalog::new(Vec::new()), Err(CatalogError::Empty)));
    }

    #[test]
    fn duplicate_order_is_rejected() {
        let err = Catalog::new(vec![step("a", 0, Side::Top), step("b", 0, Side::Top)]);
        assert!(matches!(err, Err(CatalogError::DuplicateOrder { order: 0 })));
    }

    #[test]
    fn gaps_are_rejected() {
        let err = Catalog::new(vec![step("a", 0, Side::Top), step("b", 2, Side::Top)]);
        assert!(matches!(
            err,
            Err(CatalogError::OrderGap {
                expected: 1,
                found: 2
            })
        ));
        let err = Catalog::new(vec![step("a", 1, Side::Top)]);
        assert!(matches!(
            err,
            Err(CatalogError::OrderGap {
                expected: 0,
                found: 1
            })
        ));
    }

    #[test]
    fn order_at_integer_limit_is_a_gap() {
        let err = Catalog::new(vec![step("a", 0, Side::Top), step("b", u32::MAX, Side::Top)]);
        assert!(matches!(
            err,
            Err(CatalogError::OrderGap {
                expected: 1,
                found: u32::MAX
            })
        ));
        let err = Catalog::from_json(
            r##"[{ "id": "x", "title": "X", "description": "d", "target": "#x", "placement": "top", "order": 4294967295 }]"##,
        );
        assert!(matches!(
            err,
            Err(CatalogError::OrderGap {
                expected: 0,
                found: u32::MAX
            })
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = Catalog::new(vec![step("a", 0, Side::Top), step("a", 1, Side::Top)]);
        assert!(matches!(err, Err(CatalogError::DuplicateId { id }) if id == "a"));
    }

    #[test]
    fn json_placement_names_are_lowercase() {
        let catalog = Catalog::from_json(
            r##"[{ "id": "x", "title": "X", "description": "d", "target": "#x", "placement": "left", "order": 0 }]"##,
        )
        .unwrap();
        assert_eq!(catalog.steps()[0].placement, Side::Left);

        let bad = Catalog::from_json(
            r##"[{ "id": "x", "title": "X", "description": "d", "target": "#x", "placement": "middle", "order": 0 }]"##,
        );
        assert!(matches!(bad, Err(CatalogError::Parse(_))));
    }
}
