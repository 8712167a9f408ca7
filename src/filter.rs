//! View filtering
//!
//! A [`FilterState`] combines three criteria that are AND-ed together in a
//! fixed order: entity type, category multi-select and free-text search.
//! [`FilterEngine`] is stateless; callers re-derive the visible set after
//! every store or filter change.

use crate::{
    constants::EVENTS_CATEGORY,
    entity::{Entity, EntityKind},
};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Place,
    Event,
}

impl TypeFilter {
    pub fn admits(&self, kind: EntityKind) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Place => kind == EntityKind::Place,
            TypeFilter::Event => kind == EntityKind::Event,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub type_filter: TypeFilter,
    /// Empty means no category restriction
    pub categories: BTreeSet<String>,
    pub search_text: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, type_filter: TypeFilter) -> Self {
        self.type_filter = type_filter;
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    /// Adds the category if absent, removes it otherwise. Returns whether it is now selected.
    pub fn toggle_category(&mut self, category: &str) -> bool {
        if self.categories.remove(category) {
            false
        } else {
            self.categories.insert(category.to_string());
            true
        }
    }

    fn passes_type(&self, entity: &Entity) -> bool {
        self.type_filter.admits(entity.kind())
    }

    fn passes_category(&self, entity: &Entity) -> bool {
        if self.categories.is_empty() {
            return true;
        }
        match entity.kind() {
            EntityKind::Place => entity
                .category
                .as_ref()
                .map_or(false, |c| self.categories.contains(c)),
            // Events carry no category; the "Events" entry acts as a gate for all of them.
            EntityKind::Event => self.categories.contains(EVENTS_CATEGORY),
        }
    }

    fn passes_search(&self, entity: &Entity) -> bool {
        if self.search_text.is_empty() {
            return true;
        }
        entity
            .name
            .to_lowercase()
            .contains(&self.search_text.to_lowercase())
    }

    /// Type, then category, then search
    pub fn matches(&self, entity: &Entity) -> bool {
        self.passes_type(entity) && self.passes_category(entity) && self.passes_search(entity)
    }
}

/// Pure composition of a [`FilterState`] over a set of entities
pub struct FilterEngine;

impl FilterEngine {
    /// Entities passing the filter, in input order. Used for the marker view.
    pub fn apply<'a, I>(entities: I, state: &FilterState) -> Vec<&'a Entity>
    where
        I: IntoIterator<Item = &'a Entity>,
    {
        entities.into_iter().filter(|e| state.matches(e)).collect()
    }

    /// Entities passing the filter, sorted by name for the list panel
    pub fn apply_sorted<'a, I>(entities: I, state: &FilterState) -> Vec<&'a Entity>
    where
        I: IntoIterator<Item = &'a Entity>,
    {
        let mut visible = Self::apply(entities, state);
        visible.sort_by(|a, b| compare_names(&a.name, &b.name).then(a.key().cmp(&b.key())));
        visible
    }
}

/// Alphabetical name ordering for the list panel.
///
/// Names compare first on their transliterated, case-folded form so that
/// `Ċittadella` sorts with the C's and `Ħondoq` with the H's. Ties fall back
/// to accents (unaccented first) and then to case (lowercase first).
pub fn compare_names(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

fn primary_key(name: &str) -> String {
    deunicode::deunicode(name).to_lowercase()
}
