//! Ordered, append-only registries of assertions.

use std::sync::Arc;

use serde::Serialize;

use crate::assertion::{Assertion, Capability};

/// An ordered list of registrations. Earlier entries win ties.
///
/// A registry is a stack of immutable layers. [`Registry::extend`] returns a
/// new registry sharing every existing layer and adding one on top, so
/// extending never edits a registry someone else still holds.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    layers: Vec<Arc<[Assertion]>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_assertions<I: IntoIterator<Item = Assertion>>(assertions: I) -> Self {
        Self::new().extend(assertions)
    }

    /// A new registry with `assertions` appended after every existing entry.
    pub fn extend<I: IntoIterator<Item = Assertion>>(&self, assertions: I) -> Self {
        let layer: Vec<Assertion> = assertions.into_iter().collect();
        let mut layers = self.layers.clone();
        if !layer.is_empty() {
            tracing::debug!(
                added = layer.len(),
                layers = layers.len() + 1,
                "composed registry layer"
            );
            layers.push(layer.into());
        }
        Self { layers }
    }

    /// Registrations in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &Assertion> + '_ {
        self.layers.iter().flat_map(|layer| layer.iter())
    }

    pub fn len(&self) -> usize {
        self.layers.iter().map(|layer| layer.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// First registration carrying `id`.
    pub fn find(&self, id: &str) -> Option<&Assertion> {
        self.iter().find(|assertion| assertion.id() == id)
    }

    /// Documentation records for every registration, in priority order.
    pub fn catalog(&self) -> Vec<CatalogEntry> {
        self.iter().map(CatalogEntry::from).collect()
    }

    pub fn catalog_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.catalog())
    }
}

/// What a documentation generator needs to know about one registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: String,
    pub signature: String,
    pub capability: Capability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Assertion> for CatalogEntry {
    fn from(assertion: &Assertion) -> Self {
        let meta = assertion.meta();
        Self {
            id: assertion.id().to_string(),
            signature: assertion.signature(),
            capability: assertion.capability(),
            category: meta.category.clone(),
            anchor: meta.anchor.clone(),
            description: meta.description.clone(),
        }
    }
}
