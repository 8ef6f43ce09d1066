use crate::catalog::item::Item;
use crate::catalog::relation::{
    CATALOGUE_CONTENT_TYPE, HAS_DESCRIPTION, IS_CONTENT_TYPE, Metadata, Relation,
};
use crate::error::{HypercatError, Result};
use crate::metadata_validation::{CatalogueViolation, validate_catalogue_metadata};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Sentinel string reported when an insert is refused.
pub const ITEM_EXISTS: &str = "itemExists";

/// Outcome of inserting an item into a catalogue.
///
/// A refused insert is an expected condition rather than an error: the
/// catalogue is left untouched and the caller decides what to do next.
#[derive(Clone, Debug, Eq, PartialEq)]
#[must_use]
pub enum Insertion {
    Added(String),
    ItemExists,
}

impl Insertion {
    /// The inserted href, or `"itemExists"` when the insert was refused.
    pub fn as_str(&self) -> &str {
        match self {
            Insertion::Added(href) => href,
            Insertion::ItemExists => ITEM_EXISTS,
        }
    }

    pub fn href(&self) -> Option<&str> {
        match self {
            Insertion::Added(href) => Some(href),
            Insertion::ItemExists => None,
        }
    }

    pub fn is_added(&self) -> bool {
        matches!(self, Insertion::Added(_))
    }
}

impl fmt::Display for Insertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Hypercat catalogue: descriptive metadata plus a keyed set of items.
///
/// Item keys are unique and iterate in insertion order. A catalogue owns its
/// items outright; nested catalogues are flattened to a single item on
/// insertion (see [`Catalogue::add_catalogue`]).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Catalogue {
    metadata: Metadata,
    items: BTreeMap<String, Item>,
    order: Vec<String>,
}

impl Catalogue {
    /// Minimal catalogue whose only relation is its description.
    pub fn new(description: impl Into<String>) -> Result<Self> {
        let description = description.into();
        tracing::debug!(%description, "creating catalogue");
        let catalogue = Self::described(description);
        catalogue
            .validate()
            .map_err(HypercatError::InvalidCatalogue)?;
        Ok(catalogue)
    }

    /// Catalogue whose description is known to be non-empty.
    pub(crate) fn described(description: String) -> Self {
        let mut metadata = Metadata::new();
        metadata.add(Relation::new(HAS_DESCRIPTION, description));
        Self::hydrate(metadata)
    }

    /// Hydration target for the codec; the caller must validate before the
    /// catalogue escapes the crate.
    pub(crate) fn hydrate(metadata: Metadata) -> Self {
        Self {
            metadata,
            items: BTreeMap::new(),
            order: Vec::new(),
        }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn add_relation(&mut self, relation: Relation) {
        self.metadata.add(relation);
    }

    /// Remove the first relation equal to `relation`; no-op when absent.
    pub fn remove_relation(&mut self, relation: &Relation) {
        self.metadata.remove(relation);
    }

    pub fn find_first_relation(&self, rel: &str) -> Option<&Relation> {
        self.metadata.find_first(rel)
    }

    pub fn find_all_relations(&self, rel: &str) -> Vec<&Relation> {
        self.metadata.find_all(rel)
    }

    pub fn description(&self) -> Option<&str> {
        self.metadata.first_value(HAS_DESCRIPTION)
    }

    /// Insert `item` under `href`.
    ///
    /// Refuses (without mutating) when `href` is empty or already present.
    pub fn add_item(&mut self, item: Item, href: &str) -> Insertion {
        if href.is_empty() || self.items.contains_key(href) {
            tracing::debug!(href, "empty or duplicate href; insert refused");
            return Insertion::ItemExists;
        }
        self.items.insert(href.to_string(), item);
        self.order.push(href.to_string());
        Insertion::Added(href.to_string())
    }

    /// Insert `item` under its own href, or a generated one when that is empty.
    pub fn insert_item(&mut self, item: Item) -> Insertion {
        let href = if item.href().is_empty() {
            Self::generate_href()
        } else {
            item.href().to_string()
        };
        self.add_item(item, &href)
    }

    /// Flatten `child` into a single item and insert it under `href`.
    ///
    /// An empty `href` is replaced with a generated one. The item leads with
    /// the child's description and the catalogue content type, followed by a
    /// copy of the child's full metadata; the child's own items are not
    /// carried over.
    pub fn add_catalogue(&mut self, child: &Catalogue, href: &str) -> Result<Insertion> {
        let href = if href.is_empty() {
            Self::generate_href()
        } else {
            href.to_string()
        };
        let item = child.flatten(&href);
        item.validate().map_err(HypercatError::InvalidItem)?;
        Ok(self.add_item(item, &href))
    }

    fn flatten(&self, href: &str) -> Item {
        let description = self
            .metadata
            .find_all(HAS_DESCRIPTION)
            .into_iter()
            .map(Relation::val)
            .find(|val| !val.is_empty())
            .unwrap_or_default();

        let mut metadata = Metadata::new();
        metadata.add(Relation::new(HAS_DESCRIPTION, description));
        metadata.add(Relation::new(IS_CONTENT_TYPE, CATALOGUE_CONTENT_TYPE));
        for relation in self.metadata.iter() {
            metadata.add(relation.clone());
        }
        Item::hydrate(href.to_string(), metadata)
    }

    /// Remove the entry for `key` if present.
    pub fn remove_item(&mut self, key: &str) -> Option<Item> {
        let removed = self.items.remove(key)?;
        self.order.retain(|existing| existing != key);
        Some(removed)
    }

    pub fn item(&self, key: &str) -> Option<&Item> {
        self.items.get(key)
    }

    pub fn contains_item(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn item_count(&self) -> usize {
        self.order.len()
    }

    /// Iterate `(key, item)` pairs in insertion order.
    pub fn items(&self) -> impl Iterator<Item = (&str, &Item)> {
        self.order
            .iter()
            .filter_map(|key| self.items.get(key).map(|item| (key.as_str(), item)))
    }

    /// Random identifier for an item inserted without an href.
    ///
    /// Existing keys are not consulted; v4 UUID collisions are treated as
    /// negligible.
    pub fn generate_href() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn validate(&self) -> std::result::Result<(), CatalogueViolation> {
        validate_catalogue_metadata(&self.metadata)
    }
}
