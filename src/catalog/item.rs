use crate::catalog::relation::{HAS_DESCRIPTION, IS_CONTENT_TYPE, Metadata, Relation};
use crate::error::{HypercatError, Result};
use crate::metadata_validation::{ItemViolation, validate_item_parts};
use std::fmt;

/// A resource reference inside a catalogue: an href plus its metadata.
///
/// Items that reach callers always satisfy the item contract (non-empty href,
/// non-empty description and content-type relations). Only metadata changes
/// after construction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Item {
    href: String,
    metadata: Metadata,
}

impl Item {
    /// Build a minimal item carrying the two mandatory relations.
    pub fn new(
        href: impl Into<String>,
        description: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Result<Self> {
        let mut metadata = Metadata::new();
        metadata.add(Relation::new(HAS_DESCRIPTION, description));
        metadata.add(Relation::new(IS_CONTENT_TYPE, content_type));
        Self::from_parts(href, metadata)
    }

    /// Build an item from an href and a full metadata sequence.
    pub fn from_parts(href: impl Into<String>, metadata: Metadata) -> Result<Self> {
        let item = Self::hydrate(href.into(), metadata);
        item.validate().map_err(HypercatError::InvalidItem)?;
        Ok(item)
    }

    /// Hydration target for the codec; the caller must validate before the
    /// item escapes the crate.
    pub(crate) fn hydrate(href: String, metadata: Metadata) -> Self {
        Self { href, metadata }
    }

    pub fn href(&self) -> &str {
        &self.href
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

    pub fn content_type(&self) -> Option<&str> {
        self.metadata.first_value(IS_CONTENT_TYPE)
    }

    pub fn validate(&self) -> std::result::Result<(), ItemViolation> {
        validate_item_parts(&self.href, &self.metadata)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Item: Href:{}  Relations: ", self.href)?;
        for relation in &self.metadata {
            write!(f, " | {}={}", relation.rel, relation.val)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::relation::CATALOGUE_CONTENT_TYPE;

    #[test]
    fn new_item_carries_mandatory_relations() {
        let mut item = Item::new(
            "testResource",
            "resource description",
            CATALOGUE_CONTENT_TYPE,
        )
        .unwrap();
        item.add_relation(Relation::new("rel1", "val1"));
        item.add_relation(Relation::new("rel2", "val2"));

        assert_eq!(item.href(), "testResource");
        assert_eq!(item.description(), Some("resource description"));
        assert_eq!(item.content_type(), Some(CATALOGUE_CONTENT_TYPE));
        assert_eq!(item.metadata().len(), 4);
    }

    #[test]
    fn find_all_relations_in_insertion_order() {
        let mut item = Item::new("h", "d", "text/plain").unwrap();
        for val in ["A", "B", "C"] {
            item.add_relation(Relation::new("urn:X-tsbiot:rels:1", val));
        }
        let found: Vec<String> = item
            .find_all_relations("urn:X-tsbiot:rels:1")
            .iter()
            .map(|relation| relation.to_string())
            .collect();
        assert_eq!(
            found,
            [
                "rel=urn:X-tsbiot:rels:1 val=A",
                "rel=urn:X-tsbiot:rels:1 val=B",
                "rel=urn:X-tsbiot:rels:1 val=C",
            ]
        );
        assert!(item.find_all_relations("urn:X-tsbiot:rels:2").is_empty());
    }

    #[test]
    fn remove_relation_by_value() {
        let mut item = Item::new("h", "d", "text/plain").unwrap();
        item.add_relation(Relation::new("x", "1"));
        item.remove_relation(&Relation::new("x", "1"));
        assert!(item.find_first_relation("x").is_none());
        item.remove_relation(&Relation::new("x", "1"));
        assert_eq!(item.metadata().len(), 2);
    }

    #[test]
    fn invalid_fields_are_rejected() {
        let err = Item::new("", "d", "text/plain").unwrap_err();
        assert!(matches!(
            err,
            HypercatError::InvalidItem(ItemViolation::NoHref)
        ));

        let err = Item::new("h", "", "text/plain").unwrap_err();
        assert!(matches!(
            err,
            HypercatError::InvalidItem(ItemViolation::EmptyDescriptionValue)
        ));

        let err = Item::new("h", "d", "").unwrap_err();
        assert!(matches!(
            err,
            HypercatError::InvalidItem(ItemViolation::EmptyContentTypeValue)
        ));
    }

    #[test]
    fn display_lists_relations() {
        let item = Item::new("h", "d", "text/plain").unwrap();
        assert_eq!(
            item.to_string(),
            format!("Item: Href:h  Relations:  | {HAS_DESCRIPTION}=d | {IS_CONTENT_TYPE}=text/plain")
        );
    }
}
