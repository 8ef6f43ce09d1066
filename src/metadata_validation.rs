//! Mandatory-metadata contract for items and catalogues.
//!
//! Every construction path that produces a caller-visible value runs one of
//! these checks exactly once at the end. Checks run in a fixed order and the
//! first failure is reported, so a given invalid value always yields the same
//! reason.

use crate::catalog::relation::{HAS_DESCRIPTION, IS_CONTENT_TYPE, Metadata};
use crate::catalog::{Catalogue, Item};
use std::fmt;

/// Why an item failed validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ItemViolation {
    NoHref,
    MissingDescriptionRelation,
    EmptyDescriptionValue,
    MissingContentTypeRelation,
    EmptyContentTypeValue,
}

/// Why a catalogue failed validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CatalogueViolation {
    NoDescriptionRelation,
    EmptyDescriptionValue,
}

impl ItemViolation {
    /// Stable machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            ItemViolation::NoHref => "no-href",
            ItemViolation::MissingDescriptionRelation => "missing-description-relation",
            ItemViolation::EmptyDescriptionValue => "empty-description-value",
            ItemViolation::MissingContentTypeRelation => "missing-content-type-relation",
            ItemViolation::EmptyContentTypeValue => "empty-content-type-value",
        }
    }
}

impl CatalogueViolation {
    pub fn code(&self) -> &'static str {
        match self {
            CatalogueViolation::NoDescriptionRelation => "no-description-relation",
            CatalogueViolation::EmptyDescriptionValue => "empty-description-value",
        }
    }
}

impl fmt::Display for ItemViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ItemViolation::NoHref => "item has no href".to_string(),
            ItemViolation::MissingDescriptionRelation => {
                format!("item metadata has no {HAS_DESCRIPTION} relation")
            }
            ItemViolation::EmptyDescriptionValue => {
                format!("item {HAS_DESCRIPTION} relation has an empty value")
            }
            ItemViolation::MissingContentTypeRelation => {
                format!("item metadata has no {IS_CONTENT_TYPE} relation")
            }
            ItemViolation::EmptyContentTypeValue => {
                format!("item {IS_CONTENT_TYPE} relation has an empty value")
            }
        };
        write!(f, "{message} ({})", self.code())
    }
}

impl fmt::Display for CatalogueViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            CatalogueViolation::NoDescriptionRelation => {
                format!("catalogue metadata has no {HAS_DESCRIPTION} relation")
            }
            CatalogueViolation::EmptyDescriptionValue => {
                format!("catalogue {HAS_DESCRIPTION} relation has an empty value")
            }
        };
        write!(f, "{message} ({})", self.code())
    }
}

impl std::error::Error for ItemViolation {}

impl std::error::Error for CatalogueViolation {}

/// Check the item contract: href, then description, then content type.
pub fn validate_item(item: &Item) -> Result<(), ItemViolation> {
    validate_item_parts(item.href(), item.metadata())
}

/// Check the catalogue contract: a non-empty description relation.
pub fn validate_catalogue(catalogue: &Catalogue) -> Result<(), CatalogueViolation> {
    validate_catalogue_metadata(catalogue.metadata())
}

pub(crate) fn validate_item_parts(href: &str, metadata: &Metadata) -> Result<(), ItemViolation> {
    if href.is_empty() {
        return Err(ItemViolation::NoHref);
    }
    match relation_state(metadata, HAS_DESCRIPTION) {
        RelationState::Missing => return Err(ItemViolation::MissingDescriptionRelation),
        RelationState::Empty => return Err(ItemViolation::EmptyDescriptionValue),
        RelationState::Present => {}
    }
    match relation_state(metadata, IS_CONTENT_TYPE) {
        RelationState::Missing => Err(ItemViolation::MissingContentTypeRelation),
        RelationState::Empty => Err(ItemViolation::EmptyContentTypeValue),
        RelationState::Present => Ok(()),
    }
}

pub(crate) fn validate_catalogue_metadata(metadata: &Metadata) -> Result<(), CatalogueViolation> {
    match relation_state(metadata, HAS_DESCRIPTION) {
        RelationState::Missing => Err(CatalogueViolation::NoDescriptionRelation),
        RelationState::Empty => Err(CatalogueViolation::EmptyDescriptionValue),
        RelationState::Present => Ok(()),
    }
}

enum RelationState {
    Missing,
    Empty,
    Present,
}

// Any one relation with a non-empty value satisfies the contract.
fn relation_state(metadata: &Metadata, rel: &str) -> RelationState {
    let matches = metadata.find_all(rel);
    if matches.is_empty() {
        RelationState::Missing
    } else if matches.iter().any(|relation| !relation.val.is_empty()) {
        RelationState::Present
    } else {
        RelationState::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::relation::Relation;

    fn metadata(pairs: &[(&str, &str)]) -> Metadata {
        pairs
            .iter()
            .map(|(rel, val)| Relation::new(*rel, *val))
            .collect()
    }

    #[test]
    fn item_checks_run_in_order() {
        // An item that breaks every rule reports the href first.
        assert_eq!(
            validate_item_parts("", &Metadata::new()),
            Err(ItemViolation::NoHref)
        );
        assert_eq!(
            validate_item_parts("h", &metadata(&[(IS_CONTENT_TYPE, "")])),
            Err(ItemViolation::MissingDescriptionRelation)
        );
        assert_eq!(
            validate_item_parts("h", &metadata(&[(HAS_DESCRIPTION, "")])),
            Err(ItemViolation::EmptyDescriptionValue)
        );
        assert_eq!(
            validate_item_parts("h", &metadata(&[(HAS_DESCRIPTION, "d")])),
            Err(ItemViolation::MissingContentTypeRelation)
        );
        assert_eq!(
            validate_item_parts(
                "h",
                &metadata(&[(HAS_DESCRIPTION, "d"), (IS_CONTENT_TYPE, "")])
            ),
            Err(ItemViolation::EmptyContentTypeValue)
        );
        assert_eq!(
            validate_item_parts(
                "h",
                &metadata(&[(IS_CONTENT_TYPE, "text/plain"), (HAS_DESCRIPTION, "d")])
            ),
            Ok(())
        );
    }

    #[test]
    fn any_non_empty_description_satisfies() {
        let meta = metadata(&[(HAS_DESCRIPTION, ""), (HAS_DESCRIPTION, "later")]);
        assert_eq!(validate_catalogue_metadata(&meta), Ok(()));

        let meta = metadata(&[(HAS_DESCRIPTION, ""), (HAS_DESCRIPTION, "")]);
        assert_eq!(
            validate_catalogue_metadata(&meta),
            Err(CatalogueViolation::EmptyDescriptionValue)
        );
    }

    #[test]
    fn catalogue_requires_description() {
        assert_eq!(
            validate_catalogue_metadata(&metadata(&[("urn:X-tsbiot:rels:1", "A")])),
            Err(CatalogueViolation::NoDescriptionRelation)
        );
        assert_eq!(
            validate_catalogue_metadata(&metadata(&[(HAS_DESCRIPTION, "cat")])),
            Ok(())
        );
    }

    #[test]
    fn reasons_have_stable_codes() {
        assert_eq!(ItemViolation::NoHref.code(), "no-href");
        assert_eq!(
            CatalogueViolation::NoDescriptionRelation.code(),
            "no-description-relation"
        );
        assert!(
            ItemViolation::EmptyContentTypeValue
                .to_string()
                .ends_with("(empty-content-type-value)")
        );
    }
}
