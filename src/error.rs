use crate::metadata_validation::{CatalogueViolation, ItemViolation};
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the catalogue model, codec, and file loaders.
///
/// Construction is all-or-nothing: whenever one of these is returned, no
/// partially built `Catalogue` or `Item` is visible to the caller.
#[derive(Error, Debug)]
pub enum HypercatError {
    /// Malformed JSON, or a well-formed document missing a required field.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid catalogue: {0}")]
    InvalidCatalogue(CatalogueViolation),

    #[error("invalid item: {0}")]
    InvalidItem(ItemViolation),

    #[error("unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HypercatError>;
