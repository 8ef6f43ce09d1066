//! Hypercat catalogue model.
//!
//! A Hypercat is a self-describing directory of resources: the catalogue and
//! each item in it carry ordered `(rel, val)` metadata relations. The crate
//! covers the data model, its JSON wire codec, the mandatory-metadata contract,
//! and a flat query evaluator. Callers typically need four entry points:
//!
//! - [`Catalogue::new`] builds a minimal catalogue from a description;
//! - [`Catalogue::from_json`] (or [`load_catalogue_from_path`]) decodes wire text;
//! - [`Catalogue::to_json`] / [`Catalogue::to_pretty_json`] encode it back;
//! - [`Catalogue::search`] returns a filtered result catalogue.
//!
//! The model is single-threaded and lock-free; callers sharing a catalogue
//! across threads serialize access themselves.

pub mod catalog;
pub mod codec;
pub mod error;
pub mod logging;
pub mod metadata_validation;
pub mod schema_loader;
pub mod search;

pub use catalog::{
    CATALOGUE_CONTENT_TYPE, Catalogue, HAS_DESCRIPTION, IS_CONTENT_TYPE, ITEM_EXISTS, Insertion,
    Item, Metadata, Relation,
};
pub use codec::{
    decode_catalogue, decode_item, encode_catalogue, encode_catalogue_pretty, encode_item,
    encode_item_pretty, load_catalogue_from_path, load_item_from_path,
};
pub use error::{HypercatError, Result};
pub use metadata_validation::{
    CatalogueViolation, ItemViolation, validate_catalogue, validate_item,
};
pub use search::{Query, RESULTS_DESCRIPTION_PREFIX, search};
