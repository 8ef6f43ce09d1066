//! Hypercat catalogue model.
//!
//! A `Catalogue` carries its own descriptive metadata plus a keyed set of
//! `Item`s; both annotate themselves with ordered `(rel, val)` relations. The
//! codec in `crate::codec` maps these types to and from the JSON wire format,
//! and `crate::search` evaluates queries over a catalogue's items.

pub mod catalogue;
pub mod item;
pub mod relation;

pub use catalogue::{Catalogue, ITEM_EXISTS, Insertion};
pub use item::Item;
pub use relation::{CATALOGUE_CONTENT_TYPE, HAS_DESCRIPTION, IS_CONTENT_TYPE, Metadata, Relation};
