//! JSON wire codec for catalogues and items.
//!
//! Encoding writes `item-metadata` before `items`, and `items` as an object
//! keyed by href in insertion order. Decoding accepts `items` either as the
//! wire-format array of item objects or as that keyed object, so encoded
//! output always decodes back to an equivalent catalogue.
//!
//! Decoding is strict about shape: when typed extraction fails, the document
//! is checked against its schema (see `crate::schema_loader`) so the error
//! lists every violation. The mandatory-metadata checks run once per hydrated
//! value; nothing is returned unless every check passes.

use crate::catalog::{Catalogue, Item, Metadata};
use crate::error::{HypercatError, Result};
use crate::schema_loader::WireSchema;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Serialize)]
struct CatalogueOut<'a> {
    #[serde(rename = "item-metadata")]
    item_metadata: &'a Metadata,
    items: ItemsOut<'a>,
}

struct ItemsOut<'a>(&'a Catalogue);

#[derive(Serialize)]
struct ItemOut<'a> {
    href: &'a str,
    #[serde(rename = "i-object-metadata")]
    metadata: &'a Metadata,
}

impl<'a> From<&'a Item> for ItemOut<'a> {
    fn from(item: &'a Item) -> Self {
        Self {
            href: item.href(),
            metadata: item.metadata(),
        }
    }
}

impl Serialize for ItemsOut<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.item_count()))?;
        for (key, item) in self.0.items() {
            map.serialize_entry(key, &ItemOut::from(item))?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
struct CatalogueIn {
    #[serde(rename = "item-metadata")]
    item_metadata: Metadata,
    items: ItemsIn,
}

#[derive(Deserialize)]
struct ItemIn {
    href: String,
    #[serde(rename = "i-object-metadata")]
    metadata: Metadata,
}

/// `(key, item)` pairs in document order.
struct ItemsIn(Vec<(String, ItemIn)>);

impl<'de> Deserialize<'de> for ItemsIn {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ItemsVisitor)
    }
}

struct ItemsVisitor;

impl<'de> Visitor<'de> for ItemsVisitor {
    type Value = ItemsIn;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of items or an object of items keyed by href")
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<ItemIn>()? {
            items.push((item.href.clone(), item));
        }
        Ok(ItemsIn(items))
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut items = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, item)) = map.next_entry::<String, ItemIn>()? {
            if key.is_empty() {
                return Err(de::Error::custom("item key must not be empty"));
            }
            items.push((key, item));
        }
        Ok(ItemsIn(items))
    }
}

/// Read typed wire fields straight from `text`.
///
/// Relation objects keep the first of any repeated key, which a parsed `Value`
/// has already discarded, so the schema is only consulted to explain a
/// failure.
fn read_wire<'de, T: Deserialize<'de>>(text: &'de str, schema: WireSchema) -> Result<T> {
    serde_json::from_str(text).map_err(|err| explain_failure(text, schema, err))
}

fn explain_failure(text: &str, schema: WireSchema, err: serde_json::Error) -> HypercatError {
    let Ok(document) = serde_json::from_str::<Value>(text) else {
        return HypercatError::Parse(format!("malformed {} JSON: {err}", schema.label()));
    };
    match schema.check(&document) {
        Err(violations) => violations,
        Ok(()) => HypercatError::Parse(format!("unable to read {} fields: {err}", schema.label())),
    }
}

/// Decode a wire-format catalogue.
///
/// Each item is validated as it is hydrated; the catalogue itself is
/// validated last. When two entries share a key, the first one is kept.
pub fn decode_catalogue(text: &str) -> Result<Catalogue> {
    tracing::debug!(bytes = text.len(), "decoding catalogue");
    let wire: CatalogueIn = read_wire(text, WireSchema::Catalogue)?;

    let mut catalogue = Catalogue::hydrate(wire.item_metadata);
    for (key, doc) in wire.items.0 {
        let item = Item::hydrate(doc.href, doc.metadata);
        item.validate().map_err(HypercatError::InvalidItem)?;
        if !catalogue.add_item(item, &key).is_added() {
            tracing::warn!(
                href = %key,
                "duplicate item key in catalogue document; entry skipped"
            );
        }
    }
    catalogue
        .validate()
        .map_err(HypercatError::InvalidCatalogue)?;
    tracing::debug!(items = catalogue.item_count(), "decoded catalogue");
    Ok(catalogue)
}

/// Decode a standalone wire-format item.
pub fn decode_item(text: &str) -> Result<Item> {
    let wire: ItemIn = read_wire(text, WireSchema::Item)?;
    let item = Item::hydrate(wire.href, wire.metadata);
    item.validate().map_err(HypercatError::InvalidItem)?;
    Ok(item)
}

pub fn encode_catalogue(catalogue: &Catalogue) -> Result<String> {
    Ok(serde_json::to_string(&catalogue_out(catalogue))?)
}

pub fn encode_catalogue_pretty(catalogue: &Catalogue) -> Result<String> {
    Ok(serde_json::to_string_pretty(&catalogue_out(catalogue))?)
}

pub fn encode_item(item: &Item) -> Result<String> {
    Ok(serde_json::to_string(&ItemOut::from(item))?)
}

pub fn encode_item_pretty(item: &Item) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ItemOut::from(item))?)
}

fn catalogue_out(catalogue: &Catalogue) -> CatalogueOut<'_> {
    CatalogueOut {
        item_metadata: catalogue.metadata(),
        items: ItemsOut(catalogue),
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| HypercatError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a file and decode its contents as a catalogue.
pub fn load_catalogue_from_path(path: &Path) -> Result<Catalogue> {
    decode_catalogue(&read_text(path)?)
}

/// Read a file and decode its contents as a single item.
pub fn load_item_from_path(path: &Path) -> Result<Item> {
    decode_item(&read_text(path)?)
}

impl Catalogue {
    pub fn from_json(text: &str) -> Result<Self> {
        decode_catalogue(text)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        load_catalogue_from_path(path)
    }

    pub fn to_json(&self) -> Result<String> {
        encode_catalogue(self)
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        encode_catalogue_pretty(self)
    }
}

impl Item {
    pub fn from_json(text: &str) -> Result<Self> {
        decode_item(text)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        load_item_from_path(path)
    }

    pub fn to_json(&self) -> Result<String> {
        encode_item(self)
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        encode_item_pretty(self)
    }
}
