//! Embedded JSON Schemas for the Hypercat wire format.
//!
//! When typed extraction of a document fails, the codec checks it against one
//! of these, so a document with a missing or ill-typed field is rejected with
//! the full list of violations rather than the first one serde happens to trip
//! over. Schemas live under `schema/` and are compiled once on
//! first use.

use crate::error::{HypercatError, Result};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::sync::OnceLock;

const CATALOGUE_SCHEMA: &str = include_str!("../schema/hypercat_catalogue.schema.json");
const ITEM_SCHEMA: &str = include_str!("../schema/hypercat_item.schema.json");

/// Which wire document a payload claims to be.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WireSchema {
    Catalogue,
    Item,
}

impl WireSchema {
    pub fn label(&self) -> &'static str {
        match self {
            WireSchema::Catalogue => "catalogue",
            WireSchema::Item => "item",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            WireSchema::Catalogue => CATALOGUE_SCHEMA,
            WireSchema::Item => ITEM_SCHEMA,
        }
    }

    fn compiled(&self) -> &'static std::result::Result<JSONSchema, String> {
        static CATALOGUE: OnceLock<std::result::Result<JSONSchema, String>> = OnceLock::new();
        static ITEM: OnceLock<std::result::Result<JSONSchema, String>> = OnceLock::new();
        let cell = match self {
            WireSchema::Catalogue => &CATALOGUE,
            WireSchema::Item => &ITEM,
        };
        cell.get_or_init(|| compile_schema(self.label(), self.source()))
    }

    /// Check `document` against this schema.
    ///
    /// Every violation is reported, one per line, inside a single
    /// `HypercatError::Parse`.
    pub fn check(&self, document: &Value) -> Result<()> {
        let schema = self
            .compiled()
            .as_ref()
            .map_err(|message| HypercatError::Parse(message.clone()))?;
        if let Err(errors) = schema.validate(document) {
            let details = errors
                .map(|err| err.to_string())
                .collect::<Vec<_>>()
                .join("\n");
            return Err(HypercatError::Parse(format!(
                "document failed {} schema validation:\n{}",
                self.label(),
                details
            )));
        }
        Ok(())
    }
}

fn compile_schema(label: &str, source: &str) -> std::result::Result<JSONSchema, String> {
    let raw: Value = serde_json::from_str(source)
        .map_err(|err| format!("parsing embedded {label} schema: {err}"))?;
    JSONSchema::compile(&raw).map_err(|err| format!("compiling embedded {label} schema: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn embedded_schemas_compile() {
        assert!(WireSchema::Catalogue.compiled().is_ok());
        assert!(WireSchema::Item.compiled().is_ok());
    }

    #[test]
    fn catalogue_accepts_array_or_keyed_items() {
        let item = json!({
            "href": "http://A",
            "i-object-metadata": [{"rel": "r", "val": "v"}]
        });
        let as_array = json!({"item-metadata": [], "items": [item.clone()]});
        let as_map = json!({"item-metadata": [], "items": {"http://A": item}});
        assert!(WireSchema::Catalogue.check(&as_array).is_ok());
        assert!(WireSchema::Catalogue.check(&as_map).is_ok());
    }

    #[test]
    fn catalogue_reports_every_violation() {
        let doc = json!({"item-metadata": [{"rel": 1}]});
        let err = WireSchema::Catalogue.check(&doc).unwrap_err();
        let HypercatError::Parse(message) = err else {
            panic!("expected parse error, got {err:?}");
        };
        assert!(message.contains("items"), "{message}");
        assert!(message.lines().count() >= 3, "{message}");
    }

    #[test]
    fn item_requires_href_and_metadata() {
        assert!(WireSchema::Item.check(&json!({"href": "h"})).is_err());
        assert!(
            WireSchema::Item
                .check(&json!({"href": "h", "i-object-metadata": []}))
                .is_ok()
        );
        assert!(
            WireSchema::Item
                .check(&json!({"href": 3, "i-object-metadata": []}))
                .is_err()
        );
    }
}
