use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Mandatory description relation for both catalogues and items.
pub const HAS_DESCRIPTION: &str = "urn:X-tsbiot:rels:hasDescription:en";

/// Mandatory content-type relation for items.
pub const IS_CONTENT_TYPE: &str = "urn:X-tsbiot:rels:isContentType";

/// Content type stamped on items that stand in for a nested catalogue.
pub const CATALOGUE_CONTENT_TYPE: &str = "application/vnd.tsbiot.catalogue+json";

/// A single `(rel, val)` metadata pair.
///
/// `rel` names the predicate (usually a URN) and `val` is its object. No
/// validation happens at this level; the mandatory-metadata contract is
/// enforced by the owning `Item` or `Catalogue`.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct Relation {
    pub rel: String,
    pub val: String,
}

impl Relation {
    pub fn new(rel: impl Into<String>, val: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            val: val.into(),
        }
    }

    pub fn rel(&self) -> &str {
        &self.rel
    }

    pub fn set_rel(&mut self, rel: impl Into<String>) {
        self.rel = rel.into();
    }

    pub fn val(&self) -> &str {
        &self.val
    }

    pub fn set_val(&mut self, val: impl Into<String>) {
        self.val = val.into();
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rel={} val={}", self.rel, self.val)
    }
}

// Hand-written so a metadata object that repeats `rel` or `val` keeps the
// first occurrence; derived impls reject duplicates outright.
impl<'de> Deserialize<'de> for Relation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RelationVisitor)
    }
}

struct RelationVisitor;

impl<'de> Visitor<'de> for RelationVisitor {
    type Value = Relation;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a metadata object with string `rel` and `val` fields")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut rel: Option<String> = None;
        let mut val: Option<String> = None;
        while let Some(key) = map.next_key::<String>()? {
            let slot = match key.as_str() {
                "rel" => &mut rel,
                "val" => &mut val,
                _ => {
                    map.next_value::<IgnoredAny>()?;
                    continue;
                }
            };
            if slot.is_some() {
                map.next_value::<IgnoredAny>()?;
            } else {
                *slot = Some(map.next_value()?);
            }
        }
        Ok(Relation {
            rel: rel.ok_or_else(|| de::Error::missing_field("rel"))?,
            val: val.ok_or_else(|| de::Error::missing_field("val"))?,
        })
    }
}

/// Ordered relation sequence owned by an item or a catalogue.
///
/// Duplicates (same `rel`, same `val`, or both) are allowed and preserved in
/// insertion order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(Vec<Relation>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the end of the sequence.
    pub fn add(&mut self, relation: Relation) {
        self.0.push(relation);
    }

    /// Remove the first relation equal to `relation`; no-op when absent.
    ///
    /// Returns whether anything was removed.
    pub fn remove(&mut self, relation: &Relation) -> bool {
        match self.0.iter().position(|candidate| candidate == relation) {
            Some(idx) => {
                self.0.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn find_first(&self, rel: &str) -> Option<&Relation> {
        self.0.iter().find(|relation| relation.rel == rel)
    }

    /// Every relation whose `rel` matches, in original order.
    pub fn find_all(&self, rel: &str) -> Vec<&Relation> {
        self.0.iter().filter(|relation| relation.rel == rel).collect()
    }

    /// Value of the first relation labelled `rel`.
    pub fn first_value(&self, rel: &str) -> Option<&str> {
        self.find_first(rel).map(Relation::val)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Relation] {
        &self.0
    }
}

impl From<Vec<Relation>> for Metadata {
    fn from(relations: Vec<Relation>) -> Self {
        Self(relations)
    }
}

impl FromIterator<Relation> for Metadata {
    fn from_iter<I: IntoIterator<Item = Relation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Metadata {
    type Item = &'a Relation;
    type IntoIter = std::slice::Iter<'a, Relation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_replace_fields() {
        let mut relation = Relation::new("urn:X-tsbiot:rels:1", "A");
        relation.set_rel("urn:X-tsbiot:rels:2");
        relation.set_val("B");
        assert_eq!(relation.rel(), "urn:X-tsbiot:rels:2");
        assert_eq!(relation.val(), "B");
        assert_eq!(relation.to_string(), "rel=urn:X-tsbiot:rels:2 val=B");
    }

    #[test]
    fn find_all_keeps_order_and_duplicates() {
        let mut metadata = Metadata::new();
        metadata.add(Relation::new("urn:X-tsbiot:rels:1", "A"));
        metadata.add(Relation::new("other", "x"));
        metadata.add(Relation::new("urn:X-tsbiot:rels:1", "B"));
        metadata.add(Relation::new("urn:X-tsbiot:rels:1", "B"));

        let vals: Vec<&str> = metadata
            .find_all("urn:X-tsbiot:rels:1")
            .into_iter()
            .map(Relation::val)
            .collect();
        assert_eq!(vals, ["A", "B", "B"]);
        assert!(metadata.find_all("missing").is_empty());
        assert!(metadata.find_first("missing").is_none());
    }

    #[test]
    fn remove_drops_only_first_equal_relation() {
        let dup = Relation::new("rel", "val");
        let mut metadata: Metadata = vec![dup.clone(), Relation::new("keep", "me"), dup.clone()]
            .into_iter()
            .collect();

        assert!(metadata.remove(&dup));
        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata.as_slice()[0].rel, "keep");
        assert_eq!(metadata.as_slice()[1], dup);

        assert!(!metadata.remove(&Relation::new("absent", "x")));
        assert_eq!(metadata.len(), 2);
    }

    #[test]
    fn deserialize_keeps_first_duplicate_key() {
        let parsed: Relation =
            serde_json::from_str(r#"{"rel":"first","val":"1","rel":"second","extra":true}"#)
                .unwrap();
        assert_eq!(parsed, Relation::new("first", "1"));
    }

    #[test]
    fn deserialize_requires_rel_and_val() {
        let err = serde_json::from_str::<Relation>(r#"{"rel":"only"}"#).unwrap_err();
        assert!(err.to_string().contains("missing field `val`"));
    }

    #[test]
    fn metadata_serializes_as_plain_array() {
        let metadata: Metadata = vec![Relation::new("a", "b")].into();
        let json = serde_json::to_string(&metadata).unwrap();
        assert_eq!(json, r#"[{"rel":"a","val":"b"}]"#);
    }
}
