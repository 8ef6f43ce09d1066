//! Flat `key=value` search over a catalogue's items.
//!
//! Queries are `&`-separated pairs split on the first `=`. Only `href`, `rel`
//! and `val` are recognized. Values are taken verbatim: no percent-decoding,
//! and a value cannot contain `&`. There is no OR; `rel` and `val` together
//! select the items matching both.

use crate::catalog::{Catalogue, Item};
use std::collections::BTreeSet;

/// Prefix of the description relation carried by every result catalogue.
pub const RESULTS_DESCRIPTION_PREFIX: &str = "Search results for querystring: ";

/// Recognized query terms. An empty value counts as absent.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Query {
    pub href: Option<String>,
    pub rel: Option<String>,
    pub val: Option<String>,
}

impl Query {
    /// Parse a raw query string; unknown keys and pairs without `=` are
    /// ignored, and a repeated key keeps its last value.
    pub fn parse(query: &str) -> Self {
        let mut parsed = Query::default();
        for pair in query.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let slot = match key {
                "href" => &mut parsed.href,
                "rel" => &mut parsed.rel,
                "val" => &mut parsed.val,
                _ => continue,
            };
            *slot = (!value.is_empty()).then(|| value.to_string());
        }
        parsed
    }

    fn matches_rel(&self, item: &Item) -> bool {
        self.rel
            .as_deref()
            .is_some_and(|rel| item.metadata().iter().any(|relation| relation.rel == rel))
    }

    fn matches_val(&self, item: &Item) -> bool {
        self.val
            .as_deref()
            .is_some_and(|val| item.metadata().iter().any(|relation| relation.val == val))
    }
}

/// Run `query` against `catalogue`, returning a new result catalogue.
///
/// The source is only read. Matched items are copied into the result under
/// their source keys, in source order. An `href` hit returns that item alone;
/// an `href` miss is answered from the `rel`/`val` terms, if any.
pub fn search(catalogue: &Catalogue, query: &str) -> Catalogue {
    let parsed = Query::parse(query);
    let mut results = Catalogue::described(format!("{RESULTS_DESCRIPTION_PREFIX}{query}"));
    tracing::debug!(query, ?parsed, "searching catalogue");

    // Hrefs are unique in a well-formed catalogue; stop at the first hit. A
    // miss falls through to the rel/val terms.
    if let Some(href) = parsed.href.as_deref() {
        if let Some((key, item)) = catalogue.items().find(|(_, item)| item.href() == href) {
            let _ = results.add_item(item.clone(), key);
            return results;
        }
    }

    let mut rel_matches = BTreeSet::new();
    let mut val_matches = Vec::new();
    for (key, item) in catalogue.items() {
        if parsed.matches_rel(item) {
            rel_matches.insert(key);
        }
        if parsed.matches_val(item) {
            val_matches.push((key, item));
        }
    }

    let selected: Vec<(&str, &Item)> = match (parsed.rel.is_some(), parsed.val.is_some()) {
        (true, false) => catalogue
            .items()
            .filter(|(key, _)| rel_matches.contains(key))
            .collect(),
        (false, true) => val_matches,
        (true, true) => val_matches
            .into_iter()
            .filter(|(key, _)| rel_matches.contains(key))
            .collect(),
        (false, false) => Vec::new(),
    };
    for (key, item) in selected {
        let _ = results.add_item(item.clone(), key);
    }
    tracing::debug!(matches = results.item_count(), "search complete");
    results
}

impl Catalogue {
    /// See [`search`].
    pub fn search(&self, query: &str) -> Catalogue {
        search(self, query)
    }
}
