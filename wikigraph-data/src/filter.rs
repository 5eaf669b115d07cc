//! Selecting items from a dump by the value of one property.

use log::debug;
use wikigraph_core::{ClaimSource, Entity, Item};

use crate::dump::{DumpError, JsonDump};

/// Match items whose claims for one property point at a given entity.
///
/// # Examples
/// ```
/// use wikigraph_data::filter::ItemFilter;
///
/// // Politicians: occupation (P106) is politician (Q82955).
/// let filter = ItemFilter::new("P106", "Q82955").with_scan_limit(10_000);
/// assert!(filter.truthy);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFilter {
    /// Property whose claims are inspected, e.g. `P106`.
    pub property_id: String,
    /// Entity id the claims must point at, e.g. `Q82955`.
    pub value_id: String,
    /// Inspect only truthy claims. Defaults to `true`.
    pub truthy: bool,
    /// Stop after this many entities have been read.
    pub scan_limit: Option<usize>,
}

impl ItemFilter {
    /// Match truthy `property_id` claims pointing at `value_id`.
    #[must_use]
    pub fn new(property_id: impl Into<String>, value_id: impl Into<String>) -> Self {
        Self {
            property_id: property_id.into(),
            value_id: value_id.into(),
            truthy: true,
            scan_limit: None,
        }
    }

    /// Choose between truthy claims and every claim.
    #[must_use]
    pub const fn with_truthy(mut self, truthy: bool) -> Self {
        self.truthy = truthy;
        self
    }

    /// Read at most `limit` entities from the dump.
    #[must_use]
    pub const fn with_scan_limit(mut self, limit: usize) -> Self {
        self.scan_limit = Some(limit);
        self
    }

    /// Whether `item` matches.
    ///
    /// # Errors
    ///
    /// Returns [`wikigraph_core::SchemaError`] when a claim for the property
    /// fails to decode.
    pub fn matches(&self, item: &Item) -> Result<bool, wikigraph_core::SchemaError> {
        let group = if self.truthy {
            item.truthy_claim_group(&self.property_id)?
        } else {
            item.claim_group(&self.property_id)?
        };
        Ok(group.references_entity(&self.value_id))
    }
}

/// Stream `dump` and collect the items accepted by `filter`.
///
/// Properties and lexemes are skipped.
///
/// # Errors
///
/// Returns any [`DumpError`] raised while reading the dump, and
/// [`DumpError::Decode`] when a claim of a scanned item is malformed.
pub fn select_items(dump: &JsonDump, filter: &ItemFilter) -> Result<Vec<Item>, DumpError> {
    let limit = filter.scan_limit.unwrap_or(usize::MAX);
    let mut selected = Vec::new();
    let mut values = dump.values()?;
    let mut scanned = 0usize;
    while scanned < limit {
        let Some((line, value)) = values.next_numbered().transpose()? else {
            break;
        };
        scanned += 1;
        let entity = Entity::decode(value).map_err(|source| decode_error(dump, line, source))?;
        let Entity::Item(item) = entity else {
            continue;
        };
        if filter
            .matches(&item)
            .map_err(|source| decode_error(dump, line, source))?
        {
            selected.push(item);
        }
    }
    debug!(
        "selected {} of {scanned} entities from {}",
        selected.len(),
        dump.path()
    );
    Ok(selected)
}

fn decode_error(dump: &JsonDump, line: usize, source: wikigraph_core::SchemaError) -> DumpError {
    DumpError::Decode {
        path: dump.path().to_owned(),
        line,
        source,
    }
}
