//! Identifier resolution for `GET /api/gifts/:id`.
//!
//! The gifts collection mixes identifier styles: legacy string ids, numeric ids, and
//! store-generated object ids. A single path parameter is resolved by trying, in order:
//!
//! 1. exact match on the string `id` field,
//! 2. numeric match on `id` if the input is a base-10 integer,
//! 3. match on `_id` if the input is a valid object id (24 hex chars).
//!
//! The first tier that finds a document wins; later tiers are never queried.
//!
//! The numeric tier only accepts a whole base-10 integer. A lenient prefix parse
//! would read `"12abc"` as 12; here it is not numeric, so only the string tier
//! applies and an unmatched `"12abc"` is a 404.

use bson::oid::ObjectId;
use tracing::debug;

use crate::store::{GiftStore, StoreError};
use crate::types::Gift;

/// A single equality predicate against the gifts collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// `{ id: "<raw>" }`
    StringId(String),
    /// `{ id: <n> }`, matching any numeric representation of `n`.
    NumericId(i64),
    /// `{ _id: ObjectId("<raw>") }`
    NativeId(ObjectId),
}

impl Lookup {
    /// Short label for logs.
    pub fn tier(&self) -> &'static str {
        match self {
            Lookup::StringId(_) => "string_id",
            Lookup::NumericId(_) => "numeric_id",
            Lookup::NativeId(_) => "native_id",
        }
    }
}

/// Builds a lookup predicate from the raw path parameter, or declines.
pub type LookupBuilder = fn(&str) -> Option<Lookup>;

/// Resolution order. Each builder is pure; the resolver short-circuits on the first match.
pub const RESOLUTION_ORDER: [LookupBuilder; 3] = [by_string_id, by_numeric_id, by_native_id];

fn by_string_id(raw: &str) -> Option<Lookup> {
    Some(Lookup::StringId(raw.to_string()))
}

/// Strict base-10 parse: optional sign, digits only, no surrounding whitespace.
fn by_numeric_id(raw: &str) -> Option<Lookup> {
    raw.parse::<i64>().ok().map(Lookup::NumericId)
}

fn by_native_id(raw: &str) -> Option<Lookup> {
    ObjectId::parse_str(raw).ok().map(Lookup::NativeId)
}

/// The predicates a raw identifier expands to, in resolution order.
pub fn lookup_chain(raw: &str) -> Vec<Lookup> {
    RESOLUTION_ORDER.iter().filter_map(|build| build(raw)).collect()
}

/// Resolve a raw identifier against the store.
///
/// Returns `Ok(None)` when no tier matches. A store failure in any tier aborts the chain.
pub async fn resolve_gift(store: &dyn GiftStore, raw: &str) -> Result<Option<Gift>, StoreError> {
    for lookup in lookup_chain(raw) {
        if let Some(gift) = store.find_one(&lookup).await? {
            debug!(id = raw, tier = lookup.tier(), "Resolved gift");
            return Ok(Some(gift));
        }
    }
    debug!(id = raw, "No gift matched any identifier tier");
    Ok(None)
}
