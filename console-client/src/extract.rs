//! Payload extraction for backend responses
//!
//! Endpoints answer with a bare payload or with the payload nested under a
//! conventional field. List responses are tried in [`EXTRACTION_STRATEGIES`]
//! order, where the first strategy that yields an array wins. Single-object
//! responses are tried in [`PAYLOAD_STRATEGIES`] order, where the first object
//! carrying one of the expected fields wins.

use serde_json::Value;
use shared::Resource;

/// One way of locating the array inside a list response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// The body itself is the array
    Bare,
    /// The array sits under a fixed field
    Field(&'static str),
    /// The array sits under the resource's own collection key
    ResourceKey,
    /// The array sits two levels down
    Nested(&'static str, &'static str),
}

/// Fixed order in which list shapes are recognized
pub const EXTRACTION_STRATEGIES: &[Extraction] = &[
    Extraction::Bare,
    Extraction::Field("items"),
    Extraction::Field("data"),
    Extraction::ResourceKey,
    Extraction::Nested("data", "items"),
];

/// Fixed order in which single-object envelopes are unwrapped
pub const PAYLOAD_STRATEGIES: &[Extraction] = &[
    Extraction::Bare,
    Extraction::Field("data"),
    Extraction::Nested("data", "user"),
    Extraction::Field("user"),
];

impl Extraction {
    fn locate<'a>(&self, body: &'a Value, resource_key: Option<&str>) -> Option<&'a Value> {
        match self {
            Extraction::Bare => Some(body),
            Extraction::Field(field) => body.get(field),
            Extraction::ResourceKey => body.get(resource_key?),
            Extraction::Nested(outer, inner) => body.get(outer)?.get(inner),
        }
    }
}

/// Items of a list response for `resource`; empty when no shape matches
pub fn extract_collection(body: &Value, resource: Resource) -> Vec<Value> {
    extract_with_key(body, Some(resource.collection_key()))
}

/// Items of a list response, with an optional resource-named key
pub fn extract_with_key(body: &Value, resource_key: Option<&str>) -> Vec<Value> {
    EXTRACTION_STRATEGIES
        .iter()
        .find_map(|strategy| strategy.locate(body, resource_key)?.as_array())
        .cloned()
        .unwrap_or_default()
}

/// The object inside a single-object response that carries any of `fields`
///
/// Falls back to the body itself so callers still see the backend's own
/// shape when nothing matches.
pub fn extract_payload<'a>(body: &'a Value, fields: &[&str]) -> &'a Value {
    PAYLOAD_STRATEGIES
        .iter()
        .filter_map(|strategy| strategy.locate(body, None))
        .find(|candidate| {
            candidate
                .as_object()
                .is_some_and(|object| fields.iter().any(|field| object.contains_key(*field)))
        })
        .unwrap_or(body)
}

/// Total count reported alongside a list, falling back to the item count
pub fn extract_total(body: &Value, items: usize) -> u64 {
    ["total", "count", "totalCount"]
        .iter()
        .find_map(|key| {
            body.get(key)
                .or_else(|| body.get("pagination").and_then(|p| p.get(key)))
                .and_then(Value::as_u64)
        })
        .unwrap_or(items as u64)
}
