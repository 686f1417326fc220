//! Canonical request items.
//!
//! Sales requests arrive with several historical item shapes: a proper
//! `{id: {name, qty}}` mapping, the same mapping JSON-encoded as a string,
//! a legacy flat `product` + `quantity` pair, or a `products` field under
//! either encoding. All shape sniffing lives here; the rest of the crate
//! only ever sees [`RequestItems`].

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single requested line: display name plus approved quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestItem {
    pub name: String,
    pub qty: Decimal,
}

/// Item-id keyed canonical mapping produced by [`RequestItems::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestItems(pub BTreeMap<String, RequestItem>);

/// Raised when no usable items can be discovered in a request. Fatal and
/// non-retryable: the upstream record is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no items found in request")]
pub struct NoItemsFound;

impl RequestItems {
    /// Normalize the heterogeneous item fields of a stored request.
    ///
    /// Fallback order:
    /// 1. `items`, parsed from JSON when it is a string (parse failure is
    ///    treated as absent);
    /// 2. a synthesized single-entry mapping from the legacy flat
    ///    `product` + `quantity` pair;
    /// 3. `products`, under the same string-or-object handling;
    /// 4. otherwise the request has no items and normalization fails.
    pub fn normalize(
        items: Option<&Value>,
        product: Option<&str>,
        quantity: Option<&Value>,
        products: Option<&Value>,
    ) -> Result<Self, NoItemsFound> {
        let mut mapping = items.and_then(as_object_map);

        if mapping.as_ref().map_or(true, Map::is_empty) {
            if let (Some(product), Some(quantity)) = (product, quantity) {
                if !product.trim().is_empty() {
                    let mut synthesized = Map::new();
                    synthesized.insert(
                        product.to_string(),
                        serde_json::json!({
                            "name": product,
                            "qty": coerce_quantity(quantity).to_string(),
                        }),
                    );
                    mapping = Some(synthesized);
                }
            }
        }

        if mapping.as_ref().map_or(true, Map::is_empty) {
            mapping = products.and_then(as_object_map);
        }

        let mapping = mapping.filter(|m| !m.is_empty()).ok_or(NoItemsFound)?;

        let canonical = mapping
            .into_iter()
            .map(|(id, value)| {
                let item = canonical_item(&id, &value);
                (id, item)
            })
            .collect();

        Ok(RequestItems(canonical))
    }

    /// Sum of item quantities. Always finite: unusable quantity fields
    /// were already coerced to zero during normalization.
    pub fn total_quantity(&self) -> Decimal {
        self.0.values().map(|item| item.qty).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn from_json(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

/// Accept an object directly, or parse a JSON-encoded object out of a
/// string. Anything else (including a string that fails to parse) is
/// treated as absent.
fn as_object_map(value: &Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map.clone()),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        },
        _ => None,
    }
}

fn canonical_item(id: &str, value: &Value) -> RequestItem {
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(id)
        .to_string();

    // `qty` wins over `quantity`; a bare numeric value is its own quantity.
    let qty = value
        .get("qty")
        .or_else(|| value.get("quantity"))
        .map(coerce_quantity)
        .unwrap_or_else(|| match value {
            Value::Number(_) | Value::String(_) => coerce_quantity(value),
            _ => Decimal::ZERO,
        });

    RequestItem { name, qty }
}

/// Numeric coercion for quantity fields. Strings parse numerically,
/// numbers convert exactly where possible, everything else is zero.
fn coerce_quantity(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Decimal::from(i)
            } else {
                n.as_f64()
                    .and_then(Decimal::from_f64_retain)
                    .unwrap_or(Decimal::ZERO)
            }
        }
        Value::String(s) => s.trim().parse::<Decimal>().unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}
