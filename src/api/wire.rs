/// Catalog API response shapes
///
/// The server is loose about its payloads: nested envelopes can be
/// missing, references are sometimes populated objects and sometimes bare
/// ids, and arrays can be null. Everything is parsed here with defaults so
/// the rest of the app only ever sees complete `state::data` records.
/// A record that cannot be read at all is skipped, never fatal.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::state::data::{AttributeRef, FilterOption, Product, Variant, VariantKind};

/// Treat `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A reference that may or may not have been populated by the server
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireRef {
    Populated {
        #[serde(rename = "_id", default, deserialize_with = "null_as_default")]
        id: String,
        #[serde(default, deserialize_with = "null_as_default")]
        name: String,
    },
    Id(String),
}

impl WireRef {
    fn into_attribute(self) -> AttributeRef {
        match self {
            WireRef::Populated { id, name } => AttributeRef { id, name },
            WireRef::Id(id) => AttributeRef {
                id,
                name: String::new(),
            },
        }
    }

    /// Variant names arrive either as `{ name }` or as plain text
    fn into_name(self) -> String {
        match self {
            WireRef::Populated { name, .. } => name,
            WireRef::Id(name) => name,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireProduct {
    #[serde(rename = "_id", deserialize_with = "null_as_default")]
    id: String,
    #[serde(deserialize_with = "null_as_default")]
    name: String,
    #[serde(deserialize_with = "null_as_default")]
    images: Vec<String>,
    topmaterial: Option<WireRef>,
    legmaterial: Option<WireRef>,
    topfinish: Option<WireRef>,
}

impl From<WireProduct> for Product {
    fn from(wire: WireProduct) -> Self {
        Product {
            id: wire.id,
            name: wire.name,
            images: wire.images,
            top_material: wire.topmaterial.map(WireRef::into_attribute),
            leg_material: wire.legmaterial.map(WireRef::into_attribute),
            top_finish: wire.topfinish.map(WireRef::into_attribute),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireVariant {
    #[serde(rename = "_id", deserialize_with = "null_as_default")]
    id: String,
    name: Option<WireRef>,
    #[serde(deserialize_with = "null_as_default")]
    images: Vec<String>,
}

impl From<WireVariant> for Variant {
    fn from(wire: WireVariant) -> Self {
        Variant {
            id: wire.id,
            name: wire.name.map(WireRef::into_name).unwrap_or_default(),
            images: wire.images,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireOption {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
}

/// Outer and inner envelope keys for a variant lookup,
/// e.g. `{ "edge": { "edges": [...] } }`
pub fn envelope_keys(kind: VariantKind) -> (&'static str, &'static str) {
    match kind {
        VariantKind::Top => ("top", "tops"),
        VariantKind::Edge => ("edge", "edges"),
        VariantKind::Finish => ("finish", "finishes"),
    }
}

/// Deserialize each array element on its own, skipping unreadable ones
fn parse_each<W, T>(items: Option<&Value>, what: &str) -> Vec<T>
where
    W: for<'de> Deserialize<'de>,
    T: From<W>,
{
    let Some(Value::Array(items)) = items else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match W::deserialize(item) {
            Ok(wire) => Some(T::from(wire)),
            Err(e) => {
                log::warn!("Skipping unreadable {what}: {e}");
                None
            }
        })
        .collect()
}

/// `{ products: [...] }` from the filter endpoint
pub fn products_from(body: &Value) -> Vec<Product> {
    parse_each::<WireProduct, Product>(body.get("products"), "product")
}

/// A single product from the detail endpoint.
/// Returns `None` unless the body is a JSON object.
pub fn product_from(body: &Value) -> Option<Product> {
    if !body.is_object() {
        return None;
    }
    match WireProduct::deserialize(body) {
        Ok(wire) => Some(wire.into()),
        Err(e) => {
            log::warn!("Unreadable product body: {e}");
            None
        }
    }
}

/// One variant collection, unwrapping its doubly nested envelope
pub fn variants_from(body: &Value, kind: VariantKind) -> Vec<Variant> {
    let (outer, inner) = envelope_keys(kind);
    let items = body.get(outer).and_then(|envelope| envelope.get(inner));
    parse_each::<WireVariant, Variant>(items, inner)
}

/// Option list for a facet: either a bare array, or an object holding
/// the array under whatever key the server chose
pub fn options_from(body: &Value) -> Vec<FilterOption> {
    let items = match body {
        Value::Array(_) => Some(body),
        Value::Object(map) => map.values().find(|value| value.is_array()),
        _ => None,
    };

    parse_each::<WireOption, WireOption>(items, "option")
        .into_iter()
        .filter(|option| !option.id.trim().is_empty())
        .map(|option| FilterOption {
            id: option.id,
            name: option.name,
        })
        .collect()
}
