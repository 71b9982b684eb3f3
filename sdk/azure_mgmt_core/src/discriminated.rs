//! Helpers for polymorphic models keyed by a discriminator field.
//!
//! ARM models such as Kusto data connections carry a `kind` property that
//! selects the concrete shape of the object. Service crates model these as an
//! enum with one variant per known discriminator plus a raw fallback, and use
//! the helpers here to implement `Serialize`/`Deserialize`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The value of `field` in a JSON object, if it is a string.
pub fn discriminator<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value.get(field).and_then(Value::as_str)
}

/// Whether the discriminator in `value` equals `expected`, ignoring ASCII case.
pub fn is_kind(value: &Value, field: &str, expected: &str) -> bool {
    discriminator(value, field).is_some_and(|kind| kind.eq_ignore_ascii_case(expected))
}

/// Deserialize a concrete variant from an already-buffered JSON value.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(value)
}

/// Serialize `model` and write `kind` into its `field` property.
pub fn encode<T: Serialize>(model: &T, field: &str, kind: &str) -> Result<Value, serde_json::Error> {
    let mut value = serde_json::to_value(model)?;
    if let Value::Object(map) = &mut value {
        map.insert(field.to_string(), Value::String(kind.to_string()));
    }
    Ok(value)
}

/// A polymorphic model whose discriminator was not recognised.
///
/// The original JSON object is preserved so that it round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawModel {
    pub values: Map<String, Value>,
}

impl RawModel {
    /// The discriminator value, if any.
    pub fn kind(&self, field: &str) -> Option<&str> {
        self.values.get(field).and_then(Value::as_str)
    }

    /// A top-level string property such as `name` or `id`.
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.values.get(field).and_then(Value::as_str)
    }
}
