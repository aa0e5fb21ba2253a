//! Contract encode/decode over nested mappings
//!
//! The on-disk/over-the-wire form of every contract is a `serde_json::Value`
//! mapping. Decoding validates shape and enum membership; encoding is
//! deterministic and omits unset optional fields by default.
//!
//! Null-stripping happens after serialization rather than through
//! `skip_serializing_if` annotations, so the same struct can encode in both
//! omit-unset and complete modes. Complete mode is what `replace`-style
//! override application works on.
//!
//! Stripping applies to declared fields only. Types that carry open bags of
//! caller-supplied values re-insert those contents verbatim after the strip,
//! null values included, via their own inherent `to_value`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ContractError;

/// Conversion between typed contract records and their mapping form
///
/// For every valid record `r`, `from_value(to_value(r)?) == r`. Encoding the
/// result of a decode is stable after the first round trip.
pub trait Contract: Serialize + DeserializeOwned {
    /// Decode a record from its mapping form, validating as we go
    fn from_value(value: Value) -> Result<Self, ContractError> {
        serde_json::from_value(value).map_err(|e| ContractError::Validation(e.to_string()))
    }

    /// Encode to the mapping form, omitting unset optional fields
    fn to_value(&self) -> Result<Value, ContractError> {
        Ok(strip_nulls(self.to_value_complete()?))
    }

    /// Encode to the mapping form with every field present, including nulls
    fn to_value_complete(&self) -> Result<Value, ContractError> {
        serde_json::to_value(self).map_err(|e| ContractError::Encode(e.to_string()))
    }
}

impl<T: Serialize + DeserializeOwned> Contract for T {}

/// Recursively remove null-valued keys from mappings
pub fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(seq) => Value::Array(seq.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}

/// Accept a single item or a list of items, normalizing to a list
pub(crate) fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        One(T),
        Many(Vec<T>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(item) => vec![item],
        OneOrMany::Many(items) => items,
    })
}
