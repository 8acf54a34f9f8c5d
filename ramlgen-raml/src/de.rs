//! Deserialization helpers shared by the document model.
//!
//! RAML leans on YAML shorthands that plain derives do not accept: empty
//! blocks written as `null`, status codes as integer map keys, `?` suffixes
//! on property names and `securedBy` lists containing `null`.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, de::Error as _};
use serde_yaml::Value;

use crate::{model::DefinitionChoice, model::Property};

/// Render a YAML scalar as a string (`200` -> "200", `true` -> "true").
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Treat an explicit `null` the same as an absent key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// An optional scalar rendered as a string, so `version: 1` and
/// `version: v1` both work.
pub(crate) fn optional_scalar<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar_to_string(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom("expected a scalar value")),
    }
}

/// A map whose keys may be any YAML scalar, e.g. response status codes.
pub(crate) fn string_keyed<'de, D, T>(
    deserializer: D,
) -> std::result::Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let raw = Option::<IndexMap<Value, Option<T>>>::deserialize(deserializer)?;
    raw.unwrap_or_default()
        .into_iter()
        .map(|(key, value)| {
            let key = scalar_to_string(&key)
                .ok_or_else(|| D::Error::custom("map keys must be scalars"))?;
            Ok((key, value.unwrap_or_default()))
        })
        .collect()
}

/// A property map where a trailing `?` on the key marks the property optional.
pub(crate) fn properties<'de, D>(
    deserializer: D,
) -> std::result::Result<IndexMap<String, Property>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<IndexMap<String, Property>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, mut property)| match key.strip_suffix('?') {
            Some(name) => {
                property.required = false;
                (name.to_string(), property)
            }
            None => (key, property),
        })
        .collect())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Choices {
    Many(Vec<Option<DefinitionChoice>>),
    One(DefinitionChoice),
}

/// A list of definition choices (`is`, `securedBy`).
///
/// A single entry is accepted without the surrounding list and `null`
/// entries (anonymous access in `securedBy`) are dropped.
pub(crate) fn choices<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<DefinitionChoice>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Choices>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Choices::One(choice)) => vec![choice],
        Some(Choices::Many(choices)) => choices.into_iter().flatten().collect(),
    })
}

/// A single optional definition choice (`type:` on a resource).
pub(crate) fn optional_choice<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DefinitionChoice>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<DefinitionChoice>::deserialize(deserializer)
}
