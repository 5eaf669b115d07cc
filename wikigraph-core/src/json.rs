//! Accessors for required and optional keys on decoded JSON objects.

use serde_json::{Map, Value};

use crate::{EntityId, SchemaError};

pub(crate) type Object = Map<String, Value>;

pub(crate) fn as_object<'a>(
    value: &'a Value,
    context: &'static str,
) -> Result<&'a Object, SchemaError> {
    value
        .as_object()
        .ok_or(SchemaError::NotAnObject { context })
}

/// Check every key up front so the error names the first absent one.
pub(crate) fn require_keys(
    object: &Object,
    context: &'static str,
    keys: &[&str],
) -> Result<(), SchemaError> {
    match keys.iter().find(|key| !object.contains_key(**key)) {
        Some(key) => Err(SchemaError::missing_key(context, key, object)),
        None => Ok(()),
    }
}

pub(crate) fn field<'a>(
    object: &'a Object,
    context: &'static str,
    key: &str,
) -> Result<&'a Value, SchemaError> {
    object
        .get(key)
        .ok_or_else(|| SchemaError::missing_key(context, key, object))
}

pub(crate) fn str_field<'a>(
    object: &'a Object,
    context: &'static str,
    key: &str,
) -> Result<&'a str, SchemaError> {
    field(object, context, key)?
        .as_str()
        .ok_or_else(|| SchemaError::unexpected_type(context, key, "a string"))
}

pub(crate) fn array_field<'a>(
    object: &'a Object,
    context: &'static str,
    key: &str,
) -> Result<&'a [Value], SchemaError> {
    field(object, context, key)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| SchemaError::unexpected_type(context, key, "an array"))
}

pub(crate) fn entity_id_field(
    object: &Object,
    context: &'static str,
) -> Result<EntityId, SchemaError> {
    EntityId::parse(str_field(object, context, "id")?)
        .map_err(|source| SchemaError::InvalidId { context, source })
}

/// Render a JSON scalar without quotes, the way summaries print raw values.
pub(crate) fn display_scalar(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
