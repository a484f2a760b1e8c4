//! Parsing of Elasticsearch responses

use std::collections::{BTreeMap, BTreeSet};

use kibi_core::{BackendError, FieldSpec, Result};
use serde_json::{Map, Value};

/// Field type given to names mapped with incompatible types across indices
pub const CONFLICT_FIELD_TYPE: &str = "conflict";

/// Index and alias names of a `_alias` response, sorted and deduplicated
pub fn index_names(body: &Value) -> Result<Vec<String>> {
    let indices = body
        .as_object()
        .ok_or_else(|| BackendError::InvalidResponse("alias response is not an object".into()))?;

    let mut names = BTreeSet::new();
    for (index, entry) in indices {
        names.insert(index.clone());
        if let Some(aliases) = entry.get("aliases").and_then(Value::as_object) {
            names.extend(aliases.keys().cloned());
        }
    }
    Ok(names.into_iter().collect())
}

/// Field type shown to users for an Elasticsearch mapping type
pub fn to_field_type(es_type: &str) -> &'static str {
    match es_type {
        "text" | "keyword" | "string" => "string",
        "long" | "integer" | "short" | "byte" | "double" | "float" | "half_float"
        | "scaled_float" | "token_count" | "murmur3" => "number",
        "date" | "date_nanos" => "date",
        "boolean" => "boolean",
        "ip" => "ip",
        "geo_point" => "geo_point",
        "geo_shape" => "geo_shape",
        "attachment" => "attachment",
        "object" | "nested" => "object",
        _ => "unknown",
    }
}

/// Fields of a `_mapping` response.
///
/// Object properties become dotted names and multi-fields are listed under
/// their parent. Both typeless (7.x) and typed (6.x) mappings are read. A
/// name mapped with different types by different indices is a conflict.
pub fn flatten_mappings(body: &Value) -> Result<Vec<FieldSpec>> {
    let indices = body
        .as_object()
        .ok_or_else(|| BackendError::InvalidResponse("mapping response is not an object".into()))?;

    let mut fields: BTreeMap<String, &'static str> = BTreeMap::new();
    for entry in indices.values() {
        let Some(mappings) = entry.get("mappings").and_then(Value::as_object) else {
            continue;
        };
        match mappings.get("properties").and_then(Value::as_object) {
            Some(properties) => collect_properties("", properties, &mut fields),
            None => {
                for mapping in mappings.values() {
                    if let Some(properties) = mapping.get("properties").and_then(Value::as_object) {
                        collect_properties("", properties, &mut fields);
                    }
                }
            }
        }
    }

    Ok(fields
        .into_iter()
        .map(|(name, field_type)| FieldSpec::new(name, field_type))
        .collect())
}

fn collect_properties(
    prefix: &str,
    properties: &Map<String, Value>,
    fields: &mut BTreeMap<String, &'static str>,
) {
    for (name, definition) in properties {
        let full_name = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };

        if let Some(nested) = definition.get("properties").and_then(Value::as_object) {
            collect_properties(&full_name, nested, fields);
            continue;
        }

        record(fields, &full_name, mapping_type(definition));
        if let Some(multi) = definition.get("fields").and_then(Value::as_object) {
            for (sub_name, sub_definition) in multi {
                record(
                    fields,
                    &format!("{}.{}", full_name, sub_name),
                    mapping_type(sub_definition),
                );
            }
        }
    }
}

fn mapping_type(definition: &Value) -> &'static str {
    let es_type = definition
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("object");
    to_field_type(es_type)
}

fn record(fields: &mut BTreeMap<String, &'static str>, name: &str, field_type: &'static str) {
    fields
        .entry(name.to_string())
        .and_modify(|existing| {
            if *existing != field_type {
                *existing = CONFLICT_FIELD_TYPE;
            }
        })
        .or_insert(field_type);
}

/// Backend error for a failed response with `status` and raw `body`
pub fn classify_error(status: u16, body: &str) -> BackendError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let error_type = parsed
        .as_ref()
        .and_then(|v| v.pointer("/error/type"))
        .and_then(Value::as_str);
    let reason = parsed
        .as_ref()
        .and_then(|v| v.pointer("/error/reason"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string());

    match (status, error_type) {
        (404, _) | (_, Some("index_not_found_exception")) => BackendError::MissingIndices(reason),
        (401 | 403, _) | (_, Some("security_exception")) => BackendError::Authorization(reason),
        _ => BackendError::Backend(format!("Status {}: {}", status, reason)),
    }
}
