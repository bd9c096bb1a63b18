//! Subcommand implementations.
//!
//! Each command returns a `serde_json::Value` so the same result can be
//! printed as JSON or as plain text.

use ckout_core::{ConfigError, ConfigStore, IntOptions, StringOptions, TypedAccessor};
use serde_json::{Value, json};

/// Type a `get` lookup converts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ValueKind {
    String,
    Bool,
    TriBool,
    Int,
    Uint,
    List,
    Tuple,
}

/// Parameters of a single typed lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub section: String,
    pub option: String,
    pub kind: ValueKind,
    pub required: bool,
    pub raw: bool,
    pub default: Option<i64>,
    pub min: Option<i64>,
    pub max: Option<i64>,
}

pub fn get(store: &ConfigStore, lookup: &Lookup) -> Result<Value, ConfigError> {
    let (section, option) = (lookup.section.as_str(), lookup.option.as_str());
    let quiet = !lookup.required;

    let value = match lookup.kind {
        ValueKind::String => {
            let options = StringOptions {
                quiet,
                raw: lookup.raw,
                ..StringOptions::default()
            };
            json!(store.get_string(section, option, options)?)
        }
        ValueKind::Bool => json!(store.get_bool(section, option, quiet)?),
        ValueKind::TriBool => json!(store.get_optional_bool(section, option, quiet)?),
        ValueKind::Int => {
            let options = IntOptions {
                default: lookup.default,
                quiet,
                min_value: lookup.min,
                max_value: lookup.max,
            };
            json!(store.get_int(section, option, options)?)
        }
        ValueKind::Uint => json!(store.get_uint(section, option, quiet)?),
        ValueKind::List => json!(store.get_list(section, option, quiet)?),
        ValueKind::Tuple => json!(store.get_tuple(section, option)?),
    };
    Ok(value)
}

/// `{option: value}` for every option visible from `section`.
pub fn items(store: &ConfigStore, section: &str) -> Result<Value, ConfigError> {
    let map: serde_json::Map<String, Value> = store
        .items(section)?
        .into_iter()
        .map(|(option, value)| (option, Value::String(value)))
        .collect();
    Ok(Value::Object(map))
}

pub fn sections(store: &ConfigStore) -> Value {
    json!(store.sections().collect::<Vec<_>>())
}

/// Plain-text rendering: strings bare, arrays one element per line,
/// objects as `key = value` lines, `null` as `unset`.
pub fn render_text(value: &Value) -> String {
    match value {
        Value::Null => "unset".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_text)
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| format!("{key} = {}", render_text(value)))
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}
