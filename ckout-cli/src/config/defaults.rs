//! TOML defaults file.
//!
//! Each top-level table is a section and each key a default for that
//! section:
//!
//! ```toml
//! [payment]
//! currency = "eur"
//! method_types = ["card", "sepa_debit"]
//!
//! [app]
//! debug = true
//! ```

use super::SettingsError;
use ckout_core::{DefaultValue, Defaults};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// One default as written in the file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FileValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

impl From<FileValue> for DefaultValue {
    fn from(value: FileValue) -> Self {
        match value {
            FileValue::Bool(b) => DefaultValue::Bool(b),
            FileValue::Integer(i) => DefaultValue::Text(i.to_string()),
            FileValue::Float(f) => DefaultValue::Text(f.to_string()),
            FileValue::Text(s) => DefaultValue::Text(s),
            FileValue::List(items) => DefaultValue::List(items),
        }
    }
}

/// `[section]` tables of `option = value` pairs.
type DefaultsFile = BTreeMap<String, BTreeMap<String, FileValue>>;

/// Reads and converts a defaults file.
pub fn load_defaults(path: &Path) -> Result<Defaults, SettingsError> {
    let contents = std::fs::read_to_string(path)?;
    parse_defaults(&contents)
}

/// Converts TOML text into [`Defaults`].
///
/// Strings and booleans map to their own variants, numbers to their text
/// and arrays of strings to lists. Anything else is a parse error.
pub fn parse_defaults(contents: &str) -> Result<Defaults, SettingsError> {
    let file: DefaultsFile = toml::from_str(contents)?;
    let mut defaults = Defaults::new();

    for (section, options) in file {
        for (option, value) in options {
            defaults.insert(section.clone(), &option, value);
        }
    }

    Ok(defaults)
}
