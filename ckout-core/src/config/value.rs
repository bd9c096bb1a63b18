//! Resolved values and the caller-supplied defaults table.

use crate::document::option_key;
use std::collections::HashMap;
use std::fmt;

/// A value as seen by the typed accessors before conversion.
///
/// Values read from sources are always [`ConfigValue::Text`]; the other
/// variants only come from [`Defaults`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Bool(bool),
    Text(String),
    List(Vec<String>),
    None,
}

/// Default values share the representation of resolved values.
pub type DefaultValue = ConfigValue;

impl ConfigValue {
    /// Empty text, `None`, `false` and the empty list.
    pub fn is_falsy(&self) -> bool {
        match self {
            ConfigValue::Bool(b) => !b,
            ConfigValue::Text(s) => s.is_empty(),
            ConfigValue::List(items) => items.is_empty(),
            ConfigValue::None => true,
        }
    }

    /// Integer reading of the value, `None` when it has none.
    ///
    /// Text accepts surrounding whitespace, a sign and `_` between digits.
    pub fn to_int(&self) -> Option<i64> {
        match self {
            ConfigValue::Bool(b) => Some(i64::from(*b)),
            ConfigValue::Text(s) => parse_int(s),
            ConfigValue::List(_) | ConfigValue::None => None,
        }
    }

    /// Splits the value into comma-separated elements.
    ///
    /// Lists are returned as they are; blank text yields no elements.
    pub fn split(&self) -> Vec<String> {
        match self {
            ConfigValue::List(items) => items.clone(),
            other => {
                let text = other.to_string();
                if text.trim().is_empty() {
                    Vec::new()
                } else {
                    text.split(',').map(str::to_owned).collect()
                }
            }
        }
    }
}

/// Text as is, booleans as `True` / `False`, `None` as the empty string
/// and lists joined with `", "`.
impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(true) => f.write_str("True"),
            ConfigValue::Bool(false) => f.write_str("False"),
            ConfigValue::Text(s) => f.write_str(s),
            ConfigValue::List(items) => f.write_str(&items.join(", ")),
            ConfigValue::None => Ok(()),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_owned())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Text(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<Vec<String>> for ConfigValue {
    fn from(value: Vec<String>) -> Self {
        ConfigValue::List(value)
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ConfigValue::None, Into::into)
    }
}

fn parse_int(text: &str) -> Option<i64> {
    let text = text.trim();
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
    {
        return None;
    }
    if digits.contains('_') {
        text.replace('_', "").parse().ok()
    } else {
        text.parse().ok()
    }
}

/// Default values keyed by `(section, option)`.
///
/// Option names follow the store's casing rule and are matched
/// case-insensitively; section names are matched exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    values: HashMap<(String, String), DefaultValue>,
}

impl Defaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(
        mut self,
        section: impl Into<String>,
        option: &str,
        value: impl Into<DefaultValue>,
    ) -> Self {
        self.insert(section, option, value);
        self
    }

    pub fn insert(
        &mut self,
        section: impl Into<String>,
        option: &str,
        value: impl Into<DefaultValue>,
    ) -> Option<DefaultValue> {
        self.values
            .insert((section.into(), option_key(option)), value.into())
    }

    pub fn get(&self, section: &str, option: &str) -> Option<&DefaultValue> {
        self.values.get(&(section.to_owned(), option_key(option)))
    }

    pub fn contains(&self, section: &str, option: &str) -> bool {
        self.get(section, option).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &DefaultValue)> {
        self.values
            .iter()
            .map(|((section, option), value)| (section.as_str(), option.as_str(), value))
    }
}

impl<S, O, V> FromIterator<((S, O), V)> for Defaults
where
    S: Into<String>,
    O: AsRef<str>,
    V: Into<DefaultValue>,
{
    fn from_iter<I: IntoIterator<Item = ((S, O), V)>>(iter: I) -> Self {
        let mut defaults = Defaults::new();
        for ((section, option), value) in iter {
            defaults.insert(section, option.as_ref(), value);
        }
        defaults
    }
}
