//! In-memory section table read from configuration files.
//!
//! `ConfigStore` is plain data: it has no interior mutability, so
//! [`reload`](ConfigStore::reload) and [`set_defaults`](ConfigStore::set_defaults)
//! need exclusive access while any number of readers may share `&ConfigStore`.

use super::accessor::ConfigSource;
use super::value::{ConfigValue, Defaults};
use crate::error::ConfigError;
use crate::document::{self, DEFAULT_SECTION, STRING_ORIGIN, Section, option_key};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Merged sections of every source read so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SectionTable {
    default: Section,
    sections: Vec<Section>,
}

impl SectionTable {
    fn merge(&mut self, parsed: Vec<Section>) {
        for section in parsed {
            if section.name == DEFAULT_SECTION {
                self.default.merge(section);
                continue;
            }
            match self.sections.iter_mut().find(|s| s.name == section.name) {
                Some(existing) => existing.merge(section),
                None => self.sections.push(section),
            }
        }
    }

    fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Raw value visible from `section`, falling back to `[DEFAULT]`.
    ///
    /// `None` when the section does not exist; `[DEFAULT]` itself is
    /// always addressable.
    fn value(&self, section: &str, option: &str) -> Option<Option<&str>> {
        if section == DEFAULT_SECTION {
            return Some(self.default.get(option));
        }
        let own = self.section(section)?;
        Some(own.get(option).or_else(|| self.default.get(option)))
    }

    /// `[DEFAULT]` options first in their declared order, holding the
    /// section's value where it overrides one, then the section's own.
    fn visible_entries<'a>(
        &'a self,
        section: &'a Section,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let inherited = self.default.entries.iter().map(move |(key, value)| {
            (key.as_str(), section.get(key).unwrap_or(value.as_str()))
        });
        let own = section
            .entries
            .iter()
            .filter(move |(key, _)| !self.default.contains(key))
            .map(|(key, value)| (key.as_str(), value.as_str()));
        inherited.chain(own)
    }
}

/// Section/option values read from configuration files, plus the
/// caller-supplied [`Defaults`] consulted by the typed accessors.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    table: SectionTable,
    defaults: Defaults,
    read_paths: Vec<PathBuf>,
}

impl ConfigStore {
    /// An empty store with no defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `paths` in order, later files overriding earlier ones.
    ///
    /// Files that cannot be read are skipped; a store built from no
    /// readable file is empty. Malformed files are an error.
    pub fn from_paths<I, P>(paths: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut store = Self::new();
        store.read(paths)?;
        Ok(store)
    }

    /// Replaces the defaults, builder style.
    pub fn with_defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Merges `paths` into the current table and returns the files read.
    ///
    /// Nothing is merged unless every readable file parses.
    pub fn read<I, P>(&mut self, paths: I) -> Result<Vec<PathBuf>, ConfigError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut pending = Vec::new();
        let mut read = Vec::new();
        for path in paths {
            let path = path.as_ref();
            let text = match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Skipping unreadable config file {:?}: {}", path, e);
                    continue;
                }
            };
            let parsed = document::parse(&text, &path.display().to_string())?;
            debug!("Read {} section(s) from {:?}", parsed.len(), path);
            pending.extend(parsed);
            read.push(path.to_path_buf());
        }
        self.table.merge(pending);
        self.read_paths.extend(read.iter().cloned());
        Ok(read)
    }

    /// Merges in-memory text into the current table.
    pub fn read_str(&mut self, text: &str) -> Result<(), ConfigError> {
        let parsed = document::parse(text, STRING_ORIGIN)?;
        self.table.merge(parsed);
        Ok(())
    }

    /// Discards every value read so far and reads `paths` afresh.
    ///
    /// Defaults are kept. If any file is malformed the current table is
    /// left untouched.
    pub fn reload<I, P>(&mut self, paths: I) -> Result<Vec<PathBuf>, ConfigError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut fresh = Self::new();
        let read = fresh.read(paths)?;
        self.table = fresh.table;
        self.read_paths = fresh.read_paths;
        debug!("Configuration reloaded from {} file(s)", read.len());
        Ok(read)
    }

    /// Replaces the defaults table wholesale.
    pub fn set_defaults(&mut self, defaults: Defaults) {
        self.defaults = defaults;
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Files successfully read since construction or the last reload.
    pub fn read_paths(&self) -> &[PathBuf] {
        &self.read_paths
    }

    /// Section names in first-seen order, `[DEFAULT]` excluded.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.table.sections.iter().map(|s| s.name.as_str())
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.table.section(section).is_some()
    }

    /// Option names visible from `section`, including inherited ones.
    pub fn options(&self, section: &str) -> Vec<&str> {
        self.raw_items(section)
            .into_iter()
            .map(|(option, _)| option)
            .collect()
    }

    pub fn has_option(&self, section: &str, option: &str) -> bool {
        self.raw_value(section, option).is_some()
    }

    /// The stored value, uninterpolated and unconverted.
    pub fn raw_value(&self, section: &str, option: &str) -> Option<&str> {
        self.table.value(section, &option_key(option)).flatten()
    }

    /// `(option, value)` pairs of `section` without interpolation.
    ///
    /// Empty when the section does not exist.
    pub fn raw_items(&self, section: &str) -> Vec<(&str, &str)> {
        match self.table.section(section) {
            Some(own) => self.table.visible_entries(own).collect(),
            None => Vec::new(),
        }
    }

    /// `(option, value)` pairs of `section` with references expanded.
    ///
    /// Empty when the section does not exist.
    pub fn items(&self, section: &str) -> Result<Vec<(String, String)>, ConfigError> {
        self.raw_items(section)
            .into_iter()
            .map(|(option, value)| {
                let value = self.expand(section, option, value)?;
                Ok((option.to_owned(), value))
            })
            .collect()
    }

    fn expand(&self, section: &str, option: &str, value: &str) -> Result<String, ConfigError> {
        document::interpolate(value, |name| self.table.value(section, name).flatten()).map_err(
            |kind| ConfigError::Interpolation {
                section: section.to_owned(),
                option: option.to_owned(),
                kind,
            },
        )
    }
}

impl FromStr for ConfigStore {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut store = Self::new();
        store.read_str(text)?;
        Ok(store)
    }
}

impl ConfigSource for ConfigStore {
    fn lookup(
        &self,
        section: &str,
        option: &str,
        raw: bool,
    ) -> Result<Option<Cow<'_, str>>, ConfigError> {
        let key = option_key(option);
        let Some(value) = self.raw_value(section, &key) else {
            return Ok(None);
        };
        if raw {
            return Ok(Some(Cow::Borrowed(value)));
        }
        self.expand(section, &key, value).map(|v| Some(Cow::Owned(v)))
    }

    fn default_value(&self, section: &str, option: &str) -> Option<&ConfigValue> {
        self.defaults.get(section, option)
    }
}
