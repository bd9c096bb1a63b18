//! Typed getters layered over a raw section/option source.
//!
//! Every getter resolves a value the same way:
//!
//! 1. the source value, trimmed; blank or missing counts as absent;
//! 2. otherwise the default registered for `(section, option)`, used as is;
//! 3. otherwise `""` when `quiet`, or [`ConfigError::Missing`].
//!
//! The getters then convert the resolved [`ConfigValue`] to the requested type.

use super::value::ConfigValue;
use crate::error::ConfigError;
use crate::utils::is_number_in_interval;
use std::borrow::Cow;
use tracing::debug;

/// Raw access to a section/option store and its defaults.
pub trait ConfigSource {
    /// The value of `option` in `section`, with references expanded unless
    /// `raw`. `Ok(None)` when the section or the option does not exist.
    fn lookup(
        &self,
        section: &str,
        option: &str,
        raw: bool,
    ) -> Result<Option<Cow<'_, str>>, ConfigError>;

    /// The default registered for `(section, option)`, if any.
    fn default_value(&self, section: &str, option: &str) -> Option<&ConfigValue>;
}

/// Predicate run against a resolved string value.
pub type Validator<'a> = &'a dyn Fn(&str) -> bool;

/// Options for [`TypedAccessor::get_string`].
#[derive(Clone, Copy)]
pub struct StringOptions<'a> {
    /// Return `""` instead of failing when nothing resolves.
    pub quiet: bool,
    pub validator: Option<Validator<'a>>,
    /// Skip `%(name)s` expansion.
    pub raw: bool,
}

impl Default for StringOptions<'_> {
    fn default() -> Self {
        Self {
            quiet: true,
            validator: None,
            raw: false,
        }
    }
}

impl<'a> StringOptions<'a> {
    /// Fail with [`ConfigError::Missing`] when nothing resolves.
    pub fn required() -> Self {
        Self {
            quiet: false,
            ..Self::default()
        }
    }

    pub fn validate(mut self, validator: Validator<'a>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn raw(mut self) -> Self {
        self.raw = true;
        self
    }
}

/// Options for [`TypedAccessor::get_int`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntOptions {
    /// Substituted when the resolved value is empty.
    pub default: Option<i64>,
    pub quiet: bool,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
}

impl Default for IntOptions {
    fn default() -> Self {
        Self {
            default: None,
            quiet: true,
            min_value: None,
            max_value: None,
        }
    }
}

impl IntOptions {
    pub fn required() -> Self {
        Self {
            quiet: false,
            ..Self::default()
        }
    }

    pub fn with_default(mut self, default: i64) -> Self {
        self.default = Some(default);
        self
    }

    pub fn min(mut self, min_value: i64) -> Self {
        self.min_value = Some(min_value);
        self
    }

    pub fn max(mut self, max_value: i64) -> Self {
        self.max_value = Some(max_value);
        self
    }

    /// Inclusive on both ends.
    pub fn between(self, min_value: i64, max_value: i64) -> Self {
        self.min(min_value).max(max_value)
    }
}

/// Typed getters, available on every [`ConfigSource`].
pub trait TypedAccessor: ConfigSource {
    /// Resolves `(section, option)` to a value or the registered default.
    fn resolve(
        &self,
        section: &str,
        option: &str,
        quiet: bool,
        raw: bool,
    ) -> Result<ConfigValue, ConfigError> {
        let found = self.lookup(section, option, raw)?;
        if let Some(value) = found.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            return Ok(ConfigValue::Text(value.to_owned()));
        }

        match self.default_value(section, option) {
            Some(default) => {
                debug!("Using default for {}.{}", section, option);
                Ok(default.clone())
            }
            None if quiet => Ok(ConfigValue::Text(String::new())),
            None => Err(ConfigError::missing(section, option)),
        }
    }

    /// Resolves and runs the validator from `options`, regardless of `quiet`.
    fn resolve_validated(
        &self,
        section: &str,
        option: &str,
        options: StringOptions<'_>,
    ) -> Result<ConfigValue, ConfigError> {
        let value = self.resolve(section, option, options.quiet, options.raw)?;
        if let Some(validator) = options.validator {
            let rendered = value.to_string();
            if !validator(&rendered) {
                return Err(ConfigError::invalid(
                    section,
                    option,
                    rendered,
                    "rejected by validator",
                ));
            }
        }
        Ok(value)
    }

    /// String value; `""` when absent.
    fn get(&self, section: &str, option: &str) -> Result<String, ConfigError> {
        self.get_string(section, option, StringOptions::default())
    }

    /// String value; [`ConfigError::Missing`] when absent.
    fn get_required(&self, section: &str, option: &str) -> Result<String, ConfigError> {
        self.get_string(section, option, StringOptions::required())
    }

    fn get_string(
        &self,
        section: &str,
        option: &str,
        options: StringOptions<'_>,
    ) -> Result<String, ConfigError> {
        self.resolve_validated(section, option, options)
            .map(|value| value.to_string())
    }

    /// `true` only for a case-insensitive `True`; empty values read as `false`.
    fn get_bool(&self, section: &str, option: &str, quiet: bool) -> Result<bool, ConfigError> {
        self.get_optional_bool(section, option, quiet)
            .map(|value| value.unwrap_or(false))
    }

    /// Tri-state boolean: `None` when the value is empty or `None`, so that
    /// "not specified" stays distinct from an explicit `False`.
    fn get_optional_bool(
        &self,
        section: &str,
        option: &str,
        quiet: bool,
    ) -> Result<Option<bool>, ConfigError> {
        let value = self.resolve(section, option, quiet, false)?;
        let normalized = match &value {
            ConfigValue::None => "NONE".to_owned(),
            other => other.to_string().to_uppercase(),
        };
        match normalized.as_str() {
            "TRUE" => Ok(Some(true)),
            "FALSE" => Ok(Some(false)),
            "" | "NONE" => Ok(None),
            _ => Err(ConfigError::invalid(
                section,
                option,
                value.to_string(),
                "must be True, False or empty",
            )),
        }
    }

    /// Integer value. Unparsable values read as `0`; the range in `options`
    /// is checked regardless of `quiet`.
    fn get_int(&self, section: &str, option: &str, options: IntOptions) -> Result<i64, ConfigError> {
        let value = self.resolve(section, option, options.quiet, false)?;
        let result = match options.default {
            Some(default) if value.is_falsy() => default,
            _ => value.to_int().unwrap_or(0),
        };

        if !is_number_in_interval(result, options.min_value, options.max_value) {
            let bound = |b: Option<i64>| b.map_or_else(|| "..".to_owned(), |b| b.to_string());
            return Err(ConfigError::invalid(
                section,
                option,
                result.to_string(),
                format!(
                    "must be within [{}, {}]",
                    bound(options.min_value),
                    bound(options.max_value)
                ),
            ));
        }

        Ok(result)
    }

    /// Non-negative integer; negative and unparsable values read as `0`.
    fn get_uint(&self, section: &str, option: &str, quiet: bool) -> Result<u64, ConfigError> {
        let options = IntOptions {
            quiet,
            ..IntOptions::default()
        };
        let value = self.get_int(section, option, options)?;
        Ok(u64::try_from(value).unwrap_or(0))
    }

    /// Comma-separated list, elements trimmed, order and empty elements kept.
    fn get_list(&self, section: &str, option: &str, quiet: bool) -> Result<Vec<String>, ConfigError> {
        let value = self.resolve(section, option, quiet, false)?;
        let items: Vec<String> = value
            .split()
            .into_iter()
            .map(|item| item.trim().to_owned())
            .collect();

        if !quiet && items.is_empty() {
            return Err(ConfigError::missing(section, option));
        }
        Ok(items)
    }

    /// Comma-separated tuple, elements trimmed and empty ones dropped.
    fn get_tuple(&self, section: &str, option: &str) -> Result<Box<[String]>, ConfigError> {
        let value = self.resolve(section, option, true, false)?;
        Ok(value
            .split()
            .into_iter()
            .map(|item| item.trim().to_owned())
            .filter(|item| !item.is_empty())
            .collect())
    }
}

impl<T: ConfigSource + ?Sized> TypedAccessor for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigStore, Defaults};

    fn store(text: &str, defaults: Defaults) -> ConfigStore {
        text.parse::<ConfigStore>().unwrap().with_defaults(defaults)
    }

    const SHOP: &str = r#"
[payment]
api_key =   sk_test_123
currency =
test_mode = True
strict = false
flaky = maybe
timeout = 42
negative = -7
garbage = abc
methods =  a, b ,c
hosts = a,,b,
tuple = a,,b,
secret = %(api_key)s-suffix
"#;

    fn shop() -> ConfigStore {
        store(SHOP, Defaults::new())
    }

    // -- get_string --------------------------------------------------------

    #[test]
    fn test_configured_value_is_trimmed_and_wins_over_default() {
        let store = store(SHOP, Defaults::new().with("payment", "api_key", "ignored"));
        assert_eq!(store.get("payment", "api_key").unwrap(), "sk_test_123");
    }

    #[test]
    fn test_default_used_unmodified() {
        let store = store(SHOP, Defaults::new().with("payment", "region", "  eu  "));
        assert_eq!(store.get("payment", "region").unwrap(), "  eu  ");
    }

    #[test]
    fn test_blank_value_falls_back_to_default() {
        let store = store(SHOP, Defaults::new().with("payment", "currency", "usd"));
        assert_eq!(store.get("payment", "currency").unwrap(), "usd");
    }

    #[test]
    fn test_absent_quiet_and_required() {
        let store = shop();
        assert_eq!(store.get("payment", "missing").unwrap(), "");
        assert_eq!(store.get("nosection", "missing").unwrap(), "");

        let err = store.get_required("payment", "missing").unwrap_err();
        assert!(err.is_missing());
        assert_eq!(
            err.to_string(),
            "Configuration parameter payment.missing not found"
        );
        assert!(store.get_required("payment", "currency").unwrap_err().is_missing());
    }

    #[test]
    fn test_validator_runs_on_values_and_defaults() {
        let store = store(SHOP, Defaults::new().with("payment", "currency", "usd"));
        let is_secret = |v: &str| v.starts_with("sk_");

        let ok = store.get_string(
            "payment",
            "api_key",
            StringOptions::default().validate(&is_secret),
        );
        assert_eq!(ok.unwrap(), "sk_test_123");

        let err = store
            .get_string("payment", "currency", StringOptions::default().validate(&is_secret))
            .unwrap_err();
        match err {
            ConfigError::Invalid { section, option, value, .. } => {
                assert_eq!(section, "payment");
                assert_eq!(option, "currency");
                assert_eq!(value, "usd");
            }
            other => panic!("expected invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_validator_runs_even_when_quiet_and_absent() {
        let store = shop();
        let non_empty = |v: &str| !v.is_empty();
        let err = store
            .get_string("payment", "missing", StringOptions::default().validate(&non_empty))
            .unwrap_err();
        assert!(err.is_invalid());
    }

    #[test]
    fn test_raw_skips_interpolation() {
        let store = shop();
        assert_eq!(store.get("payment", "secret").unwrap(), "sk_test_123-suffix");
        assert_eq!(
            store
                .get_string("payment", "secret", StringOptions::default().raw())
                .unwrap(),
            "%(api_key)s-suffix"
        );
    }

    #[test]
    fn test_bool_default_renders_as_text() {
        let store = store(SHOP, Defaults::new().with("app", "debug", true));
        assert_eq!(store.get("app", "debug").unwrap(), "True");
    }

    // -- get_bool ----------------------------------------------------------

    #[test]
    fn test_bool_tokens() {
        let store = "[a]\nx = true\ny = TRUE\nz = True\nf = false\n"
            .parse::<ConfigStore>()
            .unwrap();
        for option in ["x", "y", "z"] {
            assert!(store.get_bool("a", option, true).unwrap());
        }
        assert!(!store.get_bool("a", "f", true).unwrap());
        assert!(!store.get_bool("a", "absent", true).unwrap());
    }

    #[test]
    fn test_bool_rejects_other_tokens() {
        let err = shop().get_bool("payment", "flaky", true).unwrap_err();
        assert!(err.is_invalid());
        assert!(shop().get_bool("payment", "timeout", true).unwrap_err().is_invalid());
    }

    #[test]
    fn test_bool_required() {
        assert!(shop().get_bool("payment", "absent", false).unwrap_err().is_missing());
    }

    #[test]
    fn test_tri_state_bool() {
        let store = store(
            SHOP,
            Defaults::new()
                .with("app", "none_default", None::<bool>)
                .with("app", "false_default", false),
        );
        assert_eq!(store.get_optional_bool("payment", "absent", true).unwrap(), None);
        assert_eq!(store.get_optional_bool("payment", "strict", true).unwrap(), Some(false));
        assert_eq!(store.get_optional_bool("payment", "test_mode", true).unwrap(), Some(true));
        assert_eq!(store.get_optional_bool("app", "none_default", true).unwrap(), None);
        assert_eq!(store.get_optional_bool("app", "false_default", true).unwrap(), Some(false));
        assert!(!store.get_bool("app", "none_default", true).unwrap());
    }

    // -- get_int / get_uint -----------------------------------------------

    #[test]
    fn test_int_default_parameter() {
        let store = shop();
        let five = IntOptions::default().with_default(5);
        assert_eq!(store.get_int("x", "n", five).unwrap(), 5);
        assert_eq!(store.get_int("payment", "currency", five).unwrap(), 5);
        assert_eq!(store.get_int("payment", "timeout", five).unwrap(), 42);
    }

    #[test]
    fn test_int_lenient_fallback() {
        let store = shop();
        assert_eq!(store.get_int("payment", "garbage", IntOptions::default()).unwrap(), 0);
        assert_eq!(store.get_int("payment", "absent", IntOptions::default()).unwrap(), 0);
        assert_eq!(store.get_int("payment", "negative", IntOptions::default()).unwrap(), -7);
    }

    #[test]
    fn test_int_garbage_ignores_default_parameter() {
        let five = IntOptions::default().with_default(5);
        assert_eq!(shop().get_int("payment", "garbage", five).unwrap(), 0);
    }

    #[test]
    fn test_int_range() {
        let store = shop();
        let err = store
            .get_int("payment", "timeout", IntOptions::default().between(0, 10))
            .unwrap_err();
        assert!(err.is_invalid());
        assert_eq!(
            store
                .get_int("payment", "timeout", IntOptions::default().between(0, 42))
                .unwrap(),
            42
        );
        assert!(
            store
                .get_int("payment", "negative", IntOptions::default().min(0))
                .unwrap_err()
                .is_invalid()
        );
        // the lenient 0 is range-checked too
        assert!(
            store
                .get_int("payment", "garbage", IntOptions::default().min(1))
                .unwrap_err()
                .is_invalid()
        );
    }

    #[test]
    fn test_int_required() {
        let err = shop()
            .get_int("payment", "absent", IntOptions::required())
            .unwrap_err();
        assert!(err.is_missing());
    }

    #[test]
    fn test_int_from_bool_default() {
        let store = store(SHOP, Defaults::new().with("app", "flag", true));
        assert_eq!(store.get_int("app", "flag", IntOptions::default()).unwrap(), 1);
    }

    #[test]
    fn test_uint_clamps_negative() {
        let store = shop();
        assert_eq!(store.get_uint("payment", "negative", true).unwrap(), 0);
        assert_eq!(store.get_uint("payment", "timeout", true).unwrap(), 42);
        assert!(store.get_uint("payment", "absent", false).unwrap_err().is_missing());
    }

    // -- get_list / get_tuple ---------------------------------------------

    #[test]
    fn test_list_is_trimmed_and_ordered() {
        assert_eq!(
            shop().get_list("payment", "methods", true).unwrap(),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_list_keeps_empty_elements() {
        assert_eq!(
            shop().get_list("payment", "hosts", true).unwrap(),
            vec!["a", "", "b", ""]
        );
    }

    #[test]
    fn test_list_absent() {
        let store = shop();
        assert!(store.get_list("payment", "absent", true).unwrap().is_empty());
        assert!(store.get_list("payment", "absent", false).unwrap_err().is_missing());
    }

    #[test]
    fn test_list_default_collection_used_directly() {
        let store = store(
            SHOP,
            Defaults::new()
                .with("app", "hosts", vec![" localhost ".to_string(), "127.0.0.1".to_string()])
                .with("app", "empty", Vec::<String>::new()),
        );
        assert_eq!(
            store.get_list("app", "hosts", true).unwrap(),
            vec!["localhost", "127.0.0.1"]
        );
        assert!(store.get_list("app", "empty", false).unwrap_err().is_missing());
    }

    #[test]
    fn test_tuple_drops_empty_elements() {
        let store = "[a]\nt = a,,b, \n".parse::<ConfigStore>().unwrap();
        assert_eq!(&*store.get_tuple("a", "t").unwrap(), ["a", "b"]);
        assert_eq!(&*shop().get_tuple("payment", "tuple").unwrap(), ["a", "b"]);
        assert!(shop().get_tuple("payment", "absent").unwrap().is_empty());
    }

    #[test]
    fn test_tuple_spanning_lines() {
        let store = "[payment]\nmethod_types = card,\n    sepa_debit,\n    ideal\n"
            .parse::<ConfigStore>()
            .unwrap();
        assert_eq!(
            &*store.get_tuple("payment", "method_types").unwrap(),
            ["card", "sepa_debit", "ideal"]
        );
    }

    // -- round trip --------------------------------------------------------

    #[test]
    fn test_items_agree_with_get() {
        let store = shop();
        for (option, value) in store.items("payment").unwrap() {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                continue;
            }
            assert_eq!(store.get("payment", &option).unwrap(), trimmed);
        }
    }
}
