//! Checkout settings read through the typed accessors.
//!
//! ```ini
//! [app]
//! debug = False
//! allowed_hosts = shop.example.com, www.shop.example.com
//! secret_key = change-me
//!
//! [database]
//! url = postgres://shop@localhost/shop
//!
//! [payment]
//! api_key = sk_live_...
//! publishable_key = pk_live_...
//! currency = usd
//! method_types = card
//!
//! [checkout]
//! success_url = https://shop.example.com/stripe/success/
//! cancel_url = https://shop.example.com/stripe/cancel/
//! session_timeout = 60
//! max_items = 10
//! ```

use super::SettingsError;
use ckout_core::{
    ConfigError, ConfigSource, DefaultValue, Defaults, IntOptions, StringOptions, TypedAccessor,
};
use serde::Serialize;
use url::Url;

/// Prefix of secret keys issued for the payment processor's test mode.
const TEST_KEY_PREFIX: &str = "sk_test_";

/// Defaults applied before any user-supplied defaults file.
pub fn builtin_defaults() -> Defaults {
    Defaults::new()
        .with("app", "debug", false)
        .with(
            "app",
            "allowed_hosts",
            vec!["localhost".to_string(), "127.0.0.1".to_string()],
        )
        .with("payment", "currency", "usd")
        .with("payment", "method_types", "card")
        .with("payment", "test_mode", DefaultValue::None)
        .with("checkout", "success_url", "http://localhost:8000/stripe/success/")
        .with("checkout", "cancel_url", "http://localhost:8000/stripe/cancel/")
        .with("checkout", "max_items", "10")
}

/// Settings the checkout needs at start-up.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSettings {
    pub debug: bool,
    pub allowed_hosts: Vec<String>,
    #[serde(skip_serializing)]
    pub secret_key: String,
    #[serde(skip_serializing)]
    pub database_url: String,
    /// Secret key for the payment processor API.
    #[serde(skip_serializing)]
    pub api_key: String,
    pub publishable_key: Option<String>,
    /// ISO 4217 code, lower-cased.
    pub currency: String,
    pub payment_method_types: Vec<String>,
    pub success_url: Url,
    pub cancel_url: Url,
    pub session_timeout_minutes: i64,
    /// `0` means no limit.
    pub max_items_per_order: u64,
    pub test_mode: bool,
}

impl CheckoutSettings {
    /// Read every setting from `config`.
    pub fn load<C: ConfigSource + ?Sized>(config: &C) -> Result<Self, ConfigError> {
        let is_secret_key = |v: &str| v.starts_with("sk_");
        let is_publishable_key = |v: &str| v.is_empty() || v.starts_with("pk_");
        let is_currency = |v: &str| v.len() == 3 && v.chars().all(|c| c.is_ascii_alphabetic());

        let api_key = config.get_string(
            "payment",
            "api_key",
            StringOptions::required().validate(&is_secret_key),
        )?;
        let publishable_key = config.get_string(
            "payment",
            "publishable_key",
            StringOptions::default().validate(&is_publishable_key),
        )?;
        let test_mode = config
            .get_optional_bool("payment", "test_mode", true)?
            .unwrap_or_else(|| api_key.starts_with(TEST_KEY_PREFIX));

        Ok(Self {
            debug: config.get_bool("app", "debug", true)?,
            allowed_hosts: config.get_list("app", "allowed_hosts", true)?,
            secret_key: config.get_required("app", "secret_key")?,
            database_url: config.get_required("database", "url")?,
            publishable_key: Some(publishable_key).filter(|k| !k.is_empty()),
            currency: config
                .get_string(
                    "payment",
                    "currency",
                    StringOptions::required().validate(&is_currency),
                )?
                .to_lowercase(),
            payment_method_types: config.get_tuple("payment", "method_types")?.into_vec(),
            success_url: url_option(config, "checkout", "success_url")?,
            cancel_url: url_option(config, "checkout", "cancel_url")?,
            session_timeout_minutes: config.get_int(
                "checkout",
                "session_timeout",
                IntOptions::default().with_default(60).between(30, 1440),
            )?,
            max_items_per_order: config.get_uint("checkout", "max_items", true)?,
            test_mode,
            api_key,
        })
    }

    /// Cross-field checks that no single accessor can express.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.debug && self.allowed_hosts.iter().all(|h| h.is_empty()) {
            return Err(SettingsError::ValidationError(
                "app.allowed_hosts must not be empty when debug is off".to_string(),
            ));
        }
        if !self.test_mode && self.api_key.starts_with(TEST_KEY_PREFIX) {
            return Err(SettingsError::ValidationError(
                "payment.test_mode is False but payment.api_key is a test key".to_string(),
            ));
        }
        if self.payment_method_types.is_empty() {
            return Err(SettingsError::ValidationError(
                "payment.method_types must list at least one method".to_string(),
            ));
        }
        Ok(())
    }

    /// One `name = value` line per setting, secrets masked.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("debug", self.debug.to_string()),
            ("allowed_hosts", self.allowed_hosts.join(", ")),
            ("secret_key", mask(&self.secret_key)),
            ("database_url", mask(&self.database_url)),
            ("api_key", mask(&self.api_key)),
            (
                "publishable_key",
                self.publishable_key.clone().unwrap_or_default(),
            ),
            ("currency", self.currency.clone()),
            ("payment_method_types", self.payment_method_types.join(", ")),
            ("success_url", self.success_url.to_string()),
            ("cancel_url", self.cancel_url.to_string()),
            (
                "session_timeout_minutes",
                self.session_timeout_minutes.to_string(),
            ),
            ("max_items_per_order", self.max_items_per_order.to_string()),
            ("test_mode", self.test_mode.to_string()),
        ]
    }
}

/// An absolute http(s) URL.
fn url_option<C: ConfigSource + ?Sized>(
    config: &C,
    section: &str,
    option: &str,
) -> Result<Url, ConfigError> {
    let raw = config.get_required(section, option)?;
    let url = Url::parse(&raw)
        .map_err(|e| ConfigError::invalid(section, option, raw.as_str(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(
            section,
            option,
            raw,
            "scheme must be http or https",
        ));
    }
    Ok(url)
}

fn mask(secret: &str) -> String {
    match secret.char_indices().nth(4) {
        Some((at, _)) => format!("{}****", &secret[..at]),
        None => "****".to_string(),
    }
}
