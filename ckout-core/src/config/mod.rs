//! Configuration store and typed accessors.
//!
//! [`ConfigStore`] holds raw section/option strings read from files plus a
//! [`Defaults`] table. The [`TypedAccessor`] getters are available on any
//! [`ConfigSource`] and turn those strings into typed values:
//!
//! ```
//! use ckout_core::{ConfigStore, Defaults, IntOptions, TypedAccessor};
//!
//! let store: ConfigStore = "[checkout]\nsession_timeout = 60\n".parse()?;
//! let store = store.with_defaults(Defaults::new().with("payment", "currency", "usd"));
//!
//! assert_eq!(store.get("payment", "currency")?, "usd");
//! let timeout = store.get_int("checkout", "session_timeout", IntOptions::default().between(30, 1440))?;
//! assert_eq!(timeout, 60);
//! # Ok::<(), ckout_core::ConfigError>(())
//! ```

mod accessor;
mod store;
mod value;

pub use accessor::{ConfigSource, IntOptions, StringOptions, TypedAccessor, Validator};
pub use store::ConfigStore;
pub use value::{ConfigValue, DefaultValue, Defaults};
