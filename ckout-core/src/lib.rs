#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod document;
pub mod utils;

pub use config::{
    ConfigSource, ConfigStore, ConfigValue, DefaultValue, Defaults, IntOptions, StringOptions,
    TypedAccessor,
};
pub use error::{ConfigError, InterpolationErrorKind, ParseError, ParseErrorKind};
