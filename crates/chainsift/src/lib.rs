pub mod config;
pub mod enrich;
pub mod labels;

pub use config::{BitqueryConfig, ConfigError};

pub(crate) const USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
