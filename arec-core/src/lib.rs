//! # arec-core
//!
//! Ambient runtime shared by the arec crates: layered configuration
//! ([`ArecConfig`]) and the `tracing` subscriber bootstrap ([`init_tracing`]).

pub mod config;
pub mod telemetry;

pub use config::{ArecConfig, ConfigError, ConfigValue, FromConfigValue};
pub use telemetry::{init_tracing, init_tracing_from_config};

pub mod prelude {
    //! Re-exports of the most commonly used core types.
    pub use crate::{ArecConfig, ConfigError, ConfigValue};
}
