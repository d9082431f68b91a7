//! arec: ActiveRecord-style persistence over SQL stores.
//!
//! This facade crate re-exports the arec sub-crates through a single
//! dependency with feature flags. Import everything you need with:
//!
//! ```ignore
//! use arec::prelude::*;
//! ```
//!
//! # Feature flags
//!
//! | Feature     | Default | Crate                       |
//! |-------------|---------|-----------------------------|
//! | `data-sqlx` | **yes** | `arec-data-sqlx`            |
//! | `sqlite`    | **yes** | `arec-data-sqlx/sqlite`     |
//! | `postgres`  | no      | `arec-data-sqlx/postgres`   |

pub extern crate arec_core;
pub extern crate arec_data;

#[cfg(feature = "data-sqlx")]
pub use arec_data_sqlx;

pub use arec_core::{init_tracing, init_tracing_from_config, ArecConfig, ConfigError, ConfigValue};
pub use arec_data::*;

pub mod prelude {
    //! Re-exports of the most commonly used types.
    pub use arec_core::prelude::*;
    pub use arec_data::prelude::*;

    #[cfg(feature = "data-sqlx")]
    pub use arec_data_sqlx::{Conn, Db, HasPool, SqlxErrorExt, Tx};
}
