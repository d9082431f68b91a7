//! # arec-data-sqlx: SQLx backend for arec
//!
//! Implements the [`arec_data::Handle`] execution boundary on top of
//! [SQLx](https://github.com/launchbadge/sqlx), so every persistence operation
//! runs against a pool, a single connection or an open transaction.
//!
//! Due to Rust's orphan rules, `Handle` can't be implemented on sqlx's own
//! types here; each execution target gets a local wrapper instead.
//!
//! | Item | Description |
//! |------|-------------|
//! | [`Db`] | Pool wrapper: `Db(pool)`; each statement on a free connection |
//! | [`Conn`] | Borrowed connection: `Conn::<Sqlite>::new(&mut *pool_conn)`, also over a raw `sqlx::Transaction` |
//! | [`Tx`] | Transaction wrapper: explicit commit, rollback on drop |
//! | [`HasPool`] | Trait for application states that contain a database pool |
//! | [`SqlxErrorExt`] | Extension trait to convert `sqlx::Error` → `DataError` (`.into_data_error()`) |
//! | [`SqlxResult<T>`] | Type alias for `Result<T, DataError>` |
//!
//! # Feature flags
//!
//! | Feature    | Driver | Placeholders |
//! |------------|--------|--------------|
//! | `sqlite`   | SQLite via `sqlx/sqlite` (default) | `?1, ?2, ...` |
//! | `postgres` | PostgreSQL via `sqlx/postgres` | `$1, $2, ...` |
//!
//! # Quick start
//!
//! ```ignore
//! use arec_data_sqlx::prelude::*;
//!
//! let mut db = Db::new(SqlitePool::connect("sqlite::memory:").await?);
//! let mut tx = db.begin().await?;
//! let mut user = User { name: "a".into(), email: "a@x.io".into(), ..Default::default() };
//! user.save(&mut tx).await?;
//! tx.commit().await?;
//!
//! let mut fresh = User { id: user.id, ..Default::default() };
//! fresh.load(&mut db).await?;
//! ```
//!
//! # Error bridging
//!
//! Due to Rust's orphan rules, `From<sqlx::Error> for DataError` can't be
//! implemented here. Use the [`SqlxErrorExt`] trait instead.

pub mod db;
pub mod error;
mod handle;
#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "sqlite")]
mod sqlite;
pub mod tx;

pub use db::{Conn, Db};
pub use error::{SqlxErrorExt, SqlxResult};
pub use tx::{HasPool, Tx};

/// Re-exports of the most commonly used types from both `arec-data` and this crate.
pub mod prelude {
    pub use crate::{Conn, Db, HasPool, SqlxErrorExt, Tx};
    pub use arec_data::prelude::*;
}
