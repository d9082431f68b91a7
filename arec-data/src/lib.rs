//! # arec-data: generic ActiveRecord-style persistence
//!
//! A type implements the [`Model`] contract (table name, key columns,
//! non-key columns, store-assigned columns, validation) and gains
//! [`load`], [`create`], [`update`], [`save`] and [`delete`] against any
//! execution [`Handle`], without writing SQL.
//!
//! | Item | Description |
//! |------|-------------|
//! | [`Model`], [`Field`], [`field!`] | Metadata contract and field accessors |
//! | [`StatementBuilder`] | SELECT/DELETE/INSERT/UPDATE text with ordered arguments |
//! | [`oracle`] | Key addressability and insert-vs-update detection |
//! | [`Handle`] | Execution boundary over connections, pools and transactions |
//! | [`ActiveRecord`] | Method-call form: `user.save(&mut tx).await?` |
//! | [`Session`], [`PersistOptions`] | Configured identifier quoting and load strictness |
//!
//! Backends live in separate crates (`arec-data-sqlx`).

pub mod crud;
pub mod error;
pub mod handle;
pub mod model;
pub mod oracle;
pub mod session;
pub mod statement;
pub mod value;

pub use crud::{create, delete, load, save, update, ActiveRecord};
pub use error::{DataError, FieldError, ValidationError};
pub use handle::{Handle, Row};
pub use model::{Field, Model};
pub use session::{PersistOptions, Session};
pub use statement::{Dialect, IdentifierPolicy, Statement, StatementBuilder};
pub use value::{FromValue, Kind, ToValue, Value, ValueError};

pub mod prelude {
    //! Re-exports of the most commonly used data types.
    pub use crate::field;
    pub use crate::{
        ActiveRecord, DataError, Field, Handle, Model, PersistOptions, Session, ValidationError,
        Value,
    };
}
