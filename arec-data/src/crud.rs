//! Load, create, update, save and delete for any [`Model`].
//!
//! Each operation issues at most one statement on the given [`Handle`] and
//! never begins, commits or rolls back a transaction: pass a transaction as
//! the handle to group several operations atomically.

use std::future::Future;
use tracing::{debug, trace, warn};

use crate::error::DataError;
use crate::handle::Handle;
use crate::model::{scan, Model};
use crate::oracle::{is_update, primary_exists};
use crate::statement::StatementBuilder;

fn statements<H: Handle>(handle: &H) -> StatementBuilder {
    handle.options().builder(handle.dialect())
}

fn require_key<M: Model>(model: &M, action: &'static str) -> Result<(), DataError> {
    if primary_exists(model) {
        Ok(())
    } else {
        Err(DataError::MissingPrimaryKey {
            table: M::table_name().to_string(),
            action,
        })
    }
}

/// Refresh `model` from the row addressed by its primary key.
///
/// Returns `Ok(false)` when no row matches. Several matching rows are an
/// error unless the handle's options relax `strict_load`, in which case the
/// first row wins.
pub async fn load<H: Handle, M: Model>(handle: &mut H, model: &mut M) -> Result<bool, DataError> {
    require_key(model, "load")?;
    let stmt = statements(handle).load(model);
    debug!(table = M::table_name(), sql = %stmt.sql, args = stmt.args.len(), "load");

    let rows = handle.query(&stmt.sql, &stmt.args).await?;
    let count = rows.len();
    let Some(row) = rows.into_iter().next() else {
        return Ok(false);
    };
    if count > 1 {
        if handle.options().strict_load {
            return Err(DataError::AmbiguousKey {
                table: M::table_name().to_string(),
                rows: count,
            });
        }
        warn!(table = M::table_name(), rows = count, "key matched several rows, using the first");
    }

    scan(model, row)?;
    Ok(true)
}

/// Validate, insert, and refresh `model` from the `RETURNING` row.
pub async fn create<H: Handle, M: Model>(handle: &mut H, model: &mut M) -> Result<(), DataError> {
    model.validate()?;
    let stmt = statements(handle).insert(model);
    debug!(table = M::table_name(), sql = %stmt.sql, args = stmt.args.len(), "create");

    let row = handle.query_one(&stmt.sql, &stmt.args).await?;
    scan(model, row)
}

/// Validate, update by key, and refresh `model` from the `RETURNING` row.
///
/// The key is not checked here: an unaddressable key matches nothing and the
/// handle reports `DataError::NotFound`.
pub async fn update<H: Handle, M: Model>(handle: &mut H, model: &mut M) -> Result<(), DataError> {
    model.validate()?;
    let stmt = statements(handle).update(model);
    debug!(table = M::table_name(), sql = %stmt.sql, args = stmt.args.len(), "update");

    let row = handle.query_one(&stmt.sql, &stmt.args).await?;
    scan(model, row)
}

/// Update when every store-assigned column is populated, create otherwise.
pub async fn save<H: Handle, M: Model>(handle: &mut H, model: &mut M) -> Result<(), DataError> {
    if is_update(model) {
        trace!(table = M::table_name(), "save dispatches update");
        update(handle, model).await
    } else {
        trace!(table = M::table_name(), "save dispatches create");
        create(handle, model).await
    }
}

/// Delete the row addressed by the primary key; deleting nothing is not an error.
pub async fn delete<H: Handle, M: Model>(handle: &mut H, model: &M) -> Result<(), DataError> {
    require_key(model, "delete")?;
    let stmt = statements(handle).delete(model);
    debug!(table = M::table_name(), sql = %stmt.sql, args = stmt.args.len(), "delete");

    let affected = handle.exec(&stmt.sql, &stmt.args).await?;
    trace!(table = M::table_name(), affected, "delete done");
    Ok(())
}

/// Method-call form of the operations, available on every [`Model`].
///
/// ```ignore
/// let mut user = User { name: "a".into(), email: "b".into(), ..Default::default() };
/// user.save(&mut tx).await?;   // insert, id assigned by the store
/// user.name = "a2".into();
/// user.save(&mut tx).await?;   // update by id
/// ```
pub trait ActiveRecord: Model {
    fn load<H: Handle>(&mut self, handle: &mut H) -> impl Future<Output = Result<bool, DataError>> + Send {
        load(handle, self)
    }

    fn create<H: Handle>(&mut self, handle: &mut H) -> impl Future<Output = Result<(), DataError>> + Send {
        create(handle, self)
    }

    fn update<H: Handle>(&mut self, handle: &mut H) -> impl Future<Output = Result<(), DataError>> + Send {
        update(handle, self)
    }

    fn save<H: Handle>(&mut self, handle: &mut H) -> impl Future<Output = Result<(), DataError>> + Send {
        save(handle, self)
    }

    fn delete<H: Handle>(&self, handle: &mut H) -> impl Future<Output = Result<(), DataError>> + Send {
        delete(handle, self)
    }
}

impl<M: Model> ActiveRecord for M {}
