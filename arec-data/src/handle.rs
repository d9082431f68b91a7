use crate::error::DataError;
use crate::session::PersistOptions;
use crate::statement::Dialect;
use crate::value::Value;
use std::future::Future;

/// One result row: column values in SELECT/RETURNING order.
pub type Row = Vec<Value>;

/// Execution handle over a plain connection, a pool or an open transaction.
///
/// Uses RPITIT (return-position `impl Trait` in traits), no `async-trait` needed.
/// Arguments are bound positionally: `args[0]` fills placeholder 1.
pub trait Handle: Send {
    /// Placeholder style understood by the store behind this handle.
    fn dialect(&self) -> Dialect;

    /// Statement and load behavior; [`Session`](crate::Session) overrides it.
    fn options(&self) -> PersistOptions {
        PersistOptions::default()
    }

    /// Run a statement and collect every returned row.
    fn query(
        &mut self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Result<Vec<Row>, DataError>> + Send;

    /// Run a statement that must return exactly one row; no row is `DataError::NotFound`.
    fn query_one(
        &mut self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Result<Row, DataError>> + Send;

    /// Run a statement without rows, returning the affected row count.
    fn exec(
        &mut self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Result<u64, DataError>> + Send;
}

impl<H: Handle> Handle for &mut H {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    fn options(&self) -> PersistOptions {
        (**self).options()
    }

    fn query(
        &mut self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Result<Vec<Row>, DataError>> + Send {
        (**self).query(sql, args)
    }

    fn query_one(
        &mut self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Result<Row, DataError>> + Send {
        (**self).query_one(sql, args)
    }

    fn exec(
        &mut self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Result<u64, DataError>> + Send {
        (**self).exec(sql, args)
    }
}
