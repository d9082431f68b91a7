//! [`Handle`](arec_data::Handle) implementations for [`Db`](crate::Db),
//! [`Conn`](crate::Conn) and [`Tx`](crate::Tx).
//!
//! Only a transaction groups several operations atomically; a pool hands
//! each statement to whichever connection is free.

macro_rules! sqlx_handle {
    ($codec:ident, $dialect:expr, [$($lt:lifetime),*] $target:ty, |$this:ident| $executor:expr) => {
        impl<$($lt),*> arec_data::Handle for $target {
            fn dialect(&self) -> arec_data::Dialect {
                $dialect
            }

            async fn query(
                &mut self,
                sql: &str,
                args: &[arec_data::Value],
            ) -> Result<Vec<arec_data::Row>, arec_data::DataError> {
                tracing::trace!(sql, args = args.len(), "query");
                let $this = self;
                let rows = crate::$codec::bind_all(sqlx::query(sql), args)
                    .fetch_all($executor)
                    .await
                    .map_err(crate::SqlxErrorExt::into_data_error)?;
                rows.iter().map(crate::$codec::decode_row).collect()
            }

            async fn query_one(
                &mut self,
                sql: &str,
                args: &[arec_data::Value],
            ) -> Result<arec_data::Row, arec_data::DataError> {
                tracing::trace!(sql, args = args.len(), "query_one");
                let $this = self;
                let row = crate::$codec::bind_all(sqlx::query(sql), args)
                    .fetch_one($executor)
                    .await
                    .map_err(crate::SqlxErrorExt::into_data_error)?;
                crate::$codec::decode_row(&row)
            }

            async fn exec(
                &mut self,
                sql: &str,
                args: &[arec_data::Value],
            ) -> Result<u64, arec_data::DataError> {
                tracing::trace!(sql, args = args.len(), "exec");
                let $this = self;
                let done = crate::$codec::bind_all(sqlx::query(sql), args)
                    .execute($executor)
                    .await
                    .map_err(crate::SqlxErrorExt::into_data_error)?;
                Ok(done.rows_affected())
            }
        }
    };
}

#[cfg(feature = "postgres")]
mod pg {
    use crate::{Conn, Db, Tx};
    use arec_data::Dialect;
    use sqlx::postgres::Postgres;

    sqlx_handle!(postgres, Dialect::Postgres, [] Db<Postgres>, |this| &this.0);
    sqlx_handle!(postgres, Dialect::Postgres, ['c] Conn<'c, Postgres>, |this| &mut *this.0);
    sqlx_handle!(postgres, Dialect::Postgres, ['t] Tx<'t, Postgres>, |this| this.as_mut());
}

#[cfg(feature = "sqlite")]
mod lite {
    use crate::{Conn, Db, Tx};
    use arec_data::Dialect;
    use sqlx::sqlite::Sqlite;

    sqlx_handle!(sqlite, Dialect::Sqlite, [] Db<Sqlite>, |this| &this.0);
    sqlx_handle!(sqlite, Dialect::Sqlite, ['c] Conn<'c, Sqlite>, |this| &mut *this.0);
    sqlx_handle!(sqlite, Dialect::Sqlite, ['t] Tx<'t, Sqlite>, |this| this.as_mut());
}
