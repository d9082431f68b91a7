//! Local handle types over sqlx pools and connections.
//!
//! `arec_data::Handle` and the sqlx types both live in other crates, so the
//! handles are newtypes owned here, the same way [`Tx`](crate::Tx) wraps a
//! transaction.

use arec_data::DataError;
use sqlx::{Database, Pool};
use std::ops::{Deref, DerefMut};

use crate::tx::{HasPool, Tx};

/// A pool used as a persistence handle.
///
/// Each statement runs on whichever pooled connection is free, so operations
/// issued through a `Db` are never grouped atomically. Use [`Db::begin`] for that.
///
/// ```ignore
/// let mut db = Db::new(SqlitePool::connect("sqlite::memory:").await?);
/// user.save(&mut db).await?;
/// ```
pub struct Db<DB: Database>(pub Pool<DB>);

impl<DB: Database> Db<DB> {
    pub fn new(pool: Pool<DB>) -> Self {
        Db(pool)
    }

    pub fn pool(&self) -> &Pool<DB> {
        &self.0
    }

    pub fn into_inner(self) -> Pool<DB> {
        self.0
    }

    /// Begin a transaction on this pool.
    pub async fn begin(&self) -> Result<Tx<'static, DB>, DataError> {
        Tx::begin(&self.0).await
    }
}

impl<DB: Database> Clone for Db<DB> {
    fn clone(&self) -> Self {
        Db(self.0.clone())
    }
}

impl<DB: Database> std::fmt::Debug for Db<DB> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Db").field(&self.0).finish()
    }
}

impl<DB: Database> From<Pool<DB>> for Db<DB> {
    fn from(pool: Pool<DB>) -> Self {
        Db(pool)
    }
}

impl<DB: Database> Deref for Db<DB> {
    type Target = Pool<DB>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<DB: Database> HasPool<DB> for Db<DB> {
    fn pool(&self) -> &Pool<DB> {
        &self.0
    }
}

/// A borrowed connection used as a persistence handle.
///
/// Wraps anything that derefs to the driver connection: a `PoolConnection`,
/// a bare `SqliteConnection`/`PgConnection`, or a raw `sqlx::Transaction`
/// the caller manages itself. The driver cannot be inferred from the
/// connection type, so name it at construction.
///
/// ```ignore
/// let mut raw = pool.begin().await?;
/// user.save(&mut Conn::<Sqlite>::new(&mut *raw)).await?;
/// raw.commit().await?;
/// ```
pub struct Conn<'c, DB: Database>(pub &'c mut DB::Connection);

impl<'c, DB: Database> Conn<'c, DB> {
    pub fn new(conn: &'c mut DB::Connection) -> Self {
        Conn(conn)
    }
}

impl<DB: Database> Deref for Conn<'_, DB> {
    type Target = DB::Connection;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl<DB: Database> DerefMut for Conn<'_, DB> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.0
    }
}
