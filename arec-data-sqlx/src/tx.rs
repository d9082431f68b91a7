//! Transaction wrapper and pool access for application state.

use arec_data::DataError;
use sqlx::{Database, Pool, Transaction};
use std::ops::{Deref, DerefMut};

use crate::error::SqlxErrorExt;

/// Trait for application states that contain a database pool.
///
/// ```ignore
/// impl HasPool<Sqlite> for AppState {
///     fn pool(&self) -> &Pool<Sqlite> {
///         &self.pool
///     }
/// }
///
/// let mut tx = Tx::acquire(&state).await?;
/// ```
pub trait HasPool<DB: Database> {
    fn pool(&self) -> &Pool<DB>;
}

/// An open transaction usable as a persistence handle.
///
/// Committing is explicit. Dropping a `Tx` without [`Tx::commit`] rolls the
/// transaction back, so an early `?` return discards every write made through it.
///
/// ```ignore
/// let mut tx = Tx::begin(&pool).await?;
/// user.save(&mut tx).await?;
/// audit.save(&mut tx).await?;
/// tx.commit().await?;
/// ```
pub struct Tx<'a, DB: Database>(pub Transaction<'a, DB>);

impl<'a, DB: Database> Deref for Tx<'a, DB> {
    type Target = Transaction<'a, DB>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a, DB: Database> DerefMut for Tx<'a, DB> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<DB: Database> Tx<'static, DB> {
    pub async fn begin(pool: &Pool<DB>) -> Result<Self, DataError> {
        let tx = pool.begin().await.map_err(SqlxErrorExt::into_data_error)?;
        tracing::debug!("transaction started");
        Ok(Tx(tx))
    }

    /// Begin a transaction on the pool held by `state`.
    pub async fn acquire<S: HasPool<DB>>(state: &S) -> Result<Self, DataError> {
        Self::begin(state.pool()).await
    }
}

impl<'a, DB: Database> Tx<'a, DB> {
    pub fn into_inner(self) -> Transaction<'a, DB> {
        self.0
    }

    /// Returns a mutable reference to the underlying connection.
    pub fn as_mut(&mut self) -> &mut <DB as Database>::Connection {
        &mut *self.0
    }

    pub async fn commit(self) -> Result<(), DataError> {
        self.0.commit().await.map_err(SqlxErrorExt::into_data_error)?;
        tracing::debug!("transaction committed");
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), DataError> {
        self.0.rollback().await.map_err(SqlxErrorExt::into_data_error)?;
        tracing::debug!("transaction rolled back");
        Ok(())
    }
}
