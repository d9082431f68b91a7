//! # arec-test
//!
//! [`RecordingHandle`] is an in-memory [`Handle`] that records every
//! statement it is given and answers from a queue of scripted replies, so
//! persistence code can be tested without a database.
//!
//! ```ignore
//! let mut db = RecordingHandle::new()
//!     .reply_row(vec![Value::Int(1), Value::Text("a".into()), Value::Text("b".into())]);
//! user.save(&mut db).await?;
//! db.assert_last_sql("INSERT INTO users (name,email) VALUES ($1,$2) RETURNING id,name,email;");
//! ```

use std::collections::VecDeque;

use arec_data::{DataError, Dialect, Handle, PersistOptions, Row, Value};

/// Which [`Handle`] method received a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Query,
    QueryOne,
    Exec,
}

/// One recorded statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub kind: CallKind,
    pub sql: String,
    pub args: Vec<Value>,
}

/// A scripted answer, consumed in order by the next call.
#[derive(Debug)]
pub enum Reply {
    Rows(Vec<Row>),
    Row(Row),
    Affected(u64),
    Fail(DataError),
}

/// Test double for [`Handle`].
///
/// With the reply queue empty, `query` returns no rows, `exec` affects
/// nothing and `query_one` fails with `DataError::NotFound`.
#[derive(Debug)]
pub struct RecordingHandle {
    dialect: Dialect,
    options: PersistOptions,
    calls: Vec<Call>,
    replies: VecDeque<Reply>,
}

impl Default for RecordingHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingHandle {
    pub fn new() -> Self {
        Self {
            dialect: Dialect::Postgres,
            options: PersistOptions::default(),
            calls: Vec::new(),
            replies: VecDeque::new(),
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_options(mut self, options: PersistOptions) -> Self {
        self.options = options;
        self
    }

    /// Queue a result set for the next call.
    pub fn reply_rows(mut self, rows: Vec<Row>) -> Self {
        self.replies.push_back(Reply::Rows(rows));
        self
    }

    /// Queue a single row for the next call.
    pub fn reply_row(mut self, row: Row) -> Self {
        self.replies.push_back(Reply::Row(row));
        self
    }

    /// Queue an affected-row count for the next call.
    pub fn reply_affected(mut self, affected: u64) -> Self {
        self.replies.push_back(Reply::Affected(affected));
        self
    }

    /// Queue a failure for the next call.
    pub fn reply_error(mut self, error: DataError) -> Self {
        self.replies.push_back(Reply::Fail(error));
        self
    }

    /// Queue a reply on an already-borrowed handle.
    pub fn push_reply(&mut self, reply: Reply) {
        self.replies.push_back(reply);
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn last_call(&self) -> Option<&Call> {
        self.calls.last()
    }

    /// Replies queued but never consumed.
    pub fn pending_replies(&self) -> usize {
        self.replies.len()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
        self.replies.clear();
    }

    /// Assert that exactly `expected` statements were issued.
    pub fn assert_calls(&self, expected: usize) -> &Self {
        assert_eq!(
            self.calls.len(),
            expected,
            "expected {expected} statement(s), got {:#?}",
            self.calls
        );
        self
    }

    pub fn assert_no_calls(&self) -> &Self {
        self.assert_calls(0)
    }

    /// Assert the SQL text of the most recent statement.
    pub fn assert_last_sql(&self, expected: &str) -> &Self {
        let call = self.last_call().expect("no statement was issued");
        assert_eq!(call.sql, expected, "unexpected SQL");
        self
    }

    /// Assert the arguments of the most recent statement.
    pub fn assert_last_args(&self, expected: &[Value]) -> &Self {
        let call = self.last_call().expect("no statement was issued");
        assert_eq!(call.args, expected, "unexpected arguments for `{}`", call.sql);
        self
    }

    /// Assert which handle method received the most recent statement.
    pub fn assert_last_kind(&self, expected: CallKind) -> &Self {
        let call = self.last_call().expect("no statement was issued");
        assert_eq!(call.kind, expected, "unexpected call kind for `{}`", call.sql);
        self
    }

    fn record(&mut self, kind: CallKind, sql: &str, args: &[Value]) -> Option<Reply> {
        tracing::debug!(?kind, sql, args = args.len(), "recorded statement");
        self.calls.push(Call {
            kind,
            sql: sql.to_string(),
            args: args.to_vec(),
        });
        self.replies.pop_front()
    }
}

fn no_row() -> DataError {
    DataError::NotFound("statement returned no row".into())
}

impl Handle for RecordingHandle {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn options(&self) -> PersistOptions {
        self.options
    }

    async fn query(&mut self, sql: &str, args: &[Value]) -> Result<Vec<Row>, DataError> {
        match self.record(CallKind::Query, sql, args) {
            Some(Reply::Rows(rows)) => Ok(rows),
            Some(Reply::Row(row)) => Ok(vec![row]),
            Some(Reply::Affected(_)) | None => Ok(Vec::new()),
            Some(Reply::Fail(err)) => Err(err),
        }
    }

    async fn query_one(&mut self, sql: &str, args: &[Value]) -> Result<Row, DataError> {
        match self.record(CallKind::QueryOne, sql, args) {
            Some(Reply::Row(row)) => Ok(row),
            Some(Reply::Rows(rows)) => rows.into_iter().next().ok_or_else(no_row),
            Some(Reply::Affected(_)) | None => Err(no_row()),
            Some(Reply::Fail(err)) => Err(err),
        }
    }

    async fn exec(&mut self, sql: &str, args: &[Value]) -> Result<u64, DataError> {
        match self.record(CallKind::Exec, sql, args) {
            Some(Reply::Affected(n)) => Ok(n),
            Some(Reply::Rows(rows)) => Ok(rows.len() as u64),
            Some(Reply::Row(_)) => Ok(1),
            None => Ok(0),
            Some(Reply::Fail(err)) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_queue_defaults() {
        let mut db = RecordingHandle::new();
        assert!(db.query("SELECT 1;", &[]).await.unwrap().is_empty());
        assert_eq!(db.exec("DELETE FROM t;", &[]).await.unwrap(), 0);
        assert!(matches!(
            db.query_one("SELECT 1;", &[]).await,
            Err(DataError::NotFound(_))
        ));
        db.assert_calls(3).assert_last_kind(CallKind::QueryOne);
    }

    #[tokio::test]
    async fn replies_are_consumed_in_order() {
        let mut db = RecordingHandle::new()
            .reply_affected(2)
            .reply_error(DataError::Other("boom".into()));
        assert_eq!(db.exec("DELETE FROM t;", &[]).await.unwrap(), 2);
        assert!(db.query("SELECT 1;", &[Value::Int(1)]).await.is_err());
        db.assert_last_sql("SELECT 1;").assert_last_args(&[Value::Int(1)]);
        assert_eq!(db.pending_replies(), 0);
    }
}
