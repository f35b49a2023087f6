//! Statement execution seam.
//!
//! The migrator never talks to a Firebird client directly. The host supplies an
//! [`Executor`] that runs parameterized SQL on its own connection or session,
//! and the migrator drives it one statement at a time.

use std::future::Future;

use serde::{Deserialize, Serialize};

/// Error type produced by executor implementations.
pub type DriverError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A single SQL value, used both for statement parameters and row cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Any integral value.
    Integer(i64),
    /// Character data (CHAR, VARCHAR, text BLOBs).
    Text(String),
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A server-side result cursor.
///
/// Implementations release their server resources in [`RowCursor::close`].
/// `close` may be called more than once and must be idempotent.
pub trait RowCursor: Send {
    /// Fetches the next row, or `None` once the result set is exhausted.
    fn next_row(&mut self) -> impl Future<Output = Result<Option<Vec<Value>>, DriverError>> + Send;

    /// Releases the cursor.
    fn close(&mut self);
}

/// Runs SQL against the target database.
pub trait Executor: Send + Sync {
    /// Cursor type returned by [`Executor::query`].
    type Cursor: RowCursor;

    /// Runs a query and returns a cursor over its rows.
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<Self::Cursor, DriverError>> + Send;

    /// Runs a statement that produces no rows, returning the affected row count.
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<u64, DriverError>> + Send;
}

/// Owns a cursor for the duration of a scan and closes it on every exit path.
pub(crate) struct ScopedCursor<C: RowCursor> {
    cursor: C,
    closed: bool,
}

impl<C: RowCursor> ScopedCursor<C> {
    pub(crate) fn new(cursor: C) -> Self {
        Self {
            cursor,
            closed: false,
        }
    }

    pub(crate) async fn next_row(&mut self) -> Result<Option<Vec<Value>>, DriverError> {
        self.cursor.next_row().await
    }

    /// Closes the cursor now instead of at drop time.
    pub(crate) fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.closed {
            self.closed = true;
            self.cursor.close();
        }
    }
}

impl<C: RowCursor> Drop for ScopedCursor<C> {
    fn drop(&mut self) {
        self.release();
    }
}
