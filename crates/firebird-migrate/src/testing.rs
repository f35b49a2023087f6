//! In-memory executor used by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::executor::{DriverError, Executor, RowCursor, Value};

enum Response {
    Rows(Vec<Vec<Value>>),
    Fail(String),
    FailMidScan(Vec<Vec<Value>>, String),
}

#[derive(Default)]
struct State {
    responses: VecDeque<Response>,
    queries: Vec<(String, Vec<Value>)>,
    statements: Vec<String>,
    failing_statements: Vec<String>,
    opened: usize,
    closed: usize,
}

/// Replays canned query results in order and records every statement.
///
/// Clones share state, so a test can hand one clone to the migrator and
/// inspect the other.
#[derive(Clone, Default)]
pub(crate) struct ScriptedExecutor {
    state: Arc<Mutex<State>>,
}

impl ScriptedExecutor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(self, response: Response) -> Self {
        self.state.lock().unwrap().responses.push_back(response);
        self
    }

    /// Queues a result set for the next query.
    pub(crate) fn rows(self, rows: Vec<Vec<Value>>) -> Self {
        self.push(Response::Rows(rows))
    }

    /// Queues a single `COUNT(*)` result.
    pub(crate) fn count(self, count: i64) -> Self {
        self.rows(vec![vec![Value::Integer(count)]])
    }

    /// Makes the next query fail before returning a cursor.
    pub(crate) fn fail_query(self, message: &str) -> Self {
        self.push(Response::Fail(message.to_string()))
    }

    /// Returns `rows`, then fails on the following fetch.
    pub(crate) fn fail_mid_scan(self, rows: Vec<Vec<Value>>, message: &str) -> Self {
        self.push(Response::FailMidScan(rows, message.to_string()))
    }

    /// Makes every executed statement containing `fragment` fail.
    pub(crate) fn fail_statements_containing(self, fragment: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_statements
            .push(fragment.to_string());
        self
    }

    pub(crate) fn queries(&self) -> Vec<(String, Vec<Value>)> {
        self.state.lock().unwrap().queries.clone()
    }

    pub(crate) fn statements(&self) -> Vec<String> {
        self.state.lock().unwrap().statements.clone()
    }

    pub(crate) fn open_cursors(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.opened - state.closed
    }

    pub(crate) fn closed_cursors(&self) -> usize {
        self.state.lock().unwrap().closed
    }
}

pub(crate) struct ScriptedCursor {
    rows: VecDeque<Vec<Value>>,
    error: Option<String>,
    state: Arc<Mutex<State>>,
    closed: bool,
}

impl RowCursor for ScriptedCursor {
    async fn next_row(&mut self) -> Result<Option<Vec<Value>>, DriverError> {
        if let Some(row) = self.rows.pop_front() {
            return Ok(Some(row));
        }
        match self.error.take() {
            Some(message) => Err(message.into()),
            None => Ok(None),
        }
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.state.lock().unwrap().closed += 1;
        }
    }
}

impl Executor for ScriptedExecutor {
    type Cursor = ScriptedCursor;

    async fn query(&self, sql: &str, params: &[Value]) -> Result<ScriptedCursor, DriverError> {
        let mut state = self.state.lock().unwrap();
        state.queries.push((sql.to_string(), params.to_vec()));
        let (rows, error) = match state.responses.pop_front() {
            Some(Response::Rows(rows)) => (rows, None),
            Some(Response::Fail(message)) => return Err(message.into()),
            Some(Response::FailMidScan(rows, message)) => (rows, Some(message)),
            None => (Vec::new(), None),
        };
        state.opened += 1;
        Ok(ScriptedCursor {
            rows: rows.into(),
            error,
            state: Arc::clone(&self.state),
            closed: false,
        })
    }

    async fn execute(&self, sql: &str, _params: &[Value]) -> Result<u64, DriverError> {
        let mut state = self.state.lock().unwrap();
        state.statements.push(sql.to_string());
        if state
            .failing_statements
            .iter()
            .any(|fragment| sql.contains(fragment.as_str()))
        {
            return Err(format!("statement rejected: {sql}").into());
        }
        Ok(0)
    }
}
