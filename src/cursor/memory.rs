//! In-memory cursor over a fixed result set.

use crate::error::{Result, RowbindError};
use crate::types::RawCell;

use super::Cursor;

/// A [`Cursor`] over rows held in memory.
///
/// Besides serving as a stand-in for a driver cursor, it can simulate the
/// driver failures a load must survive: a failing fetch, an error that ends
/// iteration, a failing close, and cancellation by an outside close.
#[derive(Debug, Clone, Default)]
pub struct MemoryCursor {
    columns: Vec<String>,
    rows: Vec<Vec<RawCell>>,
    /// Index of the next row `advance` moves to.
    next: usize,
    /// Index of the current row.
    current: Option<usize>,
    closed: bool,
    close_count: usize,
    error: Option<String>,
    fail_fetch_at: Option<usize>,
    iteration_error: Option<String>,
    close_error: Option<String>,
    cancel_after: Option<usize>,
}

impl MemoryCursor {
    /// Creates an empty result set with the given column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MemoryCursor {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Appends a row.
    #[must_use]
    pub fn row<I, T>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RawCell>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    /// Makes fetching the row at `index` (0-based) fail.
    #[must_use]
    pub fn fail_fetch_at(mut self, index: usize) -> Self {
        self.fail_fetch_at = Some(index);
        self
    }

    /// Ends iteration with `message` instead of a clean end of rows.
    #[must_use]
    pub fn fail_iteration(mut self, message: impl Into<String>) -> Self {
        self.iteration_error = Some(message.into());
        self
    }

    /// Makes `close` report `message`.
    #[must_use]
    pub fn fail_close(mut self, message: impl Into<String>) -> Self {
        self.close_error = Some(message.into());
        self
    }

    /// Simulates the owner closing the cursor after `rows` rows were read.
    #[must_use]
    pub fn cancel_after(mut self, rows: usize) -> Self {
        self.cancel_after = Some(rows);
        self
    }

    /// Number of rows in the result set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the result set has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of times `close` was called.
    #[must_use]
    pub fn close_count(&self) -> usize {
        self.close_count
    }

    /// Returns true once the cursor has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of rows `advance` has moved past.
    #[must_use]
    pub fn rows_advanced(&self) -> usize {
        self.next
    }
}

impl Cursor for MemoryCursor {
    fn columns(&self) -> Result<Vec<String>> {
        if self.closed {
            return Err(RowbindError::Cursor("cursor is closed".into()));
        }
        Ok(self.columns.clone())
    }

    fn advance(&mut self) -> bool {
        if self.cancel_after == Some(self.next) {
            self.closed = true;
        }
        if self.closed {
            self.current = None;
            self.error = Some("cursor is closed".into());
            return false;
        }
        if self.next < self.rows.len() {
            self.current = Some(self.next);
            self.next += 1;
            return true;
        }
        self.current = None;
        self.error.clone_from(&self.iteration_error);
        false
    }

    fn fetch_raw(&mut self, count: usize) -> Result<Vec<RawCell>> {
        if self.closed {
            return Err(RowbindError::Cursor("cursor is closed".into()));
        }
        let index = self
            .current
            .ok_or_else(|| RowbindError::Cursor("fetch without a current row".into()))?;
        if self.fail_fetch_at == Some(index) {
            return Err(RowbindError::Cursor(format!("fetch failed at row {index}")));
        }
        Ok(self.rows[index].iter().take(count).cloned().collect())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        self.close_count += 1;
        match &self.close_error {
            Some(message) => Err(RowbindError::Cursor(message.clone())),
            None => Ok(()),
        }
    }

    fn last_error(&self) -> Result<()> {
        match &self.error {
            Some(message) => Err(RowbindError::Cursor(message.clone())),
            None => Ok(()),
        }
    }
}
