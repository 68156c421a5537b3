//! Cursor contract and the row reader that drives it.
//!
//! A [`Cursor`] is an ordered, single-pass source of rows. [`RowReader`]
//! separates fetching a row from interpreting it: it hands out rows of
//! [`RawCell`]s and guarantees the cursor is closed exactly once, whichever
//! way the load exits.

mod memory;

pub use memory::MemoryCursor;

use crate::error::{Result, RowbindError};
use crate::types::RawCell;

/// Driver-side source of query rows.
pub trait Cursor {
    /// Ordered column names of the active query.
    ///
    /// # Errors
    ///
    /// Returns an error if the cursor cannot report its columns.
    fn columns(&self) -> Result<Vec<String>>;

    /// Moves to the next row. Returns false when there are no more rows or
    /// iteration failed; the failure is then reported by [`Cursor::last_error`].
    fn advance(&mut self) -> bool;

    /// Fetches `count` raw cells for the current row.
    ///
    /// # Errors
    ///
    /// Returns an error if the current row cannot be read.
    fn fetch_raw(&mut self, count: usize) -> Result<Vec<RawCell>>;

    /// Releases the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if releasing the underlying resource fails.
    fn close(&mut self) -> Result<()>;

    /// Error, if any, that ended iteration.
    ///
    /// # Errors
    ///
    /// Returns the error that made [`Cursor::advance`] return false.
    fn last_error(&self) -> Result<()>;
}

/// Row-at-a-time reader over a borrowed cursor.
///
/// Closes the cursor on [`RowReader::finish`], or on drop if `finish` was
/// never reached.
pub struct RowReader<'c, C: Cursor + ?Sized> {
    cursor: &'c mut C,
    columns: Vec<String>,
    closed: bool,
}

impl<'c, C: Cursor + ?Sized> RowReader<'c, C> {
    /// Takes over `cursor` and reads its column list.
    ///
    /// # Errors
    ///
    /// Returns the cursor's error if columns cannot be read; the cursor is
    /// closed before returning.
    pub fn open(cursor: &'c mut C) -> Result<Self> {
        let mut reader = RowReader {
            cursor,
            columns: Vec::new(),
            closed: false,
        };
        reader.columns = reader.cursor.columns()?;
        Ok(reader)
    }

    /// Column names for the active query.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Fetches the next row, or `None` once the cursor is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails, if the cursor yields a row of the
    /// wrong width, or if iteration ended with an error.
    pub fn next_row(&mut self) -> Result<Option<Vec<RawCell>>> {
        if !self.cursor.advance() {
            self.cursor.last_error()?;
            return Ok(None);
        }
        let width = self.columns.len();
        let cells = self.cursor.fetch_raw(width)?;
        if cells.len() != width {
            return Err(RowbindError::Cursor(format!(
                "Cursor returned {} cells for {} columns",
                cells.len(),
                width
            )));
        }
        Ok(Some(cells))
    }

    /// Skips over the remaining rows without fetching them, returning how
    /// many there were.
    ///
    /// # Errors
    ///
    /// Returns the cursor's iteration error, if any.
    pub fn drain(&mut self) -> Result<usize> {
        let mut skipped = 0;
        while self.cursor.advance() {
            skipped += 1;
        }
        self.cursor.last_error()?;
        Ok(skipped)
    }

    /// Closes the cursor.
    ///
    /// # Errors
    ///
    /// Returns the cursor's close error.
    pub fn finish(mut self) -> Result<()> {
        self.closed = true;
        self.cursor.close()
    }
}

impl<C: Cursor + ?Sized> Drop for RowReader<'_, C> {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            if let Err(e) = self.cursor.close() {
                tracing::warn!(error = %e, "cursor close failed");
            }
        }
    }
}
