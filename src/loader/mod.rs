//! Load orchestration.
//!
//! [`Loader::load`] drives a cursor row by row into any [`Destination`];
//! [`Loader::load_row`] binds a single row positionally into explicit slots.
//!
//! Per multi-row call the loader moves through
//! `open → shape resolved → (fetch → bind → convert → commit)* → closed`.
//! The cursor is closed exactly once on every path out of that sequence.

mod config;

pub use config::{ExtraRows, LoaderConfig};

use std::sync::Arc;

use crate::binding::{Bind, Dest, Slot};
use crate::convert::convert;
use crate::cursor::{Cursor, RowReader};
use crate::error::{LoadError, Result, RowbindError};
use crate::shape::{Destination, ShapeDescriptor};
use crate::tag_store::{BindingPlan, Locator, TagStore};
use crate::types::RawCell;

/// Binds cursor rows into destinations.
///
/// A loader owns (or shares) the [`TagStore`] that caches column-to-field
/// matching, so repeated loads of one record type match names only once.
#[derive(Debug, Clone)]
pub struct Loader {
    store: Arc<TagStore>,
    config: LoaderConfig,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

impl Loader {
    /// Creates a loader with its own tag store.
    #[must_use]
    pub fn new(config: LoaderConfig) -> Self {
        Loader {
            store: Arc::new(TagStore::with_retention(config.cache)),
            config,
        }
    }

    /// Creates a loader sharing an existing tag store.
    ///
    /// The store's own retention applies; `config.cache` is ignored.
    #[must_use]
    pub fn with_store(store: Arc<TagStore>, config: LoaderConfig) -> Self {
        Loader { store, config }
    }

    /// The loader's tag store.
    #[must_use]
    pub fn store(&self) -> &Arc<TagStore> {
        &self.store
    }

    /// The loader's configuration.
    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Loads every row of `cursor` into `dest`, returning the number of rows
    /// consumed.
    ///
    /// A scalar or record destination is bound in place from the first row;
    /// further rows follow [`LoaderConfig::extra_rows`]. A list gets one
    /// element per row. A map is emptied first, then keyed by the first
    /// column: plain maps keep the last row per key, maps of lists keep every
    /// row in cursor order.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] carrying the rows committed before the failure.
    /// Those rows stay in `dest`.
    ///
    /// A scalar or record destination is written in place, column by column.
    /// If a column of its row fails, the columns before it have already been
    /// stored: `dest` is left partly written while `rows` is 0.
    pub fn load<C, D>(&self, cursor: &mut C, dest: &mut D) -> std::result::Result<usize, LoadError>
    where
        C: Cursor + ?Sized,
        D: Destination,
    {
        let shape = D::shape();
        let mut reader = RowReader::open(cursor).map_err(|source| LoadError { rows: 0, source })?;

        let mut rows = 0;
        if let Err(source) = self.run(&mut reader, dest, &shape, &mut rows) {
            // Dropping the reader closes the cursor.
            return Err(LoadError { rows, source });
        }
        reader.finish().map_err(|source| LoadError { rows, source })?;

        tracing::trace!(shape = %shape.kind, element = shape.element, rows, "load complete");
        Ok(rows)
    }

    fn run<C, D>(
        &self,
        reader: &mut RowReader<'_, C>,
        dest: &mut D,
        shape: &ShapeDescriptor,
        rows: &mut usize,
    ) -> Result<()>
    where
        C: Cursor + ?Sized,
        D: Destination,
    {
        let columns = reader.columns().to_vec();

        let (key_plan, elem_plan, offset) = if shape.kind.is_map() {
            if columns.is_empty() {
                return Err(RowbindError::InvalidDestination(format!(
                    "{} destination needs a key column but the cursor has none",
                    shape.kind
                )));
            }
            let key_plan = self.store.resolve::<D::Key>(&columns[..1]);
            let elem_plan = self.store.resolve::<D::Elem>(&columns[1..]);
            (Some(key_plan), elem_plan, 1)
        } else {
            (None, self.store.resolve::<D::Elem>(&columns), 0)
        };

        dest.prepare();

        while let Some(cells) = reader.next_row()? {
            if let Some(elem) = dest.in_place() {
                bind_row(&elem_plan, &cells[offset..], elem)?;
                *rows += 1;
                self.skip_extra_rows(reader)?;
                break;
            }

            let mut key = D::Key::default();
            if let Some(plan) = &key_plan {
                bind_row(plan, &cells[..offset], &mut key)?;
            }
            let mut elem = D::Elem::default();
            bind_row(&elem_plan, &cells[offset..], &mut elem)?;
            dest.commit(key, elem);
            *rows += 1;
        }
        Ok(())
    }

    /// Loads the first row into a scalar or record destination.
    ///
    /// # Errors
    ///
    /// Returns [`RowbindError::NotFound`] if the cursor has no rows, and any
    /// error [`Loader::load`] would return.
    pub fn load_one<C, T>(&self, cursor: &mut C, dest: &mut T) -> Result<()>
    where
        C: Cursor + ?Sized,
        T: Destination<Key = (), Elem = T>,
    {
        match self.load(cursor, dest)? {
            0 => Err(RowbindError::NotFound),
            _ => Ok(()),
        }
    }

    /// Loads exactly one row, binding column `i` to `dests[i]`.
    ///
    /// No name matching happens: the destinations must line up with the
    /// cursor's columns. Further rows follow [`LoaderConfig::extra_rows`].
    ///
    /// # Errors
    ///
    /// Returns [`RowbindError::InvalidDestination`] if the number of
    /// destinations differs from the number of columns,
    /// [`RowbindError::NotFound`] if the cursor has no rows, and any
    /// conversion or cursor error.
    pub fn load_row<C>(&self, cursor: &mut C, dests: &mut [&mut dyn Slot]) -> Result<()>
    where
        C: Cursor + ?Sized,
    {
        let mut reader = RowReader::open(cursor)?;
        let columns = reader.columns().to_vec();
        if dests.len() != columns.len() {
            return Err(RowbindError::InvalidDestination(format!(
                "{} destination(s) for {} column(s)",
                dests.len(),
                columns.len()
            )));
        }

        let Some(cells) = reader.next_row()? else {
            return Err(RowbindError::NotFound);
        };
        for ((cell, slot), column) in cells.iter().zip(dests.iter_mut()).zip(&columns) {
            convert_cell(cell, slot.dest(), column)?;
        }

        self.skip_extra_rows(&mut reader)?;
        reader.finish()
    }

    fn skip_extra_rows<C: Cursor + ?Sized>(&self, reader: &mut RowReader<'_, C>) -> Result<()> {
        let extra = reader.drain()?;
        if extra == 0 {
            return Ok(());
        }
        match self.config.extra_rows {
            ExtraRows::Discard => {
                tracing::debug!(extra, "discarded rows after single-row destination");
                Ok(())
            }
            ExtraRows::Reject => Err(RowbindError::UnexpectedRows { extra }),
        }
    }
}

/// Converts one row's cells into `target` following `plan`.
fn bind_row<T: Bind>(plan: &BindingPlan, cells: &[RawCell], target: &mut T) -> Result<()> {
    for ((cell, locator), column) in cells.iter().zip(plan.locators()).zip(plan.columns()) {
        let dest = match *locator {
            Locator::Field(index) => target.locate(index),
            Locator::Discard => Dest::Discard,
        };
        convert_cell(cell, dest, column)?;
    }
    Ok(())
}

fn convert_cell(cell: &RawCell, dest: Dest<'_>, column: &str) -> Result<()> {
    convert(cell, dest).map_err(|source| RowbindError::TypeMismatch {
        column: column.to_string(),
        source,
    })
}
