//! Column-name to field-locator cache.
//!
//! Matching column names against a record's fields is done once per record
//! type. The resulting [`TagMap`] is cached by [`TypeId`] and shared by every
//! later load of that type, on any thread.
//!
//! # Thread Safety
//!
//! The cache sits behind a `parking_lot::RwLock`. Lookups take the read lock;
//! a miss takes the write lock, checks again, and only then builds, so
//! concurrent first loads of one type wait for a single build and reuse it.

use std::any::{type_name, TypeId};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::binding::{Bind, Field, Layout};

/// Retention policy for cached tag maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CacheRetention {
    /// Keep every type for the lifetime of the store.
    #[default]
    Unbounded,
    /// Keep at most this many types, evicting the oldest build first.
    /// `Bounded(0)` builds a fresh map on every lookup and caches nothing.
    Bounded(usize),
}

/// One cached (column name, field) association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    /// Lower-cased column name.
    pub column: String,
    /// Index of the field in the record's layout.
    pub field: usize,
}

/// Column-name associations for one record type.
#[derive(Debug, Clone)]
pub struct TagMap {
    type_name: &'static str,
    entries: Vec<TagEntry>,
    index: HashMap<String, usize>,
}

impl TagMap {
    /// Builds the associations for a record's fields.
    ///
    /// Skipped fields are left out; when two fields answer to the same name
    /// the first one wins.
    #[must_use]
    pub fn build(type_name: &'static str, fields: &[Field]) -> Self {
        let mut entries = Vec::with_capacity(fields.len());
        let mut index = HashMap::with_capacity(fields.len());
        for (field, def) in fields.iter().enumerate() {
            let Some(name) = def.column_name() else {
                continue;
            };
            let column = name.to_lowercase();
            if index.contains_key(&column) {
                continue;
            }
            index.insert(column.clone(), field);
            entries.push(TagEntry { column, field });
        }
        TagMap {
            type_name,
            entries,
            index,
        }
    }

    /// Field locator for a column, matched case-insensitively.
    #[must_use]
    pub fn lookup(&self, column: &str) -> Option<usize> {
        self.index.get(&column.to_lowercase()).copied()
    }

    /// The record type this map was built for.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Cached entries, in field order.
    #[must_use]
    pub fn entries(&self) -> &[TagEntry] {
        &self.entries
    }
}

/// Where one column's cell goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// Into the field (or scalar) at this index.
    Field(usize),
    /// Into the sink.
    Discard,
}

/// Ordered destinations for a run of columns, resolved for one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingPlan {
    columns: Vec<String>,
    locators: Vec<Locator>,
}

impl BindingPlan {
    /// Column names covered by the plan.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Locators, one per column.
    #[must_use]
    pub fn locators(&self) -> &[Locator] {
        &self.locators
    }

    /// Number of columns bound to a field.
    #[must_use]
    pub fn matched(&self) -> usize {
        self.locators
            .iter()
            .filter(|l| matches!(l, Locator::Field(_)))
            .count()
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagStoreStats {
    /// Tag maps built.
    pub builds: u64,
    /// Lookups served from the cache.
    pub hits: u64,
    /// Types currently cached.
    pub cached: usize,
}

#[derive(Debug, Default)]
struct Inner {
    maps: HashMap<TypeId, Arc<TagMap>>,
    /// Build order, oldest first.
    order: VecDeque<TypeId>,
}

/// Shared cache of [`TagMap`]s keyed by record type.
#[derive(Debug, Default)]
pub struct TagStore {
    inner: RwLock<Inner>,
    retention: CacheRetention,
    builds: AtomicU64,
    hits: AtomicU64,
}

impl TagStore {
    /// Creates an unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with the given retention policy.
    #[must_use]
    pub fn with_retention(retention: CacheRetention) -> Self {
        TagStore {
            retention,
            ..Self::default()
        }
    }

    /// Resolves `columns` against type `T`.
    ///
    /// A scalar type binds the first column to itself and discards the rest.
    /// A record type binds each column to the field that answers to its name,
    /// and discards columns no field answers to.
    #[must_use]
    pub fn resolve<T: Bind>(&self, columns: &[String]) -> BindingPlan {
        let locators = match T::layout() {
            Layout::Scalar => (0..columns.len())
                .map(|i| if i == 0 { Locator::Field(0) } else { Locator::Discard })
                .collect(),
            Layout::Record(fields) => {
                let map = self.tag_map::<T>(fields);
                columns
                    .iter()
                    .map(|c| map.lookup(c).map_or(Locator::Discard, Locator::Field))
                    .collect()
            }
        };
        BindingPlan {
            columns: columns.to_vec(),
            locators,
        }
    }

    /// Returns the cached tag map for `T`, building it on first use.
    pub fn tag_map<T: Bind>(&self, fields: &[Field]) -> Arc<TagMap> {
        let id = TypeId::of::<T>();
        if let Some(map) = self.inner.read().maps.get(&id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(map);
        }

        let mut inner = self.inner.write();
        // Another caller may have built it while we waited for the lock.
        if let Some(map) = inner.maps.get(&id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(map);
        }

        let map = Arc::new(TagMap::build(type_name::<T>(), fields));
        self.builds.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            type_name = map.type_name(),
            fields = fields.len(),
            columns = map.entries().len(),
            "built tag map"
        );

        if let CacheRetention::Bounded(limit) = self.retention {
            if limit == 0 {
                return map;
            }
            while inner.order.len() >= limit {
                let Some(oldest) = inner.order.pop_front() else {
                    break;
                };
                inner.maps.remove(&oldest);
            }
        }
        inner.maps.insert(id, Arc::clone(&map));
        inner.order.push_back(id);
        map
    }

    /// Returns true if a tag map for `T` is cached.
    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        self.inner.read().maps.contains_key(&TypeId::of::<T>())
    }

    /// Drops every cached map and resets statistics.
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.maps.clear();
        inner.order.clear();
        self.builds.store(0, Ordering::Relaxed);
        self.hits.store(0, Ordering::Relaxed);
    }

    /// Current cache statistics.
    #[must_use]
    pub fn stats(&self) -> TagStoreStats {
        TagStoreStats {
            builds: self.builds.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            cached: self.inner.read().maps.len(),
        }
    }

    /// The retention policy in force.
    #[must_use]
    pub fn retention(&self) -> CacheRetention {
        self.retention
    }
}
