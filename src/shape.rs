//! Destination shapes.
//!
//! Every load destination falls into one of four shapes, fixed by its type:
//!
//! | Destination                                 | Shape        |
//! |---------------------------------------------|--------------|
//! | any [`Element`] (scalar, record), `u8`, `Vec<u8>` | `Scalar` |
//! | `Vec<T>`, `Vec<Vec<u8>>`                    | `Slice`      |
//! | `HashMap<K, V>` / `BTreeMap<K, V>`          | `Map`        |
//! | `HashMap<K, Vec<V>>` / `BTreeMap<K, Vec<V>>`| `MapOfSlice` |
//!
//! `Vec<u8>` is always a byte value: `HashMap<K, Vec<u8>>` is a `Map`.
//!
//! For map shapes the first column is the key and the remaining columns are
//! bound into the value.

use std::any::type_name;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hash};

use crate::binding::{Bind, Element};

/// Structural category of a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// A single value or record; accepts at most one row.
    Scalar,
    /// A growable sequence; one element per row.
    Slice,
    /// A mapping keyed by the first column; the last row for a key wins.
    Map,
    /// A mapping of sequences; rows append under their key.
    MapOfSlice,
}

impl ShapeKind {
    /// Returns true for the keyed shapes.
    #[must_use]
    pub fn is_map(&self) -> bool {
        matches!(self, ShapeKind::Map | ShapeKind::MapOfSlice)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeKind::Scalar => "scalar",
            ShapeKind::Slice => "slice",
            ShapeKind::Map => "map",
            ShapeKind::MapOfSlice => "map of slices",
        };
        f.write_str(name)
    }
}

/// Shape of a destination type, resolved once per load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeDescriptor {
    /// Shape category.
    pub kind: ShapeKind,
    /// Type allocated for each row.
    pub element: &'static str,
    /// Key type, for map shapes.
    pub key: Option<&'static str>,
}

/// A value a multi-row load can accumulate into.
pub trait Destination {
    /// Key bound from the first column; `()` for unkeyed shapes.
    type Key: Bind;
    /// Value bound from the (remaining) columns of each row.
    type Elem: Bind;

    /// Shape of this destination type.
    fn shape() -> ShapeDescriptor;

    /// Resets the accumulator before the first row.
    fn prepare(&mut self) {}

    /// For the scalar shape, the destination itself, bound in place.
    fn in_place(&mut self) -> Option<&mut Self::Elem> {
        None
    }

    /// Commits one row.
    fn commit(&mut self, key: Self::Key, elem: Self::Elem);
}

impl<T: Element> Destination for T {
    type Key = ();
    type Elem = T;

    fn shape() -> ShapeDescriptor {
        ShapeDescriptor {
            kind: ShapeKind::Scalar,
            element: type_name::<T>(),
            key: None,
        }
    }

    fn in_place(&mut self) -> Option<&mut T> {
        Some(self)
    }

    fn commit(&mut self, (): (), elem: T) {
        *self = elem;
    }
}

/// `u8` loads as a scalar but is not an [`Element`].
impl Destination for u8 {
    type Key = ();
    type Elem = u8;

    fn shape() -> ShapeDescriptor {
        ShapeDescriptor {
            kind: ShapeKind::Scalar,
            element: "u8",
            key: None,
        }
    }

    fn in_place(&mut self) -> Option<&mut u8> {
        Some(self)
    }

    fn commit(&mut self, (): (), elem: u8) {
        *self = elem;
    }
}

impl Destination for Vec<u8> {
    type Key = ();
    type Elem = Vec<u8>;

    fn shape() -> ShapeDescriptor {
        ShapeDescriptor {
            kind: ShapeKind::Scalar,
            element: "Vec<u8>",
            key: None,
        }
    }

    fn in_place(&mut self) -> Option<&mut Vec<u8>> {
        Some(self)
    }

    fn commit(&mut self, (): (), elem: Vec<u8>) {
        *self = elem;
    }
}

impl Destination for Vec<Vec<u8>> {
    type Key = ();
    type Elem = Vec<u8>;

    fn shape() -> ShapeDescriptor {
        ShapeDescriptor {
            kind: ShapeKind::Slice,
            element: "Vec<u8>",
            key: None,
        }
    }

    fn commit(&mut self, (): (), elem: Vec<u8>) {
        self.push(elem);
    }
}

impl<T: Element> Destination for Vec<T> {
    type Key = ();
    type Elem = T;

    fn shape() -> ShapeDescriptor {
        ShapeDescriptor {
            kind: ShapeKind::Slice,
            element: type_name::<T>(),
            key: None,
        }
    }

    fn commit(&mut self, (): (), elem: T) {
        self.push(elem);
    }
}

impl<K, V, S> Destination for HashMap<K, V, S>
where
    K: Bind + Eq + Hash,
    V: Element,
    S: BuildHasher + Default,
{
    type Key = K;
    type Elem = V;

    fn shape() -> ShapeDescriptor {
        ShapeDescriptor {
            kind: ShapeKind::Map,
            element: type_name::<V>(),
            key: Some(type_name::<K>()),
        }
    }

    fn prepare(&mut self) {
        *self = HashMap::default();
    }

    fn commit(&mut self, key: K, elem: V) {
        self.insert(key, elem);
    }
}

impl<K, V, S> Destination for HashMap<K, Vec<V>, S>
where
    K: Bind + Eq + Hash,
    V: Element,
    S: BuildHasher + Default,
{
    type Key = K;
    type Elem = V;

    fn shape() -> ShapeDescriptor {
        ShapeDescriptor {
            kind: ShapeKind::MapOfSlice,
            element: type_name::<V>(),
            key: Some(type_name::<K>()),
        }
    }

    fn prepare(&mut self) {
        *self = HashMap::default();
    }

    fn commit(&mut self, key: K, elem: V) {
        self.entry(key).or_default().push(elem);
    }
}

impl<K, S> Destination for HashMap<K, Vec<u8>, S>
where
    K: Bind + Eq + Hash,
    S: BuildHasher + Default,
{
    type Key = K;
    type Elem = Vec<u8>;

    fn shape() -> ShapeDescriptor {
        ShapeDescriptor {
            kind: ShapeKind::Map,
            element: "Vec<u8>",
            key: Some(type_name::<K>()),
        }
    }

    fn prepare(&mut self) {
        *self = HashMap::default();
    }

    fn commit(&mut self, key: K, elem: Vec<u8>) {
        self.insert(key, elem);
    }
}

impl<K, V> Destination for BTreeMap<K, V>
where
    K: Bind + Ord,
    V: Element,
{
    type Key = K;
    type Elem = V;

    fn shape() -> ShapeDescriptor {
        ShapeDescriptor {
            kind: ShapeKind::Map,
            element: type_name::<V>(),
            key: Some(type_name::<K>()),
        }
    }

    fn prepare(&mut self) {
        self.clear();
    }

    fn commit(&mut self, key: K, elem: V) {
        self.insert(key, elem);
    }
}

impl<K, V> Destination for BTreeMap<K, Vec<V>>
where
    K: Bind + Ord,
    V: Element,
{
    type Key = K;
    type Elem = V;

    fn shape() -> ShapeDescriptor {
        ShapeDescriptor {
            kind: ShapeKind::MapOfSlice,
            element: type_name::<V>(),
            key: Some(type_name::<K>()),
        }
    }

    fn prepare(&mut self) {
        self.clear();
    }

    fn commit(&mut self, key: K, elem: V) {
        self.entry(key).or_default().push(elem);
    }
}

impl<K> Destination for BTreeMap<K, Vec<u8>>
where
    K: Bind + Ord,
{
    type Key = K;
    type Elem = Vec<u8>;

    fn shape() -> ShapeDescriptor {
        ShapeDescriptor {
            kind: ShapeKind::Map,
            element: "Vec<u8>",
            key: Some(type_name::<K>()),
        }
    }

    fn prepare(&mut self) {
        self.clear();
    }

    fn commit(&mut self, key: K, elem: Vec<u8>) {
        self.insert(key, elem);
    }
}
