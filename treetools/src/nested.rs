//! An ordered map addressed by single keys or by key paths.
//!
//! [`NestedMap`] stores [`Node`]s: either a leaf value or another `NestedMap`
//! of the same type. Every operation takes a [`KeyPath`]; a path of more than
//! one key reaches through the nested maps.
//!
//! # Writes
//!
//! Missing intermediate maps are created on the way down and kept.
//!
//! # Reads
//!
//! A failed read reports the full requested path and leaves the map exactly
//! as it was. [`NestedMap::get`] never creates anything. [`NestedMap::get_mut`]
//! runs in two phases: it first descends creating missing maps and records
//! the first one it created, then either commits to the node it found or
//! removes exactly that map again before failing.

use core::fmt::{self, Debug, Display, Formatter};
use core::hash::Hash;

use indexmap::IndexMap;

use crate::tracing_macros::{debug, trace};

/// One key or a sequence of keys, accepted by every [`NestedMap`] operation.
///
/// Paths convert from `Vec<K>`, `[K; N]` and `&[K]`. A single key has to be
/// wrapped explicitly as [`KeyPath::Key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPath<K> {
    /// A plain single-level key
    Key(K),
    /// A sequence of keys, one per nesting level
    Path(Vec<K>),
}

impl<K> KeyPath<K> {
    /// The keys in this path; a single key is a path of length one.
    pub fn keys(&self) -> &[K] {
        match self {
            KeyPath::Key(key) => core::slice::from_ref(key),
            KeyPath::Path(keys) => keys,
        }
    }
}

impl<K> From<Vec<K>> for KeyPath<K> {
    fn from(keys: Vec<K>) -> Self {
        KeyPath::Path(keys)
    }
}

impl<K, const N: usize> From<[K; N]> for KeyPath<K> {
    fn from(keys: [K; N]) -> Self {
        KeyPath::Path(Vec::from(keys))
    }
}

impl<K: Clone> From<&[K]> for KeyPath<K> {
    fn from(keys: &[K]) -> Self {
        KeyPath::Path(keys.to_vec())
    }
}

impl<K: Debug> Display for KeyPath<K> {
    /// A bare key renders on its own, a path as a tuple: `"a"`, `("a",)`,
    /// `("a", "b")`.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            KeyPath::Key(key) => write!(f, "{key:?}"),
            KeyPath::Path(keys) => {
                f.write_str("(")?;
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key:?}")?;
                }
                if keys.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Error returned by [`NestedMap`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NestedMapError<K> {
    /// A key along the path is not present.
    MissingKey {
        /// The path exactly as the caller passed it.
        requested: KeyPath<K>,
        /// Index of the first key that could not be found (0-based).
        depth: usize,
    },

    /// A write needs to descend through an existing leaf.
    LeafInPath {
        /// The path exactly as the caller passed it.
        requested: KeyPath<K>,
        /// Index of the key holding the leaf (0-based).
        depth: usize,
    },

    /// The path has no keys.
    EmptyPath,
}

impl<K: Debug> Display for NestedMapError<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            NestedMapError::MissingKey { requested, depth } => {
                write!(f, "key not found: {requested} (missing at step {depth})")
            }
            NestedMapError::LeafInPath { requested, depth } => {
                write!(
                    f,
                    "cannot write through {requested}: step {depth} holds a leaf"
                )
            }
            NestedMapError::EmptyPath => f.write_str("path must contain at least one key"),
        }
    }
}

impl<K: Debug> core::error::Error for NestedMapError<K> {}

/// An entry of a [`NestedMap`].
#[derive(Debug, Clone)]
pub enum Node<K, V> {
    /// A stored value
    Leaf(V),
    /// A nested level
    Map(NestedMap<K, V>),
}

impl<K, V> Node<K, V> {
    /// The value, if this is a leaf.
    pub fn as_leaf(&self) -> Option<&V> {
        match self {
            Node::Leaf(value) => Some(value),
            Node::Map(_) => None,
        }
    }

    /// Mutable access to the value, if this is a leaf.
    pub fn as_leaf_mut(&mut self) -> Option<&mut V> {
        match self {
            Node::Leaf(value) => Some(value),
            Node::Map(_) => None,
        }
    }

    /// The nested map, if this is one.
    pub fn as_map(&self) -> Option<&NestedMap<K, V>> {
        match self {
            Node::Map(map) => Some(map),
            Node::Leaf(_) => None,
        }
    }

    /// Consume the node, returning the value if it is a leaf.
    pub fn into_leaf(self) -> Option<V> {
        match self {
            Node::Leaf(value) => Some(value),
            Node::Map(_) => None,
        }
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for Node<K, V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Leaf(a), Node::Leaf(b)) => a == b,
            (Node::Map(a), Node::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl<K, V> From<NestedMap<K, V>> for Node<K, V> {
    fn from(map: NestedMap<K, V>) -> Self {
        Node::Map(map)
    }
}

/// An insertion-ordered map whose keys may be paths into nested maps.
///
/// ```
/// use treetools::{KeyPath, NestedMap};
///
/// let mut m = NestedMap::new();
/// m.insert(["foo", "bar", "baz"], 55).unwrap();
/// assert_eq!(m.get(["foo", "bar", "baz"]).unwrap().as_leaf(), Some(&55));
///
/// assert!(m.get_mut(["foo", "bang", "boo"]).is_err());
/// assert!(!m.contains(["foo", "bang"]));
/// assert!(m.contains(KeyPath::Key("foo")));
/// ```
#[derive(Debug, Clone)]
pub struct NestedMap<K, V> {
    entries: IndexMap<K, Node<K, V>>,
}

impl<K, V> Default for NestedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for NestedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K, V> NestedMap<K, V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Number of entries at this level.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this level has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries at this level, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, K, Node<K, V>> {
        self.entries.iter()
    }

    /// Keys at this level, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, K, Node<K, V>> {
        self.entries.keys()
    }

    /// Every leaf value, depth-first in insertion order.
    pub fn leaves(&self) -> Vec<&V> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a V>) {
        for node in self.entries.values() {
            match node {
                Node::Leaf(value) => out.push(value),
                Node::Map(map) => map.collect_leaves(out),
            }
        }
    }
}

impl<K: Hash + Eq + Clone, V> NestedMap<K, V> {
    /// The key path of every leaf, in the same order as [`NestedMap::leaves`].
    pub fn branches(&self) -> Vec<Vec<K>> {
        let mut out = Vec::new();
        self.collect_branches(&mut Vec::new(), &mut out);
        out
    }

    fn collect_branches(&self, prefix: &mut Vec<K>, out: &mut Vec<Vec<K>>) {
        for (key, node) in &self.entries {
            prefix.push(key.clone());
            match node {
                Node::Leaf(_) => out.push(prefix.clone()),
                Node::Map(map) => map.collect_branches(prefix, out),
            }
            prefix.pop();
        }
    }

    /// Read the node at `path`.
    ///
    /// Fails with [`NestedMapError::MissingKey`] carrying the path as given.
    pub fn get<P: Into<KeyPath<K>>>(&self, path: P) -> Result<&Node<K, V>, NestedMapError<K>> {
        let path = path.into();
        let found = match &path {
            KeyPath::Key(key) => self.entries.get(key).ok_or(0),
            KeyPath::Path(keys) => match keys.split_last() {
                None => return Err(NestedMapError::EmptyPath),
                Some((last, parents)) => self
                    .parent(parents)
                    .and_then(|map| map.entries.get(last).ok_or(parents.len())),
            },
        };
        found.map_err(|depth| NestedMapError::MissingKey {
            requested: path,
            depth,
        })
    }

    /// Mutable read of the node at `path`.
    ///
    /// Missing intermediate maps are created while looking; if the lookup
    /// then fails they are removed again, so a failed call leaves the map
    /// unchanged.
    pub fn get_mut<P: Into<KeyPath<K>>>(
        &mut self,
        path: P,
    ) -> Result<&mut Node<K, V>, NestedMapError<K>> {
        let path = path.into();
        let found = match &path {
            KeyPath::Key(key) => self.entries.get_mut(key).ok_or(0),
            KeyPath::Path(keys) if keys.is_empty() => return Err(NestedMapError::EmptyPath),
            KeyPath::Path(keys) => self.speculative_get_mut(keys),
        };
        found.map_err(|depth| NestedMapError::MissingKey {
            requested: path,
            depth,
        })
    }

    /// Whether a node exists at `path`.
    pub fn contains<P: Into<KeyPath<K>>>(&self, path: P) -> bool {
        self.get(path).is_ok()
    }

    /// Store a leaf at `path`, creating missing intermediate maps.
    ///
    /// Returns the node previously stored there.
    pub fn insert<P: Into<KeyPath<K>>>(
        &mut self,
        path: P,
        value: V,
    ) -> Result<Option<Node<K, V>>, NestedMapError<K>> {
        self.insert_node(path, Node::Leaf(value))
    }

    /// Store a node at `path`, creating missing intermediate maps.
    ///
    /// Maps created on the way down are kept. Fails with
    /// [`NestedMapError::LeafInPath`] if the path runs through a leaf, in
    /// which case nothing was created.
    pub fn insert_node<P: Into<KeyPath<K>>>(
        &mut self,
        path: P,
        node: Node<K, V>,
    ) -> Result<Option<Node<K, V>>, NestedMapError<K>> {
        let path = path.into();
        let outcome = match &path {
            KeyPath::Key(key) => return Ok(self.entries.insert(key.clone(), node)),
            KeyPath::Path(keys) => match keys.split_last() {
                None => return Err(NestedMapError::EmptyPath),
                Some((last, parents)) => {
                    let mut created = None;
                    self.descend_creating(parents, &mut created)
                        .map(|map| map.entries.insert(last.clone(), node))
                }
            },
        };
        outcome.map_err(|depth| NestedMapError::LeafInPath {
            requested: path,
            depth,
        })
    }

    /// Remove and return the node at `path`.
    ///
    /// Maps left empty by the removal stay in place.
    pub fn remove<P: Into<KeyPath<K>>>(&mut self, path: P) -> Result<Node<K, V>, NestedMapError<K>> {
        let path = path.into();
        let removed = match &path {
            KeyPath::Key(key) => self.entries.shift_remove(key).ok_or(0),
            KeyPath::Path(keys) => match keys.split_last() {
                None => return Err(NestedMapError::EmptyPath),
                Some((last, parents)) => self
                    .parent_mut(parents)
                    .and_then(|map| map.entries.shift_remove(last).ok_or(parents.len())),
            },
        };
        removed.map_err(|depth| NestedMapError::MissingKey {
            requested: path,
            depth,
        })
    }

    /// The map reached by `parents`, or the depth of the first key that
    /// cannot be found.
    fn parent(&self, parents: &[K]) -> Result<&Self, usize> {
        let mut map = self;
        for (depth, key) in parents.iter().enumerate() {
            map = match map.entries.get(key) {
                Some(Node::Map(child)) => child,
                Some(Node::Leaf(_)) => return Err(depth + 1),
                None => return Err(depth),
            };
        }
        Ok(map)
    }

    /// Mutable variant of [`Self::parent`].
    fn parent_mut(&mut self, parents: &[K]) -> Result<&mut Self, usize> {
        let mut map = self;
        for (depth, key) in parents.iter().enumerate() {
            map = match map.entries.get_mut(key) {
                Some(Node::Map(child)) => child,
                Some(Node::Leaf(_)) => return Err(depth + 1),
                None => return Err(depth),
            };
        }
        Ok(map)
    }

    /// Descend through `parents`, inserting an empty map for every missing
    /// key. `created` records the depth of the first inserted map; everything
    /// below it is new as well.
    ///
    /// Fails with the depth of an existing leaf in the way.
    fn descend_creating(
        &mut self,
        parents: &[K],
        created: &mut Option<usize>,
    ) -> Result<&mut Self, usize> {
        let mut map = self;
        for (depth, key) in parents.iter().enumerate() {
            if !map.entries.contains_key(key) {
                trace!(depth, "creating intermediate map");
                if created.is_none() {
                    *created = Some(depth);
                }
                map.entries.insert(key.clone(), Node::Map(NestedMap::new()));
            }
            map = match map.entries.get_mut(key) {
                Some(Node::Map(child)) => child,
                _ => return Err(depth),
            };
        }
        Ok(map)
    }

    /// Two-phase lookup behind [`Self::get_mut`] for non-empty paths.
    fn speculative_get_mut(&mut self, keys: &[K]) -> Result<&mut Node<K, V>, usize> {
        let Some((last, parents)) = keys.split_last() else {
            return Err(0);
        };

        // Phase one: attempt the descent, recording what it creates.
        let mut created = None;
        let attempt = self
            .descend_creating(parents, &mut created)
            .map_err(|leaf_depth| leaf_depth + 1)
            .and_then(|map| {
                if map.entries.contains_key(last) {
                    Ok(())
                } else {
                    Err(parents.len())
                }
            });

        // Phase two: commit, or undo exactly what phase one created.
        match attempt {
            Ok(()) => self
                .parent_mut(parents)
                .and_then(|map| map.entries.get_mut(last).ok_or(parents.len())),
            Err(depth) => match created {
                Some(at) => {
                    self.rollback(keys, at);
                    Err(at)
                }
                None => Err(depth),
            },
        }
    }

    /// Remove the map created at `keys[at]` by a failed speculative lookup.
    fn rollback(&mut self, keys: &[K], at: usize) {
        debug!(depth = at, "rolling back speculatively created map");
        if let Ok(map) = self.parent_mut(&keys[..at]) {
            map.entries.shift_remove(&keys[at]);
        }
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for NestedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key, Node::Leaf(value)))
                .collect(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a NestedMap<K, V> {
    type Item = (&'a K, &'a Node<K, V>);
    type IntoIter = indexmap::map::Iter<'a, K, Node<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Lookup<'a, V> = Result<&'a Node<&'static str, V>, NestedMapError<&'static str>>;

    fn leaf<V: Copy>(node: Lookup<'_, V>) -> Option<V> {
        node.ok().and_then(Node::as_leaf).copied()
    }

    #[test]
    fn path_write_then_read() {
        let mut m = NestedMap::new();
        m.insert(["foo", "bar", "baz"], 55).unwrap();
        assert_eq!(leaf(m.get(["foo", "bar", "baz"])), Some(55));
        assert_eq!(leaf(m.get(["foo", "bang", "boo"])).unwrap_or(12), 12);
        assert!(m.get(KeyPath::Key("foo")).unwrap().as_map().is_some());
    }

    #[test]
    fn failed_mutable_read_rolls_back() {
        let mut m = NestedMap::new();
        m.insert(["foo", "bar", "baz"], 55).unwrap();
        let before = m.clone();

        let err = m.get_mut(["foo", "bang", "boo"]).unwrap_err();
        assert_eq!(
            err,
            NestedMapError::MissingKey {
                requested: KeyPath::Path(vec!["foo", "bang", "boo"]),
                depth: 1,
            }
        );
        assert_eq!(m, before);
        let foo = m.get(KeyPath::Key("foo")).unwrap().as_map().unwrap();
        assert_eq!(foo.keys().copied().collect::<Vec<_>>(), vec!["bar"]);

        assert!(m.get_mut(["missing", "x"]).is_err());
        assert_eq!(m, before);
    }

    #[test]
    fn successful_mutable_read() {
        let mut m = NestedMap::new();
        m.insert(["a", "b"], 1).unwrap();
        if let Some(v) = m.get_mut(["a", "b"]).unwrap().as_leaf_mut() {
            *v += 1;
        }
        assert_eq!(leaf(m.get(["a", "b"])), Some(2));
    }

    #[test]
    fn single_key_and_single_element_path_report_differently() {
        let m: NestedMap<&str, i32> = NestedMap::new();
        assert_eq!(
            m.get(KeyPath::Key("x")).unwrap_err(),
            NestedMapError::MissingKey {
                requested: KeyPath::Key("x"),
                depth: 0,
            }
        );
        assert_eq!(
            m.get(["x"]).unwrap_err(),
            NestedMapError::MissingKey {
                requested: KeyPath::Path(vec!["x"]),
                depth: 0,
            }
        );
        insta::assert_snapshot!(
            m.get(["x"]).unwrap_err(),
            @r#"key not found: ("x",) (missing at step 0)"#
        );
    }

    #[test]
    fn reading_through_a_leaf_is_missing() {
        let mut m = NestedMap::new();
        m.insert(KeyPath::Key("a"), 1).unwrap();
        assert_eq!(
            m.get(["a", "b"]).unwrap_err(),
            NestedMapError::MissingKey {
                requested: KeyPath::Path(vec!["a", "b"]),
                depth: 1,
            }
        );
        assert_eq!(
            m.insert(["a", "b"], 2).unwrap_err(),
            NestedMapError::LeafInPath {
                requested: KeyPath::Path(vec!["a", "b"]),
                depth: 0,
            }
        );
    }

    #[test]
    fn writes_keep_created_maps() {
        let mut m = NestedMap::new();
        m.insert(["x", "y", "z"], 'v').unwrap();
        assert!(m.contains(["x", "y"]));
        assert_eq!(m.remove(["x", "y", "z"]).unwrap().into_leaf(), Some('v'));
        assert!(m.get(["x", "y"]).unwrap().as_map().unwrap().is_empty());
        assert_eq!(m.remove(["x", "y"]).unwrap().into_leaf(), None);
        assert!(m.remove(["x", "y", "z"]).is_err());
    }

    #[test]
    fn leaves_and_branches_in_insertion_order() {
        let mut m = NestedMap::new();
        m.insert([2, 1], "b").unwrap();
        m.insert([1], "a").unwrap();
        m.insert([2, 0], "c").unwrap();
        assert_eq!(m.leaves(), vec![&"b", &"c", &"a"]);
        assert_eq!(m.branches(), vec![vec![2, 1], vec![2, 0], vec![1]]);
    }

    #[test]
    fn empty_path_is_rejected() {
        let mut m: NestedMap<u8, u8> = [(1, 1)].into_iter().collect();
        assert_eq!(m.get(Vec::<u8>::new()).unwrap_err(), NestedMapError::EmptyPath);
        assert_eq!(m.insert(Vec::<u8>::new(), 0).unwrap_err(), NestedMapError::EmptyPath);
        assert_eq!(m.len(), 1);
    }
}
