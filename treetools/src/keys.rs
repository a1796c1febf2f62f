//! Key extraction: the valid keys of a container node.

use core::iter::{Enumerate, FusedIterator};
use core::ops::Range;
use core::slice;

use crate::error::TreeError;
use crate::value::{Key, Value};

/// Returns the keys of `node` in traversal order.
///
/// Lists and tuples yield `Key::Int(0)` up to `Key::Int(len - 1)`; maps yield
/// their keys in insertion order. Any other node fails with
/// [`TreeError::UnsupportedShape`].
pub fn keys(node: &Value) -> Result<Keys<'_>, TreeError> {
    let inner = match node {
        Value::List(items) | Value::Tuple(items) => KeysInner::Indices(0..items.len()),
        Value::Map(map) => KeysInner::Map(map.keys()),
        other => {
            return Err(TreeError::UnsupportedShape { kind: other.kind() });
        }
    };
    Ok(Keys { inner })
}

/// Iterator over the keys of a container, returned by [`keys`].
#[derive(Debug, Clone)]
pub struct Keys<'a> {
    inner: KeysInner<'a>,
}

#[derive(Debug, Clone)]
enum KeysInner<'a> {
    Indices(Range<usize>),
    Map(indexmap::map::Keys<'a, Key, Value>),
}

impl Iterator for Keys<'_> {
    type Item = Key;

    fn next(&mut self) -> Option<Key> {
        match &mut self.inner {
            KeysInner::Indices(range) => range.next().map(Key::index),
            KeysInner::Map(keys) => keys.next().cloned(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            KeysInner::Indices(range) => range.size_hint(),
            KeysInner::Map(keys) => keys.size_hint(),
        }
    }
}

impl ExactSizeIterator for Keys<'_> {}
impl FusedIterator for Keys<'_> {}

/// A key borrowed from a container while walking it.
///
/// Sequence positions are not stored anywhere, so they are carried by value.
#[derive(Debug, Clone, Copy)]
pub(crate) enum KeyRef<'a> {
    Index(usize),
    Key(&'a Key),
}

impl KeyRef<'_> {
    pub(crate) fn to_key(self) -> Key {
        match self {
            KeyRef::Index(i) => Key::index(i),
            KeyRef::Key(key) => key.clone(),
        }
    }
}

/// The `(key, child)` pairs of a container, in key order.
pub(crate) enum Children<'a> {
    Seq(Enumerate<slice::Iter<'a, Value>>),
    Map(indexmap::map::Iter<'a, Key, Value>),
}

impl<'a> Children<'a> {
    /// `None` for leaves.
    pub(crate) fn of(node: &'a Value) -> Option<Self> {
        match node {
            Value::List(items) | Value::Tuple(items) => {
                Some(Children::Seq(items.iter().enumerate()))
            }
            Value::Map(map) => Some(Children::Map(map.iter())),
            _ => None,
        }
    }
}

impl<'a> Iterator for Children<'a> {
    type Item = (KeyRef<'a>, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Children::Seq(items) => items.next().map(|(i, v)| (KeyRef::Index(i), v)),
            Children::Map(entries) => entries.next().map(|(k, v)| (KeyRef::Key(k), v)),
        }
    }
}
