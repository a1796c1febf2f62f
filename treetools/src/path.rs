//! Root-to-node key sequences.

use core::fmt::{self, Display, Formatter};
use core::ops::Deref;

use crate::value::Key;

/// An ordered sequence of [`Key`]s leading from a tree's root to one of its
/// nodes.
///
/// The paths produced by [`branches`](crate::branches) end at leaves and are
/// unique per leaf. Paths deref to `[Key]`, so they can be handed directly to
/// [`get`](crate::get) and [`put`](crate::put).
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path(Vec<Key>);

impl Path {
    /// Create a new empty path.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Create a path with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Push a key onto the path.
    pub fn push(&mut self, key: impl Into<Key>) {
        self.0.push(key.into());
    }

    /// Pop the last key from the path.
    pub fn pop(&mut self) -> Option<Key> {
        self.0.pop()
    }

    /// Get the keys in this path.
    pub fn keys(&self) -> &[Key] {
        &self.0
    }

    /// Consume the path, returning its keys.
    pub fn into_keys(self) -> Vec<Key> {
        self.0
    }
}

impl Deref for Path {
    type Target = [Key];

    fn deref(&self) -> &[Key] {
        &self.0
    }
}

impl AsRef<[Key]> for Path {
    fn as_ref(&self) -> &[Key] {
        &self.0
    }
}

impl From<Vec<Key>> for Path {
    fn from(keys: Vec<Key>) -> Self {
        Self(keys)
    }
}

impl From<&[Key]> for Path {
    fn from(keys: &[Key]) -> Self {
        Self(keys.to_vec())
    }
}

impl FromIterator<Key> for Path {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Path {
    type Item = Key;
    type IntoIter = std::vec::IntoIter<Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Key;
    type IntoIter = core::slice::Iter<'a, Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Path {
    /// Renders like `[1]["foo"]`; the empty path renders as `<root>`.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for key in &self.0 {
            write!(f, "[{key}]")?;
        }
        Ok(())
    }
}

/// Build a [`Path`] from key expressions.
///
/// ```
/// use treetools::{Key, path};
///
/// let p = path![1, "foo"];
/// assert_eq!(p.keys(), &[Key::Int(1), Key::from("foo")]);
/// assert_eq!(p.to_string(), r#"[1]["foo"]"#);
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::new()
    };
    ($($key:expr),+ $(,)?) => {
        $crate::Path::from(::std::vec![$($crate::Key::from($key)),+])
    };
}
