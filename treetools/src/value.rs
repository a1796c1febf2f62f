//! The dynamic tree node and its keys.
//!
//! A tree is a [`Value`]. Three variants are containers (`List`, `Tuple` and
//! `Map`); everything else is a leaf. Which containers a traversal descends
//! into is decided by the [`Family`] of the root.

use core::fmt::{self, Debug, Display, Formatter};

use indexmap::IndexMap;

/// Insertion-ordered mapping used by [`Value::Map`].
pub type Map = IndexMap<Key, Value>;

/// A dynamic tree node.
///
/// Equality is structural. Two maps compare equal when they hold the same
/// entries, regardless of insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The absent value. Also used to pad sequences grown by a forced write.
    #[default]
    Null,
    /// Boolean leaf
    Bool(bool),
    /// Integer leaf
    Int(i64),
    /// Floating point leaf
    Float(f64),
    /// String leaf
    String(String),
    /// Growable ordered sequence
    List(Vec<Value>),
    /// Ordered sequence of its own family, distinct from `List`
    Tuple(Vec<Value>),
    /// Insertion-ordered key-value mapping
    Map(Map),
}

/// Enum distinguishing the value variants, used in diagnostics.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueKind {
    /// [`Value::Null`]
    Null,
    /// [`Value::Bool`]
    Bool,
    /// [`Value::Int`]
    Int,
    /// [`Value::Float`]
    Float,
    /// [`Value::String`]
    String,
    /// [`Value::List`]
    List,
    /// [`Value::Tuple`]
    Tuple,
    /// [`Value::Map`]
    Map,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::List => "list",
            ValueKind::Tuple => "tuple",
            ValueKind::Map => "map",
        })
    }
}

/// The container shape of a tree, fixed by its root.
///
/// Traversals only descend into children of the same family; a list nested in
/// a map-rooted tree is a leaf of that tree.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Family {
    /// Rooted at a [`Value::List`]
    List,
    /// Rooted at a [`Value::Tuple`]
    Tuple,
    /// Rooted at a [`Value::Map`]
    Map,
}

impl Family {
    /// The family of `value`, or `None` for leaves.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::List(_) => Some(Family::List),
            Value::Tuple(_) => Some(Family::Tuple),
            Value::Map(_) => Some(Family::Map),
            _ => None,
        }
    }

    /// Whether a traversal of this family descends into `value`.
    pub fn admits(self, value: &Value) -> bool {
        Self::of(value) == Some(self)
    }

    /// A fresh, empty container of this family.
    pub fn empty(self) -> Value {
        match self {
            Family::List => Value::List(Vec::new()),
            Family::Tuple => Value::Tuple(Vec::new()),
            Family::Map => Value::Map(Map::new()),
        }
    }
}

impl Value {
    /// The variant of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::List(_) => ValueKind::List,
            Value::Tuple(_) => ValueKind::Tuple,
            Value::Map(_) => ValueKind::Map,
        }
    }

    /// Returns `true` for lists, tuples and maps.
    pub fn is_container(&self) -> bool {
        Family::of(self).is_some()
    }

    /// Returns `true` if this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The integer payload, if any.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The elements of a list or tuple.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// The entries of a map.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// The direct child stored under `key`.
    ///
    /// Sequences are indexed by non-negative [`Key::Int`]; any other key, or
    /// any key on a leaf, finds nothing.
    pub fn child(&self, key: &Key) -> Option<&Value> {
        match self {
            Value::List(items) | Value::Tuple(items) => items.get(key.as_index()?),
            Value::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Mutable variant of [`Value::child`].
    pub fn child_mut(&mut self, key: &Key) -> Option<&mut Value> {
        match self {
            Value::List(items) | Value::Tuple(items) => items.get_mut(key.as_index()?),
            Value::Map(map) => map.get_mut(key),
            _ => None,
        }
    }
}

impl Display for Value {
    /// Renders the value in a compact literal form: `[1, 2]`, `(1,)`,
    /// `{"a": null}`.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                f.write_str("[")?;
                write_items(f, items)?;
                f.write_str("]")
            }
            Value::Tuple(items) => {
                f.write_str("(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_items(f: &mut Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// A key addressing one child of a container.
///
/// Sequences are addressed by zero-based `Int` keys. Maps accept both kinds.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    /// Sequence index or integer map key
    Int(i64),
    /// String map key
    Str(String),
}

impl Key {
    /// This key as a sequence index. Negative and string keys have none.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Int(i) => usize::try_from(*i).ok(),
            Key::Str(_) => None,
        }
    }

    /// The key of the sequence element at `index`.
    pub fn index(index: usize) -> Self {
        Key::Int(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

impl Debug for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{i}"),
            Key::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Key::Int(i64::from(i))
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

impl From<u32> for Key {
    fn from(i: u32) -> Self {
        Key::Int(i64::from(i))
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::index(i)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_owned())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        match key {
            Key::Int(i) => Value::Int(i),
            Key::Str(s) => Value::String(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_is_fixed_by_variant() {
        assert_eq!(Family::of(&Value::List(vec![])), Some(Family::List));
        assert_eq!(Family::of(&Value::Tuple(vec![])), Some(Family::Tuple));
        assert_eq!(Family::of(&Value::Map(Map::new())), Some(Family::Map));
        assert_eq!(Family::of(&Value::from("leaf")), None);

        assert!(Family::List.admits(&Value::List(vec![Value::Null])));
        assert!(!Family::List.admits(&Value::Tuple(vec![])));
        assert!(!Family::Map.admits(&Value::List(vec![])));
    }

    #[test]
    fn container_and_null_checks() {
        assert!(Value::Tuple(vec![]).is_container());
        assert!(Value::Map(Map::new()).is_container());
        assert!(!Value::from("text").is_container());
        assert!(!Value::Null.is_container());

        assert!(Value::default().is_null());
        assert!(!Value::Int(0).is_null());
    }

    #[test]
    fn child_lookup_by_key_kind() {
        let list = Value::from(vec![10, 20]);
        assert_eq!(list.child(&Key::Int(1)), Some(&Value::Int(20)));
        assert_eq!(list.child(&Key::Int(2)), None);
        assert_eq!(list.child(&Key::Int(-1)), None);
        assert_eq!(list.child(&Key::from("0")), None);
        assert_eq!(Value::Int(3).child(&Key::Int(0)), None);

        let mut map = Map::new();
        map.insert(Key::Int(1), Value::from("one"));
        let map = Value::Map(map);
        assert_eq!(map.child(&Key::Int(1)), Some(&Value::from("one")));
        assert_eq!(map.child(&Key::from("1")), None);
    }

    #[test]
    fn display_is_literal_like() {
        let mut map = Map::new();
        map.insert(Key::from("a"), Value::Tuple(vec![Value::Int(1)]));
        map.insert(Key::Int(2), Value::from(vec![Value::Float(1.0), Value::Null]));
        assert_eq!(Value::Map(map).to_string(), r#"{"a": (1,), 2: [1.0, null]}"#);
        assert_eq!(ValueKind::Tuple.to_string(), "tuple");
    }
}
