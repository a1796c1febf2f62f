//! Depth-first traversal and leaf rewriting.
//!
//! # Descent rule
//!
//! The [`Family`] of the root is recorded once. A child whose family matches
//! is descended into; any other child, containers included, is a leaf.
//!
//! # Traversal order
//!
//! Pre-order, depth-first, following [`keys`](crate::keys) order: sequence
//! elements by ascending index, map entries by insertion order. Empty
//! containers contribute no leaves.
//!
//! The read side ([`Leaves`], [`Branches`]) walks with an explicit stack and
//! yields lazily; the write side ([`transform_in_place`]) recurses and hands
//! each leaf to a read-modify-write action. Both apply the same
//! [`Family::admits`] test.

use core::iter::FusedIterator;
use core::mem;

use crate::error::TreeError;
use crate::keys::{Children, KeyRef};
use crate::path::Path;
use crate::tracing_macros::{debug, trace};
use crate::value::{Family, Key, Value};

fn root_family(tree: &Value) -> Result<Family, TreeError> {
    Family::of(tree).ok_or(TreeError::UnsupportedShape { kind: tree.kind() })
}

/// Explicit-stack walker shared by [`Leaves`] and [`Branches`].
struct Walk<'a> {
    family: Family,
    /// One frame per container entered, root first.
    stack: Vec<Children<'a>>,
    /// Keys of the entered containers below the root, when tracked.
    ancestors: Option<Vec<Key>>,
}

impl<'a> Walk<'a> {
    fn new(tree: &'a Value, track_path: bool) -> Result<Self, TreeError> {
        let family = root_family(tree)?;
        debug!(?family, track_path, "starting traversal");
        Ok(Self {
            family,
            stack: Children::of(tree).into_iter().collect(),
            ancestors: track_path.then(Vec::new),
        })
    }

    /// Advances to the next leaf, returning its key within its parent.
    fn next_leaf(&mut self) -> Option<(KeyRef<'a>, &'a Value)> {
        loop {
            let frame = self.stack.last_mut()?;
            match frame.next() {
                Some((key, child)) if self.family.admits(child) => {
                    if let Some(ancestors) = &mut self.ancestors {
                        ancestors.push(key.to_key());
                    }
                    self.stack.extend(Children::of(child));
                }
                Some(leaf) => return Some(leaf),
                None => {
                    self.stack.pop();
                    if let Some(ancestors) = &mut self.ancestors {
                        ancestors.pop();
                    }
                }
            }
        }
    }
}

/// Lazy iterator over the leaves of a tree, returned by [`iter_leaves`].
pub struct Leaves<'a> {
    walk: Walk<'a>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<&'a Value> {
        self.walk.next_leaf().map(|(_, leaf)| leaf)
    }
}

impl FusedIterator for Leaves<'_> {}

/// Lazy iterator over the branches of a tree, returned by [`iter_branches`].
pub struct Branches<'a> {
    walk: Walk<'a>,
}

impl Iterator for Branches<'_> {
    type Item = Path;

    fn next(&mut self) -> Option<Path> {
        let (key, _) = self.walk.next_leaf()?;
        let ancestors = self.walk.ancestors.as_deref().unwrap_or_default();
        let mut path = Path::with_capacity(ancestors.len() + 1);
        for ancestor in ancestors {
            path.push(ancestor.clone());
        }
        path.push(key.to_key());
        Some(path)
    }
}

impl FusedIterator for Branches<'_> {}

/// Lazily iterate over the leaves of `tree`.
///
/// Fails with [`TreeError::UnsupportedShape`] if `tree` is itself a leaf.
pub fn iter_leaves(tree: &Value) -> Result<Leaves<'_>, TreeError> {
    Ok(Leaves {
        walk: Walk::new(tree, false)?,
    })
}

/// Lazily iterate over the root-to-leaf paths of `tree`, in the same order as
/// [`iter_leaves`].
pub fn iter_branches(tree: &Value) -> Result<Branches<'_>, TreeError> {
    Ok(Branches {
        walk: Walk::new(tree, true)?,
    })
}

/// Collect the leaves of `tree`.
pub fn leaves(tree: &Value) -> Result<Vec<&Value>, TreeError> {
    Ok(iter_leaves(tree)?.collect())
}

/// Collect the branches of `tree`.
pub fn branches(tree: &Value) -> Result<Vec<Path>, TreeError> {
    Ok(iter_branches(tree)?.collect())
}

/// Replace every leaf of `tree` with `f(leaf)`.
///
/// Leaves are rewritten in traversal order. `f` is never called if `tree` is
/// itself a leaf.
pub fn transform_in_place<F>(tree: &mut Value, mut f: F) -> Result<(), TreeError>
where
    F: FnMut(Value) -> Value,
{
    let family = root_family(tree)?;
    debug!(?family, "transforming leaves in place");
    rewrite_children(tree, family, &mut |leaf: &mut Value| {
        *leaf = f(mem::take(leaf));
    });
    Ok(())
}

/// Return a copy of `tree` with every leaf replaced by `f(leaf)`.
///
/// `tree` itself is left untouched; the result shares nothing with it.
pub fn transform_copy<F>(tree: &Value, f: F) -> Result<Value, TreeError>
where
    F: FnMut(Value) -> Value,
{
    let mut copy = tree.clone();
    transform_in_place(&mut copy, f)?;
    Ok(copy)
}

fn rewrite_children(node: &mut Value, family: Family, action: &mut impl FnMut(&mut Value)) {
    match node {
        Value::List(items) | Value::Tuple(items) => {
            for child in items {
                rewrite_child(child, family, action);
            }
        }
        Value::Map(map) => {
            for child in map.values_mut() {
                rewrite_child(child, family, action);
            }
        }
        _ => {}
    }
}

fn rewrite_child(child: &mut Value, family: Family, action: &mut impl FnMut(&mut Value)) {
    if family.admits(child) {
        rewrite_children(child, family, action);
    } else {
        trace!(kind = %child.kind(), "rewriting leaf");
        action(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;
    use crate::{path, tree};

    #[test]
    fn nested_lists_in_order() {
        let t = tree!([[1, 2], [3, 4], [5]]);
        let got: Vec<i64> = leaves(&t)
            .unwrap()
            .into_iter()
            .filter_map(Value::as_i64)
            .collect();
        assert_eq!(got, vec![1, 2, 3, 4, 5]);
        assert_eq!(
            branches(&t).unwrap(),
            vec![path![0, 0], path![0, 1], path![1, 0], path![1, 1], path![2, 0]]
        );
    }

    #[test]
    fn other_families_are_leaves() {
        let t = tree!({"a": [1, 2], "b": {"c": (3, 4)}});
        assert_eq!(
            leaves(&t).unwrap(),
            vec![&tree!([1, 2]), &tree!((3, 4))]
        );
        assert_eq!(branches(&t).unwrap(), vec![path!["a"], path!["b", "c"]]);
    }

    #[test]
    fn empty_containers_yield_nothing() {
        let t = tree!([[], [[]], 7]);
        assert_eq!(leaves(&t).unwrap(), vec![&Value::Int(7)]);
        assert_eq!(branches(&t).unwrap(), vec![path![2]]);
        assert!(leaves(&tree!({})).unwrap().is_empty());
    }

    #[test]
    fn root_leaf_is_rejected() {
        let t = Value::from("just a string");
        assert_eq!(
            iter_leaves(&t).err(),
            Some(TreeError::UnsupportedShape {
                kind: ValueKind::String
            })
        );
        assert!(iter_branches(&t).is_err());

        let mut t = t;
        let mut called = false;
        let res = transform_in_place(&mut t, |v| {
            called = true;
            v
        });
        assert!(res.is_err());
        assert!(!called);
    }

    #[test]
    fn iterators_are_lazy_and_fused() {
        let t = tree!([1, [2, 3]]);
        let mut it = iter_leaves(&t).unwrap();
        assert_eq!(it.next(), Some(&Value::Int(1)));
        assert_eq!(it.next(), Some(&Value::Int(2)));
        assert_eq!(it.next(), Some(&Value::Int(3)));
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn transform_rewrites_in_branch_order() {
        let mut t = tree!({"x": {"y": 1, "z": 2}, "w": 3});
        let mut seen = Vec::new();
        transform_in_place(&mut t, |v| {
            seen.push(v.clone());
            Value::from(v.to_string())
        })
        .unwrap();
        assert_eq!(seen, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(t, tree!({"x": {"y": "1", "z": "2"}, "w": "3"}));
    }

    #[test]
    fn transform_copy_leaves_input_alone() {
        let t = tree!([[1, 2], [3, 4], [5]]);
        let tripled = transform_copy(&t, |v| match v {
            Value::Int(i) => Value::Int(i * 3),
            other => other,
        })
        .unwrap();
        assert_eq!(tripled, tree!([[3, 6], [9, 12], [15]]));
        assert_eq!(t, tree!([[1, 2], [3, 4], [5]]));
    }
}
