//! Path-addressed reads and writes on a [`Value`] tree.

use crate::error::TreeError;
use crate::path::Path;
use crate::tracing_macros::{debug, trace};
use crate::value::{Family, Key, Value};

/// How [`put`] treats a path that does not exist yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PutMode {
    /// Fail on the first missing key. A failed write leaves the tree
    /// untouched.
    #[default]
    Strict,
    /// Create missing intermediate containers, of the root's family, and pad
    /// sequences that are too short.
    Force,
}

/// The lookup error for `path[depth]` missing from a node; `seq_len` is the
/// node's length when it is a list or tuple.
fn lookup_error(seq_len: Option<usize>, path: &[Key], depth: usize) -> TreeError {
    let path = Path::from(path);
    match (seq_len, path[depth].as_index()) {
        (Some(len), Some(index)) => TreeError::IndexOutOfRange {
            path,
            depth,
            index,
            len,
        },
        _ => TreeError::KeyNotFound { path, depth },
    }
}

fn seq_len(node: &Value) -> Option<usize> {
    node.as_slice().map(<[Value]>::len)
}

/// Grow `items` so that `index` is in bounds, filling with `fill`.
///
/// Fails instead of panicking when the sequence cannot hold `index + 1`
/// elements.
fn pad(
    items: &mut Vec<Value>,
    index: usize,
    fill: impl FnMut() -> Value,
    path: &[Key],
    depth: usize,
) -> Result<(), TreeError> {
    let too_large = || TreeError::CapacityExceeded {
        path: Path::from(path),
        depth,
        index,
    };
    let new_len = index.checked_add(1).ok_or_else(too_large)?;
    items
        .try_reserve_exact(new_len - items.len())
        .map_err(|_| too_large())?;
    items.resize_with(new_len, fill);
    Ok(())
}

/// Follow `path` from `tree` and return the node it reaches.
///
/// The empty path reaches `tree` itself. A key that is not present, an index
/// past the end of a sequence, a string key on a sequence and any key on a
/// leaf are all lookup failures.
pub fn get<'a>(tree: &'a Value, path: &[Key]) -> Result<&'a Value, TreeError> {
    let mut node = tree;
    for (depth, key) in path.iter().enumerate() {
        node = node
            .child(key)
            .ok_or_else(|| lookup_error(seq_len(node), path, depth))?;
    }
    Ok(node)
}

/// Like [`get`], returning `default` instead of failing.
pub fn get_or<'a>(tree: &'a Value, path: &[Key], default: &'a Value) -> &'a Value {
    get(tree, path).unwrap_or(default)
}

/// Mutable variant of [`get`], with the same error reporting.
pub fn get_mut<'a>(tree: &'a mut Value, path: &[Key]) -> Result<&'a mut Value, TreeError> {
    let mut node = tree;
    for (depth, key) in path.iter().enumerate() {
        let len = seq_len(node);
        let Some(child) = node.child_mut(key) else {
            return Err(lookup_error(len, path, depth));
        };
        node = child;
    }
    Ok(node)
}

/// Store `value` at `path` inside `tree`.
///
/// All keys but the last must lead to existing containers, unless `mode` is
/// [`PutMode::Force`], in which case missing containers are created with the
/// family of `tree` and short sequences are padded. The final key is then
/// assigned; an out-of-range final index is padded with [`Value::Null`] under
/// `Force` only.
///
/// With [`PutMode::Strict`] a failed call does not modify `tree`. A forced
/// index too large to allocate fails with [`TreeError::CapacityExceeded`].
pub fn put(
    tree: &mut Value,
    path: &[Key],
    value: impl Into<Value>,
    mode: PutMode,
) -> Result<(), TreeError> {
    let Some((_, parents)) = path.split_last() else {
        return Err(TreeError::EmptyPath);
    };
    let family = Family::of(tree).ok_or(TreeError::UnsupportedShape { kind: tree.kind() })?;

    let mut node = tree;
    for depth in 0..parents.len() {
        node = descend(node, path, depth, family, mode)?;
    }
    assign(node, path, parents.len(), value.into(), mode)
}

/// One step of [`put`]'s descent, creating the child under `Force`.
fn descend<'a>(
    node: &'a mut Value,
    path: &[Key],
    depth: usize,
    family: Family,
    mode: PutMode,
) -> Result<&'a mut Value, TreeError> {
    let key = &path[depth];
    trace!(%key, depth, "descending");
    match node {
        Value::Map(map) => {
            if !map.contains_key(key) {
                if mode == PutMode::Strict {
                    return Err(TreeError::KeyNotFound {
                        path: Path::from(path),
                        depth,
                    });
                }
                debug!(%key, depth, ?family, "creating missing container");
                map.insert(key.clone(), family.empty());
            }
            map.get_mut(key).ok_or_else(|| TreeError::KeyNotFound {
                path: Path::from(path),
                depth,
            })
        }
        Value::List(items) | Value::Tuple(items) => {
            let Some(index) = key.as_index() else {
                return Err(TreeError::KeyNotFound {
                    path: Path::from(path),
                    depth,
                });
            };
            if index >= items.len() {
                if mode == PutMode::Strict {
                    return Err(TreeError::IndexOutOfRange {
                        path: Path::from(path),
                        depth,
                        index,
                        len: items.len(),
                    });
                }
                debug!(index, len = items.len(), ?family, "padding with containers");
                pad(items, index, || family.empty(), path, depth)?;
            }
            Ok(&mut items[index])
        }
        leaf => Err(TreeError::UnsupportedShape { kind: leaf.kind() }),
    }
}

/// The final step of [`put`].
fn assign(
    node: &mut Value,
    path: &[Key],
    depth: usize,
    value: Value,
    mode: PutMode,
) -> Result<(), TreeError> {
    let key = &path[depth];
    match node {
        Value::Map(map) => {
            map.insert(key.clone(), value);
            Ok(())
        }
        Value::List(items) | Value::Tuple(items) => {
            let Some(index) = key.as_index() else {
                return Err(TreeError::KeyNotFound {
                    path: Path::from(path),
                    depth,
                });
            };
            if index >= items.len() {
                if mode == PutMode::Strict {
                    return Err(TreeError::IndexOutOfRange {
                        path: Path::from(path),
                        depth,
                        index,
                        len: items.len(),
                    });
                }
                debug!(index, len = items.len(), "padding with nulls");
                pad(items, index, Value::default, path, depth)?;
            }
            items[index] = value;
            Ok(())
        }
        leaf => Err(TreeError::UnsupportedShape { kind: leaf.kind() }),
    }
}
