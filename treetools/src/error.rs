//! Errors raised by the tree functions.

use crate::path::Path;
use crate::value::ValueKind;

/// Error returned by traversal, transformation and path access on a
/// [`Value`](crate::Value) tree.
///
/// `KeyNotFound` and `IndexOutOfRange` are lookup failures: the caller can
/// recover from them, for example through [`get_or`](crate::get_or).
/// `UnsupportedShape` means a container was required and something else was
/// found.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TreeError {
    /// A node is neither a sequence nor a mapping where one was required.
    UnsupportedShape {
        /// The kind of the offending node.
        kind: ValueKind,
    },

    /// A key along a path is not present.
    KeyNotFound {
        /// The full requested path.
        path: Path,
        /// Index of the missing key in `path` (0-based).
        depth: usize,
    },

    /// A sequence index along a path is past the end of the sequence.
    IndexOutOfRange {
        /// The full requested path.
        path: Path,
        /// Index of the offending key in `path` (0-based).
        depth: usize,
        /// The index that was requested.
        index: usize,
        /// The length of the sequence.
        len: usize,
    },

    /// A forced write would grow a sequence past what can be allocated.
    CapacityExceeded {
        /// The full requested path.
        path: Path,
        /// Index of the offending key in `path` (0-based).
        depth: usize,
        /// The index that was requested.
        index: usize,
    },

    /// A write was given a path with no keys.
    EmptyPath,
}

impl TreeError {
    /// Whether this error is a recoverable lookup failure.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            TreeError::KeyNotFound { .. } | TreeError::IndexOutOfRange { .. }
        )
    }

    /// The requested path, for lookup failures and failed forced writes.
    pub fn path(&self) -> Option<&Path> {
        match self {
            TreeError::KeyNotFound { path, .. }
            | TreeError::IndexOutOfRange { path, .. }
            | TreeError::CapacityExceeded { path, .. } => Some(path),
            TreeError::UnsupportedShape { .. } | TreeError::EmptyPath => None,
        }
    }
}

impl core::fmt::Display for TreeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TreeError::UnsupportedShape { kind } => {
                write!(f, "expected a list, tuple or map, found {kind}")
            }
            TreeError::KeyNotFound { path, depth } => {
                write!(f, "key not found: {path} (missing at step {depth})")
            }
            TreeError::IndexOutOfRange {
                path,
                depth,
                index,
                len,
            } => {
                write!(
                    f,
                    "index out of range: {path} (step {depth}: index {index}, length {len})"
                )
            }
            TreeError::CapacityExceeded { path, depth, index } => {
                write!(
                    f,
                    "cannot grow sequence to index {index}: {path} (step {depth})"
                )
            }
            TreeError::EmptyPath => f.write_str("path must contain at least one key"),
        }
    }
}

impl core::error::Error for TreeError {}
