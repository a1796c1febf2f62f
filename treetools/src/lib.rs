#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod tracing_macros;

mod macros;

mod value;
pub use value::{Family, Key, Map, Value, ValueKind};

mod path;
pub use path::Path;

mod error;
pub use error::TreeError;

mod keys;
pub use keys::{Keys, keys};

mod walk;
pub use walk::{
    Branches, Leaves, branches, iter_branches, iter_leaves, leaves, transform_copy,
    transform_in_place,
};

mod access;
pub use access::{PutMode, get, get_mut, get_or, put};

mod nested;
pub use nested::{KeyPath, NestedMap, NestedMapError, Node};

#[cfg(feature = "serde")]
mod serialize;
