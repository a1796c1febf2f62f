//! Logging for the traversal and access engines.
//!
//! With the `tracing` feature, and in unit tests, `trace!` and `debug!` are
//! the `tracing` macros themselves. Otherwise they swallow their arguments.

#[cfg(any(test, feature = "tracing"))]
pub(crate) use tracing::{debug, trace};

#[cfg(not(any(test, feature = "tracing")))]
mod disabled {
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    pub(crate) use {debug, trace};
}

#[cfg(not(any(test, feature = "tracing")))]
pub(crate) use disabled::{debug, trace};
