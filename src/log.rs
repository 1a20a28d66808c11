//! Logging shims.
//!
//! Engine code logs through `crate::log::{debug, trace, warn}`. With the
//! `tracing` feature those are the `tracing` macros; without it they are
//! declared here and swallow their arguments, so a render pass compiles down
//! to the same code as if it never logged.

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
mod disabled {
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    macro_rules! warn_disabled {
        ($($arg:tt)*) => {};
    }

    pub(crate) use {debug, trace, warn_disabled as warn};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use disabled::{debug, trace, warn};
