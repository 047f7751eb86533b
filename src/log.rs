//! Logging for session transitions and store mutations.
//!
//! With the `tracing` feature these are the `tracing` macros. Without it they
//! swallow their arguments, so pointer-move handling costs nothing extra.
//!
//! Levels: `debug` for per-event detail, `info` for site-map switches, `warn`
//! for rule ids that could not be resolved.

#[cfg(feature = "tracing")]
pub use tracing::{debug, info, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, info, warn};
