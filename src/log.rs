//! Logging shims for the resolver and the render pass.
//!
//! `debug!` traces geometry resolution and image binding; `warn!` reports pens
//! a render pass had to skip. Both forward to `tracing` under the `tracing`
//! feature and compile to nothing otherwise.

#[cfg(feature = "tracing")]
pub use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, warn};

#[cfg(test)]
mod tests {
    use crate::log::{debug, warn};

    #[test]
    fn macros_accept_structured_fields() {
        let pen = "a";
        let count = 3usize;
        debug!(pen, count, "invalidating geometry");
        warn!(pen = pen, error = %"unknown parent", "pen skipped");
        debug!(src = ?Some("logo.png"), "image not loaded yet");
    }
}
