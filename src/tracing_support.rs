//! Tracing support for map transforms.
//!
//! With the `tracing` feature enabled, operations open `trace` spans and
//! report key collisions as `debug` events. Without it, the same macros
//! expand to nothing.

#[cfg(feature = "tracing")]
mod enabled {
    use std::sync::Once;

    use tracing_subscriber::{EnvFilter, fmt};

    /// Installs a test-friendly fmt subscriber. Safe to call repeatedly;
    /// only the first call has any effect.
    pub fn init_tracing() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let _ = fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .with_test_writer()
                .try_init();
        });
    }

    pub(crate) use tracing::{debug, trace_span};
}

#[cfg(not(feature = "tracing"))]
mod disabled {
    pub fn init_tracing() {
        // No-op when tracing is disabled
    }

    macro_rules! trace_span {
        ($($args:tt)*) => {{ $crate::tracing_support::NoOpSpan }};
    }

    macro_rules! debug {
        ($($args:tt)*) => {{}};
    }

    pub(crate) use {debug, trace_span};

    pub struct NoOpSpan;

    impl NoOpSpan {
        pub fn entered(self) -> NoOpSpanGuard {
            NoOpSpanGuard
        }
    }

    pub struct NoOpSpanGuard;
}

#[cfg(feature = "tracing")]
pub use enabled::init_tracing;
#[cfg(feature = "tracing")]
pub(crate) use enabled::{debug, trace_span};

#[cfg(not(feature = "tracing"))]
pub use disabled::{NoOpSpan, NoOpSpanGuard, init_tracing};
#[cfg(not(feature = "tracing"))]
pub(crate) use disabled::{debug, trace_span};
