//! Logging facilities for Lattice Carousel.
//!
//! Lattice Carousel uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("lattice_carousel=debug")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "lattice_carousel_core";
    /// Timer system target.
    pub const TIMER: &str = "lattice_carousel_core::timer";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "lattice_carousel_core::signal";
    /// Carousel engine target (state machine, rotations, lifecycle).
    pub const ENGINE: &str = "lattice_carousel::engine";
    /// Window state target (sequence refresh, commits).
    pub const WINDOW: &str = "lattice_carousel::window";
    /// Gesture arbiter target.
    pub const GESTURE: &str = "lattice_carousel::gesture";
    /// Autoplay timer target.
    pub const AUTOPLAY: &str = "lattice_carousel::autoplay";
    /// Configuration loading target.
    pub const CONFIG: &str = "lattice_carousel::config";
    /// Performance spans.
    pub const PERF: &str = "lattice_carousel::perf";
}

/// A performance tracing span guard.
///
/// Creates a span that is active until dropped. Useful around work a host
/// wants to profile, such as rendering a frame.
///
/// ```
/// use lattice_carousel_core::PerfSpan;
///
/// {
///     let _span = PerfSpan::new("render_frame");
///     // ... work ...
/// }
/// ```
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "lattice_carousel::perf", "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}
