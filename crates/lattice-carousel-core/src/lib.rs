//! Core systems for Lattice Carousel.
//!
//! This crate provides the foundational pieces the carousel engine is built on:
//!
//! - **Timers**: One-shot and repeating timers driven by a host-supplied clock
//! - **Signal/Slot System**: Type-safe notifications from a component to its container
//! - **Logging**: `tracing` targets and performance spans
//!
//! # Timer Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use lattice_carousel_core::TimerManager;
//!
//! let start = Instant::now();
//! let mut timers = TimerManager::new();
//! let autoplay = timers.start_repeating(start, Duration::from_millis(3000)).unwrap();
//!
//! let fired = timers.process_expired(start + Duration::from_millis(3000));
//! assert_eq!(fired[0].id, autoplay);
//! ```
//!
//! # Signal Example
//!
//! ```
//! use lattice_carousel_core::Signal;
//!
//! let window_changed = Signal::<usize>::new();
//! window_changed.connect(|cursor| println!("cursor is now {cursor}"));
//! window_changed.emit(3);
//! ```

mod error;
pub mod logging;
pub mod signal;
pub mod timer;

pub use error::{SignalError, TimerError};
pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
pub use timer::{FiredTimer, TimerId, TimerKind, TimerManager};
