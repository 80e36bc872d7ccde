//! Slide animation for the carousel strip.
//!
//! This module provides the easing curves and the [`SlideTransition`]
//! controller that moves the strip by one item and performs the silent reset.
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use lattice_carousel::Direction;
//! use lattice_carousel::animation::{Easing, SlideTransition};
//!
//! let start = Instant::now();
//! let mut slide = SlideTransition::new(Duration::from_millis(500), Easing::Linear, 240.0);
//! slide.start(Direction::Forward, start);
//! assert_eq!(slide.offset(start + Duration::from_millis(250)), -120.0);
//! ```

mod easing;
mod transition;

pub use easing::Easing;
pub use transition::{SlideSpan, SlideTransition, TransitionState};
