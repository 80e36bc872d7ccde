//! Lattice Carousel - a headless infinite carousel engine.
//!
//! A carousel shows a window of `k` items out of a circular sequence of `N`
//! keyed items. It advances on its own (autoplay), on swipes, on arrow keys, or
//! on request, and wraps around without end. Each rotation slides a `k + 1`
//! strip by one item and then silently snaps back, so the loop looks seamless.
//!
//! The engine owns no window, no renderer and no clock. The host feeds it
//! items, input and the current time, and draws the [`Frame`] it returns.
//!
//! # Quick Start
//!
//! ```
//! use std::time::{Duration, Instant};
//! use lattice_carousel::{CarouselConfig, CarouselEngine, Direction};
//!
//! let start = Instant::now();
//! let mut engine = CarouselEngine::new(CarouselConfig::books()).unwrap();
//! engine.set_sequence((0..10).map(|i| format!("book-{i}")).collect(), start);
//! engine.start(start);
//!
//! let ticket = engine.rotate(Direction::Forward, start).unwrap();
//! engine.notify_animation_finished(ticket, start + Duration::from_millis(500));
//! assert_eq!(engine.window_keys(), ["book-1", "book-2", "book-3", "book-4"]);
//! ```
//!
//! # Driving the engine
//!
//! - Call [`CarouselEngine::advance`] whenever
//!   [`CarouselEngine::time_until_next`] elapses. That runs autoplay, the
//!   settle fallback and the reset guard.
//! - Forward pointer and key events to the `pointer_*` and `key_press`
//!   methods.
//! - Draw [`CarouselEngine::frame`], optionally through
//!   [`Frame::render_with`] and your own per-item template.
//! - Report the end of each slide with
//!   [`CarouselEngine::notify_animation_finished`].
//!
//! # Logging
//!
//! Everything is traced under the `lattice_carousel` target; see
//! [`lattice_carousel_core::logging::targets`].

pub mod animation;
pub mod autoplay;
pub mod config;
mod engine;
mod error;
pub mod gesture;
mod item;
pub mod render;
pub mod window;

pub use autoplay::PauseReasons;
pub use config::{CarouselConfig, CarouselPreset};
pub use engine::{CarouselEngine, EngineState, RotationTicket};
pub use error::{Degradation, Error, Result};
pub use gesture::{CarouselKey, GestureIntent};
pub use item::{CarouselItem, Direction};
pub use render::{Frame, FrameSlot, RenderTemplate, SlotContext};
pub use window::{WindowMode, WindowState};

pub use lattice_carousel_core::{ConnectionId, PerfSpan, Signal};
