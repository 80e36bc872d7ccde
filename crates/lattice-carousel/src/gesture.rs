//! Gesture arbitration from pointer and keyboard input.
//!
//! The [`SwipeArbiter`] turns a pointer press/release pair into one discrete
//! intent: a swipe (rotate forward or backward), a tap (activate an item), or
//! nothing. Only horizontal displacement decides a swipe.
//!
//! # Usage
//!
//! ```
//! use lattice_carousel::Direction;
//! use lattice_carousel::gesture::{GestureIntent, SwipeArbiter};
//!
//! let mut arbiter = SwipeArbiter::new();
//! arbiter.press(1, 300.0, 40.0);
//! let intent = arbiter.release(1, 240.0, 42.0);
//! assert_eq!(intent, GestureIntent::Swipe(Direction::Forward));
//! ```

use crate::item::Direction;

/// Default minimum horizontal travel for a swipe, in logical pixels.
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 50.0;

/// Default maximum movement for a tap, in logical pixels.
///
/// Movement beyond this cancels tap recognition.
pub const DEFAULT_TAP_SLOP: f32 = 10.0;

/// Configuration for the swipe arbiter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// A release farther than this from the press (horizontally) is a swipe.
    pub swipe_threshold: f32,
    /// A release within this distance of the press is a tap.
    pub tap_slop: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            tap_slop: DEFAULT_TAP_SLOP,
        }
    }
}

/// The discrete outcome of a completed pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureIntent {
    /// Drag exceeded the swipe threshold.
    Swipe(Direction),
    /// Pointer barely moved. Carries the release position in carousel-local
    /// coordinates.
    Tap {
        /// Horizontal release position.
        x: f32,
        /// Vertical release position.
        y: f32,
    },
    /// Released between tap slop and swipe threshold, or cancelled.
    None,
}

/// Keys the carousel responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselKey {
    /// Left arrow: retreat.
    ArrowLeft,
    /// Right arrow: advance.
    ArrowRight,
    /// Any other key.
    Other,
}

impl CarouselKey {
    /// The rotation a key requests, if any.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::ArrowLeft => Some(Direction::Backward),
            Self::ArrowRight => Some(Direction::Forward),
            Self::Other => None,
        }
    }
}

/// An active pointer press.
#[derive(Debug, Clone, Copy)]
struct PointerPress {
    pointer_id: u64,
    start_x: f32,
    start_y: f32,
    last_x: f32,
}

/// Tracks one pointer at a time and classifies its release.
#[derive(Debug, Clone, Default)]
pub struct SwipeArbiter {
    config: GestureConfig,
    press: Option<PointerPress>,
}

impl SwipeArbiter {
    /// Create an arbiter with default configuration.
    pub fn new() -> Self {
        Self::with_config(GestureConfig::default())
    }

    /// Create an arbiter with the given configuration.
    pub fn with_config(config: GestureConfig) -> Self {
        Self {
            config,
            press: None,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> GestureConfig {
        self.config
    }

    /// Whether a pointer is currently pressed.
    pub fn is_active(&self) -> bool {
        self.press.is_some()
    }

    /// Begin tracking a pointer.
    ///
    /// Returns `false` if another pointer is already being tracked; secondary
    /// pointers are ignored until the first one is released.
    pub fn press(&mut self, pointer_id: u64, x: f32, y: f32) -> bool {
        if self.press.is_some() {
            tracing::trace!(target: "lattice_carousel::gesture", pointer_id, "ignoring secondary pointer");
            return false;
        }
        self.press = Some(PointerPress {
            pointer_id,
            start_x: x,
            start_y: y,
            last_x: x,
        });
        true
    }

    /// Update the tracked pointer position.
    ///
    /// Returns the current horizontal drag displacement, or `None` if the
    /// pointer is not the tracked one.
    pub fn move_to(&mut self, pointer_id: u64, x: f32) -> Option<f32> {
        let press = self.press.as_mut().filter(|p| p.pointer_id == pointer_id)?;
        press.last_x = x;
        Some(x - press.start_x)
    }

    /// Current horizontal drag displacement, `0.0` when idle.
    pub fn drag_offset(&self) -> f32 {
        self.press.map_or(0.0, |p| p.last_x - p.start_x)
    }

    /// Finish tracking and classify the interaction.
    ///
    /// A release from an untracked pointer yields [`GestureIntent::None`] and
    /// leaves the tracked press in place.
    pub fn release(&mut self, pointer_id: u64, x: f32, y: f32) -> GestureIntent {
        let Some(press) = self.press.filter(|p| p.pointer_id == pointer_id) else {
            return GestureIntent::None;
        };
        self.press = None;

        let intent = classify(self.config, x - press.start_x, y - press.start_y, x, y);
        tracing::debug!(
            target: "lattice_carousel::gesture",
            dx = x - press.start_x,
            ?intent,
            "pointer released"
        );
        intent
    }

    /// Abandon the tracked press without producing an intent.
    ///
    /// Returns `true` if a press was being tracked.
    pub fn cancel(&mut self) -> bool {
        self.press.take().is_some()
    }
}

fn classify(config: GestureConfig, dx: f32, dy: f32, x: f32, y: f32) -> GestureIntent {
    if dx.abs() > config.swipe_threshold {
        GestureIntent::Swipe(Direction::from_drag(dx))
    } else if dx.abs() <= config.tap_slop && dy.abs() <= config.tap_slop {
        GestureIntent::Tap { x, y }
    } else {
        GestureIntent::None
    }
}
