//! Carousel configuration.
//!
//! [`CarouselConfig`] collects every tunable of the engine: window size,
//! autoplay interval, slide timing, swipe threshold and item geometry. It can
//! be built in code, loaded from TOML, or started from one of the presets the
//! content pages use.
//!
//! # TOML
//!
//! ```
//! use lattice_carousel::CarouselConfig;
//!
//! let config = CarouselConfig::from_toml_str(r#"
//! window_size = 3
//! autoplay_interval_ms = 4000
//! swipe_threshold = 40.0
//! "#).unwrap();
//!
//! assert_eq!(config.window_size, 3);
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::Easing;
use crate::error::{Error, Result};
use crate::gesture::{GestureConfig, DEFAULT_SWIPE_THRESHOLD, DEFAULT_TAP_SLOP};

/// Default number of items in the window.
pub const DEFAULT_WINDOW_SIZE: usize = 4;

/// Default autoplay interval in milliseconds.
pub const DEFAULT_AUTOPLAY_INTERVAL_MS: u64 = 3000;

/// Default slide duration in milliseconds, shared by both directions.
pub const DEFAULT_SLIDE_DURATION_MS: u64 = 500;

/// Default extra time the settle fallback waits past the slide duration.
pub const DEFAULT_SETTLE_TIMEOUT_SLACK_MS: u64 = 100;

/// Default time transitions stay disabled after the silent reset.
pub const DEFAULT_RESET_GUARD_DELAY_MS: u64 = 50;

/// Configuration for a carousel engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    /// Number of items visible at rest (`k`).
    pub window_size: usize,
    /// Whether the carousel advances on its own.
    pub autoplay: bool,
    /// Interval between autoplay rotations (`T`).
    #[serde(rename = "autoplay_interval_ms", with = "millis")]
    pub autoplay_interval: Duration,
    /// Duration of one slide (`D`).
    #[serde(rename = "slide_duration_ms", with = "millis")]
    pub slide_duration: Duration,
    /// How long past `slide_duration` to wait for the host's
    /// animation-finished signal before committing anyway.
    #[serde(rename = "settle_timeout_slack_ms", with = "millis")]
    pub settle_timeout_slack: Duration,
    /// How long transitions stay disabled after the silent reset.
    #[serde(rename = "reset_guard_delay_ms", with = "millis")]
    pub reset_guard_delay: Duration,
    /// Easing curve of the slide.
    pub easing: Easing,
    /// Minimum horizontal drag for a swipe, in logical pixels.
    pub swipe_threshold: f32,
    /// Maximum movement for a tap, in logical pixels.
    pub tap_slop: f32,
    /// Width of one item, in logical pixels.
    pub item_width: f32,
    /// Gap between adjacent items, in logical pixels.
    pub item_spacing: f32,
    /// Whether hovering the carousel pauses autoplay.
    pub pause_on_hover: bool,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            autoplay: true,
            autoplay_interval: Duration::from_millis(DEFAULT_AUTOPLAY_INTERVAL_MS),
            slide_duration: Duration::from_millis(DEFAULT_SLIDE_DURATION_MS),
            settle_timeout_slack: Duration::from_millis(DEFAULT_SETTLE_TIMEOUT_SLACK_MS),
            reset_guard_delay: Duration::from_millis(DEFAULT_RESET_GUARD_DELAY_MS),
            easing: Easing::default(),
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            tap_slop: DEFAULT_TAP_SLOP,
            item_width: 240.0,
            item_spacing: 16.0,
            pause_on_hover: true,
        }
    }
}

impl CarouselConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a preset.
    pub fn preset(preset: CarouselPreset) -> Self {
        let base = Self::default();
        match preset {
            CarouselPreset::Books => base
                .with_window_size(4)
                .with_autoplay_interval(Duration::from_millis(3000))
                .with_item_geometry(180.0, 16.0),
            CarouselPreset::Courses => base
                .with_window_size(3)
                .with_autoplay_interval(Duration::from_millis(4000))
                .with_item_geometry(300.0, 24.0),
            CarouselPreset::Quotes => base
                .with_window_size(3)
                .with_autoplay_interval(Duration::from_millis(3500))
                .with_item_geometry(320.0, 16.0),
            CarouselPreset::Strategies => base
                .with_window_size(4)
                .with_autoplay_interval(Duration::from_millis(3000))
                .with_item_geometry(260.0, 20.0),
        }
    }

    /// Preset for book summaries.
    pub fn books() -> Self {
        Self::preset(CarouselPreset::Books)
    }

    /// Preset for courses.
    pub fn courses() -> Self {
        Self::preset(CarouselPreset::Courses)
    }

    /// Preset for quotes.
    pub fn quotes() -> Self {
        Self::preset(CarouselPreset::Quotes)
    }

    /// Preset for investment strategies.
    pub fn strategies() -> Self {
        Self::preset(CarouselPreset::Strategies)
    }

    /// Set the window size.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Turn autoplay on or off.
    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    /// Set the autoplay interval.
    pub fn with_autoplay_interval(mut self, interval: Duration) -> Self {
        self.autoplay_interval = interval;
        self
    }

    /// Set the slide duration.
    pub fn with_slide_duration(mut self, duration: Duration) -> Self {
        self.slide_duration = duration;
        self
    }

    /// Set the settle fallback slack.
    pub fn with_settle_timeout_slack(mut self, slack: Duration) -> Self {
        self.settle_timeout_slack = slack;
        self
    }

    /// Set the reset guard delay.
    pub fn with_reset_guard_delay(mut self, delay: Duration) -> Self {
        self.reset_guard_delay = delay;
        self
    }

    /// Set the easing curve.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Set the swipe threshold.
    pub fn with_swipe_threshold(mut self, threshold: f32) -> Self {
        self.swipe_threshold = threshold;
        self
    }

    /// Set item width and spacing.
    pub fn with_item_geometry(mut self, width: f32, spacing: f32) -> Self {
        self.item_width = width;
        self.item_spacing = spacing;
        self
    }

    /// Set whether hover pauses autoplay.
    pub fn with_pause_on_hover(mut self, pause: bool) -> Self {
        self.pause_on_hover = pause;
        self
    }

    /// Distance between adjacent item origins.
    pub fn step(&self) -> f32 {
        self.item_width + self.item_spacing
    }

    /// When the settle fallback fires, measured from the start of a slide.
    pub fn settle_timeout(&self) -> Duration {
        self.slide_duration + self.settle_timeout_slack
    }

    /// Gesture settings derived from this configuration.
    pub fn gesture_config(&self) -> GestureConfig {
        GestureConfig {
            swipe_threshold: self.swipe_threshold,
            tap_slop: self.tap_slop,
        }
    }

    /// Check every value is usable.
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(Error::invalid_config("window_size", "must be at least 1"));
        }
        if self.autoplay && self.autoplay_interval.is_zero() {
            return Err(Error::invalid_config(
                "autoplay_interval_ms",
                "must be positive when autoplay is on",
            ));
        }
        if self.autoplay && self.autoplay_interval <= self.settle_timeout() {
            return Err(Error::invalid_config(
                "autoplay_interval_ms",
                format!(
                    "must exceed the slide duration plus settle slack ({} ms)",
                    self.settle_timeout().as_millis()
                ),
            ));
        }
        if !(self.swipe_threshold.is_finite() && self.swipe_threshold > 0.0) {
            return Err(Error::invalid_config("swipe_threshold", "must be a positive number"));
        }
        if !(self.tap_slop.is_finite() && self.tap_slop >= 0.0) {
            return Err(Error::invalid_config("tap_slop", "must be zero or positive"));
        }
        if self.tap_slop >= self.swipe_threshold {
            return Err(Error::invalid_config(
                "tap_slop",
                "must be smaller than swipe_threshold",
            ));
        }
        if !(self.item_width.is_finite() && self.item_width > 0.0) {
            return Err(Error::invalid_config("item_width", "must be a positive number"));
        }
        if !(self.item_spacing.is_finite() && self.item_spacing >= 0.0) {
            return Err(Error::invalid_config("item_spacing", "must be zero or positive"));
        }
        Ok(())
    }

    /// Parse and validate a configuration from TOML text.
    ///
    /// Missing keys take their default values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize this configuration to TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Read, parse and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(target: "lattice_carousel::config", path = %path.display(), "configuration loaded");
        Ok(config)
    }
}

/// The content carousels shipped with the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarouselPreset {
    /// Book and idea summaries.
    Books,
    /// Courses.
    Courses,
    /// Quotes.
    Quotes,
    /// Investment strategies.
    Strategies,
}

impl CarouselPreset {
    /// The preset's name as used in configuration.
    pub fn name(self) -> &'static str {
        match self {
            Self::Books => "books",
            Self::Courses => "courses",
            Self::Quotes => "quotes",
            Self::Strategies => "strategies",
        }
    }
}

impl fmt::Display for CarouselPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CarouselPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "books" => Ok(Self::Books),
            "courses" => Ok(Self::Courses),
            "quotes" => Ok(Self::Quotes),
            "strategies" => Ok(Self::Strategies),
            _ => Err(Error::UnknownPreset(s.to_string())),
        }
    }
}

/// Serde adapter storing a [`Duration`] as whole milliseconds.
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(ms)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
