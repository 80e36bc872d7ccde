//! Autoplay timer ownership.
//!
//! [`Autoplay`] owns at most one repeating timer in the engine's
//! [`TimerManager`]. Arming always stops the previous handle first, so arming
//! twice never leaves two timers running. Pausing is tracked per reason: the
//! timer runs only while no reason is active.

use std::time::{Duration, Instant};

use bitflags::bitflags;
use lattice_carousel_core::{TimerError, TimerId, TimerManager};

bitflags! {
    /// Why autoplay is currently held back.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct PauseReasons: u8 {
        /// A pointer is pressed on the carousel, or a swipe is settling.
        const POINTER = 0b0000_0001;
        /// The pointer hovers the carousel.
        const HOVER = 0b0000_0010;
        /// The container paused autoplay (for example a hidden page).
        const EXTERNAL = 0b0000_0100;
    }
}

/// The autoplay timer.
#[derive(Debug)]
pub struct Autoplay {
    /// Interval between forward rotations.
    interval: Duration,
    /// Whether autoplay is configured on at all.
    enabled: bool,
    /// The live timer handle, if armed.
    timer: Option<TimerId>,
    /// Active pause reasons.
    paused: PauseReasons,
}

impl Autoplay {
    /// Create a disarmed autoplay timer.
    pub fn new(interval: Duration, enabled: bool) -> Self {
        Self {
            interval,
            enabled,
            timer: None,
            paused: PauseReasons::empty(),
        }
    }

    /// Whether the timer is currently armed.
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// The live timer handle.
    pub fn timer_id(&self) -> Option<TimerId> {
        self.timer
    }

    /// Whether `id` is this autoplay's timer.
    pub fn owns(&self, id: TimerId) -> bool {
        self.timer == Some(id)
    }

    /// Active pause reasons.
    pub fn pause_reasons(&self) -> PauseReasons {
        self.paused
    }

    /// Whether any pause reason is active.
    pub fn is_paused(&self) -> bool {
        !self.paused.is_empty()
    }

    /// Turn autoplay on or off. Takes effect on the next [`sync`](Self::sync).
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Change the interval. An armed timer is re-armed with the new interval.
    pub fn set_interval(&mut self, interval: Duration, timers: &mut TimerManager, now: Instant) {
        self.interval = interval;
        if self.is_armed() {
            self.arm(timers, now);
        }
    }

    /// Arm the timer, stopping any previous handle first.
    ///
    /// Returns `false` if the interval is zero and nothing could be armed.
    pub fn arm(&mut self, timers: &mut TimerManager, now: Instant) -> bool {
        self.disarm(timers);
        match timers.start_repeating(now, self.interval) {
            Ok(id) => {
                tracing::debug!(target: "lattice_carousel::autoplay", ?id, interval = ?self.interval, "autoplay armed");
                self.timer = Some(id);
                true
            }
            Err(err) => {
                tracing::warn!(target: "lattice_carousel::autoplay", %err, "autoplay not armed");
                false
            }
        }
    }

    /// Stop the timer if armed.
    pub fn disarm(&mut self, timers: &mut TimerManager) {
        if let Some(id) = self.timer.take() {
            match timers.stop(id) {
                Ok(()) | Err(TimerError::InvalidTimerId) => {}
                Err(err) => {
                    tracing::warn!(target: "lattice_carousel::autoplay", ?id, %err, "failed to stop autoplay timer");
                }
            }
            tracing::debug!(target: "lattice_carousel::autoplay", ?id, "autoplay disarmed");
        }
    }

    /// Add a pause reason.
    pub fn pause(&mut self, reason: PauseReasons) {
        self.paused.insert(reason);
    }

    /// Remove a pause reason.
    pub fn resume(&mut self, reason: PauseReasons) {
        self.paused.remove(reason);
    }

    /// Bring the timer in line with the desired state.
    ///
    /// The timer should run when autoplay is enabled, `eligible` holds (the
    /// engine is mounted and the window rotates) and no pause reason is active.
    /// An already-armed timer keeps its phase; an unarmed one is armed fresh.
    pub fn sync(&mut self, timers: &mut TimerManager, now: Instant, eligible: bool) {
        let wanted = self.enabled && eligible && !self.is_paused();
        match (wanted, self.is_armed()) {
            (true, false) => {
                self.arm(timers, now);
            }
            (false, true) => self.disarm(timers),
            _ => {}
        }
    }
}
